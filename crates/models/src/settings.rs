use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// Settings models
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiSettings {
	pub base_url: String,
	pub timeout_secs: Option<u64>,
}

impl Default for ApiSettings {
	fn default() -> Self {
		Self {
			base_url: "http://127.0.0.1:8000".to_string(),
			timeout_secs: None,
		}
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CacheSettings {
	pub stale_time_secs: u64,
	pub retry: u32,
}

impl Default for CacheSettings {
	fn default() -> Self {
		Self {
			stale_time_secs: 5 * 60,
			retry: 1,
		}
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SimulatorSettings {
	pub decision_delay_ms: u64,
	pub content_delay_ms: u64,
}

impl Default for SimulatorSettings {
	fn default() -> Self {
		Self {
			decision_delay_ms: 1500,
			content_delay_ms: 2000,
		}
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
	pub api: ApiSettings,
	pub session_path: PathBuf,
	pub cache: CacheSettings,
	pub simulators: SimulatorSettings,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			api: ApiSettings::default(),
			session_path: PathBuf::from(".sahayak/session.json"),
			cache: CacheSettings::default(),
			simulators: SimulatorSettings::default(),
		}
	}
}
