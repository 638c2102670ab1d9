use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

mod settings;

pub use settings::{ApiSettings, CacheSettings, Settings, SimulatorSettings};

/// Identifier the backend assigns to a startup profile.
pub type ProfileId = i64;

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Catalog
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
	pub id: i64,
	pub name: String,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub category: String,
	pub cost_price: f64,
	pub selling_price: f64,
	pub inventory: u32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub units_per_batch: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub production_cost: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub production_time: Option<f64>,
}

impl Product {
	/// Unit margin as a percentage of the selling price.
	pub fn margin_percent(&self) -> f64 {
		if self.selling_price <= 0.0 {
			return 0.0;
		}
		(self.selling_price - self.cost_price) / self.selling_price * 100.0
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductCreate {
	pub name: String,
	pub category: String,
	pub cost_price: f64,
	pub selling_price: f64,
	pub inventory: u32,
	pub units_per_batch: u32,
	pub production_cost: f64,
	pub production_time: f64,
}

// Production
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductionBatch {
	pub units_produced: u32,
	pub production_cost: f64,
	pub production_time: f64,
	pub date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BatchCreated {
	pub message: String,
	pub batch_id: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductionInsights {
	pub production_cost_per_unit: f64,
	pub units_per_hour: f64,
	pub total_units_produced: u64,
	pub cost_leakage: bool,
	pub margin_percent: f64,
}

// Orders
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Order {
	pub product_id: i64,
	/// Free-text sales channel label; any value is accepted.
	pub channel: String,
	pub quantity: u32,
	pub customer_ref: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderResponse {
	pub message: String,
	pub order_id: i64,
	pub remaining_inventory: i64,
}

// Dashboard analytics
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SummaryTotals {
	pub total_revenue: f64,
	pub total_profit: f64,
	pub total_orders: u64,
	pub total_inventory: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BestProduct {
	pub id: i64,
	pub name: String,
	pub revenue: f64,
}

/// `best_product` and `worst_product` are null until the first order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DashboardSummary {
	pub summary: SummaryTotals,
	#[serde(default)]
	pub best_product: Option<BestProduct>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub worst_product: Option<BestProduct>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductPerformance {
	pub id: i64,
	pub name: String,
	pub revenue: f64,
	pub profit: f64,
	pub orders: u64,
	pub margin: f64,
}

/// Lifetime sales of a single product, from `/products/{id}/performance`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductPerformanceDetail {
	pub product_id: i64,
	pub name: String,
	pub revenue: f64,
	pub units_sold: u64,
	pub profit: f64,
	/// Units per order.
	pub velocity: f64,
	pub inventory: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChannelSales {
	pub channel: String,
	pub revenue: f64,
	pub orders: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SalesSummary {
	pub total_revenue: f64,
	pub total_profit: f64,
	pub avg_order_value: f64,
	pub inventory_health: String,
	pub margin_percent: f64,
}

/// Traffic-light reading of a margin percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginHealth {
	Healthy,
	Watch,
	Critical,
}

impl MarginHealth {
	pub fn classify(margin_percent: f64) -> Self {
		if margin_percent >= 20.0 {
			MarginHealth::Healthy
		} else if margin_percent >= 10.0 {
			MarginHealth::Watch
		} else {
			MarginHealth::Critical
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			MarginHealth::Healthy => "healthy",
			MarginHealth::Watch => "watch",
			MarginHealth::Critical => "critical",
		}
	}
}

// Startup profile
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StartupProfile {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<ProfileId>,
	pub business_name: String,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub business_type: String,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub industry: String,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub location: String,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub growth_stage: String,
	#[serde(default)]
	pub msme_registered: bool,
	#[serde(default)]
	pub annual_revenue: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProfileCreated {
	pub id: ProfileId,
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub business_name: Option<String>,
}

// Government schemes
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Scheme {
	#[serde(alias = "scheme_id")]
	pub id: i64,
	pub name: String,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub description: String,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub eligibility: String,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub benefits: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub link: Option<String>,
	/// Why the scheme fits; only set on matched schemes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub relevance: Option<String>,
}

/// Keeps the schemes whose name or description contains `query`, ignoring case.
pub fn filter_schemes<'a>(schemes: &'a [Scheme], query: &str) -> Vec<&'a Scheme> {
	let needle = query.trim().to_lowercase();
	schemes
		.iter()
		.filter(|s| {
			needle.is_empty()
				|| s.name.to_lowercase().contains(&needle)
				|| s.description.to_lowercase().contains(&needle)
		})
		.collect()
}

// Risk analysis
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RiskAnalysisRequest {
	pub startup_profile_id: ProfileId,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub groq_api_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RiskItem {
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default)]
	pub severity: String,
	pub message: String,
}

/// The action plan is free text (or null) on a fresh analysis; stored reports
/// carry the whole AI response, with the text under `actions`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ActionPlan {
	Text(String),
	Structured(serde_json::Value),
}

impl ActionPlan {
	pub fn to_text(&self) -> String {
		match self {
			ActionPlan::Text(text) => text.clone(),
			ActionPlan::Structured(value) => match value.get("actions").and_then(|a| a.as_str()) {
				Some(actions) => actions.to_string(),
				None if value.is_null() => String::new(),
				None => serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
			},
		}
	}
}

impl Default for ActionPlan {
	fn default() -> Self {
		ActionPlan::Text(String::new())
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RiskReport {
	/// `report_id` on a fresh analysis, `id` on a stored report.
	#[serde(default, alias = "report_id", skip_serializing_if = "Option::is_none")]
	pub id: Option<i64>,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub risk_level: String,
	#[serde(default)]
	pub risks: Vec<RiskItem>,
	#[serde(default)]
	pub ai_action_plan: ActionPlan,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timestamp: Option<String>,
}

// AI growth: audience matching
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AudienceMatchingRequest {
	pub product_name: String,
	pub category: String,
	pub price_range: String,
	pub description: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub target_country: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlatformRecommendation {
	pub platform: String,
	pub reason: String,
	pub confidence_score: f64,
	#[serde(default)]
	pub keywords: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TargetAudience {
	pub age_range: String,
	#[serde(default)]
	pub interests: Vec<String>,
	pub buying_intent: String,
	pub demographics: String,
	pub summary: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AudienceMatchingResponse {
	pub success: bool,
	pub product: String,
	pub target_audience: TargetAudience,
	#[serde(default)]
	pub platform_recommendations: Vec<PlatformRecommendation>,
	pub overall_strategy: String,
	#[serde(default)]
	pub market_trends_used: bool,
}

// AI growth: content optimization
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ContentOptimizationRequest {
	pub product_name: String,
	pub product_details: String,
	pub selected_platform: String,
	pub target_audience: String,
	pub category: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OptimizedContent {
	pub title: String,
	pub description: String,
	pub call_to_action: String,
	#[serde(default)]
	pub hashtags_or_tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PostingStrategy {
	pub best_timing: String,
	pub format: String,
	pub frequency: String,
	#[serde(default)]
	pub additional_tips: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ActionRecommendation {
	pub action: String,
	pub expected_impact: String,
	pub priority: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ContentOptimizationResponse {
	pub success: bool,
	pub platform: String,
	pub optimized_content: OptimizedContent,
	pub posting_strategy: PostingStrategy,
	#[serde(default)]
	pub compliance_warnings: Vec<String>,
	#[serde(default)]
	pub action_recommendations: Vec<ActionRecommendation>,
}
