//! `sahayak` command-line front end.

pub mod app;
pub mod args;
pub mod commands;
pub mod render;

pub use app::App;
pub use args::Cli;
