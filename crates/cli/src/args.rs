use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "sahayak",
    version,
    about = "Vyaapar Sahayak: products, orders, production and growth tools for small businesses."
)]
pub struct Cli {
    /// Settings file (defaults to ./sahayak.json when present)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Answer reads from the built-in demo data instead of the backend
    #[arg(long, global = true)]
    pub demo: bool,

    /// Print raw JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a startup profile and make it the active one
    Onboard(OnboardArgs),
    /// Show the active business
    Whoami,
    /// Forget the active profile
    Logout,
    #[command(subcommand)]
    Products(ProductsCommand),
    #[command(subcommand)]
    Production(ProductionCommand),
    #[command(subcommand)]
    Orders(OrdersCommand),
    /// Revenue, profit, channel split and product performance
    Dashboard,
    #[command(subcommand)]
    Schemes(SchemesCommand),
    #[command(subcommand)]
    Risk(RiskCommand),
    #[command(subcommand)]
    Growth(GrowthCommand),
    /// Forecast the effect of a business decision
    Simulate(SimulateArgs),
    /// Generate captions, offers and hashtags for a product
    Marketing(MarketingArgs),
}

#[derive(Args, Debug)]
pub struct OnboardArgs {
    #[arg(long)]
    pub business_name: String,
    #[arg(long, default_value = "")]
    pub business_type: String,
    #[arg(long, default_value = "")]
    pub industry: String,
    #[arg(long, default_value = "")]
    pub location: String,
    #[arg(long, default_value = "")]
    pub growth_stage: String,
    #[arg(long)]
    pub msme_registered: bool,
    #[arg(long, default_value_t = 0.0)]
    pub annual_revenue: f64,
}

#[derive(Subcommand, Debug)]
pub enum ProductsCommand {
    /// List products for the active profile
    List,
    /// Add a product to the catalog
    Create(ProductArgs),
    /// Revenue and margin for one product
    Performance { product_id: i64 },
}

#[derive(Args, Debug)]
pub struct ProductArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub category: String,
    #[arg(long)]
    pub cost_price: f64,
    #[arg(long)]
    pub selling_price: f64,
    #[arg(long, default_value_t = 0)]
    pub inventory: u32,
    #[arg(long, default_value_t = 0)]
    pub units_per_batch: u32,
    #[arg(long, default_value_t = 0.0)]
    pub production_cost: f64,
    /// Hours per batch
    #[arg(long, default_value_t = 0.0)]
    pub production_time: f64,
}

#[derive(Subcommand, Debug)]
pub enum ProductionCommand {
    /// Record a production batch
    Add(BatchArgs),
    /// Cost per unit, throughput and margin for a product
    Insights { product_id: i64 },
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    pub product_id: i64,
    #[arg(long)]
    pub units: u32,
    #[arg(long)]
    pub cost: f64,
    /// Hours spent
    #[arg(long)]
    pub hours: f64,
    /// Batch date (YYYY-MM-DD), today when omitted
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum OrdersCommand {
    /// Record a sale
    Create(OrderArgs),
}

#[derive(Args, Debug)]
pub struct OrderArgs {
    pub product_id: i64,
    #[arg(long)]
    pub quantity: u32,
    /// Sales channel, e.g. Amazon, Flipkart, Retail
    #[arg(long, default_value = "Direct")]
    pub channel: String,
    #[arg(long, default_value = "")]
    pub customer_ref: String,
}

#[derive(Subcommand, Debug)]
pub enum SchemesCommand {
    /// All government schemes, optionally filtered
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Schemes matched to the active profile
    Matched,
}

#[derive(Subcommand, Debug)]
pub enum RiskCommand {
    /// Analyse risks for the active profile
    Run {
        #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
        groq_api_key: Option<String>,
    },
    /// Show a stored risk report
    Get { report_id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum GrowthCommand {
    /// Find the audience and platforms for a product
    Audience(AudienceArgs),
    /// Optimise a post for one platform
    Content(ContentArgs),
}

#[derive(Args, Debug)]
pub struct AudienceArgs {
    #[arg(long)]
    pub product_name: String,
    #[arg(long)]
    pub category: String,
    #[arg(long)]
    pub price_range: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub target_country: Option<String>,
}

#[derive(Args, Debug)]
pub struct ContentArgs {
    #[arg(long)]
    pub product_name: String,
    #[arg(long, default_value = "")]
    pub product_details: String,
    #[arg(long)]
    pub platform: String,
    #[arg(long, default_value = "")]
    pub target_audience: String,
    #[arg(long, default_value = "")]
    pub category: String,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Decision key; `--list` shows the choices
    #[arg(default_value = simulators::decision::DEFAULT_DECISION)]
    pub decision: String,
    /// 7, 14 or 30
    #[arg(long, default_value_t = simulators::decision::DEFAULT_TIME_RANGE_DAYS)]
    pub days: u32,
    #[arg(long)]
    pub list: bool,
}

#[derive(Args, Debug)]
pub struct MarketingArgs {
    #[arg(long, default_value = "")]
    pub product_name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = simulators::marketing::DEFAULT_TONE)]
    pub tone: String,
    #[arg(long, default_value = "")]
    pub audience: String,
    #[arg(long, default_value = simulators::marketing::DEFAULT_PLATFORM)]
    pub platform: String,
    /// Show tones, audiences and platforms
    #[arg(long)]
    pub list: bool,
}
