use std::io::Write;

use anyhow::Result;
use chrono::Local;
use models::{
    AudienceMatchingRequest, ContentOptimizationRequest, Order, ProductCreate, ProductionBatch,
    StartupProfile, filter_schemes,
};
use serde::Serialize;
use simulators::{
    BRAND_TONES, ContentRequest, DECISION_OPTIONS, PLATFORMS, SimulationRequest, TARGET_AUDIENCES,
};

use crate::app::{App, FALLBACK_BUSINESS_NAME};
use crate::args::{
    Command, GrowthCommand, MarketingArgs, OrdersCommand, ProductionCommand, ProductsCommand,
    RiskCommand, SchemesCommand, SimulateArgs,
};
use crate::render;

/// Writes `value` as pretty JSON or through `text`.
fn emit<T, W>(out: &mut W, json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<()>
where
    T: Serialize,
    W: Write,
{
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    } else {
        write!(out, "{}", text(value))?;
    }
    Ok(())
}

pub async fn run<W: Write>(app: &App, command: Command, json: bool, out: &mut W) -> Result<()> {
    match command {
        Command::Onboard(args) => {
            let profile = StartupProfile {
                id: None,
                business_name: args.business_name,
                business_type: args.business_type,
                industry: args.industry,
                location: args.location,
                growth_stage: args.growth_stage,
                msme_registered: args.msme_registered,
                annual_revenue: args.annual_revenue,
            };
            let created = app.onboard(&profile).await?;
            emit(out, json, &created, |c| {
                format!("{} (profile {} is now active)\n", c.message, c.id)
            })?;
        }
        Command::Whoami => {
            let profile = app.profile().await.unwrap_or_else(|err| {
                tracing::warn!("could not load startup profile: {err}");
                None
            });
            match (profile, app.session().profile_id()) {
                (Some(profile), _) => emit(out, json, &profile, render::profile)?,
                (None, Some(id)) => writeln!(out, "{FALLBACK_BUSINESS_NAME} (profile {id})")?,
                (None, None) => writeln!(out, "{FALLBACK_BUSINESS_NAME} (no active profile)")?,
            }
        }
        Command::Logout => {
            app.logout()?;
            writeln!(out, "Active profile cleared.")?;
        }
        Command::Products(cmd) => products(app, cmd, json, out).await?,
        Command::Production(cmd) => production(app, cmd, json, out).await?,
        Command::Orders(OrdersCommand::Create(args)) => {
            let order = Order {
                product_id: args.product_id,
                channel: args.channel,
                quantity: args.quantity,
                customer_ref: args.customer_ref,
            };
            let created = app.create_order(&order).await?;
            emit(out, json, &created, |c| {
                format!(
                    "{} (order {}, {} left in stock)\n",
                    c.message, c.order_id, c.remaining_inventory
                )
            })?;
        }
        Command::Dashboard => dashboard(app, json, out).await?,
        Command::Schemes(cmd) => schemes(app, cmd, json, out).await?,
        Command::Risk(cmd) => {
            let report = match cmd {
                RiskCommand::Run { groq_api_key } => app.run_risk_analysis(groq_api_key).await?,
                RiskCommand::Get { report_id } => app.risk_report(report_id).await?,
            };
            emit(out, json, &report, render::risk_report)?;
        }
        Command::Growth(cmd) => growth(app, cmd, json, out).await?,
        Command::Simulate(args) => simulate(app, args, json, out).await?,
        Command::Marketing(args) => marketing(app, args, json, out).await?,
    }
    Ok(())
}

async fn products<W: Write>(app: &App, cmd: ProductsCommand, json: bool, out: &mut W) -> Result<()> {
    match cmd {
        ProductsCommand::List => {
            let products = app.products().await?;
            emit(out, json, &products, |p| render::products(p))
        }
        ProductsCommand::Create(args) => {
            let product = ProductCreate {
                name: args.name,
                category: args.category,
                cost_price: args.cost_price,
                selling_price: args.selling_price,
                inventory: args.inventory,
                units_per_batch: args.units_per_batch,
                production_cost: args.production_cost,
                production_time: args.production_time,
            };
            let created = app.create_product(&product).await?;
            emit(out, json, &created, |p| {
                format!("Created product {} ({})\n", p.name, p.id)
            })
        }
        ProductsCommand::Performance { product_id } => {
            let performance = app.product_performance(product_id).await?;
            emit(out, json, &performance, render::product_detail)
        }
    }
}

async fn production<W: Write>(
    app: &App,
    cmd: ProductionCommand,
    json: bool,
    out: &mut W,
) -> Result<()> {
    match cmd {
        ProductionCommand::Add(args) => {
            let batch = ProductionBatch {
                units_produced: args.units,
                production_cost: args.cost,
                production_time: args.hours,
                date: args.date.unwrap_or_else(|| Local::now().date_naive()),
            };
            let created = app.add_production_batch(args.product_id, &batch).await?;
            emit(out, json, &created, |c| {
                format!("{} (batch {})\n", c.message, c.batch_id)
            })
        }
        ProductionCommand::Insights { product_id } => {
            let insights = app.production_insights(product_id).await?;
            let name = app
                .products()
                .await
                .ok()
                .and_then(|products| products.into_iter().find(|p| p.id == product_id))
                .map(|p| p.name)
                .unwrap_or_else(|| format!("Product {product_id}"));
            emit(out, json, &insights, |i| render::production_insights(&name, i))
        }
    }
}

async fn dashboard<W: Write>(app: &App, json: bool, out: &mut W) -> Result<()> {
    let summary = app.dashboard().await?;
    let channels = app.channel_sales().await?;
    let products = app.dashboard_products().await?;
    let sales = app.sales_summary().await?;

    if json {
        let value = serde_json::json!({
            "summary": summary,
            "channels": channels,
            "products": products,
            "sales_summary": sales,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(());
    }

    writeln!(out, "{}\n", app.business_name().await)?;
    write!(out, "{}", render::dashboard(&summary))?;
    writeln!(out)?;
    write!(out, "{}", render::sales_summary(&sales))?;
    writeln!(out)?;
    write!(out, "{}", render::channels(&channels))?;
    writeln!(out)?;
    write!(out, "{}", render::product_performance(&products))?;
    Ok(())
}

async fn schemes<W: Write>(app: &App, cmd: SchemesCommand, json: bool, out: &mut W) -> Result<()> {
    let (schemes, search) = match cmd {
        SchemesCommand::List { search } => (app.schemes().await?, search.unwrap_or_default()),
        SchemesCommand::Matched => (app.matched_schemes().await?, String::new()),
    };
    let hits = filter_schemes(&schemes, &search);
    emit(out, json, &hits, |h| render::schemes(h))
}

async fn growth<W: Write>(app: &App, cmd: GrowthCommand, json: bool, out: &mut W) -> Result<()> {
    match cmd {
        GrowthCommand::Audience(args) => {
            let request = AudienceMatchingRequest {
                product_name: args.product_name,
                category: args.category,
                price_range: args.price_range,
                description: args.description,
                target_country: args.target_country,
            };
            let response = app.audience_matching(&request).await?;
            emit(out, json, &response, render::audience)
        }
        GrowthCommand::Content(args) => {
            let request = ContentOptimizationRequest {
                product_name: args.product_name,
                product_details: args.product_details,
                selected_platform: args.platform,
                target_audience: args.target_audience,
                category: args.category,
            };
            let response = app.content_optimization(&request).await?;
            emit(out, json, &response, render::content_optimization)
        }
    }
}

async fn simulate<W: Write>(app: &App, args: SimulateArgs, json: bool, out: &mut W) -> Result<()> {
    if args.list {
        for option in DECISION_OPTIONS {
            writeln!(out, "{:<20} {}", option.key, option.label)?;
        }
        return Ok(());
    }

    let request = SimulationRequest {
        decision: args.decision,
        time_range_days: args.days,
    };
    let result = app.simulate(&request).await?;
    let label = DECISION_OPTIONS
        .iter()
        .find(|o| o.key == request.decision.trim())
        .map(|o| o.label)
        .unwrap_or(request.decision.as_str());
    emit(out, json, &result, |r| {
        render::simulation(label, request.time_range_days, r)
    })
}

async fn marketing<W: Write>(app: &App, args: MarketingArgs, json: bool, out: &mut W) -> Result<()> {
    if args.list {
        writeln!(out, "Tones:")?;
        for tone in BRAND_TONES {
            writeln!(out, "  {:<14} {}", tone.key, tone.description)?;
        }
        writeln!(out, "Audiences:")?;
        for audience in TARGET_AUDIENCES {
            writeln!(out, "  {:<20} {}", audience.key, audience.label)?;
        }
        writeln!(out, "Platforms:")?;
        for platform in PLATFORMS {
            writeln!(out, "  {:<10} {}", platform.key, platform.label)?;
        }
        return Ok(());
    }

    let request = ContentRequest {
        brand_tone: args.tone,
        target_audience: args.audience,
        platform: args.platform,
        product_name: args.product_name,
        product_description: args.description,
    };
    let content = app.generate_content(&request).await?;
    emit(out, json, &content, render::generated_content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Cli;
    use api_client::{ApiClient, ApiClientConfig, Session};
    use axum::{extract::Path, routing::get, Json, Router};
    use clap::Parser;
    use query_cache::QueryCache;
    use serde_json::json;

    async fn spawn_profile_backend() -> ApiClient {
        let app = Router::new().route(
            "/startup-profile/:id",
            get(|Path(id): Path<i64>| async move {
                Json(json!({
                    "id": id,
                    "business_name": "Nutty Co",
                    "business_type": "Manufacturing",
                    "industry": "FMCG",
                    "location": "Pune",
                    "growth_stage": "Early",
                    "msme_registered": false,
                    "annual_revenue": 500000.0
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        ApiClient::new(ApiClientConfig {
            base_url: format!("http://{addr}"),
            timeout: None,
        })
        .unwrap()
    }

    fn app(session: Session) -> App {
        App::new(
            ApiClient::new(ApiClientConfig::default()).unwrap(),
            session,
            QueryCache::default(),
        )
    }

    async fn run_args(app: &App, argv: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(argv)?;
        let mut out = Vec::new();
        run(app, cli.command, cli.json, &mut out).await?;
        Ok(String::from_utf8(out)?)
    }

    #[tokio::test]
    async fn test_demo_dashboard_text() {
        let app = app(Session::in_memory()).with_demo(true);
        let text = run_args(&app, &["sahayak", "dashboard"]).await.unwrap();
        assert!(text.starts_with("VyaaparSahayak"));
        assert!(text.contains("₹2,87,500"));
        assert!(text.contains("Peanut Butter"));
        assert!(text.contains("Amazon"));
    }

    #[tokio::test]
    async fn test_whoami_prints_profile_card() {
        let app = App::new(
            spawn_profile_backend().await,
            Session::with_profile(4),
            QueryCache::default(),
        );
        let text = run_args(&app, &["sahayak", "whoami"]).await.unwrap();
        assert!(text.starts_with("Nutty Co (Manufacturing, Pune)"));
        assert!(text.contains("Industry: FMCG"));
        assert!(text.contains("MSME:     not registered"));
    }

    #[tokio::test]
    async fn test_whoami_without_profile() {
        let app = app(Session::in_memory());
        let text = run_args(&app, &["sahayak", "whoami"]).await.unwrap();
        assert_eq!(text, "VyaaparSahayak (no active profile)\n");
    }

    #[tokio::test]
    async fn test_demo_product_performance_detail() {
        let app = app(Session::in_memory()).with_demo(true);
        let text = run_args(&app, &["sahayak", "products", "performance", "2"])
            .await
            .unwrap();
        assert!(text.starts_with("Almond Butter\n"));
        assert!(text.contains("Units sold  240"));
    }

    #[tokio::test]
    async fn test_matched_schemes_without_profile_is_empty() {
        let app = app(Session::in_memory());
        let text = run_args(&app, &["sahayak", "schemes", "matched"]).await.unwrap();
        assert_eq!(text, "No schemes found.");
    }

    #[tokio::test]
    async fn test_demo_schemes_search() {
        let app = app(Session::in_memory()).with_demo(true);
        let text = run_args(&app, &["sahayak", "schemes", "list", "--search", "udyam"])
            .await
            .unwrap();
        assert!(text.contains("Udyam Registration"));
        assert!(!text.contains("Stand-Up India"));
    }

    #[tokio::test]
    async fn test_products_json_output() {
        let app = app(Session::in_memory()).with_demo(true);
        let text = run_args(&app, &["sahayak", "products", "list", "--json"])
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 5);
        assert_eq!(value[0]["name"], "Peanut Butter");
    }

    #[tokio::test(start_paused = true)]
    async fn test_marketing_without_product_reports_validation_message() {
        let app = app(Session::in_memory());
        let err = run_args(&app, &["sahayak", "marketing", "--audience", "families"])
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please fill in brand tone, target audience, and product name."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulate_prints_label() {
        let app = app(Session::in_memory());
        let text = run_args(&app, &["sahayak", "simulate", "pause_blinkit", "--days", "7"])
            .await
            .unwrap();
        assert!(text.starts_with("Pause Blinkit for selected period over 7 days"));
        assert!(text.contains("-18.5%"));
    }

    #[tokio::test]
    async fn test_logout_clears_persisted_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        Session::persistent(&path).set_profile_id(Some(4)).unwrap();

        let app = app(Session::persistent(&path));
        let text = run_args(&app, &["sahayak", "logout"]).await.unwrap();
        assert_eq!(text, "Active profile cleared.\n");
        assert_eq!(Session::persistent(&path).profile_id(), None);
    }
}
