//! Everything a subcommand needs: API client, session, query cache and the
//! simulators. Reads go through the cache; mutations invalidate the keys
//! whose data they change.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use api_client::{ApiClient, ApiClientConfig, Session};
use models::{
    AudienceMatchingRequest, AudienceMatchingResponse, BatchCreated, ChannelSales,
    ContentOptimizationRequest, ContentOptimizationResponse, DashboardSummary, Order,
    OrderResponse, Product, ProductCreate, ProductPerformance, ProductPerformanceDetail,
    ProductionBatch,
    ProductionInsights, ProfileCreated, ProfileId, RiskAnalysisRequest, RiskReport, SalesSummary,
    Scheme, Settings, StartupProfile,
};
use query_cache::{CacheOptions, QueryCache, QueryKey};
use simulators::{
    demo, CannedContentGenerator, CannedDecisionSimulator, ContentGenerator, ContentRequest,
    DecisionSimulator, GeneratedContent, SimulationRequest, SimulationResult,
};

/// Shown when no profile is active or it cannot be loaded.
pub const FALLBACK_BUSINESS_NAME: &str = "VyaaparSahayak";

const NO_PROFILE: &str = "Please complete your startup profile first";
const DEMO_READ_ONLY: &str = "Demo mode is read-only; run without --demo to make changes";

/// Cache keys shared by the reads and the invalidations.
pub mod keys {
    use query_cache::QueryKey;

    pub fn products() -> QueryKey {
        "products".into()
    }

    pub fn product_performance(product_id: i64) -> QueryKey {
        QueryKey::from("product-performance").with(product_id)
    }

    pub fn dashboard() -> QueryKey {
        "dashboard".into()
    }

    pub fn dashboard_products() -> QueryKey {
        "dashboard-products".into()
    }

    pub fn channel_wise() -> QueryKey {
        "channel-wise".into()
    }

    pub fn sales_summary() -> QueryKey {
        "sales-summary".into()
    }

    pub fn production_insights() -> QueryKey {
        "production-insights".into()
    }

    pub fn schemes() -> QueryKey {
        "schemes".into()
    }

    pub fn matched_schemes() -> QueryKey {
        "matched-schemes".into()
    }

    pub fn startup_profile() -> QueryKey {
        "startup-profile".into()
    }

    pub fn risk_report(report_id: i64) -> QueryKey {
        QueryKey::from("risk-report").with(report_id)
    }
}

pub struct App {
    client: ApiClient,
    session: Session,
    cache: QueryCache,
    decisions: Arc<dyn DecisionSimulator>,
    content: Arc<dyn ContentGenerator>,
    demo: bool,
}

impl App {
    pub fn new(client: ApiClient, session: Session, cache: QueryCache) -> Self {
        Self {
            client,
            session,
            cache,
            decisions: Arc::new(CannedDecisionSimulator::default()),
            content: Arc::new(CannedContentGenerator::default()),
            demo: false,
        }
    }

    pub fn from_settings(settings: &Settings, demo: bool) -> Result<Self> {
        let client = ApiClient::new(ApiClientConfig::from_settings(&settings.api))
            .context("Failed to create API client")?;
        let session = Session::persistent(&settings.session_path);
        let cache = QueryCache::new(CacheOptions::from_settings(&settings.cache));
        tracing::debug!(
            base_url = client.base_url(),
            session = %settings.session_path.display(),
            demo,
            "app ready"
        );

        let sims = &settings.simulators;
        Ok(Self::new(client, session, cache)
            .with_simulators(
                Arc::new(CannedDecisionSimulator::new(Duration::from_millis(sims.decision_delay_ms))),
                Arc::new(CannedContentGenerator::new(Duration::from_millis(sims.content_delay_ms))),
            )
            .with_demo(demo))
    }

    pub fn with_simulators(
        mut self,
        decisions: Arc<dyn DecisionSimulator>,
        content: Arc<dyn ContentGenerator>,
    ) -> Self {
        self.decisions = decisions;
        self.content = content;
        self
    }

    pub fn with_demo(mut self, demo: bool) -> Self {
        self.demo = demo;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.demo {
            bail!(DEMO_READ_ONLY);
        }
        Ok(())
    }

    fn require_profile(&self) -> Result<ProfileId> {
        match self.session.profile_id() {
            Some(id) if id != 0 => Ok(id),
            _ => bail!(NO_PROFILE),
        }
    }

    fn invalidate(&self, keys: &[QueryKey]) {
        for key in keys {
            self.cache.invalidate(key);
        }
    }

    // Profile

    pub async fn onboard(&self, profile: &StartupProfile) -> Result<ProfileCreated> {
        self.ensure_writable()?;
        let created = self.client.create_startup_profile(profile).await?;
        self.session
            .set_profile_id(Some(created.id))
            .context("Failed to save the active profile")?;
        // every scoped read changes with the profile
        self.cache.clear();
        Ok(created)
    }

    pub async fn profile(&self) -> Result<Option<StartupProfile>> {
        let Some(id) = self.session.profile_id().filter(|id| *id != 0) else {
            return Ok(None);
        };
        if self.demo {
            return Ok(None);
        }
        let client = &self.client;
        let profile = self
            .cache
            .fetch(keys::startup_profile().with(id), || client.get_startup_profile(id))
            .await?;
        Ok(Some(profile))
    }

    /// Business name of the active profile, or the app name when there
    /// is none or the lookup fails.
    pub async fn business_name(&self) -> String {
        match self.profile().await {
            Ok(Some(profile)) if !profile.business_name.trim().is_empty() => profile.business_name,
            Ok(_) => FALLBACK_BUSINESS_NAME.to_string(),
            Err(err) => {
                tracing::warn!("could not load startup profile: {err}");
                FALLBACK_BUSINESS_NAME.to_string()
            }
        }
    }

    pub fn logout(&self) -> Result<()> {
        self.session
            .set_profile_id(None)
            .context("Failed to clear the active profile")?;
        self.cache.clear();
        Ok(())
    }

    // Products

    pub async fn products(&self) -> Result<Vec<Product>> {
        if self.demo {
            return Ok(demo::products());
        }
        let (client, session) = (&self.client, &self.session);
        Ok(self
            .cache
            .fetch(keys::products(), || client.get_products(session))
            .await?)
    }

    pub async fn create_product(&self, product: &ProductCreate) -> Result<Product> {
        self.ensure_writable()?;
        let created = self.client.create_product(&self.session, product).await?;
        self.invalidate(&[keys::products()]);
        Ok(created)
    }

    pub async fn product_performance(&self, product_id: i64) -> Result<ProductPerformanceDetail> {
        if self.demo {
            return demo::product_performance_detail(product_id)
                .with_context(|| format!("Product {product_id} not found"));
        }
        let client = &self.client;
        Ok(self
            .cache
            .fetch(keys::product_performance(product_id), || {
                client.get_product_performance(product_id)
            })
            .await?)
    }

    // Production

    pub async fn add_production_batch(
        &self,
        product_id: i64,
        batch: &ProductionBatch,
    ) -> Result<BatchCreated> {
        self.ensure_writable()?;
        let created = self
            .client
            .add_production_batch(&self.session, product_id, batch)
            .await?;
        self.invalidate(&[keys::products(), keys::production_insights()]);
        Ok(created)
    }

    pub async fn production_insights(&self, product_id: i64) -> Result<ProductionInsights> {
        if self.demo {
            return Ok(demo::production_insights());
        }
        let client = &self.client;
        Ok(self
            .cache
            .fetch(keys::production_insights().with(product_id), || {
                client.get_production_insights(product_id)
            })
            .await?)
    }

    // Orders

    pub async fn create_order(&self, order: &Order) -> Result<OrderResponse> {
        self.ensure_writable()?;
        let created = self.client.create_order(&self.session, order).await?;
        self.invalidate(&[
            keys::channel_wise(),
            keys::dashboard_products(),
            keys::sales_summary(),
            keys::dashboard(),
        ]);
        Ok(created)
    }

    // Dashboard

    pub async fn dashboard(&self) -> Result<DashboardSummary> {
        if self.demo {
            return Ok(demo::dashboard());
        }
        let (client, session) = (&self.client, &self.session);
        Ok(self
            .cache
            .fetch(keys::dashboard(), || client.get_dashboard(session))
            .await?)
    }

    pub async fn dashboard_products(&self) -> Result<Vec<ProductPerformance>> {
        if self.demo {
            return Ok(demo::product_performance());
        }
        let (client, session) = (&self.client, &self.session);
        Ok(self
            .cache
            .fetch(keys::dashboard_products(), || client.get_dashboard_products(session))
            .await?)
    }

    pub async fn channel_sales(&self) -> Result<Vec<ChannelSales>> {
        if self.demo {
            return Ok(demo::channel_sales());
        }
        let (client, session) = (&self.client, &self.session);
        Ok(self
            .cache
            .fetch(keys::channel_wise(), || client.get_channel_wise_sales(session))
            .await?)
    }

    pub async fn sales_summary(&self) -> Result<SalesSummary> {
        if self.demo {
            return Ok(demo::sales_summary());
        }
        let (client, session) = (&self.client, &self.session);
        Ok(self
            .cache
            .fetch(keys::sales_summary(), || client.get_sales_summary(session))
            .await?)
    }

    // Schemes

    pub async fn schemes(&self) -> Result<Vec<Scheme>> {
        if self.demo {
            return Ok(demo::schemes());
        }
        let client = &self.client;
        Ok(self
            .cache
            .fetch(keys::schemes(), || client.get_schemes())
            .await?)
    }

    /// Schemes matched to the active profile; empty without one.
    pub async fn matched_schemes(&self) -> Result<Vec<Scheme>> {
        if self.demo {
            return Ok(demo::schemes());
        }
        let Some(profile_id) = self.session.profile_id().filter(|id| *id != 0) else {
            return Ok(Vec::new());
        };
        let client = &self.client;
        Ok(self
            .cache
            .fetch(keys::matched_schemes().with(profile_id), || {
                client.get_matched_schemes(profile_id)
            })
            .await?)
    }

    // Risk

    pub async fn run_risk_analysis(&self, groq_api_key: Option<String>) -> Result<RiskReport> {
        self.ensure_writable()?;
        let request = RiskAnalysisRequest {
            startup_profile_id: self.require_profile()?,
            groq_api_key: groq_api_key.filter(|key| !key.trim().is_empty()),
        };
        Ok(self.client.run_risk_analysis(&request).await?)
    }

    pub async fn risk_report(&self, report_id: i64) -> Result<RiskReport> {
        if self.demo {
            bail!(DEMO_READ_ONLY);
        }
        let client = &self.client;
        Ok(self
            .cache
            .fetch(keys::risk_report(report_id), || client.get_risk_report(report_id))
            .await?)
    }

    // AI growth

    pub async fn audience_matching(
        &self,
        request: &AudienceMatchingRequest,
    ) -> Result<AudienceMatchingResponse> {
        self.ensure_writable()?;
        Ok(self.client.get_audience_matching(request).await?)
    }

    pub async fn content_optimization(
        &self,
        request: &ContentOptimizationRequest,
    ) -> Result<ContentOptimizationResponse> {
        self.ensure_writable()?;
        Ok(self.client.get_content_optimization(request).await?)
    }

    // Simulators

    pub async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResult> {
        Ok(self.decisions.simulate(request).await?)
    }

    pub async fn generate_content(&self, request: &ContentRequest) -> Result<GeneratedContent> {
        Ok(self.content.generate(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::State,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn offline_client() -> ApiClient {
        ApiClient::new(ApiClientConfig::default()).unwrap()
    }

    fn demo_app() -> App {
        App::new(offline_client(), Session::in_memory(), QueryCache::default()).with_demo(true)
    }

    fn order() -> Order {
        Order {
            product_id: 1,
            channel: "Amazon".into(),
            quantity: 2,
            customer_ref: "C-9".into(),
        }
    }

    #[derive(Clone, Default)]
    struct Hits {
        dashboard: Arc<AtomicUsize>,
        products: Arc<AtomicUsize>,
    }

    async fn spawn_backend(hits: Hits) -> ApiClient {
        let app = Router::new()
            .route(
                "/dashboard",
                get(|State(hits): State<Hits>| async move {
                    let n = hits.dashboard.fetch_add(1, Ordering::SeqCst) as u64;
                    Json(json!({
                        "summary": {
                            "total_revenue": 1000.0,
                            "total_profit": 300.0,
                            "total_orders": n,
                            "total_inventory": 40
                        },
                        "best_product": { "id": 1, "name": "Jam", "revenue": 1000.0 }
                    }))
                }),
            )
            .route(
                "/products",
                get(|State(hits): State<Hits>| async move {
                    hits.products.fetch_add(1, Ordering::SeqCst);
                    Json(json!([]))
                }),
            )
            .route(
                "/orders",
                post(|Json(_body): Json<Value>| async move {
                    Json(json!({
                        "message": "Order created",
                        "order_id": 5,
                        "remaining_inventory": 38
                    }))
                }),
            )
            .with_state(hits);

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

    #[tokio::test]
    async fn test_demo_mode_serves_fixtures() {
        let app = demo_app();
        assert_eq!(app.products().await.unwrap().len(), 5);
        assert_eq!(app.dashboard().await.unwrap().summary.total_revenue, 287_500.0);
        assert_eq!(app.channel_sales().await.unwrap()[0].channel, "Amazon");
        assert_eq!(app.product_performance(2).await.unwrap().name, "Almond Butter");
        assert!(app.product_performance(99).await.is_err());
    }

    #[tokio::test]
    async fn test_demo_mode_rejects_mutations() {
        let app = demo_app();
        let err = app.create_order(&order()).await.unwrap_err();
        assert_eq!(err.to_string(), DEMO_READ_ONLY);
    }

    #[tokio::test]
    async fn test_business_name_falls_back_without_profile() {
        assert_eq!(demo_app().business_name().await, FALLBACK_BUSINESS_NAME);
    }

    #[tokio::test]
    async fn test_business_name_falls_back_when_lookup_fails() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let app = App::new(
            ApiClient::new(ApiClientConfig {
                base_url: format!("http://{addr}"),
                timeout: None,
            })
            .unwrap(),
            Session::with_profile(7),
            QueryCache::new(CacheOptions {
                retry: 0,
                ..CacheOptions::default()
            }),
        );
        assert_eq!(app.business_name().await, FALLBACK_BUSINESS_NAME);
    }

    #[tokio::test]
    async fn test_risk_run_requires_profile() {
        let app = App::new(offline_client(), Session::in_memory(), QueryCache::default());
        let err = app.run_risk_analysis(None).await.unwrap_err();
        assert_eq!(err.to_string(), NO_PROFILE);

    }

    #[tokio::test]
    async fn test_matched_schemes_empty_without_profile() {
        let none = App::new(offline_client(), Session::in_memory(), QueryCache::default());
        assert!(none.matched_schemes().await.unwrap().is_empty());

        let zero = App::new(offline_client(), Session::with_profile(0), QueryCache::default());
        assert!(zero.matched_schemes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_order_invalidates_dashboard_but_not_products() {
        let hits = Hits::default();
        let client = spawn_backend(hits.clone()).await;
        let app = App::new(client, Session::with_profile(3), QueryCache::default());

        assert_eq!(app.dashboard().await.unwrap().summary.total_orders, 0);
        assert_eq!(app.dashboard().await.unwrap().summary.total_orders, 0);
        app.products().await.unwrap();
        assert_eq!(hits.dashboard.load(Ordering::SeqCst), 1);

        let created = app.create_order(&order()).await.unwrap();
        assert_eq!(created.remaining_inventory, 38);

        assert_eq!(app.dashboard().await.unwrap().summary.total_orders, 1);
        app.products().await.unwrap();
        assert_eq!(hits.dashboard.load(Ordering::SeqCst), 2);
        assert_eq!(hits.products.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_logout_clears_profile() {
        let app = App::new(offline_client(), Session::with_profile(12), QueryCache::default());
        app.logout().unwrap();
        assert_eq!(app.session().profile_id(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulators_run_in_demo_mode() {
        let app = demo_app();
        let result = app
            .simulate(&SimulationRequest::new("new_channel"))
            .await
            .unwrap();
        assert_eq!(result.verdict, simulators::Verdict::Proceed);

        let content = app
            .generate_content(&ContentRequest {
                brand_tone: "bold".into(),
                target_audience: "families".into(),
                platform: "instagram".into(),
                product_name: "Honey Jar".into(),
                product_description: String::new(),
            })
            .await
            .unwrap();
        assert_eq!(content.captions[0], "Honey Jar. No compromises. No excuses. Just results. 💪");
    }
}
