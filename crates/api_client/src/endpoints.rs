use models::{
    AudienceMatchingRequest, AudienceMatchingResponse, BatchCreated, ChannelSales,
    ContentOptimizationRequest, ContentOptimizationResponse, DashboardSummary, Order,
    OrderResponse, Product, ProductCreate, ProductPerformance, ProductPerformanceDetail,
    ProductionBatch,
    ProductionInsights, ProfileCreated, ProfileId, RiskAnalysisRequest, RiskReport, SalesSummary,
    Scheme, StartupProfile,
};

use crate::client::ApiClient;
use crate::error::Result;
use crate::requests;
use crate::session::Session;

impl ApiClient {
    // Products

    /// GET /products, scoped to the active profile when there is one.
    pub async fn get_products(&self, session: &Session) -> Result<Vec<Product>> {
        self.fetch_json(requests::get_products(session)).await
    }

    pub async fn create_product(&self, session: &Session, product: &ProductCreate) -> Result<Product> {
        self.fetch_json(requests::create_product(session, product)?).await
    }

    pub async fn get_product_performance(
        &self,
        product_id: i64,
    ) -> Result<ProductPerformanceDetail> {
        self.fetch_json(requests::get_product_performance(product_id)).await
    }

    // Production

    pub async fn add_production_batch(
        &self,
        session: &Session,
        product_id: i64,
        batch: &ProductionBatch,
    ) -> Result<BatchCreated> {
        self.fetch_json(requests::add_production_batch(session, product_id, batch)?)
            .await
    }

    pub async fn get_production_insights(&self, product_id: i64) -> Result<ProductionInsights> {
        self.fetch_json(requests::get_production_insights(product_id)).await
    }

    // Orders

    pub async fn create_order(&self, session: &Session, order: &Order) -> Result<OrderResponse> {
        self.fetch_json(requests::create_order(session, order)?).await
    }

    // Dashboard

    pub async fn get_dashboard(&self, session: &Session) -> Result<DashboardSummary> {
        self.fetch_json(requests::get_dashboard(session)).await
    }

    pub async fn get_dashboard_products(&self, session: &Session) -> Result<Vec<ProductPerformance>> {
        self.fetch_json(requests::get_dashboard_products(session)).await
    }

    pub async fn get_channel_wise_sales(&self, session: &Session) -> Result<Vec<ChannelSales>> {
        self.fetch_json(requests::get_channel_wise_sales(session)).await
    }

    pub async fn get_sales_summary(&self, session: &Session) -> Result<SalesSummary> {
        self.fetch_json(requests::get_sales_summary(session)).await
    }

    // Startup profile

    /// POST /startup-profile. Persisting the returned id is up to the caller.
    pub async fn create_startup_profile(&self, profile: &StartupProfile) -> Result<ProfileCreated> {
        self.fetch_json(requests::create_startup_profile(profile)?).await
    }

    pub async fn get_startup_profile(&self, profile_id: ProfileId) -> Result<StartupProfile> {
        self.fetch_json(requests::get_startup_profile(profile_id)).await
    }

    // Schemes

    pub async fn get_schemes(&self) -> Result<Vec<Scheme>> {
        self.fetch_json(requests::get_schemes()).await
    }

    pub async fn get_matched_schemes(&self, profile_id: ProfileId) -> Result<Vec<Scheme>> {
        self.fetch_json(requests::get_matched_schemes(profile_id)).await
    }

    // Risk analysis

    pub async fn run_risk_analysis(&self, request: &RiskAnalysisRequest) -> Result<RiskReport> {
        self.fetch_json(requests::run_risk_analysis(request)?).await
    }

    pub async fn get_risk_report(&self, report_id: i64) -> Result<RiskReport> {
        self.fetch_json(requests::get_risk_report(report_id)).await
    }

    // AI growth

    pub async fn get_audience_matching(
        &self,
        request: &AudienceMatchingRequest,
    ) -> Result<AudienceMatchingResponse> {
        self.fetch_json(requests::get_audience_matching(request)?).await
    }

    pub async fn get_content_optimization(
        &self,
        request: &ContentOptimizationRequest,
    ) -> Result<ContentOptimizationResponse> {
        self.fetch_json(requests::get_content_optimization(request)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiClientConfig;
    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;

    fn product_json(id: i64, name: &str, profile: Option<&String>) -> Value {
        json!({
            "id": id,
            "startup_profile_id": profile.and_then(|p| p.parse::<i64>().ok()),
            "name": name,
            "category": "Food",
            "cost_price": 120.0,
            "selling_price": 180.0,
            "inventory": 95
        })
    }

    async fn spawn_backend() -> ApiClient {
        let app = Router::new()
            .route(
                "/startup-profile",
                post(|Json(body): Json<Value>| async move {
                    Json(json!({
                        "id": 31,
                        "business_name": body["business_name"],
                        "message": "Startup profile created"
                    }))
                }),
            )
            .route(
                "/startup-profile/:id",
                get(|Path(id): Path<i64>| async move {
                    if id == 31 {
                        Ok(Json(json!({
                            "id": 31,
                            "business_name": "Nutty Co",
                            "business_type": "Manufacturing",
                            "industry": "FMCG",
                            "location": "Pune",
                            "growth_stage": "Early",
                            "msme_registered": true,
                            "annual_revenue": 500000.0
                        })))
                    } else {
                        Err((
                            StatusCode::NOT_FOUND,
                            Json(json!({ "detail": "Startup profile not found" })),
                        ))
                    }
                }),
            )
            .route(
                "/products",
                get(|Query(params): Query<HashMap<String, String>>| async move {
                    let profile = params.get("profile_id");
                    let name = if profile.is_some() { "Scoped Jam" } else { "Demo Jam" };
                    Json(json!([product_json(1, name, profile)]))
                }),
            )
            .route(
                "/dashboard",
                get(|| async {
                    Json(json!({
                        "summary": {
                            "total_revenue": 0,
                            "total_profit": 0,
                            "total_orders": 0,
                            "total_units_sold": 0,
                            "total_inventory": 95
                        },
                        "best_product": null,
                        "worst_product": null
                    }))
                }),
            )
            .route(
                "/products/:id/performance",
                get(|Path(id): Path<i64>| async move {
                    Json(json!({
                        "product_id": id,
                        "name": "Scoped Jam",
                        "revenue": 1800,
                        "units_sold": 10,
                        "profit": 600,
                        "velocity": 5.0,
                        "inventory": 85
                    }))
                }),
            )
            .route(
                "/startup-profile/:id/matched-schemes",
                get(|| async {
                    Json(json!([{
                        "scheme_id": 3,
                        "name": "Udyam Registration",
                        "description": "Free online registration for MSMEs",
                        "benefits": "Priority sector lending",
                        "source": "gov",
                        "eligibility_met": true,
                        "relevance": "Your profile matches this scheme"
                    }]))
                }),
            )
            .route(
                "/orders",
                post(|Json(body): Json<Value>| async move {
                    if body.get("startup_profile_id").is_none() {
                        return Err((
                            StatusCode::BAD_REQUEST,
                            Json(json!({ "detail": "no profile" })),
                        ));
                    }
                    Ok(Json(json!({
                        "message": "Order created",
                        "order_id": 100,
                        "remaining_inventory": 92
                    })))
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

    fn profile() -> StartupProfile {
        StartupProfile {
            id: None,
            business_name: "Nutty Co".into(),
            business_type: "Manufacturing".into(),
            industry: "FMCG".into(),
            location: "Pune".into(),
            growth_stage: "Early".into(),
            msme_registered: true,
            annual_revenue: 500_000.0,
        }
    }

    #[tokio::test]
    async fn test_onboarding_then_scoped_product_list() {
        let client = spawn_backend().await;
        let session = Session::in_memory();

        let demo = client.get_products(&session).await.unwrap();
        assert_eq!(demo[0].name, "Demo Jam");

        let created = client.create_startup_profile(&profile()).await.unwrap();
        assert_eq!(created.id, 31);
        assert_eq!(created.business_name.as_deref(), Some("Nutty Co"));
        session.set_profile_id(Some(created.id)).unwrap();

        let scoped = client.get_products(&session).await.unwrap();
        assert_eq!(scoped[0].name, "Scoped Jam");

        let fetched = client.get_startup_profile(31).await.unwrap();
        assert_eq!(fetched.id, Some(31));
        assert!(fetched.msme_registered);
    }

    #[tokio::test]
    async fn test_missing_profile_surfaces_detail() {
        let client = spawn_backend().await;
        let err = client.get_startup_profile(404).await.unwrap_err();
        assert_eq!(err.to_string(), "Startup profile not found");
    }

    #[tokio::test]
    async fn test_order_without_profile_is_rejected_by_server() {
        let client = spawn_backend().await;
        let order = Order {
            product_id: 1,
            channel: "Amazon".into(),
            quantity: 3,
            customer_ref: "A-1".into(),
        };

        let err = client
            .create_order(&Session::in_memory(), &order)
            .await
            .unwrap_err();
        assert_eq!(err.message(), "no profile");

        let ok = client
            .create_order(&Session::with_profile(31), &order)
            .await
            .unwrap();
        assert_eq!(ok.order_id, 100);
        assert_eq!(ok.remaining_inventory, 92);
    }

    #[tokio::test]
    async fn test_fresh_account_dashboard_decodes() {
        let client = spawn_backend().await;
        let dashboard = client.get_dashboard(&Session::with_profile(31)).await.unwrap();
        assert_eq!(dashboard.summary.total_orders, 0);
        assert_eq!(dashboard.summary.total_inventory, 95);
        assert!(dashboard.best_product.is_none());
    }

    #[tokio::test]
    async fn test_product_performance_and_matched_schemes_decode() {
        let client = spawn_backend().await;

        let detail = client.get_product_performance(1).await.unwrap();
        assert_eq!(detail.product_id, 1);
        assert_eq!(detail.units_sold, 10);
        assert_eq!(detail.inventory, 85);

        let matched = client.get_matched_schemes(31).await.unwrap();
        assert_eq!(matched[0].id, 3);
        assert_eq!(matched[0].name, "Udyam Registration");
    }
}
