//! One builder per backend endpoint. Nothing here touches the network.

use models::{
    AudienceMatchingRequest, ContentOptimizationRequest, Order, ProductCreate, ProductionBatch,
    ProfileId, RiskAnalysisRequest, StartupProfile,
};

use crate::error::Result;
use crate::request::{scoped, ApiRequest};
use crate::session::Session;

// Products

pub fn get_products(session: &Session) -> ApiRequest {
    ApiRequest::get("/products").scoped_to(session)
}

pub fn create_product(session: &Session, product: &ProductCreate) -> Result<ApiRequest> {
    ApiRequest::post("/products", &scoped(session, product))
}

pub fn get_product_performance(product_id: i64) -> ApiRequest {
    ApiRequest::get(format!("/products/{product_id}/performance"))
}

// Production

pub fn add_production_batch(
    session: &Session,
    product_id: i64,
    batch: &ProductionBatch,
) -> Result<ApiRequest> {
    ApiRequest::post(
        format!("/products/{product_id}/production_batches"),
        &scoped(session, batch),
    )
}

pub fn get_production_insights(product_id: i64) -> ApiRequest {
    ApiRequest::get(format!("/products/{product_id}/production_insights"))
}

// Orders

pub fn create_order(session: &Session, order: &Order) -> Result<ApiRequest> {
    ApiRequest::post("/orders", &scoped(session, order))
}

// Dashboard

pub fn get_dashboard(session: &Session) -> ApiRequest {
    ApiRequest::get("/dashboard").scoped_to(session)
}

pub fn get_dashboard_products(session: &Session) -> ApiRequest {
    ApiRequest::get("/dashboard/products").scoped_to(session)
}

pub fn get_channel_wise_sales(session: &Session) -> ApiRequest {
    ApiRequest::get("/dashboard/channel-wise").scoped_to(session)
}

pub fn get_sales_summary(session: &Session) -> ApiRequest {
    ApiRequest::get("/dashboard/sales-summary").scoped_to(session)
}

// Startup profile

pub fn create_startup_profile(profile: &StartupProfile) -> Result<ApiRequest> {
    ApiRequest::post("/startup-profile", profile)
}

pub fn get_startup_profile(profile_id: ProfileId) -> ApiRequest {
    ApiRequest::get(format!("/startup-profile/{profile_id}"))
}

// Schemes

pub fn get_schemes() -> ApiRequest {
    ApiRequest::get("/schemes")
}

pub fn get_matched_schemes(profile_id: ProfileId) -> ApiRequest {
    ApiRequest::get(format!("/startup-profile/{profile_id}/matched-schemes"))
}

// Risk analysis

pub fn run_risk_analysis(request: &RiskAnalysisRequest) -> Result<ApiRequest> {
    ApiRequest::post("/risk-analysis", request)
}

pub fn get_risk_report(report_id: i64) -> ApiRequest {
    ApiRequest::get(format!("/risk-analysis/{report_id}"))
}

// AI growth

pub fn get_audience_matching(request: &AudienceMatchingRequest) -> Result<ApiRequest> {
    ApiRequest::post("/ai/audience-matching", request)
}

pub fn get_content_optimization(request: &ContentOptimizationRequest) -> Result<ApiRequest> {
    ApiRequest::post("/ai/content-optimization", request)
}
