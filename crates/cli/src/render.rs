//! Plain-text rendering of backend records.

use models::{
    AudienceMatchingResponse, ChannelSales, ContentOptimizationResponse, DashboardSummary,
    MarginHealth, Product, ProductPerformance, ProductPerformanceDetail, ProductionInsights,
    RiskReport, SalesSummary, Scheme, StartupProfile, SummaryTotals,
};
use simulators::{GeneratedContent, SimulationResult};

/// Rupee amount with Indian digit grouping, e.g. `₹2,87,500` or `₹1,843.5`.
pub fn format_inr(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let mut out = String::new();
    if amount < 0.0 && cents > 0 {
        out.push('-');
    }
    out.push('₹');
    out.push_str(&group_indian(&whole.to_string()));
    if fraction != 0 {
        let fraction = format!("{fraction:02}");
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out
}

// Last three digits, then pairs: 12,34,567
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (mut head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    while head.len() > 2 {
        let (rest, pair) = head.split_at(head.len() - 2);
        groups.push(pair);
        head = rest;
    }
    if !head.is_empty() {
        groups.push(head);
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Share of total revenue per channel, in percent. Empty or zero totals give 0.
pub fn channel_shares(channels: &[ChannelSales]) -> Vec<(String, f64)> {
    let total: f64 = channels.iter().map(|c| c.revenue).sum();
    channels
        .iter()
        .map(|c| {
            let share = if total > 0.0 { c.revenue / total * 100.0 } else { 0.0 };
            (c.channel.clone(), share)
        })
        .collect()
}

pub fn products(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products yet. Add one with `sahayak products create`.".to_string();
    }
    let mut out = format!(
        "{:>4}  {:<24} {:<12} {:>10} {:>10} {:>9} {:>8}\n",
        "ID", "Name", "Category", "Cost", "Price", "Inventory", "Margin"
    );
    for p in products {
        out.push_str(&format!(
            "{:>4}  {:<24} {:<12} {:>10} {:>10} {:>9} {:>7.1}%\n",
            p.id,
            p.name,
            p.category,
            format_inr(p.cost_price),
            format_inr(p.selling_price),
            p.inventory,
            p.margin_percent()
        ));
    }
    out
}

pub fn product_performance(rows: &[ProductPerformance]) -> String {
    let mut out = format!(
        "{:<24} {:>12} {:>12} {:>7} {:>8}\n",
        "Product", "Revenue", "Profit", "Orders", "Margin"
    );
    for r in rows {
        out.push_str(&format!(
            "{:<24} {:>12} {:>12} {:>7} {:>7.1}%\n",
            r.name,
            format_inr(r.revenue),
            format_inr(r.profit),
            r.orders,
            r.margin
        ));
    }
    out
}

pub fn dashboard(summary: &DashboardSummary) -> String {
    let SummaryTotals {
        total_revenue,
        total_profit,
        total_orders,
        total_inventory,
    } = &summary.summary;
    let mut out = format!(
        "Revenue    {}\nProfit     {}\nOrders     {}\nInventory  {} units\n",
        format_inr(*total_revenue),
        format_inr(*total_profit),
        total_orders,
        total_inventory,
    );
    match (&summary.best_product, &summary.worst_product) {
        (Some(best), worst) => {
            out.push_str(&format!("Best seller: {} ({})\n", best.name, format_inr(best.revenue)));
            if let Some(worst) = worst.as_ref().filter(|w| w.id != best.id) {
                out.push_str(&format!(
                    "Slowest:     {} ({})\n",
                    worst.name,
                    format_inr(worst.revenue)
                ));
            }
        }
        (None, _) => out.push_str("No sales yet.\n"),
    }
    out
}

pub fn product_detail(detail: &ProductPerformanceDetail) -> String {
    format!(
        "{}\n  Revenue     {}\n  Profit      {}\n  Units sold  {}\n  Per order   {:.1}\n  In stock    {}\n",
        detail.name,
        format_inr(detail.revenue),
        format_inr(detail.profit),
        detail.units_sold,
        detail.velocity,
        detail.inventory
    )
}

pub fn channels(channels: &[ChannelSales]) -> String {
    let mut out = format!("{:<14} {:>12} {:>7} {:>7}\n", "Channel", "Revenue", "Orders", "Share");
    for (c, (_, share)) in channels.iter().zip(channel_shares(channels)) {
        out.push_str(&format!(
            "{:<14} {:>12} {:>7} {:>6.1}%\n",
            c.channel,
            format_inr(c.revenue),
            c.orders,
            share
        ));
    }
    out
}

pub fn sales_summary(summary: &SalesSummary) -> String {
    format!(
        "Avg order value  {}\nMargin           {:.1}% ({})\nInventory health {}\n",
        format_inr(summary.avg_order_value),
        summary.margin_percent,
        MarginHealth::classify(summary.margin_percent).label(),
        summary.inventory_health
    )
}

pub fn production_insights(name: &str, insights: &ProductionInsights) -> String {
    let mut out = format!(
        "{name}\n  Cost/unit      {}\n  Units/hour     {:.1}\n  Total produced {}\n  Margin         {:.1}% ({})\n",
        format_inr(insights.production_cost_per_unit),
        insights.units_per_hour,
        insights.total_units_produced,
        insights.margin_percent,
        MarginHealth::classify(insights.margin_percent).label()
    );
    if insights.cost_leakage {
        out.push_str("  ! Cost leakage detected\n");
    }
    out
}

pub fn profile(profile: &StartupProfile) -> String {
    format!(
        "{} ({}, {})\n  Industry: {}\n  Stage:    {}\n  MSME:     {}\n  Revenue:  {}\n",
        profile.business_name,
        profile.business_type,
        profile.location,
        profile.industry,
        profile.growth_stage,
        if profile.msme_registered { "registered" } else { "not registered" },
        format_inr(profile.annual_revenue)
    )
}

pub fn schemes(schemes: &[&Scheme]) -> String {
    if schemes.is_empty() {
        return "No schemes found.".to_string();
    }
    let mut out = String::new();
    for s in schemes {
        out.push_str(&format!("[{}] {}\n", s.id, s.name));
        if !s.description.is_empty() {
            out.push_str(&format!("    {}\n", s.description));
        }
        if !s.eligibility.is_empty() {
            out.push_str(&format!("    Eligibility: {}\n", s.eligibility));
        }
        if !s.benefits.is_empty() {
            out.push_str(&format!("    Benefits: {}\n", s.benefits));
        }
        if let Some(link) = &s.link {
            out.push_str(&format!("    {link}\n"));
        }
        if let Some(relevance) = &s.relevance {
            out.push_str(&format!("    {relevance}\n"));
        }
    }
    out
}

pub fn risk_report(report: &RiskReport) -> String {
    let mut out = format!("Risk level: {}\n", report.risk_level);
    for risk in &report.risks {
        out.push_str(&format!("  [{}] {}: {}\n", risk.severity, risk.kind, risk.message));
    }
    let plan = report.ai_action_plan.to_text();
    if !plan.trim().is_empty() {
        out.push_str("\nAction plan:\n");
        out.push_str(&plan);
        out.push('\n');
    }
    out
}

pub fn audience(response: &AudienceMatchingResponse) -> String {
    let a = &response.target_audience;
    let mut out = format!(
        "Audience for {}\n  Age: {}\n  Interests: {}\n  Intent: {}\n  Demographics: {}\n  {}\n\nPlatforms:\n",
        response.product,
        a.age_range,
        a.interests.join(", "),
        a.buying_intent,
        a.demographics,
        a.summary
    );
    for p in &response.platform_recommendations {
        out.push_str(&format!(
            "  {} ({:.0}%): {}\n    keywords: {}\n",
            p.platform,
            p.confidence_score,
            p.reason,
            p.keywords.join(", ")
        ));
    }
    out.push_str(&format!("\nStrategy: {}\n", response.overall_strategy));
    out
}

pub fn content_optimization(response: &ContentOptimizationResponse) -> String {
    let c = &response.optimized_content;
    let s = &response.posting_strategy;
    let mut out = format!(
        "{} post\n  Title: {}\n  {}\n  CTA: {}\n  Tags: {}\n\nPosting: {} / {} / {}\n",
        response.platform,
        c.title,
        c.description,
        c.call_to_action,
        c.hashtags_or_tags.join(" "),
        s.best_timing,
        s.format,
        s.frequency
    );
    for tip in &s.additional_tips {
        out.push_str(&format!("  - {tip}\n"));
    }
    for warning in &response.compliance_warnings {
        out.push_str(&format!("  ! {warning}\n"));
    }
    for action in &response.action_recommendations {
        out.push_str(&format!(
            "  [{}] {} ({})\n",
            action.priority, action.action, action.expected_impact
        ));
    }
    out
}

pub fn simulation(label: &str, days: u32, result: &SimulationResult) -> String {
    format!(
        "{label} over {days} days\n  Verdict:      {:?}\n  Confidence:   {:?}\n  Revenue:      {}\n  Profit:       {}\n  Units sold:   {}\n  Inventory risk: {:?}\n",
        result.verdict,
        result.confidence,
        result.revenue_impact.display(),
        result.profit_impact.display(),
        result.units_sold_change.display(),
        result.inventory_risk
    )
}

pub fn generated_content(content: &GeneratedContent) -> String {
    let mut out = String::from("Captions:\n");
    for caption in &content.captions {
        out.push_str(&format!("  - {caption}\n"));
    }
    out.push_str("Offers:\n");
    for offer in &content.offers {
        out.push_str(&format!("  - {offer}\n"));
    }
    out.push_str(&format!("Hashtags: {}\n", content.hashtags.join(" ")));
    out
}
