//! Fixed demo data set for running the dashboard without a backend.

use models::{
    BestProduct, ChannelSales, DashboardSummary, Product, ProductPerformance,
    ProductPerformanceDetail, ProductionInsights, SalesSummary, Scheme, SummaryTotals,
};

fn product(id: i64, name: &str, category: &str, cost: f64, price: f64, inventory: u32) -> Product {
    Product {
        id,
        name: name.to_string(),
        category: category.to_string(),
        cost_price: cost,
        selling_price: price,
        inventory,
        units_per_batch: None,
        production_cost: None,
        production_time: None,
    }
}

pub fn products() -> Vec<Product> {
    vec![
        product(1, "Peanut Butter", "Food", 120.0, 180.0, 95),
        product(2, "Almond Butter", "Food", 200.0, 320.0, 45),
        product(3, "Honey Jar", "Food", 80.0, 150.0, 120),
        product(4, "Organic Jam", "Food", 90.0, 160.0, 78),
        product(5, "Coconut Oil", "Health", 150.0, 250.0, 200),
    ]
}

pub fn dashboard() -> DashboardSummary {
    DashboardSummary {
        summary: SummaryTotals {
            total_revenue: 287_500.0,
            total_profit: 68_400.0,
            total_orders: 156,
            total_inventory: 538,
        },
        best_product: Some(BestProduct {
            id: 1,
            name: "Peanut Butter".to_string(),
            revenue: 98_000.0,
        }),
        worst_product: Some(BestProduct {
            id: 5,
            name: "Coconut Oil".to_string(),
            revenue: 27_700.0,
        }),
    }
}

fn performance(id: i64, name: &str, revenue: f64, profit: f64, orders: u64, margin: f64) -> ProductPerformance {
    ProductPerformance {
        id,
        name: name.to_string(),
        revenue,
        profit,
        orders,
        margin,
    }
}

pub fn product_performance() -> Vec<ProductPerformance> {
    vec![
        performance(1, "Peanut Butter", 98_000.0, 24_500.0, 54, 33.3),
        performance(2, "Almond Butter", 76_800.0, 28_800.0, 24, 37.5),
        performance(3, "Honey Jar", 45_000.0, 21_000.0, 30, 46.7),
        performance(4, "Organic Jam", 40_000.0, 17_500.0, 25, 43.8),
        performance(5, "Coconut Oil", 27_700.0, 11_100.0, 23, 40.0),
    ]
}

/// Single-product view derived from the dashboard rows and the catalog.
pub fn product_performance_detail(product_id: i64) -> Option<ProductPerformanceDetail> {
    let product = products().into_iter().find(|p| p.id == product_id)?;
    let row = product_performance().into_iter().find(|r| r.id == product_id)?;
    let units_sold = (row.revenue / product.selling_price).round() as u64;
    let velocity = if row.orders == 0 {
        units_sold as f64
    } else {
        units_sold as f64 / row.orders as f64
    };
    Some(ProductPerformanceDetail {
        product_id,
        name: product.name,
        revenue: row.revenue,
        units_sold,
        profit: row.profit,
        velocity,
        inventory: i64::from(product.inventory),
    })
}

pub fn channel_sales() -> Vec<ChannelSales> {
    [
        ("Amazon", 115_000.0, 64),
        ("Flipkart", 72_500.0, 38),
        ("Retail", 58_000.0, 32),
        ("Direct", 42_000.0, 22),
    ]
    .into_iter()
    .map(|(channel, revenue, orders)| ChannelSales {
        channel: channel.to_string(),
        revenue,
        orders,
    })
    .collect()
}

pub fn sales_summary() -> SalesSummary {
    SalesSummary {
        total_revenue: 287_500.0,
        total_profit: 68_400.0,
        avg_order_value: 1843.0,
        inventory_health: "Good".to_string(),
        margin_percent: 23.8,
    }
}

pub fn schemes() -> Vec<Scheme> {
    [
        (
            1,
            "PMEGP - Prime Minister Employment Generation Programme",
            "Credit-linked subsidy scheme for setting up micro enterprises in the non-farm sector",
            "Any individual above 18 years, Self Help Groups, Charitable Trusts, and Production Co-operative Societies",
            "Subsidy of 15-35% of the project cost for setting up new manufacturing units",
            "https://www.kviconline.gov.in/pmegpeportal/pmegphome/index.jsp",
        ),
        (
            2,
            "Credit Guarantee Scheme for Micro & Small Enterprises",
            "Provides collateral-free credit to MSEs with guarantee coverage up to 85%",
            "New and existing Micro & Small Enterprises engaged in manufacturing or service activities",
            "Guarantee cover up to Rs. 2 crore without collateral security",
            "https://www.cgtmse.in/",
        ),
        (
            3,
            "Udyam Registration",
            "Free online registration for MSMEs to get various benefits under government schemes",
            "Any manufacturing or service enterprise with defined investment and turnover limits",
            "Priority sector lending, lower interest rates, easy access to government tenders",
            "https://udyamregistration.gov.in/",
        ),
        (
            4,
            "Stand-Up India Scheme",
            "Facilitates bank loans between Rs. 10 lakh to Rs. 1 crore for SC/ST and women entrepreneurs",
            "SC/ST and/or women entrepreneurs above 18 years for greenfield enterprises",
            "Bank loans for setting up greenfield enterprise in manufacturing, services, or trading",
            "https://www.standupmitra.in/",
        ),
    ]
    .into_iter()
    .map(|(id, name, description, eligibility, benefits, link)| Scheme {
        id,
        name: name.to_string(),
        description: description.to_string(),
        eligibility: eligibility.to_string(),
        benefits: benefits.to_string(),
        link: Some(link.to_string()),
        relevance: None,
    })
    .collect()
}

pub fn production_insights() -> ProductionInsights {
    ProductionInsights {
        production_cost_per_unit: 115.0,
        units_per_hour: 5.5,
        total_units_produced: 450,
        cost_leakage: false,
        margin_percent: 36.1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_totals_are_consistent() {
        let inventory: u64 = products().iter().map(|p| u64::from(p.inventory)).sum();
        assert_eq!(inventory, dashboard().summary.total_inventory);

        let orders: u64 = channel_sales().iter().map(|c| c.orders).sum();
        assert_eq!(orders, dashboard().summary.total_orders);

        let best = product_performance()
            .into_iter()
            .max_by(|a, b| a.revenue.total_cmp(&b.revenue))
            .unwrap();
        assert_eq!(Some(best.name), dashboard().best_product.map(|b| b.name));
    }

    #[test]
    fn test_performance_detail_follows_catalog() {
        let detail = product_performance_detail(1).unwrap();
        assert_eq!(detail.name, "Peanut Butter");
        assert_eq!(detail.units_sold, 544);
        assert_eq!(detail.inventory, 95);
        assert!(product_performance_detail(99).is_none());
    }

    #[test]
    fn test_demo_schemes_have_links() {
        let schemes = schemes();
        assert_eq!(schemes.len(), 4);
        assert!(schemes.iter().all(|s| s.link.is_some()));
    }
}
