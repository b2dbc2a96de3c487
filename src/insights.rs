use crate::models::{ChartData, InteractionKind, StoreData};
use chrono::{Datelike, Local, Months, NaiveDate};
use std::collections::BTreeMap;

const REVENUE_MONTHS: u32 = 6;

/// Dashboard data for `seller`, or `None` when the seller has no listings.
pub fn build_dashboard(data: &StoreData, seller: &str) -> Option<ChartData> {
    build_dashboard_at(Local::now().date_naive(), data, seller)
}

pub fn build_dashboard_at(today: NaiveDate, data: &StoreData, seller: &str) -> Option<ChartData> {
    let products: Vec<_> = data.products.iter().filter(|p| p.seller == seller).collect();
    if products.is_empty() {
        return None;
    }

    let sales: Vec<_> = data.sales.iter().filter(|s| s.seller == seller).collect();

    let mut by_category: BTreeMap<&str, u64> = BTreeMap::new();
    for sale in &sales {
        if let Some(product) = data.product(sale.product_id) {
            *by_category.entry(product.category.as_str()).or_default() += 1;
        }
    }

    let mut revenue_labels = Vec::new();
    let mut revenue_values = Vec::new();
    if !sales.is_empty() {
        let current = month_start(today);
        for offset in (0..REVENUE_MONTHS).rev() {
            let start = current
                .checked_sub_months(Months::new(offset))
                .unwrap_or(current);
            let total: f64 = sales
                .iter()
                .filter(|s| s.date.year() == start.year() && s.date.month() == start.month())
                .map(|s| s.price)
                .sum();
            revenue_labels.push(start.format("%b %Y").to_string());
            revenue_values.push(total);
        }
    }

    let mut bar_labels = Vec::new();
    let mut visits_values = Vec::new();
    let mut interest_values = Vec::new();
    for product in &products {
        let mut visits = 0u64;
        let mut interest = 0u64;
        for interaction in data.interactions.iter().filter(|i| i.product_id == product.id) {
            match interaction.kind {
                InteractionKind::View => visits += 1,
                InteractionKind::Like => interest += 1,
                InteractionKind::Buy => {}
            }
        }
        if visits + interest > 0 {
            bar_labels.push(product.name.clone());
            visits_values.push(visits as f64);
            interest_values.push(interest as f64);
        }
    }

    Some(ChartData {
        labels: Some(by_category.keys().map(|c| c.to_string()).collect()),
        values: Some(by_category.values().map(|&n| n as f64).collect()),
        revenue_labels: Some(revenue_labels),
        revenue_values: Some(revenue_values),
        bar_labels: Some(bar_labels),
        visits_values: Some(visits_values),
        interest_values: Some(interest_values),
    })
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
