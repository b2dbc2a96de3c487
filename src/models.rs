use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
    Sold,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub status: ProductStatus,
    pub seller: String,
}

impl Product {
    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }
}

/// A completed sale. The price is the one paid, which may differ from the
/// current listing price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub product_id: u64,
    pub seller: String,
    pub price: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionKind {
    View,
    Like,
    Buy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub product_id: u64,
    pub user: String,
    pub kind: InteractionKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreData {
    pub products: Vec<Product>,
    #[serde(default)]
    pub sales: Vec<Sale>,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

impl StoreData {
    pub fn product(&self, id: u64) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
    pub query: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct LoadMoreParams {
    pub page: Option<u32>,
    pub offset: Option<u32>,
    pub query: Option<String>,
    pub category: Option<String>,
}

/// The dashboard data island. Every key is optional; a missing or empty
/// sequence means "no data" for the chart it feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_values: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visits_values: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_values: Option<Vec<f64>>,
}
