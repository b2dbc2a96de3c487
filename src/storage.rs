use crate::errors::AppError;
use crate::models::{Interaction, InteractionKind, Product, ProductStatus, Sale, StoreData};
use chrono::{Local, Months, NaiveDate};
use std::path::Path;
use tokio::fs;
use tracing::{error, info};

/// Loads the store from disk. A missing file is seeded with the demo catalog
/// and written back; an unreadable or corrupt file yields an empty store.
pub async fn load_data(path: &Path) -> StoreData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                StoreData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let data = demo_store(Local::now().date_naive());
            info!(
                products = data.products.len(),
                "seeding demo catalog at {}",
                path.display()
            );
            if let Err(err) = persist_data(path, &data).await {
                error!("failed to write seeded data file: {}", err.message);
            }
            data
        }
        Err(err) => {
            error!("failed to read data file: {err}");
            StoreData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &StoreData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

const DEMO_PRODUCTS: &[(&str, &str, f64, &str, &str)] = &[
    ("Vintage Leica M3", "Photography", 1450.0, "Madrid", "marta"),
    ("Canon AE-1 Program", "Photography", 320.0, "Madrid", "marta"),
    ("Kodak Portra 400 (5 rolls)", "Photography", 65.0, "Valencia", "marta"),
    ("Fender Stratocaster 1998", "Music", 980.0, "Sevilla", "luis"),
    ("Roland TR-808 replica", "Music", 410.0, "Sevilla", "luis"),
    ("Vinyl: Kind of Blue", "Music", 45.0, "Bilbao", "luis"),
    ("Eames lounge chair", "Home", 2100.0, "Barcelona", "marta"),
    ("Brass table lamp", "Home", 120.0, "Barcelona", "ines"),
    ("Persian rug 2x3m", "Home", 760.0, "Granada", "ines"),
    ("First edition Don Quijote facsimile", "Books", 300.0, "Toledo", "ines"),
    ("Complete Tintin set", "Books", 180.0, "Bilbao", "luis"),
    ("Moleskine sketchbook bundle", "Books", 35.0, "Madrid", "marta"),
    ("Omega Seamaster 1970", "Watches", 1850.0, "Valencia", "ines"),
    ("Casio F-91W new old stock", "Watches", 25.0, "Zaragoza", "luis"),
    ("Seiko 5 automatic", "Watches", 140.0, "Zaragoza", "ines"),
    ("Nintendo Game Boy DMG", "Electronics", 95.0, "Malaga", "luis"),
    ("Sony Walkman WM-2", "Electronics", 210.0, "Malaga", "marta"),
    ("Braun T3 radio", "Electronics", 480.0, "Madrid", "ines"),
    ("Mechanical keyboard kit", "Electronics", 150.0, "Valencia", "luis"),
    ("Leather messenger bag", "Fashion", 130.0, "Sevilla", "marta"),
    ("Wool peacoat", "Fashion", 90.0, "Bilbao", "ines"),
    ("Silk scarf set", "Fashion", 60.0, "Granada", "marta"),
    ("Road bike frame", "Sports", 540.0, "Girona", "luis"),
    ("Climbing harness", "Sports", 55.0, "Girona", "ines"),
];

/// Demo catalog with a few months of sales ending at `today`.
pub fn demo_store(today: NaiveDate) -> StoreData {
    let products: Vec<Product> = DEMO_PRODUCTS
        .iter()
        .enumerate()
        .map(|(index, (name, category, price, location, seller))| Product {
            id: index as u64 + 1,
            name: (*name).to_string(),
            category: (*category).to_string(),
            price: *price,
            location: (*location).to_string(),
            description: format!("{name}, listed in {category} from {location}."),
            status: ProductStatus::Active,
            seller: (*seller).to_string(),
        })
        .collect();

    let mut sales = Vec::new();
    for (index, product) in products.iter().enumerate().filter(|(i, _)| i % 3 == 1) {
        let months_back = (index % 6) as u32;
        let date = today
            .checked_sub_months(Months::new(months_back))
            .unwrap_or(today);
        sales.push(Sale {
            product_id: product.id,
            seller: product.seller.clone(),
            price: product.price,
            date,
        });
    }

    let mut interactions = Vec::new();
    for product in &products {
        let views = (product.id % 5) + 1;
        for n in 0..views {
            interactions.push(Interaction {
                product_id: product.id,
                user: format!("visitor{n}"),
                kind: InteractionKind::View,
            });
        }
        if product.id % 2 == 0 {
            interactions.push(Interaction {
                product_id: product.id,
                user: "visitor0".to_string(),
                kind: InteractionKind::Like,
            });
        }
    }

    StoreData {
        products,
        sales,
        interactions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_store_has_more_than_one_page_of_products() {
        let data = demo_store(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());
        assert!(data.products.len() > 20);
        assert!(data.products.iter().all(Product::is_active));
        assert!(!data.sales.is_empty());
        assert!(
            data.sales
                .iter()
                .all(|sale| data.product(sale.product_id).is_some())
        );
    }

    #[tokio::test]
    async fn load_data_seeds_missing_file() {
        let mut path = std::env::temp_dir();
        path.push(format!("storefront_seed_{}.json", std::process::id()));
        let _ = fs::remove_file(&path).await;

        let data = load_data(&path).await;
        assert!(!data.products.is_empty());

        let reloaded = load_data(&path).await;
        assert_eq!(reloaded.products.len(), data.products.len());
        let _ = fs::remove_file(&path).await;
    }
}
