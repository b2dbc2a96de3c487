//! Product search and listing pagination.

use crate::models::{Product, StoreData};

pub const PAGE_SIZE: usize = 10;

/// A filter taken from the `query`/`category` parameters. Blank values count
/// as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub query: Option<String>,
    pub category: Option<String>,
}

impl Filter {
    pub fn new(query: Option<String>, category: Option<String>) -> Self {
        Self {
            query: non_blank(query),
            category: non_blank(category),
        }
    }

    pub fn is_searching(&self) -> bool {
        self.query.is_some() || self.category.is_some()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Name search wins over category; without either, every active product is
/// listed.
pub fn search<'a>(data: &'a StoreData, filter: &Filter) -> Vec<&'a Product> {
    if let Some(query) = &filter.query {
        let needle = query.to_lowercase();
        return data
            .products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect();
    }
    if let Some(category) = &filter.category {
        let needle = category.to_lowercase();
        return data
            .products
            .iter()
            .filter(|p| p.category.to_lowercase().contains(&needle))
            .collect();
    }
    data.products.iter().filter(|p| p.is_active()).collect()
}

#[derive(Debug)]
pub struct Slice<'a> {
    pub items: Vec<&'a Product>,
    pub next_offset: usize,
    pub is_last: bool,
}

/// Up to `PAGE_SIZE` products starting at `offset`. An offset past the end is
/// an empty, last slice.
pub fn slice_at<'a>(products: &[&'a Product], offset: usize) -> Slice<'a> {
    let start = offset.min(products.len());
    let end = offset.saturating_add(PAGE_SIZE).min(products.len());
    Slice {
        items: products[start..end].to_vec(),
        next_offset: end,
        is_last: end >= products.len(),
    }
}

/// Offset of a 1-based load-more page; page 0 is the server-rendered listing.
pub fn page_offset(page: u32) -> usize {
    page as usize * PAGE_SIZE
}
