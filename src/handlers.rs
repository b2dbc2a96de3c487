use crate::catalog::{self, Filter};
use crate::client::dashboard::{ScriptSurface, render_dashboard, script_safe_json};
use crate::errors::AppError;
use crate::insights::build_dashboard;
use crate::models::{Interaction, InteractionKind, LoadMoreParams, SearchParams};
use crate::state::AppState;
use crate::storage::persist_data;
use crate::views;
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::{debug, info};

const ANONYMOUS: &str = "anonymous";

pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, AppError> {
    let filter = Filter::new(params.query, params.category);
    let data = state.data.lock().await;
    let products = catalog::search(&data, &filter);

    if filter.is_searching() && products.len() == 1 {
        return Ok(Redirect::to(&format!("/products/{}", products[0].id)).into_response());
    }

    let slice = catalog::slice_at(&products, 0);
    let html = views::render_index(&state.views, &slice, &filter)?;
    Ok(Html(html).into_response())
}

pub async fn load_more_products(
    State(state): State<AppState>,
    Query(params): Query<LoadMoreParams>,
) -> Result<Html<String>, AppError> {
    let offset = match (params.offset, params.page) {
        (Some(offset), _) => offset as usize,
        (None, Some(0)) => return Err(AppError::bad_request("page is 1-based")),
        (None, Some(page)) => catalog::page_offset(page),
        (None, None) => return Err(AppError::bad_request("offset or page is required")),
    };

    let filter = Filter::new(params.query, params.category);
    let data = state.data.lock().await;
    let products = catalog::search(&data, &filter);
    let slice = catalog::slice_at(&products, offset);
    debug!(
        offset,
        count = slice.items.len(),
        is_last = slice.is_last,
        "serving load-more fragment"
    );

    Ok(Html(views::render_product_items(&state.views, &slice)?))
}

pub async fn product_page(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Html<String>, AppError> {
    let mut data = state.data.lock().await;
    let product = data
        .product(id)
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("product {id} not found")))?;

    data.interactions.push(Interaction {
        product_id: id,
        user: ANONYMOUS.to_string(),
        kind: InteractionKind::View,
    });
    persist_data(&state.data_path, &data).await?;

    let views_count = data
        .interactions
        .iter()
        .filter(|i| i.product_id == id && i.kind == InteractionKind::View)
        .count();
    Ok(Html(views::render_product(&state.views, &product, views_count)?))
}

pub async fn like_product(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Redirect, AppError> {
    let mut data = state.data.lock().await;
    if data.product(id).is_none() {
        return Err(AppError::not_found(format!("product {id} not found")));
    }

    data.interactions.push(Interaction {
        product_id: id,
        user: ANONYMOUS.to_string(),
        kind: InteractionKind::Like,
    });
    persist_data(&state.data_path, &data).await?;
    info!(product = id, "recorded interest");

    Ok(Redirect::to(&format!("/products/{id}")))
}

pub async fn dashboard(
    State(state): State<AppState>,
    Path(seller): Path<String>,
) -> Result<Html<String>, AppError> {
    let chart_data = {
        let data = state.data.lock().await;
        build_dashboard(&data, &seller)
            .ok_or_else(|| AppError::not_found(format!("seller {seller} not found")))?
    };

    let island = script_safe_json(&chart_data).map_err(AppError::internal)?;
    let mut surface = ScriptSurface::new();
    render_dashboard(&mut surface, Some(&island));

    Ok(Html(views::render_dashboard(
        &state.views,
        &seller,
        &island,
        &surface.into_script(),
    )?))
}
