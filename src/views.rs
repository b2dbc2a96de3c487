use crate::catalog::{Filter, Slice};
use crate::models::Product;
use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;
use serde_json::json;

pub type Views = Handlebars<'static>;

/// Registers every page template. `product_items` doubles as a partial so the
/// first page and the load-more fragments share one card layout.
pub fn registry() -> Result<Views, TemplateError> {
    let mut views = Handlebars::new();
    views.register_partial("product_items", PRODUCT_ITEMS_HTML)?;
    views.register_template_string("product_items", PRODUCT_ITEMS_HTML)?;
    views.register_template_string("index", INDEX_HTML)?;
    views.register_template_string("product", PRODUCT_HTML)?;
    views.register_template_string("dashboard", DASHBOARD_HTML)?;
    Ok(views)
}

#[derive(Debug, Serialize)]
struct ProductCard<'a> {
    id: u64,
    name: &'a str,
    category: &'a str,
    location: &'a str,
    price: String,
}

impl<'a> From<&'a Product> for ProductCard<'a> {
    fn from(product: &'a Product) -> Self {
        Self {
            id: product.id,
            name: &product.name,
            category: &product.category,
            location: &product.location,
            price: format_price(product.price),
        }
    }
}

pub fn format_price(price: f64) -> String {
    format!("{price:.2} €")
}

fn cards<'a>(slice: &Slice<'a>) -> Vec<ProductCard<'a>> {
    slice.items.iter().map(|p| ProductCard::from(*p)).collect()
}

pub fn render_index(
    views: &Views,
    slice: &Slice<'_>,
    filter: &Filter,
) -> Result<String, RenderError> {
    let search_text = filter
        .query
        .as_deref()
        .or(filter.category.as_deref())
        .unwrap_or_default();
    views.render(
        "index",
        &json!({
            "products": cards(slice),
            "search_text": search_text,
            "searching": filter.is_searching(),
            "is_last": slice.is_last,
            "next_offset": slice.next_offset,
        }),
    )
}

/// The load-more fragment; the final slice carries the no-more marker.
pub fn render_product_items(views: &Views, slice: &Slice<'_>) -> Result<String, RenderError> {
    views.render(
        "product_items",
        &json!({
            "products": cards(slice),
            "no_more": slice.is_last,
        }),
    )
}

pub fn render_product(
    views: &Views,
    product: &Product,
    views_count: usize,
) -> Result<String, RenderError> {
    views.render(
        "product",
        &json!({
            "product": ProductCard::from(product),
            "description": product.description,
            "seller": product.seller,
            "seller_path": urlencoding::encode(&product.seller),
            "views": views_count,
        }),
    )
}

/// `island` must already be script-safe JSON.
pub fn render_dashboard(
    views: &Views,
    seller: &str,
    island: &str,
    chart_script: &str,
) -> Result<String, RenderError> {
    views.render(
        "dashboard",
        &json!({
            "seller": seller,
            "island": island,
            "chart_script": chart_script,
        }),
    )
}

const PRODUCT_ITEMS_HTML: &str = r#"{{#each products}}
<article class="product-card">
  <a href="/products/{{id}}">
    <h3>{{name}}</h3>
  </a>
  <p class="meta">{{category}} · {{location}}</p>
  <p class="price">{{price}}</p>
</article>
{{/each}}
{{#if no_more}}<div id="no-more-marker"></div>{{/if}}
"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Stilnovo</title>
  <link rel="stylesheet" href="/public/css/store.css" />
</head>
<body>
  <header class="top-bar">
    <a href="/" class="logo">Stilnovo</a>
    <form action="/" method="get" class="search">
      <input type="search" name="query" value="{{search_text}}" placeholder="Search treasures" />
      <button type="submit">Search</button>
    </form>
  </header>
  <main>
    {{#if searching}}<p class="results-for">Results for "{{search_text}}"</p>{{/if}}
    <section id="product-container" class="grid">
      {{> product_items}}
    </section>
    <div id="spinner" class="spinner d-none" aria-hidden="true"></div>
    {{#unless is_last}}
    <button id="load-more" class="btn-load-more" data-offset="{{next_offset}}">Load more</button>
    {{/unless}}
  </main>
  <script>
    document.addEventListener('DOMContentLoaded', () => {
      const button = document.getElementById('load-more');
      const spinner = document.getElementById('spinner');
      const container = document.getElementById('product-container');
      if (!button) {
        return;
      }
      const MIN_SPINNER_MS = 800;
      const wait = (ms) => new Promise((resolve) => setTimeout(resolve, ms));

      button.addEventListener('click', async () => {
        spinner.classList.remove('d-none');
        button.disabled = true;
        const params = new URLSearchParams(window.location.search);
        const offset = Number(button.dataset.offset || 0);
        const url = `/load-more-products?offset=${offset}` +
          `&query=${encodeURIComponent(params.get('query') || '')}` +
          `&category=${encodeURIComponent(params.get('category') || '')}`;
        try {
          const [response] = await Promise.all([fetch(url), wait(MIN_SPINNER_MS)]);
          if (!response.ok) {
            throw new Error(`status ${response.status}`);
          }
          container.insertAdjacentHTML('beforeend', await response.text());
          const marker = container.querySelector('#no-more-marker');
          if (marker) {
            marker.remove();
            button.innerText = 'No more treasures found';
            button.classList.replace('btn-load-more', 'btn-no-more');
            button.disabled = true;
          } else {
            button.dataset.offset = String(offset + 10);
            button.disabled = false;
          }
        } catch (error) {
          console.error('load more failed:', error);
          alert('Could not load more products.');
          button.disabled = false;
        } finally {
          spinner.classList.add('d-none');
        }
      });
    });
  </script>
</body>
</html>
"#;

const PRODUCT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <title>{{product.name}} · Stilnovo</title>
  <link rel="stylesheet" href="/public/css/store.css" />
</head>
<body>
  <header class="top-bar"><a href="/" class="logo">Stilnovo</a></header>
  <main class="product-page">
    <h1>{{product.name}}</h1>
    <p class="meta">{{product.category}} · {{product.location}}</p>
    <p class="price">{{product.price}}</p>
    <p>{{description}}</p>
    <p class="meta">
      Sold by <a href="/dashboard/{{seller_path}}">{{seller}}</a> · {{views}} views
    </p>
    <form action="/products/{{product.id}}/like" method="post">
      <button type="submit" class="btn-like">I'm interested</button>
    </form>
  </main>
</body>
</html>
"#;

const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <title>{{seller}} · Dashboard</title>
  <link rel="stylesheet" href="/public/css/store.css" />
  <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
</head>
<body>
  <header class="top-bar"><a href="/" class="logo">Stilnovo</a></header>
  <main class="dashboard">
    <h1>Sales overview for {{seller}}</h1>
    <section class="chart-card">
      <h2>Sales by category</h2>
      <div class="chart-box"><canvas id="salesByCategoryChart"></canvas></div>
    </section>
    <section class="chart-card">
      <h2>Revenue</h2>
      <div class="chart-box"><canvas id="revenueChart"></canvas></div>
    </section>
    <section class="chart-card">
      <h2>Visits vs interest</h2>
      <div class="chart-box"><canvas id="visitsInterestChart"></canvas></div>
    </section>
  </main>
  <script type="application/json" id="chart-data">{{{island}}}</script>
  <script>
    document.addEventListener('DOMContentLoaded', function () {
{{{chart_script}}}
    });
  </script>
</body>
</html>
"#;
