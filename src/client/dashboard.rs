//! Seller dashboard rendering.
//!
//! The page embeds its chart data as a JSON data island. [`render_dashboard`]
//! parses it and builds up to three chart configurations (sales by category,
//! revenue over time, visits vs interest), handing each one to a
//! [`ChartSurface`]. A chart whose dataset is missing or empty gets a
//! placeholder message instead; the three charts never affect each other.

use crate::models::ChartData;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, error};

pub const DATA_ISLAND_ID: &str = "chart-data";
pub const CATEGORY_MOUNT: &str = "salesByCategoryChart";
pub const REVENUE_MOUNT: &str = "revenueChart";
pub const VISITS_MOUNT: &str = "visitsInterestChart";

pub const NO_SALES_MESSAGE: &str = "You have no sales data to display yet.";
pub const NO_REVENUE_MESSAGE: &str = "You have no revenue data to display yet.";
pub const NO_VISITS_MESSAGE: &str = "You have no visits data to display yet.";

pub const BRAND_PALETTE: [&str; 5] = ["#2f6ced", "#111827", "#a5b4fc", "#c5ccdc", "#818cf8"];
pub const CURRENCY_SUFFIX: &str = " €";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Doughnut,
    Line,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub background_color: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// A Chart.js configuration object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartSeries,
    pub options: Value,
    /// Appended to every y-axis tick label. Functions cannot travel as JSON,
    /// so surfaces wire this up themselves.
    #[serde(skip)]
    pub tick_suffix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartHandle {
    pub id: usize,
    pub mount: String,
}

/// The rendering capability the dashboard draws on.
pub trait ChartSurface {
    fn render(&mut self, mount: &str, config: &ChartConfig) -> ChartHandle;
    /// Replaces the chart mount with a static message.
    fn placeholder(&mut self, mount: &str, message: &str);
}

/// Charts created by one dashboard render. `None` means a placeholder was
/// shown for that chart.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Dashboard {
    pub category: Option<ChartHandle>,
    pub revenue: Option<ChartHandle>,
    pub visits: Option<ChartHandle>,
}

/// Parses the data island text. Malformed JSON is logged and treated as an
/// island with no datasets.
pub fn parse_island(text: &str) -> ChartData {
    match serde_json::from_str(text) {
        Ok(data) => data,
        Err(err) => {
            error!("failed to parse chart data island: {err}");
            ChartData::default()
        }
    }
}

/// Renders all three charts. `island` is the text of the data island element,
/// or `None` when the page has no such element.
pub fn render_dashboard<S: ChartSurface>(surface: &mut S, island: Option<&str>) -> Dashboard {
    let data = island.map(parse_island).unwrap_or_default();

    let category = match non_empty(&data.labels) {
        Some(labels) => Some(surface.render(
            CATEGORY_MOUNT,
            &category_chart(labels, data.values.as_deref().unwrap_or_default()),
        )),
        None => {
            surface.placeholder(CATEGORY_MOUNT, NO_SALES_MESSAGE);
            None
        }
    };

    let revenue = match non_empty(&data.revenue_labels) {
        Some(labels) => Some(surface.render(
            REVENUE_MOUNT,
            &revenue_chart(labels, data.revenue_values.as_deref().unwrap_or_default()),
        )),
        None => {
            surface.placeholder(REVENUE_MOUNT, NO_REVENUE_MESSAGE);
            None
        }
    };

    let visits = match non_empty(&data.bar_labels) {
        Some(labels) => Some(surface.render(
            VISITS_MOUNT,
            &visits_chart(
                labels,
                data.visits_values.as_deref().unwrap_or_default(),
                data.interest_values.as_deref().unwrap_or_default(),
            ),
        )),
        None => {
            surface.placeholder(VISITS_MOUNT, NO_VISITS_MESSAGE);
            None
        }
    };

    debug!(
        category = category.is_some(),
        revenue = revenue.is_some(),
        visits = visits.is_some(),
        "dashboard rendered"
    );
    Dashboard {
        category,
        revenue,
        visits,
    }
}

fn non_empty(values: &Option<Vec<String>>) -> Option<&[String]> {
    values.as_deref().filter(|v| !v.is_empty())
}

/// Palette color for the slice at `index`; wraps after the fifth category.
pub fn palette_color(index: usize) -> &'static str {
    BRAND_PALETTE[index % BRAND_PALETTE.len()]
}

pub fn category_chart(labels: &[String], values: &[f64]) -> ChartConfig {
    ChartConfig {
        kind: ChartKind::Doughnut,
        data: ChartSeries {
            labels: labels.to_vec(),
            datasets: vec![Dataset {
                label: "Products Sold".to_string(),
                data: values.to_vec(),
                background_color: (0..labels.len())
                    .map(|i| palette_color(i).to_string())
                    .collect(),
                border_color: Some("#ffffff".to_string()),
                border_width: Some(2),
                hover_offset: Some(8),
                spacing: Some(3),
                ..Dataset::default()
            }],
        },
        options: json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "cutout": "70%",
            "plugins": {
                "legend": {
                    "position": "bottom",
                    "labels": {
                        "padding": 20,
                        "usePointStyle": true,
                        "pointStyle": "circle",
                        "font": { "size": 14, "weight": "500" },
                        "color": "#1f2937"
                    }
                },
                "tooltip": {
                    "backgroundColor": "#111827",
                    "padding": 12,
                    "cornerRadius": 8,
                    "boxWidth": 8,
                    "boxHeight": 8,
                    "boxPadding": 6
                }
            }
        }),
        tick_suffix: None,
    }
}

pub fn revenue_chart(labels: &[String], values: &[f64]) -> ChartConfig {
    ChartConfig {
        kind: ChartKind::Line,
        data: ChartSeries {
            labels: labels.to_vec(),
            datasets: vec![Dataset {
                label: "Revenue".to_string(),
                data: values.to_vec(),
                background_color: vec!["rgba(47, 108, 237, 0.12)".to_string()],
                border_color: Some(BRAND_PALETTE[0].to_string()),
                border_width: Some(2),
                fill: Some(true),
                tension: Some(0.35),
                ..Dataset::default()
            }],
        },
        options: json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": { "legend": { "display": false } },
            "scales": {
                "y": { "beginAtZero": true, "ticks": {} },
                "x": { "grid": { "display": false } }
            }
        }),
        tick_suffix: Some(CURRENCY_SUFFIX.to_string()),
    }
}

pub fn visits_chart(labels: &[String], visits: &[f64], interest: &[f64]) -> ChartConfig {
    let series = |label: &str, data: &[f64], color: &str| Dataset {
        label: label.to_string(),
        data: data.to_vec(),
        background_color: vec![color.to_string()],
        border_radius: Some(6),
        ..Dataset::default()
    };
    ChartConfig {
        kind: ChartKind::Bar,
        data: ChartSeries {
            labels: labels.to_vec(),
            datasets: vec![
                series("Visits", visits, BRAND_PALETTE[0]),
                series("Interest", interest, BRAND_PALETTE[4]),
            ],
        },
        options: json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": { "legend": { "position": "bottom" } },
            "scales": { "y": { "beginAtZero": true, "ticks": { "precision": 0 } } }
        }),
        tick_suffix: None,
    }
}

/// Serializes `value` as JSON that is safe to inline in a `<script>` element.
pub fn script_safe_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

const SCRIPT_PRELUDE: &str = "Chart.defaults.font.family = \"'Inter', sans-serif\";\n\
Chart.defaults.font.size = 13;\n\
Chart.defaults.color = '#6b7280';\n";

/// Emits a browser script that builds each chart with Chart.js.
#[derive(Debug, Default)]
pub struct ScriptSurface {
    statements: Vec<String>,
    next_id: usize,
}

impl ScriptSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_script(self) -> String {
        let mut script = String::from(SCRIPT_PRELUDE);
        for statement in self.statements {
            script.push_str(&statement);
            script.push('\n');
        }
        script
    }
}

impl ChartSurface for ScriptSurface {
    fn render(&mut self, mount: &str, config: &ChartConfig) -> ChartHandle {
        let id = self.next_id;
        self.next_id += 1;

        let config_json = match script_safe_json(config) {
            Ok(json) => json,
            Err(err) => {
                error!(mount, "failed to serialize chart config: {err}");
                "null".to_string()
            }
        };
        let suffix = config
            .tick_suffix
            .as_deref()
            .and_then(|suffix| script_safe_json(&suffix).ok())
            .map(|suffix| {
                format!(
                    "  config.options.scales.y.ticks.callback = \
                     function (value) {{ return value + {suffix}; }};\n"
                )
            })
            .unwrap_or_default();

        self.statements.push(format!(
            "(function () {{\n  \
             var mount = document.getElementById({mount_json});\n  \
             var config = {config_json};\n  \
             if (!mount || !config) {{ return; }}\n\
             {suffix}  new Chart(mount.getContext('2d'), config);\n}})();",
            mount_json = script_safe_json(&mount).unwrap_or_else(|_| "null".to_string()),
        ));

        ChartHandle {
            id,
            mount: mount.to_string(),
        }
    }

    fn placeholder(&mut self, mount: &str, message: &str) {
        let html = format!(
            "<div class=\"d-flex align-items-center justify-content-center h-100\">\
             <p class=\"text-muted text-center small\">{message}</p></div>"
        );
        self.statements.push(format!(
            "(function () {{\n  \
             var mount = document.getElementById({mount_json});\n  \
             if (mount) {{ mount.parentElement.innerHTML = {html_json}; }}\n}})();",
            mount_json = script_safe_json(&mount).unwrap_or_else(|_| "null".to_string()),
            html_json = script_safe_json(&html).unwrap_or_else(|_| "''".to_string()),
        ));
    }
}
