//! Storefront client behaviors: the load-more pagination controller and the
//! seller dashboard renderer. Both talk to the page through traits so they
//! can drive a browser bridge, a terminal, or a recording test double.

pub mod dashboard;
pub mod fetch;
pub mod fragment;
pub mod pagination;

pub use dashboard::{
    ChartConfig, ChartHandle, ChartSurface, Dashboard, ScriptSurface, render_dashboard,
};
pub use fetch::{FetchError, FragmentSource, HttpFragmentSource};
pub use fragment::Fragment;
pub use pagination::{ControlState, Cursor, LoadMoreController, LoadMoreView, PageFilters, Trigger};
