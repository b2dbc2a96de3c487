pub mod app;
pub mod catalog;
pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod insights;
pub mod models;
pub mod state;
pub mod storage;
pub mod views;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::load_data;
