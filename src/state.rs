use crate::models::StoreData;
use crate::views::{self, Views};
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<StoreData>>,
    pub views: Arc<Views>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: StoreData) -> Result<Self, handlebars::TemplateError> {
        Ok(Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            views: Arc::new(views::registry()?),
        })
    }
}
