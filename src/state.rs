use crate::config::AppConfig;
use crate::models::BlogData;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub data: Arc<Mutex<BlogData>>,
}

impl AppState {
    pub fn new(config: AppConfig, data: BlogData) -> Self {
        Self {
            config: Arc::new(config),
            data: Arc::new(Mutex::new(data)),
        }
    }
}
