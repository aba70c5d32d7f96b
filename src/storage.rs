use crate::errors::AppError;
use crate::models::BlogData;
use std::path::Path;
use tokio::fs;
use tracing::{error, info};

pub async fn load_data(path: &Path) -> BlogData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<BlogData>(&bytes) {
            Ok(data) => {
                info!("loaded {} posts from {}", data.posts.len(), path.display());
                data
            }
            Err(err) => {
                error!("failed to parse data file: {err}");
                BlogData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => BlogData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            BlogData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &BlogData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}
