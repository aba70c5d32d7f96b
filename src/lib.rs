pub mod app;
pub mod blog;
pub mod config;
pub mod dom;
pub mod errors;
pub mod handlers;
pub mod like_client;
pub mod markdown;
pub mod models;
pub mod page;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::AppConfig;
pub use like_client::{HttpLikeTransport, LikeClient, LikeOptions, LikeOutcome, LikeTargets};
pub use state::AppState;
pub use storage::load_data;
