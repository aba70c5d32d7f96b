use std::{env, path::PathBuf, str::FromStr};
use tracing::warn;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POSTS_PER_PAGE: usize = 8;
const DEFAULT_COMMENTS_PER_PAGE: usize = 15;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub data_path: PathBuf,
    /// Prefix the page script puts in front of `/like_post`.
    pub script_root: String,
    pub posts_per_page: usize,
    pub comments_per_page: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_path: PathBuf::from("data/blog.json"),
            script_root: String::new(),
            posts_per_page: DEFAULT_POSTS_PER_PAGE,
            comments_per_page: DEFAULT_COMMENTS_PER_PAGE,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: parse_var("PORT", defaults.port),
            data_path: resolve_data_path(),
            script_root: env::var("SCRIPT_ROOT")
                .map(|root| root.trim_end_matches('/').to_string())
                .unwrap_or(defaults.script_root),
            posts_per_page: parse_var("POSTS_PER_PAGE", defaults.posts_per_page).max(1),
            comments_per_page: parse_var("COMMENTS_PER_PAGE", defaults.comments_per_page).max(1),
        }
    }
}

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/blog.json")
}

fn parse_var<T: FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(value) => value.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("ignoring invalid {name}={value:?}, using {default}");
            default
        }),
        Err(_) => default,
    }
}
