use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub body: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub summary: String,
    pub body: String,
    pub category: String,
    pub labels: Vec<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub like_num: u64,
    #[serde(default)]
    pub comment_num: u64,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BlogData {
    #[serde(default)]
    pub next_post_id: u64,
    #[serde(default)]
    pub next_comment_id: u64,
    #[serde(default)]
    pub posts: BTreeMap<u64, Post>,
    /// Category tag -> number of posts filed under it.
    #[serde(default)]
    pub categories: BTreeMap<String, u64>,
    /// Label -> number of posts carrying it.
    #[serde(default)]
    pub labels: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub body: String,
    pub category: String,
    /// Comma-separated, e.g. `"rust, web"`.
    #[serde(default)]
    pub labels: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditPost {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub body: String,
    #[serde(default)]
    pub labels: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub comment: String,
}

/// `post_id` is kept raw so an unparseable value can be treated as id 0.
#[derive(Debug, Deserialize)]
pub struct LikeQuery {
    pub post_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeResponse {
    pub likes: u64,
}

#[derive(Debug, Serialize)]
pub struct PostSummary {
    pub id: u64,
    pub title: String,
    pub summary_html: String,
    pub category: String,
    pub labels: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub like_num: u64,
    pub comment_num: u64,
}

#[derive(Debug, Serialize)]
pub struct PostDetail {
    pub id: u64,
    pub title: String,
    pub summary_html: String,
    pub body_html: String,
    pub category: String,
    pub labels: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub like_num: u64,
    pub comment_num: u64,
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
}
