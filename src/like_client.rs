//! The like action: read the post id off the page, ask the server to record a
//! like, and paint the returned count onto the page.
//!
//! Every click is an independent request. Which responses get painted is decided
//! by [`ResponseOrdering`]; failures are reported through [`LikeOutcome`] and only
//! reach the page when [`FailurePolicy::Surface`] is configured.

use crate::dom::Document;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub const ACTIVE_COLOR: &str = "#28a0f6";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("element #{0} not found")]
    MissingElement(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Body of a `/like_post` response. Only `likes` is read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LikeReply {
    #[serde(default)]
    pub likes: Option<serde_json::Value>,
}

impl LikeReply {
    /// The count as it should appear on the page. Any scalar is shown as text;
    /// `null` counts as absent.
    pub fn likes_text(&self) -> Result<Option<String>, ClientError> {
        match &self.likes {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.clone())),
            Some(scalar @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(scalar.to_string())),
            Some(other) => Err(ClientError::Decode(format!("likes is not a scalar: {other}"))),
        }
    }
}

pub trait LikeTransport: Send + Sync {
    fn like_post(
        &self,
        post_id: &str,
    ) -> impl Future<Output = Result<LikeReply, ClientError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpLikeTransport {
    client: reqwest::Client,
    root: String,
}

impl HttpLikeTransport {
    /// `root` is the site prefix, e.g. `http://localhost:8080` or `http://host/blog`.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            root: root.into(),
        }
    }

    pub fn with_timeout(root: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            root: root.into(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/like_post", self.root.trim_end_matches('/'))
    }
}

impl LikeTransport for HttpLikeTransport {
    async fn like_post(&self, post_id: &str) -> Result<LikeReply, ClientError> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&[("post_id", post_id)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|err| ClientError::Decode(err.to_string()))
    }
}

/// Element ids the client reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeTargets {
    pub post_id: String,
    pub counter: String,
    pub control: String,
}

impl Default for LikeTargets {
    fn default() -> Self {
        Self {
            post_id: "post_id".to_string(),
            counter: "likes_num".to_string(),
            control: "like".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseOrdering {
    /// Paint a response only if nothing issued after it has been painted yet.
    #[default]
    LatestIssued,
    /// Paint every successful response as it arrives; the last to land wins.
    ArrivalOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    #[default]
    Silent,
    /// Write the failure into the element with this id; cleared on the next success.
    Surface { status: String },
}

#[derive(Debug, Clone)]
pub struct LikeOptions {
    pub ordering: ResponseOrdering,
    pub failure: FailurePolicy,
    pub active_color: String,
}

impl Default for LikeOptions {
    fn default() -> Self {
        Self {
            ordering: ResponseOrdering::default(),
            failure: FailurePolicy::default(),
            active_color: ACTIVE_COLOR.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum LikeOutcome {
    /// `likes` is `None` when the response carried no count; the counter is left alone.
    Applied { seq: u64, likes: Option<String> },
    Stale { seq: u64 },
    Failed(ClientError),
}

#[derive(Debug)]
pub struct ClickResponse {
    /// Always true: the control's own navigation never runs.
    pub default_prevented: bool,
    pub outcome: LikeOutcome,
}

pub struct LikeClient<T> {
    transport: T,
    document: Arc<Mutex<Document>>,
    targets: LikeTargets,
    options: LikeOptions,
    issued: AtomicU64,
    last_applied: AtomicU64,
}

impl<T: LikeTransport> LikeClient<T> {
    pub fn new(
        transport: T,
        document: Arc<Mutex<Document>>,
        targets: LikeTargets,
        options: LikeOptions,
    ) -> Self {
        Self {
            transport,
            document,
            targets,
            options,
            issued: AtomicU64::new(0),
            last_applied: AtomicU64::new(0),
        }
    }

    pub fn targets(&self) -> &LikeTargets {
        &self.targets
    }

    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    pub async fn handle_click(&self) -> ClickResponse {
        let outcome = self.like().await;
        ClickResponse {
            default_prevented: true,
            outcome,
        }
    }

    async fn like(&self) -> LikeOutcome {
        let post_id = {
            let doc = self.document.lock().await;
            doc.text_of(&self.targets.post_id).map(str::to_string)
        };

        let Some(post_id) = post_id else {
            let err = ClientError::MissingElement(self.targets.post_id.clone());
            let mut doc = self.document.lock().await;
            self.surface(&mut doc, &err);
            return LikeOutcome::Failed(err);
        };

        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(seq, post_id = %post_id, "issuing like request");

        let reply = self.transport.like_post(&post_id).await;
        match reply.and_then(|reply| reply.likes_text()) {
            Ok(likes) => self.apply(seq, likes).await,
            Err(err) => self.fail(seq, err).await,
        }
    }

    async fn fail(&self, seq: u64, err: ClientError) -> LikeOutcome {
        warn!(seq, "like request failed: {err}");
        let mut doc = self.document.lock().await;
        if !self.is_stale(seq) {
            self.surface(&mut doc, &err);
        }
        LikeOutcome::Failed(err)
    }

    async fn apply(&self, seq: u64, likes: Option<String>) -> LikeOutcome {
        let mut doc = self.document.lock().await;
        if self.is_stale(seq) {
            debug!(seq, "dropping like response overtaken by a later request");
            return LikeOutcome::Stale { seq };
        }
        self.last_applied.fetch_max(seq, Ordering::SeqCst);

        if let Some(likes) = &likes {
            doc.set_text(&self.targets.counter, likes);
        }
        doc.set_style_by_id(&self.targets.control, "color", &self.options.active_color);

        if let FailurePolicy::Surface { status } = &self.options.failure {
            doc.set_text(status, "");
        }

        LikeOutcome::Applied { seq, likes }
    }

    /// Must be called with the document lock held so the check and the paint agree.
    fn is_stale(&self, seq: u64) -> bool {
        self.options.ordering == ResponseOrdering::LatestIssued
            && seq < self.last_applied.load(Ordering::SeqCst)
    }

    fn surface(&self, doc: &mut Document, err: &ClientError) {
        if let FailurePolicy::Surface { status } = &self.options.failure {
            doc.set_text(status, &format!("Like failed: {err}"));
        }
    }
}
