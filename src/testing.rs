//! In-process stand-ins for the external services, used by unit tests.

use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::index::{Match, VectorIndex};
use crate::llm::{LanguageModel, MessageRequest};

type Reply = Box<dyn Fn(&MessageRequest) -> Result<String> + Send + Sync>;

/// Language model that records requests and answers from a closure.
pub(crate) struct StubModel {
    reply: Reply,
    requests: Mutex<Vec<MessageRequest>>,
}

impl StubModel {
    pub(crate) fn new<F>(reply: F) -> Self
    where
        F: Fn(&MessageRequest) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            reply: Box::new(reply),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn replying(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |_| Ok(text.clone()))
    }

    pub(crate) fn failing(message: &str) -> Self {
        let message = message.to_string();
        Self::new(move |_| Err(Error::LanguageModel(message.clone())))
    }

    pub(crate) fn requests(&self) -> Vec<MessageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl LanguageModel for StubModel {
    fn name(&self) -> &str {
        "stub"
    }

    async fn create_message(&self, request: &MessageRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        (self.reply)(request)
    }
}

/// A bracketed vector reply of `n` values, all `0.5`.
pub(crate) fn embedding_reply(n: usize) -> String {
    format!("[{}]", vec!["0.5"; n].join(","))
}

/// A match carrying `text` metadata.
pub(crate) fn text_match(id: &str, score: f32, text: &str) -> Match {
    let mut metadata = serde_json::Map::new();
    metadata.insert("text".into(), serde_json::Value::String(text.into()));
    Match {
        id: id.into(),
        score,
        metadata: Some(metadata),
    }
}

/// Vector index returning canned matches and recording queries.
pub(crate) struct StubIndex {
    matches: std::result::Result<Vec<Match>, String>,
    queries: Mutex<Vec<(usize, usize, bool)>>,
}

impl StubIndex {
    pub(crate) fn returning(matches: Vec<Match>) -> Self {
        Self {
            matches: Ok(matches),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            matches: Err(message.to_string()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Recorded `(vector_len, top_k, include_metadata)` per query.
    pub(crate) fn queries(&self) -> Vec<(usize, usize, bool)> {
        self.queries.lock().unwrap().clone()
    }
}

impl VectorIndex for StubIndex {
    async fn query(&self, vector: &[f32], top_k: usize, include_metadata: bool) -> Result<Vec<Match>> {
        self.queries
            .lock()
            .unwrap()
            .push((vector.len(), top_k, include_metadata));
        match &self.matches {
            Ok(matches) => Ok(matches.iter().take(top_k).cloned().collect()),
            Err(message) => Err(Error::Index(message.clone())),
        }
    }
}
