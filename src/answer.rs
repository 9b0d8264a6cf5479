//! Answer generation over retrieved documents.
//!
//! [`AnswerGenerator::answer`] never fails. Retrieval and model errors come
//! back as [`Answer::Failed`] so the chat layer always has something to show.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::embeddings::{EmbeddingProvider, EmbeddingSource};
use crate::error::{Error, Result};
use crate::index::{Match, VectorIndex};
use crate::llm::{LanguageModel, MessageRequest};
use crate::ratelimit::RateLimiter;
use crate::retrieval::Retriever;

pub const ANSWER_SYSTEM_PROMPT: &str =
    "You are an assistant that helps answer questions in Hebrew based on provided documents.";

/// Output budget for an answer.
const ANSWER_MAX_TOKENS: u32 = 1024;

/// "The documents I received are:"
pub const DOCUMENTS_LABEL: &str = "המסמכים שקיבלתי הם: ";

/// "Question:"
pub const QUESTION_LABEL: &str = "שאלה: ";

/// Build the user turn: documents in retrieval order, then the question.
#[must_use]
pub fn build_prompt(documents: &[&str], query: &str) -> String {
    format!(
        "{DOCUMENTS_LABEL}\n\n{}\n\n{QUESTION_LABEL}{query}",
        documents.join("\n\n")
    )
}

/// A document the answer was grounded on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Source {
    pub id: String,
    pub score: f32,
}

impl From<&Match> for Source {
    fn from(m: &Match) -> Self {
        Self {
            id: m.id.clone(),
            score: m.score,
        }
    }
}

/// Pipeline stage an answer failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    /// The vector index could not be queried.
    Index,
    /// A retrieved match could not be used as a document.
    Retrieval,
    Generation,
}

/// Outcome of answering one question.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Generated {
        text: String,
        sources: Vec<Source>,
        embedding_source: EmbeddingSource,
    },
    Failed {
        stage: FailureStage,
        message: String,
    },
}

impl Answer {
    #[must_use]
    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated { .. })
    }

    /// Text suitable for display: the answer, or a readable error.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            Self::Generated { text, .. } => text.clone(),
            Self::Failed {
                stage: FailureStage::Generation,
                message,
            } => format!("Error querying Claude: {message}"),
            Self::Failed {
                stage: FailureStage::Index | FailureStage::Retrieval,
                message,
            } => format!("Retrieval unavailable: {message}"),
        }
    }

    #[must_use]
    pub fn sources(&self) -> &[Source] {
        match self {
            Self::Generated { sources, .. } => sources,
            Self::Failed { .. } => &[],
        }
    }

    /// Convert a failure back into an error, for one-shot commands.
    pub fn into_result(self) -> Result<Self> {
        match self {
            Self::Failed {
                stage: FailureStage::Index,
                message,
            } => Err(Error::Index(message)),
            Self::Failed {
                stage: FailureStage::Retrieval,
                message,
            } => Err(Error::Retrieval(message)),
            Self::Failed {
                stage: FailureStage::Generation,
                message,
            } => Err(Error::LanguageModel(message)),
            generated @ Self::Generated { .. } => Ok(generated),
        }
    }

    /// Record `error`, keeping index failures distinct so their hints survive.
    fn failed(stage: FailureStage, error: Error) -> Self {
        match error {
            Error::Index(message) => Self::Failed {
                stage: FailureStage::Index,
                message,
            },
            Error::Retrieval(message) | Error::LanguageModel(message) => {
                Self::Failed { stage, message }
            }
            other => Self::Failed {
                stage,
                message: other.to_string(),
            },
        }
    }
}

/// Something that can answer a chat message.
pub trait Answerer: Send + Sync {
    fn answer(&self, question: &str) -> impl std::future::Future<Output = Answer> + Send;
}

/// Retrieval-augmented answer generator.
pub struct AnswerGenerator<M, P, I>
where
    M: LanguageModel,
    P: EmbeddingProvider,
    I: VectorIndex,
{
    retriever: Retriever<P, I>,
    model: M,
    model_id: String,
    limiter: Arc<RateLimiter>,
    top_k: usize,
}

impl<M, P, I> AnswerGenerator<M, P, I>
where
    M: LanguageModel,
    P: EmbeddingProvider,
    I: VectorIndex,
{
    pub fn new(
        retriever: Retriever<P, I>,
        model: M,
        model_id: impl Into<String>,
        limiter: Arc<RateLimiter>,
        top_k: usize,
    ) -> Self {
        Self {
            retriever,
            model,
            model_id: model_id.into(),
            limiter,
            top_k,
        }
    }

    pub fn retriever(&self) -> &Retriever<P, I> {
        &self.retriever
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Answer `query` from the top-k retrieved documents.
    pub async fn answer(&self, query: &str) -> Answer {
        let retrieval = match self.retriever.retrieve(query, self.top_k).await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "retrieval failed");
                return Answer::failed(FailureStage::Retrieval, e);
            }
        };

        let documents = match retrieval
            .matches
            .iter()
            .map(Match::text)
            .collect::<Result<Vec<&str>>>()
        {
            Ok(d) => d,
            Err(e) => {
                warn!(error = %e, "retrieved match is unusable");
                return Answer::failed(FailureStage::Retrieval, e);
            }
        };

        let request = MessageRequest::new(&self.model_id, ANSWER_MAX_TOKENS)
            .system(ANSWER_SYSTEM_PROMPT)
            .user(build_prompt(&documents, query));
        debug!(documents = documents.len(), "asking model");

        match self.limiter.run(|| self.model.create_message(&request)).await {
            Ok(text) => Answer::Generated {
                text,
                sources: retrieval.matches.iter().map(Source::from).collect(),
                embedding_source: retrieval.embedding_source,
            },
            Err(e) => {
                warn!(error = %e, "answer generation failed");
                Answer::failed(FailureStage::Generation, e)
            }
        }
    }
}

impl<M, P, I> Answerer for AnswerGenerator<M, P, I>
where
    M: LanguageModel,
    P: EmbeddingProvider,
    I: VectorIndex,
{
    fn answer(&self, question: &str) -> impl std::future::Future<Output = Answer> + Send {
        AnswerGenerator::answer(self, question)
    }
}
