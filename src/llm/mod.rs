//! Language model access.
//!
//! The pipeline only needs one operation from the model service: create a
//! message from a system instruction and role-tagged turns, and read back the
//! text of the first content block. [`LanguageModel`] is that seam;
//! [`AnthropicClient`] implements it over the Anthropic Messages API.

pub mod anthropic;
pub mod types;

pub use anthropic::AnthropicClient;
pub use types::{Message, MessageRequest, Role};

use crate::error::Result;

/// A service that turns a [`MessageRequest`] into response text.
pub trait LanguageModel: Send + Sync {
    /// Provider name for logs and status output.
    fn name(&self) -> &str;

    /// Send the request and return the text of the first content block.
    fn create_message(
        &self,
        request: &MessageRequest,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

impl<M: LanguageModel> LanguageModel for &M {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn create_message(
        &self,
        request: &MessageRequest,
    ) -> impl std::future::Future<Output = Result<String>> + Send {
        (**self).create_message(request)
    }
}

impl<M: LanguageModel> LanguageModel for std::sync::Arc<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn create_message(
        &self,
        request: &MessageRequest,
    ) -> impl std::future::Future<Output = Result<String>> + Send {
        (**self).create_message(request)
    }
}
