//! Chat session: sequences answering and presentation per user message and
//! keeps the conversation history for display.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{Instrument, info_span};

use crate::answer::{Answer, Answerer};
use crate::present::Presentation;

/// Example questions offered to new users.
pub const EXAMPLE_PROMPTS: [&str; 3] = [
    "על פי מה נקבע שכר המינימום בישראל?",
    "מהם החוקים העיקריים הנוגעים לזכויות עובדים בישראל?",
    "כיצד מחושבים דמי אבטלה בישראל?",
];

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatState {
    AwaitingInput,
    Generating,
}

/// One exchange.
///
/// `user` and `bot` are ready for display. `question` and `answer` keep the
/// logical-order text for truncation and machine output; only those are
/// serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    #[serde(skip)]
    pub user: String,
    /// `None` while the answer is being generated.
    #[serde(skip)]
    pub bot: Option<String>,
    pub question: String,
    pub answer: Option<String>,
    pub asked_at: DateTime<Utc>,
    pub answered: bool,
}

/// A chat session over some [`Answerer`].
pub struct ChatSession<A: Answerer> {
    id: String,
    answerer: A,
    presentation: Presentation,
    history: Vec<Turn>,
    state: ChatState,
}

impl<A: Answerer> ChatSession<A> {
    pub fn new(answerer: A, presentation: Presentation) -> Self {
        Self {
            id: format!("chat_{}", &uuid::Uuid::new_v4().to_string()[..12]),
            answerer,
            presentation,
            history: Vec::new(),
            state: ChatState::AwaitingInput,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn state(&self) -> ChatState {
        self.state
    }

    #[must_use]
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Answer `message` and record the exchange.
    ///
    /// Always fills the turn's response; failures become a readable error.
    pub async fn submit(&mut self, message: &str) -> &Turn {
        let slot = self.history.len();
        self.history.push(Turn {
            user: self.presentation.apply(message),
            bot: None,
            question: message.to_string(),
            answer: None,
            asked_at: Utc::now(),
            answered: false,
        });
        self.state = ChatState::Generating;

        let span = info_span!("chat_turn", session = %self.id, turn = slot + 1);
        let answer = self.answerer.answer(message).instrument(span).await;

        let (text, answered) = match &answer {
            Answer::Generated { text, .. } => (text.clone(), true),
            Answer::Failed { .. } => (format!("An error occurred: {}", answer.display_text()), false),
        };

        let presented = self.presentation.apply(&text);
        self.state = ChatState::AwaitingInput;

        let turn = &mut self.history[slot];
        turn.bot = Some(presented);
        turn.answer = Some(text);
        turn.answered = answered;
        turn
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.history.clear();
        self.state = ChatState::AwaitingInput;
    }
}
