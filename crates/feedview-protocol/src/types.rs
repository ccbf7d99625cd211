use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::FetchError;

/// Anything carrying a creation timestamp can be ordered chronologically.
pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
}

/// One learner answer and the feedback it received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: String,
    pub sentence: String,
    pub guess: String,
    pub answer: String,
    /// Free-form feedback text; may contain correctness keywords.
    pub feedback: String,
    pub created_at: DateTime<Utc>,
    /// Opaque per-user identifier, stable across that user's records.
    pub anon_id: String,
}

impl Timestamped for FeedbackRecord {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A beta waitlist signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Timestamped for WaitlistEntry {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// One complete fetch result. Immutable once decoded; a later fetch
/// replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSnapshot {
    pub vocab_feedback_log: Vec<FeedbackRecord>,
    pub beta_waitlist: Vec<WaitlistEntry>,
}

impl DataSnapshot {
    /// Decode a response body. Both collections must be present.
    pub fn from_json(body: &[u8]) -> Result<Self, FetchError> {
        Ok(serde_json::from_slice(body)?)
    }

    pub fn feedback_count(&self) -> usize {
        self.vocab_feedback_log.len()
    }

    pub fn waitlist_count(&self) -> usize {
        self.beta_waitlist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocab_feedback_log.is_empty() && self.beta_waitlist.is_empty()
    }
}
