//! Answer options
//!
//! An option is an answer text plus the users who voted for it, in vote
//! arrival order. A user id appears at most once per option.

use serde::{Deserialize, Serialize};

use super::codec::null_as_default;

/// One answer of a poll and its voters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnswerOption {
    answer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    voter: Vec<String>,
}

impl AnswerOption {
    /// Create an option with no voters. `answer` is stored as given.
    pub(crate) fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            voter: Vec::new(),
        }
    }

    /// Answer text
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Voters in arrival order
    pub fn voters(&self) -> &[String] {
        &self.voter
    }

    pub fn vote_count(&self) -> usize {
        self.voter.len()
    }

    pub fn has_voter(&self, user_id: &str) -> bool {
        self.voter.iter().any(|v| v == user_id)
    }

    /// Append a voter. Returns false if the user already voted here.
    pub(crate) fn add_voter(&mut self, user_id: &str) -> bool {
        if self.has_voter(user_id) {
            return false;
        }
        self.voter.push(user_id.to_string());
        true
    }

    /// Remove every occurrence of a voter. Returns true if one was removed.
    pub(crate) fn remove_voter(&mut self, user_id: &str) -> bool {
        let before = self.voter.len();
        self.voter.retain(|v| v != user_id);
        self.voter.len() != before
    }
}
