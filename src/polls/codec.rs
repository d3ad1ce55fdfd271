//! Poll encoding
//!
//! JSON byte encoding of polls for handoff to an external store, and of vote
//! projections for display layers. Field names match the stored record format
//! and must not change.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use super::poll::Poll;

/// Votes of one user within a poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotedAnswerResponse {
    pub poll_id: String,
    pub user_id: String,
    /// Answer texts in option order
    pub voted_answers: Vec<String>,
}

impl VotedAnswerResponse {
    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

impl Poll {
    /// Encode the full poll
    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Decode a poll produced by [`Poll::encode`].
    ///
    /// Returns `None` for malformed input; treat that as an unavailable poll.
    pub fn decode(bytes: &[u8]) -> Option<Poll> {
        match serde_json::from_slice(bytes) {
            Ok(poll) => Some(poll),
            Err(e) => {
                debug!(error = %e, len = bytes.len(), "failed to decode poll");
                None
            }
        }
    }
}

/// Deserialize `null` as the type's default (stored records may carry
/// `null` for empty lists).
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
