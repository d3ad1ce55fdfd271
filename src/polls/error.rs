//! Poll Errors and Notices
//!
//! Every failure is a symbolic kind plus payload. Hosts localize through
//! [`PollError::message_id`] and [`PollError::data`]; `Display` output is for
//! logs only.

use std::collections::HashMap;
use thiserror::Error;

/// Errors returned by poll construction and mutation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    /// Setting token outside the known vocabulary
    #[error("Unrecognized poll setting: {0}")]
    UnrecognizedSetting(String),

    /// `votes=` token whose numeric suffix could not be extracted
    #[error("Unexpected error while parsing setting: {0}")]
    MalformedVotesSetting(String),

    /// `votes=N` with N not in `1..=option count`
    #[error("Invalid votes setting, must be between 1 and the number of options: {0}")]
    InvalidVotesSetting(String),

    #[error("Empty option not allowed")]
    EmptyOption,

    #[error("Duplicate option: {0}")]
    DuplicateOption(String),

    /// Option index out of range
    #[error("Invalid option index: {0}")]
    InvalidIndex(usize),

    /// Empty user id
    #[error("Invalid user id")]
    InvalidUser,
}

impl PollError {
    /// Stable message id for localization lookups
    pub fn message_id(&self) -> &'static str {
        match self {
            Self::UnrecognizedSetting(_) => "poll.newPoll.unrecognizedSetting",
            Self::MalformedVotesSetting(_) => "poll.newPoll.votesettings.unexpectedError",
            Self::InvalidVotesSetting(_) => "poll.newPoll.votesettings.invalidSetting",
            Self::EmptyOption => "poll.addAnswerOption.empty",
            Self::DuplicateOption(_) => "poll.addAnswerOption.duplicate",
            Self::InvalidIndex(_) => "poll.updateVote.invalidIndex",
            Self::InvalidUser => "poll.invalidUser",
        }
    }

    /// Template placeholders for the localized message
    pub fn data(&self) -> HashMap<&'static str, String> {
        let mut data = HashMap::new();
        match self {
            Self::UnrecognizedSetting(s)
            | Self::MalformedVotesSetting(s)
            | Self::InvalidVotesSetting(s) => {
                data.insert("Setting", s.clone());
            }
            Self::DuplicateOption(option) => {
                data.insert("Option", option.clone());
            }
            Self::InvalidIndex(index) => {
                data.insert("Index", index.to_string());
            }
            Self::EmptyOption | Self::InvalidUser => {}
        }
        data
    }

    /// True for caller misuse (bad index, empty user id).
    ///
    /// These are programming errors in the host and should not be shown to
    /// end users. Everything else comes from user input.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::InvalidIndex(_) | Self::InvalidUser)
    }
}

/// Benign outcome of a vote that was valid but not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteNotice {
    /// The user already voted for this option
    AlreadyVotedForOption,
    /// The user has used all of their votes
    NoVotesLeft,
}

impl VoteNotice {
    /// Stable message id for localization lookups
    pub fn message_id(&self) -> &'static str {
        match self {
            Self::AlreadyVotedForOption => "poll.updateVote.alreadyVoted",
            Self::NoVotesLeft => "poll.updateVote.maxVotes",
        }
    }
}

impl std::fmt::Display for VoteNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyVotedForOption => write!(f, "You've already voted for this option."),
            Self::NoVotesLeft => write!(
                f,
                "You couldn't vote for this option, because you don't have any votes left."
            ),
        }
    }
}
