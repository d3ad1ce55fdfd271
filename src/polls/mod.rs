//! Polling Module
//!
//! In-memory poll entity: a question, ordered answer options with their
//! voters, and voting rules. Supports single-answer polls where voting again
//! moves the vote, and multi-answer polls capped by `votes=N`.

pub mod codec;
pub mod error;
pub mod id;
pub mod option;
pub mod poll;
pub mod settings;

pub use codec::VotedAnswerResponse;
pub use error::{PollError, VoteNotice};
pub use id::{IdGenerator, UuidIdGenerator};
pub use option::AnswerOption;
pub use poll::Poll;
pub use settings::{SettingToken, Settings};
