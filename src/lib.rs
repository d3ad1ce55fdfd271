//! ballotbox library
//!
//! In-memory polls with validated transitions: creation from answer texts
//! and setting tokens, option addition, single- and multi-answer voting,
//! vote projections and byte encoding for an external store. Hosts supply
//! user ids, serialize access per poll, and render messages.
//!
//! ```
//! use ballotbox::polls::{Poll, VoteNotice};
//!
//! let mut poll = Poll::new("u1", "Lunch?", &["Pizza", "Sushi"], &["votes=2"]).unwrap();
//! assert_eq!(poll.update_vote("u2", 0), Ok(None));
//! assert_eq!(poll.update_vote("u2", 1), Ok(None));
//! assert_eq!(poll.update_vote("u2", 0), Ok(Some(VoteNotice::AlreadyVotedForOption)));
//! ```

pub mod cli;
pub mod config;
pub mod logging;
pub mod polls;

pub use polls::{Poll, PollError, VoteNotice};
