//! Poll Settings
//!
//! Poll-wide voting rules and the setting token vocabulary hosts pass at
//! creation time: `anonymous`, `progress`, `public-add-option`, `votes=N`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::LazyLock;

use super::error::PollError;

/// Matches `votes=<digits>`; the digits are capture group 1.
pub(crate) static VOTES_SETTING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^votes=([0-9]+)$").unwrap());

/// Voting configuration of a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Settings {
    /// Hide who voted for what
    #[serde(default)]
    pub anonymous: bool,
    /// Show vote counts while the poll runs
    #[serde(default)]
    pub progress: bool,
    /// Let any user add answer options
    #[serde(default)]
    pub public_add_option: bool,
    /// Votes per user; 1 is single-answer mode
    #[serde(default = "default_max_votes")]
    pub max_votes: usize,
}

fn default_max_votes() -> usize {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            anonymous: false,
            progress: false,
            public_add_option: false,
            max_votes: default_max_votes(),
        }
    }
}

impl Settings {
    /// More than one vote per user
    pub fn is_multi_answer(&self) -> bool {
        self.max_votes > 1
    }
}

/// A single recognized setting token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingToken {
    Anonymous,
    Progress,
    PublicAddOption,
    /// `votes=N`, kept raw since its range depends on the option count
    Votes(String),
}

impl FromStr for SettingToken {
    type Err = PollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anonymous" => Ok(Self::Anonymous),
            "progress" => Ok(Self::Progress),
            "public-add-option" => Ok(Self::PublicAddOption),
            _ if VOTES_SETTING_RE.is_match(s) => Ok(Self::Votes(s.to_string())),
            _ => Err(PollError::UnrecognizedSetting(s.to_string())),
        }
    }
}
