//! Poll Entity
//!
//! Handles poll creation, option management, settings and vote transitions.
//! A `Poll` is a plain single-owner value; hosts serialize concurrent access.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::codec::{null_as_default, VotedAnswerResponse};
use super::error::{PollError, VoteNotice};
use super::id::{now_millis, IdGenerator, UuidIdGenerator};
use super::option::AnswerOption;
use super::settings::{SettingToken, Settings, VOTES_SETTING_RE};

/// A poll: question, ordered answer options and voting rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Poll {
    #[serde(rename = "ID")]
    id: String,
    /// Unix ms
    created_at: i64,
    creator: String,
    question: String,
    #[serde(default, deserialize_with = "null_as_default")]
    answer_options: Vec<AnswerOption>,
    #[serde(default)]
    settings: Settings,
}

impl Poll {
    /// Create a poll with a random UUID id.
    ///
    /// See [`Poll::create`].
    pub fn new<O, S>(
        creator: &str,
        question: &str,
        answer_options: &[O],
        settings: &[S],
    ) -> Result<Self, PollError>
    where
        O: AsRef<str>,
        S: AsRef<str>,
    {
        Self::create(&UuidIdGenerator, creator, question, answer_options, settings)
    }

    /// Create a poll.
    ///
    /// Options are added in order through [`Poll::add_answer_option`], then
    /// setting tokens are applied in order. The first failure aborts
    /// construction and is returned.
    pub fn create<G, O, S>(
        ids: &G,
        creator: &str,
        question: &str,
        answer_options: &[O],
        settings: &[S],
    ) -> Result<Self, PollError>
    where
        G: IdGenerator + ?Sized,
        O: AsRef<str>,
        S: AsRef<str>,
    {
        let mut poll = Self {
            id: ids.next_id(),
            created_at: now_millis(),
            creator: creator.to_string(),
            question: question.to_string(),
            answer_options: Vec::with_capacity(answer_options.len()),
            settings: Settings::default(),
        };

        for option in answer_options {
            poll.add_answer_option(option.as_ref())?;
        }

        for token in settings {
            match token.as_ref().parse::<SettingToken>()? {
                SettingToken::Anonymous => poll.settings.anonymous = true,
                SettingToken::Progress => poll.settings.progress = true,
                SettingToken::PublicAddOption => poll.settings.public_add_option = true,
                SettingToken::Votes(token) => poll.parse_votes_setting(&token)?,
            }
        }

        debug!(
            poll_id = %poll.id,
            creator = %poll.creator,
            options = poll.answer_options.len(),
            max_votes = poll.settings.max_votes,
            "poll created"
        );
        Ok(poll)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Creation time in Unix milliseconds
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// Options in display order; vote indices refer to this order
    pub fn answer_options(&self) -> &[AnswerOption] {
        &self.answer_options
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_multi_answer(&self) -> bool {
        self.settings.is_multi_answer()
    }

    /// Parse a `votes=N` token and set the vote limit.
    ///
    /// N must be between 1 and the current number of answer options.
    pub fn parse_votes_setting(&mut self, token: &str) -> Result<(), PollError> {
        let digits = VOTES_SETTING_RE
            .captures(token)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| PollError::MalformedVotesSetting(token.to_string()))?;

        let max_votes = digits
            .as_str()
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=self.answer_options.len()).contains(n))
            .ok_or_else(|| PollError::InvalidVotesSetting(token.to_string()))?;

        self.settings.max_votes = max_votes;
        Ok(())
    }

    /// Append an answer option.
    ///
    /// Surrounding whitespace is trimmed. Empty and duplicate texts are
    /// rejected.
    pub fn add_answer_option(&mut self, answer: &str) -> Result<(), PollError> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(PollError::EmptyOption);
        }
        if self.answer_options.iter().any(|o| o.answer() == answer) {
            return Err(PollError::DuplicateOption(answer.to_string()));
        }
        self.answer_options.push(AnswerOption::new(answer));
        Ok(())
    }

    /// Record a vote of `user_id` for the option at `index`.
    ///
    /// Single-answer mode moves the user's vote to the new option. Multi-answer
    /// mode adds a vote unless the user already voted for the option or has
    /// no votes left; both cases return a notice and leave the poll untouched.
    pub fn update_vote(
        &mut self,
        user_id: &str,
        index: usize,
    ) -> Result<Option<VoteNotice>, PollError> {
        if index >= self.answer_options.len() {
            return Err(PollError::InvalidIndex(index));
        }
        if user_id.is_empty() {
            return Err(PollError::InvalidUser);
        }

        if self.is_multi_answer() {
            if self.answer_options[index].has_voter(user_id) {
                debug!(poll_id = %self.id, user_id, index, "already voted for option");
                return Ok(Some(VoteNotice::AlreadyVotedForOption));
            }
            let voted = self.voted_count(user_id);
            if voted >= self.settings.max_votes {
                debug!(poll_id = %self.id, user_id, voted, "no votes left");
                return Ok(Some(VoteNotice::NoVotesLeft));
            }
        } else {
            for option in &mut self.answer_options {
                option.remove_voter(user_id);
            }
        }

        self.answer_options[index].add_voter(user_id);
        debug!(poll_id = %self.id, user_id, index, "vote recorded");
        Ok(None)
    }

    /// Remove all of a user's votes
    pub fn reset_votes(&mut self, user_id: &str) -> Result<(), PollError> {
        if user_id.is_empty() {
            return Err(PollError::InvalidUser);
        }
        let removed = self
            .answer_options
            .iter_mut()
            .fold(0, |n, o| n + usize::from(o.remove_voter(user_id)));
        debug!(poll_id = %self.id, user_id, removed, "votes reset");
        Ok(())
    }

    /// Answers the user voted for, in option order
    pub fn get_voted_answer(&self, user_id: &str) -> Result<VotedAnswerResponse, PollError> {
        if user_id.is_empty() {
            return Err(PollError::InvalidUser);
        }
        let voted_answers = self
            .answer_options
            .iter()
            .filter(|o| o.has_voter(user_id))
            .map(|o| o.answer().to_string())
            .collect();

        Ok(VotedAnswerResponse {
            poll_id: self.id.clone(),
            user_id: user_id.to_string(),
            voted_answers,
        })
    }

    /// Whether the user voted for any option
    pub fn has_voted(&self, user_id: &str) -> bool {
        self.answer_options.iter().any(|o| o.has_voter(user_id))
    }

    /// `(answer, votes)` per option in display order
    pub fn vote_counts(&self) -> Vec<(String, usize)> {
        self.answer_options
            .iter()
            .map(|o| (o.answer().to_string(), o.vote_count()))
            .collect()
    }

    fn voted_count(&self, user_id: &str) -> usize {
        self.answer_options
            .iter()
            .filter(|o| o.has_voter(user_id))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_SETTINGS: &[&str] = &[];

    fn fixed_id() -> String {
        "poll1".to_string()
    }

    fn create_test_poll(settings: &[&str]) -> Poll {
        Poll::create(
            &fixed_id,
            "user1",
            "Favorite color?",
            &["Red", "Blue", "Green"],
            settings,
        )
        .unwrap()
    }

    fn voters(poll: &Poll, index: usize) -> Vec<&str> {
        poll.answer_options()[index]
            .voters()
            .iter()
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn test_create_poll_defaults() {
        let poll = create_test_poll(NO_SETTINGS);
        assert_eq!(poll.id(), "poll1");
        assert_eq!(poll.creator(), "user1");
        assert_eq!(poll.question(), "Favorite color?");
        assert_eq!(poll.answer_options().len(), 3);
        assert_eq!(*poll.settings(), Settings::default());
        assert!(poll.created_at() > 0);
    }

    #[test]
    fn test_new_assigns_unique_ids() {
        let a = Poll::new("u1", "Q?", &["A", "B"], NO_SETTINGS).unwrap();
        let b = Poll::new("u1", "Q?", &["A", "B"], NO_SETTINGS).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_create_poll_with_all_settings() {
        let poll = create_test_poll(&["anonymous", "progress", "public-add-option", "votes=3"]);
        let settings = poll.settings();
        assert!(settings.anonymous);
        assert!(settings.progress);
        assert!(settings.public_add_option);
        assert_eq!(settings.max_votes, 3);
        assert!(poll.is_multi_answer());
    }

    #[test]
    fn test_create_poll_unrecognized_setting() {
        let result = Poll::create(&fixed_id, "u1", "Q?", &["A", "B"], &["progress", "colour"]);
        assert_eq!(
            result,
            Err(PollError::UnrecognizedSetting("colour".to_string()))
        );
    }

    #[test]
    fn test_create_poll_negative_votes_is_unrecognized() {
        let result = Poll::create(&fixed_id, "u1", "Q?", &["A", "B"], &["votes=-1"]);
        assert_eq!(
            result,
            Err(PollError::UnrecognizedSetting("votes=-1".to_string()))
        );
    }

    #[test]
    fn test_create_poll_votes_exceed_options() {
        let result = Poll::create(&fixed_id, "u1", "Q?", &["A", "B"], &["votes=3"]);
        assert_eq!(
            result,
            Err(PollError::InvalidVotesSetting("votes=3".to_string()))
        );
    }

    #[test]
    fn test_create_poll_returns_first_option_error() {
        let result = Poll::create(&fixed_id, "u1", "Q?", &["A", " ", "A"], &["colour"]);
        assert_eq!(result, Err(PollError::EmptyOption));

        let result = Poll::create(&fixed_id, "u1", "Q?", &["A", "B", " A "], NO_SETTINGS);
        assert_eq!(result, Err(PollError::DuplicateOption("A".to_string())));
    }

    #[test]
    fn test_add_answer_option_trims() {
        let mut poll = create_test_poll(NO_SETTINGS);
        poll.add_answer_option("  Yellow\t").unwrap();
        assert_eq!(poll.answer_options()[3].answer(), "Yellow");
        assert!(poll.answer_options()[3].voters().is_empty());
    }

    #[test]
    fn test_add_answer_option_rejects_padded_duplicate() {
        let mut poll = create_test_poll(NO_SETTINGS);
        assert_eq!(
            poll.add_answer_option("  Red  "),
            Err(PollError::DuplicateOption("Red".to_string()))
        );
        assert_eq!(poll.answer_options().len(), 3);
    }

    #[test]
    fn test_add_answer_option_duplicate_is_case_sensitive() {
        let mut poll = create_test_poll(NO_SETTINGS);
        assert!(poll.add_answer_option("red").is_ok());
    }

    #[test]
    fn test_add_answer_option_rejects_empty() {
        let mut poll = create_test_poll(NO_SETTINGS);
        assert_eq!(poll.add_answer_option(""), Err(PollError::EmptyOption));
        assert_eq!(poll.add_answer_option(" \n "), Err(PollError::EmptyOption));
    }

    #[test]
    fn test_parse_votes_setting_range() {
        let mut poll = create_test_poll(NO_SETTINGS);
        for n in 1..=3 {
            let token = format!("votes={n}");
            assert_eq!(poll.parse_votes_setting(&token), Ok(()));
            assert_eq!(poll.settings().max_votes, n);
        }
        assert_eq!(
            poll.parse_votes_setting("votes=0"),
            Err(PollError::InvalidVotesSetting("votes=0".to_string()))
        );
        assert_eq!(
            poll.parse_votes_setting("votes=4"),
            Err(PollError::InvalidVotesSetting("votes=4".to_string()))
        );
        // failed parses leave the previous value
        assert_eq!(poll.settings().max_votes, 3);
    }

    #[test]
    fn test_parse_votes_setting_overflow() {
        let mut poll = create_test_poll(NO_SETTINGS);
        let token = "votes=99999999999999999999999999";
        assert_eq!(
            poll.parse_votes_setting(token),
            Err(PollError::InvalidVotesSetting(token.to_string()))
        );
    }

    #[test]
    fn test_parse_votes_setting_malformed() {
        let mut poll = create_test_poll(NO_SETTINGS);
        assert_eq!(
            poll.parse_votes_setting("votes=-1"),
            Err(PollError::MalformedVotesSetting("votes=-1".to_string()))
        );
        assert_eq!(
            poll.parse_votes_setting("anonymous"),
            Err(PollError::MalformedVotesSetting("anonymous".to_string()))
        );
    }

    #[test]
    fn test_votes_setting_counts_options_before_settings() {
        // options are added before any token is applied
        let poll = Poll::create(&fixed_id, "u1", "Q?", &["A", "B", "C", "D"], &["votes=4"]).unwrap();
        assert_eq!(poll.settings().max_votes, 4);
    }

    #[test]
    fn test_update_vote_preconditions() {
        let mut poll = create_test_poll(NO_SETTINGS);
        assert_eq!(poll.update_vote("u1", 3), Err(PollError::InvalidIndex(3)));
        assert_eq!(poll.update_vote("", 0), Err(PollError::InvalidUser));
        assert!(!poll.has_voted("u1"));
    }

    #[test]
    fn test_update_vote_index_checked_before_user() {
        let mut poll = create_test_poll(NO_SETTINGS);
        assert_eq!(poll.update_vote("", 7), Err(PollError::InvalidIndex(7)));
    }

    #[test]
    fn test_single_answer_vote_moves() {
        let mut poll = create_test_poll(NO_SETTINGS);
        assert_eq!(poll.update_vote("u1", 0), Ok(None));
        assert_eq!(voters(&poll, 0), ["u1"]);

        assert_eq!(poll.update_vote("u1", 1), Ok(None));
        assert!(voters(&poll, 0).is_empty());
        assert_eq!(voters(&poll, 1), ["u1"]);
    }

    #[test]
    fn test_single_answer_revote_same_option() {
        let mut poll = create_test_poll(NO_SETTINGS);
        poll.update_vote("u1", 0).unwrap();
        poll.update_vote("u2", 0).unwrap();
        assert_eq!(poll.update_vote("u1", 0), Ok(None));
        // re-voting moves the user to the end of the list
        assert_eq!(voters(&poll, 0), ["u2", "u1"]);
    }

    #[test]
    fn test_single_answer_keeps_other_voters() {
        let mut poll = create_test_poll(NO_SETTINGS);
        poll.update_vote("u1", 0).unwrap();
        poll.update_vote("u2", 0).unwrap();
        poll.update_vote("u3", 0).unwrap();
        poll.update_vote("u2", 2).unwrap();

        assert_eq!(voters(&poll, 0), ["u1", "u3"]);
        assert_eq!(voters(&poll, 2), ["u2"]);
    }

    #[test]
    fn test_multi_answer_votes_accumulate() {
        let mut poll = create_test_poll(&["votes=2"]);
        assert_eq!(poll.update_vote("u1", 0), Ok(None));
        assert_eq!(poll.update_vote("u1", 2), Ok(None));
        assert_eq!(voters(&poll, 0), ["u1"]);
        assert_eq!(voters(&poll, 2), ["u1"]);
    }

    #[test]
    fn test_multi_answer_no_votes_left() {
        let mut poll = create_test_poll(&["votes=2"]);
        poll.update_vote("u1", 0).unwrap();
        poll.update_vote("u1", 1).unwrap();
        let before = poll.clone();

        assert_eq!(poll.update_vote("u1", 2), Ok(Some(VoteNotice::NoVotesLeft)));
        assert_eq!(poll, before);
    }

    #[test]
    fn test_multi_answer_already_voted() {
        let mut poll = create_test_poll(&["votes=2"]);
        poll.update_vote("u1", 0).unwrap();
        let before = poll.clone();

        assert_eq!(
            poll.update_vote("u1", 0),
            Ok(Some(VoteNotice::AlreadyVotedForOption))
        );
        assert_eq!(poll, before);
    }

    #[test]
    fn test_multi_answer_already_voted_wins_over_no_votes_left() {
        let mut poll = create_test_poll(&["votes=2"]);
        poll.update_vote("u1", 0).unwrap();
        poll.update_vote("u1", 1).unwrap();
        assert_eq!(
            poll.update_vote("u1", 1),
            Ok(Some(VoteNotice::AlreadyVotedForOption))
        );
    }

    #[test]
    fn test_multi_answer_users_are_independent() {
        let mut poll = create_test_poll(&["votes=2"]);
        poll.update_vote("u1", 0).unwrap();
        poll.update_vote("u1", 1).unwrap();
        assert_eq!(poll.update_vote("u2", 2), Ok(None));
        assert_eq!(poll.update_vote("u2", 0), Ok(None));
        assert_eq!(voters(&poll, 0), ["u1", "u2"]);
    }

    #[test]
    fn test_get_voted_answer_in_option_order() {
        let mut poll = create_test_poll(&["votes=3"]);
        poll.update_vote("u1", 2).unwrap();
        poll.update_vote("u1", 0).unwrap();

        let response = poll.get_voted_answer("u1").unwrap();
        assert_eq!(response.poll_id, "poll1");
        assert_eq!(response.user_id, "u1");
        assert_eq!(response.voted_answers, ["Red", "Green"]);
    }

    #[test]
    fn test_get_voted_answer_without_votes() {
        let poll = create_test_poll(NO_SETTINGS);
        let response = poll.get_voted_answer("u9").unwrap();
        assert!(response.voted_answers.is_empty());
    }

    #[test]
    fn test_get_voted_answer_invalid_user() {
        let poll = create_test_poll(NO_SETTINGS);
        assert_eq!(poll.get_voted_answer(""), Err(PollError::InvalidUser));
    }

    #[test]
    fn test_has_voted() {
        let mut poll = create_test_poll(NO_SETTINGS);
        assert!(!poll.has_voted("u1"));
        poll.update_vote("u1", 1).unwrap();
        assert!(poll.has_voted("u1"));
        assert!(!poll.has_voted("u2"));
        assert!(!poll.has_voted(""));
    }

    #[test]
    fn test_reset_votes() {
        let mut poll = create_test_poll(&["votes=2"]);
        poll.update_vote("u1", 0).unwrap();
        poll.update_vote("u1", 1).unwrap();
        poll.update_vote("u2", 1).unwrap();

        poll.reset_votes("u1").unwrap();
        assert!(!poll.has_voted("u1"));
        assert_eq!(voters(&poll, 1), ["u2"]);

        // votes are available again
        assert_eq!(poll.update_vote("u1", 2), Ok(None));
        assert_eq!(poll.reset_votes(""), Err(PollError::InvalidUser));
    }

    #[test]
    fn test_vote_counts() {
        let mut poll = create_test_poll(NO_SETTINGS);
        poll.update_vote("u1", 0).unwrap();
        poll.update_vote("u2", 0).unwrap();
        poll.update_vote("u3", 2).unwrap();

        assert_eq!(
            poll.vote_counts(),
            vec![
                ("Red".to_string(), 2),
                ("Blue".to_string(), 0),
                ("Green".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_public_add_option_then_vote() {
        let mut poll = create_test_poll(&["public-add-option"]);
        poll.add_answer_option("Purple").unwrap();
        assert_eq!(poll.update_vote("u5", 3), Ok(None));
        assert_eq!(
            poll.get_voted_answer("u5").unwrap().voted_answers,
            ["Purple"]
        );
    }
}
