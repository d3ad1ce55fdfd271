#![no_main]

use libfuzzer_sys::fuzz_target;

use ballotbox::polls::Poll;

fuzz_target!(|data: &str| {
    // Lines before the first empty line are answer options, the rest are
    // setting tokens. Construction returns Ok/Err, never panics.
    let mut sections = data.splitn(2, "\n\n");
    let options: Vec<&str> = sections.next().unwrap_or_default().lines().collect();
    let settings: Vec<&str> = sections.next().unwrap_or_default().lines().collect();

    let Ok(mut poll) = Poll::new("fuzz-creator", "fuzz?", options.as_slice(), settings.as_slice()) else {
        return;
    };

    let max_votes = poll.settings().max_votes;
    assert!(max_votes == 1 || max_votes <= poll.answer_options().len());

    for (i, user) in ["a", "b", "a", "c", "a"].iter().enumerate() {
        let index = i % poll.answer_options().len().max(1);
        let _ = poll.update_vote(user, index);
        let voted = poll.get_voted_answer(user).map(|r| r.voted_answers.len()).unwrap_or(0);
        assert!(voted <= max_votes);
    }
});
