#![no_main]

use libfuzzer_sys::fuzz_target;

use ballotbox::polls::Poll;

fuzz_target!(|data: &[u8]| {
    // Stored records come from outside; decoding must never panic.
    let Some(mut poll) = Poll::decode(data) else {
        return;
    };

    // A decoded poll may violate creation-time invariants (duplicate answers,
    // out-of-range vote limits). Mutations must still be panic-free.
    let count = poll.answer_options().len();
    for index in 0..count.min(4) {
        let _ = poll.update_vote("fuzz-user", index);
    }
    let _ = poll.update_vote("fuzz-user", count);
    let _ = poll.get_voted_answer("fuzz-user");
    let _ = poll.reset_votes("fuzz-user");

    let encoded = poll.encode().expect("decoded poll must re-encode");
    assert_eq!(Poll::decode(&encoded).as_ref(), Some(&poll));
});
