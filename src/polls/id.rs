//! Poll identity
//!
//! Poll ids come from an injected [`IdGenerator`] so hosts (and tests) control
//! uniqueness instead of relying on a process-wide generator.

use uuid::Uuid;

/// Source of unique poll identifiers
pub trait IdGenerator {
    /// Return an identifier not handed out before
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs in simple (hyphen-less) form
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

impl<F> IdGenerator for F
where
    F: Fn() -> String,
{
    fn next_id(&self) -> String {
        self()
    }
}

/// Current time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
