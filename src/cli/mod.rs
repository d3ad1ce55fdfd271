//! CLI subcommand definitions and handlers.
//!
//! Uses clap derive to define the subcommands:
//! - `run <script>` -- build a poll from a JSON5 script and replay its steps
//! - `inspect <file>` -- decode a stored poll record and summarize it
//! - `version` -- print build/version info

use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::polls::{Poll, VoteNotice};

/// Drive in-memory polls from the command line.
#[derive(Parser, Debug)]
#[command(
    name = "ballot",
    version = env!("CARGO_PKG_VERSION"),
    about = "Create polls, replay votes and inspect stored poll records"
)]
pub struct Cli {
    /// Path to a JSON5 config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a poll from a script, apply its steps and print the encoded poll.
    Run {
        /// JSON5 script file.
        script: PathBuf,
    },

    /// Decode a stored poll record and print a summary.
    Inspect {
        /// File holding an encoded poll.
        file: PathBuf,

        /// Also print which answers this user voted for.
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Print version and build info.
    Version,
}

/// A poll plus the interactions to replay against it
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub creator: String,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub settings: Vec<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One interaction in a [`Script`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Vote { user: String, index: usize },
    AddOption(String),
    Reset(String),
}

// ---------------------------------------------------------------------------
// Subcommand handlers
// ---------------------------------------------------------------------------

/// Parse a script from JSON5 text
pub fn parse_script(raw: &str) -> Result<Script, Box<dyn std::error::Error>> {
    Ok(json5::from_str(raw).map_err(|e| format!("invalid script: {}", e))?)
}

/// Run the `run <script>` subcommand.
pub fn handle_run(path: &Path, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    let script = parse_script(&std::fs::read_to_string(path)?)?;
    let poll = run_script(&script, out)?;
    out.write_all(&poll.encode()?)?;
    writeln!(out)?;
    Ok(())
}

/// Build the poll and replay every step, reporting each outcome.
///
/// A step that fails is reported and the replay continues; only a failed
/// poll construction aborts.
pub fn run_script(
    script: &Script,
    out: &mut impl Write,
) -> Result<Poll, Box<dyn std::error::Error>> {
    let mut poll = Poll::new(
        &script.creator,
        &script.question,
        script.options.as_slice(),
        script.settings.as_slice(),
    )
    .map_err(|e| format!("{} ({})", e, e.message_id()))?;

    for (n, step) in script.steps.iter().enumerate() {
        let outcome = match step {
            Step::Vote { user, index } => match poll.update_vote(user, *index) {
                Ok(None) => "recorded".to_string(),
                Ok(Some(notice)) => format_notice(notice),
                Err(e) => format!("error: {} ({})", e, e.message_id()),
            },
            Step::AddOption(text) => match poll.add_answer_option(text) {
                Ok(()) => "added".to_string(),
                Err(e) => format!("error: {} ({})", e, e.message_id()),
            },
            Step::Reset(user) => match poll.reset_votes(user) {
                Ok(()) => "reset".to_string(),
                Err(e) => format!("error: {} ({})", e, e.message_id()),
            },
        };
        writeln!(out, "step {}: {}", n + 1, outcome)?;
    }

    Ok(poll)
}

/// Run the `inspect <file>` subcommand.
pub fn handle_inspect(
    path: &Path,
    user: Option<&str>,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)?;
    let poll = Poll::decode(&bytes).ok_or("poll unavailable: stored record is malformed")?;
    write_summary(&poll, out)?;

    if let Some(user) = user {
        let response = poll.get_voted_answer(user)?;
        out.write_all(&response.encode()?)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Run the `version` subcommand.
pub fn handle_version() {
    println!("ballot {}", env!("CARGO_PKG_VERSION"));
    println!("  Build date: {}", env!("BALLOT_BUILD_DATE"));
    println!("  Git commit: {}", env!("BALLOT_GIT_HASH"));
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn format_notice(notice: VoteNotice) -> String {
    format!("notice: {} ({})", notice, notice.message_id())
}

/// Print a human-readable poll summary. Voter names are hidden for anonymous polls.
fn write_summary(poll: &Poll, out: &mut impl Write) -> std::io::Result<()> {
    let settings = poll.settings();
    writeln!(out, "{}", poll.question())?;
    writeln!(out, "  id:       {}", poll.id())?;
    writeln!(out, "  creator:  {}", poll.creator())?;
    writeln!(out, "  created:  {}", format_timestamp(poll.created_at()))?;
    writeln!(
        out,
        "  settings: anonymous={} progress={} public-add-option={} votes={}",
        settings.anonymous, settings.progress, settings.public_add_option, settings.max_votes
    )?;
    for (i, option) in poll.answer_options().iter().enumerate() {
        if settings.anonymous {
            writeln!(out, "  [{}] {}: {}", i, option.answer(), option.vote_count())?;
        } else {
            writeln!(
                out,
                "  [{}] {}: {} [{}]",
                i,
                option.answer(),
                option.vote_count(),
                option.voters().join(", ")
            )?;
        }
    }
    Ok(())
}

/// Format a Unix-ms timestamp for display.
fn format_timestamp(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
        .unwrap_or_else(|| ms.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
