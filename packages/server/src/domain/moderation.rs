//! Moderation model: the escalation handshake, the privileged command grammar
//! and the process-wide moderation flags.

use std::fmt;

use super::value_object::{ConnectionId, Timestamp};

/// Reserved prefix of every moderation command. On its own it is the
/// escalation token.
pub const COMMAND_PREFIX: &str = "server init";

/// Process-wide moderation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalModerationState {
    pub suspended: bool,
    pub slow_mode_enabled: bool,
    pub slow_mode_interval_ms: i64,
}

impl GlobalModerationState {
    pub fn new(slow_mode_enabled: bool, slow_mode_interval_ms: i64) -> Self {
        Self {
            suspended: false,
            slow_mode_enabled,
            slow_mode_interval_ms,
        }
    }
}

/// Per-connection escalation record (`PENDING` while `granted` is false).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationRecord {
    pub first_request_at: Timestamp,
    pub granted: bool,
}

/// Result of presenting the escalation token once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationOutcome {
    /// First token (or first after the window lapsed); waiting for confirmation.
    Pending,
    /// Second token inside the window; privileged commands are unlocked.
    Granted,
    /// Token repeated by a connection that is already granted.
    AlreadyGranted,
}

impl EscalationRecord {
    /// Advance the handshake for one token.
    ///
    /// A token arriving more than `window_ms` after `first_request_at`
    /// restarts the record, even for a connection that had been granted.
    pub fn advance(
        record: Option<EscalationRecord>,
        now: Timestamp,
        window_ms: i64,
    ) -> (EscalationRecord, EscalationOutcome) {
        match record {
            Some(record) if now.millis_since(record.first_request_at) <= window_ms => {
                if record.granted {
                    (record, EscalationOutcome::AlreadyGranted)
                } else {
                    (
                        EscalationRecord {
                            granted: true,
                            ..record
                        },
                        EscalationOutcome::Granted,
                    )
                }
            }
            _ => (
                EscalationRecord {
                    first_request_at: now,
                    granted: false,
                },
                EscalationOutcome::Pending,
            ),
        }
    }
}

/// A privileged command recognised in a chat message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationCommand {
    /// The bare prefix: one step of the escalation handshake.
    Escalate,
    Help,
    Suspend,
    Resume,
    SlowMode(bool),
    Purge,
    Kick(String),
    Restart,
    Unknown(String),
}

impl ModerationCommand {
    /// Parse a chat body. Returns `None` when the body is ordinary chat.
    ///
    /// Keywords are case-insensitive and may be separated by any whitespace;
    /// the kick target keeps the casing it was typed with.
    pub fn parse(body: &str) -> Option<ModerationCommand> {
        let rest = strip_keyword(body.trim(), "server")?;
        let rest = strip_keyword(rest, "init")?;

        if rest.is_empty() {
            return Some(ModerationCommand::Escalate);
        }
        if let Some(target) = strip_keyword(rest, "kick") {
            if target.is_empty() {
                return Some(ModerationCommand::Unknown(rest.to_string()));
            }
            return Some(ModerationCommand::Kick(target.to_string()));
        }

        let words: Vec<String> = rest.split_whitespace().map(str::to_lowercase).collect();
        let words: Vec<&str> = words.iter().map(String::as_str).collect();
        let command = match words.as_slice() {
            ["help"] => ModerationCommand::Help,
            ["suspend"] => ModerationCommand::Suspend,
            ["resume"] => ModerationCommand::Resume,
            ["slowmode", "on"] => ModerationCommand::SlowMode(true),
            ["slowmode", "off"] => ModerationCommand::SlowMode(false),
            ["purge"] => ModerationCommand::Purge,
            ["restart"] => ModerationCommand::Restart,
            _ => ModerationCommand::Unknown(rest.to_string()),
        };
        Some(command)
    }
}

/// Strip a leading whole-word `keyword` (ASCII case-insensitive) and the
/// whitespace after it.
fn strip_keyword<'a>(input: &'a str, keyword: &str) -> Option<&'a str> {
    let head = input.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let tail = &input[keyword.len()..];
    match tail.chars().next() {
        None => Some(tail),
        Some(c) if c.is_whitespace() => Some(tail.trim_start()),
        Some(_) => None,
    }
}

/// Help text listing the privileged commands.
pub fn help_text() -> String {
    [
        "Admin commands:",
        "  server init suspend         suspend chat for everyone",
        "  server init resume          resume chat",
        "  server init slowmode on|off toggle slow mode",
        "  server init purge           clear the chat history",
        "  server init kick <name>     kick a participant",
        "  server init restart         restart the server",
    ]
    .join("\n")
}

/// Key of a scheduled moderation countdown.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CountdownKey {
    Kick(ConnectionId),
    Purge,
    Suspend,
    Restart,
}

impl fmt::Display for CountdownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountdownKey::Kick(target) => write!(f, "kick:{}", target),
            CountdownKey::Purge => f.write_str("purge"),
            CountdownKey::Suspend => f.write_str("suspend"),
            CountdownKey::Restart => f.write_str("restart"),
        }
    }
}
