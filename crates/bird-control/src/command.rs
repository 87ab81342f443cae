//! Command vocabulary for the control protocol.
//!
//! BIRD answers in free text rather than a structured grammar, so success is
//! recognised by the literal substrings the daemon prints for each action.
//! The "already" forms count as success: toggling a protocol into the state
//! it already occupies is idempotent, not an error.

use std::fmt;

/// Administrative action applied to a named routing-protocol instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolAction {
    /// `enable <name>` — start the protocol instance.
    Enable,
    /// `disable <name>` — stop the protocol instance.
    Disable,
}

impl ProtocolAction {
    /// Command keyword sent on the wire.
    const fn keyword(self) -> &'static str {
        match self {
            Self::Enable => "enable",
            Self::Disable => "disable",
        }
    }

    /// Past-tense form the daemon uses in its replies.
    const fn applied(self) -> &'static str {
        match self {
            Self::Enable => "enabled",
            Self::Disable => "disabled",
        }
    }

    /// Formats the newline-terminated command line for `protocol`.
    pub(crate) fn command_line(self, protocol: &str) -> String {
        format!("{} {}\n", self.keyword(), protocol)
    }

    /// Whether `reply` reports the action as applied or already in effect.
    pub(crate) fn reply_reports_success(self, protocol: &str, reply: &str) -> bool {
        reply.contains(&format!("{protocol}: already {}", self.applied()))
            || reply.contains(&format!("{protocol}: {}", self.applied()))
    }
}

impl fmt::Display for ProtocolAction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.keyword())
    }
}
