//! Command implementations for the `guidebook` binary
//!
//! Each command returns its rendered output so it can be tested without a
//! process boundary.

#![warn(unreachable_pub)]

pub mod commands;

/// Output format selected by `--json`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}
