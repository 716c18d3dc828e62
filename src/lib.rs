//! hostgate — egress host gate for AI coding agents.
//!
//! Decides, before a tool call runs, whether it would reach a network
//! destination the operator has not approved. Hosts are matched against a
//! blocklist and an allowlist kept as plain text next to the executable;
//! the blocklist wins, and anything not allowlisted is denied.
//!
//! The `hostgate-hook` binary wires this into the agent's PreToolUse hook;
//! `hostgate` is the operator CLI.

pub mod audit;
pub mod cli;
pub mod gate;
pub mod policy;
pub mod utils;
