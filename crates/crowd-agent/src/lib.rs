//! `crowd-agent`: agent records and the dynamic element registry.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`agent`]      | `Agent`, `GroupMembership`, `GroupDimension`               |
//! | [`listener`]   | `ElementListener` capability trait, `SharedListener`       |
//! | [`registry`]   | `Registry`: the canonical live set and notification hub    |
//! | [`error`]      | `AgentError`, `AgentResult<T>`                             |
//!
//! # Ownership model
//!
//! The [`Registry`] exclusively owns every live [`Agent`].  Dependent
//! structures (spatial grid, event scheduler, group models) hold only
//! [`AgentId`](crowd_core::AgentId) keys and keep their derived records in
//! sync by subscribing as [`ElementListener`]s.

pub mod agent;
pub mod error;
pub mod listener;
pub mod registry;

#[cfg(test)]
mod tests;

pub use agent::{Agent, GroupDimension, GroupMembership};
pub use error::{AgentError, AgentResult};
pub use listener::{ElementListener, ListenerResult, SharedListener};
pub use registry::Registry;
