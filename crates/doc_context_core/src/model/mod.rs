//! Read-only snapshots of the remote document tree.
//!
//! # Responsibility
//! - Define the canonical shapes handed out by the store client.
//! - Keep path splitting and display-name rules in one place.
//!
//! # Invariants
//! - Every value is a request-scoped copy; nothing here is cached or mutated
//!   after construction.
//! - Logical path and human path are positionally aligned.

pub mod document;
pub mod outline;
