//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store lookups into hierarchy, outline, navigation and
//!   creation use cases.
//! - Keep host and transport details behind traits.

pub mod create_service;
pub mod hierarchy_service;
pub mod navigation_service;
pub mod outline_service;
