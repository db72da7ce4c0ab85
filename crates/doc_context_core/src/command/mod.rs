//! Command surface.
//!
//! Commands are declared with stable keys and hotkeys, gated by persisted
//! settings, and executed by a dispatcher built once per activation.

pub mod dispatcher;
pub mod registry;
