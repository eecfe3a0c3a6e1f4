//! evacroute CLI library.
//!
//! Command handlers return plain report values; [`output`] renders them as
//! text or JSON so the binary stays a thin dispatcher.

pub mod commands;
pub mod output;
pub mod terminal;
