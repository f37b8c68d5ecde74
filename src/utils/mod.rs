//! Generic utility primitives with zero domain knowledge.
//!
//! - `shell` - Shell quoting, redaction, and command-line assembly

pub mod shell;
