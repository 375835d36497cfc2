//! Live adapters for real external interactions.

pub mod clock;
pub mod git;
pub mod http;
pub mod shell;
