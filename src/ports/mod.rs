//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the acquisition core and an
//! external system (time, HTTP, git, shell). Implementations live in
//! `src/adapters/`.

pub mod clock;
pub mod git;
pub mod http;
pub mod shell;

pub use clock::Clock;
pub use git::{CloneDepth, CloneOutcome, GitCloner};
pub use http::HttpProbe;
pub use shell::{ShellExecutor, ShellOutput};
