//! Cassettes: YAML logs of port interactions for recording and replay.

pub mod format;
pub mod recorder;
pub mod replayer;
