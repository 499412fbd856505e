//! External encoder plumbing.
//!
//! Every process invocation goes through [`command::CommandRunner`] so the encode and mux
//! stages can be exercised without a system `ffmpeg`.

/// Structured process execution.
pub mod command;
/// `ffmpeg` argument builders and the encode/mux stages.
pub mod ffmpeg;
