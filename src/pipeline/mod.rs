//! End-to-end render: assets, frame loop, encode, sidecar.

/// Deterministic output naming.
pub mod naming;
/// The render orchestrator and its work-directory handling.
pub mod orchestrator;
