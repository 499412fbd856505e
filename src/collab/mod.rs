//! Interfaces to the systems around the renderer: where puzzles and images come from and where
//! finished videos go.

/// Image lookup for puzzle items.
pub mod images;
/// Puzzle catalogue and the used-puzzle ledger.
pub mod puzzle;
/// Upload with retry.
pub mod upload;
