use std::collections::HashSet;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{QuizError, QuizResult};
use crate::job::ITEM_COUNT;
use crate::render::frame::ensure_parent_dir;

/// One quiz: a prompt, a rule and four answers sharing a first letter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    /// Stable identifier.
    pub id: String,
    /// Hook caption.
    pub prompt: String,
    /// Instruction caption.
    pub rule: String,
    /// Letter every item starts with.
    pub letter: String,
    /// The answers.
    pub items: Vec<String>,
}

impl Puzzle {
    /// Exactly four items, each starting with `letter` (case-insensitive).
    pub fn validate(&self) -> QuizResult<()> {
        if self.items.len() != ITEM_COUNT {
            return Err(QuizError::validation(format!(
                "puzzle '{}' must contain exactly {ITEM_COUNT} items, got {}",
                self.id,
                self.items.len()
            )));
        }
        let letter = self.letter.to_lowercase();
        if letter.is_empty() {
            return Err(QuizError::validation(format!(
                "puzzle '{}' has an empty letter",
                self.id
            )));
        }
        for item in &self.items {
            if !item.to_lowercase().starts_with(&letter) {
                return Err(QuizError::validation(format!(
                    "item '{item}' does not start with letter '{letter}'"
                )));
            }
        }
        Ok(())
    }
}

/// Supplies the next puzzle to render.
pub trait PuzzleSource {
    /// First puzzle whose id is not in `used`; the first puzzle when all are used.
    fn next_puzzle(&mut self, used: &HashSet<String>) -> QuizResult<Puzzle>;
}

/// Puzzles read from a JSON array.
#[derive(Clone, Debug)]
pub struct JsonPuzzleFile {
    puzzles: Vec<Puzzle>,
}

impl JsonPuzzleFile {
    /// Read and validate every puzzle in `path`. One invalid puzzle fails the whole file.
    pub fn load(path: &Path) -> QuizResult<Self> {
        if !path.is_file() {
            return Err(QuizError::config(format!(
                "puzzles file not found: {}",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read puzzles '{}'", path.display()))?;
        let puzzles: Vec<Puzzle> = serde_json::from_str(&text)
            .map_err(|e| QuizError::serde(format!("parse puzzles '{}': {e}", path.display())))?;
        Self::from_puzzles(puzzles)
    }

    /// Validate an in-memory catalogue.
    pub fn from_puzzles(puzzles: Vec<Puzzle>) -> QuizResult<Self> {
        for p in &puzzles {
            p.validate()?;
        }
        if puzzles.is_empty() {
            return Err(QuizError::validation("no valid puzzles found"));
        }
        Ok(Self { puzzles })
    }

    /// All puzzles, in file order.
    pub fn puzzles(&self) -> &[Puzzle] {
        &self.puzzles
    }
}

impl PuzzleSource for JsonPuzzleFile {
    fn next_puzzle(&mut self, used: &HashSet<String>) -> QuizResult<Puzzle> {
        let chosen = self
            .puzzles
            .iter()
            .find(|p| !used.contains(&p.id))
            .or_else(|| self.puzzles.first())
            .ok_or_else(|| QuizError::validation("no valid puzzles found"))?;
        Ok(chosen.clone())
    }
}

/// Append-only text file of rendered puzzle ids, one per line.
#[derive(Clone, Debug)]
pub struct UsedPuzzleLedger {
    path: PathBuf,
}

impl UsedPuzzleLedger {
    /// Ledger stored at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ledger location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ids recorded so far; empty when the file does not exist.
    pub fn load(&self) -> QuizResult<HashSet<String>> {
        if !self.path.exists() {
            return Ok(HashSet::new());
        }
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read ledger '{}'", self.path.display()))?;
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_owned)
            .collect())
    }

    /// Record `id`.
    pub fn mark_used(&self, id: &str) -> QuizResult<()> {
        ensure_parent_dir(&self.path)?;
        let mut f = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open ledger '{}'", self.path.display()))?;
        writeln!(f, "{id}").with_context(|| format!("append to ledger '{}'", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collab/puzzle.rs"]
mod tests;
