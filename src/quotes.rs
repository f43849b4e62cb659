/// Quote board shown under the current image
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct QuoteBoard {
    quotes: Vec<String>,
}

impl QuoteBoard {
    #[cfg(test)]
    pub fn new(quotes: Vec<String>) -> Self {
        Self { quotes }
    }

    /// Read one quote per line. A missing or unreadable file gives an
    /// empty board.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => {
                let quotes: Vec<String> = content
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(str::to_string)
                    .collect();
                debug!("Loaded {} quotes from {}", quotes.len(), path.display());
                Self { quotes }
            }
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("⚠️  Could not read quotes from {}: {}", path.display(), e);
                }
                Self::default()
            }
        }
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.quotes.choose(rng).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
