use anyhow::{Context, Result};
use rand::Rng;
use rand::seq::index;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::FewShotError;
use crate::schema::Example;

/// All examples for one language, as read from a JSONL file.
#[derive(Debug, Clone)]
pub struct Corpus {
    path: PathBuf,
    examples: Vec<Example>,
}

impl Corpus {
    pub fn new(path: PathBuf, examples: Vec<Example>) -> Self {
        Self { path, examples }
    }

    /// Read and parse the whole file, one record per line.
    ///
    /// Any unreadable file or unparseable line is an error; nothing is skipped.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read corpus file: {:?}", path))?;

        let examples = Self::parse_jsonl(&content)
            .context(format!("Malformed corpus file: {:?}", path))?;

        debug!(path = %path.display(), records = examples.len(), "Loaded corpus");

        Ok(Self::new(path.to_path_buf(), examples))
    }

    pub fn parse_jsonl(content: &str) -> Result<Vec<Example>> {
        content
            .lines()
            .enumerate()
            .map(|(idx, line)| {
                serde_json::from_str::<Example>(line.trim_end())
                    .context(format!("Failed to parse record on line {}", idx + 1))
            })
            .collect()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Draw `size` distinct examples uniformly at random, without replacement.
    pub fn sample<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Result<Vec<&Example>> {
        if size > self.examples.len() {
            anyhow::bail!(FewShotError::CorpusTooSmall {
                sample_size: size,
                corpus_len: self.examples.len(),
            });
        }

        Ok(index::sample(rng, self.examples.len(), size)
            .into_iter()
            .map(|i| &self.examples[i])
            .collect())
    }
}
