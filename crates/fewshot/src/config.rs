use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FewShotError;
use crate::language::Language;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FewShotConfig {
    /// Number of example blocks in each prompt. Answer extraction for
    /// Japanese reads the span at this same index.
    pub n_examples: usize,
    /// Examples drawn at random per call before scoring. Must be >= n_examples.
    pub sample_size: usize,
    pub selection: SelectionOrder,
    /// Fixed RNG seed for reproducible prompts; OS entropy when unset.
    pub seed: Option<u64>,
    pub corpora: CorpusPaths,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SelectionOrder {
    /// Full stable sort by descending score; ties keep sample order
    #[default]
    Ranked,
    /// Unordered top-N partition; order of the winners is unspecified
    Partition,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CorpusPaths {
    pub en: PathBuf,
    pub ja: PathBuf,
}

impl Default for CorpusPaths {
    fn default() -> Self {
        Self {
            en: PathBuf::from("data/qa_examples_en.jsonl"),
            ja: PathBuf::from("data/qa_examples_ja.jsonl"),
        }
    }
}

impl CorpusPaths {
    pub fn for_language(&self, lang: Language) -> &Path {
        match lang {
            Language::En => &self.en,
            Language::Ja => &self.ja,
        }
    }
}

impl Default for FewShotConfig {
    fn default() -> Self {
        Self::fast()
    }
}

impl FewShotConfig {
    /// Small sample: quick, lower match quality.
    pub fn fast() -> Self {
        Self {
            n_examples: 3,
            sample_size: 5,
            selection: SelectionOrder::Ranked,
            seed: None,
            corpora: CorpusPaths::default(),
        }
    }

    /// Large sample: slower, closer matches.
    pub fn thorough() -> Self {
        Self {
            sample_size: 2000,
            ..Self::fast()
        }
    }

    pub fn with_examples(mut self, n_examples: usize) -> Self {
        self.n_examples = n_examples;
        self
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_selection(mut self, selection: SelectionOrder) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_corpus(mut self, lang: Language, path: impl Into<PathBuf>) -> Self {
        match lang {
            Language::En => self.corpora.en = path.into(),
            Language::Ja => self.corpora.ja = path.into(),
        }
        self
    }

    /// Load a JSON config file; omitted fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;
        let config: Self = serde_json::from_str(&content)
            .context(format!("Failed to parse config file: {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_examples == 0 {
            anyhow::bail!(FewShotError::InvalidExampleCount);
        }
        if self.sample_size < self.n_examples {
            anyhow::bail!(FewShotError::SelectionUnderflow {
                requested: self.n_examples,
                available: self.sample_size,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = FewShotConfig::default();
        assert_eq!(config.n_examples, 3);
        assert_eq!(config.sample_size, 5);
        assert_eq!(config.selection, SelectionOrder::Ranked);
        assert_eq!(
            config.corpora.for_language(Language::Ja),
            Path::new("data/qa_examples_ja.jsonl")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_thorough_preset() {
        let config = FewShotConfig::thorough();
        assert_eq!(config.sample_size, 2000);
        assert_eq!(config.n_examples, 3);
    }

    #[test]
    fn test_validate_rejects_zero_examples() {
        let err = FewShotConfig::default().with_examples(0).validate().unwrap_err();
        assert_eq!(
            err.downcast_ref::<FewShotError>(),
            Some(&FewShotError::InvalidExampleCount)
        );
    }

    #[test]
    fn test_validate_rejects_sample_smaller_than_n() {
        let err = FewShotConfig::default().with_examples(6).validate().unwrap_err();
        assert_eq!(
            err.downcast_ref::<FewShotError>(),
            Some(&FewShotError::SelectionUnderflow {
                requested: 6,
                available: 5
            })
        );
    }

    #[test]
    fn test_partial_json_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"n_examples": 2, "selection": "partition", "corpora": {{"ja": "/tmp/ja.jsonl"}}}}"#
        )
        .unwrap();

        let config = FewShotConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.n_examples, 2);
        assert_eq!(config.sample_size, 5);
        assert_eq!(config.selection, SelectionOrder::Partition);
        assert_eq!(config.corpora.ja, PathBuf::from("/tmp/ja.jsonl"));
        assert_eq!(config.corpora.en, PathBuf::from("data/qa_examples_en.jsonl"));
    }

    #[test]
    fn test_invalid_json_config_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"n_examples": 9}}"#).unwrap();
        assert!(FewShotConfig::from_json_file(file.path()).is_err());
    }
}
