use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::config::FewShotConfig;
use crate::error::FewShotError;
use crate::language::Language;

static EN_ANSWER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]").expect("valid English answer pattern"));

static JA_ANSWER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"「「(.*?)」」").expect("valid Japanese answer pattern"));

/// Pulls the model's answer span out of generated text.
///
/// English takes the last `[...]` span. Japanese takes the `「「...」」` span at
/// index N (zero-based), where N is the number of example blocks that were put
/// in the prompt. That index is a heuristic for a model that keeps generating
/// past its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerExtractor {
    index: usize,
}

impl AnswerExtractor {
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    pub fn from_config(config: &FewShotConfig) -> Self {
        Self::new(config.n_examples)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// All delimited spans in `output`, in order of appearance.
    pub fn find_all<'a>(output: &'a str, lang: Language) -> Vec<&'a str> {
        let pattern = match lang {
            Language::En => &*EN_ANSWER,
            Language::Ja => &*JA_ANSWER,
        };
        pattern
            .captures_iter(output)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect()
    }

    pub fn extract(&self, output: &str, lang: Language) -> Result<String> {
        let spans = Self::find_all(output, lang);

        let chosen = match lang {
            Language::En => spans.len().checked_sub(1),
            Language::Ja => Some(self.index),
        };

        debug!(lang = %lang, spans = spans.len(), chosen = ?chosen, "Extracting answer");

        match chosen.and_then(|i| spans.get(i)) {
            Some(span) => Ok(span.to_string()),
            None => anyhow::bail!(FewShotError::AnswerNotFound {
                lang,
                index: chosen.unwrap_or(0),
                found: spans.len(),
            }),
        }
    }
}
