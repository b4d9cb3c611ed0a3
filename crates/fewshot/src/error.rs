use thiserror::Error;

use crate::language::Language;

#[derive(Debug, Error, PartialEq)]
pub enum FewShotError {
    #[error("unsupported language tag: {0:?} (expected \"en\" or \"ja\")")]
    UnsupportedLanguage(String),

    #[error("example count must be at least 1")]
    InvalidExampleCount,

    #[error("cannot select {requested} examples from a sample of {available}")]
    SelectionUnderflow { requested: usize, available: usize },

    #[error("cannot sample {sample_size} examples from a corpus of {corpus_len}")]
    CorpusTooSmall { sample_size: usize, corpus_len: usize },

    #[error("example has no answers: {question:?}")]
    MissingAnswer { question: String },

    #[error("no {lang} answer at index {index}: found {found} delimited spans")]
    AnswerNotFound {
        lang: Language,
        index: usize,
        found: usize,
    },
}
