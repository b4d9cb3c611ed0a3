pub mod answer;
pub mod builder;
pub mod config;
pub mod corpus;
pub mod error;
pub mod language;
pub mod prompt;
pub mod schema;
pub mod selector;

pub use answer::AnswerExtractor;
pub use builder::PromptBuilder;
pub use config::{CorpusPaths, FewShotConfig, SelectionOrder};
pub use corpus::Corpus;
pub use error::FewShotError;
pub use language::Language;
pub use prompt::render_prompt;
pub use schema::{Example, ScoredExample};

use anyhow::Result;

/// Build a prompt with `n` examples from the default corpus for `lang`.
pub fn build_prompt(question: &str, lang: Language, n: usize) -> Result<String> {
    let config = FewShotConfig::default().with_examples(n);
    PromptBuilder::new(config).build(question, lang)
}

/// Extract the answer from `output`. `n` must be the example count the prompt
/// was built with.
pub fn extract_answer(output: &str, lang: Language, n: usize) -> Result<String> {
    AnswerExtractor::new(n).extract(output, lang)
}
