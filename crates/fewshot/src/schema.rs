use serde::{Deserialize, Serialize};

/// One corpus record: a question and its candidate answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub question: String,
    pub answers: Vec<String>,
}

impl Example {
    pub fn new(question: impl Into<String>, answers: Vec<String>) -> Self {
        Self {
            question: question.into(),
            answers,
        }
    }

    /// The canonical answer. Only the first one is ever used in prompts.
    pub fn first_answer(&self) -> Option<&str> {
        self.answers.first().map(String::as_str)
    }
}

/// A sampled example together with its similarity to the target question.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredExample {
    pub example: Example,
    pub score: f64,
}
