use anyhow::Result;

use crate::error::FewShotError;
use crate::language::Language;
use crate::schema::Example;

impl Language {
    pub fn header(&self) -> &'static str {
        match self {
            Language::En => "Answer these questions:",
            Language::Ja => "質問を答えてください：",
        }
    }

    /// Delimiter the model's answer starts after.
    pub fn answer_open(&self) -> &'static str {
        match self {
            Language::En => "[",
            Language::Ja => "「「",
        }
    }

    pub fn answer_close(&self) -> &'static str {
        match self {
            Language::En => "]",
            Language::Ja => "」」",
        }
    }

    // The trailing "?" after the question is intentional, even when the
    // question already ends with one.
    fn question_prefix(&self, question: &str) -> String {
        match self {
            Language::En => format!("Question: {}? Answer: ", question),
            Language::Ja => format!("質問： {}?\u{3000}答え：", question),
        }
    }
}

/// A fully answered block: `Question: {q}? Answer: [{a}]`.
pub fn answered_block(lang: Language, question: &str, answer: &str) -> String {
    format!(
        "{}{}{}{}",
        lang.question_prefix(question),
        lang.answer_open(),
        answer,
        lang.answer_close()
    )
}

/// The target block, left open at the answer delimiter for the model to continue.
pub fn open_block(lang: Language, question: &str) -> String {
    format!("{}{}", lang.question_prefix(question), lang.answer_open())
}

/// Format a prompt from examples that have already been chosen.
///
/// Layout: header, one line per example, then the unanswered target question.
pub fn render_prompt(lang: Language, examples: &[&Example], question: &str) -> Result<String> {
    let blocks = examples
        .iter()
        .map(|example| -> Result<String> {
            let answer = example
                .first_answer()
                .ok_or_else(|| FewShotError::MissingAnswer {
                    question: example.question.clone(),
                })?;
            Ok(answered_block(lang, &example.question, answer))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(format!(
        "{}\n{}\n{}",
        lang.header(),
        blocks.join("\n"),
        open_block(lang, question)
    ))
}
