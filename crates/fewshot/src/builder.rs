use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use similarity::{Segmenter, SentenceBleu, UnicodeWordSegmenter, WhitespaceSegmenter};
use tracing::{debug, info};

use crate::answer::AnswerExtractor;
use crate::config::FewShotConfig;
use crate::corpus::Corpus;
use crate::language::Language;
use crate::prompt::render_prompt;
use crate::schema::ScoredExample;
use crate::selector::{score_candidates, select_top_n};

/// Builds few-shot prompts from the corpus examples most similar to a question.
pub struct PromptBuilder {
    config: FewShotConfig,
    bleu: SentenceBleu,
    en_segmenter: Box<dyn Segmenter>,
    ja_segmenter: Box<dyn Segmenter>,
}

impl PromptBuilder {
    pub fn new(config: FewShotConfig) -> Self {
        Self {
            config,
            bleu: SentenceBleu::default(),
            en_segmenter: Box::new(WhitespaceSegmenter),
            ja_segmenter: Box::new(UnicodeWordSegmenter),
        }
    }

    /// Replace the tokenizer used for `lang`, e.g. with a morphological analyzer.
    pub fn with_segmenter(mut self, lang: Language, segmenter: Box<dyn Segmenter>) -> Self {
        match lang {
            Language::En => self.en_segmenter = segmenter,
            Language::Ja => self.ja_segmenter = segmenter,
        }
        self
    }

    pub fn with_bleu(mut self, bleu: SentenceBleu) -> Self {
        self.bleu = bleu;
        self
    }

    pub fn config(&self) -> &FewShotConfig {
        &self.config
    }

    /// An extractor that reads answers with the same N this builder prompts with.
    pub fn extractor(&self) -> AnswerExtractor {
        AnswerExtractor::from_config(&self.config)
    }

    fn segmenter(&self, lang: Language) -> &dyn Segmenter {
        match lang {
            Language::En => self.en_segmenter.as_ref(),
            Language::Ja => self.ja_segmenter.as_ref(),
        }
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Build a prompt, sampling with the configured seed or OS entropy.
    pub fn build(&self, question: &str, lang: Language) -> Result<String> {
        let mut rng = self.rng();
        self.build_with_rng(question, lang, &mut rng)
    }

    /// Build a prompt, drawing the corpus sample from `rng`.
    ///
    /// The corpus file is re-read on every call.
    pub fn build_with_rng<R: Rng + ?Sized>(
        &self,
        question: &str,
        lang: Language,
        rng: &mut R,
    ) -> Result<String> {
        self.config.validate()?;

        let path = self.config.corpora.for_language(lang);
        let corpus = Corpus::load(path)
            .context(format!("Failed to load {} example corpus", lang))?;

        let selected = self.select_similar(question, lang, &corpus, rng)?;
        let examples: Vec<_> = selected.iter().map(|s| &s.example).collect();

        let prompt = render_prompt(lang, &examples, question)?;

        info!(
            lang = %lang,
            examples = examples.len(),
            prompt_chars = prompt.chars().count(),
            "Built few-shot prompt"
        );

        Ok(prompt)
    }

    /// Sample the corpus and return the N candidates closest to `question`.
    pub fn select_similar<R: Rng + ?Sized>(
        &self,
        question: &str,
        lang: Language,
        corpus: &Corpus,
        rng: &mut R,
    ) -> Result<Vec<ScoredExample>> {
        let sample = corpus.sample(self.config.sample_size, rng)?;
        debug!(
            lang = %lang,
            sample_size = sample.len(),
            corpus_size = corpus.len(),
            "Sampled candidate examples"
        );

        let scored = score_candidates(&self.bleu, self.segmenter(lang), question, &sample);
        let selected = select_top_n(scored, self.config.n_examples, self.config.selection)?;

        for candidate in &selected {
            debug!(
                score = candidate.score,
                question = %candidate.example.question,
                "Selected example"
            );
        }

        Ok(selected)
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(FewShotConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectionOrder;
    use crate::error::FewShotError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_corpus(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    fn english_corpus() -> NamedTempFile {
        write_corpus(&[
            r#"{"question": "What is 2+2", "answers": ["4"]}"#,
            r#"{"question": "Who wrote Hamlet", "answers": ["Shakespeare"]}"#,
            r#"{"question": "What is the capital of France", "answers": ["Paris", "paris"]}"#,
            r#"{"question": "How many legs does a spider have", "answers": ["8"]}"#,
            r#"{"question": "Which planet is largest", "answers": ["Jupiter"]}"#,
            r#"{"question": "What color is the sky", "answers": ["blue"]}"#,
            r#"{"question": "Who discovered penicillin", "answers": ["Alexander Fleming"]}"#,
        ])
    }

    fn japanese_corpus() -> NamedTempFile {
        write_corpus(&[
            r#"{"question": "日本の首都はどこですか", "answers": ["東京"]}"#,
            r#"{"question": "富士山の高さは", "answers": ["3776メートル"]}"#,
            r#"{"question": "一番大きい惑星は", "answers": ["木星"]}"#,
            r#"{"question": "源氏物語の作者は", "answers": ["紫式部"]}"#,
            r#"{"question": "空は何色ですか", "answers": ["青"]}"#,
        ])
    }

    fn builder_for(lang: Language, file: &NamedTempFile, n: usize, sample: usize) -> PromptBuilder {
        let config = FewShotConfig::default()
            .with_examples(n)
            .with_sample_size(sample)
            .with_corpus(lang, file.path());
        PromptBuilder::new(config)
    }

    #[test]
    fn test_prompt_has_n_examples_and_open_target() {
        let file = english_corpus();
        let builder = builder_for(Language::En, &file, 3, 5);
        let mut rng = StdRng::seed_from_u64(3);

        let prompt = builder
            .build_with_rng("What is the capital of Spain", Language::En, &mut rng)
            .unwrap();
        let lines: Vec<&str> = prompt.lines().collect();

        assert_eq!(lines.len(), 1 + 3 + 1);
        assert_eq!(lines[0], "Answer these questions:");
        for line in &lines[1..4] {
            assert!(line.starts_with("Question: ") && line.ends_with(']'), "{}", line);
        }
        assert_eq!(lines[4], "Question: What is the capital of Spain? Answer: [");

        let tail = &prompt[prompt.rfind('[').unwrap()..];
        assert!(!tail.contains(']'));
    }

    #[test]
    fn test_identical_question_is_selected() {
        // Sample covers the whole corpus, so selection is deterministic
        let file = write_corpus(&[
            r#"{"question": "Who wrote Hamlet", "answers": ["Shakespeare"]}"#,
            r#"{"question": "What is 2+2", "answers": ["4"]}"#,
            r#"{"question": "Which planet is largest", "answers": ["Jupiter"]}"#,
            r#"{"question": "How many legs does a spider have", "answers": ["8"]}"#,
            r#"{"question": "Who discovered penicillin", "answers": ["Alexander Fleming"]}"#,
        ]);
        let builder = builder_for(Language::En, &file, 1, 5);

        let prompt = builder.build("What is 2+2", Language::En).unwrap();
        assert!(prompt.contains("Question: What is 2+2? Answer: [4]"), "{}", prompt);
    }

    #[test]
    fn test_japanese_prompt() {
        let file = japanese_corpus();
        let builder = builder_for(Language::Ja, &file, 2, 5);

        let prompt = builder.build("日本の首都は", Language::Ja).unwrap();
        let lines: Vec<&str> = prompt.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "質問を答えてください：");
        assert!(lines[1..3].iter().any(|l| l.contains("「「東京」」")), "{}", prompt);
        assert_eq!(lines[3], "質問： 日本の首都は?　答え：「「");
    }

    #[test]
    fn test_seeded_builds_are_reproducible() {
        let file = english_corpus();
        let config = FewShotConfig::default()
            .with_examples(2)
            .with_sample_size(4)
            .with_seed(11)
            .with_selection(SelectionOrder::Ranked)
            .with_corpus(Language::En, file.path());
        let builder = PromptBuilder::new(config);

        let first = builder.build("Who wrote Macbeth", Language::En).unwrap();
        let second = builder.build("Who wrote Macbeth", Language::En).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_n_larger_than_sample_fails() {
        let file = english_corpus();
        let builder = builder_for(Language::En, &file, 6, 5);

        let err = builder.build("What is 2+2", Language::En).unwrap_err();
        assert_eq!(
            err.downcast_ref::<FewShotError>(),
            Some(&FewShotError::SelectionUnderflow {
                requested: 6,
                available: 5
            })
        );
    }

    #[test]
    fn test_corpus_smaller_than_sample_fails() {
        let file = write_corpus(&[r#"{"question": "What is 2+2", "answers": ["4"]}"#]);
        let builder = builder_for(Language::En, &file, 1, 5);

        let err = builder.build("What is 2+2", Language::En).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FewShotError>(),
            Some(FewShotError::CorpusTooSmall { .. })
        ));
    }

    #[test]
    fn test_missing_corpus_fails() {
        let config = FewShotConfig::default().with_corpus(Language::En, "/nonexistent/en.jsonl");
        let builder = PromptBuilder::new(config);

        let err = builder.build("What is 2+2", Language::En).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read corpus file"));
    }

    #[test]
    fn test_corpus_is_reread_each_call() {
        let mut file = write_corpus(&[r#"{"question": "Who wrote Hamlet", "answers": ["Shakespeare"]}"#]);
        let builder = builder_for(Language::En, &file, 1, 1);

        let first = builder.build("Who wrote Hamlet", Language::En).unwrap();
        assert!(first.contains("[Shakespeare]"));

        writeln!(file, "broken").unwrap();
        assert!(builder.build("Who wrote Hamlet", Language::En).is_err());
    }

    #[test]
    fn test_custom_segmenter_is_used() {
        struct CharSegmenter;
        impl Segmenter for CharSegmenter {
            fn segment(&self, text: &str) -> Vec<String> {
                text.chars().map(|c| c.to_string()).collect()
            }
        }

        let file = japanese_corpus();
        let builder = builder_for(Language::Ja, &file, 1, 5)
            .with_segmenter(Language::Ja, Box::new(CharSegmenter));

        let corpus = Corpus::load(file.path()).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let selected = builder
            .select_similar("富士山の高さは", Language::Ja, &corpus, &mut rng)
            .unwrap();

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].example.question, "富士山の高さは");
        assert!((selected[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_extractor_shares_n() {
        let builder = PromptBuilder::new(FewShotConfig::default().with_examples(2));
        assert_eq!(builder.extractor().index(), 2);
    }
}
