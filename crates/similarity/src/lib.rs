pub mod bleu;
pub mod segmenter;

pub use bleu::{Precision, SentenceBleu, Smoothing};
pub use segmenter::{Segmenter, UnicodeWordSegmenter, WhitespaceSegmenter};

/// Segment both texts with `segmenter` and score `candidate` against `target`.
pub fn text_similarity(
    bleu: &SentenceBleu,
    segmenter: &dyn Segmenter,
    target: &str,
    candidate: &str,
) -> f64 {
    let reference = segmenter.segment(target);
    let hypothesis = segmenter.segment(candidate);
    bleu.similarity(&reference, &hypothesis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_similarity_whitespace() {
        let bleu = SentenceBleu::default();
        let score = text_similarity(
            &bleu,
            &WhitespaceSegmenter,
            "the cat sat on the mat",
            "the cat sat on the mat",
        );
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_similarity_japanese() {
        let bleu = SentenceBleu::default();
        let seg = UnicodeWordSegmenter;
        let close = text_similarity(&bleu, &seg, "日本の首都はどこですか", "日本の首都はどこ");
        let far = text_similarity(&bleu, &seg, "日本の首都はどこですか", "猫が好き");
        assert!(close > far);
        assert!(close > 0.0);
    }
}
