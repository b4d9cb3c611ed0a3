use unicode_segmentation::UnicodeSegmentation;

/// Splits text into the token sequence the similarity metric compares.
///
/// Implement this to plug in a morphological analyzer (e.g. a MeCab binding)
/// for languages without whitespace word boundaries.
pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Tokens are maximal runs of non-whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceSegmenter;

impl Segmenter for WhitespaceSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }
}

/// UAX #29 word-boundary segmentation.
///
/// Ideographs and hiragana come out one character per token, katakana runs
/// stay together, and punctuation is kept as its own token. Whitespace
/// segments are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeWordSegmenter;

impl Segmenter for UnicodeWordSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        text.split_word_bounds()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl<S: Segmenter + ?Sized> Segmenter for Box<S> {
    fn segment(&self, text: &str) -> Vec<String> {
        (**self).segment(text)
    }
}
