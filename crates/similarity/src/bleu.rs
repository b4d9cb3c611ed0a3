use std::collections::HashMap;
use std::hash::Hash;

/// How zero n-gram precisions are handled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Smoothing {
    /// Any zero precision makes the whole score zero.
    None,
    /// A zero numerator is replaced by `epsilon / denominator`.
    Epsilon(f64),
    /// Add one to numerator and denominator for orders 2 and up.
    AddOne,
}

impl Default for Smoothing {
    fn default() -> Self {
        Smoothing::Epsilon(0.1)
    }
}

/// Clipped n-gram matches over hypothesis n-grams for a single order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision {
    pub matched: usize,
    pub total: usize,
}

impl Smoothing {
    fn apply(&self, precisions: &[Precision]) -> Vec<f64> {
        precisions
            .iter()
            .enumerate()
            .map(|(order, p)| match *self {
                Smoothing::None => p.matched as f64 / p.total as f64,
                Smoothing::Epsilon(epsilon) if p.matched == 0 => epsilon / p.total as f64,
                Smoothing::Epsilon(_) => p.matched as f64 / p.total as f64,
                Smoothing::AddOne if order > 0 => {
                    (p.matched + 1) as f64 / (p.total + 1) as f64
                }
                Smoothing::AddOne => p.matched as f64 / p.total as f64,
            })
            .collect()
    }
}

/// Sentence-level BLEU.
///
/// Scores a hypothesis token sequence against one or more references. The
/// result is in `[0, 1]`; identical sequences of at least `max_order` tokens
/// score exactly 1.
#[derive(Debug, Clone)]
pub struct SentenceBleu {
    weights: Vec<f64>,
    smoothing: Smoothing,
}

impl Default for SentenceBleu {
    fn default() -> Self {
        Self {
            weights: vec![0.25; 4],
            smoothing: Smoothing::default(),
        }
    }
}

impl SentenceBleu {
    /// `weights[i]` applies to (i + 1)-grams. An empty weight vector falls
    /// back to the uniform 4-gram default.
    pub fn new(weights: Vec<f64>, smoothing: Smoothing) -> Self {
        if weights.is_empty() {
            return Self {
                smoothing,
                ..Self::default()
            };
        }
        Self { weights, smoothing }
    }

    pub fn with_smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn max_order(&self) -> usize {
        self.weights.len()
    }

    /// Score `hypothesis` against a single reference.
    pub fn similarity<T: Eq + Hash>(&self, reference: &[T], hypothesis: &[T]) -> f64 {
        self.score(&[reference], hypothesis)
    }

    pub fn score<T: Eq + Hash>(&self, references: &[&[T]], hypothesis: &[T]) -> f64 {
        if references.is_empty() {
            return 0.0;
        }

        let precisions: Vec<Precision> = (1..=self.max_order())
            .map(|n| modified_precision(references, hypothesis, n))
            .collect();

        // No unigram overlap at all
        if precisions[0].matched == 0 {
            return 0.0;
        }

        let smoothed = self.smoothing.apply(&precisions);
        if smoothed.iter().any(|&p| p <= 0.0) {
            return 0.0;
        }

        let log_sum: f64 = self
            .weights
            .iter()
            .zip(&smoothed)
            .map(|(w, p)| w * p.ln())
            .sum();

        let ref_len = closest_ref_length(references, hypothesis.len());
        brevity_penalty(ref_len, hypothesis.len()) * log_sum.exp()
    }
}

fn ngram_counts<T: Eq + Hash>(tokens: &[T], n: usize) -> HashMap<&[T], usize> {
    let mut counts = HashMap::new();
    if n == 0 || tokens.len() < n {
        return counts;
    }
    for gram in tokens.windows(n) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

/// Hypothesis n-gram counts clipped by the maximum count in any reference.
pub fn modified_precision<T: Eq + Hash>(
    references: &[&[T]],
    hypothesis: &[T],
    n: usize,
) -> Precision {
    let hyp_counts = ngram_counts(hypothesis, n);

    let mut max_ref_counts: HashMap<&[T], usize> = HashMap::new();
    for reference in references {
        for (gram, count) in ngram_counts(reference, n) {
            let entry = max_ref_counts.entry(gram).or_insert(0);
            *entry = (*entry).max(count);
        }
    }

    let matched = hyp_counts
        .iter()
        .map(|(gram, &count)| count.min(max_ref_counts.get(gram).copied().unwrap_or(0)))
        .sum();
    let total: usize = hyp_counts.values().sum();

    Precision {
        matched,
        total: total.max(1),
    }
}

/// Reference length nearest the hypothesis length; ties go to the shorter one.
fn closest_ref_length<T>(references: &[&[T]], hyp_len: usize) -> usize {
    references
        .iter()
        .map(|r| r.len())
        .min_by_key(|&len| (len.abs_diff(hyp_len), len))
        .unwrap_or(0)
}

pub fn brevity_penalty(ref_len: usize, hyp_len: usize) -> f64 {
    if hyp_len > ref_len {
        1.0
    } else if hyp_len == 0 {
        0.0
    } else {
        (1.0 - ref_len as f64 / hyp_len as f64).exp()
    }
}
