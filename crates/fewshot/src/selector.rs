use anyhow::Result;
use similarity::{Segmenter, SentenceBleu};

use crate::config::SelectionOrder;
use crate::error::FewShotError;
use crate::schema::{Example, ScoredExample};

/// Score each candidate's question against the target question.
///
/// The target is the BLEU reference and each candidate the hypothesis, so the
/// target is segmented once.
pub fn score_candidates(
    bleu: &SentenceBleu,
    segmenter: &dyn Segmenter,
    question: &str,
    candidates: &[&Example],
) -> Vec<ScoredExample> {
    let reference = segmenter.segment(question);

    candidates
        .iter()
        .map(|&example| {
            let hypothesis = segmenter.segment(&example.question);
            ScoredExample {
                example: example.clone(),
                score: bleu.similarity(&reference, &hypothesis),
            }
        })
        .collect()
}

/// Keep the `n` highest-scoring candidates.
pub fn select_top_n(
    mut scored: Vec<ScoredExample>,
    n: usize,
    order: SelectionOrder,
) -> Result<Vec<ScoredExample>> {
    if n == 0 {
        anyhow::bail!(FewShotError::InvalidExampleCount);
    }
    if n > scored.len() {
        anyhow::bail!(FewShotError::SelectionUnderflow {
            requested: n,
            available: scored.len(),
        });
    }

    match order {
        SelectionOrder::Ranked => {
            // sort_by is stable, so equal scores keep their sample order
            scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        }
        SelectionOrder::Partition => {
            scored.select_nth_unstable_by(n - 1, |a, b| b.score.total_cmp(&a.score));
        }
    }

    scored.truncate(n);
    Ok(scored)
}
