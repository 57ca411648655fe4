use std::cmp::Ordering;

use super::SampleScore;

/// Score paired with the index of its item in the caller's input.
#[derive(Debug)]
pub(crate) struct RankedScore {
    pub(crate) index: usize,
    pub(crate) score: SampleScore,
}

/// Orders scores by descending total and assigns dense 1-based positions.
///
/// `sort_by` is stable, so equal totals keep their input order.
pub(crate) fn rank(scores: Vec<SampleScore>) -> Vec<RankedScore> {
    let mut ranked: Vec<RankedScore> = scores
        .into_iter()
        .enumerate()
        .map(|(index, score)| RankedScore { index, score })
        .collect();

    ranked.sort_by(|left, right| {
        right
            .score
            .total_score
            .partial_cmp(&left.score.total_score)
            .unwrap_or(Ordering::Equal)
    });

    for (offset, entry) in ranked.iter_mut().enumerate() {
        entry.score.final_position = offset + 1;
    }

    ranked
}
