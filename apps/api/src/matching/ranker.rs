use crate::matching::scoring::ScoredCandidate;

/// Sorts by total score, highest first, and keeps the top `limit`.
///
/// The sort is stable: equal totals keep the order the pool was loaded in.
/// Returns the kept candidates and the number scored before truncation.
pub fn rank(mut scored: Vec<ScoredCandidate>, limit: usize) -> (Vec<ScoredCandidate>, usize) {
    let total = scored.len();
    scored.sort_by(|a, b| b.breakdown.scores.total.cmp(&a.breakdown.scores.total));
    scored.truncate(limit);
    (scored, total)
}
