use crate::core::Candidate;

/// Order candidate indices by descending score.
///
/// The sort is stable, so equal scores keep the order they arrived in.
/// Indices outside `candidates` are dropped.
pub fn rank_by_score(candidates: &[Candidate], indices: &[usize]) -> Vec<usize> {
    let mut ranked: Vec<usize> = indices
        .iter()
        .copied()
        .filter(|&i| i < candidates.len())
        .collect();
    ranked.sort_by(|&a, &b| candidates[b].score.total_cmp(&candidates[a].score));
    ranked
}
