use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_RESULTS: usize = 5;
pub const DEFAULT_CUTOFF: f64 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchOptions {
    pub max_results: usize,
    pub cutoff: f64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self { max_results: DEFAULT_MAX_RESULTS, cutoff: DEFAULT_CUTOFF }
    }
}

impl MatchOptions {
    /// Cutoff pulled into `0.0..=1.0`; a non-finite cutoff falls back to the default.
    pub fn effective_cutoff(&self) -> f64 {
        if self.cutoff.is_finite() {
            self.cutoff.clamp(0.0, 1.0)
        } else {
            DEFAULT_CUTOFF
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimilarName {
    pub name: String,
    pub score: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matches: Vec<SimilarName>,
}

impl MatchResult {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn names(&self) -> Vec<&str> {
        self.matches.iter().map(|candidate| candidate.name.as_str()).collect()
    }
}

/// Ranks `candidates` by Ratcliff/Obershelp similarity to `query`.
///
/// Keeps candidates scoring at or above the cutoff, best first. Equal scores keep the
/// order the candidates were supplied in, and repeated names are scored once.
pub fn find_similar<I, S>(query: &str, candidates: I, options: MatchOptions) -> MatchResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if query.is_empty() || options.max_results == 0 {
        return MatchResult::default();
    }

    let cutoff = options.effective_cutoff();
    let query_chars: Vec<char> = query.chars().collect();
    let mut seen = HashSet::new();
    let mut scored = Vec::new();

    for candidate in candidates {
        let candidate = candidate.as_ref();
        if !seen.insert(candidate.to_string()) {
            continue;
        }

        let candidate_chars: Vec<char> = candidate.chars().collect();
        if quick_ratio(&candidate_chars, &query_chars) < cutoff {
            continue;
        }

        let score = ratio(&candidate_chars, &query_chars);
        if score >= cutoff {
            scored.push(SimilarName { name: candidate.to_string(), score });
        }
    }

    // sort_by is stable, so ties stay in candidate order.
    scored.sort_by(|left, right| right.score.partial_cmp(&left.score).unwrap_or(Ordering::Equal));
    scored.truncate(options.max_results);

    MatchResult { matches: scored }
}

/// Case-insensitive containment used as a filter predicate. A blank or absent query
/// matches every field.
pub fn contains_match(query: Option<&str>, field: &str) -> bool {
    match query {
        None => true,
        Some(query) if query.is_empty() => true,
        Some(query) => field.to_lowercase().contains(&query.to_lowercase()),
    }
}

/// Similarity in `0.0..=1.0`: twice the matched characters over the combined length.
pub fn similarity_ratio(left: &str, right: &str) -> f64 {
    let left: Vec<char> = left.chars().collect();
    let right: Vec<char> = right.chars().collect();
    ratio(&left, &right)
}

fn ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matched_len(a, b) as f64 / total as f64
}

/// Upper bound on `ratio` from shared character counts alone.
fn quick_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let mut available: HashMap<char, usize> = HashMap::new();
    for ch in b {
        *available.entry(*ch).or_default() += 1;
    }

    let mut shared = 0usize;
    for ch in a {
        if let Some(count) = available.get_mut(ch) {
            if *count > 0 {
                *count -= 1;
                shared += 1;
            }
        }
    }

    2.0 * shared as f64 / total as f64
}

/// Total size of the matching blocks found by recursively taking the longest common
/// substring and descending into the pieces on either side of it.
fn matched_len(a: &[char], b: &[char]) -> usize {
    let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (index, ch) in b.iter().enumerate() {
        positions.entry(*ch).or_default().push(index);
    }

    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, &positions, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }

        total += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    total
}

/// Longest block with `a[i..i+size] == b[j..j+size]` inside the given windows; the
/// earliest `i`, then earliest `j`, wins among equally long blocks.
fn longest_match(
    a: &[char],
    positions: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    let mut run_lengths: HashMap<usize, usize> = HashMap::new();

    for (i, ch) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next_run_lengths = HashMap::new();

        if let Some(indices) = positions.get(ch) {
            for &j in indices {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }

                let size =
                    j.checked_sub(1).and_then(|prev| run_lengths.get(&prev)).copied().unwrap_or(0)
                        + 1;
                next_run_lengths.insert(j, size);

                if size > best_size {
                    best_i = i + 1 - size;
                    best_j = j + 1 - size;
                    best_size = size;
                }
            }
        }

        run_lengths = next_run_lengths;
    }

    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use super::{contains_match, find_similar, similarity_ratio, MatchOptions};

    fn approx(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn buds_names_rank_ahead_and_vacuum_drops_out() {
        let result =
            find_similar("버즈", ["버즈2", "버즈프로", "무선청소기"], MatchOptions::default());

        assert_eq!(result.names(), vec!["버즈2", "버즈프로"]);
        assert!(approx(result.matches[0].score, 0.8));
        assert!(approx(result.matches[1].score, 4.0 / 6.0));
    }

    #[test]
    fn empty_query_returns_nothing() {
        let result = find_similar("", ["버즈2"], MatchOptions::default());
        assert!(result.is_empty());
    }

    #[test]
    fn cutoff_and_limit_are_applied() {
        let candidates = ["galaxy s24", "galaxy s23", "galaxy tab", "galaxy buds", "iphone"];
        let result = find_similar(
            "galaxy s24",
            candidates,
            MatchOptions { max_results: 2, cutoff: 0.6 },
        );

        assert_eq!(result.names(), vec!["galaxy s24", "galaxy s23"]);
        assert!(approx(result.matches[0].score, 1.0));
    }

    #[test]
    fn default_options_return_at_most_five() {
        let candidates =
            ["버즈1", "버즈2", "버즈3", "버즈4", "버즈5", "버즈6", "버즈7", "무선청소기"];
        let result = find_similar("버즈", candidates, MatchOptions::default());

        assert_eq!(result.len(), 5);
        assert_eq!(result.names(), vec!["버즈1", "버즈2", "버즈3", "버즈4", "버즈5"]);
        assert!(result.matches.iter().all(|matched| approx(matched.score, 0.8)));
    }

    #[test]
    fn ties_keep_candidate_order_and_duplicates_collapse() {
        let result = find_similar("ab", ["ax", "ay", "ax", "az"], MatchOptions::default());

        assert_eq!(result.names(), vec!["ax", "ay", "az"]);
    }

    #[test]
    fn zero_limit_and_out_of_range_cutoff_do_not_panic() {
        let none = find_similar("abc", ["abc"], MatchOptions { max_results: 0, cutoff: 0.2 });
        assert!(none.is_empty());

        let clamped =
            find_similar("abc", ["abd", "xyz"], MatchOptions { max_results: 5, cutoff: 7.0 });
        assert!(clamped.is_empty());

        let nan = find_similar("abc", ["abd"], MatchOptions { max_results: 5, cutoff: f64::NAN });
        assert_eq!(nan.names(), vec!["abd"]);
    }

    #[test]
    fn ratio_uses_recursive_matching_blocks() {
        assert!(approx(similarity_ratio("abcd", "bcde"), 0.75));
        assert!(approx(similarity_ratio("", ""), 1.0));
        assert!(approx(similarity_ratio("abc", ""), 0.0));
        // "qabxcd" vs "abycdf": blocks "ab" and "cd" on either side of the mismatch.
        assert!(approx(similarity_ratio("qabxcd", "abycdf"), 8.0 / 12.0));
    }

    #[test]
    fn substring_filter_ignores_case_and_blank_queries() {
        assert!(contains_match(Some("galaxy"), "Samsung GALAXY S24"));
        assert!(!contains_match(Some("pixel"), "Samsung GALAXY S24"));
        assert!(contains_match(Some(""), "anything"));
        assert!(contains_match(None, "anything"));
        assert!(contains_match(Some("버즈"), "갤럭시 버즈3 프로"));
    }
}
