use std::collections::HashMap;

/// Gestalt pattern-matching similarity in `[0, 1]`.
///
/// Twice the number of characters in matching blocks over the combined length,
/// where blocks come from repeatedly taking the longest common substring and
/// recursing on both sides of it.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = matching_chars(&a, &b);
    2.0 * matched as f64 / total as f64
}

/// Best candidate whose ratio against `word` reaches `cutoff`.
///
/// The ratio is not symmetric; each candidate is scored as the first operand
/// against `word`. Equal ratios resolve to the lexicographically greater
/// candidate so the answer does not depend on candidate order.
pub fn closest_match<'a, I>(word: &str, candidates: I, cutoff: f64) -> Option<(&'a str, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, f64)> = None;
    for candidate in candidates {
        let score = sequence_ratio(candidate, word);
        if score < cutoff {
            continue;
        }
        let better = match best {
            None => true,
            Some((best_name, best_score)) => {
                score > best_score || (score == best_score && candidate > best_name)
            }
        };
        if better {
            best = Some((candidate, score));
        }
    }
    best
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut b_positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (idx, ch) in b.iter().enumerate() {
        b_positions.entry(*ch).or_default().push(idx);
    }

    let mut matched = 0usize;
    let mut pending = vec![(0usize, a.len(), 0usize, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, &b_positions, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }
    matched
}

// Longest block a[i..i+k] == b[j..j+k] inside the window; earliest i wins, then earliest j.
fn longest_match(
    a: &[char],
    b_positions: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0usize);
    let mut run_ending_at: HashMap<usize, usize> = HashMap::new();
    for (i, ch) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next_runs = HashMap::new();
        if let Some(positions) = b_positions.get(ch) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| run_ending_at.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_runs.insert(j, k);
                if k > best_k {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_k = k;
                }
            }
        }
        run_ending_at = next_runs;
    }
    (best_i, best_j, best_k)
}

#[cfg(test)]
mod tests {
    use super::{closest_match, sequence_ratio};

    #[test]
    fn ratio_bounds() {
        assert_eq!(sequence_ratio("", ""), 1.0);
        assert_eq!(sequence_ratio("abc", ""), 0.0);
        assert_eq!(sequence_ratio("joel embiid", "joel embiid"), 1.0);
        assert_eq!(sequence_ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn ratio_matches_known_values() {
        // "abcd" vs "bcde": one block "bcd" -> 2*3/8
        assert!((sequence_ratio("abcd", "bcde") - 0.75).abs() < 1e-12);
        // "lebron jame" vs "lebron james": 11 shared chars over 23
        assert!((sequence_ratio("lebron jame", "lebron james") - 22.0 / 23.0).abs() < 1e-12);
    }

    #[test]
    fn ratio_is_built_from_recursive_blocks() {
        // blocks "a", "b" -> 2*2/6
        assert!((sequence_ratio("axb", "ayb") - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn closest_match_respects_cutoff() {
        let names = ["stephen curry", "seth curry", "lebron james"];
        let hit = closest_match("stephen cury", names.iter().copied(), 0.82);
        assert_eq!(hit.map(|(name, _)| name), Some("stephen curry"));
        assert!(closest_match("kevin durant", names.iter().copied(), 0.82).is_none());
    }

    #[test]
    fn candidate_is_the_first_operand() {
        assert!((sequence_ratio("nii eainai", "nii eani") - 7.0 / 9.0).abs() < 1e-12);
        assert!((sequence_ratio("nii eani", "nii eainai") - 8.0 / 9.0).abs() < 1e-12);
        assert!(closest_match("nii eani", ["nii eainai"], 0.82).is_none());
        assert!(closest_match("nii eainai", ["nii eani"], 0.82).is_some());
    }

    #[test]
    fn closest_match_ties_prefer_greater_key() {
        let names = ["abx", "aby"];
        let hit = closest_match("abz", names.iter().copied(), 0.5);
        assert_eq!(hit.map(|(name, _)| name), Some("aby"));
    }
}
