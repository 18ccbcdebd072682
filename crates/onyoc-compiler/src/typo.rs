//! Close-match identifier suggestions ("did you mean `foo`?").
//!
//! Mirrors Python's `difflib.get_close_matches` defaults: keep candidates
//! whose Ratcliff/Obershelp similarity ratio against the unresolved name is
//! at least 0.6, and return the single best-ranked match.

/// Find the best fuzzy match for `needle` among `candidates`, or `None` if
/// nothing clears the 0.6 similarity threshold.
pub fn suggest<'a>(needle: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    candidates
        .into_iter()
        .map(|c| (c, ratio(needle, c)))
        .filter(|(_, r)| *r >= 0.6)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(c, _)| c)
}

/// Ratcliff/Obershelp similarity ratio: `2 * matches / (len(a) + len(b))`,
/// where `matches` is the total length of the longest common matching
/// blocks found recursively on either side of each match.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let matches = matching_blocks(&a, &b);
    (2.0 * matches as f64) / (a.len() + b.len()) as f64
}

fn matching_blocks(a: &[char], b: &[char]) -> usize {
    let (len, i, j) = longest_match(a, b);
    if len == 0 {
        return 0;
    }
    matching_blocks(&a[..i], &b[..j]) + len + matching_blocks(&a[i + len..], &b[j + len..])
}

/// Find the longest common contiguous substring, returning (length,
/// start-in-a, start-in-b). Ties broken by earliest position in `a` then
/// `b`, matching `difflib`'s behavior closely enough for suggestion
/// ranking purposes.
fn longest_match(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0usize, 0usize, 0usize);
    for i in 0..a.len() {
        for j in 0..b.len() {
            let mut k = 0;
            while i + k < a.len() && j + k < b.len() && a[i + k] == b[j + k] {
                k += 1;
            }
            if k > best.0 {
                best = (k, i, j);
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_have_ratio_one() {
        assert_eq!(ratio("hello", "hello"), 1.0);
    }

    #[test]
    fn close_typo_is_suggested() {
        let candidates = ["count", "counter", "total"];
        assert_eq!(suggest("coutn", candidates), Some("count"));
    }

    #[test]
    fn unrelated_names_are_not_suggested() {
        let candidates = ["zzz", "qqq"];
        assert_eq!(suggest("foo", candidates), None);
    }
}
