//! Subsequence matching for picker filters.

/// Score `candidate` against a whitespace-separated `query`.
///
/// Every query token must appear in `candidate` as an in-order, case-insensitive
/// subsequence, and tokens must match left to right. Consecutive characters,
/// matches at word boundaries, and matches at the very start score higher;
/// longer candidates score slightly lower. An empty query matches everything
/// with score 0.
///
/// ```rust
/// use gluetty_util::fuzzy::fuzzy_score;
///
/// assert!(fuzzy_score("jr_1_driver", "jr drv").is_some());
/// assert!(fuzzy_score("Output logs", "err").is_none());
/// assert!(fuzzy_score("eu-west-1", "eu") > fuzzy_score("us-east-1 (europe)", "eu"));
/// ```
pub fn fuzzy_score(candidate: &str, query: &str) -> Option<i64> {
    let tokens: Vec<Vec<char>> = query
        .split_whitespace()
        .map(|token| token.chars().flat_map(char::to_lowercase).collect())
        .collect();
    if tokens.is_empty() {
        return Some(0);
    }

    let haystack: Vec<char> = candidate.chars().flat_map(char::to_lowercase).collect();
    let mut cursor = 0;
    let mut score = 0;
    for token in &tokens {
        score += match_token(&haystack, token, &mut cursor)?;
    }
    Some(score - haystack.len() as i64 / 8)
}

fn match_token(haystack: &[char], token: &[char], cursor: &mut usize) -> Option<i64> {
    let mut score = 0;
    let mut previous: Option<usize> = None;
    let mut run = 0;

    for &wanted in token {
        let offset = haystack.get(*cursor..)?.iter().position(|&ch| ch == wanted)?;
        let index = *cursor + offset;

        score += 1;
        if index == 0 {
            score += 8;
        } else if is_boundary(haystack[index - 1]) {
            score += 5;
        }
        if previous.is_some_and(|previous| previous + 1 == index) {
            run += 1;
            score += 3 * run;
        } else {
            run = 0;
        }

        previous = Some(index);
        *cursor = index + 1;
    }
    Some(score)
}

fn is_boundary(ch: char) -> bool {
    !ch.is_alphanumeric()
}
