//! Fuzzy Lookup Module
//! Maps a free-text search phrase onto existing categorical values, so the
//! explorer's search box can drive the same constraint machinery as the
//! dropdowns.

use polars::prelude::DataFrame;
use tracing::debug;

use super::constraint::ConstraintSet;
use super::filter::{filter, options_for, FilterError};

/// Similarity between a query and a candidate on a 0-100 scale.
///
/// Both sides are lower-cased and tokenized; the score is the better of a
/// token-sorted normalized Levenshtein ratio (word order does not matter)
/// and a token-set ratio (a candidate fully contained in a longer query
/// still scores highly, the way the explorer matches a province name
/// inside a whole search phrase).
pub fn similarity(query: &str, candidate: &str) -> u32 {
    let a = tokens(query);
    let b = tokens(candidate);

    let sort_ratio = ratio(&a.join(" "), &b.join(" "));

    let common: Vec<&String> = a.iter().filter(|t| b.contains(*t)).collect();
    let set_ratio = if common.is_empty() {
        sort_ratio
    } else {
        let mut dedup: Vec<&str> = Vec::new();
        for t in &common {
            if !dedup.contains(&t.as_str()) {
                dedup.push(t.as_str());
            }
        }
        let base = dedup.join(" ");
        let rest_a = with_rest(&base, &a, &b);
        let rest_b = with_rest(&base, &b, &a);
        ratio(&base, &rest_a)
            .max(ratio(&base, &rest_b))
            .max(ratio(&rest_a, &rest_b))
    };

    sort_ratio.max(set_ratio)
}

fn ratio(a: &str, b: &str) -> u32 {
    (strsim::normalized_levenshtein(a, b) * 100.0).round() as u32
}

/// Sorted lower-case whitespace tokens.
fn tokens(text: &str) -> Vec<String> {
    let mut out: Vec<String> = text
        .to_lowercase()
        .split_whitespace()
        .map(|t| t.to_string())
        .collect();
    out.sort_unstable();
    out
}

/// The common-token base followed by one side's leftover tokens.
fn with_rest(base: &str, side: &[String], other: &[String]) -> String {
    let rest: Vec<&str> = side
        .iter()
        .filter(|t| !other.contains(*t))
        .map(|t| t.as_str())
        .collect();
    if rest.is_empty() {
        base.to_string()
    } else {
        format!("{base} {}", rest.join(" "))
    }
}

/// Best approximate match for `query` among `candidates`, or `None` when
/// the top score falls strictly below `threshold`. Ties keep the earliest
/// candidate, so results are reproducible for a fixed candidate order.
pub fn best_match<'a, I>(query: &str, candidates: I, threshold: u32) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&str, u32)> = None;
    for candidate in candidates {
        let score = similarity(query, candidate);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }
    match best {
        Some((candidate, score)) if score >= threshold => Some(candidate),
        _ => None,
    }
}

/// Translate a free-text query into a constraint set.
///
/// Each listed column is matched independently against its own distinct
/// values, so one phrase can pin several columns at once (a series name
/// and a province, say). A match is kept only if applying it still leaves
/// rows; a query that matches nothing yields an empty set, which callers
/// render as a "dataset not found" prompt rather than an error.
pub fn constraints_from_query(
    df: &DataFrame,
    query: &str,
    columns: &[&str],
    threshold: u32,
) -> Result<ConstraintSet, FilterError> {
    let mut constraints = ConstraintSet::new();

    for column in columns {
        let candidates = options_for(df, column, &constraints)?;
        let Some(matched) =
            best_match(query, candidates.iter().map(|s| s.as_str()), threshold)
        else {
            continue;
        };

        let tentative = constraints.clone().with(*column, matched);
        if filter(df, &tentative)?.height() > 0 {
            debug!(column = *column, matched, "query matched");
            constraints = tentative;
        }
    }

    Ok(constraints)
}
