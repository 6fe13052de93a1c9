// Licensed under the MIT license or the Apache License, Version 2.0, at your option. You may not
// copy, modify, or distribute this file except in compliance with said license.

//! Item matching components: unique-prefix inference and "did you mean" suggestions.

/// Find a unique candidate whose name starts with `needle`.
///
/// Returns `Some` only if exactly one candidate qualifies; an exact match is not handled here —
/// callers are expected to have already tried an exact lookup first.
pub fn find_unique_prefix_match<'a, T>(
    needle: &str,
    haystack: impl Iterator<Item = &'a T>,
    get_name: impl Fn(&'a T) -> &'a str,
) -> Option<&'a T> {
    let mut matched = None;
    let mut count = 0usize;
    for candidate in haystack {
        if get_name(candidate).starts_with(needle) {
            count += 1;
            matched = Some(candidate);
            if count > 1 {
                return None;
            }
        }
    }
    if count == 1 {
        matched
    } else {
        None
    }
}

/// Suggest up to 3 candidate names for an unrecognised `probe`, using classic unit-cost
/// Levenshtein distance. Candidates farther than 3 edits away are dropped; the rest are returned
/// in ascending-distance order (ties keep the candidates' original relative order).
pub fn suggest<'a>(probe: &str, candidates: impl Iterator<Item = &'a str>) -> Vec<String> {
    const MAX_DISTANCE: usize = 3;
    const MAX_SUGGESTIONS: usize = 3;

    let probe = probe.trim_start_matches('-');

    let mut scored: Vec<(usize, &str)> = candidates
        .map(|candidate| (strsim::levenshtein(probe, candidate), candidate))
        .filter(|(distance, _)| *distance <= MAX_DISTANCE)
        .collect();

    scored.sort_by_key(|(distance, _)| *distance);
    scored.truncate(MAX_SUGGESTIONS);
    scored.into_iter().map(|(_, name)| name.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_unique_prefix() {
        let names = ["verbose", "version"];
        assert_eq!(find_unique_prefix_match("verb", names.iter(), |s| *s), Some(&"verbose"));
    }

    #[test]
    fn ambiguous_prefix_yields_none() {
        let names = ["verbose", "version"];
        assert_eq!(find_unique_prefix_match("ver", names.iter(), |s| *s), None);
    }

    #[test]
    fn suggestions_sorted_by_distance_and_capped() {
        let names = ["force", "foo", "forced", "bar", "verbose"];
        let got = suggest("forc", names.iter().copied());
        assert_eq!(got, vec!["force", "forced", "foo"]);
    }

    #[test]
    fn suggestions_respect_distance_cutoff() {
        let names = ["completely-unrelated-name"];
        assert!(suggest("xyz", names.iter().copied()).is_empty());
    }

    #[test]
    fn suggestions_strip_leading_dashes_from_probe() {
        let names = ["force"];
        assert_eq!(suggest("--forc", names.iter().copied()), vec!["force"]);
    }
}
