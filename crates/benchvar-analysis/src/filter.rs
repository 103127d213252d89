//! Filter-expression construction for targeted re-runs.
//!
//! The executor's filter language matches each `/`-separated element of a
//! benchmark's name against its own anchored regex. Mixing top-level names
//! and `parent/sub` variants in one expression is therefore wrong: a
//! combined `^(Top|Parent)$/^(Sub)$` would require `Top` to have a matching
//! sub-variant and silently exclude it. Top-level names and parent/sub
//! pairs always get separate expressions.

use std::sync::OnceLock;

use regex::Regex;

fn parallelism_suffix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"-\d+$").expect("suffix pattern is valid"))
}

/// Build the filter expressions selecting exactly `names` for re-execution.
///
/// Names are taken with any `-N` parallelism suffix stripped and
/// deduplicated preserving first-seen order. Returns one expression for
/// top-level names, one for `parent/sub` variants, in that order; either is
/// omitted when its group is empty. An empty input yields no expressions.
pub fn build_filters(names: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    let mut top_level: Vec<String> = Vec::new();
    let mut parents: Vec<String> = Vec::new();
    let mut subs: Vec<String> = Vec::new();

    for name in names {
        let base = parallelism_suffix().replace(name, "").into_owned();
        if seen.contains(&base) {
            continue;
        }
        seen.push(base.clone());

        match base.split_once('/') {
            None => top_level.push(base),
            Some((parent, sub)) => {
                if !parents.contains(&parent.to_string()) {
                    parents.push(parent.to_string());
                }
                if !subs.contains(&sub.to_string()) {
                    subs.push(sub.to_string());
                }
            }
        }
    }

    let mut filters = Vec::new();
    if !top_level.is_empty() {
        filters.push(format!("^({})$", top_level.join("|")));
    }
    if !parents.is_empty() {
        filters.push(format!("^({})$/^({})$", parents.join("|"), subs.join("|")));
    }
    filters
}
