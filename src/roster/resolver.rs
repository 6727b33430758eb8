//! Name resolution — maps a decoded display name to at most one student.
//!
//! Two-phase narrowing: surname first, then given name only when several
//! records share a surname match. Ambiguity is collapsed into no-match
//! rather than surfaced; two students with identical names never resolve.

use crate::roster::store::{Roster, StudentRecord};

/// Whether `name` occurs in `query` under the simple/compound rule.
///
/// A simple name (no internal space) must appear as a whole whitespace-split
/// token, case-sensitively. A compound name matches as a contiguous substring
/// anywhere in the query, whatever the surrounding spacing.
fn name_matches(name: &str, query: &str) -> bool {
    if name.contains(' ') {
        query.contains(name)
    } else {
        query.split_whitespace().any(|token| token == name)
    }
}

/// Resolve a free-form display name to a single roster record.
///
/// Returns `None` when no record matches, and also when the query stays
/// ambiguous after both phases; the two cases are indistinguishable to the
/// caller. A unique surname match is trusted without given-name confirmation.
pub fn resolve<'a>(roster: &'a Roster, query: &str) -> Option<&'a StudentRecord> {
    let candidates: Vec<&StudentRecord> = roster
        .records()
        .iter()
        .filter(|student| name_matches(&student.surname, query))
        .collect();

    // The given-name phase only runs to split shared surnames.
    let finalists: Vec<&StudentRecord> = if candidates.len() > 1 {
        candidates
            .into_iter()
            .filter(|student| name_matches(&student.given_name, query))
            .collect()
    } else {
        candidates
    };

    if finalists.len() == 1 {
        Some(finalists[0])
    } else {
        None
    }
}
