//! Pure set arithmetic behind the capability checks.
//!
//! Repositories answer "which of these authority ids does the user hold the
//! claimed relation on" with a single batched lookup; the functions here
//! compute what is missing. Keeping this pure makes the conjunctive
//! semantics (ALL requested authorities, duplicates ignored) testable
//! without a database.

use std::collections::HashSet;

use uuid::Uuid;

/// Deduplicate ids, preserving first-seen order.
pub fn dedup_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// The distinct requested ids not present in `granted`. Empty input is
/// vacuously satisfied and returns an empty vector.
pub fn unauthorized_ids(requested: &[Uuid], granted: &[Uuid]) -> Vec<Uuid> {
    let granted: HashSet<Uuid> = granted.iter().copied().collect();
    dedup_ids(requested)
        .into_iter()
        .filter(|id| !granted.contains(id))
        .collect()
}
