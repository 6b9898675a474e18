use crate::error::{MergeConflict, ParseError};

pub trait Reconcile: PartialEq + Sized {
    fn equals_for_merge(&self, other: &Self) -> bool {
        self == other
    }

    fn merge_duplicates(self, other: Self) -> Result<Vec<Self>, MergeConflict> {
        Ok(vec![self, other])
    }
}

/// Folds `records` in order: a record equal for merge to an already accepted one is
/// merged into it, in place; anything else is appended.
pub fn reconcile<R, E, M>(
    records: impl IntoIterator<Item = R>,
    equals_for_merge: E,
    merge: M,
) -> Result<Vec<R>, ParseError>
where
    E: Fn(&R, &R) -> bool,
    M: Fn(R, R) -> Result<Vec<R>, MergeConflict>,
{
    let mut accepted: Vec<R> = Vec::new();
    let mut merged = 0_usize;

    for record in records {
        match accepted
            .iter()
            .position(|existing| equals_for_merge(existing, &record))
        {
            Some(position) => {
                let existing = accepted.remove(position);
                let replacement = merge(existing, record)?;
                accepted.splice(position..position, replacement);
                merged += 1;
            }
            None => accepted.push(record),
        }
    }

    if merged > 0 {
        tracing::debug!(merged, remaining = accepted.len(), "merged duplicate records");
    }

    Ok(accepted)
}

pub fn reconcile_records<R: Reconcile>(
    records: impl IntoIterator<Item = R>,
) -> Result<Vec<R>, ParseError> {
    reconcile(records, R::equals_for_merge, R::merge_duplicates)
}
