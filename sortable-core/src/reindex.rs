//! Subset reindexing.
//!
//! Given the full previous ordering and a new ordering for some of its
//! members, permute only the members: they keep the slots they occupied,
//! filled in the new order. Everything else stays where it was.
//!
//! ```text
//! full   = [a, b, c, d, e, f]      subset slots: 0, 2, 4
//! subset = [e, a, c]
//! result = [e, b, a, d, c, f]
//! ```

use crate::error::{SortError, SortResult};
use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

/// Rewrites `full` so the slots held by members of `new_subset` are filled,
/// in ascending slot order, with `new_subset` in the order given.
///
/// Fails with [`SortError::InputMismatch`] when the number of slots found
/// differs from `new_subset.len()`: an element missing from `full`, a
/// duplicate in `new_subset`, or a member appearing twice in `full`.
/// `full` is left untouched on error.
pub fn reorder_subset_in_place<T>(full: &mut [T], new_subset: &[T]) -> SortResult<()>
where
    T: Eq + Hash + Clone + Display,
{
    let members: HashSet<&T> = new_subset.iter().collect();
    let slots: Vec<usize> = full
        .iter()
        .enumerate()
        .filter(|(_, item)| members.contains(item))
        .map(|(slot, _)| slot)
        .collect();

    if slots.len() != new_subset.len() {
        let present: HashSet<&T> = full.iter().collect();
        let missing: Vec<String> = new_subset
            .iter()
            .filter(|item| !present.contains(item))
            .map(ToString::to_string)
            .collect();
        let detail = if missing.is_empty() {
            "duplicate ids".to_string()
        } else {
            format!("unknown ids: {}", missing.join(", "))
        };
        return Err(SortError::InputMismatch(format!(
            "{} ids matched {} positions in the current order ({detail})",
            new_subset.len(),
            slots.len(),
        )));
    }

    for (slot, item) in slots.into_iter().zip(new_subset) {
        full[slot] = item.clone();
    }
    Ok(())
}

/// Allocating variant of [`reorder_subset_in_place`].
pub fn reorder_subset<T>(full: &[T], new_subset: &[T]) -> SortResult<Vec<T>>
where
    T: Eq + Hash + Clone + Display,
{
    let mut out = full.to_vec();
    reorder_subset_in_place(&mut out, new_subset)?;
    Ok(out)
}
