//! Turning server replies into index plans.
//!
//! Plans are built and validated before any local array is touched, so a
//! reply that does not fit the local table leaves it unchanged.

use crate::error::Error;

/// Permutation described by a move reply.
///
/// Each listed index `i` lands at `i + delta`; every other entity keeps its
/// relative order and fills the remaining positions. This holds whether the
/// reply lists the moved block or the neighbours it displaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftPlan {
    /// `order[new] = old`.
    order: Vec<usize>,
}

impl ShiftPlan {
    /// Builds the plan for a list of length `len`.
    ///
    /// Fails if a listed index or its target is out of range, or two targets
    /// collide. A delta that is not uniform across the reply shows up here.
    pub fn new(len: usize, indexes: &[usize], delta: i64) -> Result<Self, Error> {
        let mut slots: Vec<Option<usize>> = vec![None; len];
        let mut shifted = vec![false; len];

        for &old in indexes {
            if old >= len {
                return Err(Error::reconciliation(format!(
                    "moved index {} is outside a table of {}",
                    old, len
                )));
            }
            if shifted[old] {
                continue;
            }
            let target = i64::try_from(old)
                .ok()
                .and_then(|old| old.checked_add(delta))
                .and_then(|target| usize::try_from(target).ok())
                .filter(|&target| target < len)
                .ok_or_else(|| {
                    Error::reconciliation(format!(
                        "index {} shifted by {} leaves a table of {}",
                        old, delta, len
                    ))
                })?;
            if slots[target].is_some() {
                return Err(Error::reconciliation(format!(
                    "two entities shifted onto index {}",
                    target
                )));
            }
            slots[target] = Some(old);
            shifted[old] = true;
        }

        let mut rest = (0..len).filter(|&old| !shifted[old]);
        let order = slots
            .into_iter()
            .map(|slot| slot.or_else(|| rest.next()))
            .collect::<Option<Vec<usize>>>()
            .ok_or_else(|| Error::reconciliation("move reply does not describe a permutation"))?;

        Ok(Self { order })
    }

    /// Returns `true` if applying the plan changes nothing.
    pub fn is_identity(&self) -> bool {
        self.order.iter().enumerate().all(|(new, &old)| new == old)
    }

    /// Old index of the entity that ends up at `new`.
    pub fn source_of(&self, new: usize) -> Option<usize> {
        self.order.get(new).copied()
    }

    /// Reorders `items`. Lengths must match; a mismatched list is left alone.
    pub fn apply<T>(&self, items: &mut Vec<T>) -> bool {
        if items.len() != self.order.len() {
            return false;
        }
        let mut taken: Vec<Option<T>> = items.drain(..).map(Some).collect();
        items.extend(self.order.iter().filter_map(|&old| taken[old].take()));
        true
    }
}

/// Indices a delete reply removed, validated and sorted highest first so
/// that splicing one does not shift the next.
pub fn deletion_order(len: usize, indexes: &[usize]) -> Result<Vec<usize>, Error> {
    if let Some(&bad) = indexes.iter().find(|&&i| i >= len) {
        return Err(Error::reconciliation(format!(
            "deleted index {} is outside a table of {}",
            bad, len
        )));
    }
    let mut order = indexes.to_vec();
    order.sort_unstable_by(|a, b| b.cmp(a));
    order.dedup();
    Ok(order)
}

/// Checks an insertion index returned by the server.
pub fn insertion_index(len: usize, index: usize) -> Result<usize, Error> {
    if index > len {
        return Err(Error::reconciliation(format!(
            "inserted index {} is past the end of a table of {}",
            index, len
        )));
    }
    Ok(index)
}
