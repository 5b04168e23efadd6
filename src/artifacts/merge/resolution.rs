//! Three-way resolution of two sets of changes
//!
//! Given the changes each side made since the merge base (see
//! [`Staged::delta`]), decide path by path what the merge result holds:
//!
//! | mine        | theirs      | result                 |
//! |-------------|-------------|------------------------|
//! | untouched   | changed     | take theirs            |
//! | changed     | untouched   | keep mine (no action)  |
//! | same change | same change | keep mine (no action)  |
//! | changed     | different   | conflict               |
//!
//! A deletion counts as a change, so modify against delete conflicts.

use crate::artifacts::objects::staged::{Staged, StagedChange};
use std::path::PathBuf;

/// The action a merge takes on one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Bring the other side's change into the working tree and stage it
    Take(StagedChange),
    /// Both sides changed the path differently
    Conflict {
        current: StagedChange,
        given: StagedChange,
    },
}

/// Resolve every path changed by `theirs`, in path order
///
/// Paths only `mine` touched need no action and are left out.
pub fn resolve(mine: &Staged, theirs: &Staged) -> Vec<(PathBuf, Resolution)> {
    theirs
        .entries()
        .filter_map(|(path, their_change)| match mine.get(path) {
            None => Some((path.clone(), Resolution::Take(their_change.clone()))),
            Some(my_change) if my_change == their_change => None,
            Some(my_change) => Some((
                path.clone(),
                Resolution::Conflict {
                    current: my_change.clone(),
                    given: their_change.clone(),
                },
            )),
        })
        .collect()
}
