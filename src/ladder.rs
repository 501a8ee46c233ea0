//! Version ladders: picking the constructor for an older client.
//!
//! Each entry pairs an optional lower bound with a constructor. Dispatch
//! scans every entry once and keeps the qualifying entry with the greatest
//! bound; declaration order is irrelevant. An unbounded entry qualifies for
//! every target and ranks below any bounded one.

use std::fmt;

use tracing::debug;

use crate::{error::Error, version::SystemVersion};

type Constructor<C, M> = Box<dyn Fn(&C) -> Result<M, Error> + Send + Sync>;

/// One rung of a ladder.
pub struct LadderEntry<C, M> {
    bound: Option<SystemVersion>,
    construct: Constructor<C, M>,
}

impl<C, M> LadderEntry<C, M> {
    /// An entry used for targets at or above `bound`.
    pub fn new(
        bound: SystemVersion,
        construct: impl Fn(&C) -> Result<M, Error> + Send + Sync + 'static,
    ) -> Self {
        Self {
            bound: Some(bound),
            construct: Box::new(construct),
        }
    }

    /// An entry that qualifies for any target.
    pub fn unbounded(construct: impl Fn(&C) -> Result<M, Error> + Send + Sync + 'static) -> Self {
        Self {
            bound: None,
            construct: Box::new(construct),
        }
    }

    pub fn bound(&self) -> Option<SystemVersion> {
        self.bound
    }

    fn qualifies(&self, target: &SystemVersion) -> bool {
        self.bound.is_none_or(|bound| bound <= *target)
    }
}

impl<C, M> fmt::Debug for LadderEntry<C, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LadderEntry")
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}

/// Picks and invokes the newest entry whose bound is `<= target`.
///
/// # Errors
///
/// Returns `Error::UnsupportedVersion` when nothing qualifies and
/// `Error::DuplicateLadderBound` when the best bound appears twice. Errors
/// from the chosen constructor propagate unchanged.
pub fn dispatch<C, M>(
    entries: &[LadderEntry<C, M>],
    target: &SystemVersion,
    context: &C,
) -> Result<M, Error> {
    let mut best: Option<&LadderEntry<C, M>> = None;
    let mut tied = false;

    for entry in entries.iter().filter(|e| e.qualifies(target)) {
        match best {
            Some(current) if entry.bound < current.bound => {}
            Some(current) if entry.bound == current.bound => tied = true,
            _ => {
                best = Some(entry);
                tied = false;
            }
        }
    }

    let Some(chosen) = best else {
        return Err(Error::UnsupportedVersion(*target));
    };
    if tied {
        return Err(Error::DuplicateLadderBound(chosen.bound));
    }

    debug!(version = %target, bound = ?chosen.bound, "version ladder dispatch");
    (chosen.construct)(context)
}

/// A validated set of ladder entries with no two sharing a bound.
#[derive(Debug)]
pub struct VersionLadder<C, M> {
    entries: Vec<LadderEntry<C, M>>,
}

impl<C, M> VersionLadder<C, M> {
    /// Validates `entries` once, at declaration time.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateLadderBound` if two entries share a bound,
    /// including two unbounded entries.
    pub fn new(entries: Vec<LadderEntry<C, M>>) -> Result<Self, Error> {
        let mut bounds: Vec<Option<SystemVersion>> = entries.iter().map(|e| e.bound).collect();
        bounds.sort();
        if let Some(pair) = bounds.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(Error::DuplicateLadderBound(pair[0]));
        }
        Ok(Self { entries })
    }

    pub fn dispatch(&self, target: &SystemVersion, context: &C) -> Result<M, Error> {
        dispatch(&self.entries, target, context)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(major: u64, minor: u64) -> SystemVersion {
        SystemVersion::new(major, minor, 0)
    }

    fn labelled(bound: SystemVersion, label: &'static str) -> LadderEntry<(), &'static str> {
        LadderEntry::new(bound, move |_| Ok(label))
    }

    fn ladder() -> VersionLadder<(), &'static str> {
        // Deliberately unordered.
        VersionLadder::new(vec![
            labelled(v(2, 1), "2.1"),
            labelled(v(1, 0), "1.0"),
            labelled(v(2, 0), "2.0"),
        ])
        .unwrap()
    }

    #[test]
    fn test_exact_bound_is_selected() {
        assert_eq!(ladder().dispatch(&v(2, 0), &()).unwrap(), "2.0");
    }

    #[test]
    fn test_newest_qualifying_is_selected() {
        assert_eq!(ladder().dispatch(&v(2, 5), &()).unwrap(), "2.1");
        assert_eq!(ladder().dispatch(&v(1, 9), &()).unwrap(), "1.0");
    }

    #[test]
    fn test_below_every_bound_is_unsupported() {
        let err = ladder().dispatch(&SystemVersion::new(0, 9, 0), &()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion(v) if v == SystemVersion::new(0, 9, 0)));
    }

    #[test]
    fn test_unbounded_entry_catches_old_targets() {
        let ladder = VersionLadder::new(vec![
            labelled(v(2, 0), "2.0"),
            LadderEntry::unbounded(|_| Ok("legacy")),
        ])
        .unwrap();
        let bounds: Vec<_> = ladder.entries.iter().map(LadderEntry::bound).collect();
        assert_eq!(bounds, vec![Some(v(2, 0)), None]);
        assert_eq!(ladder.dispatch(&v(0, 1), &()).unwrap(), "legacy");
        assert_eq!(ladder.dispatch(&v(3, 0), &()).unwrap(), "2.0");
    }

    #[test]
    fn test_ladder_size() {
        let ladder = ladder();
        assert_eq!(ladder.len(), 3);
        assert!(!ladder.is_empty());

        let empty: VersionLadder<(), &str> = VersionLadder::new(Vec::new()).unwrap();
        assert!(empty.is_empty());
        assert!(matches!(
            empty.dispatch(&v(1, 0), &()),
            Err(Error::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_duplicate_bounds_rejected_at_declaration() {
        let err = VersionLadder::new(vec![labelled(v(1, 0), "a"), labelled(v(1, 0), "b")])
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateLadderBound(Some(b)) if b == v(1, 0)));
    }

    #[test]
    fn test_raw_dispatch_rejects_ties_it_would_select() {
        let entries = vec![labelled(v(1, 0), "a"), labelled(v(1, 0), "b")];
        assert!(matches!(
            dispatch(&entries, &v(1, 5), &()),
            Err(Error::DuplicateLadderBound(_))
        ));
    }

    #[test]
    fn test_raw_dispatch_ignores_ties_below_the_winner() {
        let entries = vec![
            labelled(v(1, 0), "a"),
            labelled(v(1, 0), "b"),
            labelled(v(2, 0), "c"),
        ];
        assert_eq!(dispatch(&entries, &v(2, 0), &()).unwrap(), "c");
    }

    #[test]
    fn test_constructor_receives_context_and_errors_propagate() {
        let ladder: VersionLadder<u64, u64> = VersionLadder::new(vec![
            LadderEntry::new(v(1, 0), |ctx: &u64| Ok(ctx * 2)),
            LadderEntry::new(v(2, 0), |_: &u64| Err(Error::MissingVersion)),
        ])
        .unwrap();
        assert_eq!(ladder.dispatch(&v(1, 3), &21).unwrap(), 42);
        assert!(matches!(
            ladder.dispatch(&v(2, 0), &21),
            Err(Error::MissingVersion)
        ));
    }
}
