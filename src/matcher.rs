//! Locale fallback: picks which merged tree a request resolves against.
//!
//! The chain is exact identifier, then language and region without script,
//! then bare language. It stops at the first hit and never falls through to a
//! default locale.

use serde::Serialize;
use tracing::debug;

use crate::{error::Error, locale::LocaleId, store::LocalizationStore, tree::Node};

/// Which step of the fallback chain produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    LanguageRegion,
    Language,
}

#[derive(Debug, Clone, Copy)]
pub struct LocaleMatch<'s> {
    /// The store key that matched; may be less specific than the request.
    pub locale: &'s LocaleId,
    pub kind: MatchKind,
    pub tree: &'s Node,
}

/// Selects the tree for `requested` from `store`.
///
/// # Errors
///
/// Returns `Error::LocaleNotFound` when no step of the chain matches.
pub fn resolve_tree<'s>(
    store: &'s LocalizationStore,
    requested: &LocaleId,
) -> Result<LocaleMatch<'s>, Error> {
    let candidates = [
        (requested.clone(), MatchKind::Exact),
        (requested.without_script(), MatchKind::LanguageRegion),
        (requested.language_only(), MatchKind::Language),
    ];

    for (candidate, kind) in candidates {
        if let Some((locale, tree)) = store.entry(&candidate) {
            if kind != MatchKind::Exact {
                debug!(requested = %requested, matched = %locale, ?kind, "locale fallback");
            }
            return Ok(LocaleMatch { locale, kind, tree });
        }
    }

    Err(Error::LocaleNotFound {
        locale: requested.clone(),
    })
}
