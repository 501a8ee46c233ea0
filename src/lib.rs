#![forbid(unsafe_code)]
//! Locale-aware, version-gated model encoding.
//!
//! One data model, many human languages, many historical API versions.
//! Translation documents are merged once into an immutable
//! [`LocalizationStore`]; each request then encodes its models under an
//! [`EncodingContext`] that fixes the locale and the target API version for
//! the whole pass.
//!
//! # Quick Start
//!
//! ```rust
//! use langgate::{
//!     Encode, EncodingContext, Field, KeyPath, LocalizationDocument, SystemVersion,
//!     VersionGate, encode, merge,
//! };
//! use serde_json::json;
//!
//! struct Widget;
//!
//! impl Encode for Widget {
//!     fn fields(&self) -> Vec<Field<'_>> {
//!         vec![
//!             Field::localized("title", KeyPath::new("Widget", "title")),
//!             Field::plain("legacy", true)
//!                 .gated(VersionGate::until(SystemVersion::new(1, 0, 0))),
//!         ]
//!     }
//! }
//!
//! let doc = LocalizationDocument::from_value(
//!     "widgets.json",
//!     json!({ "en": { "Widget": { "title": "Title" } } }),
//! )?;
//! let (store, _collisions) = merge(vec![doc])?;
//!
//! let ctx = EncodingContext::from_headers(
//!     &store,
//!     Some("en-GB"),
//!     Some("2.0.0"),
//!     &SystemVersion::new(2, 1, 0),
//! )?;
//! assert_eq!(encode(&Widget, &ctx)?, json!({ "title": "Title" }));
//! # Ok::<(), langgate::Error>(())
//! ```
//!
//! # Pieces
//!
//! - [`merge`]: deep-merges documents per locale, logging collisions
//! - [`matcher`]: exact, then language+region, then language fallback
//! - [`KeyPath`]: `Owner.parents.property` plus an optional key or index
//! - [`SystemVersion`], [`VersionGate`]: compatibility and per-field gating
//! - [`VersionLadder`]: newest-applicable constructor selection
//! - [`encode`]: the single serialization pass tying it together

pub mod config;
pub mod context;
pub mod document;
pub mod encode;
pub mod error;
pub mod gate;
pub mod key_path;
pub mod ladder;
pub mod locale;
pub mod matcher;
pub mod merge;
pub mod provenance;
pub mod store;
pub mod traits;
pub mod tree;
pub mod version;

// Re-export most used types for easy consumption
pub use crate::{
    config::{EngineConfig, bootstrap},
    context::EncodingContext,
    document::LocalizationDocument,
    encode::{Encode, Field, FieldValue, encode, encode_to_string},
    error::{Error, ErrorCode, LookupFailure},
    gate::VersionGate,
    key_path::{Discriminator, KeyPath},
    ladder::{LadderEntry, VersionLadder, dispatch},
    locale::LocaleId,
    matcher::{LocaleMatch, MatchKind, resolve_tree},
    merge::{CollisionWarning, ConflictStrategy, MergeOptions, merge, merge_with_options},
    store::LocalizationStore,
    tree::{Leaf, Node},
    version::{
        SystemVersion, check_request_version, current_version, install_current_version,
        is_compatible,
    },
};
