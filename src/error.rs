//! All error types for the langgate crate.
//!
//! Load-time failures (`MalformedDocument`, configuration problems) abort
//! startup. Everything raised while resolving or encoding fails the current
//! request as a whole; there is no partial-success mode.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{locale::LocaleId, version::SystemVersion};

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed document `{source_name}` at `{path}`: {reason}")]
    MalformedDocument {
        source_name: String,
        path: String,
        reason: String,
    },

    #[error("invalid locale tag `{0}`")]
    InvalidLocale(String),

    #[error("request does not declare a locale")]
    MissingLocale,

    #[error("no translations match locale `{locale}`")]
    LocaleNotFound { locale: LocaleId },

    #[error("key `{path}` not found{}: {reason}", locale_suffix(.locale))]
    KeyNotFound {
        path: String,
        locale: Option<LocaleId>,
        reason: LookupFailure,
    },

    #[error("invalid version `{0}`, expected `major.minor.patch`")]
    InvalidVersion(String),

    #[error("request does not declare a version")]
    MissingVersion,

    #[error("version {requested} is not compatible with current version {current}")]
    IncompatibleVersion {
        requested: SystemVersion,
        current: SystemVersion,
    },

    #[error("no constructor supports version {0}")]
    UnsupportedVersion(SystemVersion),

    #[error("two ladder entries share the lower bound {}", bound_label(.0))]
    DuplicateLadderBound(Option<SystemVersion>),

    #[error("version gate starts at {first} but ends earlier at {last}")]
    InvalidGate {
        first: SystemVersion,
        last: SystemVersion,
    },

    #[error("current version is already installed")]
    CurrentVersionAlreadySet,

    #[error("current version has not been installed")]
    CurrentVersionUnset,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn locale_suffix(locale: &Option<LocaleId>) -> String {
    locale
        .as_ref()
        .map(|l| format!(" for locale `{l}`"))
        .unwrap_or_default()
}

fn bound_label(bound: &Option<SystemVersion>) -> String {
    bound
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<unbounded>".to_string())
}

/// Why a key path walk stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    /// No child with this name exists at the current level.
    MissingSegment(String),
    /// The index discriminator is past the end of the list.
    IndexOutOfRange { index: usize, len: usize },
    /// A named segment was requested but the node is a leaf.
    ExpectedMapping(String),
    /// An index discriminator was applied to something other than a list.
    ExpectedList,
    /// The walk ended on a mapping rather than a leaf value.
    NotALeaf,
    /// The leaf exists but is not text.
    ExpectedText,
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupFailure::MissingSegment(segment) => write!(f, "missing segment `{segment}`"),
            LookupFailure::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for list of {len}")
            }
            LookupFailure::ExpectedMapping(segment) => {
                write!(f, "expected a mapping before `{segment}`, found a value")
            }
            LookupFailure::ExpectedList => write!(f, "expected a list"),
            LookupFailure::NotALeaf => write!(f, "path ends on a mapping, not a value"),
            LookupFailure::ExpectedText => write!(f, "value is not text"),
        }
    }
}

/// Stable machine-readable codes, one per error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    MalformedDocument,
    InvalidLocale,
    MissingLocale,
    LocaleNotFound,
    KeyNotFound,
    InvalidVersion,
    MissingVersion,
    IncompatibleVersion,
    UnsupportedVersion,
    DuplicateLadderBound,
    InvalidGate,
    CurrentVersionAlreadySet,
    CurrentVersionUnset,
    Config,
    Parse,
    Io,
}

impl Error {
    /// Creates a malformed-document error for `source_name` at `path`.
    pub fn malformed(
        source_name: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::MalformedDocument {
            source_name: source_name.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            Error::MalformedDocument { .. } => ErrorCode::MalformedDocument,
            Error::InvalidLocale(_) => ErrorCode::InvalidLocale,
            Error::MissingLocale => ErrorCode::MissingLocale,
            Error::LocaleNotFound { .. } => ErrorCode::LocaleNotFound,
            Error::KeyNotFound { .. } => ErrorCode::KeyNotFound,
            Error::InvalidVersion(_) => ErrorCode::InvalidVersion,
            Error::MissingVersion => ErrorCode::MissingVersion,
            Error::IncompatibleVersion { .. } => ErrorCode::IncompatibleVersion,
            Error::UnsupportedVersion(_) => ErrorCode::UnsupportedVersion,
            Error::DuplicateLadderBound(_) => ErrorCode::DuplicateLadderBound,
            Error::InvalidGate { .. } => ErrorCode::InvalidGate,
            Error::CurrentVersionAlreadySet => ErrorCode::CurrentVersionAlreadySet,
            Error::CurrentVersionUnset => ErrorCode::CurrentVersionUnset,
            Error::Config(_) => ErrorCode::Config,
            Error::Parse(_) => ErrorCode::Parse,
            Error::Io(_) => ErrorCode::Io,
        }
    }

    /// True for errors that can only arise while loading documents or
    /// configuring the process, never while serving a request.
    pub fn is_fatal_at_startup(&self) -> bool {
        matches!(
            self,
            Error::MalformedDocument { .. }
                | Error::DuplicateLadderBound(_)
                | Error::InvalidGate { .. }
                | Error::CurrentVersionAlreadySet
                | Error::Config(_)
                | Error::Parse(_)
                | Error::Io(_)
        )
    }
}
