//! API revision numbers and the compatibility rule between client and server.
//!
//! Ordering is lexicographic on `(major, minor, patch)`. Compatibility is
//! asymmetric: a request version is accepted when it shares the current
//! major and its minor does not exceed the current minor. Patch never
//! matters.

use std::{fmt, str::FromStr, sync::OnceLock};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SystemVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SystemVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses the wire form `major.minor.patch`.
    ///
    /// Pre-release and build suffixes are rejected; they have no place in an
    /// API revision header.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let parsed = semver::Version::parse(raw.trim())
            .map_err(|_| Error::InvalidVersion(raw.to_string()))?;
        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(Error::InvalidVersion(raw.to_string()));
        }
        Ok(Self::new(parsed.major, parsed.minor, parsed.patch))
    }

    /// Whether a client at `self` may talk to a server at `current`.
    pub fn is_compatible_with(&self, current: &SystemVersion) -> bool {
        is_compatible(self, current)
    }
}

/// `candidate` is compatible with `current` iff majors match and
/// `candidate.minor <= current.minor`.
pub fn is_compatible(candidate: &SystemVersion, current: &SystemVersion) -> bool {
    candidate.major == current.major && candidate.minor <= current.minor
}

impl FromStr for SystemVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SystemVersion {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SystemVersion> for String {
    fn from(value: SystemVersion) -> Self {
        value.to_string()
    }
}

impl fmt::Display for SystemVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Parses a request's version header and checks it against `current`.
///
/// This is the precondition a transport layer enforces before building any
/// model: an absent header, an unparsable one, or an incompatible version all
/// reject the request.
pub fn check_request_version(
    header: Option<&str>,
    current: &SystemVersion,
) -> Result<SystemVersion, Error> {
    let raw = header
        .filter(|h| !h.trim().is_empty())
        .ok_or(Error::MissingVersion)?;
    let requested = SystemVersion::parse(raw)?;
    if !is_compatible(&requested, current) {
        return Err(Error::IncompatibleVersion {
            requested,
            current: *current,
        });
    }
    Ok(requested)
}

static CURRENT_VERSION: OnceLock<SystemVersion> = OnceLock::new();

/// Installs the process-wide current version. Succeeds exactly once.
pub fn install_current_version(version: SystemVersion) -> Result<(), Error> {
    CURRENT_VERSION
        .set(version)
        .map_err(|_| Error::CurrentVersionAlreadySet)?;
    info!(version = %version, "installed current API version");
    Ok(())
}

/// The installed current version.
pub fn current_version() -> Result<SystemVersion, Error> {
    CURRENT_VERSION
        .get()
        .copied()
        .ok_or(Error::CurrentVersionUnset)
}
