use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use thiserror::Error;

/// A dot-separated numeric version as it appears in cache directory names
/// and bundle manifests, e.g. `14.5` or `12.3.1`.
///
/// The patch component is optional; a missing patch compares equal to `0`,
/// so `1.0` and `1.0.0` are the same version.
#[derive(Debug, Clone, Copy)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: Option<u32>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid version string: '{0}'")]
pub struct ParseVersionError(String);

impl Version {
    pub fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            patch: None,
        }
    }

    pub fn with_patch(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch: Some(patch),
        }
    }

    fn key(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.patch.unwrap_or(0))
    }
}

impl FromStr for Version {
    type Err = ParseVersionError;

    /// Accepts two or three numeric dot-separated components. Anything else
    /// (a bare major, build identifiers, device names) is not a version.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components: Vec<&str> = s.split('.').filter(|c| !c.is_empty()).collect();

        if components.len() != 2 && components.len() != 3 {
            return Err(ParseVersionError(s.to_string()));
        }

        let parse = |c: &str| c.parse::<u32>().map_err(|_| ParseVersionError(s.to_string()));

        let major = parse(components[0])?;
        let minor = parse(components[1])?;
        let patch = match components.get(2) {
            Some(c) => Some(parse(c)?),
            None => None,
        };

        Ok(Self {
            major,
            minor,
            patch,
        })
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(patch) = self.patch {
            write!(f, ".{}", patch)?;
        }
        Ok(())
    }
}
