//! Dotted numeric version parsing and ordering
//!
//! Versions are sequences of non-negative integers separated by `.`,
//! e.g. `1.2.3`. Two versions compare component by component and a
//! missing trailing component counts as `0`, so `1.2` equals `1.2.0`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while parsing a version string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// The version string was empty
    #[error("Version string is empty")]
    Empty,

    /// A component was empty or contained something other than ASCII digits
    #[error("Invalid version '{version}': component '{component}' is not a non-negative integer")]
    InvalidComponent { version: String, component: String },
}

/// A parsed dotted numeric version
///
/// Components are kept as digit strings with leading zeros stripped, so
/// there is no upper bound on their magnitude.
#[derive(Debug, Clone)]
pub struct Version {
    components: Vec<String>,
}

impl Version {
    /// Parse a version string such as `1.2.3`
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        if input.is_empty() {
            return Err(VersionError::Empty);
        }

        let components = input
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(VersionError::InvalidComponent {
                        version: input.to_string(),
                        component: part.to_string(),
                    });
                }
                Ok(normalize_component(part))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { components })
    }
}

fn normalize_component(digits: &str) -> String {
    match digits.trim_start_matches('0') {
        "" => "0".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Numeric order of two normalized digit strings
fn cmp_component(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());

        for idx in 0..len {
            let a = self.components.get(idx).map_or("0", String::as_str);
            let b = other.components.get(idx).map_or("0", String::as_str);
            match cmp_component(a, b) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }

        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Equality follows the ordering so that `1.2 == 1.2.0`
impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("."))
    }
}

/// Compare two version strings, failing if either is malformed
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering, VersionError> {
    Ok(Version::parse(a)?.cmp(&Version::parse(b)?))
}
