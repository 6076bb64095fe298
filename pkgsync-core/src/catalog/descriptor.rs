//! Package descriptors
//!
//! A descriptor is a named, versioned record. Any other fields a source
//! publishes (download URL, description, ...) are kept verbatim and in
//! their original order so a load/save cycle never drops or reshuffles them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::version::{Version, VersionError};

/// An ordered sequence of descriptors, unique by name
pub type Catalog = Vec<PackageDescriptor>;

/// A package entry as found in a catalog or installed set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Package name (case-sensitive identity key)
    pub name: String,

    /// Dotted numeric version string
    pub version: String,

    /// Opaque payload carried through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PackageDescriptor {
    /// Create a descriptor with no extra fields
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            extra: Map::new(),
        }
    }

    /// Attach an opaque field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Parse the version string
    pub fn parsed_version(&self) -> Result<Version, VersionError> {
        self.version.parse()
    }

    /// Check whether this descriptor's version is strictly newer than `other`'s
    pub fn is_newer_than(&self, other: &PackageDescriptor) -> Result<bool, VersionError> {
        Ok(self.parsed_version()? > other.parsed_version()?)
    }

    /// Look up an opaque field
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Position of the entry named `name`, if any
pub(crate) fn position_of(catalog: &[PackageDescriptor], name: &str) -> Option<usize> {
    catalog.iter().position(|entry| entry.name == name)
}
