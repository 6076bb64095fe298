//! Installed-vs-available update detection

use super::descriptor::{Catalog, PackageDescriptor};
use super::version::VersionError;

/// Catalog entries that upgrade an installed package
///
/// Walks the installed set in order and, for each installed entry, the
/// available catalog in order, collecting every same-name entry whose
/// version is strictly greater. Entries without an installed counterpart
/// and entries at an equal or lower version are left out.
pub fn updated_packages(
    installed: &[PackageDescriptor],
    available: &[PackageDescriptor],
) -> Result<Catalog, VersionError> {
    let mut updates = Catalog::new();

    for current in installed {
        for candidate in available.iter().filter(|c| c.name == current.name) {
            if candidate.is_newer_than(current)? {
                updates.push(candidate.clone());
            }
        }
    }

    Ok(updates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pkg(name: &str, version: &str) -> PackageDescriptor {
        PackageDescriptor::new(name, version)
    }

    #[test]
    fn test_only_newer_installed_names() {
        let installed = vec![pkg("x", "1.0")];
        let available = vec![pkg("x", "2.0"), pkg("y", "1.0")];

        assert_eq!(
            updated_packages(&installed, &available).unwrap(),
            vec![pkg("x", "2.0")]
        );
    }

    #[test]
    fn test_equal_and_older_excluded() {
        let installed = vec![pkg("x", "1.2"), pkg("y", "3.0")];
        let available = vec![pkg("x", "1.2.0"), pkg("y", "2.9")];

        assert!(updated_packages(&installed, &available).unwrap().is_empty());
    }

    #[test]
    fn test_follows_installed_order() {
        let installed = vec![pkg("b", "1.0"), pkg("a", "1.0")];
        let available = vec![pkg("a", "1.1"), pkg("b", "1.1")];

        assert_eq!(
            updated_packages(&installed, &available).unwrap(),
            vec![pkg("b", "1.1"), pkg("a", "1.1")]
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert!(updated_packages(&[], &[pkg("x", "1.0")]).unwrap().is_empty());
        assert!(updated_packages(&[pkg("x", "1.0")], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_version_propagates() {
        let installed = vec![pkg("x", "1.0")];
        let available = vec![pkg("x", "latest")];
        assert!(updated_packages(&installed, &available).is_err());
    }
}
