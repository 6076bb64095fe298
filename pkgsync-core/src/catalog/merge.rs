//! Multi-source catalog merging
//!
//! Catalogs are merged in priority order. The first catalog is the
//! baseline and keeps its ordering; names first seen in a later catalog
//! are appended, and a strictly newer version replaces the existing entry
//! at the position it already held.

use super::descriptor::{position_of, Catalog, PackageDescriptor};
use super::version::VersionError;

/// Merge catalogs in priority order into one catalog, unique by name
///
/// Merging nothing yields an empty catalog; merging a single catalog
/// yields it unchanged.
pub fn merge_catalogs<I>(catalogs: I) -> Result<Catalog, VersionError>
where
    I: IntoIterator<Item = Catalog>,
{
    let mut catalogs = catalogs.into_iter();

    let mut merged = match catalogs.next() {
        Some(first) => first,
        None => return Ok(Catalog::new()),
    };

    for catalog in catalogs {
        merge_into(&mut merged, catalog)?;
    }

    Ok(merged)
}

/// Merge `incoming` into `target` in place
///
/// Returns the number of entries that were added or upgraded. On a
/// version parse failure `target` may hold the entries merged so far;
/// callers that need all-or-nothing semantics merge into a copy.
pub fn merge_into(target: &mut Catalog, incoming: Catalog) -> Result<usize, VersionError> {
    let mut changed = 0;

    for obj in incoming {
        match position_of(target, &obj.name) {
            None => {
                target.push(obj);
                changed += 1;
            }
            Some(idx) => {
                if replace_if_newer(&mut target[idx], obj)? {
                    changed += 1;
                }
            }
        }
    }

    Ok(changed)
}

fn replace_if_newer(
    slot: &mut PackageDescriptor,
    candidate: PackageDescriptor,
) -> Result<bool, VersionError> {
    if candidate.is_newer_than(slot)? {
        tracing::trace!(
            "Upgrading {} from {} to {}",
            slot.name,
            slot.version,
            candidate.version
        );
        *slot = candidate;
        Ok(true)
    } else {
        Ok(false)
    }
}
