//! Install/update/remove bookkeeping
//!
//! The actual work of installing or removing a package is done by a
//! [`PackageAction`] supplied by the caller. This module only keeps the
//! installed set consistent with the outcome the action reports.
//!
//! Every call resolves to exactly one [`Outcome`]. Bad indices, action
//! failures and inconsistent `Updated` reports all resolve to
//! [`Outcome::NotFound`] with no mutation; the cause travels alongside in
//! [`TransitionReport::fault`] and is logged at `warn`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::descriptor::{position_of, PackageDescriptor};

/// Terminal result of an install or remove attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    NotFound,
    Installed,
    Updated,
    Removed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::NotFound => "not found",
            Outcome::Installed => "installed",
            Outcome::Updated => "updated",
            Outcome::Removed => "removed",
        };
        f.write_str(label)
    }
}

/// The mechanism that installs or removes a package
///
/// Implemented for any `FnMut(&PackageDescriptor) -> anyhow::Result<Outcome>`.
pub trait PackageAction {
    fn apply(&mut self, package: &PackageDescriptor) -> anyhow::Result<Outcome>;
}

impl<F> PackageAction for F
where
    F: FnMut(&PackageDescriptor) -> anyhow::Result<Outcome>,
{
    fn apply(&mut self, package: &PackageDescriptor) -> anyhow::Result<Outcome> {
        self(package)
    }
}

/// Why a transition resolved to `NotFound` without touching the installed set
#[derive(Error, Debug)]
pub enum TransitionFault {
    #[error("Index {index} is out of range (collection has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Action failed for '{name}'")]
    CallbackFault {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Action reported '{name}' as updated, but it is not in the installed set")]
    MissingInstalledEntry { name: String },
}

/// Outcome of a transition plus the fault that produced it, if any
#[derive(Debug)]
pub struct TransitionReport {
    pub outcome: Outcome,
    pub fault: Option<TransitionFault>,
    mutated: bool,
}

impl TransitionReport {
    fn unchanged(outcome: Outcome) -> Self {
        Self {
            outcome,
            fault: None,
            mutated: false,
        }
    }

    fn applied(outcome: Outcome) -> Self {
        Self {
            outcome,
            fault: None,
            mutated: true,
        }
    }

    fn fault(fault: TransitionFault) -> Self {
        match std::error::Error::source(&fault) {
            Some(cause) => tracing::warn!("Package transition failed: {}: {}", fault, cause),
            None => tracing::warn!("Package transition failed: {}", fault),
        }

        Self {
            outcome: Outcome::NotFound,
            fault: Some(fault),
            mutated: false,
        }
    }

    /// Whether the installed set was changed
    pub fn mutated(&self) -> bool {
        self.mutated
    }
}

/// Install the catalog entry at `index`
///
/// `Installed` appends to the installed set. If the name is already
/// installed it is replaced where it stands instead, so the set stays
/// unique by name. `Updated` replaces the same-name installed entry at its
/// index. `NotFound` and `Removed` leave the set untouched.
pub fn install_package<A>(
    catalog: &[PackageDescriptor],
    installed: &mut Vec<PackageDescriptor>,
    index: usize,
    action: &mut A,
) -> TransitionReport
where
    A: PackageAction + ?Sized,
{
    let Some(package) = catalog.get(index) else {
        return TransitionReport::fault(TransitionFault::IndexOutOfRange {
            index,
            len: catalog.len(),
        });
    };

    let outcome = match action.apply(package) {
        Ok(outcome) => outcome,
        Err(source) => {
            return TransitionReport::fault(TransitionFault::CallbackFault {
                name: package.name.clone(),
                source,
            })
        }
    };

    match outcome {
        Outcome::Installed => match position_of(installed, &package.name) {
            Some(idx) => {
                tracing::warn!(
                    "'{}' was already installed at {}; replacing it in place",
                    package.name,
                    installed[idx].version
                );
                installed[idx] = package.clone();
            }
            None => installed.push(package.clone()),
        },
        Outcome::Updated => match position_of(installed, &package.name) {
            Some(idx) => installed[idx] = package.clone(),
            None => {
                return TransitionReport::fault(TransitionFault::MissingInstalledEntry {
                    name: package.name.clone(),
                })
            }
        },
        Outcome::NotFound | Outcome::Removed => {
            tracing::debug!("Install of '{}' reported {}; nothing recorded", package.name, outcome);
            return TransitionReport::unchanged(outcome);
        }
    }

    tracing::info!("{} {} v{}", outcome, package.name, package.version);
    TransitionReport::applied(outcome)
}

/// Remove the installed entry at `index`
///
/// Only a `Removed` outcome deletes the entry; anything else leaves the
/// installed set untouched.
pub fn remove_package<A>(
    installed: &mut Vec<PackageDescriptor>,
    index: usize,
    action: &mut A,
) -> TransitionReport
where
    A: PackageAction + ?Sized,
{
    let Some(package) = installed.get(index) else {
        return TransitionReport::fault(TransitionFault::IndexOutOfRange {
            index,
            len: installed.len(),
        });
    };

    let outcome = match action.apply(package) {
        Ok(outcome) => outcome,
        Err(source) => {
            return TransitionReport::fault(TransitionFault::CallbackFault {
                name: package.name.clone(),
                source,
            })
        }
    };

    if outcome != Outcome::Removed {
        tracing::debug!("Remove of '{}' reported {}; nothing recorded", package.name, outcome);
        return TransitionReport::unchanged(outcome);
    }

    let removed = installed.remove(index);
    tracing::info!("removed {} v{}", removed.name, removed.version);
    TransitionReport::applied(outcome)
}
