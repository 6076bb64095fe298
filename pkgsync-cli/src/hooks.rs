//! Install/remove strategies used by the CLI
//!
//! pkgsync itself only keeps the books. What "installing" means is up to
//! the user: either nothing (bookkeeping only) or an external command
//! given with `--exec`, which receives the package descriptor as JSON on
//! stdin.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::io::Write;
use std::process::{Command, Stdio};

use pkgsync_core::catalog::{Outcome, PackageAction, PackageDescriptor};

/// Which transition the hook is running for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    Install,
    Remove,
}

impl HookKind {
    fn as_str(self) -> &'static str {
        match self {
            HookKind::Install => "install",
            HookKind::Remove => "remove",
        }
    }
}

/// Outcome to report once the work succeeded
fn success_outcome(
    kind: HookKind,
    installed_names: &HashSet<String>,
    package: &PackageDescriptor,
) -> Outcome {
    match kind {
        HookKind::Install if installed_names.contains(&package.name) => Outcome::Updated,
        HookKind::Install => Outcome::Installed,
        HookKind::Remove => Outcome::Removed,
    }
}

/// Records the transition without doing anything else
pub struct BookkeepingAction {
    kind: HookKind,
    installed_names: HashSet<String>,
}

impl BookkeepingAction {
    pub fn new(kind: HookKind, installed: &[PackageDescriptor]) -> Self {
        Self {
            kind,
            installed_names: installed.iter().map(|p| p.name.clone()).collect(),
        }
    }
}

impl PackageAction for BookkeepingAction {
    fn apply(&mut self, package: &PackageDescriptor) -> Result<Outcome> {
        Ok(success_outcome(self.kind, &self.installed_names, package))
    }
}

/// Runs an external command for each transition
///
/// Exit status 0 means the work was done. Anything else is reported as a
/// failure of the action.
pub struct CommandAction {
    argv: Vec<String>,
    kind: HookKind,
    installed_names: HashSet<String>,
}

impl CommandAction {
    /// Parse a shell-style command line
    pub fn parse(command: &str, kind: HookKind, installed: &[PackageDescriptor]) -> Result<Self> {
        let argv = shell_words::split(command)
            .with_context(|| format!("Failed to parse hook command: {command}"))?;

        if argv.is_empty() {
            anyhow::bail!("Hook command is empty");
        }

        Ok(Self {
            argv,
            kind,
            installed_names: installed.iter().map(|p| p.name.clone()).collect(),
        })
    }
}

impl PackageAction for CommandAction {
    fn apply(&mut self, package: &PackageDescriptor) -> Result<Outcome> {
        let payload =
            serde_json::to_vec(package).context("Failed to serialize package descriptor")?;

        tracing::debug!(
            "Running {} hook for {} v{}: {:?}",
            self.kind.as_str(),
            package.name,
            package.version,
            self.argv
        );

        let mut child = Command::new(&self.argv[0])
            .args(&self.argv[1..])
            .env("PKGSYNC_NAME", &package.name)
            .env("PKGSYNC_VERSION", &package.version)
            .env("PKGSYNC_ACTION", self.kind.as_str())
            .stdin(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start hook command: {}", self.argv[0]))?;

        // Dropping stdin closes it before the child is reaped
        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(&payload),
            None => Ok(()),
        };

        let status = child.wait().context("Failed to wait for hook command")?;

        // A hook that never reads stdin closes the pipe early
        if let Err(e) = write_result {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e).context("Failed to send package descriptor to hook");
            }
        }

        if !status.success() {
            anyhow::bail!("Hook command exited with {}", status);
        }

        Ok(success_outcome(self.kind, &self.installed_names, package))
    }
}
