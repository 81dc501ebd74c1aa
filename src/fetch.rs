//! Temporary repository checkouts for the index pipeline.
//!
//! A checkout lives inside a temp directory that is removed when the
//! [`RepoCheckout`] guard drops, covering both the success and failure
//! paths of an index run.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use tracing::debug;

/// A local shallow clone, removed on drop.
pub struct RepoCheckout {
    path: PathBuf,
    _dir: TempDir,
}

impl RepoCheckout {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// True when the index target names a remote repository rather than a local
/// directory.
pub fn is_remote(target: &str) -> bool {
    target.starts_with("http://")
        || target.starts_with("https://")
        || target.starts_with("git@")
        || target.starts_with("ssh://")
}

/// Shallow-clone a repository into a temporary directory.
pub fn clone_repo(url: &str) -> Result<RepoCheckout> {
    let dir = tempfile::Builder::new()
        .prefix("librarian-")
        .tempdir()
        .context("failed to create checkout directory")?;
    let dest = dir.path().join(repo_name(url));

    let output = Command::new("git")
        .args(["clone", "--depth", "1"])
        .arg(url)
        .arg(&dest)
        .output()
        .context("failed to execute 'git clone'. Is git installed?")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("git clone failed: {}", stderr.trim());
    }

    debug!(url, path = %dest.display(), "cloned repository");
    Ok(RepoCheckout { path: dest, _dir: dir })
}

/// Last path component of the URL, without a `.git` suffix.
fn repo_name(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("repo")
        .trim_end_matches(".git")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_name_strips_git_suffix() {
        assert_eq!(repo_name("https://github.com/acme/widgets.git"), "widgets");
        assert_eq!(repo_name("https://github.com/acme/widgets"), "widgets");
        assert_eq!(repo_name("git@github.com:acme/widgets.git"), "widgets");
    }

    #[test]
    fn repo_name_tolerates_trailing_slash() {
        assert_eq!(repo_name("https://github.com/acme/widgets/"), "widgets");
    }

    #[test]
    fn remote_targets_are_detected() {
        assert!(is_remote("https://github.com/acme/widgets.git"));
        assert!(is_remote("git@github.com:acme/widgets.git"));
        assert!(!is_remote("./local/checkout"));
        assert!(!is_remote("/srv/repos/widgets"));
    }
}
