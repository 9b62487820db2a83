//! Version control seam. [`GitCli`] shells out to the `git` binary.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use tokio::process::Command;
use tracing::{debug, instrument};

use super::UpdateError;

/// Head commit of the remote branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteHead {
    /// Short commit hash.
    pub version: String,
    /// Commit subject.
    pub message: String,
}

#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Short hash of the checked-out commit, or `"unknown"` outside a repository.
    async fn current_version(&self) -> String;

    /// Fetches the remote and describes its head.
    async fn fetch_remote(&self) -> Result<RemoteHead, UpdateError>;

    /// Fast-forwards the working tree to the remote head.
    async fn pull(&self) -> Result<(), UpdateError>;
}

pub struct GitCli {
    repo_dir: PathBuf,
    /// Explicit remote (e.g. `GITHUB_REPO_URL`); the branch upstream is used when unset.
    remote_url: Option<String>,
}

impl GitCli {
    pub fn new(repo_dir: impl Into<PathBuf>, remote_url: Option<String>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            remote_url,
        }
    }

    async fn git(&self, args: &[&str]) -> Result<String, UpdateError> {
        debug!(args = ?args, "git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()
            .await
            .map_err(|e| UpdateError::Git(format!("failed to run git: {}", e)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(UpdateError::Git(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn remote_ref(&self) -> &'static str {
        if self.remote_url.is_some() {
            "FETCH_HEAD"
        } else {
            "@{u}"
        }
    }
}

#[async_trait]
impl VersionControl for GitCli {
    async fn current_version(&self) -> String {
        self.git(&["rev-parse", "--short=7", "HEAD"])
            .await
            .unwrap_or_else(|_| "unknown".to_string())
    }

    #[instrument(skip(self))]
    async fn fetch_remote(&self) -> Result<RemoteHead, UpdateError> {
        match self.remote_url {
            Some(ref url) => self.git(&["fetch", url, "HEAD"]).await?,
            None => self.git(&["fetch"]).await?,
        };
        let remote = self.remote_ref();
        let version = self.git(&["rev-parse", "--short=7", remote]).await?;
        let message = self.git(&["log", "-1", "--format=%s", remote]).await?;
        Ok(RemoteHead { version, message })
    }

    #[instrument(skip(self))]
    async fn pull(&self) -> Result<(), UpdateError> {
        match self.remote_url {
            Some(ref url) => self.git(&["pull", "--ff-only", url, "HEAD"]).await?,
            None => self.git(&["pull", "--ff-only"]).await?,
        };
        Ok(())
    }
}
