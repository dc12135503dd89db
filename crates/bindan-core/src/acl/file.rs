// # ACL File
//
// AclWriter implementation over the name-server configuration file.
//
// ## Write Strategy
//
// - The whole file is read into memory and rewritten with `rewrite_lines`
// - The result goes to a sibling `<name>.tmp` carrying the original mode,
//   owner and group
// - The temp file is renamed over the original (atomic replace)
// - Symlinks are resolved first so the link itself survives
//
// The file is written back even when no marker was found; its content is then
// the same line sequence that was read.

use async_trait::async_trait;
use std::ffi::OsString;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::rewrite_lines;
use crate::Error;
use crate::traits::AclWriter;

/// The ACL stanza inside a name-server configuration file
#[derive(Debug, Clone)]
pub struct AclFile {
    path: PathBuf,
    marker: String,
}

impl AclFile {
    /// Create a writer for `path`, anchored on `marker`
    pub fn new(path: impl Into<PathBuf>, marker: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            marker: marker.into(),
        }
    }

    /// Write `content` to `target` through a temp file and a rename
    async fn write_atomic(target: &Path, content: &str) -> Result<(), Error> {
        let metadata = fs::metadata(target).await.map_err(|e| {
            Error::config_io(format!("Failed to stat {}: {}", target.display(), e))
        })?;

        let temp_path = Self::temp_path(target);
        let written: std::io::Result<()> = async {
            let mut file = Self::create_temp(&temp_path, &metadata).await?;
            file.write_all(content.as_bytes()).await?;
            file.sync_all().await?;
            drop(file);
            Self::copy_owner(&temp_path, &metadata)?;
            fs::set_permissions(&temp_path, metadata.permissions()).await?;
            fs::rename(&temp_path, target).await
        }
        .await;

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                tracing::debug!("Could not remove {}: {}", temp_path.display(), cleanup);
            }
            return Err(Error::config_io(format!(
                "Failed to write {}: {}",
                target.display(),
                e
            )));
        }

        tracing::trace!("ACL written to {}", target.display());
        Ok(())
    }

    /// Open the temp file, created with the target's mode on unix
    async fn create_temp(temp_path: &Path, metadata: &Metadata) -> std::io::Result<fs::File> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            options.mode(metadata.permissions().mode() & 0o7777);
        }
        #[cfg(not(unix))]
        let _ = metadata;

        options.open(temp_path).await
    }

    /// Give the temp file the target's owner and group
    #[cfg(unix)]
    fn copy_owner(temp_path: &Path, metadata: &Metadata) -> std::io::Result<()> {
        use std::os::unix::fs::MetadataExt;

        let current = std::fs::metadata(temp_path)?;
        if current.uid() == metadata.uid() && current.gid() == metadata.gid() {
            return Ok(());
        }
        std::os::unix::fs::chown(temp_path, Some(metadata.uid()), Some(metadata.gid()))
    }

    #[cfg(not(unix))]
    fn copy_owner(_temp_path: &Path, _metadata: &Metadata) -> std::io::Result<()> {
        Ok(())
    }

    /// Get path to the temporary file next to `target`
    fn temp_path(target: &Path) -> PathBuf {
        let mut name = target
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("acl"));
        name.push(".tmp");
        target.with_file_name(name)
    }
}

#[async_trait]
impl AclWriter for AclFile {
    async fn rewrite(&self, address: &str) -> Result<bool, Error> {
        let target = fs::canonicalize(&self.path).await.map_err(|e| {
            Error::config_io(format!(
                "Could not find bind configuration {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let content = fs::read_to_string(&target).await.map_err(|e| {
            Error::config_io(format!("Could not read {}: {}", target.display(), e))
        })?;

        let rewrite = rewrite_lines(&content, &self.marker, address);
        if !rewrite.replaced {
            tracing::warn!(
                "Marker line {:?} not found in {} (or nothing follows it)",
                self.marker,
                target.display()
            );
        }

        Self::write_atomic(&target, &rewrite.render()).await?;
        Ok(rewrite.replaced)
    }
}
