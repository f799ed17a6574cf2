use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::encode::naming::OutputArtifact;
use crate::foundation::error::{LayermixError, LayermixResult};

/// Destination for encoded artifacts.
///
/// Sinks are shared by every worker of a run, so `put` takes `&self` and may be called
/// concurrently from several threads in any order.
pub trait ArtifactSink: Send + Sync {
    /// Persist one artifact.
    fn put(&self, artifact: &OutputArtifact) -> LayermixResult<()>;
}

/// Writes `<dir>/<identifier>.jpg` for every artifact.
///
/// Bytes go to a hidden temporary file first and are renamed into place, so a failed
/// write never leaves a truncated file under the final name.
#[derive(Debug)]
pub struct DirSink {
    dir: PathBuf,
    tmp_seq: AtomicU64,
}

impl DirSink {
    /// Create `dir` (and parents) if absent and return a sink writing into it.
    pub fn create(dir: impl Into<PathBuf>) -> LayermixResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| LayermixError::write(&dir, format!("create output dir: {e}")))?;
        Ok(Self {
            dir,
            tmp_seq: AtomicU64::new(0),
        })
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Final path an artifact is written to.
    pub fn path_for(&self, artifact: &OutputArtifact) -> PathBuf {
        self.dir.join(artifact.file_name())
    }
}

impl ArtifactSink for DirSink {
    fn put(&self, artifact: &OutputArtifact) -> LayermixResult<()> {
        let final_path = self.path_for(artifact);
        let seq = self.tmp_seq.fetch_add(1, Ordering::Relaxed);
        let tmp_path = self.dir.join(format!(
            ".{}.{}-{seq}.tmp",
            artifact.file_name(),
            std::process::id()
        ));

        std::fs::write(&tmp_path, &artifact.bytes).map_err(|e| {
            let _ = std::fs::remove_file(&tmp_path);
            LayermixError::write(&final_path, format!("write artifact: {e}"))
        })?;
        std::fs::rename(&tmp_path, &final_path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp_path);
            LayermixError::write(&final_path, format!("move artifact into place: {e}"))
        })
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    artifacts: Mutex<Vec<OutputArtifact>>,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the sink and return captured artifacts in arrival order.
    pub fn into_artifacts(self) -> Vec<OutputArtifact> {
        self.artifacts
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of artifacts captured so far.
    pub fn len(&self) -> usize {
        self.artifacts
            .lock()
            .map(|v| v.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    /// `true` when nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactSink for InMemorySink {
    fn put(&self, artifact: &OutputArtifact) -> LayermixResult<()> {
        self.artifacts
            .lock()
            .map_err(|_| LayermixError::Other(anyhow::anyhow!("in-memory sink lock poisoned")))?
            .push(artifact.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
