//! The planning document and the path vocabulary pulled out of it.
//!
//! The plan is read once per run and hashed so that every manifest can be
//! traced back to the exact text it was checked against.

pub mod extract;
pub mod phase;

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::GuardError;
use crate::ports::FileSystem;

pub use extract::{extract_paths, extract_plan_paths, PATH_ROOTS, PLAN_DOC_EXTENSION};
pub use phase::{slice_to_phase, Phase};

/// Immutable plan text plus its content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDocument {
    path: PathBuf,
    text: String,
    hash: String,
}

impl PlanDocument {
    /// Reads the plan at `path` through the filesystem port.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::PlanNotFound`] when nothing exists at `path` and
    /// [`GuardError::PlanUnreadable`] when it cannot be read as text.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self, GuardError> {
        if !fs.exists(path) {
            return Err(GuardError::PlanNotFound(path.to_path_buf()));
        }
        let text = fs
            .read_to_string(path)
            .map_err(|source| GuardError::PlanUnreadable { path: path.to_path_buf(), source })?;
        let plan = Self::from_text(path, text);
        debug!(plan = %path.display(), hash = %plan.hash, bytes = plan.text.len(), "loaded plan");
        Ok(plan)
    }

    /// Wraps already-loaded text.
    #[must_use]
    pub fn from_text(path: &Path, text: String) -> Self {
        let hash = sha256_hex(&text);
        Self { path: path.to_path_buf(), text, hash }
    }

    /// Location the plan was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full plan text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lowercase hex SHA-256 of the plan text.
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
