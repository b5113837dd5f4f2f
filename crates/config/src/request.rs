//! Ambient request context consulted for caller identity and path mapping

use std::path::{Component, Path, PathBuf};
use verifier_errors::Error;

/// The request currently being served, when the process hosts one
///
/// Absence of a request context is a valid state: callers fall back to the
/// OS identity and the process working directory.
pub trait RequestContext: Send + Sync {
    /// Name of the authenticated caller, `None` for anonymous requests
    ///
    /// # Errors
    ///
    /// Returns an error if the identity cannot be determined.
    fn user_name(&self) -> Result<Option<String>, Error>;

    /// Map an application-relative path to an absolute filesystem path
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be mapped.
    fn map_path(&self, path: &Path) -> Result<PathBuf, Error>;
}

/// Request context with a fixed caller and content root
#[derive(Debug, Clone)]
pub struct StaticRequestContext {
    user: Option<String>,
    content_root: PathBuf,
}

impl StaticRequestContext {
    /// Context rooted at `content_root`
    ///
    /// A relative root is resolved against the working directory at creation.
    #[must_use]
    pub fn new(content_root: impl Into<PathBuf>) -> Self {
        let content_root = content_root.into();
        Self {
            user: None,
            content_root: std::path::absolute(&content_root).unwrap_or(content_root),
        }
    }

    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    #[must_use]
    pub fn content_root(&self) -> &Path {
        &self.content_root
    }
}

impl RequestContext for StaticRequestContext {
    fn user_name(&self) -> Result<Option<String>, Error> {
        Ok(self.user.clone())
    }

    fn map_path(&self, path: &Path) -> Result<PathBuf, Error> {
        // "~/x", "/x" and "x" all map below the content root
        let mut mapped = self.content_root.clone();
        for component in path.components() {
            match component {
                Component::Normal(part) if part == "~" => {}
                Component::Normal(part) => mapped.push(part),
                Component::ParentDir => {
                    if !mapped.pop() || !mapped.starts_with(&self.content_root) {
                        return Err(Error::internal(format!(
                            "path {} escapes the content root",
                            path.display()
                        )));
                    }
                }
                Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
            }
        }
        Ok(mapped)
    }
}

/// Name of the user the process runs as
#[must_use]
pub fn os_user_name() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}
