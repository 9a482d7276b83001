//! Index file resolution for directory requests.

use std::fmt::Debug;
use std::path::{Component, Path, PathBuf};

/// Resolves which index file a directory request would be served.
///
/// Implementations may block; callers run them on the blocking pool.
pub trait IndexResolver: Send + Sync + Debug {
    /// If `url_path` names a directory holding one of `index_files`, return
    /// the URL path of the first one found (e.g. `/docs/index.html`).
    fn index_file(&self, url_path: &str, index_files: &[String]) -> Option<String>;
}

/// Looks index files up on disk beneath a document root.
#[derive(Debug, Clone)]
pub struct FsIndexResolver {
    root: PathBuf,
}

impl FsIndexResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a URL directory path onto the document root.
    /// Paths escaping the root yield `None`.
    fn local_dir(&self, url_path: &str) -> Option<PathBuf> {
        let mut dir = self.root.clone();
        for component in Path::new(url_path.trim_start_matches('/')).components() {
            match component {
                Component::Normal(segment) => dir.push(segment),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(dir)
    }
}

impl IndexResolver for FsIndexResolver {
    fn index_file(&self, url_path: &str, index_files: &[String]) -> Option<String> {
        let url_dir = match url_path {
            "" => "/",
            p if p.ends_with('/') => p,
            _ => return None,
        };
        let dir = self.local_dir(url_dir)?;

        index_files
            .iter()
            .find(|name| dir.join(name).is_file())
            .map(|name| format!("{url_dir}{name}"))
    }
}
