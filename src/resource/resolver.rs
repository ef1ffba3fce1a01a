//! Maps request targets onto the document root.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::Deserialize;
use tokio::fs;

use crate::http::mime::{self, TEXT_PLAIN};
use crate::resource::generator::ContentGenerator;

/// How a target is confirmed to live under the document root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Containment {
    /// The canonical target path must descend from the canonical root.
    #[default]
    Canonical,
    /// The target's final segment must name some entry anywhere in the
    /// root tree. Looser: it does not stop `..` from escaping the root.
    NameScan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    File,
    Directory,
}

/// Content ready to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub kind: ResourceKind,
    pub content: Bytes,
    pub media_type: &'static str,
}

#[derive(Debug)]
pub enum ResolveError {
    /// Nothing servable exists at the target.
    NotFound(String),
    /// The file exists but its extension has no known media type.
    UnsupportedMediaType(String),
    Io(io::Error),
    /// The content generator failed.
    Generation(anyhow::Error),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NotFound(target) => write!(f, "not found: {}", target),
            ResolveError::UnsupportedMediaType(ext) => {
                write!(f, "no media type for extension {:?}", ext)
            }
            ResolveError::Io(e) => write!(f, "filesystem error: {}", e),
            ResolveError::Generation(e) => write!(f, "content generation failed: {:#}", e),
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::Io(e) => Some(e),
            ResolveError::Generation(e) => Some(&**e),
            _ => None,
        }
    }
}

impl From<io::Error> for ResolveError {
    fn from(e: io::Error) -> Self {
        ResolveError::Io(e)
    }
}

pub struct Resolver<G> {
    root: PathBuf,
    containment: Containment,
    generator_extension: String,
    generator: G,
}

impl<G: ContentGenerator> Resolver<G> {
    pub fn new(
        root: impl Into<PathBuf>,
        containment: Containment,
        generator_extension: impl Into<String>,
        generator: G,
    ) -> Self {
        Self {
            root: root.into(),
            containment,
            generator_extension: generator_extension.into(),
            generator,
        }
    }

    /// Resolves a raw request-target (leading `/`) to file content or a
    /// directory listing.
    ///
    /// Only `/` names the root itself. Any other target whose final segment
    /// is empty (`/images/`) names no entry and is not found. A query string
    /// is part of the final segment, so `/page.html?v=1` is not found either.
    pub async fn resolve(&self, target: &str) -> Result<Resource, ResolveError> {
        let full_path = self.root.join(target.trim_start_matches('/'));

        if target != "/" {
            let name = final_segment(target);
            if name.is_empty() {
                return Err(ResolveError::NotFound(target.to_string()));
            }
            if self.containment == Containment::NameScan {
                self.scan_for_name(target, name).await?;
            }
        }

        if self.containment == Containment::Canonical {
            self.check_descends_from_root(target, &full_path).await?;
        }

        let meta = match fs::metadata(&full_path).await {
            Ok(meta) => meta,
            Err(e) if is_missing(&e) => return Err(ResolveError::NotFound(target.to_string())),
            Err(e) => return Err(e.into()),
        };

        if meta.is_file() {
            self.read_file(&full_path).await
        } else if meta.is_dir() {
            list_directory(&full_path).await
        } else {
            Err(ResolveError::NotFound(target.to_string()))
        }
    }

    async fn read_file(&self, path: &Path) -> Result<Resource, ResolveError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = mime::extension_of(&file_name);

        let media_type = mime::from_extension(ext)
            .ok_or_else(|| ResolveError::UnsupportedMediaType(ext.to_string()))?;

        let content = if ext == self.generator_extension {
            self.generator
                .generate(path)
                .await
                .map_err(ResolveError::Generation)?
        } else {
            Bytes::from(fs::read(path).await?)
        };

        Ok(Resource {
            kind: ResourceKind::File,
            content,
            media_type,
        })
    }

    async fn check_descends_from_root(
        &self,
        target: &str,
        full_path: &Path,
    ) -> Result<(), ResolveError> {
        let root = fs::canonicalize(&self.root).await?;

        let candidate = match fs::canonicalize(full_path).await {
            Ok(path) => path,
            Err(e) if is_missing(&e) => return Err(ResolveError::NotFound(target.to_string())),
            Err(e) => return Err(e.into()),
        };

        if !candidate.starts_with(&root) {
            tracing::warn!(
                path = %target,
                resolved = %candidate.display(),
                "Rejected path outside document root"
            );
            return Err(ResolveError::NotFound(target.to_string()));
        }

        Ok(())
    }

    /// Walks the whole root tree looking for an entry called `name`.
    async fn scan_for_name(&self, target: &str, name: &str) -> Result<(), ResolveError> {
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                if entry.file_name() == name {
                    return Ok(());
                }
                if entry.file_type().await?.is_dir() {
                    pending.push(entry.path());
                }
            }
        }

        Err(ResolveError::NotFound(target.to_string()))
    }
}

/// Immediate children, subdirectories first, joined with `", "`.
async fn list_directory(path: &Path) -> Result<Resource, ResolveError> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    let mut entries = fs::read_dir(path).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().await?.is_dir() {
            dirs.push(name);
        } else {
            files.push(name);
        }
    }

    dirs.extend(files);

    Ok(Resource {
        kind: ResourceKind::Directory,
        content: Bytes::from(dirs.join(", ")),
        media_type: TEXT_PLAIN,
    })
}

/// Everything after the last `/`.
fn final_segment(target: &str) -> &str {
    target.rsplit('/').next().unwrap_or(target)
}

fn is_missing(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}
