//! Shared fixtures: scratch document roots and a canned content generator.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use webroot::resource::ContentGenerator;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A directory under the OS temp dir, removed on drop.
pub struct TempRoot {
    path: PathBuf,
}

impl TempRoot {
    pub fn new() -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "webroot-test-{}-{}",
            std::process::id(),
            id
        ));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    /// The layout used throughout the tests: `page.html` and an empty `images/`.
    pub fn with_sample_site() -> Self {
        let root = Self::new();
        root.file("page.html", b"<html></html>");
        root.dir("images");
        root
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let path = self.path.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.path.join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Name of the root directory itself, for building `..` targets.
    pub fn name(&self) -> String {
        self.path.file_name().unwrap().to_string_lossy().into_owned()
    }
}

impl Drop for TempRoot {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Generator that ignores the script and returns fixed bytes.
pub struct FixedOutput(pub &'static [u8]);

impl ContentGenerator for FixedOutput {
    async fn generate(&self, _script: &Path) -> anyhow::Result<Bytes> {
        Ok(Bytes::from_static(self.0))
    }
}

/// Generator that always fails.
pub struct Failing;

impl ContentGenerator for Failing {
    async fn generate(&self, script: &Path) -> anyhow::Result<Bytes> {
        anyhow::bail!("refusing to run {}", script.display())
    }
}
