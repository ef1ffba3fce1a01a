//! Dynamic content generation
//!
//! Files with the configured generator extension are executed rather than
//! read, and whatever they print to stdout becomes the response body.

use std::future::Future;
use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;
use tokio::process::Command;

/// Produces the body for an executable resource.
pub trait ContentGenerator {
    /// Run `script` and return its output.
    fn generate(&self, script: &Path) -> impl Future<Output = Result<Bytes>> + Send;
}

/// Runs scripts through an external interpreter, e.g. `python3 page.py`.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    interpreter: String,
}

impl ScriptRunner {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }
}

impl ContentGenerator for ScriptRunner {
    async fn generate(&self, script: &Path) -> Result<Bytes> {
        let mut cmd = Command::new(&self.interpreter);
        cmd.kill_on_drop(true);

        // Run from the script's own directory so relative paths inside it work
        match (script.parent(), script.file_name()) {
            (Some(dir), Some(name)) if !dir.as_os_str().is_empty() => {
                cmd.current_dir(dir).arg(name);
            }
            _ => {
                cmd.arg(script);
            }
        }

        tracing::debug!(
            interpreter = %self.interpreter,
            script = %script.display(),
            "Running content generator"
        );

        let output = cmd
            .output()
            .await
            .with_context(|| format!("failed to spawn {}", self.interpreter))?;

        if !output.status.success() {
            anyhow::bail!(
                "{} {} exited with {}: {}",
                self.interpreter,
                script.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(Bytes::from(output.stdout))
    }
}
