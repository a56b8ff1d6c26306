use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use crate::persist::ensure_output_dir;
use crate::types::RenderError;

/// Renders the first page of a stored document to a JPEG preview.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Writes `{image_dir}/{stem}.jpg` and returns its path.
    async fn render_first_page(
        &self,
        document: &Path,
        image_dir: &Path,
        stem: &str,
    ) -> Result<PathBuf, RenderError>;
}

/// Production renderer shelling out to poppler's `pdftoppm`.
#[derive(Debug, Clone, Default)]
pub struct PdftoppmRenderer {
    /// Directory holding the poppler binaries when they are not on PATH
    /// (e.g. `/opt/homebrew/bin`).
    poppler_path: Option<PathBuf>,
}

impl PdftoppmRenderer {
    pub fn new(poppler_path: Option<PathBuf>) -> Self {
        Self { poppler_path }
    }

    fn program(&self) -> PathBuf {
        match &self.poppler_path {
            Some(dir) => dir.join("pdftoppm"),
            None => PathBuf::from("pdftoppm"),
        }
    }
}

#[async_trait]
impl PageRenderer for PdftoppmRenderer {
    async fn render_first_page(
        &self,
        document: &Path,
        image_dir: &Path,
        stem: &str,
    ) -> Result<PathBuf, RenderError> {
        ensure_output_dir(image_dir)?;

        // -singlefile makes pdftoppm write `{target}.jpg` without a page
        // number suffix.
        let target = image_dir.join(stem);
        let program = self.program();
        let output = Command::new(&program)
            .arg("-jpeg")
            .args(["-f", "1", "-l", "1"])
            .arg("-singlefile")
            .arg(document)
            .arg(&target)
            .output()
            .await
            .map_err(|source| RenderError::Spawn {
                command: program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(RenderError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let image_path = target.with_extension("jpg");
        if !image_path.exists() {
            return Err(RenderError::MissingOutput(image_path));
        }
        Ok(image_path)
    }
}
