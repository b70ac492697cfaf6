use crate::config::OcrConfig;
use crate::{DocsiftError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tempfile::TempDir;
use tokio::process::Command;
use tokio::time::timeout;

/// Prefix every OCR-derived page block starts with. Downstream consumers
/// use it to tell OCR text (materially higher error rates) from native
/// text.
pub const OCR_MARKER_PREFIX: &str = "[OCR Page";

/// Provenance marker for one OCR-derived page.
pub fn page_marker(page: usize) -> String {
    format!("[OCR Page {}]", page)
}

/// Subprocess-backed OCR engine.
pub struct OcrEngine {
    language: String,
    dpi: u32,
    timeout: Duration,
}

impl OcrEngine {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            language: config.language.clone(),
            dpi: config.dpi,
            timeout: config.timeout(),
        }
    }

    /// Recognize a standalone image file.
    pub async fn ocr_image(&self, path: &Path) -> Result<String> {
        self.run_tesseract(path).await
    }

    /// Rasterize every page of a PDF and recognize each one.
    ///
    /// Returns `(page_number, per_page_result)` pairs in page order. A page
    /// whose recognition fails is reported in its slot; other pages still
    /// complete. Rasterization failure (including a missing `pdftoppm`)
    /// fails the call as a whole.
    pub async fn ocr_pdf(&self, path: &Path) -> Result<Vec<(usize, Result<String>)>> {
        let scratch = TempDir::new()?;
        self.run_pdftoppm(path, scratch.path()).await?;

        let mut images: Vec<PathBuf> = std::fs::read_dir(scratch.path())?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map(|ext| ext == "png").unwrap_or(false))
            .collect();
        images.sort();

        if images.is_empty() {
            return Err(DocsiftError::ocr("pdftoppm produced no page images"));
        }

        let mut pages = Vec::with_capacity(images.len());
        for (index, image) in images.iter().enumerate() {
            let result = self.run_tesseract(image).await;
            if let Err(e) = &result {
                tracing::warn!("OCR failed for page {}: {}", index + 1, e);
            }
            pages.push((index + 1, result));
        }

        Ok(pages)
    }

    async fn run_pdftoppm(&self, pdf: &Path, out_dir: &Path) -> Result<()> {
        let mut cmd = Command::new("pdftoppm");
        cmd.arg("-png")
            .args(["-r", &self.dpi.to_string()])
            .arg(pdf)
            .arg(out_dir.join("page"))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = self.run(cmd, "pdftoppm (install poppler-utils)").await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DocsiftError::ocr(format!("pdftoppm failed to rasterize PDF: {}", stderr.trim())));
        }
        Ok(())
    }

    async fn run_tesseract(&self, image: &Path) -> Result<String> {
        let mut cmd = Command::new("tesseract");
        cmd.arg(image)
            .arg("stdout")
            .args(["-l", &self.language])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = self.run(cmd, "tesseract (install tesseract-ocr)").await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DocsiftError::ocr(format!("tesseract failed: {}", stderr.trim())));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn run(&self, mut cmd: Command, tool: &str) -> Result<std::process::Output> {
        let child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DocsiftError::MissingDependency(tool.to_string())
            } else {
                DocsiftError::Io(e)
            }
        })?;

        match timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(DocsiftError::Io(e)),
            // Child was consumed by wait_with_output(); kill_on_drop reaps it.
            Err(_) => Err(DocsiftError::Timeout(format!(
                "{} did not finish within {} seconds",
                tool,
                self.timeout.as_secs()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OcrConfig;

    #[test]
    fn test_page_marker_format() {
        assert_eq!(page_marker(3), "[OCR Page 3]");
        assert!(page_marker(1).starts_with(OCR_MARKER_PREFIX));
    }

    #[tokio::test]
    async fn test_missing_binary_maps_to_missing_dependency() {
        let engine = OcrEngine {
            language: "eng".to_string(),
            dpi: 300,
            timeout: Duration::from_secs(5),
        };
        let mut cmd = Command::new("docsift-test-no-such-binary");
        cmd.stdout(Stdio::null()).stderr(Stdio::null());
        let err = engine.run(cmd, "docsift-test-no-such-binary").await.unwrap_err();
        assert!(matches!(err, DocsiftError::MissingDependency(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_engine_from_config() {
        let config = OcrConfig {
            language: "deu".to_string(),
            dpi: 200,
            timeout_secs: 30,
        };
        let engine = OcrEngine::new(&config);
        assert_eq!(engine.language, "deu");
        assert_eq!(engine.dpi, 200);
        assert_eq!(engine.timeout, Duration::from_secs(30));
    }
}
