//! First-page rasterization with poppler's `pdftoppm`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, trace};

use super::{PageRenderer, Result};
use crate::error::PdfError;
use crate::models::config::EngineConfig;

/// Renders PDF pages to PNG through an external `pdftoppm` executable.
pub struct PopplerRenderer {
    executable: PathBuf,
    dpi: u32,
    timeout: Option<Duration>,
}

impl PopplerRenderer {
    /// Create a renderer for the `pdftoppm` binary at `executable`.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            dpi: 300,
            timeout: None,
        }
    }

    /// Create a renderer from engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.pdftoppm_path())
            .with_dpi(config.render_dpi)
            .with_timeout(config.timeout())
    }

    /// Set rendering resolution.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Limit how long a single rendering may take.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

impl PageRenderer for PopplerRenderer {
    async fn render_first_page(&self, pdf_path: &Path, output_dir: &Path) -> Result<PathBuf> {
        let output_prefix = output_dir.join("page");
        let dpi = self.dpi.to_string();

        let mut command = Command::new(&self.executable);
        command
            .args(["-png", "-singlefile", "-r", &dpi, "-f", "1", "-l", "1"])
            .arg(pdf_path)
            .arg(&output_prefix)
            .kill_on_drop(true);

        trace!("Running {:?}", command);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| PdfError::Timeout(limit.as_secs()))?,
            None => command.output().await,
        };

        let output = output.map_err(|source| PdfError::RendererUnavailable {
            path: self.executable.clone(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PdfError::Render(format!(
                "pdftoppm exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let image_path = output_prefix.with_extension("png");
        if !image_path.exists() {
            return Err(PdfError::Render("no image generated for page 1".to_string()));
        }

        debug!("Rendered {} to {}", pdf_path.display(), image_path.display());
        Ok(image_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(unix)]
    use crate::ocr::shell_script;

    #[test]
    fn test_from_config() {
        let mut config = EngineConfig::new("/opt/poppler/bin", "/usr/bin/tesseract");
        config.render_dpi = 200;
        config.ocr_timeout_secs = Some(5);

        let renderer = PopplerRenderer::from_config(&config);
        assert!(renderer.executable().starts_with("/opt/poppler/bin"));
        assert_eq!(renderer.dpi, 200);
        assert_eq!(renderer.timeout, Some(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_missing_executable_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = PopplerRenderer::new(dir.path().join("no-such-pdftoppm"));

        let err = renderer
            .render_first_page(&dir.path().join("card.pdf"), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, PdfError::RendererUnavailable { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_renders_to_single_page_png() {
        let dir = tempfile::tempdir().unwrap();
        // Last argument is the output prefix; -singlefile appends only ".png".
        let script = shell_script(
            dir.path(),
            "pdftoppm",
            r#"for last in "$@"; do :; done
echo "$@" > "$last.args"
: > "$last.png""#,
        );
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();
        let renderer = PopplerRenderer::new(script).with_dpi(150);

        let image = renderer
            .render_first_page(&dir.path().join("card.pdf"), &out)
            .await
            .unwrap();
        assert_eq!(image, out.join("page.png"));
        assert!(image.exists());

        let args = std::fs::read_to_string(out.join("page.args")).unwrap();
        assert!(args.starts_with("-png -singlefile -r 150 -f 1 -l 1 "));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_missing_output_image_is_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = shell_script(dir.path(), "pdftoppm", "exit 0");
        let renderer = PopplerRenderer::new(script);

        let err = renderer
            .render_first_page(&dir.path().join("card.pdf"), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, PdfError::Render(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = shell_script(dir.path(), "pdftoppm", "echo 'Syntax Error' >&2\nexit 1");
        let renderer = PopplerRenderer::new(script);

        match renderer.render_first_page(&dir.path().join("card.pdf"), dir.path()).await {
            Err(PdfError::Render(msg)) => assert!(msg.contains("Syntax Error")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_renderer_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let script = shell_script(dir.path(), "pdftoppm", "sleep 5");
        let renderer = PopplerRenderer::new(script).with_timeout(Some(Duration::from_secs(1)));

        let err = renderer
            .render_first_page(&dir.path().join("card.pdf"), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, PdfError::Timeout(1)));
    }
}
