//! LaTeX to PDF.
//!
//! Two strategies run in order, stopping at the first PDF:
//!
//! 1. **Structured**: split the markup with [`Preamble::split`], rebuild it
//!    as a [`LatexDocument`] (detected or default class, baseline packages,
//!    detected packages once each, body verbatim) and compile a single pass
//!    with `-halt-on-error`.
//! 2. **Standalone**: wrap the original markup with
//!    [`standalone_source`], confirm the engine is on the path, and compile
//!    twice so cross-references resolve.
//!
//! Each attempt gets its own [`TempDir`], removed when the attempt returns,
//! whatever the outcome. Only a file that starts with the PDF header is ever
//! handed back.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;
use tracing::{info, warn};

use crate::document::LatexDocument;
use crate::engine::{ErrorMode, TexEngine};
use crate::error::ExportError;
use crate::preamble::{standalone_source, Preamble};
use crate::styles::DocumentStyles;

const TEX_FILE: &str = "worksheet.tex";
const PDF_FILE: &str = "worksheet.pdf";

const STANDALONE_PASSES: usize = 2;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Engine name (looked up on the path) or path to the executable.
    pub engine: String,
    /// Upper bound on each engine invocation.
    pub compile_timeout: Duration,
    pub styles: DocumentStyles,
    /// Parent for per-attempt scratch directories. Defaults to the system
    /// temp directory.
    pub scratch_root: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            engine: "pdflatex".to_string(),
            compile_timeout: Duration::from_secs(120),
            styles: DocumentStyles::default(),
            scratch_root: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PdfRenderer {
    engine: TexEngine,
    styles: DocumentStyles,
    scratch_root: Option<PathBuf>,
}

impl PdfRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            engine: TexEngine::new(options.engine, options.compile_timeout),
            styles: options.styles,
            scratch_root: options.scratch_root,
        }
    }

    /// Compile `latex` to PDF bytes.
    ///
    /// When both strategies fail the error is
    /// [`ExportError::RenderFailed`] carrying both causes.
    pub async fn render(&self, latex: &str) -> Result<Vec<u8>, ExportError> {
        let primary = match self.render_structured(latex).await {
            Ok(pdf) => {
                info!(bytes = pdf.len(), "PDF generated from structured document");
                return Ok(pdf);
            }
            Err(e) => {
                warn!(error = %e, "structured document failed, trying standalone compile");
                e
            }
        };

        match self.render_standalone(latex).await {
            Ok(pdf) => {
                info!(bytes = pdf.len(), "PDF generated by standalone compile");
                Ok(pdf)
            }
            Err(fallback) => {
                warn!(error = %fallback, "standalone compile failed");
                Err(ExportError::RenderFailed {
                    primary: Box::new(primary),
                    fallback: Box::new(fallback),
                })
            }
        }
    }

    async fn render_structured(&self, latex: &str) -> Result<Vec<u8>, ExportError> {
        let document = LatexDocument::from_preamble(Preamble::split(latex), &self.styles);

        let workdir = self.scratch_dir()?;
        let tex = workdir.path().join(TEX_FILE);
        tokio::fs::write(&tex, document.to_source()).await?;

        self.engine
            .compile(self.engine.executable(), workdir.path(), &tex, ErrorMode::Halt)
            .await?;

        read_pdf(workdir.path()).await
    }

    async fn render_standalone(&self, latex: &str) -> Result<Vec<u8>, ExportError> {
        let source = standalone_source(latex, &self.styles.document_class);

        let workdir = self.scratch_dir()?;
        let tex = workdir.path().join(TEX_FILE);
        tokio::fs::write(&tex, source).await?;

        let program = self.engine.locate().await?;
        for _ in 0..STANDALONE_PASSES {
            self.engine
                .compile(&program, workdir.path(), &tex, ErrorMode::Continue)
                .await?;
        }

        read_pdf(workdir.path()).await
    }

    fn scratch_dir(&self) -> io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("worksheet-");
        match &self.scratch_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }
}

async fn read_pdf(workdir: &Path) -> Result<Vec<u8>, ExportError> {
    let bytes = match tokio::fs::read(workdir.join(PDF_FILE)).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(ExportError::MissingOutput),
        Err(e) => return Err(e.into()),
    };

    if !bytes.starts_with(b"%PDF-") {
        return Err(ExportError::InvalidOutput);
    }
    Ok(bytes)
}
