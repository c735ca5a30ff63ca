use image::RgbImage;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CertError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, CertError>;

/// Every violated configuration rule, collected before any work starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid configuration: {}", .violations.join("; "))]
pub struct ConfigError {
    pub violations: Vec<String>,
}

impl ConfigError {
    pub fn new(violation: impl Into<String>) -> Self {
        Self {
            violations: vec![violation.into()],
        }
    }

    /// Returns an error only if at least one violation was recorded
    pub fn from_violations(violations: Vec<String>) -> std::result::Result<(), Self> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Self { violations })
        }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.violations.iter().any(|v| v.contains(needle))
    }
}

/// Failure while composing or encoding a single certificate
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cannot open template {}: {source}", .path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// One row of the participant list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    pub email: String,
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Per-certificate rendering parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSpec {
    pub event_code: String,
    pub year: String,
    /// 1-based position of the participant in the source list
    pub sequence_index: usize,
    pub font_size_default: u32,
    pub font_size_min: u32,
}

/// Row and column bounds of the longest dark run on the underline row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnderlineSpan {
    pub row: u32,
    pub left: u32,
    pub right: u32,
}

impl UnderlineSpan {
    /// Number of dark pixels in the run
    pub fn run_length(&self) -> u32 {
        self.right - self.left + 1
    }
}

/// A composed certificate plus the layout decisions that produced it
#[derive(Debug, Clone)]
pub struct RenderedCertificate {
    pub image: RgbImage,
    pub font_size: u32,
    pub text_width: u32,
    pub max_text_width: u32,
    pub underline_row: Option<u32>,
    pub security_code: String,
}

impl RenderedCertificate {
    /// One-line summary of the layout diagnostics
    pub fn diagnostics(&self) -> String {
        let underline = match self.underline_row {
            Some(row) => row.to_string(),
            None => "none".to_string(),
        };
        format!(
            "Font size used: {}pt | Text width: {}px | Max allowed: {}px | Underline Y: {}",
            self.font_size, self.text_width, self.max_text_width, underline
        )
    }
}
