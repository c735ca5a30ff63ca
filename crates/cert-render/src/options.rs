use crate::constants::MIN_CONFIGURABLE_FONT_SIZE;
use crate::participants::load_participants;
use crate::types::*;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Subject used when the configured one is blank
pub const FALLBACK_SUBJECT: &str = "Your Certificate is here";

const NO_PARTICIPANTS: &str = "Participants file not selected or empty";

/// What a job is about to do; decides which settings must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Render the first participant only
    Preview,
    /// Render and save every certificate
    Generate,
    /// Render, save and email every certificate
    Send,
}

/// Mail submission settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MailOptions {
    pub sender: String,
    pub subject: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Never written to disk
    #[cfg_attr(feature = "serde", serde(skip))]
    pub password: String,
}

impl Default for MailOptions {
    fn default() -> Self {
        Self {
            sender: String::new(),
            subject: "Here's your Certificate of Participation!".to_string(),
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 465,
            password: String::new(),
        }
    }
}

impl MailOptions {
    pub fn effective_subject(&self) -> &str {
        let subject = self.subject.trim();
        if subject.is_empty() {
            FALLBACK_SUBJECT
        } else {
            subject
        }
    }

    fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        let sender = self.sender.trim();
        if sender.is_empty() {
            violations.push("Sender email is required for sending certificates".to_string());
        } else if !sender.contains('@') {
            violations.push(format!("Sender email appears to be invalid: {sender}"));
        }

        if self.password.trim().is_empty() {
            violations.push("App password is required for sending certificates".to_string());
        }

        if self.smtp_host.trim().is_empty() {
            violations.push("SMTP server is required".to_string());
        }

        if self.smtp_port == 0 {
            violations.push("SMTP port must be between 1 and 65535".to_string());
        }

        violations
    }
}

/// Everything needed to render and deliver a batch of certificates
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CertificateOptions {
    // Inputs
    pub template_path: PathBuf,
    pub participants_path: PathBuf,
    pub output_dir: PathBuf,

    // Fonts
    pub name_font_path: Option<PathBuf>,
    pub code_font_path: Option<PathBuf>,
    pub font_size_default: u32,
    pub font_size_min: u32,

    // Security code
    pub event_code: String,
    pub year: String,

    // Delivery
    pub mail: MailOptions,
}

impl Default for CertificateOptions {
    fn default() -> Self {
        Self {
            template_path: PathBuf::new(),
            participants_path: PathBuf::new(),
            output_dir: PathBuf::from("certificates_output"),
            name_font_path: Some(PathBuf::from("Poppins-Bold.ttf")),
            code_font_path: Some(PathBuf::from("Arial.ttf")),
            font_size_default: 70,
            font_size_min: 60,
            event_code: "quiz".to_string(),
            year: "25".to_string(),
            mail: MailOptions::default(),
        }
    }
}

impl CertificateOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {e}")))?;
        Ok(options)
    }

    /// Save options to JSON file (the SMTP password is never written)
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::new(format!("Failed to serialize config: {e}")))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Every rule the options break for `mode`
    pub fn violations(&self, mode: RunMode) -> Vec<String> {
        let mut violations = Vec::new();

        if self.template_path.as_os_str().is_empty() {
            violations.push("Template image not selected".to_string());
        } else if !self.template_path.is_file() {
            violations.push(format!(
                "Template image file does not exist: {}",
                self.template_path.display()
            ));
        }

        if self.font_size_default < MIN_CONFIGURABLE_FONT_SIZE
            || self.font_size_min < MIN_CONFIGURABLE_FONT_SIZE
        {
            violations.push(format!(
                "Font sizes must be at least {MIN_CONFIGURABLE_FONT_SIZE}pt"
            ));
        }
        if self.font_size_min > self.font_size_default {
            violations.push(format!(
                "Minimum font size ({}) cannot be larger than default font size ({})",
                self.font_size_min, self.font_size_default
            ));
        }

        if mode != RunMode::Preview && self.output_dir.as_os_str().is_empty() {
            violations.push("Output folder not selected".to_string());
        }

        if mode == RunMode::Send {
            violations.extend(self.mail.violations());
        }

        violations
    }

    /// Validate the options
    pub fn validate(&self, mode: RunMode) -> std::result::Result<(), ConfigError> {
        ConfigError::from_violations(self.violations(mode))
    }

    /// Rendering parameters for the participant at 1-based `sequence_index`
    pub fn render_spec(&self, sequence_index: usize) -> RenderSpec {
        RenderSpec {
            event_code: self.event_code.clone(),
            year: self.year.clone(),
            sequence_index,
            font_size_default: self.font_size_default,
            font_size_min: self.font_size_min,
        }
    }
}

/// A validated batch: options plus the participants they apply to
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateJob {
    options: CertificateOptions,
    participants: Vec<Participant>,
    mode: RunMode,
}

impl CertificateJob {
    /// Check every rule for `mode` and bundle the job, or report all violations
    pub fn new(
        options: CertificateOptions,
        participants: Vec<Participant>,
        mode: RunMode,
    ) -> std::result::Result<Self, ConfigError> {
        let mut violations = options.violations(mode);
        if participants.is_empty() {
            violations.push(NO_PARTICIPANTS.to_string());
        }
        ConfigError::from_violations(violations)?;

        Ok(Self {
            options,
            participants,
            mode,
        })
    }

    /// Load the participants named in `options` and build the job.
    ///
    /// Problems with the participant file itself (missing, wrong type, no
    /// `Name`/`Email` columns) are reported together with every other
    /// violation in one [`ConfigError`].
    pub async fn load(options: CertificateOptions, mode: RunMode) -> Result<Self> {
        let mut violations = options.violations(mode);
        let path = &options.participants_path;
        let before = violations.len();

        let participants = if path.as_os_str().is_empty() {
            Vec::new()
        } else if !path.is_file() {
            violations.push(format!(
                "Participants file does not exist: {}",
                path.display()
            ));
            Vec::new()
        } else {
            match load_participants(path).await {
                Ok(participants) => participants,
                Err(CertError::Config(e)) => {
                    violations.extend(e.violations);
                    Vec::new()
                }
                Err(e) => return Err(e),
            }
        };

        // A file-level problem already explains the empty list
        if participants.is_empty() && violations.len() == before {
            violations.push(NO_PARTICIPANTS.to_string());
        }
        ConfigError::from_violations(violations)?;

        Ok(Self {
            options,
            participants,
            mode,
        })
    }

    pub fn options(&self) -> &CertificateOptions {
        &self.options
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    /// Participants paired with their 1-based sequence index
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &Participant)> {
        self.participants
            .iter()
            .enumerate()
            .map(|(i, participant)| (i + 1, participant))
    }
}
