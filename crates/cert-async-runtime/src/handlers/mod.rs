mod generate;
mod preview;
mod send;

pub use generate::run_generate;
pub use preview::run_preview;
pub use send::{SEND_INTERVAL, run_send};

use crate::{BatchTally, CertUpdate};
use cert_mail::DeliveryError;
use cert_render::{
    CertificateJob, FontHandle, Participant, RenderError, artifact_file_name, code_font_chain,
    image_to_pdf_bytes_async, name_font_chain, render_certificate_async, save_pdf,
    template_dimensions,
};
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::mpsc;

/// Why a single participant (or a whole batch) could not be processed
#[derive(Error, Debug)]
pub enum BatchError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("{0}")]
    Rejected(String),
}

/// Thin wrapper over the update channel.
///
/// A closed channel only means nobody is watching, so send failures are ignored.
struct Reporter<'a> {
    tx: &'a mpsc::UnboundedSender<CertUpdate>,
}

impl<'a> Reporter<'a> {
    fn new(tx: &'a mpsc::UnboundedSender<CertUpdate>) -> Self {
        Self { tx }
    }

    fn log(&self, message: impl Into<String>) {
        let _ = self.tx.send(CertUpdate::Log {
            message: message.into(),
        });
    }

    fn progress(&self, operation: &str, current: usize, total: usize) {
        let _ = self.tx.send(CertUpdate::Progress {
            operation: operation.to_string(),
            current,
            total,
        });
    }

    fn error(&self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        let _ = self.tx.send(CertUpdate::Error { message });
    }

    fn complete(&self, tally: BatchTally) {
        let _ = self.tx.send(CertUpdate::BatchComplete { tally });
    }

    /// Report a batch that failed before its first participant
    fn abort(&self, context: &str, total: usize, error: BatchError) -> BatchTally {
        self.error(format!("{context}: {error}"));
        let tally = BatchTally::aborted(total);
        self.complete(tally);
        tally
    }
}

/// Report a batch that could not start and count every participant as failed
pub(crate) fn abort_batch(
    update_tx: &mpsc::UnboundedSender<CertUpdate>,
    context: &str,
    total: usize,
    error: BatchError,
) -> BatchTally {
    Reporter::new(update_tx).abort(context, total, error)
}

/// Fonts resolved once per batch
struct BatchFonts {
    name: FontHandle,
    code: FontHandle,
}

async fn load_fonts(job: &CertificateJob) -> Result<BatchFonts, BatchError> {
    let options = job.options();
    let name_chain = name_font_chain(options.name_font_path.as_deref());
    let code_chain = code_font_chain(options.code_font_path.as_deref());

    let (name, code) = tokio::task::spawn_blocking(move || {
        (FontHandle::load(&name_chain), FontHandle::load(&code_chain))
    })
    .await?;

    log::info!("Name font: {} | Code font: {}", name.origin(), code.origin());
    Ok(BatchFonts { name, code })
}

fn report_template(job: &CertificateJob, reporter: &Reporter<'_>) {
    match template_dimensions(&job.options().template_path) {
        Ok((width, height)) => {
            reporter.log(format!("Template dimensions: {width} x {height} pixels"));
        }
        Err(e) => reporter.log(format!("Could not read template dimensions: {e}")),
    }
}

/// Load fonts, create the output folder and log the template size
async fn prepare_batch(
    job: &CertificateJob,
    reporter: &Reporter<'_>,
) -> Result<BatchFonts, BatchError> {
    let output_dir = &job.options().output_dir;
    tokio::fs::create_dir_all(output_dir).await?;
    reporter.log(format!("Output folder: {}", output_dir.display()));

    report_template(job, reporter);
    load_fonts(job).await
}

/// One certificate rendered, exported and saved into the output folder
struct SavedCertificate {
    file_name: String,
    path: PathBuf,
    pdf_bytes: Vec<u8>,
    font_size: u32,
}

async fn produce_certificate(
    job: &CertificateJob,
    sequence_index: usize,
    participant: &Participant,
    fonts: &BatchFonts,
) -> Result<SavedCertificate, BatchError> {
    let options = job.options();
    let spec = options.render_spec(sequence_index);

    let rendered = render_certificate_async(
        &options.template_path,
        &participant.name,
        &fonts.name,
        &fonts.code,
        &spec,
    )
    .await?;
    let font_size = rendered.font_size;

    let file_name = artifact_file_name(&participant.name, sequence_index);
    let pdf_bytes = image_to_pdf_bytes_async(rendered.image, file_name.clone()).await?;

    let path = options.output_dir.join(&file_name);
    save_pdf(&pdf_bytes, &path).await?;

    Ok(SavedCertificate {
        file_name,
        path,
        pdf_bytes,
        font_size,
    })
}
