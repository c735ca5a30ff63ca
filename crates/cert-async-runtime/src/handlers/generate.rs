use super::{BatchError, Reporter, prepare_batch, produce_certificate};
use crate::{BatchTally, CertUpdate};
use cert_render::{CertificateJob, RunMode};
use tokio::sync::mpsc;

const OPERATION: &str = "Generating certificates";

/// Render and save a PDF for every participant, continuing past failures
pub async fn run_generate(
    job: &CertificateJob,
    update_tx: &mpsc::UnboundedSender<CertUpdate>,
) -> BatchTally {
    let reporter = Reporter::new(update_tx);
    let total = job.participants().len();

    if job.mode() == RunMode::Preview {
        let error = BatchError::Rejected("Job was validated for preview only".to_string());
        return reporter.abort("Generation not started", total, error);
    }

    let fonts = match prepare_batch(job, &reporter).await {
        Ok(fonts) => fonts,
        Err(e) => return reporter.abort("Generation not started", total, e),
    };

    reporter.log(format!("Generating {total} certificates (PDF only)..."));
    let mut tally = BatchTally::new(total);

    for (index, participant) in job.numbered() {
        match produce_certificate(job, index, participant, &fonts).await {
            Ok(saved) => {
                tally.succeeded += 1;
                reporter.log(format!(
                    "Saved: {} (font: {}pt)",
                    saved.file_name, saved.font_size
                ));
            }
            Err(e) => {
                tally.failed += 1;
                log::warn!("Generation failed for {participant}: {e}");
                reporter.log(format!("Failed to generate for {}: {e}", participant.name));
            }
        }
        reporter.progress(OPERATION, index, total);
    }

    reporter.log(format!(
        "Generation complete: {}/{total} certificates saved",
        tally.succeeded
    ));
    reporter.complete(tally);
    tally
}
