use super::{BatchError, Reporter, SavedCertificate, prepare_batch, produce_certificate};
use crate::{BatchTally, CertUpdate};
use cert_mail::{CertificateMail, Mailer};
use cert_render::{CertificateJob, Participant, RunMode};
use std::time::Duration;
use tokio::sync::mpsc;

/// Pause between consecutive submissions to stay under provider rate limits
pub const SEND_INTERVAL: Duration = Duration::from_millis(500);

const OPERATION: &str = "Sending certificates";

/// Render, save a local copy and mail a certificate to every participant.
///
/// Failures are logged with the participant's name and address and counted;
/// the batch always runs to the end. `pacing` is slept between participants.
pub async fn run_send<M: Mailer>(
    job: &CertificateJob,
    mailer: &M,
    update_tx: &mpsc::UnboundedSender<CertUpdate>,
    pacing: Duration,
) -> BatchTally {
    let reporter = Reporter::new(update_tx);
    let total = job.participants().len();

    if job.mode() != RunMode::Send {
        let error = BatchError::Rejected("Job was not validated for sending".to_string());
        return reporter.abort("Sending not started", total, error);
    }

    let fonts = match prepare_batch(job, &reporter).await {
        Ok(fonts) => fonts,
        Err(e) => return reporter.abort("Sending not started", total, e),
    };

    reporter.log(format!(
        "Starting certificate generation and sending to {total} participants..."
    ));
    let subject = job.options().mail.effective_subject().to_string();
    let mut tally = BatchTally::new(total);

    for (index, participant) in job.numbered() {
        let outcome = match produce_certificate(job, index, participant, &fonts).await {
            Ok(saved) => deliver(mailer, participant, &subject, saved).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(font_size) => {
                tally.succeeded += 1;
                reporter.log(format!(
                    "✓ Sent to {} <{}> (font: {font_size}pt)",
                    participant.name, participant.email
                ));
            }
            Err(e) => {
                tally.failed += 1;
                log::warn!("Sending failed for {participant}: {e}");
                reporter.log(format!(
                    "✗ Failed for {} <{}>: {e}",
                    participant.name, participant.email
                ));
            }
        }
        reporter.progress(OPERATION, index, total);

        if index < total && !pacing.is_zero() {
            tokio::time::sleep(pacing).await;
        }
    }

    reporter.log(format!(
        "Sending finished. Success: {}, Failed: {}/{total}",
        tally.succeeded, tally.failed
    ));
    if tally.failed == 0 {
        reporter.log("All certificates sent successfully!");
    } else {
        reporter.log(format!(
            "{} certificates failed to send. Check the logs above for details.",
            tally.failed
        ));
    }
    reporter.complete(tally);
    tally
}

async fn deliver<M: Mailer>(
    mailer: &M,
    participant: &Participant,
    subject: &str,
    saved: SavedCertificate,
) -> Result<u32, BatchError> {
    log::debug!("Local copy saved at {}", saved.path.display());
    let mail = CertificateMail {
        recipient: participant.email.clone(),
        subject: subject.to_string(),
        attachment_name: saved.file_name,
        pdf_bytes: saved.pdf_bytes,
    };
    mailer.deliver(mail).await?;
    Ok(saved.font_size)
}
