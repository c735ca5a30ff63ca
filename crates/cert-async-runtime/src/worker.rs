use crate::{CertCommand, CertUpdate, SEND_INTERVAL, SmtpMailer, handlers};
use tokio::sync::mpsc;

/// Async worker task that processes certificate commands and sends updates.
///
/// Commands run one at a time and participants strictly in order; the task
/// ends when every command sender has been dropped.
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<CertCommand>,
    update_tx: mpsc::UnboundedSender<CertUpdate>,
) {
    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &update_tx).await;
    }
    log::debug!("Worker command channel closed");
}

async fn process_command(cmd: CertCommand, update_tx: &mpsc::UnboundedSender<CertUpdate>) {
    match cmd {
        CertCommand::Preview { job, output_path } => {
            handlers::run_preview(&job, &output_path, update_tx).await;
        }
        CertCommand::Generate { job } => {
            handlers::run_generate(&job, update_tx).await;
        }
        CertCommand::Send { job } => {
            let mail = &job.options().mail;
            match SmtpMailer::new(&mail.smtp_host, mail.smtp_port, &mail.sender, &mail.password) {
                Ok(mailer) => {
                    handlers::run_send(&job, &mailer, update_tx, SEND_INTERVAL).await;
                }
                Err(e) => {
                    handlers::abort_batch(
                        update_tx,
                        "Failed to set up mail transport",
                        job.participants().len(),
                        e.into(),
                    );
                }
            }
        }
    }
}
