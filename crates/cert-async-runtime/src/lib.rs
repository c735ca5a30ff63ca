use std::path::PathBuf;

mod handlers;
mod worker;

pub use handlers::{BatchError, SEND_INTERVAL, run_generate, run_preview, run_send};
pub use worker::worker_task;

// Re-export types from library crates
pub use cert_mail::{CertificateMail, DeliveryError, Mailer, SmtpMailer};
pub use cert_render::{CertificateJob, CertificateOptions, MailOptions, Participant, RunMode};

/// Commands sent from the front end to the worker
#[derive(Debug)]
pub enum CertCommand {
    Preview {
        job: CertificateJob,
        output_path: PathBuf,
    },
    Generate {
        job: CertificateJob,
    },
    Send {
        job: CertificateJob,
    },
}

/// Updates sent from the worker to the front end, in generation order
#[derive(Debug, Clone)]
pub enum CertUpdate {
    Log {
        message: String,
    },
    Progress {
        operation: String,
        current: usize,
        total: usize,
    },
    PreviewReady {
        path: PathBuf,
        diagnostics: String,
    },
    BatchComplete {
        tally: BatchTally,
    },
    Error {
        message: String,
    },
}

/// Final success/failure count of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchTally {
    pub succeeded: usize,
    pub failed: usize,
    pub total: usize,
}

impl BatchTally {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// A batch that never started: every participant counts as failed
    pub fn aborted(total: usize) -> Self {
        Self {
            succeeded: 0,
            failed: total,
            total,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.succeeded == self.total
    }
}
