use anyhow::{Context, Result, anyhow};
use cert_async_runtime::{CertCommand, CertUpdate, worker_task};
use cert_render::{CertError, CertificateJob, CertificateOptions, ConfigError, MailOptions, RunMode};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::sync::mpsc;

mod logger;

#[derive(Parser)]
#[command(name = "certs", about = "Certificate generator and mailer", version)]
struct Cli {
    /// Print layout diagnostics and other debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the first participant to a PNG and print layout diagnostics
    Preview {
        #[command(flatten)]
        job: JobArgs,

        /// Where to write the preview image
        #[arg(long, default_value = "preview.png")]
        png: PathBuf,
    },

    /// Render and save one PDF per participant
    Generate {
        #[command(flatten)]
        job: JobArgs,
    },

    /// Render, save and email one PDF per participant
    Send {
        #[command(flatten)]
        job: JobArgs,

        #[command(flatten)]
        mail: MailArgs,
    },

    /// Write a config file holding the default options
    InitConfig {
        /// Output JSON file
        path: PathBuf,
    },
}

#[derive(Args)]
struct JobArgs {
    /// JSON options file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Template image (PNG or JPEG)
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Participants CSV or spreadsheet (columns: Name, Email)
    #[arg(short, long)]
    participants: Option<PathBuf>,

    /// Output folder for PDFs
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Font for the participant name
    #[arg(long)]
    name_font: Option<PathBuf>,

    /// Font for the security code
    #[arg(long)]
    code_font: Option<PathBuf>,

    /// Starting font size for the name
    #[arg(long)]
    font_size: Option<u32>,

    /// Smallest font size the name may shrink to
    #[arg(long)]
    min_font_size: Option<u32>,

    /// Event code used in security codes
    #[arg(long)]
    event_code: Option<String>,

    /// Two-digit year used in security codes
    #[arg(long)]
    year: Option<String>,
}

impl JobArgs {
    async fn resolve(self) -> Result<CertificateOptions> {
        let mut options = match &self.config {
            Some(path) => CertificateOptions::load(path)
                .await
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => CertificateOptions::default(),
        };
        self.apply(&mut options);
        Ok(options)
    }

    fn apply(self, options: &mut CertificateOptions) {
        if let Some(template) = self.template {
            options.template_path = template;
        }
        if let Some(participants) = self.participants {
            options.participants_path = participants;
        }
        if let Some(output_dir) = self.output_dir {
            options.output_dir = output_dir;
        }
        if let Some(name_font) = self.name_font {
            options.name_font_path = Some(name_font);
        }
        if let Some(code_font) = self.code_font {
            options.code_font_path = Some(code_font);
        }
        if let Some(size) = self.font_size {
            options.font_size_default = size;
        }
        if let Some(size) = self.min_font_size {
            options.font_size_min = size;
        }
        if let Some(event_code) = self.event_code {
            options.event_code = event_code;
        }
        if let Some(year) = self.year {
            options.year = year;
        }
    }
}

#[derive(Args)]
struct MailArgs {
    /// Sender address, also used as the SMTP login
    #[arg(long)]
    sender: Option<String>,

    /// SMTP app password
    #[arg(long, env = "CERT_SMTP_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Mail subject
    #[arg(long)]
    subject: Option<String>,

    /// SMTP server
    #[arg(long)]
    smtp_host: Option<String>,

    /// SMTP port (implicit TLS)
    #[arg(long)]
    smtp_port: Option<u16>,
}

impl MailArgs {
    fn apply(self, mail: &mut MailOptions) {
        if let Some(sender) = self.sender {
            mail.sender = sender;
        }
        if let Some(password) = self.password {
            mail.password = password;
        }
        if let Some(subject) = self.subject {
            mail.subject = subject;
        }
        if let Some(host) = self.smtp_host {
            mail.smtp_host = host;
        }
        if let Some(port) = self.smtp_port {
            mail.smtp_port = port;
        }
    }
}

/// Validate the options and load participants before any work starts.
///
/// Configuration problems come back as one [`ConfigError`] listing all of them.
async fn build_job(options: CertificateOptions, mode: RunMode) -> Result<CertificateJob> {
    let participants_path = options.participants_path.clone();
    match CertificateJob::load(options, mode).await {
        Ok(job) => Ok(job),
        Err(CertError::Config(config)) => Err(config.into()),
        Err(e) => Err(anyhow::Error::new(e).context(format!(
            "Failed to load participants from {}",
            participants_path.display()
        ))),
    }
}

/// Hand one command to the worker and print its updates until it finishes.
///
/// Returns whether everything succeeded.
async fn run(command: CertCommand) -> Result<bool> {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    let worker = tokio::spawn(worker_task(command_rx, update_tx));

    command_tx
        .send(command)
        .map_err(|_| anyhow!("Worker stopped before accepting the command"))?;
    drop(command_tx);

    let mut success = true;
    while let Some(update) = update_rx.recv().await {
        match update {
            CertUpdate::Log { message } => println!("{message}"),
            CertUpdate::Progress {
                operation,
                current,
                total,
            } => log::debug!("{operation}: {current}/{total}"),
            CertUpdate::PreviewReady { path, .. } => {
                println!("Preview saved to {}", path.display());
            }
            CertUpdate::BatchComplete { tally } => success &= tally.all_succeeded(),
            CertUpdate::Error { message } => {
                eprintln!("Error: {message}");
                success = false;
            }
        }
    }

    worker.await?;
    Ok(success)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logger::ConsoleLogger::new(cli.verbose).init()?;

    let command = match cli.command {
        Commands::InitConfig { path } => {
            CertificateOptions::default().save(&path).await?;
            println!("Default options written to {}", path.display());
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Preview { job, png } => {
            let options = job.resolve().await?;
            CertCommand::Preview {
                job: build_job(options, RunMode::Preview).await?,
                output_path: png,
            }
        }
        Commands::Generate { job } => {
            let options = job.resolve().await?;
            CertCommand::Generate {
                job: build_job(options, RunMode::Generate).await?,
            }
        }
        Commands::Send { job, mail } => {
            let mut options = job.resolve().await?;
            mail.apply(&mut options.mail);
            CertCommand::Send {
                job: build_job(options, RunMode::Send).await?,
            }
        }
    };

    if run(command).await? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
