use super::{BatchError, Reporter, load_fonts};
use crate::CertUpdate;
use cert_render::{CertificateJob, RenderError, render_certificate_async};
use std::path::Path;
use tokio::sync::mpsc;

/// Render the first participant and write it as a PNG at `output_path`
pub async fn run_preview(
    job: &CertificateJob,
    output_path: &Path,
    update_tx: &mpsc::UnboundedSender<CertUpdate>,
) {
    let reporter = Reporter::new(update_tx);

    match render_preview(job, output_path, &reporter).await {
        Ok(diagnostics) => {
            reporter.log(format!("Preview info: {diagnostics}"));
            let _ = update_tx.send(CertUpdate::PreviewReady {
                path: output_path.to_path_buf(),
                diagnostics,
            });
        }
        Err(e) => reporter.error(format!("Preview failed: {e}")),
    }
}

async fn render_preview(
    job: &CertificateJob,
    output_path: &Path,
    reporter: &Reporter<'_>,
) -> Result<String, BatchError> {
    let Some(participant) = job.participants().first() else {
        return Err(BatchError::Rejected("No participants to preview".to_string()));
    };

    super::report_template(job, reporter);
    let fonts = load_fonts(job).await?;

    reporter.log(format!("Generating preview for: {}", participant.name));
    let options = job.options();
    let rendered = render_certificate_async(
        &options.template_path,
        &participant.name,
        &fonts.name,
        &fonts.code,
        &options.render_spec(1),
    )
    .await?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let diagnostics = rendered.diagnostics();
    let path = output_path.to_path_buf();
    tokio::task::spawn_blocking(move || rendered.image.save(&path).map_err(RenderError::Encode))
        .await??;

    log::info!("Preview written to {}", output_path.display());
    Ok(diagnostics)
}
