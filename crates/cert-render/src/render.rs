use crate::constants::*;
use crate::fit::fit_font_size;
use crate::fonts::FontHandle;
use crate::layout::{TextWindow, code_origin, name_origin};
use crate::naming::{security_code, title_case_name};
use crate::types::{RenderError, RenderSpec, RenderedCertificate};
use crate::underline::detect_underline;
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};

/// Open a template image as RGB
pub fn load_template(path: &Path) -> Result<RgbImage, RenderError> {
    let image = image::open(path).map_err(|source| RenderError::Template {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgb8())
}

/// Width and height of a template without decoding its pixels
pub fn template_dimensions(path: &Path) -> Result<(u32, u32), RenderError> {
    image::image_dimensions(path).map_err(|source| RenderError::Template {
        path: path.to_path_buf(),
        source,
    })
}

/// Render a participant's certificate from the template at `template_path`
pub fn render_certificate(
    template_path: &Path,
    name_raw: &str,
    name_font: &FontHandle,
    code_font: &FontHandle,
    spec: &RenderSpec,
) -> Result<RenderedCertificate, RenderError> {
    let template = load_template(template_path)?;
    Ok(compose_certificate(template, name_raw, name_font, code_font, spec))
}

/// Render on a blocking thread
pub async fn render_certificate_async(
    template_path: impl AsRef<Path>,
    name_raw: &str,
    name_font: &FontHandle,
    code_font: &FontHandle,
    spec: &RenderSpec,
) -> Result<RenderedCertificate, RenderError> {
    let template_path: PathBuf = template_path.as_ref().to_owned();
    let name_raw = name_raw.to_owned();
    let name_font = name_font.clone();
    let code_font = code_font.clone();
    let spec = spec.clone();

    tokio::task::spawn_blocking(move || {
        render_certificate(&template_path, &name_raw, &name_font, &code_font, &spec)
    })
    .await?
}

/// Draw the name and security code onto an already loaded template
pub fn compose_certificate(
    mut image: RgbImage,
    name_raw: &str,
    name_font: &FontHandle,
    code_font: &FontHandle,
    spec: &RenderSpec,
) -> RenderedCertificate {
    let name = title_case_name(name_raw);
    let (width, height) = image.dimensions();

    let gray = image::imageops::grayscale(&image);
    let (underline_row, span) = detect_underline(&gray, DARKNESS_THRESHOLD);
    log::debug!("Detected underline at y={underline_row:?}");

    let window = TextWindow::for_template(span, width);
    match span {
        Some(span) => log::debug!(
            "Underline bounds: {}-{}, text width: {}",
            span.left,
            span.right,
            window.max_width
        ),
        None => log::debug!("No usable underline, using fallback width: {}", window.max_width),
    }

    let fitted = fit_font_size(
        &name,
        window.max_width,
        spec.font_size_default,
        spec.font_size_min,
        name_font,
    );
    let (x, y) = name_origin(window, fitted.bounds, underline_row, height);
    log::debug!(
        "Text position: ({x}, {y}), size: {}x{}, font size: {}",
        fitted.bounds.width(),
        fitted.bounds.height(),
        fitted.font_size
    );

    draw_outlined_text(&mut image, &name, fitted.font_size, (x, y), name_font);

    let code = security_code(&spec.event_code, &spec.year, spec.sequence_index);
    let code_bounds = code_font.measure(&code, CODE_FONT_SIZE);
    let code_at = code_origin(code_bounds, height);
    code_font.draw(&mut image, &code, CODE_FONT_SIZE, code_at, Rgb(TEXT_COLOR));
    log::debug!("Security code '{code}' at {code_at:?}");

    RenderedCertificate {
        image,
        font_size: fitted.font_size,
        text_width: fitted.bounds.width(),
        max_text_width: window.max_width,
        underline_row,
        security_code: code,
    }
}

/// Soft outline: gray copies shifted around the origin, then black on top
fn draw_outlined_text(
    image: &mut RgbImage,
    text: &str,
    font_size: u32,
    origin: (i32, i32),
    font: &FontHandle,
) {
    let radius = (font_size / OUTLINE_DIVISOR).max(1) as i32;
    for dx in -radius..=radius {
        for dy in -radius..=radius {
            if dx != 0 || dy != 0 {
                font.draw(
                    image,
                    text,
                    font_size,
                    (origin.0 + dx, origin.1 + dy),
                    Rgb(OUTLINE_COLOR),
                );
            }
        }
    }
    font.draw(image, text, font_size, origin, Rgb(TEXT_COLOR));
}
