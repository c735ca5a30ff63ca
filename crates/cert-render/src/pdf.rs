use crate::constants::PDF_DPI;
use crate::types::RenderError;
use ::image::RgbImage;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Pt, RawImage, RawImageData, RawImageFormat,
    XObjectTransform,
};
use std::path::Path;

/// Encode a certificate as a single-page PDF.
///
/// The page is exactly the size of the image at 72 DPI and the pixels are
/// embedded unchanged as an RGB8 image XObject.
pub fn image_to_pdf_bytes(image: &RgbImage, title: &str) -> Result<Vec<u8>, RenderError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(RenderError::Pdf("Cannot export an empty image".to_string()));
    }

    let mut doc = PdfDocument::new(title);

    let raw = RawImage {
        pixels: RawImageData::U8(image.as_raw().clone()),
        width: width as usize,
        height: height as usize,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    };
    let image_id = doc.add_image(&raw);

    let ops = vec![Op::UseXobject {
        id: image_id,
        transform: XObjectTransform {
            dpi: Some(PDF_DPI),
            ..Default::default()
        },
    }];

    let page_width = Mm::from(Pt(width as f32));
    let page_height = Mm::from(Pt(height as f32));
    doc.pages.push(PdfPage::new(page_width, page_height, ops));

    // Image optimization would resample and recompress the certificate
    let save_options = PdfSaveOptions {
        image_optimization: None,
        ..Default::default()
    };
    let mut warnings = Vec::new();
    let bytes = doc.save(&save_options, &mut warnings);
    if !warnings.is_empty() {
        log::debug!("PDF export produced {} warning(s)", warnings.len());
    }

    Ok(bytes)
}

/// Encode on a blocking thread
pub async fn image_to_pdf_bytes_async(
    image: RgbImage,
    title: String,
) -> Result<Vec<u8>, RenderError> {
    tokio::task::spawn_blocking(move || image_to_pdf_bytes(&image, &title)).await?
}

/// Write PDF bytes to disk
pub async fn save_pdf(bytes: &[u8], path: impl AsRef<Path>) -> Result<(), RenderError> {
    tokio::fs::write(path, bytes).await?;
    Ok(())
}
