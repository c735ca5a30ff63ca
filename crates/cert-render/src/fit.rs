use crate::constants::FONT_SIZE_STEP;
use crate::fonts::{FontHandle, TextBounds};

/// Font size chosen for a piece of text and the ink box it produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FittedText {
    pub font_size: u32,
    pub bounds: TextBounds,
}

/// Shrink-to-fit: the largest size in `initial_size, initial_size - 2, ...`
/// whose ink width fits `max_width`, never going below `min_size`.
///
/// `min_size` is used as the last resort even when the text still overflows.
pub fn fit_font_size(
    text: &str,
    max_width: u32,
    initial_size: u32,
    min_size: u32,
    font: &FontHandle,
) -> FittedText {
    let floor = min_size.min(initial_size);
    let mut size = initial_size;

    loop {
        let bounds = font.measure(text, size);
        log::debug!(
            "Font size {size}, text width: {}, max allowed: {max_width}",
            bounds.width()
        );

        if bounds.width() <= max_width || size <= floor {
            return FittedText {
                font_size: size,
                bounds,
            };
        }

        size = size.saturating_sub(FONT_SIZE_STEP).max(floor);
    }
}
