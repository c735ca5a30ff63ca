//! Horizontal window and vertical anchor for the participant name

use crate::constants::*;
use crate::fonts::TextBounds;
use crate::types::UnderlineSpan;

/// Horizontal band the name is centered in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextWindow {
    pub center_x: i32,
    pub max_width: u32,
}

impl TextWindow {
    /// Widen the underline by 10% of its width on each side, clamped to the image
    pub fn from_span(span: UnderlineSpan, image_width: u32) -> Self {
        let padding = ((span.right - span.left) as f32 * UNDERLINE_PADDING_FRACTION) as u32;
        let left = span.left.saturating_sub(padding);
        let right = (span.right + padding).min(image_width);
        Self {
            center_x: ((left + right) / 2) as i32,
            max_width: right - left,
        }
    }

    /// Symmetric 15% margins
    pub fn fallback(image_width: u32) -> Self {
        let margin = (image_width as f32 * FALLBACK_MARGIN_FRACTION) as u32;
        Self {
            center_x: (image_width / 2) as i32,
            max_width: image_width.saturating_sub(margin * 2),
        }
    }

    pub fn for_template(span: Option<UnderlineSpan>, image_width: u32) -> Self {
        match span {
            Some(span) => Self::from_span(span, image_width),
            None => Self::fallback(image_width),
        }
    }
}

/// Vertical gap kept between the name and the underline
pub fn underline_gap(text_height: u32) -> i32 {
    MIN_UNDERLINE_GAP.max((text_height as f32 * UNDERLINE_GAP_FRACTION) as i32)
}

/// Drawing origin for the name so that its ink box is centered in `window`
/// and sits above `underline_row` (or around the upper third when absent).
pub fn name_origin(
    window: TextWindow,
    bounds: TextBounds,
    underline_row: Option<u32>,
    image_height: u32,
) -> (i32, i32) {
    let ink_left = window.center_x - bounds.width() as i32 / 2;
    let ink_top = match underline_row {
        Some(row) => row as i32 - underline_gap(bounds.height()) - bounds.height() as i32,
        None => (image_height / 3) as i32 - bounds.height() as i32 / 2,
    };
    (ink_left - bounds.min_x, ink_top - bounds.min_y)
}

/// Drawing origin for the security code: ink box 12px from the left and bottom edges
pub fn code_origin(bounds: TextBounds, image_height: u32) -> (i32, i32) {
    let ink_top = image_height as i32 - CODE_PADDING_BOTTOM - bounds.height() as i32;
    (CODE_PADDING_LEFT - bounds.min_x, ink_top - bounds.min_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(width: i32, height: i32) -> TextBounds {
        TextBounds {
            min_x: 2,
            min_y: 5,
            max_x: 2 + width,
            max_y: 5 + height,
        }
    }

    #[test]
    fn test_window_from_span() {
        let span = UnderlineSpan {
            row: 50,
            left: 100,
            right: 300,
        };
        let window = TextWindow::from_span(span, 400);
        // padding = 20 → [80, 320]
        assert_eq!(window.max_width, 240);
        assert_eq!(window.center_x, 200);
    }

    #[test]
    fn test_window_clamped_to_image() {
        let span = UnderlineSpan {
            row: 50,
            left: 5,
            right: 399,
        };
        let window = TextWindow::from_span(span, 400);
        // padding = 39 → [0, 400]
        assert_eq!(window.max_width, 400);
        assert_eq!(window.center_x, 200);
    }

    #[test]
    fn test_fallback_window() {
        let window = TextWindow::fallback(1000);
        assert_eq!(window.max_width, 700);
        assert_eq!(window.center_x, 500);
    }

    #[test]
    fn test_gap_minimum() {
        assert_eq!(underline_gap(10), 25);
        assert_eq!(underline_gap(100), 40);
    }

    #[test]
    fn test_name_above_underline() {
        let window = TextWindow {
            center_x: 200,
            max_width: 300,
        };
        let b = bounds(100, 20);
        let (x, y) = name_origin(window, b, Some(150), 300);
        // ink box spans [150, 250) horizontally
        assert_eq!(x + b.min_x, 150);
        // ink bottom sits 25px above the underline
        assert_eq!(y + b.max_y, 125);
    }

    #[test]
    fn test_name_without_underline() {
        let window = TextWindow {
            center_x: 200,
            max_width: 300,
        };
        let b = bounds(100, 20);
        let (_, y) = name_origin(window, b, None, 300);
        assert_eq!(y + b.min_y, 90);
    }

    #[test]
    fn test_code_origin() {
        let b = bounds(60, 8);
        let (x, y) = code_origin(b, 300);
        assert_eq!(x + b.min_x, 12);
        assert_eq!(y + b.max_y, 288);
    }
}
