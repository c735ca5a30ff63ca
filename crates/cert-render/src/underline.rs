//! Underline detection on grayscale templates

use crate::constants::{MIN_UNDERLINE_PERCENT, STRICT_UNDERLINE_PERCENT};
use crate::types::UnderlineSpan;
use image::GrayImage;

/// Longest contiguous run of dark pixels on one row.
///
/// Returns `(start_column, length)`; the first run wins ties. A run that
/// reaches the last column is closed at `width - 1`.
pub fn longest_dark_run(gray: &GrayImage, row: u32, threshold: u8) -> Option<(u32, u32)> {
    let mut best: Option<(u32, u32)> = None;
    let mut current_start = 0;
    let mut current_len = 0;

    for x in 0..gray.width() {
        if gray.get_pixel(x, row).0[0] < threshold {
            if current_len == 0 {
                current_start = x;
            }
            current_len += 1;
            if best.is_none_or(|(_, len)| current_len > len) {
                best = Some((current_start, current_len));
            }
        } else {
            current_len = 0;
        }
    }

    best
}

/// Find the row of the longest horizontal dark run in the middle third.
///
/// Rows `H/3 .. 2H/3` are scanned; the lowest row wins ties. The row is
/// accepted only if its run covers at least 15% of the image width.
pub fn locate_underline(gray: &GrayImage, threshold: u8) -> Option<u32> {
    let (width, height) = gray.dimensions();
    let top = height / 3;
    let bottom = 2 * height / 3;

    let mut best_row = None;
    let mut best_run = 0;

    for y in top..bottom {
        if let Some((_, run)) = longest_dark_run(gray, y, threshold) {
            if run > best_run {
                best_run = run;
                best_row = Some(y);
            }
        }
    }

    let row = best_row?;
    let covers =
        |percent: u32| u64::from(best_run) * 100 >= u64::from(width) * u64::from(percent);
    if covers(STRICT_UNDERLINE_PERCENT) || covers(MIN_UNDERLINE_PERCENT) {
        Some(row)
    } else {
        None
    }
}

/// Re-scan a detected underline row for the exact bounds of its run
pub fn underline_span(gray: &GrayImage, row: u32, threshold: u8) -> Option<UnderlineSpan> {
    if row >= gray.height() {
        return None;
    }
    longest_dark_run(gray, row, threshold).map(|(left, len)| UnderlineSpan {
        row,
        left,
        right: left + len - 1,
    })
}

/// Locate the underline and recover its span in one call
pub fn detect_underline(gray: &GrayImage, threshold: u8) -> (Option<u32>, Option<UnderlineSpan>) {
    match locate_underline(gray, threshold) {
        Some(row) => (Some(row), underline_span(gray, row, threshold)),
        None => (None, None),
    }
}
