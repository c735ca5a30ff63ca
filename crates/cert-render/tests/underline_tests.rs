use cert_render::*;
use image::{GrayImage, Luma};

const WHITE: Luma<u8> = Luma([255]);
const BLACK: Luma<u8> = Luma([0]);

fn blank(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height, WHITE)
}

fn bar(image: &mut GrayImage, row: u32, left: u32, right: u32) {
    for x in left..=right {
        image.put_pixel(x, row, BLACK);
    }
}

#[test]
fn test_detects_bar_in_middle_third() {
    let mut gray = blank(400, 300);
    bar(&mut gray, 150, 100, 299);

    assert_eq!(locate_underline(&gray, 100), Some(150));
    assert_eq!(
        underline_span(&gray, 150, 100),
        Some(UnderlineSpan {
            row: 150,
            left: 100,
            right: 299,
        })
    );
}

#[test]
fn test_short_bar_rejected() {
    let mut gray = blank(400, 300);
    // 59 pixels < 15% of 400
    bar(&mut gray, 150, 100, 158);
    assert_eq!(locate_underline(&gray, 100), None);

    // exactly 60 pixels is accepted
    bar(&mut gray, 150, 100, 159);
    assert_eq!(locate_underline(&gray, 100), Some(150));
}

#[test]
fn test_bar_outside_middle_third_ignored() {
    let mut gray = blank(400, 300);
    bar(&mut gray, 99, 0, 399);
    bar(&mut gray, 200, 0, 399);
    assert_eq!(locate_underline(&gray, 100), None);

    bar(&mut gray, 100, 0, 399);
    assert_eq!(locate_underline(&gray, 100), Some(100));
}

#[test]
fn test_thick_bar_reports_first_row() {
    let mut gray = blank(400, 300);
    for row in 160..164 {
        bar(&mut gray, row, 50, 349);
    }
    assert_eq!(locate_underline(&gray, 100), Some(160));
}

#[test]
fn test_longest_bar_wins() {
    let mut gray = blank(400, 300);
    bar(&mut gray, 110, 0, 149);
    bar(&mut gray, 180, 0, 249);
    assert_eq!(locate_underline(&gray, 100), Some(180));
}

#[test]
fn test_gray_pixels_are_not_dark() {
    let mut gray = blank(400, 300);
    for x in 0..400 {
        gray.put_pixel(x, 150, Luma([120]));
    }
    assert_eq!(locate_underline(&gray, 100), None);
}

#[test]
fn test_span_reaching_right_edge() {
    let mut gray = blank(400, 300);
    bar(&mut gray, 150, 20, 30);
    bar(&mut gray, 150, 200, 399);

    let (row, span) = detect_underline(&gray, 100);
    assert_eq!(row, Some(150));
    let span = span.unwrap();
    assert_eq!((span.left, span.right), (200, 399));
    assert_eq!(span.run_length(), 200);
}

#[test]
fn test_window_falls_back_without_underline() {
    let gray = blank(1000, 600);
    let (row, span) = detect_underline(&gray, 100);
    assert_eq!(row, None);

    let window = TextWindow::for_template(span, 1000);
    assert_eq!(window, TextWindow::fallback(1000));
    assert_eq!(window.max_width, 700);
}
