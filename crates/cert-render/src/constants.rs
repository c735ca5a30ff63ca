//! Shared constants for certificate layout
//!
//! This module centralizes the fixed numbers of the single certificate layout:
//! underline detection thresholds, margins, spacing and the security code block.

// =============================================================================
// Underline Detection
// =============================================================================

/// Luminance below which a pixel counts as dark (0-255 scale)
pub const DARKNESS_THRESHOLD: u8 = 100;

/// A run this long (percent of image width) is accepted as an underline
pub const MIN_UNDERLINE_PERCENT: u32 = 15;

/// Secondary acceptance percentage. Any run that meets it also meets
/// [`MIN_UNDERLINE_PERCENT`], so on its own it never changes the outcome.
pub const STRICT_UNDERLINE_PERCENT: u32 = 40;

/// Extra room granted on each side of a detected underline (fraction of its width)
pub const UNDERLINE_PADDING_FRACTION: f32 = 0.1;

// =============================================================================
// Name Placement
// =============================================================================

/// Side margin used when no underline is found (fraction of image width)
pub const FALLBACK_MARGIN_FRACTION: f32 = 0.15;

/// Minimum gap between the bottom of the name and the underline (pixels)
pub const MIN_UNDERLINE_GAP: i32 = 25;

/// Gap as a fraction of the rendered name height
pub const UNDERLINE_GAP_FRACTION: f32 = 0.4;

/// Font size decrement per shrink-to-fit step
pub const FONT_SIZE_STEP: u32 = 2;

/// Smallest font size accepted in configuration
pub const MIN_CONFIGURABLE_FONT_SIZE: u32 = 10;

/// Outline radius is `font_size / OUTLINE_DIVISOR` (at least 1 pixel)
pub const OUTLINE_DIVISOR: u32 = 40;

/// Outline pass color
pub const OUTLINE_COLOR: [u8; 3] = [64, 64, 64];

/// Final text color
pub const TEXT_COLOR: [u8; 3] = [0, 0, 0];

// =============================================================================
// Security Code
// =============================================================================

/// Security code font size
pub const CODE_FONT_SIZE: u32 = 10;

/// Distance of the code from the left edge (pixels)
pub const CODE_PADDING_LEFT: i32 = 12;

/// Distance of the code from the bottom edge (pixels)
pub const CODE_PADDING_BOTTOM: i32 = 12;

// =============================================================================
// Document Export
// =============================================================================

/// Resolution used when placing the certificate on a PDF page.
/// At 72 DPI one image pixel maps to one PDF point.
pub const PDF_DPI: f32 = 72.0;
