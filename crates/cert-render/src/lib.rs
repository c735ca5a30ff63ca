pub mod constants;
mod fit;
mod fonts;
mod layout;
mod naming;
mod options;
mod participants;
mod pdf;
mod render;
mod types;
mod underline;

pub use fit::{FittedText, fit_font_size};
pub use fonts::*;
pub use layout::{TextWindow, code_origin, name_origin, underline_gap};
pub use naming::{artifact_file_name, safe_filename, security_code, title_case_name};
pub use options::*;
pub use participants::{load_participants, parse_participants, read_spreadsheet};
pub use pdf::{image_to_pdf_bytes, image_to_pdf_bytes_async, save_pdf};
pub use render::{
    compose_certificate, load_template, render_certificate, render_certificate_async,
    template_dimensions,
};
pub use types::*;
pub use underline::{detect_underline, locate_underline, longest_dark_run, underline_span};
