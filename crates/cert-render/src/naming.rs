//! Text rules for names, file names and security codes

/// Title-case a raw name: split on whitespace, capitalize each word
/// (first letter upper, rest lower) and rejoin with single spaces.
pub fn title_case_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Keep alphanumerics, spaces, underscores and hyphens, then trim.
pub fn safe_filename(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// `{event_code}-{year}-{index:03}`
pub fn security_code(event_code: &str, year: &str, sequence_index: usize) -> String {
    format!("{event_code}-{year}-{sequence_index:03}")
}

/// `{sanitized name}_{index:03}.pdf`
pub fn artifact_file_name(name: &str, sequence_index: usize) -> String {
    format!("{}_{sequence_index:03}.pdf", safe_filename(name))
}
