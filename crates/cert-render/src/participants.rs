use crate::types::{CertError, ConfigError, Participant, Result};
use calamine::{Data, Reader, open_workbook_auto};
use std::io::Read;
use std::path::Path;

/// Supported participant file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    Csv,
    Spreadsheet,
}

impl SourceFormat {
    fn of(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Some(Self::Spreadsheet),
            _ => None,
        }
    }
}

/// Positions of the `Name` and `Email` columns
#[derive(Debug, Clone, Copy)]
struct ParticipantColumns {
    name: usize,
    email: usize,
}

impl ParticipantColumns {
    /// Match headers case-insensitively after trimming
    fn find<'a>(headers: impl IntoIterator<Item = &'a str>) -> std::result::Result<Self, ConfigError> {
        let mut name = None;
        let mut email = None;
        for (index, header) in headers.into_iter().enumerate() {
            let header = header.trim();
            if name.is_none() && header.eq_ignore_ascii_case("name") {
                name = Some(index);
            } else if email.is_none() && header.eq_ignore_ascii_case("email") {
                email = Some(index);
            }
        }
        match (name, email) {
            (Some(name), Some(email)) => Ok(Self { name, email }),
            _ => Err(ConfigError::new(
                "Participants file must contain 'Name' and 'Email' columns (case-insensitive)",
            )),
        }
    }

    /// Build a participant from one row; `None` when name or email is blank
    fn extract<'a>(&self, cell: impl Fn(usize) -> Option<&'a str>) -> Option<Participant> {
        let name = cell(self.name).unwrap_or("").trim();
        let email = cell(self.email).unwrap_or("").trim();
        if name.is_empty() || email.is_empty() {
            return None;
        }
        Some(Participant {
            name: name.to_string(),
            email: email.to_string(),
        })
    }
}

/// Load participants from a CSV file or the first worksheet of a spreadsheet.
///
/// The source needs `Name` and `Email` columns; headers are matched
/// case-insensitively after trimming and other columns are ignored. Rows whose
/// name or email is empty after trimming are dropped.
pub async fn load_participants(path: impl AsRef<Path>) -> Result<Vec<Participant>> {
    let path = path.as_ref().to_owned();

    let Some(format) = SourceFormat::of(&path) else {
        return Err(ConfigError::new(format!(
            "Participants file must be .csv, .xlsx or .xls: {}",
            path.display()
        ))
        .into());
    };

    let participants = match format {
        SourceFormat::Csv => {
            let contents = tokio::fs::read_to_string(&path).await?;
            tokio::task::spawn_blocking(move || parse_participants(contents.as_bytes())).await??
        }
        SourceFormat::Spreadsheet => {
            tokio::fs::metadata(&path).await?;
            let sheet_path = path.clone();
            tokio::task::spawn_blocking(move || read_spreadsheet(&sheet_path)).await??
        }
    };

    log::info!(
        "Participants loaded: {} ({} rows)",
        path.display(),
        participants.len()
    );
    Ok(participants)
}

/// Parse participant rows from any CSV reader
pub fn parse_participants(input: impl Read) -> Result<Vec<Participant>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let columns = ParticipantColumns::find(reader.headers()?.iter())?;

    let mut participants = Vec::new();
    for result in reader.records() {
        let record = result?;
        match columns.extract(|index| record.get(index)) {
            Some(participant) => participants.push(participant),
            None => log::debug!("Dropping incomplete participant row {:?}", record.position()),
        }
    }

    Ok(participants)
}

/// Read participants from the first worksheet; its first row holds the headers
pub fn read_spreadsheet(path: &Path) -> Result<Vec<Participant>> {
    let mut workbook = open_workbook_auto(path)?;
    let Some(range) = workbook.worksheet_range_at(0) else {
        return Err(ConfigError::new("Participants workbook has no worksheets").into());
    };
    let range = range?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<String>>());
    let headers = rows.next().unwrap_or_default();
    let columns = ParticipantColumns::find(headers.iter().map(String::as_str))?;

    let mut participants = Vec::new();
    for (offset, row) in rows.enumerate() {
        match columns.extract(|index| row.get(index).map(String::as_str)) {
            Some(participant) => participants.push(participant),
            None => log::debug!("Dropping incomplete participant row {}", offset + 2),
        }
    }

    Ok(participants)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_format() {
        assert_eq!(SourceFormat::of(Path::new("a.CSV")), Some(SourceFormat::Csv));
        assert_eq!(
            SourceFormat::of(Path::new("a.xlsx")),
            Some(SourceFormat::Spreadsheet)
        );
        assert_eq!(SourceFormat::of(Path::new("a.xls")), Some(SourceFormat::Spreadsheet));
        assert_eq!(SourceFormat::of(Path::new("a.txt")), None);
        assert_eq!(SourceFormat::of(Path::new("participants")), None);
    }

    #[test]
    fn test_first_matching_header_wins() {
        let columns = ParticipantColumns::find(["Email", " name ", "NAME"]).unwrap();
        assert_eq!((columns.name, columns.email), (1, 0));
    }
}
