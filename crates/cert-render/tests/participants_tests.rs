use cert_render::*;

#[test]
fn test_drops_incomplete_rows() {
    let csv = "Name,Email\nAda Lovelace,ada@example.com\nGrace Hopper,\nAlan Turing,alan@example.com\n";
    let participants = parse_participants(csv.as_bytes()).unwrap();
    assert_eq!(
        participants,
        vec![
            Participant {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
            },
            Participant {
                name: "Alan Turing".to_string(),
                email: "alan@example.com".to_string(),
            },
        ]
    );
}

#[test]
fn test_headers_case_insensitive_and_trimmed() {
    let csv = "id, NAME ,team,eMail\n1,  Ada  ,red,  ada@example.com \n2,   ,blue,x@example.com\n";
    let participants = parse_participants(csv.as_bytes()).unwrap();
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0].name, "Ada");
    assert_eq!(participants[0].email, "ada@example.com");
}

#[test]
fn test_short_rows_tolerated() {
    let csv = "Name,Email\nAda\nGrace,grace@example.com\n";
    let participants = parse_participants(csv.as_bytes()).unwrap();
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0].name, "Grace");
}

#[test]
fn test_missing_columns() {
    let csv = "Name,Phone\nAda,123\n";
    match parse_participants(csv.as_bytes()) {
        Err(CertError::Config(e)) => assert!(e.contains("'Name' and 'Email'")),
        other => panic!("Expected Config error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("participants.csv");
    std::fs::write(
        &path,
        "Name,Email\nAda,ada@example.com\nGrace,\nAlan,alan@example.com\n",
    )
    .unwrap();

    let participants = load_participants(&path).await.unwrap();
    assert_eq!(participants.len(), 2);
    assert_eq!(participants[1].to_string(), "Alan <alan@example.com>");
}

#[tokio::test]
async fn test_rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("participants.txt");
    std::fs::write(&path, "Name,Email\nAda,ada@example.com\n").unwrap();

    match load_participants(&path).await {
        Err(CertError::Config(e)) => assert!(e.contains(".csv, .xlsx or .xls")),
        other => panic!("Expected Config error, got {other:?}"),
    }
}

fn write_workbook(path: &std::path::Path, rows: &[[&str; 3]]) {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
    }
    workbook.save(path).unwrap();
}

#[tokio::test]
async fn test_load_from_xlsx() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("participants.xlsx");
    write_workbook(
        &path,
        &[
            [" NAME ", "Team", "eMail"],
            ["Ada Lovelace", "red", " ada@example.com "],
            ["Grace Hopper", "blue", ""],
            ["   ", "green", "nobody@example.com"],
            ["Alan Turing", "", "alan@example.com"],
        ],
    );

    let participants = load_participants(&path).await.unwrap();
    assert_eq!(
        participants,
        vec![
            Participant {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
            },
            Participant {
                name: "Alan Turing".to_string(),
                email: "alan@example.com".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn test_xlsx_missing_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("participants.xlsx");
    write_workbook(&path, &[["Name", "Phone", ""], ["Ada", "123", ""]]);

    match load_participants(&path).await {
        Err(CertError::Config(e)) => assert!(e.contains("'Name' and 'Email'")),
        other => panic!("Expected Config error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_corrupt_xlsx_is_spreadsheet_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("participants.xlsx");
    std::fs::write(&path, b"not a zip archive").unwrap();

    let result = load_participants(&path).await;
    assert!(matches!(result, Err(CertError::Spreadsheet(_))));
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let result = load_participants("/no/such/participants.csv").await;
    assert!(matches!(result, Err(CertError::Io(_))));

    let result = load_participants("/no/such/participants.xlsx").await;
    assert!(matches!(result, Err(CertError::Io(_))));
}
