use cert_render::*;

#[test]
fn test_title_case_name() {
    assert_eq!(title_case_name("ada lovelace"), "Ada Lovelace");
    assert_eq!(title_case_name("  GRACE   brewster  HOPPER "), "Grace Brewster Hopper");
    assert_eq!(title_case_name("mary-jane o'neil"), "Mary-jane O'neil");
    assert_eq!(title_case_name("\tx\ny"), "X Y");
    assert_eq!(title_case_name("   "), "");
}

#[test]
fn test_title_case_idempotent() {
    let names = [
        "alan turing",
        "EDSGER W DIJKSTRA",
        "bArBaRa   liskov",
        "ken",
        "Donald Knuth",
    ];
    for name in names {
        let once = title_case_name(name);
        assert_eq!(title_case_name(&once), once, "not idempotent for {name:?}");
    }
}

#[test]
fn test_safe_filename() {
    assert_eq!(safe_filename("O'Brien-Smith Jr."), "OBrien-Smith Jr");
    assert_eq!(safe_filename("  ../etc/passwd  "), "etcpasswd");
    assert_eq!(safe_filename("snake_case name"), "snake_case name");
    assert_eq!(safe_filename("José Ñúñez"), "José Ñúñez");
    assert_eq!(safe_filename("!!!"), "");
}

#[test]
fn test_security_code() {
    assert_eq!(security_code("quiz", "25", 7), "quiz-25-007");
    assert_eq!(security_code("hack", "24", 42), "hack-24-042");
    assert_eq!(security_code("hack", "24", 1234), "hack-24-1234");
}

#[test]
fn test_artifact_file_name() {
    assert_eq!(artifact_file_name("O'Brien-Smith Jr.", 3), "OBrien-Smith Jr_003.pdf");
    assert_eq!(artifact_file_name("ada lovelace", 12), "ada lovelace_012.pdf");
}
