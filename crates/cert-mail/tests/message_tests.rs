use cert_mail::*;
use lettre::message::Mailbox;

fn mail() -> CertificateMail {
    CertificateMail {
        recipient: " ada@example.com ".to_string(),
        subject: "Your certificate".to_string(),
        attachment_name: "Ada Lovelace_001.pdf".to_string(),
        pdf_bytes: b"%PDF-1.3 fake".to_vec(),
    }
}

fn sender() -> Mailbox {
    "events@example.com".parse().unwrap()
}

#[test]
fn test_message_headers_and_attachment() {
    let message = build_message(&sender(), &mail()).unwrap();
    let formatted = String::from_utf8(message.formatted()).unwrap();

    assert!(formatted.contains("From: events@example.com"));
    assert!(formatted.contains("To: ada@example.com"));
    assert!(formatted.contains("Subject: Your certificate"));
    assert!(formatted.contains("multipart/mixed"));
    assert!(formatted.contains("application/pdf"));
    assert!(formatted.contains("Ada Lovelace_001.pdf"));
}

#[test]
fn test_envelope_has_single_recipient() {
    let message = build_message(&sender(), &mail()).unwrap();
    let envelope = message.envelope();
    assert_eq!(envelope.to().len(), 1);
    assert_eq!(envelope.to()[0].to_string(), "ada@example.com");
}

#[test]
fn test_invalid_recipient() {
    let mut bad = mail();
    bad.recipient = "not an address".to_string();
    assert!(matches!(
        build_message(&sender(), &bad),
        Err(DeliveryError::Address(_))
    ));
}

#[test]
fn test_invalid_sender() {
    let result = SmtpMailer::new("smtp.example.com", 465, "nobody", "secret");
    assert!(matches!(result, Err(DeliveryError::Address(_))));
}
