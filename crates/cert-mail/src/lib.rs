//! Certificate delivery over an authenticated, TLS-wrapped SMTP submission
//!
//! [`Mailer`] is the seam the batch runner talks to; [`SmtpMailer`] is the
//! production implementation.

use lettre::message::header::{ContentType, ContentTypeErr};
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::future::Future;
use thiserror::Error;

const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("Message error: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("Invalid content type: {0}")]
    ContentType(#[from] ContentTypeErr),
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

pub type Result<T> = std::result::Result<T, DeliveryError>;

/// One certificate addressed to one recipient
#[derive(Debug, Clone)]
pub struct CertificateMail {
    pub recipient: String,
    pub subject: String,
    pub attachment_name: String,
    pub pdf_bytes: Vec<u8>,
}

/// Something that can deliver a certificate mail
pub trait Mailer: Send + Sync {
    fn deliver(&self, mail: CertificateMail) -> impl Future<Output = Result<()>> + Send;
}

/// Build the message: empty body, the PDF as its only attachment
pub fn build_message(sender: &Mailbox, mail: &CertificateMail) -> Result<Message> {
    let recipient: Mailbox = mail.recipient.trim().parse()?;
    let content_type = ContentType::parse(PDF_CONTENT_TYPE)?;
    let attachment =
        Attachment::new(mail.attachment_name.clone()).body(mail.pdf_bytes.clone(), content_type);

    let message = Message::builder()
        .from(sender.clone())
        .to(recipient)
        .subject(mail.subject.clone())
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(String::new()))
                .singlepart(attachment),
        )?;

    Ok(message)
}

/// SMTP over implicit TLS, authenticated as the sender.
///
/// Credentials live only as long as this value; nothing is persisted.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailer {
    pub fn new(host: &str, port: u16, sender: &str, password: &str) -> Result<Self> {
        let sender = sender.trim();
        let mailbox: Mailbox = sender.parse()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host.trim())?
            .port(port)
            .credentials(Credentials::new(sender.to_string(), password.to_string()))
            .build();

        log::debug!("SMTP transport ready for {host}:{port} as {sender}");
        Ok(Self {
            transport,
            sender: mailbox,
        })
    }
}

impl Mailer for SmtpMailer {
    async fn deliver(&self, mail: CertificateMail) -> Result<()> {
        let message = build_message(&self.sender, &mail)?;
        self.transport.send(message).await?;
        log::debug!("Delivered {} to {}", mail.attachment_name, mail.recipient);
        Ok(())
    }
}
