use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use log::debug;

use crate::errors::*;

#[derive(Debug)]
pub struct SmtpSettings<'a> {
    pub server: &'a str,
    pub port: u16,
    pub username: &'a str,
    pub password: &'a str,
    pub from: &'a str,
    /// Comma-separated recipient addresses.
    pub to: &'a str,
}

pub struct EmailSender {
    transport: SmtpTransport,
    server_description: String,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl EmailSender {
    pub fn new(settings: &SmtpSettings) -> Result<EmailSender> {
        let from = settings
            .from
            .trim()
            .parse::<Mailbox>()
            .chain_err(|| format!("Invalid sender email address: {}", settings.from))?;
        let to = parse_mailboxes(settings.to)?;
        let transport = SmtpTransport::starttls_relay(settings.server)
            .chain_err(|| format!("Failed to configure SMTP server: {}", settings.server))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.to_string(),
                settings.password.to_string(),
            ))
            .build();
        Ok(EmailSender {
            transport,
            server_description: format!("{}:{}", settings.server, settings.port),
            from,
            to,
        })
    }

    pub fn send_email(&self, subject: &str, html: String, text: String) -> Result<()> {
        let message = build_message(&self.from, &self.to, subject, html, text)?;
        println!("  Sending \"{}\" via {}...", subject, self.server_description);
        let response = self
            .transport
            .send(&message)
            .chain_err(|| format!("Failed to send email: {}", subject))?;
        debug!("SMTP response: {:?}", response);
        Ok(())
    }
}

pub fn parse_mailboxes(addresses: &str) -> Result<Vec<Mailbox>> {
    let mailboxes = addresses
        .split(',')
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(|address| {
            address
                .parse::<Mailbox>()
                .chain_err(|| format!("Invalid recipient email address: {}", address))
        })
        .collect::<Result<Vec<_>>>()?;
    ensure!(!mailboxes.is_empty(), "No recipient email addresses given");
    Ok(mailboxes)
}

pub fn build_message(
    from: &Mailbox,
    to: &[Mailbox],
    subject: &str,
    html: String,
    text: String,
) -> Result<Message> {
    let mut builder = Message::builder().from(from.clone()).subject(subject);
    for recipient in to {
        builder = builder.to(recipient.clone());
    }
    builder
        .multipart(MultiPart::alternative_plain_html(text, html))
        .chain_err(|| format!("Failed to build email: {}", subject))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mailboxes() {
        let mailboxes = parse_mailboxes("me@example.com, Partner <partner@example.org>,").unwrap();
        assert_eq!(mailboxes.len(), 2);
        assert_eq!(mailboxes[0].email.to_string(), "me@example.com");
        assert_eq!(mailboxes[1].email.to_string(), "partner@example.org");
        assert_eq!(mailboxes[1].name.as_deref(), Some("Partner"));
    }

    #[test]
    fn test_parse_mailboxes_rejects_invalid_and_empty() {
        assert!(parse_mailboxes("not an address").is_err());
        assert!(parse_mailboxes(" , ").is_err());
    }

    #[test]
    fn test_build_message() {
        let from: Mailbox = "Budget Bot <bot@example.com>".parse().unwrap();
        let to = parse_mailboxes("me@example.com, partner@example.org").unwrap();
        let message = build_message(
            &from,
            &to,
            "Weekly Budget Recap - March 11, 2024",
            "<h1>Weekly</h1>".to_string(),
            "Weekly".to_string(),
        )
        .unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("Subject: Weekly Budget Recap - March 11, 2024"));
        assert!(formatted.contains("bot@example.com"));
        assert!(formatted.contains("me@example.com"));
        assert!(formatted.contains("partner@example.org"));
        assert!(formatted.contains("multipart/alternative"));
        assert!(formatted.contains("text/html"));
        assert!(formatted.contains("text/plain"));
    }
}
