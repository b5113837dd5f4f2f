//! Outgoing mail messages

use chrono::{DateTime, Utc};
use uuid::Uuid;
use verifier_errors::MailError;
use verifier_text::is_email;

/// A plain-text message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailMessage {
    pub from: Option<String>,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl MailMessage {
    #[must_use]
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn sender(mut self, address: impl Into<String>) -> Self {
        self.from = Some(address.into());
        self
    }

    #[must_use]
    pub fn recipient(mut self, address: impl Into<String>) -> Self {
        self.to.push(address.into());
        self
    }

    /// Check addresses and headers before delivery
    ///
    /// `default_from` is used when the message has no sender of its own.
    /// Returns the sender address that will be written.
    ///
    /// # Errors
    ///
    /// Returns `MailError::InvalidMessage` if there is no sender, no
    /// recipient, an address is malformed, or a header contains a line break.
    pub fn validate<'a>(&'a self, default_from: Option<&'a str>) -> Result<&'a str, MailError> {
        let from = self
            .from
            .as_deref()
            .or(default_from)
            .ok_or_else(|| invalid("message has no sender"))?;
        if self.to.is_empty() {
            return Err(invalid("message has no recipients"));
        }

        for address in std::iter::once(from).chain(self.to.iter().map(String::as_str)) {
            let valid = is_email(address).map_err(|e| invalid(e.to_string()))?;
            if !valid || has_line_break(address) {
                return Err(invalid(format!("invalid address {address:?}")));
            }
        }
        if has_line_break(&self.subject) {
            return Err(invalid("subject contains a line break"));
        }
        Ok(from)
    }

    /// Render as an RFC 5322 message with CRLF line endings
    ///
    /// The message must have been validated with [`MailMessage::validate`].
    #[must_use]
    pub fn render(&self, from: &str, date: DateTime<Utc>, id: Uuid) -> String {
        let recipients = self.to.join(", ");
        let mut out = String::new();
        out.push_str(&format!("X-Sender: {from}\r\n"));
        for recipient in &self.to {
            out.push_str(&format!("X-Receiver: {recipient}\r\n"));
        }
        out.push_str("MIME-Version: 1.0\r\n");
        out.push_str(&format!("From: {from}\r\n"));
        out.push_str(&format!("To: {recipients}\r\n"));
        out.push_str(&format!("Date: {}\r\n", date.to_rfc2822()));
        out.push_str(&format!("Subject: {}\r\n", self.subject));
        out.push_str(&format!("Message-ID: <{id}@package-verifier>\r\n"));
        out.push_str("Content-Type: text/plain; charset=utf-8\r\n");
        out.push_str("Content-Transfer-Encoding: 8bit\r\n");
        out.push_str("\r\n");
        for line in self.body.lines() {
            out.push_str(line);
            out.push_str("\r\n");
        }
        out
    }
}

fn invalid(message: impl Into<String>) -> MailError {
    MailError::InvalidMessage {
        message: message.into(),
    }
}

fn has_line_break(value: &str) -> bool {
    value.contains(['\r', '\n'])
}
