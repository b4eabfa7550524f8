use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use storefront_types::domain::order::{Order, OrderLine, OrderStatus};
use storefront_types::ports::notifier::{Notifier, NotifyError};

use super::message::OrderMessage;
use crate::config::MailConfig;

/// Sends order emails through an SMTP relay using STARTTLS.
#[derive(Clone)]
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(config: &MailConfig) -> anyhow::Result<Self> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|_| NotifyError::InvalidAddress(config.from.clone()))?;
        let credentials = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();
        Ok(Self { mailer, from })
    }

    fn build(&self, msg: &OrderMessage) -> Result<Message, NotifyError> {
        let to = msg
            .to
            .parse::<Mailbox>()
            .map_err(|_| NotifyError::InvalidAddress(msg.to.clone()))?;
        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(msg.subject.as_str())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(msg.text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(msg.html.clone()),
                    ),
            )
            .map_err(|e| NotifyError::Delivery(e.to_string()))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(
        &self,
        order: &Order,
        items: &[OrderLine],
        status: OrderStatus,
    ) -> Result<(), NotifyError> {
        let msg = OrderMessage::compose(order, items, status)?;
        let email = self.build(&msg)?;
        self.mailer
            .send(email)
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;
        tracing::info!(to = %msg.to, subject = %msg.subject, "order email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn mail_config(from: &str) -> MailConfig {
        MailConfig {
            host: "smtp.example.com".into(),
            port: 2525,
            username: "shop".into(),
            password: SecretString::from("secret".to_string()),
            from: from.into(),
        }
    }

    #[tokio::test]
    async fn rejects_a_malformed_sender() {
        let err = SmtpNotifier::new(&mail_config("not an address")).err().unwrap();
        assert!(err.to_string().contains("invalid email address"));
    }

    #[tokio::test]
    async fn builds_a_multipart_message() {
        let notifier = SmtpNotifier::new(&mail_config(crate::config::DEFAULT_MAIL_FROM)).unwrap();
        let msg = OrderMessage {
            to: "alice@example.com".into(),
            subject: "Your Order 1 is Confirmed".into(),
            text: "plain".into(),
            html: "<p>rich</p>".into(),
        };
        let raw = String::from_utf8(notifier.build(&msg).unwrap().formatted()).unwrap();
        assert!(raw.contains("Subject: Your Order 1 is Confirmed"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/html"));

        let bad = OrderMessage { to: "nobody".into(), ..msg };
        assert!(matches!(notifier.build(&bad), Err(NotifyError::InvalidAddress(_))));
    }
}
