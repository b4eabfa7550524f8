use anyhow::Context;
use secrecy::SecretString;
use std::env;
use storefront_types::domain::order::OrderStatus;

pub const DEFAULT_MAIL_FROM: &str = "\"Mini Shop\" <no-reply@minishop.local>";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: String,
    pub database_url: Option<String>,
    /// Forces every checkout to this outcome; random when unset.
    pub payment_outcome: Option<OrderStatus>,
    pub seed_catalog: bool,
    pub mail: Option<MailConfig>,
}

/// SMTP relay settings; `password` only leaves its wrapper when the
/// transport is built.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    pub from: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_port = var("SERVER_PORT").unwrap_or_else(|| "3000".into());
        let database_url = var("DATABASE_URL");
        let payment_outcome = var("PAYMENT_OUTCOME")
            .map(|v| v.parse::<OrderStatus>())
            .transpose()
            .context("invalid PAYMENT_OUTCOME")?;
        let seed_catalog = var("SEED_CATALOG")
            .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"));

        let mail = match var("MAIL_HOST") {
            Some(host) => {
                let port = match var("MAIL_PORT") {
                    Some(p) => p.trim().parse().context("invalid MAIL_PORT")?,
                    None => 587,
                };
                Some(MailConfig {
                    host,
                    port,
                    username: var("MAIL_USER").unwrap_or_default(),
                    password: SecretString::from(var("MAIL_PASS").unwrap_or_default()),
                    from: var("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.into()),
                })
            }
            None => None,
        };

        Ok(Self {
            server_port,
            database_url,
            payment_outcome,
            seed_catalog,
            mail,
        })
    }
}
