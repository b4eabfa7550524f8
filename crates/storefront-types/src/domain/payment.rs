use chrono::{Datelike, NaiveDate};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::validation::{require, ValidationError};

/// Card fields submitted with a checkout. Only their format is checked;
/// the simulated gateway never looks at them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCard {
    #[serde(serialize_with = "expose", deserialize_with = "secret")]
    pub card_number: SecretString,
    pub expiry: String,
    #[serde(serialize_with = "expose", deserialize_with = "secret")]
    pub cvv: SecretString,
}

fn expose<S: Serializer>(value: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.expose_secret())
}

fn secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

impl PaymentCard {
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        let number = self.card_number.expose_secret();
        let cvv = self.cvv.expose_secret();
        require("card_number", number)?;
        require("expiry", &self.expiry)?;
        require("cvv", cvv)?;

        let digits: String = number
            .chars()
            .filter(|c| *c != ' ' && *c != '-')
            .collect();
        if digits.len() != 16 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::new("card_number", "must be 16 digits"));
        }

        let (month, year) = parse_expiry(self.expiry.trim())
            .ok_or_else(|| ValidationError::new("expiry", "must be MM/YY"))?;
        // Must expire after the current month.
        let current = (today.year(), today.month());
        if (2000 + year, month) <= current {
            return Err(ValidationError::new("expiry", "card has expired"));
        }

        if cvv.len() != 3 || !cvv.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::new("cvv", "must be 3 digits"));
        }
        Ok(())
    }
}

fn parse_expiry(expiry: &str) -> Option<(u32, i32)> {
    let (mm, yy) = expiry.split_once('/')?;
    if mm.len() != 2 || yy.len() != 2 {
        return None;
    }
    if !mm.chars().chain(yy.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }
    let month: u32 = mm.parse().ok()?;
    let year: i32 = yy.parse().ok()?;
    (1..=12).contains(&month).then_some((month, year))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(number: &str, expiry: &str, cvv: &str) -> PaymentCard {
        PaymentCard {
            card_number: SecretString::from(number.to_string()),
            expiry: expiry.into(),
            cvv: SecretString::from(cvv.to_string()),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn accepts_well_formed_card() {
        assert!(card("4111 1111 1111 1111", "11/26", "123")
            .validate(today())
            .is_ok());
        assert!(card("4111-1111-1111-1111", "01/30", "999")
            .validate(today())
            .is_ok());
    }

    #[test]
    fn current_month_counts_as_expired() {
        let err = card("4111111111111111", "10/26", "123")
            .validate(today())
            .unwrap_err();
        assert_eq!(err.field, "expiry");
        assert!(card("4111111111111111", "09/25", "123")
            .validate(today())
            .is_err());
    }

    #[test]
    fn rejects_malformed_fields() {
        let cases = [
            (card("411111111111111", "11/26", "123"), "card_number"),
            (card("41111111111111x1", "11/26", "123"), "card_number"),
            (card("4111111111111111", "13/26", "123"), "expiry"),
            (card("4111111111111111", "1/26", "123"), "expiry"),
            (card("4111111111111111", "11-26", "123"), "expiry"),
            (card("4111111111111111", "11/26", "12"), "cvv"),
            (card("4111111111111111", "11/26", "12a"), "cvv"),
            (card("", "11/26", "123"), "card_number"),
        ];
        for (card, field) in cases {
            assert_eq!(card.validate(today()).unwrap_err().field, field);
        }
    }

    #[test]
    fn debug_output_hides_card_data() {
        let rendered = format!("{:?}", card("4111111111111111", "11/26", "123"));
        assert!(!rendered.contains("4111"));
        assert!(!rendered.contains("123"));
    }

    #[test]
    fn card_fields_travel_as_plain_json_strings() {
        let value = serde_json::to_value(card("4111111111111111", "11/26", "123")).unwrap();
        assert_eq!(value["card_number"], "4111111111111111");
        assert_eq!(value["cvv"], "123");

        let back: PaymentCard = serde_json::from_value(value).unwrap();
        assert_eq!(back.card_number.expose_secret(), "4111111111111111");
        assert_eq!(back.cvv.expose_secret(), "123");
    }
}
