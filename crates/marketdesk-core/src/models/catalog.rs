//! Product types and the platform's payment accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{null_as_false, Id, UserRef};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductType {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_active: bool,
    #[serde(default)]
    pub creator: Option<UserRef>,
    #[serde(default)]
    pub updator: Option<UserRef>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Wallets,
    PaymentCards,
    Cryptomonnaies,
    MobilePayment,
    PaymentPmlcoin,
    #[serde(untagged)]
    Other(String),
}

impl PaymentMethod {
    pub fn label(&self) -> &str {
        match self {
            PaymentMethod::Wallets => "Wallets",
            PaymentMethod::PaymentCards => "Payment cards",
            PaymentMethod::Cryptomonnaies => "Cryptocurrencies",
            PaymentMethod::MobilePayment => "Mobile payment",
            PaymentMethod::PaymentPmlcoin => "PMLCoin",
            PaymentMethod::Other(raw) => raw,
        }
    }
}

/// Account the platform collects payments on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformAccount {
    pub id: Id,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_active: bool,
    #[serde(default)]
    pub creator: Option<UserRef>,
    #[serde(default)]
    pub updator: Option<UserRef>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_platform_account() {
        let json = r#"{"id": 2, "paymentMethod": "MOBILE_PAYMENT", "operator": "MTN", "accountNumber": "677000000", "isActive": true}"#;
        let account: PlatformAccount = serde_json::from_str(json).unwrap();
        assert_eq!(account.payment_method, PaymentMethod::MobilePayment);
        assert_eq!(account.payment_method.label(), "Mobile payment");
        assert_eq!(account.operator.as_deref(), Some("MTN"));
    }

    #[test]
    fn test_payment_method_wire_names() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::PaymentPmlcoin).unwrap(),
            r#""PAYMENT_PMLCOIN""#
        );
        let other: PaymentMethod = serde_json::from_str(r#""BANK_TRANSFER""#).unwrap();
        assert_eq!(other.label(), "BANK_TRANSFER");
    }
}
