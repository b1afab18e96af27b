use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of an insider transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum TransactionType {
    Buy,
    Sell,
    Grant,
    Exercise,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Grant => "GRANT",
            Self::Exercise => "EXERCISE",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    /// Accepts the long names and the Form 4 transaction codes (P, S, A, M).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" | "P" | "PURCHASE" => Ok(Self::Buy),
            "SELL" | "S" | "SALE" => Ok(Self::Sell),
            "GRANT" | "A" | "AWARD" => Ok(Self::Grant),
            "EXERCISE" | "M" => Ok(Self::Exercise),
            other => Err(format!("Unknown transaction type '{}'", other)),
        }
    }
}

impl TryFrom<String> for TransactionType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Name given to transactions whose filing carried no reporting person.
pub const UNKNOWN_INSIDER: &str = "Unknown";

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Parses the leading `YYYY-MM-DD` of a date string. Anything else, including
/// numbers and unparseable text, becomes `None` instead of failing the record.
fn deserialize_lenient_date<'de, D>(d: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawDate> = Option::deserialize(d)?;
    Ok(match raw {
        Some(RawDate::Text(s)) => parse_date(&s),
        Some(RawDate::Other(_)) | None => None,
    })
}

/// Empty CSV cells and JSON nulls read as zero.
fn deserialize_lenient_f64<'de, D>(d: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(d)?.unwrap_or(0.0))
}

fn deserialize_lenient_direct<'de, D>(d: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(d)?.unwrap_or(true))
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    s.get(..10)
        .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
}

/// A single normalized insider transaction, as handed over by the filing collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub insider_name: String,
    #[serde(default)]
    pub insider_title: String,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub shares: f64,
    pub transaction_type: TransactionType,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub price: f64,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub value: f64,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub shares_owned_after: f64,
    #[serde(default = "default_true", deserialize_with = "deserialize_lenient_direct")]
    pub is_direct: bool,
}

impl Transaction {
    /// The key used for company overlap: upper-cased with whitespace
    /// collapsed, so "Acme  Corp" and "ACME CORP" match. Falls back to the
    /// ticker when the collector could not resolve a company name.
    pub fn company_key(&self) -> String {
        let source = if self.company_name.trim().is_empty() {
            &self.ticker
        } else {
            &self.company_name
        };
        source
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase()
    }

    pub fn insider_key(&self) -> &str {
        match self.insider_name.trim() {
            "" => UNKNOWN_INSIDER,
            name => name,
        }
    }

    /// Fill in values the collector left blank.
    pub fn normalized(mut self) -> Self {
        if self.value == 0.0 && self.shares > 0.0 && self.price > 0.0 {
            self.value = self.shares * self.price;
        }
        self.ticker = self.ticker.trim().to_uppercase();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transaction_codes() {
        assert_eq!("P".parse::<TransactionType>().unwrap(), TransactionType::Buy);
        assert_eq!("sell".parse::<TransactionType>().unwrap(), TransactionType::Sell);
        assert_eq!("A".parse::<TransactionType>().unwrap(), TransactionType::Grant);
        assert_eq!("Exercise".parse::<TransactionType>().unwrap(), TransactionType::Exercise);
        assert!("gift".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_deserialize_tolerates_bad_date() {
        let json = r#"{
            "ticker": "acme",
            "insider_name": "Jane Doe",
            "date": "not-a-date",
            "shares": 100.0,
            "transaction_type": "S",
            "price": 25.0
        }"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        let txn = txn.normalized();
        assert_eq!(txn.date, None);
        assert_eq!(txn.transaction_type, TransactionType::Sell);
        assert_eq!(txn.value, 2500.0);
        assert_eq!(txn.ticker, "ACME");
        assert_eq!(txn.company_key(), "ACME");
        assert!(txn.is_direct);
    }

    #[test]
    fn test_deserialize_datetime_prefix() {
        let json = r#"{
            "ticker": "ACME",
            "company_name": "Acme Corp",
            "insider_name": "Jane Doe",
            "date": "2024-03-15T00:00:00",
            "transaction_type": "BUY",
            "value": 10.0
        }"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(txn.company_key(), "ACME CORP");
    }

    #[test]
    fn test_company_key_ignores_case_and_spacing() {
        let json = r#"[
            {"ticker": "ACME", "company_name": "Acme  Corp", "insider_name": "A", "transaction_type": "BUY"},
            {"ticker": "ACME", "company_name": " ACME CORP ", "insider_name": "B", "transaction_type": "BUY"}
        ]"#;
        let txns: Vec<Transaction> = serde_json::from_str(json).unwrap();
        assert_eq!(txns[0].company_key(), txns[1].company_key());
        assert_eq!(txns[0].company_key(), "ACME CORP");
    }

    #[test]
    fn test_missing_fields_and_numeric_date_tolerated() {
        let json = r#"[
            {"ticker": "ACME", "date": "2024-01-05", "transaction_type": "SELL", "value": 700.0},
            {"insider_name": "Jane Doe", "date": 20240105, "transaction_type": "BUY", "value": 300.0}
        ]"#;
        let txns: Vec<Transaction> = serde_json::from_str(json).unwrap();
        assert_eq!(txns.len(), 2);

        assert_eq!(txns[0].insider_key(), UNKNOWN_INSIDER);
        assert_eq!(txns[0].insider_title, "");
        assert_eq!(txns[0].date, NaiveDate::from_ymd_opt(2024, 1, 5));

        assert_eq!(txns[1].ticker, "");
        assert_eq!(txns[1].date, None);
        assert_eq!(txns[1].value, 300.0);
    }

    #[test]
    fn test_serializes_uppercase_type() {
        let v = serde_json::to_value(TransactionType::Exercise).unwrap();
        assert_eq!(v, serde_json::json!("EXERCISE"));
    }
}
