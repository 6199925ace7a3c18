//! Parsing and validation of vision model replies
//!
//! Models often wrap JSON in markdown fences or add a sentence around it, so
//! the payload is located first. Syntax problems are `MalformedResponse`;
//! well-formed JSON missing required fields is `IncompleteExtraction`.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::models::{PaymentMethod, TransactionDraft, CATEGORIES, OTHER_CATEGORY};

/// Validated fields read from a receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptAnalysis {
    pub vendor: String,
    pub amount: Decimal,
    /// Always a member of the category taxonomy
    pub category: String,
    pub description: String,
    /// None when the receipt had no readable `YYYY-MM-DD` date
    pub date: Option<NaiveDate>,
    /// Canonical payment method, None when absent or unrecognized
    pub payment_method: Option<String>,
}

impl ReceiptAnalysis {
    /// Draft transaction: missing date becomes `today`, missing payment
    /// method becomes Credit Card
    pub fn into_draft(self, today: NaiveDate) -> TransactionDraft {
        TransactionDraft {
            date: self.date.unwrap_or(today),
            vendor: self.vendor,
            amount: self.amount,
            category: self.category,
            description: self.description,
            payment_method: self
                .payment_method
                .unwrap_or_else(|| PaymentMethod::default().as_str().to_string()),
            receipt_url: None,
            is_manually_adjusted: false,
        }
    }
}

/// Remove a surrounding markdown code fence (with or without a language tag)
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line
    let inner = match inner.find('\n') {
        Some(i) => &inner[i + 1..],
        None => inner,
    };
    inner.trim_end().trim_end_matches("```").trim()
}

/// Parse and validate a raw model reply
pub fn parse_receipt_response(raw: &str) -> Result<ReceiptAnalysis> {
    let text = strip_code_fences(raw);

    let start = text.find('{');
    let end = text.rfind('}');
    let json_str = match (start, end) {
        (Some(s), Some(e)) if s < e => &text[s..=e],
        _ => {
            return Err(Error::MalformedResponse(format!(
                "No JSON object in model reply | Raw: {}",
                truncate(text, 200)
            )))
        }
    };

    let value: Value = serde_json::from_str(json_str).map_err(|e| {
        Error::MalformedResponse(format!(
            "Invalid JSON from model: {} | Raw: {}",
            e,
            truncate(json_str, 200)
        ))
    })?;

    let Value::Object(fields) = value else {
        return Err(Error::MalformedResponse(
            "Model reply is not a JSON object".into(),
        ));
    };

    validate(&fields)
}

fn validate(fields: &Map<String, Value>) -> Result<ReceiptAnalysis> {
    let vendor = non_empty_str(fields, "vendor")
        .ok_or_else(|| Error::IncompleteExtraction("vendor is missing or empty".into()))?;

    let amount = fields
        .get("amount")
        .and_then(parse_amount)
        .filter(|a| *a > Decimal::ZERO)
        .ok_or_else(|| {
            Error::IncompleteExtraction("amount is missing or not a positive number".into())
        })?;

    let raw_category = non_empty_str(fields, "category")
        .ok_or_else(|| Error::IncompleteExtraction("category is missing or empty".into()))?;
    let category = match CATEGORIES
        .iter()
        .find(|c| c.eq_ignore_ascii_case(&raw_category))
    {
        Some(known) => known.to_string(),
        None => {
            tracing::info!(category = %raw_category, "Unknown category from model, using Other");
            OTHER_CATEGORY.to_string()
        }
    };

    let description = non_empty_str(fields, "description").unwrap_or_default();

    let date = non_empty_str(fields, "date")
        .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok());

    let payment_method = non_empty_str(fields, "paymentMethod")
        .and_then(|m| match PaymentMethod::from_str(&m) {
            Ok(method) => Some(method.as_str().to_string()),
            Err(_) => {
                tracing::debug!(payment_method = %m, "Unrecognized payment method, using default");
                None
            }
        });

    Ok(ReceiptAnalysis {
        vendor,
        amount,
        category,
        description,
        date,
        payment_method,
    })
}

fn non_empty_str(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Number or numeric string ("$1,234.50" accepted)
fn parse_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let s = n.to_string();
            Decimal::from_str(&s)
                .or_else(|_| Decimal::from_scientific(&s))
                .ok()
        }
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .trim_start_matches('$')
                .chars()
                .filter(|c| *c != ',')
                .collect();
            Decimal::from_str(cleaned.trim()).ok()
        }
        _ => None,
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}...", s.chars().take(max).collect::<String>())
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const FULL: &str = r#"{"vendor":"Whole Foods Market","amount":87.45,"category":"Groceries","description":"Weekly groceries","date":"2024-01-14","paymentMethod":"Debit Card"}"#;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_parse_full_reply() {
        let analysis = parse_receipt_response(FULL).unwrap();
        assert_eq!(analysis.vendor, "Whole Foods Market");
        assert_eq!(analysis.amount, dec!(87.45));
        assert_eq!(analysis.category, "Groceries");
        assert_eq!(analysis.date, NaiveDate::from_ymd_opt(2024, 1, 14));
        assert_eq!(analysis.payment_method.as_deref(), Some("Debit Card"));
    }

    #[test]
    fn test_parse_fenced_reply_with_prose() {
        let raw = format!("```json\n{}\n```", FULL);
        assert!(parse_receipt_response(&raw).is_ok());

        let chatty = format!("Here is the data you asked for: {} Let me know!", FULL);
        assert!(parse_receipt_response(&chatty).is_ok());
    }

    #[test]
    fn test_not_json_is_malformed() {
        assert!(matches!(
            parse_receipt_response("I can't read this receipt"),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_receipt_response("{vendor: Kroger}"),
            Err(Error::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_missing_fields_are_incomplete() {
        let no_vendor = r#"{"vendor":"","amount":12,"category":"Shopping"}"#;
        assert!(matches!(
            parse_receipt_response(no_vendor),
            Err(Error::IncompleteExtraction(_))
        ));

        let zero_amount = r#"{"vendor":"Target","amount":0,"category":"Shopping"}"#;
        assert!(matches!(
            parse_receipt_response(zero_amount),
            Err(Error::IncompleteExtraction(_))
        ));

        let bad_amount = r#"{"vendor":"Target","amount":"twelve","category":"Shopping"}"#;
        assert!(matches!(
            parse_receipt_response(bad_amount),
            Err(Error::IncompleteExtraction(_))
        ));

        let no_category = r#"{"vendor":"Target","amount":12}"#;
        assert!(matches!(
            parse_receipt_response(no_category),
            Err(Error::IncompleteExtraction(_))
        ));
    }

    #[test]
    fn test_amount_as_string() {
        let raw = r#"{"vendor":"Best Buy","amount":"$1,299.99","category":"Shopping"}"#;
        assert_eq!(parse_receipt_response(raw).unwrap().amount, dec!(1299.99));
    }

    #[test]
    fn test_unknown_category_maps_to_other() {
        let raw = r#"{"vendor":"Petco","amount":30,"category":"Pets"}"#;
        assert_eq!(parse_receipt_response(raw).unwrap().category, "Other");

        let lower = r#"{"vendor":"Petco","amount":30,"category":"food & drink"}"#;
        assert_eq!(parse_receipt_response(lower).unwrap().category, "Food & Drink");
    }

    #[test]
    fn test_defaults_applied_in_draft() {
        let raw = r#"{"vendor":"Shell","amount":45.2,"category":"Transportation","description":null,"date":"01/14/2024","paymentMethod":null}"#;
        let analysis = parse_receipt_response(raw).unwrap();
        assert_eq!(analysis.date, None);
        assert_eq!(analysis.payment_method, None);
        assert_eq!(analysis.description, "");

        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let draft = analysis.into_draft(today);
        assert_eq!(draft.date, today);
        assert_eq!(draft.payment_method, "Credit Card");
        assert_eq!(draft.amount, dec!(45.2));
    }

    #[test]
    fn test_payment_method_canonicalized() {
        let raw = r#"{"vendor":"Shell","amount":5,"category":"Transportation","paymentMethod":"cash"}"#;
        assert_eq!(
            parse_receipt_response(raw).unwrap().payment_method.as_deref(),
            Some("Cash")
        );

        let unknown = r#"{"vendor":"Shell","amount":5,"category":"Transportation","paymentMethod":"Barter"}"#;
        assert_eq!(parse_receipt_response(unknown).unwrap().payment_method, None);
    }
}
