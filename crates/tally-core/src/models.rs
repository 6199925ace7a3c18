//! Domain models for Tally
//!
//! Transactions and budgets are owned by the caller; everything in this crate
//! reads them and produces fresh derived values.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category name used when nothing else matches
pub const OTHER_CATEGORY: &str = "Other";

/// Category sentinel for a budget that spans every category
pub const OVERALL_BUDGET: &str = "Overall Budget";

/// The fixed category taxonomy
pub const CATEGORIES: &[&str] = &[
    "Food & Drink",
    "Transportation",
    "Shopping",
    "Entertainment",
    "Groceries",
    "Utilities",
    "Healthcare",
    "Gas & Fuel",
    "Travel",
    "Education",
    "Personal Care",
    OTHER_CATEGORY,
];

/// Whether a category name belongs to the taxonomy (exact match)
pub fn is_known_category(category: &str) -> bool {
    CATEGORIES.contains(&category)
}

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub vendor: String,
    /// Non-negative amount spent
    pub amount: Decimal,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,
    #[serde(default)]
    pub is_manually_adjusted: bool,
}

/// A transaction that has not been assigned an id yet (receipt or form output)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    pub date: NaiveDate,
    pub vendor: String,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,
    #[serde(default)]
    pub is_manually_adjusted: bool,
}

impl TransactionDraft {
    /// Turn the draft into a transaction with the given id
    pub fn into_transaction(self, id: impl Into<String>) -> Transaction {
        Transaction {
            id: id.into(),
            date: self.date,
            vendor: self.vendor,
            amount: self.amount,
            category: self.category,
            description: self.description,
            payment_method: self.payment_method,
            receipt_url: self.receipt_url,
            is_manually_adjusted: self.is_manually_adjusted,
        }
    }
}

/// Canonical payment method spellings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Debit Card")]
    DebitCard,
    Cash,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "Digital Wallet")]
    DigitalWallet,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "Credit Card",
            Self::DebitCard => "Debit Card",
            Self::Cash => "Cash",
            Self::BankTransfer => "Bank Transfer",
            Self::DigitalWallet => "Digital Wallet",
        }
    }

    pub fn all() -> &'static [PaymentMethod] {
        &[
            Self::CreditCard,
            Self::DebitCard,
            Self::Cash,
            Self::BankTransfer,
            Self::DigitalWallet,
        ]
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        Self::CreditCard
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "credit card" | "credit" => Ok(Self::CreditCard),
            "debit card" | "debit" => Ok(Self::DebitCard),
            "cash" => Ok(Self::Cash),
            "bank transfer" | "transfer" => Ok(Self::BankTransfer),
            "digital wallet" | "wallet" => Ok(Self::DigitalWallet),
            _ => Err(format!("Unknown payment method: {}", s)),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Budget period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Monthly,
    Weekly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
        }
    }
}

impl std::str::FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" | "month" => Ok(Self::Monthly),
            "weekly" | "week" => Ok(Self::Weekly),
            _ => Err(format!("Unknown budget period: {}", s)),
        }
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A spending limit for one category (or everything)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub category: String,
    pub limit: Decimal,
    /// Running total, maintained by the caller or by [`crate::ledger`]
    pub spent: Decimal,
    pub period: BudgetPeriod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_overall: Option<bool>,
}

impl Budget {
    /// Whether this budget covers all categories
    pub fn is_overall(&self) -> bool {
        self.is_overall.unwrap_or(false) || self.category == OVERALL_BUDGET
    }

    /// Whether a transaction counts against this budget (ignoring dates)
    pub fn covers(&self, transaction: &Transaction) -> bool {
        self.is_overall() || self.category == transaction.category
    }

    /// Percentage of the limit used, or None when the limit is not positive
    pub fn usage_percent(&self) -> Option<f64> {
        if self.limit <= Decimal::ZERO {
            return None;
        }
        Some(crate::money::ratio(self.spent, self.limit) * 100.0)
    }

    pub fn remaining(&self) -> Decimal {
        self.limit.saturating_sub(self.spent)
    }

    pub fn is_over(&self) -> bool {
        self.spent > self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_transaction_deserializes_camel_case_snapshot() {
        let json = r#"{
            "id": "1",
            "date": "2024-01-15",
            "vendor": "Starbucks Coffee",
            "amount": 12.45,
            "category": "Food & Drink",
            "description": "Grande Latte, Blueberry Muffin",
            "paymentMethod": "Credit Card"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.amount, dec!(12.45));
        assert_eq!(tx.payment_method, "Credit Card");
        assert!(!tx.is_manually_adjusted);
        assert!(tx.receipt_url.is_none());
    }

    #[test]
    fn test_budget_overall_detection() {
        let mut budget = Budget {
            id: "b".into(),
            category: OVERALL_BUDGET.into(),
            limit: dec!(1000),
            spent: dec!(0),
            period: BudgetPeriod::Monthly,
            is_overall: None,
        };
        assert!(budget.is_overall());

        budget.category = "Shopping".into();
        assert!(!budget.is_overall());

        budget.is_overall = Some(true);
        assert!(budget.is_overall());
    }

    #[test]
    fn test_budget_usage_percent() {
        let budget = Budget {
            id: "b".into(),
            category: "Food & Drink".into(),
            limit: dec!(300),
            spent: dec!(245.67),
            period: BudgetPeriod::Monthly,
            is_overall: None,
        };
        let pct = budget.usage_percent().unwrap();
        assert!((pct - 81.89).abs() < 0.01);
        assert_eq!(budget.remaining(), dec!(54.33));

        let zero = Budget {
            limit: dec!(0),
            ..budget
        };
        assert!(zero.usage_percent().is_none());
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!(
            PaymentMethod::from_str("debit card").unwrap(),
            PaymentMethod::DebitCard
        );
        assert_eq!(PaymentMethod::default().as_str(), "Credit Card");
        assert!(PaymentMethod::from_str("barter").is_err());
    }

    #[test]
    fn test_known_categories() {
        assert!(is_known_category("Gas & Fuel"));
        assert!(!is_known_category("gas & fuel"));
        assert_eq!(CATEGORIES.len(), 12);
    }
}
