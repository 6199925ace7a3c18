//! Keyword-based category classifier
//!
//! Vendor and description are joined, lowercased and checked against an
//! ordered keyword table. The first category with a matching keyword wins, so
//! table order decides ambiguous text. Nothing matching resolves to "Other".

use serde::{Deserialize, Serialize};

use crate::models::OTHER_CATEGORY;

/// One row of the keyword table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: &str, keywords: &[&str]) -> Self {
        Self {
            category: category.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

/// Built-in keyword table (order significant)
pub fn default_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new(
            "Food & Drink",
            &[
                "starbucks",
                "mcdonald",
                "subway",
                "chipotle",
                "dunkin",
                "coffee",
                "restaurant",
            ],
        ),
        CategoryRule::new(
            "Groceries",
            &[
                "whole foods",
                "kroger",
                "safeway",
                "walmart",
                "target",
                "costco",
                "grocery",
            ],
        ),
        CategoryRule::new(
            "Transportation",
            &[
                "shell", "exxon", "chevron", "uber", "lyft", "gas", "fuel", "parking",
            ],
        ),
        CategoryRule::new(
            "Shopping",
            &[
                "amazon",
                "ebay",
                "best buy",
                "apple",
                "nike",
                "clothing",
                "electronics",
            ],
        ),
        CategoryRule::new(
            "Entertainment",
            &[
                "netflix", "spotify", "hulu", "disney", "movie", "theater", "gaming",
            ],
        ),
        CategoryRule::new(
            "Utilities",
            &["electric", "water", "internet", "phone", "cable", "utility"],
        ),
        CategoryRule::new(
            "Healthcare",
            &[
                "pharmacy",
                "doctor",
                "hospital",
                "medical",
                "health",
                "cvs",
                "walgreens",
            ],
        ),
    ]
}

/// Classifier over an ordered keyword table
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    rules: Vec<CategoryRule>,
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryClassifier {
    /// Classifier with the built-in table
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Classifier with a custom table; keywords are lowercased here
    pub fn with_rules(rules: Vec<CategoryRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|r| CategoryRule {
                category: r.category,
                keywords: r
                    .keywords
                    .into_iter()
                    .map(|k| k.to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
            })
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Map vendor + description to a category name
    pub fn classify(&self, vendor: &str, description: &str) -> String {
        self.matching_rule(vendor, description)
            .map(|r| r.category.clone())
            .unwrap_or_else(|| OTHER_CATEGORY.to_string())
    }

    fn matching_rule(&self, vendor: &str, description: &str) -> Option<&CategoryRule> {
        let haystack = format!("{} {}", vendor, description).to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| haystack.contains(k.as_str())))
    }
}

/// Classify with the built-in table
pub fn classify(vendor: &str, description: &str) -> String {
    CategoryClassifier::new().classify(vendor, description)
}
