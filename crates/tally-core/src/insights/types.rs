//! Core types for the insight generator

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What kind of observation an insight makes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    /// Spending went up or is concentrated somewhere
    Spending,
    /// Spending went down
    Saving,
    /// Something the user could act on
    Recommendation,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::Spending => "spending",
            InsightType::Saving => "saving",
            InsightType::Recommendation => "recommendation",
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spending" => Ok(InsightType::Spending),
            "saving" => Ok(InsightType::Saving),
            "recommendation" => Ok(InsightType::Recommendation),
            _ => Err(format!("Unknown insight type: {}", s)),
        }
    }
}

/// Severity of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Low,
    Medium,
    High,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Low => "low",
            Impact::Medium => "medium",
            Impact::High => "high",
        }
    }

    /// Numeric priority for sorting (higher = more urgent)
    pub fn priority(&self) -> u8 {
        match self {
            Impact::Low => 1,
            Impact::Medium => 2,
            Impact::High => 3,
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Impact {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Impact::Low),
            "medium" => Ok(Impact::Medium),
            "high" => Ok(Impact::High),
            _ => Err(format!("Unknown impact: {}", s)),
        }
    }
}

/// A human-readable observation about spending
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// Stable key derived from the rule and subject, used for deduplication
    /// (e.g. "category-shift:Groceries")
    pub id: String,
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub title: String,
    pub description: String,
    pub impact: Impact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Insight {
    pub fn new(
        id: impl Into<String>,
        insight_type: InsightType,
        impact: Impact,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            insight_type,
            title: title.into(),
            description: description.into(),
            impact,
            category: None,
        }
    }

    /// Attach the category this insight is about
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_type_serialization() {
        assert_eq!(InsightType::Recommendation.as_str(), "recommendation");
        assert_eq!(
            InsightType::from_str("saving").unwrap(),
            InsightType::Saving
        );
        assert!(InsightType::from_str("alert").is_err());
    }

    #[test]
    fn test_impact_priority() {
        assert!(Impact::High.priority() > Impact::Medium.priority());
        assert!(Impact::Medium.priority() > Impact::Low.priority());
        assert_eq!(Impact::from_str("high").unwrap(), Impact::High);
    }

    #[test]
    fn test_insight_json_shape() {
        let insight = Insight::new(
            "top-category:Shopping",
            InsightType::Spending,
            Impact::High,
            "High Shopping Spending",
            "details",
        )
        .with_category("Shopping");

        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["type"], "spending");
        assert_eq!(json["impact"], "high");
        assert_eq!(json["category"], "Shopping");
    }
}
