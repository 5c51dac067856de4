// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One recorded expense.
///
/// `amount` and `date` are `None` when the stored value could not be parsed.
/// Such records still count as transactions but are left out of sums and
/// date-based rules. The stored text is kept in `unparsed_amount` and
/// `unparsed_date` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub name: String,
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub category: String,
    pub details: TransactionDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unparsed_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unparsed_date: Option<String>,
}

impl Transaction {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
        category: impl Into<String>,
    ) -> Self {
        let category = category.into();
        Self {
            id,
            name: name.into(),
            amount: Some(amount),
            date: Some(date),
            details: TransactionDetails::empty_for(&category),
            category,
            unparsed_amount: None,
            unparsed_date: None,
        }
    }

    pub fn set_amount(&mut self, amount: Decimal) {
        self.amount = Some(amount);
        self.unparsed_amount = None;
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
        self.unparsed_date = None;
    }

    pub fn with_details(mut self, details: TransactionDetails) -> Self {
        self.details = details;
        self
    }
}

/// Extra fields recorded for the built-in categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransactionDetails {
    Food {
        subcategory: String,
        location: String,
    },
    Travel {
        destination: String,
        transport_mode: String,
    },
    Transportation {
        transport_type: String,
        location: String,
    },
    BillsUtilities {
        bill_type: String,
        provider: String,
    },
    Academic {
        academic_type: String,
        institution: String,
    },
    Health {
        health_type: String,
        provider: String,
    },
    Other,
}

impl TransactionDetails {
    /// Builds the variant matching `category` from two positional values,
    /// the way the add form collects them. Unknown categories get `Other`.
    pub fn for_category(
        category: &str,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        let (a, b) = (first.into(), second.into());
        match category {
            "Food" => Self::Food {
                subcategory: a,
                location: b,
            },
            "Travel" => Self::Travel {
                destination: a,
                transport_mode: b,
            },
            "Transportation" => Self::Transportation {
                transport_type: a,
                location: b,
            },
            "Bills & Utilities" => Self::BillsUtilities {
                bill_type: a,
                provider: b,
            },
            "Academic" => Self::Academic {
                academic_type: a,
                institution: b,
            },
            "Health" => Self::Health {
                health_type: a,
                provider: b,
            },
            _ => Self::Other,
        }
    }

    pub fn empty_for(category: &str) -> Self {
        Self::for_category(category, "", "")
    }

    pub fn has_subcategory_fields(&self) -> bool {
        !matches!(self, Self::Other)
    }

    /// Field label/value pairs, for display.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let (labels, a, b) = match self {
            Self::Food {
                subcategory,
                location,
            } => (["Subcategory", "Location"], subcategory, location),
            Self::Travel {
                destination,
                transport_mode,
            } => (["Destination", "Transport_Mode"], destination, transport_mode),
            Self::Transportation {
                transport_type,
                location,
            } => (["Transport_Type", "Location"], transport_type, location),
            Self::BillsUtilities {
                bill_type,
                provider,
            } => (["Bill_Type", "Provider"], bill_type, provider),
            Self::Academic {
                academic_type,
                institution,
            } => (["Academic_Type", "Institution"], academic_type, institution),
            Self::Health {
                health_type,
                provider,
            } => (["Health_Type", "Provider"], health_type, provider),
            Self::Other => return Vec::new(),
        };
        vec![(labels[0], a.as_str()), (labels[1], b.as_str())]
    }
}

/// A per-category monthly ceiling with its alert threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    pub category: String,
    pub limit_amount: Decimal,
    pub alert_threshold_percent: u8,
}

impl Limit {
    pub fn new(
        category: impl Into<String>,
        limit_amount: Decimal,
        threshold: i64,
    ) -> Result<Self, EngineError> {
        let category = category.into();
        if limit_amount <= Decimal::ZERO || !(0..=100).contains(&threshold) {
            return Err(EngineError::InvalidLimit {
                category,
                amount: limit_amount,
                threshold,
            });
        }
        Ok(Self {
            category,
            limit_amount,
            alert_threshold_percent: threshold as u8,
        })
    }

    /// `limit_amount * alert_threshold_percent / 100`.
    pub fn threshold_amount(&self) -> Result<Decimal, EngineError> {
        self.limit_amount
            .checked_mul(Decimal::from(self.alert_threshold_percent))
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
            .ok_or_else(|| EngineError::Overflow(format!("{} threshold", self.category)))
    }
}

/// Identifies an alert for dedup and dismissal.
///
/// Serialised as `<category>_<threshold>_<level>`; the category may itself
/// contain underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DedupKey {
    pub category: String,
    pub threshold_percent: u8,
    pub level: u32,
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.category, self.threshold_percent, self.level)
    }
}

impl FromStr for DedupKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidDedupKey(s.to_string());
        let mut parts = s.rsplitn(3, '_');
        let level = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let threshold_percent = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        let category = parts.next().filter(|c| !c.is_empty()).ok_or_else(invalid)?;
        Ok(Self {
            category: category.to_string(),
            threshold_percent,
            level,
        })
    }
}

impl TryFrom<String> for DedupKey {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DedupKey> for String {
    fn from(value: DedupKey) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub category: String,
    pub current_spending: Decimal,
    pub limit: Decimal,
    #[serde(rename = "threshold_percentage")]
    pub threshold_percent: u8,
    pub message: String,
    pub timestamp: NaiveDate,
    #[serde(rename = "key")]
    pub dedup_key: DedupKey,
}

/// Persisted unlock state. `unlocked` keeps unlock order and never holds
/// the same id twice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AchievementState {
    #[serde(default)]
    pub unlocked: Vec<String>,
    #[serde(default)]
    pub progress: BTreeMap<String, serde_json::Value>,
}

impl AchievementState {
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.iter().any(|u| u == id)
    }

    /// Returns `false` if `id` was already present.
    pub fn unlock(&mut self, id: &str) -> bool {
        if self.is_unlocked(id) {
            return false;
        }
        self.unlocked.push(id.to_string());
        true
    }
}

/// A catalog entry as reported when it is first earned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnlockedAchievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub unlocked_date: NaiveDate,
}
