// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! File-backed storage under a single data directory.
//!
//! Writes go to a temp file in the same directory which is then renamed
//! over the target, so readers never see a half-written file. Missing or
//! unparsable files load as empty; unparsable rows are skipped.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_decimal::prelude::ToPrimitive;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::models::{AchievementState, Alert, Limit, Transaction, TransactionDetails};
use crate::utils::{format_date, lenient_decimal, parse_date};

pub const TRANSACTIONS_FILE: &str = "transactions.csv";
pub const LIMITS_FILE: &str = "limits.csv";
pub const ALERTS_FILE: &str = "active_alerts.json";
pub const ACHIEVEMENTS_FILE: &str = "user_achievements.json";

const TRANSACTION_HEADERS: [&str; 15] = [
    "Id",
    "Name",
    "Amount",
    "Date",
    "Category",
    "Subcategory",
    "Location",
    "Destination",
    "Transport_Mode",
    "Transport_Type",
    "Bill_Type",
    "Provider",
    "Academic_Type",
    "Institution",
    "Health_Type",
];

const LIMIT_HEADERS: [&str; 3] = ["Category", "Limit", "Alert_Threshold"];

#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create data dir {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    pub fn load_transactions(&self) -> Result<Vec<Transaction>> {
        let rows: Vec<TransactionRecord> = read_csv(&self.path(TRANSACTIONS_FILE))?;
        Ok(rows
            .into_iter()
            .filter_map(TransactionRecord::into_transaction)
            .collect())
    }

    pub fn save_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        let rows: Vec<TransactionRecord> =
            transactions.iter().map(TransactionRecord::from).collect();
        write_csv(&self.path(TRANSACTIONS_FILE), &TRANSACTION_HEADERS, &rows)
    }

    pub fn load_limits(&self) -> Result<Vec<Limit>> {
        let rows: Vec<LimitRecord> = read_csv(&self.path(LIMITS_FILE))?;
        Ok(rows.into_iter().filter_map(LimitRecord::into_limit).collect())
    }

    pub fn save_limits(&self, limits: &[Limit]) -> Result<()> {
        let rows: Vec<LimitRecord> = limits.iter().map(LimitRecord::from).collect();
        write_csv(&self.path(LIMITS_FILE), &LIMIT_HEADERS, &rows)
    }

    pub fn load_alerts(&self) -> Result<Vec<Alert>> {
        read_json(&self.path(ALERTS_FILE))
    }

    pub fn save_alerts(&self, alerts: &[Alert]) -> Result<()> {
        write_json(&self.path(ALERTS_FILE), &alerts)
    }

    pub fn load_achievements(&self) -> Result<AchievementState> {
        read_json(&self.path(ACHIEVEMENTS_FILE))
    }

    pub fn save_achievements(&self, state: &AchievementState) -> Result<()> {
        write_json(&self.path(ACHIEVEMENTS_FILE), state)
    }
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path.display()))?;
    let mut rows = Vec::new();
    for (line, result) in rdr.deserialize::<T>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(err) => {
                tracing::warn!(
                    file = %path.display(),
                    row = line + 1,
                    %err,
                    "skipping unreadable row"
                );
            }
        }
    }
    Ok(rows)
}

fn write_csv<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> Result<()> {
    replace_file(path, |file| {
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        wtr.write_record(headers)?;
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    })
}

fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
        Err(err) => return Err(err).with_context(|| format!("Read {}", path.display())),
    };
    Ok(serde_json::from_str(&text).unwrap_or_else(|err| {
        tracing::warn!(file = %path.display(), %err, "unparsable state file, starting empty");
        T::default()
    }))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    replace_file(path, |file| {
        serde_json::to_writer_pretty(&mut *file, value)?;
        file.write_all(b"\n")?;
        Ok(())
    })
}

/// Writes through a temp file in the target's directory, then renames it
/// into place. The temp file is removed if `write` fails.
fn replace_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut NamedTempFile) -> Result<()>,
{
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Create temp file in {}", dir.display()))?;
    write(&mut tmp).with_context(|| format!("Write {}", path.display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("Sync {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("Replace {}", path.display()))?;
    Ok(())
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct TransactionRecord {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Subcategory")]
    subcategory: String,
    #[serde(rename = "Location")]
    location: String,
    #[serde(rename = "Destination")]
    destination: String,
    #[serde(rename = "Transport_Mode")]
    transport_mode: String,
    #[serde(rename = "Transport_Type")]
    transport_type: String,
    #[serde(rename = "Bill_Type")]
    bill_type: String,
    #[serde(rename = "Provider")]
    provider: String,
    #[serde(rename = "Academic_Type")]
    academic_type: String,
    #[serde(rename = "Institution")]
    institution: String,
    #[serde(rename = "Health_Type")]
    health_type: String,
}

impl TransactionRecord {
    fn into_transaction(self) -> Option<Transaction> {
        let Ok(id) = self.id.parse::<i64>() else {
            tracing::warn!(id = %self.id, name = %self.name, "skipping row without a valid id");
            return None;
        };
        let amount = lenient_decimal(&self.amount);
        if amount.is_none() {
            tracing::warn!(id, amount = %self.amount, "unparsable amount, excluded from totals");
        }
        let date = parse_date(&self.date).ok();
        if date.is_none() {
            tracing::warn!(id, date = %self.date, "transaction date unparsable");
        }
        let details = match self.category.as_str() {
            "Food" => TransactionDetails::Food {
                subcategory: self.subcategory,
                location: self.location,
            },
            "Travel" => TransactionDetails::Travel {
                destination: self.destination,
                transport_mode: self.transport_mode,
            },
            "Transportation" => TransactionDetails::Transportation {
                transport_type: self.transport_type,
                location: self.location,
            },
            "Bills & Utilities" => TransactionDetails::BillsUtilities {
                bill_type: self.bill_type,
                provider: self.provider,
            },
            "Academic" => TransactionDetails::Academic {
                academic_type: self.academic_type,
                institution: self.institution,
            },
            "Health" => TransactionDetails::Health {
                health_type: self.health_type,
                provider: self.provider,
            },
            _ => TransactionDetails::Other,
        };
        Some(Transaction {
            id,
            name: self.name,
            unparsed_amount: amount.is_none().then_some(self.amount),
            unparsed_date: date.is_none().then_some(self.date),
            amount,
            date,
            category: self.category,
            details,
        })
    }
}

impl From<&Transaction> for TransactionRecord {
    fn from(t: &Transaction) -> Self {
        let mut rec = TransactionRecord {
            id: t.id.to_string(),
            name: t.name.clone(),
            amount: match (&t.amount, &t.unparsed_amount) {
                (Some(a), _) => a.to_string(),
                (None, raw) => raw.clone().unwrap_or_default(),
            },
            date: match (t.date, &t.unparsed_date) {
                (Some(d), _) => format_date(d),
                (None, raw) => raw.clone().unwrap_or_default(),
            },
            category: t.category.clone(),
            ..Default::default()
        };
        match &t.details {
            TransactionDetails::Food {
                subcategory,
                location,
            } => {
                rec.subcategory = subcategory.clone();
                rec.location = location.clone();
            }
            TransactionDetails::Travel {
                destination,
                transport_mode,
            } => {
                rec.destination = destination.clone();
                rec.transport_mode = transport_mode.clone();
            }
            TransactionDetails::Transportation {
                transport_type,
                location,
            } => {
                rec.transport_type = transport_type.clone();
                rec.location = location.clone();
            }
            TransactionDetails::BillsUtilities {
                bill_type,
                provider,
            } => {
                rec.bill_type = bill_type.clone();
                rec.provider = provider.clone();
            }
            TransactionDetails::Academic {
                academic_type,
                institution,
            } => {
                rec.academic_type = academic_type.clone();
                rec.institution = institution.clone();
            }
            TransactionDetails::Health {
                health_type,
                provider,
            } => {
                rec.health_type = health_type.clone();
                rec.provider = provider.clone();
            }
            TransactionDetails::Other => {}
        }
        rec
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct LimitRecord {
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Limit")]
    limit: String,
    #[serde(rename = "Alert_Threshold")]
    alert_threshold: String,
}

impl LimitRecord {
    fn into_limit(self) -> Option<Limit> {
        let amount = lenient_decimal(&self.limit);
        let threshold = lenient_decimal(&self.alert_threshold).and_then(|t| t.trunc().to_i64());
        let (Some(amount), Some(threshold)) = (amount, threshold) else {
            tracing::warn!(
                category = %self.category,
                limit = %self.limit,
                threshold = %self.alert_threshold,
                "skipping unparsable limit"
            );
            return None;
        };
        Limit::new(self.category, amount, threshold)
            .inspect_err(|err| tracing::warn!(%err, "skipping invalid limit"))
            .ok()
    }
}

impl From<&Limit> for LimitRecord {
    fn from(l: &Limit) -> Self {
        LimitRecord {
            category: l.category.clone(),
            limit: l.limit_amount.to_string(),
            alert_threshold: l.alert_threshold_percent.to_string(),
        }
    }
}
