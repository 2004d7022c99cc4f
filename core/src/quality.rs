//! Translation hints for the editor grid
//!
//! These are heuristics, not quality checks: a suggestion is a copy of a
//! sibling language's value, and validation only flags empty cells and
//! values whose length is far from the other languages' average.

use serde::{Deserialize, Serialize};

use crate::table::{Table, TableError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QualityLimits {
    /// Below this share of the sibling average a value is suspicious
    pub min_ratio: f32,
    /// Above this multiple of the sibling average a value is suspicious
    pub max_ratio: f32,
}

impl Default for QualityLimits {
    fn default() -> Self {
        Self {
            min_ratio: 0.3,
            max_ratio: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CheckOutcome {
    Valid,
    Missing,
    SuspiciousLength { ratio: f32 },
}

impl CheckOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Valid => None,
            Self::Missing => Some("Missing translation"),
            Self::SuspiciousLength { .. } => Some("Translation length looks suspicious"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellIssue {
    pub key: String,
    pub language: String,
    pub outcome: CheckOutcome,
}

/// Copy of `source_language`'s value for `key`, if it has one.
pub fn suggest_translation(
    table: &Table,
    key: &str,
    source_language: &str,
) -> Result<Option<String>, TableError> {
    let value = table.value(key, source_language)?;
    Ok((!value.is_empty()).then(|| value.to_string()))
}

/// Languages that can serve as a suggestion source for a cell.
pub fn suggestion_sources<'a>(
    table: &'a Table,
    key: &str,
    target_language: &str,
) -> Result<Vec<&'a str>, TableError> {
    table.value(key, target_language)?;
    let mut sources = Vec::new();
    for language in table.languages() {
        if language != target_language && !table.value(key, language)?.is_empty() {
            sources.push(language.as_str());
        }
    }
    Ok(sources)
}

pub fn check_translation(
    table: &Table,
    key: &str,
    language: &str,
    limits: &QualityLimits,
) -> Result<CheckOutcome, TableError> {
    let value = table.value(key, language)?;
    if value.is_empty() {
        return Ok(CheckOutcome::Missing);
    }

    let mut sibling_lengths = Vec::new();
    for other in table.languages() {
        if other == language {
            continue;
        }
        let sibling = table.value(key, other)?;
        if !sibling.is_empty() {
            sibling_lengths.push(sibling.chars().count() as f32);
        }
    }
    if sibling_lengths.is_empty() {
        return Ok(CheckOutcome::Valid);
    }

    let average = sibling_lengths.iter().sum::<f32>() / sibling_lengths.len() as f32;
    let ratio = value.chars().count() as f32 / average;
    if ratio < limits.min_ratio || ratio > limits.max_ratio {
        Ok(CheckOutcome::SuspiciousLength { ratio })
    } else {
        Ok(CheckOutcome::Valid)
    }
}

/// Every cell that does not pass [`check_translation`], row-major.
pub fn review(table: &Table, limits: &QualityLimits) -> Vec<CellIssue> {
    let mut issues = Vec::new();
    for row in table.rows() {
        for language in table.languages() {
            // keys and languages come from the table itself
            if let Ok(outcome) = check_translation(table, &row.key, language, limits) {
                if !outcome.is_valid() {
                    issues.push(CellIssue {
                        key: row.key.clone(),
                        language: language.clone(),
                        outcome,
                    });
                }
            }
        }
    }
    issues
}
