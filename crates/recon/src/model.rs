use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::config::SLOT_COUNT;
use crate::table::Table;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// The three datasets of one run. Absent sources stay `None` so the engine,
/// not the loader, decides which ones are required.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub account_export: Option<Table>,
    pub unregistered: Option<Table>,
    pub application_form: Option<Table>,
}

// ---------------------------------------------------------------------------
// Application form row
// ---------------------------------------------------------------------------

/// The nine application-form fields, relabeled from their sheet positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplicantRow {
    pub category: String,
    pub facility_name: String,
    pub last_name: String,
    pub first_name: String,
    pub blank1: String,
    pub blank2: String,
    pub email: String,
    pub permission: String,
    pub notes: String,
}

impl ApplicantRow {
    pub const LABELS: [&'static str; 9] = [
        "category",
        "facility_name",
        "last_name",
        "first_name",
        "blank1",
        "blank2",
        "email",
        "permission",
        "notes",
    ];

    /// Build from the nine canonical field values, in form order.
    pub fn from_fields(fields: [String; 9]) -> Self {
        let [category, facility_name, last_name, first_name, blank1, blank2, email, permission, notes] =
            fields;
        Self {
            category,
            facility_name,
            last_name,
            first_name,
            blank1,
            blank2,
            email,
            permission,
            notes,
        }
    }

    pub fn fields(&self) -> [&str; 9] {
        [
            &self.category,
            &self.facility_name,
            &self.last_name,
            &self.first_name,
            &self.blank1,
            &self.blank2,
            &self.email,
            &self.permission,
            &self.notes,
        ]
    }
}

// ---------------------------------------------------------------------------
// Per-row outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdOrigin {
    Existing,
    New,
}

impl std::fmt::Display for IdOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Existing => write!(f, "existing"),
            Self::New => write!(f, "new"),
        }
    }
}

/// Why a row was selected for export. `Unregistered` wins when both apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetReason {
    Unregistered,
    NoListedRole,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    /// 0-based data row of the application form.
    pub row: usize,
    pub applicant: ApplicantRow,
    /// Canonical key of the applicant's email.
    pub email: String,
    pub assigned_id: String,
    pub id_origin: IdOrigin,
    pub slot_presence: [bool; SLOT_COUNT],
    pub unregistered_pid: Option<String>,
    pub is_target: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_reason: Option<TargetReason>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub total_rows: usize,
    pub existing_ids: usize,
    pub new_ids: usize,
    pub unregistered_matches: usize,
    pub target_rows: usize,
    pub target_emails: usize,
    pub next_id_seed: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_new_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_new_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub run_at: String,
    pub slot_labels: [String; SLOT_COUNT],
}

/// Everything one reconciliation produced. Export reads the ID map and target
/// set from here; nothing outlives the value.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub records: Vec<MatchRecord>,
    pub assigned_ids: BTreeMap<String, String>,
    pub target_emails: BTreeSet<String>,
    pub new_id_emails: BTreeSet<String>,
}

impl ReconciliationResult {
    pub fn to_json_pretty(&self) -> Result<String, crate::ReconError> {
        serde_json::to_string_pretty(self).map_err(|e| crate::ReconError::Io(e.to_string()))
    }
}
