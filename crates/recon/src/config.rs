use serde::{Deserialize, Serialize};

use crate::error::ReconError;

/// Number of role slot columns in the account export.
pub const SLOT_COUNT: usize = 4;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Column layout and business rules for one reconciliation.
///
/// Every section is optional in TOML; omitted sections take the layout of the
/// standard account export and application form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconConfig {
    pub account_export: AccountExportColumns,
    pub unregistered: UnregisteredColumns,
    pub application_form: ApplicationFormLayout,
    pub upload: UploadLayout,
    pub targets: TargetRule,
}

// ---------------------------------------------------------------------------
// Account export
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccountExportColumns {
    pub id_column: usize,
    /// Email columns of the four role slots, in scan order. Later slots win
    /// when the same email maps to different IDs.
    pub slot_columns: [usize; SLOT_COUNT],
    pub slot_labels: [String; SLOT_COUNT],
}

impl Default for AccountExportColumns {
    fn default() -> Self {
        Self {
            id_column: 0,
            slot_columns: [8, 16, 25, 42],
            slot_labels: [
                "pre-individual".into(),
                "individual".into(),
                "import".into(),
                "bulk".into(),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Unregistered list
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnregisteredColumns {
    pub email_column: usize,
    pub pid_column: usize,
}

impl Default for UnregisteredColumns {
    fn default() -> Self {
        Self {
            email_column: 5,
            pid_column: 7,
        }
    }
}

impl UnregisteredColumns {
    /// Minimum table width for the lookup to be usable.
    pub fn required_width(&self) -> usize {
        self.email_column.max(self.pid_column) + 1
    }
}

// ---------------------------------------------------------------------------
// Application form
// ---------------------------------------------------------------------------

/// Nine consecutive form columns are read, starting at `first_field_column`:
/// category, facility name, last name, first name, two blanks, email,
/// permission, notes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApplicationFormLayout {
    pub sheet_index: usize,
    /// Sheet rows above the header row.
    pub preamble_rows: usize,
    pub first_field_column: usize,
}

impl Default for ApplicationFormLayout {
    fn default() -> Self {
        Self {
            sheet_index: 0,
            preamble_rows: 7,
            first_field_column: 1,
        }
    }
}

/// Offset of the email field within the nine form fields.
pub const FORM_EMAIL_OFFSET: usize = 6;
pub const FORM_FIELD_COUNT: usize = 9;

impl ApplicationFormLayout {
    pub fn email_column(&self) -> usize {
        self.first_field_column + FORM_EMAIL_OFFSET
    }

    /// Sheet row index of the header row.
    pub fn header_row(&self) -> usize {
        self.preamble_rows
    }
}

// ---------------------------------------------------------------------------
// Upload sheet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadLayout {
    pub sheet: String,
    pub email_header: String,
    /// Column that receives the assigned ID on export.
    pub id_column: usize,
}

impl Default for UploadLayout {
    fn default() -> Self {
        Self {
            sheet: "Upload".into(),
            email_header: "email".into(),
            id_column: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Target rule
// ---------------------------------------------------------------------------

/// An applicant absent from every slot listed here needs provisioning.
///
/// Positions index into the four slot columns, not into the export table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetRule {
    pub absent_slots: Vec<usize>,
}

impl Default for TargetRule {
    fn default() -> Self {
        Self {
            absent_slots: vec![1, 3],
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ReconError> {
        toml::to_string_pretty(self).map_err(|e| ReconError::Io(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let acct = &self.account_export;

        for (i, col) in acct.slot_columns.iter().enumerate() {
            if *col == acct.id_column {
                return Err(ReconError::ConfigValidation(format!(
                    "account_export: slot column {col} overlaps the ID column"
                )));
            }
            if acct.slot_columns[..i].contains(col) {
                return Err(ReconError::ConfigValidation(format!(
                    "account_export: slot column {col} listed twice"
                )));
            }
        }

        if acct.slot_labels.iter().any(|l| l.trim().is_empty()) {
            return Err(ReconError::ConfigValidation(
                "account_export: slot labels must not be empty".into(),
            ));
        }

        if self.unregistered.email_column == self.unregistered.pid_column {
            return Err(ReconError::ConfigValidation(
                "unregistered: email and pid columns must differ".into(),
            ));
        }

        if self.upload.sheet.is_empty() {
            return Err(ReconError::ConfigValidation(
                "upload: sheet name must not be empty".into(),
            ));
        }
        if self.upload.email_header.is_empty() {
            return Err(ReconError::ConfigValidation(
                "upload: email_header must not be empty".into(),
            ));
        }

        if self.targets.absent_slots.is_empty() {
            return Err(ReconError::ConfigValidation(
                "targets: absent_slots must name at least one slot".into(),
            ));
        }
        if let Some(bad) = self.targets.absent_slots.iter().find(|s| **s >= SLOT_COUNT) {
            return Err(ReconError::ConfigValidation(format!(
                "targets: slot position {bad} out of range (0..{SLOT_COUNT})"
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
