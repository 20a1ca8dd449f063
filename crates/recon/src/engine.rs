use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::classify::classify_target;
use crate::config::{ApplicationFormLayout, ReconConfig, FORM_FIELD_COUNT};
use crate::error::ReconError;
use crate::matcher::{existing_id_map, next_id_seed, slot_sets, unregistered_map};
use crate::model::{
    ApplicantRow, IdOrigin, MatchRecord, ReconInput, ReconMeta, ReconSummary,
    ReconciliationResult,
};
use crate::table::{canonical_key, Table};

/// Run one reconciliation pass. Every lookup is rebuilt from the input; the
/// returned value owns all derived state.
pub fn reconcile(
    config: &ReconConfig,
    input: &ReconInput,
) -> Result<ReconciliationResult, ReconError> {
    let export = input
        .account_export
        .as_ref()
        .ok_or(ReconError::MissingInput("account export"))?;
    let form = input
        .application_form
        .as_ref()
        .ok_or(ReconError::MissingInput("application form"))?;

    let applicants = applicant_rows(form, &config.application_form)?;

    let acct = &config.account_export;
    let existing = existing_id_map(export, acct);
    let seed = next_id_seed(export, acct.id_column);
    let slots = slot_sets(export, acct);
    let unregistered: HashMap<String, String> = match input.unregistered.as_ref() {
        Some(table) => unregistered_map(table, &config.unregistered),
        None => HashMap::new(),
    };

    log::debug!(
        "lookups built: {} existing emails, seed {}, slot sizes {:?}, {} unregistered",
        existing.len(),
        seed,
        slots.each_ref().map(|s| s.len()),
        unregistered.len()
    );

    let mut next_id = seed;
    let mut assigned_ids: BTreeMap<String, String> = BTreeMap::new();
    let mut target_emails = BTreeSet::new();
    let mut new_id_emails = BTreeSet::new();
    let mut records = Vec::with_capacity(applicants.len());

    for (row, applicant) in applicants.into_iter().enumerate() {
        let email = applicant.email.clone();

        let (assigned_id, id_origin) = if let Some(id) = existing.get(&email) {
            (id.clone(), IdOrigin::Existing)
        } else {
            let id = next_id.to_string();
            next_id = next_id.checked_add(1).ok_or(ReconError::IdOverflow(next_id))?;
            new_id_emails.insert(email.clone());
            (id, IdOrigin::New)
        };
        // A repeated email overwrites its earlier entry; export uses the last one.
        assigned_ids.insert(email.clone(), assigned_id.clone());

        let slot_presence = slots.each_ref().map(|s| s.contains(&email));
        let unregistered_pid = unregistered.get(&email).cloned();

        let target_reason =
            classify_target(&slot_presence, unregistered_pid.is_some(), &config.targets);
        if target_reason.is_some() {
            target_emails.insert(email.clone());
        }

        records.push(MatchRecord {
            row,
            applicant,
            email,
            assigned_id,
            id_origin,
            slot_presence,
            unregistered_pid,
            is_target: target_reason.is_some(),
            target_reason,
        });
    }

    let summary = compute_summary(&records, &target_emails, seed, next_id);
    log::info!(
        "reconciled {} rows: {} existing, {} new, {} targets",
        summary.total_rows,
        summary.existing_ids,
        summary.new_ids,
        summary.target_rows
    );

    Ok(ReconciliationResult {
        meta: ReconMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            slot_labels: acct.slot_labels.clone(),
        },
        summary,
        records,
        assigned_ids,
        target_emails,
        new_id_emails,
    })
}

/// Relabel the nine form columns of every data row.
pub fn applicant_rows(
    form: &Table,
    layout: &ApplicationFormLayout,
) -> Result<Vec<ApplicantRow>, ReconError> {
    if form.width() <= layout.email_column() {
        return Err(ReconError::MissingColumn {
            table: "application form".into(),
            column: format!(
                "{} (email); form has {} columns",
                layout.email_column(),
                form.width()
            ),
        });
    }

    let first = layout.first_field_column;
    Ok(form
        .rows
        .iter()
        .map(|row| {
            let fields: [String; FORM_FIELD_COUNT] =
                std::array::from_fn(|i| canonical_key(row.get(first + i)));
            ApplicantRow::from_fields(fields)
        })
        .collect())
}

fn compute_summary(
    records: &[MatchRecord],
    target_emails: &BTreeSet<String>,
    seed: i64,
    next_id: i64,
) -> ReconSummary {
    let existing_ids = records
        .iter()
        .filter(|r| r.id_origin == IdOrigin::Existing)
        .count();
    let minted = next_id - seed;

    ReconSummary {
        total_rows: records.len(),
        existing_ids,
        new_ids: records.len() - existing_ids,
        unregistered_matches: records.iter().filter(|r| r.unregistered_pid.is_some()).count(),
        target_rows: records.iter().filter(|r| r.is_target).count(),
        target_emails: target_emails.len(),
        next_id_seed: seed,
        first_new_id: (minted > 0).then_some(seed),
        last_new_id: (minted > 0).then_some(next_id - 1),
    }
}
