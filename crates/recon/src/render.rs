use serde::Serialize;

use crate::config::SLOT_COUNT;
use crate::model::{IdOrigin, MatchRecord, ReconciliationResult, TargetReason};

/// Shown in place of a PID for applicants not on the unregistered list.
pub const NO_PID_MARKER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdHint {
    Existing,
    New,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Present,
    Absent,
}

impl Presence {
    pub fn label(self) -> &'static str {
        match self {
            Self::Present => "yes",
            Self::Absent => "no",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    None,
    Unregistered,
    NoListedRole,
}

/// Presentation of one match record. Carries no logic beyond the hints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowRender<'a> {
    pub id: &'a str,
    pub id_hint: IdHint,
    pub slots: [Presence; SLOT_COUNT],
    pub pid: &'a str,
    pub highlight: Highlight,
    pub fields: [&'a str; 9],
}

pub fn render_record(record: &MatchRecord) -> RowRender<'_> {
    RowRender {
        id: &record.assigned_id,
        id_hint: match record.id_origin {
            IdOrigin::Existing => IdHint::Existing,
            IdOrigin::New => IdHint::New,
        },
        slots: record.slot_presence.map(|p| if p { Presence::Present } else { Presence::Absent }),
        pid: record.unregistered_pid.as_deref().unwrap_or(NO_PID_MARKER),
        highlight: match record.target_reason {
            Some(TargetReason::Unregistered) => Highlight::Unregistered,
            Some(TargetReason::NoListedRole) => Highlight::NoListedRole,
            None => Highlight::None,
        },
        fields: record.applicant.fields(),
    }
}

pub fn render_rows(result: &ReconciliationResult) -> Vec<RowRender<'_>> {
    result.records.iter().map(render_record).collect()
}
