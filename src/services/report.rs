//! Dashboard numbers for a student or a whole subject.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::{ReviewSettings, STRUGGLED_CARDS_LIMIT, STRUGGLE_THRESHOLD};
use crate::db;
use crate::srs::{
    compute_card_distribution, compute_subject_mastery_with, count_due, next_due_at, review_heatmap,
    struggled_cards, summarize_sessions, SessionSummary, StruggledCard, SubjectMastery,
};

/// Heatmap window
const HEATMAP_DAYS: i64 = 90;

#[derive(Debug, Clone, Serialize)]
pub struct StudentReport {
    pub student_id: i64,
    pub total_cards: usize,
    pub due_now: usize,
    pub next_due_at: Option<DateTime<Utc>>,
    /// Active cards per box, box 1 first
    pub box_distribution: [usize; 5],
    pub subject_mastery: BTreeMap<i64, SubjectMastery>,
    pub sessions: SessionSummary,
    pub heatmap: BTreeMap<NaiveDate, usize>,
    pub struggled: Vec<StruggledCard>,
}

impl StudentReport {
    /// No cards at all: rendered as an empty state, distinct from a failure
    pub fn is_empty(&self) -> bool {
        self.total_cards == 0
    }
}

pub fn student_report(
    conn: &Connection,
    settings: &ReviewSettings,
    student_id: i64,
    now: DateTime<Utc>,
) -> rusqlite::Result<StudentReport> {
    let cards = crate::profile_scope!("load_student_cards", { db::get_active_cards(conn, student_id)? });
    let sessions = db::get_completed_sessions(conn, student_id)?;
    let recent_logs = db::get_student_logs(conn, student_id, Some(now - Duration::days(HEATMAP_DAYS)))?;

    Ok(StudentReport {
        student_id,
        total_cards: cards.len(),
        due_now: count_due(&cards, now),
        next_due_at: next_due_at(&cards, now),
        box_distribution: compute_card_distribution(&cards),
        subject_mastery: compute_subject_mastery_with(&cards, settings.mastery_box),
        sessions: summarize_sessions(&sessions),
        heatmap: review_heatmap(&recent_logs),
        struggled: struggled_cards(&recent_logs, STRUGGLE_THRESHOLD, STRUGGLED_CARDS_LIMIT),
    })
}

/// Class-wide view of one subject: box histogram plus mastery percentage.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectReport {
    pub subject_id: i64,
    pub box_distribution: [usize; 5],
    pub mastery: Option<SubjectMastery>,
}

pub fn subject_report(
    conn: &Connection,
    settings: &ReviewSettings,
    subject_id: i64,
) -> rusqlite::Result<SubjectReport> {
    let cards = db::get_subject_cards(conn, subject_id)?;

    Ok(SubjectReport {
        subject_id,
        box_distribution: compute_card_distribution(&cards),
        mastery: compute_subject_mastery_with(&cards, settings.mastery_box)
            .remove(&subject_id),
    })
}
