//! Event types for profiling.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A profiling event with timestamp and optional duration.
#[derive(Serialize)]
pub struct ProfileEvent {
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The type of event
    pub event_type: EventType,
    /// Duration in microseconds (for timed events)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_us: Option<u64>,
}

impl ProfileEvent {
    /// Create a new event with the current timestamp.
    pub fn new(event_type: EventType) -> Self {
        Self {
            timestamp: Utc::now(),
            event_type,
            duration_us: None,
        }
    }

    /// Create a new event with duration.
    pub fn with_duration(event_type: EventType, duration: std::time::Duration) -> Self {
        Self {
            duration_us: Some(duration.as_micros() as u64),
            ..Self::new(event_type)
        }
    }
}

/// Types of events that can be logged.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventType {
    // === Session lifecycle ===
    /// Profiling session started
    SessionStart {
        /// Session identifier
        session_id: String,
    },
    /// Profiling session ended
    SessionEnd {
        /// Total events logged
        total_events: u64,
    },

    /// CLI command dispatched
    Command {
        name: String,
    },

    // === Database operations ===
    /// Database query started
    DbQuery {
        /// Operation type (select, insert, update, count)
        operation: String,
        /// Table name
        table: String,
    },

    // === Scheduling ===
    /// Leitner box transition computed
    SrsCalculation {
        /// Policy used (leitner)
        algorithm: String,
        card_id: i64,
        /// Rating as stored (again, hard, good, easy)
        rating: String,
    },
    /// Review queue assembled
    QueueBuilt {
        /// Cards due before capping
        due: i64,
        /// Cards placed in the queue
        selected: i64,
    },

    // === Timed scope ===
    /// A timed code block completed
    TimedScope {
        /// Name of the scope
        name: String,
        duration_ms: u64,
    },
}
