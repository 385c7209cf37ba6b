//! Application services.
//!
//! Orchestration around the pure scheduling core: each service loads rows,
//! calls into `srs`, and persists or reports the result.

pub mod report;
pub mod review;

pub use report::{student_report, subject_report, StudentReport, SubjectReport};
pub use review::{complete_session, start_session, submit_review, ReviewError, SessionPlan};
