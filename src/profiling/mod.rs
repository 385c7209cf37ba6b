//! Opt-in event trace for scheduling and storage work.
//!
//! Built with `--features profiling`, events are appended as JSON lines to a
//! per-process file under the profile directory. Without the feature the
//! same calls resolve to empty inline functions and macros that discard
//! their arguments.
//!
//! ```ignore
//! use classroom_srs::profile_log;
//! use classroom_srs::profiling::EventType;
//!
//! profile_log!(EventType::QueueBuilt { due: 40, selected: 20 });
//! ```

#[cfg(feature = "profiling")]
mod event;
#[cfg(feature = "profiling")]
mod logger;

#[cfg(feature = "profiling")]
pub use event::*;
#[cfg(feature = "profiling")]
pub use logger::*;

#[cfg(not(feature = "profiling"))]
mod noop;
#[cfg(not(feature = "profiling"))]
pub use noop::*;

/// Record one [`EventType`].
#[cfg(feature = "profiling")]
#[macro_export]
macro_rules! profile_log {
    ($event_type:expr) => {
        $crate::profiling::log_event($event_type)
    };
}

#[cfg(not(feature = "profiling"))]
#[macro_export]
macro_rules! profile_log {
    ($($args:tt)*) => {};
}

/// Evaluate a block and record how long it took as a timed scope.
///
/// ```ignore
/// let cards = profile_scope!("load_student_cards", {
///     db::get_active_cards(&conn, student_id)?
/// });
/// ```
#[cfg(feature = "profiling")]
#[macro_export]
macro_rules! profile_scope {
    ($name:expr, $body:block) => {{
        let started = std::time::Instant::now();
        let value = $body;
        $crate::profiling::log_timed($name, started.elapsed());
        value
    }};
}

#[cfg(not(feature = "profiling"))]
#[macro_export]
macro_rules! profile_scope {
    ($name:expr, $body:block) => {
        $body
    };
}
