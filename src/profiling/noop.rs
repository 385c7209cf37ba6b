//! No-op implementations when profiling is disabled.
//!
//! Everything here is an empty `#[inline(always)]` function the compiler
//! removes entirely.

use std::time::Duration;

#[inline(always)]
pub fn init() {}

#[inline(always)]
pub fn shutdown() {}

#[inline(always)]
pub fn log_event<T>(_: T) {}

#[inline(always)]
pub fn log_timed(_: &str, _: Duration) {}
