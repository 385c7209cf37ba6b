pub mod config;
pub mod db;
pub mod domain;
pub mod paths;
pub mod profiling;
pub mod services;
pub mod srs;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
