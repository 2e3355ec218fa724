//! Shared test utilities for the weather workspace.
//!
//! This crate provides:
//! - Canned NWS and WeatherBug documents
//! - Builders for canonical records and location entries
//! - Float assertion macros
//! - Log capture for asserting on emitted warnings
//! - Scratch directories for configuration and equipment files
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../../crates/test-utils" }
//! ```

pub mod fixtures;
pub mod generators;
pub mod logs;

pub use fixtures::*;
pub use generators::*;
pub use logs::capture_logs;

// Re-exported for macro expansion in dependent crates.
pub use weather_common;

/// Temporary directory removed when the returned guard is dropped.
pub fn scratch_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("weather-test-")
        .tempdir()
        .expect("failed to create scratch directory")
}

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Assert that a `Reading<f64>` holds a value close to the expected one.
///
/// ```ignore
/// use test_utils::assert_reading_approx_eq;
///
/// assert_reading_approx_eq!(record.temperature, 72.5, 1e-9);
/// ```
#[macro_export]
macro_rules! assert_reading_approx_eq {
    ($reading:expr, $expected:expr, $epsilon:expr) => {{
        match &$reading {
            $crate::weather_common::Reading::Value(v) => $crate::assert_approx_eq!(*v, $expected, $epsilon),
            other => panic!("expected a value, got {:?}", other),
        }
    }};
}
