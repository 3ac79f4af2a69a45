// SPDX-License-Identifier: MPL-2.0
//! Test helpers shared by unit tests.
//!
//! Float comparisons go through the `approx` macros re-exported here rather
//! than `assert_eq!`.

pub use approx::{assert_abs_diff_eq, assert_relative_eq};

/// Tolerance for f32 values that should be equal up to rounding.
pub const F32_EPSILON: f32 = 1e-6;

/// Tolerance for f64 values that should be equal up to rounding.
pub const F64_EPSILON: f64 = 1e-9;
