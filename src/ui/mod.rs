// SPDX-License-Identifier: MPL-2.0
//! User interface building blocks shared by the screens.
//!
//! - [`navbar`] - Tab bar switching between the commentary desk and the player
//! - [`styles`] - Centralized styling (buttons, containers)
//! - [`design_tokens`] - Design system constants (spacing, sizing, typography)
//! - [`theming`] - Light/Dark/System theme mode management

pub mod design_tokens;
pub mod navbar;
pub mod styles;
pub mod theming;
