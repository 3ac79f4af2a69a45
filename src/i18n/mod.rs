// SPDX-License-Identifier: MPL-2.0
//! Localization of UI strings with Fluent.
//!
//! Translation files are embedded at build time from `assets/i18n/`. The
//! active locale is resolved from the CLI, then the config file, then the OS.

pub mod fluent;

pub use fluent::I18n;
