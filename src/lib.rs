//! Rewrites LVGL 9 API identifiers in generated UI sources so they build
//! against LVGL 8.
//!
//! The [`core::engine::CompatEngine`] does the work; [`builders::hooks`] wires
//! it into the build at configuration load and before `buildprog`.

pub mod builders;
pub mod core;
pub mod utils;
