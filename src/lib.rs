//! Desktop client for an HWP/HWPX → PDF conversion service.
//!
//! Files are staged locally ([`staging`]), submitted and polled through
//! [`convert`], and the whole interaction is driven by the pure
//! [`app::update`] function so it can be exercised without a window.

pub mod app;
pub mod config;
pub mod convert;
pub mod error;
pub mod logging;
pub mod staging;
pub mod utils;
