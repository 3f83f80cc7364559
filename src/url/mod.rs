//! URL handling module for Pathway-Atlas
//!
//! This module provides URL canonicalization and host extraction. Everything
//! here is pure: no network access, and malformed input surfaces as a
//! [`UrlError`](crate::UrlError) for the caller to drop.

mod domain;
mod normalize;

pub use domain::{extract_domain, has_host};
pub use normalize::{normalize_str, normalize_url};
