//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and operations
//! - Arena handles
//! - Seedable random numbers
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod random;
pub mod logging;
