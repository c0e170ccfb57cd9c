//! Test helpers module
//!
//! This module provides utilities and helpers for testing the VolunteerHub
//! client: a mock events API and test data builders.

#![allow(dead_code)]

pub mod api_mock;
pub mod test_data;

pub use api_mock::*;
pub use test_data::*;
