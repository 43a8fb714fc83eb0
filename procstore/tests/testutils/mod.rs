//! Test utilities for procstore integration tests
//!
//! - CatalogFixture: isolated in-memory database behind the public API
//! - ScriptEngine: tiny statement runner standing in for the host engine
//! - FailingDriver: storage driver with switchable read/write faults

#![allow(dead_code)]

pub mod catalog_fixture;
pub mod failing_driver;
pub mod script_engine;
