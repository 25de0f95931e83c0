//! Test utilities
//!
//! Fixtures for building valid inputs and a clock that tests can move
//! forward. Services are exercised against the real `InMemoryLibrary`
//! rather than mocks, so the atomic store paths are covered too.

pub mod clock;
pub mod fixtures;

pub use clock::*;
pub use fixtures::*;
