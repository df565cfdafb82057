//! Testing utilities for fission-pkg.
//!
//! This module provides:
//! - In-memory doubles for the package API and storage service
//! - A local HTTP stub for exercising the reqwest clients

mod mocks;
mod server;

pub use mocks::{InMemoryStorage, RecordingPackageApi};
pub use server::{RecordedRequest, StubResponse, StubServer};
