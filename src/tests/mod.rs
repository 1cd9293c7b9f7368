// Test modules for genai-relay crate
//
// Each source module has a corresponding test file that focuses on
// behaviour verification. HTTP-level provider tests live in the crate's
// tests/ directory and run against wiremock servers.

pub mod helpers;

pub mod config;
pub mod error;
