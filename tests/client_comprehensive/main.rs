//! Client Comprehensive Test Suite
//!
//! Exercises the public client surface end to end, against both the
//! in-memory and the on-disk snapshot backends.
//!
//! ## Test Organization
//!
//! - `persistence_tests.rs` - Snapshot file, reopen, version mismatch policies
//! - `query_tests.rs` - Filters, joins, ordering, pagination, search
//! - `mutation_tests.rs` - Insert / update / delete contracts
//! - `auth_tests.rs` - Sign-up linkage, sessions surviving reopen
//! - `property_tests.rs` - Conjunction, stable ordering, counts (proptest)
//! - `test_utils.rs` - Shared fixtures
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test client_comprehensive
//! cargo test --test client_comprehensive persistence
//! ```

mod test_utils;

mod auth_tests;
mod mutation_tests;
mod persistence_tests;
mod property_tests;
mod query_tests;
