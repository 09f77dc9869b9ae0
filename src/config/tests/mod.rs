//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Credential, target, and bind address resolution
//! - `validation`: Configuration consistency and operation mode tests

mod helpers;
