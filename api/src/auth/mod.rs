//! Staff authentication

pub mod api_key;

pub use api_key::{hash_api_key, staff_auth_middleware, StaffIdentity};
