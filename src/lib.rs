#![doc = "The `keystone` library crate."]
#![doc = ""]
#![doc = "Backend of the parish site: the admin credential store, the session guard that"]
#![doc = "protects every write, and the content and parish-record resources behind it."]
#![doc = "The `keystone` binary wires these into an actix-web server; `provision-admin`"]
#![doc = "uses the credential store to seed the first administrator."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

pub use crate::auth::{CredentialStore, SessionGuard};
pub use crate::config::Config;
pub use crate::error::AppError;
