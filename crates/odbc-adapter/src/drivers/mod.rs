//! Driver implementations of [`Connection`](crate::core::traits::Connection).
//!
//! - [`scripted`]: in-memory connection with canned catalog rows
//! - [`odbc`]: live ODBC connection (requires the `odbc` feature)

#[cfg(feature = "odbc")]
pub mod odbc;
pub mod scripted;

#[cfg(feature = "odbc")]
pub use odbc::{check_odbc_available, OdbcConnection};
pub use scripted::ScriptedConnection;
