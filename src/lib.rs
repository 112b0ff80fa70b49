//! # QRZ.com XML callsign lookup client
//!
//! A Rust client library for the QRZ.com XML callsign lookup service.
//!
//! The client authenticates against the service, fetches XML station records,
//! decodes them into strongly-typed [`CallsignRecord`] values, and caches
//! results in memory so repeated lookups avoid redundant network round-trips.
//!
//! ## Features
//!
//! - **Type-safe records**: responses are parsed into a fixed-schema struct
//!   with typed numeric, coordinate, and date fields
//! - **Session management**: lazy authentication, with one transparent
//!   re-authentication and retry when the server rejects a session key
//! - **Caching**: case-insensitive in-memory cache with an opt-in TTL;
//!   by default cached records never expire
//! - **Error handling**: distinct error variants for authentication, missing
//!   callsigns, network, parse, and service failures
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qrzlib::QrzClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = QrzClient::new("your_username", "your_xml_data_key")?;
//!
//!     let record = client.get_call("W6BSD").await?;
//!     println!(
//!         "{}: {} {:?} {:?}",
//!         record.call,
//!         record.fullname().unwrap_or_default(),
//!         record.latlon(),
//!         record.grid,
//!     );
//!
//!     // Served from the cache, no second round-trip
//!     let _again = client.get_call("w6bsd").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Authentication
//!
//! You need a valid QRZ.com username and XML data key (or password). Lookups
//! authenticate lazily on first use; call [`QrzClient::authenticate`] to
//! validate credentials up front.
//!
//! ## Concurrency
//!
//! The client issues one lookup at a time and adds no concurrency of its own;
//! callers wanting parallel lookups orchestrate that externally. There is no
//! internal retry backoff and the only timeout is the HTTP request timeout,
//! which surfaces as a network error.

pub mod cache;
pub mod client;
pub mod error;
pub mod types;

pub use cache::{parse_expire, CallsignCache};
pub use client::{QrzClient, QrzClientConfig};
pub use error::{QrzError, Result};
pub use types::{CallsignRecord, QrzResponse, SessionInfo};

/// Re-export the date type used for license dates
pub use chrono::NaiveDate;

/// The default base URL for QRZ's XML API
pub const DEFAULT_BASE_URL: &str = "https://xmldata.qrz.com/xml/current/";

/// Default user agent string for requests
pub const DEFAULT_USER_AGENT: &str = concat!("qrzlib-rs/", env!("CARGO_PKG_VERSION"));
