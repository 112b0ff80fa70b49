//! In-memory callsign cache.
//!
//! Lookups hit the cache before the network; entries never expire unless a
//! TTL is configured. The cache is unbounded - interactive working sets are
//! small and no eviction policy is applied beyond the optional TTL.

use crate::error::{QrzError, Result};
use crate::types::CallsignRecord;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Seconds per TTL suffix unit. A bare number is minutes.
const MINUTE: f64 = 60.0;
const HOUR: f64 = 3600.0;
const DAY: f64 = 3600.0 * 24.0;
const WEEK: f64 = 3600.0 * 24.0 * 7.0;
const MONTH: f64 = 3600.0 * 24.0 * 30.5;
const YEAR: f64 = 3600.0 * 24.0 * 7.0 * 52.0;

#[derive(Debug, Clone)]
struct CacheEntry {
    record: CallsignRecord,
    inserted_at: Instant,
}

/// Cache mapping normalized callsigns to their decoded records.
///
/// Keys are case-insensitive: callsigns are uppercased before use, so
/// `w6bsd` and `W6BSD` share one entry. At most one entry exists per
/// callsign; a refresh overwrites the previous record.
#[derive(Debug, Default)]
pub struct CallsignCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Option<Duration>,
}

impl CallsignCache {
    /// Create a cache whose entries never expire
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache whose entries expire after `ttl`
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl: Some(ttl),
        }
    }

    /// Look up a cached record. Expired entries are treated as absent.
    pub fn get(&self, callsign: &str) -> Option<&CallsignRecord> {
        let key = callsign.to_uppercase();
        let entry = self.entries.get(&key)?;
        if self.is_fresh(entry) {
            debug!("{} found in cache", key);
            Some(&entry.record)
        } else {
            debug!("Cache entry for {} expired", key);
            None
        }
    }

    /// Insert or overwrite the record for a callsign
    pub fn put(&mut self, callsign: &str, record: CallsignRecord) {
        self.entries.insert(
            callsign.to_uppercase(),
            CacheEntry {
                record,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop the entry for a callsign, returning whether one was present
    pub fn remove(&mut self, callsign: &str) -> bool {
        self.entries.remove(&callsign.to_uppercase()).is_some()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries held, including expired ones not yet overwritten
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        match self.ttl {
            Some(ttl) => entry.inserted_at.elapsed() < ttl,
            None => true,
        }
    }
}

/// Parse a cache expiration written as an integer with an optional
/// `[YMWDH]` suffix: `"90"` is 90 minutes, `"12H"` twelve hours, `"2D"`
/// two days, `"1W"` one week, `"6M"` six months, `"1Y"` one year.
/// `"0"` means entries never expire.
pub fn parse_expire(expire: &str) -> Result<Option<Duration>> {
    let expire = expire.trim();
    let (digits, suffix) = match expire.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&expire[..idx], &expire[idx..]),
        Some(_) => (expire, ""),
        None => {
            return Err(QrzError::invalid_input("Empty expiration time"));
        }
    };

    let amount: u64 = digits.parse().map_err(|_| {
        QrzError::invalid_input(format!("Wrong expiration time: \"{}\"", expire))
    })?;

    let unit = match suffix.to_ascii_uppercase().as_str() {
        "" => MINUTE,
        "H" => HOUR,
        "D" => DAY,
        "W" => WEEK,
        "M" => MONTH,
        "Y" => YEAR,
        _ => {
            return Err(QrzError::invalid_input(format!(
                "Wrong expiration time: \"{}\"",
                expire
            )));
        }
    };

    if amount == 0 {
        return Ok(None);
    }
    Duration::try_from_secs_f64(amount as f64 * unit)
        .map(Some)
        .map_err(|_| {
            QrzError::invalid_input(format!("Expiration time out of range: \"{}\"", expire))
        })
}
