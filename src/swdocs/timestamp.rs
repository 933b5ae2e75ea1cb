//! Timestamps as stored and as sent over the wire.
//!
//! A [`Timestamp`] is a UTC instant with microsecond precision. It has two
//! textual forms:
//!
//! - storage: `2024-01-15 14:30:05.123456`, fixed width so that text ordering
//!   in the database matches time ordering;
//! - wire: `2024-01-15T14:30:05.123456Z`, used in JSON payloads.
//!
//! Both forms carry the full precision, so converting between them is exact.
//! Parsing never falls back to a default: malformed text is an error.

use crate::error::{Result, SwdocsError};
use chrono::{DateTime, Duration, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
const STORAGE_PARSE: &str = "%Y-%m-%d %H:%M:%S%.f";
const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";
const WIRE_PARSE: &str = "%Y-%m-%dT%H:%M:%S%.fZ";
const DISPLAY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.trunc_subsecs(6))
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn to_storage(&self) -> String {
        self.0.format(STORAGE_FORMAT).to_string()
    }

    pub fn from_storage(value: &str) -> Result<Self> {
        parse(value, STORAGE_PARSE)
    }

    pub fn to_wire(&self) -> String {
        self.0.format(WIRE_FORMAT).to_string()
    }

    pub fn from_wire(value: &str) -> Result<Self> {
        parse(value, WIRE_PARSE)
    }

    /// Short date used by listings.
    pub fn to_display(&self) -> String {
        self.0.format(DISPLAY_FORMAT).to_string()
    }
}

fn parse(value: &str, format: &str) -> Result<Timestamp> {
    NaiveDateTime::parse_from_str(value, format)
        .map(|naive| Timestamp::from_datetime(naive.and_utc()))
        .map_err(|source| SwdocsError::Timestamp {
            value: value.to_string(),
            source,
        })
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::from_wire(&raw).map_err(serde::de::Error::custom)
    }
}

/// Hands out timestamps for writes.
///
/// Lives inside the write gate, so every write sees the stamps of all writes
/// before it. Each stamp is strictly later than the previous one even when
/// the wall clock stalls or steps backwards.
#[derive(Debug, Default)]
pub struct StampClock {
    last: Option<Timestamp>,
}

impl StampClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start after the latest stamp already persisted.
    pub fn seeded(last: Option<Timestamp>) -> Self {
        Self { last }
    }

    pub fn tick(&mut self) -> Timestamp {
        let now = Timestamp::now();
        let next = match self.last {
            Some(last) if now <= last => Timestamp(last.0 + Duration::microseconds(1)),
            _ => now,
        };
        self.last = Some(next);
        next
    }
}
