//! Item codes: the unique key of every inventory item.
//!
//! Codes reach the system from three places and each has its own normalization:
//!
//! - **Decoder** reads are untrusted: uppercased, stripped to `[A-Z0-9]`, then
//!   filtered (must start with [`DECODER_PREFIX`] and be at least
//!   [`DECODER_MIN_LEN`] long) to drop false-positive reads.
//! - **Manual** entries are trimmed and uppercased; any non-empty result is accepted.
//! - **Stored** codes (baseline rows, persisted snapshots) get the manual treatment
//!   but an empty result is simply skipped instead of reported.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Decoder reads must start with this character.
pub const DECODER_PREFIX: char = 'B';

/// Decoder reads shorter than this are discarded.
pub const DECODER_MIN_LEN: usize = 7;

/// Where a raw code came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeSource {
    /// Camera/handheld barcode decoder.
    Decoder,
    /// Operator typed the code.
    Manual,
}

impl CodeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeSource::Decoder => "decoder",
            CodeSource::Manual => "manual",
        }
    }
}

impl core::fmt::Display for CodeSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized, non-empty item code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemCode(String);

impl ValueObject for ItemCode {}

impl ItemCode {
    /// Normalize an operator-entered code (trim + uppercase).
    pub fn manual(raw: &str) -> DomainResult<Self> {
        Self::stored(raw).ok_or_else(|| DomainError::validation("item code cannot be empty"))
    }

    /// Normalize a decoder read and apply the acceptance filter.
    ///
    /// Returns `None` for reads that must be silently discarded.
    pub fn decoded(raw: &str) -> Option<Self> {
        let code: String = raw
            .to_uppercase()
            .chars()
            .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            .collect();

        if !code.starts_with(DECODER_PREFIX) || code.len() < DECODER_MIN_LEN {
            return None;
        }
        Some(Self(code))
    }

    /// Normalize a code read back from a baseline row or a persisted snapshot.
    pub fn stored(raw: &str) -> Option<Self> {
        let code = raw.trim().to_uppercase();
        if code.is_empty() { None } else { Some(Self(code)) }
    }

    /// Normalize according to the source the raw value came from.
    ///
    /// Decoder rejections surface as `Ok(None)`; empty manual input is an error.
    pub fn from_source(raw: &str, source: CodeSource) -> DomainResult<Option<Self>> {
        match source {
            CodeSource::Decoder => Ok(Self::decoded(raw)),
            CodeSource::Manual => Self::manual(raw).map(Some),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for ItemCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ItemCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ItemCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::manual(s)
    }
}

impl TryFrom<String> for ItemCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::manual(&value)
    }
}

impl From<ItemCode> for String {
    fn from(value: ItemCode) -> Self {
        value.0
    }
}
