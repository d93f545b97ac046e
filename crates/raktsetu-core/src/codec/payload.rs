//! Scannable-code payload.
//!
//! Format: `RTID|BloodGroup|Units|City|RequiredBy`, where `RequiredBy` is the
//! UTC timestamp in `YYYYMMDDTHHMM` form.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::BloodRequest;

/// Field separator inside a payload.
pub const PAYLOAD_SEPARATOR: &str = "|";

/// Number of characters kept from the stripped timestamp.
const COMPACT_TIMESTAMP_LEN: usize = 13;

/// Strip `-` and `:` from the RFC 3339 UTC form and keep the first 13 characters.
///
/// The cut is positional, so seconds and fractions are always dropped.
pub fn compact_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .chars()
        .filter(|c| *c != '-' && *c != ':')
        .take(COMPACT_TIMESTAMP_LEN)
        .collect()
}

/// Serialize a request into the string handed to the QR renderer.
pub fn encode_payload(request: &BloodRequest) -> String {
    [
        request.rtid.clone(),
        request.blood_group.label().to_string(),
        request.units_required.to_string(),
        request.city.clone(),
        compact_timestamp(request.required_by),
    ]
    .join(PAYLOAD_SEPARATOR)
}
