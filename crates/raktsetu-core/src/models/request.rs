//! Blood request models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ABO/Rh blood group.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
}

/// Label did not name one of the eight blood groups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown blood group: {0}")]
pub struct UnknownBloodGroup(pub String);

impl BloodGroup {
    /// Every blood group, in the order the request form lists them.
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::OPositive,
        BloodGroup::ONegative,
        BloodGroup::AbPositive,
        BloodGroup::AbNegative,
    ];

    /// Display label (e.g., "AB+").
    pub fn label(&self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BloodGroup {
    type Err = UnknownBloodGroup;

    // Exact match only: "a+" is not a blood group.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BloodGroup::ALL
            .into_iter()
            .find(|group| group.label() == s)
            .ok_or_else(|| UnknownBloodGroup(s.to_string()))
    }
}

/// Lifecycle status of a request.
///
/// Only `Pending` is ever assigned by the core. `Expired` is also derived at
/// read time (see [`BloodRequest::projected_status`]); `Donated` and
/// `Redeemed` only appear in seeded data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    /// Waiting for a donor
    Pending,
    /// A donor has given blood against this request
    Donated,
    /// The hospital has redeemed the donated units
    Redeemed,
    /// Deadline passed without a donation
    Expired,
}

impl RequestStatus {
    /// Upper-case label shown in the status badge.
    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Donated => "DONATED",
            RequestStatus::Redeemed => "REDEEMED",
            RequestStatus::Expired => "EXPIRED",
        }
    }

    /// Badge icon.
    pub fn icon(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "🔴",
            RequestStatus::Donated => "🔵",
            RequestStatus::Redeemed => "🟢",
            RequestStatus::Expired => "⚪",
        }
    }

    /// Style class for the badge.
    pub fn css_class(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "status-pending",
            RequestStatus::Donated => "status-donated",
            RequestStatus::Redeemed => "status-redeemed",
            RequestStatus::Expired => "status-expired",
        }
    }

    /// Whether this status counts toward the active-requests KPI.
    pub fn is_active(&self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::Donated)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A hospital's request for donated blood.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BloodRequest {
    /// Tracking identifier, `RTID MMDD NNNNC`
    pub rtid: String,
    /// Patient name (free text)
    pub patient_name: String,
    /// Requested blood group
    pub blood_group: BloodGroup,
    /// Units of blood needed
    pub units_required: u32,
    /// Deadline for the donation
    pub required_by: DateTime<Utc>,
    /// Stored status; see `projected_status` for what is displayed
    pub status: RequestStatus,
    /// City the request is raised in
    pub city: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl BloodRequest {
    /// Status as of `now`: a pending request past its deadline reads as expired.
    ///
    /// The stored `status` is never rewritten.
    pub fn projected_status(&self, now: DateTime<Utc>) -> RequestStatus {
        if self.status == RequestStatus::Pending && self.required_by < now {
            RequestStatus::Expired
        } else {
            self.status
        }
    }

    /// Copy of this request with its status replaced by the projection.
    pub fn projected(&self, now: DateTime<Utc>) -> BloodRequest {
        BloodRequest {
            status: self.projected_status(now),
            ..self.clone()
        }
    }
}
