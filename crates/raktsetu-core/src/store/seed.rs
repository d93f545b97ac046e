//! Demo data the dashboard starts with and resets to.

use chrono::FixedOffset;

use super::{local_timestamp, StoreResult};
use crate::models::{BloodGroup, BloodRequest, Notification, NotificationKind, RequestStatus};

struct SeedRow {
    rtid: &'static str,
    patient_name: &'static str,
    blood_group: BloodGroup,
    units_required: u32,
    required_by: (&'static str, &'static str),
    status: RequestStatus,
    created_at: (&'static str, &'static str),
}

const SEED_CITY: &str = "Delhi";

const SEED_ROWS: [SeedRow; 5] = [
    SeedRow {
        rtid: "RTID 1113 001A",
        patient_name: "Raj Kumar",
        blood_group: BloodGroup::APositive,
        units_required: 2,
        required_by: ("2025-11-20", "10:00"),
        status: RequestStatus::Pending,
        created_at: ("2025-11-13", "08:30"),
    },
    SeedRow {
        rtid: "RTID 1110 002B",
        patient_name: "Priya Sharma",
        blood_group: BloodGroup::OPositive,
        units_required: 1,
        required_by: ("2025-11-15", "14:00"),
        status: RequestStatus::Donated,
        created_at: ("2025-11-10", "09:15"),
    },
    SeedRow {
        rtid: "RTID 1105 003C",
        patient_name: "Amit Patel",
        blood_group: BloodGroup::BPositive,
        units_required: 3,
        required_by: ("2025-11-05", "16:00"),
        status: RequestStatus::Redeemed,
        created_at: ("2025-11-05", "07:45"),
    },
    SeedRow {
        rtid: "RTID 1101 004D",
        patient_name: "Sneha Reddy",
        blood_group: BloodGroup::AbPositive,
        units_required: 1,
        required_by: ("2025-11-01", "12:00"),
        status: RequestStatus::Expired,
        created_at: ("2025-11-01", "06:00"),
    },
    SeedRow {
        rtid: "RTID 1210 005E",
        patient_name: "Vikram Singh",
        blood_group: BloodGroup::APositive,
        units_required: 2,
        required_by: ("2025-12-10", "11:00"),
        status: RequestStatus::Pending,
        created_at: ("2025-11-10", "10:20"),
    },
];

/// Seed requests, most recent first, with wall-clock times read in `tz`.
pub fn seed_requests(tz: FixedOffset) -> StoreResult<Vec<BloodRequest>> {
    SEED_ROWS
        .iter()
        .map(|row| {
            Ok(BloodRequest {
                rtid: row.rtid.to_string(),
                patient_name: row.patient_name.to_string(),
                blood_group: row.blood_group,
                units_required: row.units_required,
                required_by: local_timestamp(tz, row.required_by.0, row.required_by.1)?,
                status: row.status,
                city: SEED_CITY.to_string(),
                created_at: local_timestamp(tz, row.created_at.0, row.created_at.1)?,
            })
        })
        .collect()
}

/// Seed notification feed.
pub fn seed_notifications() -> Vec<Notification> {
    vec![
        Notification::new(
            "1",
            "New blood request created for A+ (2 units)",
            "2 hours ago",
            NotificationKind::New,
        ),
        Notification::new(
            "2",
            "Blood donation received for RTID 1110 002B",
            "5 hours ago",
            NotificationKind::Update,
        ),
        Notification::new(
            "3",
            "Request RTID 1105 003C marked as REDEEMED",
            "1 day ago",
            NotificationKind::Update,
        ),
    ]
}
