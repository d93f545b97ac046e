//! Display projections for the dashboard table and snapshot export.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::encode_payload;
use crate::models::{BloodRequest, Notification, RequestStatus};
use crate::store::{KpiSummary, RequestFilter, RequestStore};

/// Day and abbreviated month in `tz`, e.g. "20 Nov".
pub fn format_date(timestamp: DateTime<Utc>, tz: FixedOffset) -> String {
    timestamp.with_timezone(&tz).format("%d %b").to_string()
}

/// 12-hour clock time in `tz`, e.g. "10:00 am".
pub fn format_time(timestamp: DateTime<Utc>, tz: FixedOffset) -> String {
    timestamp.with_timezone(&tz).format("%I:%M %P").to_string()
}

/// One row of the requests table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestRow {
    pub rtid: String,
    pub patient_name: String,
    pub blood_group: String,
    pub units_required: u32,
    /// e.g. "20 Nov"
    pub required_date: String,
    /// e.g. "10:00 am"
    pub required_time: String,
    /// Projected status
    pub status: RequestStatus,
    pub status_icon: String,
    pub status_class: String,
    /// QR payload for this request
    pub payload: String,
}

impl RequestRow {
    /// Build a row, projecting the status at `now`.
    pub fn from_request(request: &BloodRequest, now: DateTime<Utc>, tz: FixedOffset) -> Self {
        let status = request.projected_status(now);
        Self {
            rtid: request.rtid.clone(),
            patient_name: request.patient_name.clone(),
            blood_group: request.blood_group.label().to_string(),
            units_required: request.units_required,
            required_date: format_date(request.required_by, tz),
            required_time: format_time(request.required_by, tz),
            status,
            status_icon: status.icon().to_string(),
            status_class: status.css_class().to_string(),
            payload: encode_payload(request),
        }
    }
}

/// Rows for the requests passing `filter`, in collection order.
pub fn table_rows(store: &RequestStore, filter: &RequestFilter, now: DateTime<Utc>) -> Vec<RequestRow> {
    store
        .filtered(filter)
        .into_iter()
        .map(|request| RequestRow::from_request(request, now, store.timezone()))
        .collect()
}

/// Everything the dashboard page shows, at one instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub hospital_name: String,
    /// Snapshot instant
    pub generated_at: String,
    pub kpis: KpiSummary,
    /// Header badge count
    pub notification_count: usize,
    pub rows: Vec<RequestRow>,
    pub notifications: Vec<Notification>,
}

impl DashboardSnapshot {
    /// Capture the store at `now` with no table filter applied.
    pub fn capture(store: &RequestStore, now: DateTime<Utc>) -> Self {
        Self {
            hospital_name: store.config().hospital_name.clone(),
            generated_at: now.to_rfc3339(),
            kpis: store.kpis(now),
            notification_count: store.notifications().len(),
            rows: table_rows(store, &RequestFilter::default(), now),
            notifications: store.notifications().to_vec(),
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use chrono::TimeZone;

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(330 * 60).unwrap()
    }

    fn make_store() -> RequestStore {
        RequestStore::new(DashboardConfig::default()).unwrap()
    }

    #[test]
    fn test_format_date_and_time() {
        let ts = Utc.with_ymd_and_hms(2025, 11, 20, 4, 30, 0).unwrap();
        assert_eq!(format_date(ts, ist()), "20 Nov");
        assert_eq!(format_time(ts, ist()), "10:00 am");

        let evening = Utc.with_ymd_and_hms(2025, 11, 20, 13, 15, 0).unwrap();
        assert_eq!(format_time(evening, ist()), "06:45 pm");
    }

    #[test]
    fn test_row_shows_projected_status() {
        let store = make_store();
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let rows = table_rows(&store, &RequestFilter::default(), now);

        let first = &rows[0];
        assert_eq!(first.rtid, "RTID 1113 001A");
        assert_eq!(first.status, RequestStatus::Expired);
        assert_eq!(first.status_icon, "⚪");
        assert_eq!(first.status_class, "status-expired");
        assert_eq!(first.required_date, "20 Nov");
        assert_eq!(first.payload, "RTID 1113 001A|A+|2|Delhi|20251120T0430");

        // Stored status untouched.
        assert_eq!(store.requests()[0].status, RequestStatus::Pending);
    }

    #[test]
    fn test_rows_follow_filter() {
        let store = make_store();
        let now = Utc.with_ymd_and_hms(2025, 11, 13, 0, 0, 0).unwrap();
        let filter = RequestFilter::parse("A+", "All").unwrap();

        let rows = table_rows(&store, &filter, now);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.blood_group == "A+"));
    }

    #[test]
    fn test_snapshot_json() {
        let store = make_store();
        let now = Utc.with_ymd_and_hms(2025, 11, 13, 0, 0, 0).unwrap();
        let snapshot = DashboardSnapshot::capture(&store, now);

        assert_eq!(snapshot.hospital_name, "AIIMS Delhi");
        assert_eq!(snapshot.notification_count, 3);
        assert_eq!(snapshot.rows.len(), 5);
        assert_eq!(snapshot.kpis.total_units, 9);

        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"total_requests\": 5"));
        assert!(json.contains("RTID 1210 005E"));
    }
}
