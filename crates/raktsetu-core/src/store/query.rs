//! Read-time projections over the request collection.
//!
//! Nothing here mutates: expiry, KPIs and table filters are recomputed from
//! the stored requests on every read.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{StoreError, StoreResult};
use crate::models::{BloodGroup, BloodRequest, RequestStatus};

/// Wildcard accepted by both table filters.
pub const FILTER_ALL: &str = "All";

/// Aggregate counters shown on the dashboard cards.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KpiSummary {
    /// Every request in the collection
    pub total_requests: u32,
    /// Projected pending or donated
    pub active_requests: u32,
    /// Sum of units over all requests, regardless of status
    pub total_units: u32,
    /// Projected donated
    pub donations_received: u32,
    /// Projected redeemed
    pub requests_redeemed: u32,
}

/// Copy of `requests` with each status replaced by its projection at `now`.
pub fn project_statuses(requests: &[BloodRequest], now: DateTime<Utc>) -> Vec<BloodRequest> {
    requests.iter().map(|r| r.projected(now)).collect()
}

/// Compute KPIs from projected statuses.
pub fn aggregate(requests: &[BloodRequest], now: DateTime<Utc>) -> KpiSummary {
    requests
        .iter()
        .fold(KpiSummary::default(), |mut kpis, request| {
            let status = request.projected_status(now);
            kpis.total_requests += 1;
            kpis.total_units = kpis.total_units.saturating_add(request.units_required);
            if status.is_active() {
                kpis.active_requests += 1;
            }
            match status {
                RequestStatus::Donated => kpis.donations_received += 1,
                RequestStatus::Redeemed => kpis.requests_redeemed += 1,
                RequestStatus::Pending | RequestStatus::Expired => {}
            }
            kpis
        })
}

/// Table filter. `None` in either field means "All".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestFilter {
    /// Exact blood group match
    pub blood_group: Option<BloodGroup>,
    /// Calendar day (day and month only) of `required_by`
    pub required_on: Option<NaiveDate>,
}

impl RequestFilter {
    /// Build a filter from the table's select values.
    ///
    /// Each value is either [`FILTER_ALL`] or, respectively, a blood-group
    /// label and a `YYYY-MM-DD` date.
    pub fn parse(blood_group: &str, required_on: &str) -> StoreResult<Self> {
        let blood_group = match blood_group {
            FILTER_ALL => None,
            label => Some(label.parse::<BloodGroup>()?),
        };
        let required_on = match required_on {
            FILTER_ALL => None,
            date => Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
                StoreError::InvalidInput(format!("date filter '{date}': {e}"))
            })?),
        };
        Ok(Self {
            blood_group,
            required_on,
        })
    }

    /// Whether `request` passes both predicates.
    ///
    /// The day comparison ignores the year and is made in `tz`.
    pub fn matches(&self, request: &BloodRequest, tz: FixedOffset) -> bool {
        let group_match = self
            .blood_group
            .map_or(true, |group| group == request.blood_group);
        let day_match = self.required_on.map_or(true, |day| {
            let local = request.required_by.with_timezone(&tz);
            local.day() == day.day() && local.month() == day.month()
        });
        group_match && day_match
    }
}

/// Requests passing `filter`, in collection order.
pub fn filter<'a>(
    requests: &'a [BloodRequest],
    filter: &RequestFilter,
    tz: FixedOffset,
) -> Vec<&'a BloodRequest> {
    requests.iter().filter(|r| filter.matches(r, tz)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(330 * 60).unwrap()
    }

    fn make_request(
        rtid: &str,
        group: BloodGroup,
        units: u32,
        required_by: DateTime<Utc>,
        status: RequestStatus,
    ) -> BloodRequest {
        BloodRequest {
            rtid: rtid.into(),
            patient_name: "Test Patient".into(),
            blood_group: group,
            units_required: units,
            required_by,
            status,
            city: "Delhi".into(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_aggregate_uses_projected_statuses() {
        let now = utc(2025, 11, 13, 0);
        let requests = vec![
            make_request("a", BloodGroup::APositive, 2, utc(2025, 11, 20, 4), RequestStatus::Pending),
            make_request("b", BloodGroup::OPositive, 1, utc(2025, 11, 15, 8), RequestStatus::Donated),
            make_request("c", BloodGroup::BPositive, 3, utc(2025, 11, 5, 10), RequestStatus::Redeemed),
            make_request("d", BloodGroup::AbPositive, 1, utc(2025, 11, 1, 6), RequestStatus::Pending),
            make_request("e", BloodGroup::APositive, 2, utc(2025, 12, 10, 5), RequestStatus::Pending),
        ];

        let kpis = aggregate(&requests, now);
        assert_eq!(
            kpis,
            KpiSummary {
                total_requests: 5,
                active_requests: 3,
                total_units: 9,
                donations_received: 1,
                requests_redeemed: 1,
            }
        );

        // Stored value untouched.
        assert_eq!(requests[3].status, RequestStatus::Pending);
        assert_eq!(
            project_statuses(&requests, now)[3].status,
            RequestStatus::Expired
        );
    }

    #[test]
    fn test_aggregate_empty() {
        assert_eq!(aggregate(&[], utc(2025, 1, 1, 0)), KpiSummary::default());
    }

    #[test]
    fn test_filter_parse_wildcards() {
        let filter = RequestFilter::parse("All", "All").unwrap();
        assert_eq!(filter, RequestFilter::default());
    }

    #[test]
    fn test_filter_parse_rejects_bad_values() {
        assert!(matches!(
            RequestFilter::parse("Z+", "All"),
            Err(StoreError::UnknownBloodGroup(_))
        ));
        assert!(matches!(
            RequestFilter::parse("All", "20/11/2025"),
            Err(StoreError::InvalidInput(_))
        ));
        // Case-sensitive wildcard
        assert!(RequestFilter::parse("all", "All").is_err());
    }

    #[test]
    fn test_filter_by_group_and_day() {
        let requests = vec![
            make_request("a", BloodGroup::APositive, 2, utc(2025, 11, 20, 4), RequestStatus::Pending),
            make_request("b", BloodGroup::APositive, 2, utc(2025, 12, 10, 5), RequestStatus::Pending),
            make_request("c", BloodGroup::OPositive, 1, utc(2025, 11, 20, 8), RequestStatus::Donated),
        ];

        let by_group = RequestFilter::parse("A+", "All").unwrap();
        let rtids: Vec<_> = filter(&requests, &by_group, ist()).iter().map(|r| r.rtid.as_str()).collect();
        assert_eq!(rtids, vec!["a", "b"]);

        let both = RequestFilter::parse("A+", "2025-11-20").unwrap();
        let rtids: Vec<_> = filter(&requests, &both, ist()).iter().map(|r| r.rtid.as_str()).collect();
        assert_eq!(rtids, vec!["a"]);
    }

    #[test]
    fn test_day_filter_ignores_year() {
        let requests = vec![make_request(
            "a",
            BloodGroup::APositive,
            1,
            utc(2025, 11, 20, 4),
            RequestStatus::Pending,
        )];
        let other_year = RequestFilter::parse("All", "2031-11-20").unwrap();
        assert_eq!(filter(&requests, &other_year, ist()).len(), 1);
    }

    #[test]
    fn test_day_filter_uses_hospital_zone() {
        // 20:00 UTC on the 19th is 01:30 IST on the 20th.
        let requests = vec![make_request(
            "late",
            BloodGroup::APositive,
            1,
            utc(2025, 11, 19, 20),
            RequestStatus::Pending,
        )];
        let day = RequestFilter::parse("All", "2025-11-20").unwrap();
        assert_eq!(filter(&requests, &day, ist()).len(), 1);

        let utc_zone = FixedOffset::east_opt(0).unwrap();
        assert!(filter(&requests, &day, utc_zone).is_empty());
    }
}
