//! In-memory request store.
//!
//! The store owns the request list and the notification feed. Writes are
//! create, delete and reset; everything else is a read-time projection
//! (see [`query`]).

mod query;
mod seed;

pub use query::*;
pub use seed::*;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use thiserror::Error;
use tracing::{debug, warn};

use crate::codec::generate_identifier_with;
use crate::config::{ConfigError, DashboardConfig};
use crate::models::{BloodGroup, BloodRequest, Notification, RequestStatus, UnknownBloodGroup};

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    UnknownBloodGroup(#[from] UnknownBloodGroup),

    #[error("No unused RTID after {0} attempts")]
    IdentifierExhausted(u32),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Raw values from the new-request form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRequest {
    pub patient_name: String,
    /// Blood group label, e.g. "O-"
    pub blood_group: String,
    /// Units as typed; must be a positive integer
    pub units_required: String,
    /// `YYYY-MM-DD`
    pub required_by_date: String,
    /// `HH:MM` (seconds accepted)
    pub required_by_time: String,
}

/// Combine a form date and time, read as wall-clock time in `tz`, into UTC.
pub fn local_timestamp(tz: FixedOffset, date: &str, time: &str) -> StoreResult<DateTime<Utc>> {
    let day = parse_date(date)?;
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map_err(|e| StoreError::InvalidInput(format!("time '{time}': {e}")))?;

    day.and_time(time)
        .and_local_timezone(tz)
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| StoreError::InvalidInput(format!("no such local time: {date} {time}")))
}

fn parse_date(date: &str) -> StoreResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| StoreError::InvalidInput(format!("date '{date}': {e}")))
}

fn parse_units(units: &str) -> StoreResult<u32> {
    match units.trim().parse::<u32>() {
        Ok(0) => Err(StoreError::InvalidInput("units must be at least 1".into())),
        Ok(n) => Ok(n),
        Err(e) => Err(StoreError::InvalidInput(format!("units '{units}': {e}"))),
    }
}

/// The single owner of dashboard state.
pub struct RequestStore {
    requests: Vec<BloodRequest>,
    notifications: Vec<Notification>,
    seed: Vec<BloodRequest>,
    config: DashboardConfig,
    timezone: FixedOffset,
    rng: Box<dyn RngCore + Send>,
}

impl RequestStore {
    /// Create a store holding the seed data, with an entropy-seeded RNG.
    pub fn new(config: DashboardConfig) -> StoreResult<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a store drawing identifiers from `rng`.
    pub fn with_rng(config: DashboardConfig, rng: impl RngCore + Send + 'static) -> StoreResult<Self> {
        config.validate()?;
        let timezone = config.timezone()?;
        let seed = seed_requests(timezone)?;
        Ok(Self {
            requests: seed.clone(),
            notifications: seed_notifications(),
            seed,
            config,
            timezone,
            rng: Box::new(rng),
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Hospital timezone.
    pub fn timezone(&self) -> FixedOffset {
        self.timezone
    }

    /// Stored requests, most recent first.
    pub fn requests(&self) -> &[BloodRequest] {
        &self.requests
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Look up a request by RTID.
    pub fn get(&self, rtid: &str) -> Option<&BloodRequest> {
        self.requests.iter().find(|r| r.rtid == rtid)
    }

    fn contains(&self, rtid: &str) -> bool {
        self.get(rtid).is_some()
    }

    /// Create a request from form input, stamped with the current time.
    pub fn create(&mut self, input: &NewRequest) -> StoreResult<BloodRequest> {
        self.create_at(input, Utc::now())
    }

    /// Create a request with an explicit creation time.
    ///
    /// The new request is `Pending` and is placed at the front of the list.
    pub fn create_at(&mut self, input: &NewRequest, now: DateTime<Utc>) -> StoreResult<BloodRequest> {
        let patient_name = input.patient_name.trim();
        if patient_name.is_empty() {
            return Err(StoreError::InvalidInput("patient name is required".into()));
        }
        let blood_group: BloodGroup = input.blood_group.parse()?;
        let units_required = parse_units(&input.units_required)?;
        let required_by = local_timestamp(
            self.timezone,
            &input.required_by_date,
            &input.required_by_time,
        )?;

        // Canonical form so the MMDD offsets always line up.
        let date_key = parse_date(&input.required_by_date)?
            .format("%Y-%m-%d")
            .to_string();
        let rtid = self.unused_identifier(&date_key)?;

        let request = BloodRequest {
            rtid,
            patient_name: patient_name.to_string(),
            blood_group,
            units_required,
            required_by,
            status: RequestStatus::Pending,
            city: self.config.city.clone(),
            created_at: now,
        };
        debug!(rtid = %request.rtid, group = %blood_group, units_required, "request created");

        self.requests.insert(0, request.clone());
        Ok(request)
    }

    fn unused_identifier(&mut self, date_key: &str) -> StoreResult<String> {
        let attempts = self.config.max_identifier_attempts;
        for _ in 0..attempts {
            let rtid = generate_identifier_with(date_key, &mut self.rng);
            if !self.contains(&rtid) {
                return Ok(rtid);
            }
            warn!(%rtid, "RTID collision, regenerating");
        }
        Err(StoreError::IdentifierExhausted(attempts))
    }

    /// Remove the request with `rtid`.
    ///
    /// Returns `false`, leaving the list unchanged, when no request matches.
    pub fn delete(&mut self, rtid: &str) -> bool {
        let before = self.requests.len();
        self.requests.retain(|r| r.rtid != rtid);
        let removed = self.requests.len() != before;
        debug!(%rtid, removed, "request delete");
        removed
    }

    /// Discard all changes and restore the seed requests.
    pub fn reset(&mut self) {
        self.requests = self.seed.clone();
        debug!(count = self.requests.len(), "requests reset to seed");
    }

    /// KPIs at `now`.
    pub fn kpis(&self, now: DateTime<Utc>) -> KpiSummary {
        aggregate(&self.requests, now)
    }

    /// Requests with statuses projected at `now`.
    pub fn projected(&self, now: DateTime<Utc>) -> Vec<BloodRequest> {
        project_statuses(&self.requests, now)
    }

    /// Requests passing `filter`, in collection order.
    pub fn filtered(&self, filter: &RequestFilter) -> Vec<&BloodRequest> {
        query::filter(&self.requests, filter, self.timezone)
    }
}
