//! RaktSetu Core Library
//!
//! In-memory blood-request tracking for a hospital dashboard.
//!
//! # Architecture
//!
//! ```text
//!   New-request form ──► RequestStore::create ──► codec::generate_identifier
//!                               │
//!                     [requests, most recent first]
//!                               │
//!          ┌────────────────────┼─────────────────────┐
//!          ▼                    ▼                     ▼
//!   query::aggregate     view::table_rows      codec::encode_payload
//!   (KPI cards)          (filtered table)      (QR renderer)
//! ```
//!
//! # Core Principle
//!
//! **Expiry is a read-time projection.** A pending request past its deadline
//! is shown and counted as expired, but its stored status stays pending.
//!
//! # Modules
//!
//! - [`models`]: Domain types (BloodRequest, BloodGroup, RequestStatus, Notification)
//! - [`store`]: Request store, seed data and read-time queries
//! - [`codec`]: RTID generation and QR payload encoding
//! - [`dashboard`]: Store actions wired to host prompter/clipboard/notifier
//! - [`view`]: Table rows and JSON snapshot
//! - [`config`]: Per-deployment settings

pub mod codec;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod store;
pub mod view;

// Re-export commonly used types
pub use codec::{encode_payload, generate_identifier};
pub use config::DashboardConfig;
pub use dashboard::{
    Clipboard, ClipboardError, ConfirmAction, ConfirmPrompt, Dashboard, DashboardError, Notifier,
    Prompter, Toast,
};
pub use models::{BloodGroup, BloodRequest, Notification, NotificationKind, RequestStatus};
pub use store::{KpiSummary, NewRequest, RequestFilter, RequestStore};
pub use view::{DashboardSnapshot, RequestRow};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum RaktSetuError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<store::StoreError> for RaktSetuError {
    fn from(e: store::StoreError) -> Self {
        match e {
            store::StoreError::Config(e) => RaktSetuError::ConfigError(e.to_string()),
            exhausted @ store::StoreError::IdentifierExhausted(_) => {
                RaktSetuError::InternalError(exhausted.to_string())
            }
            other => RaktSetuError::InvalidInput(other.to_string()),
        }
    }
}

impl From<config::ConfigError> for RaktSetuError {
    fn from(e: config::ConfigError) -> Self {
        RaktSetuError::ConfigError(e.to_string())
    }
}

impl From<serde_json::Error> for RaktSetuError {
    fn from(e: serde_json::Error) -> Self {
        RaktSetuError::SerializationError(e.to_string())
    }
}

impl From<dashboard::DashboardError> for RaktSetuError {
    fn from(e: dashboard::DashboardError) -> Self {
        match e {
            dashboard::DashboardError::Store(e) => e.into(),
            poisoned @ dashboard::DashboardError::LockPoisoned => {
                RaktSetuError::InternalError(poisoned.to_string())
            }
        }
    }
}

// =========================================================================
// Host Capabilities (implemented in Swift/Kotlin)
// =========================================================================

/// Confirmation dialog.
#[uniffi::export(with_foreign)]
pub trait HostPrompter: Send + Sync {
    fn confirm(&self, prompt: FfiConfirmPrompt) -> bool;
}

/// System clipboard. Returns `false` when the write fails.
#[uniffi::export(with_foreign)]
pub trait HostClipboard: Send + Sync {
    fn write_text(&self, text: String) -> bool;
}

/// Toast presenter.
#[uniffi::export(with_foreign)]
pub trait HostNotifier: Send + Sync {
    fn notify(&self, title: String, description: String);
}

/// A foreign capability handle, adapted to the dashboard's collaborator traits.
struct HostCap<T: ?Sized>(Arc<T>);

impl Prompter for HostCap<dyn HostPrompter> {
    fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        self.0.confirm(prompt.clone().into())
    }
}

impl Clipboard for HostCap<dyn HostClipboard> {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.0.write_text(text.to_string()) {
            Ok(())
        } else {
            Err(ClipboardError("host clipboard rejected the write".into()))
        }
    }
}

impl Notifier for HostCap<dyn HostNotifier> {
    fn notify(&self, toast: Toast) {
        self.0.notify(toast.title, toast.description);
    }
}

type HostDashboard =
    Dashboard<HostCap<dyn HostPrompter>, HostCap<dyn HostClipboard>, HostCap<dyn HostNotifier>>;

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Install a `tracing` subscriber writing to stderr.
///
/// `filter` uses `EnvFilter` syntax; when absent, `RUST_LOG` is read, then
/// `info`. Returns `false` if a subscriber was already installed.
#[uniffi::export]
pub fn init_logging(filter: Option<String>) -> bool {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

/// Open a dashboard seeded with demo data.
///
/// `config_toml` overrides the default [`DashboardConfig`].
#[uniffi::export]
pub fn open_dashboard(
    config_toml: Option<String>,
    prompter: Arc<dyn HostPrompter>,
    clipboard: Arc<dyn HostClipboard>,
    notifier: Arc<dyn HostNotifier>,
) -> Result<Arc<RaktSetuCore>, RaktSetuError> {
    let config = match config_toml {
        Some(toml) => DashboardConfig::from_toml_str(&toml)?,
        None => DashboardConfig::default(),
    };
    let store = RequestStore::new(config)?;
    tracing::info!(hospital = %store.config().hospital_name, "dashboard opened");
    Ok(Arc::new(RaktSetuCore {
        dashboard: Dashboard::new(
            store,
            HostCap(prompter),
            HostCap(clipboard),
            HostCap(notifier),
        ),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe dashboard wrapper for FFI.
///
/// Host callbacks run with the store unlocked, so a prompter or notifier
/// may call back into this object.
#[derive(uniffi::Object)]
pub struct RaktSetuCore {
    dashboard: HostDashboard,
}

#[uniffi::export]
impl RaktSetuCore {
    // =========================================================================
    // Request Operations
    // =========================================================================

    /// Create a request from form values.
    pub fn create_request(&self, input: FfiNewRequest) -> Result<FfiBloodRequest, RaktSetuError> {
        let request = self.dashboard.create_request(&input.into())?;
        Ok(request.into())
    }

    /// Delete a request; the host prompter is asked first.
    pub fn delete_request(&self, rtid: String) -> Result<bool, RaktSetuError> {
        Ok(self.dashboard.delete_request(&rtid)?)
    }

    /// Restore the seed data; the host prompter is asked first.
    pub fn reset_data(&self) -> Result<bool, RaktSetuError> {
        Ok(self.dashboard.reset_data()?)
    }

    /// Copy an RTID to the host clipboard.
    pub fn copy_rtid(&self, rtid: String) -> Result<bool, RaktSetuError> {
        Ok(self.dashboard.copy_rtid(&rtid))
    }

    /// Confirm and acknowledge a logout.
    pub fn logout(&self) -> Result<bool, RaktSetuError> {
        Ok(self.dashboard.logout())
    }

    // =========================================================================
    // Read Operations
    // =========================================================================

    /// Stored requests (unprojected), most recent first.
    pub fn list_requests(&self) -> Result<Vec<FfiBloodRequest>, RaktSetuError> {
        let store = self.dashboard.store()?;
        Ok(store
            .requests()
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Table rows for the given filters ("All" or a value).
    pub fn filter_requests(
        &self,
        blood_group: String,
        required_on: String,
    ) -> Result<Vec<FfiRequestRow>, RaktSetuError> {
        let filter = RequestFilter::parse(&blood_group, &required_on)?;
        let store = self.dashboard.store()?;
        let rows = view::table_rows(&store, &filter, chrono::Utc::now());
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// KPI counters as of now.
    pub fn kpis(&self) -> Result<FfiKpiSummary, RaktSetuError> {
        let store = self.dashboard.store()?;
        Ok(store.kpis(chrono::Utc::now()).into())
    }

    /// Notification feed.
    pub fn notifications(&self) -> Result<Vec<FfiNotification>, RaktSetuError> {
        let store = self.dashboard.store()?;
        Ok(store
            .notifications()
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// QR payload for a request.
    pub fn qr_payload(&self, rtid: String) -> Result<String, RaktSetuError> {
        self.dashboard
            .qr_payload(&rtid)?
            .ok_or(RaktSetuError::NotFound(rtid))
    }

    /// Full dashboard state as JSON.
    pub fn snapshot_json(&self) -> Result<String, RaktSetuError> {
        let store = self.dashboard.store()?;
        let snapshot = DashboardSnapshot::capture(&store, chrono::Utc::now());
        Ok(snapshot.to_json()?)
    }

    /// Hospital name for the header.
    pub fn hospital_name(&self) -> Result<String, RaktSetuError> {
        let store = self.dashboard.store()?;
        Ok(store.config().hospital_name.clone())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe confirmation prompt.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiConfirmPrompt {
    pub action: ConfirmAction,
    pub title: String,
    pub text: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

impl From<ConfirmPrompt> for FfiConfirmPrompt {
    fn from(prompt: ConfirmPrompt) -> Self {
        Self {
            action: prompt.action,
            title: prompt.title,
            text: prompt.text,
            confirm_label: prompt.confirm_label,
            cancel_label: prompt.cancel_label,
        }
    }
}

/// FFI-safe new-request form values.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewRequest {
    pub patient_name: String,
    pub blood_group: String,
    pub units_required: String,
    pub required_by_date: String,
    pub required_by_time: String,
}

impl From<FfiNewRequest> for NewRequest {
    fn from(input: FfiNewRequest) -> Self {
        NewRequest {
            patient_name: input.patient_name,
            blood_group: input.blood_group,
            units_required: input.units_required,
            required_by_date: input.required_by_date,
            required_by_time: input.required_by_time,
        }
    }
}

/// FFI-safe blood request.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBloodRequest {
    pub rtid: String,
    pub patient_name: String,
    pub blood_group: String,
    pub units_required: u32,
    /// RFC 3339, UTC
    pub required_by: String,
    pub status: String,
    pub city: String,
    /// RFC 3339, UTC
    pub created_at: String,
}

impl From<BloodRequest> for FfiBloodRequest {
    fn from(request: BloodRequest) -> Self {
        Self {
            rtid: request.rtid,
            patient_name: request.patient_name,
            blood_group: request.blood_group.label().to_string(),
            units_required: request.units_required,
            required_by: request.required_by.to_rfc3339(),
            status: request.status.label().to_string(),
            city: request.city,
            created_at: request.created_at.to_rfc3339(),
        }
    }
}

/// FFI-safe table row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRequestRow {
    pub rtid: String,
    pub patient_name: String,
    pub blood_group: String,
    pub units_required: u32,
    pub required_date: String,
    pub required_time: String,
    pub status: String,
    pub status_icon: String,
    pub status_class: String,
    pub payload: String,
}

impl From<RequestRow> for FfiRequestRow {
    fn from(row: RequestRow) -> Self {
        Self {
            rtid: row.rtid,
            patient_name: row.patient_name,
            blood_group: row.blood_group,
            units_required: row.units_required,
            required_date: row.required_date,
            required_time: row.required_time,
            status: row.status.label().to_string(),
            status_icon: row.status_icon,
            status_class: row.status_class,
            payload: row.payload,
        }
    }
}

/// FFI-safe KPI counters.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiKpiSummary {
    pub total_requests: u32,
    pub active_requests: u32,
    pub total_units: u32,
    pub donations_received: u32,
    pub requests_redeemed: u32,
}

impl From<KpiSummary> for FfiKpiSummary {
    fn from(kpis: KpiSummary) -> Self {
        Self {
            total_requests: kpis.total_requests,
            active_requests: kpis.active_requests,
            total_units: kpis.total_units,
            donations_received: kpis.donations_received,
            requests_redeemed: kpis.requests_redeemed,
        }
    }
}

/// FFI-safe notification.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNotification {
    pub id: String,
    pub message: String,
    pub time: String,
    pub kind: String,
}

impl From<Notification> for FfiNotification {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            message: notification.message,
            time: notification.time,
            kind: notification.kind.label().to_string(),
        }
    }
}
