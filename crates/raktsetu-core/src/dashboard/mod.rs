//! Dashboard actions: store operations wired to the host's prompter,
//! clipboard and notifier.
//!
//! Destructive actions (delete, reset) only touch the store after the
//! prompter answers `true`. The store lock is never held while a
//! collaborator runs, so a host callback may read the dashboard back.

mod collaborators;

pub use collaborators::*;

use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{debug, warn};

use crate::codec::encode_payload;
use crate::models::BloodRequest;
use crate::store::{NewRequest, RequestStore, StoreError};

/// Dashboard errors.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Request store lock poisoned")]
    LockPoisoned,
}

impl<T> From<PoisonError<T>> for DashboardError {
    fn from(_: PoisonError<T>) -> Self {
        DashboardError::LockPoisoned
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;

/// The dashboard page's behaviour, minus the rendering.
pub struct Dashboard<P, C, N> {
    store: Mutex<RequestStore>,
    prompter: P,
    clipboard: C,
    notifier: N,
}

impl<P: Prompter, C: Clipboard, N: Notifier> Dashboard<P, C, N> {
    pub fn new(store: RequestStore, prompter: P, clipboard: C, notifier: N) -> Self {
        Self {
            store: Mutex::new(store),
            prompter,
            clipboard,
            notifier,
        }
    }

    /// Lock the underlying store for reading.
    ///
    /// Drop the guard before calling back into the dashboard.
    pub fn store(&self) -> DashboardResult<MutexGuard<'_, RequestStore>> {
        Ok(self.store.lock()?)
    }

    /// Create a request and announce its RTID.
    pub fn create_request(&self, input: &NewRequest) -> DashboardResult<BloodRequest> {
        let request = self.store()?.create(input)?;
        self.notifier.notify(Toast::new(
            "Request Created",
            format!("{} has been generated successfully.", request.rtid),
        ));
        Ok(request)
    }

    /// Copy an RTID to the clipboard.
    ///
    /// Failure is logged and reported as `false`; only success is announced.
    pub fn copy_rtid(&self, rtid: &str) -> bool {
        match self.clipboard.write_text(rtid) {
            Ok(()) => {
                self.notifier
                    .notify(Toast::new("Copied!", format!("{rtid} copied to clipboard")));
                true
            }
            Err(e) => {
                warn!(%rtid, error = %e, "failed to copy RTID");
                false
            }
        }
    }

    /// Delete a request after confirmation.
    ///
    /// Returns `true` only if the operator confirmed and a request was removed.
    pub fn delete_request(&self, rtid: &str) -> DashboardResult<bool> {
        if !self.prompter.confirm(&ConfirmPrompt::delete_request(rtid)) {
            debug!(%rtid, "delete declined");
            return Ok(false);
        }
        let removed = self.store()?.delete(rtid);
        if removed {
            self.notifier
                .notify(Toast::new("Deleted!", format!("{rtid} has been removed.")));
        }
        Ok(removed)
    }

    /// Restore the seed data after confirmation.
    pub fn reset_data(&self) -> DashboardResult<bool> {
        if !self.prompter.confirm(&ConfirmPrompt::reset_data()) {
            debug!("reset declined");
            return Ok(false);
        }
        self.store()?.reset();
        self.notifier
            .notify(Toast::new("Data Reset", "Mock data has been restored."));
        Ok(true)
    }

    /// Confirm and acknowledge a logout. There is no session to end.
    pub fn logout(&self) -> bool {
        if !self.prompter.confirm(&ConfirmPrompt::logout()) {
            return false;
        }
        self.notifier.notify(Toast::new(
            "Logged Out",
            "You have been successfully logged out.",
        ));
        true
    }

    /// QR payload for the request with `rtid`, if it exists.
    pub fn qr_payload(&self, rtid: &str) -> DashboardResult<Option<String>> {
        Ok(self.store()?.get(rtid).map(encode_payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use std::cell::RefCell;

    struct FixedPrompter {
        answer: bool,
        asked: RefCell<Vec<ConfirmAction>>,
    }

    impl FixedPrompter {
        fn new(answer: bool) -> Self {
            Self {
                answer,
                asked: RefCell::new(Vec::new()),
            }
        }
    }

    impl Prompter for FixedPrompter {
        fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
            self.asked.borrow_mut().push(prompt.action);
            self.answer
        }
    }

    struct FakeClipboard {
        fail: bool,
        written: RefCell<Vec<String>>,
    }

    impl Clipboard for FakeClipboard {
        fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError("permission denied".into()));
            }
            self.written.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        toasts: RefCell<Vec<Toast>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, toast: Toast) {
            self.toasts.borrow_mut().push(toast);
        }
    }

    type TestDashboard = Dashboard<FixedPrompter, FakeClipboard, RecordingNotifier>;

    fn make_dashboard(confirm: bool, clipboard_fails: bool) -> TestDashboard {
        Dashboard::new(
            RequestStore::new(DashboardConfig::default()).unwrap(),
            FixedPrompter::new(confirm),
            FakeClipboard {
                fail: clipboard_fails,
                written: RefCell::new(Vec::new()),
            },
            RecordingNotifier::default(),
        )
    }

    fn make_input() -> NewRequest {
        NewRequest {
            patient_name: "Kiran Rao".into(),
            blood_group: "B-".into(),
            units_required: "2".into(),
            required_by_date: "2025-12-01".into(),
            required_by_time: "09:30".into(),
        }
    }

    #[test]
    fn test_create_announces_rtid() {
        let dashboard = make_dashboard(true, false);
        let request = dashboard.create_request(&make_input()).unwrap();

        let toasts = dashboard.notifier.toasts.borrow();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].title, "Request Created");
        assert!(toasts[0].description.starts_with(&request.rtid));
    }

    #[test]
    fn test_failed_create_is_silent() {
        let dashboard = make_dashboard(true, false);
        let input = NewRequest {
            units_required: "many".into(),
            ..make_input()
        };
        assert!(dashboard.create_request(&input).is_err());
        assert!(dashboard.notifier.toasts.borrow().is_empty());
    }

    #[test]
    fn test_copy_success() {
        let dashboard = make_dashboard(true, false);
        assert!(dashboard.copy_rtid("RTID 1113 001A"));
        assert_eq!(*dashboard.clipboard.written.borrow(), vec!["RTID 1113 001A"]);
        assert_eq!(dashboard.notifier.toasts.borrow()[0].title, "Copied!");
    }

    #[test]
    fn test_copy_failure_returns_false_without_toast() {
        let dashboard = make_dashboard(true, true);
        assert!(!dashboard.copy_rtid("RTID 1113 001A"));
        assert!(dashboard.notifier.toasts.borrow().is_empty());
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let dashboard = make_dashboard(false, false);
        assert!(!dashboard.delete_request("RTID 1113 001A").unwrap());
        assert_eq!(dashboard.store().unwrap().requests().len(), 5);
        assert_eq!(
            *dashboard.prompter.asked.borrow(),
            vec![ConfirmAction::DeleteRequest]
        );
    }

    #[test]
    fn test_confirmed_delete() {
        let dashboard = make_dashboard(true, false);
        assert!(dashboard.delete_request("RTID 1113 001A").unwrap());
        assert_eq!(dashboard.store().unwrap().requests().len(), 4);
        assert_eq!(dashboard.notifier.toasts.borrow()[0].title, "Deleted!");
    }

    #[test]
    fn test_confirmed_delete_of_unknown_rtid() {
        let dashboard = make_dashboard(true, false);
        assert!(!dashboard.delete_request("RTID 9999 9999Z").unwrap());
        assert_eq!(dashboard.store().unwrap().requests().len(), 5);
        assert!(dashboard.notifier.toasts.borrow().is_empty());
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let dashboard = make_dashboard(false, false);
        dashboard.store().unwrap().delete("RTID 1113 001A");
        assert!(!dashboard.reset_data().unwrap());
        assert_eq!(dashboard.store().unwrap().requests().len(), 4);
    }

    #[test]
    fn test_confirmed_reset() {
        let dashboard = make_dashboard(true, false);
        dashboard.create_request(&make_input()).unwrap();
        assert!(dashboard.reset_data().unwrap());
        assert_eq!(dashboard.store().unwrap().requests().len(), 5);
        assert_eq!(dashboard.notifier.toasts.borrow()[1].title, "Data Reset");
    }

    #[test]
    fn test_logout() {
        assert!(make_dashboard(true, false).logout());
        assert!(!make_dashboard(false, false).logout());
    }

    #[test]
    fn test_qr_payload() {
        let dashboard = make_dashboard(true, false);
        assert_eq!(
            dashboard.qr_payload("RTID 1110 002B").unwrap().as_deref(),
            Some("RTID 1110 002B|O+|1|Delhi|20251115T0830")
        );
        assert!(dashboard.qr_payload("missing").unwrap().is_none());
    }
}
