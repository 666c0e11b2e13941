//! Live roster: a local mirror of the driver collection kept current by the
//! store's feed, plus the search, selection and expand state layered on it.
//!
//! The controller is single-threaded. Feed events queue up in the
//! subscription and are applied only when the owner calls [`RosterController::pump`]
//! (or `wait_for_update`), so all state changes happen on the caller's thread.

use crate::core::bulk::{BulkAction, BulkReport, Outcome};
use crate::errors::AppResult;
use crate::export::text::{ExportedFile, detail_fields, export_record};
use crate::export::FileSink;
use crate::models::{Driver, DriverId, Session};
use crate::store::{Poll, RecordStore, Snapshot, StoreEvent, Subscription};
use std::collections::BTreeSet;
use std::time::Duration;

/// Health of the live feed behind the mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    /// No session, no feed.
    Closed,
    /// Subscribed, first snapshot not received yet.
    Loading,
    Live,
    /// The feed failed; the mirror shows the last snapshot received and may be out of date.
    Stale(String),
}

pub struct RosterController<S: RecordStore> {
    store: S,
    session: Option<Session>,
    subscription: Option<Subscription>,
    status: FeedStatus,
    mirror: Snapshot,
    selection: BTreeSet<DriverId>,
    search: String,
    expanded: Option<DriverId>,
}

impl<S: RecordStore> RosterController<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            session: None,
            subscription: None,
            status: FeedStatus::Closed,
            mirror: Vec::new(),
            selection: BTreeSet::new(),
            search: String::new(),
            expanded: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn status(&self) -> &FeedStatus {
        &self.status
    }

    // ---------------------------
    // Session / subscription
    // ---------------------------

    /// Open the live feed for `session`. Any previous feed is closed first;
    /// calling again with the session that is already live does nothing.
    pub fn on_session_established(&mut self, session: &Session) -> AppResult<()> {
        if self.subscription.is_some() && self.session.as_ref() == Some(session) {
            return Ok(());
        }

        self.close_feed();
        self.reset_view();

        let subscription = self.store.subscribe()?;
        log::debug!("roster subscribed for {}", session.email);

        self.subscription = Some(subscription);
        self.session = Some(session.clone());
        self.status = FeedStatus::Loading;
        Ok(())
    }

    /// Close the feed and drop everything that was only visible to the session.
    pub fn on_session_cleared(&mut self) {
        self.close_feed();
        self.reset_view();
        self.session = None;
        self.status = FeedStatus::Closed;
        log::debug!("roster closed");
    }

    fn close_feed(&mut self) {
        // dropping the subscription stops the feed
        self.subscription = None;
    }

    fn reset_view(&mut self) {
        self.mirror.clear();
        self.selection.clear();
        self.search.clear();
        self.expanded = None;
    }

    /// Apply every queued feed event without blocking.
    /// Returns true when the mirror was replaced.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        loop {
            let polled = match &self.subscription {
                Some(sub) => sub.poll(),
                None => return changed,
            };
            match polled {
                Poll::Empty => return changed,
                other => changed |= self.handle(other),
            }
        }
    }

    /// Block up to `timeout` for the next feed event, then drain the rest.
    /// Returns true when the mirror was replaced.
    pub fn wait_for_update(&mut self, timeout: Duration) -> bool {
        let polled = match &self.subscription {
            Some(sub) => sub.poll_timeout(timeout),
            None => return false,
        };
        let changed = self.handle(polled);
        self.pump() || changed
    }

    fn handle(&mut self, polled: Poll) -> bool {
        match polled {
            Poll::Event(StoreEvent::Snapshot(snapshot)) => {
                self.apply_snapshot(snapshot);
                true
            }
            Poll::Event(StoreEvent::Error(reason)) => {
                log::warn!("live feed error: {reason}");
                self.status = FeedStatus::Stale(reason);
                false
            }
            Poll::Disconnected => {
                log::warn!("live feed disconnected");
                self.subscription = None;
                self.status = FeedStatus::Stale("live feed disconnected".into());
                false
            }
            Poll::Empty => false,
        }
    }

    /// Replace the mirror wholesale and drop view state that points at
    /// records which no longer exist.
    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.mirror = snapshot;
        self.status = FeedStatus::Live;

        let mirror = &self.mirror;
        self.selection
            .retain(|id| mirror.iter().any(|d| &d.id == id));

        let expanded_gone = self
            .expanded
            .as_ref()
            .is_some_and(|id| !self.contains(id));
        if expanded_gone {
            self.expanded = None;
        }
    }

    // ---------------------------
    // Mirror / search
    // ---------------------------

    pub fn mirror(&self) -> &[Driver] {
        &self.mirror
    }

    pub fn get(&self, id: &DriverId) -> Option<&Driver> {
        self.mirror.iter().find(|d| &d.id == id)
    }

    pub fn contains(&self, id: &DriverId) -> bool {
        self.get(id).is_some()
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    /// Mirror records whose full name contains the search term, case-insensitively,
    /// in mirror order.
    pub fn filtered_view(&self) -> Vec<&Driver> {
        self.mirror
            .iter()
            .filter(|d| d.record.matches(&self.search))
            .collect()
    }

    // ---------------------------
    // Selection
    // ---------------------------

    pub fn selection(&self) -> &BTreeSet<DriverId> {
        &self.selection
    }

    pub fn is_selected(&self, id: &DriverId) -> bool {
        self.selection.contains(id)
    }

    /// Flip `id` in the selection. Ids not in the mirror are ignored.
    pub fn toggle_selection(&mut self, id: &DriverId) {
        if !self.contains(id) {
            log::debug!("toggle of unknown id {id} ignored");
            return;
        }
        if !self.selection.remove(id) {
            self.selection.insert(id.clone());
        }
    }

    /// Whether every record in the filtered view is selected.
    pub fn all_visible_selected(&self) -> bool {
        self.filtered_view()
            .iter()
            .all(|d| self.selection.contains(&d.id))
    }

    /// Select exactly the filtered view, or clear the selection when it is
    /// already fully selected.
    pub fn select_all(&mut self) {
        if self.all_visible_selected() {
            self.deselect_all();
        } else {
            self.selection = self
                .filtered_view()
                .into_iter()
                .map(|d| d.id.clone())
                .collect();
        }
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    // ---------------------------
    // Bulk operations
    // ---------------------------

    /// Issue one independent delete per selected id and clear the selection.
    ///
    /// The mirror is *not* touched here; removals show up with the next
    /// snapshot from the feed.
    pub fn delete_selected(&mut self) -> BulkReport {
        let mut report = BulkReport::new(BulkAction::Delete);
        let selected = std::mem::take(&mut self.selection);

        for id in selected {
            let outcome = match self.store.delete(&id) {
                Ok(()) if self.contains(&id) => Outcome::Deleted,
                Ok(()) => Outcome::Missing,
                Err(e) => {
                    log::warn!("delete of {id} failed: {e}");
                    Outcome::Failed(e.to_string())
                }
            };
            report.push(id, outcome);
        }

        report
    }

    /// Render the text sheet for one record, if it is in the mirror.
    pub fn export(&self, id: &DriverId) -> Option<ExportedFile> {
        self.get(id).map(|d| export_record(&d.record))
    }

    /// Render and save one record.
    pub fn export_to(&self, id: &DriverId, sink: &mut dyn FileSink) -> Outcome {
        let Some(file) = self.export(id) else {
            return Outcome::Missing;
        };
        match sink.save(&file) {
            Ok(path) => Outcome::Exported(path),
            Err(e) => {
                log::warn!("export of {id} failed: {e}");
                Outcome::Failed(e.to_string())
            }
        }
    }

    /// Export every selected record, in id order, each independently.
    pub fn export_selected(&self, sink: &mut dyn FileSink) -> BulkReport {
        let mut report = BulkReport::new(BulkAction::Export);
        for id in &self.selection {
            report.push(id.clone(), self.export_to(id, sink));
        }
        report
    }

    // ---------------------------
    // Expand / collapse
    // ---------------------------

    pub fn expanded(&self) -> Option<&DriverId> {
        self.expanded.as_ref()
    }

    pub fn is_expanded(&self, id: &DriverId) -> bool {
        self.expanded.as_ref() == Some(id)
    }

    /// At most one record is expanded; expanding another collapses the first.
    pub fn toggle_expanded(&mut self, id: &DriverId) {
        if self.is_expanded(id) {
            self.expanded = None;
        } else {
            self.expanded = Some(id.clone());
        }
    }

    /// Labelled detail rows for the expanded view of `id`.
    pub fn detail_lines(&self, id: &DriverId) -> Option<Vec<(&'static str, String)>> {
        self.get(id).map(|d| detail_fields(&d.record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::export::ExportedFile;
    use crate::models::DriverRecord;
    use crate::store::MemoryStore;
    use std::path::PathBuf;

    /// Records saved file names; refuses one of them.
    struct RecordingSink {
        refuse: &'static str,
        saved: Vec<String>,
    }

    impl FileSink for RecordingSink {
        fn save(&mut self, file: &ExportedFile) -> AppResult<PathBuf> {
            if file.file_name == self.refuse {
                return Err(AppError::Export("disk full".into()));
            }
            self.saved.push(file.file_name.clone());
            Ok(PathBuf::from("/out").join(&file.file_name))
        }
    }

    fn driver(id: &str, name: &str) -> Driver {
        Driver::new(
            id,
            DriverRecord {
                full_name: name.into(),
                ..Default::default()
            },
        )
    }

    fn session() -> Session {
        Session {
            email: "op@example.com".into(),
            token: "t1".into(),
            created_at: String::new(),
        }
    }

    fn live(store: &MemoryStore) -> RosterController<MemoryStore> {
        let mut c = RosterController::new(store.clone());
        c.on_session_established(&session()).unwrap();
        c.pump();
        c
    }

    fn ids(view: &[&Driver]) -> Vec<String> {
        view.iter().map(|d| d.id.to_string()).collect()
    }

    #[test]
    fn status_moves_from_loading_to_live() {
        let store = MemoryStore::with_records([driver("a", "Anna")]);
        let mut c = RosterController::new(store.clone());
        assert_eq!(c.status(), &FeedStatus::Closed);
        c.on_session_established(&session()).unwrap();
        assert_eq!(c.status(), &FeedStatus::Loading);
        assert!(c.pump());
        assert_eq!(c.status(), &FeedStatus::Live);
        assert_eq!(c.mirror().len(), 1);
    }

    #[test]
    fn re_establishing_keeps_a_single_subscription() {
        let store = MemoryStore::new();
        let mut c = RosterController::new(store.clone());
        c.on_session_established(&session()).unwrap();
        c.on_session_established(&session()).unwrap();
        assert_eq!(store.subscriber_count(), 1);

        let other = Session {
            token: "t2".into(),
            ..session()
        };
        c.on_session_established(&other).unwrap();
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn clearing_session_unsubscribes_and_discards_state() {
        let store = MemoryStore::with_records([driver("a", "Anna")]);
        let mut c = live(&store);
        c.toggle_selection(&"a".into());
        c.toggle_expanded(&"a".into());

        c.on_session_cleared();
        assert_eq!(store.subscriber_count(), 0);
        assert!(c.mirror().is_empty());
        assert!(c.selection().is_empty());
        assert!(c.expanded().is_none());
        assert_eq!(c.status(), &FeedStatus::Closed);
    }

    #[test]
    fn search_filters_by_name_substring() {
        let store = MemoryStore::with_records([
            driver("a", "John Smith"),
            driver("b", "Anna Nowak"),
            driver("c", "Jane SMITHSON"),
        ]);
        let mut c = live(&store);

        c.set_search_term("smith");
        assert_eq!(ids(&c.filtered_view()), ["a", "c"]);

        c.set_search_term("zzz");
        assert!(c.filtered_view().is_empty());

        c.set_search_term("");
        assert_eq!(ids(&c.filtered_view()), ["a", "b", "c"]);
    }

    #[test]
    fn toggle_twice_restores_selection() {
        let store = MemoryStore::with_records([driver("a", "Anna"), driver("b", "Bob")]);
        let mut c = live(&store);
        c.toggle_selection(&"b".into());
        let before = c.selection().clone();

        c.toggle_selection(&"a".into());
        c.toggle_selection(&"a".into());
        assert_eq!(c.selection(), &before);
    }

    #[test]
    fn toggle_of_unknown_id_is_ignored() {
        let store = MemoryStore::with_records([driver("a", "Anna")]);
        let mut c = live(&store);
        c.toggle_selection(&"ghost".into());
        assert!(c.selection().is_empty());
    }

    #[test]
    fn select_all_toggles() {
        let store = MemoryStore::with_records([driver("a", "Anna"), driver("b", "Bob")]);
        let mut c = live(&store);

        c.select_all();
        assert_eq!(c.selection().len(), 2);
        c.select_all();
        assert!(c.selection().is_empty());

        c.select_all();
        c.deselect_all();
        assert!(c.selection().is_empty());
    }

    #[test]
    fn select_all_is_scoped_to_filtered_view() {
        let store = MemoryStore::with_records([driver("a", "Anna"), driver("b", "Bob")]);
        let mut c = live(&store);
        c.set_search_term("bo");
        c.select_all();
        assert_eq!(c.selection().iter().map(|i| i.as_str()).collect::<Vec<_>>(), ["b"]);
    }

    #[test]
    fn delete_selected_clears_selection_even_on_failure() {
        let store = MemoryStore::with_records([driver("a", "Anna"), driver("b", "Bob")]);
        store.fail_deletes_for("a");
        let mut c = live(&store);
        c.select_all();

        let report = c.delete_selected();
        assert!(c.selection().is_empty());
        assert_eq!(report.total(), 2);
        assert_eq!(report.succeeded(), 1);
        assert!(matches!(report.outcome(&"a".into()), Some(Outcome::Failed(_))));
        assert_eq!(report.outcome(&"b".into()), Some(&Outcome::Deleted));
    }

    #[test]
    fn mirror_updates_only_through_the_feed() {
        let store = MemoryStore::with_records([driver("a", "Anna")]);
        let mut c = live(&store);
        c.toggle_selection(&"a".into());
        c.delete_selected();

        assert_eq!(c.mirror().len(), 1);
        assert!(c.pump());
        assert!(c.mirror().is_empty());
    }

    #[test]
    fn externally_removed_record_does_not_block_others() {
        let store = MemoryStore::with_records([driver("a", "Anna"), driver("b", "Bob")]);
        let mut c = live(&store);
        c.select_all();

        // B disappears before the delete runs and before the feed is pumped
        store.remove_externally(&"b".into());
        let report = c.delete_selected();

        assert_eq!(report.outcome(&"a".into()), Some(&Outcome::Deleted));
        assert!(report.is_clean());
        assert_eq!(store.delete_calls().len(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn snapshot_prunes_selection_and_expanded() {
        let store = MemoryStore::with_records([driver("a", "Anna"), driver("b", "Bob")]);
        let mut c = live(&store);
        c.select_all();
        c.toggle_expanded(&"b".into());

        store.remove_externally(&"b".into());
        c.pump();
        assert_eq!(c.selection().len(), 1);
        assert!(c.expanded().is_none());

        // and a now-missing id deletes as a no-op
        let report = c.delete_selected();
        assert_eq!(report.total(), 1);
    }

    #[test]
    fn feed_error_marks_mirror_stale_until_next_snapshot() {
        let store = MemoryStore::with_records([driver("a", "Anna")]);
        let mut c = live(&store);

        store.inject_feed_error("network down");
        c.pump();
        assert_eq!(c.status(), &FeedStatus::Stale("network down".into()));
        assert_eq!(c.mirror().len(), 1);

        store.write(&"b".into(), &driver("b", "Bob").record).unwrap();
        c.pump();
        assert_eq!(c.status(), &FeedStatus::Live);
        assert_eq!(c.mirror().len(), 2);
    }

    #[test]
    fn expand_is_single_slot() {
        let store = MemoryStore::with_records([driver("a", "Anna"), driver("b", "Bob")]);
        let mut c = live(&store);
        let (a, b) = (DriverId::from("a"), DriverId::from("b"));

        c.toggle_expanded(&a);
        c.toggle_expanded(&a);
        assert!(c.expanded().is_none());

        c.toggle_expanded(&a);
        c.toggle_expanded(&b);
        assert!(c.is_expanded(&b));
        assert!(!c.is_expanded(&a));
    }

    #[test]
    fn export_of_unknown_id_is_none() {
        let store = MemoryStore::with_records([driver("a", "Anna Nowak")]);
        let c = live(&store);
        assert!(c.export(&"ghost".into()).is_none());
        let file = c.export(&"a".into()).unwrap();
        assert_eq!(file.file_name, "Anna_Nowak_details.txt");
    }

    #[test]
    fn export_failure_does_not_abort_the_rest() {
        let store = MemoryStore::with_records([
            driver("a", "Anna Nowak"),
            driver("b", "Bob Smith"),
            driver("c", "Cezary Lis"),
        ]);
        let mut c = live(&store);
        c.select_all();

        let mut sink = RecordingSink {
            refuse: "Bob_Smith_details.txt",
            saved: Vec::new(),
        };
        let report = c.export_selected(&mut sink);

        assert_eq!(sink.saved, ["Anna_Nowak_details.txt", "Cezary_Lis_details.txt"]);
        assert_eq!(
            report.outcome(&"a".into()),
            Some(&Outcome::Exported(PathBuf::from("/out/Anna_Nowak_details.txt")))
        );
        assert!(matches!(report.outcome(&"b".into()), Some(Outcome::Failed(r)) if r.contains("disk full")));
        assert!(matches!(report.outcome(&"c".into()), Some(Outcome::Exported(_))));
        assert_eq!(report.to_string(), "Экспортировано 2 из 3");
        assert!(!report.is_clean());
    }

    #[test]
    fn wait_for_update_without_feed_returns_immediately() {
        let mut c = RosterController::new(MemoryStore::new());
        assert!(!c.wait_for_update(Duration::from_secs(10)));
    }
}
