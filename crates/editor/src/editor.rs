use std::time::Instant;

use formats::{decode_report, encode_string};
use foundation::geo::LonLat;
use foundation::handles::Handle;
use layers::{MapSurface, ZoneLayer, ZoneListEntry, ZoneListView};
use runtime::{EventBus, IndicatorState, Revision, StatusIndicator};
use scene::{EditingCoordinator, EditingState, Transition, ZoneMatch, ZoneStore};
use tracing::{debug, info, warn};

use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::transport::{TransportError, ZonesTransport};

const MAP_LAYER_ID: u64 = 1;
const LIST_LAYER_ID: u64 = 2;

/// Issued by `begin_import`; only the latest ticket may complete.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ImportTicket(u64);

/// Issued by `begin_save`; only the latest ticket may complete.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SaveTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<T> {
    Applied(T),
    /// A newer request of the same kind was issued; nothing changed.
    Superseded,
}

/// Owner of all zone editing state.
///
/// Every handler runs to completion and leaves the store, the session and
/// both views consistent. The list view and the bulk load prompt are
/// re-derived after each handler that changes anything.
pub struct ZoneEditor<M> {
    config: EditorConfig,
    store: ZoneStore,
    coordinator: EditingCoordinator,
    layer: ZoneLayer<M>,
    list: ZoneListView,
    events: EventBus,
    revision: Revision,
    prompt_visible: bool,
    indicator: StatusIndicator,
    next_ticket: u64,
    pending_import: Option<u64>,
    pending_save: Option<u64>,
}

impl<M: MapSurface> ZoneEditor<M> {
    pub fn new(map: M, config: EditorConfig) -> Self {
        let mut layer = ZoneLayer::new(MAP_LAYER_ID, map);
        layer.map_mut().set_view(config.initial_center, config.zoom);
        let mut editor = Self {
            indicator: StatusIndicator::new(config.indicator_clear_after),
            config,
            store: ZoneStore::new(),
            coordinator: EditingCoordinator::new(),
            layer,
            list: ZoneListView::new(LIST_LAYER_ID),
            events: EventBus::new(),
            revision: Revision::default(),
            prompt_visible: true,
            next_ticket: 0,
            pending_import: None,
            pending_save: None,
        };
        editor.sync();
        editor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &ZoneStore {
        &self.store
    }

    /// The stored zone a GPS fix falls in, widened by its accuracy in meters.
    pub fn zone_at(&self, point: LonLat, accuracy_m: f64) -> Option<ZoneMatch> {
        self.store.zone_at(point, accuracy_m)
    }

    pub fn editing(&self) -> &EditingState {
        self.coordinator.state()
    }

    pub fn layer(&self) -> &ZoneLayer<M> {
        &self.layer
    }

    pub fn map(&self) -> &M {
        self.layer.map()
    }

    /// Direct access for gestures owned by the drawing toolkit (vertex drags).
    pub fn map_mut(&mut self) -> &mut M {
        self.layer.map_mut()
    }

    pub fn list_entries(&self) -> &[ZoneListEntry] {
        self.list.entries()
    }

    pub fn list_view(&self) -> &ZoneListView {
        &self.list
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// The "load bulk json" affordance; shown exactly when there are no zones.
    pub fn prompt_visible(&self) -> bool {
        self.prompt_visible
    }

    pub fn indicator(&self, now: Instant) -> IndicatorState {
        self.indicator.state_at(now)
    }

    /// Replaces the collection with a fetched zones document.
    pub fn load_document(&mut self, document: &str) -> Result<usize, EditorError> {
        self.replace_from_document(document, "load")
    }

    pub fn draw_created(&mut self, ring: Vec<LonLat>) -> Result<String, EditorError> {
        let name = self
            .layer
            .on_draw_created(&mut self.store, ring)
            .map_err(|e| self.fail("draw", e.into()))?;
        self.sync();
        info!(zone = %name, "zone drawn");
        self.emit("draw", name.clone());
        Ok(name)
    }

    /// Removes the zones behind the deleted polygons.
    ///
    /// Unknown handles are stale and skipped with a warning. Returns the names
    /// that were removed.
    pub fn delete_drawn(&mut self, handles: &[Handle]) -> Vec<String> {
        let mut removed = Vec::new();
        for &handle in handles {
            match self.layer.on_deleted(&mut self.store, handle) {
                Ok(zone) => {
                    if self.coordinator.forget(zone.name()) {
                        debug!(zone = %zone.name(), "closed edit session of deleted zone");
                    }
                    removed.push(zone.name().to_string());
                }
                Err(err) => {
                    self.fail("delete", err.into());
                }
            }
        }
        if !removed.is_empty() {
            self.sync();
            info!(zones = ?removed, "zones deleted");
            self.emit("delete", removed.join(", "));
        }
        removed
    }

    /// Opens `name` for editing, saving any other open zone first.
    pub fn begin_edit(&mut self, name: &str) -> Result<(), EditorError> {
        let transitions = self
            .coordinator
            .begin(name, &mut self.store, &mut self.layer)
            .map_err(|e| self.fail("edit", e.into()))?;
        if transitions.is_empty() {
            return Ok(());
        }
        self.sync();
        self.record(&transitions);
        Ok(())
    }

    pub fn set_draft(&mut self, name: &str, text: &str) -> Result<(), EditorError> {
        self.coordinator
            .set_draft(name, text)
            .map_err(|e| self.fail("draft", e.into()))?;
        self.sync();
        Ok(())
    }

    /// Commits the open edit of `name`; returns the zone's name afterwards.
    pub fn save_edit(&mut self, name: &str) -> Result<String, EditorError> {
        match self.coordinator.save(name, &mut self.store, &mut self.layer) {
            Ok(transition) => {
                let new_name = match &transition {
                    Transition::Committed { new_name, .. } => new_name.clone(),
                    _ => name.to_string(),
                };
                self.sync();
                self.record(std::slice::from_ref(&transition));
                Ok(new_name)
            }
            Err(err) => {
                // A vanished zone also closes the session.
                self.sync();
                Err(self.fail("save_edit", err.into()))
            }
        }
    }

    pub fn cancel_edit(&mut self) -> bool {
        let Some(transition) = self.coordinator.cancel(&self.store, &mut self.layer) else {
            return false;
        };
        self.sync();
        self.record(std::slice::from_ref(&transition));
        true
    }

    /// Starts a bulk import; the file read completes through `finish_import`.
    pub fn begin_import(&mut self) -> ImportTicket {
        let ticket = self.issue_ticket();
        self.pending_import = Some(ticket);
        debug!(ticket, "import started");
        ImportTicket(ticket)
    }

    /// Applies the contents of an imported file.
    ///
    /// A parse failure aborts with the collection untouched.
    pub fn finish_import(
        &mut self,
        ticket: ImportTicket,
        contents: &str,
    ) -> Result<Completion<usize>, EditorError> {
        if self.pending_import != Some(ticket.0) {
            warn!(ticket = ticket.0, "dropping superseded import");
            return Ok(Completion::Superseded);
        }
        self.pending_import = None;
        self.replace_from_document(contents, "import")
            .map(Completion::Applied)
    }

    /// Serializes the collection for a save request.
    pub fn begin_save(&mut self) -> Result<(SaveTicket, String), EditorError> {
        let document =
            encode_string(self.store.list()).map_err(|e| self.fail("save", e.into()))?;
        let ticket = self.issue_ticket();
        self.pending_save = Some(ticket);
        debug!(ticket, zones = self.store.len(), "save started");
        Ok((SaveTicket(ticket), document))
    }

    /// Reports the transport result on the status indicator.
    ///
    /// Only the most recent save may touch the indicator; there is no retry.
    pub fn finish_save(
        &mut self,
        ticket: SaveTicket,
        result: Result<(), TransportError>,
        now: Instant,
    ) -> Result<Completion<()>, EditorError> {
        if self.pending_save != Some(ticket.0) {
            warn!(ticket = ticket.0, "dropping superseded save result");
            return Ok(Completion::Superseded);
        }
        self.pending_save = None;
        match result {
            Ok(()) => {
                self.indicator.show(IndicatorState::Success, now);
                info!(zones = self.store.len(), "zones saved");
                self.emit("save", "ok");
                Ok(Completion::Applied(()))
            }
            Err(err) => {
                self.indicator.show(IndicatorState::Error, now);
                Err(self.fail("save", err.into()))
            }
        }
    }

    pub async fn fetch_initial<T>(&mut self, transport: &T) -> Result<usize, EditorError>
    where
        T: ZonesTransport + ?Sized,
    {
        let document = match transport.fetch().await {
            Ok(document) => document,
            Err(err) => return Err(self.fail("load", err.into())),
        };
        self.load_document(&document)
    }

    pub async fn persist<T>(&mut self, transport: &T) -> Result<(), EditorError>
    where
        T: ZonesTransport + ?Sized,
    {
        let (ticket, document) = self.begin_save()?;
        let result = transport.save(document).await;
        self.finish_save(ticket, result, Instant::now()).map(|_| ())
    }

    /// Back to the freshly constructed state. Outstanding tickets become stale.
    pub fn reset(&mut self) {
        self.store.clear();
        self.coordinator.reset();
        self.layer.reset();
        self.list.reset();
        let dropped = self.events.drain();
        debug!(events = dropped.len(), "editor reset");
        self.revision = Revision::default();
        self.indicator.reset();
        self.pending_import = None;
        self.pending_save = None;
        let (center, zoom) = (self.config.initial_center, self.config.zoom);
        self.layer.map_mut().set_view(center, zoom);
        self.sync();
    }

    fn replace_from_document(
        &mut self,
        document: &str,
        action: &'static str,
    ) -> Result<usize, EditorError> {
        let report = decode_report(document).map_err(|e| self.fail(action, e.into()))?;
        for skipped in &report.skipped {
            debug!(
                index = skipped.index,
                geometry = %skipped.geometry_type,
                "skipping non-polygon feature"
            );
        }
        let count = report.zones.len();
        self.layer
            .import(&mut self.store, report.zones)
            .map_err(|e| self.fail(action, e.into()))?;
        self.coordinator.reset();
        if let Some(bounds) = self.store.bounds() {
            let zoom = self.config.zoom;
            self.layer.map_mut().set_view(bounds.center(), zoom);
        }
        self.sync();
        info!(zones = count, skipped = report.skipped.len(), "{action} replaced zones");
        self.emit(action, format!("{count} zones"));
        Ok(count)
    }

    fn record(&mut self, transitions: &[Transition]) {
        for transition in transitions {
            match transition {
                Transition::Opened { name } => {
                    info!(zone = %name, "editing zone");
                    self.emit("edit_open", name.clone());
                }
                Transition::Committed { old_name, new_name } => {
                    info!(from = %old_name, to = %new_name, "zone edit committed");
                    self.emit("edit_commit", format!("{old_name} -> {new_name}"));
                }
                Transition::Cancelled { name } => {
                    info!(zone = %name, "zone edit cancelled");
                    self.emit("edit_cancel", name.clone());
                }
            }
        }
    }

    fn fail(&mut self, action: &'static str, err: EditorError) -> EditorError {
        if err.is_stale() {
            warn!(action, error = %err, "ignoring stale zone reference");
        } else {
            warn!(action, kind = err.kind(), error = %err, "action rejected");
        }
        self.emit("error", format!("{action}: {err}"));
        err
    }

    fn sync(&mut self) {
        self.revision = self.revision.next();
        self.list.sync(&self.store, self.coordinator.state());
        let empty = self.store.is_empty();
        if empty != self.prompt_visible {
            debug!(visible = empty, "bulk load prompt toggled");
            self.prompt_visible = empty;
        }
    }

    fn issue_ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    fn emit(&mut self, kind: &'static str, message: impl Into<String>) {
        self.events.emit(self.revision, kind, message);
    }
}

#[cfg(test)]
mod tests {
    use super::{Completion, ZoneEditor};
    use crate::config::EditorConfig;
    use crate::error::EditorError;
    use crate::transport::{MemoryTransport, TransportError};
    use foundation::geo::LonLat;
    use layers::{InMemoryMap, MapSurface};
    use pretty_assertions::assert_eq;
    use runtime::IndicatorState;
    use std::time::{Duration, Instant};

    const HOME: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"name":"Home"},
         "geometry":{"type":"Polygon","coordinates":[[[0,0],[0,1],[1,1],[1,0],[0,0]]]}}
    ]}"#;

    const NAMELESS: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"name":"Ok"},
         "geometry":{"type":"Polygon","coordinates":[[[0,0],[0,1],[1,1],[0,0]]]}},
        {"type":"Feature","properties":{},
         "geometry":{"type":"Polygon","coordinates":[[[5,5],[5,6],[6,6],[5,5]]]}}
    ]}"#;

    fn square(offset: f64) -> Vec<LonLat> {
        vec![
            LonLat::new(offset, 0.0),
            LonLat::new(offset + 1.0, 0.0),
            LonLat::new(offset + 1.0, 1.0),
            LonLat::new(offset, 1.0),
        ]
    }

    fn editor() -> ZoneEditor<InMemoryMap> {
        ZoneEditor::new(InMemoryMap::new(), EditorConfig::default())
    }

    fn names(editor: &ZoneEditor<InMemoryMap>) -> Vec<String> {
        editor
            .list_entries()
            .iter()
            .map(|e| e.name.clone())
            .collect()
    }

    fn editing_count(editor: &ZoneEditor<InMemoryMap>) -> usize {
        editor.list_entries().iter().filter(|e| e.is_editing).count()
    }

    #[test]
    fn three_draws_are_auto_named_in_order() {
        let mut editor = editor();
        for i in 0..3 {
            editor.draw_created(square(i as f64 * 2.0)).expect("draw");
        }
        assert_eq!(names(&editor), vec!["Zone 1", "Zone 2", "Zone 3"]);
        assert_eq!(editor.map().labels(), vec!["Zone 1", "Zone 2", "Zone 3"]);
    }

    #[test]
    fn prompt_tracks_empty_collection() {
        let mut editor = editor();
        assert!(editor.prompt_visible());

        editor.draw_created(square(0.0)).expect("draw");
        assert!(!editor.prompt_visible());

        let h = editor.layer().handle_for("Zone 1").expect("handle");
        assert_eq!(editor.delete_drawn(&[h]), vec!["Zone 1".to_string()]);
        assert!(editor.prompt_visible());
        assert!(editor.list_entries().is_empty());
    }

    #[test]
    fn failed_draw_keeps_prompt() {
        let mut editor = editor();
        let err = editor
            .draw_created(square(0.0)[..2].to_vec())
            .expect_err("short ring");
        assert_eq!(err.kind(), "format");
        assert!(editor.prompt_visible());
        assert_eq!(editor.events().last().map(|e| e.kind), Some("error"));
    }

    #[test]
    fn switching_edits_commits_the_open_zone() {
        let mut editor = editor();
        editor.draw_created(square(0.0)).expect("draw");
        editor.draw_created(square(2.0)).expect("draw");

        editor.begin_edit("Zone 1").expect("edit 1");
        editor.set_draft("Zone 1", "Home").expect("draft");
        assert_eq!(editing_count(&editor), 1);

        editor.begin_edit("Zone 2").expect("edit 2");
        assert_eq!(editing_count(&editor), 1);
        assert_eq!(editor.editing().editing_name(), Some("Zone 2"));
        assert_eq!(names(&editor), vec!["Home", "Zone 2"]);
        assert_eq!(editor.map().editable_labels(), vec!["Zone 2"]);
        assert_eq!(
            editor.events().kinds()[2..].to_vec(),
            vec!["edit_open", "edit_commit", "edit_open"]
        );
    }

    #[test]
    fn rename_conflict_keeps_session_and_zones() {
        let mut editor = editor();
        editor.draw_created(square(0.0)).expect("draw");
        editor.draw_created(square(2.0)).expect("draw");
        let before = editor.store().clone();

        editor.begin_edit("Zone 1").expect("edit");
        editor.set_draft("Zone 1", "Zone 2").expect("draft");
        let err = editor.save_edit("Zone 1").expect_err("conflict");
        assert!(matches!(err, EditorError::Conflict { ref name } if name == "Zone 2"));

        assert_eq!(editor.store(), &before);
        assert_eq!(editor.editing().editing_name(), Some("Zone 1"));
        let entry = editor.list_view().editing_entry().expect("open entry");
        assert_eq!(entry.name, "Zone 1");
        assert_eq!(entry.draft.as_deref(), Some("Zone 2"));

        // Switching away replays the save and is refused the same way.
        let err = editor.begin_edit("Zone 2").expect_err("blocked switch");
        assert_eq!(err.kind(), "conflict");
        assert_eq!(editor.editing().editing_name(), Some("Zone 1"));
    }

    #[test]
    fn dragged_vertices_are_committed_and_persisted() {
        let mut editor = editor();
        editor.draw_created(square(0.0)).expect("draw");
        editor.begin_edit("Zone 1").expect("edit");

        let h = editor.layer().handle_for("Zone 1").expect("handle");
        assert!(editor.map_mut().drag_vertex(h, 0, LonLat::new(-1.0, -1.0)));
        assert_eq!(editor.save_edit("Zone 1").expect("save"), "Zone 1");

        let (_, document) = editor.begin_save().expect("encode");
        let zones = formats::decode(&document).expect("decode");
        assert_eq!(zones[0].vertices()[0], LonLat::new(-1.0, -1.0));
    }

    #[test]
    fn cancel_restores_stored_geometry() {
        let mut editor = editor();
        editor.draw_created(square(0.0)).expect("draw");
        editor.begin_edit("Zone 1").expect("edit");
        let h = editor.layer().handle_for("Zone 1").expect("handle");
        editor.map_mut().drag_vertex(h, 1, LonLat::new(9.0, 9.0));

        assert!(editor.cancel_edit());
        assert_eq!(editor.map().polygon(h).expect("poly").ring, square(0.0));
        assert_eq!(editing_count(&editor), 0);
        assert!(!editor.cancel_edit());
    }

    #[test]
    fn deleting_the_edited_zone_closes_the_session() {
        let mut editor = editor();
        editor.draw_created(square(0.0)).expect("draw");
        editor.begin_edit("Zone 1").expect("edit");
        let h = editor.layer().handle_for("Zone 1").expect("handle");
        editor.delete_drawn(&[h]);
        assert!(editor.editing().editing_name().is_none());

        let err = editor.save_edit("Zone 1").expect_err("closed");
        assert!(err.is_stale());
    }

    #[test]
    fn stale_handles_are_ignored() {
        let mut editor = editor();
        editor.draw_created(square(0.0)).expect("draw");
        let h = editor.layer().handle_for("Zone 1").expect("handle");
        editor.delete_drawn(&[h]);
        let revision = editor.revision();

        assert!(editor.delete_drawn(&[h]).is_empty());
        assert_eq!(editor.revision(), revision);
        assert_eq!(editor.events().last().map(|e| e.kind), Some("error"));
    }

    #[test]
    fn import_with_a_nameless_feature_changes_nothing() {
        let mut editor = editor();
        editor.draw_created(square(0.0)).expect("draw");
        let before = editor.store().clone();

        let ticket = editor.begin_import();
        let err = editor.finish_import(ticket, NAMELESS).expect_err("nameless");
        assert_eq!(err.kind(), "format");
        assert_eq!(editor.store(), &before);
        assert_eq!(editor.map().labels(), vec!["Zone 1"]);
    }

    #[test]
    fn superseded_import_is_dropped() {
        let mut editor = editor();
        let first = editor.begin_import();
        let second = editor.begin_import();

        assert_eq!(
            editor.finish_import(first, HOME).expect("stale"),
            Completion::Superseded
        );
        assert!(editor.store().is_empty());

        assert_eq!(
            editor.finish_import(second, HOME).expect("import"),
            Completion::Applied(1)
        );
        assert!(!editor.prompt_visible());
        // A ticket completes once.
        assert_eq!(
            editor.finish_import(second, HOME).expect("repeat"),
            Completion::Superseded
        );
    }

    #[test]
    fn import_replaces_zones_and_centers_view() {
        let mut editor = editor();
        editor.draw_created(square(10.0)).expect("draw");
        editor.begin_edit("Zone 1").expect("edit");

        editor.load_document(HOME).expect("load");
        assert_eq!(names(&editor), vec!["Home"]);
        assert!(editor.editing().editing_name().is_none());
        assert_eq!(editor.map().camera(), Some((LonLat::new(0.5, 0.5), 13)));
        assert_eq!(editor.store().get("Home").expect("home").vertices().len(), 4);
    }

    #[test]
    fn only_the_latest_save_reports() {
        let mut editor = editor();
        editor.draw_created(square(0.0)).expect("draw");
        let now = Instant::now();

        let (first, _) = editor.begin_save().expect("save 1");
        let (second, _) = editor.begin_save().expect("save 2");

        let err = editor
            .finish_save(second, Err(TransportError::with_status("rejected", 500)), now)
            .expect_err("transport");
        assert_eq!(err.kind(), "transport");
        assert_eq!(editor.indicator(now), IndicatorState::Error);

        let late = editor.finish_save(first, Ok(()), now).expect("stale");
        assert_eq!(late, Completion::Superseded);
        assert_eq!(editor.indicator(now), IndicatorState::Error);

        assert_eq!(
            editor.indicator(now + Duration::from_millis(2000)),
            IndicatorState::Idle
        );
    }

    #[test]
    fn zone_at_follows_committed_names() {
        let mut editor = editor();
        editor.draw_created(square(0.0)).expect("draw");
        editor.draw_created(square(2.0)).expect("draw");

        let at = |editor: &ZoneEditor<InMemoryMap>, lon: f64, acc: f64| {
            editor.zone_at(LonLat::new(lon, 0.5), acc).map(|m| m.name)
        };
        assert_eq!(at(&editor, 0.5, 0.0), Some("Zone 1".to_string()));
        assert_eq!(at(&editor, 2.5, 0.0), Some("Zone 2".to_string()));
        assert_eq!(at(&editor, 1.2, 0.0), None);
        assert_eq!(at(&editor, 1.2, 30_000.0), Some("Zone 1".to_string()));

        editor.begin_edit("Zone 2").expect("begin");
        editor.set_draft("Zone 2", "Shed").expect("draft");
        editor.save_edit("Zone 2").expect("save");
        assert_eq!(at(&editor, 2.5, 0.0), Some("Shed".to_string()));
    }

    #[test]
    fn reset_invalidates_pending_requests() {
        let mut editor = editor();
        editor.draw_created(square(0.0)).expect("draw");
        let (ticket, _) = editor.begin_save().expect("save");
        assert!(!editor.events().events().is_empty());
        editor.reset();

        assert!(editor.events().events().is_empty());
        assert!(editor.store().is_empty());
        assert!(editor.prompt_visible());
        assert_eq!(editor.map().polygon_count(), 0);
        assert_eq!(
            editor.finish_save(ticket, Ok(()), Instant::now()).expect("stale"),
            Completion::Superseded
        );
        assert_eq!(editor.draw_created(square(0.0)).expect("draw"), "Zone 1");
    }

    #[tokio::test]
    async fn fetch_and_persist_through_transport() {
        let transport = MemoryTransport::new(HOME);
        let mut editor = editor();
        assert_eq!(editor.fetch_initial(&transport).await.expect("fetch"), 1);

        editor.draw_created(square(5.0)).expect("draw");
        editor.persist(&transport).await.expect("persist");
        assert_eq!(editor.indicator(Instant::now()), IndicatorState::Success);

        let saved = transport.saved();
        assert_eq!(saved.len(), 1);
        let zones = formats::decode(&saved[0]).expect("decode");
        assert_eq!(zones, editor.store().list().to_vec());
    }

    #[tokio::test]
    async fn failed_persist_shows_error() {
        let transport = MemoryTransport::new(HOME);
        transport.set_fail_save(true);
        let mut editor = editor();
        let err = editor.persist(&transport).await.expect_err("fails");
        assert!(matches!(err, EditorError::Transport(_)));
        assert_eq!(editor.indicator(Instant::now()), IndicatorState::Error);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_empty_collection() {
        let transport = MemoryTransport::default();
        let mut editor = editor();
        let err = editor.fetch_initial(&transport).await.expect_err("missing");
        assert_eq!(err.kind(), "transport");
        assert!(editor.prompt_visible());
    }
}
