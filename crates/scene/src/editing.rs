use foundation::geo::LonLat;

use crate::store::ZoneStore;
use crate::zone::ZoneError;

/// Who may edit right now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditingState {
    #[default]
    Idle,
    /// `draft` is the current text of the name input.
    Editing { name: String, draft: String },
}

impl EditingState {
    pub fn editing_name(&self) -> Option<&str> {
        match self {
            EditingState::Idle => None,
            EditingState::Editing { name, .. } => Some(name),
        }
    }

    pub fn is_editing(&self, zone: &str) -> bool {
        self.editing_name() == Some(zone)
    }

    pub fn draft(&self) -> Option<&str> {
        match self {
            EditingState::Idle => None,
            EditingState::Editing { draft, .. } => Some(draft),
        }
    }
}

/// Map-side effects of editing transitions.
///
/// Implemented by the map layer sync; zones are addressed by name.
pub trait EditSurface {
    /// Whether `name` has rendered geometry that can take edit handles.
    fn is_rendered(&self, name: &str) -> bool;
    /// Locks every rendered zone.
    fn disable_all_editing(&mut self);
    fn enable_editing(&mut self, name: &str);
    fn focus(&mut self, name: &str);
    /// Current (possibly dragged) ring of `name`.
    fn read_vertices(&self, name: &str) -> Option<Vec<LonLat>>;
    fn restore_vertices(&mut self, name: &str, vertices: &[LonLat]);
    fn relabel(&mut self, old_name: &str, new_name: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Opened { name: String },
    Committed { old_name: String, new_name: String },
    Cancelled { name: String },
}

/// Single-zone editing state machine.
///
/// At most one zone is in `Editing` at any time. Switching zones always goes
/// through a save of the open one, so a conflicting draft keeps its session.
#[derive(Debug, Default)]
pub struct EditingCoordinator {
    state: EditingState,
}

impl EditingCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditingState {
        &self.state
    }

    /// Opens `name` for editing.
    ///
    /// If another zone is open its save path runs first; when that save fails
    /// the error is returned and the other zone stays open.
    ///
    /// A stored zone with no rendered geometry is refused as `NotFound`
    /// before any session changes.
    pub fn begin(
        &mut self,
        name: &str,
        store: &mut ZoneStore,
        surface: &mut impl EditSurface,
    ) -> Result<Vec<Transition>, ZoneError> {
        if !store.contains(name) || !surface.is_rendered(name) {
            return Err(ZoneError::NotFound {
                name: name.to_string(),
            });
        }
        if self.state.is_editing(name) {
            return Ok(Vec::new());
        }

        let mut transitions = Vec::new();
        if let Some(current) = self.state.editing_name().map(str::to_string) {
            transitions.push(self.save(&current, store, surface)?);
        }

        surface.disable_all_editing();
        surface.enable_editing(name);
        surface.focus(name);
        self.state = EditingState::Editing {
            name: name.to_string(),
            draft: name.to_string(),
        };
        transitions.push(Transition::Opened {
            name: name.to_string(),
        });
        Ok(transitions)
    }

    pub fn set_draft(&mut self, name: &str, text: impl Into<String>) -> Result<(), ZoneError> {
        match &mut self.state {
            EditingState::Editing { name: open, draft } if open == name => {
                *draft = text.into();
                Ok(())
            }
            _ => Err(ZoneError::NotEditing {
                name: name.to_string(),
            }),
        }
    }

    /// Commits the draft name and the surface geometry of `name`.
    ///
    /// On any error other than a vanished zone the session stays open.
    pub fn save(
        &mut self,
        name: &str,
        store: &mut ZoneStore,
        surface: &mut impl EditSurface,
    ) -> Result<Transition, ZoneError> {
        let draft = match &self.state {
            EditingState::Editing { name: open, draft } if open == name => draft.clone(),
            _ => {
                return Err(ZoneError::NotEditing {
                    name: name.to_string(),
                });
            }
        };

        let Some(stored) = store.get(name) else {
            // The zone went away underneath the session.
            self.state = EditingState::Idle;
            surface.disable_all_editing();
            return Err(ZoneError::NotFound {
                name: name.to_string(),
            });
        };
        let vertices = surface
            .read_vertices(name)
            .unwrap_or_else(|| stored.vertices().to_vec());

        store.commit_edit(name, &draft, vertices)?;

        if draft != name {
            surface.relabel(name, &draft);
        }
        surface.disable_all_editing();
        self.state = EditingState::Idle;
        Ok(Transition::Committed {
            old_name: name.to_string(),
            new_name: draft,
        })
    }

    /// Drops the open edit and puts the stored geometry back on the map.
    pub fn cancel(
        &mut self,
        store: &ZoneStore,
        surface: &mut impl EditSurface,
    ) -> Option<Transition> {
        let name = self.state.editing_name()?.to_string();
        if let Some(zone) = store.get(&name) {
            surface.restore_vertices(&name, zone.vertices());
        }
        surface.disable_all_editing();
        self.state = EditingState::Idle;
        Some(Transition::Cancelled { name })
    }

    /// Closes the session if it belongs to a zone that was deleted.
    pub fn forget(&mut self, name: &str) -> bool {
        if self.state.is_editing(name) {
            self.state = EditingState::Idle;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.state = EditingState::Idle;
    }
}
