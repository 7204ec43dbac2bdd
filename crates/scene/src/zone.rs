use std::fmt;

use foundation::bounds::Aabb2;
use foundation::geo::{LonLat, distinct_vertex_count, open_ring};

/// Smallest ring the drawing tool can produce.
pub const MIN_VERTICES: usize = 3;

/// A named polygon.
///
/// The ring is stored open: the first vertex is never repeated at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    name: String,
    vertices: Vec<LonLat>,
}

impl Zone {
    pub fn new(name: impl Into<String>, vertices: Vec<LonLat>) -> Result<Self, ZoneError> {
        let name = name.into();
        validate_name(&name)?;
        let vertices = open_ring(vertices);
        validate_vertices(&vertices)?;
        Ok(Self { name, vertices })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[LonLat] {
        &self.vertices
    }

    pub fn bounds(&self) -> Option<Aabb2> {
        Aabb2::from_points(&self.vertices)
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_vertices(&mut self, vertices: Vec<LonLat>) {
        self.vertices = vertices;
    }
}

pub fn validate_name(name: &str) -> Result<(), ZoneError> {
    if name.trim().is_empty() {
        return Err(ZoneError::Format("zone name must not be empty".to_string()));
    }
    Ok(())
}

/// Checks an open ring: finite coordinates and at least three distinct vertices.
pub fn validate_vertices(vertices: &[LonLat]) -> Result<(), ZoneError> {
    if let Some(bad) = vertices.iter().find(|p| !p.is_finite()) {
        return Err(ZoneError::Format(format!(
            "non-finite coordinate ({}, {})",
            bad.lon, bad.lat
        )));
    }
    let distinct = distinct_vertex_count(vertices);
    if distinct < MIN_VERTICES {
        return Err(ZoneError::Format(format!(
            "polygon needs at least {MIN_VERTICES} distinct vertices, got {distinct}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneError {
    /// Zone data that can never be stored (bad ring, empty or duplicate name).
    Format(String),
    /// Target name is held by another zone.
    Conflict { name: String },
    /// Reference to a zone that is no longer in the store.
    NotFound { name: String },
    /// Session operation for a zone that is not the one being edited.
    NotEditing { name: String },
}

impl fmt::Display for ZoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneError::Format(msg) => write!(f, "invalid zone data: {msg}"),
            ZoneError::Conflict { name } => write!(f, "a zone named \"{name}\" already exists"),
            ZoneError::NotFound { name } => write!(f, "zone \"{name}\" does not exist"),
            ZoneError::NotEditing { name } => write!(f, "zone \"{name}\" is not being edited"),
        }
    }
}

impl std::error::Error for ZoneError {}
