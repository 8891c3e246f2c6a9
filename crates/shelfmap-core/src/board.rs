//! Board document: the element and connection lists.

use crate::connection::Connection;
use crate::elements::{DimensionTable, Element};
use crate::error::{EngineError, EngineResult};
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// The shared lists the engine edits.
///
/// Element order is z-order (back to front). It is also the stable order
/// used when comparing a moving element against its neighbours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Board {
    pub elements: Vec<Element>,
    pub connections: Vec<Connection>,
}

impl Board {
    /// Create a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element on top of the z-order.
    pub fn insert_element(&mut self, element: Element) -> EngineResult<()> {
        if self.element(&element.id).is_some() {
            return Err(EngineError::DuplicateElementId(element.id));
        }
        self.elements.push(element);
        Ok(())
    }

    /// Add a connection. Both endpoints must exist.
    pub fn insert_connection(&mut self, connection: Connection) -> EngineResult<()> {
        if self.connections.iter().any(|c| c.id == connection.id) {
            return Err(EngineError::DuplicateConnectionId(connection.id));
        }
        for endpoint in [&connection.start_element_id, &connection.end_element_id] {
            if self.element(endpoint).is_none() {
                return Err(EngineError::ElementNotFound(endpoint.clone()));
            }
        }
        self.connections.push(connection);
        Ok(())
    }

    /// Get an element by ID.
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Get a mutable reference to an element by ID.
    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn connection(&self, id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// Remove an element and every connection that references it.
    ///
    /// Returns the element together with the purged connections.
    pub fn remove_element(&mut self, id: &str) -> Option<(Element, Vec<Connection>)> {
        let index = self.elements.iter().position(|e| e.id == id)?;
        let element = self.elements.remove(index);

        let (purged, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.connections)
            .into_iter()
            .partition(|c| c.references(id));
        self.connections = kept;

        if !purged.is_empty() {
            log::debug!("Purged {} connection(s) of removed element {}", purged.len(), id);
        }
        Some((element, purged))
    }

    /// Remove a single connection, leaving its endpoints in place.
    pub fn remove_connection(&mut self, id: &str) -> Option<Connection> {
        let index = self.connections.iter().position(|c| c.id == id)?;
        Some(self.connections.remove(index))
    }

    /// Connections with either endpoint on `element_id`.
    pub fn connections_for<'a>(&'a self, element_id: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.references(element_id))
    }

    /// Union of all resolved element rects.
    pub fn bounds(&self, dimensions: &DimensionTable) -> Option<Rect> {
        self.elements
            .iter()
            .map(|e| dimensions.element_rect(e))
            .reduce(|acc, r| acc.union(r))
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Serialize the board to JSON.
    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a board from JSON and [validate](Self::validated) it.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        serde_json::from_str::<Board>(json)?.validated()
    }

    /// Check a freshly loaded board.
    ///
    /// Duplicate element ids are an error. Connections whose endpoints are
    /// missing are dropped with a warning.
    pub fn validated(mut self) -> EngineResult<Self> {
        for (i, element) in self.elements.iter().enumerate() {
            if self.elements[..i].iter().any(|e| e.id == element.id) {
                return Err(EngineError::DuplicateElementId(element.id.clone()));
            }
        }

        let elements = &self.elements;
        self.connections.retain(|c| {
            let valid = [&c.start_element_id, &c.end_element_id]
                .iter()
                .all(|id| elements.iter().any(|e| &e.id == *id));
            if !valid {
                log::warn!("Dropping dangling connection {}", c.id);
            }
            valid
        });
        Ok(self)
    }
}
