//! The document being edited: a layout plus the events placed on it

use crate::events::{EventGroup, EventGroups, MapEvent};
use gridmap_core::Layout;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Map {
    pub name: String,
    pub layout: Layout,
    #[serde(default)]
    pub events: Vec<MapEvent>,
}

impl Map {
    pub fn new(name: impl Into<String>, layout: Layout) -> Self {
        Self {
            name: name.into(),
            layout,
            events: Vec::new(),
        }
    }

    /// Add an event and return its id
    pub fn add_event(&mut self, event: MapEvent) -> Uuid {
        let id = event.id;
        self.events.push(event);
        id
    }

    pub fn event(&self, id: Uuid) -> Option<&MapEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn event_mut(&mut self, id: Uuid) -> Option<&mut MapEvent> {
        self.events.iter_mut().find(|e| e.id == id)
    }

    pub fn events_in_group(&self, group: EventGroup) -> impl Iterator<Item = &MapEvent> {
        self.events.iter().filter(move |e| e.group == group)
    }

    /// Groups of the given events; unknown ids are skipped
    pub fn groups_of(&self, ids: &[Uuid]) -> EventGroups {
        ids.iter()
            .filter_map(|id| self.event(*id))
            .map(|e| e.group)
            .collect()
    }

    /// Translate the given events, returning how many were found
    pub fn move_events(&mut self, ids: &[Uuid], dx: i32, dy: i32) -> usize {
        let mut moved = 0;
        for event in self.events.iter_mut().filter(|e| ids.contains(&e.id)) {
            event.translate(dx, dy);
            moved += 1;
        }
        moved
    }
}
