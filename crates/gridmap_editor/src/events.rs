//! Map events - positioned objects placed on top of the grid

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of a map event. Each category has its own undo history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventGroup {
    Object,
    Warp,
    Coord,
    Bg,
    Heal,
}

impl EventGroup {
    pub const ALL: [EventGroup; 5] = [
        EventGroup::Object,
        EventGroup::Warp,
        EventGroup::Coord,
        EventGroup::Bg,
        EventGroup::Heal,
    ];

    fn bit(self) -> u8 {
        match self {
            EventGroup::Object => 1 << 0,
            EventGroup::Warp => 1 << 1,
            EventGroup::Coord => 1 << 2,
            EventGroup::Bg => 1 << 3,
            EventGroup::Heal => 1 << 4,
        }
    }
}

/// A set of event groups.
///
/// Moving events from several groups at once records the move against the
/// combined set, so it is undone as one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EventGroups(u8);

impl EventGroups {
    pub fn single(group: EventGroup) -> Self {
        Self(group.bit())
    }

    pub fn all() -> Self {
        EventGroup::ALL.into_iter().collect()
    }

    pub fn insert(&mut self, group: EventGroup) {
        self.0 |= group.bit();
    }

    pub fn contains(&self, group: EventGroup) -> bool {
        self.0 & group.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<EventGroup> for EventGroups {
    fn from_iter<I: IntoIterator<Item = EventGroup>>(iter: I) -> Self {
        let mut groups = EventGroups::default();
        for group in iter {
            groups.insert(group);
        }
        groups
    }
}

/// An event placed at a grid position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEvent {
    pub id: Uuid,
    pub group: EventGroup,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub elevation: u16,
}

impl MapEvent {
    pub fn new(group: EventGroup, x: i32, y: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            group,
            x,
            y,
            elevation: 0,
        }
    }

    pub fn with_elevation(mut self, elevation: u16) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Move by a delta. Events may sit outside the grid.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
    }
}
