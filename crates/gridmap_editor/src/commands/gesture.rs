//! Gesture tracking - one token per continuous input action
//!
//! Every command carries a [`GestureToken`]. Commands of the same kind pushed
//! with the same token collapse into one undo entry, so a whole drag undoes in
//! a single step.

/// Opaque identifier of one gesture.
///
/// Tokens are only minted by a [`GestureTracker`] and are never reused by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GestureToken(u64);

/// An open gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gesture {
    pub token: GestureToken,
    /// Cell where the gesture started; brush snapping is measured from here
    pub anchor: (i32, i32),
    /// Last cell the gesture moved over
    pub cursor: (i32, i32),
}

#[derive(Debug, Default)]
pub struct GestureTracker {
    next: u64,
    current: Option<Gesture>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint(&mut self) -> GestureToken {
        self.next += 1;
        GestureToken(self.next)
    }

    /// Start a gesture at a cell, closing any gesture still open
    pub fn begin(&mut self, x: i32, y: i32) -> GestureToken {
        let token = self.mint();
        self.current = Some(Gesture {
            token,
            anchor: (x, y),
            cursor: (x, y),
        });
        token
    }

    /// Close the open gesture; later pushes no longer merge with it
    pub fn end(&mut self) -> Option<Gesture> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&Gesture> {
        self.current.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Record the cell the gesture is now over
    pub fn move_to(&mut self, x: i32, y: i32) {
        if let Some(gesture) = self.current.as_mut() {
            gesture.cursor = (x, y);
        }
    }

    /// Token for the next push: the open gesture's, or a fresh one-off token
    pub fn token(&mut self) -> GestureToken {
        match self.current {
            Some(gesture) => gesture.token,
            None => self.mint(),
        }
    }

    /// A token that matches nothing pushed before
    pub fn fresh(&mut self) -> GestureToken {
        self.mint()
    }
}
