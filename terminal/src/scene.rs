//! Retained visual scene. Player tokens are identity-keyed by player id and
//! live in slot arena storage: applying a new derived state repositions
//! existing tokens in place, frees tokens whose id disappeared, and
//! allocates slots for new ids. Applying the same state twice is a no-op.

use std::collections::{BTreeMap, HashMap, HashSet};

use common::map;
use common::{BodyMarker, DerivedState, Role};

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub id: String,
    pub room: &'static str,
    pub x: f32,
    pub y: f32,
    pub alive: bool,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoomFlags {
    pub sabotaged: bool,
    pub has_body: bool,
}

#[derive(Default)]
pub struct Scene {
    slots: Vec<Option<Token>>,
    free: Vec<usize>,
    by_id: HashMap<String, usize>,
    rooms: BTreeMap<&'static str, RoomFlags>,
    bodies: Vec<BodyMarker>,
}

impl Scene {
    pub fn new() -> Self {
        let mut scene = Scene::default();
        for room in &map::ROOMS {
            scene.rooms.insert(room.name, RoomFlags::default());
        }
        scene
    }

    pub fn apply(&mut self, derived: &DerivedState) {
        let live: HashSet<&str> = derived.players.iter().map(|t| t.id.as_str()).collect();

        // Free slots whose id is gone from the new state.
        let stale: Vec<String> = self
            .by_id
            .keys()
            .filter(|id| !live.contains(id.as_str()))
            .cloned()
            .collect();
        for id in stale {
            if let Some(slot) = self.by_id.remove(&id) {
                self.slots[slot] = None;
                self.free.push(slot);
            }
        }

        // Update in place or allocate.
        for token in &derived.players {
            let next = Token {
                id: token.id.clone(),
                room: token.room,
                x: token.x,
                y: token.y,
                alive: token.alive,
                role: token.role,
            };
            match self.by_id.get(&token.id) {
                Some(&slot) => self.slots[slot] = Some(next),
                None => {
                    let slot = match self.free.pop() {
                        Some(slot) => {
                            self.slots[slot] = Some(next);
                            slot
                        }
                        None => {
                            self.slots.push(Some(next));
                            self.slots.len() - 1
                        }
                    };
                    self.by_id.insert(token.id.clone(), slot);
                }
            }
        }

        // Room flags are toggled on the existing entries, not rebuilt.
        for status in &derived.rooms {
            if let Some(flags) = self.rooms.get_mut(status.room) {
                flags.sabotaged = status.sabotaged;
                flags.has_body = status.has_body;
            }
        }

        self.bodies.clone_from(&derived.bodies);
    }

    /// Drops every retained element; used on document replace.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.by_id.clear();
        for flags in self.rooms.values_mut() {
            *flags = RoomFlags::default();
        }
        self.bodies.clear();
    }

    pub fn token(&self, id: &str) -> Option<&Token> {
        self.by_id.get(id).and_then(|&slot| self.slots[slot].as_ref())
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn token_count(&self) -> usize {
        self.by_id.len()
    }

    /// Total slots ever allocated, occupied or free. Stable across
    /// repeated applications of the same state.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn room_flags(&self, room: &str) -> RoomFlags {
        self.rooms.get(room).copied().unwrap_or_default()
    }

    pub fn bodies(&self) -> &[BodyMarker] {
        &self.bodies
    }
}
