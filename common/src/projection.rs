//! Pure projection from a raw round snapshot to render-ready facts. No
//! rendering types leak in here; the same snapshot always projects to the
//! same derived state.

use std::collections::BTreeMap;

use crate::game_log::{Role, RoundSnapshot};
use crate::map::{self, Room};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedState {
    /// One entry per layout room, in layout order.
    pub rooms: Vec<RoomStatus>,
    pub bodies: Vec<BodyMarker>,
    pub players: Vec<PlayerToken>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomStatus {
    pub room: &'static str,
    pub sabotaged: bool,
    pub has_body: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyMarker {
    pub room: &'static str,
    pub x: f32,
    pub y: f32,
    pub count: usize,
    /// Count label, only present when more than one body shares the room.
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerToken {
    pub id: String,
    pub room: &'static str,
    pub x: f32,
    pub y: f32,
    pub alive: bool,
    pub role: Role,
}

const TOKEN_SPACING: f32 = 28.0;
const TOKEN_ROW_DROP: f32 = 16.0;
const MAX_COLUMNS: usize = 4;

pub fn project(snapshot: &RoundSnapshot, roles: &BTreeMap<String, Role>) -> DerivedState {
    let state = &snapshot.state;

    let sabotaged_rooms: Vec<&str> = state
        .sabotage
        .as_ref()
        .map(|s| s.fix_progress.keys().map(String::as_str).collect())
        .unwrap_or_default();

    // Bucket bodies by room; locations the layout does not know are dropped.
    let mut body_buckets: BTreeMap<&'static str, usize> = BTreeMap::new();
    for body in &state.bodies {
        match map::room_by_name(&body.location) {
            Some(room) => *body_buckets.entry(room.name).or_insert(0) += 1,
            None => log::debug!("dropping body in unknown room {:?}", body.location),
        }
    }

    let rooms = map::ROOMS
        .iter()
        .map(|room| RoomStatus {
            room: room.name,
            sabotaged: sabotaged_rooms.contains(&room.name),
            has_body: body_buckets.contains_key(room.name),
        })
        .collect();

    let bodies = body_buckets
        .iter()
        .map(|(&name, &count)| {
            let room = map::room_by_name(name).unwrap();
            BodyMarker {
                room: name,
                x: room.cx,
                y: room.cy + room.height / 4.0,
                count,
                label: (count > 1).then(|| format!("{}", count)),
            }
        })
        .collect();

    // Bucket players by room. player_locations is a BTreeMap, so each
    // bucket comes out already sorted lexicographically by player id.
    let mut player_buckets: BTreeMap<&'static str, Vec<&str>> = BTreeMap::new();
    for (pid, location) in &state.player_locations {
        match map::room_by_name(location) {
            Some(room) => player_buckets.entry(room.name).or_default().push(pid.as_str()),
            None => log::debug!("dropping player {} in unknown room {:?}", pid, location),
        }
    }

    let mut players = Vec::new();
    for (name, pids) in &player_buckets {
        let room = map::room_by_name(name).unwrap();
        for (i, pid) in pids.iter().enumerate() {
            let (x, y) = token_position(room, i, pids.len());
            players.push(PlayerToken {
                id: pid.to_string(),
                room: name,
                x,
                y,
                alive: state.alive_players.contains(*pid),
                role: roles.get(*pid).copied().unwrap_or(Role::Crewmate),
            });
        }
    }

    DerivedState {
        rooms,
        bodies,
        players,
    }
}

/// Grid layout inside a room: up to four columns, centered horizontally on
/// the room center, rows dropping below it.
fn token_position(room: &Room, index: usize, count: usize) -> (f32, f32) {
    let columns = count.min(MAX_COLUMNS);
    let col = index % columns;
    let row = index / columns;
    let dx = (col as f32 - (columns as f32 - 1.0) / 2.0) * TOKEN_SPACING;
    let dy = row as f32 * TOKEN_SPACING + TOKEN_ROW_DROP;
    (room.cx + dx, room.cy + dy)
}
