//! Static ship layout: room geometry and corridor adjacency. Configuration
//! data only, never derived from a log. Logs may reference rooms that are
//! missing here; lookups return `None` and callers drop those entries.

/// Logical coordinate space the room rectangles live in. Renderers scale
/// this to whatever surface they draw on.
pub const MAP_WIDTH: f32 = 800.0;
pub const MAP_HEIGHT: f32 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Room {
    pub name: &'static str,
    pub cx: f32,
    pub cy: f32,
    pub width: f32,
    pub height: f32,
}

const ROOM_W: f32 = 140.0;
const ROOM_H: f32 = 80.0;

pub static ROOMS: [Room; 10] = [
    room("Cafeteria", 400.0, 100.0),
    room("Medbay", 200.0, 200.0),
    room("Admin", 400.0, 200.0),
    room("Weapons", 600.0, 200.0),
    room("Upper Engine", 200.0, 350.0),
    room("Storage", 400.0, 350.0),
    room("Navigation", 600.0, 350.0),
    room("Reactor", 200.0, 500.0),
    room("Electrical", 400.0, 500.0),
    room("Shields", 600.0, 500.0),
];

const fn room(name: &'static str, cx: f32, cy: f32) -> Room {
    Room {
        name,
        cx,
        cy,
        width: ROOM_W,
        height: ROOM_H,
    }
}

pub fn room_by_name(name: &str) -> Option<&'static Room> {
    ROOMS.iter().find(|r| r.name == name)
}

/// Corridor connections, used only to draw map lines.
pub fn neighbors(name: &str) -> &'static [&'static str] {
    match name {
        "Cafeteria" => &["Medbay", "Admin", "Weapons"],
        "Medbay" => &["Cafeteria", "Upper Engine"],
        "Admin" => &["Cafeteria", "Storage"],
        "Weapons" => &["Cafeteria", "Navigation"],
        "Upper Engine" => &["Medbay", "Reactor"],
        "Storage" => &["Admin", "Electrical"],
        "Navigation" => &["Weapons", "Shields"],
        "Reactor" => &["Upper Engine", "Electrical"],
        "Electrical" => &["Storage", "Reactor"],
        "Shields" => &["Navigation"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_and_unknown_rooms() {
        assert_eq!(room_by_name("Cafeteria").unwrap().cy, 100.0);
        assert!(room_by_name("Lower Engine").is_none());
    }

    #[test]
    fn adjacency_is_symmetric() {
        for r in &ROOMS {
            for n in neighbors(r.name) {
                assert!(
                    neighbors(n).contains(&r.name),
                    "{} -> {} has no return corridor",
                    r.name,
                    n
                );
            }
        }
    }
}
