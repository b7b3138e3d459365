//! Paints the ship map from the retained scene: corridors, room boxes with
//! sabotage and body markers, then player tokens on top.

use common::map::{self, Room, MAP_HEIGHT, MAP_WIDTH};
use common::Role;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;

use super::grid::CellGrid;
use crate::scene::Scene;

pub struct MapRenderer {
    width: usize,
    height: usize,
}

impl MapRenderer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: width as usize,
            height: height as usize,
        }
    }

    pub fn render(&self, scene: &Scene) -> Vec<Line<'static>> {
        let mut grid = CellGrid::new(self.width, self.height);
        self.draw_corridors(&mut grid);
        for room in &map::ROOMS {
            self.draw_room(&mut grid, scene, room);
        }
        self.draw_bodies(&mut grid, scene);
        self.draw_tokens(&mut grid, scene);
        grid.into_lines()
    }

    fn scale(&self, x: f32, y: f32) -> (i32, i32) {
        let sx = x / MAP_WIDTH * (self.width.saturating_sub(1)) as f32;
        let sy = y / MAP_HEIGHT * (self.height.saturating_sub(1)) as f32;
        (sx.round() as i32, sy.round() as i32)
    }

    fn draw_corridors(&self, grid: &mut CellGrid) {
        let style = Style::default().fg(Color::DarkGray);
        for room in &map::ROOMS {
            for neighbor in map::neighbors(room.name) {
                // Each corridor appears twice in the table; draw it once.
                if *neighbor < room.name {
                    continue;
                }
                if let Some(other) = map::room_by_name(neighbor) {
                    let (x0, y0) = self.scale(room.cx, room.cy);
                    let (x1, y1) = self.scale(other.cx, other.cy);
                    grid.line(x0, y0, x1, y1, '·', style);
                }
            }
        }
    }

    fn draw_room(&self, grid: &mut CellGrid, scene: &Scene, room: &Room) {
        let flags = scene.room_flags(room.name);
        let border = if flags.sabotaged {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let (x0, y0) = self.scale(room.cx - room.width / 2.0, room.cy - room.height / 2.0);
        let (x1, y1) = self.scale(room.cx + room.width / 2.0, room.cy + room.height / 2.0);
        grid.rect(x0, y0, x1, y1, border);

        let (cx, _) = self.scale(room.cx, room.cy);
        let name_width = (x1 - x0 - 1).max(0) as usize;
        let mut name = room.name.to_uppercase();
        name.truncate(name_width);
        grid.text_centered(cx, y0 + 1, &name, Style::default().fg(Color::Cyan));
    }

    fn draw_bodies(&self, grid: &mut CellGrid, scene: &Scene) {
        let style = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);
        for marker in scene.bodies() {
            let (x, y) = self.scale(marker.x, marker.y);
            match &marker.label {
                Some(label) => grid.text(x, y, &format!("!{}", label), style),
                None => grid.set(x, y, '!', style),
            }
        }
    }

    fn draw_tokens(&self, grid: &mut CellGrid, scene: &Scene) {
        for token in scene.tokens() {
            let color = if !token.alive {
                Color::DarkGray
            } else if token.role == Role::Impostor {
                Color::Red
            } else {
                Color::Cyan
            };
            let (x, y) = self.scale(token.x, token.y);
            grid.set(x, y, '●', Style::default().fg(color));
            grid.text_centered(
                x,
                y + 1,
                &token.id,
                Style::default().fg(if token.alive { Color::White } else { Color::DarkGray }),
            );
        }
    }
}
