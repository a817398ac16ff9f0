//! Turns snapshots into something a renderer can draw.
//!
//! Only carved cells produce geometry; an unvisited cell has no wall state
//! yet. Walls are decided with [`Grid::is_open`], so a passage recorded on
//! either side counts.

use crate::grid::{Coord, Direction, Grid};
use crate::state::Snapshot;

pub const GRID_SCALE: f32 = 1.8;
pub const WALL_THICKNESS: f32 = 0.1;

unsafe impl bytemuck::Pod for Vertex {}
unsafe impl bytemuck::Zeroable for Vertex {}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum CellKind {
    Floor,
    Wall,
    Cursor,
    Start,
    Win,
}

impl From<CellKind> for [f32; 4] {
    fn from(kind: CellKind) -> Self {
        match kind {
            CellKind::Floor => [1.0, 1.0, 1.0, 1.0],
            CellKind::Wall => [0.0, 0.0, 0.0, 1.0],
            CellKind::Cursor => [0.0, 0.5, 0.3, 1.0],
            CellKind::Start => [1.0, 0.0, 0.0, 1.0],
            CellKind::Win => [1.0, 1.0, 0.0, 1.0],
        }
    }
}

/// A closed side of a carved cell.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Wall {
    pub cell: Coord,
    pub side: Direction,
}

pub fn walls(snapshot: &Snapshot) -> Vec<Wall> {
    let mut walls = Vec::new();
    for &cell in &snapshot.carved {
        for &side in &Direction::ALL {
            if !snapshot.grid.is_open(cell, side) {
                walls.push(Wall { cell, side });
            }
        }
    }

    walls
}

pub fn cell_kind(snapshot: &Snapshot, cell: Coord) -> CellKind {
    if snapshot.start_cell() == Some(cell) {
        CellKind::Start
    } else if snapshot.win_cell() == Some(cell) {
        CellKind::Win
    } else if !snapshot.is_complete() && snapshot.cursor == Some(cell) {
        CellKind::Cursor
    } else {
        CellKind::Floor
    }
}

/// Square cell size and top-left corner in normalized device coordinates,
/// centering the maze and keeping it inside `GRID_SCALE`.
fn ndc_params(grid: &Grid) -> (f32, f32, f32) {
    let longest = grid.dims.width.max(grid.dims.height).max(1) as f32;
    let size = GRID_SCALE / longest;

    let left = -(size * grid.dims.width as f32) / 2.0;
    let top = (size * grid.dims.height as f32) / 2.0;

    (size, left, top)
}

fn push_quad(verts: &mut Vec<Vertex>, low: [f32; 2], up: [f32; 2], color: [f32; 4]) {
    let [low_x, low_y] = low;
    let [up_x, up_y] = up;

    verts.extend_from_slice(&[
        // lower left triangle
        Vertex {
            position: [low_x, low_y],
            color,
        },
        Vertex {
            position: [up_x, low_y],
            color,
        },
        Vertex {
            position: [low_x, up_y],
            color,
        },
        // upper right triangle
        Vertex {
            position: [low_x, up_y],
            color,
        },
        Vertex {
            position: [up_x, low_y],
            color,
        },
        Vertex {
            position: [up_x, up_y],
            color,
        },
    ]);
}

/// Triangle list: one floor quad per carved cell followed by its walls.
pub fn build_vertices(snapshot: &Snapshot) -> Vec<Vertex> {
    let (size, left, top) = ndc_params(&snapshot.grid);
    let thickness = size * WALL_THICKNESS;
    let wall_color: [f32; 4] = CellKind::Wall.into();

    let mut verts = Vec::new();
    for &cell in &snapshot.carved {
        let low_x = left + cell.0 as f32 * size;
        let up_y = top - cell.1 as f32 * size;
        let up_x = low_x + size;
        let low_y = up_y - size;

        push_quad(
            &mut verts,
            [low_x, low_y],
            [up_x, up_y],
            cell_kind(snapshot, cell).into(),
        );

        for &side in &Direction::ALL {
            if snapshot.grid.is_open(cell, side) {
                continue;
            }

            let (low, up) = match side {
                Direction::North => ([low_x, up_y - thickness], [up_x, up_y]),
                Direction::East => ([up_x - thickness, low_y], [up_x, up_y]),
                Direction::South => ([low_x, low_y], [up_x, low_y + thickness]),
                Direction::West => ([low_x, low_y], [low_x + thickness, up_y]),
            };
            push_quad(&mut verts, low, up, wall_color);
        }
    }

    verts
}

/// Raw bytes for a vertex buffer upload.
pub fn vertex_bytes(verts: &[Vertex]) -> &[u8] {
    bytemuck::cast_slice(verts)
}

/// Plain-text rendering, north at the top.
pub fn ascii(snapshot: &Snapshot) -> String {
    let grid = &snapshot.grid;
    let (width, height) = (grid.dims.width, grid.dims.height);
    let carved = |coord: Coord| grid.is_visited(coord);

    let mut out = String::new();
    for y in 0..=height {
        // horizontal edges above row y
        for x in 0..width {
            let below = (x, y);
            let above = y.checked_sub(1).map(|y| (x, y));
            let closed = if y < height {
                (carved(below) || above.map_or(false, carved))
                    && !grid.is_open(below, Direction::North)
            } else {
                above.map_or(false, carved)
            };
            out.push('+');
            out.push_str(if closed { "--" } else { "  " });
        }
        out.push_str("+\n");

        if y == height {
            break;
        }

        for x in 0..=width {
            let right = (x, y);
            let left = x.checked_sub(1).map(|x| (x, y));
            let closed = if x < width {
                (carved(right) || left.map_or(false, carved))
                    && !grid.is_open(right, Direction::West)
            } else {
                left.map_or(false, carved)
            };
            out.push(if closed { '|' } else { ' ' });

            if x < width {
                out.push_str(match (carved(right), cell_kind(snapshot, right)) {
                    (false, _) => "  ",
                    (true, CellKind::Start) => "S ",
                    (true, CellKind::Win) => "W ",
                    (true, CellKind::Cursor) => "@ ",
                    (true, _) => "  ",
                });
            }
        }
        out.push('\n');
    }

    out
}
