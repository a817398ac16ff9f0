pub const CELL_NULL: u8 = 0x00;
pub const PATH_N: u8 = 0x01;
pub const PATH_E: u8 = 0x02;
pub const PATH_S: u8 = 0x04;
pub const PATH_W: u8 = 0x08;
pub const VISITED: u8 = 0x10;

const PATH_MASK: u8 = PATH_N | PATH_E | PATH_S | PATH_W;

/// `(x, y)` with `x` the column and `y` the row.
pub type Coord = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    pub fn area(&self) -> usize {
        cell_count(self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn contains(&self, (x, y): Coord) -> bool {
        x < self.width && y < self.height
    }
}

/// `width * height`. A grid that cannot be addressed is as fatal as failing
/// to allocate it.
pub fn cell_count(width: usize, height: usize) -> usize {
    width
        .checked_mul(height)
        .expect("maze dimensions exceed addressable memory")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Fixed enumeration order used when collecting neighbour candidates.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn bit(self) -> u8 {
        match self {
            Direction::North => PATH_N,
            Direction::East => PATH_E,
            Direction::South => PATH_S,
            Direction::West => PATH_W,
        }
    }

    /// The coordinate one step in this direction, if it stays inside `dims`.
    pub fn step(self, (x, y): Coord, dims: Dimensions) -> Option<Coord> {
        let next = match self {
            Direction::North => (x, y.checked_sub(1)?),
            Direction::East => (x.checked_add(1)?, y),
            Direction::South => (x, y.checked_add(1)?),
            Direction::West => (x.checked_sub(1)?, y),
        };

        if dims.contains(next) {
            Some(next)
        } else {
            None
        }
    }
}

impl std::ops::Neg for Direction {
    type Output = Direction;

    fn neg(self) -> Self::Output {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }
}

/// In-bounds cardinal neighbours of a cell, yielded North, East, South, West.
#[derive(Debug, Clone, Copy)]
pub struct Neighborhood {
    origin: Coord,
    dims: Dimensions,
    counter: usize,
}

impl Neighborhood {
    pub fn new(origin: Coord, dims: Dimensions) -> Self {
        Self {
            origin,
            dims,
            counter: 0,
        }
    }
}

impl Iterator for Neighborhood {
    type Item = (Coord, Direction);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&dir) = Direction::ALL.get(self.counter) {
            self.counter += 1;
            if let Some(neighbor) = dir.step(self.origin, self.dims) {
                return Some((neighbor, dir));
            }
        }

        None
    }
}

/// Row-major byte grid, one bitmask per cell.
///
/// A passage bit is only ever stored on the cell it was carved from, so any
/// question about whether two cells are connected has to go through
/// [`Grid::is_open`], which also looks at the neighbour's opposite bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub dims: Dimensions,
    cells: Vec<u8>,
}

impl Grid {
    pub fn with_dims(width: usize, height: usize) -> Self {
        Self {
            cells: vec![CELL_NULL; cell_count(width, height)],
            dims: Dimensions { width, height },
        }
    }

    pub fn from_bytes(width: usize, height: usize, cells: Vec<u8>) -> Option<Self> {
        if width.checked_mul(height) != Some(cells.len()) {
            return None;
        }

        Some(Self {
            cells,
            dims: Dimensions { width, height },
        })
    }

    #[inline]
    pub fn index_of(&self, (x, y): Coord) -> Option<usize> {
        if self.dims.contains((x, y)) {
            Some((self.dims.width * y) + x)
        } else {
            None
        }
    }

    /// Cell value at `coord`, or `CELL_NULL` outside the grid.
    #[inline]
    pub fn get_cell(&self, coord: Coord) -> u8 {
        self.index_of(coord)
            .map(|index| self.cells[index])
            .unwrap_or(CELL_NULL)
    }

    #[inline]
    pub fn is_set(&self, coord: Coord, flag: u8) -> bool {
        get_bit(self.get_cell(coord), flag)
    }

    #[inline]
    pub fn is_visited(&self, coord: Coord) -> bool {
        self.is_set(coord, VISITED)
    }

    /// Sets `flag` on the cell, returning the previous value. `None` when
    /// `coord` lies outside the grid.
    pub fn set_flag(&mut self, coord: Coord, flag: u8) -> Option<u8> {
        let index = self.index_of(coord)?;
        let prev = self.cells[index];
        self.cells[index] = set_bit(prev, flag);
        Some(prev)
    }

    pub fn neighborhood(&self, coord: Coord) -> Neighborhood {
        Neighborhood::new(coord, self.dims)
    }

    /// Whether a passage joins `coord` and its neighbour in `dir`: either
    /// this cell's bit or the neighbour's opposite bit.
    pub fn is_open(&self, coord: Coord, dir: Direction) -> bool {
        if self.is_set(coord, dir.bit()) {
            return true;
        }

        match dir.step(coord, self.dims) {
            Some(neighbor) => self.is_set(neighbor, (-dir).bit()),
            None => false,
        }
    }

    pub fn degree(&self, coord: Coord) -> usize {
        Direction::ALL
            .iter()
            .filter(|&&dir| self.is_open(coord, dir))
            .count()
    }

    /// Carved dead ends in row-major scan order: visited cells that never
    /// carved outwards. Their only passage is the one stored on the cell
    /// they were reached from, so the start of the walk is never included.
    pub fn leaves(&self) -> Vec<Coord> {
        self.coords()
            .filter(|&coord| self.get_cell(coord) == VISITED)
            .collect()
    }

    /// Number of distinct passages, each counted once regardless of which
    /// side stores the bit.
    pub fn passage_count(&self) -> usize {
        self.coords()
            .map(|coord| {
                [Direction::East, Direction::South]
                    .iter()
                    .filter(|&&dir| self.is_open(coord, dir))
                    .count()
            })
            .sum()
    }

    /// True when some cell carries a passage bit without being visited.
    pub fn has_orphan_passage(&self) -> bool {
        self.cells
            .iter()
            .any(|&cell| cell & PATH_MASK != 0 && !get_bit(cell, VISITED))
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let width = self.dims.width;
        (0..self.dims.area()).map(move |index| (index % width, index / width))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.cells
    }
}

#[inline(always)]
fn get_bit(n: u8, flag: u8) -> bool {
    n & flag != 0
}

#[inline(always)]
fn set_bit(n: u8, flag: u8) -> u8 {
    n | flag
}
