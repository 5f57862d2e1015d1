use crate::cell::{ArrowDirection, Cell, CellKind, CellMark};
use crate::config::{GridConfig, MapSource};
use crate::error::GridError;
use crate::map_generation;
use crate::{MAX_CELLS, N_NEIGHBOURS};
use core::fmt;
use grid_util::point::Point;
use itertools::{iproduct, Itertools};
use log::{debug, info};
use petgraph::unionfind::UnionFind;
use rand::Rng;
use smallvec::SmallVec;
use std::ops::Index;

/// Offsets visited for cells with even coordinate parity, odd parity uses the reverse.
const EVEN_OFFSETS: [(i32, i32); N_NEIGHBOURS] = [(1, 0), (0, 1), (-1, 0), (0, -1)];
const ODD_OFFSETS: [(i32, i32); N_NEIGHBOURS] = [(-1, 0), (0, -1), (1, 0), (0, 1)];

/// Checks that a `width` by `height` grid is non-empty, addressable with `i32` coordinates and
/// holds at most [MAX_CELLS] cells. Returns the dimensions as coordinates.
pub(crate) fn check_dimensions(width: usize, height: usize) -> Result<(i32, i32), GridError> {
    let invalid = |reason: String| GridError::InvalidConfig { reason };
    if width == 0 || height == 0 {
        return Err(invalid(format!(
            "grid must have at least one cell, got {width}x{height}"
        )));
    }
    let (Ok(w), Ok(h)) = (i32::try_from(width), i32::try_from(height)) else {
        return Err(invalid(format!(
            "{width}x{height} grid does not fit i32 coordinates"
        )));
    };
    match width.checked_mul(height) {
        Some(n) if n <= MAX_CELLS => Ok((w, h)),
        _ => Err(invalid(format!(
            "{width}x{height} grid exceeds the maximum of {MAX_CELLS} cells"
        ))),
    }
}

/// [CellGrid] owns a fixed-size arena of [Cell]s stored row by row, the positions of the start
/// and end marks and a [UnionFind] structure recording which empty cells are connected.
/// Parent links between cells are arena indices, so resetting the search state is a single sweep.
#[derive(Clone, Debug)]
pub struct CellGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    start: Point,
    end: Point,
    components: UnionFind<usize>,
    components_dirty: bool,
}

impl CellGrid {
    /// Creates a grid without walls.
    pub fn new(
        width: usize,
        height: usize,
        start: Point,
        end: Point,
    ) -> Result<CellGrid, GridError> {
        CellGrid::with_walls(width, height, &[], start, end)
    }

    /// Creates a grid with the given walls. Walls outside of the grid are ignored, walls on the
    /// start or end position are cleared.
    pub fn with_walls(
        width: usize,
        height: usize,
        walls: &[Point],
        start: Point,
        end: Point,
    ) -> Result<CellGrid, GridError> {
        let (w, h) = check_dimensions(width, height)?;
        if start == end {
            return Err(GridError::InvalidConfig {
                reason: format!("start and end share position ({}, {})", start.x, start.y),
            });
        }
        let cells = iproduct!(0..h, 0..w)
            .map(|(y, x)| Cell::new(Point::new(x, y), CellKind::Empty))
            .collect::<Vec<_>>();
        let mut grid = CellGrid {
            width,
            height,
            cells,
            start,
            end,
            components: UnionFind::new(width * height),
            components_dirty: true,
        };
        grid.check_bounds(start)?;
        grid.check_bounds(end)?;
        for wall in walls {
            if let Some(ix) = grid.get_ix(*wall) {
                grid.cells[ix].kind = CellKind::Wall;
            }
        }
        for (pos, mark) in [(start, CellMark::Start), (end, CellMark::End)] {
            let ix = grid.ix(pos);
            grid.cells[ix].kind = CellKind::Empty;
            grid.cells[ix].mark = mark;
        }
        grid.reset_search_state();
        grid.generate_components();
        Ok(grid)
    }

    /// Builds the grid described by a [GridConfig], drawing the procedural walls from `rng` if
    /// the configuration asks for them.
    pub fn from_config<R: Rng>(config: &GridConfig, rng: &mut R) -> Result<CellGrid, GridError> {
        let (start, end) = config.endpoints(rng)?;
        let walls = match &config.source {
            MapSource::FromWalls(walls) => walls.clone(),
            MapSource::Auto => {
                map_generation::generate_cross_walls(config.width, config.height, rng)
            }
        };
        info!(
            "Building {}x{} grid with {} walls, start ({}, {}), end ({}, {})",
            config.width,
            config.height,
            walls.len(),
            start.x,
            start.y,
            end.x,
            end.y
        );
        CellGrid::with_walls(config.width, config.height, &walls, start, end)
    }

    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn start(&self) -> Point {
        self.start
    }
    pub fn end(&self) -> Point {
        self.end
    }
    pub fn in_bounds(&self, pos: Point) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }
    fn check_bounds(&self, pos: Point) -> Result<(), GridError> {
        if self.in_bounds(pos) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                pos,
                width: self.width,
                height: self.height,
            })
        }
    }
    /// Arena index of a position, [None] if it lies outside of the grid.
    pub fn get_ix(&self, pos: Point) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| pos.x as usize + pos.y as usize * self.width)
    }
    /// Arena index of a position that is known to be in bounds.
    pub(crate) fn ix(&self, pos: Point) -> usize {
        debug_assert!(self.in_bounds(pos));
        pos.x as usize + pos.y as usize * self.width
    }
    pub(crate) fn point(&self, ix: usize) -> Point {
        self.cells[ix].pos
    }
    pub(crate) fn cell_mut(&mut self, ix: usize) -> &mut Cell {
        &mut self.cells[ix]
    }
    pub(crate) fn cell_ix(&self, ix: usize) -> &Cell {
        &self.cells[ix]
    }
    pub fn get(&self, pos: Point) -> Option<&Cell> {
        self.get_ix(pos).map(|ix| &self.cells[ix])
    }
    /// The cell at `pos`. Panics if `pos` lies outside of the grid, use [get](Self::get) for
    /// unchecked input.
    pub fn at(&self, pos: Point) -> &Cell {
        match self.get(pos) {
            Some(cell) => cell,
            None => panic!(
                "({}, {}) is outside of the {}x{} grid",
                pos.x, pos.y, self.width, self.height
            ),
        }
    }
    pub fn start_cell(&self) -> &Cell {
        self.at(self.start)
    }
    pub fn end_cell(&self) -> &Cell {
        self.at(self.end)
    }
    /// All cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }
    pub fn walls(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells.iter().filter(|c| c.is_wall()).map(|c| c.pos)
    }
    pub fn can_move_to(&self, pos: Point) -> bool {
        self.get(pos).is_some_and(Cell::is_empty)
    }
    /// The position of the cell the cell at `pos` was reached from.
    pub fn parent(&self, pos: Point) -> Option<Point> {
        self.get(pos)?.parent.map(|ix| self.point(ix))
    }
    /// Direction from the cell at `pos` towards its parent, for drawing arrows instead of
    /// distances.
    pub fn arrow(&self, pos: Point) -> Option<ArrowDirection> {
        self.parent(pos)
            .and_then(|parent| ArrowDirection::between(&pos, &parent))
    }

    /// The in-bounds empty 4-neighbours of `pos`. The visiting order alternates with the parity
    /// of `x + y`: `+x, +y, -x, -y` for even and `-x, -y, +x, +y` for odd positions. Equal
    /// priorities in the search are resolved in this order, which makes the frontier spread
    /// diagonally instead of sweeping rows.
    pub fn neighbors(&self, pos: Point) -> SmallVec<[Point; N_NEIGHBOURS]> {
        let offsets = if (pos.x + pos.y).rem_euclid(2) == 0 {
            &EVEN_OFFSETS
        } else {
            &ODD_OFFSETS
        };
        offsets
            .iter()
            .map(|(dx, dy)| Point::new(pos.x + dx, pos.y + dy))
            .filter(|p| self.can_move_to(*p))
            .collect()
    }

    /// Moves the start mark to `pos`. The previous start cell loses its mark and a wall at `pos`
    /// is cleared. Moving the start onto the end is refused.
    pub fn set_start(&mut self, pos: Point) -> Result<(), GridError> {
        self.move_mark(pos, CellMark::Start)
    }

    /// Moves the end mark to `pos`, see [set_start](Self::set_start).
    pub fn set_end(&mut self, pos: Point) -> Result<(), GridError> {
        self.move_mark(pos, CellMark::End)
    }

    fn move_mark(&mut self, pos: Point, mark: CellMark) -> Result<(), GridError> {
        self.check_bounds(pos)?;
        let (current, other) = match mark {
            CellMark::Start => (self.start, self.end),
            _ => (self.end, self.start),
        };
        if pos == other {
            return Err(GridError::MarkedCell {
                pos,
                mark: self.at(pos).mark,
            });
        }
        if pos == current {
            return Ok(());
        }
        debug!("Moving {:?} from {:?} to {:?}", mark, current, pos);
        let old_ix = self.ix(current);
        self.cells[old_ix].mark = CellMark::None;
        self.cells[old_ix].reset();
        self.set_kind_unchecked(pos, CellKind::Empty);
        let new_ix = self.ix(pos);
        self.cells[new_ix].mark = mark;
        self.cells[new_ix].reset();
        match mark {
            CellMark::Start => self.start = pos,
            _ => self.end = pos,
        }
        Ok(())
    }

    /// Flips the cell at `pos` between empty and wall and returns the new kind. Cells carrying
    /// the start or end mark cannot be toggled.
    pub fn toggle_wall(&mut self, pos: Point) -> Result<CellKind, GridError> {
        self.check_bounds(pos)?;
        let kind = self.at(pos).kind.toggled();
        self.set_kind(pos, kind)?;
        Ok(kind)
    }

    /// Sets the kind of the cell at `pos`, refusing to turn the start or end into a wall.
    pub fn set_kind(&mut self, pos: Point, kind: CellKind) -> Result<(), GridError> {
        self.check_bounds(pos)?;
        let mark = self.at(pos).mark;
        if mark != CellMark::None && kind == CellKind::Wall {
            return Err(GridError::MarkedCell { pos, mark });
        }
        self.set_kind_unchecked(pos, kind);
        Ok(())
    }

    /// Updates a position on the grid. Joins newly connected components and flags the components
    /// as dirty if components are (potentially) broken apart into multiple.
    fn set_kind_unchecked(&mut self, pos: Point, kind: CellKind) {
        let ix = self.ix(pos);
        if self.cells[ix].kind == kind {
            return;
        }
        self.cells[ix].kind = kind;
        match kind {
            CellKind::Wall => self.components_dirty = true,
            CellKind::Empty => {
                for n in self.neighbors(pos) {
                    let n_ix = self.ix(n);
                    self.components.union(ix, n_ix);
                }
            }
        }
    }

    /// Clears all search state: every distance becomes infinite except the start's, which is zero,
    /// and parents and frontier flags are removed. Runs before every search.
    pub fn reset_search_state(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.reset();
        }
    }

    /// Checks if start and goal are on the same connected component.
    pub fn reachable(&mut self, start: Point, goal: Point) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same connected component. Positions outside of the
    /// grid are never reachable.
    pub fn unreachable(&mut self, start: Point, goal: Point) -> bool {
        self.update();
        match (self.get_ix(start), self.get_ix(goal)) {
            (Some(start_ix), Some(goal_ix)) => !self.components.equiv(start_ix, goal_ix),
            _ => true,
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up empty neighbours to the same components.
    pub fn generate_components(&mut self) {
        debug!("Generating connected components");
        self.components = UnionFind::new(self.width * self.height);
        self.components_dirty = false;
        for ix in 0..self.cells.len() {
            let cell = &self.cells[ix];
            if cell.is_wall() {
                continue;
            }
            // Only looking right and down is enough to visit every edge once.
            let pos = cell.pos;
            for n in [Point::new(pos.x + 1, pos.y), Point::new(pos.x, pos.y + 1)] {
                if self.can_move_to(n) {
                    let n_ix = self.ix(n);
                    self.components.union(ix, n_ix);
                }
            }
        }
    }
}

impl Index<Point> for CellGrid {
    type Output = Cell;

    fn index(&self, pos: Point) -> &Cell {
        self.at(pos)
    }
}

impl fmt::Display for CellGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in &self.cells.iter().chunks(self.width) {
            let line = row
                .map(|cell| match (cell.mark, cell.kind) {
                    (CellMark::Start, _) => 'S',
                    (CellMark::End, _) => 'E',
                    (CellMark::None, CellKind::Wall) => '#',
                    (CellMark::None, CellKind::Empty) => '.',
                })
                .join("");
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
