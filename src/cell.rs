use grid_util::point::Point;

/// Whether a cell can be walked through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CellKind {
    #[default]
    Empty,
    Wall,
}

impl CellKind {
    pub fn toggled(self) -> CellKind {
        match self {
            CellKind::Empty => CellKind::Wall,
            CellKind::Wall => CellKind::Empty,
        }
    }
}

/// Marks placed on top of a cell. Exactly one cell of a [CellGrid](crate::CellGrid) carries
/// [CellMark::Start] and exactly one carries [CellMark::End].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CellMark {
    #[default]
    None,
    Start,
    End,
}

/// Direction from a cell towards the cell it was reached from, used to draw arrows instead of
/// distances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArrowDirection {
    Up,
    Down,
    Left,
    Right,
}

impl ArrowDirection {
    /// The direction of the unit step from `from` to `to`, if they are 4-adjacent. Note that y
    /// grows downwards, as in screen space.
    pub fn between(from: &Point, to: &Point) -> Option<ArrowDirection> {
        match (to.x - from.x, to.y - from.y) {
            (0, -1) => Some(ArrowDirection::Up),
            (0, 1) => Some(ArrowDirection::Down),
            (-1, 0) => Some(ArrowDirection::Left),
            (1, 0) => Some(ArrowDirection::Right),
            _ => None,
        }
    }
}

/// A single grid cell together with the search state the renderer displays. The search fields are
/// owned by the [SearchEngine](crate::SearchEngine) and rewritten on every run.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub(crate) pos: Point,
    pub(crate) kind: CellKind,
    pub(crate) mark: CellMark,
    pub(crate) distance: f64,
    pub(crate) heuristic: f64,
    // Arena index of the cell this cell was reached from.
    pub(crate) parent: Option<usize>,
    pub(crate) is_current: bool,
    pub(crate) is_next_in_frontier: bool,
    // Shadow of `distance` which is always kept up to date, regardless of the step budget.
    pub(crate) hidden_distance: f64,
}

impl Cell {
    pub(crate) fn new(pos: Point, kind: CellKind) -> Cell {
        Cell {
            pos,
            kind,
            mark: CellMark::None,
            distance: f64::INFINITY,
            heuristic: f64::INFINITY,
            parent: None,
            is_current: false,
            is_next_in_frontier: false,
            hidden_distance: f64::INFINITY,
        }
    }

    pub(crate) fn reset(&mut self) {
        let start_distance = if self.is_start() { 0.0 } else { f64::INFINITY };
        self.distance = start_distance;
        self.hidden_distance = start_distance;
        self.heuristic = f64::INFINITY;
        self.parent = None;
        self.is_current = false;
        self.is_next_in_frontier = false;
    }

    pub fn pos(&self) -> Point {
        self.pos
    }
    pub fn kind(&self) -> CellKind {
        self.kind
    }
    pub fn mark(&self) -> CellMark {
        self.mark
    }
    /// Accumulated cost from the start, [f64::INFINITY] if the cell has not been reached (yet).
    pub fn distance(&self) -> f64 {
        self.distance
    }
    /// Estimated remaining cost to the end. Only meaningful once the cell has been reached.
    pub fn heuristic_estimate(&self) -> f64 {
        self.heuristic
    }
    /// Whether the cell was reached from a neighbour. The neighbour itself is looked up with
    /// [CellGrid::parent](crate::CellGrid::parent).
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }
    pub fn is_current(&self) -> bool {
        self.is_current
    }
    pub fn is_next_in_frontier(&self) -> bool {
        self.is_next_in_frontier
    }
    pub fn is_wall(&self) -> bool {
        self.kind == CellKind::Wall
    }
    pub fn is_empty(&self) -> bool {
        self.kind == CellKind::Empty
    }
    pub fn is_start(&self) -> bool {
        self.mark == CellMark::Start
    }
    pub fn is_end(&self) -> bool {
        self.mark == CellMark::End
    }
    pub fn is_reached(&self) -> bool {
        self.distance.is_finite()
    }
}
