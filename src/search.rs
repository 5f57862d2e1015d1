//! Best-first (A*) search over a [CellGrid], writing its results into the grid cells.
//!
//! Two ways of running the search are offered:
//! - [SearchEngine::fill_shortest_path] runs until the end is expanded, the frontier is empty or
//!   an optional expansion budget is spent, writing every result directly.
//! - [SearchEngine::run] always runs the complete search on a hidden cost channel but only makes
//!   the first `step_budget` pops visible, so that a visualizer can scrub through the search
//!   without changing the order in which cells are explored.
use crate::cell_grid::CellGrid;
use crate::heuristic::Heuristic;
use crate::UNIT_COST;
use grid_util::point::Point;
use log::{debug, trace, warn};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct FrontierEntry {
    estimated_cost: f64,
    cost: f64,
    sequence: u64,
    index: usize,
}

impl Eq for FrontierEntry {}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Orders per estimated cost first, equal estimates are popped in insertion order so that
        // runs on the same grid always expand the same cells.
        match other.estimated_cost.total_cmp(&self.estimated_cost) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            s => s,
        }
    }
}

/// Summary of a [SearchEngine::fill_shortest_path] run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Number of cells whose neighbours were examined.
    pub expansions: usize,
    /// Whether the end was popped from the frontier.
    pub reached: bool,
}

/// Runs the search and keeps the priority queue allocation and the last frontier snapshot around
/// between runs.
#[derive(Debug)]
pub struct SearchEngine {
    pub heuristic: Heuristic,
    /// Scales the heuristic. Values above 1.0 give Weighted A*, which explores fewer cells but
    /// no longer guarantees a shortest path.
    pub heuristic_factor: f64,
    frontier: BinaryHeap<FrontierEntry>,
    sequence: u64,
    snapshot: Vec<Point>,
}

impl std::fmt::Debug for FrontierEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} @ {}: {})", self.index, self.cost, self.estimated_cost)
    }
}

impl Default for SearchEngine {
    fn default() -> SearchEngine {
        SearchEngine::new()
    }
}

impl SearchEngine {
    pub fn new() -> SearchEngine {
        SearchEngine {
            heuristic: Heuristic::Manhattan,
            heuristic_factor: 1.0,
            frontier: BinaryHeap::new(),
            sequence: 0,
            snapshot: Vec::new(),
        }
    }

    pub fn with_heuristic(heuristic: Heuristic, heuristic_factor: f64) -> SearchEngine {
        SearchEngine {
            heuristic,
            heuristic_factor,
            ..SearchEngine::new()
        }
    }

    /// The cells left in the frontier when the last visible pop was done, in the order they would
    /// have been popped.
    pub fn frontier_snapshot(&self) -> &[Point] {
        &self.snapshot
    }

    fn estimate(&self, grid: &CellGrid, ix: usize) -> f64 {
        self.heuristic.estimate(&grid.point(ix), &grid.end())
    }

    fn push(&mut self, index: usize, cost: f64, estimate: f64) {
        self.frontier.push(FrontierEntry {
            estimated_cost: cost + estimate * self.heuristic_factor,
            cost,
            sequence: self.sequence,
            index,
        });
        self.sequence += 1;
    }

    fn begin(&mut self, grid: &mut CellGrid) -> (usize, usize) {
        grid.reset_search_state();
        self.frontier.clear();
        self.snapshot.clear();
        self.sequence = 0;
        let start_ix = grid.ix(grid.start());
        let end_ix = grid.ix(grid.end());
        self.push(start_ix, 0.0, 0.0);
        (start_ix, end_ix)
    }

    /// We may have inserted a cell several times into the heap if we found a better way to reach
    /// it, only the entry matching the cell's current cost is live.
    fn is_live(grid: &CellGrid, entry: &FrontierEntry) -> bool {
        entry.cost <= grid.cell_ix(entry.index).hidden_distance
    }

    /// Records the live frontier entries in pop order.
    fn take_snapshot(&mut self, grid: &CellGrid) {
        let mut live = self
            .frontier
            .iter()
            .filter(|entry| Self::is_live(grid, entry))
            .collect::<Vec<_>>();
        live.sort_by(|a, b| b.cmp(a));
        self.snapshot = live.into_iter().map(|e| grid.point(e.index)).collect();
    }

    fn apply_flags(&self, grid: &mut CellGrid, current: Option<usize>) {
        if let Some(ix) = current {
            grid.cell_mut(ix).is_current = true;
        }
        for pos in &self.snapshot {
            let ix = grid.ix(*pos);
            grid.cell_mut(ix).is_next_in_frontier = true;
        }
    }

    /// Examines the neighbours of the cell at `ix`, pushing the ones whose cost improved. The
    /// hidden channel is always updated, the visible one only if `visible` is set.
    fn expand(&mut self, grid: &mut CellGrid, ix: usize, cost: f64, visible: bool) {
        let pos = grid.point(ix);
        trace!("Expanding ({}, {}) at cost {}", pos.x, pos.y, cost);
        if visible {
            let estimate = self.estimate(grid, ix);
            grid.cell_mut(ix).heuristic = estimate;
        }
        for n in grid.neighbors(pos) {
            let n_ix = grid.ix(n);
            let new_cost = cost + UNIT_COST;
            if new_cost >= grid.cell_ix(n_ix).hidden_distance {
                continue;
            }
            let estimate = self.estimate(grid, n_ix);
            let cell = grid.cell_mut(n_ix);
            cell.hidden_distance = new_cost;
            if visible {
                cell.distance = new_cost;
                cell.heuristic = estimate;
                cell.parent = Some(ix);
            }
            self.push(n_ix, new_cost, estimate);
        }
    }

    /// Runs A* from the grid's start towards its end, writing distances, estimates and parents
    /// into the cells. If `max_expansions` is given, at most that many cells are expanded, which
    /// bounds the exploration on large grids; the end may then remain unreached.
    pub fn fill_shortest_path(
        &mut self,
        grid: &mut CellGrid,
        max_expansions: Option<usize>,
    ) -> SearchOutcome {
        let (_, end_ix) = self.begin(grid);
        let budget = max_expansions.unwrap_or(usize::MAX);
        let mut expansions = 0;
        let mut current = None;
        let mut reached = false;
        while let Some(entry) = self.frontier.pop() {
            if !Self::is_live(grid, &entry) {
                continue;
            }
            if entry.index == end_ix {
                reached = true;
                break;
            }
            if expansions == budget {
                self.frontier.push(entry);
                break;
            }
            self.expand(grid, entry.index, entry.cost, true);
            current = Some(entry.index);
            expansions += 1;
        }
        self.take_snapshot(grid);
        self.apply_flags(grid, current);
        if !reached && max_expansions.is_none() && grid.reachable(grid.start(), grid.end()) {
            warn!("Reachable end could not be pathed to, are the components correct?");
        }
        debug!(
            "Filled shortest path: {} expansions, end reached: {}",
            expansions, reached
        );
        SearchOutcome {
            expansions,
            reached,
        }
    }

    /// Runs the complete search, but only the pops numbered below `step_budget` (the start is
    /// pop 0) write their results into the visible cell state. Returns the number of the pop that
    /// ended the search: the pop of the end, or the last pop if the frontier ran dry. Passing the
    /// returned value as `step_budget` therefore shows the whole search, and an isolated start
    /// returns 0.
    pub fn run(&mut self, grid: &mut CellGrid, step_budget: usize) -> usize {
        let (_, end_ix) = self.begin(grid);
        if step_budget == 0 {
            self.take_snapshot(grid);
        }
        let mut pop_index = 0;
        let mut current = None;
        let mut max_steps = None;
        while let Some(entry) = self.frontier.pop() {
            if !Self::is_live(grid, &entry) {
                continue;
            }
            let visible = pop_index < step_budget;
            if visible {
                current = Some(entry.index);
            }
            if entry.index == end_ix {
                max_steps = Some(pop_index);
                break;
            }
            self.expand(grid, entry.index, entry.cost, visible);
            pop_index += 1;
            if pop_index == step_budget {
                self.take_snapshot(grid);
            }
        }
        // The start is always popped, so at least one pop happened.
        let max_steps = max_steps.unwrap_or(pop_index.saturating_sub(1));
        if step_budget > max_steps {
            self.take_snapshot(grid);
        }
        self.apply_flags(grid, current);
        debug!(
            "Stepped search: {} of {} steps visible, {} cells in frontier",
            step_budget.min(max_steps),
            max_steps,
            self.snapshot.len()
        );
        max_steps
    }
}

/// Follows the visible parent links from `end` back to the start and returns the path from start
/// to end. The path is empty if `end` has not been reached.
pub fn backtrack(grid: &CellGrid, end: Point) -> Vec<Point> {
    let Some(end_ix) = grid.get_ix(end) else {
        return Vec::new();
    };
    if !grid.cell_ix(end_ix).is_reached() {
        return Vec::new();
    }
    let mut path = std::iter::successors(Some(end_ix), |ix| grid.cell_ix(*ix).parent)
        .map(|ix| grid.point(ix))
        .collect::<Vec<_>>();
    path.reverse();
    path
}

/// Number of unit moves along a path.
pub fn path_cost(path: &[Point]) -> usize {
    path.len().saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grid(map: &str) -> CellGrid {
        let config = GridConfig::from_ascii(map).unwrap();
        CellGrid::from_config(&config, &mut StdRng::seed_from_u64(0)).unwrap()
    }

    fn assert_valid_path(grid: &CellGrid, path: &[Point]) {
        assert_eq!(path.first(), Some(&grid.start()));
        assert_eq!(path.last(), Some(&grid.end()));
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan_distance(&pair[1]), 1);
            assert!(grid.at(pair[1]).is_empty());
        }
    }

    #[test]
    fn open_grid_shortest_path() {
        let mut grid = CellGrid::new(5, 5, Point::new(0, 0), Point::new(4, 4)).unwrap();
        let outcome = SearchEngine::new().fill_shortest_path(&mut grid, None);
        assert!(outcome.reached);
        assert_eq!(grid.end_cell().distance(), 8.0);
        let path = backtrack(&grid, grid.end());
        assert_eq!(path_cost(&path), 8);
        assert_valid_path(&grid, &path);
    }

    /// Asserts that the optimal path around an obstacle is found.
    #[test]
    fn solve_simple_problem() {
        let mut grid = grid(
            "
            S..
            .#.
            ..E
            ",
        );
        SearchEngine::new().fill_shortest_path(&mut grid, None);
        let path = backtrack(&grid, grid.end());
        assert_eq!(path.len(), 5);
        assert_valid_path(&grid, &path);
    }

    #[test]
    fn adjacent_start_and_end() {
        let mut grid = grid("SE");
        let outcome = SearchEngine::new().fill_shortest_path(&mut grid, None);
        assert_eq!(outcome.expansions, 1);
        assert_eq!(backtrack(&grid, grid.end()), vec![Point::new(0, 0), Point::new(1, 0)]);
        assert_eq!(SearchEngine::new().run(&mut grid, usize::MAX), 1);
    }

    #[test]
    fn wall_without_gap_blocks_end() {
        let mut grid = grid(
            "
            S.#..
            ..#..
            ..#.E
            ",
        );
        let outcome = SearchEngine::new().fill_shortest_path(&mut grid, None);
        assert!(!outcome.reached);
        assert_eq!(outcome.expansions, 6);
        assert_eq!(grid.end_cell().distance(), f64::INFINITY);
        assert!(backtrack(&grid, grid.end()).is_empty());
        assert_eq!(grid.parent(grid.end()), None);
    }

    #[test]
    fn isolated_start_has_no_steps() {
        let mut grid = grid(
            "
            S#.
            #..
            ..E
            ",
        );
        let mut engine = SearchEngine::new();
        assert_eq!(engine.run(&mut grid, usize::MAX), 0);
        assert!(backtrack(&grid, grid.end()).is_empty());
        assert!(engine.frontier_snapshot().is_empty());
    }

    #[test]
    fn expansion_budget_stops_early() {
        let mut grid = CellGrid::new(10, 10, Point::new(0, 0), Point::new(9, 9)).unwrap();
        let mut engine = SearchEngine::new();
        let outcome = engine.fill_shortest_path(&mut grid, Some(3));
        assert_eq!(outcome.expansions, 3);
        assert!(!outcome.reached);
        assert!(!grid.end_cell().is_reached());
        assert!(!engine.frontier_snapshot().is_empty());
        let outcome = engine.fill_shortest_path(&mut grid, Some(0));
        assert_eq!(outcome.expansions, 0);
        assert_eq!(engine.frontier_snapshot(), &[Point::new(0, 0)]);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let mut grid = grid(
            "
            S.....
            .##.#.
            ...#..
            .#...E
            ",
        );
        let mut engine = SearchEngine::new();
        let steps = engine.run(&mut grid, 7);
        let first = grid.cells().cloned().collect::<Vec<_>>();
        let first_snapshot = engine.frontier_snapshot().to_vec();
        assert_eq!(engine.run(&mut grid, 7), steps);
        assert_eq!(grid.cells().cloned().collect::<Vec<_>>(), first);
        assert_eq!(engine.frontier_snapshot(), first_snapshot.as_slice());
    }

    #[test]
    fn full_budget_matches_fill() {
        let map = "
            S...#...
            .##.#.#.
            ...#..#.
            .#.....E
            ";
        let mut stepped = grid(map);
        let mut filled = grid(map);
        let mut engine = SearchEngine::new();
        let max_steps = engine.run(&mut stepped, usize::MAX);
        let outcome = engine.fill_shortest_path(&mut filled, None);
        assert_eq!(max_steps, outcome.expansions);
        assert_eq!(engine.run(&mut stepped, max_steps), max_steps);
        let path = backtrack(&stepped, stepped.end());
        assert_eq!(path, backtrack(&filled, filled.end()));
        assert_eq!(path_cost(&path) as f64, stepped.end_cell().distance());
    }

    #[test]
    fn zero_budget_writes_nothing_visible() {
        let mut grid = CellGrid::new(4, 4, Point::new(0, 0), Point::new(3, 3)).unwrap();
        let mut engine = SearchEngine::new();
        let max_steps = engine.run(&mut grid, 0);
        assert!(max_steps > 0);
        assert!(grid
            .cells()
            .filter(|c| !c.is_start())
            .all(|c| !c.is_reached() && !c.has_parent()));
        assert!(grid.cells().all(|c| !c.is_current()));
        assert_eq!(engine.frontier_snapshot(), &[Point::new(0, 0)]);
        assert!(grid.start_cell().is_next_in_frontier());
    }

    #[test]
    fn visible_state_grows_with_budget() {
        let mut grid = CellGrid::new(6, 6, Point::new(1, 1), Point::new(4, 5)).unwrap();
        let mut engine = SearchEngine::new();
        let max_steps = engine.run(&mut grid, usize::MAX);
        let mut previous = vec![f64::INFINITY; 36];
        for budget in 0..=max_steps {
            assert_eq!(engine.run(&mut grid, budget), max_steps);
            let distances = grid.cells().map(|c| c.distance()).collect::<Vec<_>>();
            for (before, now) in previous.iter().zip(&distances) {
                assert!(now <= before);
            }
            assert_eq!(grid.cells().filter(|c| c.is_current()).count(), budget.min(1));
            previous = distances;
        }
    }

    #[test]
    fn current_cell_is_last_visible_pop() {
        let mut grid = CellGrid::new(5, 1, Point::new(0, 0), Point::new(4, 0)).unwrap();
        let mut engine = SearchEngine::new();
        assert_eq!(engine.run(&mut grid, 2), 4);
        assert!(grid.at(Point::new(1, 0)).is_current());
        assert_eq!(grid.at(Point::new(2, 0)).distance(), 2.0);
        assert!(!grid.at(Point::new(3, 0)).is_reached());
        assert_eq!(engine.frontier_snapshot(), &[Point::new(2, 0)]);
        assert!(grid.at(Point::new(2, 0)).is_next_in_frontier());
    }

    #[test]
    fn toggled_back_wall_leaves_no_trace() {
        let mut edited = CellGrid::new(5, 5, Point::new(0, 2), Point::new(4, 2)).unwrap();
        let mut pristine = edited.clone();
        let mut engine = SearchEngine::new();
        edited.toggle_wall(Point::new(2, 2)).unwrap();
        engine.run(&mut edited, 5);
        edited.toggle_wall(Point::new(2, 2)).unwrap();
        let a = engine.run(&mut edited, 5);
        let b = engine.run(&mut pristine, 5);
        assert_eq!(a, b);
        assert_eq!(
            edited.cells().cloned().collect::<Vec<_>>(),
            pristine.cells().cloned().collect::<Vec<_>>()
        );
    }

    #[test]
    fn weighted_search_still_finds_a_path() {
        let mut grid = grid(
            "
            S....
            .###.
            ....E
            ",
        );
        let mut engine = SearchEngine::with_heuristic(Heuristic::Euclidean, 1.5);
        assert!(engine.fill_shortest_path(&mut grid, None).reached);
        let path = backtrack(&grid, grid.end());
        assert_valid_path(&grid, &path);
    }
}
