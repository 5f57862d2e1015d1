//! # astar_stepper
//!
//! The search core of a grid pathfinding visualizer. A rectangular [CellGrid] of empty and wall
//! cells with a movable start and end is searched with
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) on the 4-connected, uniform-cost grid.
//! The search writes distances, estimates, parent links and a frontier snapshot into the cells
//! so that a renderer can display them.
//!
//! The search can be stepped: [SearchEngine::run] always computes the full search, but only the
//! first `n` steps become visible. [StepController] ties this to a user-controlled step and
//! recomputes the search on every tick, so that edits to the grid show up immediately.
//!
//! ```
//! use astar_stepper::{backtrack, CellGrid, StepController};
//! use grid_util::point::Point;
//!
//! let grid = CellGrid::new(5, 5, Point::new(0, 0), Point::new(4, 4)).unwrap();
//! let mut controller = StepController::new(grid);
//! assert_eq!(controller.path().len(), 9);
//!
//! controller.set_step(2);
//! controller.tick();
//! assert!(controller.path().is_empty());
//! ```
pub mod cell;
pub mod cell_grid;
pub mod config;
pub mod controller;
pub mod edit;
pub mod error;
pub mod heuristic;
pub mod map_generation;
pub mod search;

pub use cell::{ArrowDirection, Cell, CellKind, CellMark};
pub use cell_grid::CellGrid;
pub use config::{GridConfig, MapSource};
pub use controller::StepController;
pub use edit::{EditStroke, StrokeAction};
pub use error::{GridError, MapParseError};
pub use heuristic::Heuristic;
pub use search::{backtrack, path_cost, SearchEngine, SearchOutcome};

/// Cost of moving to a 4-neighbour.
pub const UNIT_COST: f64 = 1.0;
/// Width and height of generated maps if nothing else is configured.
pub const DEFAULT_GRID_SIZE: usize = 15;
/// Upper bound on `width * height` of a grid.
pub const MAX_CELLS: usize = 1 << 24;
pub(crate) const N_NEIGHBOURS: usize = 4;
