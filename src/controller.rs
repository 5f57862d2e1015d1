use crate::cell::CellKind;
use crate::cell_grid::CellGrid;
use crate::config::GridConfig;
use crate::edit::EditStroke;
use crate::error::GridError;
use crate::search::{backtrack, SearchEngine};
use grid_util::point::Point;
use log::{debug, info};
use rand::Rng;

/// Couples a [CellGrid] with a [SearchEngine] and the step the user is looking at. Every
/// [tick](Self::tick) runs a fresh search with the current step as visible budget and clamps the
/// step to the number of steps the search actually needs.
#[derive(Debug)]
pub struct StepController {
    grid: CellGrid,
    engine: SearchEngine,
    step: usize,
    max_steps: usize,
    path: Vec<Point>,
    stroke: Option<EditStroke>,
}

impl StepController {
    /// Wraps `grid` and runs the first search with an unbounded step, so the complete search is
    /// shown until the user picks a step.
    pub fn new(grid: CellGrid) -> StepController {
        StepController::with_engine(grid, SearchEngine::new())
    }

    pub fn with_engine(grid: CellGrid, engine: SearchEngine) -> StepController {
        let mut controller = StepController {
            grid,
            engine,
            step: usize::MAX,
            max_steps: 0,
            path: Vec::new(),
            stroke: None,
        };
        controller.tick();
        controller
    }

    pub fn from_config<R: Rng>(
        config: &GridConfig,
        rng: &mut R,
    ) -> Result<StepController, GridError> {
        Ok(StepController::new(CellGrid::from_config(config, rng)?))
    }

    /// Recomputes the search on the current grid and returns the clamped step.
    pub fn tick(&mut self) -> usize {
        self.max_steps = self.engine.run(&mut self.grid, self.step);
        if self.step > self.max_steps {
            // Redo the run so the display matches the clamped step exactly.
            self.step = self.max_steps;
            self.engine.run(&mut self.grid, self.step);
        }
        self.path = backtrack(&self.grid, self.grid.end());
        self.step
    }

    /// Sets the step from slider or keyboard input. Negative steps become 0, steps beyond the
    /// search are clamped to `max_steps` on the next tick.
    pub fn set_step(&mut self, step: i64) {
        self.step = usize::try_from(step.max(0)).unwrap_or(usize::MAX);
    }

    pub fn step_forward(&mut self) {
        self.step = self.step.saturating_add(1);
    }

    pub fn step_back(&mut self) {
        self.step = self.step.saturating_sub(1);
    }

    pub fn step(&self) -> usize {
        self.step
    }

    /// Number of steps the last search needed, the upper bound of the step slider.
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// The path visible at the current step, empty while the end has not been reached.
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut SearchEngine {
        &mut self.engine
    }

    pub fn frontier_snapshot(&self) -> &[Point] {
        self.engine.frontier_snapshot()
    }

    pub fn toggle_wall(&mut self, pos: Point) -> Result<CellKind, GridError> {
        self.grid.toggle_wall(pos)
    }

    pub fn move_start(&mut self, pos: Point) -> Result<(), GridError> {
        self.grid.set_start(pos)
    }

    pub fn move_end(&mut self, pos: Point) -> Result<(), GridError> {
        self.grid.set_end(pos)
    }

    /// Starts a drag gesture at `pos`, replacing any unfinished one.
    pub fn begin_stroke(&mut self, pos: Point) -> Result<(), GridError> {
        self.stroke = Some(EditStroke::begin(&mut self.grid, pos)?);
        Ok(())
    }

    /// Continues the current gesture. Without an active gesture nothing happens.
    pub fn extend_stroke(&mut self, pos: Point) -> Result<bool, GridError> {
        match self.stroke.as_mut() {
            Some(stroke) => stroke.extend(&mut self.grid, pos),
            None => Ok(false),
        }
    }

    /// Ends the current gesture and returns the cells it painted.
    pub fn finish_stroke(&mut self) -> Vec<Point> {
        self.stroke.take().map(EditStroke::finish).unwrap_or_default()
    }

    pub fn is_stroking(&self) -> bool {
        self.stroke.is_some()
    }

    /// Replaces the map with a freshly built one and shows its complete search again.
    pub fn regenerate<R: Rng>(
        &mut self,
        config: &GridConfig,
        rng: &mut R,
    ) -> Result<(), GridError> {
        self.grid = CellGrid::from_config(config, rng)?;
        info!("Regenerated {}x{} map", self.grid.width(), self.grid.height());
        self.stroke = None;
        self.step = usize::MAX;
        let step = self.tick();
        debug!("New map needs {} steps", step);
        Ok(())
    }
}
