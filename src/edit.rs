use crate::cell::{CellKind, CellMark};
use crate::cell_grid::CellGrid;
use crate::error::GridError;
use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::IndexSet;
use log::debug;

type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;

/// What a drag gesture does to the cells it passes over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeAction {
    /// The gesture started on the start mark and moves it along.
    DragStart,
    /// The gesture started on the end mark and moves it along.
    DragEnd,
    /// The gesture started on an unmarked cell, which was toggled. Every other cell passed over
    /// is set to the same kind.
    Paint(CellKind),
}

/// A single press-move-release gesture over the grid. Each cell is painted at most once per
/// stroke, so moving back and forth over a cell does not flicker it.
#[derive(Clone, Debug)]
pub struct EditStroke {
    action: StrokeAction,
    painted: FxIndexSet<Point>,
}

impl EditStroke {
    /// Starts a stroke at `pos`, toggling the cell unless it carries a mark.
    pub fn begin(grid: &mut CellGrid, pos: Point) -> Result<EditStroke, GridError> {
        let mark = grid
            .get(pos)
            .map(|c| c.mark())
            .ok_or(GridError::OutOfBounds {
                pos,
                width: grid.width(),
                height: grid.height(),
            })?;
        let mut painted = FxIndexSet::default();
        let action = match mark {
            CellMark::Start => StrokeAction::DragStart,
            CellMark::End => StrokeAction::DragEnd,
            CellMark::None => {
                let kind = grid.toggle_wall(pos)?;
                painted.insert(pos);
                StrokeAction::Paint(kind)
            }
        };
        debug!("Beginning {:?} stroke at ({}, {})", action, pos.x, pos.y);
        Ok(EditStroke { action, painted })
    }

    pub fn action(&self) -> StrokeAction {
        self.action
    }

    /// Continues the stroke onto `pos`. Returns whether the grid changed. Dragging a mark onto
    /// the other mark and painting over marks are ignored.
    pub fn extend(&mut self, grid: &mut CellGrid, pos: Point) -> Result<bool, GridError> {
        let (mark, current_kind) = grid
            .get(pos)
            .map(|c| (c.mark(), c.kind()))
            .ok_or(GridError::OutOfBounds {
                pos,
                width: grid.width(),
                height: grid.height(),
            })?;
        match self.action {
            StrokeAction::DragStart | StrokeAction::DragEnd => {
                let (own, other) = if self.action == StrokeAction::DragStart {
                    (grid.start(), grid.end())
                } else {
                    (grid.end(), grid.start())
                };
                if pos == own || pos == other {
                    return Ok(false);
                }
                if self.action == StrokeAction::DragStart {
                    grid.set_start(pos)?;
                } else {
                    grid.set_end(pos)?;
                }
                Ok(true)
            }
            StrokeAction::Paint(kind) => {
                if self.painted.contains(&pos) || mark != CellMark::None || current_kind == kind {
                    return Ok(false);
                }
                grid.set_kind(pos, kind)?;
                self.painted.insert(pos);
                Ok(true)
            }
        }
    }

    /// Ends the stroke, returning the painted cells in the order they were painted.
    pub fn finish(self) -> Vec<Point> {
        self.painted.into_iter().collect()
    }
}
