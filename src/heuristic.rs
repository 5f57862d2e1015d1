use grid_util::point::Point;

/// Distance estimates between two grid positions. [Heuristic::Manhattan] is the one that matches
/// the 4-connected unit-cost grid exactly; the others are admissible but less informed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Heuristic {
    #[default]
    Manhattan,
    Euclidean,
    /// Mean of the Manhattan and Euclidean distance.
    Combined,
}

impl Heuristic {
    pub fn estimate(&self, a: &Point, b: &Point) -> f64 {
        match self {
            Heuristic::Manhattan => manhattan(a, b),
            Heuristic::Euclidean => euclidean(a, b),
            Heuristic::Combined => (manhattan(a, b) + euclidean(a, b)) / 2.0,
        }
    }
}

/// `|ax - bx| + |ay - by|`
pub fn manhattan(a: &Point, b: &Point) -> f64 {
    a.manhattan_distance(b) as f64
}

pub fn euclidean(a: &Point, b: &Point) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    dx.hypot(dy)
}
