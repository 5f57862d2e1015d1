//! Procedural maps.
use grid_util::point::Point;
use log::info;
use rand::Rng;

/// Generates the walls of a map split into four quadrants by a wall row at `height / 2` and a wall
/// column at `width / 2`. Each of the four arms of the cross gets one random gap, so every
/// quadrant is connected to its two neighbouring quadrants. Expects at least 3x3 cells.
pub fn generate_cross_walls<R: Rng>(width: usize, height: usize, rng: &mut R) -> Vec<Point> {
    let (w, h) = (width as i32, height as i32);
    let (mid_x, mid_y) = (w / 2, h / 2);
    let gaps = [
        Point::new(rng.gen_range(0..mid_x), mid_y),
        Point::new(rng.gen_range(mid_x + 1..w), mid_y),
        Point::new(mid_x, rng.gen_range(0..mid_y)),
        Point::new(mid_x, rng.gen_range(mid_y + 1..h)),
    ];
    info!("Generating cross map of {}x{} with gaps {:?}", width, height, gaps);
    let row = (0..w).map(|x| Point::new(x, mid_y));
    let column = (0..h).filter(|y| *y != mid_y).map(|y| Point::new(mid_x, y));
    row.chain(column).filter(|p| !gaps.contains(p)).collect()
}
