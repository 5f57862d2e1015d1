use astar_stepper::{backtrack, CellGrid, SearchEngine};
use grid_util::point::Point;

// In this example a path is found on a 3x3 grid with shape
//  ___
// |S  |
// | # |
// |  E|
//  ___
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
//
// Nodes have a 4-neighborhood

fn main() {
    let walls = [Point::new(1, 1)];
    let mut grid = CellGrid::with_walls(3, 3, &walls, Point::new(0, 0), Point::new(2, 2)).unwrap();
    println!("{}", grid);
    let outcome = SearchEngine::new().fill_shortest_path(&mut grid, None);
    println!("Expanded {} cells", outcome.expansions);
    println!("Path:");
    for p in backtrack(&grid, grid.end()) {
        println!("{:?}", p);
    }
}
