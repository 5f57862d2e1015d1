use astar_stepper::{CellGrid, GridConfig, StepController};
use rand::rngs::StdRng;
use rand::SeedableRng;

// Loads a map in the line format and reports how many steps the search needs. The map is a
// corridor blocked in the middle, so the search has to go around.

const MAP: &str = "
# corridor with a pillar
size 7 3
start 0 1
end 6 1
wall 3 0
wall 3 1
";

fn main() {
    let config: GridConfig = MAP.parse().unwrap();
    let grid = CellGrid::from_config(&config, &mut StdRng::seed_from_u64(0)).unwrap();
    print!("{}", grid);
    let controller = StepController::new(grid);
    println!(
        "{} steps, path of {} cells: {:?}",
        controller.max_steps(),
        controller.path().len(),
        controller.path()
    );
}
