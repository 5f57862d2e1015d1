use astar_stepper::{CellGrid, GridConfig, StepController};
use grid_util::point::Point;
use rand::rngs::StdRng;
use rand::SeedableRng;

// Steps through the search on a generated map, printing the distance known for each cell after
// every step, like a visualizer would while the user drags the step slider. Unreached cells
// show as `..`, walls as `##`. The cell expanded last is wrapped in brackets.

fn print_distances(grid: &CellGrid) {
    for y in 0..grid.height() as i32 {
        let row = (0..grid.width() as i32)
            .map(|x| {
                let cell = grid.at(Point::new(x, y));
                let label = if cell.is_wall() {
                    "##".to_owned()
                } else if cell.is_reached() {
                    format!("{:2}", cell.distance())
                } else {
                    "..".to_owned()
                };
                if cell.is_current() {
                    format!("[{}]", label)
                } else {
                    format!(" {} ", label)
                }
            })
            .collect::<String>();
        println!("{}", row);
    }
}

fn main() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut controller = StepController::from_config(&GridConfig::auto(9, 9), &mut rng).unwrap();
    println!("{}", controller.grid());
    let max_steps = controller.max_steps();
    for step in 0..=max_steps {
        controller.set_step(step as i64);
        controller.tick();
        println!(
            "Step {}/{}, frontier {:?}",
            step,
            max_steps,
            controller.frontier_snapshot()
        );
        print_distances(controller.grid());
    }
    println!("Path: {:?}", controller.path());
}
