use grid_astar::{Grid, GridError, PathFinder};

// In this demo a path is found on a 3x3 grid with shape
//  ___
// |S  |
// | # |
// |  E|
//  ---
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
//
// Cells have an 8-neighbourhood, so the route slips around the obstacle
// diagonally.

fn main() -> Result<(), GridError> {
    let mut grid = Grid::new(3, 3, 32.0, 32.0)?;
    grid.set_walkable(1, 1, false)?;
    println!("{}", grid);
    let finder = PathFinder::new();
    if let Some(path) = finder.find_path(&grid, grid.first(), grid.last()) {
        println!("Path:");
        for cell in path {
            println!("{}", cell);
        }
    }
    Ok(())
}
