use grid_astar::{Grid, GridError, PathFinder};

// Mouse-style picking: two pixel positions are converted into their cells
// and a route is searched between them. The grid spans 8x5 tiles of 64x32
// pixels, with a wall down the middle column except for a gap at the top.

fn main() -> Result<(), GridError> {
    let mut grid = Grid::new(8, 5, 64.0, 32.0)?;
    for row in 1..5 {
        grid.set_walkable(4, row, false)?;
    }
    println!("{}", grid);

    let start = grid.cell_at_pixel(33.0, 140.0)?;
    let goal = grid.cell_at_pixel(470.0, 150.0)?;
    println!("picked {} and {}", start, goal);

    let finder = PathFinder::new();
    match finder.find_path(&grid, start, goal) {
        Some(path) => {
            println!("Path:");
            for cell in path {
                println!("{}", cell);
            }
        }
        None => println!("no route"),
    }

    // A click outside the canvas is an error, not a clamped cell.
    assert!(grid.cell_at_pixel(-4.0, 10.0).is_err());
    Ok(())
}
