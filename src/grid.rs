use crate::N_NEIGHBOURS;
use core::fmt;
use log::info;
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Offsets of the 8 surrounding cells in neighbour insertion order: east,
/// west, south, north, north-west, north-east, south-east, south-west.
/// Rows grow southward, so south is the `+1` row direction.
const NEIGHBOUR_OFFSETS: [(i32, i32); N_NEIGHBOURS] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (-1, -1),
    (1, -1),
    (1, 1),
    (-1, 1),
];

/// Errors produced by [Grid] construction and lookups.
///
/// The absence of a path is not an error: [find_path](crate::PathFinder::find_path)
/// reports it as [None].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GridError {
    /// Grid dimensions must both be positive.
    #[error("invalid grid dimensions {cols}x{rows}: cols and rows must be positive")]
    InvalidDimension { cols: i32, rows: i32 },
    /// Tile extents must be positive and finite for the pixel mapping to work.
    #[error("invalid tile size {tile_width}x{tile_height}: extents must be positive and finite")]
    InvalidTileSize { tile_width: f32, tile_height: f32 },
    /// A coordinate or pixel lookup landed outside the grid extent.
    #[error("cell ({column}, {row}) is outside the grid")]
    OutOfBounds { column: i32, row: i32 },
}

/// A single tile of a [Grid]: carries its coordinate, dense index and
/// passable state, and lists the ids of its in-bounds neighbours.
///
/// Cells are created by their grid and handed out by reference; the ids in
/// [neighbour_ids](Cell::neighbour_ids) index into [Grid::cells] of the grid
/// that owns them. Adjacency is fixed at grid construction and covers all 8
/// surrounding tiles whether they are walkable or not; filtering blocked
/// tiles is the search's job, so toggling [walkable](Cell::walkable) never
/// rewires the lattice.
#[derive(Clone, Debug)]
pub struct Cell {
    column: i32,
    row: i32,
    id: usize,
    /// Whether this cell may be traversed. The one mutable piece of cell
    /// state; flip it through [Grid::cell_mut] or the walkability helpers.
    pub walkable: bool,
    neighbours: SmallVec<[usize; N_NEIGHBOURS]>,
}

impl Cell {
    fn new(column: i32, row: i32, id: usize, neighbours: SmallVec<[usize; N_NEIGHBOURS]>) -> Cell {
        Cell {
            column,
            row,
            id,
            walkable: true,
            neighbours,
        }
    }

    pub fn column(&self) -> i32 {
        self.column
    }

    pub fn row(&self) -> i32 {
        self.row
    }

    /// Dense index of this cell, always `row * cols + column` in its grid.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Ids of the adjacent cells, in insertion order: east, west, south,
    /// north, north-west, north-east, south-east, south-west (clipped at the
    /// grid border).
    pub fn neighbour_ids(&self) -> &[usize] {
        &self.neighbours
    }
}

/// Cells compare by [id](Cell::id), not by reference identity, so lookups
/// from different moments (or clones of the same grid) compare equal.
impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// A fixed-size lattice of [Cell]s with precomputed 8-directional adjacency.
///
/// Cells are stored row-major and indexed by `id = row * cols + column`.
/// Dimensions and the cell count never change after construction; only the
/// per-cell walkable flags and the tile extents used for pixel mapping do.
/// Changing the dimensions means building a fresh grid, which discards every
/// cell; callers holding start/end cells of the old grid must re-resolve
/// them afterwards.
#[derive(Clone, Debug)]
pub struct Grid {
    cols: i32,
    rows: i32,
    tile_width: f32,
    tile_height: f32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a `cols` x `rows` grid of walkable cells and computes every
    /// cell's neighbour list.
    ///
    /// `tile_width` and `tile_height` are the pixel extents of one cell and
    /// only matter to [cell_at_pixel](Self::cell_at_pixel); they have no
    /// bearing on search semantics.
    pub fn new(cols: i32, rows: i32, tile_width: f32, tile_height: f32) -> Result<Grid, GridError> {
        if cols <= 0 || rows <= 0 {
            return Err(GridError::InvalidDimension { cols, rows });
        }
        check_tile_size(tile_width, tile_height)?;
        let mut cells = Vec::with_capacity(cols as usize * rows as usize);
        for row in 0..rows {
            for column in 0..cols {
                let id = row as usize * cols as usize + column as usize;
                cells.push(Cell::new(column, row, id, neighbour_ids(column, row, cols, rows)));
            }
        }
        info!("generated {}x{} grid with {} cells", cols, rows, cells.len());
        Ok(Grid {
            cols,
            rows,
            tile_width,
            tile_height,
            cells,
        })
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn tile_width(&self) -> f32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> f32 {
        self.tile_height
    }

    /// Pixel extent of the whole grid along the column axis.
    pub fn pixel_width(&self) -> f32 {
        self.cols as f32 * self.tile_width
    }

    /// Pixel extent of the whole grid along the row axis.
    pub fn pixel_height(&self) -> f32 {
        self.rows as f32 * self.tile_height
    }

    /// All cells in id order, e.g. for drawing the lattice and its obstacles.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The cell with id 0, at column 0 of row 0.
    pub fn first(&self) -> &Cell {
        &self.cells[0]
    }

    /// The cell with the highest id, at the last column of the last row.
    pub fn last(&self) -> &Cell {
        &self.cells[self.cells.len() - 1]
    }

    /// Looks up the cell at a coordinate. Out-of-bounds coordinates fail with
    /// [GridError::OutOfBounds]; this is the consistent policy for every
    /// lookup on the grid.
    pub fn cell(&self, column: i32, row: i32) -> Result<&Cell, GridError> {
        if !self.in_bounds(column, row) {
            return Err(GridError::OutOfBounds { column, row });
        }
        Ok(&self.cells[self.index(column, row)])
    }

    /// Mutable counterpart of [cell](Self::cell). Mutating the returned
    /// cell's walkable flag mutates the grid's stored cell, which the next
    /// search observes immediately.
    pub fn cell_mut(&mut self, column: i32, row: i32) -> Result<&mut Cell, GridError> {
        if !self.in_bounds(column, row) {
            return Err(GridError::OutOfBounds { column, row });
        }
        let index = self.index(column, row);
        Ok(&mut self.cells[index])
    }

    /// Maps a pixel position to the cell containing it, computing
    /// `column = floor(x / tile_width)` and `row = floor(y / tile_height)`
    /// and delegating to [cell](Self::cell).
    ///
    /// No clamping is applied: positions outside the grid's pixel extent fail
    /// with [GridError::OutOfBounds], as do non-finite coordinates.
    pub fn cell_at_pixel(&self, x: f32, y: f32) -> Result<&Cell, GridError> {
        let column = (x / self.tile_width).floor();
        let row = (y / self.tile_height).floor();
        // NaN fails every comparison and lands in the error arm.
        if column >= 0.0 && column < self.cols as f32 && row >= 0.0 && row < self.rows as f32 {
            self.cell(column as i32, row as i32)
        } else {
            Err(GridError::OutOfBounds {
                column: column as i32,
                row: row as i32,
            })
        }
    }

    /// Sets the walkable flag of the cell at the given coordinate.
    pub fn set_walkable(&mut self, column: i32, row: i32, walkable: bool) -> Result<(), GridError> {
        self.cell_mut(column, row)?.walkable = walkable;
        Ok(())
    }

    /// Flips the walkable flag of the cell at the given coordinate and
    /// returns the new value.
    pub fn toggle_walkable(&mut self, column: i32, row: i32) -> Result<bool, GridError> {
        let cell = self.cell_mut(column, row)?;
        cell.walkable = !cell.walkable;
        Ok(cell.walkable)
    }

    /// Remaps the pixel extents of a cell, e.g. after a window resize. The
    /// lattice and its walkable flags are untouched.
    pub fn set_tile_size(&mut self, tile_width: f32, tile_height: f32) -> Result<(), GridError> {
        check_tile_size(tile_width, tile_height)?;
        self.tile_width = tile_width;
        self.tile_height = tile_height;
        Ok(())
    }

    fn in_bounds(&self, column: i32, row: i32) -> bool {
        column >= 0 && column < self.cols && row >= 0 && row < self.rows
    }

    fn index(&self, column: i32, row: i32) -> usize {
        row as usize * self.cols as usize + column as usize
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.cols as usize) {
            for cell in row {
                write!(f, "{}", if cell.walkable { '.' } else { '#' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn check_tile_size(tile_width: f32, tile_height: f32) -> Result<(), GridError> {
    if tile_width.is_finite() && tile_width > 0.0 && tile_height.is_finite() && tile_height > 0.0 {
        Ok(())
    } else {
        Err(GridError::InvalidTileSize {
            tile_width,
            tile_height,
        })
    }
}

fn neighbour_ids(column: i32, row: i32, cols: i32, rows: i32) -> SmallVec<[usize; N_NEIGHBOURS]> {
    let mut ids = SmallVec::new();
    for (dc, dr) in NEIGHBOUR_OFFSETS {
        let (nc, nr) = (column + dc, row + dr);
        if nc >= 0 && nc < cols && nr >= 0 && nr < rows {
            ids.push(nr as usize * cols as usize + nc as usize);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_dense_and_row_major() {
        let grid = Grid::new(4, 3, 16.0, 16.0).unwrap();
        assert_eq!(grid.cells().len(), 12);
        for row in 0..3 {
            for column in 0..4 {
                let cell = grid.cell(column, row).unwrap();
                assert_eq!(cell.id(), row as usize * 4 + column as usize);
                assert_eq!((cell.column(), cell.row()), (column, row));
                assert!(cell.walkable);
            }
        }
        assert_eq!(grid.first().id(), 0);
        assert_eq!(grid.last().id(), 11);
    }

    #[test]
    fn rejects_non_positive_dimensions() {
        assert_eq!(
            Grid::new(0, 3, 16.0, 16.0).unwrap_err(),
            GridError::InvalidDimension { cols: 0, rows: 3 }
        );
        assert_eq!(
            Grid::new(5, -1, 16.0, 16.0).unwrap_err(),
            GridError::InvalidDimension { cols: 5, rows: -1 }
        );
    }

    #[test]
    fn rejects_degenerate_tile_sizes() {
        assert!(matches!(
            Grid::new(3, 3, 0.0, 16.0),
            Err(GridError::InvalidTileSize { .. })
        ));
        assert!(matches!(
            Grid::new(3, 3, 16.0, f32::NAN),
            Err(GridError::InvalidTileSize { .. })
        ));
    }

    /// Corner cells touch 3 neighbours, edge cells 5 and interior cells 8,
    /// all within Chebyshev distance 1.
    #[test]
    fn neighbour_counts_on_a_3x3_grid() {
        let grid = Grid::new(3, 3, 8.0, 8.0).unwrap();
        assert_eq!(grid.cell(0, 0).unwrap().neighbour_ids().len(), 3);
        assert_eq!(grid.cell(1, 0).unwrap().neighbour_ids().len(), 5);
        assert_eq!(grid.cell(1, 1).unwrap().neighbour_ids().len(), 8);
        for cell in grid.cells() {
            for &id in cell.neighbour_ids() {
                let neighbour = &grid.cells()[id];
                let dc = (neighbour.column() - cell.column()).abs();
                let dr = (neighbour.row() - cell.row()).abs();
                assert!(dc <= 1 && dr <= 1);
                assert_ne!(neighbour.id(), cell.id());
            }
        }
    }

    /// The interior cell of a 3x3 grid lists its neighbours as east, west,
    /// south, north, north-west, north-east, south-east, south-west.
    #[test]
    fn neighbour_insertion_order() {
        let grid = Grid::new(3, 3, 8.0, 8.0).unwrap();
        assert_eq!(grid.cell(1, 1).unwrap().neighbour_ids(), [5, 3, 7, 1, 0, 2, 8, 6]);
    }

    /// Blocking a cell keeps it in its neighbours' adjacency lists; the
    /// search filters blocked tiles, the grid does not.
    #[test]
    fn neighbours_are_independent_of_walkable() {
        let mut grid = Grid::new(3, 3, 8.0, 8.0).unwrap();
        grid.set_walkable(1, 1, false).unwrap();
        let centre = grid.cell(1, 1).unwrap().id();
        assert!(grid.cell(0, 0).unwrap().neighbour_ids().contains(&centre));
    }

    #[test]
    fn out_of_bounds_lookups_fail() {
        let grid = Grid::new(3, 3, 8.0, 8.0).unwrap();
        assert_eq!(
            grid.cell(3, 0).unwrap_err(),
            GridError::OutOfBounds { column: 3, row: 0 }
        );
        assert_eq!(
            grid.cell(0, -1).unwrap_err(),
            GridError::OutOfBounds { column: 0, row: -1 }
        );
    }

    #[test]
    fn pixel_lookup_floors_into_tiles() {
        let grid = Grid::new(10, 10, 32.0, 32.0).unwrap();
        assert_eq!(grid.cell_at_pixel(0.0, 0.0).unwrap().id(), 0);
        assert_eq!(grid.cell_at_pixel(31.9, 31.9).unwrap().id(), 0);
        let cell = grid.cell_at_pixel(32.0, 0.0).unwrap();
        assert_eq!((cell.column(), cell.row()), (1, 0));
        assert_eq!(grid.cell_at_pixel(319.9, 319.9).unwrap().id(), 99);
        assert!(grid.cell_at_pixel(320.0, 0.0).is_err());
        assert!(grid.cell_at_pixel(-0.1, 0.0).is_err());
        assert!(grid.cell_at_pixel(f32::NAN, 0.0).is_err());
    }

    #[test]
    fn mutations_are_visible_in_later_lookups() {
        let mut grid = Grid::new(3, 3, 8.0, 8.0).unwrap();
        grid.cell_mut(2, 2).unwrap().walkable = false;
        assert!(!grid.cell(2, 2).unwrap().walkable);
        assert!(grid.toggle_walkable(2, 2).unwrap());
        assert!(grid.cell(2, 2).unwrap().walkable);
    }

    /// Cells compare by id, so the same coordinate in two equally sized
    /// grids compares equal regardless of instance or tile size.
    #[test]
    fn cell_equality_follows_ids() {
        let a = Grid::new(3, 3, 8.0, 8.0).unwrap();
        let b = Grid::new(3, 3, 16.0, 16.0).unwrap();
        assert_eq!(a.cell(1, 2).unwrap(), b.cell(1, 2).unwrap());
        assert_ne!(a.cell(0, 0).unwrap(), a.cell(1, 0).unwrap());
    }

    #[test]
    fn tile_size_can_be_remapped() {
        let mut grid = Grid::new(4, 4, 10.0, 10.0).unwrap();
        assert_eq!(grid.cell_at_pixel(35.0, 0.0).unwrap().column(), 3);
        grid.set_tile_size(20.0, 20.0).unwrap();
        assert_eq!(grid.cell_at_pixel(35.0, 0.0).unwrap().column(), 1);
        assert_eq!(grid.pixel_width(), 80.0);
        assert!(grid.set_tile_size(-1.0, 20.0).is_err());
    }

    #[test]
    fn display_renders_blocked_cells() {
        //  ___
        // |.#.|
        // |...|
        //  ---
        let mut grid = Grid::new(3, 2, 8.0, 8.0).unwrap();
        grid.set_walkable(1, 0, false).unwrap();
        assert_eq!(grid.to_string(), ".#.\n...\n");
    }
}
