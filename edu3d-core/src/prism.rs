/// Rectangular prism of unit cells classified by how many outer faces they touch
use log::debug;

use crate::error::{ensure_nonzero, ensure_positive, Result};
use crate::geometry::Point;

/// Visual category of a cell, derived from its exposed-face count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellCategory {
    Corner,
    Edge,
    Face,
    Interior,
}

impl CellCategory {
    pub const ALL: [CellCategory; 4] = [
        CellCategory::Corner,
        CellCategory::Edge,
        CellCategory::Face,
        CellCategory::Interior,
    ];

    /// 3 -> corner, 2 -> edge, 1 -> face, 0 -> interior
    pub fn from_exposed_faces(count: u8) -> Self {
        match count {
            3.. => CellCategory::Corner,
            2 => CellCategory::Edge,
            1 => CellCategory::Face,
            0 => CellCategory::Interior,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CellCategory::Corner => "corner",
            CellCategory::Edge => "edge",
            CellCategory::Face => "face",
            CellCategory::Interior => "interior",
        }
    }
}

impl std::fmt::Display for CellCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub coord: [u32; 3],
    pub exposed_faces: u8,
    pub category: CellCategory,
    pub center: Point,
}

/// Number of axes on which `coord` sits on the first or last layer of `dims`.
/// A single-layer axis counts once.
pub fn exposed_face_count(coord: [u32; 3], dims: [u32; 3]) -> u8 {
    coord
        .iter()
        .zip(dims.iter())
        .filter(|&(&c, &d)| c == 0 || c + 1 == d)
        .count() as u8
}

/// Center of cell `coord` along one axis, with the whole grid centered at the origin
fn axis_position(coord: u32, dim: u32, pitch: f64) -> f64 {
    coord as f64 * pitch - (dim as f64 * pitch) / 2.0 + pitch / 2.0
}

/// Construction parameters for [`PrismGrid`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrismConfig {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub cube_size: f64,
    pub spacing: f64,
}

impl Default for PrismConfig {
    fn default() -> Self {
        Self {
            width: 2,
            height: 5,
            depth: 11,
            cube_size: 1.0,
            spacing: 0.2,
        }
    }
}

impl PrismConfig {
    pub fn build(&self) -> Result<PrismGrid> {
        let dims = [
            ensure_nonzero("width", self.width)?,
            ensure_nonzero("height", self.height)?,
            ensure_nonzero("depth", self.depth)?,
        ];
        let cube_size = ensure_positive("cube_size", self.cube_size)?;
        let spacing = ensure_positive("spacing", self.spacing)?;
        let pitch = cube_size + spacing;

        let [w, h, d] = dims;
        let mut cells = Vec::with_capacity(w as usize * h as usize * d as usize);
        for x in 0..w {
            for y in 0..h {
                for z in 0..d {
                    let coord = [x, y, z];
                    let exposed_faces = exposed_face_count(coord, dims);
                    cells.push(Cell {
                        coord,
                        exposed_faces,
                        category: CellCategory::from_exposed_faces(exposed_faces),
                        center: Point::new(
                            axis_position(x, w, pitch),
                            axis_position(y, h, pitch),
                            axis_position(z, d, pitch),
                        ),
                    });
                }
            }
        }

        let grid = PrismGrid {
            dims,
            cube_size,
            spacing,
            cells,
        };
        debug!(
            "built prism grid {}x{}x{}: corner={} edge={} face={} interior={}",
            w,
            h,
            d,
            grid.count_by_category(CellCategory::Corner),
            grid.count_by_category(CellCategory::Edge),
            grid.count_by_category(CellCategory::Face),
            grid.count_by_category(CellCategory::Interior)
        );
        Ok(grid)
    }
}

/// Build a `width x height x depth` grid of cubes of edge `cube_size` separated by `spacing`
pub fn build(width: u32, height: u32, depth: u32, cube_size: f64, spacing: f64) -> Result<PrismGrid> {
    PrismConfig {
        width,
        height,
        depth,
        cube_size,
        spacing,
    }
    .build()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrismGrid {
    dims: [u32; 3],
    cube_size: f64,
    spacing: f64,
    cells: Vec<Cell>,
}

impl PrismGrid {
    /// Cells in ascending x, then y, then z order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn dims(&self) -> [u32; 3] {
        self.dims
    }

    pub fn cube_size(&self) -> f64 {
        self.cube_size
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, coord: [u32; 3]) -> Option<&Cell> {
        let [w, h, d] = self.dims;
        let [x, y, z] = coord;
        if x >= w || y >= h || z >= d {
            return None;
        }
        let index = (x as usize * h as usize + y as usize) * d as usize + z as usize;
        self.cells.get(index)
    }

    pub fn count_by_category(&self, category: CellCategory) -> usize {
        self.cells.iter().filter(|c| c.category == category).count()
    }

    pub fn count_with_exposed(&self, exposed_faces: u8) -> usize {
        self.cells
            .iter()
            .filter(|c| c.exposed_faces == exposed_faces)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryError;

    #[test]
    fn test_reference_grid() {
        let grid = build(2, 5, 11, 1.0, 0.2).unwrap();
        assert_eq!(grid.len(), 110);
        assert_eq!(grid.count_with_exposed(3), 8);
        assert_eq!(grid.count_with_exposed(0), 0);
        // Edges: 4 along z (9 inner each) + 4 along y (3 inner each); x has no inner cells
        assert_eq!(grid.count_by_category(CellCategory::Edge), 4 * 9 + 4 * 3);
        assert_eq!(grid.count_by_category(CellCategory::Face), 2 * 3 * 9);
    }

    #[test]
    fn test_interior_cells() {
        let grid = build(4, 4, 4, 1.0, 0.5).unwrap();
        assert_eq!(grid.count_by_category(CellCategory::Interior), 8);
        let cell = grid.get([1, 2, 1]).unwrap();
        assert_eq!(cell.category, CellCategory::Interior);
        assert_eq!(grid.get([0, 0, 3]).unwrap().category, CellCategory::Corner);
        assert!(grid.get([4, 0, 0]).is_none());
    }

    #[test]
    fn test_grid_is_centered() {
        let grid = build(3, 2, 5, 1.0, 0.2).unwrap();
        let sum = grid
            .cells()
            .iter()
            .fold(nalgebra::Vector3::zeros(), |acc, c| acc + c.center.coords);
        assert!(sum.norm() < 1e-9);

        // Neighbouring centers are one pitch apart
        let a = grid.get([0, 0, 0]).unwrap().center;
        let b = grid.get([1, 0, 0]).unwrap().center;
        assert!(((b - a).norm() - 1.2).abs() < 1e-12);
        assert!((a.x + 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_single_layer_axis() {
        assert_eq!(exposed_face_count([0, 0, 0], [1, 1, 1]), 3);
        assert_eq!(exposed_face_count([0, 1, 1], [1, 3, 3]), 1);
    }

    #[test]
    fn test_category_names() {
        assert_eq!(CellCategory::from_exposed_faces(3).as_str(), "corner");
        assert_eq!(CellCategory::from_exposed_faces(2).to_string(), "edge");
        assert_eq!(CellCategory::from_exposed_faces(1), CellCategory::Face);
        assert_eq!(CellCategory::from_exposed_faces(0), CellCategory::Interior);
    }

    #[test]
    fn test_rejects_invalid_arguments() {
        assert_eq!(
            build(0, 5, 11, 1.0, 0.2).unwrap_err(),
            GeometryError::ZeroDimension { name: "width" }
        );
        assert!(build(2, 5, 0, 1.0, 0.2).is_err());
        assert!(build(2, 5, 11, -1.0, 0.2).is_err());
        assert!(build(2, 5, 11, 1.0, 0.0).is_err());
    }
}
