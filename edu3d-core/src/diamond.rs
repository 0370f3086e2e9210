/// Diamond cubic lattice: two interpenetrating FCC lattices with distance-inferred bonds
use log::debug;

use crate::error::{ensure_positive, Result};
use crate::geometry::{Point, Vec3};
use crate::neighbors::{pairs_within, BondSearch};

/// Bond cutoff in absolute units. Not scaled by the lattice constant.
pub const DEFAULT_BOND_THRESHOLD: f64 = 1.8;

/// Lattice constant of diamond carbon, in angstroms
pub const CARBON_LATTICE_CONSTANT: f64 = 3.57;

/// Fractional positions of the four FCC sites in a unit cell
pub const FCC_OFFSETS: [[f64; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [0.0, 0.5, 0.5],
    [0.5, 0.0, 0.5],
    [0.5, 0.5, 0.0],
];

/// Fractional shift of the second FCC sublattice
pub const SUBLATTICE_SHIFT: [f64; 3] = [0.25, 0.25, 0.25];

/// Atoms emitted per unit cell
pub const ATOMS_PER_CELL: usize = 2 * FCC_OFFSETS.len();

/// A carbon atom. Species is uniform, so the position is all there is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atom {
    pub position: Point,
}

/// A bond between atoms `a < b`, identified by their indices in [`DiamondLattice::atoms`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bond {
    pub a: usize,
    pub b: usize,
    pub midpoint: Point,
    /// Unit vector from atom `a` towards atom `b`
    pub direction: Vec3,
    pub length: f64,
}

/// Construction parameters for [`DiamondLattice`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiamondConfig {
    pub cells: [u32; 3],
    pub lattice_constant: f64,
    pub bond_threshold: f64,
    pub bond_search: BondSearch,
}

impl Default for DiamondConfig {
    fn default() -> Self {
        Self {
            cells: [2, 2, 2],
            lattice_constant: CARBON_LATTICE_CONSTANT,
            bond_threshold: DEFAULT_BOND_THRESHOLD,
            bond_search: BondSearch::Exhaustive,
        }
    }
}

impl DiamondConfig {
    pub fn build(&self) -> Result<DiamondLattice> {
        let a = ensure_positive("lattice_constant", self.lattice_constant)?;
        let threshold = ensure_positive("bond_threshold", self.bond_threshold)?;
        let [cx, cy, cz] = self.cells;

        let total_cells = cx as usize * cy as usize * cz as usize;
        let mut atoms = Vec::with_capacity(total_cells * ATOMS_PER_CELL);
        let shift = Vec3::from(SUBLATTICE_SHIFT) * a;

        for x in 0..cx {
            for y in 0..cy {
                for z in 0..cz {
                    let base = Point::new(
                        (x as f64 - cx as f64 / 2.0) * a,
                        (y as f64 - cy as f64 / 2.0) * a,
                        (z as f64 - cz as f64 / 2.0) * a,
                    );
                    for offset in FCC_OFFSETS {
                        let primary = base + Vec3::from(offset) * a;
                        atoms.push(Atom { position: primary });
                        atoms.push(Atom {
                            position: primary + shift,
                        });
                    }
                }
            }
        }

        let positions: Vec<Point> = atoms.iter().map(|atom| atom.position).collect();
        let bonds = pairs_within(&positions, threshold, self.bond_search)
            .into_iter()
            .map(|pair| {
                let (pa, pb) = (positions[pair.a], positions[pair.b]);
                Bond {
                    a: pair.a,
                    b: pair.b,
                    midpoint: nalgebra::center(&pa, &pb),
                    direction: (pb - pa) / pair.distance,
                    length: pair.distance,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            "built diamond lattice {}x{}x{} a={}: atoms={} bonds={}",
            cx,
            cy,
            cz,
            a,
            atoms.len(),
            bonds.len()
        );

        Ok(DiamondLattice {
            cells: self.cells,
            lattice_constant: a,
            bond_threshold: threshold,
            atoms,
            bonds,
        })
    }
}

/// Build a `cells_x x cells_y x cells_z` diamond lattice. Zero cells yields an empty lattice.
pub fn build(
    cells_x: u32,
    cells_y: u32,
    cells_z: u32,
    lattice_constant: f64,
    bond_threshold: f64,
) -> Result<DiamondLattice> {
    DiamondConfig {
        cells: [cells_x, cells_y, cells_z],
        lattice_constant,
        bond_threshold,
        ..DiamondConfig::default()
    }
    .build()
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiamondLattice {
    cells: [u32; 3],
    lattice_constant: f64,
    bond_threshold: f64,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
}

impl DiamondLattice {
    /// Atoms in generation order: per cell, per FCC site, the primary then its shifted partner
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Bonds sorted by `(a, b)`
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn cells(&self) -> [u32; 3] {
        self.cells
    }

    pub fn lattice_constant(&self) -> f64 {
        self.lattice_constant
    }

    pub fn bond_threshold(&self) -> f64 {
        self.bond_threshold
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Indices of atoms bonded to `atom`, ascending
    pub fn neighbors_of(&self, atom: usize) -> Vec<usize> {
        let mut neighbors: Vec<usize> = self
            .bonds
            .iter()
            .filter_map(|bond| match (bond.a == atom, bond.b == atom) {
                (true, _) => Some(bond.b),
                (_, true) => Some(bond.a),
                _ => None,
            })
            .collect();
        neighbors.sort_unstable();
        neighbors
    }

    /// Whether `atom` belongs to the shifted sublattice
    pub fn is_shifted(atom: usize) -> bool {
        atom % 2 == 1
    }
}
