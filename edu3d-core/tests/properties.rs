//! Property-based tests for the model builders.
//!
//! Run with: cargo test -p edu3d-core --test properties

use edu3d_core::geometry::{dedup_points, PointKey};
use edu3d_core::neighbors::{pairs_within, BondSearch};
use edu3d_core::prism::exposed_face_count;
use edu3d_core::{diamond, prism, tetrahedron, CellCategory, DiamondConfig, Point};
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    #[test]
    fn cluster_shares_vertices(scale in 0.01f64..100.0) {
        let cluster = tetrahedron::build(scale).unwrap();
        prop_assert_eq!(cluster.tetrahedra().len(), 5);

        let all: Vec<Point> = cluster
            .tetrahedra()
            .iter()
            .flat_map(|t| t.vertices().iter().copied())
            .collect();
        prop_assert_eq!(all.len(), 20);
        let unique = dedup_points(&all);
        prop_assert!(unique.len() < 20);
        prop_assert_eq!(unique.len(), 8);

        for derived in cluster.derived() {
            prop_assert_eq!(derived.shared_vertex_count(cluster.central()), 3);
        }
    }

    #[test]
    fn cluster_is_idempotent(scale in 0.01f64..100.0) {
        prop_assert_eq!(tetrahedron::build(scale).unwrap(), tetrahedron::build(scale).unwrap());
    }

    #[test]
    fn prism_cells_are_complete_and_classified(
        w in 1u32..7,
        h in 1u32..7,
        d in 1u32..7,
        size in 0.1f64..3.0,
        spacing in 0.01f64..1.0,
    ) {
        let grid = prism::build(w, h, d, size, spacing).unwrap();
        prop_assert_eq!(grid.len(), (w * h * d) as usize);

        let coords: HashSet<[u32; 3]> = grid.cells().iter().map(|c| c.coord).collect();
        prop_assert_eq!(coords.len(), grid.len());

        for cell in grid.cells() {
            prop_assert!(cell.exposed_faces <= 3);
            prop_assert_eq!(cell.exposed_faces, exposed_face_count(cell.coord, [w, h, d]));
            prop_assert_eq!(cell.category, CellCategory::from_exposed_faces(cell.exposed_faces));
        }

        let interior = (w.saturating_sub(2) * h.saturating_sub(2) * d.saturating_sub(2)) as usize;
        prop_assert_eq!(grid.count_with_exposed(0), interior);
        prop_assert_eq!(grid, prism::build(w, h, d, size, spacing).unwrap());
    }

    #[test]
    fn lattice_bonds_are_exact(
        cx in 0u32..3,
        cy in 0u32..3,
        cz in 0u32..3,
        a in 2.0f64..5.0,
        threshold in 0.5f64..3.0,
    ) {
        let lattice = diamond::build(cx, cy, cz, a, threshold).unwrap();
        let atoms = lattice.atoms();
        prop_assert_eq!(atoms.len(), 8 * (cx * cy * cz) as usize);

        let bonded: HashSet<(usize, usize)> =
            lattice.bonds().iter().map(|b| (b.a, b.b)).collect();
        prop_assert_eq!(bonded.len(), lattice.bonds().len());

        for i in 0..atoms.len() {
            for j in i + 1..atoms.len() {
                let close = (atoms[i].position - atoms[j].position).norm() < threshold;
                prop_assert_eq!(close, bonded.contains(&(i, j)));
            }
        }

        let grid = DiamondConfig {
            cells: [cx, cy, cz],
            lattice_constant: a,
            bond_threshold: threshold,
            bond_search: BondSearch::Grid,
        }
        .build()
        .unwrap();
        prop_assert_eq!(grid, lattice);
    }

    #[test]
    fn grid_search_matches_exhaustive(
        points in prop::collection::vec(prop::array::uniform3(-10.0f64..10.0), 0..60),
        threshold in 0.1f64..5.0,
    ) {
        let points: Vec<Point> = points.into_iter().map(|[x, y, z]| Point::new(x, y, z)).collect();
        prop_assert_eq!(
            pairs_within(&points, threshold, BondSearch::Exhaustive),
            pairs_within(&points, threshold, BondSearch::Grid)
        );
    }

    #[test]
    fn point_keys_ignore_sub_precision_noise(
        p in prop::array::uniform3(-1000.0f64..1000.0),
    ) {
        let base = Point::new(p[0], p[1], p[2]).map(|c| (c * 1e6).round() / 1e6);
        let noisy = base.map(|c| c + 1e-9);
        prop_assert_eq!(PointKey::new(&base), PointKey::new(&noisy));
    }
}

#[test]
fn reference_prism_golden_counts() {
    let grid = prism::build(2, 5, 11, 1.0, 0.2).unwrap();
    assert_eq!(grid.len(), 110);
    assert_eq!(grid.count_with_exposed(3), 8);
    assert_eq!(grid.count_with_exposed(0), 0);
}

#[test]
fn reference_lattice_golden_counts() {
    let lattice = diamond::build(2, 2, 2, 3.57, 1.8).unwrap();
    assert_eq!(lattice.atoms().len(), 64);
    assert!(lattice
        .bonds()
        .iter()
        .all(|bond| bond.length < lattice.bond_threshold()));
}

#[test]
fn empty_lattice_is_valid() {
    let lattice = diamond::build(0, 0, 0, 3.57, 1.8).unwrap();
    assert!(lattice.atoms().is_empty());
    assert!(lattice.bonds().is_empty());
}
