/// Pair search: every unordered pair of points closer than a threshold
use log::trace;
use std::collections::HashMap;

use crate::geometry::Point;

/// Strategy used to enumerate close pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BondSearch {
    /// Test every unordered pair, O(n^2)
    #[default]
    Exhaustive,
    /// Bucket points into cubes of edge `threshold` and test the 27 surrounding buckets
    Grid,
}

/// A pair `(a, b)` with `a < b` and the distance between them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pair {
    pub a: usize,
    pub b: usize,
    pub distance: f64,
}

/// All pairs with `distance < threshold`, sorted by `(a, b)`.
/// Both strategies return identical output.
pub fn pairs_within(points: &[Point], threshold: f64, search: BondSearch) -> Vec<Pair> {
    trace!(
        "pair search: {:?} over {} points, threshold {}",
        search,
        points.len(),
        threshold
    );
    match search {
        BondSearch::Exhaustive => exhaustive(points, threshold),
        BondSearch::Grid => bucketed(points, threshold),
    }
}

fn exhaustive(points: &[Point], threshold: f64) -> Vec<Pair> {
    let mut pairs = Vec::new();
    for (a, pa) in points.iter().enumerate() {
        for (offset, pb) in points[a + 1..].iter().enumerate() {
            let distance = (pb - pa).norm();
            if distance < threshold {
                pairs.push(Pair {
                    a,
                    b: a + 1 + offset,
                    distance,
                });
            }
        }
    }
    pairs
}

type BucketKey = (i64, i64, i64);

/// Largest `|coordinate| / edge` for which bucket indices stay exact in f64
/// and neighbouring indices cannot overflow i64
const MAX_BUCKET_INDEX: f64 = (1u64 << 52) as f64;

/// Whether every point maps to an exact, non-saturated bucket
fn buckets_fit(points: &[Point], edge: f64) -> bool {
    points
        .iter()
        .flat_map(|p| p.coords.iter())
        .all(|c| (c / edge).abs() < MAX_BUCKET_INDEX)
}

fn bucket_of(point: &Point, edge: f64) -> BucketKey {
    (
        (point.x / edge).floor() as i64,
        (point.y / edge).floor() as i64,
        (point.z / edge).floor() as i64,
    )
}

fn bucketed(points: &[Point], threshold: f64) -> Vec<Pair> {
    if !buckets_fit(points, threshold) {
        trace!("coordinates too large for threshold {}, scanning all pairs", threshold);
        return exhaustive(points, threshold);
    }

    let mut buckets: HashMap<BucketKey, Vec<usize>> = HashMap::new();
    for (index, point) in points.iter().enumerate() {
        buckets
            .entry(bucket_of(point, threshold))
            .or_default()
            .push(index);
    }

    let mut pairs = Vec::new();
    for (a, pa) in points.iter().enumerate() {
        let (bx, by, bz) = bucket_of(pa, threshold);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(members) = buckets.get(&(bx + dx, by + dy, bz + dz)) else {
                        continue;
                    };
                    for &b in members.iter().filter(|&&b| b > a) {
                        let distance = (points[b] - pa).norm();
                        if distance < threshold {
                            pairs.push(Pair { a, b, distance });
                        }
                    }
                }
            }
        }
    }
    pairs.sort_by(|p, q| (p.a, p.b).cmp(&(q.a, q.b)));
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize, step: f64) -> Vec<Point> {
        (0..n).map(|i| Point::new(i as f64 * step, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_threshold_is_strict() {
        let points = line(3, 1.0);
        let pairs = pairs_within(&points, 1.0, BondSearch::Exhaustive);
        assert!(pairs.is_empty());
        let pairs = pairs_within(&points, 1.01, BondSearch::Exhaustive);
        assert_eq!(pairs.len(), 2);
        assert_eq!((pairs[0].a, pairs[0].b), (0, 1));
        assert_eq!((pairs[1].a, pairs[1].b), (1, 2));
    }

    #[test]
    fn test_grid_matches_exhaustive() {
        let mut points = line(10, 0.7);
        points.push(Point::new(-0.3, 0.4, -0.2));
        points.push(Point::new(3.1, -0.5, 0.9));
        for threshold in [0.5, 1.0, 1.5, 3.0] {
            assert_eq!(
                pairs_within(&points, threshold, BondSearch::Exhaustive),
                pairs_within(&points, threshold, BondSearch::Grid)
            );
        }
    }

    #[test]
    fn test_grid_handles_extreme_ratios() {
        let points = line(4, 1.0);
        assert!(!buckets_fit(&points, 1e-19));
        assert!(pairs_within(&points, 1e-19, BondSearch::Grid).is_empty());

        let far = vec![
            Point::new(-1e20, 0.0, 0.0),
            Point::new(-1e20 + 0.5, 0.0, 0.0),
            Point::new(1e20, 1e20, -1e20),
        ];
        let pairs = pairs_within(&far, 1.8, BondSearch::Grid);
        assert_eq!(pairs, pairs_within(&far, 1.8, BondSearch::Exhaustive));
    }

    #[test]
    fn test_empty_input() {
        assert!(pairs_within(&[], 1.0, BondSearch::Grid).is_empty());
        assert!(pairs_within(&[], 1.0, BondSearch::Exhaustive).is_empty());
    }
}
