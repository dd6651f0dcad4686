//! Guarded boolean operations.
//!
//! The boolean kernel can choke on malformed input (non-finite coordinates,
//! collapsed rings). Rather than let that escape, every operation reports a
//! [`GeometryOutcome`] and the caller decides what to fall back to.

use std::panic::{catch_unwind, AssertUnwindSafe};

use geo::{BooleanOps, ChamberlainDuquetteArea, MultiPolygon, Polygon};

/// Result of a guarded geometry operation
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryOutcome {
    Done(MultiPolygon<f64>),
    /// The operation succeeded but produced nothing
    Empty,
    /// The operation could not be carried out; keep the previous geometry
    Failed(String),
}

impl GeometryOutcome {
    fn from_result(result: MultiPolygon<f64>) -> Self {
        if result.0.is_empty() {
            GeometryOutcome::Empty
        } else {
            GeometryOutcome::Done(result)
        }
    }
}

/// Check that a shape can be fed to the boolean kernel.
pub fn check_operable(shape: &MultiPolygon<f64>) -> Result<(), String> {
    if shape.0.is_empty() {
        return Err("empty geometry".to_string());
    }
    for polygon in shape.iter() {
        if polygon.exterior().0.len() < 4 {
            return Err("exterior ring with fewer than 4 positions".to_string());
        }
        let finite = std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .flat_map(|ring| ring.coords())
            .all(|c| c.x.is_finite() && c.y.is_finite());
        if !finite {
            return Err("non-finite coordinate".to_string());
        }
    }
    Ok(())
}

fn guarded<F>(operation: &str, run: F) -> GeometryOutcome
where
    F: FnOnce() -> MultiPolygon<f64>,
{
    match catch_unwind(AssertUnwindSafe(run)) {
        Ok(result) => GeometryOutcome::from_result(result),
        Err(_) => GeometryOutcome::Failed(format!("{} panicked", operation)),
    }
}

pub fn intersect(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> GeometryOutcome {
    if let Err(reason) = check_operable(a).and_then(|_| check_operable(b)) {
        return GeometryOutcome::Failed(reason);
    }
    guarded("intersection", || a.intersection(b))
}

/// Union of two non-empty shapes. An empty answer counts as a failure.
pub fn union(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> GeometryOutcome {
    if let Err(reason) = check_operable(a).and_then(|_| check_operable(b)) {
        return GeometryOutcome::Failed(reason);
    }
    match guarded("union", || a.union(b)) {
        GeometryOutcome::Empty => GeometryOutcome::Failed("union came back empty".to_string()),
        outcome => outcome,
    }
}

/// Zero-width repair: re-node the shape through the boolean kernel, which
/// splits self-intersections and drops collapsed slivers.
pub fn repair(shape: &MultiPolygon<f64>) -> GeometryOutcome {
    if let Err(reason) = check_operable(shape) {
        return GeometryOutcome::Failed(reason);
    }
    guarded("repair", || shape.union(&MultiPolygon::new(Vec::new())))
}

/// Spherical area in square metres
pub fn area(polygon: &Polygon<f64>) -> f64 {
    polygon.chamberlain_duquette_unsigned_area()
}

/// Largest polygon by area. On ties the earliest wins.
pub fn largest<I>(polygons: I) -> Option<Polygon<f64>>
where
    I: IntoIterator<Item = Polygon<f64>>,
{
    let mut best: Option<(f64, Polygon<f64>)> = None;
    for polygon in polygons {
        let candidate = area(&polygon);
        match &best {
            Some((best_area, _)) if candidate <= *best_area => {}
            _ => best = Some((candidate, polygon)),
        }
    }
    best.map(|(_, polygon)| polygon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, LineString};

    fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (min_x, min_y),
                (max_x, min_y),
                (max_x, max_y),
                (min_x, max_y),
            ]),
            vec![],
        )
    }

    fn multi(polygon: Polygon<f64>) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon])
    }

    #[test]
    fn test_intersect_overlapping() {
        let a = multi(rect(0.0, 0.0, 2.0, 2.0));
        let b = multi(rect(1.0, 1.0, 3.0, 3.0));
        match intersect(&a, &b) {
            GeometryOutcome::Done(result) => assert!((result.unsigned_area() - 1.0).abs() < 1e-9),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_intersect_disjoint_is_empty() {
        let a = multi(rect(0.0, 0.0, 1.0, 1.0));
        let b = multi(rect(5.0, 5.0, 6.0, 6.0));
        assert_eq!(intersect(&a, &b), GeometryOutcome::Empty);
    }

    #[test]
    fn test_non_finite_input_fails() {
        let a = multi(rect(0.0, 0.0, 1.0, 1.0));
        let b = multi(rect(0.0, 0.0, f64::NAN, 1.0));
        assert!(matches!(intersect(&a, &b), GeometryOutcome::Failed(_)));
        assert!(matches!(union(&a, &b), GeometryOutcome::Failed(_)));
        assert!(matches!(repair(&b), GeometryOutcome::Failed(_)));
    }

    #[test]
    fn test_union_adjacent() {
        let a = multi(rect(0.0, 0.0, 1.0, 1.0));
        let b = multi(rect(1.0, 0.0, 2.0, 1.0));
        match union(&a, &b) {
            GeometryOutcome::Done(result) => {
                assert_eq!(result.0.len(), 1);
                assert!((result.unsigned_area() - 2.0).abs() < 1e-9);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_repair_bowtie() {
        let bowtie = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]),
            vec![],
        );
        match repair(&multi(bowtie)) {
            GeometryOutcome::Done(result) => {
                assert!((result.unsigned_area() - 2.0).abs() < 1e-9);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_largest_prefers_first_on_tie() {
        let first = rect(7.0, 48.0, 7.1, 48.1);
        let second = rect(7.0, 48.0, 7.1, 48.1);
        let small = rect(7.0, 48.0, 7.01, 48.01);
        let chosen = largest(vec![small, first.clone(), second]).unwrap();
        assert_eq!(chosen, first);
        assert!(largest(Vec::new()).is_none());
    }
}
