//! Voronoi tessellation bounded by a fixed rectangle.
//!
//! Neighbours come from a Delaunay triangulation; each cell is the bounding
//! rectangle cut by the perpendicular bisector towards every neighbour.

use geo::{Coord, LineString, Point, Polygon, Rect};
use hashbrown::HashSet;
use spade::{DelaunayTriangulation, Point2, Triangulation};
use tracing::debug;

/// Fewest sites a diagram is built for
pub const MIN_SITES: usize = 2;

/// One cell per site, in site order.
///
/// A site that repeats an earlier position, or that the triangulation
/// rejects, gets `None`. Fewer than [`MIN_SITES`] sites yield an empty vector.
pub fn voronoi_cells(sites: &[Point<f64>], bbox: &Rect<f64>) -> Vec<Option<Polygon<f64>>> {
    if sites.len() < MIN_SITES {
        return Vec::new();
    }

    let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
    let handles: Vec<_> = sites
        .iter()
        .map(|site| match triangulation.insert(Point2::new(site.x(), site.y())) {
            Ok(handle) => Some(handle),
            Err(err) => {
                debug!("Site ({}, {}) rejected: {:?}", site.x(), site.y(), err);
                None
            }
        })
        .collect();

    let mut claimed = HashSet::new();
    handles
        .iter()
        .zip(sites)
        .map(|(handle, site)| {
            let handle = (*handle)?;
            // Duplicates share a vertex; the first occurrence owns the cell
            if !claimed.insert(handle) {
                return None;
            }
            let neighbours: Vec<Coord<f64>> = triangulation
                .vertex(handle)
                .out_edges()
                .map(|edge| {
                    let p = edge.to().position();
                    Coord { x: p.x, y: p.y }
                })
                .collect();
            bounded_cell(site.0, &neighbours, bbox)
        })
        .collect()
}

fn bounded_cell(site: Coord<f64>, neighbours: &[Coord<f64>], bbox: &Rect<f64>) -> Option<Polygon<f64>> {
    let (min, max) = (bbox.min(), bbox.max());
    let mut ring = vec![
        min,
        Coord { x: max.x, y: min.y },
        max,
        Coord { x: min.x, y: max.y },
    ];

    for other in neighbours {
        ring = clip_to_bisector(&ring, site, *other);
        if ring.len() < 3 {
            return None;
        }
    }

    Some(Polygon::new(LineString::new(ring), vec![]))
}

/// Keep the part of a convex ring that is at least as close to `site` as to `other`.
fn clip_to_bisector(ring: &[Coord<f64>], site: Coord<f64>, other: Coord<f64>) -> Vec<Coord<f64>> {
    let normal = Coord {
        x: other.x - site.x,
        y: other.y - site.y,
    };
    let mid = Coord {
        x: (site.x + other.x) / 2.0,
        y: (site.y + other.y) / 2.0,
    };
    let side = |c: Coord<f64>| (c.x - mid.x) * normal.x + (c.y - mid.y) * normal.y;

    let mut clipped = Vec::with_capacity(ring.len() + 1);
    for (i, &current) in ring.iter().enumerate() {
        let next = ring[(i + 1) % ring.len()];
        let (s_current, s_next) = (side(current), side(next));

        if s_current <= 0.0 {
            clipped.push(current);
        }
        let crosses = (s_current < 0.0 && s_next > 0.0) || (s_current > 0.0 && s_next < 0.0);
        if crosses {
            let t = s_current / (s_current - s_next);
            clipped.push(Coord {
                x: current.x + t * (next.x - current.x),
                y: current.y + t * (next.y - current.y),
            });
        }
    }
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, BoundingRect, Contains};

    fn bbox() -> Rect<f64> {
        Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 10.0, y: 10.0 })
    }

    #[test]
    fn test_too_few_sites() {
        assert!(voronoi_cells(&[], &bbox()).is_empty());
        assert!(voronoi_cells(&[Point::new(1.0, 1.0)], &bbox()).is_empty());
    }

    #[test]
    fn test_two_sites_split_rectangle() {
        let sites = [Point::new(2.0, 5.0), Point::new(8.0, 5.0)];
        let cells = voronoi_cells(&sites, &bbox());
        assert_eq!(cells.len(), 2);

        let left = cells[0].as_ref().unwrap();
        let right = cells[1].as_ref().unwrap();
        assert!((left.unsigned_area() - 50.0).abs() < 1e-9);
        assert!((right.unsigned_area() - 50.0).abs() < 1e-9);
        assert!((left.bounding_rect().unwrap().max().x - 5.0).abs() < 1e-9);
        assert!(left.contains(&sites[0]));
        assert!(right.contains(&sites[1]));
    }

    #[test]
    fn test_cells_tile_the_rectangle() {
        let sites = [
            Point::new(1.0, 1.0),
            Point::new(9.0, 2.0),
            Point::new(5.0, 5.0),
            Point::new(2.0, 8.0),
            Point::new(7.5, 8.5),
        ];
        let cells = voronoi_cells(&sites, &bbox());
        let total: f64 = cells.iter().flatten().map(|c| c.unsigned_area()).sum();
        assert!((total - 100.0).abs() < 1e-6);

        for (cell, site) in cells.iter().zip(&sites) {
            assert!(cell.as_ref().unwrap().contains(site));
        }
    }

    #[test]
    fn test_collinear_sites_make_strips() {
        let sites = [
            Point::new(1.0, 5.0),
            Point::new(5.0, 5.0),
            Point::new(9.0, 5.0),
        ];
        let cells = voronoi_cells(&sites, &bbox());
        let areas: Vec<f64> = cells.iter().map(|c| c.as_ref().unwrap().unsigned_area()).collect();
        assert!((areas[0] - 30.0).abs() < 1e-9);
        assert!((areas[1] - 40.0).abs() < 1e-9);
        assert!((areas[2] - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_site_has_no_cell() {
        let sites = [
            Point::new(2.0, 5.0),
            Point::new(8.0, 5.0),
            Point::new(2.0, 5.0),
        ];
        let cells = voronoi_cells(&sites, &bbox());
        assert_eq!(cells.len(), 3);
        assert!(cells[0].is_some());
        assert!(cells[1].is_some());
        assert!(cells[2].is_none());
    }

    #[test]
    fn test_deterministic() {
        let sites = [
            Point::new(1.5, 2.5),
            Point::new(6.0, 1.0),
            Point::new(4.0, 7.0),
        ];
        assert_eq!(voronoi_cells(&sites, &bbox()), voronoi_cells(&sites, &bbox()));
    }
}
