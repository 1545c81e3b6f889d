//! Fire perimeter ring maintenance.
//!
//! The front is an ordered, counterclockwise ring of vertices in the local
//! metric frame. After every advance the ring is resampled to keep edge
//! lengths in a working band, crossings are rubber-banded away, and the
//! winding is re-enforced. All loops run over the flat vertex array.

use serde::{Deserialize, Serialize};

use crate::core_types::geom::{unit_to_azimuth, LocalFrame, Vec2};

/// Edges longer than this are subdivided during resampling (m).
pub const EDGE_MAX_M: f64 = 30.0;

/// Adjacent vertices closer than this are merged during resampling (m).
pub const EDGE_MIN_M: f64 = 5.0;

/// Vertex count of the ignition polygon.
pub const IGNITION_VERTICES: usize = 16;

/// Upper bound on rubber-band passes per step. A well-formed front clears
/// its crossings in one or two.
const MAX_CLEANUP_PASSES: usize = 32;

/// A single point on the fire front.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireVertex {
    /// Position in the local metric frame (m east, m north of ignition).
    pub pos: Vec2,
    /// Inactive vertices hold position (locally unburnable or stalled
    /// front segments) but stay on the ring.
    pub active: bool,
}

impl FireVertex {
    fn new(pos: Vec2) -> Self {
        Self { pos, active: true }
    }
}

/// Closed fire front: an ordered CCW ring of vertices.
///
/// Stored open (the closing edge is implicit); exports repeat the first
/// vertex to close the ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirePerimeter {
    vertices: Vec<FireVertex>,
    /// Simulated time this ring corresponds to (minutes since ignition).
    pub step_time_min: f64,
}

impl FirePerimeter {
    /// Seed ring: a small regular polygon around the ignition point.
    pub fn ignition_circle(radius_m: f64) -> Self {
        let r = radius_m.max(1.0);
        let vertices = (0..IGNITION_VERTICES)
            .map(|i| {
                let phi = 2.0 * std::f64::consts::PI * i as f64 / IGNITION_VERTICES as f64;
                FireVertex::new(Vec2::new(r * phi.cos(), r * phi.sin()))
            })
            .collect();
        Self {
            vertices,
            step_time_min: 0.0,
        }
    }

    pub fn vertices(&self) -> &[FireVertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Fewer than three distinct vertices cannot enclose area.
    pub fn is_degenerate(&self) -> bool {
        let mut distinct = 0usize;
        'outer: for (i, v) in self.vertices.iter().enumerate() {
            for w in &self.vertices[..i] {
                if (v.pos - w.pos).norm() < 1e-9 {
                    continue 'outer;
                }
            }
            distinct += 1;
            if distinct >= 3 {
                return false;
            }
        }
        true
    }

    /// True when any coordinate has gone non-finite.
    pub fn has_non_finite(&self) -> bool {
        self.vertices
            .iter()
            .any(|v| !v.pos.x.is_finite() || !v.pos.y.is_finite())
    }

    /// Outward normal azimuth (compass degrees) at every vertex: the
    /// bisector of the two adjacent edge normals. For a CCW ring the
    /// outward normal of edge d is (d.y, -d.x).
    pub fn outward_normals(&self) -> Vec<f64> {
        let n = self.vertices.len();
        let mut normals = Vec::with_capacity(n);
        for i in 0..n {
            let prev = self.vertices[(i + n - 1) % n].pos;
            let here = self.vertices[i].pos;
            let next = self.vertices[(i + 1) % n].pos;

            let e_in = here - prev;
            let e_out = next - here;
            let n_in = edge_normal(e_in);
            let n_out = edge_normal(e_out);

            let mut bisector = n_in + n_out;
            if bisector.norm() < 1e-9 {
                // Spike vertex: the adjacent normals cancel. Fall back to
                // the normal of the chord across the spike.
                bisector = edge_normal(next - prev);
            }
            if bisector.norm() < 1e-9 {
                bisector = Vec2::new(0.0, 1.0);
            }
            normals.push(unit_to_azimuth(bisector));
        }
        normals
    }

    /// Advance each vertex by its displacement. Inactive vertices and
    /// mismatched slices are left untouched.
    pub fn advance(&mut self, displacements: &[Vec2]) {
        if displacements.len() != self.vertices.len() {
            return;
        }
        for (v, d) in self.vertices.iter_mut().zip(displacements) {
            if v.active {
                v.pos += *d;
            }
        }
    }

    /// Keep edge lengths inside the working band: split edges longer than
    /// `EDGE_MAX_M`, then merge runs of vertices closer than `EDGE_MIN_M`.
    pub fn resample(&mut self) {
        if self.vertices.len() < 3 {
            return;
        }

        // Subdivision pass.
        let n = self.vertices.len();
        let mut refined: Vec<FireVertex> = Vec::with_capacity(n);
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            refined.push(a);
            let len = (b.pos - a.pos).norm();
            if len > EDGE_MAX_M {
                let pieces = (len / EDGE_MAX_M).ceil() as usize;
                for k in 1..pieces {
                    let t = k as f64 / pieces as f64;
                    let mut v = FireVertex::new(a.pos + (b.pos - a.pos) * t);
                    v.active = a.active || b.active;
                    refined.push(v);
                }
            }
        }

        // Merge pass: drop vertices that crowd their kept predecessor.
        let mut merged: Vec<FireVertex> = Vec::with_capacity(refined.len());
        for v in refined {
            match merged.last() {
                Some(last) if (v.pos - last.pos).norm() < EDGE_MIN_M => {
                    // Keep an active flag if either vertex carried one.
                    if v.active {
                        if let Some(last) = merged.last_mut() {
                            last.active = true;
                        }
                    }
                }
                _ => merged.push(v),
            }
        }
        // The ring wraps: the last vertex may crowd the first.
        while merged.len() > 3 {
            let first = merged[0].pos;
            let last = merged[merged.len() - 1].pos;
            if (last - first).norm() < EDGE_MIN_M {
                merged.pop();
            } else {
                break;
            }
        }

        if merged.len() >= 3 {
            self.vertices = merged;
        }
    }

    /// Rubber-band cleanup: while any two non-adjacent edges cross,
    /// replace the shorter intervening vertex run with the crossing point.
    /// Returns the number of crossings removed.
    pub fn remove_self_intersections(&mut self) -> usize {
        let mut removed = 0;
        for _ in 0..MAX_CLEANUP_PASSES {
            match self.first_crossing() {
                Some((i, j, x)) => {
                    self.rubber_band(i, j, x);
                    removed += 1;
                    if self.vertices.len() < 3 {
                        break;
                    }
                }
                None => break,
            }
        }
        removed
    }

    /// First pair of non-adjacent crossing edges, with the intersection
    /// point.
    fn first_crossing(&self) -> Option<(usize, usize, Vec2)> {
        let n = self.vertices.len();
        if n < 4 {
            return None;
        }
        for i in 0..n {
            let a1 = self.vertices[i].pos;
            let a2 = self.vertices[(i + 1) % n].pos;
            let (ax_min, ax_max) = minmax(a1.x, a2.x);
            let (ay_min, ay_max) = minmax(a1.y, a2.y);
            for j in (i + 2)..n {
                // Skip the shared-endpoint neighbor, including the wrap
                // between the last and first edges.
                if i == 0 && j == n - 1 {
                    continue;
                }
                let b1 = self.vertices[j].pos;
                let b2 = self.vertices[(j + 1) % n].pos;
                // Bounding-box rejection keeps the pair scan cheap.
                if b1.x.max(b2.x) < ax_min
                    || b1.x.min(b2.x) > ax_max
                    || b1.y.max(b2.y) < ay_min
                    || b1.y.min(b2.y) > ay_max
                {
                    continue;
                }
                if let Some(x) = segment_intersection(a1, a2, b1, b2) {
                    return Some((i, j, x));
                }
            }
        }
        None
    }

    /// Excise the loop between edges `i` and `j` (i < j), replacing the
    /// shorter intervening run with the intersection point.
    fn rubber_band(&mut self, i: usize, j: usize, x: Vec2) {
        let n = self.vertices.len();
        let inner_len = j - i; // vertices i+1..=j
        let outer_len = n - inner_len;

        let crossing = FireVertex::new(x);
        if inner_len <= outer_len {
            // Keep the outer ring: 0..=i, X, j+1..
            let mut kept = Vec::with_capacity(outer_len + 1);
            kept.extend_from_slice(&self.vertices[..=i]);
            kept.push(crossing);
            kept.extend_from_slice(&self.vertices[j + 1..]);
            self.vertices = kept;
        } else {
            // Keep the inner loop: X, i+1..=j
            let mut kept = Vec::with_capacity(inner_len + 1);
            kept.push(crossing);
            kept.extend_from_slice(&self.vertices[i + 1..=j]);
            self.vertices = kept;
        }
    }

    /// Signed shoelace area (m^2); positive for CCW winding.
    pub fn signed_area_m2(&self) -> f64 {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }
        let mut acc = 0.0;
        for i in 0..n {
            let a = self.vertices[i].pos;
            let b = self.vertices[(i + 1) % n].pos;
            acc += a.x * b.y - b.x * a.y;
        }
        acc / 2.0
    }

    /// Enclosed area in hectares; zero for degenerate rings.
    pub fn area_ha(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        self.signed_area_m2().abs() / 10_000.0
    }

    /// Enforce counterclockwise winding.
    pub fn enforce_ccw(&mut self) {
        if self.signed_area_m2() < 0.0 {
            self.vertices.reverse();
        }
    }

    /// Ring centroid (mean of vertices).
    pub fn centroid(&self) -> Vec2 {
        if self.vertices.is_empty() {
            return Vec2::zeros();
        }
        let sum: Vec2 = self.vertices.iter().map(|v| v.pos).sum();
        sum / self.vertices.len() as f64
    }

    /// Min and max vertex distance from a center point.
    pub fn radius_range(&self, center: Vec2) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max: f64 = 0.0;
        for v in &self.vertices {
            let r = (v.pos - center).norm();
            min = min.min(r);
            max = max.max(r);
        }
        (min, max)
    }

    /// Export the ring as a closed [lat, lng] polygon.
    pub fn to_geographic(&self, frame: &LocalFrame) -> Vec<[f64; 2]> {
        if self.vertices.is_empty() {
            return Vec::new();
        }
        let mut ring: Vec<[f64; 2]> = self
            .vertices
            .iter()
            .map(|v| {
                let (lat, lng) = frame.to_geographic(v.pos);
                [lat, lng]
            })
            .collect();
        ring.push(ring[0]);
        ring
    }
}

#[inline]
fn minmax(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Outward normal direction of a CCW ring edge.
fn edge_normal(edge: Vec2) -> Vec2 {
    let n = Vec2::new(edge.y, -edge.x);
    let len = n.norm();
    if len < 1e-12 {
        Vec2::zeros()
    } else {
        n / len
    }
}

/// Proper intersection point of two segments, if any. Near-parallel pairs
/// (tiny denominator) are treated as non-crossing; shared endpoints do not
/// count as crossings.
fn segment_intersection(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<Vec2> {
    let r = a2 - a1;
    let s = b2 - b1;
    let denom = r.x * s.y - r.y * s.x;
    if denom.abs() < 1e-9 {
        return None;
    }
    let qp = b1 - a1;
    let t = (qp.x * s.y - qp.y * s.x) / denom;
    let u = (qp.x * r.y - qp.y * r.x) / denom;
    const EPS: f64 = 1e-9;
    if t > EPS && t < 1.0 - EPS && u > EPS && u < 1.0 - EPS {
        Some(a1 + r * t)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f64, f64)]) -> FirePerimeter {
        FirePerimeter {
            vertices: points
                .iter()
                .map(|&(x, y)| FireVertex::new(Vec2::new(x, y)))
                .collect(),
            step_time_min: 0.0,
        }
    }

    #[test]
    fn ignition_circle_is_ccw_and_closed() {
        let p = FirePerimeter::ignition_circle(10.0);
        assert_eq!(p.len(), IGNITION_VERTICES);
        assert!(p.signed_area_m2() > 0.0, "ignition ring must wind CCW");
        // Area of a regular 16-gon of circumradius r is slightly under
        // the circle's.
        let circle = std::f64::consts::PI * 100.0;
        let area = p.signed_area_m2();
        assert!(
            area > 0.9 * circle && area < circle,
            "16-gon area was {area}"
        );
    }

    #[test]
    fn ignition_radius_floor_is_one_meter() {
        let p = FirePerimeter::ignition_circle(0.001);
        let (min_r, max_r) = p.radius_range(Vec2::zeros());
        assert!((min_r - 1.0).abs() < 1e-9 && (max_r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn square_normals_point_outward() {
        let p = ring(&[(-10.0, -10.0), (10.0, -10.0), (10.0, 10.0), (-10.0, 10.0)]);
        let normals = p.outward_normals();
        // Corner bisectors: SW corner looks southwest (225), and so on
        // around the ring.
        let expected = [225.0, 135.0, 45.0, 315.0];
        for (n, e) in normals.iter().zip(expected) {
            let diff = (n - e).abs().min(360.0 - (n - e).abs());
            assert!(diff < 1e-6, "normal {n} expected {e}");
        }
    }

    #[test]
    fn advance_moves_active_vertices_only() {
        let mut p = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        p.vertices[0].active = false;
        let d = vec![Vec2::new(1.0, 0.0); 4];
        p.advance(&d);
        assert_eq!(p.vertices()[0].pos, Vec2::new(0.0, 0.0));
        assert_eq!(p.vertices()[1].pos, Vec2::new(11.0, 0.0));
    }

    #[test]
    fn resample_splits_long_edges() {
        let mut p = ring(&[(0.0, 0.0), (90.0, 0.0), (90.0, 90.0), (0.0, 90.0)]);
        p.resample();
        // Every edge must now be within the working band.
        let n = p.len();
        for i in 0..n {
            let a = p.vertices()[i].pos;
            let b = p.vertices()[(i + 1) % n].pos;
            let len = (b - a).norm();
            assert!(len <= EDGE_MAX_M + 1e-9, "edge {i} still {len} m long");
        }
        assert!(n >= 12, "90 m edges should split into thirds, got {n}");
    }

    #[test]
    fn resample_merges_crowded_vertices() {
        let mut p = ring(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (20.0, 0.0),
            (20.0, 20.0),
            (0.0, 20.0),
        ]);
        p.resample();
        assert!(
            p.len() < 6,
            "crowded colinear run should merge, still {} vertices",
            p.len()
        );
        // Area barely changes: the merged vertices were colinear.
        assert!((p.signed_area_m2().abs() - 400.0).abs() < 40.0);
    }

    #[test]
    fn figure_eight_is_rubber_banded() {
        // A bowtie: two triangles joined at a crossing near the origin.
        let mut p = ring(&[(-10.0, -1.0), (10.0, 1.0), (10.0, -1.0), (-10.0, 1.0)]);
        let removed = p.remove_self_intersections();
        assert!(removed >= 1, "bowtie crossing was not found");
        assert!(p.first_crossing().is_none(), "ring still self-intersects");
    }

    #[test]
    fn folded_vertex_is_excised() {
        // A square whose top-right corner folded through the bottom edge,
        // crossing it twice.
        let mut p = ring(&[
            (0.0, 0.0),
            (40.0, 0.0),
            (40.0, 40.0),
            (20.0, -5.0),
            (0.0, 40.0),
        ]);
        let removed = p.remove_self_intersections();
        assert!(removed >= 1, "fold crossings were not found");
        assert!(p.first_crossing().is_none(), "ring still self-intersects");
        p.enforce_ccw();
        let area = p.signed_area_m2();
        assert!(
            area > 0.0 && area < 1600.0,
            "cleaned ring area out of range: {area}"
        );
    }

    #[test]
    fn winding_is_restored_after_reversal() {
        let mut p = ring(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        assert!(p.signed_area_m2() < 0.0, "test ring should start CW");
        p.enforce_ccw();
        assert!(p.signed_area_m2() > 0.0);
        assert!((p.area_ha() - 0.01).abs() < 1e-12, "100 m^2 is 0.01 ha");
    }

    #[test]
    fn degenerate_rings_have_zero_area() {
        let p = ring(&[(0.0, 0.0), (5.0, 0.0)]);
        assert!(p.is_degenerate());
        assert_eq!(p.area_ha(), 0.0);

        let collapsed = ring(&[(1.0, 1.0), (1.0, 1.0), (1.0, 1.0), (1.0, 1.0)]);
        assert!(collapsed.is_degenerate());
        assert_eq!(collapsed.area_ha(), 0.0);
    }

    #[test]
    fn geographic_export_closes_the_ring() {
        let frame = LocalFrame::new(51.0, -114.0);
        let p = FirePerimeter::ignition_circle(50.0);
        let geo = p.to_geographic(&frame);
        assert_eq!(geo.len(), p.len() + 1);
        assert_eq!(geo.first(), geo.last());
        // All points within ~50 m of the ignition.
        for [lat, lng] in &geo {
            let local = frame.to_local(*lat, *lng);
            assert!(local.norm() < 50.0 + 1e-6);
        }
    }

    #[test]
    fn nan_positions_are_detected() {
        let mut p = FirePerimeter::ignition_circle(10.0);
        assert!(!p.has_non_finite());
        p.vertices[3].pos.x = f64::NAN;
        assert!(p.has_non_finite());
    }
}
