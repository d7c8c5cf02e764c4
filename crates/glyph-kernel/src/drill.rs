//! Stitching a polygon with holes into one simple polygon.
//!
//! Each hole is joined to an already reachable contour by a bridge edge that
//! crosses no contour edge and no earlier bridge. Walking the outer contour
//! and detouring through every bridge yields a single closed contour in which
//! both bridge endpoints appear twice.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::defect::{Defect, Outcome, record};
use crate::geometry::point::Point2d;
use crate::geometry::polygon::{Polygon, Winding};
use crate::geometry::segment::Segment;

/// A vertex addressed by contour (0 = outer) and position in that contour.
type VertexRef = (usize, usize);

struct Edge {
    owner: usize,
    ends: [VertexRef; 2],
    segment: Segment,
}

impl Edge {
    fn touches(&self, v: VertexRef) -> bool {
        self.ends.contains(&v)
    }
}

/// A drilled contour and the input holes that ended up stitched into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Drilled {
    pub contour: Polygon,
    /// Indices into the `holes` argument, ascending.
    pub bridged: Vec<usize>,
}

/// Merge `outer` and `holes` into one contour.
///
/// No holes returns `outer` unchanged. Otherwise the outer contour is wound
/// clockwise and every hole counter-clockwise. Holes whose bounds leave the
/// outer bounds, holes with fewer than 3 points, and holes that cannot be
/// bridged are dropped and reported.
pub fn drill(outer: &Polygon, holes: &[Polygon]) -> Outcome<Polygon> {
    drill_detailed(outer, holes).map(|d| d.contour)
}

/// [`drill`], also reporting which holes were kept.
#[instrument(skip_all, fields(outer_len = outer.len(), holes = holes.len()))]
pub fn drill_detailed(outer: &Polygon, holes: &[Polygon]) -> Outcome<Drilled> {
    let mut defects = Vec::new();
    let untouched = |defects: Vec<Defect>| {
        Outcome::with_defects(
            Drilled {
                contour: outer.clone(),
                bridged: Vec::new(),
            },
            defects,
        )
    };
    if holes.is_empty() {
        return untouched(defects);
    }
    if !outer.is_usable() {
        record(
            &mut defects,
            Defect::degenerate(format!(
                "outer contour has {} points, holes ignored",
                outer.len()
            )),
        );
        return untouched(defects);
    }

    let outer_box = outer.bbox();
    let mut contours = vec![outer.oriented(Winding::Clockwise)];
    // source[c] is the input hole index of contour c (c >= 1)
    let mut source = vec![usize::MAX];
    for (i, hole) in holes.iter().enumerate() {
        if !hole.is_usable() {
            record(
                &mut defects,
                Defect::degenerate(format!("hole {i} has {} points, skipped", hole.len())),
            );
            continue;
        }
        if !outer_box.contains(&hole.bbox()) {
            record(
                &mut defects,
                Defect::geometry(format!("hole {i} is not inside the outer contour, dropped")),
            );
            continue;
        }
        contours.push(hole.oriented(Winding::CounterClockwise));
        source.push(i);
    }
    if contours.len() == 1 {
        return untouched(defects);
    }

    let sweep = SweepOrder::new(&contours);
    let mut edges: Vec<Edge> = Vec::new();
    for (owner, contour) in contours.iter().enumerate() {
        let n = contour.len();
        for i in 0..n {
            edges.push(Edge {
                owner,
                ends: [(owner, i), (owner, (i + 1) % n)],
                segment: Segment::new(contour.vertex(i), contour.vertex(i + 1)),
            });
        }
    }

    // holes by their topmost vertex
    let mut hole_order: Vec<usize> = (1..contours.len()).collect();
    hole_order.sort_by_key(|&h| sweep.first_rank_of(h));

    let mut visited = vec![false; contours.len()];
    let mut dropped = vec![false; contours.len()];
    visited[0] = true;
    let mut used: Vec<Vec<bool>> = contours.iter().map(|c| vec![false; c.len()]).collect();
    let mut bridges: Vec<Edge> = Vec::new();
    let mut links: HashMap<VertexRef, VertexRef> = HashMap::new();

    // A hole walled in by holes not yet reachable waits for a later pass.
    let mut pending = hole_order;
    loop {
        let mut waiting = Vec::new();
        for &hole in &pending {
            let found =
                find_bridge(hole, &contours, &sweep, &visited, &dropped, &used, &edges, &bridges);
            let Some((from, to)) = found else {
                waiting.push(hole);
                continue;
            };
            debug!(hole, from = ?from, to = ?to, "bridged hole");
            used[from.0][from.1] = true;
            used[to.0][to.1] = true;
            links.insert(from, to);
            links.insert(to, from);
            bridges.push(Edge {
                owner: hole,
                ends: [from, to],
                segment: Segment::new(point_of(&contours, from), point_of(&contours, to)),
            });
            visited[hole] = true;
        }
        if waiting.len() == pending.len() {
            for &hole in &waiting {
                dropped[hole] = true;
                record(
                    &mut defects,
                    Defect::geometry(format!(
                        "hole with {} points has no valid bridge, dropped",
                        contours[hole].len()
                    )),
                );
            }
            break;
        }
        pending = waiting;
    }

    let stitched = traverse(&contours, &links);
    debug!(points = stitched.len(), "drilled contour");
    let mut bridged: Vec<usize> = (1..contours.len())
        .filter(|&c| visited[c])
        .map(|c| source[c])
        .collect();
    bridged.sort_unstable();
    Outcome::with_defects(
        Drilled {
            contour: Polygon::new(stitched),
            bridged,
        },
        defects,
    )
}

#[allow(clippy::too_many_arguments)]
fn find_bridge(
    hole: usize,
    contours: &[Polygon],
    sweep: &SweepOrder,
    visited: &[bool],
    dropped: &[bool],
    used: &[Vec<bool>],
    edges: &[Edge],
    bridges: &[Edge],
) -> Option<(VertexRef, VertexRef)> {
    let hole_vertices: Vec<VertexRef> = sweep
        .order
        .iter()
        .copied()
        .filter(|&(c, i)| c == hole && !used[c][i])
        .collect();
    let targets: Vec<VertexRef> = sweep
        .order
        .iter()
        .copied()
        .filter(|&(c, i)| visited[c] && !used[c][i])
        .collect();

    for &from in &hole_vertices {
        let origin = point_of(contours, from);
        let mut candidates = targets.clone();
        candidates.sort_by(|&a, &b| {
            let da = squared_distance(origin, point_of(contours, a));
            let db = squared_distance(origin, point_of(contours, b));
            da.total_cmp(&db)
                .then_with(|| sweep.rank(a).cmp(&sweep.rank(b)))
        });

        for to in candidates {
            let bridge = Segment::new(origin, point_of(contours, to));
            if bridge.length() == 0.0 {
                continue;
            }
            // edges meeting the bridge at its own endpoints cannot block it
            let blocks = |e: &Edge| !e.touches(from) && !e.touches(to) && bridge.crosses(&e.segment);
            let blocked = edges.iter().filter(|e| !dropped[e.owner]).any(blocks)
                || bridges.iter().any(blocks);
            if !blocked {
                return Some((to, from));
            }
        }
    }
    None
}

/// Walk from outer vertex 0, detouring into each bridged contour.
fn traverse(contours: &[Polygon], links: &HashMap<VertexRef, VertexRef>) -> Vec<Point2d> {
    struct Frame {
        contour: usize,
        entry: usize,
        step: usize,
    }

    let mut out = Vec::new();
    let mut stack = vec![Frame {
        contour: 0,
        entry: 0,
        step: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let n = contours[frame.contour].len();
        if frame.step == n {
            let done = (frame.contour, frame.entry);
            stack.pop();
            if let Some(parent) = stack.last() {
                out.push(point_of(contours, done));
                let back = (parent.contour, (parent.entry + parent.step - 1) % contours[parent.contour].len());
                out.push(point_of(contours, back));
            }
            continue;
        }

        let here = (frame.contour, (frame.entry + frame.step) % n);
        let entering = frame.step == 0 && frame.contour != 0;
        frame.step += 1;
        out.push(point_of(contours, here));
        if entering {
            continue;
        }
        if let Some(&(contour, entry)) = links.get(&here) {
            stack.push(Frame {
                contour,
                entry,
                step: 0,
            });
        }
    }
    out
}

fn point_of(contours: &[Polygon], (c, i): VertexRef) -> Point2d {
    contours[c].points()[i]
}

fn squared_distance(a: Point2d, b: Point2d) -> f64 {
    let d = b - a;
    d.dot(&d)
}

/// Deterministic global vertex order: y descending, then x ascending.
struct SweepOrder {
    order: Vec<VertexRef>,
    ranks: HashMap<VertexRef, usize>,
}

impl SweepOrder {
    fn new(contours: &[Polygon]) -> Self {
        let mut order: Vec<VertexRef> = contours
            .iter()
            .enumerate()
            .flat_map(|(c, poly)| (0..poly.len()).map(move |i| (c, i)))
            .collect();
        order.sort_by(|&a, &b| {
            let pa = point_of(contours, a);
            let pb = point_of(contours, b);
            match pb.y.total_cmp(&pa.y) {
                Ordering::Equal => pa.x.total_cmp(&pb.x).then(a.cmp(&b)),
                other => other,
            }
        });
        let ranks = order.iter().enumerate().map(|(r, &v)| (v, r)).collect();
        Self { order, ranks }
    }

    fn rank(&self, v: VertexRef) -> usize {
        self.ranks.get(&v).copied().unwrap_or(usize::MAX)
    }

    fn first_rank_of(&self, contour: usize) -> usize {
        self.order
            .iter()
            .position(|&(c, _)| c == contour)
            .unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DefectKind;

    fn square(side: f64, cx: f64, cy: f64) -> Polygon {
        let h = side * 0.5;
        Polygon::from_pairs(&[
            (cx - h, cy - h),
            (cx + h, cy - h),
            (cx + h, cy + h),
            (cx - h, cy + h),
        ])
    }

    #[test]
    fn test_no_holes_returns_outer_verbatim() {
        let outer = square(4.0, 0.0, 0.0);
        let result = drill(&outer, &[]);
        assert!(result.is_clean());
        assert_eq!(result.value, outer);
    }

    #[test]
    fn test_single_hole_point_count() {
        let outer = square(4.0, 0.0, 0.0);
        let hole = square(1.0, 0.0, 0.0);
        let result = drill(&outer, &[hole]);
        assert!(result.is_clean());
        assert_eq!(result.value.len(), 10);
    }

    #[test]
    fn test_bridge_points_appear_twice() {
        let outer = square(4.0, 0.0, 0.0);
        let hole = square(1.0, 0.0, 0.0);
        let result = drill(&outer, &[hole]).value;
        let mut counts: HashMap<(u64, u64), usize> = HashMap::new();
        for p in result.iter() {
            *counts.entry((p.x.to_bits(), p.y.to_bits())).or_default() += 1;
        }
        assert_eq!(counts.values().filter(|&&c| c == 2).count(), 2);
        assert_eq!(counts.len(), 8);
    }

    #[test]
    fn test_hole_outside_is_dropped() {
        let outer = square(2.0, 0.0, 0.0);
        let stray = square(1.0, 5.0, 0.0);
        let result = drill(&outer, &[stray]);
        assert_eq!(result.defects.len(), 1);
        assert_eq!(result.defects[0].kind, DefectKind::GeometryDefect);
        assert_eq!(result.value, outer);
    }

    #[test]
    fn test_degenerate_hole_is_skipped() {
        let outer = square(4.0, 0.0, 0.0);
        let sliver = Polygon::from_pairs(&[(0.0, 0.0), (0.5, 0.5)]);
        let good = square(1.0, 0.0, 0.0);
        let result = drill(&outer, &[sliver, good]);
        assert_eq!(result.defects.len(), 1);
        assert_eq!(result.defects[0].kind, DefectKind::DegenerateInput);
        assert_eq!(result.value.len(), 10);
    }

    #[test]
    fn test_detailed_reports_bridged_holes() {
        let outer = square(4.0, 0.0, 0.0);
        let stray = square(1.0, 5.0, 0.0);
        let inner = square(1.0, 0.0, 0.0);
        let result = drill_detailed(&outer, &[stray, inner]);
        assert_eq!(result.value.bridged, vec![1]);
        assert_eq!(result.value.contour.len(), 10);
    }

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        Polygon::from_pairs(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
    }

    #[test]
    fn test_bridge_to_outer_corner_with_inexact_coordinates() {
        let outer = rect(0.0, 0.0, 10.0, 10.0);
        let holes = [
            rect(1.2, 4.2, 2.8, 5.8),
            rect(7.2, 4.2, 8.8, 5.8),
            rect(
                4.240159783126987,
                7.023366579924055,
                5.840159783126986,
                8.623366579924054,
            ),
        ];
        let result = drill_detailed(&outer, &holes);
        assert!(result.is_clean(), "{:?}", result.defects);
        assert_eq!(result.value.bridged, vec![0, 1, 2]);
        assert_eq!(result.value.contour.len(), 4 + 3 * 4 + 2 * 3);
        let net = 100.0 - holes.iter().map(|h| h.signed_area().abs()).sum::<f64>();
        assert!((result.value.contour.signed_area().abs() - net).abs() < 1e-9);
    }

    #[test]
    fn test_outer_is_made_clockwise() {
        let outer = square(4.0, 0.0, 0.0);
        assert!(!outer.is_clockwise());
        let result = drill(&outer, &[square(1.0, 0.0, 0.0)]).value;
        assert!(result.is_clockwise());
    }
}
