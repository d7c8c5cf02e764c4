//! Grouping a glyph's raw contours into outer polygons and their holes.
//!
//! Nesting is judged on bounding boxes only. A contour that contains others
//! but sits inside nothing becomes an outer polygon and takes its direct
//! children as holes; a contour still inside another waits until its
//! container has been consumed.

use std::collections::VecDeque;

use glyph_kernel::{BoundingBox, BoxRelation, Defect, Outcome, Polygon, PolygonWithHoles, record};
use tracing::debug;

struct Pending {
    index: usize,
    polygon: Polygon,
    bbox: BoundingBox,
}

/// Classify `contours` into faces. Degenerate contours and contours that
/// both contain and sit inside other contours are dropped and reported.
pub fn classify_contours(contours: Vec<Polygon>) -> Outcome<Vec<PolygonWithHoles>> {
    let mut defects = Vec::new();
    let mut queue: VecDeque<Pending> = VecDeque::new();
    for (index, polygon) in contours.into_iter().enumerate() {
        if !polygon.is_usable() {
            record(
                &mut defects,
                Defect::degenerate(format!(
                    "contour {index} has {} points, skipped",
                    polygon.len()
                )),
            );
            continue;
        }
        let bbox = polygon.bbox();
        queue.push_back(Pending {
            index,
            polygon,
            bbox,
        });
    }

    let mut faces = Vec::new();
    let mut deferred = 0usize;
    while let Some(first) = queue.pop_front() {
        let relations: Vec<BoxRelation> = queue.iter().map(|p| first.bbox.relation(&p.bbox)).collect();
        let inbound = relations.contains(&BoxRelation::Contains);
        let outbound = relations.contains(&BoxRelation::ContainedBy);

        match (inbound, outbound) {
            (false, false) => {
                faces.push(PolygonWithHoles::solid(first.polygon));
                deferred = 0;
            }
            (true, false) => {
                let children = direct_children(&queue, &relations);
                debug!(contour = first.index, holes = children.len(), "outer contour");
                let mut holes = Vec::with_capacity(children.len());
                // remove from the back so earlier positions stay valid
                for &pos in children.iter().rev() {
                    if let Some(hole) = queue.remove(pos) {
                        holes.push(hole.polygon);
                    }
                }
                holes.reverse();
                faces.push(PolygonWithHoles::new(first.polygon, holes));
                deferred = 0;
            }
            (false, true) if deferred <= queue.len() => {
                queue.push_back(first);
                deferred += 1;
            }
            (false, true) => {
                record(
                    &mut defects,
                    Defect::geometry(format!(
                        "contour {} has no consumable container, kept as outer",
                        first.index
                    )),
                );
                faces.push(PolygonWithHoles::solid(first.polygon));
                deferred = 0;
            }
            (true, true) => {
                record(
                    &mut defects,
                    Defect::geometry(format!(
                        "contour {} both contains and sits inside other contours, dropped",
                        first.index
                    )),
                );
                deferred = 0;
            }
        }
    }
    Outcome::with_defects(faces, defects)
}

/// Queue positions contained by the current contour and not nested inside
/// another such candidate. Of two candidates with identical boxes the
/// earlier one counts as the container.
fn direct_children(queue: &VecDeque<Pending>, relations: &[BoxRelation]) -> Vec<usize> {
    let candidates: Vec<usize> = relations
        .iter()
        .enumerate()
        .filter(|(_, r)| **r == BoxRelation::Contains)
        .map(|(pos, _)| pos)
        .collect();
    candidates
        .iter()
        .copied()
        .filter(|&c| {
            !candidates.iter().any(|&d| {
                d != c
                    && queue[d].bbox.contains(&queue[c].bbox)
                    && (!queue[c].bbox.contains(&queue[d].bbox) || d < c)
            })
        })
        .collect()
}
