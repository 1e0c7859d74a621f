//! Alignment guide detection.
//!
//! While a field is dragged, each other field's edges are compared with
//! the candidate rectangle of the moving field. Near-coincident edges
//! produce a guide line spanning both fields. Guides are ephemeral and
//! never persisted; matching guides from different neighbors are all
//! emitted (deduplication is a rendering concern).

use crate::id::FieldId;
use crate::model::{Field, FieldRect};
use serde::Serialize;
use smallvec::SmallVec;

/// Default edge-matching distance in pixels (exclusive).
pub const ALIGN_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideKind {
    /// A line at constant x.
    Vertical,
    /// A line at constant y.
    Horizontal,
}

/// A transient guide line for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignmentGuide {
    #[serde(rename = "type")]
    pub kind: GuideKind,
    /// Coordinate along the guide's own axis (x for vertical guides).
    pub position: f64,
    /// Span along the perpendicular axis.
    pub start: f64,
    pub end: f64,
}

pub type Guides = SmallVec<[AlignmentGuide; 4]>;

/// Compute guides for `moving` at its candidate rectangle against every
/// other field in `fields`. O(n) in the number of fields.
pub fn detect_guides(
    moving: FieldId,
    candidate: FieldRect,
    fields: &[Field],
    threshold: f64,
) -> Guides {
    let mut guides = Guides::new();
    let near = |a: f64, b: f64| (a - b).abs() < threshold;

    for other in fields.iter().filter(|f| f.id != moving) {
        let r = other.rect();

        // Vertical guides span the union of both fields' y ranges.
        let v_span = (r.y.min(candidate.y), r.bottom().max(candidate.bottom()));
        if near(r.x, candidate.x) {
            guides.push(guide(GuideKind::Vertical, r.x, v_span));
        }
        if near(r.right(), candidate.right()) {
            guides.push(guide(GuideKind::Vertical, r.right(), v_span));
        }

        let h_span = (r.x.min(candidate.x), r.right().max(candidate.right()));
        if near(r.y, candidate.y) {
            guides.push(guide(GuideKind::Horizontal, r.y, h_span));
        }
        if near(r.bottom(), candidate.bottom()) {
            guides.push(guide(GuideKind::Horizontal, r.bottom(), h_span));
        }
    }

    if !guides.is_empty() {
        log::trace!("{} alignment guide(s) for {}", guides.len(), moving);
    }
    guides
}

fn guide(kind: GuideKind, position: f64, (start, end): (f64, f64)) -> AlignmentGuide {
    AlignmentGuide {
        kind,
        position,
        start,
        end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldType, Properties};
    use pretty_assertions::assert_eq;

    fn field(name: &str, x: f64, y: f64, w: f64, h: f64) -> Field {
        Field::new(
            FieldId::intern(name),
            FieldType::Text,
            FieldRect::new(x, y, w, h),
            Properties::new(),
        )
    }

    #[test]
    fn left_edge_match_emits_vertical_guide() {
        let a = field("g_a", 50.0, 50.0, 100.0, 40.0);
        let b = field("g_b", 50.0, 150.0, 60.0, 40.0);
        let candidate = FieldRect::new(52.0, 150.0, 60.0, 40.0);
        let guides = detect_guides(b.id, candidate, &[a, b.clone()], ALIGN_THRESHOLD);

        assert_eq!(
            guides.as_slice(),
            &[AlignmentGuide {
                kind: GuideKind::Vertical,
                position: 50.0,
                start: 50.0,
                end: 190.0,
            }]
        );
    }

    #[test]
    fn right_edge_match_emits_vertical_guide() {
        let a = field("g_right_a", 100.0, 40.0, 120.0, 30.0);
        let moving = FieldId::intern("g_right_m");
        // Left edges 70 apart, right edges 3 apart.
        let candidate = FieldRect::new(170.0, 200.0, 53.0, 25.0);
        let guides = detect_guides(moving, candidate, std::slice::from_ref(&a), ALIGN_THRESHOLD);

        assert_eq!(
            guides.as_slice(),
            &[AlignmentGuide {
                kind: GuideKind::Vertical,
                position: a.rect().right(),
                start: 40.0,
                end: 225.0,
            }]
        );

        // Exactly the threshold apart: no guide.
        let at_five = FieldRect::new(170.0, 200.0, 55.0, 25.0);
        assert!(detect_guides(moving, at_five, &[a], ALIGN_THRESHOLD).is_empty());
    }

    #[test]
    fn moving_field_never_guides_itself() {
        let b = field("g_self", 50.0, 150.0, 100.0, 40.0);
        let guides = detect_guides(b.id, b.rect(), std::slice::from_ref(&b), ALIGN_THRESHOLD);
        assert!(guides.is_empty());
    }

    #[test]
    fn threshold_is_exclusive() {
        let a = field("g_edge_a", 100.0, 0.0, 50.0, 20.0);
        let moving = FieldId::intern("g_edge_b");
        let at_five = FieldRect::new(105.0, 300.0, 20.0, 20.0);
        assert!(detect_guides(moving, at_five, std::slice::from_ref(&a), ALIGN_THRESHOLD).is_empty());

        let at_four = FieldRect::new(104.0, 300.0, 20.0, 20.0);
        assert_eq!(detect_guides(moving, at_four, &[a], ALIGN_THRESHOLD).len(), 1);
    }

    #[test]
    fn horizontal_guides_span_both_fields() {
        let a = field("g_row_a", 10.0, 200.0, 50.0, 30.0);
        let moving = FieldId::intern("g_row_b");
        // Top and bottom both line up.
        let candidate = FieldRect::new(300.0, 202.0, 80.0, 30.0);
        let guides = detect_guides(moving, candidate, &[a], ALIGN_THRESHOLD);

        assert_eq!(guides.len(), 2);
        assert!(guides.iter().all(|g| g.kind == GuideKind::Horizontal));
        assert_eq!(guides[0].position, 200.0);
        assert_eq!(guides[1].position, 230.0);
        assert_eq!((guides[0].start, guides[0].end), (10.0, 380.0));
    }

    #[test]
    fn coincident_neighbors_are_not_deduplicated() {
        let a = field("g_dup_a", 40.0, 0.0, 30.0, 30.0);
        let b = field("g_dup_b", 40.0, 100.0, 50.0, 30.0);
        let moving = FieldId::intern("g_dup_m");
        let candidate = FieldRect::new(41.0, 400.0, 25.0, 25.0);
        let guides = detect_guides(moving, candidate, &[a, b], ALIGN_THRESHOLD);
        let at_40 = guides.iter().filter(|g| g.position == 40.0).count();
        assert_eq!(at_40, 2);
    }
}
