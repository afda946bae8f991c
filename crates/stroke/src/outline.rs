//! Builds the outline of flattened sub-paths.
//!
//! ## Overview
//!
//! Each polyline is offset by half of the line width on both sides. Offsetting
//! by `hw * (t.y, -t.x)` for a tangent `t` gives the right side, the opposite
//! normal gives the left side. The two sides are accumulated in separate
//! chains and joined into a ring: the right chain forward, the end cap, the
//! left chain backward and the start cap. Closed sub-paths have no caps, the
//! two chains are linked at the seam instead.
//!
//! Every ring produced this way winds in the same direction, so the union of
//! the rings is obtained by filling them with the non-zero rule, no matter how
//! they overlap.
//!
//! At each vertex the outer side of the turn gets the configured join, the
//! inner side simply connects the two offset segments.
//!
//! ## Swings
//!
//! When a very short segment follows a sharp turn, the inner offset points of
//! the turn land beyond the end of the short segment and the following joins
//! would be computed from inverted geometry. Instead of joining each vertex,
//! the builder then pivots around the vertex where the turn started until the
//! path has moved away by at least half of the line width (or a long enough
//! segment arrives).
//!
//! The chains end with a butt edge at the pivot, cover the turn with a pie
//! slice around it and restart with a butt edge where the swing is resolved.
//! Both chains walk along the center line between the two, which adds no area.
//! The short segments walked during the swing each get a ring of their own:
//! a rectangle with half circles at both ends. These rings cover whatever the
//! swing skipped, including the joins at both ends of the swing.

use crate::flatten::{PointKind, Vertex};
use crate::math::{vector, Point, Vector};
use crate::path::{Error, LineCap, LineJoin, StrokeState};

use core::f32::consts::PI;
use core::ops::Range;

/// Joins between segments that are closer to aligned than this are skipped.
const STRAIGHT_EPSILON: f32 = 1e-3;

/// The edge leading to a point of the outline.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OutlineKind {
    Line,
    Quadratic {
        ctrl: Point,
    },
    /// A circular arc starting at the previous point.
    ///
    /// Positive sweep angles are counter-clockwise.
    Arc {
        center: Point,
        radius: f32,
        sweep: f32,
    },
    /// A counter-clockwise half circle starting at the previous point.
    HalfArc {
        center: Point,
        radius: f32,
    },
}

impl OutlineKind {
    /// The same edge, traversed backward.
    fn reversed(self) -> Self {
        match self {
            OutlineKind::Arc {
                center,
                radius,
                sweep,
            } => OutlineKind::Arc {
                center,
                radius,
                sweep: -sweep,
            },
            OutlineKind::HalfArc { center, radius } => OutlineKind::Arc {
                center,
                radius,
                sweep: -PI,
            },
            other => other,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OutlinePoint {
    pub position: Point,
    pub kind: OutlineKind,
}

impl OutlinePoint {
    fn line(position: Point) -> Self {
        OutlinePoint {
            position,
            kind: OutlineKind::Line,
        }
    }
}

/// A set of closed rings.
///
/// The first point of each ring is where it starts, the ring implicitly
/// closes with a line back to it.
#[derive(Clone, Debug, Default)]
pub struct Outline {
    points: Vec<OutlinePoint>,
    rings: Vec<Range<usize>>,
}

impl Outline {
    pub fn new() -> Self {
        Outline::default()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.rings.clear();
    }

    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    pub fn rings(&self) -> impl Iterator<Item = &[OutlinePoint]> + '_ {
        self.rings.iter().map(move |range| &self.points[range.clone()])
    }

    fn begin_ring(&mut self, additional: usize) -> Result<usize, Error> {
        self.points.try_reserve(additional)?;
        self.rings.try_reserve(1)?;

        Ok(self.points.len())
    }

    fn end_ring(&mut self, start: usize) {
        if self.points.len() > start {
            self.rings.push(start..self.points.len());
        }
    }
}

/// State of an unresolved swing.
#[derive(Copy, Clone, Debug)]
struct Swing {
    pivot: Point,
    entry: Vector,
    turn: f32,
    length: f32,
}

/// Offsets polylines and collects the resulting rings.
pub struct OutlineBuilder {
    half_width: f32,
    line_join: LineJoin,
    line_cap: LineCap,
    miter_limit_sq: f32,
    right: Vec<OutlinePoint>,
    left: Vec<OutlinePoint>,
    vertices: Vec<Vertex>,
    swing: Option<Swing>,
    /// The center line walked since the swing started, pivot included.
    swing_points: Vec<Point>,
    outline: Outline,
}

impl OutlineBuilder {
    pub fn new() -> Self {
        OutlineBuilder {
            half_width: 0.5,
            line_join: LineJoin::Miter,
            line_cap: LineCap::Butt,
            miter_limit_sq: 16.0,
            right: Vec::new(),
            left: Vec::new(),
            vertices: Vec::new(),
            swing: None,
            swing_points: Vec::new(),
            outline: Outline::new(),
        }
    }

    /// Prepares for a new path, keeping the allocations.
    pub fn reset(&mut self, state: &StrokeState) {
        self.half_width = state.half_width();
        self.line_join = state.line_join();
        self.line_cap = state.line_cap();
        self.miter_limit_sq = state.miter_limit_sq();
        self.right.clear();
        self.left.clear();
        self.vertices.clear();
        self.swing = None;
        self.swing_points.clear();
        self.outline.clear();
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    /// Adds the caps of a zero-length sub-path.
    ///
    /// The caps are oriented along `tangent`.
    pub fn dot(&mut self, at: Point, tangent: Vector) -> Result<(), Error> {
        let t = tangent * self.half_width;
        let n = normal(tangent) * self.half_width;
        match self.line_cap {
            LineCap::Butt => {}
            LineCap::Square => {
                let start = self.outline.begin_ring(4)?;
                self.outline.points.push(OutlinePoint::line(at + n - t));
                self.outline.points.push(OutlinePoint::line(at + n + t));
                self.outline.points.push(OutlinePoint::line(at - n + t));
                self.outline.points.push(OutlinePoint::line(at - n - t));
                self.outline.end_ring(start);
            }
            LineCap::Round => {
                let half_circle = OutlineKind::HalfArc {
                    center: at,
                    radius: self.half_width,
                };
                let start = self.outline.begin_ring(3)?;
                self.outline.points.push(OutlinePoint::line(at + n));
                self.outline.points.push(OutlinePoint {
                    position: at - n,
                    kind: half_circle,
                });
                self.outline.points.push(OutlinePoint {
                    position: at + n,
                    kind: half_circle,
                });
                self.outline.end_ring(start);
            }
        }

        Ok(())
    }

    /// Adds the outline of a polyline.
    ///
    /// If `closed` is true, the first vertex must carry the tangent and the
    /// length of the segment from the last vertex back to the first one.
    pub fn polyline(&mut self, vertices: &[Vertex], closed: bool) -> Result<(), Error> {
        let first = match vertices.first() {
            Some(v) => *v,
            None => return Ok(()),
        };

        // Vertices that don't move are only useful for their position.
        let mut filtered = core::mem::take(&mut self.vertices);
        filtered.clear();
        filtered.try_reserve(vertices.len())?;
        filtered.push(first);
        filtered.extend(vertices[1..].iter().filter(|v| v.length > 0.0).cloned());

        let result = if filtered.len() < 2 {
            let tangent = vertices[vertices.len() - 1].tangent;
            self.dot(first.position, tangent)
        } else if closed {
            self.closed_polyline(&filtered)
        } else {
            self.open_polyline(&filtered)
        };

        self.vertices = filtered;
        self.right.clear();
        self.left.clear();
        self.swing = None;
        self.swing_points.clear();

        result
    }

    fn open_polyline(&mut self, v: &[Vertex]) -> Result<(), Error> {
        let hw = self.half_width;
        let start = v[0].position;
        let start_tangent = v[1].tangent;
        let end = v[v.len() - 1].position;
        let end_tangent = v[v.len() - 1].tangent;

        self.start_chains(start, start_tangent)?;
        for i in 1..v.len() - 1 {
            let next = &v[i + 1];
            self.join(&v[i], next.tangent, next.length)?;
        }
        self.end_chains(end, end_tangent)?;

        let ring = self
            .outline
            .begin_ring(self.right.len() + self.left.len() + 4)?;
        let points = &mut self.outline.points;
        points.extend_from_slice(&self.right);

        let end_cap = match self.line_cap {
            LineCap::Butt => OutlineKind::Line,
            LineCap::Square => {
                let t = end_tangent * hw;
                let n = normal(end_tangent) * hw;
                points.push(OutlinePoint::line(end + n + t));
                points.push(OutlinePoint::line(end - n + t));
                OutlineKind::Line
            }
            LineCap::Round => OutlineKind::HalfArc {
                center: end,
                radius: hw,
            },
        };
        push_reversed(points, &self.left, end_cap);

        match self.line_cap {
            LineCap::Butt => {}
            LineCap::Square => {
                let t = start_tangent * hw;
                let n = normal(start_tangent) * hw;
                points.push(OutlinePoint::line(start - n - t));
                points.push(OutlinePoint::line(start + n - t));
            }
            LineCap::Round => {
                points.push(OutlinePoint {
                    position: self.right[0].position,
                    kind: OutlineKind::HalfArc {
                        center: start,
                        radius: hw,
                    },
                });
            }
        }

        self.outline.end_ring(ring);

        Ok(())
    }

    fn closed_polyline(&mut self, v: &[Vertex]) -> Result<(), Error> {
        let start = v[0];
        let first_segment = v[1];

        self.start_chains(start.position, first_segment.tangent)?;
        for i in 1..v.len() {
            let next = if i + 1 < v.len() { &v[i + 1] } else { &v[0] };
            self.join(&v[i], next.tangent, next.length)?;
        }

        // The seam.
        let seam = Vertex {
            kind: PointKind::Corner,
            ..start
        };
        self.join(&seam, first_segment.tangent, first_segment.length)?;
        if self.swing.is_some() {
            self.resolve_swing(start.position, first_segment.tangent)?;
        }

        let ring = self.outline.begin_ring(self.right.len() + self.left.len())?;
        let points = &mut self.outline.points;
        points.extend_from_slice(&self.right);
        push_reversed(points, &self.left, OutlineKind::Line);
        self.outline.end_ring(ring);

        Ok(())
    }

    fn start_chains(&mut self, at: Point, tangent: Vector) -> Result<(), Error> {
        self.right.clear();
        self.left.clear();
        self.swing = None;
        self.swing_points.clear();

        let n = normal(tangent) * self.half_width;
        push(&mut self.right, OutlinePoint::line(at + n))?;
        push(&mut self.left, OutlinePoint::line(at - n))
    }

    fn end_chains(&mut self, at: Point, tangent: Vector) -> Result<(), Error> {
        if self.swing.is_some() {
            return self.resolve_swing(at, tangent);
        }

        let n = normal(tangent) * self.half_width;
        push(&mut self.right, OutlinePoint::line(at + n))?;
        push(&mut self.left, OutlinePoint::line(at - n))
    }

    /// Joins the segment ending at `vertex` with the next one.
    fn join(&mut self, vertex: &Vertex, next_tangent: Vector, next_length: f32) -> Result<(), Error> {
        let hw = self.half_width;
        let at = vertex.position;
        let t0 = vertex.tangent;
        let t1 = next_tangent;
        let cos = t0.dot(t1);
        let cross = t0.cross(t1);
        let turn = cross.atan2(cos);

        if let Some(swing) = &mut self.swing {
            swing.turn += turn;
            swing.length += vertex.length;
            let drift = at - swing.pivot;
            self.swing_points.try_reserve(1)?;
            self.swing_points.push(at);
            if next_length >= hw || drift.square_length() >= hw * hw {
                return self.resolve_swing(at, t1);
            }
            return Ok(());
        }

        let n0 = normal(t0) * hw;
        let n1 = normal(t1) * hw;

        if cos >= 1.0 - STRAIGHT_EPSILON {
            push(&mut self.right, OutlinePoint::line(at + n0))?;
            push(&mut self.right, OutlinePoint::line(at + n1))?;
            push(&mut self.left, OutlinePoint::line(at - n0))?;
            return push(&mut self.left, OutlinePoint::line(at - n1));
        }

        // How far the inner offset lines cross beyond the vertex.
        let inner_overshoot = if 1.0 + cos > STRAIGHT_EPSILON {
            hw * cross.abs() / (1.0 + cos)
        } else {
            core::f32::INFINITY
        };

        if next_length < hw && inner_overshoot > next_length {
            push(&mut self.right, OutlinePoint::line(at + n0))?;
            push(&mut self.left, OutlinePoint::line(at - n0))?;
            self.swing_points.clear();
            self.swing_points.try_reserve(1)?;
            self.swing_points.push(at);
            self.swing = Some(Swing {
                pivot: at,
                entry: t0,
                turn,
                length: 0.0,
            });
            return Ok(());
        }

        let join = if vertex.kind == PointKind::Curve {
            LineJoin::Round
        } else {
            self.line_join
        };
        let miter_sq = if 1.0 + cos > 0.0 {
            2.0 / (1.0 + cos)
        } else {
            core::f32::INFINITY
        };
        let miter_length = hw * miter_sq.sqrt();
        let miter_fits = miter_sq <= self.miter_limit_sq
            && miter_length <= vertex.length
            && miter_length <= next_length;

        let (outer, inner, sign) = if cross >= 0.0 {
            (&mut self.right, &mut self.left, 1.0)
        } else {
            (&mut self.left, &mut self.right, -1.0)
        };

        push(inner, OutlinePoint::line(at - n0 * sign))?;
        push(inner, OutlinePoint::line(at - n1 * sign))?;

        let from = at + n0 * sign;
        let to = at + n1 * sign;
        match join {
            LineJoin::Miter if miter_fits => {
                push(outer, OutlinePoint::line(at + (n0 + n1) * (sign / (1.0 + cos))))?;
            }
            LineJoin::Round => {
                push(outer, OutlinePoint::line(from))?;
                let kind = if vertex.kind == PointKind::Curve && turn.abs() <= PI * 0.25 {
                    OutlineKind::Quadratic {
                        ctrl: at + (n0 + n1) * (sign / (1.0 + cos)),
                    }
                } else {
                    // An exact reversal has no turn direction of its own, the
                    // arc must stay on the outer side.
                    OutlineKind::Arc {
                        center: at,
                        radius: hw,
                        sweep: turn.abs() * sign,
                    }
                };
                push(outer, OutlinePoint { position: to, kind })?;
            }
            _ => {
                push(outer, OutlinePoint::line(from))?;
                push(outer, OutlinePoint::line(to))?;
            }
        }

        Ok(())
    }

    /// Ends the chains at the pivot with a pie slice, walks them along the
    /// center line of the swing and continues them at `at`.
    fn resolve_swing(&mut self, at: Point, exit: Vector) -> Result<(), Error> {
        let swing = match self.swing.take() {
            Some(swing) => swing,
            None => return Ok(()),
        };

        let hw = self.half_width;
        let pivot = swing.pivot;
        let n = normal(exit) * hw;

        // The angle between the entry and exit normals, on the side of the
        // accumulated turn. Half turns are ambiguous, the sign of the
        // accumulated turn decides.
        let mut sweep = swing.entry.cross(exit).atan2(swing.entry.dot(exit));
        let half_turn = PI - sweep.abs() < STRAIGHT_EPSILON;
        if (swing.turn.abs() > PI || half_turn) && sweep * swing.turn < 0.0 {
            sweep += 2.0 * PI * swing.turn.signum();
        }

        let arc = OutlineKind::Arc {
            center: pivot,
            radius: hw,
            sweep,
        };
        if sweep >= 0.0 {
            push(&mut self.right, OutlinePoint { position: pivot + n, kind: arc })?;
        } else {
            push(&mut self.left, OutlinePoint { position: pivot - n, kind: arc })?;
        }

        let mut walked = core::mem::take(&mut self.swing_points);
        if walked.last() != Some(&at) {
            walked.try_reserve(1)?;
            walked.push(at);
        }

        let result = self.walk_swing(&walked);
        walked.clear();
        self.swing_points = walked;
        result?;

        push(&mut self.right, OutlinePoint::line(at + n))?;
        push(&mut self.left, OutlinePoint::line(at - n))?;

        log::trace!(
            "swing around {:?} resolved at {:?} (turn: {}, length: {})",
            pivot,
            at,
            sweep,
            swing.length,
        );

        Ok(())
    }

    /// Adds the center line of a swing to both chains and a capsule around
    /// each of its segments.
    fn walk_swing(&mut self, center_line: &[Point]) -> Result<(), Error> {
        let hw = self.half_width;
        self.right.try_reserve(center_line.len())?;
        self.left.try_reserve(center_line.len())?;
        for p in center_line {
            self.right.push(OutlinePoint::line(*p));
            self.left.push(OutlinePoint::line(*p));
        }

        for segment in center_line.windows(2) {
            let (from, to) = (segment[0], segment[1]);
            let d = to - from;
            let length = d.length();
            if length <= 0.0 {
                continue;
            }
            let n = normal(d / length) * hw;

            let ring = self.outline.begin_ring(5)?;
            let points = &mut self.outline.points;
            points.push(OutlinePoint::line(from + n));
            points.push(OutlinePoint::line(to + n));
            points.push(OutlinePoint {
                position: to - n,
                kind: OutlineKind::HalfArc { center: to, radius: hw },
            });
            points.push(OutlinePoint::line(from - n));
            points.push(OutlinePoint {
                position: from + n,
                kind: OutlineKind::HalfArc { center: from, radius: hw },
            });
            self.outline.end_ring(ring);
        }

        Ok(())
    }
}

impl Default for OutlineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The right-hand normal of a tangent.
#[inline]
fn normal(tangent: Vector) -> Vector {
    vector(tangent.y, -tangent.x)
}

#[inline]
fn push(chain: &mut Vec<OutlinePoint>, point: OutlinePoint) -> Result<(), Error> {
    chain.try_reserve(1)?;
    chain.push(point);

    Ok(())
}

/// Appends a chain backward. The first appended point is reached with `kind`.
///
/// Capacity must have been reserved.
fn push_reversed(points: &mut Vec<OutlinePoint>, chain: &[OutlinePoint], kind: OutlineKind) {
    let mut kind = kind;
    for point in chain.iter().rev() {
        points.push(OutlinePoint {
            position: point.position,
            kind,
        });
        kind = point.kind.reversed();
    }
}

#[cfg(test)]
fn corner(position: Point, from: Point) -> Vertex {
    let d = position - from;
    Vertex {
        position,
        tangent: d.normalize(),
        length: d.length(),
        kind: PointKind::Corner,
    }
}

#[cfg(test)]
fn test_builder(width: f32, cap: LineCap, join: LineJoin) -> OutlineBuilder {
    use crate::path::StrokeStyle;

    let style = StrokeStyle::line_width(width)
        .with_line_cap(cap)
        .with_line_join(join);
    let mut builder = OutlineBuilder::new();
    builder.reset(&StrokeState::new(&style).unwrap());

    builder
}

#[cfg(test)]
fn positions(ring: &[OutlinePoint]) -> Vec<Point> {
    ring.iter().map(|p| p.position).collect()
}

#[test]
fn reversed_chain_edges() {
    use crate::math::point;

    let chain = [
        OutlinePoint::line(point(0.0, 0.0)),
        OutlinePoint {
            position: point(1.0, 1.0),
            kind: OutlineKind::Arc {
                center: point(0.0, 1.0),
                radius: 1.0,
                sweep: 1.5,
            },
        },
        OutlinePoint::line(point(2.0, 1.0)),
    ];

    let mut points = Vec::new();
    push_reversed(&mut points, &chain, OutlineKind::Line);

    assert_eq!(
        positions(&points),
        vec![point(2.0, 1.0), point(1.0, 1.0), point(0.0, 0.0)]
    );
    assert_eq!(points[1].kind, OutlineKind::Line);
    assert_eq!(
        points[2].kind,
        OutlineKind::Arc {
            center: point(0.0, 1.0),
            radius: 1.0,
            sweep: -1.5,
        }
    );
}

#[test]
fn straight_polyline() {
    use crate::math::point;

    let a = point(0.0, 0.0);
    let b = point(10.0, 0.0);
    let c = point(20.0, 0.0);
    let vertices = [
        Vertex {
            position: a,
            tangent: vector(1.0, 0.0),
            length: 0.0,
            kind: PointKind::Corner,
        },
        corner(b, a),
        corner(c, b),
    ];

    let mut builder = test_builder(2.0, LineCap::Butt, LineJoin::Miter);
    builder.polyline(&vertices, false).unwrap();

    let rings: Vec<&[OutlinePoint]> = builder.outline().rings().collect();
    assert_eq!(rings.len(), 1);
    let ring = positions(rings[0]);
    assert_eq!(ring.first(), Some(&point(0.0, -1.0)));
    assert!(ring.contains(&point(20.0, -1.0)));
    assert!(ring.contains(&point(20.0, 1.0)));
    assert_eq!(ring.last(), Some(&point(0.0, 1.0)));
}

#[test]
fn round_caps_use_half_circles() {
    use crate::math::point;

    let a = point(0.0, 0.0);
    let b = point(10.0, 0.0);
    let vertices = [
        Vertex {
            position: a,
            tangent: vector(1.0, 0.0),
            length: 0.0,
            kind: PointKind::Corner,
        },
        corner(b, a),
    ];

    let mut builder = test_builder(2.0, LineCap::Round, LineJoin::Miter);
    builder.polyline(&vertices, false).unwrap();

    let ring: Vec<OutlinePoint> = builder.outline().rings().next().unwrap().to_vec();
    assert_eq!(ring.len(), 5);
    assert_eq!(
        ring[2].kind,
        OutlineKind::HalfArc { center: b, radius: 1.0 }
    );
    assert_eq!(ring[4].position, ring[0].position);
    assert_eq!(
        ring[4].kind,
        OutlineKind::HalfArc { center: a, radius: 1.0 }
    );
}

#[test]
fn zero_length_sub_paths() {
    use crate::math::point;

    let p = point(5.0, 5.0);

    let mut butt = test_builder(4.0, LineCap::Butt, LineJoin::Miter);
    butt.dot(p, vector(1.0, 0.0)).unwrap();
    assert_eq!(butt.outline().ring_count(), 0);

    let mut square = test_builder(4.0, LineCap::Square, LineJoin::Miter);
    square.dot(p, vector(1.0, 0.0)).unwrap();
    let ring = positions(square.outline().rings().next().unwrap());
    assert_eq!(
        ring,
        vec![point(3.0, 3.0), point(7.0, 3.0), point(7.0, 7.0), point(3.0, 7.0)]
    );

    let mut round = test_builder(4.0, LineCap::Round, LineJoin::Miter);
    round.dot(p, vector(1.0, 0.0)).unwrap();
    let ring = round.outline().rings().next().unwrap();
    assert_eq!(ring.len(), 3);
    assert!(ring[1..]
        .iter()
        .all(|p| matches!(p.kind, OutlineKind::HalfArc { .. })));
}

#[test]
fn short_segments_after_sharp_turns_swing() {
    use crate::math::point;

    // A hairpin with a segment much shorter than the half width.
    let a = point(0.0, 0.0);
    let b = point(50.0, 0.0);
    let c = point(50.0, 1.0);
    let d = point(0.0, 1.0);
    let vertices = [
        Vertex {
            position: a,
            tangent: vector(1.0, 0.0),
            length: 0.0,
            kind: PointKind::Corner,
        },
        corner(b, a),
        corner(c, b),
        corner(d, c),
    ];

    let mut builder = test_builder(10.0, LineCap::Butt, LineJoin::Miter);
    builder.polyline(&vertices, false).unwrap();

    let rings: Vec<&[OutlinePoint]> = builder.outline().rings().collect();
    assert_eq!(rings.len(), 2);

    // The short segment gets a capsule.
    assert_eq!(
        positions(rings[0]),
        vec![
            point(55.0, 0.0),
            point(55.0, 1.0),
            point(45.0, 1.0),
            point(45.0, 0.0),
            point(55.0, 0.0),
        ]
    );
    assert_eq!(
        rings[0][2].kind,
        OutlineKind::HalfArc { center: c, radius: 5.0 }
    );
    assert_eq!(
        rings[0][4].kind,
        OutlineKind::HalfArc { center: b, radius: 5.0 }
    );

    // The turn is covered with an arc around the pivot instead of two joins.
    let ring = rings[1];
    let arcs: Vec<&OutlinePoint> = ring
        .iter()
        .filter(|p| matches!(p.kind, OutlineKind::Arc { .. }))
        .collect();
    assert_eq!(arcs.len(), 1);
    match arcs[0].kind {
        OutlineKind::Arc { center, radius, sweep } => {
            assert_eq!(center, b);
            assert_eq!(radius, 5.0);
            assert!((sweep - PI).abs() < 1e-3);
        }
        _ => unreachable!(),
    }

    // Both sides walk along the center line of the swing.
    let ring = positions(ring);
    assert_eq!(ring.iter().filter(|p| **p == b).count(), 2);
    assert_eq!(ring.iter().filter(|p| **p == c).count(), 2);
    assert!(ring.contains(&point(50.0, -5.0)));
    assert!(ring.contains(&point(50.0, 6.0)));
    assert!(ring.contains(&point(50.0, -4.0)));
}

#[test]
fn half_turn_swings_follow_the_turn() {
    use crate::math::point;

    // Turns left twice. The sign of the entry and exit cross product is
    // meaningless for a half turn.
    let a = point(50.0, 1.0);
    let b = point(0.0, 1.0);
    let c = point(0.0, 0.0);
    let d = point(50.0, 0.0);
    let vertices = [
        Vertex {
            position: a,
            tangent: vector(-1.0, 0.0),
            length: 0.0,
            kind: PointKind::Corner,
        },
        corner(b, a),
        corner(c, b),
        corner(d, c),
    ];

    let mut builder = test_builder(10.0, LineCap::Butt, LineJoin::Round);
    builder.polyline(&vertices, false).unwrap();

    let sweeps: Vec<(Point, f32)> = builder
        .outline()
        .rings()
        .flat_map(|ring| ring.iter())
        .filter_map(|p| match p.kind {
            OutlineKind::Arc { center, sweep, .. } => Some((center, sweep)),
            _ => None,
        })
        .collect();
    assert_eq!(sweeps.len(), 1);
    assert_eq!(sweeps[0].0, b);
    assert!((sweeps[0].1 - PI).abs() < 1e-3, "{:?}", sweeps);
}

#[test]
fn round_joins_of_reversals_go_around_the_vertex() {
    use crate::math::point;

    let a = point(50.0, 0.0);
    let b = point(0.0, 0.0);
    let c = point(50.0, 0.0);
    let vertices = [
        Vertex {
            position: a,
            tangent: vector(-1.0, 0.0),
            length: 0.0,
            kind: PointKind::Corner,
        },
        corner(b, a),
        corner(c, b),
    ];

    let mut builder = test_builder(10.0, LineCap::Butt, LineJoin::Round);
    builder.polyline(&vertices, false).unwrap();

    let ring = builder.outline().rings().next().unwrap();
    let arc = ring
        .iter()
        .find(|p| matches!(p.kind, OutlineKind::Arc { .. }))
        .unwrap();
    // From (0, 5) counter-clockwise through (-5, 0) to (0, -5).
    assert_eq!(arc.position, point(0.0, -5.0));
    assert_eq!(
        arc.kind,
        OutlineKind::Arc {
            center: b,
            radius: 5.0,
            sweep: PI,
        }
    );
}
