//! Approximates the edges of a path with polylines.
//!
//! Vertices are stored in a [`PointArena`] and linked to their neighbours by
//! index. Each vertex carries the unit tangent and the length of the segment
//! that leads to it, which is all the outline builder needs to compute joins.
//!
//! Curves are flattened with a mix of subdivision and uniform sampling: while
//! a curve is too far from its chord it is split in two halves, and once it is
//! flat enough (or the depth limit is reached) it is sampled at regular
//! parameter steps. The number of steps derives from the bound of the second
//! derivative, which bounds the distance between the curve and its chords.

use crate::geom::utils::unit_and_length;
use crate::geom::{CubicBezierSegment, QuadraticBezierSegment};
use crate::math::{vector, Point, Vector};
use crate::path::{Error, PathEvent};

/// Maximum number of times a curve gets split in half.
const MAX_DEPTH: u32 = 10;
/// Maximum number of uniform samples per curve piece.
const MAX_SAMPLES: f32 = 100.0;
/// Segments shorter than this fraction of the coordinates' magnitude are dropped.
const RELATIVE_EPSILON: f32 = 1e-5;

/// Index of a vertex in a `PointArena`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(u32);

impl PointId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a vertex was produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointKind {
    /// An end point of an edge of the path, or a dash boundary.
    Corner,
    /// A sample in the middle of a flattened curve.
    Curve,
}

/// A vertex of a flattened sub-path.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub position: Point,
    /// Unit tangent of the segment ending at this vertex.
    pub tangent: Vector,
    /// Length of the segment ending at this vertex.
    pub length: f32,
    pub kind: PointKind,
}

#[derive(Copy, Clone, Debug)]
struct Node {
    vertex: Vertex,
    prev: Option<PointId>,
    next: Option<PointId>,
}

/// Storage for the vertices of all flattened sub-paths.
#[derive(Default)]
pub struct PointArena {
    nodes: Vec<Node>,
}

impl PointArena {
    pub fn new() -> Self {
        PointArena { nodes: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Adds a vertex after `prev`.
    fn push(&mut self, vertex: Vertex, prev: Option<PointId>) -> Result<PointId, Error> {
        self.nodes.try_reserve(1)?;
        let id = PointId(self.nodes.len() as u32);
        self.nodes.push(Node {
            vertex,
            prev,
            next: None,
        });
        if let Some(prev) = prev {
            self.nodes[prev.index()].next = Some(id);
        }

        Ok(id)
    }

    /// Detaches a vertex from its neighbours.
    fn unlink(&mut self, id: PointId) {
        let Node { prev, next, .. } = self.nodes[id.index()];
        if let Some(prev) = prev {
            self.nodes[prev.index()].next = next;
        }
        if let Some(next) = next {
            self.nodes[next.index()].prev = prev;
        }
        let node = &mut self.nodes[id.index()];
        node.prev = None;
        node.next = None;
    }

    #[inline]
    pub fn get(&self, id: PointId) -> &Vertex {
        &self.nodes[id.index()].vertex
    }

    #[inline]
    fn get_mut(&mut self, id: PointId) -> &mut Vertex {
        &mut self.nodes[id.index()].vertex
    }

    #[inline]
    pub fn prev(&self, id: PointId) -> Option<PointId> {
        self.nodes[id.index()].prev
    }

    #[inline]
    pub fn next(&self, id: PointId) -> Option<PointId> {
        self.nodes[id.index()].next
    }

    /// Iterates over the vertices of a sub-path, from first to last.
    pub fn chain(&self, sub_path: &SubPath) -> Chain {
        Chain {
            arena: self,
            current: Some(sub_path.first),
            last: sub_path.last,
        }
    }
}

/// Iterator over the vertices of a sub-path.
pub struct Chain<'l> {
    arena: &'l PointArena,
    current: Option<PointId>,
    last: PointId,
}

impl<'l> Iterator for Chain<'l> {
    type Item = &'l Vertex;

    fn next(&mut self) -> Option<&'l Vertex> {
        let id = self.current?;
        self.current = if id == self.last {
            None
        } else {
            self.arena.next(id)
        };

        Some(self.arena.get(id))
    }
}

/// A flattened sub-path.
///
/// A sub-path with a single vertex is a zero-length sub-path which only
/// receives caps.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SubPath {
    pub first: PointId,
    pub last: PointId,
    pub count: usize,
    /// If true, the first vertex carries the tangent and length of the
    /// segment that closes the loop.
    pub closed: bool,
}

impl SubPath {
    pub fn is_zero_length(&self) -> bool {
        self.count == 1
    }
}

#[derive(Copy, Clone, Debug)]
enum Curve {
    Quadratic(QuadraticBezierSegment<f32>),
    Cubic(CubicBezierSegment<f32>),
}

impl Curve {
    fn flatness(&self) -> f32 {
        match self {
            Curve::Quadratic(c) => c.flatness(),
            Curve::Cubic(c) => c.flatness(),
        }
    }

    fn max_second_derivative(&self) -> f32 {
        match self {
            Curve::Quadratic(c) => c.max_second_derivative(),
            Curve::Cubic(c) => c.max_second_derivative(),
        }
    }

    fn sample(&self, t: f32) -> Point {
        match self {
            Curve::Quadratic(c) => c.sample(t),
            Curve::Cubic(c) => c.sample(t),
        }
    }

    fn to(&self) -> Point {
        match self {
            Curve::Quadratic(c) => c.to,
            Curve::Cubic(c) => c.to,
        }
    }

    fn is_a_point(&self) -> bool {
        match self {
            Curve::Quadratic(c) => c.start_direction().is_none(),
            Curve::Cubic(c) => c.start_direction().is_none(),
        }
    }

    fn split(&self) -> (Curve, Curve) {
        match self {
            Curve::Quadratic(c) => {
                let (a, b) = c.split(0.5);
                (Curve::Quadratic(a), Curve::Quadratic(b))
            }
            Curve::Cubic(c) => {
                let (a, b) = c.split(0.5);
                (Curve::Cubic(a), Curve::Cubic(b))
            }
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct OpenSubPath {
    first: PointId,
    last: PointId,
    count: usize,
    has_edges: bool,
}

/// Flattens path events into sub-paths of vertices.
pub struct Flattener {
    arena: PointArena,
    sub_paths: Vec<SubPath>,
    stack: Vec<(Curve, u32)>,
    current: Option<OpenSubPath>,
    tolerance: f32,
    sample_scale: f32,
}

impl Flattener {
    pub fn new() -> Self {
        Flattener {
            arena: PointArena::new(),
            sub_paths: Vec::new(),
            stack: Vec::new(),
            current: None,
            tolerance: 0.1,
            sample_scale: 1.0,
        }
    }

    /// Prepares for a new path, keeping the allocations.
    ///
    /// Fat strokes magnify the flattening error at their edges, so curves get
    /// more samples when the line width exceeds 2.
    pub fn reset(&mut self, tolerance: f32, line_width: f32) {
        self.arena.clear();
        self.sub_paths.clear();
        self.stack.clear();
        self.current = None;
        self.tolerance = tolerance;
        self.sample_scale = if line_width > 2.0 {
            (line_width * 0.5).sqrt()
        } else {
            1.0
        };
    }

    pub fn arena(&self) -> &PointArena {
        &self.arena
    }

    pub fn sub_paths(&self) -> &[SubPath] {
        &self.sub_paths
    }

    /// Flattens all events of a path.
    pub fn flatten<Iter>(&mut self, events: Iter) -> Result<(), Error>
    where
        Iter: IntoIterator<Item = PathEvent>,
    {
        for event in events {
            self.event(event)?;
        }
        self.end(false)
    }

    pub fn event(&mut self, event: PathEvent) -> Result<(), Error> {
        match event {
            PathEvent::Begin { at } => self.begin(at),
            PathEvent::Line { to, .. } => self.line_to(to, PointKind::Corner),
            PathEvent::Quadratic { from, ctrl, to } => {
                self.curve(Curve::Quadratic(QuadraticBezierSegment { from, ctrl, to }))
            }
            PathEvent::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => self.curve(Curve::Cubic(CubicBezierSegment {
                from,
                ctrl1,
                ctrl2,
                to,
            })),
            PathEvent::End { close, .. } => self.end(close),
        }
    }

    fn begin(&mut self, at: Point) -> Result<(), Error> {
        self.end(false)?;

        let id = self.arena.push(
            Vertex {
                position: at,
                tangent: vector(1.0, 0.0),
                length: 0.0,
                kind: PointKind::Corner,
            },
            None,
        )?;
        self.current = Some(OpenSubPath {
            first: id,
            last: id,
            count: 1,
            has_edges: false,
        });

        Ok(())
    }

    fn line_to(&mut self, to: Point, kind: PointKind) -> Result<(), Error> {
        let mut sub_path = match self.current {
            Some(sp) => sp,
            None => return Ok(()),
        };
        sub_path.has_edges = true;

        let last = *self.arena.get(sub_path.last);
        let delta = to - last.position;
        if is_negligible(delta, to) {
            // The end of an edge must stay a corner even when its last sample is dropped.
            if kind == PointKind::Corner {
                self.arena.get_mut(sub_path.last).kind = PointKind::Corner;
            }
            self.current = Some(sub_path);
            return Ok(());
        }

        let (tangent, length) = match unit_and_length(delta) {
            Some(tl) => tl,
            None => (last.tangent, 0.0),
        };

        let id = self.arena.push(
            Vertex {
                position: to,
                tangent,
                length,
                kind,
            },
            Some(sub_path.last),
        )?;

        if sub_path.count == 1 {
            // Give the first vertex a meaningful direction for caps.
            self.arena.get_mut(sub_path.first).tangent = tangent;
        }

        sub_path.last = id;
        sub_path.count += 1;
        self.current = Some(sub_path);

        Ok(())
    }

    fn curve(&mut self, curve: Curve) -> Result<(), Error> {
        if curve.is_a_point() {
            return self.line_to(curve.to(), PointKind::Corner);
        }

        let threshold = 8.0 * self.tolerance;
        self.stack.clear();
        self.stack.try_reserve(MAX_DEPTH as usize + 1)?;
        self.stack.push((curve, 0));

        while let Some((piece, depth)) = self.stack.pop() {
            if piece.flatness() > threshold && depth < MAX_DEPTH {
                let (a, b) = piece.split();
                self.stack.push((b, depth + 1));
                self.stack.push((a, depth + 1));
                continue;
            }

            let is_last_piece = self.stack.is_empty();
            let n = self.sample_count(&piece);
            let step = 1.0 / n as f32;
            for i in 1..=n {
                let (p, kind) = if i == n {
                    let kind = if is_last_piece {
                        PointKind::Corner
                    } else {
                        PointKind::Curve
                    };
                    (piece.to(), kind)
                } else {
                    (piece.sample(i as f32 * step), PointKind::Curve)
                };
                self.line_to(p, kind)?;
            }
        }

        Ok(())
    }

    fn sample_count(&self, curve: &Curve) -> u32 {
        let n = (curve.max_second_derivative() / (8.0 * self.tolerance)).sqrt();
        let n = (n * self.sample_scale).ceil();
        if n.is_nan() {
            return 1;
        }

        n.max(1.0).min(MAX_SAMPLES) as u32
    }

    fn end(&mut self, close: bool) -> Result<(), Error> {
        let mut sub_path = match self.current.take() {
            Some(sp) => sp,
            None => return Ok(()),
        };

        if !sub_path.has_edges && !close {
            log::trace!(
                "pruned empty sub-path at {:?}",
                self.arena.get(sub_path.first).position
            );
            return Ok(());
        }

        let mut closed = false;
        if close && sub_path.count > 1 {
            let first = *self.arena.get(sub_path.first);
            let last_position = self.arena.get(sub_path.last).position;
            if !is_negligible(first.position - last_position, first.position) {
                self.current = Some(sub_path);
                self.line_to(first.position, PointKind::Corner)?;
                // The closing line is long enough to not be rejected.
                sub_path = self.current.take().unwrap_or(sub_path);
            }

            // The last vertex is the first one. Keep the tangent of the
            // closing segment on the first vertex and drop the duplicate.
            let duplicate = sub_path.last;
            let closing = *self.arena.get(duplicate);
            if let Some(prev) = self.arena.prev(duplicate) {
                self.arena.unlink(duplicate);
                let first = self.arena.get_mut(sub_path.first);
                first.tangent = closing.tangent;
                first.length = closing.length;
                first.kind = PointKind::Corner;
                sub_path.last = prev;
                sub_path.count -= 1;
                closed = sub_path.count > 1;
            }
        }

        if sub_path.count == 1 {
            // Zero-length sub-paths are drawn with caps only, along the x axis.
            self.arena.get_mut(sub_path.first).tangent = vector(1.0, 0.0);
        }

        self.sub_paths.try_reserve(1)?;
        self.sub_paths.push(SubPath {
            first: sub_path.first,
            last: sub_path.last,
            count: sub_path.count,
            closed,
        });

        Ok(())
    }
}

impl Default for Flattener {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `delta` is too short to produce a reliable tangent at `p`.
fn is_negligible(delta: Vector, p: Point) -> bool {
    let threshold = RELATIVE_EPSILON * (p.x.abs().max(p.y.abs()) + 1.0);
    delta.x.abs() <= threshold && delta.y.abs() <= threshold
}

#[cfg(test)]
fn flatten_events(events: &[PathEvent], tolerance: f32) -> Flattener {
    let mut flattener = Flattener::new();
    flattener.reset(tolerance, 1.0);
    flattener.flatten(events.iter().cloned()).unwrap();

    flattener
}

#[test]
fn polyline_tangents() {
    use crate::math::point;

    let f = flatten_events(
        &[
            PathEvent::Begin { at: point(0.0, 0.0) },
            PathEvent::Line { from: point(0.0, 0.0), to: point(10.0, 0.0) },
            PathEvent::Line { from: point(10.0, 0.0), to: point(10.0, 0.0) },
            PathEvent::Line { from: point(10.0, 0.0), to: point(10.0, 5.0) },
            PathEvent::End { last: point(10.0, 5.0), first: point(0.0, 0.0), close: false },
        ],
        0.1,
    );

    assert_eq!(f.sub_paths().len(), 1);
    let sp = f.sub_paths()[0];
    assert_eq!(sp.count, 3);
    assert!(!sp.closed);

    let vertices: Vec<Vertex> = f.arena().chain(&sp).cloned().collect();
    assert_eq!(vertices.len(), 3);
    assert!((vertices[1].tangent - vector(1.0, 0.0)).length() < 1e-5);
    assert!((vertices[1].length - 10.0).abs() < 1e-4);
    assert!((vertices[2].tangent - vector(0.0, 1.0)).length() < 1e-5);
    assert!((vertices[2].length - 5.0).abs() < 1e-4);
    // The first vertex borrows the direction of the first segment.
    assert_eq!(vertices[0].tangent, vertices[1].tangent);
}

#[test]
fn closing_segment() {
    use crate::math::point;

    let f = flatten_events(
        &[
            PathEvent::Begin { at: point(0.0, 0.0) },
            PathEvent::Line { from: point(0.0, 0.0), to: point(10.0, 0.0) },
            PathEvent::Line { from: point(10.0, 0.0), to: point(10.0, 10.0) },
            PathEvent::End { last: point(10.0, 10.0), first: point(0.0, 0.0), close: true },
        ],
        0.1,
    );

    let sp = f.sub_paths()[0];
    assert!(sp.closed);
    assert_eq!(sp.count, 3);

    let first = f.arena().get(sp.first);
    let d = vector(-1.0, -1.0) / 2.0f32.sqrt();
    assert!((first.tangent - d).length() < 1e-4);
    assert!((first.length - 200.0f32.sqrt()).abs() < 1e-3);
    assert_eq!(f.arena().next(sp.last), None);
}

#[test]
fn empty_and_zero_length_sub_paths() {
    use crate::math::point;

    let f = flatten_events(
        &[
            // A lone move produces nothing.
            PathEvent::Begin { at: point(0.0, 0.0) },
            PathEvent::End { last: point(0.0, 0.0), first: point(0.0, 0.0), close: false },
            // A zero-length line produces a zero-length sub-path.
            PathEvent::Begin { at: point(5.0, 5.0) },
            PathEvent::Line { from: point(5.0, 5.0), to: point(5.0, 5.0) },
            PathEvent::End { last: point(5.0, 5.0), first: point(5.0, 5.0), close: false },
        ],
        0.1,
    );

    assert_eq!(f.sub_paths().len(), 1);
    assert!(f.sub_paths()[0].is_zero_length());
    assert_eq!(f.arena().get(f.sub_paths()[0].first).position, point(5.0, 5.0));
}

#[test]
fn curves_stay_within_tolerance() {
    use crate::math::point;

    let curve = QuadraticBezierSegment {
        from: point(0.0, 0.0),
        ctrl: point(50.0, 100.0),
        to: point(100.0, 0.0),
    };
    let tolerance = 0.1;
    let f = flatten_events(
        &[
            PathEvent::Begin { at: curve.from },
            PathEvent::Quadratic { from: curve.from, ctrl: curve.ctrl, to: curve.to },
            PathEvent::End { last: curve.to, first: curve.from, close: false },
        ],
        tolerance,
    );

    let sp = f.sub_paths()[0];
    let vertices: Vec<Vertex> = f.arena().chain(&sp).cloned().collect();
    assert!(vertices.len() > 4);
    assert_eq!(vertices.last().unwrap().position, curve.to);
    assert_eq!(vertices.last().unwrap().kind, PointKind::Corner);
    assert!(vertices[1..vertices.len() - 1]
        .iter()
        .all(|v| v.kind == PointKind::Curve));

    // The middle of each chord is close to the curve.
    let samples: Vec<Point> = (0..=5000).map(|i| curve.sample(i as f32 / 5000.0)).collect();
    for pair in vertices.windows(2) {
        let mid = pair[0].position.lerp(pair[1].position, 0.5);
        let d = samples
            .iter()
            .map(|s| (*s - mid).length())
            .fold(core::f32::MAX, f32::min);
        assert!(d <= tolerance * 1.5, "{:?}", d);
    }
}

#[test]
fn degenerate_curves() {
    use crate::math::point;

    let p = point(3.0, 3.0);
    let f = flatten_events(
        &[
            PathEvent::Begin { at: p },
            PathEvent::Cubic { from: p, ctrl1: p, ctrl2: p, to: p },
            PathEvent::End { last: p, first: p, close: false },
        ],
        0.1,
    );

    assert_eq!(f.sub_paths().len(), 1);
    assert!(f.sub_paths()[0].is_zero_length());
}
