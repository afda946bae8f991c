use crate::scalar::Scalar;
use crate::{Point, Vector};

/// A linear segment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct LineSegment<S> {
    pub from: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> LineSegment<S> {
    /// Sample the segment at t (expecting t between 0 and 1).
    #[inline]
    pub fn sample(&self, t: S) -> Point<S> {
        self.from.lerp(self.to, t)
    }

    /// Returns the vector between this segment's `from` and `to` points.
    #[inline]
    pub fn to_vector(&self) -> Vector<S> {
        self.to - self.from
    }

    /// Returns the point of the segment that is closest to `p`.
    pub fn closest_point(&self, p: Point<S>) -> Point<S> {
        let v = self.to_vector();
        let square_length = v.square_length();
        if square_length <= S::ZERO {
            return self.from;
        }

        let t = ((p - self.from).dot(v) / square_length).max(S::ZERO).min(S::ONE);

        self.sample(t)
    }

    pub fn distance_to_point(&self, p: Point<S>) -> S {
        (self.closest_point(p) - p).length()
    }
}

#[test]
fn distance_to_segment() {
    use crate::point;

    let s = LineSegment {
        from: point(0.0f32, 0.0),
        to: point(10.0, 0.0),
    };

    assert_eq!(s.distance_to_point(point(5.0, 3.0)), 3.0);
    assert_eq!(s.distance_to_point(point(-4.0, 3.0)), 5.0);
    assert_eq!(s.distance_to_point(point(13.0, -4.0)), 5.0);

    let degenerate = LineSegment {
        from: point(1.0f32, 1.0),
        to: point(1.0, 1.0),
    };
    assert_eq!(degenerate.distance_to_point(point(4.0, 5.0)), 5.0);
}

