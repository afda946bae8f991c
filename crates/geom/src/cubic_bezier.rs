use crate::scalar::Scalar;
use crate::LineSegment;
use crate::{Point, Vector};

/// A 2d curve segment defined by four points: the beginning of the segment, two control
/// points and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)³ * from + 3 * (1 - t)² * t * ctrl1 + 3 * t² * (1 - t) * ctrl2 + t³ * to```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CubicBezierSegment<S> {
    pub from: Point<S>,
    pub ctrl1: Point<S>,
    pub ctrl2: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> CubicBezierSegment<S> {
    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: S) -> Point<S> {
        let t2 = t * t;
        let t3 = t2 * t;
        let one_t = S::ONE - t;
        let one_t2 = one_t * one_t;
        let one_t3 = one_t2 * one_t;

        self.from * one_t3
            + self.ctrl1.to_vector() * S::THREE * one_t2 * t
            + self.ctrl2.to_vector() * S::THREE * one_t * t2
            + self.to.to_vector() * t3
    }

    /// Split this curve into two sub-curves.
    pub fn split(&self, t: S) -> (CubicBezierSegment<S>, CubicBezierSegment<S>) {
        let ctrl1a = self.from + (self.ctrl1 - self.from) * t;
        let ctrl2a = self.ctrl1 + (self.ctrl2 - self.ctrl1) * t;
        let ctrl1aa = ctrl1a + (ctrl2a - ctrl1a) * t;
        let ctrl3a = self.ctrl2 + (self.to - self.ctrl2) * t;
        let ctrl2aa = ctrl2a + (ctrl3a - ctrl2a) * t;
        let ctrl1aaa = ctrl1aa + (ctrl2aa - ctrl1aa) * t;

        (
            CubicBezierSegment {
                from: self.from,
                ctrl1: ctrl1a,
                ctrl2: ctrl1aa,
                to: ctrl1aaa,
            },
            CubicBezierSegment {
                from: ctrl1aaa,
                ctrl1: ctrl2aa,
                ctrl2: ctrl3a,
                to: self.to,
            },
        )
    }

    #[inline]
    pub fn baseline(&self) -> LineSegment<S> {
        LineSegment {
            from: self.from,
            to: self.to,
        }
    }

    /// Maximum distance between the control points and the chord.
    ///
    /// The curve lies in the convex hull of its control points so it never strays
    /// from its chord by more than this amount.
    pub fn flatness(&self) -> S {
        let baseline = self.baseline();
        S::max(
            baseline.distance_to_point(self.ctrl1),
            baseline.distance_to_point(self.ctrl2),
        )
    }

    /// Upper bound of the magnitude of the second derivative over `[0, 1]`.
    ///
    /// The second derivative is linear in t so its magnitude peaks at one of the
    /// end points.
    pub fn max_second_derivative(&self) -> S {
        let d0 = self.from.to_vector() - self.ctrl1.to_vector() * S::TWO + self.ctrl2.to_vector();
        let d1 = self.ctrl1.to_vector() - self.ctrl2.to_vector() * S::TWO + self.to.to_vector();

        S::max(d0.length(), d1.length()) * S::SIX
    }

    /// Direction of the curve at its start, taken from the first control point
    /// that does not coincide with `from`.
    ///
    /// Returns `None` if all points of the curve are identical.
    pub fn start_direction(&self) -> Option<Vector<S>> {
        for p in &[self.ctrl1, self.ctrl2, self.to] {
            if *p != self.from {
                return Some(*p - self.from);
            }
        }

        None
    }

}

#[test]
fn split_cubic() {
    use crate::point;

    let curve = CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(0.0, 100.0),
        ctrl2: point(100.0, 100.0),
        to: point(100.0, 0.0),
    };

    let (a, b) = curve.split(0.5);
    assert_eq!(a.from, curve.from);
    assert_eq!(b.to, curve.to);
    assert_eq!(a.to, b.from);
    assert_eq!(a.to, point(50.0, 75.0));

    for i in 0..=10 {
        let t = i as f32 / 10.0;
        assert!((a.sample(t) - curve.sample(t * 0.5)).length() < 1e-3);
        assert!((b.sample(t) - curve.sample(0.5 + t * 0.5)).length() < 1e-3);
    }
}

#[test]
fn cubic_flatness_and_second_derivative() {
    use crate::point;

    let curve = CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(0.0, 100.0),
        ctrl2: point(100.0, 50.0),
        to: point(100.0, 0.0),
    };

    assert_eq!(curve.flatness(), 100.0);
    // d0 = (0, 0) - 2 * (0, 100) + (100, 50) = (100, -150)
    // d1 = (0, 100) - 2 * (100, 50) + (100, 0) = (-100, 0)
    let expected = 6.0 * (100.0f32 * 100.0 + 150.0 * 150.0).sqrt();
    assert!((curve.max_second_derivative() - expected).abs() < 1e-2);
}

#[test]
fn cubic_start_direction_skips_coincident_points() {
    use crate::{point, vector};

    let curve = CubicBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl1: point(0.0, 0.0),
        ctrl2: point(10.0, 10.0),
        to: point(10.0, 10.0),
    };
    assert_eq!(curve.start_direction(), Some(vector(10.0, 10.0)));

    let degenerate = CubicBezierSegment {
        from: point(3.0f32, 3.0),
        ctrl1: point(3.0, 3.0),
        ctrl2: point(3.0, 3.0),
        to: point(3.0, 3.0),
    };
    assert_eq!(degenerate.start_direction(), None);
}

