use crate::scalar::Scalar;
use crate::LineSegment;
use crate::{Point, Vector};

/// A 2d curve segment defined by three points: the beginning of the segment, a control
/// point and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)² * from + 2 * (1 - t) * t * ctrl + t² * to```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct QuadraticBezierSegment<S> {
    pub from: Point<S>,
    pub ctrl: Point<S>,
    pub to: Point<S>,
}

impl<S: Scalar> QuadraticBezierSegment<S> {
    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: S) -> Point<S> {
        let t2 = t * t;
        let one_t = S::ONE - t;
        let one_t2 = one_t * one_t;

        self.from * one_t2 + self.ctrl.to_vector() * S::TWO * one_t * t + self.to.to_vector() * t2
    }

    /// Split this curve into two sub-curves.
    pub fn split(&self, t: S) -> (QuadraticBezierSegment<S>, QuadraticBezierSegment<S>) {
        let split_point = self.sample(t);

        (
            QuadraticBezierSegment {
                from: self.from,
                ctrl: self.from.lerp(self.ctrl, t),
                to: split_point,
            },
            QuadraticBezierSegment {
                from: split_point,
                ctrl: self.ctrl.lerp(self.to, t),
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

    /// Maximum distance between the control point and the chord.
    ///
    /// The curve never strays from its chord by more than this amount.
    pub fn flatness(&self) -> S {
        self.baseline().distance_to_point(self.ctrl)
    }

    /// Magnitude of the second derivative, which is constant along a quadratic bézier.
    pub fn max_second_derivative(&self) -> S {
        let d = self.from.to_vector() - self.ctrl.to_vector() * S::TWO + self.to.to_vector();
        d.length() * S::TWO
    }

    /// Direction of the curve at its start, taken from the first control point
    /// that does not coincide with `from`.
    ///
    /// Returns `None` if all points of the curve are identical.
    pub fn start_direction(&self) -> Option<Vector<S>> {
        if self.ctrl != self.from {
            return Some(self.ctrl - self.from);
        }
        if self.to != self.from {
            return Some(self.to - self.from);
        }

        None
    }

}

#[test]
fn split_quadratic() {
    use crate::point;

    let curve = QuadraticBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl: point(50.0, 100.0),
        to: point(100.0, 0.0),
    };

    let (a, b) = curve.split(0.5);
    assert_eq!(a.from, curve.from);
    assert_eq!(b.to, curve.to);
    assert_eq!(a.to, b.from);
    assert_eq!(a.to, point(50.0, 50.0));
    assert_eq!(a.ctrl, point(25.0, 50.0));
    assert_eq!(b.ctrl, point(75.0, 50.0));
}

#[test]
fn quadratic_flatness_and_second_derivative() {
    use crate::point;

    let curve = QuadraticBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl: point(50.0, 100.0),
        to: point(100.0, 0.0),
    };

    assert_eq!(curve.flatness(), 100.0);
    // |2 * (from - 2 * ctrl + to)| = |2 * (0, -200)|
    assert_eq!(curve.max_second_derivative(), 400.0);

    let flat = QuadraticBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl: point(5.0, 0.0),
        to: point(10.0, 0.0),
    };
    assert_eq!(flat.flatness(), 0.0);
    assert_eq!(flat.max_second_derivative(), 0.0);
}

#[test]
fn quadratic_start_direction_skips_coincident_points() {
    use crate::{point, vector};

    let curve = QuadraticBezierSegment {
        from: point(0.0f32, 0.0),
        ctrl: point(0.0, 0.0),
        to: point(10.0, 5.0),
    };
    assert_eq!(curve.start_direction(), Some(vector(10.0, 5.0)));

    let degenerate = QuadraticBezierSegment {
        from: point(1.0f32, 1.0),
        ctrl: point(1.0, 1.0),
        to: point(1.0, 1.0),
    };
    assert_eq!(degenerate.start_direction(), None);
}

