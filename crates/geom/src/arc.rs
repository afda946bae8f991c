//! Elliptic arc related maths and tools.

use crate::scalar::{Float, FloatConst, NumCast, Scalar};
use crate::QuadraticBezierSegment;
use crate::{point, vector, Angle, Point, Rotation, Vector};
#[cfg(test)]
use std::vec::Vec;

/// An elliptic arc curve segment using the SVG's end-point notation.
///
/// See <https://www.w3.org/TR/SVG/implnote.html#ArcImplementationNotes>.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct SvgArc<S> {
    pub from: Point<S>,
    pub to: Point<S>,
    pub radii: Vector<S>,
    pub x_rotation: Angle<S>,
    pub flags: ArcFlags,
}

/// An elliptic arc curve segment using the center parameterization.
///
/// A positive `sweep_angle` goes from the x axis towards the y axis.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Arc<S> {
    pub center: Point<S>,
    pub radii: Vector<S>,
    pub start_angle: Angle<S>,
    pub sweep_angle: Angle<S>,
    pub x_rotation: Angle<S>,
}

/// Flag parameters for arcs as described by the SVG specification.
///
/// `sweep` selects the positive angle direction, `large_arc` selects the
/// arc spanning more than 180 degrees.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct ArcFlags {
    pub large_arc: bool,
    pub sweep: bool,
}

impl<S: Scalar> Arc<S> {
    /// A circular arc.
    pub fn circle(center: Point<S>, radius: S, start_angle: Angle<S>, sweep_angle: Angle<S>) -> Self {
        Arc {
            center,
            radii: vector(radius, radius),
            start_angle,
            sweep_angle,
            x_rotation: Angle::zero(),
        }
    }

    /// Convert from the SVG arc notation.
    ///
    /// Radii that are too small to join both end points are scaled up
    /// uniformly until the arc fits. The arc must not be a straight line
    /// (see `SvgArc::is_straight_line`).
    pub fn from_svg_arc(arc: &SvgArc<S>) -> Arc<S> {
        debug_assert!(!arc.from.x.is_nan());
        debug_assert!(!arc.from.y.is_nan());
        debug_assert!(!arc.to.x.is_nan());
        debug_assert!(!arc.to.y.is_nan());
        debug_assert!(!arc.radii.x.is_nan());
        debug_assert!(!arc.radii.y.is_nan());
        debug_assert!(!arc.x_rotation.get().is_nan());
        debug_assert!(!arc.is_straight_line());

        let mut rx = Float::abs(arc.radii.x);
        let mut ry = Float::abs(arc.radii.y);

        let xr = arc.x_rotation.get() % (S::TWO * S::PI());
        let cos_phi = Float::cos(xr);
        let sin_phi = Float::sin(xr);
        let hd_x = (arc.from.x - arc.to.x) / S::TWO;
        let hd_y = (arc.from.y - arc.to.y) / S::TWO;
        let hs_x = (arc.from.x + arc.to.x) / S::TWO;
        let hs_y = (arc.from.y + arc.to.y) / S::TWO;

        // F6.5.1
        let p = point(
            cos_phi * hd_x + sin_phi * hd_y,
            -sin_phi * hd_x + cos_phi * hd_y,
        );

        // F6.6.2
        let lambda = (p.x * p.x) / (rx * rx) + (p.y * p.y) / (ry * ry);
        if lambda > S::ONE {
            let scale = Float::sqrt(lambda);
            rx *= scale;
            ry *= scale;
        }

        let rxry = rx * ry;
        let rxpy = rx * p.y;
        let rypx = ry * p.x;
        let sum_of_sq = rxpy * rxpy + rypx * rypx;

        debug_assert!(sum_of_sq != S::ZERO);

        // F6.5.2
        let sign_coe = if arc.flags.large_arc == arc.flags.sweep {
            -S::ONE
        } else {
            S::ONE
        };
        let coe = sign_coe * Float::sqrt(S::max(S::ZERO, (rxry * rxry - sum_of_sq) / sum_of_sq));
        let transformed_cx = coe * rxpy / ry;
        let transformed_cy = -coe * rypx / rx;

        // F6.5.3
        let center = point(
            cos_phi * transformed_cx - sin_phi * transformed_cy + hs_x,
            sin_phi * transformed_cx + cos_phi * transformed_cy + hs_y,
        );

        // F6.5.5
        let a = vector((p.x - transformed_cx) / rx, (p.y - transformed_cy) / ry);
        let b = vector((-p.x - transformed_cx) / rx, (-p.y - transformed_cy) / ry);

        let start_angle = Float::atan2(a.y, a.x);
        let mut sweep_angle = Float::atan2(b.y, b.x) - start_angle;

        // F6.5.6
        let tau = S::TWO * S::PI();
        if arc.flags.sweep && sweep_angle < S::ZERO {
            sweep_angle += tau;
        } else if !arc.flags.sweep && sweep_angle > S::ZERO {
            sweep_angle -= tau;
        }

        Arc {
            center,
            radii: vector(rx, ry),
            start_angle: Angle::radians(start_angle),
            sweep_angle: Angle::radians(sweep_angle),
            x_rotation: arc.x_rotation,
        }
    }

    /// Sample the curve at t (expecting t between 0 and 1).
    #[inline]
    pub fn sample(&self, t: S) -> Point<S> {
        let angle = self.get_angle(t);
        self.center + sample_ellipse(self.radii, self.x_rotation, angle).to_vector()
    }

    /// Sample the curve's angle at t (expecting t between 0 and 1).
    #[inline]
    pub fn get_angle(&self, t: S) -> Angle<S> {
        self.start_angle + Angle::radians(self.sweep_angle.get() * t)
    }

    #[inline]
    pub fn end_angle(&self) -> Angle<S> {
        self.start_angle + self.sweep_angle
    }

    #[inline]
    pub fn from(&self) -> Point<S> {
        self.sample(S::ZERO)
    }

    #[inline]
    pub fn to(&self) -> Point<S> {
        self.sample(S::ONE)
    }

    /// Number of quadratic bézier curves used to approximate this arc.
    ///
    /// Each curve spans at most 45 degrees.
    pub fn quadratic_bezier_count(&self) -> usize {
        let sweep = S::min(Float::abs(self.sweep_angle.get()), S::TWO * S::PI());
        let n = Float::ceil(sweep / S::FRAC_PI_4() - S::EPSILON);
        <usize as NumCast>::from(n).unwrap_or(1).max(1)
    }

    /// Approximates the arc with a sequence of quadratic bézier curves.
    ///
    /// The control point of each curve is the intersection of the arc's tangents
    /// at the curve's end points. The last curve ends exactly at `self.to()`.
    pub fn for_each_quadratic_bezier<F>(&self, cb: &mut F)
    where
        F: FnMut(&QuadraticBezierSegment<S>),
    {
        let n = self.quadratic_bezier_count();
        let step = self.sweep_angle.get() / S::value(n as f32);
        let half_step_cos = Float::cos(step / S::TWO);

        let mut from = self.from();
        let mut a1 = self.start_angle.get();
        for i in 0..n {
            let a2 = if i + 1 == n {
                self.end_angle().get()
            } else {
                a1 + step
            };
            let mid = Angle::radians((a1 + a2) / S::TWO);
            let on_ellipse = sample_ellipse(self.radii, self.x_rotation, mid).to_vector();
            let ctrl = self.center + on_ellipse / half_step_cos;
            let to = self.center + sample_ellipse(self.radii, self.x_rotation, Angle::radians(a2)).to_vector();

            cb(&QuadraticBezierSegment { from, ctrl, to });

            from = to;
            a1 = a2;
        }
    }
}

impl<S: Scalar> SvgArc<S> {
    /// Per SVG, an arc with a zero radius or identical end points is a line segment.
    pub fn is_straight_line(&self) -> bool {
        Float::abs(self.radii.x) <= S::EPSILON
            || Float::abs(self.radii.y) <= S::EPSILON
            || self.from == self.to
    }

    pub fn to_arc(&self) -> Arc<S> {
        Arc::from_svg_arc(self)
    }

    /// Approximates the arc with quadratic bézier curves starting and ending
    /// exactly at `from` and `to`.
    ///
    /// The arc must not be a straight line.
    pub fn for_each_quadratic_bezier<F>(&self, cb: &mut F)
    where
        F: FnMut(&QuadraticBezierSegment<S>),
    {
        let mut last = self.from;
        let target = self.to;
        Arc::from_svg_arc(self).for_each_quadratic_bezier(&mut |curve| {
            let mut curve = *curve;
            // Snap to the requested end points, the center parameterization
            // loses a few bits of precision.
            curve.from = last;
            if (curve.to - target).square_length() <= S::EPSILON {
                curve.to = target;
            }
            last = curve.to;
            cb(&curve);
        });
    }
}

fn sample_ellipse<S: Scalar>(radii: Vector<S>, x_rotation: Angle<S>, angle: Angle<S>) -> Point<S> {
    Rotation::new(x_rotation).transform_point(point(
        radii.x * Float::cos(angle.get()),
        radii.y * Float::sin(angle.get()),
    ))
}

#[test]
fn half_circle_from_svg_arc() {
    let arc = SvgArc {
        from: point(0.0f32, 0.0),
        to: point(10.0, 0.0),
        radii: vector(5.0, 5.0),
        x_rotation: Angle::zero(),
        flags: ArcFlags {
            large_arc: false,
            sweep: true,
        },
    }
    .to_arc();

    assert!((arc.center - point(5.0, 0.0)).length() < 1e-4);
    assert!((arc.sweep_angle.get() - core::f32::consts::PI).abs() < 1e-4);
    assert!((arc.from() - point(0.0, 0.0)).length() < 1e-4);
    assert!((arc.to() - point(10.0, 0.0)).length() < 1e-4);
    // Positive sweep goes through positive y.
    assert!(arc.sample(0.5).y > 4.99);
}

#[test]
fn negative_sweep_from_svg_arc() {
    let arc = SvgArc {
        from: point(0.0f32, 0.0),
        to: point(10.0, 0.0),
        radii: vector(5.0, 5.0),
        x_rotation: Angle::zero(),
        flags: ArcFlags {
            large_arc: false,
            sweep: false,
        },
    }
    .to_arc();

    assert!((arc.sweep_angle.get() + core::f32::consts::PI).abs() < 1e-4);
    assert!(arc.sample(0.5).y < -4.99);
}

#[test]
fn radii_are_scaled_up_when_too_small() {
    let arc = SvgArc {
        from: point(0.0f32, 0.0),
        to: point(10.0, 0.0),
        radii: vector(1.0, 1.0),
        x_rotation: Angle::zero(),
        flags: ArcFlags::default(),
    }
    .to_arc();

    assert!((arc.radii.x - 5.0).abs() < 1e-4);
    assert!((arc.radii.y - 5.0).abs() < 1e-4);
    assert!((arc.center - point(5.0, 0.0)).length() < 1e-3);
}

#[test]
fn large_arc_sweeps_more_than_half_a_turn() {
    let arc = SvgArc {
        from: point(0.0f32, 0.0),
        to: point(10.0, 10.0),
        radii: vector(10.0, 10.0),
        x_rotation: Angle::zero(),
        flags: ArcFlags {
            large_arc: true,
            sweep: true,
        },
    }
    .to_arc();

    let sweep = arc.sweep_angle.get();
    assert!((sweep - 1.5 * core::f32::consts::PI).abs() < 1e-3);
    assert_eq!(arc.quadratic_bezier_count(), 6);
}

#[test]
fn straight_svg_arcs() {
    let mut arc = SvgArc {
        from: point(0.0f32, 0.0),
        to: point(10.0, 0.0),
        radii: vector(0.0, 5.0),
        x_rotation: Angle::zero(),
        flags: ArcFlags::default(),
    };
    assert!(arc.is_straight_line());

    arc.radii = vector(5.0, 5.0);
    assert!(!arc.is_straight_line());

    arc.to = arc.from;
    assert!(arc.is_straight_line());
}

#[test]
fn quadratic_bezier_counts() {
    let count = |degrees: f32| {
        Arc::circle(
            point(0.0f32, 0.0),
            1.0,
            Angle::zero(),
            Angle::degrees(degrees),
        )
        .quadratic_bezier_count()
    };

    assert_eq!(count(10.0), 1);
    assert_eq!(count(45.0), 1);
    assert_eq!(count(90.0), 2);
    assert_eq!(count(135.0), 3);
    assert_eq!(count(-180.0), 4);
    assert_eq!(count(360.0), 8);
    assert_eq!(count(0.0), 1);
}

#[test]
fn quarter_circle_to_quadratic_beziers() {
    let arc = Arc::circle(
        point(0.0f32, 0.0),
        10.0,
        Angle::zero(),
        Angle::frac_pi_2(),
    );

    let mut curves = Vec::new();
    arc.for_each_quadratic_bezier(&mut |curve| curves.push(*curve));

    assert_eq!(curves.len(), 2);
    assert!((curves[0].from - point(10.0, 0.0)).length() < 1e-4);
    assert_eq!(curves[0].to, curves[1].from);
    assert!((curves[1].to - point(0.0, 10.0)).length() < 1e-4);

    for curve in &curves {
        for i in 0..=8 {
            let r = curve.sample(i as f32 / 8.0).to_vector().length();
            assert!((r - 10.0).abs() < 0.05, "{}", r);
        }
    }
}
