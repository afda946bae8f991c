//! Various math tools that are useful for several modules.

use crate::{vector, Vector};

/// Fast approximate square root.
///
/// The input is range-reduced to `[1, 4)` using its exponent bits, a quadratic
/// first guess is refined with two Newton-Raphson iterations and the result is
/// scaled back. The relative error is below `1e-6` over the whole `f32` range.
///
/// Returns zero for zero, negative and NaN inputs.
pub fn approx_sqrt(x: f32) -> f32 {
    if !(x > 0.0) {
        return 0.0;
    }
    if x.is_infinite() {
        return x;
    }

    // Normalize subnormals so that the exponent bits are meaningful.
    let (x, post_scale) = if x < core::f32::MIN_POSITIVE {
        (x * 16777216.0, 1.0 / 4096.0)
    } else {
        (x, 1.0)
    };

    let bits = x.to_bits();
    let exponent = ((bits >> 23) & 0xff) as i32 - 127;
    // Even exponent, so that sqrt(2^e) stays a power of two.
    let half = exponent.div_euclid(2);
    let mantissa_bits = (bits & 0x807f_ffff) | (((exponent - 2 * half + 127) as u32) << 23);
    let m = f32::from_bits(mantissa_bits);

    let mut y = 0.5224 + 0.51367 * m - 0.03607 * m * m;
    y = 0.5 * (y + m / y);
    y = 0.5 * (y + m / y);

    let scale = f32::from_bits(((half + 127) as u32) << 23);

    y * scale * post_scale
}

/// Unit vector and length of `v`, using `approx_sqrt`.
///
/// The components are clamped to `[-1, 1]`. Returns `None` for a zero vector.
pub fn unit_and_length(v: Vector<f32>) -> Option<(Vector<f32>, f32)> {
    let square_length = v.x * v.x + v.y * v.y;
    if !(square_length > 0.0) || !square_length.is_finite() {
        return None;
    }

    let length = approx_sqrt(square_length);
    let inv = 1.0 / length;

    Some((
        vector(
            (v.x * inv).max(-1.0).min(1.0),
            (v.y * inv).max(-1.0).min(1.0),
        ),
        length,
    ))
}

#[test]
fn approx_sqrt_accuracy() {
    let mut x = 1e-30f32;
    while x < 1e30 {
        let expected = x.sqrt();
        let approx = approx_sqrt(x);
        assert!(
            ((approx - expected) / expected).abs() < 1e-5,
            "sqrt({}) = {} (expected {})",
            x,
            approx,
            expected
        );
        x *= 1.37;
    }

    assert_eq!(approx_sqrt(4.0), 2.0);
    assert_eq!(approx_sqrt(1.0), 1.0);
}

#[test]
fn approx_sqrt_edge_cases() {
    assert_eq!(approx_sqrt(0.0), 0.0);
    assert_eq!(approx_sqrt(-0.0), 0.0);
    assert_eq!(approx_sqrt(-4.0), 0.0);
    assert_eq!(approx_sqrt(core::f32::NAN), 0.0);
    assert_eq!(approx_sqrt(core::f32::INFINITY), core::f32::INFINITY);

    let tiny = core::f32::MIN_POSITIVE / 8.0;
    assert!(((approx_sqrt(tiny) - tiny.sqrt()) / tiny.sqrt()).abs() < 1e-5);
}

#[test]
fn unit_vectors() {
    let (unit, length) = unit_and_length(vector(3.0, -4.0)).unwrap();
    assert!((length - 5.0).abs() < 1e-5);
    assert!((unit.x - 0.6).abs() < 1e-5);
    assert!((unit.y + 0.8).abs() < 1e-5);

    let (unit, _) = unit_and_length(vector(0.0, 1e-20)).unwrap();
    assert_eq!(unit.x, 0.0);
    assert!((unit.y - 1.0).abs() < 1e-5);

    assert_eq!(unit_and_length(vector(0.0, 0.0)), None);
}
