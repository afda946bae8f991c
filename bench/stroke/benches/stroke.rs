#[macro_use]
extern crate criterion;

use criterion::{BenchmarkId, Criterion};
use ribbon::math::point;
use ribbon::path::{Command, LineCap, LineJoin, NumericFormat, Path, Quality, StrokeStyle};
use ribbon::stroke::Stroker;

static TOLERANCES: [f32; 4] = [0.01, 0.05, 0.1, 0.5];

/// A bunch of wavy curves, zig-zags and closed shapes.
fn generate_path(format: NumericFormat) -> Path {
    let mut commands = Vec::new();
    for row in 0..20 {
        let y = row as f32 * 50.0;
        commands.push(Command::MoveTo { to: point(0.0, y), relative: false });
        for i in 0..25 {
            let x = i as f32 * 40.0;
            commands.push(Command::CubicTo {
                ctrl1: point(x + 10.0, y - 30.0),
                ctrl2: point(x + 30.0, y + 30.0),
                to: point(x + 40.0, y),
                relative: false,
            });
        }

        commands.push(Command::MoveTo { to: point(0.0, y + 20.0), relative: false });
        for i in 0..100 {
            let dy = if i % 2 == 0 { 8.0 } else { -8.0 };
            commands.push(Command::LineTo { to: point(10.0, dy), relative: true });
        }

        commands.push(Command::MoveTo { to: point(1020.0, y), relative: false });
        commands.push(Command::QuadraticTo {
            ctrl: point(1060.0, y - 20.0),
            to: point(1100.0, y),
            relative: false,
        });
        commands.push(Command::LineTo { to: point(1100.0, y + 30.0), relative: false });
        commands.push(Command::LineTo { to: point(1020.0, y + 30.0), relative: false });
        commands.push(Command::Close);
    }

    let mut path = Path::new(format, Quality::High);
    path.append_commands(&commands).unwrap();

    path
}

fn solid_strokes(c: &mut Criterion) {
    let mut path = generate_path(NumericFormat::Fp32);
    let mut stroker = Stroker::new();

    let mut g = c.benchmark_group("solid");
    for tol in &TOLERANCES {
        for (name, join) in &[
            ("miter", LineJoin::Miter),
            ("round", LineJoin::Round),
            ("bevel", LineJoin::Bevel),
        ] {
            path.set_stroke(
                &StrokeStyle::line_width(3.0)
                    .with_line_join(*join)
                    .with_tolerance(*tol),
            )
            .unwrap();
            g.bench_with_input(BenchmarkId::new(*name, tol), tol, |b, _| {
                b.iter(|| stroker.update(&mut path).unwrap())
            });
        }
    }
}

fn dashed_strokes(c: &mut Criterion) {
    let mut path = generate_path(NumericFormat::S16);
    let mut stroker = Stroker::new();

    let mut g = c.benchmark_group("dashed");
    for tol in &TOLERANCES {
        path.set_stroke(
            &StrokeStyle::line_width(2.0)
                .with_line_cap(LineCap::Round)
                .with_dash_pattern(&[6.0, 3.0, 0.0, 3.0], 0.0)
                .with_tolerance(*tol),
        )
        .unwrap();
        g.bench_with_input(BenchmarkId::new("round caps", tol), tol, |b, _| {
            b.iter(|| stroker.update(&mut path).unwrap())
        });
    }
}

criterion_group!(stroke, solid_strokes, dashed_strokes);
criterion_main!(stroke);
