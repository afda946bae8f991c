use crate::geom::LineSegment;
use crate::math::{point, Point};
use crate::path::{Command, LineCap, LineJoin, NumericFormat, Opcode, Path, Quality, StrokeStyle};
use crate::{update_stroke, Error, InvalidArgument, Stroker};

fn move_to(x: f32, y: f32) -> Command {
    Command::MoveTo {
        to: point(x, y),
        relative: false,
    }
}

fn line_to(x: f32, y: f32) -> Command {
    Command::LineTo {
        to: point(x, y),
        relative: false,
    }
}

fn stroked_path(commands: &[Command], style: &StrokeStyle) -> Path {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut path = Path::new(NumericFormat::Fp32, Quality::High);
    path.append_commands(commands).unwrap();
    path.set_stroke(style).unwrap();
    update_stroke(&mut path).unwrap();

    path
}

fn stroke(commands: &[Command], style: &StrokeStyle) -> Vec<Command> {
    stroked_path(commands, style).stroke_commands().unwrap()
}

/// The end points of the commands of each ring.
fn rings(commands: &[Command]) -> Vec<Vec<Point>> {
    let mut rings = Vec::new();
    let mut current = Vec::new();
    for cmd in commands {
        match *cmd {
            Command::MoveTo { to, .. }
            | Command::LineTo { to, .. }
            | Command::QuadraticTo { to, .. } => current.push(to),
            Command::Close | Command::End => {
                if !current.is_empty() {
                    rings.push(std::mem::take(&mut current));
                }
            }
            ref other => panic!("unexpected command in a stroke outline {:?}", other),
        }
    }

    rings
}

fn approx_eq(a: Point, b: Point) -> bool {
    (a - b).length() < 1e-3
}

fn contains(ring: &[Point], p: Point) -> bool {
    ring.iter().any(|q| approx_eq(*q, p))
}

fn assert_commands_approx_eq(actual: &[Command], expected: &[Command]) {
    assert_eq!(actual.len(), expected.len(), "{:?}", actual);
    for (a, e) in actual.iter().zip(expected.iter()) {
        match (a, e) {
            (Command::MoveTo { to: a, .. }, Command::MoveTo { to: e, .. })
            | (Command::LineTo { to: a, .. }, Command::LineTo { to: e, .. }) => {
                assert!(approx_eq(*a, *e), "{:?} != {:?}", actual, expected);
            }
            _ => assert_eq!(a, e),
        }
    }
}

#[test]
fn test_simple_line() {
    let commands = stroke(
        &[move_to(0.0, 0.0), line_to(100.0, 0.0)],
        &StrokeStyle::line_width(10.0)
            .with_line_cap(LineCap::Butt)
            .with_line_join(LineJoin::Miter),
    );

    assert_commands_approx_eq(
        &commands,
        &[
            move_to(0.0, -5.0),
            line_to(100.0, -5.0),
            line_to(100.0, 5.0),
            line_to(0.0, 5.0),
            line_to(0.0, -5.0),
            Command::End,
        ],
    );
}

#[test]
fn test_square_caps() {
    let commands = stroke(
        &[move_to(0.0, 0.0), line_to(100.0, 0.0)],
        &StrokeStyle::line_width(10.0).with_line_cap(LineCap::Square),
    );

    let rings = rings(&commands);
    assert_eq!(rings.len(), 1);
    for p in &[
        point(-5.0, -5.0),
        point(105.0, -5.0),
        point(105.0, 5.0),
        point(-5.0, 5.0),
    ] {
        assert!(contains(&rings[0], *p), "{:?} not in {:?}", p, rings[0]);
    }
}

#[test]
fn test_miter_join() {
    let path = [move_to(0.0, 0.0), line_to(50.0, 0.0), line_to(50.0, 50.0)];
    let style = StrokeStyle::line_width(10.0)
        .with_line_join(LineJoin::Miter)
        .with_miter_limit(2.0);

    let rings = rings(&stroke(&path, &style));
    assert_eq!(rings.len(), 1);
    // A single point at the intersection of the outer offset lines.
    assert!(contains(&rings[0], point(55.0, -5.0)), "{:?}", rings[0]);
    assert!(!contains(&rings[0], point(50.0, -5.0)));
    assert!(!contains(&rings[0], point(55.0, 0.0)));
}

#[test]
fn test_miter_limit() {
    // A right angle needs a miter limit of at least sqrt(2).
    let path = [move_to(0.0, 0.0), line_to(50.0, 0.0), line_to(50.0, 50.0)];
    let style = StrokeStyle::line_width(10.0)
        .with_line_join(LineJoin::Miter)
        .with_miter_limit(1.2);

    let rings = rings(&stroke(&path, &style));
    assert!(!contains(&rings[0], point(55.0, -5.0)));
    assert!(contains(&rings[0], point(50.0, -5.0)));
    assert!(contains(&rings[0], point(55.0, 0.0)));

    let style = StrokeStyle::line_width(10.0).with_miter_limit(1.5);
    let rings = self::rings(&stroke(&path, &style));
    assert!(contains(&rings[0], point(55.0, -5.0)));
}

#[test]
fn test_miter_longer_than_segments() {
    // The miter length (5 * sqrt(2)) exceeds the length of the segments.
    let path = [move_to(0.0, 0.0), line_to(5.0, 0.0), line_to(5.0, 5.0)];
    let style = StrokeStyle::line_width(10.0)
        .with_line_join(LineJoin::Miter)
        .with_miter_limit(10.0);

    let rings = rings(&stroke(&path, &style));
    assert!(!contains(&rings[0], point(10.0, -5.0)));
    assert!(contains(&rings[0], point(5.0, -5.0)));
    assert!(contains(&rings[0], point(10.0, 0.0)));
}

#[test]
fn test_bevel_and_round_joins() {
    let path = [move_to(0.0, 0.0), line_to(50.0, 0.0), line_to(50.0, 50.0)];

    let bevel = stroke(&path, &StrokeStyle::line_width(10.0).with_line_join(LineJoin::Bevel));
    let rings = rings(&bevel);
    assert!(contains(&rings[0], point(50.0, -5.0)));
    assert!(contains(&rings[0], point(55.0, 0.0)));
    assert!(!bevel
        .iter()
        .any(|cmd| matches!(cmd, Command::QuadraticTo { .. })));

    let round = stroke(&path, &StrokeStyle::line_width(10.0).with_line_join(LineJoin::Round));
    let quads: Vec<(Point, Point)> = round
        .iter()
        .filter_map(|cmd| match *cmd {
            Command::QuadraticTo { ctrl, to, .. } => Some((ctrl, to)),
            _ => None,
        })
        .collect();
    // A quarter of a circle.
    assert_eq!(quads.len(), 2);
    for (_, to) in &quads {
        assert!(((*to - point(50.0, 0.0)).length() - 5.0).abs() < 1e-3);
    }
    assert!(approx_eq(quads[1].1, point(55.0, 0.0)));
}

#[test]
fn test_closed_sub_paths() {
    let path = [
        move_to(0.0, 0.0),
        line_to(100.0, 0.0),
        line_to(100.0, 100.0),
        line_to(0.0, 100.0),
        Command::Close,
    ];

    let commands = stroke(&path, &StrokeStyle::line_width(10.0));
    let rings = rings(&commands);
    // The inner and outer sides are linked into a single ring.
    assert_eq!(rings.len(), 1);
    for p in &[
        point(-5.0, -5.0),
        point(105.0, -5.0),
        point(105.0, 105.0),
        point(-5.0, 105.0),
    ] {
        assert!(contains(&rings[0], *p), "{:?} not in {:?}", p, rings[0]);
    }
}

#[test]
fn test_closure() {
    let paths: &[&[Command]] = &[
        &[move_to(0.0, 0.0), line_to(100.0, 0.0)],
        &[
            move_to(0.0, 0.0),
            line_to(100.0, 0.0),
            line_to(100.0, 100.0),
            Command::Close,
        ],
        &[
            move_to(10.0, 10.0),
            Command::CubicTo {
                ctrl1: point(100.0, 0.0),
                ctrl2: point(0.0, 100.0),
                to: point(90.0, 90.0),
                relative: false,
            },
        ],
    ];

    for path in paths {
        for cap in &[LineCap::Butt, LineCap::Square, LineCap::Round] {
            for join in &[LineJoin::Miter, LineJoin::Round, LineJoin::Bevel] {
                let style = StrokeStyle::line_width(8.0)
                    .with_line_cap(*cap)
                    .with_line_join(*join);
                let rings = rings(&stroke(path, &style));
                assert!(!rings.is_empty());
                for ring in &rings {
                    // Exactly the same coordinates.
                    assert_eq!(ring.first(), ring.last());
                }
            }
        }
    }
}

#[test]
fn test_offset_invariant() {
    let source = [point(0.0, 0.0), point(100.0, 0.0), point(100.0, 100.0)];
    let segments = [
        LineSegment { from: source[0], to: source[1] },
        LineSegment { from: source[1], to: source[2] },
    ];
    let distance = |p: Point| {
        segments
            .iter()
            .map(|s| s.distance_to_point(p))
            .fold(core::f32::MAX, f32::min)
    };

    let commands = stroke(
        &[move_to(0.0, 0.0), line_to(100.0, 0.0), line_to(100.0, 100.0)],
        &StrokeStyle::line_width(6.0).with_line_join(LineJoin::Bevel),
    );

    let rings = rings(&commands);
    let mut join_points = 0;
    for p in &rings[0] {
        let d = distance(*p);
        assert!(d <= 3.0 + 1e-3, "{:?} is {} away from the path", p, d);
        if d < 3.0 - 1e-3 {
            join_points += 1;
        }
    }
    // Only the inner side of the join gets closer.
    assert_eq!(join_points, 2);

    // The caps of a single segment are measured against that segment alone.
    let commands = stroke(
        &[move_to(0.0, 0.0), line_to(100.0, 0.0)],
        &StrokeStyle::line_width(6.0).with_line_cap(LineCap::Round),
    );
    let rings = self::rings(&commands);
    assert_eq!(rings.len(), 1);
    for p in &rings[0] {
        let d = segments[0].distance_to_point(*p);
        assert!((d - 3.0).abs() < 1e-3, "{:?} is {} away from the path", p, d);
    }
}

/// The rings of an outline as polygons, curves are sampled.
fn polygons(commands: &[Command]) -> Vec<Vec<Point>> {
    let mut polygons = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    for cmd in commands {
        match *cmd {
            Command::MoveTo { to, .. } | Command::LineTo { to, .. } => current.push(to),
            Command::QuadraticTo { ctrl, to, .. } => {
                let curve = crate::geom::QuadraticBezierSegment {
                    from: *current.last().unwrap(),
                    ctrl,
                    to,
                };
                for i in 1..=16 {
                    current.push(curve.sample(i as f32 / 16.0));
                }
            }
            Command::Close | Command::End => {
                if !current.is_empty() {
                    polygons.push(std::mem::take(&mut current));
                }
            }
            ref other => panic!("unexpected command in a stroke outline {:?}", other),
        }
    }

    polygons
}

/// Non-zero winding number of a set of polygons around a point.
fn winding_number(polygons: &[Vec<Point>], p: Point) -> i32 {
    let mut winding = 0;
    for polygon in polygons {
        for i in 0..polygon.len() {
            let a = polygon[i];
            let b = polygon[(i + 1) % polygon.len()];
            let side = (b - a).cross(p - a);
            if a.y <= p.y {
                if b.y > p.y && side > 0.0 {
                    winding += 1;
                }
            } else if b.y <= p.y && side < 0.0 {
                winding -= 1;
            }
        }
    }

    winding
}

/// Checks that every point closer to the polyline than half of the line
/// width is filled by the outline of its round stroke.
fn assert_covers_round_stroke(source: &[Point], closed: bool, width: f32) {
    let mut commands = vec![move_to(source[0].x, source[0].y)];
    commands.extend(source[1..].iter().map(|p| line_to(p.x, p.y)));
    if closed {
        commands.push(Command::Close);
    }
    let style = StrokeStyle::line_width(width)
        .with_line_cap(LineCap::Round)
        .with_line_join(LineJoin::Round);
    let polygons = polygons(&stroke(&commands, &style));

    let mut segments: Vec<LineSegment<f32>> = source
        .windows(2)
        .map(|s| LineSegment { from: s[0], to: s[1] })
        .collect();
    if closed {
        segments.push(LineSegment {
            from: source[source.len() - 1],
            to: source[0],
        });
    }

    let hw = width * 0.5;
    let (mut min, mut max) = (source[0], source[0]);
    for p in source {
        min = min.min(*p);
        max = max.max(*p);
    }

    let step = 0.5;
    let mut y = min.y - hw;
    while y <= max.y + hw {
        let mut x = min.x - hw;
        while x <= max.x + hw {
            let p = point(x, y);
            let d = segments
                .iter()
                .map(|s| s.distance_to_point(p))
                .fold(core::f32::MAX, f32::min);
            if d < hw - 0.3 {
                assert!(
                    winding_number(&polygons, p) != 0,
                    "{:?} is {} away from {:?} but not filled",
                    p,
                    d,
                    source
                );
            }
            x += step;
        }
        y += step;
    }
}

#[test]
fn test_sharp_turns_are_filled() {
    let hairpin = [
        point(0.0, 0.0),
        point(50.0, 0.0),
        point(50.0, 1.0),
        point(0.0, 1.0),
    ];
    assert_covers_round_stroke(&hairpin, false, 10.0);

    let clockwise_hairpin = [
        point(0.0, 0.0),
        point(50.0, 0.0),
        point(50.0, -1.0),
        point(0.0, -1.0),
    ];
    assert_covers_round_stroke(&clockwise_hairpin, false, 10.0);

    let hook = [point(0.0, 0.0), point(50.0, 0.0), point(50.0, 2.0)];
    assert_covers_round_stroke(&hook, false, 10.0);

    let zigzag = [
        point(0.0, 0.0),
        point(30.0, 0.0),
        point(31.0, 1.0),
        point(30.0, 2.0),
        point(31.0, 3.0),
        point(30.0, 4.0),
        point(0.0, 4.0),
    ];
    assert_covers_round_stroke(&zigzag, false, 12.0);

    let stairs = [
        point(0.0, 0.0),
        point(3.0, 0.0),
        point(3.0, 3.0),
        point(6.0, 3.0),
        point(6.0, 6.0),
        point(9.0, 6.0),
        point(9.0, 9.0),
        point(30.0, 9.0),
    ];
    assert_covers_round_stroke(&stairs, false, 10.0);

    let right_angle = [point(0.0, 0.0), point(50.0, 0.0), point(50.0, 50.0)];
    assert_covers_round_stroke(&right_angle, false, 10.0);
}

#[test]
fn test_thin_closed_sub_paths_are_filled() {
    let thin_rectangle = [
        point(0.0, 0.0),
        point(60.0, 0.0),
        point(60.0, 2.0),
        point(0.0, 2.0),
    ];
    assert_covers_round_stroke(&thin_rectangle, true, 10.0);
}

#[test]
fn test_round_join_of_a_reversal() {
    let commands = stroke(
        &[move_to(50.0, 0.0), line_to(0.0, 0.0), line_to(50.0, 0.0)],
        &StrokeStyle::line_width(10.0)
            .with_line_cap(LineCap::Butt)
            .with_line_join(LineJoin::Round),
    );

    let rings = rings(&commands);
    assert_eq!(rings.len(), 1);
    // The join goes around the vertex, not through the stroke.
    assert!(contains(&rings[0], point(-5.0, 0.0)), "{:?}", rings[0]);
    assert!(!rings[0].iter().any(|p| p.x > 50.0 + 1e-3));
}

#[test]
fn test_curves_stay_within_the_stroke() {
    let curve = crate::geom::QuadraticBezierSegment {
        from: point(0.0, 0.0),
        ctrl: point(100.0, 200.0),
        to: point(200.0, 0.0),
    };
    let commands = stroke(
        &[
            move_to(0.0, 0.0),
            Command::QuadraticTo {
                ctrl: curve.ctrl,
                to: curve.to,
                relative: false,
            },
        ],
        &StrokeStyle::line_width(20.0).with_tolerance(0.05),
    );

    let samples: Vec<Point> = (0..=2000).map(|i| curve.sample(i as f32 / 2000.0)).collect();
    for ring in rings(&commands) {
        for p in ring {
            let d = samples
                .iter()
                .map(|s| (*s - p).length())
                .fold(core::f32::MAX, f32::min);
            assert!(d <= 10.0 + 0.5, "{:?} is {} away from the curve", p, d);
        }
    }
}

#[test]
fn test_zero_length_sub_paths() {
    let path = [move_to(10.0, 10.0), line_to(10.0, 10.0)];

    let butt = stroke(&path, &StrokeStyle::line_width(4.0).with_line_cap(LineCap::Butt));
    assert_eq!(butt, vec![Command::End]);

    let square = stroke(&path, &StrokeStyle::line_width(4.0).with_line_cap(LineCap::Square));
    let rings = rings(&square);
    assert_eq!(rings.len(), 1);
    assert_eq!(
        rings[0],
        vec![
            point(8.0, 8.0),
            point(12.0, 8.0),
            point(12.0, 12.0),
            point(8.0, 12.0),
            point(8.0, 8.0),
        ]
    );

    let round = stroke(&path, &StrokeStyle::line_width(4.0).with_line_cap(LineCap::Round));
    let quads = round
        .iter()
        .filter(|cmd| matches!(cmd, Command::QuadraticTo { .. }))
        .count();
    // Two half circles.
    assert_eq!(quads, 8);
    for p in &self::rings(&round)[0] {
        assert!(((*p - point(10.0, 10.0)).length() - 2.0).abs() < 1e-3);
    }

    // A sub-path made of a single move has no stroke.
    let lone_move = stroke(
        &[move_to(10.0, 10.0)],
        &StrokeStyle::line_width(4.0).with_line_cap(LineCap::Round),
    );
    assert_eq!(lone_move, vec![Command::End]);
}

#[test]
fn test_multiple_sub_paths() {
    let commands = stroke(
        &[
            move_to(0.0, 0.0),
            line_to(10.0, 0.0),
            move_to(0.0, 20.0),
            line_to(10.0, 20.0),
            move_to(0.0, 40.0),
            line_to(10.0, 40.0),
        ],
        &StrokeStyle::line_width(2.0),
    );

    let closes = commands.iter().filter(|cmd| **cmd == Command::Close).count();
    assert_eq!(closes, 2);
    assert_eq!(commands.last(), Some(&Command::End));
    assert_eq!(rings(&commands).len(), 3);
}

#[test]
fn test_idempotence() {
    let mut path = Path::new(NumericFormat::S16, Quality::High);
    let opcodes = [
        Opcode::Move as u8,
        Opcode::LineRel as u8,
        Opcode::SmallCcwArc as u8,
        Opcode::Cubic as u8,
        Opcode::SCubicRel as u8,
        Opcode::VLine as u8,
        Opcode::Close as u8,
        Opcode::Move as u8,
        Opcode::Quad as u8,
        Opcode::SQuad as u8,
        Opcode::HLineRel as u8,
    ];
    let operands = [
        10.0, 10.0, // move
        40.0, 0.0, // line
        20.0, 20.0, 0.0, 70.0, 30.0, // arc
        90.0, 60.0, 40.0, 80.0, 20.0, 60.0, // cubic
        -10.0, 10.0, -15.0, -5.0, // smooth cubic
        10.0, // vertical line
        100.0, 100.0, // move
        150.0, 150.0, 200.0, 100.0, // quad
        300.0, 100.0, // smooth quad
        -50.0, // horizontal line
    ];
    path.append(&opcodes, &operands).unwrap();
    path.set_stroke(
        &StrokeStyle::line_width(6.0)
            .with_line_join(LineJoin::Round)
            .with_line_cap(LineCap::Round)
            .with_dash_pattern(&[12.0, 4.0, 2.0, 4.0], 3.0),
    )
    .unwrap();

    update_stroke(&mut path).unwrap();
    let first = path.stroke_path().unwrap().to_vec();
    assert!(first.len() > 100);

    update_stroke(&mut path).unwrap();
    assert_eq!(path.stroke_path().unwrap(), &first[..]);

    // The same with a reused stroker.
    let mut stroker = Stroker::new();
    stroker.update(&mut path).unwrap();
    assert_eq!(path.stroke_path().unwrap(), &first[..]);
    stroker.update(&mut path).unwrap();
    assert_eq!(path.stroke_path().unwrap(), &first[..]);
}

#[test]
fn test_dash_length_conservation() {
    // Three periods, with several phases.
    for phase in &[0.0, 3.0, 7.0, 12.0, -4.0] {
        let commands = stroke(
            &[move_to(0.0, 0.0), line_to(45.0, 0.0)],
            &StrokeStyle::line_width(2.0).with_dash_pattern(&[10.0, 5.0], *phase),
        );

        let total: f32 = rings(&commands)
            .iter()
            .map(|ring| {
                let min = ring.iter().map(|p| p.x).fold(core::f32::MAX, f32::min);
                let max = ring.iter().map(|p| p.x).fold(core::f32::MIN, f32::max);
                max - min
            })
            .sum();

        assert!((total - 30.0).abs() < 1e-2, "phase {}: {}", phase, total);
    }
}

#[test]
fn test_dashes_across_sub_paths() {
    let path = [
        move_to(0.0, 0.0),
        line_to(15.0, 0.0),
        move_to(0.0, 10.0),
        line_to(15.0, 10.0),
    ];

    // The pattern continues where the previous sub-path left it.
    let continued = stroke(
        &path,
        &StrokeStyle::line_width(2.0).with_dash_pattern(&[10.0, 10.0], 0.0),
    );
    let rings = rings(&continued);
    assert_eq!(rings.len(), 2);
    assert!(contains(&rings[1], point(5.0, 9.0)));
    assert!(contains(&rings[1], point(15.0, 11.0)));

    // Restarted at each sub-path.
    let reset = stroke(
        &path,
        &StrokeStyle::line_width(2.0)
            .with_dash_pattern(&[10.0, 10.0], 0.0)
            .with_dash_phase_reset(true),
    );
    let rings = self::rings(&reset);
    assert_eq!(rings.len(), 2);
    assert!(contains(&rings[1], point(0.0, 9.0)));
    assert!(contains(&rings[1], point(10.0, 11.0)));
}

#[test]
fn test_dash_through_the_seam() {
    let path = [
        move_to(0.0, 0.0),
        line_to(100.0, 0.0),
        line_to(100.0, 100.0),
        line_to(0.0, 100.0),
        Command::Close,
    ];

    // Dashes at [40, 70] + 50k, the last one runs from 390 to 20 through the
    // first vertex.
    let commands = stroke(
        &path,
        &StrokeStyle::line_width(2.0).with_dash_pattern(&[30.0, 20.0], 10.0),
    );

    let rings = rings(&commands);
    assert_eq!(rings.len(), 8);
    let seam = rings
        .iter()
        .find(|ring| contains(ring, point(-1.0, -1.0)))
        .expect("a dash joined at the seam");
    assert!(contains(seam, point(20.0, -1.0)));
    assert!(contains(seam, point(-1.0, 10.0)));
}

#[test]
fn test_zero_length_dashes() {
    let commands = stroke(
        &[move_to(0.0, 0.0), line_to(30.0, 0.0)],
        &StrokeStyle::line_width(2.0)
            .with_line_cap(LineCap::Round)
            .with_dash_pattern(&[0.0, 10.0], 0.0),
    );

    let rings = rings(&commands);
    assert_eq!(rings.len(), 4);
    for (i, ring) in rings.iter().enumerate() {
        let center = point(i as f32 * 10.0, 0.0);
        for p in ring {
            assert!(((*p - center).length() - 1.0).abs() < 1e-3, "{:?}", ring);
        }
    }

    // Butt caps don't cover anything.
    let commands = stroke(
        &[move_to(0.0, 0.0), line_to(30.0, 0.0)],
        &StrokeStyle::line_width(2.0).with_dash_pattern(&[0.0, 10.0], 0.0),
    );
    assert_eq!(commands, vec![Command::End]);
}

#[test]
fn test_missing_stroke() {
    let mut path = Path::new(NumericFormat::Fp32, Quality::High);
    path.append_commands(&[move_to(0.0, 0.0), line_to(1.0, 0.0)])
        .unwrap();

    assert_eq!(
        update_stroke(&mut path),
        Err(Error::InvalidArgument(InvalidArgument::MissingStroke))
    );
    assert_eq!(path.stroke_path(), None);
}

#[test]
fn test_too_many_dashes() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut path = Path::new(NumericFormat::Fp32, Quality::High);
    path.append_commands(&[move_to(0.0, 0.0), line_to(10_000_000.0, 0.0)])
        .unwrap();
    path.set_stroke(&StrokeStyle::line_width(1.0).with_dash_pattern(&[1e-3, 1e-3], 0.0))
        .unwrap();

    assert_eq!(update_stroke(&mut path), Err(Error::OutOfResources));
    assert_eq!(path.stroke_path(), None);

    // The same pattern on a short line is fine.
    let commands = stroke(
        &[move_to(0.0, 0.0), line_to(1.0, 0.0)],
        &StrokeStyle::line_width(1.0).with_dash_pattern(&[1e-3, 1e-3], 0.0),
    );
    let dashes = rings(&commands).len() as i32;
    assert!((dashes - 500).abs() <= 1, "{}", dashes);
}

#[test]
fn test_empty_path() {
    let path = stroked_path(&[], &StrokeStyle::line_width(2.0));
    assert_eq!(path.stroke_commands(), Ok(vec![Command::End]));
}

#[test]
fn test_outline_follows_path_updates() {
    let mut path = stroked_path(
        &[move_to(0.0, 0.0), line_to(10.0, 0.0)],
        &StrokeStyle::line_width(2.0),
    );
    let before = path.stroke_path().unwrap().to_vec();

    path.append_commands(&[line_to(10.0, 10.0)]).unwrap();
    // The outline is only rebuilt on demand.
    assert_eq!(path.stroke_path().unwrap(), &before[..]);

    update_stroke(&mut path).unwrap();
    assert_ne!(path.stroke_path().unwrap(), &before[..]);
    let rings = rings(&path.stroke_commands().unwrap());
    assert!(contains(&rings[0], point(11.0, 10.0)));
}
