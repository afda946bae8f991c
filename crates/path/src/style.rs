//! Stroke configuration.

use crate::error::{Error, InvalidArgument};
use crate::{LineCap, LineJoin};

/// Parameters of the stroke of a path.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct StrokeStyle {
    /// What cap to use at both ends of each sub-path and each dash.
    ///
    /// Default value: `LineCap::Butt`.
    pub line_cap: LineCap,

    /// See the SVG specification.
    ///
    /// Default value: `LineJoin::Miter`.
    pub line_join: LineJoin,

    /// Line width
    ///
    /// Default value: `StrokeStyle::DEFAULT_LINE_WIDTH`.
    pub line_width: f32,

    /// See the SVG specification.
    ///
    /// Values below 1.0 are treated as 1.0.
    /// Default value: `StrokeStyle::DEFAULT_MITER_LIMIT`.
    pub miter_limit: f32,

    /// Alternating lengths of the visible and invisible parts of the stroke.
    ///
    /// An empty pattern or a pattern containing only zeros disables dashing.
    /// If the pattern has an odd number of entries, the last one is ignored.
    pub dash_pattern: Vec<f32>,

    /// Distance into the dash pattern at which the stroke starts.
    pub dash_phase: f32,

    /// Whether each sub-path restarts the dash pattern at the phase.
    ///
    /// Otherwise the dash pattern continues from one sub-path to the next.
    /// Default value: `false`.
    pub dash_phase_reset: bool,

    /// Stroke color as packed RGBA. Stored for the renderer and not used
    /// to build the geometry.
    pub color: u32,

    /// Maximum allowed distance to the path when approximating curves.
    ///
    /// Default value: `StrokeStyle::DEFAULT_TOLERANCE`.
    pub tolerance: f32,
}

impl StrokeStyle {
    /// Minimum miter limit as defined by the SVG specification.
    ///
    /// See [StrokeMiterLimitProperty](https://svgwg.org/specs/strokes/#StrokeMiterlimitProperty)
    pub const MINIMUM_MITER_LIMIT: f32 = 1.0;
    /// Default miter limit as defined by the SVG specification.
    ///
    /// See [StrokeMiterLimitProperty](https://svgwg.org/specs/strokes/#StrokeMiterlimitProperty)
    pub const DEFAULT_MITER_LIMIT: f32 = 4.0;
    pub const DEFAULT_LINE_CAP: LineCap = LineCap::Butt;
    pub const DEFAULT_LINE_JOIN: LineJoin = LineJoin::Miter;
    pub const DEFAULT_LINE_WIDTH: f32 = 1.0;
    pub const DEFAULT_TOLERANCE: f32 = 0.1;
    pub const MINIMUM_TOLERANCE: f32 = 0.001;
    pub const DEFAULT_COLOR: u32 = 0x0000_00ff;

    pub const DEFAULT: Self = StrokeStyle {
        line_cap: Self::DEFAULT_LINE_CAP,
        line_join: Self::DEFAULT_LINE_JOIN,
        line_width: Self::DEFAULT_LINE_WIDTH,
        miter_limit: Self::DEFAULT_MITER_LIMIT,
        dash_pattern: Vec::new(),
        dash_phase: 0.0,
        dash_phase_reset: false,
        color: Self::DEFAULT_COLOR,
        tolerance: Self::DEFAULT_TOLERANCE,
    };

    #[inline]
    pub fn line_width(width: f32) -> Self {
        Self::DEFAULT.with_line_width(width)
    }

    #[inline]
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[inline]
    pub fn with_line_cap(mut self, cap: LineCap) -> Self {
        self.line_cap = cap;
        self
    }

    #[inline]
    pub fn with_line_join(mut self, join: LineJoin) -> Self {
        self.line_join = join;
        self
    }

    #[inline]
    pub fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = width;
        self
    }

    #[inline]
    pub fn with_miter_limit(mut self, limit: f32) -> Self {
        self.miter_limit = limit;
        self
    }

    #[inline]
    pub fn with_dash_pattern(mut self, pattern: &[f32], phase: f32) -> Self {
        self.dash_pattern = pattern.to_vec();
        self.dash_phase = phase;
        self
    }

    #[inline]
    pub fn with_dash_phase_reset(mut self, reset: bool) -> Self {
        self.dash_phase_reset = reset;
        self
    }

    #[inline]
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Position in a dash pattern.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DashCursor {
    /// Index of the current entry. Even entries are visible.
    pub index: usize,
    /// Length left in the current entry.
    pub remaining: f32,
}

impl DashCursor {
    #[inline]
    pub fn is_on(&self) -> bool {
        self.index % 2 == 0
    }
}

/// A validated dash pattern.
///
/// Always has an even, non-zero number of entries and a positive period.
#[derive(Clone, Debug, PartialEq)]
pub struct DashPattern {
    entries: Vec<f32>,
    period: f32,
    start: DashCursor,
}

impl DashPattern {
    /// Validates a dash pattern.
    ///
    /// Returns `Ok(None)` if the pattern disables dashing.
    pub fn new(entries: &[f32], phase: f32) -> Result<Option<DashPattern>, Error> {
        if !phase.is_finite() || entries.iter().any(|e| !e.is_finite() || *e < 0.0) {
            return Err(InvalidArgument::InvalidDashPattern.into());
        }

        let count = entries.len() & !1;
        let entries = &entries[..count];
        let period: f32 = entries.iter().sum();
        if count == 0 || period <= 0.0 {
            return Ok(None);
        }

        let mut stored = Vec::new();
        stored.try_reserve_exact(count)?;
        stored.extend_from_slice(entries);

        let mut pattern = DashPattern {
            entries: stored,
            period,
            start: DashCursor {
                index: 0,
                remaining: entries[0],
            },
        };
        pattern.start = pattern.cursor_at(phase);

        Ok(Some(pattern))
    }

    pub fn entries(&self) -> &[f32] {
        &self.entries
    }

    /// Sum of all entries.
    pub fn period(&self) -> f32 {
        self.period
    }

    /// Sum of the visible entries.
    pub fn on_length(&self) -> f32 {
        self.entries.iter().step_by(2).sum()
    }

    /// The position of the phase in the pattern.
    pub fn start(&self) -> DashCursor {
        self.start
    }

    /// Returns the cursor `distance` units into the pattern.
    ///
    /// Negative distances wrap around.
    pub fn cursor_at(&self, distance: f32) -> DashCursor {
        let mut d = distance.rem_euclid(self.period);
        for (index, entry) in self.entries.iter().enumerate() {
            // Zero-length entries are only selected when the distance lands on them.
            if d < *entry || d <= 0.0 {
                return DashCursor {
                    index,
                    remaining: *entry - d,
                };
            }
            d -= *entry;
        }

        // Rounding errors brought us to the end of the period.
        DashCursor {
            index: 0,
            remaining: self.entries[0],
        }
    }

    /// Moves to the next entry.
    pub fn advance(&self, cursor: &mut DashCursor) {
        cursor.index = (cursor.index + 1) % self.entries.len();
        cursor.remaining = self.entries[cursor.index];
    }
}

/// The stroke of a path: validated style, derived values and the stroke fill path.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeState {
    style: StrokeStyle,
    half_width: f32,
    miter_limit: f32,
    miter_limit_sq: f32,
    tolerance: f32,
    dash: Option<DashPattern>,
    stroke_path: Option<Vec<u8>>,
}

impl StrokeState {
    /// Validates the style and derives the values used to build the outline.
    pub fn new(style: &StrokeStyle) -> Result<Self, Error> {
        if !style.line_width.is_finite() || style.line_width <= 0.0 {
            return Err(InvalidArgument::InvalidLineWidth.into());
        }
        if !style.miter_limit.is_finite() || !style.tolerance.is_finite() {
            return Err(InvalidArgument::NonFiniteValue.into());
        }

        let dash = DashPattern::new(&style.dash_pattern, style.dash_phase)?;
        if dash.is_some() && cfg!(not(feature = "dash")) {
            return Err(Error::NotSupported("dash patterns"));
        }

        let miter_limit = style.miter_limit.max(StrokeStyle::MINIMUM_MITER_LIMIT);

        Ok(StrokeState {
            style: style.clone(),
            half_width: style.line_width * 0.5,
            miter_limit,
            miter_limit_sq: miter_limit * miter_limit,
            tolerance: style.tolerance.max(StrokeStyle::MINIMUM_TOLERANCE),
            dash,
            stroke_path: None,
        })
    }

    /// The style as it was provided.
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn line_cap(&self) -> LineCap {
        self.style.line_cap
    }

    pub fn line_join(&self) -> LineJoin {
        self.style.line_join
    }

    pub fn line_width(&self) -> f32 {
        self.style.line_width
    }

    pub fn half_width(&self) -> f32 {
        self.half_width
    }

    /// The miter limit, at least 1.
    pub fn miter_limit(&self) -> f32 {
        self.miter_limit
    }

    pub fn miter_limit_sq(&self) -> f32 {
        self.miter_limit_sq
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    pub fn color(&self) -> u32 {
        self.style.color
    }

    /// The dash pattern, if dashing is enabled.
    pub fn dash(&self) -> Option<&DashPattern> {
        self.dash.as_ref()
    }

    pub fn dash_phase_reset(&self) -> bool {
        self.style.dash_phase_reset
    }

    /// The serialized stroke outline in `NumericFormat::Fp32`, if it was built.
    pub fn stroke_path(&self) -> Option<&[u8]> {
        self.stroke_path.as_deref()
    }

    /// Replaces the stroke outline, returning the previous one.
    pub fn replace_stroke_path(&mut self, data: Vec<u8>) -> Option<Vec<u8>> {
        self.stroke_path.replace(data)
    }

    /// Discards the stroke outline.
    pub fn clear_stroke_path(&mut self) {
        self.stroke_path = None;
    }
}

#[test]
fn style_builder() {
    let style = StrokeStyle::line_width(4.0)
        .with_line_cap(LineCap::Round)
        .with_line_join(LineJoin::Bevel)
        .with_dash_pattern(&[1.0, 2.0], 0.5)
        .with_color(0xff0000ff);

    assert_eq!(style.line_width, 4.0);
    assert_eq!(style.line_cap, LineCap::Round);
    assert_eq!(style.line_join, LineJoin::Bevel);
    assert_eq!(style.dash_pattern, vec![1.0, 2.0]);
    assert_eq!(style.dash_phase, 0.5);
    assert_eq!(style.miter_limit, StrokeStyle::DEFAULT_MITER_LIMIT);
    assert_eq!(StrokeStyle::default(), StrokeStyle::DEFAULT);
}

#[test]
fn derived_values() {
    let state = StrokeState::new(&StrokeStyle::line_width(10.0).with_miter_limit(0.5)).unwrap();
    assert_eq!(state.half_width(), 5.0);
    assert_eq!(state.miter_limit(), 1.0);
    assert_eq!(state.miter_limit_sq(), 1.0);
    assert_eq!(state.stroke_path(), None);

    let state = StrokeState::new(&StrokeStyle::line_width(1.0).with_miter_limit(3.0)).unwrap();
    assert_eq!(state.miter_limit_sq(), 9.0);
}

#[test]
fn invalid_styles() {
    let err = |style: StrokeStyle| StrokeState::new(&style).unwrap_err();

    assert_eq!(
        err(StrokeStyle::line_width(0.0)),
        Error::InvalidArgument(InvalidArgument::InvalidLineWidth)
    );
    assert_eq!(
        err(StrokeStyle::line_width(-1.0)),
        Error::InvalidArgument(InvalidArgument::InvalidLineWidth)
    );
    assert_eq!(
        err(StrokeStyle::line_width(core::f32::NAN)),
        Error::InvalidArgument(InvalidArgument::InvalidLineWidth)
    );
    assert_eq!(
        err(StrokeStyle::DEFAULT.with_miter_limit(core::f32::INFINITY)),
        Error::InvalidArgument(InvalidArgument::NonFiniteValue)
    );
    assert_eq!(
        err(StrokeStyle::DEFAULT.with_dash_pattern(&[1.0, -1.0], 0.0)),
        Error::InvalidArgument(InvalidArgument::InvalidDashPattern)
    );
}

#[test]
fn dash_pattern_normalization() {
    // Odd number of entries: the last one is dropped.
    let pattern = DashPattern::new(&[3.0, 1.0, 2.0], 0.0).unwrap().unwrap();
    assert_eq!(pattern.entries(), &[3.0, 1.0]);
    assert_eq!(pattern.period(), 4.0);
    assert_eq!(pattern.on_length(), 3.0);

    assert_eq!(DashPattern::new(&[], 0.0), Ok(None));
    assert_eq!(DashPattern::new(&[5.0], 0.0), Ok(None));
    assert_eq!(DashPattern::new(&[0.0, 0.0], 0.0), Ok(None));
    let dots = DashPattern::new(&[0.0, 1.0], 0.0).unwrap().unwrap();
    assert_eq!(dots.start(), DashCursor { index: 0, remaining: 0.0 });
    assert_eq!(dots.cursor_at(0.5), DashCursor { index: 1, remaining: 0.5 });
}

#[test]
fn dash_phase() {
    let pattern = DashPattern::new(&[3.0, 1.0], 0.0).unwrap().unwrap();
    assert_eq!(pattern.start(), DashCursor { index: 0, remaining: 3.0 });

    let pattern = DashPattern::new(&[3.0, 1.0], 3.5).unwrap().unwrap();
    assert_eq!(pattern.start(), DashCursor { index: 1, remaining: 0.5 });
    assert!(!pattern.start().is_on());

    // The phase wraps around the period, in both directions.
    let pattern = DashPattern::new(&[3.0, 1.0], 9.0).unwrap().unwrap();
    assert_eq!(pattern.start(), DashCursor { index: 0, remaining: 2.0 });
    let pattern = DashPattern::new(&[3.0, 1.0], -1.0).unwrap().unwrap();
    assert_eq!(pattern.start(), DashCursor { index: 1, remaining: 1.0 });

    let mut cursor = pattern.start();
    pattern.advance(&mut cursor);
    assert_eq!(cursor, DashCursor { index: 0, remaining: 3.0 });
}
