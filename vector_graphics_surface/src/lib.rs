// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=vector_graphics_surface --heading-base-level=0

//! Vector Graphics Surface: the drawing-surface contract for vector graphics replay.
//!
//! This crate defines the small, plain‑old‑data (POD) friendly vocabulary a
//! replay listener speaks when it re-issues decoded vector graphics
//! instructions, and the traits a host drawing surface implements to accept
//! them.
//!
//! # Position in the stack
//!
//! Conceptually there are three layers:
//!
//! - **Decoding**: an external codec parses the binary instruction stream and
//!   pushes one callback per instruction into a listener.
//! - **Replay** (`vector_graphics_listener`): validates the instruction stream
//!   and keeps dense, index-addressable registries of the resources it created.
//! - **Surface (this crate)**: paths, paints, shaders, layers, and draws
//!   expressed as POD descriptors and operations, plus [`ResourceSurface`] and
//!   [`DrawingSurface`] for concrete hosts to implement.
//!
//! # Core concepts
//!
//! - **Resources**: small, opaque handles ([`PathId`], [`PaintId`],
//!   [`ShaderId`]) returned by [`ResourceSurface`]. Paths are created empty
//!   and extended one [`PathCmd`] at a time; paints and shaders are created
//!   whole from a [`PaintDesc`] or [`ShaderDesc`].
//! - **Surface operations**: [`LayerOp`] (scoped compositing and clipping) and
//!   [`DrawOp`] (produce pixels), combined into [`SurfaceOp`] for recording.
//! - **Finishing**: [`DrawingSurface::finish`] ends the recording and hands
//!   back the host's immutable picture artifact.
//!
//! # Example
//!
//! ```ignore
//! # use vector_graphics_surface::*;
//! # struct MySurface { /* implements ResourceSurface + DrawingSurface */ }
//! let mut surface = MySurface { /* ... */ };
//!
//! let path = surface.create_path(FillRule::NonZero);
//! surface.extend_path(path, PathCmd::LineTo { x: 10.0, y: 0.0 });
//! surface.extend_path(path, PathCmd::LineTo { x: 10.0, y: 10.0 });
//! surface.extend_path(path, PathCmd::Close);
//!
//! let paint = surface.create_paint(PaintDesc::new(Color::BLACK));
//! surface.draw(DrawOp::FillPath { path, paint: Some(paint) });
//! let picture = surface.finish();
//! ```

#![no_std]

extern crate alloc;

use alloc::{boxed::Box, vec::Vec};
use core::fmt;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `sqrt` and `floor`
use kurbo::{BezPath, Vec2};
pub use kurbo::{Cap, Join, Point, Size};
pub use peniko::{BlendMode, Color, Compose, Fill as FillRule, Mix};

/// Identifier for a path resource.
///
/// This is a small, opaque handle that is stable for the lifetime of the
/// surface that created it.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathId(pub u32);

/// Identifier for a paint resource.
///
/// Paints may be shared by many draws and layers.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PaintId(pub u32);

/// Identifier for a shader (gradient) resource.
///
/// Shaders are referenced from [`PaintDesc::shader`].
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShaderId(pub u32);

/// Convert a packed `0xAARRGGBB` color into a [`Color`].
#[inline]
pub fn color_from_argb(argb: u32) -> Color {
    let [a, r, g, b] = argb.to_be_bytes();
    Color::from_rgba8(r, g, b, a)
}

/// Simple path command enumeration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathCmd {
    /// Start a new contour at the given point.
    MoveTo {
        /// X coordinate of the new point.
        x: f32,
        /// Y coordinate of the new point.
        y: f32,
    },
    /// Draw a line from the current point to the given point.
    LineTo {
        /// X coordinate of the line end.
        x: f32,
        /// Y coordinate of the line end.
        y: f32,
    },
    /// Draw a cubic Bézier curve from the current point to `(x3, y3)`,
    /// using two control points.
    CubicTo {
        /// X coordinate of the first control point.
        x1: f32,
        /// Y coordinate of the first control point.
        y1: f32,
        /// X coordinate of the second control point.
        x2: f32,
        /// Y coordinate of the second control point.
        y2: f32,
        /// X coordinate of the curve end.
        x3: f32,
        /// Y coordinate of the curve end.
        y3: f32,
    },
    /// Close the current contour.
    Close,
}

/// Description of a path resource.
///
/// Unlike paints and shaders, paths are built incrementally: the surface
/// creates an empty path and appends commands as they arrive.
#[derive(Clone, Debug, PartialEq)]
pub struct PathDesc {
    /// Fill rule used when filling or clipping to this path.
    pub fill_rule: FillRule,
    /// Command buffer describing the path geometry.
    pub commands: Vec<PathCmd>,
}

impl PathDesc {
    /// Create an empty path with the given fill rule.
    pub fn new(fill_rule: FillRule) -> Self {
        Self {
            fill_rule,
            commands: Vec::new(),
        }
    }

    /// Convert to kurbo's path type.
    ///
    /// A contour that starts with a segment rather than [`PathCmd::MoveTo`]
    /// begins at the origin, or at the start of the previous contour when it
    /// follows a [`PathCmd::Close`].
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut start = Point::ORIGIN;
        let mut open = false;
        for cmd in &self.commands {
            match *cmd {
                PathCmd::MoveTo { x, y } => {
                    start = point(x, y);
                    path.move_to(start);
                    open = true;
                }
                PathCmd::LineTo { x, y } => {
                    if !open {
                        path.move_to(start);
                        open = true;
                    }
                    path.line_to(point(x, y));
                }
                PathCmd::CubicTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x3,
                    y3,
                } => {
                    if !open {
                        path.move_to(start);
                        open = true;
                    }
                    path.curve_to(point(x1, y1), point(x2, y2), point(x3, y3));
                }
                PathCmd::Close => {
                    if open {
                        path.close_path();
                        open = false;
                    }
                }
            }
        }
        path
    }
}

#[inline]
fn point(x: f32, y: f32) -> Point {
    Point::new(f64::from(x), f64::from(y))
}

/// Resolved stroke parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke width; zero means a hairline.
    pub width: f32,
    /// Cap style applied to open contour ends.
    pub cap: Cap,
    /// Join style applied between segments.
    pub join: Join,
    /// Limit on the ratio of miter length to stroke width.
    pub miter_limit: f32,
}

impl StrokeStyle {
    /// The surface's own stroke defaults.
    ///
    /// Paint overrides equal to these values are redundant and are never
    /// recorded by the replay listener.
    pub const DEFAULT: Self = Self {
        width: 0.0,
        cap: Cap::Butt,
        join: Join::Miter,
        miter_limit: 4.0,
    };
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Whether a paint fills the interior of a shape or strokes its outline.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PaintStyle {
    /// Fill the interior according to the path's fill rule.
    #[default]
    Fill,
    /// Stroke the outline using the paint's stroke parameters.
    Stroke,
}

/// Stroke parameters that differ from [`StrokeStyle::DEFAULT`].
///
/// `None` means "use the surface default".
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StrokeOverrides {
    /// Overridden cap style.
    pub cap: Option<Cap>,
    /// Overridden join style.
    pub join: Option<Join>,
    /// Overridden miter limit.
    pub miter_limit: Option<f32>,
    /// Overridden stroke width.
    pub width: Option<f32>,
}

impl StrokeOverrides {
    /// Returns true if no parameter is overridden.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cap.is_none()
            && self.join.is_none()
            && self.miter_limit.is_none()
            && self.width.is_none()
    }
}

/// Description of a paint resource.
#[derive(Clone, Debug, PartialEq)]
pub struct PaintDesc {
    /// Base color. When a shader is set, the shader supplies the color and
    /// only this color's alpha modulates it.
    pub color: Color,
    /// Blend mode for draws using this paint, if not the default source-over.
    pub blend: Option<BlendMode>,
    /// Fill or stroke.
    pub style: PaintStyle,
    /// Optional shader resource providing per-point color.
    pub shader: Option<ShaderId>,
    /// Stroke parameters overriding the surface defaults.
    ///
    /// Only meaningful when `style` is [`PaintStyle::Stroke`].
    pub stroke: StrokeOverrides,
}

impl PaintDesc {
    /// Create a solid fill paint with no overrides.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            blend: None,
            style: PaintStyle::Fill,
            shader: None,
            stroke: StrokeOverrides::default(),
        }
    }

    /// Resolve the stroke overrides against [`StrokeStyle::DEFAULT`].
    pub fn stroke_style(&self) -> StrokeStyle {
        let defaults = StrokeStyle::DEFAULT;
        StrokeStyle {
            width: self.stroke.width.unwrap_or(defaults.width),
            cap: self.stroke.cap.unwrap_or(defaults.cap),
            join: self.stroke.join.unwrap_or(defaults.join),
            miter_limit: self.stroke.miter_limit.unwrap_or(defaults.miter_limit),
        }
    }

    /// Blend mode this paint draws with, falling back to source-over.
    #[inline]
    pub fn blend_mode(&self) -> BlendMode {
        self.blend.unwrap_or_default()
    }
}

impl Default for PaintDesc {
    /// The surface's empty paint: opaque black fill.
    fn default() -> Self {
        Self::new(Color::BLACK)
    }
}

/// How a gradient behaves outside its `[0, 1]` parameter range.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TileMode {
    /// Extend the edge colors.
    #[default]
    Clamp,
    /// Repeat the gradient.
    Repeated,
    /// Repeat the gradient, reversing every other repetition.
    Mirror,
    /// Draw nothing outside the gradient.
    Decal,
}

impl TileMode {
    /// Map a raw gradient parameter into `[0, 1]`, or `None` if nothing is drawn.
    pub fn apply(self, t: f64) -> Option<f64> {
        match self {
            Self::Clamp => Some(t.clamp(0.0, 1.0)),
            Self::Repeated => Some(t - t.floor()),
            Self::Mirror => {
                let m = t - 2.0 * (t * 0.5).floor();
                Some(if m > 1.0 { 2.0 - m } else { m })
            }
            Self::Decal => (0.0..=1.0).contains(&t).then_some(t),
        }
    }
}

/// Error reported by a surface that cannot construct a shader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShaderError {
    /// The gradient has no colors.
    NoColors,
    /// The offset list does not pair up with the color list.
    OffsetCountMismatch {
        /// Number of colors supplied.
        colors: usize,
        /// Number of offsets supplied.
        offsets: usize,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoColors => f.write_str("gradient has no colors"),
            Self::OffsetCountMismatch { colors, offsets } => write!(
                f,
                "gradient has {colors} colors but {offsets} offsets; counts must match"
            ),
        }
    }
}

impl core::error::Error for ShaderError {}

/// Geometry below this length is treated as collapsed to a point.
const DEGENERATE_EPSILON: f64 = 1e-9;

/// Description of a shader resource.
#[derive(Clone, Debug, PartialEq)]
pub enum ShaderDesc {
    /// Linear gradient along the segment `from` → `to`.
    Linear {
        /// Point where the gradient parameter is 0.
        from: Point,
        /// Point where the gradient parameter is 1.
        to: Point,
        /// Stop colors.
        colors: Box<[Color]>,
        /// Stop offsets; evenly spaced when `None`.
        offsets: Option<Box<[f32]>>,
        /// Behavior outside the gradient range.
        tile_mode: TileMode,
    },
    /// Radial gradient, optionally focal (two-point conical).
    Radial {
        /// Center of the outer circle.
        center: Point,
        /// Radius of the outer circle.
        radius: f32,
        /// Focal point where the gradient parameter is 0.
        ///
        /// `None` is equivalent to `Some(center)`.
        focal: Option<Point>,
        /// Stop colors.
        colors: Box<[Color]>,
        /// Stop offsets; evenly spaced when `None`.
        offsets: Option<Box<[f32]>>,
        /// Behavior outside the gradient range.
        tile_mode: TileMode,
    },
}

impl ShaderDesc {
    /// Stop colors.
    pub fn colors(&self) -> &[Color] {
        match self {
            Self::Linear { colors, .. } | Self::Radial { colors, .. } => colors,
        }
    }

    /// Stop offsets, if given explicitly.
    pub fn offsets(&self) -> Option<&[f32]> {
        match self {
            Self::Linear { offsets, .. } | Self::Radial { offsets, .. } => offsets.as_deref(),
        }
    }

    /// Tile mode.
    pub fn tile_mode(&self) -> TileMode {
        match self {
            Self::Linear { tile_mode, .. } | Self::Radial { tile_mode, .. } => *tile_mode,
        }
    }

    /// Check that the color and offset lists describe a usable gradient.
    pub fn validate(&self) -> Result<(), ShaderError> {
        let colors = self.colors().len();
        if colors == 0 {
            return Err(ShaderError::NoColors);
        }
        match self.offsets() {
            Some(offsets) if offsets.len() != colors => Err(ShaderError::OffsetCountMismatch {
                colors,
                offsets: offsets.len(),
            }),
            _ => Ok(()),
        }
    }

    /// Returns true if the gradient geometry has collapsed to a point.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Self::Linear { from, to, .. } => (*to - *from).hypot2() <= DEGENERATE_EPSILON,
            Self::Radial { radius, .. } => f64::from(*radius) <= DEGENERATE_EPSILON,
        }
    }

    /// Evaluate the shader at `point`.
    ///
    /// Returns `None` where the shader draws nothing (outside a decal
    /// gradient, or outside the cone of a focal gradient), and for a
    /// descriptor that fails [`ShaderDesc::validate`].
    ///
    /// Degenerate gradients draw their last color under [`TileMode::Clamp`]
    /// and the average stop color under the repeating modes.
    pub fn sample(&self, point: Point) -> Option<Color> {
        self.validate().ok()?;
        if self.is_degenerate() {
            return match self.tile_mode() {
                TileMode::Clamp => self.colors().last().copied(),
                TileMode::Repeated | TileMode::Mirror => Some(average_color(self.colors())),
                TileMode::Decal => None,
            };
        }
        let t = match self {
            Self::Linear { from, to, .. } => {
                let axis = *to - *from;
                (point - *from).dot(axis) / axis.hypot2()
            }
            Self::Radial {
                center,
                radius,
                focal,
                ..
            } => radial_parameter(point, *center, f64::from(*radius), *focal)?,
        };
        let t = self.tile_mode().apply(t)?;
        Some(interpolate_stops(self.colors(), self.offsets(), t))
    }
}

/// Solve for the largest `t >= 0` such that `point` lies on the circle
/// interpolated from `(focal, 0)` to `(center, radius)`.
fn radial_parameter(point: Point, center: Point, radius: f64, focal: Option<Point>) -> Option<f64> {
    let focal = focal.unwrap_or(center);
    let d: Vec2 = point - focal;
    let e: Vec2 = center - focal;
    if e.hypot2() <= DEGENERATE_EPSILON {
        return Some(d.hypot() / radius);
    }
    // (|e|^2 - r^2) t^2 - 2 (d.e) t + |d|^2 = 0
    let a = e.hypot2() - radius * radius;
    let b = d.dot(e);
    let c = d.hypot2();
    if a.abs() <= DEGENERATE_EPSILON {
        return (b > 0.0).then(|| c / (2.0 * b));
    }
    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let t0 = (b + root) / a;
    let t1 = (b - root) / a;
    let t = t0.max(t1);
    if t >= 0.0 {
        Some(t)
    } else {
        let t = t0.min(t1);
        (t >= 0.0).then_some(t)
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Color components are f32; the interpolation weight is always in [0, 1]."
)]
fn interpolate_stops(colors: &[Color], offsets: Option<&[f32]>, t: f64) -> Color {
    let last = colors.len() - 1;
    if last == 0 {
        return colors[0];
    }
    let offset_at = |i: usize| match offsets {
        Some(offsets) => f64::from(offsets[i]),
        None => i as f64 / last as f64,
    };
    if t <= offset_at(0) {
        return colors[0];
    }
    for i in 1..=last {
        let hi = offset_at(i);
        if t <= hi {
            let lo = offset_at(i - 1);
            let span = hi - lo;
            if span <= DEGENERATE_EPSILON {
                return colors[i];
            }
            let w = ((t - lo) / span) as f32;
            return lerp_color(colors[i - 1], colors[i], w);
        }
    }
    colors[last]
}

fn lerp_color(a: Color, b: Color, w: f32) -> Color {
    let mut out = [0.0_f32; 4];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = a.components[i] + (b.components[i] - a.components[i]) * w;
    }
    Color::new(out)
}

#[allow(clippy::cast_precision_loss, reason = "Stop counts are tiny.")]
fn average_color(colors: &[Color]) -> Color {
    let mut sum = [0.0_f32; 4];
    for color in colors {
        for (slot, c) in sum.iter_mut().zip(color.components) {
            *slot += c;
        }
    }
    let n = colors.len() as f32;
    Color::new(sum.map(|c| c / n))
}

/// A scoped layer pushed onto the surface's layer stack.
///
/// Layers must be well-nested: every push is matched by a
/// [`DrawingSurface::layer_pop`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LayerOp {
    /// Composite the layer's contents into its parent using the given paint
    /// (its alpha and blend mode).
    SaveLayer(PaintId),
    /// Restrict drawing inside the layer to the interior of a path, using the
    /// path's own fill rule.
    ClipPath(PathId),
}

/// Draw operations that produce pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Draw a path with a paint, or with the surface's empty paint when `None`.
    ///
    /// Whether the path is filled or stroked is a property of the paint.
    FillPath {
        /// Path resource to draw.
        path: PathId,
        /// Paint resource to draw with.
        paint: Option<PaintId>,
    },
    /// Draw a triangle mesh.
    Vertices {
        /// Flat `x, y` coordinate pairs.
        positions: Box<[f32]>,
        /// Optional triangle indices into `positions`; consecutive triples
        /// of vertices form triangles when `None`.
        indices: Option<Box<[u16]>>,
        /// Paint resource to draw with.
        paint: Option<PaintId>,
        /// Blend mode combining vertex colors with the paint.
        blend: BlendMode,
    },
}

/// Unified surface operation used by recordings.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    /// Push a new layer.
    PushLayer(LayerOp),
    /// Pop the most recently pushed layer.
    PopLayer,
    /// Drawing operation.
    Draw(DrawOp),
}

/// Resource creation interface.
///
/// Implementations are free to choose how resources are stored, but IDs must
/// remain valid and refer to the same logical resource for the lifetime of
/// the surface.
pub trait ResourceSurface {
    /// Create an empty path resource.
    fn create_path(&mut self, fill_rule: FillRule) -> PathId;

    /// Append a command to a previously created path.
    fn extend_path(&mut self, id: PathId, cmd: PathCmd);

    /// Create a paint resource.
    fn create_paint(&mut self, desc: PaintDesc) -> PaintId;

    /// Create a shader resource.
    ///
    /// Surfaces reject descriptors they cannot construct; see
    /// [`ShaderDesc::validate`].
    fn create_shader(&mut self, desc: ShaderDesc) -> Result<ShaderId, ShaderError>;
}

/// Immediate-mode drawing surface.
pub trait DrawingSurface: ResourceSurface {
    /// Immutable artifact produced by [`DrawingSurface::finish`].
    type Picture;

    /// Record the intrinsic size of the picture being drawn.
    fn set_size(&mut self, size: Size);

    /// Push a new layer onto the layer stack.
    fn layer_push(&mut self, op: LayerOp);

    /// Pop the most recently pushed layer.
    fn layer_pop(&mut self);

    /// Apply a draw operation.
    fn draw(&mut self, op: DrawOp);

    /// End recording and return the finished artifact.
    ///
    /// Callers invoke this at most once per surface.
    fn finish(&mut self) -> Self::Picture;

    /// Apply a recorded [`SurfaceOp`].
    #[inline]
    fn apply(&mut self, op: SurfaceOp) {
        match op {
            SurfaceOp::PushLayer(layer) => self.layer_push(layer),
            SurfaceOp::PopLayer => self.layer_pop(),
            SurfaceOp::Draw(draw) => self.draw(draw),
        }
    }
}
