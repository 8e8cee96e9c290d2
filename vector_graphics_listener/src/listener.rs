// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The listener contract and its replaying implementation.

use alloc::{boxed::Box, vec::Vec};

use vector_graphics_surface::{
    BlendMode, Cap, Color, Compose, DrawOp, DrawingSurface, FillRule, Join, LayerOp, Mix, PaintDesc,
    PaintId, PaintStyle, PathCmd, PathId, Point, ShaderDesc, ShaderId, Size, StrokeStyle,
    TileMode, color_from_argb,
};

use crate::registry::Registry;

/// Parameters of a decoded paint instruction.
#[derive(Clone, Debug, PartialEq)]
pub struct PaintParams {
    /// Stream id of the paint; must equal the number of paints created so far.
    pub id: u32,
    /// Packed `0xAARRGGBB` base color.
    pub color: u32,
    /// Fill or stroke.
    pub style: PaintStyle,
    /// Blend mode for draws using this paint.
    pub blend: BlendMode,
    /// Stream id of a previously created shader.
    pub shader_id: Option<u32>,
    /// Stroke cap, when the encoder recorded one.
    pub stroke_cap: Option<Cap>,
    /// Stroke join, when the encoder recorded one.
    pub stroke_join: Option<Join>,
    /// Stroke miter limit, when the encoder recorded one.
    pub stroke_miter_limit: Option<f32>,
    /// Stroke width, when the encoder recorded one.
    pub stroke_width: Option<f32>,
}

impl PaintParams {
    /// A plain fill paint with the given id and color.
    pub fn fill(id: u32, color: u32) -> Self {
        Self {
            id,
            color,
            style: PaintStyle::Fill,
            blend: BlendMode::default(),
            shader_id: None,
            stroke_cap: None,
            stroke_join: None,
            stroke_miter_limit: None,
            stroke_width: None,
        }
    }
}

/// Parameters of a decoded linear gradient instruction.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradientParams {
    /// Stream id of the shader; must equal the number of shaders created so far.
    pub id: u32,
    /// Start point.
    pub from: Point,
    /// End point.
    pub to: Point,
    /// Packed `0xAARRGGBB` stop colors.
    pub colors: Vec<u32>,
    /// Stop offsets; evenly spaced when absent.
    pub offsets: Option<Vec<f32>>,
    /// Behavior outside the gradient range.
    pub tile_mode: TileMode,
}

/// Parameters of a decoded radial gradient instruction.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradientParams {
    /// Stream id of the shader; must equal the number of shaders created so far.
    pub id: u32,
    /// Center of the gradient circle.
    pub center: Point,
    /// Radius of the gradient circle.
    pub radius: f32,
    /// Focal point; defaults to `center`.
    pub focal: Option<Point>,
    /// Packed `0xAARRGGBB` stop colors.
    pub colors: Vec<u32>,
    /// Stop offsets; evenly spaced when absent.
    pub offsets: Option<Vec<f32>>,
    /// Behavior outside the gradient range.
    pub tile_mode: TileMode,
}

/// Handlers a vector graphics decoder invokes, one per decoded instruction.
///
/// The instruction set is closed, so decoders drive this trait through
/// static dispatch (see [`Opcode::dispatch`](crate::Opcode::dispatch)).
/// Handlers return nothing: a malformed stream is a bug in the encoder or
/// decoder, and implementations panic on it.
pub trait VectorGraphicsListener {
    /// The picture's intrinsic size.
    fn on_size(&mut self, width: f32, height: f32);

    /// Begin building path `id`.
    fn on_path_start(&mut self, id: u32, fill_rule: FillRule);

    /// Start a new contour in the current path.
    fn on_path_move_to(&mut self, x: f32, y: f32);

    /// Append a line segment to the current path.
    fn on_path_line_to(&mut self, x: f32, y: f32);

    /// Append a cubic Bézier segment to the current path.
    fn on_path_cubic_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32);

    /// Close the current contour.
    fn on_path_close(&mut self);

    /// Stop building the current path.
    fn on_path_finished(&mut self);

    /// Create a paint.
    fn on_paint(&mut self, paint: PaintParams);

    /// Draw a path, with the default paint when `paint_id` is `None`.
    fn on_draw_path(&mut self, path_id: u32, paint_id: Option<u32>);

    /// Draw a triangle mesh.
    fn on_draw_vertices(
        &mut self,
        vertices: Vec<f32>,
        indices: Option<Vec<u16>>,
        paint_id: Option<u32>,
    );

    /// Create a linear gradient shader.
    fn on_linear_gradient(&mut self, gradient: LinearGradientParams);

    /// Create a radial gradient shader.
    fn on_radial_gradient(&mut self, gradient: RadialGradientParams);

    /// Push a compositing layer scoped by a paint.
    fn on_save_layer(&mut self, paint_id: u32);

    /// Push a layer clipped to a path.
    fn on_clip_path(&mut self, path_id: u32);

    /// Pop the most recently pushed layer.
    fn on_restore_layer(&mut self);
}

/// Macro-state of a [`ReplayListener`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ListenerState {
    /// Accepting instructions.
    Recording,
    /// Finished; every further call is a contract violation.
    Finalized,
}

/// Replays decoded instructions onto a [`DrawingSurface`].
///
/// The listener keeps one registry per resource kind, mapping the stream's
/// dense ids to the handles the surface returned. It validates the stream as
/// it goes and panics on the first contract violation:
///
/// - a create instruction whose id is not the next id for its kind,
/// - a reference to a path, paint, or shader that was never created,
/// - a path segment with no path under construction, or a path start while
///   one is already under construction,
/// - a restore with no layer to restore,
/// - any instruction after [`ReplayListener::finish`], or finishing twice.
///
/// Use a fresh listener for every decode pass.
#[derive(Debug)]
pub struct ReplayListener<S: DrawingSurface> {
    surface: S,
    paths: Registry<PathId>,
    paints: Registry<PaintId>,
    shaders: Registry<ShaderId>,
    /// Index into `paths` of the path under construction.
    current_path: Option<usize>,
    layer_depth: u32,
    state: ListenerState,
}

impl<S: DrawingSurface> ReplayListener<S> {
    /// Create a listener that replays onto `surface`.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            paths: Registry::new("path"),
            paints: Registry::new("paint"),
            shaders: Registry::new("shader"),
            current_path: None,
            layer_depth: 0,
            state: ListenerState::Recording,
        }
    }

    /// Current macro-state.
    pub fn state(&self) -> ListenerState {
        self.state
    }

    /// Returns true once [`ReplayListener::finish`] has been called.
    pub fn is_finalized(&self) -> bool {
        self.state == ListenerState::Finalized
    }

    /// Returns true while a path is under construction.
    pub fn is_building_path(&self) -> bool {
        self.current_path.is_some()
    }

    /// Number of layers pushed and not yet restored.
    pub fn layer_depth(&self) -> u32 {
        self.layer_depth
    }

    /// The surface being replayed onto.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Give back the surface.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// End the replay and return the surface's finished picture.
    ///
    /// Valid exactly once per listener.
    pub fn finish(&mut self) -> S::Picture {
        assert!(
            self.state == ListenerState::Recording,
            "finish: listener already finalized"
        );
        self.state = ListenerState::Finalized;
        self.current_path = None;
        if self.layer_depth != 0 {
            log::warn!(
                "finishing with {} unrestored layer(s)",
                self.layer_depth
            );
        }
        log::debug!(
            "replay finished: {} paths, {} paints, {} shaders",
            self.paths.len(),
            self.paints.len(),
            self.shaders.len()
        );
        self.surface.finish()
    }

    fn assert_recording(&self, opcode: &str) {
        assert!(
            self.state == ListenerState::Recording,
            "{opcode}: listener already finalized"
        );
    }

    fn extend_current_path(&mut self, opcode: &str, cmd: PathCmd) {
        self.assert_recording(opcode);
        let Some(index) = self.current_path else {
            panic!("{opcode}: no path under construction");
        };
        self.surface.extend_path(self.paths.at(index), cmd);
    }

    fn paint_handle(&self, paint_id: Option<u32>) -> Option<PaintId> {
        paint_id.map(|id| self.paints.get(id))
    }

    fn create_shader(&mut self, id: u32, desc: ShaderDesc) {
        let surface = &mut self.surface;
        self.shaders.insert_with(id, || {
            surface
                .create_shader(desc)
                .unwrap_or_else(|err| panic!("shader {id} rejected by the surface: {err}"))
        });
    }
}

fn gradient_colors(colors: Vec<u32>) -> Box<[Color]> {
    colors.into_iter().map(color_from_argb).collect()
}

/// Keep `value` only when it differs from the surface default.
fn non_default<T: PartialEq>(value: Option<T>, default: T) -> Option<T> {
    value.filter(|v| *v != default)
}

impl<S: DrawingSurface> VectorGraphicsListener for ReplayListener<S> {
    fn on_size(&mut self, width: f32, height: f32) {
        self.assert_recording("size");
        log::trace!("size {width}x{height}");
        self.surface
            .set_size(Size::new(f64::from(width), f64::from(height)));
    }

    fn on_path_start(&mut self, id: u32, fill_rule: FillRule) {
        self.assert_recording("path_start");
        assert!(
            self.current_path.is_none(),
            "path_start: path {id} started while another path is under construction"
        );
        log::trace!("path_start id={id} fill_rule={fill_rule:?}");
        let surface = &mut self.surface;
        let index = self
            .paths
            .insert_with(id, || surface.create_path(fill_rule));
        self.current_path = Some(index);
    }

    fn on_path_move_to(&mut self, x: f32, y: f32) {
        self.extend_current_path("move_to", PathCmd::MoveTo { x, y });
    }

    fn on_path_line_to(&mut self, x: f32, y: f32) {
        self.extend_current_path("line_to", PathCmd::LineTo { x, y });
    }

    fn on_path_cubic_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) {
        self.extend_current_path(
            "cubic_to",
            PathCmd::CubicTo {
                x1,
                y1,
                x2,
                y2,
                x3,
                y3,
            },
        );
    }

    fn on_path_close(&mut self) {
        self.extend_current_path("close", PathCmd::Close);
    }

    fn on_path_finished(&mut self) {
        self.assert_recording("path_finished");
        log::trace!("path_finished");
        self.current_path = None;
    }

    fn on_paint(&mut self, paint: PaintParams) {
        self.assert_recording("paint");
        log::trace!("paint id={} color={:#010x}", paint.id, paint.color);

        let mut desc = PaintDesc::new(color_from_argb(paint.color));
        if paint.blend != BlendMode::default() {
            desc.blend = Some(paint.blend);
        }
        if let Some(shader_id) = paint.shader_id {
            desc.shader = Some(self.shaders.get(shader_id));
        }
        if paint.style == PaintStyle::Stroke {
            let defaults = StrokeStyle::DEFAULT;
            desc.style = PaintStyle::Stroke;
            desc.stroke.cap = non_default(paint.stroke_cap, defaults.cap);
            desc.stroke.join = non_default(paint.stroke_join, defaults.join);
            desc.stroke.miter_limit =
                non_default(paint.stroke_miter_limit, defaults.miter_limit);
            desc.stroke.width = non_default(paint.stroke_width, defaults.width);
        }

        let surface = &mut self.surface;
        self.paints
            .insert_with(paint.id, || surface.create_paint(desc));
    }

    fn on_draw_path(&mut self, path_id: u32, paint_id: Option<u32>) {
        self.assert_recording("draw_path");
        log::trace!("draw_path path={path_id} paint={paint_id:?}");
        let path = self.paths.get(path_id);
        let paint = self.paint_handle(paint_id);
        self.surface.draw(DrawOp::FillPath { path, paint });
    }

    fn on_draw_vertices(
        &mut self,
        vertices: Vec<f32>,
        indices: Option<Vec<u16>>,
        paint_id: Option<u32>,
    ) {
        self.assert_recording("draw_vertices");
        log::trace!(
            "draw_vertices {} coords, indexed={} paint={paint_id:?}",
            vertices.len(),
            indices.is_some()
        );
        let paint = self.paint_handle(paint_id);
        self.surface.draw(DrawOp::Vertices {
            positions: vertices.into_boxed_slice(),
            indices: indices.map(Vec::into_boxed_slice),
            paint,
            blend: BlendMode::new(Mix::Normal, Compose::SrcOver),
        });
    }

    fn on_linear_gradient(&mut self, gradient: LinearGradientParams) {
        self.assert_recording("linear_gradient");
        log::trace!("linear_gradient id={}", gradient.id);
        let desc = ShaderDesc::Linear {
            from: gradient.from,
            to: gradient.to,
            colors: gradient_colors(gradient.colors),
            offsets: gradient.offsets.map(Vec::into_boxed_slice),
            tile_mode: gradient.tile_mode,
        };
        self.create_shader(gradient.id, desc);
    }

    fn on_radial_gradient(&mut self, gradient: RadialGradientParams) {
        self.assert_recording("radial_gradient");
        log::trace!("radial_gradient id={}", gradient.id);
        let desc = ShaderDesc::Radial {
            center: gradient.center,
            radius: gradient.radius,
            focal: Some(gradient.focal.unwrap_or(gradient.center)),
            colors: gradient_colors(gradient.colors),
            offsets: gradient.offsets.map(Vec::into_boxed_slice),
            tile_mode: gradient.tile_mode,
        };
        self.create_shader(gradient.id, desc);
    }

    fn on_save_layer(&mut self, paint_id: u32) {
        self.assert_recording("save_layer");
        log::trace!("save_layer paint={paint_id}");
        let paint = self.paints.get(paint_id);
        self.surface.layer_push(LayerOp::SaveLayer(paint));
        self.layer_depth += 1;
    }

    fn on_clip_path(&mut self, path_id: u32) {
        self.assert_recording("clip_path");
        log::trace!("clip_path path={path_id}");
        let path = self.paths.get(path_id);
        self.surface.layer_push(LayerOp::ClipPath(path));
        self.layer_depth += 1;
    }

    fn on_restore_layer(&mut self) {
        self.assert_recording("restore_layer");
        assert!(
            self.layer_depth > 0,
            "restore_layer: no layer to restore"
        );
        log::trace!("restore_layer depth={}", self.layer_depth);
        self.surface.layer_pop();
        self.layer_depth -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use vector_graphics_surface::SurfaceOp;
    use vector_graphics_surface_ref::RefSurface;

    fn listener() -> ReplayListener<RefSurface> {
        ReplayListener::new(RefSurface::new())
    }

    fn stroke_paint(id: u32) -> PaintParams {
        PaintParams {
            style: PaintStyle::Stroke,
            ..PaintParams::fill(id, 0xFF00_00FF)
        }
    }

    #[test]
    fn path_state_tracks_start_and_finish() {
        let mut l = listener();
        assert!(!l.is_building_path());
        l.on_path_start(0, FillRule::EvenOdd);
        assert!(l.is_building_path());
        l.on_path_line_to(1.0, 1.0);
        l.on_path_finished();
        assert!(!l.is_building_path());
        // Finishing again is a no-op.
        l.on_path_finished();
        l.on_path_start(1, FillRule::NonZero);
        l.on_path_finished();

        let recording = l.finish();
        assert_eq!(recording.path_count(), 2);
        assert_eq!(
            recording.path(PathId(0)).map(|p| p.fill_rule),
            Some(FillRule::EvenOdd)
        );
    }

    #[test]
    #[should_panic(expected = "line_to: no path under construction")]
    fn line_to_without_path_panics() {
        let mut l = listener();
        l.on_path_line_to(0.0, 0.0);
    }

    #[test]
    #[should_panic(expected = "cubic_to: no path under construction")]
    fn cubic_to_after_finish_path_panics() {
        let mut l = listener();
        l.on_path_start(0, FillRule::NonZero);
        l.on_path_finished();
        l.on_path_cubic_to(0.0, 0.0, 1.0, 1.0, 2.0, 2.0);
    }

    #[test]
    #[should_panic(expected = "close: no path under construction")]
    fn close_without_path_panics() {
        let mut l = listener();
        l.on_path_close();
    }

    #[test]
    #[should_panic(expected = "while another path is under construction")]
    fn nested_path_start_panics() {
        let mut l = listener();
        l.on_path_start(0, FillRule::NonZero);
        l.on_path_start(1, FillRule::NonZero);
    }

    #[test]
    #[should_panic(expected = "path id 1 out of order: expected 0")]
    fn out_of_order_path_id_panics() {
        let mut l = listener();
        l.on_path_start(1, FillRule::NonZero);
    }

    #[test]
    #[should_panic(expected = "paint id 0 out of order: expected 1")]
    fn repeated_paint_id_panics() {
        let mut l = listener();
        l.on_paint(PaintParams::fill(0, 0xFF00_0000));
        l.on_paint(PaintParams::fill(0, 0xFF00_0000));
    }

    #[test]
    #[should_panic(expected = "shader id 0 out of range (0 registered)")]
    fn paint_with_undefined_shader_panics() {
        let mut l = listener();
        l.on_paint(PaintParams {
            shader_id: Some(0),
            ..PaintParams::fill(0, 0xFF00_0000)
        });
    }

    #[test]
    fn fill_paint_ignores_stroke_parameters() {
        let mut l = listener();
        l.on_paint(PaintParams {
            stroke_width: Some(8.0),
            stroke_cap: Some(Cap::Round),
            ..PaintParams::fill(0, 0x8000_FF00)
        });
        let recording = l.finish();
        let paint = recording.paint(PaintId(0)).unwrap();
        assert_eq!(paint.style, PaintStyle::Fill);
        assert!(paint.stroke.is_empty());
        assert_eq!(paint.blend, None);
        assert_eq!(paint.color, Color::from_rgba8(0, 0xFF, 0, 0x80));
    }

    #[test]
    fn stroke_paint_skips_default_overrides() {
        let mut l = listener();
        l.on_paint(PaintParams {
            stroke_cap: Some(Cap::Butt),
            stroke_join: Some(Join::Round),
            stroke_miter_limit: Some(4.0),
            stroke_width: Some(2.5),
            ..stroke_paint(0)
        });
        l.on_paint(stroke_paint(1));
        let recording = l.finish();

        let paint = recording.paint(PaintId(0)).unwrap();
        assert_eq!(paint.style, PaintStyle::Stroke);
        assert_eq!(paint.stroke.cap, None);
        assert_eq!(paint.stroke.join, Some(Join::Round));
        assert_eq!(paint.stroke.miter_limit, None);
        assert_eq!(paint.stroke.width, Some(2.5));
        assert_eq!(paint.stroke_style().cap, Cap::Butt);

        let bare = recording.paint(PaintId(1)).unwrap();
        assert_eq!(bare.style, PaintStyle::Stroke);
        assert!(bare.stroke.is_empty());
    }

    #[test]
    fn non_default_blend_is_applied() {
        let mut l = listener();
        let multiply = BlendMode::new(Mix::Multiply, Compose::SrcOver);
        l.on_paint(PaintParams {
            blend: multiply,
            ..PaintParams::fill(0, 0xFFFF_FFFF)
        });
        let recording = l.finish();
        assert_eq!(recording.paint(PaintId(0)).unwrap().blend, Some(multiply));
    }

    #[test]
    fn radial_focal_defaults_to_center() {
        let mut l = listener();
        l.on_radial_gradient(RadialGradientParams {
            id: 0,
            center: Point::new(4.0, 4.0),
            radius: 2.0,
            focal: None,
            colors: vec![0xFF00_0000, 0xFFFF_FFFF],
            offsets: None,
            tile_mode: TileMode::Clamp,
        });
        let recording = l.finish();
        let Some(ShaderDesc::Radial { focal, .. }) = recording.shader(ShaderId(0)) else {
            panic!("expected a radial shader");
        };
        assert_eq!(*focal, Some(Point::new(4.0, 4.0)));
    }

    #[test]
    #[should_panic(expected = "shader 0 rejected by the surface")]
    fn mismatched_offsets_surface_error_panics() {
        let mut l = listener();
        l.on_linear_gradient(LinearGradientParams {
            id: 0,
            from: Point::ORIGIN,
            to: Point::new(1.0, 0.0),
            colors: vec![0xFF00_0000, 0xFFFF_FFFF],
            offsets: Some(vec![0.0]),
            tile_mode: TileMode::Clamp,
        });
    }

    #[test]
    #[should_panic(expected = "shader id 1 out of order: expected 0")]
    fn out_of_order_linear_gradient_id_panics() {
        let mut l = listener();
        l.on_linear_gradient(LinearGradientParams {
            id: 1,
            from: Point::ORIGIN,
            to: Point::new(1.0, 0.0),
            colors: vec![0xFF00_0000],
            offsets: None,
            tile_mode: TileMode::Clamp,
        });
    }

    #[test]
    #[should_panic(expected = "shader id 1 out of order: expected 0")]
    fn out_of_order_radial_gradient_id_panics() {
        let mut l = listener();
        l.on_radial_gradient(RadialGradientParams {
            id: 1,
            center: Point::ORIGIN,
            radius: 1.0,
            focal: None,
            colors: vec![0xFF00_0000],
            offsets: None,
            tile_mode: TileMode::Clamp,
        });
    }

    #[test]
    #[should_panic(expected = "paint id 4 out of range (0 registered)")]
    fn draw_path_with_dangling_paint_panics() {
        let mut l = listener();
        l.on_path_start(0, FillRule::NonZero);
        l.on_path_line_to(1.0, 0.0);
        l.on_path_finished();
        l.on_draw_path(0, Some(4));
    }

    #[test]
    #[should_panic(expected = "path id 2 out of range (1 registered)")]
    fn clip_path_with_dangling_path_panics() {
        let mut l = listener();
        l.on_path_start(0, FillRule::NonZero);
        l.on_path_finished();
        l.on_clip_path(2);
    }

    #[test]
    fn vertices_always_draw_source_over() {
        let mut l = listener();
        l.on_paint(PaintParams {
            blend: BlendMode::new(Mix::Screen, Compose::SrcOver),
            ..PaintParams::fill(0, 0xFFFF_0000)
        });
        l.on_draw_vertices(vec![0.0, 0.0, 4.0, 0.0, 0.0, 4.0], Some(vec![0, 1, 2]), Some(0));
        l.on_draw_vertices(vec![0.0, 0.0, 4.0, 0.0, 0.0, 4.0], None, None);
        let recording = l.finish();
        let blends: Vec<_> = recording
            .draws()
            .map(|d| match d {
                DrawOp::Vertices { blend, .. } => *blend,
                other => panic!("expected vertices, got {other:?}"),
            })
            .collect();
        assert_eq!(
            blends,
            vec![BlendMode::new(Mix::Normal, Compose::SrcOver); 2]
        );
    }

    #[test]
    #[should_panic(expected = "paint id 0 out of range (0 registered)")]
    fn vertices_with_dangling_paint_panics() {
        let mut l = listener();
        l.on_draw_vertices(vec![0.0; 6], None, Some(0));
    }

    #[test]
    fn layers_balance_to_zero() {
        let mut l = listener();
        l.on_paint(PaintParams::fill(0, 0x8000_0000));
        l.on_path_start(0, FillRule::NonZero);
        l.on_path_finished();
        for _ in 0..3 {
            l.on_save_layer(0);
        }
        l.on_clip_path(0);
        assert_eq!(l.layer_depth(), 4);
        for _ in 0..4 {
            l.on_restore_layer();
        }
        assert_eq!(l.layer_depth(), 0);
        assert_eq!(l.surface().state().layer_stack_depth, 0);
        let recording = l.finish();
        assert!(matches!(
            recording.ops[3],
            SurfaceOp::PushLayer(LayerOp::ClipPath(PathId(0)))
        ));
    }

    #[test]
    #[should_panic(expected = "restore_layer: no layer to restore")]
    fn extra_restore_panics() {
        let mut l = listener();
        l.on_paint(PaintParams::fill(0, 0xFF00_0000));
        l.on_save_layer(0);
        l.on_restore_layer();
        l.on_restore_layer();
    }

    #[test]
    #[should_panic(expected = "paint id 2 out of range (0 registered)")]
    fn save_layer_with_dangling_paint_panics() {
        let mut l = listener();
        l.on_save_layer(2);
    }

    #[test]
    #[should_panic(expected = "finish: listener already finalized")]
    fn double_finish_panics() {
        let mut l = listener();
        let _ = l.finish();
        assert!(l.is_finalized());
        let _ = l.finish();
    }

    #[test]
    #[should_panic(expected = "path_start: listener already finalized")]
    fn opcode_after_finish_panics() {
        let mut l = listener();
        let _ = l.finish();
        l.on_path_start(0, FillRule::NonZero);
    }

    #[test]
    fn finish_clears_unfinished_path() {
        let mut l = listener();
        l.on_size(32.0, 16.0);
        l.on_path_start(0, FillRule::NonZero);
        l.on_path_line_to(3.0, 3.0);
        let recording = l.finish();
        assert!(!l.is_building_path());
        assert_eq!(l.state(), ListenerState::Finalized);
        assert_eq!(recording.size, Some(Size::new(32.0, 16.0)));
    }
}
