// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=vector_graphics_surface_ref --heading-base-level=0

//! Vector Graphics Surface Reference Implementation.
//!
//! This crate provides a small, stateful implementation of
//! [`DrawingSurface`] and [`ResourceSurface`]
//! for **op recording and state tracing**.
//!
//! It is intentionally *not* a renderer:
//! - It does **not** rasterize to pixels.
//! - It keeps every resource it was asked to create, so a finished
//!   [`Recording`] can resolve path geometry and sample paints at a point.
//! - It is intended primarily for tests and debugging that want to assert on
//!   emitted ops and the layer state at the time each op is applied.

#![no_std]

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;

use kurbo::BezPath;
use vector_graphics_surface::{
    Color, DrawOp, DrawingSurface, FillRule, LayerOp, PaintDesc, PaintId, PathCmd, PathDesc,
    PathId, Point, ResourceSurface, ShaderDesc, ShaderError, ShaderId, Size, SurfaceOp,
};

/// Snapshot of the current layer state inside the surface.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateSnapshot {
    /// Number of active layers on the layer stack.
    pub layer_stack_depth: u32,
    /// The most recently pushed layer op, if any.
    pub layer_top: Option<LayerOp>,
}

/// Event recorded by the reference surface.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Layer push or pop and the resulting state snapshot.
    Layer {
        /// Operation that was applied.
        op: SurfaceOp,
        /// Snapshot after applying the operation.
        state: StateSnapshot,
    },
    /// Draw operation and the state snapshot used for drawing.
    Draw {
        /// Draw operation that was applied.
        op: DrawOp,
        /// Snapshot at the time of drawing.
        state: StateSnapshot,
    },
}

/// Immutable artifact produced by [`RefSurface::finish`].
///
/// The recording owns a copy of every resource the ops refer to, so it stays
/// meaningful after the surface that produced it is dropped.
#[derive(Clone, Debug)]
pub struct Recording {
    /// Intrinsic size reported through [`DrawingSurface::set_size`], if any.
    pub size: Option<Size>,
    /// Surface operations in the order they were applied.
    pub ops: Arc<[SurfaceOp]>,
    /// Events in the order they were applied.
    pub events: Arc<[Event]>,
    paths: Arc<[PathDesc]>,
    paints: Arc<[PaintDesc]>,
    shaders: Arc<[ShaderDesc]>,
}

impl Recording {
    /// Look up a path resource.
    pub fn path(&self, id: PathId) -> Option<&PathDesc> {
        self.paths.get(id.0 as usize)
    }

    /// Look up a paint resource.
    pub fn paint(&self, id: PaintId) -> Option<&PaintDesc> {
        self.paints.get(id.0 as usize)
    }

    /// Look up a shader resource.
    pub fn shader(&self, id: ShaderId) -> Option<&ShaderDesc> {
        self.shaders.get(id.0 as usize)
    }

    /// Number of path resources created while recording.
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Number of paint resources created while recording.
    pub fn paint_count(&self) -> usize {
        self.paints.len()
    }

    /// Number of shader resources created while recording.
    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    /// Iterate over the draw operations, skipping layer pushes and pops.
    pub fn draws(&self) -> impl Iterator<Item = &DrawOp> + '_ {
        self.ops.iter().filter_map(|op| match op {
            SurfaceOp::Draw(draw) => Some(draw),
            _ => None,
        })
    }

    /// Resolve a path resource to kurbo geometry.
    pub fn bez_path(&self, id: PathId) -> Option<BezPath> {
        self.path(id).map(PathDesc::to_bez_path)
    }

    /// Color a paint produces at `point`, ignoring any layers.
    ///
    /// `None` selects the surface's empty paint. Shaded paints return `None`
    /// where the shader draws nothing; the shader's color is modulated by the
    /// paint color's alpha.
    pub fn sample_paint(&self, paint: Option<PaintId>, point: Point) -> Option<Color> {
        let desc = match paint {
            Some(id) => self.paint(id)?,
            None => return Some(PaintDesc::default().color),
        };
        match desc.shader {
            Some(shader) => {
                let mut components = self.shader(shader)?.sample(point)?.components;
                components[3] *= desc.color.components[3];
                Some(Color::new(components))
            }
            None => Some(desc.color),
        }
    }
}

/// Simple reference implementation of the drawing surface.
///
/// This surface:
/// - Stores resource descriptors in vectors keyed by their IDs,
/// - Tracks the layer stack,
/// - Records high-level [`Event`]s as layer and draw operations are applied,
/// - Produces a single [`Recording`] from [`DrawingSurface::finish`].
///
/// Misuse that a real host would reject (unknown IDs, popping an empty layer
/// stack, drawing after finishing) panics.
#[derive(Default, Debug)]
pub struct RefSurface {
    paths: Vec<PathDesc>,
    paints: Vec<PaintDesc>,
    shaders: Vec<ShaderDesc>,

    /// Log of events in the order they were applied.
    events: Vec<Event>,
    /// Underlying surface ops, used to form the [`Recording`].
    ops: Vec<SurfaceOp>,
    state: StateSnapshot,
    layer_stack: Vec<LayerOp>,
    size: Option<Size>,
    finished: bool,
}

impl RefSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a slice of recorded events.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Returns a slice of raw surface operations.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Current layer state.
    pub fn state(&self) -> &StateSnapshot {
        &self.state
    }

    /// Returns true once [`DrawingSurface::finish`] has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn assert_recording(&self, what: &str) {
        assert!(!self.finished, "RefSurface: {what} after finish");
    }

    fn check_path(&self, id: PathId) {
        assert!(
            (id.0 as usize) < self.paths.len(),
            "RefSurface: unknown path {id:?}"
        );
    }

    fn check_paint(&self, id: PaintId) {
        assert!(
            (id.0 as usize) < self.paints.len(),
            "RefSurface: unknown paint {id:?}"
        );
    }

    fn sync_layer_state(&mut self) {
        self.state.layer_stack_depth = u32::try_from(self.layer_stack.len())
            .expect("RefSurface: too many layer stack entries for u32");
        self.state.layer_top = self.layer_stack.last().copied();
    }
}

impl ResourceSurface for RefSurface {
    fn create_path(&mut self, fill_rule: FillRule) -> PathId {
        self.assert_recording("create_path");
        let id =
            u32::try_from(self.paths.len()).expect("RefSurface: too many paths for u32 PathId");
        self.paths.push(PathDesc::new(fill_rule));
        PathId(id)
    }

    fn extend_path(&mut self, id: PathId, cmd: PathCmd) {
        self.assert_recording("extend_path");
        let Some(path) = self.paths.get_mut(id.0 as usize) else {
            panic!("RefSurface: unknown path {id:?}");
        };
        path.commands.push(cmd);
    }

    fn create_paint(&mut self, desc: PaintDesc) -> PaintId {
        self.assert_recording("create_paint");
        if let Some(shader) = desc.shader {
            assert!(
                (shader.0 as usize) < self.shaders.len(),
                "RefSurface: paint references unknown shader {shader:?}"
            );
        }
        let id =
            u32::try_from(self.paints.len()).expect("RefSurface: too many paints for u32 PaintId");
        self.paints.push(desc);
        PaintId(id)
    }

    fn create_shader(&mut self, desc: ShaderDesc) -> Result<ShaderId, ShaderError> {
        self.assert_recording("create_shader");
        desc.validate()?;
        let id = u32::try_from(self.shaders.len())
            .expect("RefSurface: too many shaders for u32 ShaderId");
        self.shaders.push(desc);
        Ok(ShaderId(id))
    }
}

impl DrawingSurface for RefSurface {
    type Picture = Recording;

    fn set_size(&mut self, size: Size) {
        self.assert_recording("set_size");
        self.size = Some(size);
    }

    fn layer_push(&mut self, op: LayerOp) {
        self.assert_recording("layer_push");
        match op {
            LayerOp::SaveLayer(paint) => self.check_paint(paint),
            LayerOp::ClipPath(path) => self.check_path(path),
        }
        self.layer_stack.push(op);
        self.sync_layer_state();

        let op = SurfaceOp::PushLayer(op);
        self.ops.push(op.clone());
        self.events.push(Event::Layer {
            op,
            state: self.state.clone(),
        });
    }

    fn layer_pop(&mut self) {
        self.assert_recording("layer_pop");
        assert!(
            self.layer_stack.pop().is_some(),
            "RefSurface: layer_pop with an empty layer stack"
        );
        self.sync_layer_state();

        self.ops.push(SurfaceOp::PopLayer);
        self.events.push(Event::Layer {
            op: SurfaceOp::PopLayer,
            state: self.state.clone(),
        });
    }

    fn draw(&mut self, op: DrawOp) {
        self.assert_recording("draw");
        match &op {
            DrawOp::FillPath { path, paint } => {
                self.check_path(*path);
                if let Some(paint) = paint {
                    self.check_paint(*paint);
                }
            }
            DrawOp::Vertices { paint, .. } => {
                if let Some(paint) = paint {
                    self.check_paint(*paint);
                }
            }
        }

        self.ops.push(SurfaceOp::Draw(op.clone()));
        self.events.push(Event::Draw {
            op,
            state: self.state.clone(),
        });
    }

    fn finish(&mut self) -> Recording {
        self.assert_recording("finish");
        self.finished = true;
        Recording {
            size: self.size,
            ops: Arc::from(core::mem::take(&mut self.ops)),
            events: Arc::from(core::mem::take(&mut self.events)),
            paths: Arc::from(core::mem::take(&mut self.paths)),
            paints: Arc::from(core::mem::take(&mut self.paints)),
            shaders: Arc::from(core::mem::take(&mut self.shaders)),
        }
    }
}
