// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoded instructions and the driver that feeds them to a listener.

use alloc::vec::Vec;

use vector_graphics_surface::{DrawingSurface, FillRule};

use crate::listener::{
    LinearGradientParams, PaintParams, RadialGradientParams, ReplayListener,
    VectorGraphicsListener,
};

/// One decoded vector graphics instruction.
///
/// Each variant maps to exactly one [`VectorGraphicsListener`] handler.
#[derive(Clone, Debug, PartialEq)]
pub enum Opcode {
    /// See [`VectorGraphicsListener::on_size`].
    Size {
        /// Picture width.
        width: f32,
        /// Picture height.
        height: f32,
    },
    /// See [`VectorGraphicsListener::on_path_start`].
    PathStart {
        /// Stream id of the new path.
        id: u32,
        /// Fill rule of the new path.
        fill_rule: FillRule,
    },
    /// See [`VectorGraphicsListener::on_path_move_to`].
    MoveTo {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },
    /// See [`VectorGraphicsListener::on_path_line_to`].
    LineTo {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },
    /// See [`VectorGraphicsListener::on_path_cubic_to`].
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
    /// See [`VectorGraphicsListener::on_path_close`].
    ClosePath,
    /// See [`VectorGraphicsListener::on_path_finished`].
    FinishPath,
    /// See [`VectorGraphicsListener::on_paint`].
    Paint(PaintParams),
    /// See [`VectorGraphicsListener::on_draw_path`].
    DrawPath {
        /// Stream id of the path.
        path_id: u32,
        /// Stream id of the paint, if any.
        paint_id: Option<u32>,
    },
    /// See [`VectorGraphicsListener::on_draw_vertices`].
    DrawVertices {
        /// Flat `x, y` coordinate pairs.
        vertices: Vec<f32>,
        /// Optional triangle indices.
        indices: Option<Vec<u16>>,
        /// Stream id of the paint, if any.
        paint_id: Option<u32>,
    },
    /// See [`VectorGraphicsListener::on_linear_gradient`].
    LinearGradient(LinearGradientParams),
    /// See [`VectorGraphicsListener::on_radial_gradient`].
    RadialGradient(RadialGradientParams),
    /// See [`VectorGraphicsListener::on_save_layer`].
    SaveLayer {
        /// Stream id of the layer paint.
        paint_id: u32,
    },
    /// See [`VectorGraphicsListener::on_clip_path`].
    ClipPath {
        /// Stream id of the clip path.
        path_id: u32,
    },
    /// See [`VectorGraphicsListener::on_restore_layer`].
    RestoreLayer,
}

impl Opcode {
    /// Invoke the handler for this instruction.
    pub fn dispatch<L: VectorGraphicsListener + ?Sized>(self, listener: &mut L) {
        match self {
            Self::Size { width, height } => listener.on_size(width, height),
            Self::PathStart { id, fill_rule } => listener.on_path_start(id, fill_rule),
            Self::MoveTo { x, y } => listener.on_path_move_to(x, y),
            Self::LineTo { x, y } => listener.on_path_line_to(x, y),
            Self::CubicTo {
                x1,
                y1,
                x2,
                y2,
                x3,
                y3,
            } => listener.on_path_cubic_to(x1, y1, x2, y2, x3, y3),
            Self::ClosePath => listener.on_path_close(),
            Self::FinishPath => listener.on_path_finished(),
            Self::Paint(paint) => listener.on_paint(paint),
            Self::DrawPath { path_id, paint_id } => listener.on_draw_path(path_id, paint_id),
            Self::DrawVertices {
                vertices,
                indices,
                paint_id,
            } => listener.on_draw_vertices(vertices, indices, paint_id),
            Self::LinearGradient(gradient) => listener.on_linear_gradient(gradient),
            Self::RadialGradient(gradient) => listener.on_radial_gradient(gradient),
            Self::SaveLayer { paint_id } => listener.on_save_layer(paint_id),
            Self::ClipPath { path_id } => listener.on_clip_path(path_id),
            Self::RestoreLayer => listener.on_restore_layer(),
        }
    }
}

/// Replay a whole instruction stream onto `surface` and return its picture.
///
/// A fresh [`ReplayListener`] is used for the pass and finished exactly once.
pub fn replay<S, I>(surface: S, opcodes: I) -> S::Picture
where
    S: DrawingSurface,
    I: IntoIterator<Item = Opcode>,
{
    let mut listener = ReplayListener::new(surface);
    for opcode in opcodes {
        opcode.dispatch(&mut listener);
    }
    listener.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;

    /// Listener that writes the name of each handler it receives.
    #[derive(Default)]
    struct NameLog(Vec<&'static str>);

    impl VectorGraphicsListener for NameLog {
        fn on_size(&mut self, _: f32, _: f32) {
            self.0.push("size");
        }
        fn on_path_start(&mut self, _: u32, _: FillRule) {
            self.0.push("path_start");
        }
        fn on_path_move_to(&mut self, _: f32, _: f32) {
            self.0.push("move_to");
        }
        fn on_path_line_to(&mut self, _: f32, _: f32) {
            self.0.push("line_to");
        }
        fn on_path_cubic_to(&mut self, _: f32, _: f32, _: f32, _: f32, _: f32, _: f32) {
            self.0.push("cubic_to");
        }
        fn on_path_close(&mut self) {
            self.0.push("close");
        }
        fn on_path_finished(&mut self) {
            self.0.push("path_finished");
        }
        fn on_paint(&mut self, _: PaintParams) {
            self.0.push("paint");
        }
        fn on_draw_path(&mut self, _: u32, _: Option<u32>) {
            self.0.push("draw_path");
        }
        fn on_draw_vertices(&mut self, _: Vec<f32>, _: Option<Vec<u16>>, _: Option<u32>) {
            self.0.push("draw_vertices");
        }
        fn on_linear_gradient(&mut self, _: LinearGradientParams) {
            self.0.push("linear_gradient");
        }
        fn on_radial_gradient(&mut self, _: RadialGradientParams) {
            self.0.push("radial_gradient");
        }
        fn on_save_layer(&mut self, _: u32) {
            self.0.push("save_layer");
        }
        fn on_clip_path(&mut self, _: u32) {
            self.0.push("clip_path");
        }
        fn on_restore_layer(&mut self) {
            self.0.push("restore_layer");
        }
    }

    #[test]
    fn dispatch_preserves_order() {
        let stream = vec![
            Opcode::Size {
                width: 1.0,
                height: 1.0,
            },
            Opcode::PathStart {
                id: 0,
                fill_rule: FillRule::NonZero,
            },
            Opcode::MoveTo { x: 0.0, y: 0.0 },
            Opcode::CubicTo {
                x1: 0.0,
                y1: 1.0,
                x2: 1.0,
                y2: 1.0,
                x3: 1.0,
                y3: 0.0,
            },
            Opcode::ClosePath,
            Opcode::FinishPath,
            Opcode::Paint(PaintParams::fill(0, 0xFF00_0000)),
            Opcode::SaveLayer { paint_id: 0 },
            Opcode::ClipPath { path_id: 0 },
            Opcode::DrawPath {
                path_id: 0,
                paint_id: None,
            },
            Opcode::RestoreLayer,
            Opcode::RestoreLayer,
        ];
        let mut log = NameLog::default();
        for op in stream {
            op.dispatch(&mut log);
        }
        let joined: String = log.0.join(",");
        assert_eq!(
            joined,
            "size,path_start,move_to,cubic_to,close,path_finished,paint,\
             save_layer,clip_path,draw_path,restore_layer,restore_layer"
        );
    }

    #[test]
    fn dispatch_through_trait_object() {
        let mut log = NameLog::default();
        let listener: &mut dyn VectorGraphicsListener = &mut log;
        Opcode::DrawVertices {
            vertices: vec![0.0; 6],
            indices: None,
            paint_id: None,
        }
        .dispatch(listener);
        assert_eq!(log.0, ["draw_vertices"]);
    }
}
