// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=vector_graphics_listener --heading-base-level=0

//! Vector Graphics Listener: replay decoded vector graphics onto a drawing surface.
//!
//! An external codec decodes a compact binary instruction stream and pushes
//! one callback per instruction into a [`VectorGraphicsListener`]. This crate
//! provides [`ReplayListener`], which re-issues each instruction against a
//! [`DrawingSurface`] and finishes into the surface's picture artifact.
//!
//! Resources (paths, paints, shaders) are created by instructions carrying
//! dense, stream-assigned ids, and later instructions refer back to them by
//! id. The listener keeps an append-only registry per resource kind and
//! validates every id on arrival.
//!
//! # Contract violations
//!
//! A malformed stream is a bug in the encoder or decoder, not a runtime
//! condition, so the listener panics on the first violation instead of
//! returning errors. See [`ReplayListener`] for the full list.
//!
//! # Example
//!
//! ```
//! use vector_graphics_listener::{Opcode, PaintParams, replay};
//! use vector_graphics_surface::FillRule;
//! use vector_graphics_surface_ref::RefSurface;
//!
//! let picture = replay(
//!     RefSurface::new(),
//!     [
//!         Opcode::PathStart { id: 0, fill_rule: FillRule::NonZero },
//!         Opcode::LineTo { x: 10.0, y: 0.0 },
//!         Opcode::LineTo { x: 10.0, y: 10.0 },
//!         Opcode::ClosePath,
//!         Opcode::FinishPath,
//!         Opcode::Paint(PaintParams::fill(0, 0xFF00_0000)),
//!         Opcode::DrawPath { path_id: 0, paint_id: Some(0) },
//!     ],
//! );
//! assert_eq!(picture.draws().count(), 1);
//! ```
//!
//! [`DrawingSurface`]: vector_graphics_surface::DrawingSurface

#![no_std]

extern crate alloc;

mod listener;
mod opcode;
mod registry;

pub use listener::{
    LinearGradientParams, ListenerState, PaintParams, RadialGradientParams, ReplayListener,
    VectorGraphicsListener,
};
pub use opcode::{Opcode, replay};
