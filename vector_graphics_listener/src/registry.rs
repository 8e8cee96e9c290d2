// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dense, append-only resource registries.

use alloc::vec::Vec;

/// Append-only list of surface handles addressed by the stream's own ids.
///
/// Ids are assigned densely in arrival order, so the id of every insertion
/// must equal the registry length at that moment.
#[derive(Clone, Debug)]
pub(crate) struct Registry<T> {
    kind: &'static str,
    items: Vec<T>,
}

impl<T: Copy> Registry<T> {
    pub(crate) fn new(kind: &'static str) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    /// Validate `id`, then append the handle produced by `create`.
    ///
    /// `create` only runs once the id has been accepted, so an out-of-order
    /// id never reaches the surface.
    pub(crate) fn insert_with(&mut self, id: u32, create: impl FnOnce() -> T) -> usize {
        let index = id as usize;
        assert!(
            index == self.items.len(),
            "{} id {id} out of order: expected {}",
            self.kind,
            self.items.len()
        );
        self.items.push(create());
        index
    }

    /// Resolve `id` to its handle.
    pub(crate) fn get(&self, id: u32) -> T {
        match self.items.get(id as usize) {
            Some(item) => *item,
            None => panic!(
                "{} id {id} out of range ({} registered)",
                self.kind,
                self.items.len()
            ),
        }
    }

    pub(crate) fn at(&self, index: usize) -> T {
        self.items[index]
    }
}
