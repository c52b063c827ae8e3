// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use stipple_geometry::Transform;

/// A rendering backend that draws the dot layer under a camera transform.
///
/// The camera broadcasts each applied transform to every attached renderer
/// synchronously, in attach order, within the same frame, so a vector layer
/// and a raster layer never show different transforms.
///
/// Closures taking a [`Transform`] implement this trait.
pub trait Renderer {
    /// Draws (or repositions) the layer for `transform`.
    ///
    /// `transform` maps data units to canvas pixels.
    fn render(&mut self, transform: Transform);
}

impl<F> Renderer for F
where
    F: FnMut(Transform),
{
    fn render(&mut self, transform: Transform) {
        self(transform);
    }
}

/// Handle for detaching a renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RendererId(u32);

#[derive(Default)]
pub(crate) struct RendererSet {
    next_id: u32,
    entries: Vec<(RendererId, Box<dyn Renderer>)>,
}

impl core::fmt::Debug for RendererSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RendererSet")
            .field("attached", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl RendererSet {
    pub(crate) fn attach(&mut self, renderer: Box<dyn Renderer>) -> RendererId {
        let id = RendererId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push((id, renderer));
        id
    }

    pub(crate) fn detach(&mut self, id: RendererId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(rid, _)| *rid != id);
        self.entries.len() != before
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn broadcast(&mut self, transform: Transform) {
        for (_, renderer) in &mut self.entries {
            renderer.render(transform);
        }
    }
}
