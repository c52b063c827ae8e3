// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use stipple_decollide::LayoutSnapshot;
use stipple_event_state::drag::DragSession;

use crate::point::{PointId, ScenePoint};

type PointHandler = Box<dyn FnMut(&ScenePoint)>;
type DragHandler = Box<dyn FnMut(&ScenePoint, &DragSession<PointId>)>;
type Notify = Box<dyn FnMut()>;

/// Owner callbacks. Unset callbacks are skipped.
///
/// Registering a drag-start handler is what enables dragging: without one,
/// moving a pressed point only cancels its click.
#[derive(Default)]
pub struct SceneCallbacks {
    pub(crate) hover: Option<Box<dyn FnMut(Option<&ScenePoint>)>>,
    pub(crate) click: Option<PointHandler>,
    pub(crate) background_click: Option<Notify>,
    pub(crate) drag_start: Option<DragHandler>,
    pub(crate) drag_move: Option<DragHandler>,
    pub(crate) drag_end: Option<DragHandler>,
    pub(crate) zoom_start: Option<Notify>,
    pub(crate) zoom_end: Option<Notify>,
    pub(crate) decollision_complete: Option<Box<dyn FnMut(&LayoutSnapshot<PointId>)>>,
}

impl SceneCallbacks {
    /// Called with the hovered point, or `None` when hover ends.
    #[must_use]
    pub fn on_hover(mut self, f: impl FnMut(Option<&ScenePoint>) + 'static) -> Self {
        self.hover = Some(Box::new(f));
        self
    }

    /// Called when a point is clicked.
    #[must_use]
    pub fn on_click(mut self, f: impl FnMut(&ScenePoint) + 'static) -> Self {
        self.click = Some(Box::new(f));
        self
    }

    /// Called when a click hits no point.
    #[must_use]
    pub fn on_background_click(mut self, f: impl FnMut() + 'static) -> Self {
        self.background_click = Some(Box::new(f));
        self
    }

    /// Called when a drag starts on a point. Enables dragging.
    #[must_use]
    pub fn on_drag_start(
        mut self,
        f: impl FnMut(&ScenePoint, &DragSession<PointId>) + 'static,
    ) -> Self {
        self.drag_start = Some(Box::new(f));
        self
    }

    /// Called for every pointer move during a drag.
    #[must_use]
    pub fn on_drag_move(
        mut self,
        f: impl FnMut(&ScenePoint, &DragSession<PointId>) + 'static,
    ) -> Self {
        self.drag_move = Some(Box::new(f));
        self
    }

    /// Called when a drag ends.
    #[must_use]
    pub fn on_drag_end(
        mut self,
        f: impl FnMut(&ScenePoint, &DragSession<PointId>) + 'static,
    ) -> Self {
        self.drag_end = Some(Box::new(f));
        self
    }

    /// Called when the camera starts moving, by gesture or animation.
    #[must_use]
    pub fn on_zoom_start(mut self, f: impl FnMut() + 'static) -> Self {
        self.zoom_start = Some(Box::new(f));
        self
    }

    /// Called when the camera comes to rest.
    #[must_use]
    pub fn on_zoom_end(mut self, f: impl FnMut() + 'static) -> Self {
        self.zoom_end = Some(Box::new(f));
        self
    }

    /// Called with the final positions when a layout settles at positions
    /// that differ from the previous ones.
    #[must_use]
    pub fn on_decollision_complete(
        mut self,
        f: impl FnMut(&LayoutSnapshot<PointId>) + 'static,
    ) -> Self {
        self.decollision_complete = Some(Box::new(f));
        self
    }

    pub(crate) fn drag_enabled(&self) -> bool {
        self.drag_start.is_some()
    }
}

impl fmt::Debug for SceneCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneCallbacks")
            .field("hover", &self.hover.is_some())
            .field("click", &self.click.is_some())
            .field("background_click", &self.background_click.is_some())
            .field("drag_start", &self.drag_start.is_some())
            .field("drag_move", &self.drag_move.is_some())
            .field("drag_end", &self.drag_end.is_some())
            .field("zoom_start", &self.zoom_start.is_some())
            .field("zoom_end", &self.zoom_end.is_some())
            .field("decollision_complete", &self.decollision_complete.is_some())
            .finish()
    }
}
