use crate::geometry::{Rect, Vec2};
use grove_core::TooltipSettings;
use serde::Serialize;

/// Top-left corner and size of the info panel in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TooltipPlacement {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl TooltipPlacement {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(
            Vec2::new(self.left, self.top),
            Vec2::new(self.width, self.height),
        )
    }
}

/// Keeps the hover panel next to the pointer without leaving the viewport.
#[derive(Debug, Clone, Default)]
pub struct TooltipPositioner {
    settings: TooltipSettings,
}

impl TooltipPositioner {
    pub fn new(settings: TooltipSettings) -> Self {
        Self { settings }
    }

    /// Place a panel of the configured width and the given height.
    ///
    /// The panel goes right of and slightly above the pointer and flips to
    /// the left side when it would cross the right margin. Both axes are
    /// then clamped between the margins, the leading margin winning when the
    /// panel is larger than the viewport. On a viewport narrower than two
    /// margins the margin shrinks to half the viewport so the panel still
    /// overlaps it.
    pub fn place(&self, anchor: Vec2, viewport: Vec2, height: f32) -> TooltipPlacement {
        let s = &self.settings;
        let width = s.width;
        let height = height.max(0.0);
        let margin_x = s.margin.min(viewport.x.max(0.0) / 2.0);
        let margin_y = s.margin.min(viewport.y.max(0.0) / 2.0);

        let mut left = anchor.x + s.offset_x;
        let top = anchor.y + s.offset_y;

        if left + width > viewport.x - margin_x {
            left = anchor.x - width - s.offset_x;
        }
        let left = left.min(viewport.x - margin_x - width).max(margin_x);
        let top = top.min(viewport.y - margin_y - height).max(margin_y);

        TooltipPlacement {
            left,
            top,
            width,
            height,
        }
    }
}
