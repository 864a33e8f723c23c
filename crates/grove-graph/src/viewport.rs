use crate::geometry::{Rect, Vec2};
use crate::graph::GraphNode;
use grove_core::FitSettings;
use serde::{Deserialize, Serialize};

/// Pan/zoom applied to world coordinates: `screen = world * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub translate: Vec2,
    pub scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: Self = Self {
        translate: Vec2::ZERO,
        scale: 1.0,
    };

    pub fn new(translate: Vec2, scale: f32) -> Self {
        Self { translate, scale }
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world * self.scale + self.translate
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.translate) * (1.0 / self.scale)
    }

    pub fn pan(&self, delta: Vec2) -> Self {
        Self::new(self.translate + delta, self.scale)
    }

    /// Multiply the scale by `factor`, clamped to `[min, max]`, keeping the
    /// world point under the screen-space `anchor` where it was.
    pub fn zoom_about(&self, factor: f32, anchor: Vec2, min: f32, max: f32) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return *self;
        }
        let scale = (self.scale * factor).clamp(min, max);
        let world = self.screen_to_world(anchor);
        Self::new(anchor - world * scale, scale)
    }

    /// Component-wise interpolation used by the animated fit.
    pub fn lerp(&self, to: &ViewTransform, t: f32) -> ViewTransform {
        let t = t.clamp(0.0, 1.0);
        ViewTransform {
            translate: self.translate + (to.translate - self.translate) * t,
            scale: self.scale + (to.scale - self.scale) * t,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.translate.is_finite() && self.scale.is_finite() && self.scale > 0.0
    }
}

/// Computes the transform that frames the laid-out graph in the viewport.
pub struct ViewportFitter;

impl ViewportFitter {
    /// Bounding box of node circles (center ± radius).
    pub fn content_bounds(nodes: &[GraphNode]) -> Option<Rect> {
        if nodes.is_empty() {
            return None;
        }
        let bounds = nodes.iter().fold(Rect::NOTHING, |acc, node| {
            acc.union(&Rect::from_circle(node.position, node.radius))
        });
        let finite = bounds.min.is_finite() && bounds.max.is_finite();
        (finite && bounds.is_valid()).then_some(bounds)
    }

    /// Padded bounds scaled to fit without ever zooming past `max_scale`,
    /// translated so the bounds center lands on the viewport center.
    ///
    /// Returns `None` for an empty graph, a degenerate viewport, or bounds
    /// that are not finite.
    pub fn fit(
        nodes: &[GraphNode],
        viewport: Vec2,
        settings: &FitSettings,
    ) -> Option<ViewTransform> {
        let bounds = Self::content_bounds(nodes)?;
        Self::fit_bounds(bounds, viewport, settings)
    }

    pub fn fit_bounds(
        bounds: Rect,
        viewport: Vec2,
        settings: &FitSettings,
    ) -> Option<ViewTransform> {
        if !viewport.is_finite() || viewport.x <= 0.0 || viewport.y <= 0.0 {
            tracing::debug!("Skipping viewport fit for {}x{} viewport", viewport.x, viewport.y);
            return None;
        }

        let padded = bounds.expand(settings.padding);
        let (width, height) = (padded.width(), padded.height());
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return None;
        }

        let scale = (viewport.x / width)
            .min(viewport.y / height)
            .min(settings.max_scale);
        let center = padded.center();
        let transform = ViewTransform::new(
            Vec2::new(
                viewport.x / 2.0 - center.x * scale,
                viewport.y / 2.0 - center.y * scale,
            ),
            scale,
        );
        transform.is_finite().then_some(transform)
    }
}
