use crate::tween::{Easing, Tween};
use grove_core::FitSettings;
use grove_graph::{GraphNode, Vec2, ViewTransform, ViewportFitter};
use std::time::Duration;

/// Pan/zoom state of the canvas, with an optional animated transition
/// towards a fitted transform.
#[derive(Debug)]
pub struct Camera {
    transform: ViewTransform,
    viewport: Vec2,
    settings: FitSettings,
    animation: Option<Tween<ViewTransform>>,
}

impl Camera {
    pub fn new(settings: FitSettings, viewport: Vec2) -> Self {
        Self {
            transform: ViewTransform::IDENTITY,
            viewport,
            settings,
            animation: None,
        }
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Start an animated fit of the given nodes. Returns false, leaving the
    /// camera untouched, when there is nothing sensible to fit.
    pub fn fit(&mut self, nodes: &[GraphNode], now: Duration, duration: Duration) -> bool {
        let Some(target) = ViewportFitter::fit(nodes, self.viewport, &self.settings) else {
            tracing::debug!("Viewport fit skipped");
            return false;
        };
        tracing::debug!(
            "Fitting viewport: scale {:.3}, translate ({:.1}, {:.1})",
            target.scale,
            target.translate.x,
            target.translate.y
        );
        self.animation = Some(Tween::new(
            self.transform,
            target,
            now,
            duration,
            Easing::CubicOut,
        ));
        true
    }

    /// Advance the running animation, if any.
    pub fn update(&mut self, now: Duration) {
        let Some(tween) = &self.animation else {
            return;
        };
        self.transform = tween.value(now);
        if tween.is_finished(now) {
            self.animation = None;
        }
    }

    /// Stop animating and stay at the last applied transform.
    pub fn cancel_animation(&mut self) -> bool {
        self.animation.take().is_some()
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.cancel_animation();
        self.transform = self.transform.pan(delta);
    }

    pub fn zoom_by(&mut self, factor: f32, anchor: Vec2) {
        self.cancel_animation();
        self.transform = self.transform.zoom_about(
            factor,
            anchor,
            self.settings.min_zoom,
            self.settings.max_zoom,
        );
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        self.transform.screen_to_world(screen)
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        self.transform.world_to_screen(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove_core::{Heat, ThinkingNode};
    use grove_graph::GraphAssembler;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn nodes() -> Vec<GraphNode> {
        let root = ThinkingNode::new("r", "").with_heat(Heat::Hot);
        GraphAssembler::from_tree(Some(&root), &[]).nodes().to_vec()
    }

    #[test]
    fn test_fit_animates_to_target() {
        let mut camera = Camera::new(FitSettings::default(), Vec2::new(800.0, 600.0));
        assert!(camera.fit(&nodes(), ms(0), ms(900)));
        assert!(camera.is_animating());

        camera.update(ms(450));
        assert!(camera.is_animating());
        camera.update(ms(900));
        assert!(!camera.is_animating());

        // Single node at the origin ends up centred at 1:1.
        assert_eq!(camera.transform().scale, 1.0);
        assert_eq!(camera.world_to_screen(Vec2::ZERO), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_zero_viewport_fit_is_no_op() {
        let mut camera = Camera::new(FitSettings::default(), Vec2::ZERO);
        assert!(!camera.fit(&nodes(), ms(0), ms(900)));
        assert!(!camera.is_animating());
        assert_eq!(camera.transform(), ViewTransform::IDENTITY);
    }

    #[test]
    fn test_user_zoom_cancels_fit_and_clamps() {
        let mut camera = Camera::new(FitSettings::default(), Vec2::new(800.0, 600.0));
        camera.fit(&nodes(), ms(0), ms(900));
        camera.update(ms(100));
        let mid = camera.transform();

        camera.zoom_by(100.0, Vec2::new(10.0, 10.0));
        assert!(!camera.is_animating());
        assert_eq!(camera.transform().scale, 5.0);

        camera.update(ms(900));
        assert_ne!(camera.transform(), mid);
        assert_eq!(camera.transform().scale, 5.0);
    }

    #[test]
    fn test_pan_cancels_fit() {
        let mut camera = Camera::new(FitSettings::default(), Vec2::new(800.0, 600.0));
        camera.fit(&nodes(), ms(0), ms(900));
        camera.pan_by(Vec2::new(5.0, -5.0));
        assert!(!camera.is_animating());
        assert_eq!(camera.transform().translate, Vec2::new(5.0, -5.0));
    }
}
