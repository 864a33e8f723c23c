use crate::camera::Camera;
use crate::interaction::{InteractionController, TooltipState};
use crate::scheduler::{ScheduledTask, Scheduler, TaskId};
use crate::visibility::VisibilityStateMachine;
use grove_core::{CanvasSettings, DocumentSnapshot, NodeId, VoiceRegistry};
use grove_events::{CanvasBoundary, Event};
use grove_graph::{
    ForceLayoutEngine, GraphAssembler, LinkIndex, LinkLabel, LinkStyle, NodeTextLayout,
    NodeVisual, TooltipPositioner, Vec2, ViewTransform, voice_ring,
};
use std::time::Duration;

/// Everything one mounted canvas owns.
///
/// The interaction controller borrows this mutably for the duration of an
/// input event; nothing here is global.
pub struct CanvasState {
    pub settings: CanvasSettings,
    pub engine: ForceLayoutEngine,
    pub visibility: VisibilityStateMachine,
    pub camera: Camera,
    pub scheduler: Scheduler,
    pub voices: VoiceRegistry,
    pub(crate) boundary: Box<dyn CanvasBoundary>,
    fit_task: Option<TaskId>,
}

impl CanvasState {
    pub fn new(
        settings: CanvasSettings,
        viewport: Vec2,
        boundary: Box<dyn CanvasBoundary>,
    ) -> Self {
        let settings = settings.normalized();
        Self {
            engine: ForceLayoutEngine::new(settings.layout.clone(), viewport),
            visibility: VisibilityStateMachine::new(settings.timing.clone()),
            camera: Camera::new(settings.fit.clone(), viewport),
            scheduler: Scheduler::new(),
            voices: VoiceRegistry::new(),
            boundary,
            fit_task: None,
            settings,
        }
    }

    pub fn publish(&self, event: Event) {
        self.boundary.publish(event);
    }

    pub fn unseen_count(&self) -> usize {
        self.visibility.unseen_count(self.engine.model())
    }

    pub fn publish_unseen_count(&self) {
        self.publish(Event::UnseenCountChanged {
            count: self.unseen_count(),
        });
    }

    /// Whether the post-settle viewport fit is still waiting to run.
    pub fn fit_pending(&self) -> bool {
        self.fit_task
            .is_some_and(|task| self.scheduler.is_pending(task))
    }

    /// Stop the viewport fit, whether it is still waiting or already
    /// animating.
    pub fn cancel_fit(&mut self) {
        if let Some(task) = self.fit_task.take() {
            self.scheduler.cancel(task);
        }
        if self.camera.cancel_animation() {
            tracing::debug!("Viewport fit interrupted");
        }
    }
}

/// A mounted thinking canvas driven by the host's frame loop.
///
/// Time is the host's session clock, passed to every call that can start or
/// advance an animation.
pub struct CanvasSession {
    state: CanvasState,
    controller: InteractionController,
    mounted: bool,
}

impl CanvasSession {
    pub fn new(
        settings: CanvasSettings,
        viewport: Vec2,
        boundary: Box<dyn CanvasBoundary>,
    ) -> Self {
        let state = CanvasState::new(settings, viewport, boundary);
        let positioner = TooltipPositioner::new(state.settings.tooltip.clone());
        let controller = InteractionController::new(positioner);
        Self {
            state,
            controller,
            mounted: true,
        }
    }

    pub fn with_voices(mut self, voices: VoiceRegistry) -> Self {
        self.state.voices = voices;
        self
    }

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Replace the document. The old graph, its animations and pending
    /// tasks are dropped; acknowledged ids survive.
    pub fn load_snapshot(&mut self, snapshot: &DocumentSnapshot, now: Duration) {
        if !self.mounted {
            tracing::warn!("Ignoring snapshot for unmounted canvas");
            return;
        }
        let state = &mut self.state;
        self.controller.reset(state);
        state.scheduler.clear();
        state.fit_task = None;
        state.camera.cancel_animation();
        state.visibility.cancel_animations();

        let model = GraphAssembler::from_snapshot(snapshot);
        let (node_count, link_count) = (model.node_count(), model.link_count());
        let depth = snapshot.tree.as_ref().map_or(0, |tree| tree.max_depth());
        state.engine.rebuild(model);

        if node_count > 0 {
            let settle = Duration::from_millis(state.settings.timing.settle_delay_ms);
            let generation = state.engine.generation();
            state.fit_task = Some(
                state
                    .scheduler
                    .schedule(now + settle, ScheduledTask::FitViewport { generation }),
            );
        }

        tracing::info!(
            "Snapshot loaded: {} thoughts, {} links, depth {}, {} unseen",
            node_count,
            link_count,
            depth,
            state.unseen_count()
        );
        state.publish(Event::SnapshotLoaded {
            node_count,
            link_count,
        });
        state.publish_unseen_count();
    }

    /// Advance the session to `now`: run due tasks, tick the layout once,
    /// step animations. Returns whether another frame is needed.
    pub fn frame(&mut self, now: Duration) -> bool {
        if !self.mounted {
            return false;
        }
        let state = &mut self.state;
        state.camera.update(now);

        for (task_id, task) in state.scheduler.take_due(now) {
            match task {
                ScheduledTask::DismissTooltip => self.controller.dismiss_due(state, task_id),
                ScheduledTask::FitViewport { generation } => {
                    if state.fit_task == Some(task_id) {
                        state.fit_task = None;
                    }
                    if generation != state.engine.generation() {
                        continue;
                    }
                    let duration = Duration::from_millis(state.settings.timing.fit_duration_ms);
                    state.camera.fit(state.engine.nodes(), now, duration);
                }
            }
        }

        if state.engine.tick() && !state.engine.is_running() {
            state.publish(Event::LayoutSettled {
                ticks: state.engine.ticks(),
            });
        }

        state.visibility.retire(now);

        state.engine.is_running()
            || state.camera.is_animating()
            || state.visibility.is_animating(now)
            || !state.scheduler.is_empty()
    }

    /// Stop everything. Later calls are no-ops.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        let state = &mut self.state;
        state.engine.stop();
        self.controller.reset(state);
        state.scheduler.clear();
        state.fit_task = None;
        state.camera.cancel_animation();
        state.visibility.cancel_animations();
        self.mounted = false;
        tracing::info!("Canvas unmounted");
    }

    pub fn pointer_moved(&mut self, screen: Vec2, now: Duration) {
        if self.mounted {
            self.controller.pointer_moved(&mut self.state, screen, now);
        }
    }

    pub fn hover_enter(&mut self, id: &NodeId, pointer: Vec2, now: Duration) {
        if self.mounted {
            self.controller.hover_enter(&mut self.state, id, pointer, now);
        }
    }

    pub fn hover_move(&mut self, pointer: Vec2) {
        if self.mounted {
            self.controller.hover_move(&mut self.state, pointer);
        }
    }

    pub fn hover_leave(&mut self, now: Duration) {
        if self.mounted {
            self.controller.hover_leave(&mut self.state, now);
        }
    }

    pub fn drag_start(&mut self, id: &NodeId, pointer: Vec2) -> bool {
        self.mounted && self.controller.drag_start(&mut self.state, id, pointer)
    }

    pub fn drag_move(&mut self, pointer: Vec2) {
        if self.mounted {
            self.controller.drag_move(&mut self.state, pointer);
        }
    }

    pub fn drag_end(&mut self) {
        if self.mounted {
            self.controller.drag_end(&mut self.state);
        }
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        if self.mounted {
            self.state.cancel_fit();
            self.state.camera.pan_by(delta);
        }
    }

    pub fn zoom_by(&mut self, factor: f32, anchor: Vec2) {
        if self.mounted {
            self.state.cancel_fit();
            self.state.camera.zoom_by(factor, anchor);
        }
    }

    pub fn set_repel_force(&mut self, repel_force: f32) {
        if self.mounted {
            self.state.engine.set_repel_force(repel_force);
            self.state.settings.layout.repel_force = self.state.engine.repel_force();
        }
    }

    pub fn resize(&mut self, viewport: Vec2) {
        if self.mounted {
            self.state.camera.set_viewport(viewport);
            self.state.engine.resize(viewport);
        }
    }

    pub fn node_at(&self, screen: Vec2) -> Option<NodeId> {
        self.controller.node_at(&self.state, screen)
    }

    pub fn unseen_count(&self) -> usize {
        self.state.unseen_count()
    }

    pub fn tooltip(&self) -> Option<&TooltipState> {
        self.controller.tooltip()
    }

    pub fn transform(&self) -> ViewTransform {
        self.state.camera.transform()
    }

    pub fn position(&self, id: &NodeId) -> Option<Vec2> {
        self.state.engine.position(id)
    }

    /// Paint attributes of a thought at `now`, persona ring included.
    pub fn node_visual(&self, id: &NodeId, now: Duration) -> Option<NodeVisual> {
        let node = self.state.engine.model().get_node(id)?;
        let visual = self.state.visibility.resolve_node_visual(node, now);
        Some(visual.with_ring(voice_ring(&node.by, &self.state.voices)))
    }

    pub fn link_visual(&self, link: LinkIndex, now: Duration) -> Option<LinkStyle> {
        let model = self.state.engine.model();
        (link.0 < model.link_count())
            .then(|| self.state.visibility.resolve_link_visual(model, link, now))
    }

    /// Where a cross-link's label goes at the current layout.
    pub fn link_label(&self, link: LinkIndex) -> Option<LinkLabel> {
        self.state.engine.model().link_label(link)
    }

    pub fn text_layout(&self, id: &NodeId) -> Option<NodeTextLayout> {
        let node = self.state.engine.model().get_node(id)?;
        Some(NodeTextLayout::new(&node.label, &node.prose, node.heat))
    }
}
