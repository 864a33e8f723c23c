use crate::scheduler::{ScheduledTask, TaskId};
use crate::session::CanvasState;
use grove_core::NodeId;
use grove_events::{Event, TooltipInfo};
use grove_graph::{
    GraphNode, HitTester, TooltipPlacement, TooltipPositioner, Vec2, get_heat_style, voice_color,
    wrap_text,
};
use std::time::Duration;

// Rough metrics of the info panel, used to keep its bottom edge on screen.
const PANEL_CHROME_HEIGHT: f32 = 70.0;
const PANEL_H_PADDING: f32 = 32.0;
const PANEL_CHAR_WIDTH: f32 = 7.0;
const PANEL_LINE_HEIGHT: f32 = 20.0;

/// The info panel currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipState {
    pub info: TooltipInfo,
    pub anchor: Vec2,
    pub placement: TooltipPlacement,
}

/// Translates pointer input into engine pins, visibility transitions and
/// tooltip updates. All session state it touches is borrowed from
/// [`CanvasState`].
#[derive(Debug, Default)]
pub struct InteractionController {
    hovered: Option<NodeId>,
    tooltip: Option<TooltipState>,
    dismiss_task: Option<TaskId>,
    dragging: Option<NodeId>,
    positioner: TooltipPositioner,
    hit_tester: HitTester,
}

impl InteractionController {
    pub fn new(positioner: TooltipPositioner) -> Self {
        Self {
            positioner,
            ..Self::default()
        }
    }

    pub fn hovered(&self) -> Option<&NodeId> {
        self.hovered.as_ref()
    }

    pub fn tooltip(&self) -> Option<&TooltipState> {
        self.tooltip.as_ref()
    }

    pub fn dragging(&self) -> Option<&NodeId> {
        self.dragging.as_ref()
    }

    /// Top-most node under a screen-space point.
    pub fn node_at(&self, state: &CanvasState, screen: Vec2) -> Option<NodeId> {
        let world = state.camera.screen_to_world(screen);
        self.hit_tester.hit_test_node(state.engine.model(), world)
    }

    /// Hit test the pointer and turn the result into enter/move/leave.
    pub fn pointer_moved(&mut self, state: &mut CanvasState, screen: Vec2, now: Duration) {
        let hit = self.node_at(state, screen);
        match (self.hovered.clone(), hit) {
            (Some(current), Some(hit)) if current == hit => self.hover_move(state, screen),
            (Some(_), Some(hit)) => {
                self.hover_leave(state, now);
                self.hover_enter(state, &hit, screen, now);
            }
            (None, Some(hit)) => self.hover_enter(state, &hit, screen, now),
            (Some(_), None) => self.hover_leave(state, now),
            (None, None) => {}
        }
    }

    pub fn hover_enter(
        &mut self,
        state: &mut CanvasState,
        id: &NodeId,
        pointer: Vec2,
        now: Duration,
    ) {
        if let Some(task) = self.dismiss_task.take() {
            state.scheduler.cancel(task);
        }
        let Some(node) = state.engine.model().get_node(id) else {
            tracing::debug!("Hover on unknown thought {}", id);
            return;
        };

        if let Some(previous) = self.hovered.replace(id.clone())
            && &previous != id
        {
            state.visibility.set_hovered(&previous, false, now);
        }
        state.boundary.hover_changed(Some(id));

        let revealed = state.visibility.transition(
            state.engine.model(),
            id,
            state.boundary.as_ref(),
            now,
        );
        state.visibility.set_hovered(id, true, now);

        let info = tooltip_info(state, node);
        self.show_tooltip(state, info, pointer);

        if revealed {
            state.publish_unseen_count();
        }
    }

    pub fn hover_move(&mut self, state: &mut CanvasState, pointer: Vec2) {
        if let Some(info) = self.tooltip.as_ref().map(|t| t.info.clone()) {
            self.show_tooltip(state, info, pointer);
        }
    }

    /// Report the pointer leaving and give the tooltip a short grace period
    /// before it goes away.
    pub fn hover_leave(&mut self, state: &mut CanvasState, now: Duration) {
        let Some(previous) = self.hovered.take() else {
            return;
        };
        state.visibility.set_hovered(&previous, false, now);
        state.boundary.hover_changed(None);

        if let Some(task) = self.dismiss_task.take() {
            state.scheduler.cancel(task);
        }
        let grace = Duration::from_millis(state.settings.timing.tooltip_grace_ms);
        self.dismiss_task = Some(
            state
                .scheduler
                .schedule(now + grace, ScheduledTask::DismissTooltip),
        );
    }

    /// Called by the session when a dismissal task comes due.
    pub fn dismiss_due(&mut self, state: &mut CanvasState, task: TaskId) {
        if self.dismiss_task != Some(task) {
            return;
        }
        self.dismiss_task = None;
        if self.tooltip.take().is_some() {
            state.publish(Event::TooltipHide);
        }
    }

    pub fn drag_start(&mut self, state: &mut CanvasState, id: &NodeId, pointer: Vec2) -> bool {
        let world = state.camera.screen_to_world(pointer);
        if !state.engine.drag_start(id, world) {
            return false;
        }
        state.cancel_fit();
        self.dragging = Some(id.clone());
        true
    }

    pub fn drag_move(&mut self, state: &mut CanvasState, pointer: Vec2) {
        if let Some(id) = &self.dragging {
            let world = state.camera.screen_to_world(pointer);
            state.engine.drag_move(id, world);
        }
    }

    pub fn drag_end(&mut self, state: &mut CanvasState) {
        if let Some(id) = self.dragging.take() {
            state.engine.drag_end(&id);
        }
    }

    /// Forget all pointer state, e.g. when the snapshot is replaced.
    pub fn reset(&mut self, state: &mut CanvasState) {
        if let Some(task) = self.dismiss_task.take() {
            state.scheduler.cancel(task);
        }
        self.hovered = None;
        self.dragging = None;
        if self.tooltip.take().is_some() {
            state.publish(Event::TooltipHide);
        }
    }

    fn show_tooltip(&mut self, state: &CanvasState, info: TooltipInfo, pointer: Vec2) {
        let height = estimate_panel_height(&info, state.settings.tooltip.width);
        let placement = self
            .positioner
            .place(pointer, state.camera.viewport(), height);
        state.publish(Event::TooltipShow {
            info: info.clone(),
            x: placement.left,
            y: placement.top,
        });
        self.tooltip = Some(TooltipState {
            info,
            anchor: pointer,
            placement,
        });
    }
}

fn tooltip_info(state: &CanvasState, node: &GraphNode) -> TooltipInfo {
    TooltipInfo {
        node_id: node.id.clone(),
        title: node.label.clone(),
        description: node.prose.clone(),
        byline: node.by.byline(&state.voices),
        accent: get_heat_style(node.heat).color.to_css(),
        byline_color: voice_color(&node.by, &state.voices).map(|color| color.to_css()),
    }
}

fn estimate_panel_height(info: &TooltipInfo, width: f32) -> f32 {
    let chars = ((width - PANEL_H_PADDING) / PANEL_CHAR_WIDTH).max(1.0) as usize;
    let lines = wrap_text(&info.description, chars).len();
    PANEL_CHROME_HEIGHT + lines as f32 * PANEL_LINE_HEIGHT
}
