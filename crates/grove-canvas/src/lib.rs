//! Session layer of the thinking canvas: timers, tweens, the seen/unseen
//! state machine, camera and pointer interaction, tied together by
//! [`CanvasSession`].

pub mod camera;
pub mod interaction;
pub mod scheduler;
pub mod session;
pub mod tween;
pub mod visibility;

pub use camera::Camera;
pub use interaction::{InteractionController, TooltipState};
pub use scheduler::{ScheduledTask, Scheduler, TaskId};
pub use session::{CanvasSession, CanvasState};
pub use tween::{Easing, Interpolate, Tween};
pub use visibility::{Visibility, VisibilityState, VisibilityStateMachine};
