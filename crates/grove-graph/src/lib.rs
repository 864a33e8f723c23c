pub mod assemble;
pub mod flatten;
pub mod geometry;
pub mod graph;
pub mod hit_tester;
pub mod layout;
pub mod style;
pub mod text;
pub mod tooltip;
pub mod viewport;

pub use assemble::GraphAssembler;
pub use flatten::{Flattened, TreeFlattener};
pub use geometry::{Rect, Vec2};
pub use graph::{GraphLink, GraphModel, GraphNode, LinkIndex, LinkKind, LinkLabel, NodeIndex};
pub use hit_tester::HitTester;
pub use layout::ForceLayoutEngine;
pub use style::{
    CROSS_LABEL_COLOR, CROSS_LINK_STYLE, Color, HOVER_STROKE_BOOST, HeatStyle, LinkStyle,
    NodeVisual, TREE_LINK_STYLE, UNSEEN_STYLE, UNSEEN_TREE_LINK_STYLE, UnseenStyle,
    VOICE_RING_INSET, VOICE_RING_WIDTH, get_heat_style, radius_for, unseen_glow, voice_color,
    voice_ring,
};
pub use text::{NodeTextLayout, TextLine, wrap_text};
pub use tooltip::{TooltipPlacement, TooltipPositioner};
pub use viewport::{ViewTransform, ViewportFitter};
