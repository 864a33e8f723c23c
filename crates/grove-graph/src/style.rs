//! Canvas Style System
//!
//! Per-heat palettes, the "unseen" palette used until a thought has been
//! acknowledged, and link styles. Node radius is part of the heat table and
//! never changes for a node within one snapshot.

use grove_core::{Authorship, Heat, VoiceRegistry};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::time::Duration;

/// RGBA color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(raw: &str) -> Option<Self> {
        let hex = raw.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut it = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
                Some(Color::rgb(it.next()??, it.next()??, it.next()??))
            }
            6 => Some(Color::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Some(Color::rgba(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("rgb({},{},{})", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({},{},{},{:.2})",
                self.r,
                self.g,
                self.b,
                self.a as f32 / 255.0
            )
        }
    }

    /// Channel-wise linear interpolation, `t` clamped to `[0, 1]`.
    pub fn lerp(&self, to: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color {
            r: mix(self.r, to.r),
            g: mix(self.g, to.g),
            b: mix(self.b, to.b),
            a: mix(self.a, to.a),
        }
    }

    /// Interpolate towards a possibly transparent color without flashing
    /// black: the rgb of a fully transparent endpoint is taken from the other.
    pub fn fade(&self, to: Color, t: f32) -> Color {
        if t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return to;
        }
        let from = if self.a == 0 { to.with_alpha(0) } else { *self };
        let to = if to.a == 0 { self.with_alpha(0) } else { to };
        from.lerp(to, t)
    }

    pub fn with_alpha(&self, a: u8) -> Color {
        Color { a, ..*self }
    }
}

/// Visual configuration of one heat tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatStyle {
    pub base_radius: f32,
    pub color: Color,
    pub fg: Color,
    pub fg_muted: Color,
    pub fill: Color,
    /// Transparent for tiers that do not glow.
    pub glow: Color,
    pub glow_blur: f32,
    pub stroke_width: f32,
    pub label_size: f32,
    pub prose_size: f32,
    pub prose_lines: usize,
    pub label_weight: u16,
    pub chars_per_line: usize,
}

pub const HOT_STYLE: HeatStyle = HeatStyle {
    base_radius: 100.0,
    color: Color::rgb(232, 100, 44),
    fg: Color::rgb(255, 248, 240),
    fg_muted: Color::rgba(255, 248, 240, 179),
    fill: Color::rgba(232, 100, 44, 26),
    glow: Color::rgba(232, 100, 44, 77),
    glow_blur: 12.0,
    stroke_width: 2.0,
    label_size: 15.0,
    prose_size: 11.5,
    prose_lines: 4,
    label_weight: 700,
    chars_per_line: 22,
};

pub const WARM_STYLE: HeatStyle = HeatStyle {
    base_radius: 78.0,
    color: Color::rgb(214, 166, 72),
    fg: Color::rgb(240, 232, 218),
    fg_muted: Color::rgba(240, 232, 218, 153),
    fill: Color::rgba(214, 166, 72, 18),
    glow: Color::rgba(214, 166, 72, 51),
    glow_blur: 7.0,
    stroke_width: 1.5,
    label_size: 13.0,
    prose_size: 10.5,
    prose_lines: 3,
    label_weight: 600,
    chars_per_line: 18,
};

pub const GROWING_STYLE: HeatStyle = HeatStyle {
    base_radius: 60.0,
    color: Color::rgb(120, 180, 120),
    fg: Color::rgb(220, 232, 220),
    fg_muted: Color::rgba(220, 232, 220, 140),
    fill: Color::rgba(120, 180, 120, 15),
    glow: Color::rgba(120, 180, 120, 38),
    glow_blur: 7.0,
    stroke_width: 1.5,
    label_size: 12.0,
    prose_size: 9.5,
    prose_lines: 2,
    label_weight: 600,
    chars_per_line: 16,
};

pub const QUIET_STYLE: HeatStyle = HeatStyle {
    base_radius: 46.0,
    color: Color::rgb(112, 110, 102),
    fg: Color::rgb(160, 158, 150),
    fg_muted: Color::rgba(160, 158, 152, 128),
    fill: Color::rgba(70, 70, 68, 15),
    glow: Color::TRANSPARENT,
    glow_blur: 0.0,
    stroke_width: 1.5,
    label_size: 11.0,
    prose_size: 9.0,
    prose_lines: 1,
    label_weight: 500,
    chars_per_line: 13,
};

/// Palette of a thought nobody has looked at yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnseenStyle {
    pub color: Color,
    pub fg: Color,
    pub fg_muted: Color,
    pub fill: Color,
    pub glow: Color,
    pub glow_blur: f32,
    pub stroke_width: f32,
}

pub const UNSEEN_STYLE: UnseenStyle = UnseenStyle {
    color: Color::rgb(79, 196, 207),
    fg: Color::rgb(228, 251, 253),
    fg_muted: Color::rgba(228, 251, 253, 166),
    fill: Color::rgba(79, 196, 207, 23),
    glow: Color::rgba(79, 196, 207, 89),
    glow_blur: 14.0,
    stroke_width: 2.5,
};

/// Extra stroke width while the pointer rests on a node.
pub const HOVER_STROKE_BOOST: f32 = 1.5;

// The unseen glow breathes between these opacities.
const UNSEEN_PULSE_PERIOD_MS: u64 = 3_000;
const UNSEEN_PULSE_MIN: f32 = 0.35;
const UNSEEN_PULSE_MAX: f32 = 0.55;

/// Glow of an unseen node `elapsed` into the session.
///
/// Starts at the dimmest point, peaks half way through the 3 s cycle.
pub fn unseen_glow(elapsed: Duration) -> Color {
    let phase = (elapsed.as_millis() % UNSEEN_PULSE_PERIOD_MS as u128) as f32
        / UNSEEN_PULSE_PERIOD_MS as f32;
    let swing = (1.0 - (phase * TAU).cos()) / 2.0;
    let opacity = UNSEEN_PULSE_MIN + (UNSEEN_PULSE_MAX - UNSEEN_PULSE_MIN) * swing;
    UNSEEN_STYLE
        .glow
        .with_alpha((opacity * 255.0).round() as u8)
}

/// Distance between a node's outline and the persona ring inside it.
pub const VOICE_RING_INSET: f32 = 4.0;
pub const VOICE_RING_WIDTH: f32 = 1.5;
const VOICE_RING_OPACITY: f32 = 0.8;

/// Color of the persona behind a voice-authored thought, if the registry
/// knows one and it parses.
pub fn voice_color(by: &Authorship, voices: &VoiceRegistry) -> Option<Color> {
    let voice = by.voice()?;
    let raw = voices.color(voice)?;
    let color = Color::from_hex(raw);
    if color.is_none() {
        tracing::debug!("Ignoring unparsable color {:?} of voice {}", raw, voice);
    }
    color
}

/// Stroke color of the persona ring drawn `VOICE_RING_INSET` inside a
/// voice-authored node.
pub fn voice_ring(by: &Authorship, voices: &VoiceRegistry) -> Option<Color> {
    voice_color(by, voices)
        .map(|color| color.with_alpha((VOICE_RING_OPACITY * 255.0).round() as u8))
}

/// Link color and style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkStyle {
    pub color: Color,
    pub width: f32,
    pub dashed: bool,
    pub opacity: f32,
}

pub const TREE_LINK_STYLE: LinkStyle = LinkStyle {
    color: Color::rgb(100, 98, 90),
    width: 1.5,
    dashed: true,
    opacity: 0.6,
};

pub const UNSEEN_TREE_LINK_STYLE: LinkStyle = LinkStyle {
    color: Color::rgba(79, 196, 207, 77),
    width: 1.8,
    dashed: true,
    opacity: 0.6,
};

pub const CROSS_LINK_STYLE: LinkStyle = LinkStyle {
    color: Color::rgba(180, 160, 220, 128),
    width: 1.5,
    dashed: false,
    opacity: 0.7,
};

pub const CROSS_LABEL_COLOR: Color = Color::rgba(180, 160, 220, 179);
/// Cross-link labels sit this far above the link midpoint.
pub const CROSS_LABEL_LIFT: f32 = 4.0;

pub fn get_heat_style(heat: Heat) -> &'static HeatStyle {
    match heat {
        Heat::Hot => &HOT_STYLE,
        Heat::Warm => &WARM_STYLE,
        Heat::Growing => &GROWING_STYLE,
        Heat::Quiet => &QUIET_STYLE,
    }
}

pub fn radius_for(heat: Heat) -> f32 {
    get_heat_style(heat).base_radius
}

/// Fully resolved paint attributes of a node at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeVisual {
    pub stroke: Color,
    pub stroke_width: f32,
    pub fill: Color,
    pub glow: Color,
    pub glow_blur: f32,
    pub fg: Color,
    pub fg_muted: Color,
    /// Persona ring of voice-authored thoughts.
    pub ring: Option<Color>,
}

impl NodeVisual {
    pub fn steady(heat: Heat) -> Self {
        let style = get_heat_style(heat);
        Self {
            stroke: style.color,
            stroke_width: style.stroke_width,
            fill: style.fill,
            glow: style.glow,
            glow_blur: style.glow_blur,
            fg: style.fg,
            fg_muted: style.fg_muted,
            ring: None,
        }
    }

    /// The unseen palette is shared by every tier.
    pub fn unseen(_heat: Heat) -> Self {
        Self {
            stroke: UNSEEN_STYLE.color,
            stroke_width: UNSEEN_STYLE.stroke_width,
            fill: UNSEEN_STYLE.fill,
            glow: UNSEEN_STYLE.glow,
            glow_blur: UNSEEN_STYLE.glow_blur,
            fg: UNSEEN_STYLE.fg,
            fg_muted: UNSEEN_STYLE.fg_muted,
            ring: None,
        }
    }

    pub fn with_stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn with_glow(mut self, glow: Color) -> Self {
        self.glow = glow;
        self
    }

    pub fn with_ring(mut self, ring: Option<Color>) -> Self {
        self.ring = ring;
        self
    }

    pub fn lerp(&self, to: &NodeVisual, t: f32) -> NodeVisual {
        if t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return *to;
        }
        NodeVisual {
            stroke: self.stroke.lerp(to.stroke, t),
            stroke_width: self.stroke_width + (to.stroke_width - self.stroke_width) * t,
            fill: self.fill.fade(to.fill, t),
            glow: self.glow.fade(to.glow, t),
            glow_blur: self.glow_blur + (to.glow_blur - self.glow_blur) * t,
            fg: self.fg.lerp(to.fg, t),
            fg_muted: self.fg_muted.lerp(to.fg_muted, t),
            ring: self.ring.or(to.ring),
        }
    }
}

impl LinkStyle {
    pub fn lerp(&self, to: &LinkStyle, t: f32) -> LinkStyle {
        if t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return *to;
        }
        LinkStyle {
            color: self.color.lerp(to.color, t),
            width: self.width + (to.width - self.width) * t,
            dashed: self.dashed,
            opacity: self.opacity + (to.opacity - self.opacity) * t,
        }
    }
}
