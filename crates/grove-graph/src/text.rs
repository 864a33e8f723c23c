use crate::style::{HeatStyle, get_heat_style};
use grove_core::Heat;
use serde::Serialize;

const LABEL_LINE_HEIGHT: f32 = 1.3;
const PROSE_LINE_HEIGHT: f32 = 1.45;
const LABEL_PROSE_GAP: f32 = 6.0;
/// Baseline shift so text is visually centred on its line.
const BASELINE_SHIFT: f32 = 0.35;
const ELLIPSIS: char = '\u{2026}';

/// Greedy word wrap on spaces. Widths are counted in chars; a word longer
/// than `max_chars` gets a line of its own rather than being split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0usize;

    for word in text.split(' ') {
        let word_len = word.chars().count();
        if line_len + word_len + 1 > max_chars && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
            line_len = word_len;
        } else if line.is_empty() {
            line.push_str(word);
            line_len = word_len;
        } else {
            line.push(' ');
            line.push_str(word);
            line_len += word_len + 1;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// One line of text with its vertical offset from the node center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    pub text: String,
    pub y: f32,
}

/// Label and prose lines of a node, stacked and centred vertically inside
/// its circle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeTextLayout {
    pub label: Vec<TextLine>,
    pub prose: Vec<TextLine>,
    /// Prose had more lines than the tier allows.
    pub truncated: bool,
}

impl NodeTextLayout {
    pub fn new(label: &str, prose: &str, heat: Heat) -> Self {
        Self::with_style(label, prose, get_heat_style(heat))
    }

    pub fn with_style(label: &str, prose: &str, style: &HeatStyle) -> Self {
        let label_lines = wrap_text(label, style.chars_per_line);
        let mut prose_lines = wrap_text(prose, style.chars_per_line + 2);
        let truncated = prose_lines.len() > style.prose_lines;
        prose_lines.truncate(style.prose_lines);

        let label_lh = style.label_size * LABEL_LINE_HEIGHT;
        let prose_lh = style.prose_size * PROSE_LINE_HEIGHT;
        let label_height = label_lines.len() as f32 * label_lh;
        let prose_height = prose_lines.len() as f32 * prose_lh;
        let start_y = -(label_height + LABEL_PROSE_GAP + prose_height) / 2.0;

        let label = label_lines
            .into_iter()
            .enumerate()
            .map(|(i, text)| TextLine {
                text,
                y: start_y + i as f32 * label_lh + style.label_size * BASELINE_SHIFT,
            })
            .collect();

        let prose_start = start_y + label_height + LABEL_PROSE_GAP;
        let last = prose_lines.len().saturating_sub(1);
        let prose = prose_lines
            .into_iter()
            .enumerate()
            .map(|(i, text)| TextLine {
                text: if truncated && i == last {
                    ellipsize(&text)
                } else {
                    text
                },
                y: prose_start + i as f32 * prose_lh + style.prose_size * BASELINE_SHIFT,
            })
            .collect();

        Self {
            label,
            prose,
            truncated,
        }
    }
}

/// Replace the last three chars with an ellipsis.
fn ellipsize(line: &str) -> String {
    let keep = line.chars().count().saturating_sub(3);
    let mut out: String = line.chars().take(keep).collect();
    out.push(ELLIPSIS);
    out
}
