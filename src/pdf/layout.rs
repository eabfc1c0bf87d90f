use pdf_writer::{Content, Name, Str};

use crate::fonts::{Face, to_winansi_bytes};

/// Break `text` into lines no wider than `width`. Explicit `\n` always starts
/// a new line; a single word wider than `width` gets a line of its own.
pub(super) fn wrap_text(text: &str, face: Face, font_size: f32, width: f32) -> Vec<String> {
    let space_w = face.text_width(" ", font_size);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_w = 0.0f32;
        for word in paragraph.split_whitespace() {
            let word_w = face.text_width(word, font_size);
            if !line.is_empty() && line_w + space_w + word_w > width {
                lines.push(std::mem::take(&mut line));
                line_w = 0.0;
            }
            if !line.is_empty() {
                line.push(' ');
                line_w += space_w;
            }
            line.push_str(word);
            line_w += word_w;
        }
        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Widest unbreakable word in `text`.
pub(super) fn longest_word_width(text: &str, face: Face, font_size: f32) -> f32 {
    text.split_whitespace()
        .map(|w| face.text_width(w, font_size))
        .fold(0.0f32, f32::max)
}

/// Show one line of text with its baseline at `baseline_y` (PDF user space,
/// origin bottom-left).
pub(super) fn draw_line(
    content: &mut Content,
    text: &str,
    face: Face,
    font_size: f32,
    x: f32,
    baseline_y: f32,
    color: Option<[u8; 3]>,
) {
    if text.is_empty() {
        return;
    }
    if let Some([r, g, b]) = color {
        content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    }
    content
        .begin_text()
        .set_font(Name(face.pdf_name().as_bytes()), font_size)
        .next_line(x, baseline_y)
        .show(Str(&to_winansi_bytes(text)))
        .end_text();
    if color.is_some() {
        content.set_fill_gray(0.0);
    }
}
