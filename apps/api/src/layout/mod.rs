// Text layout for the cover-letter PDF: metrics, encoding and line breaking.
// Pure and CPU-bound; callers in async context go through spawn_blocking.

pub mod font_metrics;

pub use font_metrics::{a4_letter_layout, encode_str, PageLayout};

/// Breaks `text` into printed lines that fit `layout.text_width_pt()`.
///
/// Each `\n` ends a paragraph; blank input lines come back as empty strings so
/// the renderer keeps the vertical space. Paragraphs are greedy word-wrapped and
/// a word wider than a whole line is split between characters.
pub fn wrap_text(text: &str, layout: &PageLayout) -> Vec<String> {
    let max_width = layout.text_width_pt();
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }

        let space_w = layout.measure_str(" ");
        let mut current = String::new();
        let mut current_w = 0.0_f32;

        for word in words {
            let word_w = layout.measure_str(word);

            if !current.is_empty() && current_w + space_w + word_w <= max_width {
                current.push(' ');
                current.push_str(word);
                current_w += space_w + word_w;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_w = 0.0;
            }

            if word_w <= max_width {
                current.push_str(word);
                current_w = word_w;
            } else {
                // Over-long token (URL, hash): hard-break by character
                for c in word.chars() {
                    let c_w = layout.measure_str(c.encode_utf8(&mut [0; 4]));
                    if !current.is_empty() && current_w + c_w > max_width {
                        lines.push(std::mem::take(&mut current));
                        current_w = 0.0;
                    }
                    current.push(c);
                    current_w += c_w;
                }
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}
