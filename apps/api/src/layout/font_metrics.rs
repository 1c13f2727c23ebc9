//! Helvetica metrics and WinAnsi encoding for the cover-letter PDF.
//!
//! The renderer uses the standard Helvetica face with `WinAnsiEncoding`, which
//! every PDF viewer ships. The encoding covers ASCII, Latin-1 (all French
//! accented letters, «guillemets») and the typographic punctuation models like
//! to emit (’ “ ” – — … €). Widths are the Adobe AFM advance widths in 1/1000 em.

/// Byte substituted for characters the encoding cannot represent.
pub const REPLACEMENT_BYTE: u8 = b'?';

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

const MM_TO_PT: f32 = 72.0 / 25.4;

/// Page geometry for a cover letter. All values in PDF points.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    pub margin_left_pt: f32,
    pub margin_right_pt: f32,
    pub margin_top_pt: f32,
    /// Content stops this far above the bottom edge; the next line starts a new page.
    pub margin_bottom_pt: f32,
    pub font_size_pt: f32,
    pub line_height_pt: f32,
}

/// A4 portrait, 25 mm side margins, 10 mm top, 20 mm page-break margin,
/// 11 pt text on 6 mm lines.
pub fn a4_letter_layout() -> PageLayout {
    PageLayout {
        page_width_pt: 595.28,
        page_height_pt: 841.89,
        margin_left_pt: 25.0 * MM_TO_PT,
        margin_right_pt: 25.0 * MM_TO_PT,
        margin_top_pt: 10.0 * MM_TO_PT,
        margin_bottom_pt: 20.0 * MM_TO_PT,
        font_size_pt: 11.0,
        line_height_pt: 6.0 * MM_TO_PT,
    }
}

impl PageLayout {
    /// Usable line width between the side margins.
    pub fn text_width_pt(&self) -> f32 {
        self.page_width_pt - self.margin_left_pt - self.margin_right_pt
    }

    /// Number of text lines that fit on one page.
    pub fn lines_per_page(&self) -> usize {
        let usable = self.page_height_pt - self.margin_top_pt - self.margin_bottom_pt;
        ((usable / self.line_height_pt).floor() as usize).max(1)
    }

    /// Rendered width of `s` in points at this layout's font size.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(char_width).sum::<u32>() as f32 * self.font_size_pt / 1000.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Encoding
// ────────────────────────────────────────────────────────────────────────────

/// Maps a character to its WinAnsi byte, if the encoding has one.
pub fn encode_char(c: char) -> Option<u8> {
    let code = c as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => match c {
            '\t' => Some(b' '),
            // Narrow no-break space, French typography before ; : ! ?
            '\u{202F}' => Some(0xA0),
            '\u{2011}' => Some(b'-'),
            '€' => Some(0x80),
            '‚' => Some(0x82),
            'ƒ' => Some(0x83),
            '„' => Some(0x84),
            '…' => Some(0x85),
            '†' => Some(0x86),
            '‡' => Some(0x87),
            'ˆ' => Some(0x88),
            '‰' => Some(0x89),
            'Š' => Some(0x8A),
            '‹' => Some(0x8B),
            'Œ' => Some(0x8C),
            'Ž' => Some(0x8E),
            '‘' => Some(0x91),
            '’' => Some(0x92),
            '“' => Some(0x93),
            '”' => Some(0x94),
            '•' => Some(0x95),
            '–' => Some(0x96),
            '—' => Some(0x97),
            '˜' => Some(0x98),
            '™' => Some(0x99),
            'š' => Some(0x9A),
            '›' => Some(0x9B),
            'œ' => Some(0x9C),
            'ž' => Some(0x9E),
            'Ÿ' => Some(0x9F),
            _ => None,
        },
    }
}

/// Encodes a line of text, replacing unsupported characters with `?`.
pub fn encode_str(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| encode_char(c).unwrap_or(REPLACEMENT_BYTE))
        .collect()
}

/// Advance width of `c` in 1/1000 em, as it will be rendered.
pub fn char_width(c: char) -> u32 {
    let byte = encode_char(c).unwrap_or(REPLACEMENT_BYTE);
    u32::from(HELVETICA_WIDTHS[(byte - 32) as usize])
}

// ────────────────────────────────────────────────────────────────────────────
// Static width table  (WinAnsi bytes 0x20..=0xFF)
// ────────────────────────────────────────────────────────────────────────────

/// Helvetica advance widths. Index = byte - 0x20. Zero entries are bytes the
/// encoding leaves undefined; `encode_char` never produces them.
#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 224] = [
     278,  278,  355,  556,  556,  889,  667,  191,  333,  333,  389,  584,  278,  333,  278,  278, // 0x20
     556,  556,  556,  556,  556,  556,  556,  556,  556,  556,  278,  278,  584,  584,  584,  556, // 0x30
    1015,  667,  667,  722,  722,  667,  611,  778,  722,  278,  500,  667,  556,  833,  722,  778, // 0x40
     667,  778,  722,  667,  611,  722,  667,  944,  667,  667,  611,  278,  278,  278,  469,  556, // 0x50
     333,  556,  556,  500,  556,  556,  278,  556,  556,  222,  222,  500,  222,  833,  556,  556, // 0x60
     556,  556,  333,  500,  278,  556,  500,  722,  500,  500,  500,  334,  260,  334,  584,    0, // 0x70
     556,    0,  222,  556,  333, 1000,  556,  556,  333, 1000,  667,  333, 1000,    0,  611,    0, // 0x80
       0,  222,  222,  333,  333,  350,  556, 1000,  333, 1000,  500,  333,  944,    0,  500,  667, // 0x90
     278,  333,  556,  556,  556,  556,  260,  556,  333,  737,  370,  556,  584,  333,  737,  333, // 0xA0
     400,  584,  333,  333,  333,  556,  537,  278,  333,  333,  365,  556,  834,  834,  834,  611, // 0xB0
     667,  667,  667,  667,  667,  667, 1000,  722,  667,  667,  667,  667,  278,  278,  278,  278, // 0xC0
     722,  722,  778,  778,  778,  778,  778,  584,  778,  722,  722,  722,  722,  667,  667,  611, // 0xD0
     556,  556,  556,  556,  556,  556,  889,  500,  556,  556,  556,  556,  278,  278,  278,  278, // 0xE0
     556,  556,  556,  556,  556,  556,  556,  584,  611,  556,  556,  556,  556,  500,  556,  500, // 0xF0
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_maps_to_itself() {
        assert_eq!(encode_str("Dear Hiring Manager,"), b"Dear Hiring Manager,".to_vec());
    }

    #[test]
    fn test_french_accents_are_latin1() {
        assert_eq!(encode_char('é'), Some(0xE9));
        assert_eq!(encode_char('à'), Some(0xE0));
        assert_eq!(encode_char('ç'), Some(0xE7));
        assert_eq!(encode_char('ô'), Some(0xF4));
        assert_eq!(encode_char('«'), Some(0xAB));
        assert_eq!(encode_char('»'), Some(0xBB));
    }

    #[test]
    fn test_typographic_punctuation_maps_to_winansi() {
        assert_eq!(encode_char('’'), Some(0x92));
        assert_eq!(encode_char('—'), Some(0x97));
        assert_eq!(encode_char('…'), Some(0x85));
        assert_eq!(encode_char('œ'), Some(0x9C));
        assert_eq!(encode_char('€'), Some(0x80));
        assert_eq!(encode_char('\u{202F}'), Some(0xA0));
    }

    #[test]
    fn test_unsupported_characters_replaced() {
        assert_eq!(encode_char('漢'), None);
        assert_eq!(encode_str("a漢b"), b"a?b".to_vec());
    }

    #[test]
    fn test_every_encoded_byte_has_a_width() {
        for code in 0u32..0x3000 {
            let Some(c) = char::from_u32(code) else { continue };
            if encode_char(c).is_some() {
                assert!(char_width(c) > 0, "missing width for {c:?}");
            }
        }
    }

    #[test]
    fn test_accented_letters_match_base_width() {
        assert_eq!(char_width('é'), char_width('e'));
        assert_eq!(char_width('À'), char_width('A'));
        assert_eq!(char_width('ù'), char_width('u'));
    }

    #[test]
    fn test_measure_str_scales_with_font_size() {
        let layout = a4_letter_layout();
        // "mm" = 2 × 833/1000 em at 11pt
        let expected = 2.0 * 833.0 * 11.0 / 1000.0;
        assert!((layout.measure_str("mm") - expected).abs() < 1e-3);
        assert_eq!(layout.measure_str(""), 0.0);
    }

    #[test]
    fn test_a4_layout_sanity() {
        let layout = a4_letter_layout();
        // 210mm page − 2 × 25mm margins = 160mm ≈ 453.5pt
        assert!((layout.text_width_pt() - 453.54).abs() < 0.1);
        assert!(layout.lines_per_page() > 40);
        assert!(layout.lines_per_page() < 50);
    }
}
