//! Base-14 Helvetica advance widths.
//!
//! Widths are in thousandths of an em, taken from the Adobe AFM files for
//! `Helvetica` and `Helvetica-Bold` and indexed by printable ASCII.

use unicode_normalization::char::decompose_canonical;

use crate::encoding::encode_char;
use crate::model::FontWeight;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const DEFAULT_WIDTH: u16 = 556;

/// One of the two text faces used by the synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseFont {
    /// `/F1`, regular face
    Regular,
    /// `/F2`, bold face
    Bold,
}

impl BaseFont {
    /// Face for a configured weight.
    pub fn for_weight(weight: FontWeight) -> Self {
        match weight {
            FontWeight::Normal => BaseFont::Regular,
            FontWeight::Bold => BaseFont::Bold,
        }
    }

    /// Resource name used in content streams.
    pub fn resource_name(&self) -> &'static str {
        match self {
            BaseFont::Regular => "F1",
            BaseFont::Bold => "F2",
        }
    }

    /// Advance width of a character in thousandths of an em.
    ///
    /// Characters outside WinAnsi are measured as the `?` they are
    /// rendered as.
    pub fn char_width(&self, c: char) -> u16 {
        if encode_char(c).is_none() {
            return self.ascii_width('?');
        }
        if let Some(width) = self.extended_width(c) {
            return width;
        }
        if c.is_ascii() {
            return self.ascii_width(c);
        }

        // Accented Latin letters take the width of their base letter.
        let mut base = None;
        decompose_canonical(c, |d| {
            if base.is_none() {
                base = Some(d);
            }
        });
        match base {
            Some(b) if b.is_ascii() && b != c => self.ascii_width(b),
            _ => DEFAULT_WIDTH,
        }
    }

    /// Width of `text` in points at `size`.
    pub fn text_width(&self, text: &str, size: f64) -> f64 {
        let units: u32 = text.chars().map(|c| u32::from(self.char_width(c))).sum();
        f64::from(units) * size / 1000.0
    }

    fn ascii_width(&self, c: char) -> u16 {
        let table = match self {
            BaseFont::Regular => &HELVETICA,
            BaseFont::Bold => &HELVETICA_BOLD,
        };
        match c as usize {
            code @ 32..=126 => table[code - 32],
            _ => 0,
        }
    }

    fn extended_width(&self, c: char) -> Option<u16> {
        let bold = *self == BaseFont::Bold;
        let width = match c {
            '\u{00A0}' => 278,
            '\u{2022}' => 350,
            '\u{2013}' => 556,
            '\u{2014}' | '\u{2026}' | '\u{2030}' | '\u{2122}' => 1000,
            '\u{2018}' | '\u{2019}' | '\u{201A}' => {
                if bold {
                    278
                } else {
                    222
                }
            }
            '\u{201C}' | '\u{201D}' | '\u{201E}' => {
                if bold {
                    500
                } else {
                    333
                }
            }
            '\u{00A9}' | '\u{00AE}' => 737,
            '\u{00B0}' => 400,
            '\u{20AC}' => 556,
            _ => return None,
        };
        Some(width)
    }
}
