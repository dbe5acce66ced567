#![forbid(unsafe_code)]

//! The symbol glyph table and its named groups.
//!
//! Stamps draw characters from a Private Use Area font laid out as a grid:
//! rows of ten glyphs, with consecutive rows 39 code points apart starting
//! at U+F0000. The table exposes one hundred logical slots addressed by
//! index, plus named groups of related symbols for the picker.

/// First code point of the glyph grid.
const TABLE_BASE: u32 = 0xF0000;
/// Code-point stride between consecutive rows of ten.
const ROW_STRIDE: u32 = 39;
/// Glyphs per row.
const ROW_WIDTH: u32 = 10;
/// Logical table size.
pub const TABLE_LEN: usize = 100;

/// The character at logical slot `index` of the glyph grid.
#[must_use]
pub fn glyph_code(index: usize) -> char {
    let index = index as u32;
    let code = TABLE_BASE + (index / ROW_WIDTH) * ROW_STRIDE + (index % ROW_WIDTH);
    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// All one hundred glyphs in slot order.
#[must_use]
pub fn glyph_table() -> Vec<char> {
    (0..TABLE_LEN).map(glyph_code).collect()
}

/// Stable identifier for the glyph at `index`, used as a picker icon key.
#[must_use]
pub fn icon_name(index: usize) -> String {
    format!("pw-{index:03}")
}

/// Named slices of the glyph table.
///
/// `Typhoons` is a legacy alias for the last row; saved annotations refer
/// to it by name, so it stays addressable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum GlyphGroup {
    #[default]
    Group0,
    Group1,
    Group2,
    Group3,
    Group4,
    Group5,
    Group6,
    Group7,
    Group8,
    Group9,
    Typhoons,
}

impl GlyphGroup {
    pub const ALL: [GlyphGroup; 11] = [
        GlyphGroup::Group0,
        GlyphGroup::Group1,
        GlyphGroup::Group2,
        GlyphGroup::Group3,
        GlyphGroup::Group4,
        GlyphGroup::Group5,
        GlyphGroup::Group6,
        GlyphGroup::Group7,
        GlyphGroup::Group8,
        GlyphGroup::Group9,
        GlyphGroup::Typhoons,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GlyphGroup::Group0 => "group0",
            GlyphGroup::Group1 => "group1",
            GlyphGroup::Group2 => "group2",
            GlyphGroup::Group3 => "group3",
            GlyphGroup::Group4 => "group4",
            GlyphGroup::Group5 => "group5",
            GlyphGroup::Group6 => "group6",
            GlyphGroup::Group7 => "group7",
            GlyphGroup::Group8 => "group8",
            GlyphGroup::Group9 => "group9",
            GlyphGroup::Typhoons => "typhoons",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<GlyphGroup> {
        GlyphGroup::ALL
            .into_iter()
            .find(|group| group.as_str() == name)
    }

    /// Slot range of this group within the table.
    ///
    /// `Group1` carries nine glyphs, not ten; the tenth slot of its row
    /// was never assigned a symbol and saved documents rely on the short
    /// slice.
    #[must_use]
    pub fn range(self) -> std::ops::Range<usize> {
        match self {
            GlyphGroup::Group0 => 0..10,
            GlyphGroup::Group1 => 10..19,
            GlyphGroup::Group2 => 20..30,
            GlyphGroup::Group3 => 30..40,
            GlyphGroup::Group4 => 40..50,
            GlyphGroup::Group5 => 50..60,
            GlyphGroup::Group6 => 60..70,
            GlyphGroup::Group7 => 70..80,
            GlyphGroup::Group8 => 80..90,
            GlyphGroup::Group9 | GlyphGroup::Typhoons => 90..100,
        }
    }

    /// The glyphs this group offers, in slot order.
    #[must_use]
    pub fn glyphs(self) -> Vec<char> {
        self.range().map(glyph_code).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn first_row_is_contiguous_from_the_base() {
        assert_eq!(glyph_code(0), '\u{F0000}');
        assert_eq!(glyph_code(9), '\u{F0009}');
    }

    #[test]
    fn rows_are_thirty_nine_code_points_apart() {
        assert_eq!(glyph_code(10), '\u{F0027}');
        assert_eq!(glyph_code(20), '\u{F004E}');
        assert_eq!(glyph_code(99), '\u{F0168}');
    }

    #[test]
    fn table_has_one_hundred_distinct_glyphs() {
        let table = glyph_table();
        assert_eq!(table.len(), TABLE_LEN);
        assert_eq!(table.iter().collect::<BTreeSet<_>>().len(), TABLE_LEN);
    }

    #[test]
    fn icon_names_are_zero_padded() {
        assert_eq!(icon_name(0), "pw-000");
        assert_eq!(icon_name(42), "pw-042");
    }

    #[test]
    fn group_one_has_nine_glyphs() {
        assert_eq!(GlyphGroup::Group1.glyphs().len(), 9);
        for group in GlyphGroup::ALL {
            if group != GlyphGroup::Group1 {
                assert_eq!(group.glyphs().len(), 10, "{}", group.as_str());
            }
        }
    }

    #[test]
    fn typhoons_aliases_the_last_row() {
        assert_eq!(GlyphGroup::Typhoons.glyphs(), GlyphGroup::Group9.glyphs());
    }

    #[test]
    fn group_names_round_trip() {
        for group in GlyphGroup::ALL {
            assert_eq!(GlyphGroup::from_name(group.as_str()), Some(group));
        }
        assert_eq!(GlyphGroup::from_name("group10"), None);
    }
}
