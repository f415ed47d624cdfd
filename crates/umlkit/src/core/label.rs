//! Multi-line text labels owned by nodes
//!
//! A [`MultiLineString`] is the text attribute of a node (a class name, a
//! note body, the attribute compartment). Each node owns its labels, so
//! cloning a node clones its labels as well.

use std::fmt;

use unicode_width::UnicodeWidthStr;

use super::Dimension;

/// Horizontal width of one text column in diagram units
pub const COLUMN_WIDTH: i32 = 7;

/// Height of one text line in diagram units
pub const LINE_HEIGHT: i32 = 16;

/// Padding added around measured text on each side
pub const TEXT_PADDING: i32 = 4;

/// How to align the text of a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

/// A string that can extend over multiple lines
///
/// Only the text is editable. Justification, bold and underline are fixed
/// when the label is created, so every label of a node kind shares them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MultiLineString {
    text: String,
    justification: Align,
    bold: bool,
    underlined: bool,
}

impl MultiLineString {
    /// Empty, centered, plain label
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty, centered label rendered in bold
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    /// Empty, left-aligned plain label, used for member compartments
    pub fn left_aligned() -> Self {
        Self {
            justification: Align::Left,
            ..Self::default()
        }
    }

    /// Empty, centered label rendered underlined
    pub fn underlined() -> Self {
        Self {
            underlined: true,
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn justification(&self) -> Align {
        self.justification
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn is_underlined(&self) -> bool {
        self.underlined
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Non-empty lines of the label
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n').filter(|line| !line.is_empty())
    }

    /// Size of the text in diagram units, zero for an empty label
    pub fn dimension(&self) -> Dimension {
        let mut columns = 0;
        let mut rows = 0;
        for line in self.lines() {
            columns = columns.max(UnicodeWidthStr::width(line));
            rows += 1;
        }
        if rows == 0 {
            return Dimension::default();
        }
        let columns = i32::try_from(columns).unwrap_or(i32::MAX / COLUMN_WIDTH);
        Dimension::new(
            columns * COLUMN_WIDTH + 2 * TEXT_PADDING,
            rows * LINE_HEIGHT + 2 * TEXT_PADDING,
        )
    }
}

impl fmt::Display for MultiLineString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text.replace('\n', "|"))
    }
}
