//! Region categories.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic category of a page region.
///
/// The numeric codes are part of the dataset and model formats and never
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Category {
    /// Title or heading
    Title = 0,
    /// Running text
    Text = 1,
    /// Bulleted or numbered list
    List = 2,
    /// Table
    Table = 3,
    /// Image or figure
    Image = 4,
}

impl Category {
    /// Number of categories.
    pub const COUNT: usize = 5;

    /// All categories in code order.
    pub const ALL: [Category; Category::COUNT] = [
        Category::Title,
        Category::Text,
        Category::List,
        Category::Table,
        Category::Image,
    ];

    /// Numeric code of the category.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Index of the category in [`Category::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a category by its numeric code.
    ///
    /// # Examples
    ///
    /// ```
    /// use region_oxide::ml::Category;
    ///
    /// assert_eq!(Category::from_code(3).unwrap(), Category::Table);
    /// assert!(Category::from_code(7).is_err());
    /// ```
    pub fn from_code(code: u8) -> Result<Self> {
        Category::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| Error::UnknownCategory(code.to_string()))
    }

    /// Lowercase name of the category.
    pub fn name(self) -> &'static str {
        match self {
            Category::Title => "title",
            Category::Text => "text",
            Category::List => "list",
            Category::Table => "table",
            Category::Image => "image",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.name() == lower)
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}
