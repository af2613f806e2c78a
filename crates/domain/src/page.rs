//! Offset-based pagination.

use crate::error::ValidationError;

/// Page size used when the caller does not provide one.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// A one-based page request: page `number` holds rows
/// `[(number - 1) * size, number * size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    size: u32,
    number: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            size: DEFAULT_PAGE_SIZE,
            number: 1,
        }
    }
}

impl Page {
    /// Build a page from raw (possibly untrusted) values.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPage`] when either value is below one
    /// or does not fit in a `u32`.
    pub fn new(size: i64, number: i64) -> Result<Self, ValidationError> {
        let size = Self::positive("pageSize", size)?;
        let number = Self::positive("pageNumber", number)?;
        Ok(Self { size, number })
    }

    fn positive(field: &'static str, value: i64) -> Result<u32, ValidationError> {
        u32::try_from(value)
            .ok()
            .filter(|v| *v >= 1)
            .ok_or(ValidationError::InvalidPage {
                field,
                actual: value,
            })
    }

    #[must_use]
    pub fn size(self) -> u32 {
        self.size
    }

    #[must_use]
    pub fn number(self) -> u32 {
        self.number
    }

    /// Maximum number of rows on this page.
    #[must_use]
    pub fn limit(self) -> i64 {
        i64::from(self.size)
    }

    /// Number of rows to skip before this page starts.
    #[must_use]
    pub fn offset(self) -> i64 {
        i64::from(self.number - 1) * i64::from(self.size)
    }
}
