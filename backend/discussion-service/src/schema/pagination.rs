//! Cursor pagination types shared by the list queries.
//!
//! Cursors are record ids: the `endCursor` of one page is passed back as
//! `after` to fetch the next.

use async_graphql::SimpleObject;

/// Page info for cursor pagination
#[derive(SimpleObject, Clone, Debug, Default, PartialEq, Eq)]
pub struct PageInfo {
    /// Whether there are more items after the current page
    pub has_next_page: bool,
    /// Whether the page was requested with an `after` cursor
    pub has_previous_page: bool,
    /// Cursor pointing to the last returned item
    pub end_cursor: Option<String>,
}

impl PageInfo {
    pub fn new(has_more: bool, after: Option<&str>, end_cursor: Option<String>) -> Self {
        Self {
            has_next_page: has_more,
            has_previous_page: after.is_some(),
            end_cursor,
        }
    }
}

/// Page size bounds applied to `first` arguments
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageSizeLimits {
    pub default_size: i64,
    pub max_size: i64,
}

impl Default for PageSizeLimits {
    fn default() -> Self {
        Self {
            default_size: 10,
            max_size: 100,
        }
    }
}

impl PageSizeLimits {
    /// Effective limit for a `first` argument.
    ///
    /// Missing means the default size; anything above the max is clamped.
    /// Zero and negative values pass through and yield an empty page.
    pub fn resolve(&self, first: Option<i32>) -> i64 {
        match first {
            Some(n) => i64::from(n).min(self.max_size),
            None => self.default_size,
        }
    }
}
