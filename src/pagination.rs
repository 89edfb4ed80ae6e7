// ABOUTME: Offset pagination and sort-key parsing for directory listings
// ABOUTME: Provides the {total, data} page envelope and the "-field" descending convention
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vidpod.org

use crate::constants::limits::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Page window for a listing query
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationParams {
    /// Index of the first returned item, 0-based
    pub start: i64,
    /// Number of items in the page
    pub count: i64,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            start: 0,
            count: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationParams {
    /// Build a validated page window.
    ///
    /// Oversized `count` values are clamped to [`MAX_PAGE_SIZE`] rather
    /// than rejected, so a greedy client still gets a bounded response.
    ///
    /// # Errors
    /// Returns a validation error when `start` or `count` is negative.
    pub fn new(start: i64, count: i64) -> AppResult<Self> {
        if start < 0 {
            return Err(AppError::validation("start must not be negative"));
        }
        if count < 0 {
            return Err(AppError::validation("count must not be negative"));
        }
        Ok(Self {
            start,
            count: count.min(MAX_PAGE_SIZE),
        })
    }
}

/// Sort direction, ascending unless the sort key carries a `-` prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Sortable fields of the user directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSortKey {
    Username,
    CreatedDate,
}

impl UserSortKey {
    const fn column(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::CreatedDate => "created_at",
        }
    }
}

/// Parsed sort order for the user directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSort {
    pub key: UserSortKey,
    pub direction: SortDirection,
}

impl Default for UserSort {
    fn default() -> Self {
        Self {
            key: UserSortKey::CreatedDate,
            direction: SortDirection::Ascending,
        }
    }
}

impl UserSort {
    /// Parse a wire sort parameter (`username`, `-username`, `createdDate`,
    /// `-createdDate`).
    ///
    /// # Errors
    /// Returns a validation error for unknown sort fields.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let (direction, field) = match raw.strip_prefix('-') {
            Some(rest) => (SortDirection::Descending, rest),
            None => (SortDirection::Ascending, raw),
        };

        let key = match field {
            "username" => UserSortKey::Username,
            "createdDate" => UserSortKey::CreatedDate,
            other => {
                return Err(AppError::validation(format!(
                    "Unsupported sort field: {other}"
                )))
            }
        };

        Ok(Self { key, direction })
    }

    /// ORDER BY clause body for this sort. `rowid` (insertion order) breaks
    /// ties so that repeated identical queries return identical pages.
    #[must_use]
    pub fn to_order_by(self) -> String {
        format!(
            "{} {}, rowid ASC",
            self.key.column(),
            self.direction.as_sql()
        )
    }
}

/// Listing envelope: total collection size plus one page of items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Size of the full unfiltered collection at read time
    pub total: i64,
    /// The items in `[start, start + count)` after sorting
    pub data: Vec<T>,
}

impl<T> Page<T> {
    /// Create a page from a snapshot total and its items
    #[must_use]
    pub const fn new(total: i64, data: Vec<T>) -> Self {
        Self { total, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ascending_and_descending() {
        let sort = UserSort::parse("username").unwrap();
        assert_eq!(sort.key, UserSortKey::Username);
        assert_eq!(sort.direction, SortDirection::Ascending);

        let sort = UserSort::parse("-username").unwrap();
        assert_eq!(sort.direction, SortDirection::Descending);

        let sort = UserSort::parse("-createdDate").unwrap();
        assert_eq!(sort.key, UserSortKey::CreatedDate);
        assert_eq!(sort.to_order_by(), "created_at DESC, rowid ASC");
    }

    #[test]
    fn test_parse_rejects_unknown_field() {
        assert!(UserSort::parse("password_hash").is_err());
        assert!(UserSort::parse("-role").is_err());
    }

    #[test]
    fn test_pagination_bounds() {
        assert!(PaginationParams::new(-1, 10).is_err());
        assert!(PaginationParams::new(0, -1).is_err());

        let params = PaginationParams::new(0, 10_000).unwrap();
        assert_eq!(params.count, MAX_PAGE_SIZE);

        let params = PaginationParams::default();
        assert_eq!(params.start, 0);
        assert_eq!(params.count, DEFAULT_PAGE_SIZE);
    }
}
