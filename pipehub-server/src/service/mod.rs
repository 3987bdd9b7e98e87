//! Service Module
//!
//! Business logic layer for the registry.
//! Services orchestrate between repositories, the archive store, and
//! contain domain logic.

pub mod pipe;
pub mod version;

// Re-export for convenience
pub use pipe as pipe_service;
pub use version as version_service;

/// Number of pages needed to show `total_count` items at `limit` per page.
pub(crate) fn total_pages(total_count: i64, limit: i64) -> i64 {
    if total_count <= 0 {
        0
    } else {
        (total_count + limit - 1) / limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 10), 3);
    }
}
