//! Utility functions for SQLite storage operations.

/// Maximum rows per multi-row `INSERT`.
///
/// SQLite limits the number of bound parameters per statement
/// (SQLITE_MAX_VARIABLE_NUMBER, 32766 in the bundled build). A task row binds
/// 10 parameters, so 500 rows stays well under the limit even for a goal
/// with thousands of steps.
pub const SQLITE_MAX_ROWS_PER_INSERT: usize = 500;

/// Chunk a slice into smaller slices for multi-row inserts.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_ROWS_PER_INSERT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_for_sqlite_empty() {
        let items: Vec<i32> = vec![];
        let chunks: Vec<_> = chunk_for_sqlite(&items).collect();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_chunk_for_sqlite_over_limit() {
        let items: Vec<i32> = (0..1200).collect();
        let chunks: Vec<_> = chunk_for_sqlite(&items).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), SQLITE_MAX_ROWS_PER_INSERT);
        assert_eq!(chunks[2].len(), 200);
    }
}
