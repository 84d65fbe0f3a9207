//! Capacity-bounded observation table.

use crate::error::{LabError, Result};

/// An append-only table of observations.
///
/// Rows keep insertion order and are never edited once pushed; the only way
/// to remove them is [`ObservationLog::clear`].
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationLog<T> {
    entries: Vec<T>,
    capacity: usize,
}

impl<T> ObservationLog<T> {
    /// Create an empty table holding at most `capacity` rows.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of rows.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Serial number (1-based) the next row will carry.
    pub fn next_serial(&self) -> usize {
        self.entries.len() + 1
    }

    /// Fail with [`LabError::LogFull`] if no row can be added.
    pub fn ensure_room(&self) -> Result<()> {
        if self.is_full() {
            return Err(LabError::LogFull {
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Append a row.
    pub fn push(&mut self, entry: T) -> Result<()> {
        self.ensure_room()?;
        self.entries.push(entry);
        Ok(())
    }

    /// Rows in recording order.
    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    /// Drop every row.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a, T> IntoIterator for &'a ObservationLog<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_until_full() {
        let mut log = ObservationLog::new(2);
        assert!(log.is_empty());
        assert_eq!(log.next_serial(), 1);

        log.push("a").unwrap();
        log.push("b").unwrap();
        assert!(log.is_full());
        assert_eq!(log.push("c"), Err(LabError::LogFull { capacity: 2 }));
        assert_eq!(log.as_slice(), &["a", "b"]);
    }

    #[test]
    fn test_clear() {
        let mut log = ObservationLog::new(3);
        log.push(1).unwrap();
        log.push(2).unwrap();
        log.clear();
        assert_eq!(log.len(), 0);
        assert_eq!(log.next_serial(), 1);
        assert_eq!(log.capacity(), 3);
    }
}
