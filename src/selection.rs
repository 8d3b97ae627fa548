//! Cursor over a bounded, ordered list
//!
//! A `Selection` is a plain value: every move returns a new cursor, so
//! callers keep it wherever their session state lives.

/// Position within a list of `len` items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    index: usize,
    len: usize,
}

impl Selection {
    /// Cursor on the first item
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    /// Cursor on `index`, clamped to the last item
    pub fn starting_at(index: usize, len: usize) -> Self {
        Self {
            index: index.min(len.saturating_sub(1)),
            len,
        }
    }

    /// Cursor on the first item whose key is at or after `pivot`
    ///
    /// `items` must be sorted by `key`. When every item is before the
    /// pivot the cursor lands on the last item, the one closest to the
    /// pivot, rather than wrapping back to the first.
    pub fn first_at_or_after<T, K, F>(items: &[T], key: F, pivot: K) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K,
    {
        let index = items.partition_point(|item| key(item) < pivot);
        Self::starting_at(index, items.len())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Selected index, or `None` for an empty list
    pub fn index(&self) -> Option<usize> {
        (self.len > 0).then_some(self.index)
    }

    pub fn current<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        self.index().and_then(|i| items.get(i))
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.len
    }

    pub fn has_previous(&self) -> bool {
        self.len > 0 && self.index > 0
    }

    /// Next item, staying put on the last one
    pub fn advance(self) -> Self {
        self.step(1)
    }

    /// Previous item, staying put on the first one
    pub fn retreat(self) -> Self {
        self.step(-1)
    }

    pub fn jump(self, index: usize) -> Self {
        Self::starting_at(index, self.len)
    }

    /// Move by `delta` items, saturating at either end
    pub fn step(self, delta: isize) -> Self {
        let target = if delta >= 0 {
            self.index.saturating_add(delta.unsigned_abs())
        } else {
            self.index.saturating_sub(delta.unsigned_abs())
        };
        self.jump(target)
    }
}
