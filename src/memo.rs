//! Per-instance memoization of fetched values.
//!
//! A `Memo` holds at most one value, loaded on first access and kept until
//! `invalidate` is called. Values are handed out as `Rc` so that repeated
//! reads return the very same allocation. Nothing expires on its own: a
//! memoized value can be stale relative to the server.

use std::{cell::RefCell, fmt, future::Future, rc::Rc};
use tracing::trace;

use crate::error::ApiError;

pub struct Memo<T> {
    value: RefCell<Option<Rc<T>>>,
}

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self {
            value: RefCell::new(None),
        }
    }

    /// Create a memo that is already loaded
    pub fn loaded(value: T) -> Self {
        Self {
            value: RefCell::new(Some(Rc::new(value))),
        }
    }

    pub fn get(&self) -> Option<Rc<T>> {
        self.value.borrow().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.value.borrow().is_some()
    }

    pub fn invalidate(&self) {
        if self.value.borrow_mut().take().is_some() {
            trace!("Invalidated memoized value");
        }
    }

    /// Return the memoized value, running `fetch` to load it if needed.
    ///
    /// A failed fetch leaves the memo empty.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<Rc<T>, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if let Some(value) = self.get() {
            trace!("Using memoized value");
            return Ok(value);
        }

        let value = Rc::new(fetch().await?);
        *self.value.borrow_mut() = Some(Rc::clone(&value));
        Ok(value)
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Self {
            value: RefCell::new(self.get()),
        }
    }
}

impl<T> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_loaded() {
            write!(f, "Memo(loaded)")
        } else {
            write!(f, "Memo(empty)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_fetches_once() {
        let memo = Memo::new();
        let calls = Cell::new(0);

        let first = memo
            .get_or_fetch(|| async {
                calls.set(calls.get() + 1);
                Ok(vec![1, 2, 3])
            })
            .await
            .unwrap();
        let second = memo
            .get_or_fetch(|| async {
                calls.set(calls.get() + 1);
                Ok(vec![4])
            })
            .await
            .unwrap();

        assert_eq!(calls.get(), 1);
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_memo_empty() {
        let memo: Memo<u32> = Memo::new();
        let result = memo
            .get_or_fetch(|| async { Err(ApiError::InvalidCredentials) })
            .await;

        assert!(result.is_err());
        assert!(!memo.is_loaded());
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let memo = Memo::loaded(1);
        memo.invalidate();
        assert!(!memo.is_loaded());

        let value = memo.get_or_fetch(|| async { Ok(2) }).await.unwrap();
        assert_eq!(*value, 2);
    }
}
