//! Observable state cells consumed by the view layer.

use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// A shared, observable value.
///
/// Clones point at the same cell: a write through any clone is seen by all of them
/// and by every receiver handed out by [`Reactive::subscribe`].
pub struct Reactive<T> {
    inner: Arc<watch::Sender<T>>,
}

impl<T> Reactive<T> {
    pub fn new(value: T) -> Self {
        let (sender, _) = watch::channel(value);
        Self {
            inner: Arc::new(sender),
        }
    }

    /// Run `f` against the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.inner.borrow())
    }

    /// Store `value` and notify subscribers even if it equals the previous one.
    pub fn replace(&self, value: T) -> T {
        self.inner.send_replace(value)
    }

    /// Mutate in place; subscribers are notified when `f` returns `true`.
    pub fn update(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.inner.send_if_modified(f)
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.inner.subscribe()
    }
}

impl<T: Clone> Reactive<T> {
    pub fn get(&self) -> T {
        self.inner.borrow().clone()
    }
}

impl<T: PartialEq> Reactive<T> {
    /// Store `value`, notifying subscribers only when it differs. Returns whether it
    /// changed.
    pub fn set(&self, value: T) -> bool {
        self.inner.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }
}

impl<T> Clone for Reactive<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for Reactive<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Reactive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Reactive").field(&*self.inner.borrow()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_cell() {
        let limit = Reactive::new(25u32);
        let shared = limit.clone();

        shared.set(40);

        assert_eq!(limit.get(), 40);
    }

    #[test]
    fn test_set_only_notifies_on_change() {
        let page = Reactive::new(1u32);
        let mut receiver = page.subscribe();

        assert!(!page.set(1));
        assert!(!receiver.has_changed().unwrap());

        assert!(page.set(2));
        assert!(receiver.has_changed().unwrap());
        assert_eq!(*receiver.borrow_and_update(), 2);
    }

    #[test]
    fn test_replace_always_notifies() {
        let items = Reactive::new(vec![1, 2, 3]);
        let mut receiver = items.subscribe();
        receiver.mark_unchanged();

        let previous = items.replace(vec![1, 2, 3]);

        assert_eq!(previous, vec![1, 2, 3]);
        assert!(receiver.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_subscriber_wakes_on_update() {
        let loading = Reactive::new(false);
        let mut receiver = loading.subscribe();

        let writer = loading.clone();
        tokio::spawn(async move {
            writer.set(true);
        });

        receiver.changed().await.unwrap();
        assert!(*receiver.borrow());
    }
}
