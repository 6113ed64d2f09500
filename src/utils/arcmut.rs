use std::sync::{Arc, Mutex, MutexGuard};

/// Shared, lockable value used for process-wide caches.
///
/// A poisoned lock is recovered instead of propagated: the cached data is
/// plain values and stays usable after a panic in another holder.
pub struct ArcMut<T> {
    inner: Arc<Mutex<T>>,
}

impl<T> ArcMut<T> {
    pub fn new(value: T) -> ArcMut<T> {
        ArcMut {
            inner: Arc::new(Mutex::new(value)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T> Clone for ArcMut<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ArcMut;

    #[test]
    fn clones_share_the_same_value() {
        let a = ArcMut::new(Vec::<u32>::new());
        let b = a.clone();

        b.lock().push(7);

        assert_eq!(*a.lock(), vec![7]);
    }
}
