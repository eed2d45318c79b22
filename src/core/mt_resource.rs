use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A thread-safe, reference-counted resource container with read-write locking.
///
/// `MtResource` is how chunks, the world index and the world generator are shared
/// between the main thread (which owns the live mesh buffers) and the workers that
/// generate terrain and build staged meshes. Clones share the same value.
///
/// # Examples
///
/// ```
/// use voxel_world_engine::core::MtResource;
///
/// let shared = MtResource::new(vec![1, 2, 3]);
/// let handle = shared.clone();
///
/// handle.get_mut().push(4);
/// assert_eq!(shared.get().len(), 4);
/// assert!(shared.ptr_eq(&handle));
/// ```
///
/// # Performance Considerations
/// - Read operations (`get()`) can occur concurrently
/// - Write operations (`get_mut()`) are exclusive and will block other operations
/// - Mesh builds only ever take read guards, so they never block each other
pub struct MtResource<T: Send + Sync> {
    resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync + 'static> MtResource<T> {
    /// Creates a new `MtResource` containing the given value.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read-only guard over the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned, i.e. a thread panicked while holding a write guard.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource
            .read()
            .expect("resource lock poisoned by a panicking writer")
    }

    /// Returns a mutable guard over the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned, i.e. a thread panicked while holding a write guard.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource
            .write()
            .expect("resource lock poisoned by a panicking writer")
    }

    /// Returns `true` when both handles point at the same underlying value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.resource, &other.resource)
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn clones_share_state_across_threads() {
        let counter = MtResource::new(0u32);
        let counter_clone = counter.clone();

        let handle = thread::spawn(move || {
            *counter_clone.get_mut() += 1;
        });

        handle.join().unwrap();
        assert_eq!(*counter.get(), 1);
    }

    #[test]
    fn separate_resources_are_not_ptr_eq() {
        let a = MtResource::new(1u8);
        let b = MtResource::new(1u8);
        assert!(!a.ptr_eq(&b));
        assert!(a.ptr_eq(&a.clone()));
    }
}
