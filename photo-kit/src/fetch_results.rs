//! Lazy, cached wrapper views over platform fetch results.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, RwLock};

use crate::platform::FetchResult;

/// A value that wraps exactly one platform handle and derives a stable
/// identity from it.
pub trait FetchableWrapper {
    type Wrapped: ?Sized + Send + Sync + 'static;

    fn from_handle(handle: Arc<Self::Wrapped>) -> Self;

    /// The wrapped handle's stable local identifier.
    fn id(&self) -> &str;
}

/// Every value wrapper also has a shared (reference-typed) form. Combined
/// with the positional cache below, this is what gives a wrapper stable
/// per-index identity for UI diffing.
impl<W: FetchableWrapper> FetchableWrapper for Arc<W> {
    type Wrapped = W::Wrapped;

    fn from_handle(handle: Arc<Self::Wrapped>) -> Self {
        Arc::new(W::from_handle(handle))
    }

    fn id(&self) -> &str {
        (**self).id()
    }
}

/// An ordered, zero-based, randomly-indexable view over a platform fetch
/// result, producing wrappers on demand.
///
/// Wrappers are cached per position. The platform already memoizes the raw
/// handles; this cache exists so that shared wrappers keep their identity
/// across repeated reads of the same index, which plain re-construction
/// would not provide. Replacing the underlying fetch result (after a change
/// notification) discards the whole cache before any further read.
///
/// Reads and swaps are expected on the thread that owns the enclosing UI
/// state; background change processing only calls `raw()`.
pub struct LazyFetchResults<W: FetchableWrapper> {
    raw: RwLock<Arc<dyn FetchResult<W::Wrapped>>>,
    cache: Mutex<Vec<Option<W>>>,
}

impl<W: FetchableWrapper> LazyFetchResults<W> {
    pub fn new(raw: Arc<dyn FetchResult<W::Wrapped>>) -> Self {
        let mut cache = Vec::new();
        cache.resize_with(raw.count(), || None);
        Self {
            raw: RwLock::new(raw),
            cache: Mutex::new(cache),
        }
    }

    /// The current underlying count. Changes only when the reference is
    /// swapped, never in place.
    pub fn len(&self) -> usize {
        self.raw.read().unwrap().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The underlying fetch result reference.
    pub fn raw(&self) -> Arc<dyn FetchResult<W::Wrapped>> {
        let raw = self.raw.read().unwrap();
        Arc::clone(&*raw)
    }

    /// Whether this view currently holds exactly `raw`.
    pub fn holds(&self, raw: &Arc<dyn FetchResult<W::Wrapped>>) -> bool {
        Arc::ptr_eq(&self.raw(), raw)
    }

    /// Swaps in a new underlying fetch result. The cache is cleared first,
    /// so no read after this can observe a wrapper bound to the superseded
    /// result, and re-sized to the new cardinality.
    pub fn replace(&self, new_raw: Arc<dyn FetchResult<W::Wrapped>>) {
        let mut cache = self.cache.lock().unwrap();
        let mut raw = self.raw.write().unwrap();
        cache.clear();
        cache.resize_with(new_raw.count(), || None);
        *raw = new_raw;
    }

    fn raw_addr(&self) -> usize {
        let raw = self.raw.read().unwrap();
        Arc::as_ptr(&*raw) as *const () as usize
    }
}

impl<W: FetchableWrapper + Clone> LazyFetchResults<W> {
    /// The wrapper at `index`, cached since the last reference swap or
    /// constructed now and cached. Panics if `index >= len()`.
    pub fn get(&self, index: usize) -> W {
        let mut cache = self.cache.lock().unwrap();
        let raw = self.raw.read().unwrap();
        if let Some(cached) = &cache[index] {
            return cached.clone();
        }
        let wrapper = W::from_handle(raw.object_at(index));
        cache[index] = Some(wrapper.clone());
        wrapper
    }

    pub fn iter(&self) -> impl Iterator<Item = W> + '_ {
        (0..self.len()).map(move |index| self.get(index))
    }

    pub fn to_vec(&self) -> Vec<W> {
        self.iter().collect()
    }
}

/// Equality and hashing follow the identity of the underlying fetch result,
/// so two views are interchangeable exactly when they present the same
/// platform result set.
impl<W: FetchableWrapper> PartialEq for LazyFetchResults<W> {
    fn eq(&self, other: &Self) -> bool {
        self.raw_addr() == other.raw_addr()
    }
}

impl<W: FetchableWrapper> Eq for LazyFetchResults<W> {}

impl<W: FetchableWrapper> Hash for LazyFetchResults<W> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw_addr().hash(state);
    }
}

impl<W: FetchableWrapper> fmt::Debug for LazyFetchResults<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyFetchResults")
            .field("len", &self.len())
            .finish()
    }
}
