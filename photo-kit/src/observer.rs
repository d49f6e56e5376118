//! Live tracking of fetch-result-backed state.
//!
//! A component that owns a [`LazyFetchResults`] and wants it to follow the
//! library implements [`PhotoLibraryObserver`]. Registration attaches the
//! component (weakly) to the platform's notification registry; each
//! incoming change is filtered against the currently held result set and,
//! when relevant, applied on the UI thread as announce-then-swap.

use std::sync::{Arc, Mutex, Weak};

use crate::dispatch::MainDispatcher;
use crate::fetch_results::{FetchableWrapper, LazyFetchResults};
use crate::platform::{ChangeDetails, ChangeObserver, PhotoChange, PhotoLibrary};

/// How the UI should animate an observed update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Animation {
    #[default]
    Default,
    None,
    EaseInOut {
        millis: u64,
    },
}

type Subscriber = Box<dyn Fn(Animation) + Send>;

/// A pre-mutation announcement channel. Subscribers run synchronously, in
/// registration order, strictly before the announced state change is
/// applied, so they can still read the old state consistently.
#[derive(Default)]
pub struct ChangePublisher {
    subscribers: Mutex<Vec<Subscriber>>,
}

impl ChangePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, subscriber: impl Fn(Animation) + Send + 'static) {
        self.subscribers.lock().unwrap().push(Box::new(subscriber));
    }

    pub fn send(&self, animation: Animation) {
        for subscriber in self.subscribers.lock().unwrap().iter() {
            subscriber(animation);
        }
    }
}

/// A component that keeps a [`LazyFetchResults`] live against the photo
/// library.
///
/// Implementors also implement [`ChangeObserver`], typically by forwarding
/// straight to [`process_change`](Self::process_change):
///
/// ```rust,ignore
/// impl ChangeObserver for AlbumsModel {
///     fn photo_library_did_change(self: Arc<Self>, change: &dyn PhotoChange) {
///         self.process_change(change);
///     }
/// }
/// ```
pub trait PhotoLibraryObserver: ChangeObserver + 'static {
    type Wrapper: FetchableWrapper + Clone + Send + 'static;

    /// The result set this observer keeps live.
    fn fetch_results(&self) -> &LazyFetchResults<Self::Wrapper>;

    /// Fired immediately before each observed swap.
    fn will_change(&self) -> &ChangePublisher;

    /// Where swap tasks are scheduled; must run them on the UI thread.
    fn dispatcher(&self) -> &Arc<dyn MainDispatcher>;

    fn change_animation(&self) -> Animation {
        Animation::default()
    }

    /// Attaches this instance to the library's notification registry. Call
    /// exactly once per observation lifetime, after construction. The
    /// registry holds the instance weakly.
    fn register_photo_observation(self: Arc<Self>, library: &dyn PhotoLibrary)
    where
        Self: Sized,
    {
        library.register(Arc::downgrade(&self) as Weak<dyn ChangeObserver>);
    }

    /// Filters `change` against the held result set. Irrelevant changes are
    /// ignored. A relevant change schedules one UI-thread task that fires
    /// the will-change publisher and then swaps in the updated reference;
    /// rapid notifications produce one task each, applied in arrival order.
    fn process_change(self: Arc<Self>, change: &dyn PhotoChange)
    where
        Self: Sized,
        for<'c> dyn PhotoChange + 'c: ChangeDetails<<Self::Wrapper as FetchableWrapper>::Wrapped>,
    {
        let current = self.fetch_results().raw();
        let Some(updated) = change.change_details(&current) else {
            return;
        };
        log::debug!("fetch result changed; scheduling swap on the UI thread");
        let dispatcher = Arc::clone(self.dispatcher());
        dispatcher.dispatch(Box::new(move || {
            self.will_change().send(self.change_animation());
            self.fetch_results().replace(updated);
        }));
    }
}
