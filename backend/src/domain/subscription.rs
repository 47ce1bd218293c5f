//! Cancellable live observation of a stored value.
//!
//! Stores publish document state through `tokio::sync::watch` channels. A
//! [`Subscription`] couples a receiver with a projection and a
//! [`ReleaseGuard`]; dropping the subscription on any path (explicit
//! [`Subscription::cancel`], early return, `?` or unwinding) drops the
//! receiver first and then runs the guard, so the store sees an accurate
//! receiver count when it decides whether to discard the channel.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

type Release = Box<dyn FnOnce() + Send + Sync>;

/// Runs a release hook exactly once when dropped.
#[must_use = "dropping the guard runs the release hook immediately"]
pub struct ReleaseGuard(Option<Release>);

impl ReleaseGuard {
    /// Guard that runs `release` on drop.
    pub fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self(Some(Box::new(release)))
    }

    /// Guard with nothing to release.
    pub fn noop() -> Self {
        Self(None)
    }
}

impl fmt::Debug for ReleaseGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseGuard")
            .field("armed", &self.0.is_some())
            .finish()
    }
}

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        if let Some(release) = self.0.take() {
            release();
        }
    }
}

/// Live view of a value of type `T`, observed through a projection to `U`.
///
/// [`Subscription::next`] yields the current projection first and then each
/// distinct projection as the source changes.
///
/// # Examples
/// ```
/// use readtrack::domain::{ReleaseGuard, Subscription};
/// use tokio::sync::watch;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let (tx, rx) = watch::channel(Some(3_u32));
/// let mut doubled = Subscription::new(rx, ReleaseGuard::noop()).map(|v| v.map(|n| n * 2));
/// assert_eq!(doubled.next().await, Some(Some(6)));
/// tx.send_replace(None);
/// assert_eq!(doubled.next().await, Some(None));
/// # });
/// ```
pub struct Subscription<T, U = T> {
    // Declared before `release` so the receiver is gone when the guard runs.
    receiver: watch::Receiver<T>,
    project: Arc<dyn Fn(&T) -> U + Send + Sync>,
    last: Option<U>,
    primed: bool,
    release: ReleaseGuard,
}

impl<T> Subscription<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Observe the receiver's values unchanged.
    pub fn new(receiver: watch::Receiver<T>, release: ReleaseGuard) -> Self {
        Self {
            receiver,
            project: Arc::new(T::clone),
            last: None,
            primed: false,
            release,
        }
    }
}

impl<T, U> Subscription<T, U>
where
    T: Send + Sync + 'static,
    U: 'static,
{
    /// Compose a further projection onto this subscription.
    pub fn map<V>(self, f: impl Fn(&U) -> V + Send + Sync + 'static) -> Subscription<T, V> {
        let Self {
            receiver,
            project,
            release,
            ..
        } = self;
        Subscription {
            receiver,
            project: Arc::new(move |value: &T| f(&project(value))),
            last: None,
            primed: false,
            release,
        }
    }

    /// Projection of the value currently published.
    pub fn current(&self) -> U {
        (self.project)(&self.receiver.borrow())
    }

    /// Stop observing and release the underlying channel.
    pub fn cancel(self) {
        drop(self);
    }
}

impl<T, U> Subscription<T, U>
where
    U: Clone + PartialEq,
{
    /// Wait for the next distinct projection.
    ///
    /// The first call resolves immediately with the current projection.
    /// Returns `None` once the publishing side has gone away.
    pub async fn next(&mut self) -> Option<U> {
        loop {
            if self.primed {
                self.receiver.changed().await.ok()?;
            }
            self.primed = true;
            let value = (self.project)(&self.receiver.borrow_and_update());
            if self.last.as_ref() != Some(&value) {
                self.last = Some(value.clone());
                return Some(value);
            }
        }
    }
}

impl<T, U> fmt::Debug for Subscription<T, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("primed", &self.primed)
            .field("release", &self.release)
            .finish_non_exhaustive()
    }
}
