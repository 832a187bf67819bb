//! Synchronous publish/subscribe registry keyed by event.
//!
//! Components that emit events (bone completion, button gestures) own
//! one of these. Subscribers are invoked synchronously, in subscription
//! order, on the caller's thread. No subscriber consumes an event.

/// Boxed subscriber callback receiving the emitter's snapshot.
pub type Callback<S> = Box<dyn FnMut(&S)>;

pub struct EventRegistry<E, S> {
    subscribers: Vec<(E, Callback<S>)>,
}

impl<E: Copy + PartialEq, S> EventRegistry<E, S> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Register `callback` for `event`. Registrations accumulate.
    pub fn subscribe(&mut self, event: E, callback: impl FnMut(&S) + 'static) {
        self.subscribers.push((event, Box::new(callback)));
    }

    /// Invoke every subscriber of `event` with `payload`.
    /// Returns how many subscribers ran.
    pub fn publish(&mut self, event: E, payload: &S) -> usize {
        let mut invoked = 0;
        for (_, callback) in self.subscribers.iter_mut().filter(|(e, _)| *e == event) {
            callback(payload);
            invoked += 1;
        }
        invoked
    }

    pub fn subscriber_count(&self, event: E) -> usize {
        self.subscribers.iter().filter(|(e, _)| *e == event).count()
    }
}

impl<E: Copy + PartialEq, S> Default for EventRegistry<E, S> {
    fn default() -> Self {
        Self::new()
    }
}
