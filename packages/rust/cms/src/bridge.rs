//! Live-preview bridge between the visual editor and an in-memory story.
//!
//! Editor events are pushed in through [`LiveStory::dispatch`]. Views register
//! with [`LiveStory::subscribe`] and stay registered for as long as they hold
//! the returned [`Subscription`]; dropping it unregisters the listener.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::debug;

use crate::blocks::Story;

/// Events emitted by the visual editor.
#[derive(Debug, Clone)]
pub enum BridgeEvent {
    /// Unsaved edit carrying the full edited story.
    Input(Story),
    /// A draft was saved.
    Change,
    /// The story was published.
    Published,
}

/// What the bridge did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeOutcome {
    /// The in-memory story was replaced and listeners were notified.
    Applied,
    /// The edit belongs to a different story and was dropped.
    Ignored,
    /// Saved or published content must be fetched again by a new generation.
    ReloadRequired,
}

type Listener = Arc<dyn Fn(&Story) + Send + Sync>;

struct Shared {
    story: Story,
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
}

/// Editable story state observed by views.
#[derive(Clone)]
pub struct LiveStory {
    shared: Arc<Mutex<Shared>>,
}

impl LiveStory {
    pub fn new(story: Story) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                story,
                listeners: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// A copy of the current story.
    pub fn snapshot(&self) -> Story {
        lock(&self.shared).story.clone()
    }

    /// Register `on_change`, called with the new story after every applied edit.
    pub fn subscribe<F>(&self, on_change: F) -> Subscription
    where
        F: Fn(&Story) + Send + Sync + 'static,
    {
        let mut shared = lock(&self.shared);
        let id = shared.next_id;
        shared.next_id += 1;
        shared.listeners.push((id, Arc::new(on_change)));

        debug!(subscription = id, "editor bridge listener registered");

        Subscription {
            id,
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        lock(&self.shared).listeners.len()
    }

    /// Apply an editor event.
    ///
    /// Input events only replace the story when their root content uid matches
    /// the one being shown. Listeners run after the lock is released, so they
    /// may call back into this `LiveStory`.
    pub fn dispatch(&self, event: BridgeEvent) -> BridgeOutcome {
        let story = match event {
            BridgeEvent::Change | BridgeEvent::Published => {
                debug!("editor saved content, regeneration required");
                return BridgeOutcome::ReloadRequired;
            }
            BridgeEvent::Input(story) => story,
        };

        let listeners: Vec<Listener> = {
            let mut shared = lock(&self.shared);
            if shared.story.content.uid != story.content.uid {
                debug!(
                    current = %shared.story.content.uid,
                    incoming = %story.content.uid,
                    "ignoring edit for another story"
                );
                return BridgeOutcome::Ignored;
            }
            shared.story = story.clone();
            shared.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };

        for listener in &listeners {
            listener(&story);
        }

        BridgeOutcome::Applied
    }
}

impl std::fmt::Debug for LiveStory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = lock(&self.shared);
        f.debug_struct("LiveStory")
            .field("story", &shared.story.slug)
            .field("listeners", &shared.listeners.len())
            .finish()
    }
}

/// Handle keeping a listener registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    shared: Weak<Mutex<Shared>>,
}

impl Subscription {
    /// Unsubscribe now.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            lock(&shared).listeners.retain(|(id, _)| *id != self.id);
            debug!(subscription = self.id, "editor bridge listener removed");
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}
