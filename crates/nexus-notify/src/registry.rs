//! Registry of notifiers keyed by channel.

use std::collections::HashMap;
use std::sync::Arc;

use nexus_models::Channel;

use crate::traits::Notifier;

/// Holds at most one notifier per channel.
#[derive(Default, Clone)]
pub struct NotifierRegistry {
    notifiers: HashMap<Channel, Arc<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a notifier under its own channel, replacing any previous one.
    pub fn register(&mut self, notifier: Arc<dyn Notifier>) {
        self.notifiers.insert(notifier.channel(), notifier);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.register(notifier);
        self
    }

    /// Gets the notifier for a channel.
    pub fn get(&self, channel: Channel) -> Option<Arc<dyn Notifier>> {
        self.notifiers.get(&channel).cloned()
    }

    /// Whether a channel can deliver.
    pub fn supports(&self, channel: Channel) -> bool {
        self.notifiers.contains_key(&channel)
    }

    /// Channels with a registered notifier.
    pub fn channels(&self) -> Vec<Channel> {
        let mut channels: Vec<Channel> = self.notifiers.keys().copied().collect();
        channels.sort_by_key(|c| c.as_str());
        channels
    }
}
