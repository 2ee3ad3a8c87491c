// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Message endpoint: outgoing buffer plus typed subscriptions

use std::sync::Arc;

use parking_lot::Mutex;
use spikenet_npu_neural::Uid;
use tracing::trace;

use crate::bus::{EndpointKey, Registry};
use crate::message::Message;
use crate::subscription::{Subscription, SubscriptionSet};

/// Connection of one component (a backend, an observer, an input channel)
/// to a [`MessageBus`](crate::MessageBus).
///
/// Subscriptions are keyed by `(receiver, message type)`, so a single
/// endpoint can serve many receivers.
pub struct Endpoint {
    registry: Arc<Mutex<Registry>>,
    key: EndpointKey,
    subscriptions: SubscriptionSet,
}

impl Endpoint {
    pub(crate) fn new(registry: Arc<Mutex<Registry>>, key: EndpointKey) -> Self {
        Self {
            registry,
            key,
            subscriptions: SubscriptionSet::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn key(&self) -> EndpointKey {
        self.key
    }

    /// Buffer `message` until the next routing pass
    pub fn send<M: Message>(&self, message: M) {
        let mut registry = self.registry.lock();
        if let Some(slot) = registry.get_mut(self.key) {
            slot.outbox.push(message.into_variant());
        }
    }

    /// Create the subscription for `(receiver, M)` or extend its sender set
    pub fn subscribe<M: Message>(
        &mut self,
        receiver: Uid,
        senders: impl IntoIterator<Item = Uid>,
    ) -> &mut Subscription<M> {
        let senders: Vec<Uid> = senders.into_iter().collect();
        {
            let mut registry = self.registry.lock();
            if let Some(slot) = registry.get_mut(self.key) {
                slot.interests
                    .extend(senders.iter().map(|sender| (M::KIND, *sender)));
            }
        }

        let subscription = M::subscriptions_mut(&mut self.subscriptions)
            .entry(receiver)
            .or_insert_with(|| Subscription::new(receiver, []));
        subscription.add_senders(senders);
        subscription
    }

    /// Remove the subscription for `(receiver, M)`. Returns whether it existed.
    pub fn unsubscribe<M: Message>(&mut self, receiver: Uid) -> bool {
        let removed = M::subscriptions_mut(&mut self.subscriptions)
            .remove(&receiver)
            .is_some();
        if removed {
            let interests = self.subscriptions.interests();
            let mut registry = self.registry.lock();
            if let Some(slot) = registry.get_mut(self.key) {
                slot.interests = interests;
            }
        }
        removed
    }

    pub fn subscription<M: Message>(&self, receiver: Uid) -> Option<&Subscription<M>> {
        M::subscriptions(&self.subscriptions).get(&receiver)
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Move everything routed to this endpoint into its subscriptions.
    /// Messages from senders nobody subscribed to are dropped. Returns the
    /// number of messages drained from the inbox.
    pub fn receive_all(&mut self) -> usize {
        let inbox = {
            let mut registry = self.registry.lock();
            match registry.get_mut(self.key) {
                Some(slot) => std::mem::take(&mut slot.inbox),
                None => return 0,
            }
        };

        for message in &inbox {
            if self.subscriptions.offer(message) == 0 {
                trace!(
                    "[ENDPOINT] Dropped {:?} from unsubscribed sender {}",
                    message.kind(),
                    message.sender_uid()
                );
            }
        }
        inbox.len()
    }

    /// Drain the messages of type `M` buffered for `receiver`. Empty when no
    /// such subscription exists.
    pub fn unload_messages<M: Message>(&mut self, receiver: Uid) -> Vec<M> {
        M::subscriptions_mut(&mut self.subscriptions)
            .get_mut(&receiver)
            .map(Subscription::unload)
            .unwrap_or_default()
    }
}

impl Drop for Endpoint {
    fn drop(&mut self) {
        self.registry.lock().close(self.key);
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("slot", &self.key.index)
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}
