// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use ahash::{AHashMap, AHashSet};
use spikenet_npu_neural::Uid;

use crate::message::{Message, MessageKind, MessageVariant, SpikeMessage, SynapticImpactMessage};

/// Buffer of messages of type `M` accepted by one receiver from an
/// allow-list of senders
#[derive(Debug, Clone)]
pub struct Subscription<M> {
    receiver_uid: Uid,
    senders: AHashSet<Uid>,
    messages: Vec<M>,
}

impl<M: Message> Subscription<M> {
    pub fn new(receiver_uid: Uid, senders: impl IntoIterator<Item = Uid>) -> Self {
        Self {
            receiver_uid,
            senders: senders.into_iter().collect(),
            messages: Vec::new(),
        }
    }

    pub fn receiver_uid(&self) -> Uid {
        self.receiver_uid
    }

    pub fn senders(&self) -> &AHashSet<Uid> {
        &self.senders
    }

    pub fn has_sender(&self, sender: &Uid) -> bool {
        self.senders.contains(sender)
    }

    /// Returns the number of senders that were not already allowed
    pub fn add_senders(&mut self, senders: impl IntoIterator<Item = Uid>) -> usize {
        senders
            .into_iter()
            .filter(|sender| self.senders.insert(*sender))
            .count()
    }

    pub fn remove_sender(&mut self, sender: &Uid) -> bool {
        self.senders.remove(sender)
    }

    pub fn add_message(&mut self, message: M) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[M] {
        &self.messages
    }

    /// Drain the buffer. A second call without an intervening receive
    /// returns an empty vector.
    pub fn unload(&mut self) -> Vec<M> {
        std::mem::take(&mut self.messages)
    }
}

/// All subscriptions of one endpoint, one map per [`MessageKind`]
#[derive(Debug, Clone, Default)]
pub struct SubscriptionSet {
    pub(crate) spike: AHashMap<Uid, Subscription<SpikeMessage>>,
    pub(crate) synaptic_impact: AHashMap<Uid, Subscription<SynapticImpactMessage>>,
}

impl SubscriptionSet {
    pub fn len(&self) -> usize {
        self.spike.len() + self.synaptic_impact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy `message` into every subscription of its kind that allows its
    /// sender. Returns the number of subscriptions that accepted it.
    pub fn offer(&mut self, message: &MessageVariant) -> usize {
        match message {
            MessageVariant::Spike(m) => offer_to(&mut self.spike, m),
            MessageVariant::SynapticImpact(m) => offer_to(&mut self.synaptic_impact, m),
        }
    }

    /// Union of `(kind, sender)` over every subscription
    pub fn interests(&self) -> AHashSet<(MessageKind, Uid)> {
        let spikes = self
            .spike
            .values()
            .flat_map(|s| s.senders().iter().map(|sender| (MessageKind::Spike, *sender)));
        let impacts = self.synaptic_impact.values().flat_map(|s| {
            s.senders()
                .iter()
                .map(|sender| (MessageKind::SynapticImpact, *sender))
        });
        spikes.chain(impacts).collect()
    }
}

fn offer_to<M: Message>(subscriptions: &mut AHashMap<Uid, Subscription<M>>, message: &M) -> usize {
    let sender = message.header().sender_uid;
    let mut accepted = 0;
    for subscription in subscriptions.values_mut() {
        if subscription.has_sender(&sender) {
            subscription.add_message(message.clone());
            accepted += 1;
        }
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageHeader;

    fn spike(sender: Uid, step: u64) -> SpikeMessage {
        SpikeMessage {
            header: MessageHeader {
                sender_uid: sender,
                send_time: step,
            },
            neuron_indexes: vec![0, 2],
        }
    }

    #[test]
    fn test_unload_is_idempotent() {
        let sender = Uid::new();
        let mut subscription = Subscription::<SpikeMessage>::new(Uid::new(), [sender]);
        subscription.add_message(spike(sender, 1));
        assert_eq!(subscription.unload().len(), 1);
        assert!(subscription.unload().is_empty());
    }

    #[test]
    fn test_add_senders_counts_new_only() {
        let a = Uid::new();
        let b = Uid::new();
        let mut subscription = Subscription::<SpikeMessage>::new(Uid::new(), [a]);
        assert_eq!(subscription.add_senders([a, b]), 1);
        assert!(subscription.has_sender(&b));
    }

    #[test]
    fn test_offer_filters_sender_and_kind() {
        let allowed = Uid::new();
        let receiver = Uid::new();
        let mut set = SubscriptionSet::default();
        set.spike
            .insert(receiver, Subscription::new(receiver, [allowed]));

        assert_eq!(set.offer(&spike(allowed, 0).into()), 1);
        assert_eq!(set.offer(&spike(Uid::new(), 0).into()), 0);
        let impact = SynapticImpactMessage {
            header: MessageHeader {
                sender_uid: allowed,
                send_time: 0,
            },
            presynaptic_population_uid: None,
            postsynaptic_population_uid: receiver,
            output_type: Default::default(),
            impacts: Vec::new(),
        };
        assert_eq!(set.offer(&impact.into()), 0);
        assert_eq!(set.spike[&receiver].messages().len(), 1);
        assert!(set
            .interests()
            .contains(&(MessageKind::Spike, allowed)));
    }
}
