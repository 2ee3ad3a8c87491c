// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Message Bus
//!
//! Endpoints live in a slot table guarded by one coarse lock. Each slot
//! carries a generation so an [`EndpointKey`] held by a dropped endpoint can
//! never reach a newer endpoint that reused the slot. Dropped endpoints only
//! mark their slot closed; the bus prunes closed slots on its next pass.
//!
//! Routing drains the pending queue from the back (last sent, first
//! delivered). Backends never depend on delivery order across senders.

use std::sync::Arc;

use ahash::AHashSet;
use parking_lot::Mutex;
use spikenet_npu_neural::Uid;
use tracing::{debug, trace};

use crate::endpoint::Endpoint;
use crate::message::{MessageKind, MessageVariant};

/// Generation-checked handle to a registry slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EndpointKey {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

#[derive(Debug, Default)]
pub(crate) struct EndpointSlot {
    pub(crate) closed: bool,
    pub(crate) outbox: Vec<MessageVariant>,
    pub(crate) inbox: Vec<MessageVariant>,
    /// Union of `(kind, sender)` over the endpoint's subscriptions
    pub(crate) interests: AHashSet<(MessageKind, Uid)>,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    state: Option<EndpointSlot>,
}

#[derive(Debug, Default)]
pub(crate) struct Registry {
    slots: Vec<Slot>,
    free: Vec<usize>,
    pending: Vec<MessageVariant>,
}

impl Registry {
    fn insert(&mut self) -> EndpointKey {
        self.prune_closed();
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                self.slots.len() - 1
            }
        };
        let slot = &mut self.slots[index];
        slot.state = Some(EndpointSlot::default());
        EndpointKey {
            index,
            generation: slot.generation,
        }
    }

    pub(crate) fn get_mut(&mut self, key: EndpointKey) -> Option<&mut EndpointSlot> {
        self.slots
            .get_mut(key.index)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.state.as_mut())
    }

    pub(crate) fn close(&mut self, key: EndpointKey) {
        if let Some(slot) = self.get_mut(key) {
            slot.closed = true;
            slot.inbox.clear();
            slot.interests.clear();
        }
    }

    fn prune_closed(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let closed = slot.state.as_ref().map(|s| s.closed).unwrap_or(false);
            if closed {
                slot.state = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index);
            }
        }
    }

    fn collect_outboxes(&mut self) {
        for slot in self.slots.iter_mut() {
            if let Some(state) = slot.state.as_mut() {
                self.pending.append(&mut state.outbox);
            }
        }
    }

    fn deliver(&mut self, message: MessageVariant) -> usize {
        let interest = (message.kind(), message.sender_uid());
        let mut deliveries = 0;
        for state in self.slots.iter_mut().filter_map(|slot| slot.state.as_mut()) {
            if !state.closed && state.interests.contains(&interest) {
                state.inbox.push(message.clone());
                deliveries += 1;
            }
        }
        trace!(
            "[MESSAGE-BUS] {:?} from {} delivered to {} endpoint(s)",
            interest.0,
            interest.1,
            deliveries
        );
        deliveries
    }

    fn live_endpoints(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.state.as_ref().map(|s| !s.closed).unwrap_or(false))
            .count()
    }
}

/// Routes messages between endpoints. Cloning yields another handle to the
/// same bus.
#[derive(Debug, Clone, Default)]
pub struct MessageBus {
    registry: Arc<Mutex<Registry>>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new endpoint on this bus
    pub fn create_endpoint(&self) -> Endpoint {
        let key = self.registry.lock().insert();
        debug!("[MESSAGE-BUS] Created endpoint in slot {}", key.index);
        Endpoint::new(Arc::clone(&self.registry), key)
    }

    /// Deliver every pending message. Returns the number of deliveries
    /// (a message reaching two endpoints counts twice).
    pub fn route_messages(&self) -> usize {
        let mut registry = self.registry.lock();
        registry.collect_outboxes();
        if registry.pending.is_empty() {
            return 0;
        }
        registry.prune_closed();

        let mut deliveries = 0;
        while let Some(message) = registry.pending.pop() {
            deliveries += registry.deliver(message);
        }
        deliveries
    }

    /// Deliver a single pending message. Returns its number of deliveries,
    /// 0 when nothing is pending.
    pub fn step(&self) -> usize {
        let mut registry = self.registry.lock();
        registry.collect_outboxes();
        match registry.pending.pop() {
            Some(message) => registry.deliver(message),
            None => 0,
        }
    }

    /// Messages collected from outboxes but not yet delivered
    pub fn pending_count(&self) -> usize {
        self.registry.lock().pending.len()
    }

    pub fn endpoint_count(&self) -> usize {
        self.registry.lock().live_endpoints()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{MessageHeader, SpikeMessage};

    fn spike(sender: Uid) -> SpikeMessage {
        SpikeMessage {
            header: MessageHeader {
                sender_uid: sender,
                send_time: 0,
            },
            neuron_indexes: vec![1],
        }
    }

    #[test]
    fn test_route_on_empty_queue_returns_zero() {
        let bus = MessageBus::new();
        let _endpoint = bus.create_endpoint();
        assert_eq!(bus.route_messages(), 0);
        assert_eq!(bus.step(), 0);
    }

    #[test]
    fn test_dropped_endpoint_slot_is_reused_with_new_generation() {
        let bus = MessageBus::new();
        let first = bus.create_endpoint();
        let first_key = first.key();
        drop(first);
        assert_eq!(bus.endpoint_count(), 0);

        let second = bus.create_endpoint();
        assert_eq!(second.key().index, first_key.index);
        assert_ne!(second.key().generation, first_key.generation);
        assert!(bus.registry.lock().get_mut(first_key).is_none());
    }

    #[test]
    fn test_step_routes_one_message_lifo() {
        let bus = MessageBus::new();
        let sender_a = Uid::new();
        let sender_b = Uid::new();
        let receiver = Uid::new();

        let mut observer = bus.create_endpoint();
        observer.subscribe::<SpikeMessage>(receiver, [sender_a, sender_b]);

        let source = bus.create_endpoint();
        source.send(spike(sender_a));
        source.send(spike(sender_b));

        assert_eq!(bus.step(), 1);
        assert_eq!(bus.pending_count(), 1);
        observer.receive_all();
        let first = observer.unload_messages::<SpikeMessage>(receiver);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].header.sender_uid, sender_b);

        assert_eq!(bus.route_messages(), 1);
        observer.receive_all();
        let second = observer.unload_messages::<SpikeMessage>(receiver);
        assert_eq!(second[0].header.sender_uid, sender_a);
    }
}
