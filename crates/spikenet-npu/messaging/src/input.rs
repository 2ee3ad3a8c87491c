// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! External spike input
//!
//! An [`InputChannel`] owns an endpoint and a generator that produces the
//! neuron indexes to stimulate at a given step. A backend picks the spikes
//! up once a projection is subscribed to the channel's uid.

use spikenet_npu_neural::{Step, Uid};
use tracing::trace;

use crate::endpoint::Endpoint;
use crate::message::{MessageHeader, SpikeMessage};

/// Produces the neuron indexes that spike at a step
pub type SpikeGenerator = Box<dyn FnMut(Step) -> Vec<u32> + Send>;

pub struct InputChannel {
    uid: Uid,
    endpoint: Endpoint,
    generator: SpikeGenerator,
}

impl InputChannel {
    pub fn new(
        uid: Uid,
        endpoint: Endpoint,
        generator: impl FnMut(Step) -> Vec<u32> + Send + 'static,
    ) -> Self {
        Self {
            uid,
            endpoint,
            generator: Box::new(generator),
        }
    }

    /// Sender uid of every message this channel emits
    pub fn uid(&self) -> Uid {
        self.uid
    }

    /// Generate the spikes for `step` and buffer them on the endpoint.
    /// Nothing is sent for an empty spike set. Returns whether a message
    /// was sent.
    pub fn send(&mut self, step: Step) -> bool {
        let neuron_indexes = (self.generator)(step);
        if neuron_indexes.is_empty() {
            return false;
        }
        trace!(
            "[INPUT] Channel {} sends {} spike(s) at step {}",
            self.uid,
            neuron_indexes.len(),
            step
        );
        self.endpoint.send(SpikeMessage {
            header: MessageHeader {
                sender_uid: self.uid,
                send_time: step,
            },
            neuron_indexes,
        });
        true
    }
}

impl std::fmt::Debug for InputChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputChannel")
            .field("uid", &self.uid)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MessageBus;

    #[test]
    fn test_channel_sends_generated_spikes() {
        let bus = MessageBus::new();
        let channel_uid = Uid::new();
        let receiver = Uid::new();

        let mut channel = InputChannel::new(channel_uid, bus.create_endpoint(), |step| vec![1, 2, step as u32]);
        let mut sink = bus.create_endpoint();
        sink.subscribe::<SpikeMessage>(receiver, [channel.uid()]);

        assert!(channel.send(10));
        assert_eq!(bus.route_messages(), 1);
        sink.receive_all();

        let received = sink.unload_messages::<SpikeMessage>(receiver);
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].header.sender_uid, channel_uid);
        assert_eq!(received[0].header.send_time, 10);
        assert_eq!(received[0].neuron_indexes, vec![1, 2, 10]);
    }

    #[test]
    fn test_empty_spike_set_is_not_sent() {
        let bus = MessageBus::new();
        let receiver = Uid::new();
        let mut channel = InputChannel::new(Uid::new(), bus.create_endpoint(), |step| {
            if step % 2 == 0 {
                vec![0]
            } else {
                Vec::new()
            }
        });
        let mut sink = bus.create_endpoint();
        sink.subscribe::<SpikeMessage>(receiver, [channel.uid()]);

        assert!(!channel.send(1));
        assert_eq!(bus.route_messages(), 0);
        assert!(channel.send(2));
        assert_eq!(bus.route_messages(), 1);
        sink.receive_all();
        assert_eq!(sink.unload_messages::<SpikeMessage>(receiver)[0].header.send_time, 2);
    }
}
