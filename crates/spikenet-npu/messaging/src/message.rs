// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Message types exchanged over the bus

use serde::{Deserialize, Serialize};
use spikenet_npu_neural::{OutputType, Step, Uid};

use ahash::AHashMap;

use crate::subscription::{Subscription, SubscriptionSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHeader {
    pub sender_uid: Uid,
    pub send_time: Step,
}

/// Indexes of the neurons of `header.sender_uid` that fired at `send_time`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpikeMessage {
    pub header: MessageHeader,
    pub neuron_indexes: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynapticImpact {
    pub amplitude: f32,
    pub synapse_index: u32,
    pub postsynaptic_neuron_index: u32,
}

/// Impacts sent by a projection to its postsynaptic population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynapticImpactMessage {
    pub header: MessageHeader,
    /// `None` when the projection is fed by external input
    pub presynaptic_population_uid: Option<Uid>,
    pub postsynaptic_population_uid: Uid,
    pub output_type: OutputType,
    pub impacts: Vec<SynapticImpact>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    Spike,
    SynapticImpact,
}

/// Closed set of messages the bus can carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MessageVariant {
    Spike(SpikeMessage),
    SynapticImpact(SynapticImpactMessage),
}

impl MessageVariant {
    pub fn kind(&self) -> MessageKind {
        match self {
            MessageVariant::Spike(_) => MessageKind::Spike,
            MessageVariant::SynapticImpact(_) => MessageKind::SynapticImpact,
        }
    }

    pub fn header(&self) -> &MessageHeader {
        match self {
            MessageVariant::Spike(m) => &m.header,
            MessageVariant::SynapticImpact(m) => &m.header,
        }
    }

    pub fn sender_uid(&self) -> Uid {
        self.header().sender_uid
    }
}

/// Typed view over one [`MessageVariant`] alternative
pub trait Message: Clone + Send + Sync + 'static {
    const KIND: MessageKind;

    fn header(&self) -> &MessageHeader;

    fn into_variant(self) -> MessageVariant;

    fn from_variant(variant: &MessageVariant) -> Option<&Self>;

    /// Subscriptions for this message type, keyed by receiver
    fn subscriptions(set: &SubscriptionSet) -> &AHashMap<Uid, Subscription<Self>>;

    fn subscriptions_mut(set: &mut SubscriptionSet) -> &mut AHashMap<Uid, Subscription<Self>>;
}

macro_rules! impl_message {
    ($message:ty, $variant:ident, $field:ident) => {
        impl Message for $message {
            const KIND: MessageKind = MessageKind::$variant;

            fn header(&self) -> &MessageHeader {
                &self.header
            }

            fn into_variant(self) -> MessageVariant {
                MessageVariant::$variant(self)
            }

            fn from_variant(variant: &MessageVariant) -> Option<&Self> {
                match variant {
                    MessageVariant::$variant(m) => Some(m),
                    _ => None,
                }
            }

            fn subscriptions(set: &SubscriptionSet) -> &AHashMap<Uid, Subscription<Self>> {
                &set.$field
            }

            fn subscriptions_mut(
                set: &mut SubscriptionSet,
            ) -> &mut AHashMap<Uid, Subscription<Self>> {
                &mut set.$field
            }
        }

        impl From<$message> for MessageVariant {
            fn from(message: $message) -> Self {
                MessageVariant::$variant(message)
            }
        }
    };
}

impl_message!(SpikeMessage, Spike, spike);
impl_message!(SynapticImpactMessage, SynapticImpact, synaptic_impact);
