// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # spikenet Messaging
//!
//! Populations, projections and external observers never call each other
//! directly. They exchange [`SpikeMessage`]s and [`SynapticImpactMessage`]s
//! through a [`MessageBus`]:
//!
//! 1. An [`Endpoint`] buffers outgoing messages with `send`
//! 2. `MessageBus::route_messages` copies every pending message into the
//!    inbox of each endpoint that subscribed to its `(kind, sender)`
//! 3. `Endpoint::receive_all` moves the inbox into typed [`Subscription`]s
//! 4. The receiver drains its subscription with `unload_messages`
//!
//! Nothing is delivered between routing passes, which gives the backends
//! their phase barrier semantics.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod bus;
pub mod endpoint;
pub mod input;
pub mod message;
pub mod subscription;

pub use bus::MessageBus;
pub use endpoint::Endpoint;
pub use input::{InputChannel, SpikeGenerator};
pub use message::{
    Message, MessageHeader, MessageKind, MessageVariant, SpikeMessage, SynapticImpact,
    SynapticImpactMessage,
};
pub use subscription::{Subscription, SubscriptionSet};
