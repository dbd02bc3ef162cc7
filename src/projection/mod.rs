// Copyright (c) 2025 - Cowboy AI, Inc.
//! Read-Side Projections
//!
//! Appliances are flattened, read-only views built on demand from the
//! relational inventory state. They are never persisted.
//!
//! ```text
//! Device + DeviceType + Placement + [IpAddress] ──assemble──> Appliance
//!                                                               │
//!                                          SearchQuery::filter ─┘
//! ```

pub mod appliance;
pub mod search;

pub use appliance::{assemble_appliance, Appliance};
pub use search::SearchQuery;
