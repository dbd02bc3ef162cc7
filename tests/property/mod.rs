// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Location history and search properties over generated operation sequences.

mod location_history;
mod search;
