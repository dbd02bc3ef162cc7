// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Device Placement
//!
//! Generated move sequences are replayed against a fresh inventory. The
//! current placement must always be the last cabinet moved to and the
//! history must keep every record in sequence order.

use cim_inventory::{DeviceUpdate, DevicesManager};
use proptest::prelude::*;

use crate::fixtures::inventory;

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Cabinet picks: 0 = unassigned, 1 = Main/12, 2 = Second/3
fn move_sequence() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..3, 0..20)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: The current cabinet is the last cabinet moved to
    ///
    /// With no moves the device stays in the unassigned cabinet.
    #[test]
    fn prop_current_cabinet_is_last_move(moves in move_sequence()) {
        let (expected, actual) = tokio_test::block_on(async {
            let inv = inventory().await;
            inv.add_computer("INV-1", "NET-1").await;
            let cabinets = [
                inv.unassigned.cabinet.clone(),
                inv.main_cabinet.clone(),
                inv.second_cabinet.clone(),
            ];

            let mut expected = inv.unassigned.cabinet.clone();
            for pick in &moves {
                let cabinet = &cabinets[usize::from(*pick)];
                inv.devices.move_device("INV-1", cabinet.id).await.unwrap();
                expected = cabinet.clone();
            }

            let placement = inv.devices.get_device_cabinet("INV-1").await.unwrap();
            (expected, placement.cabinet)
        });

        prop_assert_eq!(expected, actual, "Current cabinet must be the last one moved to");
    }

    /// Property: History grows by exactly one record per move
    ///
    /// Sequences are contiguous from 1 and earlier records are never altered.
    #[test]
    fn prop_history_is_append_only(moves in move_sequence()) {
        let (history, snapshots) = tokio_test::block_on(async {
            let inv = inventory().await;
            inv.add_computer("INV-1", "NET-1").await;
            let cabinets = [
                inv.unassigned.cabinet.id,
                inv.main_cabinet.id,
                inv.second_cabinet.id,
            ];

            let mut snapshots = Vec::new();
            for pick in &moves {
                snapshots.push(inv.devices.get_location_history("INV-1").await.unwrap());
                inv.devices
                    .move_device("INV-1", cabinets[usize::from(*pick)])
                    .await
                    .unwrap();
            }
            (inv.devices.get_location_history("INV-1").await.unwrap(), snapshots)
        });

        prop_assert_eq!(history.len(), moves.len() + 1);
        for (index, record) in history.iter().enumerate() {
            prop_assert_eq!(record.sequence, index as u64 + 1);
        }
        for earlier in snapshots {
            prop_assert_eq!(&history[..earlier.len()], earlier.as_slice());
        }
    }

    /// Property: Updates never touch placement
    #[test]
    fn prop_update_keeps_placement(
        moves in move_sequence(),
        network_name in "[a-z]{1,8}-[0-9]{1,3}",
    ) {
        let (before, after) = tokio_test::block_on(async {
            let inv = inventory().await;
            inv.add_computer("INV-1", "NET-1").await;
            for pick in &moves {
                let cabinet_id = match pick {
                    1 => inv.main_cabinet.id,
                    2 => inv.second_cabinet.id,
                    _ => inv.unassigned.cabinet.id,
                };
                inv.devices.move_device("INV-1", cabinet_id).await.unwrap();
            }

            let before = inv.devices.get_device_cabinet("INV-1").await.unwrap();
            inv.devices
                .update_device("INV-1", DeviceUpdate::new().network_name(network_name.clone()))
                .await
                .unwrap();
            let after = inv.devices.get_device_cabinet("INV-1").await.unwrap();
            (before, after)
        });

        prop_assert_eq!(before, after);
    }
}
