// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Appliance Search

use cim_inventory::{Appliance, EntityId, SearchQuery};
use proptest::prelude::*;

fn appliance() -> impl Strategy<Value = Appliance> {
    (
        "[A-Z]{3}-[0-9]{1,4}",
        "[a-zA-Z-]{1,12}",
        "[a-zA-Z ]{1,10}",
        "[0-9A-Z/]{1,4}",
    )
        .prop_map(|(inventory_number, network_name, housing_name, cabinet_name)| Appliance {
            id: EntityId::new(),
            inventory_number,
            type_name: "Switch".to_string(),
            network_name,
            housing_name,
            cabinet_name,
            ip_addresses: Vec::new(),
            comment: None,
        })
}

fn appliances() -> impl Strategy<Value = Vec<Appliance>> {
    prop::collection::vec(appliance(), 0..30)
}

proptest! {
    /// Property: Results are an ordered subsequence of the input
    #[test]
    fn prop_filter_is_ordered_subsequence(items in appliances(), text in "[a-zA-Z0-9]{0,3}") {
        let found = SearchQuery::new(&text).filter(&items);

        let mut remaining = items.iter();
        for hit in &found {
            prop_assert!(
                remaining.any(|candidate| candidate.id == hit.id),
                "Result {} out of input order or duplicated",
                hit.inventory_number
            );
        }
    }

    /// Property: Case-sensitive hits are a subset of case-insensitive hits
    #[test]
    fn prop_case_sensitive_narrows(items in appliances(), text in "[a-zA-Z0-9]{1,3}") {
        let loose = SearchQuery::new(&text).filter(&items);
        let strict = SearchQuery::new(&text).case_sensitive(true).filter(&items);

        prop_assert!(strict.len() <= loose.len());
        for hit in &strict {
            prop_assert!(loose.iter().any(|a| a.id == hit.id));
        }
    }

    /// Property: Query case does not matter by default
    #[test]
    fn prop_default_search_ignores_case(items in appliances(), text in "[a-zA-Z0-9]{1,3}") {
        let upper = SearchQuery::new(text.to_uppercase()).filter(&items);
        let lower = SearchQuery::new(text.to_lowercase()).filter(&items);

        prop_assert_eq!(upper, lower);
    }

    /// Property: An appliance always finds itself by inventory number
    #[test]
    fn prop_inventory_number_finds_itself(items in appliances().prop_filter("non-empty", |v| !v.is_empty())) {
        let target = &items[0];
        let found = SearchQuery::new(&target.inventory_number)
            .case_sensitive(true)
            .filter(&items);

        prop_assert!(found.iter().any(|a| a.id == target.id));
    }
}
