//! Property tests over the public client: filter conjunction, stable
//! ordering and pre-pagination counts.

use crate::test_utils::*;
use futures::executor::block_on;
use proptest::prelude::*;
use serde_json::json;
use std::future::IntoFuture;

fn load(cells: &[(i64, i64)]) -> hearth::Client {
    let client = empty_client();
    let rows: Vec<_> = cells
        .iter()
        .enumerate()
        .map(|(i, (x, y))| row(json!({"id": i as i64, "x": x, "y": y})))
        .collect();
    let resp = block_on(client.from("t").insert_many(rows).into_future());
    assert!(resp.is_ok(), "{:?}", resp.error);
    client
}

fn ids(rows: &[hearth::Row]) -> Vec<i64> {
    rows.iter().filter_map(|r| r["id"].as_i64()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_filters_match_every_condition(
        cells in prop::collection::vec((0i64..3, 0i64..3), 1..24),
        x in 0i64..3,
        y in 0i64..3,
    ) {
        let client = load(&cells);
        let resp = block_on(client.from("t").select_all().eq("x", x).eq("y", y).into_future());

        let expected: Vec<i64> = cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == (x, y))
            .map(|(i, _)| i as i64)
            .collect();
        prop_assert_eq!(ids(resp.rows()), expected);
    }

    #[test]
    fn prop_ordering_is_stable_and_count_precedes_paging(
        cells in prop::collection::vec((0i64..3, 0i64..3), 1..24),
        offset in 0usize..8,
    ) {
        let client = load(&cells);
        let resp = block_on(
            client
                .from("t")
                .select(["id"])
                .order("x", true)
                .range(offset, offset + 4)
                .count()
                .into_future(),
        );

        let mut expected: Vec<(i64, i64)> = cells
            .iter()
            .enumerate()
            .map(|(i, (x, _))| (*x, i as i64))
            .collect();
        expected.sort_by_key(|(x, _)| *x);
        let page: Vec<i64> = expected
            .iter()
            .skip(offset)
            .take(5)
            .map(|(_, id)| *id)
            .collect();

        prop_assert_eq!(resp.count, Some(cells.len()));
        prop_assert_eq!(ids(resp.rows()), page);
    }
}
