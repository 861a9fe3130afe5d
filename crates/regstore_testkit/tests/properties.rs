//! Property tests: random operation sequences against the reference model.

use proptest::prelude::*;
use regstore_core::{CoreError, Record, RecordStore};
use regstore_testkit::prelude::*;

proptest! {
    #![proptest_config(PropTestConfig::default().to_proptest_config())]

    #[test]
    fn views_match_model_after_every_step(ops in operation_sequence_strategy(1, 60)) {
        let mut harness = ModelHarness::new();
        harness.run(&ops);
    }

    #[test]
    fn reopened_store_lists_identically(ops in operation_sequence_strategy(1, 40)) {
        let mut harness = ModelHarness::new();
        harness.run(&ops);

        let original = harness.store();
        let reopened = harness.test.reopen();
        assert_views_agree(&reopened);

        prop_assert_eq!(listing_ids(original), listing_ids(&reopened));

        for record in original.list_by_insertion_order() {
            prop_assert_eq!(reopened.get(record.id()), Some(record));
            prop_assert_eq!(
                reopened.revision_depth(record.id()),
                original.revision_depth(record.id())
            );
        }
    }

    #[test]
    fn edit_then_undo_is_identity(
        first in valid_draft_strategy(),
        edits in prop::collection::vec(valid_draft_strategy(), 1..8),
    ) {
        let mut store = TestStore::memory();
        let id = store.store.submit(first).unwrap().into_value();
        store.verify(&id).unwrap();
        let before = store.get(&id).unwrap().clone();

        let mut states = vec![before.clone()];
        for draft in &edits {
            let after = store.edit(&id, draft.clone()).unwrap().into_value();
            states.push(after);
        }
        states.pop();

        while let Some(expected) = states.pop() {
            let restored = store.undo(&id).unwrap().into_value();
            prop_assert_eq!(&restored, &expected);
        }
        prop_assert_eq!(store.get(&id), Some(&before));
        prop_assert!(
            matches!(store.undo(&id), Err(CoreError::NoRevision { .. })),
            "undo past the first edit must fail"
        );
        assert_views_agree(&store);
    }
}

/// Ids in each of the four listing orders.
fn listing_ids(store: &RecordStore) -> [Vec<String>; 4] {
    fn ids(records: Vec<&Record>) -> Vec<String> {
        records.into_iter().map(|r| r.id().to_owned()).collect()
    }
    [
        ids(store.list_by_insertion_order().collect()),
        ids(store.list_by_name().collect()),
        ids(store.list_by_region()),
        ids(store.list_by_submission_time()),
    ]
}
