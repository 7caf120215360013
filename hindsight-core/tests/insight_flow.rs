//! Integration tests for insight curation
//!
//! Drives the insight store through the revision sequences an extraction
//! pass produces: batches of ADD / AGREE / EDIT / REMOVE operations with
//! the loose text matching a language model's echoes require.

use hindsight_core::{InsightStore, OpOutcome, Operation, SkipReason};

#[test]
fn revision_sequence_builds_and_reshapes_the_list() {
    let mut store = InsightStore::new(10);

    let stats = store.apply_all(&[
        Operation::Add("Verify the retrieved passage actually answers the question.".into()),
        Operation::Add("Prefer searching over guessing when unsure.".into()),
        Operation::Agree("Prefer searching over guessing when unsure.".into()),
        Operation::Edit {
            position: 1,
            text: "Verify the passage answers the question before finishing.".into(),
        },
    ]);

    assert_eq!(stats.applied, 4);
    assert_eq!(stats.skipped, 0);
    assert_eq!(stats.failed, 0);

    assert_eq!(store.len(), 2);
    assert_eq!(
        store.entries()[0].text,
        "Verify the passage answers the question before finishing."
    );
    // Edits keep the score; agreements raise it.
    assert_eq!(store.entries()[0].score, 2);
    assert_eq!(store.entries()[1].score, 3);
}

#[test]
fn removal_shifts_numbering_for_later_edits() {
    let mut store = InsightStore::new(10);
    store.apply_all(&[
        Operation::Add("First rule.".into()),
        Operation::Add("Second rule.".into()),
        Operation::Add("Third rule.".into()),
    ]);

    store
        .apply(&Operation::Remove("First rule.".into()))
        .unwrap();

    // Position 1 now addresses what used to be the second rule.
    store
        .apply(&Operation::Edit {
            position: 1,
            text: "Second rule, sharpened.".into(),
        })
        .unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(store.entries()[0].text, "Second rule, sharpened.");
    assert_eq!(store.entries()[1].text, "Third rule.");
    assert_eq!(store.numbered_list(), "1. Second rule, sharpened.\n2. Third rule.");
}

#[test]
fn capacity_blocks_adds_but_not_other_operations() {
    let mut store = InsightStore::new(2);
    store.apply_all(&[
        Operation::Add("Cite the observation when finishing.".into()),
        Operation::Add("Break compound questions into parts.".into()),
    ]);
    assert!(store.at_capacity());

    let outcome = store
        .apply(&Operation::Add("A third rule that no longer fits.".into()))
        .unwrap();
    assert_eq!(outcome, OpOutcome::Skipped(SkipReason::AtCapacity));
    assert_eq!(store.len(), 2);

    // Agreement and editing still work at capacity.
    assert_eq!(
        store
            .apply(&Operation::Agree("Cite the observation when finishing.".into()))
            .unwrap(),
        OpOutcome::Applied
    );
    assert_eq!(
        store
            .apply(&Operation::Edit {
                position: 2,
                text: "Split compound questions and solve each part.".into(),
            })
            .unwrap(),
        OpOutcome::Applied
    );
    assert_eq!(store.entries()[0].score, 3);
}

#[test]
fn loose_matching_tolerates_model_echoes() {
    let mut store = InsightStore::new(10);
    store
        .apply(&Operation::Add(
            "Ground every answer in a retrieved observation.".into(),
        ))
        .unwrap();

    // Extra whitespace and truncation still find the stored insight.
    assert_eq!(
        store
            .apply(&Operation::Agree(
                "Ground  every answer in a   retrieved observation.".into()
            ))
            .unwrap(),
        OpOutcome::Applied
    );
    assert_eq!(
        store
            .apply(&Operation::Agree("Ground every answer".into()))
            .unwrap(),
        OpOutcome::Applied
    );
    assert_eq!(store.entries()[0].score, 4);

    // Unrelated text is skipped rather than failing the batch.
    let stats = store.apply_all(&[Operation::Remove("Some rule never stored.".into())]);
    assert_eq!(stats.skipped, 1);
    assert_eq!(store.len(), 1);
}

#[test]
fn malformed_edits_fail_without_aborting_the_batch() {
    let mut store = InsightStore::new(10);

    let stats = store.apply_all(&[
        Operation::Add("Keep answers short and literal.".into()),
        Operation::Edit {
            position: 5,
            text: "Edit of a position that does not exist.".into(),
        },
        Operation::Agree("Keep answers short and literal.".into()),
    ]);

    assert_eq!(stats.applied, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(store.entries()[0].score, 3);
}
