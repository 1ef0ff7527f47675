use std::sync::Arc;

use super::*;
use crate::test_utils;
use crate::Error;
use crate::MockJournalStore;
use crate::MockSnapshotStore;
use crate::PersistenceId;
use crate::SnapshotSelectionCriteria;
use crate::StoreError;

fn setup(
    journal: MockJournalStore,
    snapshots: MockSnapshotStore,
) -> DefaultEraser {
    DefaultEraser::new(Arc::new(journal), Arc::new(snapshots))
}

// Case 1: no snapshot detected
//
// ## Setup:
// - probe reports no snapshot
//
// ## Criterias:
// - only the journal deletion is issued, up to the maximum sequence number
// - outcome records journal removed, snapshots untouched
#[tokio::test]
async fn test_erase_case1() {
    test_utils::enable_logger();
    let id = PersistenceId::for_type_name("customer");

    let mut journal = MockJournalStore::new();
    journal
        .expect_delete_messages_up_to()
        .withf(|_, to| *to == u64::MAX)
        .times(1)
        .returning(|_, _| Ok(()));

    let mut snapshots = MockSnapshotStore::new();
    snapshots.expect_has_snapshot().times(1).returning(|_| Ok(false));
    snapshots.expect_delete_matching().times(0);

    let removals = setup(journal, snapshots).erase(&id).await.expect("should succeed");
    assert!(removals.journal_removed);
    assert!(!removals.snapshots_removed);
}

// Case 2: snapshot detected
//
// ## Setup:
// - probe reports a snapshot
//
// ## Criterias:
// - journal and snapshot deletions are both issued
// - snapshot deletion covers all timestamps and sequence numbers
// - outcome records both categories removed
#[tokio::test]
async fn test_erase_case2() {
    let id = PersistenceId::for_type_name("customer");

    let mut journal = MockJournalStore::new();
    journal
        .expect_delete_messages_up_to()
        .times(1)
        .returning(|_, _| Ok(()));

    let mut snapshots = MockSnapshotStore::new();
    snapshots.expect_has_snapshot().times(1).returning(|_| Ok(true));
    snapshots
        .expect_delete_matching()
        .withf(|_, criteria| *criteria == SnapshotSelectionCriteria::all())
        .times(1)
        .returning(|_, _| Ok(()));

    let removals = setup(journal, snapshots).erase(&id).await.expect("should succeed");
    assert!(removals.journal_removed);
    assert!(removals.snapshots_removed);
}

// Case 3: journal deletion fails
//
// ## Criterias:
// - the failure surfaces as the run's result
#[tokio::test]
async fn test_erase_case3() {
    let id = PersistenceId::for_type_name("customer");

    let mut journal = MockJournalStore::new();
    journal
        .expect_delete_messages_up_to()
        .times(1)
        .returning(|_, _| Err(StoreError::Journal("disk gone".into()).into()));

    let mut snapshots = MockSnapshotStore::new();
    snapshots.expect_has_snapshot().times(1).returning(|_| Ok(false));

    let err = setup(journal, snapshots).erase(&id).await.expect_err("should fail");
    assert!(matches!(err, Error::Store(StoreError::Journal(_))));
}

// Case 4: snapshot deletion fails while the journal deletion succeeds
//
// ## Criterias:
// - the snapshot failure wins and terminates the run
#[tokio::test]
async fn test_erase_case4() {
    let id = PersistenceId::for_type_name("customer");

    let mut journal = MockJournalStore::new();
    journal.expect_delete_messages_up_to().returning(|_, _| Ok(()));

    let mut snapshots = MockSnapshotStore::new();
    snapshots.expect_has_snapshot().times(1).returning(|_| Ok(true));
    snapshots
        .expect_delete_matching()
        .times(1)
        .returning(|_, _| Err(StoreError::Snapshot("rejected".into()).into()));

    let err = setup(journal, snapshots).erase(&id).await.expect_err("should fail");
    assert!(matches!(err, Error::Store(StoreError::Snapshot(_))));
}

// Case 5: the probe itself fails
//
// ## Criterias:
// - no deletion is issued at all
#[tokio::test]
async fn test_erase_case5() {
    let id = PersistenceId::for_type_name("customer");

    let mut journal = MockJournalStore::new();
    journal.expect_delete_messages_up_to().times(0);

    let mut snapshots = MockSnapshotStore::new();
    snapshots
        .expect_has_snapshot()
        .times(1)
        .returning(|_| Err(StoreError::Snapshot("probe failed".into()).into()));
    snapshots.expect_delete_matching().times(0);

    setup(journal, snapshots).erase(&id).await.expect_err("should fail");
}
