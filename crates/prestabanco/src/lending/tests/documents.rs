use std::collections::HashSet;
use std::sync::Arc;

use super::common::*;
use crate::lending::documents::{
    DocumentError, DocumentLifecycleManager, DocumentPatch, LifecycleConfig, TransitionPolicy,
};
use crate::lending::domain::{
    ApplicationId, DocumentId, DocumentStatus, DocumentType, LoanCategory,
};
use crate::lending::store::{ApplicationStore, DocumentStore, StoreError};

#[test]
fn create_registers_pending_document_with_fresh_id() {
    let (manager, store) = lifecycle();
    let application = open_application(&store, LoanCategory::FirstHome);

    let mut seen = HashSet::new();
    for document_type in DocumentType::ALL {
        let record = upload(&manager, application.id, document_type);
        assert_eq!(record.status, DocumentStatus::Pending);
        assert_eq!(record.document_type, document_type);
        assert_eq!(record.application_id, application.id);
        assert_eq!(record.version, 1);
        assert!(seen.insert(record.id), "ids must be unique");
    }
}

#[test]
fn create_rejects_unknown_application_without_persisting() {
    let (manager, store) = lifecycle();

    match manager.create(
        ApplicationId(77),
        DocumentType::IncomeProof,
        "income_2024.pdf",
        "https://storage.example.com/docs/income_2024.pdf",
    ) {
        Err(DocumentError::UnknownApplication(ApplicationId(77))) => {}
        other => panic!("expected unknown application, got {other:?}"),
    }
    assert_eq!(store.document_count().expect("count"), 0);
}

#[test]
fn create_requires_file_metadata() {
    let (manager, store) = lifecycle();
    let application = open_application(&store, LoanCategory::FirstHome);

    match manager.create(application.id, DocumentType::CreditHistory, "  ", "https://x") {
        Err(DocumentError::EmptyField("file_name")) => {}
        other => panic!("expected empty file name, got {other:?}"),
    }
    match manager.create(application.id, DocumentType::CreditHistory, "report.pdf", "") {
        Err(DocumentError::EmptyField("file_url")) => {}
        other => panic!("expected empty file url, got {other:?}"),
    }
}

#[test]
fn get_reports_missing_document() {
    let (manager, _) = lifecycle();
    match manager.get(DocumentId(99)) {
        Err(DocumentError::NotFound(DocumentId(99))) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn list_for_application_keeps_upload_order_and_scopes_by_owner() {
    let (manager, store) = lifecycle();
    let first = open_application(&store, LoanCategory::Commercial);
    let second = open_application(&store, LoanCategory::Remodeling);

    let plan = upload(&manager, first.id, DocumentType::BusinessPlan);
    upload(&manager, second.id, DocumentType::RemodelingBudget);
    let statement = upload(&manager, first.id, DocumentType::BusinessFinancialStatement);

    let listed: Vec<_> = manager
        .list_for_application(first.id)
        .expect("list documents")
        .into_iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(listed, vec![plan.id, statement.id]);

    let unknown = manager
        .list_for_application(ApplicationId(404))
        .expect("unknown application lists nothing");
    assert!(unknown.is_empty());
}

#[test]
fn approving_twice_is_idempotent() {
    let (manager, store) = lifecycle();
    let application = open_application(&store, LoanCategory::FirstHome);
    let record = upload(&manager, application.id, DocumentType::FirstHomeDeed);

    let approved = manager
        .update(record.id, DocumentPatch::status(DocumentStatus::Approved))
        .expect("approve");
    let again = manager
        .update(record.id, DocumentPatch::status(DocumentStatus::Approved))
        .expect("approve again");

    assert_eq!(approved.status, DocumentStatus::Approved);
    assert_eq!(again.status, DocumentStatus::Approved);
    assert_eq!(
        manager.get(record.id).expect("fetch").status,
        DocumentStatus::Approved
    );
}

#[test]
fn update_keeps_identity_and_upload_date() {
    let (manager, store) = lifecycle();
    let application = open_application(&store, LoanCategory::FirstHome);
    let record = upload(&manager, application.id, DocumentType::IncomeProof);

    let updated = manager
        .update(
            record.id,
            DocumentPatch {
                file_name: Some("income_2025.pdf".to_string()),
                file_url: Some("https://storage.example.com/docs/income_2025.pdf".to_string()),
                ..DocumentPatch::default()
            },
        )
        .expect("update metadata");

    assert_eq!(updated.id, record.id);
    assert_eq!(updated.application_id, application.id);
    assert_eq!(updated.document_type, DocumentType::IncomeProof);
    assert_eq!(updated.upload_date, record.upload_date);
    assert_eq!(updated.status, DocumentStatus::Pending);
    assert_eq!(updated.file_name, "income_2025.pdf");
    assert_eq!(updated.version, record.version + 1);
}

#[test]
fn update_unknown_document_is_not_found() {
    let (manager, _) = lifecycle();
    match manager.update(DocumentId(9999), DocumentPatch::status(DocumentStatus::Approved)) {
        Err(DocumentError::NotFound(DocumentId(9999))) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn strict_policy_refuses_leaving_terminal_status() {
    let (manager, store) = lifecycle();
    let application = open_application(&store, LoanCategory::FirstHome);
    let record = upload(&manager, application.id, DocumentType::AppraisalCertificate);
    manager
        .update(record.id, DocumentPatch::status(DocumentStatus::Approved))
        .expect("approve");

    match manager.update(record.id, DocumentPatch::status(DocumentStatus::Rejected)) {
        Err(DocumentError::InvalidTransition { from, to, .. }) => {
            assert_eq!(from, DocumentStatus::Approved);
            assert_eq!(to, DocumentStatus::Rejected);
        }
        other => panic!("expected invalid transition, got {other:?}"),
    }
    assert_eq!(
        manager.get(record.id).expect("fetch").status,
        DocumentStatus::Approved
    );
}

#[test]
fn permissive_policy_allows_reopening() {
    let (manager, store) = lifecycle_with(LifecycleConfig {
        transitions: TransitionPolicy::Permissive,
        single_active_per_type: false,
    });
    let application = open_application(&store, LoanCategory::FirstHome);
    let record = upload(&manager, application.id, DocumentType::CreditHistory);

    manager
        .update(record.id, DocumentPatch::status(DocumentStatus::Rejected))
        .expect("reject");
    let reopened = manager
        .update(record.id, DocumentPatch::status(DocumentStatus::Pending))
        .expect("reopen");
    assert_eq!(reopened.status, DocumentStatus::Pending);
}

#[test]
fn set_status_parses_caller_labels() {
    let (manager, store) = lifecycle();
    let application = open_application(&store, LoanCategory::FirstHome);
    let record = upload(&manager, application.id, DocumentType::FirstHomeDeed);

    match manager.set_status(record.id, "ARCHIVED") {
        Err(DocumentError::InvalidStatus(err)) => assert_eq!(err.value, "ARCHIVED"),
        other => panic!("expected invalid status, got {other:?}"),
    }
    let rejected = manager.set_status(record.id, "REJECTED").expect("reject");
    assert_eq!(rejected.status, DocumentStatus::Rejected);
}

#[test]
fn stale_expected_version_is_a_conflict() {
    let (manager, store) = lifecycle();
    let application = open_application(&store, LoanCategory::FirstHome);
    let record = upload(&manager, application.id, DocumentType::FirstHomeDeed);

    manager
        .update(record.id, DocumentPatch::status(DocumentStatus::Approved))
        .expect("first reviewer wins");

    let patch = DocumentPatch {
        status: Some(DocumentStatus::Rejected),
        expected_version: Some(record.version),
        ..DocumentPatch::default()
    };
    match manager.update(record.id, patch) {
        Err(DocumentError::VersionConflict {
            expected, actual, ..
        }) => {
            assert_eq!(expected, 1);
            assert_eq!(actual, 2);
        }
        other => panic!("expected version conflict, got {other:?}"),
    }

    let stored = manager.get(record.id).expect("fetch");
    assert_eq!(stored.status, DocumentStatus::Approved);
    assert_eq!(stored.version, 2);
}

#[test]
fn store_rejects_write_from_outdated_read() {
    let (manager, store) = lifecycle();
    let application = open_application(&store, LoanCategory::FirstHome);
    let record = upload(&manager, application.id, DocumentType::FirstHomeDeed);

    let mut outdated = record.clone();
    outdated.status = DocumentStatus::Rejected;
    manager
        .update(record.id, DocumentPatch::status(DocumentStatus::Approved))
        .expect("approve");

    match DocumentStore::update(store.as_ref(), outdated) {
        Err(StoreError::StaleVersion { expected, actual }) => {
            assert_eq!((expected, actual), (1, 2));
        }
        other => panic!("expected stale version, got {other:?}"),
    }
}

#[test]
fn delete_is_idempotent() {
    let (manager, store) = lifecycle();
    let application = open_application(&store, LoanCategory::FirstHome);
    let record = upload(&manager, application.id, DocumentType::FirstHomeDeed);

    assert!(manager.delete(record.id).expect("first delete"));
    assert!(!manager.delete(record.id).expect("second delete"));
    assert!(matches!(
        manager.get(record.id),
        Err(DocumentError::NotFound(_))
    ));
}

#[test]
fn single_active_rule_blocks_duplicates_until_rejected() {
    let (manager, store) = lifecycle_with(LifecycleConfig {
        transitions: TransitionPolicy::Strict,
        single_active_per_type: true,
    });
    let application = open_application(&store, LoanCategory::FirstHome);
    let first = upload(&manager, application.id, DocumentType::IncomeProof);

    match manager.create(
        application.id,
        DocumentType::IncomeProof,
        "income_v2.pdf",
        "https://storage.example.com/docs/income_v2.pdf",
    ) {
        Err(DocumentError::DuplicateActive { existing, .. }) => assert_eq!(existing, first.id),
        other => panic!("expected duplicate active document, got {other:?}"),
    }

    manager
        .update(first.id, DocumentPatch::status(DocumentStatus::Rejected))
        .expect("reject first upload");
    let replacement = upload(&manager, application.id, DocumentType::IncomeProof);
    assert_ne!(replacement.id, first.id);
}

#[test]
fn single_active_rule_blocks_reopening_a_replaced_document() {
    let (manager, store) = lifecycle_with(LifecycleConfig {
        transitions: TransitionPolicy::Permissive,
        single_active_per_type: true,
    });
    let application = open_application(&store, LoanCategory::FirstHome);
    let first = upload(&manager, application.id, DocumentType::FirstHomeDeed);
    manager
        .update(first.id, DocumentPatch::status(DocumentStatus::Rejected))
        .expect("reject first deed");
    let replacement = upload(&manager, application.id, DocumentType::FirstHomeDeed);

    match manager.update(first.id, DocumentPatch::status(DocumentStatus::Pending)) {
        Err(DocumentError::DuplicateActive { existing, .. }) => {
            assert_eq!(existing, replacement.id)
        }
        other => panic!("expected duplicate active document, got {other:?}"),
    }
    assert_eq!(
        manager.get(first.id).expect("fetch").status,
        DocumentStatus::Rejected
    );

    // Moving between active statuses does not count the document against itself.
    let approved = manager
        .update(replacement.id, DocumentPatch::status(DocumentStatus::Approved))
        .expect("approve replacement");
    assert_eq!(approved.status, DocumentStatus::Approved);
}

#[test]
fn store_outage_propagates_unchanged() {
    let store = Arc::new(UnavailableStore);
    let manager =
        DocumentLifecycleManager::new(store.clone(), store, LifecycleConfig::default());

    match manager.get(DocumentId(1)) {
        Err(DocumentError::Store(StoreError::Unavailable(reason))) => {
            assert!(reason.contains("offline"));
        }
        other => panic!("expected store outage, got {other:?}"),
    }
    assert!(matches!(
        manager.create(ApplicationId(1), DocumentType::BusinessPlan, "plan.pdf", "https://x"),
        Err(DocumentError::Store(StoreError::Unavailable(_)))
    ));
}

#[test]
fn create_after_application_deleted_is_unknown_application() {
    let (manager, store) = lifecycle();
    let application = open_application(&store, LoanCategory::FirstHome);
    ApplicationStore::delete(store.as_ref(), application.id).expect("delete application");

    assert!(matches!(
        manager.create(application.id, DocumentType::FirstHomeDeed, "deed.pdf", "https://x"),
        Err(DocumentError::UnknownApplication(_))
    ));
}
