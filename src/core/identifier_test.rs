use super::identifier::*;

#[test]
fn derivation_should_produce_the_canonical_coordinator_path() {
    let id = PersistenceId::for_type_name("customer");
    assert_eq!(id.as_str(), "/system/sharding/customerCoordinator/singleton/coordinator");
}

#[test]
fn derivation_should_be_deterministic_and_injective() {
    assert_eq!(
        PersistenceId::for_type_name("order"),
        PersistenceId::for_type_name("order")
    );
    assert_ne!(
        PersistenceId::for_type_name("order"),
        PersistenceId::for_type_name("orders")
    );
}

#[test]
fn namespace_filter_should_accept_any_sharding_entry() {
    assert!(PersistenceId::in_sharding_namespace(
        "/system/sharding/customerCoordinator/singleton/coordinator"
    ));
    assert!(PersistenceId::in_sharding_namespace("/system/sharding/customer/42"));
    assert!(!PersistenceId::in_sharding_namespace("/user/customer"));
    assert!(!PersistenceId::in_sharding_namespace("customer"));
}

#[test]
fn region_name_should_be_extracted_from_coordinator_ids() {
    assert_eq!(
        PersistenceId::region_name("/system/sharding/customerCoordinator/singleton/coordinator"),
        Some("customer")
    );
    assert_eq!(
        PersistenceId::region_name("/system/sharding/orderCoordinator/singleton/coordinator"),
        Some("order")
    );
}

#[test]
fn region_name_should_reject_non_coordinator_ids() {
    // A plain sharded entity under the namespace, no coordinator marker.
    assert_eq!(PersistenceId::region_name("/system/sharding/customer/42"), None);
    assert_eq!(PersistenceId::region_name("/user/somewhere/else"), None);
}

#[test]
fn region_name_should_reject_marker_before_namespace() {
    assert_eq!(PersistenceId::region_name("Coordinator/system/sharding/x"), None);
}

#[test]
fn display_matches_raw_string() {
    let id = PersistenceId::for_type_name("customer");
    assert_eq!(format!("{id}"), id.as_str());
}
