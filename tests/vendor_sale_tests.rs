mod common;

use uuid::Uuid;

use bashpay::error::ApiError;
use bashpay::models::entities::TransferType;
use bashpay::services::transfer_service::{
    Destination, ExecuteTransfer, GuestDetails, TransferService,
};
use bashpay::services::vendor_sale_service::{SaleStatus, VendorSaleService};

#[test]
fn sale_status_round_trips() {
    for status in [SaleStatus::Pending, SaleStatus::Confirmed, SaleStatus::NotesIssued] {
        assert_eq!(SaleStatus::parse(status.as_str()), Some(status));
    }
    assert_eq!(SaleStatus::parse("cancelled"), None);
    assert_eq!(SaleStatus::parse(""), None);
}

#[test]
fn sale_status_only_moves_forward() {
    use SaleStatus::*;

    assert!(SaleStatus::can_transition(Pending, Confirmed));
    assert!(SaleStatus::can_transition(Confirmed, NotesIssued));

    // No skipping, no reversing, no self-loops.
    assert!(!SaleStatus::can_transition(Pending, NotesIssued));
    assert!(!SaleStatus::can_transition(Confirmed, Pending));
    assert!(!SaleStatus::can_transition(NotesIssued, Confirmed));
    assert!(!SaleStatus::can_transition(NotesIssued, Pending));
    assert!(!SaleStatus::can_transition(Pending, Pending));
    assert!(!SaleStatus::can_transition(Confirmed, Confirmed));
    assert!(!SaleStatus::can_transition(NotesIssued, NotesIssued));
}

// Scenario: gateway sale creates a pending record, the vendor confirms it,
// then issues notes. A repeated confirm must fail and nothing monetary moves
// after the original transfer.
#[tokio::test]
async fn sale_lifecycle_advances_without_moving_money() {
    if !common::test_db_available() {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return;
    }
    let state = common::create_test_app_state();
    let mut conn = state.db.get().expect("db");
    common::run_test_migrations(&mut conn);
    common::cleanup_test_db(&mut conn);

    let guest = common::fixtures::create_user_with_wallet(&mut conn, "+2348100000001", "Guest", 10_000);
    let vendor = common::fixtures::create_user_with_wallet(&mut conn, "+2348100000002", "Vendor", 0);
    let celebrant =
        common::fixtures::create_user_with_wallet(&mut conn, "+2348100000003", "Celebrant", 0);
    let event = common::fixtures::create_event(&mut conn, celebrant.id, "Wedding");
    let gateway = common::fixtures::create_gateway(&mut conn, vendor.id, &event, &celebrant);
    drop(conn);

    let transfer = TransferService::execute(
        &state,
        ExecuteTransfer {
            sender_id: guest.id,
            destination: Destination::Gateway(gateway.id),
            amount: 3_000,
            message: None,
            transfer_type: TransferType::GatewayQr,
            reference: Uuid::new_v4(),
            guest: Some(GuestDetails {
                name: "Guest".to_string(),
                phone: "+2348100000001".to_string(),
            }),
        },
        common::TEST_PIN,
    )
    .await
    .expect("gateway transfer");

    let mut conn = state.db.get().expect("db");

    // BU landed on the event, not in any wallet.
    let (event_balance, withdrawn) = common::fixtures::event_state(&mut conn, event.id);
    assert_eq!(event_balance, 3_000);
    assert!(!withdrawn);
    assert_eq!(common::fixtures::wallet_balance(&mut conn, guest.id), 7_000);
    assert_eq!(common::fixtures::wallet_balance(&mut conn, vendor.id), 0);

    let sales = VendorSaleService::pending_for_gateway(&mut conn, vendor.id, gateway.id)
        .expect("pending sales");
    assert_eq!(sales.len(), 1);
    let sale = &sales[0];
    assert_eq!(sale.transfer_id, transfer.id);
    assert_eq!(sale.status, "pending");

    let confirmed = VendorSaleService::confirm(&mut conn, vendor.id, sale.id).expect("confirm");
    assert_eq!(confirmed.status, "confirmed");

    // Confirming twice is a state error, not a silent no-op.
    let replay = VendorSaleService::confirm(&mut conn, vendor.id, sale.id);
    assert!(matches!(replay, Err(ApiError::InvalidStateTransition(_))));

    let issued = VendorSaleService::issue_notes(&mut conn, vendor.id, sale.id).expect("issue");
    assert_eq!(issued.status, "notes_issued");

    // The whole lifecycle moved no money.
    let (event_balance, _) = common::fixtures::event_state(&mut conn, event.id);
    assert_eq!(event_balance, 3_000);
    assert_eq!(common::fixtures::wallet_balance(&mut conn, vendor.id), 0);
}

#[tokio::test]
async fn only_owning_vendor_can_advance_a_sale() {
    if !common::test_db_available() {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return;
    }
    let state = common::create_test_app_state();
    let mut conn = state.db.get().expect("db");
    common::run_test_migrations(&mut conn);
    common::cleanup_test_db(&mut conn);

    let guest = common::fixtures::create_user_with_wallet(&mut conn, "+2348100000011", "Guest", 5_000);
    let vendor = common::fixtures::create_user_with_wallet(&mut conn, "+2348100000012", "Vendor", 0);
    let intruder =
        common::fixtures::create_user_with_wallet(&mut conn, "+2348100000013", "Other", 0);
    let celebrant =
        common::fixtures::create_user_with_wallet(&mut conn, "+2348100000014", "Celebrant", 0);
    let event = common::fixtures::create_event(&mut conn, celebrant.id, "Naming");
    let gateway = common::fixtures::create_gateway(&mut conn, vendor.id, &event, &celebrant);
    drop(conn);

    TransferService::execute(
        &state,
        ExecuteTransfer {
            sender_id: guest.id,
            destination: Destination::Gateway(gateway.id),
            amount: 1_000,
            message: None,
            transfer_type: TransferType::GatewayQr,
            reference: Uuid::new_v4(),
            guest: Some(GuestDetails {
                name: "Guest".to_string(),
                phone: "+2348100000011".to_string(),
            }),
        },
        common::TEST_PIN,
    )
    .await
    .expect("gateway transfer");

    let mut conn = state.db.get().expect("db");
    let sales = VendorSaleService::pending_for_gateway(&mut conn, vendor.id, gateway.id)
        .expect("pending sales");
    let sale_id = sales[0].id;

    let result = VendorSaleService::confirm(&mut conn, intruder.id, sale_id);
    assert!(matches!(result, Err(ApiError::Forbidden(_))));

    // Listing someone else's gateway is forbidden too.
    let result = VendorSaleService::pending_for_gateway(&mut conn, intruder.id, gateway.id);
    assert!(matches!(result, Err(ApiError::Forbidden(_))));

    // The sale is still pending for the real vendor.
    let confirmed = VendorSaleService::confirm(&mut conn, vendor.id, sale_id).expect("confirm");
    assert_eq!(confirmed.status, "confirmed");
}

// A manual sale moves BU from the vendor's own wallet onto the event and
// opens the same pending-sale workflow as a QR scan.
#[tokio::test]
async fn manual_sale_debits_the_vendor_wallet() {
    if !common::test_db_available() {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return;
    }
    let state = common::create_test_app_state();
    let mut conn = state.db.get().expect("db");
    common::run_test_migrations(&mut conn);
    common::cleanup_test_db(&mut conn);

    let vendor =
        common::fixtures::create_user_with_wallet(&mut conn, "+2348100000021", "Vendor", 10_000);
    let celebrant =
        common::fixtures::create_user_with_wallet(&mut conn, "+2348100000022", "Celebrant", 0);
    let event = common::fixtures::create_event(&mut conn, celebrant.id, "Coronation");
    let gateway = common::fixtures::create_gateway(&mut conn, vendor.id, &event, &celebrant);
    drop(conn);

    let transfer = TransferService::execute(
        &state,
        ExecuteTransfer {
            sender_id: vendor.id,
            destination: Destination::Gateway(gateway.id),
            amount: 2_000,
            message: None,
            transfer_type: TransferType::ManualSale,
            reference: Uuid::new_v4(),
            guest: Some(GuestDetails {
                name: "Walk-in Guest".to_string(),
                phone: "+2348100000023".to_string(),
            }),
        },
        common::TEST_PIN,
    )
    .await
    .expect("manual sale");

    assert_eq!(transfer.transfer_type, "manual_sale");
    assert_eq!(transfer.source, "manual_sale");
    assert_eq!(transfer.receiver_id, None);
    assert_eq!(transfer.event_id, Some(event.id));

    let mut conn = state.db.get().expect("db");
    assert_eq!(common::fixtures::wallet_balance(&mut conn, vendor.id), 8_000);
    let (event_balance, _) = common::fixtures::event_state(&mut conn, event.id);
    assert_eq!(event_balance, 2_000);

    let sales = VendorSaleService::pending_for_gateway(&mut conn, vendor.id, gateway.id)
        .expect("pending sales");
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].guest_name, "Walk-in Guest");
    assert_eq!(sales[0].status, "pending");
}

#[tokio::test]
async fn manual_sale_requires_the_owning_vendor() {
    if !common::test_db_available() {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return;
    }
    let state = common::create_test_app_state();
    let mut conn = state.db.get().expect("db");
    common::run_test_migrations(&mut conn);
    common::cleanup_test_db(&mut conn);

    let vendor =
        common::fixtures::create_user_with_wallet(&mut conn, "+2348100000031", "Vendor", 0);
    let intruder =
        common::fixtures::create_user_with_wallet(&mut conn, "+2348100000032", "Other", 10_000);
    let celebrant =
        common::fixtures::create_user_with_wallet(&mut conn, "+2348100000033", "Celebrant", 0);
    let event = common::fixtures::create_event(&mut conn, celebrant.id, "Launch");
    let gateway = common::fixtures::create_gateway(&mut conn, vendor.id, &event, &celebrant);
    drop(conn);

    let result = TransferService::execute(
        &state,
        ExecuteTransfer {
            sender_id: intruder.id,
            destination: Destination::Gateway(gateway.id),
            amount: 1_000,
            message: None,
            transfer_type: TransferType::ManualSale,
            reference: Uuid::new_v4(),
            guest: Some(GuestDetails {
                name: "Walk-in Guest".to_string(),
                phone: "+2348100000034".to_string(),
            }),
        },
        common::TEST_PIN,
    )
    .await;

    assert!(matches!(result, Err(ApiError::Forbidden(_))));

    let mut conn = state.db.get().expect("db");
    assert_eq!(
        common::fixtures::wallet_balance(&mut conn, intruder.id),
        10_000
    );
    let (event_balance, _) = common::fixtures::event_state(&mut conn, event.id);
    assert_eq!(event_balance, 0);
}
