//! Full aggregate lifecycle against the in-memory store

use atelier_core::export::{ExportOptions, ExportVariant, encode_csv};
use atelier_core::orders::{OrderManager, filter_details};
use atelier_core::reports::{SettlementPolicy, reconcile};
use atelier_core::repository::OrderRepository;
use atelier_core::store::{MemoryBlobStore, MemoryStore};
use chrono::NaiveDate;
use serde_json::json;
use shared::{
    ClientDraft, ClientRef, CoreError, ItemDraft, OrderDraft, OrderHeaderPatch, PaymentMethod,
    Priority, ProductionFlag,
};
use std::sync::Arc;

fn setup() -> (Arc<MemoryStore>, OrderManager) {
    let store = Arc::new(MemoryStore::new());
    let manager = OrderManager::new(store.clone(), Arc::new(MemoryBlobStore::new()));
    (store, manager)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn draft(client: ClientRef, delivery: NaiveDate) -> OrderDraft {
    OrderDraft {
        client,
        items: vec![
            ItemDraft {
                product_name: "Jogo de Banheiro".to_string(),
                quantity: 2,
                unit_price: 50.0,
            },
            ItemDraft {
                product_name: "Tapete".to_string(),
                quantity: 1,
                unit_price: 30.0,
            },
        ],
        order_date: Some(date(2025, 6, 1)),
        delivery_date: delivery,
        delivery_time: None,
        down_payment: 40.0,
        payment_method: PaymentMethod::Pix,
        observation: None,
        priority: Priority::Normal,
    }
}

fn new_client(name: &str) -> ClientRef {
    ClientRef::New(ClientDraft {
        name: name.to_string(),
        contact: Some("11 98888-7777".to_string()),
        address: None,
    })
}

#[tokio::test]
async fn create_with_new_client_persists_both_records() {
    let (_, manager) = setup();

    let detail = manager
        .create(draft(new_client("Dona Maria"), date(2025, 6, 10)))
        .await
        .unwrap();

    assert_eq!(detail.order.total_price, 130.0);
    assert_eq!(detail.items.len(), 2);
    assert_eq!(detail.client_name(), "Dona Maria");
    assert!(!detail.order.id.is_empty());
    assert_eq!(detail.items[0].order_id, detail.order.id);

    // The client landed in the directory
    let clients = manager.clients().find_all().await.unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].id, detail.order.client_id);
}

#[tokio::test]
async fn create_against_missing_client_is_not_found() {
    let (_, manager) = setup();
    let err = manager
        .create(draft(
            ClientRef::Existing("nope".to_string()),
            date(2025, 6, 10),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn create_rejects_empty_item_set() {
    let (_, manager) = setup();
    let mut d = draft(new_client("Dona Maria"), date(2025, 6, 10));
    d.items.clear();
    assert!(matches!(
        manager.create(d).await.unwrap_err(),
        CoreError::Validation(_)
    ));
    // Nothing was written, not even the client
    assert!(manager.clients().find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn replace_items_recomputes_the_header_total() {
    let (_, manager) = setup();
    let created = manager
        .create(draft(new_client("Dona Maria"), date(2025, 6, 10)))
        .await
        .unwrap();

    let total = manager
        .replace_items(
            &created.order.id,
            vec![ItemDraft {
                product_name: "Kit cozinha".to_string(),
                quantity: 3,
                unit_price: 25.5,
            }],
        )
        .await
        .unwrap();
    assert_eq!(total, 76.5);

    // Header total always equals the sum over the stored items
    let detail = manager.load(&created.order.id).await.unwrap();
    assert_eq!(detail.order.total_price, 76.5);
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.items[0].product_name, "Kit cozinha");
}

#[tokio::test]
async fn replace_items_rejects_an_empty_set() {
    let (_, manager) = setup();
    let created = manager
        .create(draft(new_client("Dona Maria"), date(2025, 6, 10)))
        .await
        .unwrap();

    let err = manager
        .replace_items(&created.order.id, Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    // The original item set and total are untouched
    let detail = manager.load(&created.order.id).await.unwrap();
    assert_eq!(detail.items.len(), 2);
    assert_eq!(detail.order.total_price, 130.0);
}

#[tokio::test]
async fn header_patch_edits_and_clears_fields() {
    let (_, manager) = setup();
    let mut d = draft(new_client("Dona Maria"), date(2025, 6, 10));
    d.observation = Some("laço rosa".to_string());
    let created = manager.create(d).await.unwrap();

    let patch = OrderHeaderPatch {
        down_payment: Some(60.0),
        observation: Some(None),
        priority: Some(Priority::High),
        ..Default::default()
    };
    let updated = manager.update_header(&created.order.id, patch).await.unwrap();

    assert_eq!(updated.down_payment, 60.0);
    assert_eq!(updated.observation, None);
    assert_eq!(updated.priority, Priority::High);
    // The patch never touches items or the total
    assert_eq!(updated.total_price, 130.0);
}

#[tokio::test]
async fn delivery_is_a_one_way_transition() {
    let (_, manager) = setup();
    let created = manager
        .create(draft(new_client("Dona Maria"), date(2025, 6, 10)))
        .await
        .unwrap();

    let delivered = manager.mark_delivered(&created.order.id).await.unwrap();
    assert!(delivered.is_delivered());

    let err = manager.mark_delivered(&created.order.id).await.unwrap_err();
    assert!(matches!(err, CoreError::BusinessRule(_)));

    // Delivered orders leave the pending view
    assert!(manager.pending().await.unwrap().is_empty());
}

#[tokio::test]
async fn production_flags_toggle_independently() {
    let (_, manager) = setup();
    let created = manager
        .create(draft(new_client("Dona Maria"), date(2025, 6, 10)))
        .await
        .unwrap();
    let id = created.order.id;

    assert!(manager
        .toggle_production_flag(&id, ProductionFlag::Material)
        .await
        .unwrap());
    let detail = manager.load(&id).await.unwrap();
    assert!(detail.order.material_status);
    assert!(!detail.order.art_status);

    assert!(manager
        .toggle_production_flag(&id, ProductionFlag::Art)
        .await
        .unwrap());
    assert!(!manager
        .toggle_production_flag(&id, ProductionFlag::Material)
        .await
        .unwrap());

    let detail = manager.load(&id).await.unwrap();
    assert!(!detail.order.material_status);
    assert!(detail.order.art_status);
}

#[tokio::test]
async fn delete_cascades_to_items() {
    let (store, manager) = setup();
    let created = manager
        .create(draft(new_client("Dona Maria"), date(2025, 6, 10)))
        .await
        .unwrap();

    manager.delete(&created.order.id).await.unwrap();

    assert!(matches!(
        manager.load(&created.order.id).await.unwrap_err(),
        CoreError::NotFound(_)
    ));
    let orphans = OrderRepository::new(store)
        .items_for_order(&created.order.id)
        .await
        .unwrap();
    assert!(orphans.is_empty());
}

#[tokio::test]
async fn client_deletion_is_blocked_while_referenced() {
    let (_, manager) = setup();
    let created = manager
        .create(draft(new_client("Dona Maria"), date(2025, 6, 10)))
        .await
        .unwrap();
    let client_id = created.order.client_id.clone();

    let err = manager.clients().delete(&client_id).await.unwrap_err();
    assert!(matches!(err, CoreError::BusinessRule(_)));

    manager.delete(&created.order.id).await.unwrap();
    manager.clients().delete(&client_id).await.unwrap();
    assert!(manager.clients().find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn attach_and_detach_images() {
    let (store, manager) = setup();
    let created = manager
        .create(draft(new_client("Dona Maria"), date(2025, 6, 10)))
        .await
        .unwrap();
    let id = created.order.id;

    let url = manager.attach_image(&id, vec![1, 2, 3], "png").await.unwrap();
    assert!(url.starts_with("mem://"));
    assert_eq!(manager.load(&id).await.unwrap().order.images, vec![url.clone()]);

    // Duplicate URLs are removed together by exact match
    OrderRepository::new(store)
        .update_header(&id, json!({ "images": [url.clone(), "keep://other.png", url.clone()] }))
        .await
        .unwrap();
    manager.detach_image(&id, &url).await.unwrap();
    assert_eq!(
        manager.load(&id).await.unwrap().order.images,
        vec!["keep://other.png".to_string()]
    );
}

#[tokio::test]
async fn pending_view_orders_by_priority_then_due_date() {
    let (_, manager) = setup();

    // High priority due later, normal due sooner, normal due latest
    let mut high = draft(new_client("Alta"), date(2025, 6, 20));
    high.priority = Priority::High;
    let high = manager.create(high).await.unwrap();
    let soon = manager
        .create(draft(new_client("Cedo"), date(2025, 6, 5)))
        .await
        .unwrap();
    let late = manager
        .create(draft(new_client("Tarde"), date(2025, 6, 25)))
        .await
        .unwrap();
    let delivered = manager
        .create(draft(new_client("Feito"), date(2025, 6, 2)))
        .await
        .unwrap();
    manager.mark_delivered(&delivered.order.id).await.unwrap();

    let pending = manager.pending().await.unwrap();
    let ids: Vec<&str> = pending.iter().map(|d| d.order.id.as_str()).collect();
    assert_eq!(ids, vec![&high.order.id, &soon.order.id, &late.order.id]);
}

#[tokio::test]
async fn reconciliation_over_the_live_collection() {
    let (_, manager) = setup();

    let delivered = manager
        .create(draft(new_client("Feito"), date(2025, 6, 2)))
        .await
        .unwrap();
    manager.mark_delivered(&delivered.order.id).await.unwrap();
    manager
        .create(draft(new_client("Aberto"), date(2025, 6, 20)))
        .await
        .unwrap();

    let orders: Vec<_> = manager
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.order)
        .collect();
    // Each order: total 130, down payment 40
    let snap = reconcile(&orders, SettlementPolicy::default());
    assert_eq!(snap.gross, 260.0);
    assert_eq!(snap.outstanding, 90.0);
    assert_eq!(snap.received, 170.0);
    assert_eq!(snap.count, 2);

    let snap = reconcile(&orders, SettlementPolicy::TrackAfterDelivery);
    assert_eq!(snap.outstanding, 180.0);
}

#[tokio::test]
async fn export_and_filter_over_a_snapshot() {
    let (_, manager) = setup();
    manager
        .create(draft(new_client("Dona Maria"), date(2025, 6, 10)))
        .await
        .unwrap();
    let mut other = draft(new_client("Seu José"), date(2025, 6, 12));
    other.items = vec![ItemDraft {
        product_name: "Guirlanda".to_string(),
        quantity: 1,
        unit_price: 80.0,
    }];
    manager.create(other).await.unwrap();

    let details = manager.list_all().await.unwrap();

    let matches = filter_details(&details, "guirlanda");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].client_name(), "Seu José");

    let csv = encode_csv(&details, ExportVariant::Financial, ExportOptions::default());
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.lines().skip(1).all(|l| l.ends_with(",Pendente")));
    assert!(csv.contains("1x Guirlanda"));
    assert!(csv.contains("80.00"));
}
