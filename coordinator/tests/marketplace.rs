//! Tests for the marketplace operations around the hire core: gig CRUD,
//! bid placement rules, listing, and the uniqueness guarantee.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::Barrier;

use gigdesk_common::{Bid, BidStatus, Gig, GigStatus, MarketError, User, UserId};
use gigdesk_coordinator::{
    HireCoordinator, Marketplace, Metrics, NewBid, NewGig, Notification, Notifier,
};
use gigdesk_store::{DocumentStore, GigPatch, GigQuery, MemoryStore};

struct Harness {
    store: Arc<MemoryStore>,
    coordinator: Arc<HireCoordinator<MemoryStore>>,
    marketplace: Arc<Marketplace<MemoryStore>>,
    notifier: Arc<Notifier>,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(Notifier::new(64));
    let metrics = Arc::new(Metrics::new());
    Harness {
        store: store.clone(),
        coordinator: Arc::new(HireCoordinator::new(
            store.clone(),
            notifier.clone(),
            metrics.clone(),
        )),
        marketplace: Arc::new(Marketplace::new(store, notifier.clone(), metrics)),
        notifier,
    }
}

async fn register(h: &Harness, name: &str) -> User {
    h.marketplace
        .register_user(name, &format!("{}@example.com", name.to_lowercase()))
        .await
        .unwrap()
}

async fn post_gig(h: &Harness, owner: UserId, title: &str) -> Gig {
    h.marketplace
        .create_gig(
            owner,
            NewGig {
                title: title.to_string(),
                description: "Need a responsive landing page for a product launch".to_string(),
                budget: Decimal::from(500),
            },
        )
        .await
        .unwrap()
}

async fn submit_bid(h: &Harness, freelancer: UserId, gig: &Gig) -> Bid {
    h.marketplace
        .place_bid(
            freelancer,
            NewBid {
                gig_id: gig.id,
                price: Decimal::from(400),
                message: "I can deliver this within a week".to_string(),
            },
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn create_gig_validates_fields() {
    let h = harness();
    let owner = register(&h, "Alice").await;

    let err = h
        .marketplace
        .create_gig(
            owner.id,
            NewGig {
                title: "Logo".to_string(),
                description: "Too short".to_string(),
                budget: Decimal::from(100),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MarketError::Validation { .. }));
    assert_eq!(err.http_status(), 400);
}

#[tokio::test]
async fn create_gig_requires_known_owner() {
    let h = harness();
    let err = h
        .marketplace
        .create_gig(
            UserId::new(),
            NewGig {
                title: "Build a landing page".to_string(),
                description: "Need a responsive landing page for a product launch".to_string(),
                budget: Decimal::from(500),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MarketError::UserNotFound(_)));
}

#[tokio::test]
async fn update_gig_owner_only_and_only_while_open() {
    let h = harness();
    let owner = register(&h, "Alice").await;
    let freelancer = register(&h, "Bob").await;
    let gig = post_gig(&h, owner.id, "Build a landing page").await;

    // Non-owner cannot update.
    let err = h
        .marketplace
        .update_gig(
            freelancer.id,
            gig.id,
            GigPatch {
                budget: Some(Decimal::from(900)),
                ..GigPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), 403);

    // Owner can update while open.
    let updated = h
        .marketplace
        .update_gig(
            owner.id,
            gig.id,
            GigPatch {
                budget: Some(Decimal::from(900)),
                ..GigPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.budget, Decimal::from(900));

    // Once assigned, editing is a conflict.
    let bid = submit_bid(&h, freelancer.id, &gig).await;
    h.coordinator.hire(owner.id, bid.id).await.unwrap();

    let err = h
        .marketplace
        .update_gig(
            owner.id,
            gig.id,
            GigPatch {
                title: Some("Different title now".to_string()),
                ..GigPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MarketError::GigAssigned));
}

#[tokio::test]
async fn delete_gig_owner_only() {
    let h = harness();
    let owner = register(&h, "Alice").await;
    let other = register(&h, "Bob").await;
    let gig = post_gig(&h, owner.id, "Build a landing page").await;

    let err = h.marketplace.delete_gig(other.id, gig.id).await.unwrap_err();
    assert_eq!(err.http_status(), 403);

    h.marketplace.delete_gig(owner.id, gig.id).await.unwrap();
    assert!(h.store.get_gig(gig.id).is_none());
}

#[tokio::test]
async fn owner_cannot_bid_on_own_gig() {
    let h = harness();
    let owner = register(&h, "Alice").await;
    let gig = post_gig(&h, owner.id, "Build a landing page").await;

    let err = h
        .marketplace
        .place_bid(
            owner.id,
            NewBid {
                gig_id: gig.id,
                price: Decimal::from(400),
                message: "Bidding on my own gig".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MarketError::OwnGig));
}

#[tokio::test]
async fn duplicate_bid_is_rejected() {
    let h = harness();
    let owner = register(&h, "Alice").await;
    let freelancer = register(&h, "Bob").await;
    let gig = post_gig(&h, owner.id, "Build a landing page").await;

    submit_bid(&h, freelancer.id, &gig).await;

    let err = h
        .marketplace
        .place_bid(
            freelancer.id,
            NewBid {
                gig_id: gig.id,
                price: Decimal::from(350),
                message: "Second bid on the same gig".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MarketError::DuplicateBid));
}

/// Uniqueness holds under concurrency: two simultaneous bids by the same
/// freelancer on the same gig yield exactly one stored bid.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicate_bids_store_exactly_one() {
    let h = harness();
    let owner = register(&h, "Alice").await;
    let freelancer = register(&h, "Bob").await;
    let gig = post_gig(&h, owner.id, "Build a landing page").await;

    let barrier = Arc::new(Barrier::new(2));
    let mut handles = Vec::new();
    for _ in 0..2 {
        let marketplace = h.marketplace.clone();
        let barrier = barrier.clone();
        let freelancer_id = freelancer.id;
        let gig_id = gig.id;
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            marketplace
                .place_bid(
                    freelancer_id,
                    NewBid {
                        gig_id,
                        price: Decimal::from(400),
                        message: "I can deliver this within a week".to_string(),
                    },
                )
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(h.store.bids_by_freelancer(freelancer.id).len(), 1);
}

#[tokio::test]
async fn bids_closed_once_gig_is_assigned() {
    let h = harness();
    let owner = register(&h, "Alice").await;
    let f1 = register(&h, "Bob").await;
    let f2 = register(&h, "Carol").await;
    let gig = post_gig(&h, owner.id, "Build a landing page").await;

    let bid = submit_bid(&h, f1.id, &gig).await;
    h.coordinator.hire(owner.id, bid.id).await.unwrap();

    let err = h
        .marketplace
        .place_bid(
            f2.id,
            NewBid {
                gig_id: gig.id,
                price: Decimal::from(300),
                message: "Arriving after the decision".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MarketError::GigNotOpen));

    // Invariant: no pending bid exists on an assigned gig.
    let statuses: Vec<BidStatus> = h
        .marketplace
        .bids_for_gig(owner.id, gig.id)
        .unwrap()
        .iter()
        .map(|b| b.status)
        .collect();
    assert!(!statuses.contains(&BidStatus::Pending));
}

#[tokio::test]
async fn bids_listing_is_owner_only() {
    let h = harness();
    let owner = register(&h, "Alice").await;
    let f1 = register(&h, "Bob").await;
    let gig = post_gig(&h, owner.id, "Build a landing page").await;
    submit_bid(&h, f1.id, &gig).await;

    let err = h.marketplace.bids_for_gig(f1.id, gig.id).unwrap_err();
    assert_eq!(err.http_status(), 403);

    let bids = h.marketplace.bids_for_gig(owner.id, gig.id).unwrap();
    assert_eq!(bids.len(), 1);
}

#[tokio::test]
async fn list_gigs_filters_status_and_title() {
    let h = harness();
    let owner = register(&h, "Alice").await;
    let freelancer = register(&h, "Bob").await;

    let logo = post_gig(&h, owner.id, "Logo design for a coffee brand").await;
    let _api = post_gig(&h, owner.id, "Backend API development").await;

    let bid = submit_bid(&h, freelancer.id, &logo).await;
    h.coordinator.hire(owner.id, bid.id).await.unwrap();

    let open = h.marketplace.list_gigs(&GigQuery {
        status: Some(GigStatus::Open),
        title_search: None,
    });
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].title, "Backend API development");

    let by_title = h.marketplace.list_gigs(&GigQuery {
        status: None,
        title_search: Some("logo".to_string()),
    });
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].id, logo.id);
}

#[tokio::test]
async fn new_bid_notifies_gig_owner() {
    let h = harness();
    let owner = register(&h, "Alice").await;
    let freelancer = register(&h, "Bob").await;
    let mut owner_rx = h.notifier.subscribe(owner.id);

    let gig = post_gig(&h, owner.id, "Build a landing page").await;
    let bid = submit_bid(&h, freelancer.id, &gig).await;

    match owner_rx.recv().await.unwrap() {
        Notification::NewBid {
            gig_title,
            bid_id,
            freelancer_name,
            ..
        } => {
            assert_eq!(gig_title, gig.title);
            assert_eq!(bid_id, bid.id);
            assert_eq!(freelancer_name, "Bob");
        }
        other => panic!("expected new_bid event, got {other:?}"),
    }
}
