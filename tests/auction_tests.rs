use chrono::{Duration, Utc};
use coin_auction_service::bidding::commands::{
    handle_close_auction, handle_create_auction, handle_place_bid, CreateAuctionCommand,
    PlaceBidCommand,
};
use coin_auction_service::bidding::model::{ListingFilter, ListingStatus, NewListing};
use coin_auction_service::error::Error;
use coin_auction_service::query;
use coin_auction_service::store::memory::MemoryAuctionStore;
use coin_auction_service::store::AuctionRepository;
use std::sync::Arc;

/// 테스트용 경매 등록 명령
fn create_cmd() -> CreateAuctionCommand {
    CreateAuctionCommand {
        title: "1921 모건 달러".to_string(),
        description: "미국 은화, 상태 양호".to_string(),
        category: "미국 주화".to_string(),
        grade: "MS-63".to_string(),
        certification: Some("PCGS".to_string()),
        weight: Some(26.73),
        diameter: Some(38.1),
        composition: "은 90%".to_string(),
        mint: "필라델피아".to_string(),
        year: "1921".to_string(),
        starting_bid: 10000,
        buy_now_price: Some(50000),
        duration_days: 7,
    }
}

/// 종료 시각을 직접 지정해 저장소에 바로 넣는 출품 (시간 이동용)
fn listing_ending_in(duration: Duration) -> NewListing {
    let now = Utc::now();
    NewListing {
        title: "1888 시타델 은화".to_string(),
        description: "종료 시각 테스트용".to_string(),
        category: "유럽 주화".to_string(),
        grade: "AU-50".to_string(),
        certification: None,
        weight: None,
        diameter: None,
        composition: "은 83.5%".to_string(),
        mint: "빈".to_string(),
        year: "1888".to_string(),
        starting_bid: 10000,
        buy_now_price: None,
        created_at: now,
        end_time: now + duration,
    }
}

/// 경매 등록 테스트
#[tokio::test]
async fn test_create_auction() {
    let store = MemoryAuctionStore::new();

    let listing = handle_create_auction(create_cmd(), &store).await.unwrap();

    assert_eq!(listing.starting_bid, 10000);
    assert_eq!(listing.current_bid, 10000);
    assert_eq!(listing.bid_count, 0);
    assert_eq!(listing.status, ListingStatus::Open);
    assert_eq!(listing.end_time, listing.created_at + Duration::days(7));

    let bids = store.bids(listing.id).await.unwrap();
    assert!(bids.is_empty());
}

/// 등록 검증 실패 시 어떤 출품도 생기지 않아야 한다
#[tokio::test]
async fn test_create_auction_validation() {
    let store = MemoryAuctionStore::new();

    let invalid_cases = vec![
        CreateAuctionCommand {
            starting_bid: 0,
            ..create_cmd()
        },
        CreateAuctionCommand {
            starting_bid: -500,
            ..create_cmd()
        },
        CreateAuctionCommand {
            buy_now_price: Some(9999),
            ..create_cmd()
        },
        CreateAuctionCommand {
            title: "   ".to_string(),
            ..create_cmd()
        },
        CreateAuctionCommand {
            category: "".to_string(),
            ..create_cmd()
        },
        CreateAuctionCommand {
            year: "".to_string(),
            ..create_cmd()
        },
        CreateAuctionCommand {
            duration_days: 0,
            ..create_cmd()
        },
    ];

    for cmd in invalid_cases {
        let err = handle_create_auction(cmd, &store).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }), "기대와 다른 오류: {err:?}");
    }

    // 저장소 크기 불변
    let listings = store.list(&ListingFilter::default()).await.unwrap();
    assert!(listings.is_empty());
}

/// 입찰 성공 테스트
#[tokio::test]
async fn test_place_bid() {
    let store = MemoryAuctionStore::new();
    let listing = handle_create_auction(create_cmd(), &store).await.unwrap();

    let updated = handle_place_bid(
        PlaceBidCommand {
            listing_id: listing.id,
            amount: 15000,
            bidder: "Alice".to_string(),
        },
        &store,
    )
    .await
    .unwrap();

    assert_eq!(updated.current_bid, 15000);
    assert_eq!(updated.bid_count, 1);

    let bids = store.bids(listing.id).await.unwrap();
    assert_eq!(bids.len(), 1);
    assert_eq!(bids[0].amount, 15000);
    assert_eq!(bids[0].bidder, "Alice");
    assert_eq!(bids[0].listing_id, listing.id);
}

/// 동액/저가 입찰 거부 테스트
#[tokio::test]
async fn test_low_bid_rejected() {
    let store = MemoryAuctionStore::new();
    let listing = handle_create_auction(create_cmd(), &store).await.unwrap();

    handle_place_bid(
        PlaceBidCommand {
            listing_id: listing.id,
            amount: 15000,
            bidder: "Alice".to_string(),
        },
        &store,
    )
    .await
    .unwrap();

    // 동액 입찰
    let err = handle_place_bid(
        PlaceBidCommand {
            listing_id: listing.id,
            amount: 15000,
            bidder: "Bob".to_string(),
        },
        &store,
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        Error::BidTooLow {
            amount: 15000,
            current_bid: 15000
        }
    ));

    // 저가 입찰
    let err = handle_place_bid(
        PlaceBidCommand {
            listing_id: listing.id,
            amount: 12000,
            bidder: "Carol".to_string(),
        },
        &store,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::BidTooLow { .. }));

    // 현재 가격과 이력은 그대로
    let (current, _) = store.fetch(listing.id).await.unwrap().unwrap();
    assert_eq!(current.current_bid, 15000);
    assert_eq!(current.bid_count, 1);
    assert_eq!(store.bids(listing.id).await.unwrap().len(), 1);
}

/// 없는 출품 및 잘못된 입력 테스트
#[tokio::test]
async fn test_bid_input_errors() {
    let store = MemoryAuctionStore::new();

    let err = handle_place_bid(
        PlaceBidCommand {
            listing_id: 999,
            amount: 15000,
            bidder: "Alice".to_string(),
        },
        &store,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::NotFound { id: 999, .. }));

    let listing = handle_create_auction(create_cmd(), &store).await.unwrap();

    let err = handle_place_bid(
        PlaceBidCommand {
            listing_id: listing.id,
            amount: 0,
            bidder: "Alice".to_string(),
        },
        &store,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Validation { field: "amount", .. }));

    let err = handle_place_bid(
        PlaceBidCommand {
            listing_id: listing.id,
            amount: 20000,
            bidder: "  ".to_string(),
        },
        &store,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Validation { field: "bidder", .. }));
}

/// 종료 시각 경과 후 입찰 거부 테스트 (상태는 아직 OPEN이어도 거부)
#[tokio::test]
async fn test_expired_auction_rejects_bid() {
    let store = MemoryAuctionStore::new();
    let listing = store
        .insert(listing_ending_in(Duration::seconds(-10)))
        .await
        .unwrap();
    assert_eq!(listing.status, ListingStatus::Open);

    let err = handle_place_bid(
        PlaceBidCommand {
            listing_id: listing.id,
            amount: 20000,
            bidder: "Alice".to_string(),
        },
        &store,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::AuctionClosed { .. }));

    // 상태 변화 없음
    let (current, _) = store.fetch(listing.id).await.unwrap().unwrap();
    assert_eq!(current.current_bid, current.starting_bid);
    assert_eq!(current.bid_count, 0);
}

/// 관리자 종료 테스트 (멱등성 포함)
#[tokio::test]
async fn test_admin_close() {
    let store = MemoryAuctionStore::new();
    let listing = handle_create_auction(create_cmd(), &store).await.unwrap();

    let closed = handle_close_auction(listing.id, &store).await.unwrap();
    assert_eq!(closed.status, ListingStatus::Closed);

    // 종료된 경매에는 입찰 불가
    let err = handle_place_bid(
        PlaceBidCommand {
            listing_id: listing.id,
            amount: 20000,
            bidder: "Alice".to_string(),
        },
        &store,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::AuctionClosed { .. }));

    // 재종료는 멱등
    let closed_again = handle_close_auction(listing.id, &store).await.unwrap();
    assert_eq!(closed_again.status, ListingStatus::Closed);

    let err = handle_close_auction(999, &store).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

/// 입찰 이력 단조 증가 테스트
#[tokio::test]
async fn test_bid_history_monotonic() {
    let store = MemoryAuctionStore::new();
    let listing = handle_create_auction(create_cmd(), &store).await.unwrap();

    for amount in [11000, 12000, 15000, 15500] {
        handle_place_bid(
            PlaceBidCommand {
                listing_id: listing.id,
                amount,
                bidder: format!("bidder-{amount}"),
            },
            &store,
        )
        .await
        .unwrap();
    }

    let bids = store.bids(listing.id).await.unwrap();
    assert_eq!(bids.len(), 4);
    assert!(bids[0].amount > listing.starting_bid);
    for pair in bids.windows(2) {
        assert!(pair[1].amount > pair[0].amount);
    }

    let (current, _) = store.fetch(listing.id).await.unwrap().unwrap();
    assert_eq!(current.current_bid, bids.last().unwrap().amount);
    assert_eq!(current.bid_count, bids.len() as i64);
}

/// 동시성 입찰 테스트
/// 같은 출품에 50개의 입찰을 동시에 넣어도 갱신 유실 없이 직렬화되어야 한다.
#[tokio::test]
async fn test_concurrent_bidding() {
    let store = Arc::new(MemoryAuctionStore::new());
    let listing = handle_create_auction(create_cmd(), store.as_ref())
        .await
        .unwrap();
    let base = listing.current_bid;

    let mut handles = vec![];
    for i in 1..=50i64 {
        let store = Arc::clone(&store);
        let listing_id = listing.id;
        handles.push(tokio::spawn(async move {
            handle_place_bid(
                PlaceBidCommand {
                    listing_id,
                    amount: base + i * 1000,
                    bidder: format!("bidder-{i}"),
                },
                store.as_ref(),
            )
            .await
        }));
    }

    let mut successful_bids = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successful_bids += 1,
            // 더 높은 입찰이 먼저 반영된 경우만 실패로 허용된다
            Err(Error::BidTooLow { .. }) => {}
            Err(e) => panic!("기대와 다른 오류: {e:?}"),
        }
    }

    // 최고 입찰은 반드시 살아남는다
    let (current, _) = store.fetch(listing.id).await.unwrap().unwrap();
    assert_eq!(current.current_bid, base + 50 * 1000);
    assert_eq!(current.bid_count, successful_bids);

    // 갱신 유실 없음: 이력은 엄격하게 증가한다
    let bids = store.bids(listing.id).await.unwrap();
    assert_eq!(bids.len() as i64, successful_bids);
    assert!(bids[0].amount > base);
    for pair in bids.windows(2) {
        assert!(pair[1].amount > pair[0].amount);
    }
    assert_eq!(
        store.highest_bid(listing.id).await.unwrap(),
        Some(base + 50 * 1000)
    );
}

/// 서로 다른 출품의 입찰은 서로를 막지 않는다
#[tokio::test]
async fn test_bids_across_listings_independent() {
    let store = Arc::new(MemoryAuctionStore::new());
    let first = handle_create_auction(create_cmd(), store.as_ref())
        .await
        .unwrap();
    let second = handle_create_auction(create_cmd(), store.as_ref())
        .await
        .unwrap();

    let mut handles = vec![];
    for (listing_id, amount) in [(first.id, 20000), (second.id, 30000)] {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            handle_place_bid(
                PlaceBidCommand {
                    listing_id,
                    amount,
                    bidder: "Alice".to_string(),
                },
                store.as_ref(),
            )
            .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let (first, _) = store.fetch(first.id).await.unwrap().unwrap();
    let (second, _) = store.fetch(second.id).await.unwrap().unwrap();
    assert_eq!(first.current_bid, 20000);
    assert_eq!(second.current_bid, 30000);
}

/// 목록 필터 및 순서 고정 테스트
#[tokio::test]
async fn test_list_filtering() {
    let store = MemoryAuctionStore::new();
    let us = handle_create_auction(create_cmd(), &store).await.unwrap();
    let eu = handle_create_auction(
        CreateAuctionCommand {
            category: "유럽 주화".to_string(),
            ..create_cmd()
        },
        &store,
    )
    .await
    .unwrap();
    handle_close_auction(eu.id, &store).await.unwrap();

    let all = store.list(&ListingFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    // 변경이 없는 한 반복 호출 순서는 같다
    let again = store.list(&ListingFilter::default()).await.unwrap();
    let ids: Vec<i64> = all.iter().map(|l| l.id).collect();
    let ids_again: Vec<i64> = again.iter().map(|l| l.id).collect();
    assert_eq!(ids, ids_again);

    let open = store
        .list(&ListingFilter {
            status: Some(ListingStatus::Open),
            category: None,
        })
        .await
        .unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, us.id);

    let european = store
        .list(&ListingFilter {
            status: None,
            category: Some("유럽 주화".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(european.len(), 1);
    assert_eq!(european[0].id, eu.id);

    let closed_european = store
        .list(&ListingFilter {
            status: Some(ListingStatus::Closed),
            category: Some("유럽 주화".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(closed_european.len(), 1);
}

/// 만료 출품 일괄 정리 테스트
#[tokio::test]
async fn test_close_expired() {
    let store = MemoryAuctionStore::new();
    let expired = store
        .insert(listing_ending_in(Duration::seconds(-5)))
        .await
        .unwrap();
    let live = store
        .insert(listing_ending_in(Duration::days(3)))
        .await
        .unwrap();

    let closed = store.close_expired(Utc::now()).await.unwrap();
    assert_eq!(closed, 1);

    let (expired, _) = store.fetch(expired.id).await.unwrap().unwrap();
    let (live, _) = store.fetch(live.id).await.unwrap().unwrap();
    assert_eq!(expired.status, ListingStatus::Closed);
    assert_eq!(live.status, ListingStatus::Open);

    // 재실행 시 더 정리할 것이 없다
    assert_eq!(store.close_expired(Utc::now()).await.unwrap(), 0);
}

/// 조회 핸들러 테스트
#[tokio::test]
async fn test_query_handlers() {
    let store = MemoryAuctionStore::new();
    let listing = handle_create_auction(create_cmd(), &store).await.unwrap();

    let fetched = query::handlers::get_auction(&store, listing.id).await.unwrap();
    assert_eq!(fetched.id, listing.id);

    let err = query::handlers::get_auction(&store, 999).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));

    // 입찰 전 최고가는 없음
    let highest = query::handlers::get_highest_bid(&store, listing.id)
        .await
        .unwrap();
    assert_eq!(highest, None);

    handle_place_bid(
        PlaceBidCommand {
            listing_id: listing.id,
            amount: 22000,
            bidder: "Alice".to_string(),
        },
        &store,
    )
    .await
    .unwrap();

    let highest = query::handlers::get_highest_bid(&store, listing.id)
        .await
        .unwrap();
    assert_eq!(highest, Some(22000));

    let history = query::handlers::get_bid_history(&store, listing.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);

    let err = query::handlers::get_bid_history(&store, 999).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}
