/// 인메모리 저장소 구현
/// 출품별 비동기 뮤텍스(auction id 키)로 입찰을 직렬화한다.
/// 테스트와 로컬 개발용 백엔드이며, 저장소 트레이트 계약은 Postgres 구현과 동일하다.
// region:    --- Imports
use super::{AuctionRepository, ModerationRepository, StoreError};
use crate::bidding::model::{
    Bid, Listing, ListingFilter, ListingStatus, NewBid, NewListing,
};
use crate::moderation::model::{ModerationItem, ModerationStatus, NewSubmission};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

// endregion: --- Imports

// region:    --- Memory Auction Store

struct StoredListing {
    listing: Listing,
    bids: Vec<Bid>,
    version: i64,
}

#[derive(Default)]
pub struct MemoryAuctionStore {
    // 출품별 뮤텍스: 같은 출품의 변경은 직렬화, 다른 출품끼리는 병행
    listings: RwLock<BTreeMap<i64, Arc<Mutex<StoredListing>>>>,
    next_listing_id: AtomicI64,
    next_bid_id: AtomicI64,
}

impl MemoryAuctionStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn entry(&self, id: i64) -> Option<Arc<Mutex<StoredListing>>> {
        self.listings.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl AuctionRepository for MemoryAuctionStore {
    async fn insert(&self, listing: NewListing) -> Result<Listing, StoreError> {
        let id = self.next_listing_id.fetch_add(1, Ordering::SeqCst) + 1;
        let listing = Listing {
            id,
            title: listing.title,
            description: listing.description,
            category: listing.category,
            grade: listing.grade,
            certification: listing.certification,
            weight: listing.weight,
            diameter: listing.diameter,
            composition: listing.composition,
            mint: listing.mint,
            year: listing.year,
            starting_bid: listing.starting_bid,
            current_bid: listing.starting_bid,
            buy_now_price: listing.buy_now_price,
            bid_count: 0,
            status: ListingStatus::Open,
            created_at: listing.created_at,
            end_time: listing.end_time,
        };
        let stored = StoredListing {
            listing: listing.clone(),
            bids: Vec::new(),
            version: 0,
        };
        self.listings
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(stored)));
        Ok(listing)
    }

    async fn fetch(&self, id: i64) -> Result<Option<(Listing, i64)>, StoreError> {
        match self.entry(id).await {
            Some(entry) => {
                let stored = entry.lock().await;
                Ok(Some((stored.listing.clone(), stored.version)))
            }
            None => Ok(None),
        }
    }

    async fn list(&self, filter: &ListingFilter) -> Result<Vec<Listing>, StoreError> {
        let entries: Vec<_> = self.listings.read().await.values().cloned().collect();
        let mut listings = Vec::with_capacity(entries.len());
        for entry in entries {
            let stored = entry.lock().await;
            let listing = &stored.listing;
            if let Some(status) = filter.status {
                if listing.status != status {
                    continue;
                }
            }
            if let Some(category) = &filter.category {
                if &listing.category != category {
                    continue;
                }
            }
            listings.push(listing.clone());
        }
        // 반복 호출 간 순서 고정: 최신 생성순, 같으면 id 역순
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(listings)
    }

    async fn bids(&self, listing_id: i64) -> Result<Vec<Bid>, StoreError> {
        match self.entry(listing_id).await {
            Some(entry) => Ok(entry.lock().await.bids.clone()),
            None => Ok(Vec::new()),
        }
    }

    async fn highest_bid(&self, listing_id: i64) -> Result<Option<i64>, StoreError> {
        match self.entry(listing_id).await {
            Some(entry) => Ok(entry.lock().await.bids.iter().map(|b| b.amount).max()),
            None => Ok(None),
        }
    }

    async fn append_bid(
        &self,
        listing_id: i64,
        bid: NewBid,
        expected_version: i64,
    ) -> Result<Option<Listing>, StoreError> {
        let Some(entry) = self.entry(listing_id).await else {
            return Ok(None);
        };
        let mut stored = entry.lock().await;
        // 검증은 잠금 밖의 스냅샷에 대해 이루어졌으므로 버전으로 재확인한다
        if stored.version != expected_version {
            return Ok(None);
        }
        let bid_id = self.next_bid_id.fetch_add(1, Ordering::SeqCst) + 1;
        stored.bids.push(Bid {
            id: bid_id,
            listing_id,
            amount: bid.amount,
            bidder: bid.bidder,
            placed_at: bid.placed_at,
        });
        stored.listing.current_bid = bid.amount;
        stored.listing.bid_count += 1;
        stored.version += 1;
        Ok(Some(stored.listing.clone()))
    }

    async fn set_closed(&self, id: i64) -> Result<Option<Listing>, StoreError> {
        let Some(entry) = self.entry(id).await else {
            return Ok(None);
        };
        let mut stored = entry.lock().await;
        if stored.listing.status == ListingStatus::Open {
            stored.listing.status = ListingStatus::Closed;
            stored.version += 1;
        }
        Ok(Some(stored.listing.clone()))
    }

    async fn close_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let entries: Vec<_> = self.listings.read().await.values().cloned().collect();
        let mut closed = 0;
        for entry in entries {
            let mut stored = entry.lock().await;
            if stored.listing.status == ListingStatus::Open && stored.listing.end_time <= now {
                stored.listing.status = ListingStatus::Closed;
                stored.version += 1;
                closed += 1;
            }
        }
        Ok(closed)
    }
}

// endregion: --- Memory Auction Store

// region:    --- Memory Moderation Store

#[derive(Default)]
pub struct MemoryModerationStore {
    items: RwLock<BTreeMap<i64, ModerationItem>>,
    next_id: AtomicI64,
}

impl MemoryModerationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ModerationRepository for MemoryModerationStore {
    async fn insert(&self, item: NewSubmission) -> Result<ModerationItem, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let item = ModerationItem {
            id,
            kind: item.kind,
            submitter_name: item.submitter_name,
            submitter_email: item.submitter_email,
            description: item.description,
            images: item.images,
            submitted_at: item.submitted_at,
            status: ModerationStatus::Pending,
            reviewed_at: None,
        };
        self.items.write().await.insert(id, item.clone());
        Ok(item)
    }

    async fn fetch(&self, id: i64) -> Result<Option<ModerationItem>, StoreError> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn list(
        &self,
        status: Option<ModerationStatus>,
    ) -> Result<Vec<ModerationItem>, StoreError> {
        let items = self.items.read().await;
        let mut result: Vec<_> = items
            .values()
            .filter(|item| status.map_or(true, |s| item.status == s))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then(b.id.cmp(&a.id)));
        Ok(result)
    }

    async fn decide(
        &self,
        id: i64,
        verdict: ModerationStatus,
        reviewed_at: DateTime<Utc>,
    ) -> Result<Option<ModerationItem>, StoreError> {
        let mut items = self.items.write().await;
        match items.get_mut(&id) {
            // 쓰기 잠금 아래에서 PENDING 확인과 전이를 함께 수행한다
            Some(item) if item.status == ModerationStatus::Pending => {
                item.status = verdict;
                item.reviewed_at = Some(reviewed_at);
                Ok(Some(item.clone()))
            }
            _ => Ok(None),
        }
    }
}

// endregion: --- Memory Moderation Store
