/// Postgres 저장소 구현
/// 동시 입찰 직렬화는 listings.version 컬럼에 대한 조건부 UPDATE로 보장한다.
// region:    --- Imports
use super::queries;
use super::{AuctionRepository, ModerationRepository, StoreError};
use crate::bidding::model::{Bid, Listing, ListingFilter, ListingStatus, NewBid, NewListing};
use crate::moderation::model::{
    ModerationItem, ModerationStatus, NewSubmission, SubmissionKind,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

// region:    --- Rows

/// listings 테이블 행 (status는 TEXT, version 포함)
#[derive(Debug, FromRow)]
struct ListingRow {
    id: i64,
    title: String,
    description: String,
    category: String,
    grade: String,
    certification: Option<String>,
    weight: Option<f64>,
    diameter: Option<f64>,
    composition: String,
    mint: String,
    year: String,
    starting_bid: i64,
    current_bid: i64,
    buy_now_price: Option<i64>,
    bid_count: i64,
    status: String,
    version: i64,
    created_at: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

impl ListingRow {
    fn into_listing(self) -> Result<(Listing, i64), StoreError> {
        let status = ListingStatus::parse(&self.status)
            .ok_or_else(|| StoreError::Corrupt(format!("알 수 없는 경매 상태: {}", self.status)))?;
        let version = self.version;
        Ok((
            Listing {
                id: self.id,
                title: self.title,
                description: self.description,
                category: self.category,
                grade: self.grade,
                certification: self.certification,
                weight: self.weight,
                diameter: self.diameter,
                composition: self.composition,
                mint: self.mint,
                year: self.year,
                starting_bid: self.starting_bid,
                current_bid: self.current_bid,
                buy_now_price: self.buy_now_price,
                bid_count: self.bid_count,
                status,
                created_at: self.created_at,
                end_time: self.end_time,
            },
            version,
        ))
    }
}

/// submissions 테이블 행
#[derive(Debug, FromRow)]
struct SubmissionRow {
    id: i64,
    kind: String,
    submitter_name: String,
    submitter_email: String,
    description: String,
    images: Vec<String>,
    submitted_at: DateTime<Utc>,
    status: String,
    reviewed_at: Option<DateTime<Utc>>,
}

impl SubmissionRow {
    fn into_item(self) -> Result<ModerationItem, StoreError> {
        let kind = SubmissionKind::parse(&self.kind)
            .ok_or_else(|| StoreError::Corrupt(format!("알 수 없는 제출물 종류: {}", self.kind)))?;
        let status = ModerationStatus::parse(&self.status)
            .ok_or_else(|| StoreError::Corrupt(format!("알 수 없는 심사 상태: {}", self.status)))?;
        Ok(ModerationItem {
            id: self.id,
            kind,
            submitter_name: self.submitter_name,
            submitter_email: self.submitter_email,
            description: self.description,
            images: self.images,
            submitted_at: self.submitted_at,
            status,
            reviewed_at: self.reviewed_at,
        })
    }
}

// endregion: --- Rows

// region:    --- Postgres Auction Store

pub struct PostgresAuctionStore {
    pool: Arc<PgPool>,
}

impl PostgresAuctionStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuctionRepository for PostgresAuctionStore {
    async fn insert(&self, listing: NewListing) -> Result<Listing, StoreError> {
        let row = sqlx::query_as::<_, ListingRow>(queries::INSERT_LISTING)
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(&listing.category)
            .bind(&listing.grade)
            .bind(&listing.certification)
            .bind(listing.weight)
            .bind(listing.diameter)
            .bind(&listing.composition)
            .bind(&listing.mint)
            .bind(&listing.year)
            .bind(listing.starting_bid)
            .bind(listing.buy_now_price)
            .bind(listing.created_at)
            .bind(listing.end_time)
            .fetch_one(&*self.pool)
            .await?;
        let (listing, _) = row.into_listing()?;
        Ok(listing)
    }

    async fn fetch(&self, id: i64) -> Result<Option<(Listing, i64)>, StoreError> {
        let row = sqlx::query_as::<_, ListingRow>(queries::GET_LISTING)
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;
        row.map(ListingRow::into_listing).transpose()
    }

    async fn list(&self, filter: &ListingFilter) -> Result<Vec<Listing>, StoreError> {
        let status = filter.status.map(|s| s.as_str());
        let rows = sqlx::query_as::<_, ListingRow>(queries::LIST_LISTINGS)
            .bind(status)
            .bind(&filter.category)
            .fetch_all(&*self.pool)
            .await?;
        rows.into_iter()
            .map(|row| row.into_listing().map(|(listing, _)| listing))
            .collect()
    }

    async fn bids(&self, listing_id: i64) -> Result<Vec<Bid>, StoreError> {
        let bids = sqlx::query_as::<_, Bid>(queries::GET_BIDS)
            .bind(listing_id)
            .fetch_all(&*self.pool)
            .await?;
        Ok(bids)
    }

    async fn highest_bid(&self, listing_id: i64) -> Result<Option<i64>, StoreError> {
        let row = sqlx::query(queries::GET_HIGHEST_BID)
            .bind(listing_id)
            .fetch_one(&*self.pool)
            .await?;
        Ok(row.get("highest_bid"))
    }

    async fn append_bid(
        &self,
        listing_id: i64,
        bid: NewBid,
        expected_version: i64,
    ) -> Result<Option<Listing>, StoreError> {
        // 조건부 갱신과 입찰 기록 삽입은 한 트랜잭션으로 묶는다
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ListingRow>(queries::APPLY_BID)
            .bind(listing_id)
            .bind(bid.amount)
            .bind(expected_version)
            .fetch_optional(&mut *tx)
            .await?;

        match row {
            Some(row) => {
                sqlx::query(queries::INSERT_BID)
                    .bind(listing_id)
                    .bind(bid.amount)
                    .bind(&bid.bidder)
                    .bind(bid.placed_at)
                    .execute(&mut *tx)
                    .await?;
                tx.commit().await?;
                let (listing, _) = row.into_listing()?;
                Ok(Some(listing))
            }
            None => {
                // 버전 불일치 또는 없는 출품
                tx.rollback().await?;
                Ok(None)
            }
        }
    }

    async fn set_closed(&self, id: i64) -> Result<Option<Listing>, StoreError> {
        let row = sqlx::query_as::<_, ListingRow>(queries::SET_CLOSED)
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;
        row.map(|row| row.into_listing().map(|(listing, _)| listing))
            .transpose()
    }

    async fn close_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query(queries::CLOSE_EXPIRED)
            .bind(now)
            .execute(&*self.pool)
            .await?;
        let closed = result.rows_affected();
        if closed > 0 {
            info!("{:<12} --> 종료 시각 경과 출품 {}건 CLOSED 처리", "Store", closed);
        }
        Ok(closed)
    }
}

// endregion: --- Postgres Auction Store

// region:    --- Postgres Moderation Store

pub struct PostgresModerationStore {
    pool: Arc<PgPool>,
}

impl PostgresModerationStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ModerationRepository for PostgresModerationStore {
    async fn insert(&self, item: NewSubmission) -> Result<ModerationItem, StoreError> {
        let row = sqlx::query_as::<_, SubmissionRow>(queries::INSERT_SUBMISSION)
            .bind(item.kind.as_str())
            .bind(&item.submitter_name)
            .bind(&item.submitter_email)
            .bind(&item.description)
            .bind(&item.images)
            .bind(item.submitted_at)
            .fetch_one(&*self.pool)
            .await?;
        row.into_item()
    }

    async fn fetch(&self, id: i64) -> Result<Option<ModerationItem>, StoreError> {
        let row = sqlx::query_as::<_, SubmissionRow>(queries::GET_SUBMISSION)
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;
        row.map(SubmissionRow::into_item).transpose()
    }

    async fn list(
        &self,
        status: Option<ModerationStatus>,
    ) -> Result<Vec<ModerationItem>, StoreError> {
        let rows = sqlx::query_as::<_, SubmissionRow>(queries::LIST_SUBMISSIONS)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&*self.pool)
            .await?;
        rows.into_iter().map(SubmissionRow::into_item).collect()
    }

    async fn decide(
        &self,
        id: i64,
        verdict: ModerationStatus,
        reviewed_at: DateTime<Utc>,
    ) -> Result<Option<ModerationItem>, StoreError> {
        let row = sqlx::query_as::<_, SubmissionRow>(queries::DECIDE_SUBMISSION)
            .bind(id)
            .bind(verdict.as_str())
            .bind(reviewed_at)
            .fetch_optional(&*self.pool)
            .await?;
        row.map(SubmissionRow::into_item).transpose()
    }
}

// endregion: --- Postgres Moderation Store
