/// 저장소 추상화
/// 핵심 로직은 전역 상태를 직접 만지지 않고 생성 시점에 주입받은
/// 저장소 핸들을 통해서만 상태를 읽고 쓴다.
// region:    --- Imports
use crate::bidding::model::{Bid, Listing, ListingFilter, NewBid, NewListing};
use crate::moderation::model::{ModerationItem, ModerationStatus, NewSubmission};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

// endregion: --- Imports

pub mod memory;
pub mod postgres;
mod queries;

// region:    --- Store Error

/// 저장소 계층 오류
/// 업무 규칙 위반이 아닌, 저장소 협력자 자체의 실패만 담는다.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("저장소 레코드가 손상되었습니다: {0}")]
    Corrupt(String),
    #[error("경합으로 {attempts}회 재시도 후 적용하지 못했습니다")]
    Contended { attempts: u32 },
}

// endregion: --- Store Error

// region:    --- Auction Repository

/// 경매 출품 저장소 트레이트
///
/// `append_bid`는 조회 시점 버전을 조건으로 하는 단일 원자 연산이다.
/// 같은 출품에 대한 동시 입찰은 여기서 직렬화되고, 버전이 어긋난 쪽은
/// `Ok(None)`을 받아 커맨드 계층에서 재시도한다. 출품이 다른 입찰끼리는
/// 서로를 막지 않는다.
#[async_trait]
pub trait AuctionRepository: Send + Sync {
    /// 새 출품 삽입. 실패 시 어떤 부분 상태도 남기지 않는다.
    async fn insert(&self, listing: NewListing) -> Result<Listing, StoreError>;

    /// 출품과 현재 버전 조회
    async fn fetch(&self, id: i64) -> Result<Option<(Listing, i64)>, StoreError>;

    /// 필터 조건에 맞는 출품 목록 (최신 생성순, 변경이 없는 한 순서 고정)
    async fn list(&self, filter: &ListingFilter) -> Result<Vec<Listing>, StoreError>;

    /// 출품의 입찰 이력 (시간순)
    async fn bids(&self, listing_id: i64) -> Result<Vec<Bid>, StoreError>;

    /// 최고 입찰가 (입찰이 없으면 None)
    async fn highest_bid(&self, listing_id: i64) -> Result<Option<i64>, StoreError>;

    /// 버전 조건부 입찰 반영: 입찰 기록 추가 + current_bid/bid_count 갱신을
    /// 한 번에 적용한다. 버전 불일치면 `Ok(None)`, 출품이 없으면 역시 `Ok(None)`
    /// (호출 측은 재조회로 구분한다).
    async fn append_bid(
        &self,
        listing_id: i64,
        bid: NewBid,
        expected_version: i64,
    ) -> Result<Option<Listing>, StoreError>;

    /// 관리자 종료: 종료 시각과 무관하게 CLOSED로 전이 (이미 CLOSED여도 성공)
    async fn set_closed(&self, id: i64) -> Result<Option<Listing>, StoreError>;

    /// 종료 시각이 지난 OPEN 출품을 일괄 CLOSED 처리, 처리 건수 반환
    async fn close_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;
}

// endregion: --- Auction Repository

// region:    --- Moderation Repository

/// 심사 대기열 저장소 트레이트
#[async_trait]
pub trait ModerationRepository: Send + Sync {
    async fn insert(&self, item: NewSubmission) -> Result<ModerationItem, StoreError>;

    async fn fetch(&self, id: i64) -> Result<Option<ModerationItem>, StoreError>;

    async fn list(
        &self,
        status: Option<ModerationStatus>,
    ) -> Result<Vec<ModerationItem>, StoreError>;

    /// PENDING 상태일 때만 판정을 기록하는 조건부 갱신.
    /// 이미 판정된 항목(또는 동시 판정 경합에서 패배한 쪽)은 `Ok(None)`.
    async fn decide(
        &self,
        id: i64,
        verdict: ModerationStatus,
        reviewed_at: DateTime<Utc>,
    ) -> Result<Option<ModerationItem>, StoreError>;
}

// endregion: --- Moderation Repository
