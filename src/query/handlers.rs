/// 조회 핸들러 (읽기 전용)
// region:    --- Imports
use crate::bidding::model::{Bid, Listing, ListingFilter};
use crate::error::{Error, Result};
use crate::moderation::model::{ModerationItem, ModerationStatus};
use crate::store::{AuctionRepository, ModerationRepository};
use tracing::info;

// endregion: --- Imports

// region:    --- Query Handlers

/// 경매 상태 조회
pub async fn get_auction(repo: &dyn AuctionRepository, id: i64) -> Result<Listing> {
    info!("{:<12} --> 경매 조회 id: {}", "Query", id);
    let (listing, _) = repo.fetch(id).await?.ok_or(Error::NotFound {
        entity: "listing",
        id,
    })?;
    Ok(listing)
}

/// 경매 목록 조회 (상태/카테고리 필터)
pub async fn list_auctions(
    repo: &dyn AuctionRepository,
    filter: &ListingFilter,
) -> Result<Vec<Listing>> {
    info!("{:<12} --> 경매 목록 조회: {:?}", "Query", filter);
    Ok(repo.list(filter).await?)
}

/// 입찰 이력 조회 (시간순)
pub async fn get_bid_history(repo: &dyn AuctionRepository, id: i64) -> Result<Vec<Bid>> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "Query", id);
    // 출품 존재 확인 후 이력을 돌려준다
    repo.fetch(id).await?.ok_or(Error::NotFound {
        entity: "listing",
        id,
    })?;
    Ok(repo.bids(id).await?)
}

/// 최고 입찰가 조회 (입찰이 없으면 null)
pub async fn get_highest_bid(repo: &dyn AuctionRepository, id: i64) -> Result<Option<i64>> {
    info!("{:<12} --> 최고 입찰가 조회 id: {}", "Query", id);
    repo.fetch(id).await?.ok_or(Error::NotFound {
        entity: "listing",
        id,
    })?;
    Ok(repo.highest_bid(id).await?)
}

/// 제출물 목록 조회 (상태 필터)
pub async fn list_submissions(
    repo: &dyn ModerationRepository,
    status: Option<ModerationStatus>,
) -> Result<Vec<ModerationItem>> {
    info!("{:<12} --> 제출물 목록 조회: {:?}", "Query", status);
    Ok(repo.list(status).await?)
}

/// 제출물 조회
pub async fn get_submission(repo: &dyn ModerationRepository, id: i64) -> Result<ModerationItem> {
    info!("{:<12} --> 제출물 조회 id: {}", "Query", id);
    repo.fetch(id).await?.ok_or(Error::NotFound {
        entity: "submission",
        id,
    })
}

// endregion: --- Query Handlers
