/// 경매 커맨드 처리
/// 1. 경매 등록
/// 2. 입찰
/// 3. 관리자 종료
// region:    --- Imports
use crate::bidding::model::{is_open, Listing, NewBid, NewListing};
use crate::error::{Error, Result};
use crate::store::{AuctionRepository, StoreError};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands

/// 경매 등록 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateAuctionCommand {
    pub title: String,
    pub description: String,
    pub category: String,
    pub grade: String,
    pub certification: Option<String>,
    pub weight: Option<f64>,
    pub diameter: Option<f64>,
    pub composition: String,
    pub mint: String,
    pub year: String,
    pub starting_bid: i64,
    pub buy_now_price: Option<i64>,
    pub duration_days: i64,
}

/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub listing_id: i64,
    pub amount: i64,
    pub bidder: String,
}

// 버전 충돌 시 최대 재시도 횟수
const MAX_RETRIES: u32 = 100;

/// 1. 경매 등록
pub async fn handle_create_auction(
    cmd: CreateAuctionCommand,
    repo: &dyn AuctionRepository,
) -> Result<Listing> {
    info!("{:<12} --> 경매 등록 요청: {:?}", "Command", cmd.title);

    // 입력 검증: 하나라도 실패하면 어떤 상태도 만들지 않는다
    if cmd.title.trim().is_empty() {
        return Err(Error::Validation {
            field: "title",
            reason: "제목은 비어 있을 수 없습니다",
        });
    }
    if cmd.category.trim().is_empty() {
        return Err(Error::Validation {
            field: "category",
            reason: "카테고리는 비어 있을 수 없습니다",
        });
    }
    if cmd.year.trim().is_empty() {
        return Err(Error::Validation {
            field: "year",
            reason: "발행 연도는 비어 있을 수 없습니다",
        });
    }
    if cmd.starting_bid <= 0 {
        return Err(Error::Validation {
            field: "starting_bid",
            reason: "시작가는 0보다 커야 합니다",
        });
    }
    if let Some(buy_now_price) = cmd.buy_now_price {
        if buy_now_price < cmd.starting_bid {
            return Err(Error::Validation {
                field: "buy_now_price",
                reason: "즉시 구매 가격은 시작가 이상이어야 합니다",
            });
        }
    }
    if cmd.duration_days <= 0 {
        return Err(Error::Validation {
            field: "duration_days",
            reason: "경매 기간은 1일 이상이어야 합니다",
        });
    }

    let now = Utc::now();
    let listing = repo
        .insert(NewListing {
            title: cmd.title,
            description: cmd.description,
            category: cmd.category,
            grade: cmd.grade,
            certification: cmd.certification,
            weight: cmd.weight,
            diameter: cmd.diameter,
            composition: cmd.composition,
            mint: cmd.mint,
            year: cmd.year,
            starting_bid: cmd.starting_bid,
            buy_now_price: cmd.buy_now_price,
            created_at: now,
            end_time: now + Duration::days(cmd.duration_days),
        })
        .await?;

    info!(
        "{:<12} --> 경매 등록 완료 id: {}, 종료 시각: {}",
        "Command", listing.id, listing.end_time
    );
    Ok(listing)
}

/// 2. 입찰
///
/// 낙관적 동시성 루프: 버전과 함께 출품을 읽고 검증한 뒤, 그 버전을 조건으로
/// 입찰을 반영한다. 다른 입찰이 먼저 반영되어 버전이 어긋나면 처음부터 다시
/// 읽는다. 업무 규칙 위반(종료, 저가 입찰)은 재시도 대상이 아니라 즉시 실패다.
pub async fn handle_place_bid(
    cmd: PlaceBidCommand,
    repo: &dyn AuctionRepository,
) -> Result<Listing> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);

    if cmd.amount <= 0 {
        return Err(Error::Validation {
            field: "amount",
            reason: "입찰 금액은 0보다 커야 합니다",
        });
    }
    if cmd.bidder.trim().is_empty() {
        return Err(Error::Validation {
            field: "bidder",
            reason: "입찰자 이름은 비어 있을 수 없습니다",
        });
    }

    let mut retries = 0;
    while retries < MAX_RETRIES {
        let (listing, version) = repo
            .fetch(cmd.listing_id)
            .await?
            .ok_or(Error::NotFound {
                entity: "listing",
                id: cmd.listing_id,
            })?;

        let now = Utc::now();

        // 종료 판정은 타이머가 아니라 입찰 시점에 게으르게 수행한다
        if !is_open(&listing, now) {
            return Err(Error::AuctionClosed { id: listing.id });
        }
        // 동액 입찰도 거부 (엄격한 초과만 허용)
        if cmd.amount <= listing.current_bid {
            return Err(Error::BidTooLow {
                amount: cmd.amount,
                current_bid: listing.current_bid,
            });
        }

        let bid = NewBid {
            amount: cmd.amount,
            bidder: cmd.bidder.clone(),
            placed_at: now,
        };
        match repo.append_bid(cmd.listing_id, bid, version).await? {
            Some(updated) => {
                info!(
                    "{:<12} --> 입찰 성공 id: {}, 현재 가격: {}",
                    "Command", updated.id, updated.current_bid
                );
                return Ok(updated);
            }
            None => {
                warn!(
                    "{:<12} --> 낙관적 업데이트 버전 충돌: 재시도 ({}회)",
                    "Command",
                    retries + 1
                );
                retries += 1;
            }
        }
    }

    Err(Error::Storage(StoreError::Contended {
        attempts: MAX_RETRIES,
    }))
}

/// 3. 관리자 종료 (종료 시각과 무관, 이미 종료된 경매에도 멱등)
pub async fn handle_close_auction(id: i64, repo: &dyn AuctionRepository) -> Result<Listing> {
    info!("{:<12} --> 관리자 경매 종료 요청 id: {}", "Command", id);
    repo.set_closed(id)
        .await?
        .ok_or(Error::NotFound {
            entity: "listing",
            id,
        })
}

// endregion: --- Commands
