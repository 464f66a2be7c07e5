use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 경매 상태
// OPEN -> CLOSED 단방향 전이만 허용된다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    Open,
    Closed,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Open => "OPEN",
            ListingStatus::Closed => "CLOSED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OPEN" => Some(ListingStatus::Open),
            "CLOSED" => Some(ListingStatus::Closed),
            _ => None,
        }
    }
}

// 경매 출품 모델 (주화 메타데이터 + 입찰 상태)
// 금액 필드는 모두 센트 단위 정수
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
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
    pub current_bid: i64,
    // 즉시 구매 가격은 표시용 정보 (자동 낙찰 없음)
    pub buy_now_price: Option<i64>,
    pub bid_count: i64,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

// 입찰 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub listing_id: i64,
    pub amount: i64,
    pub bidder: String,
    pub placed_at: DateTime<Utc>,
}

// 저장소에 새로 삽입할 출품 (id는 저장소가 부여)
#[derive(Debug, Clone)]
pub struct NewListing {
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
    pub created_at: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

// 저장소에 새로 추가할 입찰 (id는 저장소가 부여)
#[derive(Debug, Clone)]
pub struct NewBid {
    pub amount: i64,
    pub bidder: String,
    pub placed_at: DateTime<Utc>,
}

// 출품 목록 필터 (상태/카테고리 단순 통과 조건)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingFilter {
    pub status: Option<ListingStatus>,
    pub category: Option<String>,
}

/// 경매 진행 여부 판정
/// 종료 시각 경과는 별도 타이머 없이 모든 변경 연산 진입 시점에 이 함수로 판정한다.
pub fn is_open(listing: &Listing, now: DateTime<Utc>) -> bool {
    listing.status == ListingStatus::Open && now < listing.end_time
}
