/// HTTP 계층: 라우터와 요청 핸들러
/// 요청 본문은 경계에서 명시적 커맨드 타입으로 역직렬화한 뒤 핵심 로직에 넘긴다.
// region:    --- Imports
use crate::bidding::commands::{
    handle_close_auction as command_close_auction,
    handle_create_auction as command_create_auction, handle_place_bid as command_place_bid,
    CreateAuctionCommand, PlaceBidCommand,
};
use crate::bidding::model::ListingFilter;
use crate::error::Result;
use crate::moderation::commands::{
    handle_approve as command_approve, handle_reject as command_reject,
    handle_submit as command_submit, SubmitCommand,
};
use crate::moderation::model::ModerationStatus;
use crate::query;
use crate::store::{AuctionRepository, ModerationRepository};
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

// endregion: --- Imports

// region:    --- App State & Router

/// 핸들러에 주입되는 저장소 핸들 묶음
#[derive(Clone)]
pub struct AppState {
    pub auctions: Arc<dyn AuctionRepository>,
    pub moderation: Arc<dyn ModerationRepository>,
}

/// 라우터 구성
pub fn router(state: AppState) -> Router {
    // 별도 프런트엔드를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/auctions",
            post(handle_create_auction).get(handle_get_auctions),
        )
        .route("/bid", post(handle_bid))
        .route("/auctions/:id", get(handle_get_auction))
        .route("/auctions/:id/close", post(handle_close_auction))
        .route("/auctions/:id/bids", get(handle_get_bid_history))
        .route("/auctions/:id/highest-bid", get(handle_get_highest_bid))
        .route(
            "/submissions",
            post(handle_submit).get(handle_get_submissions),
        )
        .route("/submissions/:id", get(handle_get_submission))
        .route("/submissions/:id/approve", post(handle_approve))
        .route("/submissions/:id/reject", post(handle_reject))
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024 * 20))
        .with_state(state)
}

// endregion: --- App State & Router

// region:    --- Command Handlers

/// 경매 등록 요청 처리
pub async fn handle_create_auction(
    State(state): State<AppState>,
    Json(cmd): Json<CreateAuctionCommand>,
) -> Result<impl IntoResponse> {
    let listing = command_create_auction(cmd, state.auctions.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// 입찰 요청 처리
pub async fn handle_bid(
    State(state): State<AppState>,
    Json(cmd): Json<PlaceBidCommand>,
) -> Result<impl IntoResponse> {
    let listing = command_place_bid(cmd, state.auctions.as_ref()).await?;
    Ok(Json(listing))
}

/// 관리자 경매 종료 요청 처리
pub async fn handle_close_auction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let listing = command_close_auction(id, state.auctions.as_ref()).await?;
    Ok(Json(listing))
}

/// 제출 접수 요청 처리
pub async fn handle_submit(
    State(state): State<AppState>,
    Json(cmd): Json<SubmitCommand>,
) -> Result<impl IntoResponse> {
    let item = command_submit(cmd, state.moderation.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// 승인 요청 처리
pub async fn handle_approve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let item = command_approve(id, state.moderation.as_ref()).await?;
    Ok(Json(item))
}

/// 반려 요청 처리
pub async fn handle_reject(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let item = command_reject(id, state.moderation.as_ref()).await?;
    Ok(Json(item))
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 경매 목록 조회
pub async fn handle_get_auctions(
    State(state): State<AppState>,
    Query(filter): Query<ListingFilter>,
) -> Result<impl IntoResponse> {
    let listings = query::handlers::list_auctions(state.auctions.as_ref(), &filter).await?;
    Ok(Json(listings))
}

/// 경매 조회
pub async fn handle_get_auction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let listing = query::handlers::get_auction(state.auctions.as_ref(), id).await?;
    Ok(Json(listing))
}

/// 입찰 이력 조회
pub async fn handle_get_bid_history(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let bids = query::handlers::get_bid_history(state.auctions.as_ref(), id).await?;
    Ok(Json(bids))
}

/// 최고 입찰가 조회
pub async fn handle_get_highest_bid(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let highest = query::handlers::get_highest_bid(state.auctions.as_ref(), id).await?;
    Ok(Json(serde_json::json!({ "highest_bid": highest })))
}

/// 제출물 목록 조회 필터
#[derive(Debug, Deserialize)]
pub struct SubmissionFilter {
    pub status: Option<ModerationStatus>,
}

/// 제출물 목록 조회
pub async fn handle_get_submissions(
    State(state): State<AppState>,
    Query(filter): Query<SubmissionFilter>,
) -> Result<impl IntoResponse> {
    let items =
        query::handlers::list_submissions(state.moderation.as_ref(), filter.status).await?;
    Ok(Json(items))
}

/// 제출물 조회
pub async fn handle_get_submission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let item = query::handlers::get_submission(state.moderation.as_ref(), id).await?;
    Ok(Json(item))
}

// endregion: --- Query Handlers
