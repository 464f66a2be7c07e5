/// 서비스 오류 타입
/// 모든 실패는 종류(code)와 원인 필드를 담아 구조화된 JSON으로 응답한다.
/// 업무 규칙 위반은 전부 최종 실패이며, 호출자는 입력을 고쳐 다시 요청해야 한다.
// region:    --- Imports
use crate::moderation::model::ModerationStatus;
use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

// endregion: --- Imports

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// 입력 값이 제약을 위반함
    #[error("{field}: {reason}")]
    Validation {
        field: &'static str,
        reason: &'static str,
    },

    /// 참조한 id가 존재하지 않음
    #[error("{entity}(id: {id})을(를) 찾을 수 없습니다")]
    NotFound { entity: &'static str, id: i64 },

    /// 종료된 경매에 대한 입찰
    #[error("경매가 이미 종료되었습니다 (id: {id})")]
    AuctionClosed { id: i64 },

    /// 현재 가격 이하의 입찰 (동액 입찰도 거부)
    #[error("입찰 금액 {amount}은(는) 현재 가격 {current_bid}보다 높아야 합니다")]
    BidTooLow { amount: i64, current_bid: i64 },

    /// 이미 판정이 끝난 제출물에 대한 재판정
    #[error("이미 심사가 완료된 제출물입니다 (id: {id}, 상태: {status})")]
    AlreadyReviewed { id: i64, status: ModerationStatus },

    /// 저장소 협력자의 실패 (핵심 로직은 그대로 전파만 한다)
    #[error("저장소 오류: {0}")]
    Storage(#[from] StoreError),
}

impl Error {
    /// 호출자가 분기할 수 있는 고정 오류 코드
    pub fn code(&self) -> &'static str {
        match self {
            Error::Validation { .. } => "VALIDATION_ERROR",
            Error::NotFound { .. } => "NOT_FOUND",
            Error::AuctionClosed { .. } => "AUCTION_CLOSED",
            Error::BidTooLow { .. } => "BID_TOO_LOW",
            Error::AlreadyReviewed { .. } => "ALREADY_REVIEWED",
            Error::Storage(_) => "STORAGE_UNAVAILABLE",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::AuctionClosed { .. } => StatusCode::BAD_REQUEST,
            Error::BidTooLow { .. } => StatusCode::BAD_REQUEST,
            Error::AlreadyReviewed { .. } => StatusCode::CONFLICT,
            Error::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({
            "error": self.to_string(),
            "code": self.code(),
        });
        // 호출자가 구체적인 안내 문구를 만들 수 있도록 문맥 값을 함께 싣는다
        match &self {
            Error::Validation { field, .. } => {
                body["field"] = serde_json::json!(field);
            }
            Error::BidTooLow { current_bid, .. } => {
                body["current_bid"] = serde_json::json!(current_bid);
            }
            Error::AlreadyReviewed { status, .. } => {
                body["status"] = serde_json::json!(status);
            }
            _ => {}
        }
        (self.status_code(), Json(body)).into_response()
    }
}
