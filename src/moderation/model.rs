use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// 제출물 종류: 판매 의뢰 주화 또는 감정 의뢰
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionKind {
    CoinListing,
    Appraisal,
}

impl SubmissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::CoinListing => "COIN_LISTING",
            SubmissionKind::Appraisal => "APPRAISAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "COIN_LISTING" => Some(SubmissionKind::CoinListing),
            "APPRAISAL" => Some(SubmissionKind::Appraisal),
            _ => None,
        }
    }
}

// 심사 상태
// PENDING -> APPROVED 또는 PENDING -> REJECTED, 단 한 번만 전이된다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "PENDING",
            ModerationStatus::Approved => "APPROVED",
            ModerationStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(ModerationStatus::Pending),
            "APPROVED" => Some(ModerationStatus::Approved),
            "REJECTED" => Some(ModerationStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// 심사 대기 항목 모델
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationItem {
    pub id: i64,
    pub kind: SubmissionKind,
    pub submitter_name: String,
    pub submitter_email: String,
    pub description: String,
    // 이미지 파일 참조만 보관한다 (업로드 처리는 외부 담당)
    pub images: Vec<String>,
    pub submitted_at: DateTime<Utc>,
    pub status: ModerationStatus,
    pub reviewed_at: Option<DateTime<Utc>>,
}

// 저장소에 새로 삽입할 제출물 (id는 저장소가 부여, 상태는 PENDING으로 시작)
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub kind: SubmissionKind,
    pub submitter_name: String,
    pub submitter_email: String,
    pub description: String,
    pub images: Vec<String>,
    pub submitted_at: DateTime<Utc>,
}
