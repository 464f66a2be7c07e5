/// 심사 커맨드 처리
/// 1. 제출 접수
/// 2. 승인 / 반려 (PENDING에서 단 한 번만)
// region:    --- Imports
use crate::error::{Error, Result};
use crate::moderation::model::{ModerationItem, ModerationStatus, NewSubmission, SubmissionKind};
use crate::store::ModerationRepository;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

// endregion: --- Imports

// region:    --- Commands

/// 제출 명령 (판매 의뢰 또는 감정 의뢰)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubmitCommand {
    pub kind: SubmissionKind,
    pub submitter_name: String,
    pub submitter_email: String,
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// 1. 제출 접수
/// 내용 심사는 사람의 일이므로 필수 필드 존재 여부만 확인한다.
pub async fn handle_submit(
    cmd: SubmitCommand,
    repo: &dyn ModerationRepository,
) -> Result<ModerationItem> {
    info!(
        "{:<12} --> 제출 접수: {:?} ({})",
        "Moderation", cmd.kind, cmd.submitter_name
    );

    if cmd.submitter_name.trim().is_empty() {
        return Err(Error::Validation {
            field: "submitter_name",
            reason: "제출자 이름은 비어 있을 수 없습니다",
        });
    }
    if cmd.submitter_email.trim().is_empty() {
        return Err(Error::Validation {
            field: "submitter_email",
            reason: "제출자 연락처는 비어 있을 수 없습니다",
        });
    }
    if cmd.description.trim().is_empty() {
        return Err(Error::Validation {
            field: "description",
            reason: "설명은 비어 있을 수 없습니다",
        });
    }

    let item = repo
        .insert(NewSubmission {
            kind: cmd.kind,
            submitter_name: cmd.submitter_name,
            submitter_email: cmd.submitter_email,
            description: cmd.description,
            images: cmd.images,
            submitted_at: Utc::now(),
        })
        .await?;

    info!("{:<12} --> 제출 접수 완료 id: {}", "Moderation", item.id);
    Ok(item)
}

/// 2-a. 승인
pub async fn handle_approve(id: i64, repo: &dyn ModerationRepository) -> Result<ModerationItem> {
    decide(id, ModerationStatus::Approved, repo).await
}

/// 2-b. 반려
pub async fn handle_reject(id: i64, repo: &dyn ModerationRepository) -> Result<ModerationItem> {
    decide(id, ModerationStatus::Rejected, repo).await
}

/// 판정 공통 처리
/// PENDING 확인과 상태 기록은 저장소의 조건부 갱신 하나로 이루어지므로
/// 두 심사자가 동시에 판정해도 한쪽만 성공한다.
async fn decide(
    id: i64,
    verdict: ModerationStatus,
    repo: &dyn ModerationRepository,
) -> Result<ModerationItem> {
    info!(
        "{:<12} --> 판정 요청 id: {}, 판정: {}",
        "Moderation", id, verdict
    );

    match repo.decide(id, verdict, Utc::now()).await? {
        Some(item) => {
            info!(
                "{:<12} --> 판정 완료 id: {}, 상태: {}",
                "Moderation", item.id, item.status
            );
            Ok(item)
        }
        None => {
            // 조건부 갱신 실패: 항목이 없거나 이미 판정된 경우를 재조회로 구분한다
            let current = repo.fetch(id).await?.ok_or(Error::NotFound {
                entity: "submission",
                id,
            })?;
            Err(Error::AlreadyReviewed {
                id,
                status: current.status,
            })
        }
    }
}

// endregion: --- Commands
