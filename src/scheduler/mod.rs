/// 경매 상태 정리 스케줄러
/// 종료 판정 자체는 입찰 시점의 게으른 검사로 보장되므로 이 스케줄러는
/// 조회 결과가 수렴하도록 종료 시각이 지난 OPEN 출품을 주기적으로 CLOSED 처리만 한다.
// region:    --- Imports
use crate::store::AuctionRepository;
use chrono::Utc;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, error};

// endregion: --- Imports

// region:    --- Auction Scheduler

pub struct AuctionScheduler {
    repo: Arc<dyn AuctionRepository>,
}

impl AuctionScheduler {
    pub fn new(repo: Arc<dyn AuctionRepository>) -> Self {
        Self { repo }
    }

    /// 스케줄러 시작 (1초 주기)
    pub async fn start(&self) {
        let repo = Arc::clone(&self.repo);
        tokio::spawn(async move {
            let mut interval = interval(Duration::from_secs(1));
            loop {
                interval.tick().await;
                match repo.close_expired(Utc::now()).await {
                    Ok(closed) if closed > 0 => {
                        debug!("{:<12} --> 만료 출품 {}건 정리", "Scheduler", closed);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!("{:<12} --> 경매 상태 정리 중 오류: {:?}", "Scheduler", e);
                    }
                }
            }
        });
    }
}

// endregion: --- Auction Scheduler
