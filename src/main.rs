// region:    --- Imports
use coin_auction_service::database::DatabaseManager;
use coin_auction_service::handlers::{self, AppState};
use coin_auction_service::scheduler::AuctionScheduler;
use coin_auction_service::store::postgres::{PostgresAuctionStore, PostgresModerationStore};
use coin_auction_service::store::{AuctionRepository, ModerationRepository};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 로딩 (없으면 무시)
    dotenvy::dotenv().ok();

    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // DatabaseManager 생성
    let db_manager = Arc::new(DatabaseManager::new().await);

    // 데이터베이스 초기화
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    // 저장소 핸들 구성
    let auctions: Arc<dyn AuctionRepository> =
        Arc::new(PostgresAuctionStore::new(db_manager.get_pool()));
    let moderation: Arc<dyn ModerationRepository> =
        Arc::new(PostgresModerationStore::new(db_manager.get_pool()));

    // 만료 출품 정리 스케줄러 시작
    let scheduler = AuctionScheduler::new(Arc::clone(&auctions));
    scheduler.start().await;

    // 라우터 설정
    let app = handlers::router(AppState {
        auctions,
        moderation,
    });

    // 리스너 생성
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, app.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
