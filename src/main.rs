// region:    --- Imports
use axum::routing::{get, post};
use axum::Router;
use live_auction_service::bidding::admission::AdmissionControl;
use live_auction_service::bidding::commands::BidEngine;
use live_auction_service::database::DatabaseManager;
use live_auction_service::fanout::EventFanout;
use live_auction_service::gateway::{AuctionFilter, PersistenceGateway, PostgresGateway};
use live_auction_service::handlers;
use live_auction_service::scheduler::LifecycleScheduler;
use live_auction_service::store::AuctionStateStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // DatabaseManager 생성 및 스키마 초기화
    let db_manager = Arc::new(DatabaseManager::new().await);
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    // 영속화 게이트웨이와 상태 저장소 적재
    let gateway: Arc<dyn PersistenceGateway> =
        Arc::new(PostgresGateway::new(Arc::clone(&db_manager)));
    let store = Arc::new(AuctionStateStore::new());
    let auctions = gateway.find_auctions(AuctionFilter::default()).await?;
    info!("{:<12} --> 경매 {}건 적재", "Main", auctions.len());
    store.hydrate(auctions);

    // 이벤트 팬아웃, 평가권 레지스트리, 입찰 엔진
    let fanout = Arc::new(EventFanout::new());
    let admission = Arc::new(AdmissionControl::new());
    let engine = Arc::new(BidEngine::new(
        Arc::clone(&store),
        Arc::clone(&gateway),
        Arc::clone(&admission),
        Arc::clone(&fanout),
    ));

    // 수명주기 스케줄러 시작
    let tick_secs = std::env::var("SCHEDULER_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);
    let scheduler = Arc::new(LifecycleScheduler::new(
        store,
        gateway,
        admission,
        Arc::clone(&fanout),
        Duration::from_secs(tick_secs),
    ));
    scheduler.start();

    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 라우터 설정
    let routes_all = Router::new()
        .route("/api/bid", post(handlers::handle_bid))
        .route("/api/assets", post(handlers::handle_create_asset))
        .route("/api/auctions", get(handlers::handle_get_auctions))
        .route("/api/auctions/:id", get(handlers::handle_get_auction))
        .route("/api/bids/:auction_id", get(handlers::handle_get_bids))
        .route("/ws", get(handlers::handle_ws))
        .layer(cors)
        .with_state((engine, db_manager));

    // 리스너 생성
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
    let listener = TcpListener::bind(&bind_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
