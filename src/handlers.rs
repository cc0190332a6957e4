// region:    --- Imports
use crate::auction::model::NewAuction;
use crate::bidding::commands::{BidEngine, PlaceBidCommand};
use crate::database::DatabaseManager;
use crate::error::CoreError;
use crate::query;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

// endregion: --- Imports

/// 경계 계층 공유 상태
pub type AppState = (Arc<BidEngine>, Arc<DatabaseManager>);

// region:    --- Command Handlers

/// 입찰 요청 처리 (동기 요청/응답)
pub async fn handle_bid(
    State((engine, _)): State<AppState>,
    Json(cmd): Json<PlaceBidCommand>,
) -> impl IntoResponse {
    info!("{:<12} --> 입찰 요청 수신: {:?}", "Handler", cmd);

    match engine.submit_bid(cmd).await {
        Ok(accepted) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "message": "입찰이 성공적으로 처리되었습니다.",
                "current_price": accepted.current_price,
                "bid_amount": accepted.bid.amount,
            })),
        )
            .into_response(),
        Err(e) => (e.status_code(), Json(e.to_json())).into_response(),
    }
}

/// 자산 등록 처리 (파일 저장은 외부 협력자 몫, 여기서는 메타데이터만 받는다)
pub async fn handle_create_asset(
    State((engine, _)): State<AppState>,
    Json(new): Json<NewAuction>,
) -> impl IntoResponse {
    info!("{:<12} --> 자산 등록 요청: {}", "Handler", new.title);

    if new.title.trim().is_empty() {
        let e = CoreError::InvalidInput("제목은 비워둘 수 없습니다.".to_string());
        return (e.status_code(), Json(e.to_json())).into_response();
    }
    if !new.initial_price.is_finite() || new.initial_price < 0.0 {
        let e = CoreError::InvalidInput("시작 가격은 0 이상의 유한한 수여야 합니다.".to_string());
        return (e.status_code(), Json(e.to_json())).into_response();
    }
    if new.start_time >= new.end_time {
        let e = CoreError::InvalidInput("시작 시간은 종료 시간보다 앞서야 합니다.".to_string());
        return (e.status_code(), Json(e.to_json())).into_response();
    }

    match engine.gateway().insert_auction(&new).await {
        Ok(auction) => {
            engine.store().insert(auction.clone());
            (StatusCode::CREATED, Json(auction)).into_response()
        }
        Err(e) => (e.status_code(), Json(e.to_json())).into_response(),
    }
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 경매 목록 조회
pub async fn handle_get_auctions(State((_, db_manager)): State<AppState>) -> impl IntoResponse {
    match query::handlers::get_all_auctions(&db_manager).await {
        Ok(auctions) => Json(auctions).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// 경매 단건 조회
pub async fn handle_get_auction(
    State((_, db_manager)): State<AppState>,
    Path(auction_id): Path<i64>,
) -> impl IntoResponse {
    match query::handlers::get_auction(&db_manager, auction_id).await {
        Ok(Some(auction)) => Json(auction).into_response(),
        Ok(None) => {
            let e = CoreError::AuctionNotFound;
            (e.status_code(), Json(e.to_json())).into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// 입찰 이력 조회
pub async fn handle_get_bids(
    State((_, db_manager)): State<AppState>,
    Path(auction_id): Path<i64>,
) -> impl IntoResponse {
    match query::handlers::get_bid_history(&db_manager, auction_id).await {
        Ok(bids) => Json(bids).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

// endregion: --- Query Handlers

// region:    --- WebSocket Handler

/// 웹소켓 인바운드 메시지
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum ClientAction {
    Subscribe { auction_id: i64 },
    Unsubscribe { auction_id: i64 },
    PlaceBid(PlaceBidCommand),
}

/// 웹소켓 접속 업그레이드
pub async fn handle_ws(
    State((engine, _)): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, engine))
}

/// 접속 하나의 수명: 등록 -> 구독/입찰 처리 -> 해제
async fn handle_socket(socket: WebSocket, engine: Arc<BidEngine>) {
    let fanout = Arc::clone(engine.fanout());
    let (conn_id, mut rx) = fanout.register().await;
    let (mut ws_tx, mut ws_rx) = socket.split();

    // 팬아웃 큐 -> 소켓 전달 태스크
    let send_task = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if ws_tx
                .send(Message::Text(payload.to_string()))
                .await
                .is_err()
            {
                break;
            }
        }
    });

    while let Some(Ok(message)) = ws_rx.next().await {
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        match serde_json::from_str::<ClientAction>(&text) {
            Ok(ClientAction::Subscribe { auction_id }) => {
                fanout.subscribe(conn_id, auction_id).await;
            }
            Ok(ClientAction::Unsubscribe { auction_id }) => {
                fanout.unsubscribe(conn_id, auction_id).await;
            }
            Ok(ClientAction::PlaceBid(cmd)) => {
                // 거절은 제출한 접속에만 전달된다. 수락은 브로드캐스트로 확인된다.
                if let Err(e) = engine.submit_bid(cmd).await {
                    fanout
                        .send_direct(
                            conn_id,
                            serde_json::json!({ "event": "bid_error", "data": e.to_json() }),
                        )
                        .await;
                }
            }
            Err(e) => {
                warn!(
                    "{:<12} --> 해석할 수 없는 메시지: conn={}, {:?}",
                    "Handler", conn_id, e
                );
            }
        }
    }

    // 접속 해제: 구독 제거 후 전달 태스크는 채널 종료로 끝난다
    fanout.unregister(conn_id).await;
    let _ = send_task.await;
}

// endregion: --- WebSocket Handler
