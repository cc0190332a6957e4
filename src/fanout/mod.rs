/// 이벤트 팬아웃
/// 접속별 구독 상태를 소유하고, 확정된 상태 변경 이벤트를 구독자에게 전달한다.
/// 발행 시점에 구독 중인 접속에만 최대 한 번 전달하며, 재전송 백로그는 없다.
// region:    --- Imports
use crate::auction::events::AuctionEvent;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

// endregion: --- Imports

// region:    --- Event Fanout
/// 접속 식별자
pub type ConnId = u64;

/// 접속당 전달 큐 크기. 가득 차면 해당 전달은 버려지고 발행자는 기다리지 않는다.
const DELIVERY_QUEUE_CAPACITY: usize = 64;

struct Subscriber {
    tx: mpsc::Sender<serde_json::Value>,
    auction_ids: HashSet<i64>,
}

pub struct EventFanout {
    next_conn_id: AtomicU64,
    subscribers: Mutex<HashMap<ConnId, Subscriber>>,
}

impl Default for EventFanout {
    fn default() -> Self {
        Self::new()
    }
}

impl EventFanout {
    pub fn new() -> Self {
        EventFanout {
            next_conn_id: AtomicU64::new(1),
            subscribers: Mutex::new(HashMap::new()),
        }
    }

    /// 접속 등록: 접속 id와 접속 전용 수신 채널 반환
    pub async fn register(&self) -> (ConnId, mpsc::Receiver<serde_json::Value>) {
        let conn_id = self.next_conn_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(DELIVERY_QUEUE_CAPACITY);
        self.subscribers.lock().await.insert(
            conn_id,
            Subscriber {
                tx,
                auction_ids: HashSet::new(),
            },
        );
        debug!("{:<12} --> 접속 등록: conn={}", "Fanout", conn_id);
        (conn_id, rx)
    }

    /// 접속 해제: 구독 상태 제거
    pub async fn unregister(&self, conn_id: ConnId) {
        self.subscribers.lock().await.remove(&conn_id);
        debug!("{:<12} --> 접속 해제: conn={}", "Fanout", conn_id);
    }

    /// 경매 구독
    pub async fn subscribe(&self, conn_id: ConnId, auction_id: i64) {
        if let Some(sub) = self.subscribers.lock().await.get_mut(&conn_id) {
            sub.auction_ids.insert(auction_id);
        }
    }

    /// 경매 구독 해지
    pub async fn unsubscribe(&self, conn_id: ConnId, auction_id: i64) {
        if let Some(sub) = self.subscribers.lock().await.get_mut(&conn_id) {
            sub.auction_ids.remove(&auction_id);
        }
    }

    /// 이벤트 발행
    /// 발행 시점에 해당 경매를 구독 중인 모든 접속에 전달한다.
    /// 느리거나 끊긴 접속은 해당 전달만 버려지며 발행자를 막지 않는다.
    pub async fn publish(&self, event: &AuctionEvent) {
        let auction_id = event.auction_id();
        let payload = match serde_json::to_value(event) {
            Ok(v) => v,
            Err(e) => {
                warn!("{:<12} --> 이벤트 직렬화 실패: {:?}", "Fanout", e);
                return;
            }
        };

        let subscribers = self.subscribers.lock().await;
        for (conn_id, sub) in subscribers.iter() {
            if !sub.auction_ids.contains(&auction_id) {
                continue;
            }
            if sub.tx.try_send(payload.clone()).is_err() {
                // 큐가 가득 찼거나 접속이 끊긴 경우: 전달 포기
                warn!(
                    "{:<12} --> 이벤트 전달 실패(버림): conn={}, auction={}",
                    "Fanout", conn_id, auction_id
                );
            }
        }
    }

    /// 특정 접속에만 직접 전달 (입찰 거절 등 제출자 전용 응답)
    pub async fn send_direct(&self, conn_id: ConnId, payload: serde_json::Value) {
        let subscribers = self.subscribers.lock().await;
        if let Some(sub) = subscribers.get(&conn_id) {
            if sub.tx.try_send(payload).is_err() {
                warn!("{:<12} --> 직접 전달 실패: conn={}", "Fanout", conn_id);
            }
        }
    }
}
// endregion: --- Event Fanout
