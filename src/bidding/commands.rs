/// 입찰 수락 엔진
/// 경매별 평가권으로 동시 입찰을 직렬화하고, 수락 시 경매+입찰 쌍을
/// 원자적으로 저장한 뒤에만 이벤트를 발행한다.
// region:    --- Imports
use crate::auction::events::{AuctionEvent, BidDetails};
use crate::auction::model::Bid;
use crate::bidding::admission::AdmissionControl;
use crate::error::{CoreError, CoreResult};
use crate::fanout::EventFanout;
use crate::gateway::PersistenceGateway;
use crate::store::{AuctionStateStore, BidDecision};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info, warn};

// endregion: --- Imports

// region:    --- Commands
/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub auction_id: i64,
    pub bidder_id: i64,
    pub amount: f64,
}

/// 수락된 입찰 결과
#[derive(Debug, Serialize, Clone)]
pub struct BidAccepted {
    pub auction_id: i64,
    pub current_price: f64,
    pub previous_highest_bidder: Option<i64>,
    pub bid: Bid,
}
// endregion: --- Commands

// region:    --- Bid Engine
// 평가권 획득과 커밋 각각에 적용되는 대기 한도
const ADMISSION_TIMEOUT: Duration = Duration::from_secs(5);

pub struct BidEngine {
    store: Arc<AuctionStateStore>,
    gateway: Arc<dyn PersistenceGateway>,
    admission: Arc<AdmissionControl>,
    fanout: Arc<EventFanout>,
}

impl BidEngine {
    pub fn new(
        store: Arc<AuctionStateStore>,
        gateway: Arc<dyn PersistenceGateway>,
        admission: Arc<AdmissionControl>,
        fanout: Arc<EventFanout>,
    ) -> Self {
        BidEngine {
            store,
            gateway,
            admission,
            fanout,
        }
    }

    pub fn store(&self) -> &Arc<AuctionStateStore> {
        &self.store
    }

    pub fn gateway(&self) -> &Arc<dyn PersistenceGateway> {
        &self.gateway
    }

    pub fn fanout(&self) -> &Arc<EventFanout> {
        &self.fanout
    }

    /// 입찰 제출 처리
    pub async fn submit_bid(&self, cmd: PlaceBidCommand) -> CoreResult<BidAccepted> {
        info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "BidEngine", cmd);

        // 구조 검증
        if !cmd.amount.is_finite() || cmd.amount <= 0.0 {
            return Err(CoreError::InvalidInput(
                "입찰 금액은 0보다 큰 유한한 수여야 합니다.".to_string(),
            ));
        }

        // 입찰자 참조 확인
        let bidder = self
            .gateway
            .load_user(cmd.bidder_id)
            .await?
            .ok_or_else(|| CoreError::InvalidInput("입찰자를 찾을 수 없습니다.".to_string()))?;

        // 경매별 평가권 획득: 같은 경매의 입찰은 한 번에 하나만 평가된다
        let _guard = timeout(ADMISSION_TIMEOUT, self.admission.acquire(cmd.auction_id))
            .await
            .map_err(|_| CoreError::Timeout)?;

        let now = Utc::now();

        // 상태 저장소의 원자적 검증 및 갱신
        let (updated, previous, previous_highest_bidder) = match self.store.apply_bid_if_valid(
            cmd.auction_id,
            cmd.amount,
            cmd.bidder_id,
            now,
        ) {
            BidDecision::Accepted {
                updated,
                previous,
                previous_highest_bidder,
            } => (updated, previous, previous_highest_bidder),
            BidDecision::Rejected(e) => {
                warn!(
                    "{:<12} --> 입찰 거절: auction={}, code={}",
                    "BidEngine",
                    cmd.auction_id,
                    e.code()
                );
                return Err(e);
            }
        };

        // 경매 갱신과 입찰 추가를 하나의 트랜잭션으로 저장.
        // 실패하면 메모리 상태를 직전 스냅샷으로 복원해 저장소와 어긋나지 않게 한다.
        let bid = Bid {
            id: 0,
            auction_id: cmd.auction_id,
            bidder_id: cmd.bidder_id,
            amount: cmd.amount,
            timestamp: now,
        };
        let bid = match timeout(
            ADMISSION_TIMEOUT,
            self.gateway.save_auction_and_bid(&updated, &bid),
        )
        .await
        {
            Ok(Ok(bid)) => bid,
            Ok(Err(e)) => {
                error!(
                    "{:<12} --> 입찰 저장 실패, 메모리 상태 롤백: {:?}",
                    "BidEngine", e
                );
                self.store.restore(previous);
                return Err(e);
            }
            Err(_) => {
                error!(
                    "{:<12} --> 입찰 저장 시간 초과, 메모리 상태 롤백",
                    "BidEngine"
                );
                self.store.restore(previous);
                return Err(CoreError::Timeout);
            }
        };

        // 커밋 확정 후 이벤트 발행. 평가권을 쥔 채 발행해 경매별 순서를 지킨다.
        self.fanout
            .publish(&AuctionEvent::BidUpdate {
                auction_id: cmd.auction_id,
                new_bid: cmd.amount,
                highest_bidder_id: bidder.id,
                highest_bidder_username: bidder.username.clone(),
                new_bid_details: BidDetails {
                    id: bid.id,
                    amount: bid.amount,
                    timestamp: bid.timestamp,
                    username: bidder.username,
                },
            })
            .await;

        if let Some(outbid_user_id) = previous_highest_bidder {
            if outbid_user_id != cmd.bidder_id {
                self.fanout
                    .publish(&AuctionEvent::Outbid {
                        auction_id: cmd.auction_id,
                        outbid_user_id,
                    })
                    .await;
            }
        }

        info!(
            "{:<12} --> 입찰 수락: auction={}, amount={}",
            "BidEngine", cmd.auction_id, cmd.amount
        );

        Ok(BidAccepted {
            auction_id: cmd.auction_id,
            current_price: cmd.amount,
            previous_highest_bidder,
            bid,
        })
    }
}
// endregion: --- Bid Engine
