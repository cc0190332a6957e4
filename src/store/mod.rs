/// 경매 상태 저장소
/// 입찰 수락 판정의 단일 진실 공급원이며, 모든 변경은 이 모듈의 연산을 통해서만 일어난다.
// region:    --- Imports
use crate::auction::model::{Auction, AuctionStatus};
use crate::error::CoreError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;

// endregion: --- Imports

// region:    --- Bid Decision
/// 입찰 판정 결과
#[derive(Debug)]
pub enum BidDecision {
    /// 수락: 갱신된 상태, 롤백용 직전 스냅샷, 직전 최고 입찰자
    Accepted {
        updated: Auction,
        previous: Auction,
        previous_highest_bidder: Option<i64>,
    },
    /// 거절 사유
    Rejected(CoreError),
}
// endregion: --- Bid Decision

// region:    --- Auction State Store
pub struct AuctionStateStore {
    auctions: RwLock<HashMap<i64, Auction>>,
}

impl Default for AuctionStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AuctionStateStore {
    pub fn new() -> Self {
        AuctionStateStore {
            auctions: RwLock::new(HashMap::new()),
        }
    }

    /// 시작 시 저장소로부터 경매 목록 적재
    pub fn hydrate(&self, auctions: Vec<Auction>) {
        let mut map = self.write_lock();
        for auction in auctions {
            map.insert(auction.id, auction);
        }
    }

    /// 경매 등록 (자산 생성 경로)
    pub fn insert(&self, auction: Auction) {
        self.write_lock().insert(auction.id, auction);
    }

    /// 경매 스냅샷 조회
    pub fn get(&self, id: i64) -> Option<Auction> {
        self.read_lock().get(&id).cloned()
    }

    /// 전체 스냅샷 (스케줄러 스윕용)
    pub fn snapshot_all(&self) -> Vec<Auction> {
        self.read_lock().values().cloned().collect()
    }

    /// 입찰 검증 및 갱신
    /// 같은 경매에 대한 다른 호출과 원자적으로 실행되는 check-then-update.
    /// current_bid / highest_bidder_id가 변경되는 유일한 경로.
    pub fn apply_bid_if_valid(
        &self,
        id: i64,
        amount: f64,
        bidder_id: i64,
        now: DateTime<Utc>,
    ) -> BidDecision {
        let mut map = self.write_lock();
        let auction = match map.get_mut(&id) {
            Some(auction) => auction,
            None => return BidDecision::Rejected(CoreError::AuctionNotFound),
        };

        if auction.status != AuctionStatus::Live {
            return BidDecision::Rejected(CoreError::AuctionNotLive);
        }
        // 종료 시각이 지났지만 아직 스케줄러가 닫지 못한 경매도 진행 중이 아니다
        if auction.end_time <= now {
            return BidDecision::Rejected(CoreError::AuctionNotLive);
        }

        let floor = auction.price_floor();
        if amount <= floor {
            return BidDecision::Rejected(CoreError::BidTooLow {
                current_price: floor,
            });
        }

        let previous = auction.clone();
        auction.current_bid = Some(amount);
        auction.highest_bidder_id = Some(bidder_id);

        BidDecision::Accepted {
            updated: auction.clone(),
            previous_highest_bidder: previous.highest_bidder_id,
            previous,
        }
    }

    /// 상태 전이 적용
    /// upcoming -> live -> closed 단방향. 역방향/제자리 전이는 변경 없이 현재 상태 반환(멱등).
    pub fn apply_status_transition(&self, id: i64, target: AuctionStatus) -> Option<Auction> {
        let mut map = self.write_lock();
        let auction = map.get_mut(&id)?;
        if target.rank() > auction.status.rank() {
            auction.status = target;
        }
        Some(auction.clone())
    }

    /// 저장 실패 시 입찰 직전 스냅샷으로 복원 (엔진 전용 롤백 경로)
    pub fn restore(&self, snapshot: Auction) {
        self.write_lock().insert(snapshot.id, snapshot);
    }

    fn read_lock(&self) -> std::sync::RwLockReadGuard<'_, HashMap<i64, Auction>> {
        self.auctions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<i64, Auction>> {
        self.auctions.write().unwrap_or_else(|e| e.into_inner())
    }
}
// endregion: --- Auction State Store
