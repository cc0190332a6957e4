/// 수명주기 스케줄러
/// 벽시계 시간에 따라 경매를 upcoming -> live -> closed로 전이시킨다.
/// 한 틱의 전이 전체를 하나의 배치로 커밋한 뒤에만 이벤트를 발행하고,
/// 배치 저장이 실패하면 상태를 바꾸지 않고 다음 틱에서 재시도한다.
// region:    --- Imports
use crate::auction::events::AuctionEvent;
use crate::auction::model::AuctionStatus;
use crate::bidding::admission::AdmissionControl;
use crate::error::CoreResult;
use crate::fanout::EventFanout;
use crate::gateway::PersistenceGateway;
use crate::store::AuctionStateStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

// endregion: --- Imports

// region:    --- Lifecycle Scheduler
pub struct LifecycleScheduler {
    store: Arc<AuctionStateStore>,
    gateway: Arc<dyn PersistenceGateway>,
    admission: Arc<AdmissionControl>,
    fanout: Arc<EventFanout>,
    tick_interval: Duration,
}

impl LifecycleScheduler {
    pub fn new(
        store: Arc<AuctionStateStore>,
        gateway: Arc<dyn PersistenceGateway>,
        admission: Arc<AdmissionControl>,
        fanout: Arc<EventFanout>,
        tick_interval: Duration,
    ) -> Self {
        LifecycleScheduler {
            store,
            gateway,
            admission,
            fanout,
            tick_interval,
        }
    }

    /// 스케줄러 시작
    /// 틱은 순차 실행되며, 이전 틱이 끝나지 않아 밀린 틱은 건너뛴다.
    pub fn start(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut ticker = interval(self.tick_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if let Err(e) = self.run_tick(Utc::now()).await {
                    error!(
                        "{:<12} --> 상태 전이 저장 실패, 다음 틱에서 재시도: {:?}",
                        "Scheduler", e
                    );
                }
            }
        });
    }

    /// 한 번의 수명주기 틱
    /// 틱 전체가 하나의 기준 시각으로 판정된다. 발행한 이벤트 목록을 반환한다.
    pub async fn run_tick(&self, now: DateTime<Utc>) -> CoreResult<Vec<AuctionEvent>> {
        // 전이 후보 계산. 시작 조건과 종료 조건을 동시에 만족하면 종료가 우선한다.
        let snapshot = self.store.snapshot_all();
        let mut candidates: Vec<(i64, AuctionStatus)> = Vec::new();
        for auction in &snapshot {
            let due_close = matches!(
                auction.status,
                AuctionStatus::Upcoming | AuctionStatus::Live
            ) && auction.end_time <= now;
            let due_live = auction.status == AuctionStatus::Upcoming
                && auction.start_time <= now
                && now < auction.end_time;

            if due_close {
                candidates.push((auction.id, AuctionStatus::Closed));
            } else if due_live {
                candidates.push((auction.id, AuctionStatus::Live));
            }
        }
        if candidates.is_empty() {
            debug!("{:<12} --> 전이 대상 없음", "Scheduler");
            return Ok(Vec::new());
        }
        // 잠금 획득 순서 고정
        candidates.sort_by_key(|(id, _)| *id);

        // 각 경매의 평가권을 잡고 같은 기준 시각으로 재검증한다.
        // 가드는 배치 커밋까지 유지되어 입찰 판정과 직렬화된다.
        let mut guards = Vec::with_capacity(candidates.len());
        let mut transitions: Vec<(i64, AuctionStatus)> = Vec::new();
        for (id, target) in candidates {
            let guard = self.admission.acquire(id).await;
            let current = match self.store.get(id) {
                Some(auction) => auction,
                None => continue,
            };
            let still_due = match target {
                AuctionStatus::Closed => {
                    current.status.rank() < AuctionStatus::Closed.rank() && current.end_time <= now
                }
                AuctionStatus::Live => {
                    current.status == AuctionStatus::Upcoming
                        && current.start_time <= now
                        && now < current.end_time
                }
                AuctionStatus::Upcoming => false,
            };
            if still_due {
                guards.push(guard);
                transitions.push((id, target));
            }
        }
        if transitions.is_empty() {
            return Ok(Vec::new());
        }

        // 전이 배치를 원자적으로 커밋. 실패하면 메모리 상태와 이벤트 모두 없던 일이 된다.
        self.gateway.save_status_batch(&transitions).await?;

        let mut events = Vec::with_capacity(transitions.len());
        for (id, target) in &transitions {
            if self.store.apply_status_transition(*id, *target).is_none() {
                continue;
            }
            match target {
                AuctionStatus::Live => {
                    info!("{:<12} --> 경매 시작: auction={}", "Scheduler", id);
                    events.push(AuctionEvent::AuctionLive {
                        auction_id: *id,
                        status: AuctionStatus::Live,
                    });
                }
                AuctionStatus::Closed => {
                    info!("{:<12} --> 경매 종료: auction={}", "Scheduler", id);
                    events.push(AuctionEvent::AuctionClosed {
                        auction_id: *id,
                        status: AuctionStatus::Closed,
                    });
                }
                AuctionStatus::Upcoming => {}
            }
        }
        for event in &events {
            self.fanout.publish(event).await;
        }

        Ok(events)
    }
}
// endregion: --- Lifecycle Scheduler
