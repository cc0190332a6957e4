use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use live_auction_service::auction::model::{Auction, AuctionStatus, Bid, NewAuction, UserRef};
use live_auction_service::bidding::admission::AdmissionControl;
use live_auction_service::bidding::commands::{BidEngine, PlaceBidCommand};
use live_auction_service::error::{CoreError, CoreResult};
use live_auction_service::fanout::EventFanout;
use live_auction_service::gateway::{AuctionFilter, PersistenceGateway};
use live_auction_service::scheduler::LifecycleScheduler;
use live_auction_service::store::{AuctionStateStore, BidDecision};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 인메모리 영속화 게이트웨이
/// 실패 주입 플래그로 저장 실패 시나리오를 재현한다.
struct MemoryGateway {
    auctions: Mutex<HashMap<i64, Auction>>,
    bids: Mutex<Vec<Bid>>,
    users: Mutex<HashMap<i64, UserRef>>,
    next_bid_id: AtomicI64,
    next_auction_id: AtomicI64,
    fail_writes: AtomicBool,
}

impl MemoryGateway {
    fn new() -> Self {
        MemoryGateway {
            auctions: Mutex::new(HashMap::new()),
            bids: Mutex::new(Vec::new()),
            users: Mutex::new(HashMap::new()),
            next_bid_id: AtomicI64::new(1),
            next_auction_id: AtomicI64::new(1),
            fail_writes: AtomicBool::new(false),
        }
    }

    fn add_user(&self, id: i64, username: &str) {
        self.users.lock().unwrap().insert(
            id,
            UserRef {
                id,
                username: username.to_string(),
            },
        );
    }

    fn add_auction(&self, auction: Auction) {
        self.auctions.lock().unwrap().insert(auction.id, auction);
    }

    fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// 커밋 순서대로 저장된 입찰 금액
    fn saved_bid_amounts(&self) -> Vec<f64> {
        self.bids.lock().unwrap().iter().map(|b| b.amount).collect()
    }

    fn saved_status(&self, auction_id: i64) -> Option<AuctionStatus> {
        self.auctions
            .lock()
            .unwrap()
            .get(&auction_id)
            .map(|a| a.status)
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn load_auction(&self, id: i64) -> CoreResult<Option<Auction>> {
        Ok(self.auctions.lock().unwrap().get(&id).cloned())
    }

    async fn find_auctions(&self, filter: AuctionFilter) -> CoreResult<Vec<Auction>> {
        let auctions = self.auctions.lock().unwrap();
        Ok(auctions
            .values()
            .filter(|a| filter.status.map(|s| a.status == s).unwrap_or(true))
            .cloned()
            .collect())
    }

    async fn save_auction_and_bid(&self, auction: &Auction, bid: &Bid) -> CoreResult<Bid> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::PersistenceFailure("주입된 저장 실패".to_string()));
        }
        let mut saved = bid.clone();
        saved.id = self.next_bid_id.fetch_add(1, Ordering::SeqCst);
        self.auctions
            .lock()
            .unwrap()
            .insert(auction.id, auction.clone());
        self.bids.lock().unwrap().push(saved.clone());
        Ok(saved)
    }

    async fn save_status_batch(&self, transitions: &[(i64, AuctionStatus)]) -> CoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::PersistenceFailure("주입된 저장 실패".to_string()));
        }
        let mut auctions = self.auctions.lock().unwrap();
        for (id, status) in transitions {
            if let Some(auction) = auctions.get_mut(id) {
                auction.status = *status;
            }
        }
        Ok(())
    }

    async fn insert_auction(&self, new: &NewAuction) -> CoreResult<Auction> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::PersistenceFailure("주입된 저장 실패".to_string()));
        }
        let auction = Auction {
            id: self.next_auction_id.fetch_add(1, Ordering::SeqCst),
            title: new.title.clone(),
            description: new.description.clone(),
            initial_price: new.initial_price,
            current_bid: None,
            image_filename: new.image_filename.clone(),
            start_time: new.start_time,
            end_time: new.end_time,
            status: AuctionStatus::Upcoming,
            bank_uploader_id: new.bank_uploader_id,
            highest_bidder_id: None,
        };
        self.auctions
            .lock()
            .unwrap()
            .insert(auction.id, auction.clone());
        Ok(auction)
    }

    async fn load_user(&self, id: i64) -> CoreResult<Option<UserRef>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }
}

/// 테스트용 코어 구성
struct Core {
    store: Arc<AuctionStateStore>,
    gateway: Arc<MemoryGateway>,
    admission: Arc<AdmissionControl>,
    fanout: Arc<EventFanout>,
    engine: Arc<BidEngine>,
}

fn setup() -> Core {
    let store = Arc::new(AuctionStateStore::new());
    let gateway = Arc::new(MemoryGateway::new());
    let admission = Arc::new(AdmissionControl::new());
    let fanout = Arc::new(EventFanout::new());
    let engine = Arc::new(BidEngine::new(
        Arc::clone(&store),
        gateway.clone(),
        Arc::clone(&admission),
        Arc::clone(&fanout),
    ));
    Core {
        store,
        gateway,
        admission,
        fanout,
        engine,
    }
}

fn scheduler_for(core: &Core) -> LifecycleScheduler {
    LifecycleScheduler::new(
        Arc::clone(&core.store),
        core.gateway.clone(),
        Arc::clone(&core.admission),
        Arc::clone(&core.fanout),
        Duration::from_secs(10),
    )
}

/// 테스트용 경매 생성
fn test_auction(
    id: i64,
    status: AuctionStatus,
    initial_price: f64,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Auction {
    Auction {
        id,
        title: format!("테스트 경매 {}", id),
        description: "테스트용 경매입니다.".to_string(),
        initial_price,
        current_bid: None,
        image_filename: None,
        start_time,
        end_time,
        status,
        bank_uploader_id: 1000,
        highest_bidder_id: None,
    }
}

/// 진행 중인 경매 하나를 저장소와 게이트웨이 양쪽에 올린다
fn seed_live_auction(core: &Core, id: i64, initial_price: f64) {
    let now = Utc::now();
    let auction = test_auction(
        id,
        AuctionStatus::Live,
        initial_price,
        now - ChronoDuration::minutes(5),
        now + ChronoDuration::hours(1),
    );
    core.gateway.add_auction(auction.clone());
    core.store.insert(auction);
}

fn bid(auction_id: i64, bidder_id: i64, amount: f64) -> PlaceBidCommand {
    PlaceBidCommand {
        auction_id,
        bidder_id,
        amount,
    }
}

/// 수신된 이벤트를 전부 꺼낸다
fn drain(rx: &mut tokio::sync::mpsc::Receiver<serde_json::Value>) -> Vec<serde_json::Value> {
    let mut events = Vec::new();
    while let Ok(v) = rx.try_recv() {
        events.push(v);
    }
    events
}

/// 입찰 시퀀스 테스트
/// 시작가 100: 100 거절, 101 수락, 101 거절, 150 수락 + 직전 입찰자 outbid
#[tokio::test]
async fn test_bid_sequence_and_outbid() {
    let core = setup();
    core.gateway.add_user(1, "bidder-one");
    core.gateway.add_user(2, "bidder-two");
    seed_live_auction(&core, 1, 100.0);

    let (conn, mut rx) = core.fanout.register().await;
    core.fanout.subscribe(conn, 1).await;

    // 시작가와 같은 금액은 거절
    let err = core.engine.submit_bid(bid(1, 1, 100.0)).await.unwrap_err();
    assert!(matches!(err, CoreError::BidTooLow { .. }));

    // 시작가보다 높은 금액은 수락
    let accepted = core.engine.submit_bid(bid(1, 1, 101.0)).await.unwrap();
    assert_eq!(accepted.current_price, 101.0);
    assert_eq!(accepted.previous_highest_bidder, None);

    // 현재가와 같은 금액은 거절
    let err = core.engine.submit_bid(bid(1, 2, 101.0)).await.unwrap_err();
    assert!(matches!(err, CoreError::BidTooLow { current_price } if current_price == 101.0));

    // 더 높은 금액은 수락되고 직전 입찰자가 outbid 통지 대상이 된다
    let accepted = core.engine.submit_bid(bid(1, 2, 150.0)).await.unwrap();
    assert_eq!(accepted.previous_highest_bidder, Some(1));

    let state = core.store.get(1).unwrap();
    assert_eq!(state.current_bid, Some(150.0));
    assert_eq!(state.highest_bidder_id, Some(2));

    // 이벤트는 발행 순서대로 도착한다: bid_update(101), bid_update(150), outbid(1)
    let events = drain(&mut rx);
    assert_eq!(events.len(), 3);
    assert_eq!(events[0]["event"], "bid_update");
    assert_eq!(events[0]["data"]["new_bid"], 101.0);
    assert_eq!(events[1]["event"], "bid_update");
    assert_eq!(events[1]["data"]["new_bid"], 150.0);
    assert_eq!(events[2]["event"], "outbid");
    assert_eq!(events[2]["data"]["outbid_user_id"], 1);
}

/// 자기 자신을 갱신한 입찰에는 outbid가 발행되지 않는다
#[tokio::test]
async fn test_no_outbid_for_same_bidder() {
    let core = setup();
    core.gateway.add_user(1, "bidder-one");
    seed_live_auction(&core, 1, 100.0);

    let (conn, mut rx) = core.fanout.register().await;
    core.fanout.subscribe(conn, 1).await;

    core.engine.submit_bid(bid(1, 1, 110.0)).await.unwrap();
    core.engine.submit_bid(bid(1, 1, 120.0)).await.unwrap();

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e["event"] == "bid_update"));
}

/// 구조 검증 및 존재 확인 테스트
#[tokio::test]
async fn test_bid_input_validation() {
    let core = setup();
    core.gateway.add_user(1, "bidder-one");
    seed_live_auction(&core, 1, 100.0);

    // 금액이 유한한 양수가 아니면 InvalidInput
    let err = core
        .engine
        .submit_bid(bid(1, 1, f64::NAN))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput(_)));
    let err = core.engine.submit_bid(bid(1, 1, -5.0)).await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput(_)));

    // 존재하지 않는 입찰자는 InvalidInput
    let err = core.engine.submit_bid(bid(1, 99, 200.0)).await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput(_)));

    // 존재하지 않는 경매는 NotFound
    let err = core.engine.submit_bid(bid(42, 1, 200.0)).await.unwrap_err();
    assert!(matches!(err, CoreError::AuctionNotFound));
}

/// 진행 중이 아닌 경매에 대한 입찰은 거절된다
#[tokio::test]
async fn test_bid_rejected_when_not_live() {
    let core = setup();
    core.gateway.add_user(1, "bidder-one");
    let now = Utc::now();

    // 시작 전(upcoming) 경매
    let upcoming = test_auction(
        1,
        AuctionStatus::Upcoming,
        100.0,
        now + ChronoDuration::hours(1),
        now + ChronoDuration::hours(2),
    );
    core.gateway.add_auction(upcoming.clone());
    core.store.insert(upcoming);
    let err = core.engine.submit_bid(bid(1, 1, 200.0)).await.unwrap_err();
    assert!(matches!(err, CoreError::AuctionNotLive));

    // 종료 시각이 지났지만 아직 닫히지 않은 live 경매
    let stale = test_auction(
        2,
        AuctionStatus::Live,
        100.0,
        now - ChronoDuration::hours(2),
        now - ChronoDuration::minutes(1),
    );
    core.gateway.add_auction(stale.clone());
    core.store.insert(stale);
    let err = core.engine.submit_bid(bid(2, 1, 200.0)).await.unwrap_err();
    assert!(matches!(err, CoreError::AuctionNotLive));
}

/// 동시성 입찰 테스트
/// 50개의 동시 입찰 중 수락된 금액은 커밋 순서대로 순증가해야 한다
#[tokio::test]
async fn test_concurrent_bidding_monotonic() {
    let core = setup();
    for i in 1..=50 {
        core.gateway.add_user(i, &format!("bidder-{}", i));
    }
    seed_live_auction(&core, 1, 10_000.0);

    let mut handles = Vec::new();
    for i in 1..=50i64 {
        let engine = Arc::clone(&core.engine);
        let amount = 10_000.0 + (i as f64) * 100.0;
        handles.push(tokio::spawn(async move {
            engine.submit_bid(bid(1, i, amount)).await
        }));
    }

    let mut accepted = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(CoreError::BidTooLow { .. }) => rejected += 1,
            Err(e) => panic!("예상하지 못한 오류: {:?}", e),
        }
    }
    assert_eq!(accepted + rejected, 50);
    assert!(accepted >= 1);

    // 커밋 순서의 입찰 금액은 엄격하게 증가한다
    let amounts = core.gateway.saved_bid_amounts();
    assert_eq!(amounts.len(), accepted);
    for pair in amounts.windows(2) {
        assert!(pair[0] < pair[1], "수락된 입찰이 순증가하지 않음: {:?}", amounts);
    }

    // 최종 상태는 마지막으로 수락된 입찰과 일치한다
    let state = core.store.get(1).unwrap();
    assert_eq!(state.current_bid, amounts.last().copied());
}

/// 저장 실패 시 메모리 상태 롤백 테스트
#[tokio::test]
async fn test_rollback_on_persistence_failure() {
    let core = setup();
    core.gateway.add_user(1, "bidder-one");
    seed_live_auction(&core, 1, 100.0);

    let (conn, mut rx) = core.fanout.register().await;
    core.fanout.subscribe(conn, 1).await;

    core.gateway.set_fail_writes(true);
    let err = core.engine.submit_bid(bid(1, 1, 200.0)).await.unwrap_err();
    assert!(matches!(err, CoreError::PersistenceFailure(_)));

    // 저장소 상태는 입찰 전 그대로이고 이벤트도 발행되지 않았다
    let state = core.store.get(1).unwrap();
    assert_eq!(state.current_bid, None);
    assert_eq!(state.highest_bidder_id, None);
    assert!(drain(&mut rx).is_empty());

    // 장애가 걷히면 같은 입찰이 다시 수락된다
    core.gateway.set_fail_writes(false);
    let accepted = core.engine.submit_bid(bid(1, 1, 200.0)).await.unwrap();
    assert_eq!(accepted.current_price, 200.0);
}

/// 평가권을 얻지 못하면 제한 시간 초과로 실패한다
#[tokio::test(start_paused = true)]
async fn test_bid_timeout_when_admission_held() {
    let core = setup();
    core.gateway.add_user(1, "bidder-one");
    seed_live_auction(&core, 1, 100.0);

    // 평가권을 선점한 채로 입찰을 시도한다
    let _guard = core.admission.acquire(1).await;
    let err = core.engine.submit_bid(bid(1, 1, 200.0)).await.unwrap_err();
    assert!(matches!(err, CoreError::Timeout));
}

/// 상태 전이는 단방향이며 역방향/제자리 전이는 무시된다
#[tokio::test]
async fn test_status_transition_monotonic() {
    let core = setup();
    let now = Utc::now();
    let auction = test_auction(
        1,
        AuctionStatus::Live,
        100.0,
        now - ChronoDuration::hours(1),
        now + ChronoDuration::hours(1),
    );
    core.store.insert(auction);

    // 역방향 전이는 변경 없음
    let state = core
        .store
        .apply_status_transition(1, AuctionStatus::Upcoming)
        .unwrap();
    assert_eq!(state.status, AuctionStatus::Live);

    // 제자리 전이도 변경 없음
    let state = core
        .store
        .apply_status_transition(1, AuctionStatus::Live)
        .unwrap();
    assert_eq!(state.status, AuctionStatus::Live);

    // 전진 전이만 적용된다
    let state = core
        .store
        .apply_status_transition(1, AuctionStatus::Closed)
        .unwrap();
    assert_eq!(state.status, AuctionStatus::Closed);
    let state = core
        .store
        .apply_status_transition(1, AuctionStatus::Live)
        .unwrap();
    assert_eq!(state.status, AuctionStatus::Closed);
}

/// 스케줄러 틱: upcoming -> live 전이와 auction_live 이벤트
#[tokio::test]
async fn test_scheduler_starts_due_auction() {
    let core = setup();
    let scheduler = scheduler_for(&core);
    let now = Utc::now();
    let auction = test_auction(
        1,
        AuctionStatus::Upcoming,
        100.0,
        now - ChronoDuration::minutes(1),
        now + ChronoDuration::hours(1),
    );
    core.gateway.add_auction(auction.clone());
    core.store.insert(auction);

    let (conn, mut rx) = core.fanout.register().await;
    core.fanout.subscribe(conn, 1).await;

    let events = scheduler.run_tick(now).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(core.store.get(1).unwrap().status, AuctionStatus::Live);
    assert_eq!(core.gateway.saved_status(1), Some(AuctionStatus::Live));

    let delivered = drain(&mut rx);
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0]["event"], "auction_live");
    assert_eq!(delivered[0]["data"]["auction_id"], 1);

    // 같은 틱을 반복해도 추가 전이/이벤트는 없다 (멱등)
    let events = scheduler.run_tick(now).await.unwrap();
    assert!(events.is_empty());
    assert!(drain(&mut rx).is_empty());
}

/// 시작과 종료 조건을 동시에 만족하면 종료가 우선한다
/// upcoming 경매는 live를 거치지 않고 곧바로 closed가 된다
#[tokio::test]
async fn test_scheduler_close_precedence() {
    let core = setup();
    let scheduler = scheduler_for(&core);
    let now = Utc::now();
    let auction = test_auction(
        1,
        AuctionStatus::Upcoming,
        100.0,
        now - ChronoDuration::hours(2),
        now - ChronoDuration::minutes(1),
    );
    core.gateway.add_auction(auction.clone());
    core.store.insert(auction);

    let (conn, mut rx) = core.fanout.register().await;
    core.fanout.subscribe(conn, 1).await;

    let events = scheduler.run_tick(now).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(core.store.get(1).unwrap().status, AuctionStatus::Closed);

    // auction_live는 억제되고 auction_closed만 발행된다
    let delivered = drain(&mut rx);
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0]["event"], "auction_closed");
}

/// 한 틱에서 여러 경매가 각자의 전이를 받는다
#[tokio::test]
async fn test_scheduler_mixed_batch() {
    let core = setup();
    let scheduler = scheduler_for(&core);
    let now = Utc::now();

    // 시작할 경매, 닫힐 경매, 아직 대기할 경매
    let starting = test_auction(
        1,
        AuctionStatus::Upcoming,
        100.0,
        now - ChronoDuration::minutes(1),
        now + ChronoDuration::hours(1),
    );
    let closing = test_auction(
        2,
        AuctionStatus::Live,
        100.0,
        now - ChronoDuration::hours(2),
        now - ChronoDuration::minutes(1),
    );
    let waiting = test_auction(
        3,
        AuctionStatus::Upcoming,
        100.0,
        now + ChronoDuration::hours(1),
        now + ChronoDuration::hours(2),
    );
    for auction in [&starting, &closing, &waiting] {
        core.gateway.add_auction(auction.clone());
        core.store.insert(auction.clone());
    }

    let events = scheduler.run_tick(now).await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(core.store.get(1).unwrap().status, AuctionStatus::Live);
    assert_eq!(core.store.get(2).unwrap().status, AuctionStatus::Closed);
    assert_eq!(core.store.get(3).unwrap().status, AuctionStatus::Upcoming);
}

/// 배치 저장이 실패한 틱은 상태도 이벤트도 남기지 않고, 다음 틱에서 재시도된다
#[tokio::test]
async fn test_scheduler_retries_after_persistence_failure() {
    let core = setup();
    let scheduler = scheduler_for(&core);
    let now = Utc::now();
    let auction = test_auction(
        1,
        AuctionStatus::Upcoming,
        100.0,
        now - ChronoDuration::minutes(1),
        now + ChronoDuration::hours(1),
    );
    core.gateway.add_auction(auction.clone());
    core.store.insert(auction);

    let (conn, mut rx) = core.fanout.register().await;
    core.fanout.subscribe(conn, 1).await;

    core.gateway.set_fail_writes(true);
    let err = scheduler.run_tick(now).await.unwrap_err();
    assert!(matches!(err, CoreError::PersistenceFailure(_)));
    assert_eq!(core.store.get(1).unwrap().status, AuctionStatus::Upcoming);
    assert!(drain(&mut rx).is_empty());

    // 장애가 걷히면 같은 전이가 적용된다
    core.gateway.set_fail_writes(false);
    let events = scheduler.run_tick(now).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(core.store.get(1).unwrap().status, AuctionStatus::Live);
}

/// 팬아웃 격리 테스트
/// 경매 X만 구독한 접속은 경매 Y의 이벤트를 받지 않는다
#[tokio::test]
async fn test_fanout_isolation_between_auctions() {
    let core = setup();
    core.gateway.add_user(1, "bidder-one");
    seed_live_auction(&core, 1, 100.0);
    seed_live_auction(&core, 2, 100.0);

    let (conn_x, mut rx_x) = core.fanout.register().await;
    core.fanout.subscribe(conn_x, 1).await;
    let (_conn_none, mut rx_none) = core.fanout.register().await;

    core.engine.submit_bid(bid(2, 1, 150.0)).await.unwrap();

    assert!(drain(&mut rx_x).is_empty());
    assert!(drain(&mut rx_none).is_empty());

    core.engine.submit_bid(bid(1, 1, 150.0)).await.unwrap();
    let delivered = drain(&mut rx_x);
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0]["data"]["auction_id"], 1);
}

/// 구독 해지/접속 해제 이후에는 전달되지 않는다
#[tokio::test]
async fn test_fanout_unsubscribe_and_unregister() {
    let core = setup();
    core.gateway.add_user(1, "bidder-one");
    seed_live_auction(&core, 1, 100.0);

    let (conn, mut rx) = core.fanout.register().await;
    core.fanout.subscribe(conn, 1).await;
    core.fanout.unsubscribe(conn, 1).await;

    core.engine.submit_bid(bid(1, 1, 150.0)).await.unwrap();
    assert!(drain(&mut rx).is_empty());

    // 발행 이후에 구독해도 소급 전달은 없다
    core.fanout.subscribe(conn, 1).await;
    assert!(drain(&mut rx).is_empty());

    core.fanout.unregister(conn).await;
    core.engine.submit_bid(bid(1, 1, 160.0)).await.unwrap();
    // 접속 해제 후 발행된 이벤트는 버려지고 발행자는 오류 없이 진행한다
    assert!(rx.try_recv().is_err());
}

/// 상태 저장소 단독 검증: check-then-update가 직전 스냅샷을 돌려준다
#[tokio::test]
async fn test_store_bid_decision_snapshots() {
    let store = AuctionStateStore::new();
    let now = Utc::now();
    let auction = test_auction(
        1,
        AuctionStatus::Live,
        100.0,
        now - ChronoDuration::hours(1),
        now + ChronoDuration::hours(1),
    );
    store.insert(auction);

    match store.apply_bid_if_valid(1, 120.0, 7, now) {
        BidDecision::Accepted {
            updated,
            previous,
            previous_highest_bidder,
        } => {
            assert_eq!(updated.current_bid, Some(120.0));
            assert_eq!(updated.highest_bidder_id, Some(7));
            assert_eq!(previous.current_bid, None);
            assert_eq!(previous_highest_bidder, None);

            // 롤백하면 직전 상태로 돌아간다
            store.restore(previous);
            assert_eq!(store.get(1).unwrap().current_bid, None);
        }
        BidDecision::Rejected(e) => panic!("수락되어야 할 입찰이 거절됨: {:?}", e),
    }
}
