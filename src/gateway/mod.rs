/// 영속화 게이트웨이
/// 코어가 소비하는 저장소 인터페이스. 경매+입찰 쌍 저장과 상태 전이 배치 저장은
/// 각각 하나의 트랜잭션으로 커밋된다.
// region:    --- Imports
use crate::auction::model::{Auction, AuctionStatus, Bid, NewAuction, UserRef};
use crate::database::DatabaseManager;
use crate::error::{CoreError, CoreResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

// region:    --- Gateway Trait
/// 경매 조회 조건
#[derive(Debug, Default, Clone)]
pub struct AuctionFilter {
    pub status: Option<AuctionStatus>,
}

#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// 경매 단건 조회
    async fn load_auction(&self, id: i64) -> CoreResult<Option<Auction>>;

    /// 조건에 맞는 경매 목록 조회
    async fn find_auctions(&self, filter: AuctionFilter) -> CoreResult<Vec<Auction>>;

    /// 경매 갱신 + 입찰 추가를 하나의 트랜잭션으로 저장, id가 채워진 입찰 반환
    async fn save_auction_and_bid(&self, auction: &Auction, bid: &Bid) -> CoreResult<Bid>;

    /// 한 틱의 상태 전이 전체를 하나의 트랜잭션으로 저장
    async fn save_status_batch(&self, transitions: &[(i64, AuctionStatus)]) -> CoreResult<()>;

    /// 자산 등록 (status=upcoming으로 생성)
    async fn insert_auction(&self, new: &NewAuction) -> CoreResult<Auction>;

    /// 입찰자 참조 조회 (외부 신원 제공자)
    async fn load_user(&self, id: i64) -> CoreResult<Option<UserRef>>;
}
// endregion: --- Gateway Trait

// region:    --- Postgres Gateway
pub struct PostgresGateway {
    db: Arc<DatabaseManager>,
}

impl PostgresGateway {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        PostgresGateway { db }
    }
}

/// 모든 저장소 오류는 PersistenceFailure로 회수된다
fn persistence_err(e: sqlx::Error) -> CoreError {
    CoreError::PersistenceFailure(e.to_string())
}

#[async_trait]
impl PersistenceGateway for PostgresGateway {
    async fn load_auction(&self, id: i64) -> CoreResult<Option<Auction>> {
        sqlx::query_as::<_, Auction>(
            "SELECT id, title, description, initial_price, current_bid, image_filename,
                    start_time, end_time, status, bank_uploader_id, highest_bidder_id
             FROM auctions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await
        .map_err(persistence_err)
    }

    async fn find_auctions(&self, filter: AuctionFilter) -> CoreResult<Vec<Auction>> {
        let query = match filter.status {
            Some(status) => sqlx::query_as::<_, Auction>(
                "SELECT id, title, description, initial_price, current_bid, image_filename,
                        start_time, end_time, status, bank_uploader_id, highest_bidder_id
                 FROM auctions WHERE status = $1 ORDER BY start_time ASC",
            )
            .bind(status.as_str()),
            None => sqlx::query_as::<_, Auction>(
                "SELECT id, title, description, initial_price, current_bid, image_filename,
                        start_time, end_time, status, bank_uploader_id, highest_bidder_id
                 FROM auctions ORDER BY start_time ASC",
            ),
        };
        query
            .fetch_all(self.db.pool())
            .await
            .map_err(persistence_err)
    }

    async fn save_auction_and_bid(&self, auction: &Auction, bid: &Bid) -> CoreResult<Bid> {
        let auction = auction.clone();
        let bid = bid.clone();
        self.db
            .transaction(move |tx| {
                Box::pin(async move {
                    sqlx::query(
                        "UPDATE auctions SET current_bid = $1, highest_bidder_id = $2 WHERE id = $3",
                    )
                    .bind(auction.current_bid)
                    .bind(auction.highest_bidder_id)
                    .bind(auction.id)
                    .execute(&mut **tx)
                    .await?;

                    sqlx::query_as::<_, Bid>(
                        "INSERT INTO bids (auction_id, bidder_id, amount, timestamp)
                         VALUES ($1, $2, $3, $4)
                         RETURNING id, auction_id, bidder_id, amount, timestamp",
                    )
                    .bind(bid.auction_id)
                    .bind(bid.bidder_id)
                    .bind(bid.amount)
                    .bind(bid.timestamp)
                    .fetch_one(&mut **tx)
                    .await
                })
            })
            .await
            .map_err(persistence_err)
    }

    async fn save_status_batch(&self, transitions: &[(i64, AuctionStatus)]) -> CoreResult<()> {
        if transitions.is_empty() {
            return Ok(());
        }
        let transitions = transitions.to_vec();
        self.db
            .transaction(move |tx| {
                Box::pin(async move {
                    for (id, status) in &transitions {
                        sqlx::query("UPDATE auctions SET status = $1 WHERE id = $2")
                            .bind(status.as_str())
                            .bind(*id)
                            .execute(&mut **tx)
                            .await?;
                    }
                    Ok::<(), sqlx::Error>(())
                })
            })
            .await
            .map_err(persistence_err)
    }

    async fn insert_auction(&self, new: &NewAuction) -> CoreResult<Auction> {
        info!("{:<12} --> 자산 등록: {}", "Gateway", new.title);
        sqlx::query_as::<_, Auction>(
            "INSERT INTO auctions
                 (title, description, initial_price, image_filename,
                  start_time, end_time, status, bank_uploader_id)
             VALUES ($1, $2, $3, $4, $5, $6, 'upcoming', $7)
             RETURNING id, title, description, initial_price, current_bid, image_filename,
                       start_time, end_time, status, bank_uploader_id, highest_bidder_id",
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.initial_price)
        .bind(&new.image_filename)
        .bind(new.start_time)
        .bind(new.end_time)
        .bind(new.bank_uploader_id)
        .fetch_one(self.db.pool())
        .await
        .map_err(persistence_err)
    }

    async fn load_user(&self, id: i64) -> CoreResult<Option<UserRef>> {
        sqlx::query_as::<_, UserRef>("SELECT id, username FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await
            .map_err(persistence_err)
    }
}
// endregion: --- Postgres Gateway
