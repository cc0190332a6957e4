// region:    --- Imports
use super::queries;
use crate::auction::model::AuctionStatus;
use crate::database::DatabaseManager;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::Error as SqlxError;
use sqlx::{FromRow, Row};
use tracing::info;

// endregion: --- Imports

// region:    --- Views
/// 경계 계층에 내려주는 경매 화면 모델
#[derive(Debug, Serialize)]
pub struct AuctionView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub initial_price: f64,
    pub current_bid: f64,
    pub image_url: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: AuctionStatus,
    pub highest_bidder_id: Option<i64>,
    pub highest_bidder_username: Option<String>,
    pub participants_count: i64,
}

impl<'r> FromRow<'r, PgRow> for AuctionView {
    fn from_row(row: &'r PgRow) -> Result<Self, SqlxError> {
        let status: String = row.try_get("status")?;
        let image_filename: Option<String> = row.try_get("image_filename")?;
        Ok(AuctionView {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            initial_price: row.try_get("initial_price")?,
            current_bid: row.try_get("current_bid")?,
            image_url: image_filename.map(|f| format!("/static/uploads/{}", f)),
            start_time: row.try_get("start_time")?,
            end_time: row.try_get("end_time")?,
            status: status
                .parse()
                .map_err(|e: String| SqlxError::Decode(e.into()))?,
            highest_bidder_id: row.try_get("highest_bidder_id")?,
            highest_bidder_username: row.try_get("highest_bidder_username")?,
            participants_count: row.try_get("participants_count")?,
        })
    }
}

/// 입찰 이력 화면 모델
#[derive(Debug, Serialize, FromRow)]
pub struct BidView {
    pub id: i64,
    pub auction_id: i64,
    pub bidder_id: i64,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
    pub username: String,
}
// endregion: --- Views

// region:    --- Query Handlers

/// 모든 경매 조회
pub async fn get_all_auctions(db_manager: &DatabaseManager) -> Result<Vec<AuctionView>, SqlxError> {
    info!("{:<12} --> 모든 경매 조회", "Query");
    sqlx::query_as::<_, AuctionView>(queries::GET_ALL_AUCTIONS)
        .fetch_all(db_manager.pool())
        .await
}

/// 경매 단건 조회
pub async fn get_auction(
    db_manager: &DatabaseManager,
    auction_id: i64,
) -> Result<Option<AuctionView>, SqlxError> {
    info!("{:<12} --> 경매 조회 id: {}", "Query", auction_id);
    sqlx::query_as::<_, AuctionView>(queries::GET_AUCTION)
        .bind(auction_id)
        .fetch_optional(db_manager.pool())
        .await
}

/// 입찰 이력 조회
pub async fn get_bid_history(
    db_manager: &DatabaseManager,
    auction_id: i64,
) -> Result<Vec<BidView>, SqlxError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "Query", auction_id);
    sqlx::query_as::<_, BidView>(queries::GET_BID_HISTORY)
        .bind(auction_id)
        .fetch_all(db_manager.pool())
        .await
}

// endregion: --- Query Handlers
