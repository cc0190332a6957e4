use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use std::str::FromStr;

// 경매 상태 (upcoming -> live -> closed 단방향 전이)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuctionStatus {
    Upcoming,
    Live,
    Closed,
}

impl AuctionStatus {
    /// 상태 문자열 반환
    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionStatus::Upcoming => "upcoming",
            AuctionStatus::Live => "live",
            AuctionStatus::Closed => "closed",
        }
    }

    /// 전이 순서 비교용 순위 (뒤로 가는 전이 금지)
    pub fn rank(&self) -> u8 {
        match self {
            AuctionStatus::Upcoming => 0,
            AuctionStatus::Live => 1,
            AuctionStatus::Closed => 2,
        }
    }
}

impl FromStr for AuctionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(AuctionStatus::Upcoming),
            "live" => Ok(AuctionStatus::Live),
            "closed" => Ok(AuctionStatus::Closed),
            other => Err(format!("알 수 없는 경매 상태: {}", other)),
        }
    }
}

// 경매 모델
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Auction {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub initial_price: f64,
    pub current_bid: Option<f64>,
    pub image_filename: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: AuctionStatus,
    pub bank_uploader_id: i64,
    pub highest_bidder_id: Option<i64>,
}

impl Auction {
    /// 입찰이 넘어야 하는 기준 가격 (현재 입찰가가 없으면 시작가)
    pub fn price_floor(&self) -> f64 {
        self.current_bid.unwrap_or(self.initial_price)
    }
}

/// status 컬럼(TEXT)을 enum으로 복원하기 위한 수동 매핑
impl<'r> FromRow<'r, PgRow> for Auction {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        Ok(Auction {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            initial_price: row.try_get("initial_price")?,
            current_bid: row.try_get("current_bid")?,
            image_filename: row.try_get("image_filename")?,
            start_time: row.try_get("start_time")?,
            end_time: row.try_get("end_time")?,
            status: status
                .parse()
                .map_err(|e: String| sqlx::Error::Decode(e.into()))?,
            bank_uploader_id: row.try_get("bank_uploader_id")?,
            highest_bidder_id: row.try_get("highest_bidder_id")?,
        })
    }
}

// 입찰 모델 (생성 이후 불변, 추가만 가능)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bid {
    pub id: i64,
    pub auction_id: i64,
    pub bidder_id: i64,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}

// 외부 신원 제공자가 검증해 넘겨주는 입찰자 참조
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRef {
    pub id: i64,
    pub username: String,
}

/// 자산 등록 요청 (status는 항상 upcoming으로 생성)
#[derive(Debug, Deserialize)]
pub struct NewAuction {
    pub title: String,
    pub description: String,
    pub initial_price: f64,
    pub image_filename: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub bank_uploader_id: i64,
}
