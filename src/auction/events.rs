use crate::auction::model::AuctionStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 브로드캐스트되는 입찰 상세 정보
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BidDetails {
    pub id: i64,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
    pub username: String,
}

/// 경매 상태 변경 이벤트
/// 이벤트 이름과 페이로드 형태는 경계 계층과의 호환을 위해 고정
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "event", content = "data")]
pub enum AuctionEvent {
    // 입찰 수락 이벤트
    #[serde(rename = "bid_update")]
    BidUpdate {
        auction_id: i64,
        new_bid: f64,
        highest_bidder_id: i64,
        highest_bidder_username: String,
        new_bid_details: BidDetails,
    },
    // 상위 입찰 발생 이벤트 (직전 최고 입찰자에게 통지)
    #[serde(rename = "outbid")]
    Outbid {
        auction_id: i64,
        outbid_user_id: i64,
    },
    // 경매 시작 이벤트
    #[serde(rename = "auction_live")]
    AuctionLive {
        auction_id: i64,
        status: AuctionStatus,
    },
    // 경매 종료 이벤트
    #[serde(rename = "auction_closed")]
    AuctionClosed {
        auction_id: i64,
        status: AuctionStatus,
    },
}

impl AuctionEvent {
    /// 팬아웃 라우팅에 사용하는 경매 id
    pub fn auction_id(&self) -> i64 {
        match self {
            AuctionEvent::BidUpdate { auction_id, .. }
            | AuctionEvent::Outbid { auction_id, .. }
            | AuctionEvent::AuctionLive { auction_id, .. }
            | AuctionEvent::AuctionClosed { auction_id, .. } => *auction_id,
        }
    }
}
