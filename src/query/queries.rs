/// 경매 목록 조회 (시작 시간 오름차순, 최고 입찰자 이름과 참여자 수 포함)
pub const GET_ALL_AUCTIONS: &str = r#"
    SELECT a.id, a.title, a.description, a.initial_price,
           COALESCE(a.current_bid, a.initial_price) AS current_bid,
           a.image_filename, a.start_time, a.end_time, a.status,
           a.highest_bidder_id, u.username AS highest_bidder_username,
           (SELECT COUNT(DISTINCT b.bidder_id) FROM bids b WHERE b.auction_id = a.id) AS participants_count
    FROM auctions a
    LEFT JOIN users u ON u.id = a.highest_bidder_id
    ORDER BY a.start_time ASC
"#;

/// 경매 단건 조회
pub const GET_AUCTION: &str = r#"
    SELECT a.id, a.title, a.description, a.initial_price,
           COALESCE(a.current_bid, a.initial_price) AS current_bid,
           a.image_filename, a.start_time, a.end_time, a.status,
           a.highest_bidder_id, u.username AS highest_bidder_username,
           (SELECT COUNT(DISTINCT b.bidder_id) FROM bids b WHERE b.auction_id = a.id) AS participants_count
    FROM auctions a
    LEFT JOIN users u ON u.id = a.highest_bidder_id
    WHERE a.id = $1
"#;

/// 입찰 이력 조회 (최신순)
pub const GET_BID_HISTORY: &str = r#"
    SELECT b.id, b.auction_id, b.bidder_id, b.amount, b.timestamp, u.username
    FROM bids b
    JOIN users u ON u.id = b.bidder_id
    WHERE b.auction_id = $1
    ORDER BY b.timestamp DESC
"#;
