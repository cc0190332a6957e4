use axum::http::StatusCode;

/// 코어 오류 분류
/// 엔진/스케줄러 경계에서 전부 값으로 회수되어 경계 계층으로는 전파되지 않는다.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CoreError {
    #[error("요청 데이터가 올바르지 않습니다: {0}")]
    InvalidInput(String),

    #[error("경매를 찾을 수 없습니다.")]
    AuctionNotFound,

    #[error("진행 중인 경매가 아닙니다.")]
    AuctionNotLive,

    #[error("입찰 금액이 현재 가격보다 낮거나 같습니다.")]
    BidTooLow { current_price: f64 },

    #[error("저장소 오류가 발생했습니다: {0}")]
    PersistenceFailure(String),

    #[error("처리 시간이 초과되었습니다.")]
    Timeout,
}

impl CoreError {
    /// 경계 계층에 노출되는 오류 코드
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::InvalidInput(_) => "INVALID_INPUT",
            CoreError::AuctionNotFound => "NOT_FOUND",
            CoreError::AuctionNotLive => "NOT_LIVE",
            CoreError::BidTooLow { .. } => "LOW_BID",
            CoreError::PersistenceFailure(_) => "PERSISTENCE_FAILURE",
            CoreError::Timeout => "TIMEOUT",
        }
    }

    /// HTTP 상태 코드 매핑
    pub fn status_code(&self) -> StatusCode {
        match self {
            CoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CoreError::AuctionNotFound => StatusCode::NOT_FOUND,
            CoreError::AuctionNotLive | CoreError::BidTooLow { .. } => StatusCode::BAD_REQUEST,
            CoreError::PersistenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CoreError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// 오류 응답 본문
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CoreError::BidTooLow { current_price } => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
                "current_price": current_price,
            }),
            _ => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
            }),
        }
    }
}

/// 코어 결과 타입
pub type CoreResult<T> = Result<T, CoreError>;
