/// 경매별 입찰 평가권 관리
/// 같은 경매에 대한 입찰 판정과 상태 전이는 하나씩만 실행되고,
/// 서로 다른 경매는 독립적으로 병행 처리된다. 전역 잠금은 두지 않는다.
// region:    --- Imports
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

// endregion: --- Imports

// region:    --- Admission Control
pub struct AdmissionControl {
    locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl Default for AdmissionControl {
    fn default() -> Self {
        Self::new()
    }
}

impl AdmissionControl {
    pub fn new() -> Self {
        AdmissionControl {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// 해당 경매의 평가권 획득
    /// 가드를 드롭하면 다음 대기자가 평가를 시작한다.
    pub async fn acquire(&self, auction_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(
                locks
                    .entry(auction_id)
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }
}
// endregion: --- Admission Control
