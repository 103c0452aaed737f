//! 请求去重缓存
//!
//! 键到共享 future 的映射。相同键的并发请求拿到同一个进行中或已完成的
//! 计算结果（包括失败）。每个计算由后台任务驱动到完成，不依赖任何调用方
//! 持续等待；完成后再保留 `timeout` 时长，然后从映射中移除。

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use tracing::debug;

type SharedResponse<V, E> = Shared<BoxFuture<'static, Result<V, E>>>;
type PendingMap<K, V, E> = Arc<Mutex<HashMap<K, SharedResponse<V, E>>>>;

pub struct ResponseCache<K, V, E> {
    name: &'static str,
    timeout: Duration,
    pending: PendingMap<K, V, E>,
}

impl<K, V, E> ResponseCache<K, V, E>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str, timeout: Duration) -> Self {
        Self {
            name,
            timeout,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// 已登记（进行中或已完成）的条目数
    pub fn len(&self) -> usize {
        lock(&self.pending).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &K) -> bool {
        lock(&self.pending).contains_key(key)
    }

    /// 取已有条目，否则调用 `compute` 创建并登记
    ///
    /// 查找与登记在同一把锁内完成，同一个键只会启动一次计算。
    pub async fn wrap<F, Fut>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let response = {
            let mut pending = lock(&self.pending);
            match pending.get(&key) {
                Some(existing) => {
                    debug!(cache = self.name, ?key, "复用进行中的请求");
                    existing.clone()
                }
                None => {
                    debug!(cache = self.name, ?key, "登记新的请求");
                    let response = compute().boxed().shared();
                    pending.insert(key.clone(), response.clone());
                    self.schedule_eviction(key, response.clone());
                    response
                }
            }
        };
        response.await
    }

    fn schedule_eviction(&self, key: K, response: SharedResponse<V, E>) {
        let pending = Arc::clone(&self.pending);
        let timeout = self.timeout;
        let driver = response.clone();
        tokio::spawn(async move {
            let _ = driver.await;
            if !timeout.is_zero() {
                tokio::time::sleep(timeout).await;
            }
            let mut pending = lock(&pending);
            if pending
                .get(&key)
                .is_some_and(|current| current.ptr_eq(&response))
            {
                pending.remove(&key);
            }
        });
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
