//! 有界并发扇出
//!
//! 在调用方所在任务上协作式地轮询：同时最多 `limit` 个工作 future 处于
//! 执行中，任何一个失败立即返回该错误，其余尚未完成的 future 被丢弃。
//! 结果顺序与完成顺序一致，不保证与输入顺序相同。

use std::future::Future;

use futures::{stream, StreamExt, TryStreamExt};

/// 默认并发上限
pub const DEFAULT_CONCURRENCY: usize = 10;

/// 对每个输入项执行 `worker`，并发数不超过 `limit`（0 按 1 处理）
pub async fn concurrently_execute<I, F, Fut, T, E>(
    items: I,
    limit: usize,
    worker: F,
) -> Result<Vec<T>, E>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    stream::iter(items)
        .map(worker)
        .buffer_unordered(limit.max(1))
        .try_collect()
        .await
}
