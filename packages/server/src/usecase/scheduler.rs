//! Keyed registry of background tasks.
//!
//! Moderation countdowns are spawned through a `TaskScheduler` so that a
//! second request for the same key is refused while the first is running,
//! a pending task can be cancelled, and the running keys can be inspected.

use std::{
    collections::HashMap,
    fmt::Display,
    future::Future,
    hash::Hash,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use tokio::{sync::Mutex, task::JoinHandle};

use crate::domain::SessionError;

struct ScheduledTask {
    id: u64,
    handle: JoinHandle<()>,
}

pub struct TaskScheduler<K> {
    tasks: Arc<Mutex<HashMap<K, ScheduledTask>>>,
    next_id: AtomicU64,
}

impl<K> Default for TaskScheduler<K> {
    fn default() -> Self {
        Self {
            tasks: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<K> TaskScheduler<K>
where
    K: Eq + Hash + Clone + Display + Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `task` under `key`.
    ///
    /// Returns `AlreadyScheduled` if a task with the same key is still
    /// running. The entry removes itself once the task completes.
    pub async fn schedule<F>(&self, key: K, task: F) -> Result<(), SessionError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks.lock().await;
        if tasks
            .get(&key)
            .is_some_and(|existing| !existing.handle.is_finished())
        {
            return Err(SessionError::AlreadyScheduled(key.to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let registry = Arc::clone(&self.tasks);
        let own_key = key.clone();
        let handle = tokio::spawn(async move {
            task.await;
            let mut tasks = registry.lock().await;
            if tasks.get(&own_key).is_some_and(|t| t.id == id) {
                tasks.remove(&own_key);
            }
        });

        tracing::debug!("Scheduled task '{}'", key);
        tasks.insert(key, ScheduledTask { id, handle });
        Ok(())
    }

    /// Abort the task under `key`. Returns `true` if one was running.
    pub async fn cancel(&self, key: &K) -> bool {
        let mut tasks = self.tasks.lock().await;
        match tasks.remove(key) {
            Some(task) if !task.handle.is_finished() => {
                task.handle.abort();
                tracing::debug!("Cancelled task '{}'", key);
                true
            }
            _ => false,
        }
    }

    /// Keys of the running tasks, sorted by their display form.
    pub async fn pending(&self) -> Vec<String> {
        let tasks = self.tasks.lock().await;
        let mut keys: Vec<String> = tasks
            .iter()
            .filter(|(_, t)| !t.handle.is_finished())
            .map(|(key, _)| key.to_string())
            .collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::atomic::AtomicBool, time::Duration};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_key_is_refused_while_running() {
        // テスト項目: 実行中のキーへの 2 回目の登録は AlreadyScheduled になる
        // given (前提条件):
        let scheduler = TaskScheduler::<String>::new();
        scheduler
            .schedule("purge".to_string(), tokio::time::sleep(Duration::from_secs(10)))
            .await
            .unwrap();

        // when (操作):
        let result = scheduler
            .schedule("purge".to_string(), async {})
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::AlreadyScheduled("purge".to_string())));
        assert_eq!(scheduler.pending().await, vec!["purge".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_task_frees_its_key() {
        // テスト項目: 完了したタスクのキーは一覧から消え、再登録できる
        // given (前提条件):
        let scheduler = TaskScheduler::<String>::new();
        scheduler
            .schedule("kick:a".to_string(), tokio::time::sleep(Duration::from_secs(1)))
            .await
            .unwrap();

        // when (操作):
        tokio::time::sleep(Duration::from_secs(2)).await;

        // then (期待する結果):
        assert!(scheduler.pending().await.is_empty());
        assert!(scheduler.schedule("kick:a".to_string(), async {}).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_pending_task() {
        // テスト項目: キャンセルされたタスクは最後まで実行されない
        // given (前提条件):
        let scheduler = TaskScheduler::<String>::new();
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        scheduler
            .schedule("suspend".to_string(), async move {
                tokio::time::sleep(Duration::from_secs(2)).await;
                flag.store(true, Ordering::SeqCst);
            })
            .await
            .unwrap();

        // when (操作):
        let cancelled = scheduler.cancel(&"suspend".to_string()).await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        // then (期待する結果):
        assert!(cancelled);
        assert!(!ran.load(Ordering::SeqCst));
        assert!(!scheduler.cancel(&"suspend".to_string()).await);
    }
}
