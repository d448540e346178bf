use async_trait::async_trait;
use bcrypt::{hash, verify, BcryptError};
#[cfg(test)]
use mockall::automock;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_HASH_COST: u32 = 10;

#[derive(Error, Debug)]
pub enum HashWorkerError {
  #[error("Bcrypt error: {0}")]
  Bcrypt(#[source] BcryptError),
  #[error("Stored password hash is corrupt: {0}")]
  CorruptHash(#[source] BcryptError),
  #[error("Unable to start the hash worker pool: {0}")]
  ThreadPool(#[from] ThreadPoolBuildError),
  #[error("Channel send error")]
  Send,
  #[error("Channel receive error")]
  Receive,
}

enum WorkOrder {
  Hash(String, flume::Sender<Result<String, HashWorkerError>>),
  Verify(String, String, flume::Sender<Result<bool, HashWorkerError>>),
}

/// Runs bcrypt on a dedicated rayon pool so request workers never block on
/// the key-stretching rounds.
pub struct HashWorker {
  sender: flume::Sender<WorkOrder>,
  // Owns the worker threads for as long as the handle lives.
  _thread_pool: ThreadPool,
}

impl HashWorker {
  pub fn new(thread_pool: ThreadPool, num_threads: usize, cost: u32) -> Self {
    // Each bcrypt round at the default cost takes tens of milliseconds, so
    // three queued orders per thread keeps the workers busy without letting
    // a burst of logins pile up unbounded.
    let channels_capacity = num_threads.max(1) * 3;
    let (tx, rx) = flume::bounded::<WorkOrder>(channels_capacity);
    let rx = Arc::new(rx);

    for _ in 0..num_threads.max(1) {
      thread_pool.spawn({
        let arc_rx = Arc::clone(&rx);
        move || {
          while let Ok(work_order) = arc_rx.recv() {
            match work_order {
              WorkOrder::Hash(password, response) => {
                let _ = response
                  .send(hash(password, cost).map_err(HashWorkerError::Bcrypt));
              }
              WorkOrder::Verify(password, hashed_password, response) => {
                // bcrypt only fails verification when the stored value
                // cannot be parsed; a wrong password is Ok(false).
                let _ = response.send(
                  verify(password, &hashed_password)
                    .map_err(HashWorkerError::CorruptHash),
                );
              }
            };
          }
        }
      });
    }

    Self {
      sender: tx,
      _thread_pool: thread_pool,
    }
  }

  pub fn with_threads(
    num_threads: usize,
    cost: u32,
  ) -> Result<Self, HashWorkerError> {
    let thread_pool = ThreadPoolBuilder::new()
      .num_threads(num_threads.max(1))
      .thread_name(|index| format!("hash-worker-{index}"))
      .build()?;
    Ok(Self::new(thread_pool, num_threads, cost))
  }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Hasher {
  async fn hash_password(
    &self,
    password: &str,
  ) -> Result<String, HashWorkerError>;
  async fn verify_password(
    &self,
    password: &str,
    hash: &str,
  ) -> Result<bool, HashWorkerError>;
}

#[async_trait]
impl Hasher for HashWorker {
  async fn hash_password(
    &self,
    password: &str,
  ) -> Result<String, HashWorkerError> {
    let (response_tx, response_rx) = flume::bounded(1);
    self
      .sender
      .send_async(WorkOrder::Hash(password.to_string(), response_tx))
      .await
      .map_err(|_| HashWorkerError::Send)?;

    response_rx
      .recv_async()
      .await
      .map_err(|_| HashWorkerError::Receive)?
  }

  async fn verify_password(
    &self,
    password: &str,
    hash: &str,
  ) -> Result<bool, HashWorkerError> {
    let (response_tx, response_rx) = flume::bounded(1);
    self
      .sender
      .send_async(WorkOrder::Verify(
        password.to_string(),
        hash.to_string(),
        response_tx,
      ))
      .await
      .map_err(|_| HashWorkerError::Send)?;

    response_rx
      .recv_async()
      .await
      .map_err(|_| HashWorkerError::Receive)?
  }
}
