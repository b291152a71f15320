//! Dedicated OCR thread.
//!
//! The ONNX sessions inside the OCR engine are not `Send`, so the engine is
//! built and used on a single thread. Handlers send decoded images over a
//! channel and await the answer on a oneshot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use image::DynamicImage;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use escaner_core::{OcrError, OcrProvider, OcrResult, OcrSession};

/// Images waiting for the OCR thread before senders are held back.
const QUEUE_DEPTH: usize = 16;

struct Job {
    image: DynamicImage,
    reply: oneshot::Sender<Result<OcrResult, OcrError>>,
}

/// Handle to the OCR thread. Clones share the same thread.
///
/// The thread exits once every handle is dropped.
#[derive(Clone)]
pub struct OcrWorker {
    jobs: mpsc::Sender<Job>,
    resets: Arc<AtomicU64>,
}

impl OcrWorker {
    /// Start the OCR thread and build the first provider on it.
    ///
    /// Only the factory crosses threads; the provider it builds never does.
    pub async fn spawn<P, F>(factory: F) -> Result<Self, OcrError>
    where
        P: OcrProvider + 'static,
        F: Fn() -> Result<P, OcrError> + Send + 'static,
    {
        let (jobs, mut queue) = mpsc::channel::<Job>(QUEUE_DEPTH);
        let (ready_tx, ready_rx) = oneshot::channel();
        let resets = Arc::new(AtomicU64::new(0));
        let thread_resets = resets.clone();

        thread::Builder::new()
            .name("ocr-worker".to_string())
            .spawn(move || {
                let mut session = match OcrSession::new(factory) {
                    Ok(session) => {
                        let _ = ready_tx.send(Ok(()));
                        session
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                while let Some(job) = queue.blocking_recv() {
                    let result = session.recognize(&job.image);
                    thread_resets.store(session.resets(), Ordering::SeqCst);
                    if job.reply.send(result).is_err() {
                        debug!("OCR request dropped before the result was ready");
                    }
                }

                info!("OCR worker stopped");
            })
            .map_err(|e| OcrError::ModelLoad(format!("failed to start OCR thread: {e}")))?;

        ready_rx
            .await
            .map_err(|_| OcrError::ModelLoad("OCR thread exited during startup".to_string()))??;

        info!("OCR worker ready");
        Ok(Self { jobs, resets })
    }

    /// Queue an image and wait for its text.
    pub async fn recognize(&self, image: DynamicImage) -> Result<OcrResult, OcrError> {
        let (reply, answer) = oneshot::channel();

        self.jobs
            .send(Job { image, reply })
            .await
            .map_err(|_| OcrError::Recognition("OCR worker is not running".to_string()))?;

        answer
            .await
            .map_err(|_| OcrError::Recognition("OCR worker dropped the request".to_string()))?
    }

    /// Number of times the worker has rebuilt its provider.
    pub fn resets(&self) -> u64 {
        self.resets.load(Ordering::SeqCst)
    }
}
