//! Batch ingestion: score uploads concurrently, insert them one at a time.
//!
//! Each upload is analyzed in its own task. Results come back to the caller,
//! which owns the [`Session`] and inserts each photo in one step, so readers
//! never see a half-built record. A failure or cancellation affects only its
//! own upload.

use std::collections::HashMap;
use std::sync::Arc;

use time::{Duration, OffsetDateTime};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::{AnalysisResult, Photo, PhotoId, Upload};
use crate::error::{AnalysisError, IngestError};
use crate::ports::{ProgressEvent, ProgressSink, Scorer};
use crate::session::Session;

/// Default number of uploads analyzed at the same time.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Hands out photo identities. An identity is never handed out twice.
#[derive(Debug, Clone)]
pub enum IdAllocator {
    /// `prefix` followed by a counter starting at 1: `p1`, `p2`, ...
    Sequential {
        /// Text before the counter.
        prefix: String,
        /// Next counter value.
        next: u64,
    },
    /// Random UUID v4 strings.
    Random,
}

impl IdAllocator {
    /// Creates a sequential allocator with the given prefix.
    #[must_use]
    pub fn sequential(prefix: impl Into<String>) -> Self {
        Self::Sequential {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// Returns the next identity.
    pub fn next_id(&mut self) -> PhotoId {
        match self {
            Self::Sequential { prefix, next } => {
                let id = PhotoId::new(format!("{prefix}{next}"));
                *next += 1;
                id
            }
            Self::Random => PhotoId::random(),
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::Random
    }
}

/// What happened to one upload of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Scored and inserted.
    Inserted {
        /// Identity of the new photo.
        id: PhotoId,
        /// Display name.
        name: String,
    },
    /// Not inserted.
    Failed {
        /// Identity that was reserved for the upload.
        id: PhotoId,
        /// Display name.
        name: String,
        /// Why it failed.
        error: IngestError,
    },
}

impl IngestOutcome {
    /// Returns the identity reserved for the upload.
    #[must_use]
    pub const fn id(&self) -> &PhotoId {
        match self {
            Self::Inserted { id, .. } | Self::Failed { id, .. } => id,
        }
    }

    /// Returns true if the photo was inserted.
    #[must_use]
    pub const fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted { .. })
    }
}

/// Cancels a whole batch or single uploads in it.
#[derive(Debug, Clone)]
pub struct IngestHandle {
    batch: CancellationToken,
    items: Arc<HashMap<PhotoId, CancellationToken>>,
}

impl IngestHandle {
    /// Cancels one upload. Returns false if the identity is not in the batch.
    pub fn cancel(&self, id: &PhotoId) -> bool {
        let Some(token) = self.items.get(id) else {
            return false;
        };
        token.cancel();
        true
    }

    /// Cancels every upload that has not completed yet.
    pub fn cancel_all(&self) {
        self.batch.cancel();
    }
}

struct PendingUpload {
    id: PhotoId,
    uploaded_at: OffsetDateTime,
    upload: Upload,
    token: CancellationToken,
}

/// A batch of uploads with identities reserved, ready to run.
pub struct IngestBatch {
    items: Vec<PendingUpload>,
    handle: IngestHandle,
}

impl IngestBatch {
    /// Returns the reserved identities, in upload order.
    #[must_use]
    pub fn ids(&self) -> Vec<PhotoId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    /// Returns a handle for cancelling the batch or items in it.
    #[must_use]
    pub fn handle(&self) -> IngestHandle {
        self.handle.clone()
    }

    /// Returns the number of uploads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the batch has no uploads.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Runs uploads through a [`Scorer`] and into a [`Session`].
pub struct Ingestor {
    scorer: Arc<dyn Scorer>,
    ids: IdAllocator,
    concurrency: usize,
    last_upload: Option<OffsetDateTime>,
}

impl Ingestor {
    /// Creates an ingestor with random identities and default concurrency.
    #[must_use]
    pub fn new(scorer: Arc<dyn Scorer>) -> Self {
        Self {
            scorer,
            ids: IdAllocator::default(),
            concurrency: DEFAULT_CONCURRENCY,
            last_upload: None,
        }
    }

    /// Sets the identity allocator.
    #[must_use]
    pub fn with_ids(mut self, ids: IdAllocator) -> Self {
        self.ids = ids;
        self
    }

    /// Sets how many uploads are analyzed at once (at least 1).
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Reserves identities and upload times for `uploads`, in order.
    ///
    /// Upload times strictly increase across every batch this ingestor
    /// prepares, so the date view follows upload order however long each
    /// analysis takes.
    pub fn prepare(&mut self, uploads: Vec<Upload>) -> IngestBatch {
        let batch = CancellationToken::new();
        let items: Vec<PendingUpload> = uploads
            .into_iter()
            .map(|upload| PendingUpload {
                id: self.ids.next_id(),
                uploaded_at: self.next_upload_time(),
                upload,
                token: batch.child_token(),
            })
            .collect();
        let tokens = items
            .iter()
            .map(|item| (item.id.clone(), item.token.clone()))
            .collect();

        IngestBatch {
            items,
            handle: IngestHandle {
                batch,
                items: Arc::new(tokens),
            },
        }
    }

    fn next_upload_time(&mut self) -> OffsetDateTime {
        let now = OffsetDateTime::now_utc();
        let stamp = match self.last_upload {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_upload = Some(stamp);
        stamp
    }

    /// Prepares and runs `uploads` in one go.
    pub async fn ingest(
        &mut self,
        session: &mut Session,
        uploads: Vec<Upload>,
        progress: &dyn ProgressSink,
    ) -> Vec<IngestOutcome> {
        let batch = self.prepare(uploads);
        self.run(session, batch, progress).await
    }

    /// Analyzes every upload of `batch` and inserts the successes.
    ///
    /// Returns one outcome per upload, in upload order.
    pub async fn run(
        &self,
        session: &mut Session,
        batch: IngestBatch,
        progress: &dyn ProgressSink,
    ) -> Vec<IngestOutcome> {
        let total = batch.items.len();
        info!(
            "Analyzing {total} uploads with {} (concurrency {})",
            self.scorer.name(),
            self.concurrency
        );

        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut labels = Vec::with_capacity(total);
        let mut tasks = JoinSet::new();

        for (index, item) in batch.items.into_iter().enumerate() {
            labels.push((item.id.clone(), item.upload.name.clone()));
            progress.on_event(ProgressEvent::Started {
                name: item.upload.name.clone(),
                index,
                total,
            });

            let scorer = Arc::clone(&self.scorer);
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                let analysis = tokio::select! {
                    biased;
                    () = item.token.cancelled() => Err(AnalysisError::Cancelled),
                    result = score(scorer.as_ref(), &item.upload, &permits) => result,
                };
                (index, item, analysis)
            });
        }

        let mut outcomes: Vec<Option<IngestOutcome>> = (0..total).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, item, analysis)) => {
                    outcomes[index] = Some(complete(session, item, analysis, progress));
                }
                Err(e) => warn!("Analysis task aborted: {e}"),
            }
        }

        let outcomes: Vec<IngestOutcome> = outcomes
            .into_iter()
            .zip(labels)
            .map(|(outcome, (id, name))| {
                outcome.unwrap_or_else(|| {
                    let reason = AnalysisError::Failed("analysis task aborted".to_string());
                    progress.on_event(ProgressEvent::Skipped {
                        name: name.clone(),
                        reason: reason.to_string(),
                    });
                    IngestOutcome::Failed {
                        id,
                        name,
                        error: reason.into(),
                    }
                })
            })
            .collect();

        let processed = outcomes.iter().filter(|o| o.is_inserted()).count();
        let skipped = total - processed;
        info!("Batch finished: {processed} inserted, {skipped} failed");
        progress.on_event(ProgressEvent::Finished { processed, skipped });

        outcomes
    }
}

async fn score(
    scorer: &dyn Scorer,
    upload: &Upload,
    permits: &Semaphore,
) -> Result<AnalysisResult, AnalysisError> {
    if upload.is_empty() {
        return Err(AnalysisError::EmptyUpload);
    }
    let _permit = permits
        .acquire()
        .await
        .map_err(|e| AnalysisError::Failed(e.to_string()))?;
    debug!("Scoring {}", upload.name);
    scorer.analyze(upload).await
}

fn complete(
    session: &mut Session,
    item: PendingUpload,
    analysis: Result<AnalysisResult, AnalysisError>,
    progress: &dyn ProgressSink,
) -> IngestOutcome {
    let PendingUpload {
        id,
        uploaded_at,
        upload,
        ..
    } = item;
    let inserted = analysis.map_err(IngestError::from).and_then(|analysis| {
        let photo = Photo::new(
            id.clone(),
            upload.source,
            upload.name.clone(),
            uploaded_at,
            analysis,
        );
        let score = photo.score();
        session.insert(photo).map(|()| score).map_err(IngestError::from)
    });

    match inserted {
        Ok(score) => {
            progress.on_event(ProgressEvent::Completed {
                id: id.clone(),
                name: upload.name.clone(),
                score,
            });
            IngestOutcome::Inserted {
                id,
                name: upload.name,
            }
        }
        Err(error) => {
            warn!("Skipping {}: {error}", upload.name);
            progress.on_event(ProgressEvent::Skipped {
                name: upload.name.clone(),
                reason: error.to_string(),
            });
            IngestOutcome::Failed {
                id,
                name: upload.name,
                error,
            }
        }
    }
}
