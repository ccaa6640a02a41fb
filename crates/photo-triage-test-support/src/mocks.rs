//! Mock implementations of core port traits.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use photo_triage_core::domain::{AnalysisResult, PhotoView, SourceRef, Upload};
use photo_triage_core::error::AnalysisError;
use photo_triage_core::ports::{
    ProgressEvent, ProgressSink, Scorer, UnreadableUpload, UploadSource, ViewOutput,
};

use crate::builders::AnalysisBuilder;

/// How the mock scorer answers for one upload name.
#[derive(Debug, Clone)]
enum Script {
    Score(AnalysisResult),
    Fail(AnalysisError),
    Delay(Duration, AnalysisResult),
    Hang,
}

/// Mock implementation of `Scorer` for testing.
///
/// Answers per upload name from a script. Unscripted uploads get the
/// default score. Every call is recorded.
pub struct MockScorer {
    default_score: u8,
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<String>>,
}

impl MockScorer {
    /// Creates a scorer that gives every upload `default_score`.
    #[must_use]
    pub fn new(default_score: u8) -> Self {
        Self {
            default_score,
            scripts: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Scores the upload named `name` with `score`.
    #[must_use]
    pub fn score(mut self, name: &str, score: u8) -> Self {
        self.scripts.insert(
            name.to_string(),
            Script::Score(AnalysisBuilder::scored(score).build()),
        );
        self
    }

    /// Fails the upload named `name` with `error`.
    #[must_use]
    pub fn fail(mut self, name: &str, error: AnalysisError) -> Self {
        self.scripts.insert(name.to_string(), Script::Fail(error));
        self
    }

    /// Scores the upload named `name` with `score` after sleeping for `delay`.
    #[must_use]
    pub fn delay(mut self, name: &str, delay: Duration, score: u8) -> Self {
        self.scripts.insert(
            name.to_string(),
            Script::Delay(delay, AnalysisBuilder::scored(score).build()),
        );
        self
    }

    /// Never completes for the upload named `name`.
    #[must_use]
    pub fn hang(mut self, name: &str) -> Self {
        self.scripts.insert(name.to_string(), Script::Hang);
        self
    }

    /// Returns the names of every upload analyzed so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        locked(&self.calls).clone()
    }
}

#[async_trait]
impl Scorer for MockScorer {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn analyze(&self, upload: &Upload) -> Result<AnalysisResult, AnalysisError> {
        locked(&self.calls).push(upload.name.clone());

        match self.scripts.get(&upload.name).cloned() {
            None => Ok(AnalysisBuilder::scored(self.default_score).build()),
            Some(Script::Score(result)) => Ok(result),
            Some(Script::Fail(error)) => Err(error),
            Some(Script::Delay(delay, result)) => {
                tokio::time::sleep(delay).await;
                Ok(result)
            }
            Some(Script::Hang) => std::future::pending().await,
        }
    }
}

/// Yields pre-built uploads, or read errors, and counts how often it was
/// iterated.
pub struct MockUploadSource {
    uploads: Vec<Result<Upload, (String, String)>>,
    iterations: AtomicUsize,
}

impl MockUploadSource {
    #[must_use]
    pub fn new(uploads: Vec<Upload>) -> Self {
        Self {
            uploads: uploads.into_iter().map(Ok).collect(),
            iterations: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Appends an item at `location` that fails to read with `message`.
    #[must_use]
    pub fn with_error(mut self, location: &str, message: &str) -> Self {
        self.uploads.push(Err((location.to_string(), message.to_string())));
        self
    }

    #[must_use]
    pub fn iteration_count(&self) -> usize {
        self.iterations.load(Ordering::SeqCst)
    }
}

impl UploadSource for MockUploadSource {
    fn uploads(&self) -> Box<dyn Iterator<Item = Result<Upload, UnreadableUpload>> + Send + '_> {
        self.iterations.fetch_add(1, Ordering::SeqCst);
        Box::new(self.uploads.iter().map(|item| {
            item.clone().map_err(|(location, message)| {
                UnreadableUpload::new(SourceRef::new(location), anyhow::Error::msg(message))
            })
        }))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.uploads.len())
    }
}

/// Records every row written and every flush.
#[derive(Default)]
pub struct MockViewOutput {
    rows: Mutex<Vec<PhotoView>>,
    flushes: AtomicUsize,
}

impl MockViewOutput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rows(&self) -> Vec<PhotoView> {
        locked(&self.rows).clone()
    }

    #[must_use]
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl ViewOutput for MockViewOutput {
    fn write(&self, row: &PhotoView) -> anyhow::Result<()> {
        locked(&self.rows).push(row.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Captures progress events for later assertions.
#[derive(Default)]
pub struct MockProgressSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl MockProgressSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event received, in order.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        locked(&self.events).clone()
    }

    #[must_use]
    pub fn started_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Started { .. }))
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Completed { .. }))
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Skipped { .. }))
    }

    /// `(processed, skipped)` from the `Finished` event, if one arrived.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize)> {
        locked(&self.events).iter().find_map(|e| match e {
            ProgressEvent::Finished { processed, skipped } => Some((*processed, *skipped)),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&ProgressEvent) -> bool) -> usize {
        locked(&self.events).iter().filter(|e| pred(e)).count()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        locked(&self.events).push(event);
    }
}

/// A panicking test thread must not hide what was recorded before it.
fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builders::{raw_upload, PhotoBuilder};
    use photo_triage_core::domain::{FilterMode, SortKey};
    use photo_triage_core::Session;

    #[tokio::test]
    async fn test_mock_scorer_scripts() {
        let scorer = MockScorer::new(40)
            .score("good.jpg", 92)
            .fail("bad.jpg", AnalysisError::Decode("truncated".into()));

        let good = scorer.analyze(&raw_upload("good.jpg", b"x")).await.unwrap();
        let other = scorer.analyze(&raw_upload("other.jpg", b"x")).await.unwrap();
        let bad = scorer.analyze(&raw_upload("bad.jpg", b"x")).await;

        assert_eq!(good.score(), 92);
        assert_eq!(other.score(), 40);
        assert_eq!(bad, Err(AnalysisError::Decode("truncated".into())));
        assert_eq!(scorer.calls(), ["good.jpg", "other.jpg", "bad.jpg"]);
    }

    #[test]
    fn test_mock_upload_source() {
        let source = MockUploadSource::new(vec![raw_upload("a.jpg", b"1")])
            .with_error("shoot/b.jpg", "permission denied");
        assert_eq!(source.count_hint(), Some(2));

        let items: Vec<_> = source.uploads().collect();
        assert!(items[0].is_ok());
        let failure = items[1].as_ref().unwrap_err();
        assert_eq!(failure.location.as_str(), "shoot/b.jpg");
        assert_eq!(source.iteration_count(), 1);
    }

    #[test]
    fn test_mock_view_output() {
        let mut session = Session::new();
        session.insert(PhotoBuilder::new("p1").score(91).build()).unwrap();

        let output = MockViewOutput::new();
        for row in session.view(FilterMode::All, SortKey::Score) {
            output.write(&row).unwrap();
        }
        output.flush().unwrap();

        assert_eq!(output.rows().len(), 1);
        assert_eq!(output.rows()[0].score, 91);
        assert_eq!(output.flush_count(), 1);
    }

    #[test]
    fn test_mock_progress_sink() {
        let sink = MockProgressSink::new();

        sink.on_event(ProgressEvent::Started {
            name: "test.jpg".into(),
            index: 0,
            total: 1,
        });
        sink.on_event(ProgressEvent::Finished {
            processed: 1,
            skipped: 0,
        });

        assert_eq!(sink.started_count(), 1);
        assert_eq!(sink.finished_counts(), Some((1, 0)));
    }
}
