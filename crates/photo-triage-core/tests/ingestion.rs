//! Batch ingestion against a scripted scorer.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use photo_triage_core::{
    AnalysisError, FilterMode, IdAllocator, IngestError, IngestOutcome, Ingestor, NoProgress,
    PhotoId, Session, SortKey, TriageError,
};
use photo_triage_test_support::{raw_upload, MockProgressSink, MockScorer, PhotoBuilder};

fn uploads(names: &[&str]) -> Vec<photo_triage_core::Upload> {
    names.iter().map(|name| raw_upload(name, b"jpeg")).collect()
}

fn ingestor(scorer: MockScorer) -> Ingestor {
    Ingestor::new(Arc::new(scorer)).with_ids(IdAllocator::sequential("p"))
}

#[tokio::test]
async fn test_batch_inserts_every_scored_upload() {
    let scorer = MockScorer::new(70).score("a.jpg", 95).score("c.jpg", 86);
    let mut session = Session::new();
    let progress = MockProgressSink::new();

    let outcomes = ingestor(scorer)
        .ingest(&mut session, uploads(&["a.jpg", "b.jpg", "c.jpg"]), &progress)
        .await;

    assert!(outcomes.iter().all(IngestOutcome::is_inserted));
    let ids: Vec<&str> = outcomes.iter().map(|o| o.id().as_str()).collect();
    assert_eq!(ids, ["p1", "p2", "p3"]);

    assert_eq!(session.len(), 3);
    assert_eq!(session.statistics().top_count, 2);
    assert_eq!(session.get(&"p2".into()).unwrap().name(), "b.jpg");

    assert_eq!(progress.started_count(), 3);
    assert_eq!(progress.completed_count(), 3);
    assert_eq!(progress.finished_counts(), Some((3, 0)));
}

#[tokio::test]
async fn test_failure_is_isolated_to_its_upload() {
    let scorer = MockScorer::new(80).fail("broken.jpg", AnalysisError::Decode("bad marker".into()));
    let mut session = Session::new();
    let progress = MockProgressSink::new();

    let outcomes = ingestor(scorer)
        .ingest(
            &mut session,
            uploads(&["one.jpg", "broken.jpg", "three.jpg"]),
            &progress,
        )
        .await;

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].is_inserted());
    assert_eq!(
        outcomes[1],
        IngestOutcome::Failed {
            id: "p2".into(),
            name: "broken.jpg".into(),
            error: IngestError::Analysis(AnalysisError::Decode("bad marker".into())),
        }
    );
    assert!(outcomes[2].is_inserted());

    assert_eq!(session.len(), 2);
    assert!(session.get(&"p2".into()).is_err());
    assert_eq!(progress.skipped_count(), 1);
    assert_eq!(progress.finished_counts(), Some((2, 1)));
}

#[tokio::test]
async fn test_empty_upload_is_never_scored() {
    let scorer = Arc::new(MockScorer::new(50));
    let mut ingestor = Ingestor::new(scorer.clone()).with_ids(IdAllocator::sequential("p"));
    let mut session = Session::new();

    let batch = vec![raw_upload("empty.jpg", b""), raw_upload("full.jpg", b"data")];
    let outcomes = ingestor.ingest(&mut session, batch, &NoProgress).await;

    assert!(matches!(
        &outcomes[0],
        IngestOutcome::Failed {
            error: IngestError::Analysis(AnalysisError::EmptyUpload),
            ..
        }
    ));
    assert!(outcomes[1].is_inserted());
    assert_eq!(scorer.calls(), ["full.jpg"]);
}

#[tokio::test]
async fn test_identity_collision_is_reported() {
    let mut session = Session::new();
    session.insert(PhotoBuilder::new("p1").score(60).build()).unwrap();

    let outcomes = ingestor(MockScorer::new(90))
        .ingest(&mut session, uploads(&["x.jpg", "y.jpg"]), &NoProgress)
        .await;

    assert_eq!(
        outcomes[0],
        IngestOutcome::Failed {
            id: "p1".into(),
            name: "x.jpg".into(),
            error: IngestError::Triage(TriageError::DuplicateIdentity("p1".into())),
        }
    );
    assert!(outcomes[1].is_inserted());
    assert_eq!(session.get(&"p1".into()).unwrap().score(), 60);
    assert_eq!(session.len(), 2);
}

#[tokio::test]
async fn test_cancelling_one_upload_keeps_the_others() {
    let scorer = MockScorer::new(88).hang("stuck.jpg");
    let mut ingestor = ingestor(scorer);
    let mut session = Session::new();

    let batch = ingestor.prepare(uploads(&["fast.jpg", "stuck.jpg", "also-fast.jpg"]));
    let handle = batch.handle();
    let stuck = batch.ids()[1].clone();

    let cancel = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.cancel(&stuck));
    };
    let (outcomes, ()) = tokio::join!(ingestor.run(&mut session, batch, &NoProgress), cancel);

    assert!(outcomes[0].is_inserted());
    assert!(matches!(
        &outcomes[1],
        IngestOutcome::Failed {
            error: IngestError::Analysis(AnalysisError::Cancelled),
            ..
        }
    ));
    assert!(outcomes[2].is_inserted());
    assert_eq!(session.len(), 2);
    assert!(session.get(&stuck).is_err());
}

#[tokio::test]
async fn test_cancel_all_stops_pending_uploads() {
    let scorer = MockScorer::new(50).hang("a.jpg").hang("b.jpg");
    let mut ingestor = ingestor(scorer);
    let mut session = Session::new();

    let batch = ingestor.prepare(uploads(&["a.jpg", "b.jpg"]));
    let handle = batch.handle();
    assert!(!handle.cancel(&PhotoId::from("not-in-batch")));

    let cancel = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel_all();
    };
    let (outcomes, ()) = tokio::join!(ingestor.run(&mut session, batch, &NoProgress), cancel);

    assert!(outcomes.iter().all(|o| !o.is_inserted()));
    assert!(session.is_empty());
}

#[tokio::test]
async fn test_outcomes_follow_upload_order_not_completion_order() {
    let scorer = MockScorer::new(70)
        .delay("slow.jpg", Duration::from_millis(60), 91)
        .delay("medium.jpg", Duration::from_millis(30), 75);
    let mut session = Session::new();

    let outcomes = ingestor(scorer)
        .with_concurrency(3)
        .ingest(
            &mut session,
            uploads(&["slow.jpg", "medium.jpg", "quick.jpg"]),
            &NoProgress,
        )
        .await;

    let names: Vec<&str> = outcomes
        .iter()
        .map(|o| match o {
            IngestOutcome::Inserted { name, .. } | IngestOutcome::Failed { name, .. } => {
                name.as_str()
            }
        })
        .collect();
    assert_eq!(names, ["slow.jpg", "medium.jpg", "quick.jpg"]);

    let top: Vec<String> = session
        .project(FilterMode::Top, SortKey::Score)
        .iter()
        .map(|p| p.name().to_string())
        .collect();
    assert_eq!(top, ["slow.jpg"]);
}

fn names_by_date(session: &Session) -> Vec<String> {
    session
        .project(FilterMode::All, SortKey::Date)
        .iter()
        .map(|p| p.name().to_string())
        .collect()
}

#[tokio::test]
async fn test_date_view_follows_upload_order_when_first_finishes_last() {
    let scorer = MockScorer::new(70)
        .delay("first.jpg", Duration::from_millis(60), 80)
        .delay("second.jpg", Duration::from_millis(20), 80);
    let mut session = Session::new();

    ingestor(scorer)
        .with_concurrency(3)
        .ingest(
            &mut session,
            uploads(&["first.jpg", "second.jpg", "third.jpg"]),
            &NoProgress,
        )
        .await;

    assert_eq!(names_by_date(&session), ["third.jpg", "second.jpg", "first.jpg"]);

    let first = session.get(&"p1".into()).unwrap().uploaded_at();
    let third = session.get(&"p3".into()).unwrap().uploaded_at();
    assert!(first < third);
}

#[tokio::test]
async fn test_upload_times_keep_increasing_across_batches() {
    let mut session = Session::new();
    let mut ingestor = ingestor(MockScorer::new(60));

    ingestor
        .ingest(&mut session, uploads(&["a.jpg", "b.jpg"]), &NoProgress)
        .await;
    ingestor
        .ingest(&mut session, uploads(&["c.jpg", "d.jpg"]), &NoProgress)
        .await;

    assert_eq!(names_by_date(&session), ["d.jpg", "c.jpg", "b.jpg", "a.jpg"]);
}

#[tokio::test]
async fn test_empty_batch() {
    let progress = MockProgressSink::new();
    let outcomes = ingestor(MockScorer::new(50))
        .ingest(&mut Session::new(), Vec::new(), &progress)
        .await;

    assert!(outcomes.is_empty());
    assert_eq!(progress.finished_counts(), Some((0, 0)));
}
