/*!
 * Worker protocol and job supersession
 */

use futures::StreamExt;

use brailleflow::engine::MockEngine;
use brailleflow::errors::TranslationError;
use brailleflow::translation::{TranslationOptions, TranslationRequest};
use brailleflow::worker::{WireEvent, WorkerEvent};

use crate::common;

/// Test that a newer request hides every event of the one it replaced
#[tokio::test]
async fn test_submit_whileChunkedJobRuns_shouldOnlySeeNewJobEvents() {
    common::init_logging();
    let mut worker = common::mock_worker(MockEngine::slow(20), common::small_chunks(60));
    assert_eq!(worker.recv().await, Some(WorkerEvent::Ready));

    let old = worker.submit(TranslationRequest::new(common::sample_document(20)));
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let new = worker.submit(TranslationRequest::new("short"));

    let events = common::collect_until_terminal(&mut worker).await;

    assert!(events.iter().all(|e| e.job() == Some(new)), "{:?}", events);
    assert_eq!(
        events.last(),
        Some(&WorkerEvent::Result {
            job: new,
            text: "SHORT".to_string()
        })
    );
    assert!(old < new);
    worker.shutdown().await;
}

/// Test that rapid submissions only ever complete the last one
#[tokio::test]
async fn test_submit_burst_shouldCompleteLastRequest() {
    let mut worker = common::mock_worker(MockEngine::slow(5), TranslationOptions::default());

    let mut last = None;
    for i in 0..5 {
        last = Some(worker.submit(TranslationRequest::new(format!("draft {}", i))));
    }
    let last = last.expect("at least one job was submitted");

    let events = common::collect_until_terminal(&mut worker).await;
    let results: Vec<&WorkerEvent> = events
        .iter()
        .filter(|e| matches!(e, WorkerEvent::Result { .. }))
        .collect();

    assert_eq!(
        results,
        vec![&WorkerEvent::Result {
            job: last,
            text: "DRAFT 4".to_string()
        }]
    );
    assert_eq!(worker.current_job(), Some(last));
}

/// Test the request/response helper with progress forwarding
#[tokio::test]
async fn test_translate_chunkedRequest_shouldForwardProgress() {
    let mut worker = common::mock_worker(MockEngine::working(), common::small_chunks(50));
    let text = common::sample_document(6);
    let mut progress = Vec::new();

    let result = worker
        .translate(TranslationRequest::new(text.clone()), |p| progress.push(p))
        .await
        .expect("translation should succeed");

    assert_eq!(result, MockEngine::transliterate(&text));
    assert!(!progress.is_empty());
    assert_eq!(progress.last(), Some(&100));
}

/// Test that engine failures surface as worker errors
#[tokio::test]
async fn test_translate_failingEngine_shouldReturnWorkerFailed() {
    let mut worker = common::mock_worker(MockEngine::failing(), TranslationOptions::default());

    let result = worker
        .translate(TranslationRequest::new("text").with_table("en-us-g1.ctb"), |_| {})
        .await;

    match result {
        Err(TranslationError::WorkerFailed(message)) => {
            assert!(message.contains("en-us-g1.ctb"), "{}", message);
        }
        other => panic!("expected a worker failure, got {:?}", other),
    }
}

/// Test that blank documents complete without touching the engine
#[tokio::test]
async fn test_translate_blankText_shouldReturnEmptyResult() {
    let engine = MockEngine::working();
    let mut worker = common::mock_worker(engine.clone(), TranslationOptions::default());

    let result = worker
        .translate(TranslationRequest::new("   \n"), |_| {})
        .await
        .expect("blank text should succeed");

    assert_eq!(result, "");
    assert_eq!(engine.call_count(), 0);
}

/// Test the event stream adapter
#[tokio::test]
async fn test_intoStream_shouldYieldReadyThenResult() {
    let worker = common::mock_worker(MockEngine::working(), TranslationOptions::default());
    let job = worker.submit(TranslationRequest::new("abc"));

    let events: Vec<WorkerEvent> = worker.into_stream().take(2).collect().await;

    assert_eq!(
        events,
        vec![
            WorkerEvent::Ready,
            WorkerEvent::Result {
                job,
                text: "ABC".to_string()
            }
        ]
    );
}

/// Test the JSON form of worker events
#[test]
fn test_wireEvent_shouldSerializeWithUppercaseType() -> anyhow::Result<()> {
    let job = brailleflow::translation::JobId(3);
    let cases = [
        (WorkerEvent::Ready, r#"{"type":"READY"}"#),
        (
            WorkerEvent::Progress { job, percent: 42 },
            r#"{"type":"PROGRESS","percent":42}"#,
        ),
        (
            WorkerEvent::Result {
                job,
                text: "⠓⠊".to_string(),
            },
            r#"{"type":"RESULT","result":"⠓⠊"}"#,
        ),
        (
            WorkerEvent::Error {
                job: None,
                message: "boom".to_string(),
            },
            r#"{"type":"ERROR","error":"boom"}"#,
        ),
    ];

    for (event, expected) in cases {
        assert_eq!(serde_json::to_string(&WireEvent::from(&event))?, expected);
    }
    Ok(())
}

/// Test the JSON form of requests
#[test]
fn test_translationRequest_shouldParseCamelCaseJson() -> anyhow::Result<()> {
    let request: TranslationRequest =
        serde_json::from_str(r#"{"text":"x","table":"nemeth.ctb","mathCode":"ueb"}"#)?;
    assert_eq!(request.text, "x");
    assert_eq!(request.table.as_deref(), Some("nemeth.ctb"));
    assert_eq!(request.math_code.as_deref(), Some("ueb"));

    let bare: TranslationRequest = serde_json::from_str(r#"{"text":"y"}"#)?;
    assert_eq!(bare.table, None);
    Ok(())
}
