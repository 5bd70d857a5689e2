/*!
 * Text to pages, end to end
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use brailleflow::engine::{MockEngine, TranslationEngine};
use brailleflow::errors::TranslationError;
use brailleflow::layout::{self, PageGeometry};
use brailleflow::math::{MathCode, MathRenderer};
use brailleflow::translation::{
    JobId, JobOutcome, TranslationJob, TranslationOptions, TranslationRequest, Translator,
};

use crate::common;
use crate::common::mock_math::{RecordingMathEngine, TagConverter};

fn job(text: &str, math_code: MathCode) -> TranslationJob {
    let request = TranslationRequest::new(text);
    TranslationJob::from_request(JobId(1), request, "en-ueb-g2.ctb", math_code)
}

fn translator(engine: &MockEngine, options: TranslationOptions) -> Translator {
    Translator::new(
        Arc::new(engine.clone()),
        Arc::new(MathRenderer::unavailable()),
        options,
    )
}

async fn completed(translator: &Translator, job: &TranslationJob) -> String {
    match translator.translate(job, |_| {}, || true).await {
        Ok(JobOutcome::Completed(text)) => text,
        other => panic!("expected a completed job, got {:?}", other),
    }
}

/// Test that chunked and single-call translation agree
#[tokio::test]
async fn test_translate_chunkedDocument_shouldEqualSingleCall() {
    let text = common::sample_document(12);
    let whole_engine = MockEngine::working();
    let chunked_engine = MockEngine::working();

    let job = job(&text, MathCode::Nemeth);

    let whole = completed(&translator(&whole_engine, TranslationOptions::default()), &job).await;
    let chunked = completed(&translator(&chunked_engine, common::small_chunks(90)), &job).await;

    assert_eq!(whole_engine.call_count(), 1);
    assert!(chunked_engine.call_count() > 1);
    assert_eq!(chunked, whole);
    assert_eq!(whole, MockEngine::transliterate(&text));
}

/// Test progress for a chunked document
#[tokio::test]
async fn test_translate_chunkedDocument_shouldReportIncreasingProgressTo100() {
    let text = common::sample_document(10);
    let engine = MockEngine::working();
    let translator = translator(&engine, common::small_chunks(80));
    let reports = parking_lot::Mutex::new(Vec::new());

    let outcome = translator
        .translate(&job(&text, MathCode::Nemeth), |p| reports.lock().push(p), || true)
        .await
        .expect("translation should succeed");

    let reports = reports.into_inner();
    assert!(matches!(outcome, JobOutcome::Completed(_)));
    assert_eq!(reports.len(), engine.call_count());
    assert!(reports.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(reports.last(), Some(&100));
    assert!(reports[..reports.len() - 1].iter().all(|p| *p < 100));
}

/// Test that a failure on a later chunk names the chunk and yields no partial text
#[tokio::test]
async fn test_translate_failingChunk_shouldReportChunkPosition() {
    let text = common::sample_document(10);
    let engine = MockEngine::fail_on_call(2);

    let result = translator(&engine, common::small_chunks(80))
        .translate(&job(&text, MathCode::Nemeth), |_| {}, || true)
        .await;

    match result {
        Err(TranslationError::EngineTranslationFailed {
            table, chunk_index, ..
        }) => {
            assert_eq!(table, "en-ueb-g2.ctb");
            assert_eq!(chunk_index, 1);
        }
        other => panic!("expected an engine failure, got {:?}", other),
    }
}

/// Test that a job stops between chunks once it is no longer current
#[tokio::test]
async fn test_translate_supersededMidway_shouldStopBetweenChunks() {
    let text = common::sample_document(10);
    let engine = MockEngine::working();
    let checks = AtomicUsize::new(0);

    let outcome = translator(&engine, common::small_chunks(80))
        .translate(&job(&text, MathCode::Nemeth), |_| {}, || {
            checks.fetch_add(1, Ordering::SeqCst) < 2
        })
        .await
        .expect("superseding is not an error");

    assert_eq!(outcome, JobOutcome::Superseded);
    assert_eq!(engine.call_count(), 2);
}

/// Test that math segments are rendered in place between translated text
#[tokio::test]
async fn test_translate_mathDocument_shouldInterleaveTextAndMath() {
    let engine = MockEngine::working();
    let math_engine = Arc::new(RecordingMathEngine::default());
    let translator = Translator::new(
        Arc::new(engine.clone()),
        Arc::new(MathRenderer::new(Arc::new(TagConverter), math_engine.clone())),
        TranslationOptions::default(),
    );

    let output = completed(&translator, &job("Let $$x$$ be \\(y\\).", MathCode::Nemeth)).await;

    let inner = "<math><mtext>x</mtext></math>".len();
    assert_eq!(
        output,
        format!("LET <nemeth:{}> BE <nemeth:{}>.", inner, inner)
    );
    let texts: Vec<String> = engine.calls().into_iter().map(|(_, text)| text).collect();
    assert_eq!(texts, vec!["Let ", " be ", "."]);
    assert_eq!(math_engine.setups(), vec!["nemeth"]);
}

/// Test that a bad formula becomes a placeholder without failing the job
#[tokio::test]
async fn test_translate_invalidFormula_shouldKeepPlaceholderAndContinue() {
    let engine = MockEngine::working();
    let translator = Translator::new(
        Arc::new(engine.clone()),
        Arc::new(MathRenderer::new(
            Arc::new(TagConverter),
            Arc::new(RecordingMathEngine::default()),
        )),
        TranslationOptions::default(),
    );

    let output = completed(&translator, &job("a $$\\invalid$$ b", MathCode::Ueb)).await;

    assert_eq!(output, "A [Math Error: \\invalid] B");
}

/// Test a whole document through translation and embosser layout
#[tokio::test]
async fn test_pipeline_documentToEmbosser_shouldProduceBrfPages() {
    let engine: Arc<dyn TranslationEngine> = Arc::new(MockEngine::working());
    let translator = Translator::new(
        engine,
        Arc::new(MathRenderer::unavailable()),
        TranslationOptions::default(),
    );
    let text = "first line of text\nsecond line\n\n\n";

    let translated = completed(&translator, &job(text, MathCode::Nemeth)).await;
    let output = layout::embosser_output(&translated, PageGeometry::new(10, 2));

    assert_eq!(
        output,
        b"FIRST LINE\r\nOF TEXT\r\n\x0CSECOND\r\nLINE\r\n".to_vec()
    );
}

/// Test that display pages use Unicode braille
#[tokio::test]
async fn test_pipeline_documentToDisplay_shouldUseUnicodeCells() {
    let translator = translator(&MockEngine::working(), TranslationOptions::default());

    let translated = completed(&translator, &job("ab cd", MathCode::Nemeth)).await;
    let pages = layout::display_pages(&translated, PageGeometry::new(2, 5));

    assert_eq!(pages, vec!["\u{2801}\u{2803}\n\u{2809}\u{2819}".to_string()]);
}
