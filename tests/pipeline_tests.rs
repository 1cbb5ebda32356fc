//! Whole-pipeline integration tests: extract, chunk, synthesize, store.

use readaloud_api::AudiobookPipeline;
use readaloud_core::DocumentCatalog;
use readaloud_extract::PageRange;
use readaloud_speech::{ChunkOutcome, StubTtsEngine, SynthesisResult, VoiceParameters};
use readaloud_storage::MemoryAssetStore;
use readaloud_tests::seeded_catalog;
use std::sync::Arc;

#[tokio::test]
async fn test_full_pipeline_produces_persisted_audiobook() {
    let (catalog, id, _dir) = seeded_catalog(&["Chapter one text", "Chapter two text"]);
    let store = Arc::new(MemoryAssetStore::new());
    let pipeline = AudiobookPipeline::new(
        catalog.clone(),
        Arc::new(StubTtsEngine::speaking()),
        store.clone(),
    );

    let report = pipeline
        .generate_audiobook(id, &VoiceParameters::default())
        .await
        .unwrap();

    assert!(report.is_persisted());
    let audio = store.get(report.asset.as_deref().unwrap()).unwrap();
    let spoken = String::from_utf8_lossy(&audio);
    assert!(spoken.contains("Chapter one text"));
    assert!(spoken.contains("Chapter two text"));

    let doc = catalog.fetch(id).await.unwrap();
    assert!(doc.has_audio);
    assert_eq!(doc.narrator.as_deref(), Some("synthesized (en)"));
}

#[tokio::test]
async fn test_page_range_limits_synthesized_text() {
    let (catalog, id, _dir) = seeded_catalog(&["alpha page", "beta page", "gamma page"]);
    let store = Arc::new(MemoryAssetStore::new());
    let engine = Arc::new(StubTtsEngine::speaking());
    let pipeline = AudiobookPipeline::new(catalog, engine.clone(), store);

    let params = VoiceParameters {
        page_range: Some((2, 2)),
        ..VoiceParameters::default()
    };
    pipeline.generate_audiobook(id, &params).await.unwrap();

    let sent = &engine.calls()[0].text;
    assert!(sent.contains("beta page"));
    assert!(!sent.contains("alpha page"));
    assert!(!sent.contains("gamma page"));
}

#[tokio::test]
async fn test_extract_range_reports_whole_document_page_count() {
    let (catalog, id, _dir) = seeded_catalog(&["one", "two", "three", "four"]);
    let pipeline = AudiobookPipeline::new(
        catalog,
        Arc::new(StubTtsEngine::speaking()),
        Arc::new(MemoryAssetStore::new()),
    );

    let report = pipeline
        .extract_text(id, Some(PageRange::new(2, 3)))
        .await
        .unwrap();
    assert_eq!(report.result.page_count, 4);
    assert_eq!(report.result.pages.len(), 2);
}

#[tokio::test]
async fn test_preview_extraction_caps_at_ten_pages() {
    let page_texts: Vec<String> = (1..=12).map(|n| format!("page {} body", n)).collect();
    let pages: Vec<&str> = page_texts.iter().map(String::as_str).collect();
    let (catalog, id, _dir) = seeded_catalog(&pages);
    let pipeline = AudiobookPipeline::new(
        catalog,
        Arc::new(StubTtsEngine::speaking()),
        Arc::new(MemoryAssetStore::new()),
    );

    let report = pipeline.extract_text_preview(id).await.unwrap();
    assert_eq!(report.result.page_count, 12);
    assert_eq!(report.result.pages.len(), 10);
    assert!(report.result.text.contains("page 10 body"));
    assert!(!report.result.text.contains("page 11 body"));
}

#[tokio::test]
async fn test_streaming_synthesis_preserves_chunk_order() {
    let long_page = (0..40)
        .map(|i| format!("word{}", i))
        .collect::<Vec<_>>()
        .join(" ");
    let (catalog, id, _dir) = seeded_catalog(&[long_page.as_str()]);
    let pipeline = AudiobookPipeline::new(
        catalog,
        Arc::new(StubTtsEngine::speaking()),
        Arc::new(MemoryAssetStore::new()),
    )
    .with_max_chunk_chars(40);

    let result = pipeline
        .synthesize(id, &VoiceParameters::default(), true)
        .await
        .unwrap();

    let SynthesisResult::Streamed { chunks, .. } = result else {
        panic!("expected streamed result");
    };
    assert!(chunks.len() > 3);
    for (i, outcome) in chunks.iter().enumerate() {
        assert_eq!(outcome.index(), i);
        assert!(matches!(outcome, ChunkOutcome::Synthesized { .. }));
    }
}

#[tokio::test]
async fn test_stream_text_stats_match_document() {
    let (catalog, id, _dir) = seeded_catalog(&["one two three", "four five six"]);
    let pipeline = AudiobookPipeline::new(
        catalog,
        Arc::new(StubTtsEngine::speaking()),
        Arc::new(MemoryAssetStore::new()),
    );

    let streamed = pipeline
        .stream_text(id, &VoiceParameters::default())
        .await
        .unwrap();
    assert_eq!(streamed.stats.total_words, 6);
    assert_eq!(streamed.stats.total_chunks, streamed.chunks.len());
    assert!(streamed.stats.estimated_total_duration_minutes > 0.0);
}

#[tokio::test]
async fn test_accessibility_settings_drive_synthesis() {
    let (catalog, id, _dir) = seeded_catalog(&["noch ein text"]);
    let engine = Arc::new(StubTtsEngine::speaking());
    let pipeline =
        AudiobookPipeline::new(catalog, engine.clone(), Arc::new(MemoryAssetStore::new()));

    let sanitized = pipeline
        .validate_accessibility(&serde_json::json!({
            "voice_speed": 0.6,
            "voice_language": "de",
            "auto_read": true,
        }))
        .unwrap();

    // Sanitized settings feed straight into voice parameters.
    let params = VoiceParameters {
        language: sanitized.config.voice_language.clone().unwrap(),
        speed: sanitized.config.voice_speed.unwrap() as f32,
        ..VoiceParameters::default()
    };
    pipeline.generate_audiobook(id, &params).await.unwrap();

    let voice = &engine.calls()[0].voice;
    assert_eq!(voice.language, "de");
    assert!((voice.speed - 0.6).abs() < 1e-6);
    assert!(voice.slow, "speed below the slow threshold selects slow mode");
}
