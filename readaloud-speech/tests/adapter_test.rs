//! Adapter tests: merged and streamed modes, language fallback, slow
//! mode, truncation, fault isolation.

use readaloud_speech::{
    chunk_text, ChunkOutcome, SpeechAdapter, SpeechError, SpeechLimits, StreamStats, StubTtsEngine,
    SynthesisResult, VoiceParameters,
};
use std::sync::Arc;

fn adapter_with(engine: Arc<StubTtsEngine>) -> SpeechAdapter {
    SpeechAdapter::new(engine, SpeechLimits::default())
}

#[tokio::test]
async fn test_merged_synthesis_joins_chunks() {
    let engine = Arc::new(StubTtsEngine::speaking());
    let adapter = adapter_with(engine.clone());
    let chunks = chunk_text("hello there world", 7);
    assert!(chunks.len() > 1);

    let result = adapter
        .synthesize(&chunks, &VoiceParameters::default(), false)
        .await
        .unwrap();

    match result {
        SynthesisResult::Merged(clip) => {
            assert_eq!(clip.audio.as_ref(), b"audio(hello there world)");
            assert_eq!(clip.language, "en");
            assert!(!clip.truncated);
        }
        other => panic!("expected merged result, got {:?}", other),
    }
    // One engine call regardless of chunk count.
    assert_eq!(engine.calls().len(), 1);
}

#[tokio::test]
async fn test_merged_truncates_at_max_chars() {
    let engine = Arc::new(StubTtsEngine::speaking());
    let adapter = adapter_with(engine.clone());
    let chunks = chunk_text(&"word ".repeat(100), 1000);
    let params = VoiceParameters {
        max_chars: 20,
        ..VoiceParameters::default()
    };

    let result = adapter.synthesize(&chunks, &params, false).await.unwrap();
    let SynthesisResult::Merged(clip) = result else {
        panic!("expected merged result");
    };
    assert!(clip.truncated);

    let sent = &engine.calls()[0].text;
    assert!(sent.ends_with("..."));
    // 20 chars of text plus the 3-char marker.
    assert_eq!(sent.chars().count(), 23);
}

#[tokio::test]
async fn test_merged_empty_text_is_an_error() {
    let adapter = adapter_with(Arc::new(StubTtsEngine::speaking()));
    let err = adapter
        .synthesize(&[], &VoiceParameters::default(), false)
        .await
        .unwrap_err();
    assert!(matches!(err, SpeechError::Synthesis { .. }));
}

#[tokio::test]
async fn test_merged_engine_failure_carries_context() {
    let adapter = adapter_with(Arc::new(StubTtsEngine::failing("backend down")));
    let chunks = chunk_text("some text", 1000);
    let params = VoiceParameters {
        language: "fr".to_string(),
        speed: 1.5,
        ..VoiceParameters::default()
    };

    let err = adapter.synthesize(&chunks, &params, false).await.unwrap_err();
    match err {
        SpeechError::Synthesis {
            language,
            speed,
            text_len,
            reason,
        } => {
            assert_eq!(language, "fr");
            assert_eq!(speed, 1.5);
            assert_eq!(text_len, "some text".len());
            assert!(reason.contains("backend down"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_unavailable_engine_fails_before_any_call() {
    let engine = Arc::new(StubTtsEngine::unavailable());
    let adapter = adapter_with(engine.clone());
    let chunks = chunk_text("text", 1000);

    let err = adapter
        .synthesize(&chunks, &VoiceParameters::default(), false)
        .await
        .unwrap_err();
    assert!(matches!(err, SpeechError::EngineUnavailable(_)));
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn test_unsupported_language_falls_back_to_default() {
    let engine = Arc::new(StubTtsEngine::speaking());
    let adapter = adapter_with(engine.clone());
    let chunks = chunk_text("bonjour", 1000);
    let params = VoiceParameters {
        language: "xx".to_string(),
        ..VoiceParameters::default()
    };

    let result = adapter.synthesize(&chunks, &params, false).await.unwrap();
    assert_eq!(result.language(), "en");
    assert_eq!(engine.calls()[0].voice.language, "en");
}

#[tokio::test]
async fn test_speed_is_clamped_and_slow_mode_set() {
    let engine = Arc::new(StubTtsEngine::speaking());
    let adapter = adapter_with(engine.clone());
    let chunks = chunk_text("text", 1000);

    let params = VoiceParameters {
        speed: 0.1,
        ..VoiceParameters::default()
    };
    adapter.synthesize(&chunks, &params, false).await.unwrap();
    let voice = &engine.calls()[0].voice;
    assert_eq!(voice.speed, 0.5);
    assert!(voice.slow, "speed below 0.8 should select slow mode");

    let params = VoiceParameters {
        speed: 9.0,
        ..VoiceParameters::default()
    };
    adapter.synthesize(&chunks, &params, false).await.unwrap();
    let voice = &engine.calls()[1].voice;
    assert_eq!(voice.speed, 2.0);
    assert!(!voice.slow);
}

#[tokio::test]
async fn test_streamed_outcomes_are_in_chunk_order() {
    let engine = Arc::new(StubTtsEngine::speaking());
    let adapter = adapter_with(engine.clone());
    let chunks = chunk_text("aa bb cc dd ee ff", 2);
    assert_eq!(chunks.len(), 6);

    let result = adapter
        .synthesize(&chunks, &VoiceParameters::default(), true)
        .await
        .unwrap();
    let SynthesisResult::Streamed { chunks: outcomes, .. } = result else {
        panic!("expected streamed result");
    };

    assert_eq!(outcomes.len(), 6);
    for (i, outcome) in outcomes.iter().enumerate() {
        match outcome {
            ChunkOutcome::Synthesized { index, audio } => {
                assert_eq!(*index, i);
                assert!(!audio.is_empty());
            }
            other => panic!("unexpected failure: {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_streamed_chunk_failure_does_not_abort_siblings() {
    let engine = Arc::new(StubTtsEngine::failing_on("bb"));
    let adapter = adapter_with(engine.clone());
    let chunks = chunk_text("aa bb cc", 2);

    let result = adapter
        .synthesize(&chunks, &VoiceParameters::default(), true)
        .await
        .unwrap();
    let SynthesisResult::Streamed { chunks: outcomes, .. } = result else {
        panic!("expected streamed result");
    };

    assert_eq!(outcomes.len(), 3);
    assert!(matches!(outcomes[0], ChunkOutcome::Synthesized { index: 0, .. }));
    assert!(matches!(outcomes[1], ChunkOutcome::Failed { index: 1, .. }));
    assert!(matches!(outcomes[2], ChunkOutcome::Synthesized { index: 2, .. }));
    // All three chunks were attempted.
    assert_eq!(engine.calls().len(), 3);
}

#[tokio::test]
async fn test_streamed_all_failures_still_returns_ok() {
    let adapter = adapter_with(Arc::new(StubTtsEngine::failing("down")));
    let chunks = chunk_text("aa bb", 2);

    let result = adapter
        .synthesize(&chunks, &VoiceParameters::default(), true)
        .await
        .unwrap();
    let SynthesisResult::Streamed { chunks: outcomes, .. } = result else {
        panic!("expected streamed result");
    };
    assert!(outcomes.iter().all(|o| o.is_failed()));
}

#[tokio::test]
async fn test_invalid_params_rejected_before_engine() {
    let engine = Arc::new(StubTtsEngine::speaking());
    let adapter = adapter_with(engine.clone());
    let params = VoiceParameters {
        max_chars: 0,
        ..VoiceParameters::default()
    };

    let err = adapter
        .synthesize(&chunk_text("text", 1000), &params, false)
        .await
        .unwrap_err();
    assert!(matches!(err, SpeechError::Config(_)));
    assert!(engine.calls().is_empty());
}

#[test]
fn test_stream_stats_aggregate_chunks() {
    let chunks = chunk_text(&vec!["word"; 300].join(" "), 1000);
    let stats = StreamStats::for_chunks(&chunks);
    assert_eq!(stats.total_chunks, chunks.len());
    assert_eq!(stats.total_words, 300);
    assert!((stats.estimated_total_duration_minutes - 2.0).abs() < 1e-9);
}
