//! Reply-stream decoding integration tests

use echomind_core::{Error, Persona, ReplySnapshot, StreamDecoder, decode_stream};
use futures::StreamExt;

mod common;

/// Run a fragment sequence through the lazy adapter and collect snapshots
async fn decode_all(fragments: Vec<&str>) -> Vec<ReplySnapshot> {
    let input = futures::stream::iter(fragments.into_iter().map(|f| Ok(f.to_string())));
    decode_stream(input)
        .map(|snapshot| snapshot.expect("no transport errors in this sequence"))
        .collect()
        .await
}

#[tokio::test]
async fn tagged_reply_resolves_persona_from_first_snapshot_on() {
    common::init_tracing();

    let snapshots = decode_all(vec![
        "[PERSONA: The Stoic]\n",
        "Breathe. ",
        "Focus on what you control.",
    ])
    .await;

    assert_eq!(snapshots.len(), 3);
    for snapshot in &snapshots {
        assert_eq!(snapshot.persona, Some(Persona::Stoic));
        assert!(!snapshot.transcript.contains("[PERSONA:"));
    }
    assert_eq!(
        snapshots.last().unwrap().transcript,
        "Breathe. Focus on what you control."
    );
}

#[tokio::test]
async fn untagged_reply_stays_personaless() {
    common::init_tracing();

    let snapshots = decode_all(vec!["I hear you. ", "That sounds hard."]).await;

    assert_eq!(snapshots.len(), 2);
    for snapshot in &snapshots {
        assert_eq!(snapshot.persona, None);
    }
    assert_eq!(
        snapshots.last().unwrap().transcript,
        "I hear you. That sounds hard."
    );
}

#[tokio::test]
async fn tag_like_text_in_later_fragments_is_not_scanned() {
    common::init_tracing();

    let snapshots = decode_all(vec![
        "Plain opening. ",
        "[PERSONA: The Optimist] is just text here.",
    ])
    .await;

    assert_eq!(snapshots.last().unwrap().persona, None);
    assert_eq!(
        snapshots.last().unwrap().transcript,
        "Plain opening. [PERSONA: The Optimist] is just text here."
    );
}

#[tokio::test]
async fn final_transcript_is_input_minus_at_most_one_leading_tag() {
    common::init_tracing();

    let fragments = vec!["[PERSONA: The Future Self]\nYou", " have been", " here before."];
    let concatenated: String = fragments.concat();
    let snapshots = decode_all(fragments).await;

    let expected = concatenated.replace("[PERSONA: The Future Self]\n", "");
    assert_eq!(snapshots.last().unwrap().transcript, expected);
}

#[tokio::test]
async fn unknown_persona_tag_is_stripped_without_resolving() {
    common::init_tracing();

    let snapshots = decode_all(vec!["[PERSONA: The Cynic]\nWhatever."]).await;

    assert_eq!(snapshots.last().unwrap().persona, None);
    assert_eq!(snapshots.last().unwrap().transcript, "Whatever.");
}

#[tokio::test]
async fn snapshots_form_increasing_prefix_sequence() {
    common::init_tracing();

    let snapshots = decode_all(vec!["a", "b", "c", "d"]).await;

    for pair in snapshots.windows(2) {
        assert!(pair[1].transcript.starts_with(&pair[0].transcript));
        assert!(pair[1].transcript.len() > pair[0].transcript.len());
    }
}

#[tokio::test]
async fn transport_errors_pass_through_after_valid_snapshots() {
    common::init_tracing();

    let input = futures::stream::iter(vec![
        Ok("[PERSONA: The Stoic]\nPartial ".to_string()),
        Err(Error::Stream("connection reset".to_string())),
    ]);
    let results: Vec<_> = decode_stream(input).collect().await;

    assert_eq!(results.len(), 2);
    let first = results[0].as_ref().unwrap();
    assert_eq!(first.persona, Some(Persona::Stoic));
    assert_eq!(first.transcript, "Partial ");
    assert!(matches!(results[1], Err(Error::Stream(_))));
}

#[test]
fn push_decoder_and_stream_adapter_agree() {
    let fragments = ["[PERSONA: The Curious Child]\nWhy ", "not?"];

    let mut decoder = StreamDecoder::new();
    let mut last = None;
    for fragment in fragments {
        last = Some(decoder.push(fragment));
    }

    let adapter_last = tokio_test::block_on(async {
        decode_all(fragments.to_vec()).await.pop().unwrap()
    });

    assert_eq!(last.unwrap(), adapter_last);
}
