// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rebinding and failure behavior of the media pipeline with gated resolvers.

use std::sync::Arc;
use std::time::Duration;

use postern_config::model::MediaConfig;
use postern_core::{MessageId, PartId, Slide, SlideDeck, Thumbnail};
use postern_media::{MediaPipeline, MediaView};
use postern_test_utils::{GatedSlideDeckResolver, GatedThumbnailResolver, MessageBuilder};

fn image(part: i64) -> Slide {
    Slide {
        part_id: PartId(part),
        content_type: "image/png".to_string(),
        uri: format!("content://parts/{part}"),
    }
}

fn audio(part: i64) -> Slide {
    Slide {
        part_id: PartId(part),
        content_type: "audio/ogg".to_string(),
        uri: format!("content://parts/{part}"),
    }
}

fn thumbnail(width: u32) -> Thumbnail {
    Thumbnail {
        bytes: vec![0; 4],
        width,
        height: width,
        animate: false,
    }
}

fn pipeline(
    decks: &GatedSlideDeckResolver,
    thumbnails: &GatedThumbnailResolver,
    config: MediaConfig,
) -> MediaPipeline {
    MediaPipeline::new(Arc::new(decks.clone()), Arc::new(thumbnails.clone()), config)
}

/// Apply events until the pipeline reaches a settled view.
async fn settle(pipeline: &mut MediaPipeline) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while pipeline.view() == &MediaView::Loading {
            pipeline.process_next().await;
        }
    })
    .await
    .expect("pipeline did not settle");
}

#[tokio::test]
async fn resolves_deck_then_thumbnail() {
    let decks = GatedSlideDeckResolver::ready([(
        MessageId(1),
        SlideDeck {
            slides: vec![audio(9), image(10)],
        },
    )]);
    let thumbnails = GatedThumbnailResolver::ready([(PartId(10), thumbnail(64))]);
    let mut pipeline = pipeline(&decks, &thumbnails, MediaConfig::default());

    pipeline.bind(&MessageBuilder::incoming_media(1, 2).build());
    settle(&mut pipeline).await;

    assert_eq!(pipeline.shown_slide(), Some(&image(10)));
    assert_eq!(thumbnails.request_count(PartId(9)), 0);
}

#[tokio::test]
async fn late_thumbnail_from_previous_binding_is_never_shown() {
    let decks = GatedSlideDeckResolver::ready([
        (MessageId(1), SlideDeck { slides: vec![image(10)] }),
        (MessageId(2), SlideDeck { slides: vec![image(20)] }),
    ]);
    let thumbnails = GatedThumbnailResolver::new();
    let mut pipeline = pipeline(&decks, &thumbnails, MediaConfig::default());

    // A reaches its thumbnail stage and parks there.
    pipeline.bind(&MessageBuilder::incoming_media(1, 1).build());
    assert!(pipeline.process_next().await);
    thumbnails.wait_for_request(PartId(10)).await;
    assert_eq!(pipeline.view(), &MediaView::Loading);

    // Rebind to B, which also parks at its thumbnail stage.
    pipeline.bind(&MessageBuilder::incoming_media(2, 1).build());
    assert_eq!(pipeline.bound_message(), Some(MessageId(2)));
    assert!(pipeline.process_next().await);
    thumbnails.wait_for_request(PartId(20)).await;

    // A completes first: nothing visible changes.
    thumbnails.release(PartId(10), Ok(thumbnail(10)));
    tokio::task::yield_now().await;
    assert_eq!(pipeline.view(), &MediaView::Loading);

    // B completes and is applied.
    thumbnails.release(PartId(20), Ok(thumbnail(20)));
    settle(&mut pipeline).await;

    match pipeline.view() {
        MediaView::Shown { slide, thumbnail } => {
            assert_eq!(slide, &image(20));
            assert_eq!(thumbnail.width, 20);
        }
        other => panic!("expected B's thumbnail, got {other:?}"),
    }
}

#[tokio::test]
async fn late_deck_from_previous_binding_is_ignored() {
    let decks = GatedSlideDeckResolver::new();
    let thumbnails = GatedThumbnailResolver::ready([(PartId(20), thumbnail(20))]);
    let mut pipeline = pipeline(&decks, &thumbnails, MediaConfig::default());

    pipeline.bind(&MessageBuilder::incoming_media(1, 1).build());
    decks.wait_for_request(MessageId(1)).await;
    pipeline.bind(&MessageBuilder::incoming_media(2, 1).build());

    decks.release(MessageId(1), Ok(SlideDeck { slides: vec![image(10)] }));
    decks.release(MessageId(2), Ok(SlideDeck { slides: vec![image(20)] }));
    settle(&mut pipeline).await;

    assert_eq!(pipeline.shown_slide(), Some(&image(20)));
    assert_eq!(thumbnails.request_count(PartId(10)), 0);
}

#[tokio::test]
async fn deck_failure_degrades_to_hidden() {
    let decks = GatedSlideDeckResolver::new();
    decks.release(MessageId(1), Err("part store unreadable".to_string()));
    let thumbnails = GatedThumbnailResolver::new();
    let mut pipeline = pipeline(&decks, &thumbnails, MediaConfig::default());

    pipeline.bind(&MessageBuilder::incoming_media(1, 1).build());
    settle(&mut pipeline).await;

    assert_eq!(pipeline.view(), &MediaView::Hidden);
    assert!(!pipeline.is_resolving());
}

#[tokio::test]
async fn thumbnail_failure_degrades_to_hidden() {
    let decks = GatedSlideDeckResolver::ready([(MessageId(1), SlideDeck { slides: vec![image(10)] })]);
    let thumbnails = GatedThumbnailResolver::new();
    thumbnails.release(PartId(10), Err("decode failed".to_string()));
    let mut pipeline = pipeline(&decks, &thumbnails, MediaConfig::default());

    pipeline.bind(&MessageBuilder::incoming_media(1, 1).build());
    settle(&mut pipeline).await;

    assert_eq!(pipeline.view(), &MediaView::Hidden);
}

#[tokio::test]
async fn deck_without_thumbnail_slide_is_hidden() {
    let decks = GatedSlideDeckResolver::ready([(MessageId(1), SlideDeck { slides: vec![audio(9)] })]);
    let thumbnails = GatedThumbnailResolver::new();
    let mut pipeline = pipeline(&decks, &thumbnails, MediaConfig::default());

    pipeline.bind(&MessageBuilder::incoming_media(1, 1).build());
    settle(&mut pipeline).await;

    assert_eq!(pipeline.view(), &MediaView::Hidden);
}

#[tokio::test]
async fn disabled_thumbnails_never_start_thumbnail_stage() {
    let decks = GatedSlideDeckResolver::ready([(MessageId(1), SlideDeck { slides: vec![image(10)] })]);
    let thumbnails = GatedThumbnailResolver::new();
    let config = MediaConfig {
        thumbnails: false,
        ..MediaConfig::default()
    };
    let mut pipeline = pipeline(&decks, &thumbnails, config);

    pipeline.bind(&MessageBuilder::incoming_media(1, 1).build());
    settle(&mut pipeline).await;

    assert_eq!(pipeline.view(), &MediaView::Hidden);
    assert_eq!(thumbnails.request_count(PartId(10)), 0);
}
