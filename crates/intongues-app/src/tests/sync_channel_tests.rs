use std::time::Duration;

use intongues_types::{AppEvent, ReviewQuality, VocabStatus};
use tokio::time::timeout;

use crate::io::parse_command;

#[tokio::test]
async fn test_tokio_spawn_from_sync_context() {
    let (tx, rx) = kanal::unbounded_async::<AppEvent>();

    let sync_callback = move || {
        tracing::debug!("Sync callback: spawning tokio task");
        let tx = tx.clone();
        tokio::spawn(async move {
            tx.send(AppEvent::HighlightText("hola mundo".to_string()))
                .await
                .expect("send failed");
        });
        tracing::debug!("Sync callback: returned immediately");
    };

    sync_callback();

    let result = timeout(Duration::from_secs(2), rx.recv()).await;

    match result {
        Ok(Ok(AppEvent::HighlightText(text))) => assert_eq!(text, "hola mundo"),
        Ok(Ok(_)) => panic!("Wrong event type"),
        Ok(Err(e)) => panic!("Channel error: {}", e),
        Err(_) => panic!("Timeout - tokio::spawn from sync context failed!"),
    }
}

#[tokio::test]
async fn test_parsed_input_reaches_receiver_in_order() {
    let (tx, rx) = kanal::bounded_async::<AppEvent>(4);

    let producer = tokio::spawn(async move {
        for line in ["r", "", "3", "s familiar", "q"] {
            if let Ok(Some(event)) = parse_command(line) {
                tx.send(event).await.expect("send failed");
            }
        }
    });

    let mut received = Vec::new();
    let result = timeout(Duration::from_secs(2), async {
        loop {
            let event = rx.recv().await.expect("recv failed");
            let done = matches!(event, AppEvent::Shutdown);
            received.push(event);
            if done {
                break;
            }
        }
    })
    .await;

    assert!(result.is_ok(), "Timeout waiting for events!");
    producer.await.unwrap();

    assert_eq!(received.len(), 4);
    assert!(matches!(received[0], AppEvent::Reveal));
    assert!(matches!(received[1], AppEvent::Answer(ReviewQuality::Good)));
    assert!(matches!(
        received[2],
        AppEvent::CorrectStatus(VocabStatus::Familiar)
    ));
}

#[tokio::test]
async fn test_multiple_spawned_sends() {
    let (tx, rx) = kanal::bounded_async::<AppEvent>(8);

    for i in 0..100 {
        let tx = tx.clone();
        tokio::spawn(async move {
            tx.send(AppEvent::HighlightText(format!("palabra{}", i)))
                .await
                .expect("send failed");
        });
    }

    let mut count = 0;
    let result = timeout(Duration::from_secs(2), async {
        while count < 100 {
            rx.recv().await.expect("recv failed");
            count += 1;
        }
    })
    .await;

    assert!(result.is_ok(), "Timeout waiting for events!");
    assert_eq!(count, 100);
}
