use std::time::Duration;

use staffchat::group::Kind;
use staffchat::message::model::MessageDto;
use staffchat::sync::session::PollSession;

mod common;

use common::{app, group_request, individual_request, TestApp};

async fn poll(app: &TestApp) -> staffchat::message::Result<Vec<MessageDto>> {
    app.sync.messages(&app.general, &app.bob.id).await
}

#[tokio::test]
async fn group_list_pins_general_and_sorts_by_activity() {
    let app = app().await;

    let kitchen = app
        .groups
        .create(&app.alice, group_request("Kitchen Staff", vec![app.bob.id]))
        .await
        .unwrap();
    let direct = app
        .groups
        .create(&app.alice, individual_request(app.bob.id))
        .await
        .unwrap();

    app.messages
        .create(&kitchen.id, &app.alice.id, Some("prep list".into()), None)
        .await
        .unwrap();

    let list = app.sync.group_list(&app.alice.id).await.unwrap();
    assert_eq!(list[0].kind, Kind::General);
    assert_eq!(list[1].id, kitchen.id);
    assert_eq!(list[2].id, direct.id);

    let preview = list[1].last_message.as_ref().unwrap();
    assert_eq!(preview.snippet.as_deref(), Some("prep list"));
}

#[tokio::test]
async fn polling_reads_are_idempotent() {
    let app = app().await;

    app.messages
        .create(&app.general, &app.alice.id, Some("shift starts at 9".into()), None)
        .await
        .unwrap();

    let first = poll(&app).await.unwrap();
    let second = poll(&app).await.unwrap();

    assert_eq!(first.len(), second.len());
    let order: Vec<_> = first.iter().map(|m| (m.id, m.seq)).collect();
    let reorder: Vec<_> = second.iter().map(|m| (m.id, m.seq)).collect();
    assert_eq!(order, reorder);
}

#[tokio::test(start_paused = true)]
async fn poll_session_delivers_snapshots_until_stopped() {
    let app = app().await;

    app.messages
        .create(&app.general, &app.alice.id, Some("first".into()), None)
        .await
        .unwrap();

    let (session, mut updates) = PollSession::open(
        app.sync.clone(),
        app.general,
        app.bob.id,
        Duration::from_secs(3),
    );

    let first = updates.recv().await.expect("first snapshot");
    assert_eq!(first.len(), 1);

    app.messages
        .create(&app.general, &app.alice.id, Some("second".into()), None)
        .await
        .unwrap();

    let second = updates.recv().await.expect("second snapshot");
    assert_eq!(second.len(), 2);

    session.stop();
    assert!(updates.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn poll_session_ends_when_the_group_disappears() {
    let app = app().await;

    let kitchen = app
        .groups
        .create(&app.alice, group_request("Kitchen Staff", vec![app.bob.id]))
        .await
        .unwrap();

    let (_session, mut updates) = PollSession::open(
        app.sync.clone(),
        kitchen.id,
        app.alice.id,
        Duration::from_secs(3),
    );

    assert!(updates.recv().await.is_some());

    app.groups.delete(&kitchen.id, &app.owner).await.unwrap();

    // The next poll hits NotFound and the session terminates instead of
    // retrying.
    while updates.recv().await.is_some() {}
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_cancels_the_session() {
    let app = app().await;

    let (session, mut updates) = PollSession::open(
        app.sync.clone(),
        app.general,
        app.alice.id,
        Duration::from_secs(3),
    );

    assert!(updates.recv().await.is_some());

    drop(session);
    assert!(updates.recv().await.is_none());
}
