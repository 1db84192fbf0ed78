use rusqlite::{params, Connection};
use stackit_core::db::open_db_in_memory;
use stackit_core::{
    Notification, NotificationKind, NotificationService, NotificationServiceError,
    SqliteNotificationRepository, SqliteUserRepository, User, UserRepository, VoteTarget,
};
use uuid::Uuid;

fn seeded_user(conn: &Connection, name: &str) -> User {
    let user = User::new(name, format!("{name}@example.com"));
    SqliteUserRepository::new(conn).create_user(&user).unwrap();
    user
}

fn recorded(
    service: &NotificationService<SqliteNotificationRepository<'_>>,
    recipient: &User,
    message: &str,
) -> Notification {
    let notification = Notification::new(NotificationKind::NewAnswer, message, recipient.id);
    service.record(&notification).unwrap();
    notification
}

#[test]
fn read_transitions_drive_unread_count() {
    let conn = open_db_in_memory().unwrap();
    let recipient = seeded_user(&conn, "demo_user");
    let service = NotificationService::new(SqliteNotificationRepository::new(&conn));

    let first = recorded(&service, &recipient, "first notification");
    recorded(&service, &recipient, "second notification");
    assert_eq!(service.unread_count(recipient.id).unwrap(), 2);

    service.mark_read(first.id).unwrap();
    assert_eq!(service.unread_count(recipient.id).unwrap(), 1);

    let changed = service.mark_all_read(recipient.id).unwrap();
    assert_eq!(changed, 1);
    assert_eq!(service.unread_count(recipient.id).unwrap(), 0);

    // Idempotent: a second sweep changes nothing.
    assert_eq!(service.mark_all_read(recipient.id).unwrap(), 0);
    assert_eq!(service.unread_count(recipient.id).unwrap(), 0);
}

#[test]
fn mark_read_missing_id_fails() {
    let conn = open_db_in_memory().unwrap();
    seeded_user(&conn, "demo_user");
    let service = NotificationService::new(SqliteNotificationRepository::new(&conn));

    let missing = Uuid::new_v4();
    let err = service.mark_read(missing).unwrap_err();
    match err {
        NotificationServiceError::NotificationNotFound(id) => assert_eq!(id, missing),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn mark_read_is_noop_when_already_read() {
    let conn = open_db_in_memory().unwrap();
    let recipient = seeded_user(&conn, "demo_user");
    let service = NotificationService::new(SqliteNotificationRepository::new(&conn));

    let notification = recorded(&service, &recipient, "read me twice");
    service.mark_read(notification.id).unwrap();
    service.mark_read(notification.id).unwrap();

    let feed = service.list_for_recipient(recipient.id).unwrap();
    assert_eq!(feed.len(), 1);
    assert!(feed[0].read);
    assert_eq!(service.unread_count(recipient.id).unwrap(), 0);
}

#[test]
fn listing_is_most_recent_first_with_seq_tiebreak() {
    let conn = open_db_in_memory().unwrap();
    let recipient = seeded_user(&conn, "demo_user");
    let service = NotificationService::new(SqliteNotificationRepository::new(&conn));

    let oldest = recorded(&service, &recipient, "oldest");
    let tied_early = recorded(&service, &recipient, "tied, inserted first");
    let tied_late = recorded(&service, &recipient, "tied, inserted second");

    conn.execute(
        "UPDATE notifications SET created_at = 1000 WHERE uuid = ?1;",
        params![oldest.id.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE notifications SET created_at = 2000 WHERE uuid IN (?1, ?2);",
        params![tied_early.id.to_string(), tied_late.id.to_string()],
    )
    .unwrap();

    let feed = service.list_for_recipient(recipient.id).unwrap();
    assert_eq!(feed.len(), 3);
    assert_eq!(feed[0].id, tied_late.id);
    assert_eq!(feed[1].id, tied_early.id);
    assert_eq!(feed[2].id, oldest.id);
    assert!(feed[0].seq > feed[1].seq);
}

#[test]
fn unknown_recipient_yields_empty_feed() {
    let conn = open_db_in_memory().unwrap();
    let service = NotificationService::new(SqliteNotificationRepository::new(&conn));

    let stranger = Uuid::new_v4();
    assert!(service.list_for_recipient(stranger).unwrap().is_empty());
    assert_eq!(service.unread_count(stranger).unwrap(), 0);
    assert_eq!(service.mark_all_read(stranger).unwrap(), 0);
}

#[test]
fn vote_received_message_names_the_item_kind() {
    let conn = open_db_in_memory().unwrap();
    let recipient = seeded_user(&conn, "author");
    let voter = seeded_user(&conn, "voter");
    let service = NotificationService::new(SqliteNotificationRepository::new(&conn));

    let for_answer =
        Notification::vote_received(VoteTarget::Answer(Uuid::new_v4()), voter.id, recipient.id);
    assert_eq!(for_answer.message, "Your answer received an upvote");
    assert_eq!(for_answer.kind, NotificationKind::VoteReceived);
    service.record(&for_answer).unwrap();

    let for_question =
        Notification::vote_received(VoteTarget::Question(Uuid::new_v4()), voter.id, recipient.id);
    assert_eq!(for_question.message, "Your question received an upvote");
    service.record(&for_question).unwrap();

    let feed = service.list_for_recipient(recipient.id).unwrap();
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].triggered_by, Some(voter.id));
}

#[test]
fn record_returns_increasing_sequence() {
    let conn = open_db_in_memory().unwrap();
    let recipient = seeded_user(&conn, "demo_user");
    let service = NotificationService::new(SqliteNotificationRepository::new(&conn));

    let first_seq = service
        .record(&Notification::new(
            NotificationKind::QuestionAnswered,
            "first",
            recipient.id,
        ))
        .unwrap();
    let second_seq = service
        .record(&Notification::new(
            NotificationKind::QuestionAnswered,
            "second",
            recipient.id,
        ))
        .unwrap();

    assert!(second_seq > first_seq);
}
