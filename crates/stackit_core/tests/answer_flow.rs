use rusqlite::{params, Connection};
use stackit_core::db::open_db_in_memory;
use stackit_core::{
    AnswerService, AnswerServiceError, AskQuestionRequest, Notification, NotificationService,
    PostAnswerRequest, QuestionRecord, QuestionService, SqliteAnswerRepository,
    SqliteNotificationRepository, SqliteQuestionRepository, SqliteUserRepository, User,
    UserRepository,
};
use uuid::Uuid;

fn seeded_user(conn: &Connection, name: &str) -> User {
    let user = User::new(name, format!("{name}@example.com"));
    SqliteUserRepository::new(conn).create_user(&user).unwrap();
    user
}

fn seeded_question(conn: &mut Connection, author: &User, title: &str) -> QuestionRecord {
    let repo = SqliteQuestionRepository::new(conn);
    let mut service = QuestionService::new(repo);
    service
        .ask_question(&AskQuestionRequest {
            title: title.to_string(),
            body: format!("<p>{title}</p>"),
            tags: Vec::new(),
            author_id: author.id,
        })
        .unwrap()
}

#[test]
fn post_answer_bumps_parent_counters() {
    let mut conn = open_db_in_memory().unwrap();
    let asker = seeded_user(&conn, "asker");
    let expert = seeded_user(&conn, "expert");
    let question = seeded_question(&mut conn, &asker, "counting question");

    let posted = {
        let repo = SqliteAnswerRepository::new(&mut conn);
        let mut answers = AnswerService::new(repo);
        answers
            .post_answer(&PostAnswerRequest {
                question_id: question.id,
                body: "<p>Use a context.</p>".to_string(),
                author_id: expert.id,
            })
            .unwrap()
    };
    assert_eq!(posted.question_id, question.id);
    assert_eq!(posted.vote_count, 0);

    let repo = SqliteQuestionRepository::new(&mut conn);
    let questions = QuestionService::new(repo);
    let reloaded = questions.get_question(question.id).unwrap().unwrap();
    assert_eq!(reloaded.answer_count, 1);
    assert!(reloaded.updated_at >= question.updated_at);
}

#[test]
fn post_answer_to_missing_question_fails() {
    let mut conn = open_db_in_memory().unwrap();
    let expert = seeded_user(&conn, "expert");

    let missing = Uuid::new_v4();
    let repo = SqliteAnswerRepository::new(&mut conn);
    let mut answers = AnswerService::new(repo);

    let err = answers
        .post_answer(&PostAnswerRequest {
            question_id: missing,
            body: "<p>orphan</p>".to_string(),
            author_id: expert.id,
        })
        .unwrap_err();
    match err {
        AnswerServiceError::QuestionNotFound(id) => assert_eq!(id, missing),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn answers_listed_by_score_with_stable_tiebreak() {
    let mut conn = open_db_in_memory().unwrap();
    let asker = seeded_user(&conn, "asker");
    let expert = seeded_user(&conn, "expert");
    let question = seeded_question(&mut conn, &asker, "ordering question");

    let (low_id, high_id) = {
        let repo = SqliteAnswerRepository::new(&mut conn);
        let mut answers = AnswerService::new(repo);
        let low = answers
            .post_answer(&PostAnswerRequest {
                question_id: question.id,
                body: "<p>first answer</p>".to_string(),
                author_id: expert.id,
            })
            .unwrap();
        let high = answers
            .post_answer(&PostAnswerRequest {
                question_id: question.id,
                body: "<p>second answer</p>".to_string(),
                author_id: expert.id,
            })
            .unwrap();
        (low.id.to_string(), high.id.to_string())
    };

    conn.execute(
        "UPDATE answers SET vote_count = 12 WHERE uuid = ?1;",
        params![high_id],
    )
    .unwrap();
    conn.execute(
        "UPDATE answers SET vote_count = 3 WHERE uuid = ?1;",
        params![low_id],
    )
    .unwrap();

    let repo = SqliteAnswerRepository::new(&mut conn);
    let answers = AnswerService::new(repo);
    let listed = answers.list_for_question(question.id).unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id.to_string(), high_id);
    assert_eq!(listed[1].id.to_string(), low_id);
}

#[test]
fn new_answer_notification_reaches_question_author() {
    let mut conn = open_db_in_memory().unwrap();
    let asker = seeded_user(&conn, "asker");
    let expert = seeded_user(&conn, "expert");
    let question = seeded_question(&mut conn, &asker, "notified question");

    let answer = {
        let repo = SqliteAnswerRepository::new(&mut conn);
        let mut answers = AnswerService::new(repo);
        answers
            .post_answer(&PostAnswerRequest {
                question_id: question.id,
                body: "<p>the fix</p>".to_string(),
                author_id: expert.id,
            })
            .unwrap()
    };

    let notifications = NotificationService::new(SqliteNotificationRepository::new(&conn));
    notifications
        .record(&Notification::new_answer(&question, answer.id, expert.id))
        .unwrap();

    let feed = notifications.list_for_recipient(asker.id).unwrap();
    assert_eq!(feed.len(), 1);
    assert!(feed[0].message.contains("notified question"));
    assert_eq!(feed[0].question_id, Some(question.id));
    assert_eq!(feed[0].answer_id, Some(answer.id));
    assert_eq!(feed[0].triggered_by, Some(expert.id));
    assert!(!feed[0].read);

    assert!(notifications.list_for_recipient(expert.id).unwrap().is_empty());
}
