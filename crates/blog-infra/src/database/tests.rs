use std::time::Duration;

use chrono::Utc;
use sea_orm::entity::prelude::Uuid;
use sea_orm::{
    ColumnTrait, DatabaseBackend, DatabaseConnection, EntityTrait, MockDatabase, MockExecResult,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Transaction,
};

use blog_core::ErrorKind;
use blog_core::domain::{
    ANONYMOUS_USER_ID, DEFAULT_RUBRIC_ID, DEFAULT_TAG, Post, PostState, Tags,
};
use blog_core::ports::{Page, PostRepository};

use crate::database::RelationalPostRepository;
use crate::database::entity::post::{self, Entity as PostEntity};
use crate::database::entity::rubric::{self, Entity as RubricEntity};

const TIMEOUT: Duration = Duration::from_secs(5);

fn post_model(id: Uuid, title: &str, stars: i64) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        title: title.to_owned(),
        author_id: None,
        rubric_id: Some(Uuid::nil()),
        tags: Some(r#"["rust"]"#.to_owned()),
        state: "public".to_owned(),
        content: "**Hi**".to_owned(),
        created_at: now.into(),
        modified_at: now.into(),
        parent_post_id: None,
        count_of_views: 0,
        count_of_stars: stars,
        comments_ids: None,
    }
}

fn rubric_model() -> rubric::Model {
    rubric::Model {
        id: Uuid::nil(),
        title: Some("Go for fun".to_owned()),
        description: None,
    }
}

fn exec_ok(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

fn repo(db: &DatabaseConnection) -> RelationalPostRepository {
    // `DatabaseConnection` is not `Clone` under sea-orm's `mock` feature;
    // share the underlying mock handle instead.
    let shared = match db {
        DatabaseConnection::MockDatabaseConnection(conn) => {
            DatabaseConnection::MockDatabaseConnection(std::sync::Arc::clone(conn))
        }
        _ => unreachable!("tests only use mock connections"),
    };
    RelationalPostRepository::new(shared, TIMEOUT)
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![(
            post_model(post_id, "Hello", 2),
            Some(rubric_model()),
        )]])
        .into_connection();

    let post = repo(&db).find_by_id(&post_id.to_string()).await.unwrap();

    assert_eq!(post.id, post_id.to_string());
    assert_eq!(post.title, "Hello");
    assert_eq!(post.rubric.title, "Go for fun");
    assert_eq!(post.tags, Tags(vec!["rust".to_owned()]));
    assert_eq!(post.count_of_stars, 2);
    assert!(post.rendered_content().contains("<strong>Hi</strong>"));
}

#[tokio::test]
async fn test_find_by_id_missing_row_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<(post::Model, Option<rubric::Model>)>::new()])
        .into_connection();

    let err = repo(&db)
        .find_by_id(&Uuid::new_v4().to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_find_by_id_rejects_malformed_id_without_query() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let err = repo(&db).find_by_id("not-a-uuid").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(db.into_transaction_log().is_empty());
}

#[tokio::test]
async fn test_malformed_tags_fall_back_to_default() {
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let mut broken = post_model(first, "broken tags", 0);
    broken.tags = Some("{oops".to_owned());
    let mut empty = post_model(second, "empty tags", 0);
    empty.tags = Some(String::new());

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![(broken, None::<rubric::Model>)]])
        .append_query_results(vec![vec![(empty, None::<rubric::Model>)]])
        .into_connection();
    let repo = repo(&db);

    for id in [first, second] {
        let post = repo.find_by_id(&id.to_string()).await.unwrap();
        assert_eq!(post.tags.as_slice(), [DEFAULT_TAG.to_owned()]);
    }
}

#[tokio::test]
async fn test_unknown_state_is_decode_failure() {
    let id = Uuid::new_v4();
    let mut model = post_model(id, "odd", 0);
    model.state = "archived".to_owned();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![(model, None::<rubric::Model>)]])
        .into_connection();

    let err = repo(&db).find_by_id(&id.to_string()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecodeFailure);
}

#[tokio::test]
async fn test_find_filters_public_and_orders_by_stars() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![
            (post_model(Uuid::new_v4(), "five", 5), None::<rubric::Model>),
            (post_model(Uuid::new_v4(), "three", 3), None::<rubric::Model>),
        ]])
        .into_connection();

    let posts = repo(&db).find(Page::new(-1, -7)).await.unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].title, "five");

    let expected = PostEntity::find()
        .find_also_related(RubricEntity)
        .filter(post::Column::State.eq("public"))
        .order_by_desc(post::Column::CountOfStars)
        .limit(50)
        .offset(0)
        .build(DatabaseBackend::Postgres);
    assert_eq!(db.into_transaction_log(), vec![Transaction::one(expected)]);
}

#[tokio::test]
async fn test_save_applies_creation_policy() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![exec_ok(1)])
        .into_connection();

    let mut post = Post::new("Hello", "**Hi**");
    post.state = PostState::Blocked;
    post.count_of_stars = 9;
    let id = repo(&db).save(post).await.unwrap();
    assert!(Uuid::parse_str(&id).is_ok());

    let mut prepared = Post::new("Hello", "**Hi**").prepared_for_insert(Utc::now());
    prepared.id = id.clone();
    let expected = PostEntity::insert(post::ActiveModel::try_from(prepared).unwrap())
        .build(DatabaseBackend::Postgres);

    let log = db.into_transaction_log();
    assert_eq!(log.len(), 1);
    let logged = format!("{:?}", log[0]);
    assert!(logged.contains(&format!("{:?}", expected.sql)));
    assert!(logged.contains(&id));
    assert!(logged.contains(r#"String(Some("public"))"#));
    assert!(!logged.contains(r#""blocked""#));
    assert!(logged.contains(ANONYMOUS_USER_ID));
    assert!(logged.contains(DEFAULT_RUBRIC_ID));
    assert!(!logged.contains("BigInt(Some(9))"));
}

#[tokio::test]
async fn test_save_accepts_empty_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![exec_ok(1)])
        .into_connection();

    let id = repo(&db).save(Post::default()).await.unwrap();
    assert!(!id.is_empty());
}

#[tokio::test]
async fn test_save_rejects_malformed_author() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let mut post = Post::new("Hello", "body");
    post.author_id = Some("someone".to_owned());

    let err = repo(&db).save(post).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(db.into_transaction_log().is_empty());
}

#[tokio::test]
async fn test_update_merges_and_rewrites() {
    let id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![(
            post_model(id, "Old", 4),
            Some(rubric_model()),
        )]])
        .append_exec_results(vec![exec_ok(1)])
        .into_connection();

    let mut edit = Post::new("New", "**Hi**");
    edit.id = id.to_string();
    repo(&db).update(edit).await.unwrap();

    // select + update
    assert_eq!(db.into_transaction_log().len(), 2);
}

#[tokio::test]
async fn test_update_missing_post_leaves_store_untouched() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<(post::Model, Option<rubric::Model>)>::new()])
        .into_connection();

    let mut edit = Post::new("New", "body");
    edit.id = Uuid::new_v4().to_string();
    let err = repo(&db).update(edit).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    // Only the lookup ran.
    assert_eq!(db.into_transaction_log().len(), 1);
}

#[tokio::test]
async fn test_increment_views_on_missing_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![exec_ok(0)])
        .into_connection();

    let err = repo(&db)
        .increment_views(&Uuid::new_v4().to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_decrement_stars_at_zero_is_a_no_op() {
    let id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![exec_ok(0), exec_ok(0)])
        .append_query_results(vec![vec![post_model(id, "zero", 0)]])
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();
    let repo = repo(&db);

    repo.decrement_stars(&id.to_string()).await.unwrap();

    let err = repo
        .decrement_stars(&Uuid::new_v4().to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![exec_ok(1), exec_ok(0)])
        .into_connection();
    let repo = repo(&db);

    repo.delete(&Uuid::new_v4().to_string()).await.unwrap();
    let err = repo.delete(&Uuid::new_v4().to_string()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_related_models_convert_to_domain() {
    let rubric: blog_core::domain::Rubric = rubric_model().into();
    assert_eq!(rubric.title, "Go for fun");
    assert_eq!(rubric.description, "");
}
