//! Document post repository on MongoDB.

use std::time::Duration;

use async_trait::async_trait;
use bson::doc;
use bson::oid::ObjectId;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};

use blog_core::RepoError;
use blog_core::domain::{Post, merge_update};
use blog_core::ports::{Page, PostRepository};

use super::model::{
    PostDocument, by_id, counter_update, listing_filter, listing_sort, parse_object_id,
    update_document,
};
use crate::config::StorageConfig;
use crate::seed::seed_examples;
use crate::timeout::bounded;

/// Database used when the URI names none.
pub const DEFAULT_DATABASE: &str = "blog";
const COLLECTION: &str = "posts";
const APP_NAME: &str = "blog";

/// Map a driver error onto the repository error kinds.
pub(crate) fn map_mongo_err(err: mongodb::error::Error) -> RepoError {
    use mongodb::error::ErrorKind as MongoKind;

    match err.kind.as_ref() {
        MongoKind::BsonDeserialization(e) => RepoError::decode(e.to_string()),
        MongoKind::InvalidArgument { message, .. } => RepoError::invalid_input(message.clone()),
        _ => RepoError::connection(err.to_string()),
    }
}

/// Post repository over a single `posts` collection.
///
/// Ids are `ObjectId`s assigned by the store and handed out as 24-char hex.
/// There are no cross-operation transactions.
pub struct DocumentPostRepository {
    posts: Collection<PostDocument>,
    op_timeout: Duration,
}

impl DocumentPostRepository {
    pub fn new(posts: Collection<PostDocument>, op_timeout: Duration) -> Self {
        Self { posts, op_timeout }
    }

    /// Connect, ping, optionally wipe, then seed example posts.
    pub async fn connect(config: &StorageConfig) -> Result<Self, RepoError> {
        tracing::info!("Initializing document store connection...");

        let mut options = bounded(config.op_timeout, "parse_uri", async {
            ClientOptions::parse(config.descriptor.as_str())
                .await
                .map_err(map_mongo_err)
        })
        .await?;
        options.app_name = Some(APP_NAME.to_string());
        options.connect_timeout = Some(config.op_timeout);
        options.server_selection_timeout = Some(config.op_timeout);

        let database_name = options
            .default_database
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        let client = Client::with_options(options).map_err(map_mongo_err)?;
        let database = client.database(&database_name);

        bounded(config.op_timeout, "ping", async {
            database
                .run_command(doc! { "ping": 1 })
                .await
                .map_err(map_mongo_err)
        })
        .await?;
        tracing::info!(database = %database_name, "Document store connected");

        let repo = Self::new(database.collection(COLLECTION), config.op_timeout);

        if config.clear_storage {
            match repo.clear().await {
                Ok(deleted) => tracing::info!(deleted, "Deleted all posts from collection"),
                Err(e) => tracing::error!(error = %e, "Failed to delete posts from collection"),
            }
        }
        if let Some(requested) = config.seed_posts {
            seed_examples(&repo, requested).await;
        }

        Ok(repo)
    }

    async fn clear(&self) -> Result<u64, RepoError> {
        bounded(self.op_timeout, "clear", async {
            let result = self
                .posts
                .delete_many(doc! {})
                .await
                .map_err(map_mongo_err)?;
            Ok(result.deleted_count)
        })
        .await
    }

    async fn exists(&self, id: ObjectId) -> Result<bool, RepoError> {
        bounded(self.op_timeout, "exists", async {
            let count = self
                .posts
                .count_documents(by_id(id))
                .await
                .map_err(map_mongo_err)?;
            Ok(count > 0)
        })
        .await
    }

    /// Apply `$inc` to one counter; returns the matched count.
    async fn bump_counter(&self, id: ObjectId, field: &str, delta: i64) -> Result<u64, RepoError> {
        let (filter, update) = counter_update(id, field, delta);
        bounded(self.op_timeout, "counter", async {
            let result = self
                .posts
                .update_one(filter, update)
                .await
                .map_err(map_mongo_err)?;
            Ok(result.matched_count)
        })
        .await
    }
}

#[async_trait]
impl PostRepository for DocumentPostRepository {
    fn backend_name(&self) -> &'static str {
        "document"
    }

    async fn find_by_id(&self, id: &str) -> Result<Post, RepoError> {
        let oid = parse_object_id(id)?;

        let found = bounded(self.op_timeout, "find_by_id", async {
            self.posts.find_one(by_id(oid)).await.map_err(map_mongo_err)
        })
        .await?;

        found
            .map(Post::try_from)
            .transpose()?
            .ok_or_else(|| RepoError::not_found(oid.to_hex()))
    }

    async fn find(&self, page: Page) -> Result<Vec<Post>, RepoError> {
        tracing::debug!(limit = page.limit, offset = page.offset, "Listing posts");

        let documents: Vec<PostDocument> = bounded(self.op_timeout, "find", async {
            let cursor = self
                .posts
                .find(listing_filter())
                .sort(listing_sort())
                .skip(page.offset)
                .limit(i64::try_from(page.limit).unwrap_or(i64::MAX))
                .await
                .map_err(map_mongo_err)?;
            cursor.try_collect().await.map_err(map_mongo_err)
        })
        .await?;

        documents.into_iter().map(Post::try_from).collect()
    }

    async fn save(&self, post: Post) -> Result<String, RepoError> {
        let post = post.prepared_for_insert(Utc::now());
        let document = PostDocument::from(&post);

        let inserted = bounded(self.op_timeout, "save", async {
            self.posts
                .insert_one(&document)
                .await
                .map_err(map_mongo_err)
        })
        .await?;

        let id = inserted
            .inserted_id
            .as_object_id()
            .map(|oid| oid.to_hex())
            .ok_or_else(|| RepoError::decode("store returned a non-ObjectId _id"))?;

        tracing::debug!(post_id = %id, "Post inserted");
        Ok(id)
    }

    async fn update(&self, post: Post) -> Result<(), RepoError> {
        let existing = self.find_by_id(&post.id).await?;
        let oid = parse_object_id(&existing.id)?;
        let outcome = merge_update(existing, &post, Utc::now());
        let update = update_document(&outcome.post);

        let matched = bounded(self.op_timeout, "update", async {
            let result = self
                .posts
                .update_one(by_id(oid), update)
                .await
                .map_err(map_mongo_err)?;
            Ok(result.matched_count)
        })
        .await?;

        if matched == 0 {
            return Err(RepoError::not_found(oid.to_hex()));
        }
        tracing::debug!(post_id = %oid, changed = ?outcome.changed, "Post updated");
        Ok(())
    }

    async fn increment_views(&self, id: &str) -> Result<(), RepoError> {
        let oid = parse_object_id(id)?;
        match self.bump_counter(oid, "count_of_views", 1).await? {
            0 => Err(RepoError::not_found(oid.to_hex())),
            _ => Ok(()),
        }
    }

    async fn increment_stars(&self, id: &str) -> Result<(), RepoError> {
        let oid = parse_object_id(id)?;
        match self.bump_counter(oid, "count_of_stars", 1).await? {
            0 => Err(RepoError::not_found(oid.to_hex())),
            _ => Ok(()),
        }
    }

    async fn decrement_stars(&self, id: &str) -> Result<(), RepoError> {
        let oid = parse_object_id(id)?;
        if self.bump_counter(oid, "count_of_stars", -1).await? > 0 {
            return Ok(());
        }
        if self.exists(oid).await? {
            Ok(())
        } else {
            Err(RepoError::not_found(oid.to_hex()))
        }
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let oid = parse_object_id(id)?;

        let deleted = bounded(self.op_timeout, "delete", async {
            let result = self
                .posts
                .delete_one(by_id(oid))
                .await
                .map_err(map_mongo_err)?;
            Ok(result.deleted_count)
        })
        .await?;

        if deleted == 0 {
            return Err(RepoError::not_found(oid.to_hex()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::ErrorKind;

    async fn get_test_repo() -> Option<DocumentPostRepository> {
        let mut config = StorageConfig::new(
            std::env::var("MONGODB_URL").unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
        );
        config.op_timeout = Duration::from_secs(1);

        DocumentPostRepository::connect(&config).await.ok()
    }

    #[tokio::test]
    async fn test_malformed_id_is_invalid_input() {
        // Rejected before any round-trip, so no server is needed.
        let client = Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        let repo = DocumentPostRepository::new(
            client.database(DEFAULT_DATABASE).collection(COLLECTION),
            Duration::from_secs(1),
        );

        let err = repo.find_by_id("1234").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let err = repo.increment_stars("").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_unreachable_store_fails_construction() {
        let mut config = StorageConfig::new("mongodb://127.0.0.1:1/?connectTimeoutMS=200");
        config.op_timeout = Duration::from_millis(300);

        let err = match DocumentPostRepository::connect(&config).await {
            Ok(_) => panic!("expected connection failure"),
            Err(e) => e,
        };
        assert!(matches!(
            err.kind(),
            ErrorKind::ConnectionFailure | ErrorKind::Timeout
        ));
    }

    #[tokio::test]
    async fn test_document_round_trip() {
        let repo = match get_test_repo().await {
            Some(r) => r,
            None => {
                tracing::warn!("MongoDB not available, skipping test");
                return;
            }
        };

        let id = repo.save(Post::new("Hello", "**Hi**")).await.unwrap();
        assert_eq!(id.len(), 24);

        let stored = repo.find_by_id(&id).await.unwrap();
        assert_eq!(stored.id, id);
        assert!(stored.is_public());

        let mut edit = Post::new("Edited", "new body");
        edit.id = id.clone();
        repo.update(edit.clone()).await.unwrap();
        repo.update(edit).await.unwrap();
        repo.increment_views(&id).await.unwrap();

        let updated = repo.find_by_id(&id).await.unwrap();
        assert_eq!(updated.title, "Edited");
        assert_eq!(updated.content, "new body");
        // Two edits and one explicit view.
        assert_eq!(updated.count_of_views, 3);

        repo.decrement_stars(&id).await.unwrap();
        assert_eq!(repo.find_by_id(&id).await.unwrap().count_of_stars, 0);

        repo.delete(&id).await.unwrap();
        let err = repo.find_by_id(&id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_document_missing_post() {
        let repo = match get_test_repo().await {
            Some(r) => r,
            None => return,
        };

        let ghost = ObjectId::new().to_hex();
        for err in [
            repo.find_by_id(&ghost).await.unwrap_err(),
            repo.increment_views(&ghost).await.unwrap_err(),
            repo.decrement_stars(&ghost).await.unwrap_err(),
            repo.delete(&ghost).await.unwrap_err(),
        ] {
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }

        let mut edit = Post::new("ghost", "none");
        edit.id = ghost;
        assert_eq!(
            repo.update(edit).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_document_listing_is_public_and_starred_first() {
        let repo = match get_test_repo().await {
            Some(r) => r,
            None => return,
        };

        let low = repo.save(Post::new("low", "x")).await.unwrap();
        let high = repo.save(Post::new("high", "x")).await.unwrap();
        for _ in 0..3 {
            repo.increment_stars(&high).await.unwrap();
        }

        let listed = repo.find(Page::default()).await.unwrap();
        assert!(listed.iter().all(Post::is_public));
        assert!(
            listed
                .windows(2)
                .all(|pair| pair[0].count_of_stars >= pair[1].count_of_stars)
        );

        repo.delete(&low).await.unwrap();
        repo.delete(&high).await.unwrap();
    }
}
