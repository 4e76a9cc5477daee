//! Relational post repository on SeaORM.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::entity::prelude::{DateTimeWithTimeZone, Uuid};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DbConn, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use blog_core::RepoError;
use blog_core::domain::{Post, PostState, merge_update};
use blog_core::ports::{Page, PostRepository, ensure_id};

use super::connections::{connect_relational, map_db_err};
use super::entity::post::{self, Entity as PostEntity, parse_uuid};
use super::entity::rubric::{self, Entity as RubricEntity};
use crate::config::StorageConfig;
use crate::seed::seed_examples;
use crate::timeout::bounded;

/// Post repository over a relational schema with foreign keys.
///
/// Ids are UUIDs generated before insert, so `save` returns without a second
/// round-trip.
pub struct RelationalPostRepository {
    pub(crate) db: DbConn,
    op_timeout: Duration,
}

impl RelationalPostRepository {
    pub fn new(db: DbConn, op_timeout: Duration) -> Self {
        Self { db, op_timeout }
    }

    /// Connect, optionally wipe, then seed example posts.
    pub async fn connect(config: &StorageConfig) -> Result<Self, RepoError> {
        let db = connect_relational(config).await?;
        let repo = Self::new(db, config.op_timeout);

        if config.clear_storage {
            match repo.clear().await {
                Ok(deleted) => tracing::info!(deleted, "Deleted all posts from database"),
                Err(e) => tracing::error!(error = %e, "Failed to delete posts from database"),
            }
        }
        if let Some(requested) = config.seed_posts {
            seed_examples(&repo, requested).await;
        }

        Ok(repo)
    }

    async fn clear(&self) -> Result<u64, RepoError> {
        bounded(self.op_timeout, "clear", async {
            let result = PostEntity::delete_many()
                .exec(&self.db)
                .await
                .map_err(map_db_err)?;
            Ok(result.rows_affected)
        })
        .await
    }

    async fn exists(&self, id: Uuid) -> Result<bool, RepoError> {
        bounded(self.op_timeout, "exists", async {
            let found = PostEntity::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(map_db_err)?;
            Ok(found.is_some())
        })
        .await
    }

    /// Apply a counter expression to one post; returns rows affected.
    async fn bump_counter(
        &self,
        id: Uuid,
        column: post::Column,
        delta: i64,
    ) -> Result<u64, RepoError> {
        bounded(self.op_timeout, "counter", async {
            let mut query = PostEntity::update_many()
                .col_expr(column, Expr::col(column).add(delta))
                .filter(post::Column::Id.eq(id));
            if delta < 0 {
                query = query.filter(column.gt(0));
            }
            let result = query.exec(&self.db).await.map_err(map_db_err)?;
            Ok(result.rows_affected)
        })
        .await
    }
}

fn into_post(row: (post::Model, Option<rubric::Model>)) -> Result<Post, RepoError> {
    let (model, rubric) = row;
    let mut post = Post::try_from(model)?;
    if let Some(title) = rubric.and_then(|r| r.title) {
        post.rubric.title = title;
    }
    Ok(post)
}

#[async_trait]
impl PostRepository for RelationalPostRepository {
    fn backend_name(&self) -> &'static str {
        "relational"
    }

    async fn find_by_id(&self, id: &str) -> Result<Post, RepoError> {
        let id = ensure_id(id)?;
        let uuid = parse_uuid(id, "post id")?;

        let row = bounded(self.op_timeout, "find_by_id", async {
            PostEntity::find_by_id(uuid)
                .find_also_related(RubricEntity)
                .one(&self.db)
                .await
                .map_err(map_db_err)
        })
        .await?;

        row.map(into_post)
            .transpose()?
            .ok_or_else(|| RepoError::not_found(id))
    }

    async fn find(&self, page: Page) -> Result<Vec<Post>, RepoError> {
        tracing::debug!(limit = page.limit, offset = page.offset, "Listing posts");

        let rows = bounded(self.op_timeout, "find", async {
            PostEntity::find()
                .find_also_related(RubricEntity)
                .filter(post::Column::State.eq(PostState::Public.as_str()))
                .order_by_desc(post::Column::CountOfStars)
                .limit(page.limit)
                .offset(page.offset)
                .all(&self.db)
                .await
                .map_err(map_db_err)
        })
        .await?;

        rows.into_iter().map(into_post).collect()
    }

    async fn save(&self, post: Post) -> Result<String, RepoError> {
        let mut post = post.prepared_for_insert(Utc::now());
        let id = Uuid::new_v4().to_string();
        post.id = id.clone();
        let active = post::ActiveModel::try_from(post)?;

        bounded(self.op_timeout, "save", async {
            PostEntity::insert(active)
                .exec_without_returning(&self.db)
                .await
                .map_err(map_db_err)
        })
        .await?;

        tracing::debug!(post_id = %id, "Post inserted");
        Ok(id)
    }

    /// Rewrites title, content and modification time only. Author, rubric,
    /// state and counters have their own operations.
    async fn update(&self, post: Post) -> Result<(), RepoError> {
        let existing = self.find_by_id(&post.id).await?;
        let uuid = parse_uuid(&existing.id, "post id")?;
        let outcome = merge_update(existing, &post, Utc::now());
        let merged = outcome.post;

        let rows = bounded(self.op_timeout, "update", async {
            let result = PostEntity::update_many()
                .col_expr(post::Column::Title, Expr::value(merged.title.clone()))
                .col_expr(post::Column::Content, Expr::value(merged.content.clone()))
                .col_expr(
                    post::Column::ModifiedAt,
                    Expr::value(DateTimeWithTimeZone::from(merged.modified_at)),
                )
                .filter(post::Column::Id.eq(uuid))
                .exec(&self.db)
                .await
                .map_err(map_db_err)?;
            Ok(result.rows_affected)
        })
        .await?;

        if rows == 0 {
            return Err(RepoError::not_found(merged.id));
        }
        tracing::debug!(post_id = %merged.id, changed = ?outcome.changed, "Post updated");
        Ok(())
    }

    async fn increment_views(&self, id: &str) -> Result<(), RepoError> {
        let id = ensure_id(id)?;
        let uuid = parse_uuid(id, "post id")?;
        match self.bump_counter(uuid, post::Column::CountOfViews, 1).await? {
            0 => Err(RepoError::not_found(id)),
            _ => Ok(()),
        }
    }

    async fn increment_stars(&self, id: &str) -> Result<(), RepoError> {
        let id = ensure_id(id)?;
        let uuid = parse_uuid(id, "post id")?;
        match self.bump_counter(uuid, post::Column::CountOfStars, 1).await? {
            0 => Err(RepoError::not_found(id)),
            _ => Ok(()),
        }
    }

    async fn decrement_stars(&self, id: &str) -> Result<(), RepoError> {
        let id = ensure_id(id)?;
        let uuid = parse_uuid(id, "post id")?;
        if self.bump_counter(uuid, post::Column::CountOfStars, -1).await? > 0 {
            return Ok(());
        }
        // Nothing updated: either the post is missing or already at zero.
        if self.exists(uuid).await? {
            Ok(())
        } else {
            Err(RepoError::not_found(id))
        }
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let id = ensure_id(id)?;
        let uuid = parse_uuid(id, "post id")?;

        let rows = bounded(self.op_timeout, "delete", async {
            let result = PostEntity::delete_by_id(uuid)
                .exec(&self.db)
                .await
                .map_err(map_db_err)?;
            Ok(result.rows_affected)
        })
        .await?;

        if rows == 0 {
            return Err(RepoError::not_found(id));
        }
        Ok(())
    }
}
