//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use blog_core::RepoError;
use blog_core::domain::{Post, PostState, RubricRef, Tags};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub author_id: Option<Uuid>,
    pub rubric_id: Option<Uuid>,
    /// JSON-encoded tag list.
    #[sea_orm(column_type = "Text", nullable)]
    pub tags: Option<String>,
    pub state: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_at: DateTimeWithTimeZone,
    pub modified_at: DateTimeWithTimeZone,
    pub parent_post_id: Option<Uuid>,
    pub count_of_views: i64,
    pub count_of_stars: i64,
    /// JSON-encoded comment id list.
    #[sea_orm(column_type = "Text", nullable)]
    pub comments_ids: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::rubric::Entity",
        from = "Column::RubricId",
        to = "super::rubric::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Rubric,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::rubric::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rubric.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Parse a text id into the column's native UUID.
pub(crate) fn parse_uuid(value: &str, field: &str) -> Result<Uuid, RepoError> {
    Uuid::parse_str(value.trim())
        .map_err(|e| RepoError::invalid_input(format!("malformed {field} '{value}': {e}")))
}

fn parse_optional_uuid(value: Option<&str>, field: &str) -> Result<Option<Uuid>, RepoError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse_uuid(v, field).map(Some),
        None => Ok(None),
    }
}

/// Conversion from SeaORM Model to Domain Post.
///
/// Unreadable tags or comment ids fall back to defaults. An unknown state
/// fails the read.
impl TryFrom<Model> for Post {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let state = model
            .state
            .parse::<PostState>()
            .map_err(|e| RepoError::decode(format!("post {}: {e}", model.id)))?;

        let comments_ids = model
            .comments_ids
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok())
            .unwrap_or_default();

        Ok(Self {
            id: model.id.to_string(),
            title: model.title,
            author_id: model.author_id.map(|id| id.to_string()),
            rubric: RubricRef {
                id: model.rubric_id.map(|id| id.to_string()),
                title: String::new(),
            },
            content: model.content,
            tags: Tags::decode_lenient(model.tags.as_deref()),
            state,
            created_at: model.created_at.into(),
            modified_at: model.modified_at.into(),
            parent_post_id: model.parent_post_id.map(|id| id.to_string()),
            count_of_views: u64::try_from(model.count_of_views).unwrap_or(0),
            count_of_stars: u64::try_from(model.count_of_stars).unwrap_or(0),
            comments_ids,
        })
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
///
/// Every id must already be a UUID string.
impl TryFrom<Post> for ActiveModel {
    type Error = RepoError;

    fn try_from(post: Post) -> Result<Self, Self::Error> {
        let tags = (!post.tags.is_empty()).then(|| post.tags.encode());
        let comments_ids = serde_json::to_string(&post.comments_ids)
            .map_err(|e| RepoError::invalid_input(e.to_string()))?;

        Ok(Self {
            id: Set(parse_uuid(&post.id, "post id")?),
            title: Set(post.title),
            author_id: Set(parse_optional_uuid(post.author_id.as_deref(), "author id")?),
            rubric_id: Set(parse_optional_uuid(post.rubric.id.as_deref(), "rubric id")?),
            tags: Set(tags),
            state: Set(post.state.as_str().to_string()),
            content: Set(post.content),
            created_at: Set(post.created_at.into()),
            modified_at: Set(post.modified_at.into()),
            parent_post_id: Set(parse_optional_uuid(
                post.parent_post_id.as_deref(),
                "parent post id",
            )?),
            count_of_views: Set(i64::try_from(post.count_of_views).unwrap_or(i64::MAX)),
            count_of_stars: Set(i64::try_from(post.count_of_stars).unwrap_or(i64::MAX)),
            comments_ids: Set(Some(comments_ids)),
        })
    }
}
