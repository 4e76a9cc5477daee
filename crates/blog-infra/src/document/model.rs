//! BSON shape of a stored post.

use bson::oid::ObjectId;
use bson::{Bson, DateTime as BsonDateTime, Document, doc};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use blog_core::RepoError;
use blog_core::domain::{Post, PostState, RubricRef, Tags};
use blog_core::ports::ensure_id;

/// A post as stored in the `posts` collection.
///
/// Fields are lenient on read so documents written by other tools still load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub rubric_id: Option<String>,
    #[serde(default)]
    pub rubric_title: String,
    /// Expected to be an array of strings; anything else reads as the default tag.
    #[serde(default)]
    pub tags: Option<Bson>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: Option<BsonDateTime>,
    #[serde(default)]
    pub modified_at: Option<BsonDateTime>,
    #[serde(default)]
    pub parent_post_id: Option<String>,
    #[serde(default)]
    pub count_of_views: i64,
    #[serde(default)]
    pub count_of_stars: i64,
    #[serde(default)]
    pub comments_ids: Vec<String>,
}

fn decode_tags(raw: Option<&Bson>) -> Tags {
    let tags: Vec<String> = match raw {
        Some(Bson::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };
    if tags.is_empty() {
        Tags::fallback()
    } else {
        Tags(tags)
    }
}

fn to_counter(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn from_counter(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn to_chrono(value: Option<BsonDateTime>) -> DateTime<Utc> {
    value.map(BsonDateTime::to_chrono).unwrap_or_default()
}

impl From<&Post> for PostDocument {
    /// Build the insert form. The `_id` is left for the store to assign.
    fn from(post: &Post) -> Self {
        let tags = post
            .tags
            .as_slice()
            .iter()
            .cloned()
            .map(Bson::String)
            .collect::<Vec<_>>();

        Self {
            id: None,
            title: post.title.clone(),
            author_id: post.author_id.clone(),
            rubric_id: post.rubric.id.clone(),
            rubric_title: post.rubric.title.clone(),
            tags: (!tags.is_empty()).then_some(Bson::Array(tags)),
            state: post.state.as_str().to_string(),
            content: post.content.clone(),
            created_at: Some(BsonDateTime::from_chrono(post.created_at)),
            modified_at: Some(BsonDateTime::from_chrono(post.modified_at)),
            parent_post_id: post.parent_post_id.clone(),
            count_of_views: to_counter(post.count_of_views),
            count_of_stars: to_counter(post.count_of_stars),
            comments_ids: post.comments_ids.clone(),
        }
    }
}

impl TryFrom<PostDocument> for Post {
    type Error = RepoError;

    fn try_from(document: PostDocument) -> Result<Self, Self::Error> {
        let id = document
            .id
            .ok_or_else(|| RepoError::decode("post document without _id"))?;
        let state = document
            .state
            .parse::<PostState>()
            .map_err(|e| RepoError::decode(format!("post {}: {e}", id.to_hex())))?;

        Ok(Self {
            id: id.to_hex(),
            title: document.title,
            author_id: document.author_id,
            rubric: RubricRef {
                id: document.rubric_id,
                title: document.rubric_title,
            },
            content: document.content,
            tags: decode_tags(document.tags.as_ref()),
            state,
            created_at: to_chrono(document.created_at),
            modified_at: to_chrono(document.modified_at),
            parent_post_id: document.parent_post_id,
            count_of_views: from_counter(document.count_of_views),
            count_of_stars: from_counter(document.count_of_stars),
            comments_ids: document.comments_ids,
        })
    }
}

/// Parse a caller id into the store's native id.
///
/// A string that is not 24 hex characters is an input error, not a lookup miss.
pub(crate) fn parse_object_id(id: &str) -> Result<ObjectId, RepoError> {
    let id = ensure_id(id)?;
    ObjectId::parse_str(id)
        .map_err(|e| RepoError::invalid_input(format!("malformed post id '{id}': {e}")))
}

pub(crate) fn by_id(id: ObjectId) -> Document {
    doc! { "_id": id }
}

/// Only public posts are listed.
pub(crate) fn listing_filter() -> Document {
    doc! { "state": PostState::Public.as_str() }
}

/// Most starred first, newest first among equals.
pub(crate) fn listing_sort() -> Document {
    doc! { "count_of_stars": -1, "created_at": -1 }
}

/// Field-level update for a merged post.
///
/// Every edit also counts as one view.
pub(crate) fn update_document(merged: &Post) -> Document {
    doc! {
        "$set": {
            "title": merged.title.as_str(),
            "content": merged.content.as_str(),
            "rubric_title": merged.rubric.title.as_str(),
            "modified_at": BsonDateTime::from_chrono(merged.modified_at),
        },
        "$inc": { "count_of_views": 1_i64 },
    }
}

/// Counter change on one field. Decrements never match a counter at zero.
pub(crate) fn counter_update(id: ObjectId, field: &str, delta: i64) -> (Document, Document) {
    let mut filter = by_id(id);
    if delta < 0 {
        filter.insert(field, doc! { "$gt": 0 });
    }
    let mut inc = Document::new();
    inc.insert(field, delta);
    (filter, doc! { "$inc": inc })
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::ErrorKind;
    use blog_core::domain::DEFAULT_TAG;

    fn stored(tags: Option<Bson>) -> PostDocument {
        PostDocument {
            id: Some(ObjectId::new()),
            title: "Hello".to_string(),
            state: "public".to_string(),
            content: "**Hi**".to_string(),
            tags,
            count_of_stars: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_post_round_trip_keeps_hex_id() {
        let document = stored(Some(Bson::Array(vec![Bson::String("rust".into())])));
        let oid = document.id.unwrap();

        let post = Post::try_from(document).unwrap();
        assert_eq!(post.id, oid.to_hex());
        assert_eq!(post.id.len(), 24);
        assert_eq!(post.tags.as_slice(), ["rust".to_string()]);
        assert_eq!(post.count_of_stars, 3);
    }

    #[test]
    fn test_tags_fallback_for_missing_or_odd_values() {
        for tags in [None, Some(Bson::String("rust".into())), Some(Bson::Array(vec![]))] {
            let post = Post::try_from(stored(tags)).unwrap();
            assert_eq!(post.tags.as_slice(), [DEFAULT_TAG.to_string()]);
        }
    }

    #[test]
    fn test_missing_id_or_state_is_decode_failure() {
        let mut document = stored(None);
        document.id = None;
        assert_eq!(
            Post::try_from(document).unwrap_err().kind(),
            ErrorKind::DecodeFailure
        );

        let mut document = stored(None);
        document.state = "archived".to_string();
        assert_eq!(
            Post::try_from(document).unwrap_err().kind(),
            ErrorKind::DecodeFailure
        );
    }

    #[test]
    fn test_insert_form_leaves_id_to_store() {
        let post = Post::new("Hello", "body").prepared_for_insert(Utc::now());
        let document = PostDocument::from(&post);

        assert!(document.id.is_none());
        let encoded = bson::to_document(&document).unwrap();
        assert!(!encoded.contains_key("_id"));
        assert_eq!(encoded.get_str("state").unwrap(), "public");
    }

    #[test]
    fn test_parse_object_id() {
        let oid = ObjectId::new();
        assert_eq!(parse_object_id(&oid.to_hex()).unwrap(), oid);
        assert_eq!(
            parse_object_id("not-hex").unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            parse_object_id("  ").unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_listing_filter_and_sort() {
        assert_eq!(listing_filter(), doc! { "state": "public" });
        let sort = listing_sort();
        let keys: Vec<_> = sort.keys().map(String::as_str).collect();
        assert_eq!(keys, ["count_of_stars", "created_at"]);
        assert_eq!(sort.get_i32("count_of_stars").unwrap(), -1);
    }

    #[test]
    fn test_update_document_sets_fields_and_counts_a_view() {
        let mut post = Post::new("New", "body");
        post.rubric.title = "Rust".to_string();
        post.count_of_views = 1_000_000;
        let update = update_document(&post);

        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_str("title").unwrap(), "New");
        assert_eq!(set.get_str("content").unwrap(), "body");
        assert_eq!(set.get_str("rubric_title").unwrap(), "Rust");
        assert!(set.contains_key("modified_at"));
        assert!(!set.contains_key("count_of_views"));
        assert!(!set.contains_key("count_of_stars"));

        // The caller's counter never reaches the store.
        assert_eq!(
            update.get_document("$inc").unwrap(),
            &doc! { "count_of_views": 1_i64 }
        );
        assert!(!update.contains_key("$max"));
    }

    #[test]
    fn test_counter_update_guards_decrement() {
        let oid = ObjectId::new();

        let (filter, update) = counter_update(oid, "count_of_stars", -1);
        assert_eq!(
            filter.get_document("count_of_stars").unwrap(),
            &doc! { "$gt": 0 }
        );
        assert_eq!(update, doc! { "$inc": { "count_of_stars": -1_i64 } });

        let (filter, _) = counter_update(oid, "count_of_views", 1);
        assert_eq!(filter, doc! { "_id": oid });
    }
}
