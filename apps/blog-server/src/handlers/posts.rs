//! Post handlers. Content is stored as markdown and rendered on every read.

use actix_web::{HttpResponse, web};

use blog_core::domain::{Post, Tags};
use blog_core::ports::Page;
use blog_shared::{ApiResponse, CreatedResponse, NewPostRequest, PostListQuery, PostResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn post_from_request(req: NewPostRequest) -> Post {
    let mut post = Post::new(req.title, req.content);
    post.author_id = non_blank(req.user_id);
    post.rubric.id = non_blank(req.rubric_id);
    if !req.tags.is_empty() {
        post.tags = Tags(req.tags);
    }
    post
}

fn to_response(post: Post) -> PostResponse {
    PostResponse {
        content_html: post.rendered_content(),
        id: post.id,
        title: post.title,
        author_id: post.author_id,
        rubric_id: post.rubric.id,
        rubric_title: post.rubric.title,
        content: post.content,
        tags: post.tags.0,
        state: post.state.to_string(),
        created_at: post.created_at.to_rfc3339(),
        modified_at: post.modified_at.to_rfc3339(),
        parent_post_id: post.parent_post_id,
        count_of_views: post.count_of_views,
        count_of_stars: post.count_of_stars,
        comments_ids: post.comments_ids,
    }
}

/// GET /api/v1/posts?limit=&offset=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let page = Page::new(query.limit.unwrap_or(0), query.offset.unwrap_or(0));
    let posts = state.posts.find(page).await?;

    let body: Vec<PostResponse> = posts.into_iter().map(to_response).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

/// GET /api/v1/posts/{id}
///
/// Counts a view; a failed count is logged and the post is still returned.
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state.posts.find_by_id(&id).await?;

    if let Err(e) = state.posts.increment_views(&id).await {
        tracing::warn!(post_id = %id, error = %e, "Failed to record post view");
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok(to_response(post))))
}

/// POST /api/v1/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<NewPostRequest>,
) -> AppResult<HttpResponse> {
    let post = post_from_request(body.into_inner());
    let id = state.posts.save(post).await?;

    tracing::info!(post_id = %id, "Post created");
    Ok(HttpResponse::Created().json(ApiResponse::ok(CreatedResponse { id })))
}

/// PUT /api/v1/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<NewPostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let mut post = post_from_request(body.into_inner());
    post.id = id.clone();

    state.posts.update(post).await?;
    let updated = state.posts.find_by_id(&id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        to_response(updated),
        "Post updated",
    )))
}

/// POST /api/v1/posts/{id}/stars
pub async fn add_star(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.posts.increment_stars(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /api/v1/posts/{id}/stars
pub async fn remove_star(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.posts.decrement_stars(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /api/v1/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.posts.delete(&id).await?;

    tracing::info!(post_id = %id, "Post deleted");
    Ok(HttpResponse::NoContent().finish())
}
