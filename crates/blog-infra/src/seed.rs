//! Example posts inserted at start-up.

use blog_core::domain::{Post, RubricRef, Tags};
use blog_core::ports::PostRepository;

/// Upper bound on seeded posts; also the fallback for out-of-range requests.
pub const MAX_SEED_POSTS: usize = 3;

const EXAMPLE_CONTENT: &str = "Lorem ipsum dolor sit amet, **consectetur** adipiscing elit, sed do \
eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud \
exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat.\n\n\
*Duis aute irure dolor* in reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla \
pariatur. Excepteur sint occaecat cupidatat non proident, sunt in culpa qui officia deserunt mollit \
anim id est laborum.";

/// Clamp a requested seed count into `1..=MAX_SEED_POSTS`.
///
/// Zero, negative and excessive requests fall back to the maximum.
pub fn clamp_seed_count(requested: i64) -> usize {
    match usize::try_from(requested) {
        Ok(n) if (1..=MAX_SEED_POSTS).contains(&n) => n,
        _ => MAX_SEED_POSTS,
    }
}

/// Build `count` example posts.
pub fn example_posts(count: usize) -> Vec<Post> {
    (1..=count)
        .map(|i| Post {
            title: format!("Example post #{i}"),
            content: EXAMPLE_CONTENT.to_string(),
            rubric: RubricRef {
                id: None,
                title: "Getting started".to_string(),
            },
            tags: Tags(vec!["example".to_string()]),
            ..Post::new("", "")
        })
        .collect()
}

/// Insert example posts through the repository's own `save`.
///
/// Individual failures are logged and skipped. Returns how many were stored.
pub async fn seed_examples<R>(repo: &R, requested: i64) -> usize
where
    R: PostRepository + ?Sized,
{
    let count = clamp_seed_count(requested);
    let mut inserted = 0;

    for post in example_posts(count) {
        let title = post.title.clone();
        match repo.save(post).await {
            Ok(id) => {
                tracing::debug!(post_id = %id, backend = repo.backend_name(), "Seeded example post");
                inserted += 1;
            }
            Err(e) => {
                tracing::error!(title = %title, error = %e, "Failed to seed example post");
            }
        }
    }

    tracing::info!(
        backend = repo.backend_name(),
        inserted,
        requested = count,
        "Example data seeded"
    );
    inserted
}
