//! Fake blog data for populating both stores.

use crate::models::NewBlog;
use crate::services::{MongoBlogStore, PostgresBlogStore, RelationalBlogStore};
use rand::seq::SliceRandom;
use rand::Rng;
use service_core::config::{get_env_parsed, is_production};
use service_core::error::AppError;
use tracing::info;

pub const DEFAULT_SEED_COUNT: usize = 10_000;

const TITLE_WORDS: usize = 10;
const PARAGRAPHS: usize = 3;

const LOREM: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "in",
    "reprehenderit", "voluptate", "velit", "esse", "cillum", "fugiat", "nulla", "pariatur",
    "excepteur", "sint", "occaecat", "cupidatat", "non", "proident", "sunt", "culpa", "qui",
    "officia", "deserunt", "mollit", "anim", "id", "est", "laborum",
];

#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub count: usize,
}

impl SeedOptions {
    pub fn from_env() -> Result<Self, AppError> {
        let count = get_env_parsed(
            "SEED_COUNT",
            &DEFAULT_SEED_COUNT.to_string(),
            is_production(),
        )?;
        Ok(Self { count })
    }
}

fn words<R: Rng>(rng: &mut R, count: usize) -> String {
    (0..count)
        .filter_map(|_| LOREM.choose(rng).copied())
        .collect::<Vec<_>>()
        .join(" ")
}

fn sentence<R: Rng>(rng: &mut R) -> String {
    let len = rng.gen_range(6..14);
    let mut text = words(rng, len);
    if let Some(first) = text.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    text.push('.');
    text
}

fn paragraph<R: Rng>(rng: &mut R) -> String {
    let sentences = rng.gen_range(3..7);
    (0..sentences)
        .map(|_| sentence(rng))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Generate `count` posts with ids `1..=count`.
pub fn generate_blogs<R: Rng>(rng: &mut R, count: usize) -> Vec<NewBlog> {
    (1..=count)
        .map(|id| NewBlog {
            id: id as i64,
            title: words(rng, TITLE_WORDS),
            content: (0..PARAGRAPHS)
                .map(|_| paragraph(rng))
                .collect::<Vec<_>>()
                .join("\n"),
        })
        .collect()
}

/// Replace the relational data and rebuild the random view over it.
pub async fn seed_postgres(store: &PostgresBlogStore, blogs: &[NewBlog]) -> Result<(), AppError> {
    store.replace_all(blogs).await?;
    store.refresh_random().await?;
    info!(count = blogs.len(), "PostgreSQL seeded");
    Ok(())
}

pub async fn seed_mongo(store: &MongoBlogStore, blogs: &[NewBlog]) -> Result<(), AppError> {
    store.replace_all(blogs).await?;
    info!(count = blogs.len(), "MongoDB seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn ids_are_sequential_from_one() {
        let mut rng = StdRng::seed_from_u64(7);
        let blogs = generate_blogs(&mut rng, 5);
        let ids: Vec<i64> = blogs.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn titles_have_ten_words_and_content_three_paragraphs() {
        let mut rng = StdRng::seed_from_u64(42);
        for blog in generate_blogs(&mut rng, 20) {
            assert_eq!(blog.title.split(' ').count(), TITLE_WORDS);
            assert_eq!(blog.content.lines().count(), PARAGRAPHS);
            assert!(blog.content.ends_with('.'));
        }
    }

    #[test]
    fn same_seed_gives_same_posts() {
        let a = generate_blogs(&mut StdRng::seed_from_u64(1), 3);
        let b = generate_blogs(&mut StdRng::seed_from_u64(1), 3);
        assert_eq!(a, b);
    }

    #[test]
    fn zero_count_generates_nothing() {
        assert!(generate_blogs(&mut StdRng::seed_from_u64(1), 0).is_empty());
    }
}
