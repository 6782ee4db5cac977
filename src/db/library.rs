//! Library database operations

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::Result;

/// Book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    #[serde(rename = "assetId")]
    pub asset_id: String,
    pub title: String,
    pub author: String,
}

/// Library repository
pub struct LibraryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> LibraryRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every book in the library, by title
    pub async fn list(&self) -> Result<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT ZASSETID AS asset_id,
                   COALESCE(ZSORTTITLE, 'Unknown Title') AS title,
                   COALESCE(ZSORTAUTHOR, 'Unknown Author') AS author
            FROM ZBKLIBRARYASSET
            WHERE ZASSETID IS NOT NULL
            ORDER BY title ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(books)
    }

    /// Get a specific book
    pub async fn get(&self, asset_id: &str) -> Result<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            SELECT ZASSETID AS asset_id,
                   COALESCE(ZSORTTITLE, 'Unknown Title') AS title,
                   COALESCE(ZSORTAUTHOR, 'Unknown Author') AS author
            FROM ZBKLIBRARYASSET
            WHERE ZASSETID = ?
            "#,
        )
        .bind(asset_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::*;

    #[tokio::test]
    async fn test_list_books_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let pool = writable_pool(&dir.path().join("BKLibrary-1.sqlite")).await;
        create_library_schema(&pool).await;
        insert_book(&pool, "B2", Some("Moby Dick"), Some("Melville, Herman")).await;
        insert_book(&pool, "B1", None, None).await;

        let books = LibraryRepository::new(&pool).list().await.unwrap();

        assert_eq!(books.len(), 2);
        assert_eq!(books[0].asset_id, "B2");
        assert_eq!(books[0].title, "Moby Dick");
        assert_eq!(books[1].title, "Unknown Title");
        assert_eq!(books[1].author, "Unknown Author");
    }

    #[tokio::test]
    async fn test_get_book() {
        let dir = tempfile::tempdir().unwrap();
        let pool = writable_pool(&dir.path().join("BKLibrary-1.sqlite")).await;
        create_library_schema(&pool).await;
        insert_book(&pool, "B1", Some("Dune"), Some("Herbert, Frank")).await;

        let repo = LibraryRepository::new(&pool);
        assert_eq!(repo.get("B1").await.unwrap().unwrap().title, "Dune");
        assert!(repo.get("missing").await.unwrap().is_none());
    }
}
