//! Annotation database operations

use sqlx::SqlitePool;

use crate::annotations::RawAnnotationRecord;
use crate::error::Result;

const SELECT_RECORDS: &str = r#"
    SELECT ZANNOTATIONASSETID AS book_id,
           COALESCE(ZANNOTATIONLOCATION, '') AS location,
           ZANNOTATIONSELECTEDTEXT AS selected_text,
           ZANNOTATIONNOTE AS note,
           ZANNOTATIONREPRESENTATIVETEXT AS represent_text,
           ZFUTUREPROOFING5 AS chapter_label,
           ZANNOTATIONSTYLE AS style,
           CAST(COALESCE(ZANNOTATIONMODIFICATIONDATE, 0) AS INTEGER) AS modified_at
    FROM ZAEANNOTATION
    WHERE COALESCE(ZANNOTATIONDELETED, 0) = 0
"#;

/// Annotation repository
pub struct AnnotationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AnnotationRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Asset ids among `asset_ids` that have at least one highlight
    pub async fn books_with_highlights(&self, asset_ids: &[String]) -> Result<Vec<String>> {
        if asset_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; asset_ids.len()].join(", ");
        let query = format!(
            r#"
            SELECT DISTINCT ZANNOTATIONASSETID
            FROM ZAEANNOTATION
            WHERE ZANNOTATIONASSETID IN ({})
              AND COALESCE(ZANNOTATIONDELETED, 0) = 0
              AND ZANNOTATIONSELECTEDTEXT != ''
            ORDER BY ZANNOTATIONASSETID
            "#,
            placeholders
        );

        let mut sql_query = sqlx::query_as::<_, (String,)>(&query);
        for id in asset_ids {
            sql_query = sql_query.bind(id.as_str());
        }

        let rows = sql_query.fetch_all(self.pool).await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// List the raw annotation rows of one book, in storage order
    pub async fn list_for_book(&self, asset_id: &str) -> Result<Vec<RawAnnotationRecord>> {
        let query = format!("{} AND ZANNOTATIONASSETID = ? ORDER BY Z_PK", SELECT_RECORDS);
        let records = sqlx::query_as::<_, RawAnnotationRecord>(&query)
            .bind(asset_id)
            .fetch_all(self.pool)
            .await?;

        Ok(records)
    }

    /// List every raw annotation row, in storage order
    pub async fn list(&self) -> Result<Vec<RawAnnotationRecord>> {
        let query = format!("{} ORDER BY Z_PK", SELECT_RECORDS);
        let records = sqlx::query_as::<_, RawAnnotationRecord>(&query)
            .fetch_all(self.pool)
            .await?;

        Ok(records)
    }
}
