use sqlx::PgPool;

use crate::bulletin::{BulletinRecord, BulletinSummary};
use crate::viewer::read_path::BulletinSource;

const RECORD_COLUMNS: &str = "date, event_type, time, sermon_title_main, sermon_title_main_color, \
     sermon_title_sub, sermon_title_sub_color, praises, prayers, passage, sermon_description, \
     announcements, intro_background_url, youtube_url, og_image_url";

/// Keyed CRUD over the single bulletin table.
#[derive(Clone)]
pub struct BulletinStore {
    pool: PgPool,
}

impl BulletinStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, date: &str) -> sqlx::Result<Option<BulletinRecord>> {
        sqlx::query_as::<_, BulletinRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM bulletins WHERE date = $1"
        ))
        .bind(date)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list(&self) -> sqlx::Result<Vec<BulletinSummary>> {
        sqlx::query_as::<_, BulletinSummary>(
            "SELECT date, sermon_title_main, event_type FROM bulletins ORDER BY date DESC",
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Full-field replace: every column is written from the record, so a
    /// field left blank in the editor resets to its canonical default.
    pub async fn upsert(&self, record: &BulletinRecord) -> sqlx::Result<BulletinRecord> {
        sqlx::query_as::<_, BulletinRecord>(&format!(
            "INSERT INTO bulletins (
                 date, event_type, time, sermon_title_main, sermon_title_main_color,
                 sermon_title_sub, sermon_title_sub_color, praises, prayers, passage,
                 sermon_description, announcements, intro_background_url, youtube_url,
                 og_image_url
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             ON CONFLICT (date) DO UPDATE SET
                 event_type = EXCLUDED.event_type,
                 time = EXCLUDED.time,
                 sermon_title_main = EXCLUDED.sermon_title_main,
                 sermon_title_main_color = EXCLUDED.sermon_title_main_color,
                 sermon_title_sub = EXCLUDED.sermon_title_sub,
                 sermon_title_sub_color = EXCLUDED.sermon_title_sub_color,
                 praises = EXCLUDED.praises,
                 prayers = EXCLUDED.prayers,
                 passage = EXCLUDED.passage,
                 sermon_description = EXCLUDED.sermon_description,
                 announcements = EXCLUDED.announcements,
                 intro_background_url = EXCLUDED.intro_background_url,
                 youtube_url = EXCLUDED.youtube_url,
                 og_image_url = EXCLUDED.og_image_url,
                 updated_at = NOW()
             RETURNING {RECORD_COLUMNS}"
        ))
        .bind(&record.date)
        .bind(&record.event_type)
        .bind(&record.time)
        .bind(&record.sermon_title_main)
        .bind(record.sermon_title_main_color.as_deref())
        .bind(&record.sermon_title_sub)
        .bind(record.sermon_title_sub_color.as_deref())
        .bind(&record.praises)
        .bind(&record.prayers)
        .bind(&record.passage)
        .bind(&record.sermon_description)
        .bind(&record.announcements)
        .bind(record.intro_background_url.as_deref())
        .bind(record.youtube_url.as_deref())
        .bind(record.og_image_url.as_deref())
        .fetch_one(&self.pool)
        .await
    }

    /// `false` when no row existed for the date.
    pub async fn delete(&self, date: &str) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM bulletins WHERE date = $1")
            .bind(date)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl BulletinSource for BulletinStore {
    async fn fetch(&self, date: &str) -> anyhow::Result<Option<BulletinRecord>> {
        Ok(self.get(date).await?)
    }

    async fn fetch_dates(&self) -> anyhow::Result<Vec<BulletinSummary>> {
        Ok(self.list().await?)
    }
}
