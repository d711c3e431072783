use crate::models::{NewPhoto, PhotoEntity, Timestamps};
use sqlx::{Sqlite, SqlitePool};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

const SELECT_PHOTO: &str = r#"SELECT
        id, device_serial, file_path, file_name,
        analysis_result, confidence, created_at, updated_at
    FROM photos"#;

/// Durable storage of photo records.
///
/// Writes go through a [`PhotoTransaction`] obtained from [`PhotoRepository::begin`];
/// a transaction that is dropped without [`PhotoTransaction::commit`] is rolled back.
/// At most one transaction is open at a time, later `begin` calls wait for it.
pub trait PhotoRepository: Send + Sync + 'static {
    type Transaction: PhotoTransaction;

    fn begin(&self) -> impl Future<Output = Result<Self::Transaction, sqlx::Error>> + Send;

    fn find_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<PhotoEntity>, sqlx::Error>> + Send;

    /// The record with the highest id.
    fn find_latest(&self) -> impl Future<Output = Result<Option<PhotoEntity>, sqlx::Error>> + Send;
}

pub trait PhotoTransaction: Send {
    fn insert(
        &mut self,
        photo: NewPhoto,
    ) -> impl Future<Output = Result<PhotoEntity, sqlx::Error>> + Send;

    /// Writes back the mutable columns of an already inserted record.
    fn save(&mut self, photo: &PhotoEntity) -> impl Future<Output = Result<(), sqlx::Error>> + Send;

    fn commit(self) -> impl Future<Output = Result<(), sqlx::Error>> + Send;
}

#[derive(Clone)]
pub struct SqlitePhotoRepository {
    pool: SqlitePool,
    writer: Arc<Mutex<()>>,
}

impl SqlitePhotoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            writer: Arc::new(Mutex::new(())),
        }
    }
}

impl PhotoRepository for SqlitePhotoRepository {
    type Transaction = SqlitePhotoTransaction;

    async fn begin(&self) -> Result<Self::Transaction, sqlx::Error> {
        // SQLite allows a single writer, queue here instead of on the database lock
        let writer = self.writer.clone().lock_owned().await;
        Ok(SqlitePhotoTransaction {
            tx: self.pool.begin().await?,
            _writer: writer,
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PhotoEntity>, sqlx::Error> {
        sqlx::query_as::<_, PhotoEntity>(&format!("{SELECT_PHOTO} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_latest(&self) -> Result<Option<PhotoEntity>, sqlx::Error> {
        sqlx::query_as::<_, PhotoEntity>(&format!("{SELECT_PHOTO} ORDER BY id DESC LIMIT 1"))
            .fetch_optional(&self.pool)
            .await
    }
}

/// Dropping it rolls back first, then lets the next writer in.
pub struct SqlitePhotoTransaction {
    tx: sqlx::Transaction<'static, Sqlite>,
    _writer: OwnedMutexGuard<()>,
}

impl PhotoTransaction for SqlitePhotoTransaction {
    async fn insert(&mut self, photo: NewPhoto) -> Result<PhotoEntity, sqlx::Error> {
        let timestamps = Timestamps::now();
        let id = sqlx::query(
            r#"INSERT INTO photos (device_serial, file_path, file_name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(&photo.device_serial)
        .bind(&photo.file_path)
        .bind(&photo.file_name)
        .bind(timestamps.created_at)
        .bind(timestamps.updated_at)
        .execute(&mut *self.tx)
        .await?
        .last_insert_rowid();
        Ok(PhotoEntity {
            id,
            device_serial: photo.device_serial,
            file_path: photo.file_path,
            file_name: photo.file_name,
            analysis_result: None,
            confidence: None,
            timestamps,
        })
    }

    async fn save(&mut self, photo: &PhotoEntity) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE photos SET analysis_result = ?, confidence = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&photo.analysis_result)
        .bind(photo.confidence)
        .bind(photo.timestamps.updated_at)
        .bind(photo.id)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }
}
