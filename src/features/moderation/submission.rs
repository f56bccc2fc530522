use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::modules::storage::{MinIOClient, PendingObject};
use crate::shared::uploads::ImageUpload;

/// Object path of the n-th (1-based) image of a record: `<folder>/<id>/image-<n>.<ext>`
pub fn image_path(folder: &str, id: Uuid, position: usize, image: &ImageUpload) -> String {
    format!("{}/{}/image-{}.{}", folder, id, position, image.extension())
}

/// Completes a submission whose row was inserted in `tx`.
///
/// Uploads the images, writes their URLs to the row's `images` column and
/// commits. If any step fails the uploaded objects are deleted and the
/// transaction is rolled back, so neither a row without its images nor
/// orphaned objects remain.
pub async fn finish_submission(
    mut tx: Transaction<'static, Postgres>,
    storage: &MinIOClient,
    table: &str,
    folder: &str,
    id: Uuid,
    images: Vec<ImageUpload>,
) -> Result<Vec<String>> {
    let objects: Vec<PendingObject> = images
        .into_iter()
        .enumerate()
        .map(|(i, image)| PendingObject {
            key: storage.public_key(&image_path(folder, id, i + 1, &image)),
            content_type: image.content_type,
            data: image.data,
        })
        .collect();

    let keys = match storage.upload_all(objects).await {
        Ok(keys) => keys,
        Err(e) => {
            rollback(tx, table, id).await;
            return Err(e);
        }
    };

    let urls: Vec<String> = keys.iter().map(|key| storage.get_file_url(key)).collect();

    if !urls.is_empty() {
        let update = format!(
            "UPDATE {} SET images = $2, updated_at = NOW() WHERE id = $1",
            table
        );
        if let Err(e) = sqlx::query(&update)
            .bind(id)
            .bind(&urls)
            .execute(&mut *tx)
            .await
        {
            tracing::error!("Failed to store image URLs for {} {}: {:?}", table, id, e);
            storage.delete_all(&keys).await;
            rollback(tx, table, id).await;
            return Err(AppError::Database(e));
        }
    }

    if let Err(e) = tx.commit().await {
        tracing::error!("Failed to commit {} {}: {:?}", table, id, e);
        storage.delete_all(&keys).await;
        return Err(AppError::Database(e));
    }

    Ok(urls)
}

async fn rollback(tx: Transaction<'static, Postgres>, table: &str, id: Uuid) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!("Failed to roll back {} {}: {:?}", table, id, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::uploads::fake_image;

    #[test]
    fn test_image_path_is_one_based() {
        let id = Uuid::nil();
        let mut image = fake_image("leak.png", 1);
        assert_eq!(
            image_path("reports", id, 1, &image),
            "reports/00000000-0000-0000-0000-000000000000/image-1.png"
        );

        image.content_type = "image/jpeg".to_string();
        assert!(image_path("news", id, 5, &image).ends_with("/image-5.jpg"));
    }
}
