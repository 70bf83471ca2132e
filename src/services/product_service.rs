use crate::database::sqlite::SqliteDatabase;
use crate::errors::{AppError, Result};
use crate::models::product::{PageWindow, Product, ProductFilter, ProductForm};
use crate::services::upload::UploadStorage;
use crate::utils::validation::Validator;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Orchestrates validation, the upload lifecycle and the store calls for
/// every product operation.
///
/// File writes and record writes are separate, non-transactional steps: the
/// image is already on disk when the record is inserted or updated, and a
/// crash between the two can leave an orphaned file. Within a request the
/// service compensates — any just-uploaded file is discarded before an
/// error is returned — but no atomicity across the two stores is claimed.
pub struct ProductService {
    db: Arc<SqliteDatabase>,
    storage: UploadStorage,
}

impl ProductService {
    pub fn new(db: Arc<SqliteDatabase>, storage: UploadStorage) -> Self {
        Self { db, storage }
    }

    pub fn storage(&self) -> &UploadStorage {
        &self.storage
    }

    pub async fn list(
        &self,
        filter: &ProductFilter,
        window: &PageWindow,
    ) -> Result<(Vec<Product>, i64)> {
        let products = self.db.list_products(filter, window).await?;
        let total = self.db.count_products(filter).await?;
        Ok((products, total))
    }

    pub async fn get(&self, id: &Uuid) -> Result<Product> {
        self.db
            .get_product_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    /// Creates a product from a parsed form. `form.image`, when set, is a
    /// file the handler already wrote to the uploads directory; it is
    /// removed again on any failure past that point.
    pub async fn create(&self, form: ProductForm) -> Result<Product> {
        let image = form.image.clone();

        let fields = match validate_create_fields(&form) {
            Ok(fields) => fields,
            Err(e) => {
                if let Some(path) = &image {
                    self.storage.discard(path).await;
                }
                return Err(e);
            }
        };

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: fields.name,
            category: fields.category,
            price: fields.price,
            description: fields.description,
            image,
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = self.db.insert_product(&product).await {
            if let Some(path) = &product.image {
                self.storage.discard(path).await;
            }
            return Err(e);
        }

        info!(action = "product_created", id = %product.id, name = %product.name);
        Ok(product)
    }

    /// Partial update: only supplied, non-blank fields change. A new image
    /// replaces the previous one, deleting the old file from disk; without
    /// a new image the existing reference is left untouched.
    pub async fn update(&self, id: &Uuid, form: ProductForm) -> Result<Product> {
        let new_image = form.image.clone();

        let existing = match self.db.get_product_by_id(id).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                if let Some(path) = &new_image {
                    self.storage.discard(path).await;
                }
                return Err(AppError::NotFound("Product not found".to_string()));
            }
            Err(e) => {
                if let Some(path) = &new_image {
                    self.storage.discard(path).await;
                }
                return Err(e);
            }
        };

        let mut updated = existing.clone();
        if let Err(e) = apply_update_fields(&mut updated, &form) {
            if let Some(path) = &new_image {
                self.storage.discard(path).await;
            }
            return Err(e);
        }

        if let Some(path) = &new_image {
            if let Some(old) = &existing.image {
                if let Err(e) = self.storage.remove(old).await {
                    self.storage.discard(path).await;
                    return Err(e);
                }
            }
            updated.image = Some(path.clone());
        }
        updated.updated_at = Utc::now();

        if let Err(e) = self.db.update_product(&updated).await {
            if let Some(path) = &new_image {
                self.storage.discard(path).await;
            }
            return Err(e);
        }

        info!(action = "product_updated", id = %updated.id);
        Ok(updated)
    }

    /// Deletes the record and its image file. The file is removed first;
    /// a record that vanished concurrently still reports not-found.
    pub async fn delete(&self, id: &Uuid) -> Result<()> {
        let existing = self
            .db
            .get_product_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        if let Some(image) = &existing.image {
            self.storage.remove(image).await?;
        }
        self.db.delete_product(id).await?;

        info!(action = "product_deleted", id = %id);
        Ok(())
    }
}

struct CreateFields {
    name: String,
    category: String,
    price: f64,
    description: String,
}

fn validate_create_fields(form: &ProductForm) -> Result<CreateFields> {
    let name = Validator::require_text("name", form.name.as_deref())?;
    let category = Validator::require_text("category", form.category.as_deref())?;
    let price_raw = Validator::require_text("price", form.price.as_deref())?;
    let description = Validator::require_text("description", form.description.as_deref())?;
    let price = Validator::parse_price(&price_raw)?;

    Ok(CreateFields {
        name,
        category,
        price,
        description,
    })
}

fn apply_update_fields(product: &mut Product, form: &ProductForm) -> Result<()> {
    if let Some(name) = non_blank(form.name.as_deref()) {
        product.name = name;
    }
    if let Some(category) = non_blank(form.category.as_deref()) {
        product.category = category;
    }
    if let Some(price) = non_blank(form.price.as_deref()) {
        product.price = Validator::parse_price(&price)?;
    }
    if let Some(description) = non_blank(form.description.as_deref()) {
        product.description = description;
    }
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
