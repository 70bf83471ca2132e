use crate::errors::{AppError, Result};
use crate::models::product::{PageWindow, Product, ProductFilter};
use chrono::SecondsFormat;
use sqlx::{Row, SqlitePool};
use std::path::Path;
use uuid::Uuid;

#[derive(Debug)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

/// A bind value collected while building the filter WHERE clause. The
/// SELECT and COUNT queries share one clause + bind list so they can never
/// disagree about which records match.
#[derive(Debug, Clone, PartialEq)]
enum BindValue {
    Text(String),
    Real(f64),
}

impl SqliteDatabase {
    pub async fn new(database_path: &str) -> Result<Self> {
        // Ensure the directory exists
        if let Some(parent) = Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::DatabaseError(format!("Failed to create database directory: {}", e))
                })?;
            }
        }

        // Create the database file if it doesn't exist
        if !Path::new(database_path).exists() {
            std::fs::File::create(database_path).map_err(|e| {
                AppError::DatabaseError(format!("Failed to create database file: {}", e))
            })?;
            println!("📁 Created new database file: {}", database_path);
        }
        let database_url = format!("sqlite:{}", database_path);

        let pool = SqlitePool::connect(&database_url)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect to database: {}", e)))?;

        let db = Self { pool };

        // Create tables if they don't exist
        db.create_tables().await?;

        println!("✅ Connected to SQLite database: {}", database_path);
        Ok(db)
    }

    async fn create_tables(&self) -> Result<()> {
        let query = r#"
            CREATE TABLE IF NOT EXISTS products (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                category TEXT NOT NULL,
                price REAL NOT NULL,
                description TEXT NOT NULL,
                image TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_products_category ON products(category);
            CREATE INDEX IF NOT EXISTS idx_products_price ON products(price);
            CREATE INDEX IF NOT EXISTS idx_products_created_at ON products(created_at);
            CREATE INDEX IF NOT EXISTS idx_products_name ON products(name);
        "#;

        sqlx::query(query)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create tables: {}", e)))?;

        Ok(())
    }

    pub async fn insert_product(&self, product: &Product) -> Result<()> {
        let query = r#"
            INSERT INTO products (id, name, category, price, description, image, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#;

        sqlx::query(query)
            .bind(product.id.to_string())
            .bind(&product.name)
            .bind(&product.category)
            .bind(product.price)
            .bind(&product.description)
            .bind(&product.image)
            .bind(format_timestamp(&product.created_at))
            .bind(format_timestamp(&product.updated_at))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create product: {}", e)))?;

        Ok(())
    }

    pub async fn get_product_by_id(&self, id: &Uuid) -> Result<Option<Product>> {
        let query = "SELECT * FROM products WHERE id = ?1";
        let row = sqlx::query(query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch product: {}", e)))?;

        row.map(|row| product_from_row(&row)).transpose()
    }

    pub async fn update_product(&self, product: &Product) -> Result<()> {
        let query = r#"
            UPDATE products
            SET name = ?2, category = ?3, price = ?4, description = ?5, image = ?6, updated_at = ?7
            WHERE id = ?1
        "#;

        let result = sqlx::query(query)
            .bind(product.id.to_string())
            .bind(&product.name)
            .bind(&product.category)
            .bind(product.price)
            .bind(&product.description)
            .bind(&product.image)
            .bind(format_timestamp(&product.updated_at))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update product: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product not found".to_string()));
        }
        Ok(())
    }

    pub async fn delete_product(&self, id: &Uuid) -> Result<()> {
        let query = "DELETE FROM products WHERE id = ?1";
        let result = sqlx::query(query)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete product: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product not found".to_string()));
        }
        Ok(())
    }

    /// Page of matching products, newest first.
    pub async fn list_products(
        &self,
        filter: &ProductFilter,
        window: &PageWindow,
    ) -> Result<Vec<Product>> {
        let (clause, binds) = filter_clause(filter);
        let sql = format!(
            "SELECT * FROM products{} ORDER BY created_at DESC LIMIT ? OFFSET ?",
            clause
        );

        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = match bind {
                BindValue::Text(v) => query.bind(v.clone()),
                BindValue::Real(v) => query.bind(*v),
            };
        }
        let rows = query
            .bind(window.limit)
            .bind(window.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch products: {}", e)))?;

        rows.iter().map(product_from_row).collect()
    }

    /// Pre-pagination match count for the same filter, recomputed per call.
    pub async fn count_products(&self, filter: &ProductFilter) -> Result<i64> {
        let (clause, binds) = filter_clause(filter);
        let sql = format!("SELECT COUNT(*) as count FROM products{}", clause);

        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = match bind {
                BindValue::Text(v) => query.bind(v.clone()),
                BindValue::Real(v) => query.bind(*v),
            };
        }
        let row = query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to count products: {}", e)))?;

        Ok(row.get("count"))
    }
}

/// Builds the WHERE clause for a listing filter, with anonymous `?`
/// placeholders and their bind values in order. An empty filter yields an
/// empty clause.
fn filter_clause(filter: &ProductFilter) -> (String, Vec<BindValue>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut binds: Vec<BindValue> = Vec::new();

    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        conditions.push("(name LIKE ? OR description LIKE ?)".to_string());
        binds.push(BindValue::Text(pattern.clone()));
        binds.push(BindValue::Text(pattern));
    }

    if !filter.categories.is_empty() {
        let placeholders = vec!["?"; filter.categories.len()].join(", ");
        conditions.push(format!("category IN ({})", placeholders));
        for category in &filter.categories {
            binds.push(BindValue::Text(category.clone()));
        }
    }

    if let Some(min) = filter.min_price {
        conditions.push("price >= ?".to_string());
        binds.push(BindValue::Real(min));
    }
    if let Some(max) = filter.max_price {
        conditions.push("price <= ?".to_string());
        binds.push(BindValue::Real(max));
    }

    if conditions.is_empty() {
        (String::new(), binds)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), binds)
    }
}

fn format_timestamp(ts: &chrono::DateTime<chrono::Utc>) -> String {
    // Fixed precision keeps the TEXT column ordering consistent with time.
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn product_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Product> {
    Ok(Product {
        id: Uuid::parse_str(&row.get::<String, _>("id"))
            .map_err(|e| AppError::DatabaseError(format!("Invalid product ID: {}", e)))?,
        name: row.get("name"),
        category: row.get("category"),
        price: row.get("price"),
        description: row.get("description"),
        image: row.get("image"),
        created_at: chrono::DateTime::parse_from_rfc3339(&row.get::<String, _>("created_at"))
            .map_err(|e| AppError::DatabaseError(format!("Invalid created_at date: {}", e)))?
            .with_timezone(&chrono::Utc),
        updated_at: chrono::DateTime::parse_from_rfc3339(&row.get::<String, _>("updated_at"))
            .map_err(|e| AppError::DatabaseError(format!("Invalid updated_at date: {}", e)))?
            .with_timezone(&chrono::Utc),
    })
}
