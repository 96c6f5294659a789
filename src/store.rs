//! Material persistence against PostgreSQL.
//!
//! Every write runs in its own transaction: explicit commit on success,
//! rollback by drop on any error, so a rejected write leaves no trace.

use sqlx::{ConnectOptions, PgPool, Postgres, Transaction};
use std::str::FromStr;

use crate::error::AppError;
use crate::model::{Material, MaterialDraft, MaterialPatch, MaterialRecord, MaterialType, Supplier};

const SELECT_RECORD: &str = "SELECT m.id, m.material_code, m.name, m.material_type, m.buy_price, \
     m.supplier_id, s.name AS supplier_name \
     FROM materials m JOIN suppliers s ON s.id = m.supplier_id";

pub struct MaterialStore;

impl MaterialStore {
    /// List materials, optionally restricted to one type, in insertion order.
    /// Supplier names come along via the join.
    pub async fn search(
        pool: &PgPool,
        material_type: Option<MaterialType>,
    ) -> Result<Vec<MaterialRecord>, AppError> {
        let rows = match material_type {
            Some(t) => {
                let sql = format!("{} WHERE m.material_type = $1 ORDER BY m.id", SELECT_RECORD);
                sqlx::query_as::<_, MaterialRecord>(&sql)
                    .bind(t)
                    .fetch_all(pool)
                    .await?
            }
            None => {
                let sql = format!("{} ORDER BY m.id", SELECT_RECORD);
                sqlx::query_as::<_, MaterialRecord>(&sql).fetch_all(pool).await?
            }
        };
        Ok(rows)
    }

    /// Fetch one material by id, supplier name included.
    pub async fn fetch(pool: &PgPool, id: i64) -> Result<MaterialRecord, AppError> {
        let sql = format!("{} WHERE m.id = $1", SELECT_RECORD);
        sqlx::query_as::<_, MaterialRecord>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or(AppError::NotFound("material"))
    }

    /// Validate and insert a new material. Fails without writing when a
    /// required rule is broken: price floor, supplier existence, code
    /// uniqueness.
    pub async fn create(pool: &PgPool, draft: &MaterialDraft) -> Result<Material, AppError> {
        draft.validate()?;
        let mut tx = pool.begin().await?;
        Self::check_supplier(&mut tx, draft.supplier_id).await?;
        Self::check_code_free(&mut tx, &draft.material_code, None).await?;
        let material = sqlx::query_as::<_, Material>(
            "INSERT INTO materials (material_code, name, material_type, buy_price, supplier_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&draft.material_code)
        .bind(&draft.name)
        .bind(draft.material_type)
        .bind(draft.buy_price)
        .bind(draft.supplier_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;
        tx.commit().await?;
        tracing::info!(id = material.id, code = %material.material_code, "material created");
        Ok(material)
    }

    /// Merge a partial update over the current row and re-validate the result
    /// under the same rules as a create. Unspecified fields keep their prior
    /// values; the uniqueness check excludes the row itself.
    pub async fn update(pool: &PgPool, id: i64, patch: &MaterialPatch) -> Result<Material, AppError> {
        let mut tx = pool.begin().await?;
        let current = sqlx::query_as::<_, Material>("SELECT * FROM materials WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound("material"))?;
        let merged = patch.apply(&current);
        merged.validate()?;
        Self::check_supplier(&mut tx, merged.supplier_id).await?;
        Self::check_code_free(&mut tx, &merged.material_code, Some(id)).await?;
        let material = sqlx::query_as::<_, Material>(
            "UPDATE materials SET material_code = $1, name = $2, material_type = $3, \
             buy_price = $4, supplier_id = $5, updated_at = NOW() WHERE id = $6 RETURNING *",
        )
        .bind(&merged.material_code)
        .bind(&merged.name)
        .bind(merged.material_type)
        .bind(merged.buy_price)
        .bind(merged.supplier_id)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;
        tx.commit().await?;
        tracing::info!(id, "material updated");
        Ok(material)
    }

    /// Permanently remove a material.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;
        let result = sqlx::query("DELETE FROM materials WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("material"));
        }
        tx.commit().await?;
        tracing::info!(id, "material deleted");
        Ok(())
    }

    /// Minimal supplier insert. The contacts subsystem owns suppliers in a
    /// full deployment; this exists for bootstrap and integration tests.
    pub async fn create_supplier(
        pool: &PgPool,
        name: &str,
        email: Option<&str>,
    ) -> Result<Supplier, AppError> {
        let supplier = sqlx::query_as::<_, Supplier>(
            "INSERT INTO suppliers (name, email) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(email)
        .fetch_one(pool)
        .await?;
        Ok(supplier)
    }

    async fn check_supplier(
        tx: &mut Transaction<'_, Postgres>,
        supplier_id: i64,
    ) -> Result<(), AppError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = $1)")
                .bind(supplier_id)
                .fetch_one(&mut **tx)
                .await?;
        if !exists.0 {
            return Err(AppError::Validation(format!(
                "supplier {} does not exist",
                supplier_id
            )));
        }
        Ok(())
    }

    async fn check_code_free(
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
        exclude: Option<i64>,
    ) -> Result<(), AppError> {
        let taken: (bool,) = match exclude {
            Some(id) => {
                sqlx::query_as(
                    "SELECT EXISTS(SELECT 1 FROM materials WHERE material_code = $1 AND id <> $2)",
                )
                .bind(code)
                .bind(id)
                .fetch_one(&mut **tx)
                .await?
            }
            None => {
                sqlx::query_as("SELECT EXISTS(SELECT 1 FROM materials WHERE material_code = $1)")
                    .bind(code)
                    .fetch_one(&mut **tx)
                    .await?
            }
        };
        if taken.0 {
            return Err(AppError::Conflict(format!(
                "material code '{}' already exists",
                code
            )));
        }
        Ok(())
    }
}

/// Concurrent writers can slip past the pre-checks; the table constraints are
/// the final arbiter, and their violations map back onto the same error kinds.
fn map_write_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error() {
        match db.code().as_deref() {
            Some("23505") => return AppError::Conflict("material code must be unique".into()),
            Some("23503") => return AppError::Validation("supplier does not exist".into()),
            _ => {}
        }
    }
    AppError::Db(e)
}

/// Ensure the database named in `database_url` exists; create it if not.
/// Connects to the default `postgres` database to run CREATE DATABASE. Call
/// before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = split_db_name(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await.map_err(AppError::Db)?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "created database");
    }
    Ok(())
}

fn split_db_name(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres", base), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}
