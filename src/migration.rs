//! Schema DDL applied at startup. Idempotent: safe to run on every boot.

use sqlx::PgPool;

use crate::error::AppError;

/// Create the `material_type` enum and the `suppliers` and `materials`
/// tables. The suppliers table belongs to the contacts subsystem in a full
/// deployment; it is created here too so the service can run standalone.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    // CREATE TYPE has no IF NOT EXISTS; an already existing type is fine.
    let _ = sqlx::query("CREATE TYPE material_type AS ENUM ('fabric', 'jeans', 'cotton')")
        .execute(pool)
        .await;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS suppliers (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS materials (
            id BIGSERIAL PRIMARY KEY,
            material_code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            material_type material_type NOT NULL,
            buy_price DOUBLE PRECISION NOT NULL,
            supplier_id BIGINT NOT NULL REFERENCES suppliers(id),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
