//! Material records, request payloads, and field validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

/// Lowest admissible buy price. Enforced on create and on the merged record
/// of every update.
pub const BUY_PRICE_FLOOR: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "material_type", rename_all = "lowercase")]
pub enum MaterialType {
    Fabric,
    Jeans,
    Cotton,
}

impl MaterialType {
    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s {
            "fabric" => Ok(MaterialType::Fabric),
            "jeans" => Ok(MaterialType::Jeans),
            "cotton" => Ok(MaterialType::Cotton),
            other => Err(AppError::Validation(format!(
                "material_type must be one of fabric, jeans, cotton (got '{}')",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialType::Fabric => "fabric",
            MaterialType::Jeans => "jeans",
            MaterialType::Cotton => "cotton",
        }
    }
}

/// A persisted material row.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Material {
    pub id: i64,
    pub material_code: String,
    pub name: String,
    pub material_type: MaterialType,
    pub buy_price: f64,
    pub supplier_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A material as served by the API: supplier name denormalized inline,
/// audit timestamps omitted.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct MaterialRecord {
    pub id: i64,
    pub material_code: String,
    pub name: String,
    pub material_type: MaterialType,
    pub buy_price: f64,
    pub supplier_id: i64,
    pub supplier_name: String,
}

/// Referenced supplier row. Owned by the contacts subsystem; this service
/// only reads it and offers a minimal insert for bootstrap and tests.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A fully specified material, ready to insert once validated.
#[derive(Clone, Debug)]
pub struct MaterialDraft {
    pub material_code: String,
    pub name: String,
    pub material_type: MaterialType,
    pub buy_price: f64,
    pub supplier_id: i64,
}

impl MaterialDraft {
    /// Build a draft from a request body. Every field is required; absent,
    /// null, or empty values are rejected per field.
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, AppError> {
        Ok(MaterialDraft {
            material_code: required_string(body, "material_code")?,
            name: required_string(body, "name")?,
            material_type: MaterialType::parse(&required_string(body, "material_type")?)?,
            buy_price: required_number(body, "buy_price")?,
            supplier_id: required_integer(body, "supplier_id")?,
        })
    }

    /// Field-level rules that need no database access.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.buy_price < BUY_PRICE_FLOOR {
            return Err(AppError::Validation(format!(
                "material buy price cannot be less than {}",
                BUY_PRICE_FLOOR
            )));
        }
        Ok(())
    }
}

/// A partial update. Absent fields keep their current values.
#[derive(Clone, Debug, Default)]
pub struct MaterialPatch {
    pub material_code: Option<String>,
    pub name: Option<String>,
    pub material_type: Option<MaterialType>,
    pub buy_price: Option<f64>,
    pub supplier_id: Option<i64>,
}

impl MaterialPatch {
    /// Build a patch from a request body. Fields that are present must be
    /// well-typed; null counts as absent.
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, AppError> {
        Ok(MaterialPatch {
            material_code: optional_string(body, "material_code")?,
            name: optional_string(body, "name")?,
            material_type: optional_string(body, "material_type")?
                .map(|s| MaterialType::parse(&s))
                .transpose()?,
            buy_price: optional_number(body, "buy_price")?,
            supplier_id: optional_integer(body, "supplier_id")?,
        })
    }

    /// Merge the patch over the current row into a full draft, which is then
    /// validated under the same rules as a create.
    pub fn apply(&self, current: &Material) -> MaterialDraft {
        MaterialDraft {
            material_code: self
                .material_code
                .clone()
                .unwrap_or_else(|| current.material_code.clone()),
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            material_type: self.material_type.unwrap_or(current.material_type),
            buy_price: self.buy_price.unwrap_or(current.buy_price),
            supplier_id: self.supplier_id.unwrap_or(current.supplier_id),
        }
    }
}

fn required_string(body: &Map<String, Value>, field: &'static str) -> Result<String, AppError> {
    match body.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::String(_)) | Some(Value::Null) | None => Err(AppError::RequiredField(field)),
        Some(_) => Err(AppError::Validation(format!("{} must be a string", field))),
    }
}

fn required_number(body: &Map<String, Value>, field: &'static str) -> Result<f64, AppError> {
    match body.get(field) {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| AppError::Validation(format!("{} must be a number", field))),
        Some(Value::Null) | None => Err(AppError::RequiredField(field)),
        Some(_) => Err(AppError::Validation(format!("{} must be a number", field))),
    }
}

fn required_integer(body: &Map<String, Value>, field: &'static str) -> Result<i64, AppError> {
    match body.get(field) {
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| AppError::Validation(format!("{} must be an integer", field))),
        Some(Value::Null) | None => Err(AppError::RequiredField(field)),
        Some(_) => Err(AppError::Validation(format!("{} must be an integer", field))),
    }
}

fn optional_string(
    body: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, AppError> {
    match body.get(field) {
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Null) | None => Ok(None),
        Some(_) => Err(AppError::Validation(format!("{} must be a string", field))),
    }
}

fn optional_number(body: &Map<String, Value>, field: &'static str) -> Result<Option<f64>, AppError> {
    match body.get(field) {
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("{} must be a number", field))),
        Some(Value::Null) | None => Ok(None),
        Some(_) => Err(AppError::Validation(format!("{} must be a number", field))),
    }
}

fn optional_integer(
    body: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<i64>, AppError> {
    match body.get(field) {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("{} must be an integer", field))),
        Some(Value::Null) | None => Ok(None),
        Some(_) => Err(AppError::Validation(format!("{} must be an integer", field))),
    }
}
