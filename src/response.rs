//! Standard response envelopes. Every endpoint answers with one of these shapes.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct ListBody<T> {
    pub status: &'static str,
    pub data: Vec<T>,
}

#[derive(Serialize)]
pub struct CreatedBody {
    pub status: &'static str,
    pub id: i64,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct MessageBody {
    pub status: &'static str,
    pub message: String,
}

impl MessageBody {
    pub fn success(message: impl Into<String>) -> Self {
        MessageBody {
            status: "success",
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        MessageBody {
            status: "error",
            message: message.into(),
        }
    }
}

pub fn success_list<T: Serialize>(data: Vec<T>) -> Json<ListBody<T>> {
    Json(ListBody {
        status: "success",
        data,
    })
}

pub fn success_created(id: i64, message: &'static str) -> Json<CreatedBody> {
    Json(CreatedBody {
        status: "success",
        id,
        message,
    })
}
