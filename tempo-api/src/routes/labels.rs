/// Label catalog endpoints
///
/// Reads are public so the frontend can render the taxonomy before sign-in;
/// writes are admin-only. Seeded default labels cannot be deleted.
///
/// # Endpoints
///
/// - `GET /labels` (`type` filter) / `GET /labels/:id` - Public
/// - `POST /labels` / `PUT /labels/:id` / `DELETE /labels/:id` - Admin

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use tempo_shared::models::label::{CreateLabel, Label, LabelType};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

#[derive(Debug, Deserialize)]
pub struct ListLabelsQuery {
    #[serde(rename = "type")]
    pub label_type: Option<LabelType>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLabelRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[serde(default = "default_color")]
    #[validate(length(max = 16, message = "Color too long"))]
    pub color: String,

    #[serde(rename = "type")]
    pub label_type: LabelType,

    #[serde(default = "default_icon")]
    pub icon: String,

    pub description: Option<String>,

    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLabelRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 16, message = "Color too long"))]
    pub color: Option<String>,

    #[serde(rename = "type")]
    pub label_type: Option<LabelType>,

    pub icon: Option<String>,
    pub description: Option<String>,
}

fn default_color() -> String {
    "#3B82F6".to_string()
}

fn default_icon() -> String {
    "mdi:label".to_string()
}

pub async fn list_labels(
    State(state): State<AppState>,
    Query(query): Query<ListLabelsQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let labels = Label::list(&state.db, query.label_type).await?;
    Ok(Json(json!({ "labels": labels })))
}

pub async fn get_label(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let label = Label::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Label not found".to_string()))?;

    Ok(Json(json!({ "label": label })))
}

pub async fn create_label(
    State(state): State<AppState>,
    Json(body): Json<CreateLabelRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    body.validate()?;

    let label = Label::create(
        &state.db,
        CreateLabel {
            name: body.name,
            color: body.color,
            label_type: body.label_type,
            icon: body.icon,
            description: body.description,
            is_default: body.is_default,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Label created successfully",
            "label": label,
        })),
    ))
}

pub async fn update_label(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateLabelRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    body.validate()?;

    let mut label = Label::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Label not found".to_string()))?;

    if let Some(name) = body.name {
        label.name = name;
    }
    if let Some(color) = body.color {
        label.color = color;
    }
    if let Some(label_type) = body.label_type {
        label.label_type = label_type;
    }
    if let Some(icon) = body.icon {
        label.icon = icon;
    }
    if let Some(description) = body.description {
        label.description = Some(description);
    }

    let saved = label.save(&state.db).await?;

    Ok(Json(json!({
        "message": "Label updated successfully",
        "label": saved,
    })))
}

pub async fn delete_label(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let label = Label::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Label not found".to_string()))?;

    if label.is_default {
        return Err(ApiError::BadRequest(
            "Default labels cannot be deleted".to_string(),
        ));
    }

    // Tasks referencing this label keep the dangling id; hydration drops it
    Label::delete(&state.db, id).await?;

    Ok(Json(json!({ "message": "Label deleted successfully" })))
}
