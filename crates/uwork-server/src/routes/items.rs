use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use uwork_core::{Axis, CoreError, Item, Status, UpdateFields};

use crate::error::AppError;
use crate::state::AppState;

/// Run a blocking service call off the async executor (the store is a
/// synchronous SQLite connection).
async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?
        .map_err(AppError::from)
}

fn parse_axes(raw: &[String]) -> Result<Vec<Axis>, CoreError> {
    raw.iter().map(|a| a.parse()).collect()
}

/// GET /api/items — all items, newest first.
pub async fn list_items(State(app): State<AppState>) -> Result<Json<Vec<Item>>, AppError> {
    let service = app.service.clone();
    let items = blocking(move || service.list(None)).await?;
    Ok(Json(items))
}

/// GET /api/items/:status — items filtered by status. The REST filter is
/// strict: only the two statuses are valid path segments ("all" belongs to
/// the service/tool surface, not this route).
pub async fn list_by_status(
    State(app): State<AppState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<Item>>, AppError> {
    let status: Status = status.parse()?;
    let service = app.service.clone();
    let items = blocking(move || service.list(Some(status.as_str()))).await?;
    Ok(Json(items))
}

#[derive(serde::Deserialize)]
pub struct CreateItemBody {
    pub text: Option<String>,
    pub axes: Option<Vec<String>>,
    pub status: Option<String>,
}

/// POST /api/items — create an item.
pub async fn create_item(
    State(app): State<AppState>,
    Json(body): Json<CreateItemBody>,
) -> Result<(StatusCode, Json<Item>), AppError> {
    let (Some(text), Some(axes), Some(status)) = (body.text, body.axes, body.status) else {
        return Err(AppError::bad_request("Missing required fields"));
    };

    let service = app.service.clone();
    let item = blocking(move || {
        let axes = parse_axes(&axes)?;
        let status = status.parse()?;
        service.create(&text, &axes, status)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

#[derive(serde::Deserialize)]
pub struct UpdateItemBody {
    pub text: Option<String>,
    pub axes: Option<Vec<String>>,
    pub status: Option<String>,
}

/// PUT /api/items/:id — partial update; absent fields keep their prior value.
pub async fn update_item(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateItemBody>,
) -> Result<Json<Item>, AppError> {
    // A non-numeric id cannot reference any row.
    let id: i64 = id.parse().map_err(|_| AppError::not_found("Item not found"))?;

    let service = app.service.clone();
    let item = blocking(move || {
        let fields = UpdateFields {
            text: body.text,
            axes: body.axes.as_deref().map(parse_axes).transpose()?,
            status: body.status.as_deref().map(|s| s.parse::<Status>()).transpose()?,
        };
        service.update(id, fields)
    })
    .await?;

    Ok(Json(item))
}

/// DELETE /api/items/:id — remove an item permanently.
pub async fn delete_item(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id: i64 = id.parse().map_err(|_| AppError::not_found("Item not found"))?;

    let service = app.service.clone();
    blocking(move || service.remove(id)).await?;

    Ok(StatusCode::NO_CONTENT)
}
