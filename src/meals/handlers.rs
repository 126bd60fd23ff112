use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::{
    json_body, CreateMealBody, DeletedMealResponse, MealBody, MealInput, MealResponse,
    MealsResponse, MetricsResponse, UpdatedMealResponse,
};
use super::services;
use crate::{
    error::AppError,
    session::{session_cookie, MaybeSession, RequireSession},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/allMeals", get(list_meals))
        .route("/metrics", get(get_metrics))
        .route("/", post(create_meal))
        .route("/:id", get(get_meal).put(update_meal).delete(delete_meal))
}

#[instrument(skip(state, session), fields(session = %session.0))]
pub async fn list_meals(
    State(state): State<AppState>,
    session: RequireSession,
) -> Result<Json<MealsResponse>, AppError> {
    let meals = services::list(state.store.as_ref(), session.0).await?;
    Ok(Json(MealsResponse { meals }))
}

#[instrument(skip(state, session), fields(session = %session.0))]
pub async fn get_meal(
    State(state): State<AppState>,
    session: RequireSession,
    Path(id): Path<String>,
) -> Result<Json<MealResponse>, AppError> {
    let meal = services::get(state.store.as_ref(), session.0, &id).await?;
    Ok(Json(MealResponse { meal }))
}

#[instrument(skip(state, session), fields(session = %session.0))]
pub async fn get_metrics(
    State(state): State<AppState>,
    session: RequireSession,
) -> Result<Json<MetricsResponse>, AppError> {
    let metrics = services::metrics(state.store.as_ref(), session.0).await?;
    Ok(Json(metrics.into()))
}

/// POST /meal. Issues a session cookie when the client has none.
#[instrument(skip(state, session, body))]
pub async fn create_meal(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    body: Result<Json<CreateMealBody>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap), AppError> {
    let body = json_body(body)?;
    let input = MealInput::new(body.name, body.description, body.diet_compliant)?;

    let created = services::create(state.store.as_ref(), session, input, body.date).await?;

    let mut headers = HeaderMap::new();
    let location = HeaderValue::from_str(&format!("/meal/{}", created.meal.id))
        .map_err(anyhow::Error::from)?;
    headers.insert(header::LOCATION, location);
    if created.session_minted {
        headers.insert(
            header::SET_COOKIE,
            session_cookie(created.session, state.config.session.max_age())?,
        );
    }
    Ok((StatusCode::CREATED, headers))
}

#[instrument(skip(state, session, body), fields(session = %session.0))]
pub async fn update_meal(
    State(state): State<AppState>,
    session: RequireSession,
    Path(id): Path<String>,
    body: Result<Json<MealBody>, JsonRejection>,
) -> Result<Json<UpdatedMealResponse>, AppError> {
    let input = MealInput::try_from(json_body(body)?)?;
    let updated_meal = services::update(state.store.as_ref(), session.0, &id, input).await?;
    Ok(Json(UpdatedMealResponse { updated_meal }))
}

#[instrument(skip(state, session), fields(session = %session.0))]
pub async fn delete_meal(
    State(state): State<AppState>,
    session: RequireSession,
    Path(id): Path<String>,
) -> Result<Json<DeletedMealResponse>, AppError> {
    let deleted_meal = services::delete(state.store.as_ref(), session.0, &id).await?;
    Ok(Json(DeletedMealResponse { deleted_meal }))
}
