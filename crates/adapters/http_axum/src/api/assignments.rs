//! JSON REST handlers for service assignments.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use smartmon_app::ports::{AssignmentRepository, LabelRepository, UnitOfWorkFactory};
use smartmon_domain::assignment::{AssignmentUpdate, NewAssignment};
use smartmon_domain::error::MonitorError;
use smartmon_domain::page::Page;
use smartmon_domain::view::AssignmentView;

use crate::error::ApiError;
use crate::state::AppState;

/// Query string accepted by the list endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub label: Option<String>,
    pub page_size: Option<i64>,
    pub page_number: Option<i64>,
}

impl ListQuery {
    /// The label filter, ignored when blank.
    fn label(&self) -> Option<&str> {
        self.label.as_deref().filter(|label| !label.trim().is_empty())
    }

    fn page(&self, default_size: u32) -> Result<Page, ApiError> {
        let size = self.page_size.unwrap_or_else(|| i64::from(default_size));
        let number = self.page_number.unwrap_or(1);
        Page::new(size, number).map_err(|err| ApiError::from(MonitorError::from(err)))
    }
}

/// Request body for creating an assignment.
#[derive(Debug, Deserialize)]
pub struct CreateAssignmentRequest {
    pub name: Option<String>,
    pub port: Option<i64>,
    pub maintainer: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl CreateAssignmentRequest {
    fn into_new_assignment(self) -> Result<NewAssignment, ApiError> {
        let mut builder = NewAssignment::builder().labels(self.labels);
        if let Some(name) = self.name {
            builder = builder.name(name);
        }
        if let Some(port) = self.port {
            builder = builder.port(port);
        }
        if let Some(maintainer) = self.maintainer {
            builder = builder.maintainer(maintainer);
        }
        Ok(builder.build()?)
    }
}

/// Request body for updating an assignment.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub port: Option<i64>,
    pub maintainer: Option<String>,
    pub labels: Option<Vec<String>>,
}

impl UpdateAssignmentRequest {
    fn into_update(self) -> AssignmentUpdate {
        let mut builder = AssignmentUpdate::builder();
        if let Some(port) = self.port {
            builder = builder.port(port);
        }
        if let Some(maintainer) = self.maintainer {
            builder = builder.maintainer(maintainer);
        }
        if let Some(labels) = self.labels {
            builder = builder.labels(labels);
        }
        builder.build()
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<AssignmentView>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from endpoints returning a single assignment.
pub enum AssignmentResponse {
    Ok(Json<AssignmentView>),
}

impl IntoResponse for AssignmentResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /services?label=&pageSize=&pageNumber=`
pub async fn list<AR, LR, UF>(
    State(state): State<AppState<AR, LR, UF>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<ListResponse, ApiError>
where
    AR: AssignmentRepository + Send + Sync + 'static,
    LR: LabelRepository + Send + Sync + 'static,
    UF: UnitOfWorkFactory + Send + Sync + 'static,
{
    let Query(query) = query?;
    let views = match query.label() {
        Some(label) => state.assignment_service.get_by_label(label).await?,
        None => {
            let page = query.page(state.default_page_size)?;
            state.assignment_service.list_assignments(page).await?
        }
    };
    Ok(ListResponse::Ok(Json(views)))
}

/// `GET /services/{name}`
pub async fn get<AR, LR, UF>(
    State(state): State<AppState<AR, LR, UF>>,
    Path(name): Path<String>,
) -> Result<AssignmentResponse, ApiError>
where
    AR: AssignmentRepository + Send + Sync + 'static,
    LR: LabelRepository + Send + Sync + 'static,
    UF: UnitOfWorkFactory + Send + Sync + 'static,
{
    let view = state.assignment_service.get_by_name(&name).await?;
    Ok(AssignmentResponse::Ok(Json(view)))
}

/// `POST /services`
pub async fn create<AR, LR, UF>(
    State(state): State<AppState<AR, LR, UF>>,
    body: Result<Json<CreateAssignmentRequest>, JsonRejection>,
) -> Result<AssignmentResponse, ApiError>
where
    AR: AssignmentRepository + Send + Sync + 'static,
    LR: LabelRepository + Send + Sync + 'static,
    UF: UnitOfWorkFactory + Send + Sync + 'static,
{
    let Json(req) = body?;
    let new = req.into_new_assignment()?;
    let view = state.assignment_service.create_assignment(new).await?;
    Ok(AssignmentResponse::Ok(Json(view)))
}

/// `PUT /services/{name}`
pub async fn update<AR, LR, UF>(
    State(state): State<AppState<AR, LR, UF>>,
    Path(name): Path<String>,
    body: Result<Json<UpdateAssignmentRequest>, JsonRejection>,
) -> Result<AssignmentResponse, ApiError>
where
    AR: AssignmentRepository + Send + Sync + 'static,
    LR: LabelRepository + Send + Sync + 'static,
    UF: UnitOfWorkFactory + Send + Sync + 'static,
{
    let Json(req) = body?;
    let update = req.into_update();
    let view = state
        .assignment_service
        .update_assignment(&name, update)
        .await?;
    Ok(AssignmentResponse::Ok(Json(view)))
}

/// `DELETE /services/{name}`
pub async fn delete<AR, LR, UF>(
    State(state): State<AppState<AR, LR, UF>>,
    Path(name): Path<String>,
) -> Result<AssignmentResponse, ApiError>
where
    AR: AssignmentRepository + Send + Sync + 'static,
    LR: LabelRepository + Send + Sync + 'static,
    UF: UnitOfWorkFactory + Send + Sync + 'static,
{
    let view = state.assignment_service.delete_assignment(&name).await?;
    Ok(AssignmentResponse::Ok(Json(view)))
}
