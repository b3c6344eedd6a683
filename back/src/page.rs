use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tera::{Context, Tera};
use thiserror::Error;
use todo_api::v1::{Board, Todo, TodoId};
use tracing::error;

use crate::{store::StoreError, AppState};

const INDEX: &str = "index.html";

pub fn templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_template(INDEX, include_str!("../templates/index.html"))?;
    Ok(tera)
}

pub fn render(tera: &Tera, todos: &[Todo]) -> Result<String, tera::Error> {
    let mut context = Context::new();
    context.insert("board", &Board::new(todos));
    tera.render(INDEX, &context)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/todos", post(add_todo))
        .route("/todos/complete", post(complete_todo))
        .route("/todos/delete", post(delete_todo))
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to render page: {0}")]
    Render(#[from] tera::Error),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            Self::Store(err) => err.into_response(),
            Self::Render(err) => {
                error!(error = ?err, "failed to render page");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

// missing fields are treated like empty ones
#[derive(Debug, Deserialize)]
struct AddForm {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct IdForm {
    #[serde(default)]
    id: String,
}

impl IdForm {
    fn id(self) -> Option<TodoId> {
        (!self.id.is_empty()).then(|| TodoId::from(self.id))
    }
}

async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, PageError> {
    let todos = state.todos().await?;
    Ok(Html(render(state.templates(), &todos)?))
}

async fn add_todo(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddForm>,
) -> Result<Redirect, StoreError> {
    state.add_todo(&form.text).await?;
    Ok(Redirect::to("/"))
}

async fn complete_todo(
    State(state): State<Arc<AppState>>,
    Form(form): Form<IdForm>,
) -> Result<Redirect, StoreError> {
    if let Some(id) = form.id() {
        state.complete_todo(&id).await?;
    }

    Ok(Redirect::to("/"))
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Form(form): Form<IdForm>,
) -> Result<Redirect, StoreError> {
    if let Some(id) = form.id() {
        state.soft_delete_todo(&id).await?;
    }

    Ok(Redirect::to("/"))
}
