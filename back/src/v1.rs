use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use todo_api::v1::{Todo, TodoId};

use crate::{store::StoreError, AppState};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/todos", get(get_todos).post(add_todo))
        .route("/todos/:id/complete", post(complete_todo))
        .route("/todos/:id/delete", post(delete_todo))
}

#[derive(Debug, Deserialize)]
struct NewTodo {
    #[serde(default)]
    text: String,
}

async fn get_todos(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Todo>>, StoreError> {
    Ok(Json(state.todos().await?))
}

async fn add_todo(
    State(state): State<Arc<AppState>>,
    Json(todo): Json<NewTodo>,
) -> Result<Json<Option<Todo>>, StoreError> {
    Ok(Json(state.add_todo(&todo.text).await?))
}

async fn complete_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Todo>>, StoreError> {
    state.complete_todo(&TodoId::from(id)).await?;
    Ok(Json(state.todos().await?))
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Todo>>, StoreError> {
    state.soft_delete_todo(&TodoId::from(id)).await?;
    Ok(Json(state.todos().await?))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde::de::DeserializeOwned;
    use todo_api::v1::{Todo, TodoStatus};
    use tower::ServiceExt;

    use crate::{app, test_state};

    async fn send(app: axum::Router, method: &str, uri: &str, body: Option<&str>) -> Response {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_owned())),
            None => request.body(Body::empty()),
        };

        app.oneshot(request.unwrap()).await.unwrap()
    }

    async fn json<T: DeserializeOwned>(response: Response) -> T {
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn add_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let a: Option<Todo> = json(
            send(app(state.clone()), "POST", "/api/v1/todos", Some(r#"{"text":"a"}"#)).await,
        )
        .await;
        let a = a.unwrap();
        assert_eq!(a.text, "a");
        assert_eq!(a.status, TodoStatus::Active);

        send(app(state.clone()), "POST", "/api/v1/todos", Some(r#"{"text":"b"}"#)).await;

        let todos: Vec<Todo> =
            json(send(app(state), "GET", "/api/v1/todos", None).await).await;
        let texts: Vec<_> = todos.iter().map(|todo| todo.text.as_str()).collect();
        assert_eq!(texts, ["b", "a"]);
    }

    #[tokio::test]
    async fn blank_todo_is_null() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let created: Option<Todo> = json(
            send(app(state.clone()), "POST", "/api/v1/todos", Some(r#"{"text":"  "}"#)).await,
        )
        .await;

        assert!(created.is_none());
        assert!(state.todos().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn complete_and_delete_by_path() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let a = state.add_todo("a").await.unwrap().unwrap();
        let b = state.add_todo("b").await.unwrap().unwrap();

        let uri = format!("/api/v1/todos/{}/complete", a.id);
        let todos: Vec<Todo> =
            json(send(app(state.clone()), "POST", &uri, None).await).await;
        assert_eq!(todos[1].status, TodoStatus::Completed);

        let uri = format!("/api/v1/todos/{}/delete", b.id);
        let todos: Vec<Todo> =
            json(send(app(state.clone()), "POST", &uri, None).await).await;
        assert_eq!(todos[0].status, TodoStatus::SoftDeleted);
        assert_eq!(todos[1].status, TodoStatus::Completed);

        let todos: Vec<Todo> =
            json(send(app(state), "POST", "/api/v1/todos/unknown/complete", None).await).await;
        assert_eq!(todos.len(), 2);
    }
}
