mod page;
mod store;
mod v1;

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use tera::Tera;
use todo_api::v1::{self as api, Todo, TodoId, TodoStatus};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::store::{Store, StoreError};

const PORT: u16 = 7890;

#[derive(Debug, Parser)]
#[command(about = "Single-user todo list served over HTTP")]
struct Args {
    /// File holding the todo list. A `.ron` extension selects RON, anything
    /// else JSON.
    #[arg(long, env = "TODO_DATA_FILE", default_value = "data/todos.json")]
    data_file: PathBuf,

    #[arg(long, env = "TODO_PORT", default_value_t = PORT)]
    port: u16,

    /// PEM certificate; serves TLS when given together with `--key`.
    #[arg(long, env = "SSL_CERT", requires = "key")]
    cert: Option<PathBuf>,

    #[arg(long, env = "SSL_KEY", requires = "cert")]
    key: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let store = Store::new(args.data_file);
    info!(
        path = %store.path().display(),
        format = ?store.format(),
        "using todo file"
    );

    let state = Arc::new(AppState::new(store)?);
    let app = app(state);
    let addr = SocketAddr::from(([0; 4], args.port));

    match (args.cert, args.key) {
        (Some(cert), Some(key)) => {
            let config = RustlsConfig::from_pem_file(cert, key).await?;

            info!(%addr, "listening with tls");
            axum_server::bind_rustls(addr, config)
                .serve(app.into_make_service())
                .await?;
        }
        _ => {
            info!(%addr, "listening");
            axum_server::bind(addr)
                .serve(app.into_make_service())
                .await?;
        }
    }

    Ok(())
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(page::router())
        .nest("/api/v1", v1::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Each mutation is a full load, change, save of the todo file. The `writes`
/// lock keeps requests in this process from interleaving; other processes
/// writing the same file still race and the last save wins.
#[derive(Debug)]
pub struct AppState {
    store: Store,
    templates: Tera,
    writes: Mutex<()>,
}

impl AppState {
    pub fn new(store: Store) -> Result<Self, tera::Error> {
        Ok(Self {
            store,
            templates: page::templates()?,
            writes: Mutex::new(()),
        })
    }

    pub fn templates(&self) -> &Tera {
        &self.templates
    }

    pub async fn todos(&self) -> Result<Vec<Todo>, StoreError> {
        let _writes = self.writes.lock().await;
        self.store.load()
    }

    /// Prepends a new active todo. Blank text is ignored and leaves the file
    /// untouched.
    pub async fn add_todo(&self, text: &str) -> Result<Option<Todo>, StoreError> {
        let Some(todo) = Todo::new(text) else {
            debug!("ignoring blank todo");
            return Ok(None);
        };

        let _writes = self.writes.lock().await;
        let mut todos = self.store.load()?;
        todos.insert(0, todo.clone());
        self.store.save(&todos)?;

        info!(
            id = %todo.id,
            text = %todo.text,
            "created todo"
        );

        Ok(Some(todo))
    }

    pub async fn complete_todo(&self, id: &TodoId) -> Result<bool, StoreError> {
        self.set_todo_status(id, TodoStatus::Completed).await
    }

    pub async fn soft_delete_todo(&self, id: &TodoId) -> Result<bool, StoreError> {
        self.set_todo_status(id, TodoStatus::SoftDeleted).await
    }

    async fn set_todo_status(&self, id: &TodoId, status: TodoStatus) -> Result<bool, StoreError> {
        let _writes = self.writes.lock().await;
        let mut todos = self.store.load()?;

        // unknown ids don't rewrite the file
        if !api::set_status(&mut todos, id, status) {
            debug!(%id, "no todo with id");
            return Ok(false);
        }

        self.store.save(&todos)?;

        info!(
            %id,
            ?status,
            "updated todo status"
        );

        Ok(true)
    }
}

#[cfg(test)]
pub(crate) fn test_state(dir: &tempfile::TempDir) -> Arc<AppState> {
    let store = Store::new(dir.path().join("todos.json"));
    Arc::new(AppState::new(store).unwrap())
}
