use std::{
    fs,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use todo_api::v1::Todo;
use tracing::error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed todo file {path:?}: {message}")]
    Format { path: PathBuf, message: String },
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        error!(error = %self, "todo store failed");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Ron,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ron") => Self::Ron,
            _ => Self::Json,
        }
    }
}

/// Whole-file persistence for the todo list.
///
/// Every `load` reads the full file and every `save` rewrites it. There is no
/// locking here, concurrent writers must be serialized by the caller.
#[derive(Clone, Debug)]
pub struct Store {
    path: PathBuf,
    format: Format,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = Format::from_path(&path);

        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Reads every todo, newest first. A file that doesn't exist yet is an
    /// empty list.
    pub fn load(&self) -> Result<Vec<Todo>, StoreError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(Vec::new());
            }
            Err(err) => return Err(self.io_error(err)),
        };
        let reader = BufReader::new(file);

        match self.format {
            Format::Json => serde_json::from_reader(reader).map_err(|err| self.json_error(err)),
            Format::Ron => ron::de::from_reader(reader).map_err(|err| self.ron_error(err.code)),
        }
    }

    /// Overwrites the file with `todos`, creating parent directories as needed.
    pub fn save(&self, todos: &[Todo]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
            }
        }

        let file = fs::File::create(&self.path).map_err(|err| self.io_error(err))?;
        let mut writer = BufWriter::new(file);

        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut writer, todos)
                    .map_err(|err| self.json_error(err))?;
            }
            Format::Ron => {
                let mut ron = ron::Serializer::new(&mut writer, Some(Default::default()))
                    .map_err(|err| self.ron_error(err))?;
                todos
                    .serialize(&mut ron)
                    .map_err(|err| self.ron_error(err))?;
            }
        }

        writer.flush().map_err(|err| self.io_error(err))
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn json_error(&self, err: serde_json::Error) -> StoreError {
        if err.is_io() {
            return self.io_error(io::Error::from(err));
        }

        StoreError::Format {
            path: self.path.clone(),
            message: err.to_string(),
        }
    }

    fn ron_error(&self, err: ron::Error) -> StoreError {
        match err {
            ron::Error::Io(message) => self.io_error(io::Error::other(message)),
            err => StoreError::Format {
                path: self.path.clone(),
                message: err.to_string(),
            },
        }
    }
}
