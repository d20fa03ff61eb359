//! In-process stand-in for the Python conversion backend.
//!
//! Serves the same routes the real backend exposes, counts every request,
//! and produces deterministic payloads so client tests can assert on them.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::{engine::general_purpose, Engine};
use serde_json::json;

#[derive(Clone, Default)]
pub struct FakeBackend {
    pub hits: Arc<AtomicUsize>,
    pub health_calls: Arc<AtomicUsize>,
    /// Number of `/health` calls answered with 503 before reporting ok.
    pub unhealthy_for: usize,
    pub last_theme: Arc<std::sync::Mutex<Option<String>>>,
}

impl FakeBackend {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn health_calls(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }
}

pub fn zip_of(entries: &[(String, Vec<u8>)]) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
        for (name, data) in entries {
            zip.start_file(name.as_str(), zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }
    buffer
}

async fn health(State(state): State<FakeBackend>) -> Response {
    let n = state.health_calls.fetch_add(1, Ordering::SeqCst);
    if n < state.unhealthy_for {
        return (StatusCode::SERVICE_UNAVAILABLE, "starting").into_response();
    }
    Json(json!({"status": "ok", "python_version": "3.14"})).into_response()
}

async fn word_to_md(State(state): State<FakeBackend>, mut multipart: Multipart) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap();
        if name == "file" {
            upload = Some((filename, bytes));
        }
    }
    let Some((filename, bytes)) = upload else {
        return (StatusCode::UNPROCESSABLE_ENTITY, "missing file field").into_response();
    };
    if bytes.as_ref() == b"fail" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "Conversion failed: broken document"})),
        )
            .into_response();
    }
    Json(json!({"markdown": format!("# {}\n\n{} bytes", filename, bytes.len())})).into_response()
}

async fn md_to_word(State(state): State<FakeBackend>, mut multipart: Multipart) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let mut outputs = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap();
        match name.as_str() {
            "files" => {
                let stem = filename.rsplit_once('.').map(|(s, _)| s).unwrap_or(&filename);
                outputs.push((format!("{}.docx", stem), bytes.to_vec()));
            }
            "theme" => *state.last_theme.lock().unwrap() = Some(filename),
            _ => {}
        }
    }
    let files: Vec<_> = outputs
        .iter()
        .map(|(name, data)| json!({"filename": name, "content": general_purpose::STANDARD.encode(data)}))
        .collect();
    let zip = if outputs.len() > 1 {
        Some(general_purpose::STANDARD.encode(zip_of(&outputs)))
    } else {
        None
    };
    Json(json!({"files": files, "zip": zip})).into_response()
}

async fn sample_theme() -> Response {
    (
        [(header::CONTENT_DISPOSITION, "attachment; filename=\"custom-theme.docx\"")],
        b"PK-theme".to_vec(),
    )
        .into_response()
}

/// Start the fake backend on an ephemeral port and return its base URL.
pub async fn spawn_backend(state: FakeBackend) -> String {
    let app = Router::new()
        .route("/health", get(health))
        .route("/api/convert/word-to-md", post(word_to_md))
        .route("/api/convert/md-to-word", post(md_to_word))
        .route("/api/download/sample-theme", get(sample_theme))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A local port with nothing listening on it.
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
