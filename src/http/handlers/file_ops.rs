use std::{io, path::Path as FsPath, sync::Arc};

use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use futures_util::StreamExt;
use log::{error, info, warn};
use serde_json::{Value, json};
use tokio::{fs, io::AsyncWriteExt};
use tokio_util::io::ReaderStream;

use crate::{
    http::{ApiError, utils::path_resolver::PathResolver},
    server::ServerConfig,
};

/// Streams a file back with its on-disk size as `Content-Length`.
pub async fn handle_read(
    State(config): State<Arc<ServerConfig>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    info!("read file: {}", filename);

    let path = PathResolver::new(&config.files_dir).resolve(&filename)?;

    let file = match fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Failed to open {:?}: {}", path, e);
            }
            return Err(ApiError::NotFound);
        }
    };

    let metadata = match file.metadata().await {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => return Err(ApiError::NotFound),
        Err(e) => {
            warn!("Failed to stat {:?}: {}", path, e);
            return Err(ApiError::NotFound);
        }
    };

    info!("Streaming {} bytes from {:?}", metadata.len(), path);

    let headers = [
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ),
        (header::CONTENT_LENGTH, HeaderValue::from(metadata.len())),
    ];
    Ok((headers, Body::from_stream(ReaderStream::new(file))).into_response())
}

/// Streams the request body to disk and answers once the write finished.
pub async fn handle_write(
    State(config): State<Arc<ServerConfig>>,
    Path(filename): Path<String>,
    body: Body,
) -> Result<Json<Value>, ApiError> {
    info!("write file: {}", filename);

    let path = PathResolver::new(&config.files_dir).resolve(&filename)?;

    match stream_to_file(&path, body).await {
        Ok(written) => {
            info!("Wrote {} bytes to {:?}", written, path);
            Ok(Json(json!({
                "success": true,
                "message": "File saved successfully via stream"
            })))
        }
        Err(e) => {
            error!("Write error on {:?}: {}", path, e);
            Err(ApiError::WriteFailed)
        }
    }
}

async fn stream_to_file(path: &FsPath, body: Body) -> io::Result<u64> {
    let mut file = fs::File::create(path).await?;
    let mut stream = body.into_data_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(io::Error::other)?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::server::{Server, ServerConfig};

    fn server(dir: &std::path::Path) -> Server {
        Server::new(ServerConfig::new(dir, 10).unwrap())
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn missing_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = server(dir.path()).router();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/file/missing.json")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "File not found" })
        );
    }

    #[tokio::test]
    async fn read_sets_length_and_type() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data.json"), "[1,2,3]").unwrap();
        let app = server(dir.path()).router();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/file/data.json")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(headers["content-length"], "7");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"[1,2,3]");
    }

    #[tokio::test]
    async fn write_replaces_file_content() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.json"), "old content that is longer").unwrap();
        let app = server(dir.path()).router();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/file/notes.json")
                    .header("content-type", "text/plain")
                    .body(axum::body::Body::from("{\"new\":true}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("notes.json")).unwrap(),
            "{\"new\":true}"
        );
    }

    #[tokio::test]
    async fn encoded_traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = server(dir.path()).router();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/file/..%2Fsecret.json")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid filename");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unwritable_target_is_500() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("taken.json")).unwrap();
        let app = server(dir.path()).router();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/file/taken.json")
                    .body(axum::body::Body::from("x"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Failed to write file");
    }
}
