use std::{io, path::Path, sync::Arc};

use axum::{Json, extract::State};
use chrono::{SecondsFormat, Utc};
use log::{error, info};
use serde::Serialize;
use serde_json::{Value, json};
use tokio::{
    fs,
    io::{AsyncWriteExt, BufWriter},
};

use crate::{http::ApiError, server::ServerConfig};

pub const FIXTURE_FILE_NAME: &str = "big-data.json";

#[derive(Debug, Serialize)]
struct FixtureItem {
    id: usize,
    name: String,
    description: String,
    timestamp: String,
}

impl FixtureItem {
    fn new(id: usize) -> Self {
        Self {
            id,
            name: format!("Item {id}"),
            description: format!("This is a description for item {id} to make the file larger."),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

pub async fn handle_generate(
    State(config): State<Arc<ServerConfig>>,
) -> Result<Json<Value>, ApiError> {
    let path = config.files_dir.join(FIXTURE_FILE_NAME);
    info!("Generating {} fixture items into {:?}", config.fixture_items, path);

    match write_fixture(&path, config.fixture_items).await {
        Ok(bytes) => {
            info!("Fixture written: {} bytes", bytes);
            Ok(Json(json!({
                "message": "Big file generated",
                "path": path.display().to_string()
            })))
        }
        Err(e) => {
            error!("Fixture generation failed: {}", e);
            Err(ApiError::GenerateFailed)
        }
    }
}

/// Writes a JSON array of `total` items one record at a time. Every write
/// is awaited, so a slow disk holds the producer back instead of growing a
/// buffer.
pub async fn write_fixture(path: &Path, total: usize) -> io::Result<u64> {
    let file = fs::File::create(path).await?;
    let mut writer = BufWriter::new(file);
    let mut written = 0u64;

    writer.write_all(b"[\n").await?;
    written += 2;

    for id in 1..=total {
        let mut record = serde_json::to_vec(&FixtureItem::new(id))?;
        let separator: &[u8] = if id == total { b"\n" } else { b",\n" };
        record.extend_from_slice(separator);
        writer.write_all(&record).await?;
        written += record.len() as u64;
    }

    writer.write_all(b"]").await?;
    writer.flush().await?;
    Ok(written + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_is_a_json_array_of_items() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FIXTURE_FILE_NAME);

        let bytes = write_fixture(&path, 25).await.unwrap();
        let raw = std::fs::read(&path).unwrap();
        assert_eq!(bytes, raw.len() as u64);

        let items: Vec<Value> = serde_json::from_slice(&raw).unwrap();
        assert_eq!(items.len(), 25);
        for (i, item) in items.iter().enumerate() {
            assert_eq!(item["id"], i + 1);
            assert_eq!(item["name"], format!("Item {}", i + 1));
            assert!(item["description"].is_string());
            assert!(item["timestamp"].as_str().unwrap().ends_with('Z'));
        }
    }

    #[tokio::test]
    async fn empty_fixture_is_an_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FIXTURE_FILE_NAME);

        write_fixture(&path, 0).await.unwrap();
        let items: Vec<Value> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert!(items.is_empty());
    }
}
