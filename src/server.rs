use std::{io, net::SocketAddr, path::PathBuf, sync::Arc};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use log::info;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::http::handlers::{file_ops, fixture_ops};

pub const DEFAULT_FIXTURE_ITEMS: usize = 100_000;

#[derive(Clone)]
pub struct Server {
    pub config: Arc<ServerConfig>,
}

#[derive(Debug)]
pub struct ServerConfig {
    pub files_dir: PathBuf,
    pub fixture_items: usize,
}

impl ServerConfig {
    /// Creates `files_dir` when missing and stores its canonical form.
    pub fn new(files_dir: impl Into<PathBuf>, fixture_items: usize) -> io::Result<Self> {
        let files_dir = files_dir.into();
        std::fs::create_dir_all(&files_dir)?;

        Ok(Self {
            files_dir: files_dir.canonicalize()?,
            fixture_items,
        })
    }
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/generate-big-json", post(fixture_ops::handle_generate))
            .route(
                "/file/{filename}",
                get(file_ops::handle_read).post(file_ops::handle_write),
            )
            .layer(DefaultBodyLimit::disable())
            .layer(CorsLayer::permissive())
            .with_state(self.config.clone())
    }

    pub async fn run(self, host: &str, port: u16) -> io::Result<()> {
        let listener = TcpListener::bind((host, port)).await?;
        self.serve(listener).await
    }

    pub async fn serve(self, listener: TcpListener) -> io::Result<()> {
        let addr: SocketAddr = listener.local_addr()?;
        info!("File server running on http://{}", addr);
        info!("Serving files from {:?}", self.config.files_dir);

        axum::serve(listener, self.router()).await
    }
}
