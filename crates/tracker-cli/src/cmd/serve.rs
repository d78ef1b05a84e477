use anyhow::Context;
use std::path::{Path, PathBuf};
use tracker_core::config::Config;

pub fn run(root: &Path, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(serve(root.to_path_buf(), &config.project.name, port, open_browser))
}

async fn serve(root: PathBuf, project: &str, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;
    let actual_port = listener.local_addr()?.port();
    println!("Tracker API for '{project}' on http://localhost:{actual_port}/api/session");

    tokio::select! {
        res = tracker_server::serve_on(root, listener, open_browser) => res,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
            Ok(())
        }
    }
}
