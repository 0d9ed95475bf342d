use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shortcode_feeds::{
    document::HtmlDocument,
    server::{router, AppState},
    Config, Pipeline,
};

#[derive(Parser)]
#[command(name = "shortcode-feeds")]
#[command(about = "Replace blog shortcodes with rendered post lists")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    #[arg(short, long, default_value = "3005")]
    port: u16,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Blog origin to fetch feeds from (overrides SHORTCODE_ORIGIN)
    #[arg(long)]
    origin: Option<String>,

    #[arg(long)]
    debug: bool,

    /// Rewrite this HTML file to stdout instead of starting the server
    #[arg(long)]
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("shortcode_feeds={filter_level},tower_http=info").into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let mut config = Config::from_env().context("failed to load configuration")?;
    if let Some(origin) = args.origin {
        config = config.with_origin(origin)?;
    }

    let pipeline = Pipeline::from_config(&config).context("failed to build feed client")?;

    if let Some(path) = args.input {
        return render_file(&pipeline, &path).await;
    }

    let app = router(AppState::new(Arc::new(pipeline)));

    let bind_addr = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind to {bind_addr}"))?;

    info!("shortcode renderer started on {} for {}", bind_addr, config.origin);
    info!("");
    info!("Usage:");
    info!(
        "   curl -X POST --data-binary @page.html http://{}/render",
        bind_addr
    );
    info!("   curl http://{}/preview/1/{{label}}/5", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn render_file(pipeline: &Pipeline, path: &Path) -> anyhow::Result<()> {
    let source = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let mut document = HtmlDocument::parse(&source);
    let summary = pipeline.run(&mut document).await?;
    info!("{}: {:?}", path.display(), summary);

    println!("{document}");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                error!("failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::try_parse_from([
            "shortcode-feeds",
            "--port",
            "9000",
            "--debug",
            "--origin",
            "https://travel.blogspot.com",
        ])
        .unwrap();

        assert_eq!(args.port, 9000);
        assert!(args.debug);
        assert_eq!(args.origin.as_deref(), Some("https://travel.blogspot.com"));
        assert!(args.input.is_none());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["shortcode-feeds"]).unwrap();
        assert_eq!(args.port, 3005);
        assert_eq!(args.host, "127.0.0.1");
        assert!(!args.debug);
    }
}
