use axum::routing::get;
use axum::extract::Extension;
use split_collector::collector::handlers::{CollectContext, handle_collect};
use split_collector::config::{CollectorConfig, NodeConfig};
use split_collector::membership::view::{MembershipView, StaticMembership};
use split_collector::transport::client::HttpTransport;
use split_collector::transport::handlers::router;
use split_collector::transport::protocol::ENDPOINT_COLLECT;
use split_collector::transport::store::DocumentStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!(
            "Usage: {} --bind <addr:port> --self-index <n> --member <addr:port> [--member ...]",
            args[0]
        );
        eprintln!(
            "Example: {} --bind 127.0.0.1:6001 --self-index 1 --member 127.0.0.1:6000 --member 127.0.0.1:6001 --member 127.0.0.1:6002",
            args[0]
        );

        std::process::exit(1);
    }

    let node = NodeConfig::from_args(&args[1..])?;
    let config = CollectorConfig::from_env()?;

    // 1. Membership:
    let membership = Arc::new(StaticMembership::new(node.members.clone(), node.self_index)?);
    tracing::info!(
        "Member {} of {} ({})",
        membership.self_index(),
        membership.len(),
        membership.local_member().endpoint
    );
    if membership.local_member().endpoint != node.bind {
        tracing::warn!(
            "Binding {} but the member list advertises {} for this node",
            node.bind,
            membership.local_member().endpoint
        );
    }

    // 2. Local storage and peer transport:
    let store = Arc::new(DocumentStore::new());
    let transport = Arc::new(HttpTransport::new(config.request_timeout));
    tracing::info!("Collector config: {:?}", config);

    let context = Arc::new(CollectContext {
        membership,
        transport,
        store: store.clone(),
        config,
    });

    // 3. HTTP Router:
    let app = router(store)
        .route(
            &format!("{}/:namespace/:oid", ENDPOINT_COLLECT),
            get(handle_collect),
        )
        .layer(Extension(context));

    // 4. Start HTTP server:
    tracing::info!("HTTP server listening on {}", node.bind);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(node.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
