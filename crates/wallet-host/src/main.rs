//! # Wallet Host
//!
//! The process supervisor (C11): resolves configuration, builds every
//! shared component once, and spawns the three concurrent surfaces a
//! deployment needs — the stdio relay, the agent-facing HTTP gateway, and
//! the loopback-only admin server — tearing all of them down together on
//! `Ctrl+C`.

mod chains;
mod config;
mod dapp_intent;
mod privileged;
mod stdio;

use ahw_01_stdio_transport::FramedWriter;
use ahw_04_tool_registry::{ServiceContext, ToolRegistry};
use ahw_05_pending_store::PendingStore;
use ahw_06_vault::Vault;
use ahw_08_audit_log::AuditLog;
use ahw_09_event_broadcaster::EventBroadcaster;
use anyhow::{Context, Result};
use config::HostConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = HostConfig::from_env();
    config.validate().context("invalid configuration")?;
    init_logging(&config.logging.filter);

    info!("=====================================");
    info!("  Algonius Wallet Host");
    info!("=====================================");
    info!(wallet_home = %config.vault.wallet_home.display(), "resolved vault location");

    let ctx = ServiceContext::new(
        Vault::open(&config.vault.wallet_home),
        PendingStore::new(),
        AuditLog::new(),
        chains::standard_registry(),
        EventBroadcaster::new(),
    );

    let tool_registry = Arc::new(ToolRegistry::standard(ctx.clone()));
    let http_router = ahw_03_http_gateway::build_router(tool_registry);
    let admin_router = ahw_03_http_gateway::admin::build_router(ctx.clone());

    let http_addr: SocketAddr = config.http.bind_addr.parse().context("invalid HTTP bind address")?;
    let admin_addr: SocketAddr = config.admin.bind_addr.parse().context("invalid admin bind address")?;

    let http_handle = tokio::spawn(async move {
        info!(addr = %http_addr, "starting agent-facing HTTP gateway");
        let listener = tokio::net::TcpListener::bind(http_addr).await?;
        axum::serve(listener, http_router.into_make_service_with_connect_info::<SocketAddr>()).await
    });

    let admin_handle = tokio::spawn(async move {
        info!(addr = %admin_addr, "starting loopback-only admin server");
        let listener = tokio::net::TcpListener::bind(admin_addr).await?;
        axum::serve(listener, admin_router).await
    });

    let stdio_handle = if config.stdio.enabled {
        let writer = Arc::new(FramedWriter::new(tokio::io::stdout()));
        let registry = Arc::new(stdio::build_registry(ctx.clone(), Arc::clone(&writer)));
        let event_forwarder = tokio::spawn(stdio::run_event_forwarder(ctx.broadcaster.subscribe(), Arc::clone(&writer)));
        let reader = tokio::spawn(stdio::run_request_loop(tokio::io::stdin(), registry, writer));
        info!("stdio relay transport is running");
        Some((reader, event_forwarder))
    } else {
        info!("stdio relay transport is disabled");
        None
    };

    info!("wallet host started successfully");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("received Ctrl+C, shutting down");
        }
        result = http_handle => {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(err)) => error!(error = %err, "HTTP gateway server exited with an error"),
                Err(err) => error!(error = %err, "HTTP gateway task panicked"),
            }
        }
        result = admin_handle => {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(err)) => error!(error = %err, "admin server exited with an error"),
                Err(err) => error!(error = %err, "admin task panicked"),
            }
        }
    }

    if let Some((reader, forwarder)) = stdio_handle {
        reader.abort();
        forwarder.abort();
    }

    info!("wallet host stopped");
    Ok(())
}

fn init_logging(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
