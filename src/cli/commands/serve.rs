//! `serve` — run the forwarding proxy until shutdown.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::args::ServeArgs;
use crate::config::{self, Overrides};
use crate::error::{IssueSeverity, ProxyError, WaterSafeError};
use crate::proxy::{self, HttpUpstream, ProxyState, parse_bind_addr};

/// Starts the proxy and serves until `cancel` fires.
///
/// # Errors
///
/// Returns a config error for an invalid configuration, or a proxy error if
/// the listener cannot bind or the server task fails.
pub async fn run(args: &ServeArgs, cancel: CancellationToken) -> Result<(), WaterSafeError> {
    let overrides = Overrides {
        bind: args.bind.clone(),
        upstream: args.upstream.clone(),
        ingress_prefix: args.ingress_prefix.clone(),
    };
    let config = config::load(args.config.as_deref(), &overrides)?;

    for issue in config::validate(&config) {
        if issue.severity == IssueSeverity::Warning {
            warn!(path = %issue.path, "{}", issue.message);
        }
    }

    let bind_addr = parse_bind_addr(&config.proxy.bind)?;
    let upstream = Arc::new(HttpUpstream::new(&config.proxy.upstream));
    let state = Arc::new(ProxyState {
        upstream,
        ingress_prefix: config.proxy.ingress_prefix.clone(),
    });

    info!(
        upstream = %config.proxy.upstream,
        ingress_prefix = %config.proxy.ingress_prefix,
        "starting proxy"
    );

    let (_bound_addr, handle) = proxy::bind(state, &bind_addr, cancel).await?;

    handle
        .await
        .map_err(|e| ProxyError::Bind(format!("server task failed: {e}")))?;

    Ok(())
}
