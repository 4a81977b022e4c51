use std::net::SocketAddr;
use tracing::{info, warn};

/// Install the Prometheus exporter for the migration counters
pub fn init_metrics(addr: SocketAddr) {
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => {
            info!("Prometheus exporter listening on http://{}/metrics", addr);
        }
        Err(e) => {
            warn!("Prometheus exporter install failed (possibly already installed): {}", e);
        }
    }
}
