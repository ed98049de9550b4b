//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use fibonacci_service::{HttpServer, ServiceConfig, Shutdown};
use tokio::net::{TcpListener, TcpStream};

/// Start the service on an ephemeral port.
///
/// Returns the bound address and the shutdown coordinator; the coordinator
/// must stay alive for as long as the server should keep serving.
pub async fn start_service(config: ServiceConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    // Wait until the server accepts connections.
    for _ in 0..50 {
        if TcpStream::connect(addr).await.is_ok() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    (addr, shutdown)
}

/// Client that talks straight to the local server.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
