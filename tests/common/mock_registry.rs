// Local stand-in for the npm registry

use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// A tiny_http server answering fixed routes. Stops when dropped.
pub struct MockRegistry {
    pub url: String,
    stop_tx: mpsc::Sender<()>,
}

impl MockRegistry {
    /// Serve `routes` (path -> status and JSON body); everything else is 404.
    pub fn start(routes: &[(&str, u16, &str)]) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("Failed to start test server");
        let port = server.server_addr().to_ip().unwrap().port();
        let url = format!("http://127.0.0.1:{}", port);

        let routes: HashMap<String, (u16, String)> = routes
            .iter()
            .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
            .collect();

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        thread::spawn(move || loop {
            if stop_rx.try_recv().is_ok() {
                break;
            }

            match server.recv_timeout(Duration::from_millis(100)) {
                Ok(Some(request)) => {
                    let (status, body) = routes
                        .get(request.url())
                        .cloned()
                        .unwrap_or_else(|| (404, r#"{"error":"Not found"}"#.to_string()));
                    let response = tiny_http::Response::from_string(body)
                        .with_status_code(status)
                        .with_header(
                            tiny_http::Header::from_bytes(
                                &b"Content-Type"[..],
                                &b"application/json"[..],
                            )
                            .unwrap(),
                        );
                    let _ = request.respond(response);
                }
                Ok(None) => {}
                Err(_) => break,
            }
        });

        MockRegistry { url, stop_tx }
    }
}

impl Drop for MockRegistry {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
    }
}
