// Boots one drive server per test binary and hands out its base URL.
use std::{
    net::TcpStream,
    sync::{OnceLock, mpsc},
    time::Duration,
};

static SERVER_URL: OnceLock<String> = OnceLock::new();

// Ensure the test server is running and return the shared base URL.
pub fn ensure_server() -> &'static str {
    SERVER_URL.get_or_init(|| {
        let (url_tx, url_rx) = mpsc::channel::<String>();
        // The server gets its own OS thread and runtime so it outlives each
        // `#[tokio::test]` runtime.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                url_tx
                    .send(format!("http://{addr}"))
                    .expect("publish server url");
                drive_server::run(listener).await.expect("server failed");
            });
        });

        let base_url = url_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("server thread should publish its url");
        wait_until_accepting(&base_url);
        base_url
    })
}

fn wait_until_accepting(base_url: &str) {
    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    for _ in 0..100 {
        if TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}
