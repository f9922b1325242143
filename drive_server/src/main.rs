#[tokio::main]
async fn main() -> std::io::Result<()> {
    drive_server::run_with_config().await
}
