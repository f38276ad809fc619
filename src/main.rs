#[tokio::main]
async fn main() -> std::io::Result<()> {
    gesture_arcade::run_with_config().await
}
