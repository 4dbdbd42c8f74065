#[tokio::main]
async fn main() {
    let code = drainpipe::app::startup::startup().await;
    std::process::exit(code);
}
