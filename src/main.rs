#[tokio::main]
async fn main() {
    let status = seqqueue::app::startup::startup().await;
    std::process::exit(status);
}
