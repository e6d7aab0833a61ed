#[tokio::main]
async fn main() -> anyhow::Result<()> {
    review_service::run().await
}
