#[tokio::main]
async fn main() -> anyhow::Result<()> {
    circuitsense_lib::run().await
}
