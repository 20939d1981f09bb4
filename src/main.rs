#[tokio::main]
async fn main() -> std::io::Result<()> {
    ticketsense::app::run().await
}
