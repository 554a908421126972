#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = minimoodle_rust::run().await {
        eprintln!("minimoodle-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
