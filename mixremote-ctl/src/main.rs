use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    mixremote_ctl::run().await?;
    Ok(())
}
