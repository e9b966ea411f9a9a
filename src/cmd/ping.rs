use crate::out;
use crate::Cli;
use anyhow::Result;
use gmhistory::error::GmErrorContext;

pub async fn run(cli: &Cli) -> Result<()> {
    let (client, _) = super::connect(cli)?;
    let elapsed = client.ping().await.context_ping()?;

    if cli.output.is_json() {
        out::write_json(&serde_json::json!({ "ok": true, "ms": elapsed.as_millis() }))?;
    } else if !cli.output.is_none() {
        println!("Pong! (GroupMe API ping: {:?})", elapsed);
    }
    Ok(())
}
