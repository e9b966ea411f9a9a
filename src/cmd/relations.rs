use crate::out;
use crate::Cli;
use anyhow::Result;
use gmhistory::error::GmErrorContext;

pub async fn run(cli: &Cli) -> Result<()> {
    let (client, _) = super::connect(cli)?;
    let users = client.index_all_relations().await.context_relations()?;

    if cli.output.is_json() {
        out::write_json(&users)?;
    } else if !cli.output.is_none() {
        println!("{:<14} NAME", "ID");
        for u in &users {
            println!("{:<14} {}", u.id, out::truncate(&u.name, 40));
        }
    }
    Ok(())
}
