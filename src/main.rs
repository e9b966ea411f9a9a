mod cmd;
mod out;

use anyhow::Result;
use clap::Parser;
use gmhistory::error::GmErrorContext;
use gmhistory::Config;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "gmhistory",
    version,
    about = "Exercise the GroupMe history and media adapter"
)]
pub struct Cli {
    /// GroupMe access token (from dev.groupme.com). Prompted for if unset.
    #[arg(long, global = true, env = "GROUPME_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// REST API base URL
    #[arg(long, global = true, env = "GROUPME_API_BASE", default_value = gmhistory::config::DEFAULT_API_BASE)]
    pub api_base: String,

    /// v4 API base URL (relations)
    #[arg(long, global = true, env = "GROUPME_V4_BASE", default_value = gmhistory::config::DEFAULT_V4_BASE)]
    pub v4_base: String,

    /// File service base URL
    #[arg(long, global = true, env = "GROUPME_FILE_BASE", default_value = gmhistory::config::DEFAULT_FILE_BASE)]
    pub file_base: String,

    /// Per-request timeout in seconds (0 = none)
    #[arg(long, global = true, default_value = "0")]
    pub timeout: u64,

    /// Output mode: text (default), json, or none
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub output: out::OutputMode,

    #[command(subcommand)]
    pub command: cmd::Command,
}

impl Cli {
    /// Build the adapter config, asking for the token on the terminal when
    /// neither the flag nor `GROUPME_TOKEN` provided one.
    pub fn config(&self) -> Result<Config> {
        let token = match self.token.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => rpassword::prompt_password("Enter your GroupMe Developer Token: ")
                .context_token()?
                .trim()
                .to_string(),
        };
        if token.is_empty() {
            anyhow::bail!(
                "No token provided. Set GROUPME_TOKEN or pass --token (get one at https://dev.groupme.com/)."
            );
        }

        let mut config = Config::new(token)
            .with_api_base(&self.api_base)
            .with_v4_base(&self.v4_base)
            .with_file_base(&self.file_base);
        if self.timeout > 0 {
            config = config.with_timeout(Duration::from_secs(self.timeout));
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = cmd::run(cli).await {
        let msg = format!("{e:#}");
        eprintln!("Error: {msg}");
        std::process::exit(1);
    }
}
