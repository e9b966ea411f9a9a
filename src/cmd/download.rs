use crate::out;
use crate::Cli;
use anyhow::Result;
use clap::Subcommand;
use gmhistory::error::GmErrorContext;
use serde::Serialize;

#[derive(Subcommand, Debug, Clone)]
pub enum DownloadCommand {
    /// Download an image from the image service
    Image {
        /// Image URL (append .large/.preview/.avatar for sizes)
        #[arg(long)]
        url: String,
        /// Output file
        #[arg(long)]
        out: String,
    },
    /// Download a file attachment
    File {
        /// Group or conversation ID the file was posted in
        #[arg(long)]
        conversation: String,
        /// File ID from the attachment
        #[arg(long)]
        file_id: String,
        /// Output file (defaults to the original file name)
        #[arg(long)]
        out: Option<String>,
    },
    /// Download a video attachment
    Video {
        /// Video URL
        #[arg(long)]
        url: String,
        /// Preview image URL
        #[arg(long, default_value = "")]
        preview_url: String,
        /// Output file
        #[arg(long)]
        out: String,
    },
}

#[derive(Serialize)]
struct Saved<'a> {
    path: &'a str,
    bytes: usize,
    mime: &'a str,
}

pub async fn run(cli: &Cli, cmd: &DownloadCommand) -> Result<()> {
    let (_, media) = super::connect(cli)?;

    let (path, bytes, mime) = match cmd {
        DownloadCommand::Image { url, out } => {
            let m = media.download_image(url).await.context_download(url)?;
            (out.clone(), m.bytes, m.mime)
        }
        DownloadCommand::File {
            conversation,
            file_id,
            out,
        } => {
            let f = media
                .download_file(conversation, file_id)
                .await
                .context_download(&format!("file {}", file_id))?;
            let path = out
                .clone()
                .unwrap_or_else(|| safe_file_name(&f.metadata.file_name, file_id));
            (path, f.bytes, f.metadata.mime)
        }
        DownloadCommand::Video {
            url,
            preview_url,
            out,
        } => {
            let m = media
                .download_video(preview_url, url)
                .await
                .context_download(url)?;
            (out.clone(), m.bytes, m.mime)
        }
    };

    tokio::fs::write(&path, &bytes).await.context_write(&path)?;

    if cli.output.is_json() {
        out::write_json(&Saved {
            path: &path,
            bytes: bytes.len(),
            mime: &mime,
        })?;
    } else if !cli.output.is_none() {
        println!("Saved {} ({} bytes, {})", path, bytes.len(), mime);
    }
    Ok(())
}

/// Keep a server-provided name inside the current directory.
fn safe_file_name(name: &str, fallback: &str) -> String {
    let name = name.replace(['/', '\\'], "_");
    let name = name.trim_start_matches('.');
    if name.is_empty() {
        format!("file_{}", fallback.replace(['/', '\\'], "_"))
    } else {
        name.to_string()
    }
}
