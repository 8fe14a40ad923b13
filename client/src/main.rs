//! clipboard-x command line client.
//!
//! Talks to a running clipboard-x host: prints clipboard changes as they
//! happen, dumps the clipboard or writes to it.

use clap::{Parser, Subcommand};
use clipboard_x_client::config::ClientConfig;
use clipboard_x_client::{ClipboardChangeOptions, ClipboardClient, ReadClipboard};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "clipboard-x")]
#[command(about = "Read, write and watch the clipboard through a clipboard-x host", long_about = None)]
struct Cli {
    /// Host WebSocket URL, overrides the config file
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every clipboard change (default)
    Watch,
    /// Print the clipboard as JSON
    Read,
    /// Put plain text on the clipboard
    WriteText { text: String },
    /// Put html on the clipboard
    WriteHtml {
        html: String,
        /// Plain text alternative, defaults to the html itself
        #[arg(long)]
        text: Option<String>,
    },
    /// Put rich text on the clipboard
    WriteRtf {
        rtf: String,
        /// Plain text alternative, defaults to the rtf itself
        #[arg(long)]
        text: Option<String>,
    },
    /// Put an image file on the clipboard
    WriteImage { path: PathBuf },
    /// Put a list of files on the clipboard
    WriteFiles {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Empty the clipboard
    Clear,
    /// Print the host's default image directory
    ImageDir,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    // If there is no config file yet, write the defaults
    match ClientConfig::save_defaults_if_missing() {
        Ok(true) => info!("First run detected, saved default configuration"),
        Ok(false) => {}
        Err(e) => error!("Failed to save default config: {}", e),
    }

    let config = ClientConfig::load()?;

    let url = cli.url.unwrap_or(config.host_url);
    let client = ClipboardClient::connect(&url).await?;

    match cli.command.unwrap_or(Commands::Watch) {
        Commands::Watch => watch(&client).await?,
        Commands::Read => {
            let result = client.read_clipboard().await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::WriteText { text } => client.write_text(&text).await?,
        Commands::WriteHtml { html, text } => {
            let text = text.unwrap_or_else(|| html.clone());
            client.write_html(&text, &html).await?;
        }
        Commands::WriteRtf { rtf, text } => {
            let text = text.unwrap_or_else(|| rtf.clone());
            client.write_rtf(&text, &rtf).await?;
        }
        Commands::WriteImage { path } => client.write_image(&path).await?,
        Commands::WriteFiles { paths } => client.write_files(paths).await?,
        Commands::Clear => client.clear().await?,
        Commands::ImageDir => {
            println!("{}", client.get_default_save_image_path().await?.display());
        }
    }

    Ok(())
}

async fn watch(client: &ClipboardClient) -> clipboard_x_client::Result<()> {
    let unlisten = client
        .on_clipboard_change(print_change, ClipboardChangeOptions::new())
        .await?;
    client.start_listening().await?;
    info!("Watching the clipboard, press Ctrl-C to stop");

    let _ = tokio::signal::ctrl_c().await;

    unlisten.unlisten();
    client.stop_listening().await
}

fn print_change(result: ReadClipboard) {
    if result.is_empty() {
        println!("clipboard is empty");
        return;
    }
    if let Some(text) = &result.text {
        println!("text   {:>8} chars  {}", text.count, preview(&text.value));
    }
    if let Some(rtf) = &result.rtf {
        println!("rtf    {:>8} chars  {}", rtf.count, preview(&rtf.value));
    }
    if let Some(html) = &result.html {
        println!("html   {:>8} chars  {}", html.count, preview(&html.value));
    }
    if let Some(image) = &result.image {
        println!(
            "image  {:>8} bytes  {}x{} {}",
            image.count,
            image.width,
            image.height,
            image.value.display()
        );
    }
    if let Some(files) = &result.files {
        println!(
            "files  {:>8} bytes  {}",
            files.count,
            files.value.join(", ")
        );
    }
    println!();
}

fn preview(value: &str) -> String {
    let line = value.lines().next().unwrap_or_default();
    if line.chars().count() > 60 || line.len() < value.trim_end().len() {
        format!("{}...", line.chars().take(60).collect::<String>())
    } else {
        line.to_string()
    }
}
