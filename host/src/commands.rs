//! Command handlers behind the `plugin:clipboard-x|*` identifiers.

use crate::clipboard::{ClipboardBackend, ClipboardContent, ContentFormat};
use crate::{images, ClipboardError, HostState, Result};
use clipboard_x_protocol::{
    Command, ReadFile, ReadImage, ReadImageArgs, WriteFiles, WriteHtml, WriteImage, WriteRtf,
    WriteText,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

/// Runs `cmd` and turns the outcome into the reply payload.
///
/// Errors are reported as their display string; that is all the wire
/// carries.
pub async fn dispatch(
    state: &HostState,
    cmd: Command,
    args: Value,
) -> std::result::Result<Value, String> {
    debug!("Handling {}", cmd);
    run(state, cmd, args).await.map_err(|err| {
        debug!("{} failed: {}", cmd, err);
        err.to_string()
    })
}

async fn run(state: &HostState, cmd: Command, args: Value) -> Result<Value> {
    match cmd {
        Command::StartListening => to_value(start_listening(state).await),
        Command::StopListening => to_value(stop_listening(state).await),
        Command::HasText => to_value(has(state, ContentFormat::Text).await?),
        Command::HasRtf => to_value(has(state, ContentFormat::Rtf).await?),
        Command::HasHtml => to_value(has(state, ContentFormat::Html).await?),
        Command::HasImage => to_value(has(state, ContentFormat::Image).await?),
        Command::HasFiles => to_value(has(state, ContentFormat::Files).await?),
        Command::ReadText => to_value(blocking(state, |clipboard| clipboard.get_text()).await?),
        Command::ReadRtf => to_value(blocking(state, |clipboard| clipboard.get_rtf()).await?),
        Command::ReadHtml => to_value(blocking(state, |clipboard| clipboard.get_html()).await?),
        Command::ReadImage => to_value(read_image(state, parse_args(args)?).await?),
        Command::ReadFiles => to_value(read_files(state).await?),
        Command::WriteText => to_value(write_text(state, parse_args(args)?).await?),
        Command::WriteRtf => to_value(write_rtf(state, parse_args(args)?).await?),
        Command::WriteHtml => to_value(write_html(state, parse_args(args)?).await?),
        Command::WriteImage => to_value(write_image(state, parse_args(args)?).await?),
        Command::WriteFiles => to_value(write_files(state, parse_args(args)?).await?),
        Command::Clear => to_value(blocking(state, |clipboard| clipboard.clear()).await?),
        Command::GetDefaultSaveImagePath => to_value(state.image_dir()),
    }
}

fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T> {
    // Commands with only optional arguments may be sent without any.
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    Ok(serde_json::from_value(args)?)
}

fn to_value<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

async fn blocking<T, F>(state: &HostState, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn ClipboardBackend) -> Result<T> + Send + 'static,
{
    let backend = state.backend();
    tokio::task::spawn_blocking(move || f(backend.as_ref()))
        .await
        .map_err(|err| ClipboardError::Backend(err.to_string()))?
}

async fn start_listening(state: &HostState) {
    if state.start_watching().await {
        info!("Started listening for clipboard changes");
    }
}

async fn stop_listening(state: &HostState) {
    if state.stop_watching().await {
        info!("Stopped listening for clipboard changes");
    }
}

async fn has(state: &HostState, format: ContentFormat) -> Result<bool> {
    blocking(state, move |clipboard| clipboard.has(format)).await
}

async fn read_image(state: &HostState, args: ReadImageArgs) -> Result<ReadImage> {
    let save_path = args
        .save_path
        .unwrap_or_else(|| state.image_dir().to_path_buf());

    blocking(state, move |clipboard| {
        let image = clipboard.get_image()?;
        images::save_png(&image, &save_path)
    })
    .await
}

async fn read_files(state: &HostState) -> Result<ReadFile> {
    blocking(state, |clipboard| {
        let paths: Vec<String> = clipboard
            .get_files()?
            .iter()
            .map(|entry| file_path(entry))
            .collect();
        let size = paths.iter().map(|path| path_size(Path::new(path))).sum();
        Ok(ReadFile { paths, size })
    })
    .await
}

async fn write_text(state: &HostState, args: WriteText) -> Result<()> {
    blocking(state, move |clipboard| {
        clipboard.set(vec![ClipboardContent::Text(args.text)])
    })
    .await
}

async fn write_rtf(state: &HostState, args: WriteRtf) -> Result<()> {
    let mut contents = vec![ClipboardContent::Rtf(args.rtf)];

    // macOS derives the plain text flavour from the RTF itself.
    if cfg!(not(target_os = "macos")) {
        contents.push(ClipboardContent::Text(args.text));
    }

    blocking(state, move |clipboard| clipboard.set(contents)).await
}

async fn write_html(state: &HostState, args: WriteHtml) -> Result<()> {
    blocking(state, move |clipboard| {
        clipboard.set(vec![
            ClipboardContent::Text(args.text),
            ClipboardContent::Html(args.html),
        ])
    })
    .await
}

async fn write_image(state: &HostState, args: WriteImage) -> Result<()> {
    blocking(state, move |clipboard| {
        let image = images::load_png(Path::new(&args.image))?;
        clipboard.set(vec![ClipboardContent::Image(image)])
    })
    .await
}

async fn write_files(state: &HostState, args: WriteFiles) -> Result<()> {
    blocking(state, move |clipboard| {
        clipboard.set(vec![ClipboardContent::Files(args.files)])
    })
    .await
}

/// Local path of a file list entry, which may be a `file://` URI.
fn file_path(entry: &str) -> String {
    if let Ok(url) = Url::parse(entry) {
        if url.scheme() == "file" {
            if let Ok(path) = url.to_file_path() {
                return path.to_string_lossy().into_owned();
            }
        }
    }
    entry.replace("file://", "")
}

/// Size in bytes of a file, or of everything below a directory.
/// Unreadable entries count as zero.
fn path_size(path: &Path) -> u64 {
    let Ok(metadata) = fs::symlink_metadata(path) else {
        return 0;
    };
    if !metadata.is_dir() {
        return metadata.len();
    }
    fs::read_dir(path)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .map(|entry| path_size(&entry.path()))
                .sum::<u64>()
        })
        .unwrap_or(0)
}
