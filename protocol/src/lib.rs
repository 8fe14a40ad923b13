//! Wire contract between the clipboard-x host and its clients.
//!
//! Command and event identifiers must stay byte-identical to the ones the
//! existing host implementation answers to; payload field names likewise.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

/// Event emitted by the host whenever the clipboard content changes.
/// Carries no payload; consumers re-read the clipboard themselves.
pub const CLIPBOARD_CHANGED: &str = "plugin:clipboard-x://clipboard_changed";

/// A request the host understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    StartListening,
    StopListening,
    HasText,
    HasRtf,
    HasHtml,
    HasImage,
    HasFiles,
    ReadText,
    ReadRtf,
    ReadHtml,
    ReadImage,
    ReadFiles,
    WriteText,
    WriteRtf,
    WriteHtml,
    WriteImage,
    WriteFiles,
    Clear,
    GetDefaultSaveImagePath,
}

impl Command {
    pub const ALL: [Command; 19] = [
        Command::StartListening,
        Command::StopListening,
        Command::HasText,
        Command::HasRtf,
        Command::HasHtml,
        Command::HasImage,
        Command::HasFiles,
        Command::ReadText,
        Command::ReadRtf,
        Command::ReadHtml,
        Command::ReadImage,
        Command::ReadFiles,
        Command::WriteText,
        Command::WriteRtf,
        Command::WriteHtml,
        Command::WriteImage,
        Command::WriteFiles,
        Command::Clear,
        Command::GetDefaultSaveImagePath,
    ];

    /// The identifier sent over the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Command::StartListening => "plugin:clipboard-x|start_listening",
            Command::StopListening => "plugin:clipboard-x|stop_listening",
            Command::HasText => "plugin:clipboard-x|has_text",
            Command::HasRtf => "plugin:clipboard-x|has_rtf",
            Command::HasHtml => "plugin:clipboard-x|has_html",
            Command::HasImage => "plugin:clipboard-x|has_image",
            Command::HasFiles => "plugin:clipboard-x|has_files",
            Command::ReadText => "plugin:clipboard-x|read_text",
            Command::ReadRtf => "plugin:clipboard-x|read_rtf",
            Command::ReadHtml => "plugin:clipboard-x|read_html",
            Command::ReadImage => "plugin:clipboard-x|read_image",
            Command::ReadFiles => "plugin:clipboard-x|read_files",
            Command::WriteText => "plugin:clipboard-x|write_text",
            Command::WriteRtf => "plugin:clipboard-x|write_rtf",
            Command::WriteHtml => "plugin:clipboard-x|write_html",
            Command::WriteImage => "plugin:clipboard-x|write_image",
            Command::WriteFiles => "plugin:clipboard-x|write_files",
            Command::Clear => "plugin:clipboard-x|clear",
            Command::GetDefaultSaveImagePath => "plugin:clipboard-x|get_default_save_image_path",
        }
    }

    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|cmd| cmd.as_str() == identifier)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single WebSocket text message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Frame {
    /// Client to host: run `cmd` with `args`.
    Invoke {
        id: u64,
        cmd: String,
        #[serde(default, skip_serializing_if = "Value::is_null")]
        args: Value,
    },
    /// Host to client: outcome of the invoke with the same `id`.
    Reply {
        id: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ok: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// Host to client: an emitted event.
    Event {
        event: String,
        #[serde(default)]
        payload: Value,
    },
}

impl Frame {
    pub fn invoke(id: u64, cmd: Command, args: Value) -> Self {
        Frame::Invoke {
            id,
            cmd: cmd.as_str().to_string(),
            args,
        }
    }

    pub fn reply(id: u64, result: Result<Value, String>) -> Self {
        match result {
            Ok(value) => Frame::Reply {
                id,
                ok: Some(value),
                error: None,
            },
            Err(message) => Frame::Reply {
                id,
                ok: None,
                error: Some(message),
            },
        }
    }

    pub fn event(event: &str) -> Self {
        Frame::Event {
            event: event.to_string(),
            payload: Value::Null,
        }
    }

    /// Splits a reply into its request id and outcome.
    ///
    /// A reply without `error` is a success; a missing or `null` `ok` is the
    /// unit value of fire-and-forget commands.
    pub fn into_reply(self) -> Option<(u64, Result<Value, String>)> {
        match self {
            Frame::Reply { id, ok, error } => match error {
                Some(message) => Some((id, Err(message))),
                None => Some((id, Ok(ok.unwrap_or(Value::Null)))),
            },
            _ => None,
        }
    }

    pub fn to_text(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_text(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteText {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteRtf {
    /// The plain text.
    pub text: String,
    /// The rich text.
    pub rtf: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteHtml {
    /// The plain text.
    pub text: String,
    /// The html.
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteImage {
    /// Path of an image file that already exists on disk.
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteFiles {
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadImageArgs {
    /// Directory the image is materialized into; the host default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadImage {
    /// The path of the image.
    pub path: PathBuf,
    /// The size of the image in bytes.
    pub size: u64,
    /// The width of the image in pixels.
    pub width: u32,
    /// The height of the image in pixels.
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadFile {
    /// The paths of the files.
    pub paths: Vec<String>,
    /// The size of the files in bytes.
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identifiers_match_host_contract() {
        let names: Vec<&str> = Command::ALL.iter().map(|cmd| cmd.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "plugin:clipboard-x|start_listening",
                "plugin:clipboard-x|stop_listening",
                "plugin:clipboard-x|has_text",
                "plugin:clipboard-x|has_rtf",
                "plugin:clipboard-x|has_html",
                "plugin:clipboard-x|has_image",
                "plugin:clipboard-x|has_files",
                "plugin:clipboard-x|read_text",
                "plugin:clipboard-x|read_rtf",
                "plugin:clipboard-x|read_html",
                "plugin:clipboard-x|read_image",
                "plugin:clipboard-x|read_files",
                "plugin:clipboard-x|write_text",
                "plugin:clipboard-x|write_rtf",
                "plugin:clipboard-x|write_html",
                "plugin:clipboard-x|write_image",
                "plugin:clipboard-x|write_files",
                "plugin:clipboard-x|clear",
                "plugin:clipboard-x|get_default_save_image_path",
            ]
        );
        assert_eq!(CLIPBOARD_CHANGED, "plugin:clipboard-x://clipboard_changed");
    }

    #[test]
    fn from_identifier_is_exact() {
        assert_eq!(
            Command::from_identifier("plugin:clipboard-x|has_rtf"),
            Some(Command::HasRtf)
        );
        assert_eq!(Command::from_identifier("has_rtf"), None);
        assert_eq!(Command::from_identifier("plugin:clipboard-x|HAS_RTF"), None);
    }

    #[test]
    fn invoke_frame_shape() {
        let frame = Frame::invoke(7, Command::WriteRtf, json!({"text": "a", "rtf": "{\\rtf1 a}"}));
        let value: Value = serde_json::from_str(&frame.to_text().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "kind": "invoke",
                "id": 7,
                "cmd": "plugin:clipboard-x|write_rtf",
                "args": {"text": "a", "rtf": "{\\rtf1 a}"}
            })
        );

        let bare = Frame::invoke(8, Command::Clear, Value::Null).to_text().unwrap();
        assert!(!bare.contains("args"));
    }

    #[test]
    fn unit_reply_is_success() {
        let text = Frame::reply(3, Ok(Value::Null)).to_text().unwrap();
        let (id, outcome) = Frame::from_text(&text).unwrap().into_reply().unwrap();
        assert_eq!(id, 3);
        assert_eq!(outcome, Ok(Value::Null));

        let (_, outcome) = Frame::from_text(r#"{"kind":"reply","id":4}"#)
            .unwrap()
            .into_reply()
            .unwrap();
        assert_eq!(outcome, Ok(Value::Null));
    }

    #[test]
    fn error_reply_keeps_message() {
        let text = Frame::reply(5, Err("permission denied".into())).to_text().unwrap();
        let (_, outcome) = Frame::from_text(&text).unwrap().into_reply().unwrap();
        assert_eq!(outcome, Err("permission denied".to_string()));
    }

    #[test]
    fn event_frame_has_null_payload() {
        let value: Value =
            serde_json::from_str(&Frame::event(CLIPBOARD_CHANGED).to_text().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"kind": "event", "event": CLIPBOARD_CHANGED, "payload": null})
        );
        assert!(Frame::event(CLIPBOARD_CHANGED).into_reply().is_none());
    }

    #[test]
    fn read_image_args_use_camel_case() {
        let args = ReadImageArgs {
            save_path: Some(PathBuf::from("/tmp/images")),
        };
        assert_eq!(
            serde_json::to_value(&args).unwrap(),
            json!({"savePath": "/tmp/images"})
        );
        let empty: ReadImageArgs = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.save_path, None);
    }
}
