//! Sending files to an agent that has the code interpreter enabled.

use super::{AgentEvent, AgentRuntime, InputFile, InvokeAgentRequest};
use crate::error::Result;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{error, info};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Extensions (with the dot) and their media types. The first extension listed
/// for a media type is the one generated files are saved with.
const MEDIA_TYPES: [(&str, &str); 10] = [
    (".csv", "text/csv"),
    (".json", "application/json"),
    (".txt", "text/plain"),
    (".py", "text/x-python"),
    (".jpg", "image/jpeg"),
    (".jpeg", "image/jpeg"),
    (".png", "image/png"),
    (".xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    (".xls", "application/vnd.ms-excel"),
    (".pdf", "application/pdf"),
];

/// Media type for an input file, keyed by its lower-case extension (with the dot).
pub fn content_type(extension: &str) -> &'static str {
    MEDIA_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map_or(FALLBACK_CONTENT_TYPE, |&(_, media_type)| media_type)
}

/// File extension (without the dot) for a generated file's media type.
///
/// Types outside the table use the first extension mime_guess knows, then `bin`.
pub fn extension_for(media_type: &str) -> &'static str {
    MEDIA_TYPES
        .iter()
        .find(|(_, known)| known.eq_ignore_ascii_case(media_type))
        .map(|&(ext, _)| ext.trim_start_matches('.'))
        .or_else(|| {
            mime_guess::get_mime_extensions_str(media_type)
                .and_then(|exts| exts.first())
                .copied()
        })
        .unwrap_or("bin")
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();
    content_type(&extension)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub data: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeInterpreterResponse {
    pub text: String,
    pub images: Vec<GeneratedImage>,
}

#[derive(Clone)]
pub struct CodeInterpreter {
    runtime: AgentRuntime,
}

impl CodeInterpreter {
    pub fn new(runtime: AgentRuntime) -> Self {
        Self { runtime }
    }

    /// Sends a prompt with a local file for the code interpreter to work on.
    ///
    /// Returns the reply text and any files the agent generated.
    pub async fn invoke_agent_with_file(
        &self,
        agent_id: &str,
        agent_alias_id: &str,
        session_id: &str,
        prompt: &str,
        file_path: impl AsRef<Path>,
    ) -> Result<CodeInterpreterResponse> {
        let path = file_path.as_ref();
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let media_type = content_type_for(path);
        info!(agent_id, file = %name, media_type, "invoking agent with code interpreter");

        let request = InvokeAgentRequest {
            agent_id: agent_id.to_string(),
            agent_alias_id: agent_alias_id.to_string(),
            session_id: session_id.to_string(),
            input_text: prompt.to_string(),
            enable_trace: false,
            files: vec![InputFile {
                name,
                media_type: media_type.to_string(),
                data,
            }],
        };

        self.collect(request)
            .await
            .inspect_err(|err| error!(agent_id, "couldn't invoke agent with code interpreter: {err}"))
    }

    async fn collect(&self, request: InvokeAgentRequest) -> Result<CodeInterpreterResponse> {
        let mut events = self.runtime.client().invoke_agent(request).await?;
        let mut text = Vec::new();
        let mut images = Vec::new();
        while let Some(event) = events.next().await {
            match event? {
                AgentEvent::Chunk { bytes } => text.extend(bytes),
                AgentEvent::Files { files } => {
                    images.extend(files.into_iter().filter(|f| !f.bytes.is_empty()).map(|f| {
                        GeneratedImage {
                            data: f.bytes,
                            content_type: f.media_type.unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string()),
                        }
                    }));
                }
                AgentEvent::Trace { .. } | AgentEvent::Other => {}
            }
        }
        Ok(CodeInterpreterResponse {
            text: String::from_utf8(text)?,
            images,
        })
    }
}

/// Writes generated images into `dir` as `generated-image-<n>.<ext>`.
///
/// The extension comes from the image's media type. Returns the written paths.
pub async fn save_images(images: &[GeneratedImage], dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir).await?;
    let mut paths = Vec::with_capacity(images.len());
    for (i, image) in images.iter().enumerate() {
        let extension = extension_for(&image.content_type);
        let path = dir.join(format!("generated-image-{}.{extension}", i + 1));
        tokio::fs::write(&path, &image.data).await?;
        info!(path = %path.display(), "saved generated image");
        paths.push(path);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_map_to_media_types() {
        assert_eq!(content_type_for(Path::new("song_plays.CSV")), "text/csv");
        assert_eq!(content_type_for(Path::new("chart.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("book.xlsx")), "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet");
    }

    #[test]
    fn unknown_or_missing_extensions_fall_back() {
        assert_eq!(content_type_for(Path::new("archive.tar")), FALLBACK_CONTENT_TYPE);
        assert_eq!(content_type_for(Path::new("Makefile")), FALLBACK_CONTENT_TYPE);
    }

    #[test]
    fn generated_files_use_the_usual_extension() {
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("IMAGE/PNG"), "png");
        assert_eq!(extension_for("text/csv"), "csv");
        assert_eq!(extension_for("application/x-no-such-type"), "bin");
    }

    #[tokio::test]
    async fn saves_images_with_media_type_extension() {
        let dir = tempfile::tempdir().unwrap();
        let images = vec![
            GeneratedImage {
                data: vec![0x89, b'P', b'N', b'G'],
                content_type: "image/png".into(),
            },
            GeneratedImage {
                data: vec![0xFF, 0xD8, 0xFF],
                content_type: "image/jpeg".into(),
            },
        ];

        let paths = save_images(&images, dir.path()).await.unwrap();

        assert_eq!(
            paths,
            vec![
                dir.path().join("generated-image-1.png"),
                dir.path().join("generated-image-2.jpg"),
            ]
        );
        assert_eq!(std::fs::read(&paths[1]).unwrap(), images[1].data);
        assert_eq!(std::fs::read(&paths[0]).unwrap(), images[0].data);
    }
}
