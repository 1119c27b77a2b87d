use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::export::artifact::ExportArtifact;
use crate::export::engine::EngineKind;
use crate::foundation::error::{PassError, PassResult};
use crate::render::svg::escape_xml;

pub const MANUAL_SAVE_TITLE: &str = "Download Access Pass";

/// Standalone page showing the pass with manual-save instructions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManualSaveDocument {
    pub title: String,
    pub html: String,
    /// Filename the user is expected to save the image as.
    pub filename_hint: String,
}

impl ManualSaveDocument {
    pub fn for_artifact(artifact: &ExportArtifact) -> Self {
        let title = MANUAL_SAVE_TITLE.to_string();
        let html = format!(
            r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>{title}</title>
  </head>
  <body style="margin: 0; display: flex; flex-direction: column; align-items: center; justify-content: center; min-height: 100vh; background-color: #f5f5f5; font-family: Arial, sans-serif;">
    <div style="text-align: center; max-width: 600px; padding: 20px;">
      <h2 style="margin-bottom: 20px;">Your Access Pass is Ready</h2>
      <p style="margin-bottom: 30px;">Right-click on the image below and select "Save Image As..." to download your access pass.</p>
      <img src="{src}" alt="Access Pass" title="{name}" style="max-width: 100%; box-shadow: 0 4px 8px rgba(0,0,0,0.1);" />
      <p style="margin-top: 30px; color: #666;">You can close this tab after saving your access pass.</p>
    </div>
  </body>
</html>
"#,
            src = escape_xml(&artifact.image_data_uri),
            name = escape_xml(&artifact.suggested_filename),
        );
        Self {
            title,
            html,
            filename_hint: artifact.suggested_filename.clone(),
        }
    }
}

/// Where an exported pass ends up.
pub trait DeliveryTarget {
    /// Save the PNG directly under `filename`.
    fn download(&mut self, filename: &str, png: &[u8]) -> PassResult<()>;
    /// Show a manual-save page in a fresh context.
    fn open_document(&mut self, doc: &ManualSaveDocument) -> PassResult<()>;
}

/// How a given artifact will be delivered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryPlan {
    Download { filename: String, png: Arc<[u8]> },
    ManualSave(ManualSaveDocument),
}

/// What happened on a successful delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryReceipt {
    Downloaded { filename: String },
    OpenedDocument { title: String },
}

impl DeliveryPlan {
    pub fn for_engine(engine: EngineKind, artifact: &ExportArtifact) -> Self {
        match engine {
            EngineKind::Standard => Self::Download {
                filename: artifact.suggested_filename.clone(),
                png: Arc::clone(&artifact.png),
            },
            EngineKind::Restricted => Self::ManualSave(ManualSaveDocument::for_artifact(artifact)),
        }
    }

    /// Run the plan against a target. Target failures become [`PassError::Delivery`].
    pub fn execute(&self, target: &mut dyn DeliveryTarget) -> PassResult<DeliveryReceipt> {
        let result = match self {
            Self::Download { filename, png } => target
                .download(filename, png)
                .map(|()| DeliveryReceipt::Downloaded {
                    filename: filename.clone(),
                }),
            Self::ManualSave(doc) => target
                .open_document(doc)
                .map(|()| DeliveryReceipt::OpenedDocument {
                    title: doc.title.clone(),
                }),
        };
        result.map_err(|e| match e {
            PassError::Delivery(_) => e,
            other => PassError::delivery(other.to_string()),
        })
    }
}

/// Writes downloads (and manual-save pages as `.html`) into a directory.
#[derive(Debug)]
pub struct DirectoryTarget {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write(&mut self, name: &str, bytes: &[u8]) -> PassResult<()> {
        let file_name = safe_file_name(name)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            PassError::delivery(format!("create output dir '{}': {e}", self.dir.display()))
        })?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes)
            .map_err(|e| PassError::delivery(format!("write '{}': {e}", path.display())))?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "delivered");
        self.written.push(path);
        Ok(())
    }
}

impl DeliveryTarget for DirectoryTarget {
    fn download(&mut self, filename: &str, png: &[u8]) -> PassResult<()> {
        self.write(filename, png)
    }

    fn open_document(&mut self, doc: &ManualSaveDocument) -> PassResult<()> {
        let hint = safe_file_name(&doc.filename_hint)?;
        let stem = Path::new(&hint)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("access-pass");
        self.write(&format!("{stem}.html"), doc.html.as_bytes())
    }
}

/// Single path component for `name`: separators become `_`, so names typed into the form (e.g.
/// "AC/DC") land in the target directory intact.
fn safe_file_name(name: &str) -> PassResult<String> {
    let file_name: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .filter(|c| !c.is_control())
        .collect();
    if file_name.is_empty() || file_name == "." || file_name == ".." {
        return Err(PassError::delivery(format!("invalid output filename \"{name}\"")));
    }
    Ok(file_name)
}

/// Records deliveries in memory, for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryTarget {
    pub downloads: Vec<(String, Vec<u8>)>,
    pub documents: Vec<ManualSaveDocument>,
}

impl InMemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeliveryTarget for InMemoryTarget {
    fn download(&mut self, filename: &str, png: &[u8]) -> PassResult<()> {
        self.downloads.push((filename.to_string(), png.to_vec()));
        Ok(())
    }

    fn open_document(&mut self, doc: &ManualSaveDocument) -> PassResult<()> {
        self.documents.push(doc.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/delivery.rs"]
mod tests;
