//! Dataset mimic - the top-level handle over an in-memory object graph

use crate::encode::{get_encoder, Encoder, EncoderKind, JsonEncoder};
use crate::error::{MimicError, Result};
use crate::group::GroupMimic;
use crate::ncobj::Group;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::str::FromStr;
use tracing::{debug, info};

/// Access mode, spelled as netCDF mode strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileMode {
    /// `r`
    #[default]
    Read,
    /// `w`: create, overwriting any existing file
    Write,
    /// `x`: create, failing if the file exists
    WriteNew,
    /// `a`
    Append,
    /// `r+`
    ReadWrite,
}

impl FileMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileMode::Read => "r",
            FileMode::Write => "w",
            FileMode::WriteNew => "x",
            FileMode::Append => "a",
            FileMode::ReadWrite => "r+",
        }
    }

    /// Whether closing a dataset in this mode writes the graph out
    pub fn writes_on_close(&self) -> bool {
        matches!(self, FileMode::Write | FileMode::WriteNew)
    }

    fn open_options(&self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options.write(true);
        match self {
            FileMode::WriteNew => options.create_new(true),
            _ => options.create(true).truncate(true),
        };
        options
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileMode {
    type Err = MimicError;

    /// Parse a netCDF mode string.
    ///
    /// A trailing `s` (`ws`, `rs`, `r+s`, ...) asks a real file for unbuffered
    /// shared access; here it selects the same mode as the base letter.
    fn from_str(s: &str) -> Result<Self> {
        match s.strip_suffix('s').unwrap_or(s) {
            "r" => Ok(FileMode::Read),
            "w" => Ok(FileMode::Write),
            "x" => Ok(FileMode::WriteNew),
            "a" => Ok(FileMode::Append),
            "r+" => Ok(FileMode::ReadWrite),
            _ => Err(MimicError::InvalidMode(s.to_string())),
        }
    }
}

/// An object graph presented as an open dataset
///
/// Dereferences to the root [`GroupMimic`], so dimensions, variables,
/// subgroups and global attributes are read exactly as on any group.
/// Nothing touches the file system until [`Dataset::close`] is called on a
/// dataset opened in a writing mode.
pub struct Dataset<'a> {
    root: Rc<GroupMimic<'a>>,
    file_path: Option<PathBuf>,
    file_mode: FileMode,
    encoder: Box<dyn Encoder>,
}

impl<'a> Dataset<'a> {
    /// Present `group` as a dataset opened for reading
    pub fn readable(group: &'a Group) -> Self {
        Self::build(group, None, FileMode::Read)
    }

    /// Present `group` as a dataset that is written to `path` on close
    pub fn writable(path: impl AsRef<Path>, mode: FileMode, group: &'a Group) -> Self {
        Self::build(group, Some(path.as_ref().to_path_buf()), mode)
    }

    /// Like [`Dataset::writable`], with the mode given as a netCDF mode string
    pub fn open(path: impl AsRef<Path>, mode: &str, group: &'a Group) -> Result<Self> {
        Ok(Self::writable(path, mode.parse()?, group))
    }

    fn build(group: &'a Group, file_path: Option<PathBuf>, file_mode: FileMode) -> Self {
        let root = GroupMimic::new(group);
        debug!(
            name = %group.name,
            mode = %file_mode,
            dimensions = root.dimensions().len(),
            variables = root.variables().len(),
            groups = root.groups().len(),
            "built dataset mimic"
        );
        Self {
            root,
            file_path,
            file_mode,
            encoder: Box::new(JsonEncoder::default()),
        }
    }

    /// Set the encoder used when closing in a writing mode
    pub fn with_encoder(mut self, encoder: Box<dyn Encoder>) -> Self {
        self.encoder = encoder;
        self
    }

    /// Set the encoder by kind
    pub fn with_encoder_kind(self, kind: EncoderKind) -> Self {
        self.with_encoder(get_encoder(kind))
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn file_mode(&self) -> FileMode {
        self.file_mode
    }

    pub fn encoder_kind(&self) -> EncoderKind {
        self.encoder.kind()
    }

    /// Shared handle to the root group mimic
    pub fn root(&self) -> Rc<GroupMimic<'a>> {
        Rc::clone(&self.root)
    }

    /// Close the dataset.
    ///
    /// In `w` and `x` modes the wrapped graph is encoded once into a file
    /// created at the configured path. Other modes do nothing. The output file
    /// is closed before this returns, on success and on error alike; errors
    /// from creating the file or from the encoder are returned as they are.
    pub fn close(self) -> Result<()> {
        if !self.file_mode.writes_on_close() {
            debug!(mode = %self.file_mode, "closing read-only dataset mimic, nothing to write");
            return Ok(());
        }

        let path = self
            .file_path
            .as_deref()
            .ok_or_else(|| MimicError::MissingPath(self.file_mode.to_string()))?;

        let file = self.file_mode.open_options().open(path)?;
        let mut writer = BufWriter::new(file);
        self.encoder.encode(&mut writer, self.root.ncobj())?;
        writer.flush()?;

        info!(
            path = %path.display(),
            mode = %self.file_mode,
            encoder = %self.encoder.kind(),
            "wrote dataset"
        );
        Ok(())
    }
}

impl<'a> Deref for Dataset<'a> {
    type Target = GroupMimic<'a>;

    fn deref(&self) -> &Self::Target {
        &self.root
    }
}

impl fmt::Debug for Dataset<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dataset")
            .field("root", &self.root)
            .field("file_path", &self.file_path)
            .field("file_mode", &self.file_mode)
            .field("encoder", &self.encoder.kind())
            .finish()
    }
}
