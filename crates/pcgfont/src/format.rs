use std::path::Path;

use crate::{
    error::Result,
    program::{self, LoadMode},
    quantize::ReduceMode,
    raw,
    store::CharacterStore,
};

/// Unified file format enum covering all supported codecs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// Plane-major binary dump.
    Raw,
    /// Row-interleaved ("triple speed") binary dump.
    RawInterleaved,
    /// Tokenized `DEFCHR$` program.
    ProgramBinary,
    /// Plain text `DEFCHR$` program.
    ProgramText,
    /// 128x128 tile raster.
    #[cfg(feature = "png")]
    Png,
}

/// Parameters for [`FileFormat::import`]. Fields a format has no use for are ignored.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportOptions {
    pub start: usize,
    pub load_mode: LoadMode,
    pub reduce_mode: ReduceMode,
}

impl FileFormat {
    pub const ALL: &'static [FileFormat] = &[
        FileFormat::Raw,
        FileFormat::RawInterleaved,
        FileFormat::ProgramBinary,
        FileFormat::ProgramText,
        #[cfg(feature = "png")]
        FileFormat::Png,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Raw | FileFormat::RawInterleaved => "bin",
            FileFormat::ProgramBinary => "bas",
            FileFormat::ProgramText => "asc",
            #[cfg(feature = "png")]
            FileFormat::Png => "png",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FileFormat::Raw => "Binary",
            FileFormat::RawInterleaved => "Binary (triple speed)",
            FileFormat::ProgramBinary => "BASIC program",
            FileFormat::ProgramText => "BASIC program (ASCII)",
            #[cfg(feature = "png")]
            FileFormat::Png => "PNG image",
        }
    }

    /// Raster export always covers the whole bank.
    pub fn supports_range(&self) -> bool {
        match self {
            #[cfg(feature = "png")]
            FileFormat::Png => false,
            _ => true,
        }
    }

    /// Interleaved dumps share the `.bin` extension and are never picked here.
    pub fn from_extension(ext: &str) -> Option<FileFormat> {
        match ext.to_ascii_lowercase().as_str() {
            "bin" => Some(FileFormat::Raw),
            "bas" => Some(FileFormat::ProgramBinary),
            "asc" | "txt" => Some(FileFormat::ProgramText),
            #[cfg(feature = "png")]
            "png" => Some(FileFormat::Png),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<FileFormat> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(FileFormat::from_extension)
    }

    pub fn export(&self, store: &CharacterStore, start: usize, end: usize) -> Result<Vec<u8>> {
        match self {
            FileFormat::Raw => raw::save(store, start, end, false),
            FileFormat::RawInterleaved => raw::save(store, start, end, true),
            FileFormat::ProgramBinary => program::save_binary(store, start, end),
            FileFormat::ProgramText => Ok(program::save_ascii(store, start, end)?.into_bytes()),
            #[cfg(feature = "png")]
            FileFormat::Png => crate::raster::encode_png(store, &Default::default()),
        }
    }

    /// Imports into `store` and returns the number of characters written.
    /// Program data is auto-detected as tokenized or text.
    pub fn import(&self, bytes: &[u8], store: &mut CharacterStore, options: &ImportOptions) -> Result<usize> {
        match self {
            FileFormat::Raw => raw::load(bytes, store, options.start, false),
            FileFormat::RawInterleaved => raw::load(bytes, store, options.start, true),
            FileFormat::ProgramBinary | FileFormat::ProgramText => {
                program::load(bytes, store, options.start, options.load_mode)
            }
            #[cfg(feature = "png")]
            FileFormat::Png => crate::raster::load_raster_bytes(bytes, store, options.reduce_mode),
        }
    }

    pub fn import_file(&self, path: &Path, store: &mut CharacterStore, options: &ImportOptions) -> Result<usize> {
        let bytes = std::fs::read(path)?;
        self.import(&bytes, store, options)
    }

    pub fn export_file(&self, path: &Path, store: &CharacterStore, start: usize, end: usize) -> Result<()> {
        let bytes = self.export(store, start, end)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

impl std::str::FromStr for FileFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bin" | "raw" => Ok(FileFormat::Raw),
            "bin3" | "interleaved" | "triple" => Ok(FileFormat::RawInterleaved),
            "bas" | "program" => Ok(FileFormat::ProgramBinary),
            "asc" | "ascii" | "text" => Ok(FileFormat::ProgramText),
            #[cfg(feature = "png")]
            "png" => Ok(FileFormat::Png),
            other => Err(format!("unknown format '{other}'")),
        }
    }
}
