use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),

    #[error("failed to read '{}': {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read a module from a file, or from stdin when the path is `-`.
pub fn load_source(path: &Path) -> Result<String, SourceError> {
    if is_stdin(path) {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(SourceError::Stdin)?;
        return Ok(buf);
    }

    fs::read_to_string(path).map_err(|source| SourceError::File {
        path: path.to_path_buf(),
        source,
    })
}

/// Name shown in diagnostic headers.
pub fn display_name(path: &Path) -> String {
    if is_stdin(path) {
        return "<stdin>".to_string();
    }
    path.to_string_lossy().into_owned()
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}
