use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A template as handed to the lexer: its text plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    code: String,
    name: String,
    path: Option<PathBuf>,
}

impl Source {
    pub fn new(code: &str, name: &str) -> Self {
        Source {
            code: String::from(code),
            name: String::from(name),
            path: None,
        }
    }

    pub fn with_path<P: Into<PathBuf>>(code: &str, name: &str, path: P) -> Self {
        Source {
            code: String::from(code),
            name: String::from(name),
            path: Some(path.into()),
        }
    }

    pub fn load<P: AsRef<Path>>(file: P) -> io::Result<Self> {
        let file = file.as_ref();
        let code = fs::read_to_string(file)?;
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        Ok(Source {
            code,
            name,
            path: Some(file.to_path_buf()),
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Text of the 1-based line `number`, treating `\r\n` and `\r` as line
    /// breaks the same way the lexer does.
    pub fn line(&self, number: usize) -> Option<&str> {
        if number == 0 {
            return None;
        }

        let mut rest = self.code.as_str();
        let mut current = 1;
        loop {
            let end = rest.find(['\r', '\n']).unwrap_or(rest.len());
            if current == number {
                return Some(&rest[..end]);
            }
            if end == rest.len() {
                return None;
            }
            let skip = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
            rest = &rest[end + skip..];
            current += 1;
        }
    }
}
