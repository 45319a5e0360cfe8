use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Plain-text log of the traffic exchanged with the worker, for debugging stuck runs.
pub struct Journal {
    path: PathBuf,
    out: BufWriter<File>,
}

impl Journal {
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let out = BufWriter::new(File::create(&path)?);
        Ok(Self { path, out })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn outgoing(&mut self, text: &str) -> io::Result<()> {
        self.entry("->", text)
    }

    pub fn incoming(&mut self, text: &str) -> io::Result<()> {
        self.entry("<-", text)
    }

    pub fn event(&mut self, text: &str) -> io::Result<()> {
        self.entry("--", text)
    }

    fn entry(&mut self, direction: &str, text: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", direction, text.trim_end_matches(['\n', '\r']))?;
        self.out.flush()
    }
}
