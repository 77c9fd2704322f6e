//! Line-oriented file storage
//!
//! One handle per line, written straight to the file as each handle is
//! recorded. The format is a single-column CSV without a header, compatible
//! with earlier `users.csv` outputs: fields holding a comma or a double quote
//! are quoted, with embedded quotes doubled.

use crate::input::split_record;
use crate::storage::traits::{HandleStore, StorageError, StorageResult};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// File-backed handle store
pub struct FileHandleStore {
    path: PathBuf,
    appender: LineAppender<File>,
}

impl FileHandleStore {
    /// Opens (or creates) the store for appending
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the handles file
    ///
    /// # Returns
    ///
    /// * `Ok(FileHandleStore)` - Store ready for appends
    /// * `Err(StorageError)` - The file could not be opened for writing
    pub fn open(path: &Path) -> StorageResult<Self> {
        let io_err = |source: std::io::Error| StorageError::Io {
            path: path.display().to_string(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)
            .map_err(io_err)?;

        let torn_tail = ends_without_newline(&mut file).map_err(io_err)?;

        Ok(Self {
            path: path.to_path_buf(),
            appender: LineAppender::new(file, torn_tail),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn read_contents(&self) -> StorageResult<String> {
        std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))
    }
}

fn ends_without_newline(file: &mut File) -> std::io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }

    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Extracts the handle from one stored line
fn parse_line(line: &str) -> Option<String> {
    let field = split_record(line).into_iter().next()?;
    if field.is_empty() {
        None
    } else {
        Some(field)
    }
}

/// Renders a handle as a single CSV field
fn encode_field(handle: &str) -> String {
    if handle.contains([',', '"']) {
        format!("\"{}\"", handle.replace('"', "\"\""))
    } else {
        handle.to_string()
    }
}

/// Output that can be cut back to an earlier length
trait Truncate {
    fn current_len(&self) -> io::Result<u64>;
    fn truncate_to(&mut self, len: u64) -> io::Result<()>;
}

impl Truncate for File {
    fn current_len(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

/// Appends whole lines, or nothing at all
///
/// Each record is written unbuffered in one piece. When the write fails, the
/// output is cut back to where it was, so a handle the caller was told about
/// as failed never reaches the file later on.
struct LineAppender<W> {
    out: W,
    /// The output does not end with a newline
    torn_tail: bool,
}

impl<W: Write + Truncate> LineAppender<W> {
    fn new(out: W, torn_tail: bool) -> Self {
        Self { out, torn_tail }
    }

    fn append(&mut self, field: &str) -> io::Result<()> {
        let mut record = String::with_capacity(field.len() + 2);
        if self.torn_tail {
            record.push('\n');
        }
        record.push_str(field);
        record.push('\n');

        let len = self.out.current_len()?;
        let written = self
            .out
            .write_all(record.as_bytes())
            .and_then(|()| self.out.flush());

        if let Err(e) = written {
            if let Err(rollback) = self.out.truncate_to(len) {
                tracing::error!("Could not roll back partial record: {}", rollback);
                self.torn_tail = true;
            }
            return Err(e);
        }

        self.torn_tail = false;
        Ok(())
    }
}

impl HandleStore for FileHandleStore {
    fn load_handles(&self) -> StorageResult<Vec<String>> {
        Ok(self.read_contents()?.lines().filter_map(parse_line).collect())
    }

    fn append_handle(&mut self, handle: &str) -> StorageResult<()> {
        self.appender
            .append(&encode_field(handle))
            .map_err(|e| self.io_error(e))
    }

    fn count_handles(&self) -> StorageResult<u64> {
        Ok(self.load_handles()?.len() as u64)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.csv");

        let store = FileHandleStore::open(&path).unwrap();
        assert!(path.exists());
        assert!(store.load_handles().unwrap().is_empty());
    }

    #[test]
    fn test_append_is_flushed_immediately() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.csv");

        let mut store = FileHandleStore::open(&path).unwrap();
        store.append_handle("alice").unwrap();
        store.append_handle("bob").unwrap();

        // Read through the filesystem, not the store
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "alice\nbob\n");
        assert_eq!(store.count_handles().unwrap(), 2);
    }

    #[test]
    fn test_load_skips_blank_lines_and_quotes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.csv");
        std::fs::write(&path, "alice\n\n\"bob\"\r\n  carol  \n").unwrap();

        let store = FileHandleStore::open(&path).unwrap();
        assert_eq!(store.load_handles().unwrap(), vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_torn_tail_gets_newline_before_append() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.csv");
        std::fs::write(&path, "alice\nbob").unwrap();

        let mut store = FileHandleStore::open(&path).unwrap();
        store.append_handle("carol").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "alice\nbob\ncarol\n");
    }

    #[test]
    fn test_reopen_appends_after_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.csv");

        {
            let mut store = FileHandleStore::open(&path).unwrap();
            store.append_handle("alice").unwrap();
        }

        let mut store = FileHandleStore::open(&path).unwrap();
        store.append_handle("bob").unwrap();
        assert_eq!(store.load_handles().unwrap(), vec!["alice", "bob"]);
    }

    #[test]
    fn test_open_in_missing_directory_fails() {
        let result = FileHandleStore::open(Path::new("/nonexistent/dir/users.csv"));
        assert!(matches!(result, Err(StorageError::Io { .. })));
    }

    #[test]
    fn test_comma_and_quote_handles_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.csv");

        {
            let mut store = FileHandleStore::open(&path).unwrap();
            store.append_handle("a,b").unwrap();
            store.append_handle("\"q\"").unwrap();
            store.append_handle("plain").unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "\"a,b\"\n\"\"\"q\"\"\"\nplain\n");

        let store = FileHandleStore::open(&path).unwrap();
        assert_eq!(store.load_handles().unwrap(), vec!["a,b", "\"q\"", "plain"]);
    }

    #[test]
    fn test_known_comma_handle_is_not_reappended_after_restart() {
        use crate::storage::DedupSink;
        use crate::url::Handle;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.csv");
        let handle = Handle::from_href("/a,b/").unwrap();

        let sink = DedupSink::open(Box::new(FileHandleStore::open(&path).unwrap())).unwrap();
        assert!(sink.record_if_new(&handle).unwrap());
        drop(sink);

        let sink = DedupSink::open(Box::new(FileHandleStore::open(&path).unwrap())).unwrap();
        assert!(!sink.record_if_new(&handle).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "\"a,b\"\n");
    }

    /// In-memory output that fails the next write after storing part of it
    #[derive(Default)]
    struct FlakyOutput {
        data: Vec<u8>,
        fail_next: bool,
    }

    impl Write for FlakyOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.fail_next {
                self.fail_next = false;
                self.data.push(buf[0]);
                return Err(io::Error::new(io::ErrorKind::Other, "no space left"));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Truncate for FlakyOutput {
        fn current_len(&self) -> io::Result<u64> {
            Ok(self.data.len() as u64)
        }

        fn truncate_to(&mut self, len: u64) -> io::Result<()> {
            self.data.truncate(len as usize);
            Ok(())
        }
    }

    #[test]
    fn test_failed_append_leaves_no_trace() {
        let mut appender = LineAppender::new(FlakyOutput::default(), false);
        appender.append("alice").unwrap();

        appender.out.fail_next = true;
        assert!(appender.append("xavier").is_err());

        appender.append("bob").unwrap();
        assert_eq!(appender.out.data, b"alice\nbob\n");
    }

    #[test]
    fn test_failed_append_keeps_torn_tail_repair_pending() {
        let output = FlakyOutput {
            data: b"alice".to_vec(),
            fail_next: true,
        };
        let mut appender = LineAppender::new(output, true);

        assert!(appender.append("xavier").is_err());
        assert_eq!(appender.out.data, b"alice");

        appender.append("bob").unwrap();
        assert_eq!(appender.out.data, b"alice\nbob\n");
    }
}
