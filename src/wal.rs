use crate::errors::DbError;
use crate::types::{CollectionName, DocumentId};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Refuse to allocate for records larger than this while replaying.
const MAX_RECORD_LEN: usize = 64 * 1024 * 1024;

/// WAL operation kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpKind {
    CreateCollection,
    DropCollection,
    CreateTextIndex,
    Upsert,
    Delete,
}

/// One WAL record, bincode-encoded.
/// `value_json` carries the document as canonical extended JSON so every BSON type survives replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalRecord {
    pub op: OpKind,
    pub collection: CollectionName,
    pub id: Option<DocumentId>,
    pub value_json: Option<Vec<u8>>,
    pub fields: Vec<String>,
    pub ts: SystemTime,
}

impl WalRecord {
    #[must_use]
    pub fn new(op: OpKind, collection: &str) -> Self {
        Self {
            op,
            collection: collection.to_string(),
            id: None,
            value_json: None,
            fields: Vec::new(),
            ts: SystemTime::now(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: DocumentId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_value(mut self, value_json: Vec<u8>) -> Self {
        self.value_json = Some(value_json);
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }
}

/// Frame layout: `[len u32 LE][crc32 u32 LE][payload]`.
///
/// # Errors
/// Returns an error if encoding or writing fails.
pub fn write_record<W: Write>(writer: &mut W, rec: &WalRecord) -> Result<(), DbError> {
    let bytes = bincode::serde::encode_to_vec(rec, bincode::config::standard())?;
    let len = u32::try_from(bytes.len())
        .map_err(|_| DbError::WalError(format!("record too large: {} bytes", bytes.len())))?;
    let crc = crc32fast::hash(&bytes);
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(&crc.to_le_bytes())?;
    writer.write_all(&bytes)?;
    Ok(())
}

/// Reads the next record. `Ok(None)` marks a clean end of log.
///
/// # Errors
/// Returns `WalError` for a torn frame or checksum mismatch, or an I/O / decode error.
pub fn read_record<R: Read>(reader: &mut R) -> Result<Option<WalRecord>, DbError> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(DbError::Io(e)),
    }
    let len = crate::utils::num::u32_to_usize(u32::from_le_bytes(len_buf));
    if len > MAX_RECORD_LEN {
        return Err(DbError::WalError(format!("record length {len} exceeds limit")));
    }
    let mut crc_buf = [0u8; 4];
    let mut buf = vec![0u8; len];
    if reader.read_exact(&mut crc_buf).is_err() || reader.read_exact(&mut buf).is_err() {
        return Err(DbError::WalError("truncated record".into()));
    }
    if crc32fast::hash(&buf) != u32::from_le_bytes(crc_buf) {
        return Err(DbError::WalError("checksum mismatch".into()));
    }
    let (rec, _): (WalRecord, usize) =
        bincode::serde::decode_from_slice(&buf, bincode::config::standard())?;
    Ok(Some(rec))
}

/// Append-only log shared by all collections of an engine.
pub struct Wal {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl std::fmt::Debug for Wal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wal").field("path", &self.path).finish()
    }
}

impl Wal {
    /// Opens (or creates) the log for appending.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { path: path.to_path_buf(), writer: Mutex::new(BufWriter::new(file)) })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends and flushes one record.
    ///
    /// # Errors
    /// Returns an error if encoding, writing or flushing fails.
    pub fn append(&self, rec: &WalRecord) -> Result<(), DbError> {
        let mut w = self.writer.lock();
        write_record(&mut *w, rec)?;
        w.flush()?;
        Ok(())
    }

    /// Reads every intact record. A damaged tail ends the replay instead of failing it.
    ///
    /// # Errors
    /// Returns an error only if the file exists but cannot be read.
    pub fn replay(path: &Path) -> Result<Replay, DbError> {
        if !path.exists() {
            return Ok(Replay::default());
        }
        let bytes = std::fs::read(path)?;
        let mut cur = Cursor::new(bytes.as_slice());
        let mut out = Replay::default();
        loop {
            match read_record(&mut cur) {
                Ok(Some(rec)) => {
                    out.records.push(rec);
                    out.valid_len = cur.position();
                }
                Ok(None) => break,
                Err(e) => {
                    log::warn!("wal replay stopped after {} records: {e}", out.records.len());
                    break;
                }
            }
        }
        out.torn = out.valid_len < crate::utils::num::usize_to_u64(bytes.len());
        Ok(out)
    }

    /// Cuts the log back to `len` bytes so new records never land behind a damaged one.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or resized.
    pub fn truncate(path: &Path, len: u64) -> Result<(), DbError> {
        let file = OpenOptions::new().write(true).open(path)?;
        file.set_len(len)?;
        file.sync_all()?;
        log::warn!("wal {} truncated to {len} bytes", path.display());
        Ok(())
    }

    /// Replaces the log with `records`: written to a sibling temp file, synced, then renamed over it.
    ///
    /// # Errors
    /// Returns an error if encoding, writing or the rename fails.
    pub fn rewrite(path: &Path, records: &[WalRecord]) -> Result<(), DbError> {
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        let file = OpenOptions::new().create(true).write(true).truncate(true).open(&tmp)?;
        let mut w = BufWriter::new(file);
        for rec in records {
            write_record(&mut w, rec)?;
        }
        w.flush()?;
        w.get_ref().sync_all()?;
        drop(w);
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

/// Outcome of [`Wal::replay`].
#[derive(Debug, Default)]
pub struct Replay {
    pub records: Vec<WalRecord>,
    /// Offset just past the last intact record.
    pub valid_len: u64,
    /// Bytes follow `valid_len` that could not be read back.
    pub torn: bool,
}
