use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use parking_lot::{Mutex, RwLock};

use crate::domain::errors::KVStoreError;
use crate::domain::keys::Bucket;
use crate::ports::outbound::KeyValueStore;

/// File-backed key-value store for production without RocksDB.
///
/// One append-only record log per namespace, replayed into memory on open.
/// Each `put` appends one record:
///
/// ```text
/// [magic:u8][bucket:u8][key_len:u32 LE][value_len:u32 LE][header_crc:u32 LE]
/// [key][value][body_crc:u32 LE]
/// ```
///
/// `header_crc` covers the first ten bytes and `body_crc` covers key and
/// value. Only a record cut short at end of file is dropped (and the file
/// truncated back to the last complete record); any other damage fails the
/// open.
///
/// The file is held under an exclusive `fs2` lock for the store's lifetime.
pub struct FileBackedKVStore {
    data: RwLock<HashMap<(Bucket, Vec<u8>), Vec<u8>>>,
    file: Mutex<File>,
    path: PathBuf,
}

const RECORD_MAGIC: u8 = 0x4D;
const FIXED_LEN: usize = 1 + 1 + 4 + 4;
const HEADER_LEN: usize = FIXED_LEN + 4;
const CRC_LEN: usize = 4;

impl FileBackedKVStore {
    /// Open or create the record log at `path`.
    ///
    /// ## Errors
    ///
    /// - `Locked`: another process has the file open
    /// - `CorruptionError`: a record fails its checksum or carries an unknown
    ///   bucket tag
    /// - `IOError`: the file cannot be created or read
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KVStoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;

        if file.try_lock_exclusive().is_err() {
            return Err(KVStoreError::Locked {
                path: path.display().to_string(),
            });
        }

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        let (data, valid_len) = replay(&bytes).map_err(|e| match e {
            KVStoreError::CorruptionError { message } => KVStoreError::CorruptionError {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })?;

        if valid_len < bytes.len() {
            tracing::warn!(
                "[mz-01] dropping {} trailing bytes of incomplete record in {}",
                bytes.len() - valid_len,
                path.display()
            );
            file.set_len(valid_len as u64)?;
            file.seek(SeekFrom::End(0))?;
        }

        tracing::info!(
            "[mz-01] loaded {} entries from {}",
            data.len(),
            path.display()
        );

        Ok(Self {
            data: RwLock::new(data),
            file: Mutex::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

type Entries = HashMap<(Bucket, Vec<u8>), Vec<u8>>;

/// Where replay stopped reading records.
enum Step<'a> {
    Record {
        bucket: Bucket,
        key: &'a [u8],
        value: &'a [u8],
        next: usize,
    },
    End,
    TornTail,
}

/// Rebuild the map from the log; returns the length of the complete prefix.
fn replay(bytes: &[u8]) -> Result<(Entries, usize), KVStoreError> {
    let mut data = HashMap::new();
    let mut cursor = 0;

    loop {
        match read_record(bytes, cursor)? {
            Step::Record {
                bucket,
                key,
                value,
                next,
            } => {
                data.insert((bucket, key.to_vec()), value.to_vec());
                cursor = next;
            }
            Step::End | Step::TornTail => return Ok((data, cursor)),
        }
    }
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[at..at + 4]);
    u32::from_le_bytes(raw)
}

fn corruption(at: usize, what: impl std::fmt::Display) -> KVStoreError {
    KVStoreError::CorruptionError {
        message: format!("{} at offset {}", what, at),
    }
}

/// Decode the record starting at `at`.
///
/// A header is only trusted once its checksum matches, so a damaged length
/// can never pass for a record that runs past end of file.
fn read_record(bytes: &[u8], at: usize) -> Result<Step<'_>, KVStoreError> {
    let rest = &bytes[at..];
    if rest.is_empty() {
        return Ok(Step::End);
    }
    if rest.len() < HEADER_LEN {
        return Ok(Step::TornTail);
    }

    let header_crc = read_u32(rest, FIXED_LEN);
    if crc32fast::hash(&rest[..FIXED_LEN]) != header_crc {
        return Err(corruption(at, "record header checksum mismatch"));
    }
    if rest[0] != RECORD_MAGIC {
        return Err(corruption(at, format!("bad record magic {:#04x}", rest[0])));
    }
    let bucket = Bucket::from_tag(rest[1])
        .ok_or_else(|| corruption(at, format!("unknown bucket tag {}", rest[1])))?;
    let key_len = read_u32(rest, 2) as usize;
    let value_len = read_u32(rest, 6) as usize;

    let body_len = key_len.saturating_add(value_len);
    if rest.len() < HEADER_LEN.saturating_add(body_len).saturating_add(CRC_LEN) {
        return Ok(Step::TornTail);
    }
    let body = &rest[HEADER_LEN..HEADER_LEN + body_len];
    if crc32fast::hash(body) != read_u32(rest, HEADER_LEN + body_len) {
        return Err(corruption(at, "record body checksum mismatch"));
    }

    let (key, value) = body.split_at(key_len);
    Ok(Step::Record {
        bucket,
        key,
        value,
        next: at + HEADER_LEN + body_len + CRC_LEN,
    })
}

fn encode_record(bucket: Bucket, key: &[u8], value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + key.len() + value.len() + CRC_LEN);
    out.push(RECORD_MAGIC);
    out.push(bucket.tag());
    out.extend_from_slice(&(key.len() as u32).to_le_bytes());
    out.extend_from_slice(&(value.len() as u32).to_le_bytes());
    let header_crc = crc32fast::hash(&out);
    out.extend_from_slice(&header_crc.to_le_bytes());

    let mut body = crc32fast::Hasher::new();
    body.update(key);
    body.update(value);
    out.extend_from_slice(key);
    out.extend_from_slice(value);
    out.extend_from_slice(&body.finalize().to_le_bytes());
    out
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, bucket: Bucket, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.read().get(&(bucket, key.to_vec())).cloned())
    }

    fn put(&self, bucket: Bucket, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        let record = encode_record(bucket, key, value);
        {
            let mut file = self.file.lock();
            let before = file.metadata()?.len();
            if let Err(e) = file.write_all(&record) {
                // Drop the partial record so later appends stay aligned.
                if let Err(undo) = file.set_len(before) {
                    tracing::error!(
                        "[mz-01] cannot roll back partial record in {}: {}",
                        self.path.display(),
                        undo
                    );
                }
                return Err(e.into());
            }
        }
        self.data
            .write()
            .insert((bucket, key.to_vec()), value.to_vec());
        Ok(())
    }

    fn count(&self, bucket: Bucket) -> Result<usize, KVStoreError> {
        Ok(self.data.read().keys().filter(|(b, _)| *b == bucket).count())
    }

    fn flush(&self) -> Result<(), KVStoreError> {
        let file = self.file.lock();
        file.sync_data()?;
        Ok(())
    }
}

impl Drop for FileBackedKVStore {
    fn drop(&mut self) {
        let file = self.file.lock();
        if let Err(e) = file.sync_data() {
            tracing::warn!("[mz-01] failed to sync {}: {}", self.path.display(), e);
        }
        let _ = FileExt::unlock(&*file);
    }
}
