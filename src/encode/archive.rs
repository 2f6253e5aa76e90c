//! Minimal ZIP writer for batch export.
//!
//! Entries are stored uncompressed: rendered PNG/JPEG payloads are already compressed, so
//! deflate would only cost time. No ZIP64 support; entries and the archive must fit the
//! classic 32-bit format.

use std::collections::BTreeSet;

use crate::foundation::error::{OverlayError, OverlayResult};

const SIG_LOCAL_FILE_HEADER: u32 = 0x04034b50;
const SIG_CD_ENTRY: u32 = 0x02014b50;
const SIG_EOCD: u32 = 0x06054b50;

const VERSION: u16 = 20;
/// Bit 11: file names are UTF-8.
const FLAG_UTF8: u16 = 0x0800;
const METHOD_STORED: u16 = 0;
/// DOS date 1980-01-01, time 00:00. Fixed so archives are reproducible.
const DOS_TIME: u16 = 0;
const DOS_DATE: u16 = 0x21;

/// Sink for named export payloads.
pub trait ArchiveBuilder {
    fn add_entry(&mut self, name: &str, bytes: &[u8]) -> OverlayResult<()>;

    /// Close the archive and return its bytes.
    fn finalize(self) -> OverlayResult<Vec<u8>>
    where
        Self: Sized;
}

#[derive(Debug)]
struct CentralEntry {
    name: String,
    crc32: u32,
    size: u32,
    offset: u32,
}

/// In-memory ZIP archive with stored entries.
#[derive(Debug, Default)]
pub struct ZipArchiveBuilder {
    buf: Vec<u8>,
    entries: Vec<CentralEntry>,
    names: BTreeSet<String>,
}

impl ZipArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_entry_name(name: &str) -> OverlayResult<()> {
    if name.is_empty() {
        return Err(OverlayError::archive("entry name must not be empty"));
    }
    if name.starts_with('/') || name.starts_with('\\') {
        return Err(OverlayError::archive(format!(
            "entry name '{name}' must be relative"
        )));
    }
    if name.split(['/', '\\']).any(|part| part == "..") {
        return Err(OverlayError::archive(format!(
            "entry name '{name}' must not contain '..'"
        )));
    }
    if name.len() > usize::from(u16::MAX) {
        return Err(OverlayError::archive("entry name is too long"));
    }
    Ok(())
}

fn put_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

impl ArchiveBuilder for ZipArchiveBuilder {
    fn add_entry(&mut self, name: &str, bytes: &[u8]) -> OverlayResult<()> {
        validate_entry_name(name)?;
        if self.names.contains(name) {
            return Err(OverlayError::archive(format!("duplicate entry '{name}'")));
        }
        if self.entries.len() >= usize::from(u16::MAX) {
            return Err(OverlayError::archive("too many entries"));
        }
        let size = u32::try_from(bytes.len())
            .map_err(|_| OverlayError::archive(format!("entry '{name}' exceeds 4 GiB")))?;
        let offset = u32::try_from(self.buf.len())
            .map_err(|_| OverlayError::archive("archive exceeds 4 GiB"))?;
        let crc32 = crc32fast::hash(bytes);
        let name_len = name.len() as u16;

        let buf = &mut self.buf;
        put_u32(buf, SIG_LOCAL_FILE_HEADER);
        put_u16(buf, VERSION);
        put_u16(buf, FLAG_UTF8);
        put_u16(buf, METHOD_STORED);
        put_u16(buf, DOS_TIME);
        put_u16(buf, DOS_DATE);
        put_u32(buf, crc32);
        put_u32(buf, size);
        put_u32(buf, size);
        put_u16(buf, name_len);
        put_u16(buf, 0);
        buf.extend_from_slice(name.as_bytes());
        buf.extend_from_slice(bytes);

        tracing::debug!(name, size, "zip entry");
        self.names.insert(name.to_owned());
        self.entries.push(CentralEntry {
            name: name.to_owned(),
            crc32,
            size,
            offset,
        });
        Ok(())
    }

    fn finalize(mut self) -> OverlayResult<Vec<u8>> {
        let cd_offset = u32::try_from(self.buf.len())
            .map_err(|_| OverlayError::archive("archive exceeds 4 GiB"))?;

        for e in &self.entries {
            let buf = &mut self.buf;
            put_u32(buf, SIG_CD_ENTRY);
            put_u16(buf, VERSION);
            put_u16(buf, VERSION);
            put_u16(buf, FLAG_UTF8);
            put_u16(buf, METHOD_STORED);
            put_u16(buf, DOS_TIME);
            put_u16(buf, DOS_DATE);
            put_u32(buf, e.crc32);
            put_u32(buf, e.size);
            put_u32(buf, e.size);
            put_u16(buf, e.name.len() as u16);
            put_u16(buf, 0); // extra
            put_u16(buf, 0); // comment
            put_u16(buf, 0); // disk
            put_u16(buf, 0); // internal attrs
            put_u32(buf, 0); // external attrs
            put_u32(buf, e.offset);
            buf.extend_from_slice(e.name.as_bytes());
        }

        let cd_size = u32::try_from(self.buf.len() - cd_offset as usize)
            .map_err(|_| OverlayError::archive("central directory exceeds 4 GiB"))?;
        let count = self.entries.len() as u16;

        let buf = &mut self.buf;
        put_u32(buf, SIG_EOCD);
        put_u16(buf, 0);
        put_u16(buf, 0);
        put_u16(buf, count);
        put_u16(buf, count);
        put_u32(buf, cd_size);
        put_u32(buf, cd_offset);
        put_u16(buf, 0);

        Ok(self.buf)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/archive.rs"]
mod tests;
