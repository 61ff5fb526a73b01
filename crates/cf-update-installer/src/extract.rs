//! Single-member archive extraction
//!
//! Both extractors walk the archive in its own entry order and stop at the
//! first entry whose name equals the wanted member exactly. Entries are
//! matched by name before any data is decoded, so entries that are skipped
//! may use compression methods this build cannot read. The member is
//! written to a freshly truncated destination file and its permission bits
//! are copied over. Nothing is created at the destination unless the member
//! is found.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use tar::Archive;
use tracing::{debug, warn};
use zip::read::read_zipfile_from_stream;
use zip::ZipArchive;

use crate::error::{Error, Result};

/// Extract `member` from a gzip-compressed tar archive to `dest`
pub fn extract_tar_gz(archive_path: &Path, member: &str, dest: &Path) -> Result<()> {
    let archive_err = |source: io::Error| Error::Archive {
        archive: archive_path.to_path_buf(),
        source,
    };

    let file = File::open(archive_path).map_err(archive_err)?;
    let mut archive = Archive::new(MultiGzDecoder::new(file));

    for entry in archive.entries().map_err(archive_err)? {
        let mut entry = entry.map_err(archive_err)?;

        if entry.path_bytes().as_ref() != member.as_bytes() {
            continue;
        }

        let mode = entry.header().mode().map_err(archive_err)?;
        debug!("Save {} to {} (mode {:o})", member, dest.display(), mode);
        return write_member(&mut entry, dest, Some(mode));
    }

    Err(Error::member_not_found(member, archive_path))
}

/// Extract `member` from a zip archive to `dest`
pub fn extract_zip(archive_path: &Path, member: &str, dest: &Path) -> Result<()> {
    let archive_err = |source: io::Error| Error::Archive {
        archive: archive_path.to_path_buf(),
        source,
    };

    let file = File::open(archive_path).map_err(archive_err)?;
    let mut archive = ZipArchive::new(file).map_err(|e| archive_err(e.into()))?;

    let record = first_central_record(
        archive_path,
        archive.central_directory_start(),
        archive.offset(),
        member,
    )
    .map_err(archive_err)?
    .ok_or_else(|| Error::member_not_found(member, archive_path))?;

    // ZipArchive keeps only the last of several entries sharing a name
    let index = archive
        .index_for_name(member)
        .ok_or_else(|| Error::member_not_found(member, archive_path))?;
    let indexed_start = archive
        .by_index_raw(index)
        .map_err(|e| archive_err(e.into()))?
        .header_start();

    if indexed_start == record.header_start {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| archive_err(e.into()))?;
        let mode = entry.unix_mode();
        debug!("Save {} to {}", member, dest.display());
        return write_member(&mut entry, dest, mode);
    }

    debug!(
        "{} appears more than once in {}, reading the entry at offset {}",
        member,
        archive_path.display(),
        record.header_start
    );
    let mut reader = BufReader::new(File::open(archive_path).map_err(archive_err)?);
    reader
        .seek(SeekFrom::Start(record.header_start))
        .map_err(archive_err)?;
    let mut entry = read_zipfile_from_stream(&mut reader)
        .map_err(|e| archive_err(e.into()))?
        .ok_or_else(|| {
            archive_err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("no local header for {} at offset {}", member, record.header_start),
            ))
        })?;
    write_member(&mut entry, dest, record.unix_mode)
}

const CENTRAL_HEADER_SIGNATURE: u32 = 0x0201_4b50;
const CENTRAL_HEADER_LEN: usize = 46;
const ZIP64_EXTRA_ID: u16 = 0x0001;
const ZIP64_MARKER: u32 = u32::MAX;
const UNIX_HOST: u8 = 3;

/// Central directory fields of one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CentralRecord {
    /// Absolute offset of the entry's local header
    header_start: u64,
    unix_mode: Option<u32>,
}

/// Find the first central directory record named `member`, in stored order
fn first_central_record(
    archive_path: &Path,
    directory_start: u64,
    archive_offset: u64,
    member: &str,
) -> io::Result<Option<CentralRecord>> {
    let mut reader = BufReader::new(File::open(archive_path)?);
    reader.seek(SeekFrom::Start(directory_start))?;

    let mut fixed = [0u8; CENTRAL_HEADER_LEN];
    loop {
        match reader.read_exact(&mut fixed) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        }
        if le_u32(&fixed, 0) != CENTRAL_HEADER_SIGNATURE {
            return Ok(None);
        }

        let host = fixed[5];
        let compressed_size = le_u32(&fixed, 20);
        let uncompressed_size = le_u32(&fixed, 24);
        let name_len = le_u16(&fixed, 28) as usize;
        let extra_len = le_u16(&fixed, 30) as usize;
        let comment_len = le_u16(&fixed, 32) as i64;
        let external_attributes = le_u32(&fixed, 38);
        let local_offset = le_u32(&fixed, 42);

        let mut name = vec![0u8; name_len];
        reader.read_exact(&mut name)?;
        let mut extra = vec![0u8; extra_len];
        reader.read_exact(&mut extra)?;
        reader.seek_relative(comment_len)?;

        if name != member.as_bytes() {
            continue;
        }

        let local_offset = if local_offset == ZIP64_MARKER {
            zip64_header_offset(
                &extra,
                uncompressed_size == ZIP64_MARKER,
                compressed_size == ZIP64_MARKER,
            )
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("missing zip64 header offset for {}", member),
                )
            })?
        } else {
            u64::from(local_offset)
        };

        let unix_mode =
            Some(external_attributes >> 16).filter(|mode| host == UNIX_HOST && *mode != 0);

        return Ok(Some(CentralRecord {
            header_start: archive_offset + local_offset,
            unix_mode,
        }));
    }
}

/// Local header offset from a zip64 extended information field
///
/// The field holds 8-byte values for the uncompressed size, compressed size
/// and header offset, each present only when its 32-bit slot is saturated.
fn zip64_header_offset(extra: &[u8], has_uncompressed: bool, has_compressed: bool) -> Option<u64> {
    let mut rest = extra;
    while rest.len() >= 4 {
        let id = u16::from_le_bytes([rest[0], rest[1]]);
        let len = u16::from_le_bytes([rest[2], rest[3]]) as usize;
        let data = rest.get(4..4 + len)?;

        if id == ZIP64_EXTRA_ID {
            let skip = 8 * (usize::from(has_uncompressed) + usize::from(has_compressed));
            let bytes = data.get(skip..skip + 8)?;
            return bytes.try_into().ok().map(u64::from_le_bytes);
        }
        rest = &rest[4 + len..];
    }
    None
}

fn le_u16(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}

fn le_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

/// Stream a member into `dest`, removing the partial file on failure
fn write_member(reader: &mut impl Read, dest: &Path, mode: Option<u32>) -> Result<()> {
    let result = copy_to(reader, dest, mode);

    if result.is_err() {
        if let Err(e) = fs::remove_file(dest) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove partial file {}: {}", dest.display(), e);
            }
        }
    }

    result.map_err(|source| Error::Extract {
        dest: dest.to_path_buf(),
        source,
    })
}

fn copy_to(reader: &mut impl Read, dest: &Path, mode: Option<u32>) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.create(true).write(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if let Some(mode) = mode {
            options.mode(mode & 0o7777);
        }
    }

    let mut out = options.open(dest)?;
    io::copy(reader, &mut out)?;
    out.sync_all()?;
    drop(out);

    // The open mode is filtered by the umask and ignored for existing files
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Some(mode) = mode {
            fs::set_permissions(dest, fs::Permissions::from_mode(mode & 0o7777))?;
        }
    }

    #[cfg(not(unix))]
    let _ = mode;

    Ok(())
}
