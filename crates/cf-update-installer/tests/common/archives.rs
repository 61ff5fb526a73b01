//! Archive builders for extraction and download tests
//!
//! Entries are `(name, content, unix mode)` tuples written in order.

use std::fs;
use std::io::{self, Cursor, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub type Entry<'a> = (&'a str, &'a [u8], u32);

/// Build a gzip-compressed tar archive in memory
pub fn tar_gz_bytes(entries: &[Entry<'_>]) -> io::Result<Vec<u8>> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for (name, content, mode) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(*mode);
        header.set_cksum();
        builder.append_data(&mut header, name, *content)?;
    }

    builder.into_inner()?.finish()
}

/// Build a zip archive in memory
pub fn zip_bytes(entries: &[Entry<'_>]) -> io::Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, content, mode) in entries {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(*mode);
        writer.start_file(*name, options)?;
        writer.write_all(content)?;
    }

    Ok(writer.finish()?.into_inner())
}

/// Write a tar.gz archive to `path`
pub fn write_tar_gz(path: &Path, entries: &[Entry<'_>]) -> io::Result<()> {
    fs::write(path, tar_gz_bytes(entries)?)
}

/// Write a zip archive to `path`
pub fn write_zip(path: &Path, entries: &[Entry<'_>]) -> io::Result<()> {
    fs::write(path, zip_bytes(entries)?)
}

/// Standard release tarball: a README next to the `cf` binary
pub fn release_tar_gz(binary: &[u8]) -> Vec<u8> {
    tar_gz_bytes(&[
        ("LICENSE", b"Apache License".as_slice(), 0o644),
        ("cf", binary, 0o755),
    ])
    .expect("failed to build release tarball")
}

/// Standard Windows release zip containing `cf.exe`
pub fn release_zip(binary: &[u8]) -> Vec<u8> {
    zip_bytes(&[
        ("LICENSE", b"Apache License".as_slice(), 0o644),
        ("cf.exe", binary, 0o755),
    ])
    .expect("failed to build release zip")
}

/// Uncompressed tar stream, end-of-archive blocks included
pub fn tar_bytes(entries: &[Entry<'_>]) -> io::Result<Vec<u8>> {
    let mut builder = tar::Builder::new(Vec::new());

    for (name, content, mode) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(*mode);
        header.set_cksum();
        builder.append_data(&mut header, name, *content)?;
    }

    builder.into_inner()
}

/// Compress `data` as two concatenated gzip members split at `split_at`
pub fn gzip_two_members(data: &[u8], split_at: usize) -> io::Result<Vec<u8>> {
    let (head, tail) = data.split_at(split_at);
    let mut out = Vec::new();

    for part in [head, tail] {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(part)?;
        out.extend(encoder.finish()?);
    }

    Ok(out)
}

const LOCAL_HEADER: u32 = 0x0403_4b50;
const CENTRAL_HEADER: u32 = 0x0201_4b50;

/// Method field offset and name range of every local and central header
/// named `name`
fn zip_headers_named(archive: &[u8], name: &str) -> Vec<(usize, usize)> {
    let mut found = Vec::new();
    let mut pos = 0;

    while pos + 30 <= archive.len() {
        let signature = u32::from_le_bytes(archive[pos..pos + 4].try_into().unwrap());
        let layout = match signature {
            LOCAL_HEADER => Some((8, 26, 30)),
            CENTRAL_HEADER if pos + 46 <= archive.len() => Some((10, 28, 46)),
            _ => None,
        };

        if let Some((method_at, name_len_at, name_at)) = layout {
            let name_len = u16::from_le_bytes([
                archive[pos + name_len_at],
                archive[pos + name_len_at + 1],
            ]) as usize;
            let start = pos + name_at;
            if archive.get(start..start + name_len) == Some(name.as_bytes()) {
                found.push((pos + method_at, start));
            }
        }
        pos += 1;
    }

    found
}

/// Rename an entry in place; `from` and `to` must have the same length
///
/// `ZipWriter` refuses duplicate names, so archives with repeated entries
/// are built under distinct names and patched afterwards.
pub fn rename_zip_entry(archive: &mut [u8], from: &str, to: &str) {
    assert_eq!(from.len(), to.len());
    for (_, name_at) in zip_headers_named(archive, from) {
        archive[name_at..name_at + to.len()].copy_from_slice(to.as_bytes());
    }
}

/// Overwrite the compression method recorded for an entry
pub fn set_zip_compression_method(archive: &mut [u8], name: &str, method: u16) {
    for (method_at, _) in zip_headers_named(archive, name) {
        archive[method_at..method_at + 2].copy_from_slice(&method.to_le_bytes());
    }
}
