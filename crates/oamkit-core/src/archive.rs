//! `.tar.gz` input and output for bundles

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::io::{Read, Write};
use tar::{Archive, Builder, EntryType, Header};

use crate::bundle::BundleFile;
use crate::error::{BundleError, Result};

const ARCHIVE: &str = "archive";

/// Read every regular file of a gzip-compressed tar stream, in archive order
///
/// Directories are skipped. Links and other special entries are ignored.
pub fn extract_files(bytes: &[u8]) -> Result<Vec<BundleFile>> {
    let mut archive = Archive::new(GzDecoder::new(bytes));
    let entries = archive
        .entries()
        .map_err(|e| BundleError::decode(ARCHIVE, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let mut entry = entry.map_err(|e| BundleError::decode(ARCHIVE, e))?;
        let name = entry
            .path()
            .map_err(|e| BundleError::decode(ARCHIVE, e))?
            .to_string_lossy()
            .to_string();

        match entry.header().entry_type() {
            EntryType::Regular | EntryType::Continuous => {
                let mut content = Vec::new();
                entry
                    .read_to_end(&mut content)
                    .map_err(|e| BundleError::decode(&name, e))?;
                files.push(BundleFile { name, content });
            }
            EntryType::Directory => {
                tracing::debug!(entry = %name, "skipping directory entry");
            }
            other => {
                tracing::warn!(entry = %name, kind = ?other, "ignoring non-regular archive entry");
            }
        }
    }
    Ok(files)
}

/// Pack files into a reproducible `.tar.gz` stream
pub fn pack_files(files: &[BundleFile]) -> Result<Vec<u8>> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = Builder::new(encoder);

    for file in files {
        add_bytes_to_archive(&mut builder, &file.name, &file.content)?;
    }

    let encoder = builder.into_inner()?;
    Ok(encoder.finish()?)
}

fn add_bytes_to_archive<W: Write>(
    builder: &mut Builder<W>,
    archive_path: &str,
    content: &[u8],
) -> Result<()> {
    let mut header = Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(0);
    header.set_cksum();

    builder.append_data(&mut header, archive_path, content)?;
    Ok(())
}
