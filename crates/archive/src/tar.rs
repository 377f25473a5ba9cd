use crate::archive_error::ArchiveError;
use crate::helpers::{link_stays_within, prepend_name, sanitize_entry_path};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use nodekit_common::color;
use starbase_utils::fs;
use std::fs::File;
use std::path::Path;
use tar::{Archive, Builder};
use tracing::{debug, trace};

/// Pack a file or directory into a `.tar.gz` archive, nesting all
/// entries under the prefix when provided.
pub fn tar<I: AsRef<Path>, O: AsRef<Path>>(
    input_src: I,
    output_file: O,
    base_prefix: Option<&str>,
) -> Result<(), ArchiveError> {
    let input_src = input_src.as_ref();
    let output_file = output_file.as_ref();

    debug!(
        "Packing tar archive with {} to {}",
        color::path(input_src),
        color::path(output_file),
    );

    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent)?;
    }

    let tar = File::create(output_file).map_err(|e| ArchiveError::io(output_file, e))?;
    let tar_gz = GzEncoder::new(tar, Compression::fast());
    let mut archive = Builder::new(tar_gz);
    let prefix = base_prefix.unwrap_or_default();

    if input_src.is_file() {
        let file_name = input_src
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();

        archive
            .append_path_with_name(input_src, prepend_name(file_name, prefix))
            .map_err(|e| ArchiveError::io(input_src, e))?;

        trace!("Packing file {}", color::path(input_src));
    } else {
        archive
            .append_dir_all(if prefix.is_empty() { "." } else { prefix }, input_src)
            .map_err(|e| ArchiveError::io(input_src, e))?;
    }

    archive
        .into_inner()
        .and_then(|encoder| encoder.finish())
        .map_err(|e| ArchiveError::io(output_file, e))?;

    Ok(())
}

/// Unpack a `.tar.gz` archive into the output directory.
pub fn untar<I: AsRef<Path>, O: AsRef<Path>>(
    input_file: I,
    output_dir: O,
    remove_prefix: Option<&str>,
) -> Result<(), ArchiveError> {
    let input_file = input_file.as_ref();
    let output_dir = output_dir.as_ref();
    let handle_input_error = |e| ArchiveError::io(input_file, e);

    debug!(
        "Unpacking tar archive {} to {}",
        color::path(input_file),
        color::path(output_dir),
    );

    fs::create_dir_all(output_dir)?;

    let tar_gz = File::open(input_file).map_err(handle_input_error)?;
    let tar = GzDecoder::new(tar_gz);
    let mut archive = Archive::new(tar);

    for entry_result in archive.entries().map_err(handle_input_error)? {
        let mut entry = entry_result.map_err(handle_input_error)?;
        let entry_path = entry.path().map_err(handle_input_error)?.into_owned();

        let Some(path) = sanitize_entry_path(&entry_path, remove_prefix) else {
            trace!("Skipping entry {}", color::path(&entry_path));
            continue;
        };

        let output_path = output_dir.join(&path);

        if let Some(parent_dir) = output_path.parent() {
            fs::create_dir_all(parent_dir)?;
        }

        let entry_type = entry.header().entry_type();

        if entry_type.is_hard_link() || entry_type.is_symlink() {
            let target = entry
                .link_name()
                .map_err(handle_input_error)?
                .map(|name| name.into_owned())
                .unwrap_or_default();
            let unsafe_link = || ArchiveError::UnsafeLink {
                path: entry_path.clone(),
                target: target.clone(),
            };

            // Hard link targets are archive paths, and `unpack` would
            // resolve them against the process working directory
            if entry_type.is_hard_link() {
                let source = sanitize_entry_path(&target, remove_prefix)
                    .map(|source| output_dir.join(source))
                    .ok_or_else(unsafe_link)?;

                if output_path.exists() {
                    fs::remove_file(&output_path)?;
                }

                std::fs::hard_link(&source, &output_path)
                    .map_err(|e| ArchiveError::io(&output_path, e))?;

                trace!("Linking file {}", color::path(&output_path));

                continue;
            }

            if !link_stays_within(&path, &target) {
                return Err(unsafe_link());
            }
        }

        entry
            .unpack(&output_path)
            .map_err(|e| ArchiveError::io(&output_path, e))?;

        trace!("Unpacking file {}", color::path(&output_path));
    }

    Ok(())
}
