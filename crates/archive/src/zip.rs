use crate::archive_error::ArchiveError;
use crate::helpers::{prepend_name, sanitize_entry_path};
use nodekit_common::color;
use starbase_utils::fs;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::{debug, trace};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

fn zip_contents(
    archive: &mut ZipWriter<File>,
    path: &Path,
    prefix: &str,
    is_root: bool,
) -> Result<(), ArchiveError> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let zip_error = |error| ArchiveError::Zip {
        path: path.to_path_buf(),
        error: Box::new(error),
    };

    #[allow(unused_mut)]
    let mut options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let metadata = path.metadata().map_err(|e| ArchiveError::io(path, e))?;

        options = options.unix_permissions(metadata.permissions().mode());
    }

    if path.is_file() {
        trace!("Zipping file {}", color::path(path));

        archive
            .start_file(prepend_name(name, prefix), options)
            .map_err(zip_error)?;

        let mut file = File::open(path).map_err(|e| ArchiveError::io(path, e))?;

        io::copy(&mut file, archive).map_err(|e| ArchiveError::io(path, e))?;

        return Ok(());
    }

    if path.is_dir() {
        let next_prefix = if is_root {
            prefix.to_owned()
        } else {
            prepend_name(name, prefix)
        };

        if !next_prefix.is_empty() {
            archive
                .add_directory(next_prefix.as_str(), options)
                .map_err(zip_error)?;
        }

        for entry in fs::read_dir(path)? {
            zip_contents(archive, &entry.path(), &next_prefix, false)?;
        }
    }

    Ok(())
}

/// Pack a file or directory into a `.zip` archive, nesting all
/// entries under the prefix when provided.
pub fn zip<I: AsRef<Path>, O: AsRef<Path>>(
    input_src: I,
    output_file: O,
    base_prefix: Option<&str>,
) -> Result<(), ArchiveError> {
    let input_src = input_src.as_ref();
    let output_file = output_file.as_ref();

    debug!(
        "Zipping archive with {} to {}",
        color::path(input_src),
        color::path(output_file),
    );

    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent)?;
    }

    let zip = File::create(output_file).map_err(|e| ArchiveError::io(output_file, e))?;
    let mut archive = ZipWriter::new(zip);

    zip_contents(
        &mut archive,
        input_src,
        base_prefix.unwrap_or_default(),
        true,
    )?;

    archive.finish().map_err(|error| ArchiveError::Zip {
        path: output_file.to_path_buf(),
        error: Box::new(error),
    })?;

    Ok(())
}

/// Unpack a `.zip` archive into the output directory.
pub fn unzip<I: AsRef<Path>, O: AsRef<Path>>(
    input_file: I,
    output_dir: O,
    remove_prefix: Option<&str>,
) -> Result<(), ArchiveError> {
    let input_file = input_file.as_ref();
    let output_dir = output_dir.as_ref();
    let zip_error = |error| ArchiveError::Zip {
        path: input_file.to_path_buf(),
        error: Box::new(error),
    };

    debug!(
        "Unzipping archive {} to {}",
        color::path(input_file),
        color::path(output_dir),
    );

    fs::create_dir_all(output_dir)?;

    let zip = File::open(input_file).map_err(|e| ArchiveError::io(input_file, e))?;
    let mut archive = ZipArchive::new(zip).map_err(zip_error)?;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i).map_err(zip_error)?;

        let Some(enclosed) = file.enclosed_name() else {
            trace!("Skipping unsafe entry {}", file.name());
            continue;
        };

        let Some(path) = sanitize_entry_path(&enclosed, remove_prefix) else {
            continue;
        };

        let output_path = output_dir.join(&path);

        if file.is_dir() {
            fs::create_dir_all(&output_path)?;
            continue;
        }

        if let Some(parent_dir) = output_path.parent() {
            fs::create_dir_all(parent_dir)?;
        }

        let mut out = File::create(&output_path).map_err(|e| ArchiveError::io(&output_path, e))?;

        io::copy(&mut file, &mut out).map_err(|e| ArchiveError::io(&output_path, e))?;

        trace!("Unzipping file {}", color::path(&output_path));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            if let Some(mode) = file.unix_mode() {
                std::fs::set_permissions(&output_path, std::fs::Permissions::from_mode(mode))
                    .map_err(|e| ArchiveError::io(&output_path, e))?;
            }
        }
    }

    Ok(())
}
