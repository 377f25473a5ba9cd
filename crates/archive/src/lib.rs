mod archive_error;
mod archive_format;
mod helpers;
mod tar;
mod zip;

pub use crate::tar::*;
pub use crate::zip::*;
pub use archive_error::*;
pub use archive_format::*;

use std::path::Path;

/// Unpack an archive of the given format into the output directory,
/// optionally stripping a leading directory from every entry.
pub fn unpack<I: AsRef<Path>, O: AsRef<Path>>(
    input_file: I,
    output_dir: O,
    format: ArchiveFormat,
    remove_prefix: Option<&str>,
) -> Result<(), ArchiveError> {
    match format {
        ArchiveFormat::TarGz => untar(input_file, output_dir, remove_prefix),
        ArchiveFormat::Zip => unzip(input_file, output_dir, remove_prefix),
    }
}
