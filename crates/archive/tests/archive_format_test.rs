use nodekit_archive::{ArchiveError, ArchiveFormat};
use std::path::Path;

#[test]
fn detects_formats() {
    assert_eq!(
        ArchiveFormat::from_path(Path::new("node-v18.16.0-linux-x64.tar.gz")).unwrap(),
        ArchiveFormat::TarGz
    );
    assert_eq!(
        ArchiveFormat::from_path(Path::new("pkg.tgz")).unwrap(),
        ArchiveFormat::TarGz
    );
    assert_eq!(
        ArchiveFormat::from_path(Path::new("node-v18.16.0-win-x64.zip")).unwrap(),
        ArchiveFormat::Zip
    );
}

#[test]
fn errors_for_unknown_formats() {
    let error = ArchiveFormat::from_path(Path::new("node-v18.16.0-linux-x64.tar.xz")).unwrap_err();

    assert!(matches!(error, ArchiveError::UnsupportedFormat { .. }));
}
