use nodekit_archive::{ArchiveError, ArchiveFormat, tar, unpack, untar};
use starbase_sandbox::create_empty_sandbox;
use std::fs;

fn create_fixture(sandbox: &starbase_sandbox::Sandbox) {
    sandbox.create_file("input/file.txt", "file");
    sandbox.create_file("input/nested/other.txt", "other");
}

#[test]
fn tars_and_untars_file() {
    let sandbox = create_empty_sandbox();
    create_fixture(&sandbox);

    let input = sandbox.path().join("input/file.txt");
    let archive = sandbox.path().join("out.tar.gz");

    tar(&input, &archive, None).unwrap();

    assert!(archive.exists());
    assert_ne!(archive.metadata().unwrap().len(), 0);

    let output = sandbox.path().join("out");

    untar(&archive, &output, None).unwrap();

    assert_eq!(fs::read_to_string(output.join("file.txt")).unwrap(), "file");
}

#[test]
fn tars_directory_with_prefix() {
    let sandbox = create_empty_sandbox();
    create_fixture(&sandbox);

    let archive = sandbox.path().join("out.tar.gz");

    tar(sandbox.path().join("input"), &archive, Some("some/prefix")).unwrap();

    let output = sandbox.path().join("out");

    untar(&archive, &output, None).unwrap();

    assert!(output.join("some/prefix/file.txt").exists());
    assert!(output.join("some/prefix/nested/other.txt").exists());
}

#[test]
fn removes_prefix_when_unpacking() {
    let sandbox = create_empty_sandbox();
    create_fixture(&sandbox);

    let archive = sandbox.path().join("out.tar.gz");

    tar(sandbox.path().join("input"), &archive, Some("node-v1.0.0")).unwrap();

    let output = sandbox.path().join("out");

    unpack(&archive, &output, ArchiveFormat::TarGz, Some("node-v1.0.0")).unwrap();

    assert!(output.join("file.txt").exists());
    assert!(output.join("nested/other.txt").exists());
    assert!(!output.join("node-v1.0.0").exists());
}

#[cfg(unix)]
#[test]
fn preserves_executable_bit() {
    use std::os::unix::fs::PermissionsExt;

    let sandbox = create_empty_sandbox();
    sandbox.create_file("input/bin/tool", "#!/bin/sh\necho hi\n");

    let tool = sandbox.path().join("input/bin/tool");
    fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

    let archive = sandbox.path().join("out.tar.gz");
    tar(sandbox.path().join("input"), &archive, None).unwrap();

    let output = sandbox.path().join("out");
    untar(&archive, &output, None).unwrap();

    let mode = fs::metadata(output.join("bin/tool"))
        .unwrap()
        .permissions()
        .mode();

    assert_eq!(mode & 0o111, 0o111);
}

#[test]
fn errors_for_corrupt_archive() {
    let sandbox = create_empty_sandbox();
    sandbox.create_file("broken.tar.gz", "not a gzip stream");

    let result = untar(
        sandbox.path().join("broken.tar.gz"),
        sandbox.path().join("out"),
        None,
    );

    assert!(result.is_err());
}

mod links {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::path::Path;

    fn create_linked_archive(path: &Path, kind: ::tar::EntryType, target: &str) {
        let file = fs::File::create(path).unwrap();
        let mut builder = ::tar::Builder::new(GzEncoder::new(file, Compression::fast()));

        let mut header = ::tar::Header::new_gnu();
        header.set_size(5);
        header.set_mode(0o755);
        header.set_entry_type(::tar::EntryType::Regular);
        builder
            .append_data(&mut header, "node-v1/bin/node", "hello".as_bytes())
            .unwrap();

        let mut link = ::tar::Header::new_gnu();
        link.set_size(0);
        link.set_mode(0o755);
        link.set_entry_type(kind);
        builder
            .append_link(&mut link, "node-v1/bin/node-link", target)
            .unwrap();

        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn unpacks_hard_links_relative_to_output() {
        let sandbox = create_empty_sandbox();
        let archive = sandbox.path().join("linked.tar.gz");

        create_linked_archive(&archive, ::tar::EntryType::Link, "node-v1/bin/node");

        let output = sandbox.path().join("out");

        untar(&archive, &output, Some("node-v1")).unwrap();

        assert_eq!(
            fs::read_to_string(output.join("bin/node-link")).unwrap(),
            "hello"
        );
    }

    #[test]
    fn rejects_hard_links_outside_output() {
        let sandbox = create_empty_sandbox();
        let archive = sandbox.path().join("linked.tar.gz");

        sandbox.create_file("secret.txt", "secret");
        create_linked_archive(&archive, ::tar::EntryType::Link, "../secret.txt");

        let result = untar(&archive, sandbox.path().join("out"), Some("node-v1"));

        assert!(matches!(result, Err(ArchiveError::UnsafeLink { .. })));
        assert!(!sandbox.path().join("out/bin/node-link").exists());
    }

    #[cfg(unix)]
    #[test]
    fn rejects_symlinks_outside_output() {
        let sandbox = create_empty_sandbox();
        let archive = sandbox.path().join("linked.tar.gz");

        create_linked_archive(&archive, ::tar::EntryType::Symlink, "../../../secret.txt");

        let result = untar(&archive, sandbox.path().join("out"), Some("node-v1"));

        assert!(matches!(result, Err(ArchiveError::UnsafeLink { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn unpacks_relative_symlinks() {
        let sandbox = create_empty_sandbox();
        let archive = sandbox.path().join("linked.tar.gz");

        create_linked_archive(&archive, ::tar::EntryType::Symlink, "node");

        let output = sandbox.path().join("out");

        untar(&archive, &output, Some("node-v1")).unwrap();

        assert_eq!(
            fs::read_to_string(output.join("bin/node-link")).unwrap(),
            "hello"
        );
    }
}
