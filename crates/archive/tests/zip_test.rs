use nodekit_archive::{ArchiveFormat, unpack, unzip, zip};
use starbase_sandbox::create_empty_sandbox;
use std::fs;

#[test]
fn zips_and_unzips_file() {
    let sandbox = create_empty_sandbox();
    sandbox.create_file("input/file.txt", "file");

    let archive = sandbox.path().join("out.zip");

    zip(sandbox.path().join("input/file.txt"), &archive, None).unwrap();

    assert!(archive.exists());

    let output = sandbox.path().join("out");

    unzip(&archive, &output, None).unwrap();

    assert_eq!(fs::read_to_string(output.join("file.txt")).unwrap(), "file");
}

#[test]
fn zips_directory_and_removes_prefix() {
    let sandbox = create_empty_sandbox();
    sandbox.create_file("input/node.exe", "binary");
    sandbox.create_file("input/node_modules/npm/bin/npm-cli.js", "cli");

    let archive = sandbox.path().join("out.zip");

    zip(sandbox.path().join("input"), &archive, Some("node-v1.0.0-win-x64")).unwrap();

    let output = sandbox.path().join("out");

    unpack(
        &archive,
        &output,
        ArchiveFormat::Zip,
        Some("node-v1.0.0-win-x64"),
    )
    .unwrap();

    assert!(output.join("node.exe").exists());
    assert!(output.join("node_modules/npm/bin/npm-cli.js").exists());
}

#[test]
fn errors_for_corrupt_archive() {
    let sandbox = create_empty_sandbox();
    sandbox.create_file("broken.zip", "not a zip");

    assert!(
        unzip(
            sandbox.path().join("broken.zip"),
            sandbox.path().join("out"),
            None
        )
        .is_err()
    );
}
