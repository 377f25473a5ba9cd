use crate::sandbox::create_script;
use httpmock::prelude::*;
use httpmock::{Mock, MockServer};
use nodekit_archive::{tar, zip};
use nodekit_hash::hash_file_sha256;
use nodekit_platform::PlatformKey;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A fake Node.js distribution archive, packed the same way as the real ones.
pub struct NodeDist {
    pub archive_path: PathBuf,
    pub archive_name: String,
    pub bytes: Vec<u8>,
    pub checksum: String,
    pub platform: PlatformKey,
    pub version: String,
}

impl NodeDist {
    pub fn shasums(&self) -> String {
        format!(
            "0000000000000000000000000000000000000000000000000000000000000000  node-v{}-aix-ppc64.tar.gz\n{}  {}\n",
            self.version, self.checksum, self.archive_name
        )
    }

    pub fn archive_url_path(&self) -> String {
        format!("/v{}/{}", self.version, self.archive_name)
    }

    pub fn checksum_url_path(&self) -> String {
        format!("/v{}/SHASUMS256.txt", self.version)
    }
}

/// Build a distribution archive whose `node` prints its version, and that
/// bundles npm scripts which echo their arguments.
pub fn create_node_dist(work_dir: &Path, version: &str, platform: PlatformKey) -> NodeDist {
    let dist_name = platform.dist_name(version);
    let source_dir = work_dir.join("dist-src").join(&dist_name);
    let install = source_dir.as_path();

    create_script(
        &platform.node_path(install),
        &format!(
            "#!/bin/sh\nif [ \"$1\" = \"--version\" ]; then\n  echo v{version}\n  exit 0\nfi\nexec sh \"$@\"\n"
        ),
    );
    create_script(
        &platform.npm_cli_script(install),
        "echo \"npm $@\"\n",
    );
    create_script(
        &platform.npx_cli_script(install),
        "echo \"npx $@\"\n",
    );

    let archive_name = platform.archive_file_name(version);
    let archive_path = work_dir.join("dist").join(&archive_name);

    if platform.os.is_windows() {
        zip(&source_dir, &archive_path, Some(&dist_name)).unwrap();
    } else {
        tar(&source_dir, &archive_path, Some(&dist_name)).unwrap();
    }

    NodeDist {
        bytes: fs::read(&archive_path).unwrap(),
        checksum: hash_file_sha256(&archive_path).unwrap(),
        archive_path,
        archive_name,
        platform,
        version: version.to_owned(),
    }
}

/// Mocks for the archive and checksum endpoints of a distribution.
pub struct NodeDistMocks<'server> {
    pub archive: Mock<'server>,
    pub checksums: Mock<'server>,
}

pub async fn mock_node_dist<'server>(
    server: &'server MockServer,
    dist: &NodeDist,
    delay: Option<Duration>,
) -> NodeDistMocks<'server> {
    let bytes = dist.bytes.clone();
    let archive = server
        .mock_async(|when, then| {
            when.method(GET).path(dist.archive_url_path());

            let then = then.status(200).body(bytes);

            if let Some(delay) = delay {
                then.delay(delay);
            }
        })
        .await;

    let shasums = dist.shasums();
    let checksums = server
        .mock_async(|when, then| {
            when.method(GET).path(dist.checksum_url_path());
            then.status(200).body(shasums);
        })
        .await;

    NodeDistMocks { archive, checksums }
}
