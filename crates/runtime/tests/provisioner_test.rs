use httpmock::prelude::*;
use nodekit_platform::{HostArch, HostOs, PlatformKey};
use nodekit_runtime::{
    Downloader, RetryPolicy, RuntimeError, RuntimeProvisioner, RuntimeSource,
    RuntimeSpec,
};
use nodekit_test_utils::{create_node_dist, create_script, mock_node_dist};
use starbase_sandbox::create_empty_sandbox;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn linux_x64() -> PlatformKey {
    PlatformKey::from_parts(HostOs::Linux, HostArch::X64)
}

fn create_spec(root: &Path, server: &MockServer) -> RuntimeSpec {
    let mut spec = RuntimeSpec::new("18.16.0", root.join("node"));
    spec.dist_url = server.base_url();
    spec
}

fn create_provisioner(platform: PlatformKey) -> RuntimeProvisioner {
    RuntimeProvisioner::new(
        platform,
        Downloader::new().set_retry_policy(RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
        }),
    )
}

mod provision {
    use super::*;

    #[tokio::test]
    async fn installs_into_version_and_platform_dir() {
        let sandbox = create_empty_sandbox();
        let server = MockServer::start_async().await;
        let dist = create_node_dist(sandbox.path(), "18.16.0", linux_x64());
        mock_node_dist(&server, &dist, None).await;

        let spec = create_spec(sandbox.path(), &server);
        let handle = create_provisioner(linux_x64())
            .provision(&spec)
            .await
            .unwrap();

        let install_dir = sandbox.path().join("node/18.16.0/linux-x64");

        assert_eq!(handle.source, RuntimeSource::Downloaded);
        assert_eq!(handle.version, "18.16.0");
        assert_eq!(handle.node_path, install_dir.join("bin/node"));
        assert_eq!(handle.bin_dir, install_dir.join("bin"));
        assert_eq!(
            handle.npm_path,
            install_dir.join("lib/node_modules/npm/bin/npm-cli.js")
        );
        assert!(handle.node_path.exists());
    }

    #[tokio::test]
    async fn second_provision_does_no_work() {
        let sandbox = create_empty_sandbox();
        let server = MockServer::start_async().await;
        let dist = create_node_dist(sandbox.path(), "18.16.0", linux_x64());
        let mocks = mock_node_dist(&server, &dist, None).await;

        let spec = create_spec(sandbox.path(), &server);
        let provisioner = create_provisioner(linux_x64());

        let first = provisioner.provision(&spec).await.unwrap();

        // Removing the archive proves nothing is extracted again
        std::fs::remove_file(spec.downloads_dir().join("node-v18.16.0-linux-x64.tar.gz")).unwrap();

        let second = provisioner.provision(&spec).await.unwrap();
        let third = create_provisioner(linux_x64()).provision(&spec).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first, third);

        mocks.archive.assert_hits_async(1).await;
        mocks.checksums.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn concurrent_provisions_share_one_download() {
        let sandbox = create_empty_sandbox();
        let server = MockServer::start_async().await;
        let dist = create_node_dist(sandbox.path(), "18.16.0", linux_x64());
        let mocks = mock_node_dist(&server, &dist, Some(Duration::from_millis(200))).await;

        let spec = Arc::new(create_spec(sandbox.path(), &server));
        let provisioner = Arc::new(create_provisioner(linux_x64()));
        let mut handles = vec![];

        for _ in 0..4 {
            let spec = Arc::clone(&spec);
            let provisioner = Arc::clone(&provisioner);

            handles.push(tokio::spawn(
                async move { provisioner.provision(&spec).await },
            ));
        }

        let mut results = vec![];

        for handle in handles {
            results.push(handle.await.unwrap().unwrap());
        }

        assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
        mocks.archive.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn provisions_windows_zip_distributions() {
        let platform = PlatformKey::from_parts(HostOs::Windows, HostArch::X64);
        let sandbox = create_empty_sandbox();
        let server = MockServer::start_async().await;
        let dist = create_node_dist(sandbox.path(), "18.16.0", platform);
        mock_node_dist(&server, &dist, None).await;

        let spec = create_spec(sandbox.path(), &server);
        let handle = create_provisioner(platform).provision(&spec).await.unwrap();
        let install_dir = sandbox.path().join("node/18.16.0/win-x64");

        assert_eq!(handle.node_path, install_dir.join("node.exe"));
        assert_eq!(
            handle.npm_path,
            install_dir.join("node_modules/npm/bin/npm-cli.js")
        );
    }

    #[tokio::test]
    async fn malformed_archive_is_not_promoted() {
        let sandbox = create_empty_sandbox();
        let server = MockServer::start_async().await;

        // An archive without the bundled npm
        sandbox.create_file("broken/node-v18.16.0-linux-x64/bin/node", "");
        nodekit_archive::tar(
            sandbox.path().join("broken/node-v18.16.0-linux-x64"),
            sandbox.path().join("broken.tar.gz"),
            Some("node-v18.16.0-linux-x64"),
        )
        .unwrap();

        let bytes = std::fs::read(sandbox.path().join("broken.tar.gz")).unwrap();

        server
            .mock_async(|when, then| {
                when.method(GET).path("/v18.16.0/node-v18.16.0-linux-x64.tar.gz");
                then.status(200).body(bytes);
            })
            .await;

        let mut spec = create_spec(sandbox.path(), &server);
        spec.verify_checksum = false;

        let error = create_provisioner(linux_x64())
            .provision(&spec)
            .await
            .unwrap_err();

        assert!(matches!(error, RuntimeError::MalformedDistribution { .. }));

        let version_dir = sandbox.path().join("node/18.16.0");

        assert!(!version_dir.join("linux-x64").exists());

        if version_dir.exists() {
            assert_eq!(std::fs::read_dir(version_dir).unwrap().count(), 0);
        }
    }
}

#[cfg(unix)]
mod round_trip {
    use super::*;
    use nodekit_process::Command;

    #[tokio::test]
    async fn extracted_node_reports_requested_version() {
        let sandbox = create_empty_sandbox();
        let server = MockServer::start_async().await;
        let dist = create_node_dist(sandbox.path(), "18.16.0", linux_x64());
        mock_node_dist(&server, &dist, None).await;

        let spec = create_spec(sandbox.path(), &server);
        let handle = create_provisioner(linux_x64())
            .provision(&spec)
            .await
            .unwrap();

        let output = Command::new(&handle.node_path)
            .arg("--version")
            .exec_capture_output()
            .await
            .unwrap();

        assert_eq!(output.stdout_string(), "v18.16.0");
    }
}

#[cfg(unix)]
mod system {
    use super::*;

    fn create_system_node(root: &Path, version: &str) -> std::path::PathBuf {
        let node = root.join("system/bin/node");

        create_script(&node, &format!("#!/bin/sh\necho v{version}\n"));
        create_script(&root.join("system/bin/npm"), "#!/bin/sh\necho npm\n");

        node
    }

    fn create_system_spec(root: &Path, command: &Path, version: &str) -> RuntimeSpec {
        let mut spec = RuntimeSpec::new(version, root.join("node"));
        spec.download = false;
        spec.command = command.to_string_lossy().to_string();
        spec
    }

    #[tokio::test]
    async fn uses_matching_system_runtime() {
        let sandbox = create_empty_sandbox();
        let node = create_system_node(sandbox.path(), "18.16.1");
        let spec = create_system_spec(sandbox.path(), &node, "18.16.0");

        let handle = create_provisioner(linux_x64())
            .provision(&spec)
            .await
            .unwrap();

        assert_eq!(handle.source, RuntimeSource::System);
        assert_eq!(handle.node_path, node);
        assert_eq!(handle.version, "18.16.1");
        assert_eq!(handle.npm_path, sandbox.path().join("system/bin/npm"));
        assert!(!sandbox.path().join("node").exists());
    }

    #[tokio::test]
    async fn errors_for_version_mismatch() {
        let sandbox = create_empty_sandbox();
        let node = create_system_node(sandbox.path(), "16.20.0");
        let spec = create_system_spec(sandbox.path(), &node, "18.16.0");

        let error = create_provisioner(linux_x64())
            .provision(&spec)
            .await
            .unwrap_err();

        assert!(matches!(error, RuntimeError::SystemNodeVersionMismatch { .. }));
    }

    #[tokio::test]
    async fn errors_when_not_found() {
        let sandbox = create_empty_sandbox();
        let spec = create_system_spec(
            sandbox.path(),
            &sandbox.path().join("missing/node"),
            "18.16.0",
        );

        let error = create_provisioner(linux_x64())
            .provision(&spec)
            .await
            .unwrap_err();

        assert!(matches!(error, RuntimeError::SystemNodeNotFound { .. }));
    }
}
