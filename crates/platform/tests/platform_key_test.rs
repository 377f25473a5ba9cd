use nodekit_platform::{HostArch, HostOs, PlatformError, PlatformKey};
use std::path::{Path, PathBuf};

mod detection {
    use super::*;

    #[test]
    fn maps_rust_consts() {
        let key = PlatformKey::from_rust_consts("linux", "x86_64").unwrap();

        assert_eq!(key, PlatformKey::from_parts(HostOs::Linux, HostArch::X64));
        assert_eq!(key.to_string(), "linux-x64");
    }

    #[test]
    fn maps_macos_to_darwin() {
        let key = PlatformKey::from_rust_consts("macos", "aarch64").unwrap();

        assert_eq!(key.to_string(), "darwin-arm64");
    }

    #[test]
    fn maps_windows_to_win() {
        let key = PlatformKey::from_rust_consts("windows", "x86").unwrap();

        assert_eq!(key.to_string(), "win-x86");
    }

    #[test]
    fn maps_ppc64_per_os() {
        assert_eq!(
            PlatformKey::from_rust_consts("linux", "powerpc64")
                .unwrap()
                .to_string(),
            "linux-ppc64le"
        );
        assert_eq!(
            PlatformKey::from_rust_consts("macos", "powerpc64")
                .unwrap()
                .to_string(),
            "darwin-ppc64"
        );
    }

    #[test]
    fn errors_for_unknown_os() {
        let error = PlatformKey::from_rust_consts("freebsd", "x86_64").unwrap_err();

        assert!(matches!(error, PlatformError::UnsupportedOs(os) if os == "freebsd"));
    }

    #[test]
    fn errors_for_unknown_arch() {
        let error = PlatformKey::from_rust_consts("linux", "riscv64").unwrap_err();

        assert!(matches!(error, PlatformError::UnsupportedArch { arch, .. } if arch == "riscv64"));
    }

    #[test]
    fn errors_for_s390x_outside_linux() {
        assert!(PlatformKey::from_rust_consts("windows", "s390x").is_err());
    }

    #[cfg(all(target_os = "linux", target_arch = "x86_64"))]
    #[test]
    fn detects_host() {
        assert_eq!(PlatformKey::detect().unwrap().to_string(), "linux-x64");
    }
}

mod distribution {
    use super::*;

    #[test]
    fn names_unix_archives() {
        let key = PlatformKey::from_parts(HostOs::Linux, HostArch::X64);

        assert_eq!(key.dist_name("18.16.0"), "node-v18.16.0-linux-x64");
        assert_eq!(
            key.archive_file_name("18.16.0"),
            "node-v18.16.0-linux-x64.tar.gz"
        );
    }

    #[test]
    fn names_windows_archives() {
        let key = PlatformKey::from_parts(HostOs::Windows, HostArch::X64);

        assert_eq!(key.archive_extension(), "zip");
        assert_eq!(key.archive_file_name("18.16.0"), "node-v18.16.0-win-x64.zip");
    }

    #[test]
    fn locates_unix_executables() {
        let key = PlatformKey::from_parts(HostOs::MacOS, HostArch::Arm64);
        let install = Path::new("/cache/18.16.0/darwin-arm64");

        assert_eq!(key.bin_dir(install), install.join("bin"));
        assert_eq!(key.node_path(install), install.join("bin/node"));
        assert_eq!(
            key.npm_cli_script(install),
            install.join("lib/node_modules/npm/bin/npm-cli.js")
        );
        assert_eq!(
            key.npx_cli_script(install),
            install.join("lib/node_modules/npm/bin/npx-cli.js")
        );
    }

    #[test]
    fn locates_windows_executables() {
        let key = PlatformKey::from_parts(HostOs::Windows, HostArch::X64);
        let install = PathBuf::from("cache");

        assert_eq!(key.bin_dir(&install), install);
        assert_eq!(key.node_path(&install), install.join("node.exe"));
        assert_eq!(key.cmd_name("pnpm"), "pnpm.cmd");
        assert_eq!(
            key.npm_cli_script(&install),
            install.join("node_modules").join("npm").join("bin").join("npm-cli.js")
        );
    }
}
