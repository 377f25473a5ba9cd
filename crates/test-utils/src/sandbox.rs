use std::fs;
use std::path::Path;

/// Write an executable shell script.
pub fn create_script(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }

    fs::write(path, contents).unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }
}

/// An empty sandbox that runs the `nodekit` binary. Downloads are
/// disabled unless a test opts back in, so nothing reaches the network.
pub fn create_nodekit_sandbox() -> starbase_sandbox::Sandbox {
    let mut sandbox = starbase_sandbox::create_empty_sandbox();

    sandbox.settings.bin = "nodekit".into();
    sandbox
        .settings
        .env
        .insert("NODEKIT_LOG".into(), "nodekit=debug".into());
    sandbox
        .settings
        .env
        .insert("NODEKIT_NODE_DOWNLOAD".into(), "false".into());

    sandbox
}
