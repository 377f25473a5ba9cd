/// Name of the variable holding the executable search path. Windows
/// treats it case-insensitively but reports it as `Path`.
#[inline]
pub fn path_env_key() -> &'static str {
    if cfg!(windows) { "Path" } else { "PATH" }
}
