//! Default-browser launcher command for the current platform.

use super::CommandSpec;

pub fn open_command(url: &str) -> CommandSpec {
    if cfg!(target_os = "windows") {
        // `start` treats the first quoted argument as a window title.
        CommandSpec::new("cmd").args(["/C", "start", "", url])
    } else if cfg!(target_os = "macos") {
        CommandSpec::new("open").arg(url)
    } else {
        CommandSpec::new("xdg-open").arg(url)
    }
}

/// Root URL of a server bound on the local machine.
pub fn local_url(port: u16) -> String {
    format!("http://localhost:{}/", port)
}
