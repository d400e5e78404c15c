//! Clipboard hand-off for social links.
//!
//! The TUI owns the alternate screen, so links can't simply be printed
//! while it runs.  Copies go to the system clipboard when a helper is
//! available; the last copied link is also echoed to stdout after exit.

use std::io::{self, Write};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

/// Prefix of the post-exit line, easy to grep from wrapper scripts.
const LINK_PREFIX: &str = "__FOLIO_LINK__=";

/// Format the post-exit payload for a copied link.
pub fn exit_payload(link: &str) -> String {
    format!("{LINK_PREFIX}{link}")
}

/// Emit the post-exit payload on stdout.
pub fn print_exit_payload(link: Option<&str>) {
    if let Some(link) = link {
        println!("{}", exit_payload(link));
    }
}

/// A clipboard helper command that reads the text on stdin.
#[derive(Debug, Clone, Copy)]
struct ClipHelper {
    name: &'static str,
    program: &'static str,
    args: &'static [&'static str],
}

#[cfg(target_os = "macos")]
const HELPERS: &[ClipHelper] = &[ClipHelper { name: "pbcopy", program: "pbcopy", args: &[] }];

#[cfg(target_os = "windows")]
const HELPERS: &[ClipHelper] = &[ClipHelper { name: "clip", program: "cmd", args: &["/C", "clip"] }];

// Wayland first; xclip may also be installed under XWayland.
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const HELPERS: &[ClipHelper] = &[
    ClipHelper { name: "wl-copy", program: "wl-copy", args: &[] },
    ClipHelper { name: "xclip", program: "xclip", args: &["-selection", "clipboard"] },
];

#[derive(Debug, Error)]
enum ClipError {
    #[error("cannot start: {0}")]
    Spawn(#[source] io::Error),
    #[error("cannot write: {0}")]
    Write(#[source] io::Error),
    #[error("exited with {0}")]
    Status(ExitStatus),
}

/// Copy `text` to the system clipboard.  Returns the name of the helper
/// that took it, or `None` when every helper failed.
pub fn copy_to_clipboard(text: &str) -> Option<&'static str> {
    copy_with(HELPERS, text)
}

fn copy_with(helpers: &[ClipHelper], text: &str) -> Option<&'static str> {
    helpers.iter().find_map(|helper| match run_helper(helper, text) {
        Ok(()) => Some(helper.name),
        Err(err) => {
            tracing::debug!(helper = helper.name, %err, "clipboard helper failed");
            None
        }
    })
}

fn run_helper(helper: &ClipHelper, input: &str) -> Result<(), ClipError> {
    let mut child = Command::new(helper.program)
        .args(helper.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(ClipError::Spawn)?;

    // Taking stdin closes it on drop, so the helper sees EOF.
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(input.as_bytes()),
        None => Ok(()),
    };
    if let Err(err) = written {
        let _ = child.kill();
        let _ = child.wait();
        return Err(ClipError::Write(err));
    }

    let status = child.wait().map_err(ClipError::Spawn)?;
    if status.success() {
        Ok(())
    } else {
        Err(ClipError::Status(status))
    }
}
