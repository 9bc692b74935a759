use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use base64::{engine::general_purpose, Engine as _};

/// Which copy path actually ran. The caller shows the same "copied"
/// feedback either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMethod {
    Platform,
    Osc52,
}

pub trait ClipboardBackend: Send {
    /// Copies `value`, falling back as needed. Never surfaces a failure.
    fn copy(&mut self, value: &str) -> CopyMethod;
}

/// Platform clipboard first, OSC 52 second.
#[derive(Default)]
pub struct SystemClipboard;

impl ClipboardBackend for SystemClipboard {
    fn copy(&mut self, value: &str) -> CopyMethod {
        let result =
            arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(value.to_string()));
        match result {
            Ok(()) => CopyMethod::Platform,
            Err(_) => {
                osc52_copy(value);
                CopyMethod::Osc52
            }
        }
    }
}

/// OSC 52 asks the hosting terminal to set its clipboard. It is the copy
/// path that still works over SSH, where no display server is reachable.
fn osc52_copy(value: &str) {
    let payload = general_purpose::STANDARD.encode(value.as_bytes());
    let mut out = io::stdout();
    let _ = write!(out, "\x1b]52;c;{payload}\x07");
    let _ = out.flush();
}

/// Records copied values instead of touching any clipboard.
#[derive(Default, Clone)]
pub struct RecordingClipboard {
    copied: Arc<Mutex<Vec<String>>>,
}

impl RecordingClipboard {
    pub fn copied(&self) -> Vec<String> {
        self.copied.lock().expect("clipboard record lock").clone()
    }
}

impl ClipboardBackend for RecordingClipboard {
    fn copy(&mut self, value: &str) -> CopyMethod {
        self.copied
            .lock()
            .expect("clipboard record lock")
            .push(value.to_string());
        CopyMethod::Platform
    }
}
