use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};

pub trait Launcher: Send {
    fn open(&mut self, url: &str) -> Result<()>;
}

/// Opens URLs in the system browser, in a tab detached from this process.
#[derive(Default)]
pub struct BrowserLauncher;

impl Launcher for BrowserLauncher {
    fn open(&mut self, url: &str) -> Result<()> {
        webbrowser::open(url).with_context(|| format!("open {url} in browser"))
    }
}

/// Records opened URLs instead of launching anything.
#[derive(Default, Clone)]
pub struct RecordingLauncher {
    opened: Arc<Mutex<Vec<String>>>,
}

impl RecordingLauncher {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().expect("launcher record lock").clone()
    }
}

impl Launcher for RecordingLauncher {
    fn open(&mut self, url: &str) -> Result<()> {
        self.opened
            .lock()
            .expect("launcher record lock")
            .push(url.to_string());
        Ok(())
    }
}
