use std::sync::Arc;

use anyhow::{Context, Result};
use url::Url;

use crate::clipboard::SystemClipboard;
use crate::config;
use crate::data::{FileSource, HttpSource, LinkSource};
use crate::launch::BrowserLauncher;
use crate::ui;

pub fn run() -> Result<()> {
    let cfg = config::load(config::LoadOptions::default()).context("load config")?;

    let source = build_source(&cfg).context("prepare links source")?;
    let source_label = source.describe();

    let options = ui::Options {
        source,
        clipboard: Box::new(SystemClipboard),
        launcher: Box::new(BrowserLauncher),
        reduced_motion: cfg.ui.reduced_motion,
        timing: cfg.timing.clone(),
        status_message: format!(
            "Loading links from {source_label}. j/k move, Enter activates, r reloads, q quits."
        ),
        load_on_start: true,
    };

    let mut model = ui::Model::new(options);
    model.run()
}

/// An http(s) source URL gets the network loader; anything else is
/// treated as a file path.
fn build_source(cfg: &config::Config) -> Result<Arc<dyn LinkSource>> {
    let location = cfg.links.source.trim();
    if let Ok(url) = Url::parse(location) {
        if matches!(url.scheme(), "http" | "https") {
            let user_agent = format!("linkdeck/{}", crate::VERSION);
            return Ok(Arc::new(HttpSource::new(location.to_string(), user_agent)?));
        }
    }
    Ok(Arc::new(FileSource::new(location)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_specs_build_a_network_source() {
        let mut cfg = config::Config::default();
        cfg.links.source = "https://example.com/links.json".into();
        let source = build_source(&cfg).unwrap();
        assert_eq!(source.describe(), "https://example.com/links.json");
    }

    #[test]
    fn plain_paths_build_a_file_source() {
        let mut cfg = config::Config::default();
        cfg.links.source = "data/links.json".into();
        let source = build_source(&cfg).unwrap();
        assert_eq!(source.describe(), "data/links.json");
    }
}
