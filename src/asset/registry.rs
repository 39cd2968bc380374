//! Runtime view of bundles for page rendering.
//!
//! In production the registry serves the compiled `assets.json`; when it is
//! missing or broken, and always in development, it serves the descriptor
//! parsed from configuration so every source file is referenced on its own.
//!
//! The current map sits behind `arc-swap`, so [`AssetRegistry::reload`] can
//! swap in a freshly compiled manifest while readers keep rendering.

use arc_swap::ArcSwap;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::UNIX_EPOCH,
};

use super::compile::MANIFEST_FILE;
use super::descriptor::{self, Bundle, Descriptor};
use crate::config::Configuration;
use crate::{debug, log};

/// Bundle lookups and tag rendering.
#[derive(Debug)]
pub struct AssetRegistry {
    bundles: ArcSwap<Descriptor>,
    fallback: Descriptor,
    production: bool,
    static_origin: String,
    public_dir: PathBuf,
}

impl AssetRegistry {
    pub fn open(conf: &Configuration) -> Self {
        let fallback = descriptor::parse_config(conf);
        if conf.get("assets").is_none() {
            log!("warn"; "configure `assets` with your CSS and JS files");
        }

        let registry = Self {
            bundles: ArcSwap::from_pointee(fallback.clone()),
            fallback,
            production: conf.production(),
            static_origin: conf.static_origin(),
            public_dir: conf.public_dir(),
        };
        registry.reload();
        registry
    }

    /// Registry over a fixed map, without manifest lookup.
    pub fn from_descriptor(
        bundles: Descriptor,
        static_origin: impl Into<String>,
        public_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            bundles: ArcSwap::from_pointee(bundles.clone()),
            fallback: bundles,
            production: false,
            static_origin: static_origin.into(),
            public_dir: public_dir.into(),
        }
    }

    /// Re-read `assets.json` (production only).
    ///
    /// Returns `true` if the compiled manifest is now in use. On failure the
    /// configured descriptor is served instead.
    pub fn reload(&self) -> bool {
        if !self.production {
            return false;
        }
        match load_manifest(&self.manifest_path()) {
            Ok(manifest) => {
                debug!("assets"; "loaded {} bundles from {}", manifest.len(), MANIFEST_FILE);
                self.bundles.store(Arc::new(manifest));
                true
            }
            Err(reason) => {
                log!("warn"; "{} {}, serving source files", self.manifest_path().display(), reason);
                self.bundles.store(Arc::new(self.fallback.clone()));
                false
            }
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.public_dir.join(MANIFEST_FILE)
    }

    pub fn static_origin(&self) -> &str {
        &self.static_origin
    }

    /// Snapshot of the current bundle map.
    pub fn bundles(&self) -> Arc<Descriptor> {
        self.bundles.load_full()
    }

    pub fn bundle(&self, name: &str) -> Option<Bundle> {
        self.bundles.load().get(name).cloned()
    }

    /// `<script>` tags for every script of `name`. Empty for unknown bundles.
    pub fn emit_js(&self, name: &str) -> String {
        let bundles = self.bundles.load();
        let Some(bundle) = bundles.get(name) else {
            return String::new();
        };
        bundle
            .js
            .iter()
            .map(|js| {
                format!(
                    r#"<script type="text/javascript" src="{}{}"></script>"#,
                    self.static_origin, js.src
                )
            })
            .collect()
    }

    /// `<link rel="stylesheet">` tags for every stylesheet of `name`.
    pub fn emit_css(&self, name: &str) -> String {
        let bundles = self.bundles.load();
        let Some(bundle) = bundles.get(name) else {
            return String::new();
        };
        bundle
            .css
            .iter()
            .map(|css| {
                format!(
                    r#"<link rel="stylesheet" href="{}{}" media="{}"/>"#,
                    self.static_origin, css.href, css.media
                )
            })
            .collect()
    }

    /// Static URL with the file's mtime (milliseconds) as a cache buster.
    ///
    /// The query is omitted when the file cannot be inspected.
    pub fn static_url(&self, resource: &str) -> String {
        let uri = format!("{}{}", self.static_origin, resource);
        match mtime_millis(&self.public_dir.join(resource.trim_start_matches('/'))) {
            Some(millis) => format!("{uri}?{millis}"),
            None => uri,
        }
    }
}

fn load_manifest(path: &Path) -> Result<Descriptor, String> {
    let text = fs::read_to_string(path).map_err(|_| "missing".to_string())?;
    serde_json::from_str(&text).map_err(|e| format!("broken ({e})"))
}

fn mtime_millis(path: &Path) -> Option<u128> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    Some(modified.duration_since(UNIX_EPOCH).ok()?.as_millis())
}
