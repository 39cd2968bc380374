//! Bundle manifest classification.
//!
//! ```toml
//! [assets]
//! minify = true
//! global = [
//!     "/css/main.css",
//!     { href = "/css/print.css", media = "print" },
//!     "/js/lib.js",
//!     "/js/app.js",
//! ]
//! ```
//!
//! Array entries are bundles; other entries (`minify`, `media`, ...) are
//! compiler switches and are skipped here.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::AssetKind;
use crate::config::Configuration;

/// Media used for stylesheets given as plain strings.
pub const DEFAULT_MEDIA: &str = "screen";

/// A script reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRef {
    pub src: String,
}

/// A stylesheet reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRef {
    pub href: String,
    pub media: String,
}

/// Ordered script and stylesheet references of one bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(default)]
    pub js: Vec<ScriptRef>,
    #[serde(default)]
    pub css: Vec<StyleRef>,
}

impl Bundle {
    pub fn is_empty(&self) -> bool {
        self.js.is_empty() && self.css.is_empty()
    }
}

/// Bundle name → bundle.
pub type Descriptor = BTreeMap<String, Bundle>;

/// Parser settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub default_media: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            default_media: DEFAULT_MEDIA.to_string(),
        }
    }
}

impl ParseOptions {
    /// Read `assets.media`, falling back to [`DEFAULT_MEDIA`].
    pub fn from_config(conf: &Configuration) -> Self {
        conf.get_str("assets.media")
            .filter(|m| !m.trim().is_empty())
            .map(|m| Self {
                default_media: m.to_string(),
            })
            .unwrap_or_default()
    }
}

/// Parse the `assets` section of `conf`.
pub fn parse_config(conf: &Configuration) -> Descriptor {
    parse(conf.get("assets"), &ParseOptions::from_config(conf))
}

/// Classify every bundle of `manifest`.
///
/// - strings ending in `.js` become scripts
/// - strings ending in `.css` become stylesheets with the default media
/// - objects with a string `href` become stylesheets, keeping their `media`
/// - anything else is dropped
///
/// Order within a bundle is preserved; nothing is deduplicated.
pub fn parse(manifest: Option<&Value>, options: &ParseOptions) -> Descriptor {
    let Some(Value::Object(entries)) = manifest else {
        return Descriptor::new();
    };

    entries
        .iter()
        .filter_map(|(name, items)| {
            let items = items.as_array()?;
            Some((name.clone(), parse_bundle(items, options)))
        })
        .collect()
}

fn parse_bundle(items: &[Value], options: &ParseOptions) -> Bundle {
    let mut bundle = Bundle::default();
    for item in items {
        match item {
            Value::String(reference) => match AssetKind::from_reference(reference) {
                Some(AssetKind::Script) => bundle.js.push(ScriptRef {
                    src: reference.clone(),
                }),
                Some(AssetKind::Stylesheet) => bundle.css.push(StyleRef {
                    href: reference.clone(),
                    media: options.default_media.clone(),
                }),
                None => {}
            },
            Value::Object(fields) => {
                let Some(href) = fields.get("href").and_then(Value::as_str) else {
                    continue;
                };
                let media = fields
                    .get("media")
                    .and_then(Value::as_str)
                    .unwrap_or(&options.default_media);
                bundle.css.push(StyleRef {
                    href: href.to_string(),
                    media: media.to_string(),
                });
            }
            _ => {}
        }
    }
    bundle
}
