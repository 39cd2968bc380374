//! `circumflex build`: compile asset bundles.

use anyhow::{Context, Result};
use std::time::Instant;

use crate::asset::{AssetCompiler, AssetManifest, descriptor};
use crate::config::Configuration;
use crate::log;

/// Compile every bundle of `conf` and write `assets.json`.
///
/// `force_minify` turns minification on even when `assets.minify` is unset.
pub fn build_assets(conf: &Configuration, force_minify: bool) -> Result<AssetManifest> {
    let start = Instant::now();
    let descriptor = descriptor::parse_config(conf);
    if descriptor.is_empty() {
        log!("warn"; "no bundles configured under `assets`");
    }

    let mut compiler = AssetCompiler::from_config(conf);
    if force_minify {
        let mut options = compiler.options();
        options.minify = true;
        compiler = compiler.with_options(options);
    }

    let manifest = compiler.compile(&descriptor).with_context(|| {
        format!("failed to compile assets into '{}'", compiler.public_root().display())
    })?;

    if !compiler.options().quiet {
        log!(
            "build";
            "{} bundle(s) compiled in {:.2?}",
            manifest.len(),
            start.elapsed()
        );
    }
    Ok(manifest)
}
