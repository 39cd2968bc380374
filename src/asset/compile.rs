//! Production asset compilation.
//!
//! ```text
//! descriptor ──► preprocess (.styl → .css, unique hrefs, parallel)
//!            ──► per bundle (parallel)
//!                 ├─ scripts: read → join → fingerprint → [minify] → write
//!                 └─ styles:  group by media → read → join → fingerprint → write
//!            ──► barrier ──► assets.json (temp file + rename)
//! ```
//!
//! Output names embed the fingerprint of the joined, unminified text:
//! `/generated/<bundle>_<8 hex>.<js|css>`.

use rayon::prelude::*;
use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use super::descriptor::{self, Bundle, Descriptor, ScriptRef, StyleRef};
use super::preprocess::{self, CommandPreprocessor, StylePreprocessor};
use super::{AssetError, AssetKind, minify};
use crate::config::Configuration;
use crate::utils::hash;
use crate::{debug, log};

/// Directory under the public root receiving generated bundles.
pub const GENERATED_DIR: &str = "generated";
/// Manifest file name under the public root.
pub const MANIFEST_FILE: &str = "assets.json";
/// Inserted between concatenated files.
pub const SEPARATOR: &str = "\n";

/// Compiled bundle name → generated references.
pub type AssetManifest = Descriptor;

/// Compiler switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Minify generated files. Fingerprints are unaffected.
    pub minify: bool,
    /// Suppress per-file logging.
    pub quiet: bool,
}

impl CompileOptions {
    /// `assets.minify` or `assets.uglify` enable minification; `silent`
    /// suppresses logging.
    pub fn from_config(conf: &Configuration) -> Self {
        let flag = |key| conf.get_bool(key).unwrap_or(false);
        Self {
            minify: flag("assets.minify") || flag("assets.uglify"),
            quiet: conf.silent(),
        }
    }
}

/// Builds fingerprinted bundles under a public root.
pub struct AssetCompiler {
    public_root: PathBuf,
    options: CompileOptions,
    preprocessor: Option<Box<dyn StylePreprocessor>>,
}

impl AssetCompiler {
    pub fn new(public_root: impl Into<PathBuf>, options: CompileOptions) -> Self {
        Self {
            public_root: public_root.into(),
            options,
            preprocessor: None,
        }
    }

    /// Compiler for `<root>/public` with options and preprocessor from `conf`.
    pub fn from_config(conf: &Configuration) -> Self {
        let compiler = Self::new(conf.public_dir(), CompileOptions::from_config(conf));
        match CommandPreprocessor::from_config(conf) {
            Some(pre) => compiler.with_preprocessor(pre),
            None => compiler,
        }
    }

    pub fn with_preprocessor(mut self, preprocessor: impl StylePreprocessor + 'static) -> Self {
        self.preprocessor = Some(Box::new(preprocessor));
        self
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }

    pub fn public_root(&self) -> &Path {
        &self.public_root
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.public_root.join(MANIFEST_FILE)
    }

    /// Compile every bundle and write `assets.json`.
    ///
    /// The manifest is written once, after all bundles succeeded. On error
    /// the previous manifest is left untouched.
    pub fn compile(&self, descriptor: &Descriptor) -> Result<AssetManifest, AssetError> {
        let generated = self.public_root.join(GENERATED_DIR);
        fs::create_dir_all(&generated).map_err(|e| AssetError::CreateDir(generated.clone(), e))?;

        self.preprocess_all(descriptor)?;

        let manifest = descriptor
            .par_iter()
            .map(|(name, bundle)| {
                self.pack_bundle(name, bundle)
                    .map(|packed| (name.clone(), packed))
            })
            .collect::<Result<AssetManifest, AssetError>>()?;

        self.write_manifest(&manifest)?;
        Ok(manifest)
    }

    /// Both pipelines of one bundle, run concurrently.
    fn pack_bundle(&self, name: &str, bundle: &Bundle) -> Result<Bundle, AssetError> {
        let (js, css) = rayon::join(
            || self.pack_scripts(name, &bundle.js),
            || self.pack_styles(name, &bundle.css),
        );
        Ok(Bundle { js: js?, css: css? })
    }

    fn pack_scripts(&self, name: &str, scripts: &[ScriptRef]) -> Result<Vec<ScriptRef>, AssetError> {
        if scripts.is_empty() {
            return Ok(Vec::new());
        }
        let text = self.concat(scripts.iter().map(|s| s.src.as_str()))?;
        let src = self.emit(name, AssetKind::Script, text)?;
        Ok(vec![ScriptRef { src }])
    }

    fn pack_styles(&self, name: &str, styles: &[StyleRef]) -> Result<Vec<StyleRef>, AssetError> {
        group_by_media(styles)
            .into_iter()
            .map(|(media, members)| -> Result<StyleRef, AssetError> {
                let text = self.concat(members.iter().map(|s| s.href.as_str()))?;
                let href = self.emit(name, AssetKind::Stylesheet, text)?;
                Ok(StyleRef { href, media })
            })
            .collect()
    }

    /// Read referenced files in order and join them.
    fn concat<'a>(&self, references: impl Iterator<Item = &'a str>) -> Result<String, AssetError> {
        let files: Vec<PathBuf> = references.map(|r| self.resolve(r)).collect();
        let contents = files
            .par_iter()
            .map(|file| fs::read_to_string(file).map_err(|e| AssetError::Read(file.clone(), e)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(contents.join(SEPARATOR))
    }

    /// Fingerprint, optionally minify, and write `text`. Returns the web path.
    fn emit(&self, name: &str, kind: AssetKind, text: String) -> Result<String, AssetError> {
        let web_path = generated_path(name, &hash::fingerprint(&text), kind);
        let file = self.resolve(&web_path);

        let content = if self.options.minify {
            match minify::minify(kind, &text) {
                Some(minified) => minified,
                None => {
                    log!("warn"; "could not minify {}, writing it as is", web_path);
                    text
                }
            }
        } else {
            text
        };

        if !self.options.quiet {
            log!("assets"; "{}", web_path);
        }
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).map_err(|e| AssetError::CreateDir(parent.to_path_buf(), e))?;
        }
        fs::write(&file, content).map_err(|e| AssetError::Write(file, e))?;
        Ok(web_path)
    }

    /// Compile every distinct stylesheet file that has a preprocessor source.
    fn preprocess_all(&self, descriptor: &Descriptor) -> Result<(), AssetError> {
        let Some(pre) = self.preprocessor.as_deref() else {
            return Ok(());
        };
        let css_files: BTreeSet<PathBuf> = descriptor
            .values()
            .flat_map(|b| b.css.iter().map(|s| self.resolve(&s.href)))
            .collect();
        css_files
            .into_par_iter()
            .try_for_each(|css_file| self.preprocess(pre, css_file))
    }

    fn preprocess(&self, pre: &dyn StylePreprocessor, css_file: PathBuf) -> Result<(), AssetError> {
        let source_file = preprocess::source_path(&css_file, pre.source_ext());
        if !source_file.is_file() {
            return Ok(());
        }

        let source = fs::read_to_string(&source_file)
            .map_err(|e| AssetError::Read(source_file.clone(), e))?;
        let css = pre
            .compile(&source, &source_file)
            .map_err(|e| AssetError::Preprocess(source_file.clone(), e.into()))?;

        debug!("assets"; "compiled {}", source_file.display());
        fs::write(&css_file, css).map_err(|e| AssetError::Write(css_file, e))
    }

    /// Write the manifest through a temp file so readers never see a
    /// partial document.
    fn write_manifest(&self, manifest: &AssetManifest) -> Result<(), AssetError> {
        let json = serde_json::to_string_pretty(manifest)?;
        let path = self.manifest_path();
        let tmp = self
            .public_root
            .join(format!(".{MANIFEST_FILE}.{}.tmp", std::process::id()));

        if !self.options.quiet {
            log!("assets"; "writing {}", MANIFEST_FILE);
        }
        fs::write(&tmp, json).map_err(|e| AssetError::Write(tmp.clone(), e))?;
        fs::rename(&tmp, &path).map_err(|e| {
            fs::remove_file(&tmp).ok();
            AssetError::Write(path, e)
        })
    }

    /// Map a web-root path (`/js/app.js`) to a file under the public root.
    fn resolve(&self, reference: &str) -> PathBuf {
        self.public_root.join(reference.trim_start_matches('/'))
    }
}

/// Compile the `assets` section of `conf` into `<root>/public`.
pub fn compile_config(conf: &Configuration) -> Result<AssetManifest, AssetError> {
    AssetCompiler::from_config(conf).compile(&descriptor::parse_config(conf))
}

/// `/generated/<bundle>_<fingerprint>.<ext>`
pub fn generated_path(bundle: &str, fingerprint: &str, kind: AssetKind) -> String {
    format!("/{GENERATED_DIR}/{bundle}_{fingerprint}.{}", kind.extension())
}

/// Group stylesheets by media, in order of first appearance.
fn group_by_media(styles: &[StyleRef]) -> Vec<(String, Vec<&StyleRef>)> {
    let mut groups: Vec<(String, Vec<&StyleRef>)> = Vec::new();
    for style in styles {
        match groups.iter_mut().find(|(media, _)| *media == style.media) {
            Some((_, members)) => members.push(style),
            None => groups.push((style.media.clone(), vec![style])),
        }
    }
    groups
}
