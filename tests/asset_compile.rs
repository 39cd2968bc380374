//! End-to-end asset compilation through configuration.

use circumflex::asset::{self, AssetManifest, AssetRegistry};
use circumflex::config::{Configuration, Environment};
use circumflex::utils::hash;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn project(config: &str, files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("circumflex.toml"), config).unwrap();
    for (path, content) in files {
        let file = temp.path().join("public").join(path);
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(file, content).unwrap();
    }
    temp
}

fn read(root: &Path, web_path: &str) -> String {
    fs::read_to_string(root.join("public").join(web_path.trim_start_matches('/'))).unwrap()
}

fn is_generated(path: &str, bundle: &str, ext: &str) -> bool {
    let Some(name) = path.strip_prefix(&format!("/generated/{bundle}_")) else {
        return false;
    };
    let Some(fp) = name.strip_suffix(&format!(".{ext}")) else {
        return false;
    };
    fp.len() == 8 && fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}

const GLOBAL: &str = r#"
silent = true

[assets]
global = ["/css/a.css", "/js/a.js"]
"#;

#[test]
fn test_global_bundle_compiles() {
    let temp = project(GLOBAL, &[("css/a.css", "body{margin:0}"), ("js/a.js", "var x=1;")]);
    let conf = Configuration::load(&temp.path().join("circumflex.toml"), &Environment::default()).unwrap();

    let manifest = asset::compile_config(&conf).unwrap();
    let global = &manifest["global"];

    let src = &global.js[0].src;
    assert!(is_generated(src, "global", "js"), "{src}");
    assert_eq!(read(temp.path(), src), "var x=1;");
    assert_eq!(src, &format!("/generated/global_{}.js", hash::fingerprint("var x=1;")));

    let href = &global.css[0].href;
    assert!(is_generated(href, "global", "css"), "{href}");
    assert_eq!(read(temp.path(), href), "body{margin:0}");
    assert_eq!(global.css[0].media, "screen");
    assert_eq!(href, &format!("/generated/global_{}.css", hash::fingerprint("body{margin:0}")));

    let json = fs::read_to_string(temp.path().join("public/assets.json")).unwrap();
    let persisted: AssetManifest = serde_json::from_str(&json).unwrap();
    assert_eq!(persisted, manifest);
}

#[test]
fn test_production_registry_serves_compiled_bundle() {
    let temp = project(
        &format!("staticDomain = \"cdn.app.com\"\n{GLOBAL}"),
        &[("css/a.css", "body{margin:0}"), ("js/a.js", "var x=1;")],
    );
    let config = temp.path().join("circumflex.toml");

    let dev = Configuration::load(&config, &Environment::default()).unwrap();
    let manifest = asset::compile_config(&dev).unwrap();

    let prod = Configuration::load(&config, &Environment::production()).unwrap();
    let registry = AssetRegistry::open(&prod);
    assert_eq!(
        registry.emit_js("global"),
        format!(
            r#"<script type="text/javascript" src="//cdn.app.com{}"></script>"#,
            manifest["global"].js[0].src
        )
    );

    let dev_registry = AssetRegistry::open(&dev);
    assert!(dev_registry.emit_js("global").contains("//cdn.app.com/js/a.js"));
}

#[test]
fn test_media_groups_and_switches() {
    let temp = project(
        r#"
silent = true

[assets]
media = "screen, projection"
minify = false
site = [
    "/css/base.css",
    { href = "/css/print1.css", media = "print" },
    { href = "/css/print2.css", media = "print" },
    "/js/one.js",
    "/js/two.js",
]
"#,
        &[
            ("css/base.css", "a{}"),
            ("css/print1.css", "b{}"),
            ("css/print2.css", "c{}"),
            ("js/one.js", "1"),
            ("js/two.js", "2"),
        ],
    );
    let conf = Configuration::load(&temp.path().join("circumflex.toml"), &Environment::default()).unwrap();
    let manifest = asset::compile_config(&conf).unwrap();
    let site = &manifest["site"];

    assert_eq!(manifest.len(), 1);
    assert_eq!(site.css.len(), 2);
    assert_eq!(site.css[0].media, "screen, projection");
    assert_eq!(read(temp.path(), &site.css[0].href), "a{}");
    assert_eq!(site.css[1].media, "print");
    assert_eq!(read(temp.path(), &site.css[1].href), "b{}\nc{}");
    assert_eq!(read(temp.path(), &site.js[0].src), "1\n2");
}

#[test]
fn test_recompiling_is_byte_identical() {
    let temp = project(GLOBAL, &[("css/a.css", "body{margin:0}"), ("js/a.js", "var x=1;")]);
    let conf = Configuration::load(&temp.path().join("circumflex.toml"), &Environment::default()).unwrap();
    let manifest_path = temp.path().join("public/assets.json");

    let first = asset::compile_config(&conf).unwrap();
    let first_json = fs::read(&manifest_path).unwrap();
    let second = asset::compile_config(&conf).unwrap();

    assert_eq!(first, second);
    assert_eq!(fs::read(&manifest_path).unwrap(), first_json);
}
