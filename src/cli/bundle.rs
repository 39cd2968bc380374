//! `circumflex bundle`: preview the markup of a bundle.

use anyhow::{Result, bail};

use crate::asset::AssetRegistry;

/// Stylesheet links followed by script tags, one per line.
pub fn render_bundle(registry: &AssetRegistry, name: &str) -> Result<String> {
    if registry.bundle(name).is_none() {
        let known = registry.bundles().keys().cloned().collect::<Vec<_>>().join(", ");
        bail!("unknown bundle '{name}' (known: {known})");
    }
    let css = registry.emit_css(name);
    let js = registry.emit_js(name);
    Ok([css, js]
        .into_iter()
        .filter(|markup| !markup.is_empty())
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{Bundle, Descriptor, ScriptRef, StyleRef};

    fn registry() -> AssetRegistry {
        let bundles = Descriptor::from([
            (
                "global".to_string(),
                Bundle {
                    js: vec![ScriptRef { src: "/js/app.js".into() }],
                    css: vec![StyleRef {
                        href: "/css/main.css".into(),
                        media: "screen".into(),
                    }],
                },
            ),
            ("empty".to_string(), Bundle::default()),
        ]);
        AssetRegistry::from_descriptor(bundles, "//static.app.com", "/srv/app/public")
    }

    #[test]
    fn test_render_bundle() {
        let markup = render_bundle(&registry(), "global").unwrap();
        let lines: Vec<_> = markup.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("<link rel=\"stylesheet\" href=\"//static.app.com/css/main.css\""));
        assert!(lines[1].starts_with("<script"));
    }

    #[test]
    fn test_render_empty_and_unknown() {
        assert_eq!(render_bundle(&registry(), "empty").unwrap(), "");
        let err = render_bundle(&registry(), "admin").unwrap_err();
        assert!(err.to_string().contains("known: empty, global"));
    }
}
