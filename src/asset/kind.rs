//! Asset kind definitions.

/// Kind of bundled asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// JavaScript, emitted as `<script>`.
    Script,
    /// CSS, emitted as `<link rel="stylesheet">`.
    Stylesheet,
}

impl AssetKind {
    /// Classify a reference by its extension, ignoring case.
    pub fn from_reference(reference: &str) -> Option<Self> {
        let lower = reference.to_ascii_lowercase();
        if lower.ends_with(".js") {
            Some(Self::Script)
        } else if lower.ends_with(".css") {
            Some(Self::Stylesheet)
        } else {
            None
        }
    }

    /// Extension of generated files, without the dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Script => "js",
            Self::Stylesheet => "css",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_reference() {
        assert_eq!(AssetKind::from_reference("/js/app.js"), Some(AssetKind::Script));
        assert_eq!(AssetKind::from_reference("/JS/APP.JS"), Some(AssetKind::Script));
        assert_eq!(AssetKind::from_reference("/css/main.CSS"), Some(AssetKind::Stylesheet));
        assert_eq!(AssetKind::from_reference("/css/main.css.map"), None);
        assert_eq!(AssetKind::from_reference("/img/logo.png"), None);
    }
}
