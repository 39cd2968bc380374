//! Asset bundles: configuration parsing, production compilation and
//! runtime lookup.
//!
//! ```text
//! [assets] ──► descriptor ──► compile ──► public/generated/*, assets.json
//!                   │                               │
//!                   └─────────► registry ◄──────────┘
//! ```

pub mod compile;
pub mod descriptor;
mod error;
mod kind;
pub mod minify;
pub mod preprocess;
mod registry;

pub use compile::{AssetCompiler, AssetManifest, CompileOptions, compile_config};
pub use descriptor::{Bundle, Descriptor, ParseOptions, ScriptRef, StyleRef};
pub use error::AssetError;
pub use kind::AssetKind;
pub use preprocess::{CommandPreprocessor, StylePreprocessor};
pub use registry::AssetRegistry;
