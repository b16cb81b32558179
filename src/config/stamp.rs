//! Text and version shown on the article's stamp.

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::constants::{DEV_VERSION_LABEL, STAMP_HOST, STAMP_HOST_ICON};

/// The `stamp` section after resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stamp {
    pub enabled: bool,
    pub text: String,
    pub version: String,
    pub size: f64,
    pub xpos: f64,
    pub ypos: f64,
    pub angle: f64,
    pub url: StampUrl,
}

/// The `stamp.url` subsection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StampUrl {
    pub enabled: bool,
    pub maxlen: usize,
}

impl Default for StampUrl {
    fn default() -> Self {
        Self {
            enabled: false,
            maxlen: 40,
        }
    }
}

impl Default for Stamp {
    fn default() -> Self {
        Self {
            enabled: true,
            text: String::new(),
            version: String::new(),
            size: 0.75,
            xpos: 1.0,
            ypos: 1.0,
            angle: -20.0,
            url: StampUrl::default(),
        }
    }
}

/// LaTeX-ready repository label for the stamp.
///
/// Empty when `enabled` is false. The URL scheme is dropped and the text is
/// shortened with `...` so that it fits in `maxlen` characters, counting the
/// hosting domain as a single character since it is rendered as an icon.
pub fn stamp_text(url: &str, enabled: bool, maxlen: usize) -> String {
    if !enabled {
        return String::new();
    }

    let text = url.replace("https://", "").replace("http://", "");
    let displayed = text.replace(STAMP_HOST, "X").chars().count();

    let text = if displayed > maxlen {
        let trim = displayed - maxlen;
        let keep = text.chars().count().saturating_sub(trim + 3);
        let mut shortened: String = text.chars().take(keep).collect();
        shortened.push_str("...");
        shortened
    } else {
        text
    };

    text.replace('_', r"{\_}").replace(STAMP_HOST, STAMP_HOST_ICON)
}

/// Version label for the stamp: `dev` for pre-releases, the version otherwise.
pub fn stamp_version(tool_version: &str) -> String {
    match Version::parse(tool_version) {
        Ok(version) if version.pre.is_empty() => tool_version.to_string(),
        _ => DEV_VERSION_LABEL.to_string(),
    }
}
