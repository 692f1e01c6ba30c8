use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Visual/editorial style of a generated clip.
///
/// The tag drives both the accent color of the video overlay and the phrasing
/// of the generated caption. The set is fixed and small on purpose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleTag {
    /// Streetwear register, warm orange accent.
    #[default]
    Street,
    /// Understated register, slate accent.
    Minimal,
    /// Upmarket register, gold accent.
    Luxury,
    /// Upbeat register, pink accent.
    Playful,
}

impl StyleTag {
    /// Parse a tag case-insensitively; `None` for anything outside the set.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "street" => Some(Self::Street),
            "minimal" => Some(Self::Minimal),
            "luxury" => Some(Self::Luxury),
            "playful" => Some(Self::Playful),
            _ => None,
        }
    }

    /// Accent color used for the caption panel, straight-alpha RGBA.
    pub fn accent_rgba(self) -> [u8; 4] {
        match self {
            Self::Street => [236, 94, 40, 255],
            Self::Minimal => [70, 82, 98, 255],
            Self::Luxury => [196, 160, 62, 255],
            Self::Playful => [232, 78, 142, 255],
        }
    }

    fn opener(self) -> &'static str {
        match self {
            Self::Street => "Just dropped.",
            Self::Minimal => "New in.",
            Self::Luxury => "Now arriving.",
            Self::Playful => "Look what landed!",
        }
    }

    fn closer(self) -> &'static str {
        match self {
            Self::Street => "Move before it's gone.",
            Self::Minimal => "Available now.",
            Self::Luxury => "Reserved for the few.",
            Self::Playful => "Come say hi to it.",
        }
    }
}

/// Assemble a caption from detected labels, an optional brand, and a style.
///
/// Pure string assembly: same inputs always yield the same caption. Labels
/// are enumerated in their set order (sorted), lowercased for prose. An empty
/// label set falls back to a generic body line rather than enumerating zero
/// items.
pub fn compose_caption(labels: &BTreeSet<String>, brand: Option<&str>, style: StyleTag) -> String {
    let mut parts = vec![style.opener().to_owned()];

    if labels.is_empty() {
        parts.push("A standout piece for your rotation.".to_owned());
    } else {
        let listed = labels
            .iter()
            .map(|l| l.to_lowercase())
            .collect::<Vec<_>>()
            .join(" + ");
        parts.push(format!("Featuring {listed}."));
    }

    if let Some(brand) = brand.map(str::trim).filter(|b| !b.is_empty()) {
        parts.push(format!("By {brand}."));
    }

    parts.push(style.closer().to_owned());
    parts.join(" ")
}
