use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An architectural tier of a feature-sliced source tree.
///
/// Declaration order is the dependency order: a layer sits above every layer declared before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Shared,
    Entities,
    Features,
    Widgets,
    Pages,
    App,
}

impl Layer {
    pub const ALL: [Layer; 6] = [
        Layer::Shared,
        Layer::Entities,
        Layer::Features,
        Layer::Widgets,
        Layer::Pages,
        Layer::App,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Shared => "shared",
            Layer::Entities => "entities",
            Layer::Features => "features",
            Layer::Widgets => "widgets",
            Layer::Pages => "pages",
            Layer::App => "app",
        }
    }

    /// Layers whose slices expose a public surface (`index`) and a testing surface.
    ///
    /// `shared` and `app` are not sliced that way and carry no public-surface restriction.
    pub fn has_public_surface(self) -> bool {
        matches!(
            self,
            Layer::Entities | Layer::Features | Layer::Widgets | Layer::Pages
        )
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLayerError(pub String);

impl fmt::Display for ParseLayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown layer '{}'", self.0)
    }
}

impl std::error::Error for ParseLayerError {}

impl FromStr for Layer {
    type Err = ParseLayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layer::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| ParseLayerError(s.to_string()))
    }
}
