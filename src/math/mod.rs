/*!
 * Math notation support.
 *
 * - `segmenter`: splits a document into plain-text and math segments
 * - `renderer`: turns one formula into a braille math code string
 *
 * The LaTeX parser and the braille math engine are external capabilities,
 * described by the `LatexConverter` and `MathBrailleEngine` traits.
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::MathRenderError;

pub mod renderer;
pub mod segmenter;

pub use renderer::{MathRenderer, UnavailableMath};
pub use segmenter::{Segment, segment};

/// Math code used when a request does not name one
pub const DEFAULT_MATH_CODE: MathCode = MathCode::Nemeth;

/// Braille mathematics notation targeted by the math renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathCode {
    /// Nemeth Braille Code
    #[default]
    Nemeth,
    /// Generic (UEB) math
    Ueb,
}

impl MathCode {
    /// Parse a request value. Anything that is not `nemeth` selects the generic code.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("nemeth") {
            Self::Nemeth
        } else {
            Self::Ueb
        }
    }

    /// Rendering domain for the braille math engine
    pub fn domain(&self) -> &'static str {
        match self {
            Self::Nemeth => "nemeth",
            Self::Ueb => "default",
        }
    }

    /// Rendering locale for the braille math engine
    pub fn locale(&self) -> &'static str {
        match self {
            Self::Nemeth => "nemeth",
            Self::Ueb => "en",
        }
    }
}

impl fmt::Display for MathCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nemeth => write!(f, "nemeth"),
            Self::Ueb => write!(f, "ueb"),
        }
    }
}

impl FromStr for MathCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Converts a LaTeX-like formula into MathML markup
pub trait LatexConverter: Send + Sync {
    /// Convert `formula` to a MathML string, possibly wrapped in presentation elements
    fn to_mathml(&self, formula: &str, display: bool) -> Result<String, MathRenderError>;
}

/// Renders canonical MathML into braille math
///
/// `setup` is expensive and changes engine-wide state; callers serialize it
/// with rendering.
#[async_trait]
pub trait MathBrailleEngine: Send + Sync {
    /// Configure the rendering domain and locale
    async fn setup(&self, domain: &str, locale: &str) -> Result<(), MathRenderError>;

    /// Render a `<math>` tree to braille
    fn to_braille(&self, mathml: &str) -> Result<String, MathRenderError>;
}
