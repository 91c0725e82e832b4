//! # Elements
//!
//! Leaf content and form-control nodes placed inside columns.
//!
//! An element's `type` never changes after creation. Kinds this version does
//! not recognise are kept as [`ElementKind::Unknown`] so that data written by a
//! newer tool survives a load/save cycle untouched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::defaults::{default_content, default_size, default_styles};
use crate::id_generator::new_id;

/// Open key/value map used for `content` and `styles`
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

/// Every element kind the palette knows about
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    Heading,
    Text,
    Button,
    Image,
    Video,
    Input,
    Textarea,
    Email,
    Phone,
    Url,
    Number,
    Checkbox,
    Radio,
    Select,
    Multiselect,
    Toggle,
    Date,
    Time,
    File,
    Range,
    Rating,
    Progress,
    Container,
    Divider,
    Spacer,
    /// A kind added by a newer version of the tool
    Unknown(String),
}

/// Palette section a kind is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteGroup {
    Basic,
    Form,
    Layout,
}

impl ElementKind {
    /// Known kinds in palette display order
    pub const KNOWN: [ElementKind; 25] = [
        ElementKind::Heading,
        ElementKind::Text,
        ElementKind::Button,
        ElementKind::Image,
        ElementKind::Video,
        ElementKind::Input,
        ElementKind::Textarea,
        ElementKind::Email,
        ElementKind::Phone,
        ElementKind::Url,
        ElementKind::Number,
        ElementKind::Checkbox,
        ElementKind::Radio,
        ElementKind::Select,
        ElementKind::Multiselect,
        ElementKind::Toggle,
        ElementKind::Date,
        ElementKind::Time,
        ElementKind::File,
        ElementKind::Range,
        ElementKind::Rating,
        ElementKind::Progress,
        ElementKind::Container,
        ElementKind::Divider,
        ElementKind::Spacer,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ElementKind::Heading => "heading",
            ElementKind::Text => "text",
            ElementKind::Button => "button",
            ElementKind::Image => "image",
            ElementKind::Video => "video",
            ElementKind::Input => "input",
            ElementKind::Textarea => "textarea",
            ElementKind::Email => "email",
            ElementKind::Phone => "phone",
            ElementKind::Url => "url",
            ElementKind::Number => "number",
            ElementKind::Checkbox => "checkbox",
            ElementKind::Radio => "radio",
            ElementKind::Select => "select",
            ElementKind::Multiselect => "multiselect",
            ElementKind::Toggle => "toggle",
            ElementKind::Date => "date",
            ElementKind::Time => "time",
            ElementKind::File => "file",
            ElementKind::Range => "range",
            ElementKind::Rating => "rating",
            ElementKind::Progress => "progress",
            ElementKind::Container => "container",
            ElementKind::Divider => "divider",
            ElementKind::Spacer => "spacer",
            ElementKind::Unknown(kind) => kind,
        }
    }

    /// Whether this version of the tool understands the kind
    pub fn is_known(&self) -> bool {
        !matches!(self, ElementKind::Unknown(_))
    }

    /// The decorative container kind: a drop target visually, a leaf in the tree
    pub fn is_container_kind(&self) -> bool {
        matches!(self, ElementKind::Container)
    }

    /// Form controls collect visitor input
    pub fn is_form_control(&self) -> bool {
        matches!(self.palette_group(), Some(PaletteGroup::Form))
    }

    /// Palette group, `None` for unknown kinds (they are never offered)
    pub fn palette_group(&self) -> Option<PaletteGroup> {
        match self {
            ElementKind::Heading
            | ElementKind::Text
            | ElementKind::Button
            | ElementKind::Image
            | ElementKind::Video => Some(PaletteGroup::Basic),
            ElementKind::Container | ElementKind::Divider | ElementKind::Spacer => {
                Some(PaletteGroup::Layout)
            }
            ElementKind::Unknown(_) => None,
            _ => Some(PaletteGroup::Form),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ElementKind {
    fn from(value: String) -> Self {
        ElementKind::KNOWN
            .iter()
            .find(|kind| kind.as_str() == value)
            .cloned()
            .unwrap_or(ElementKind::Unknown(value))
    }
}

impl From<&str> for ElementKind {
    fn from(value: &str) -> Self {
        ElementKind::from(value.to_string())
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Unknown(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for ElementKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ElementKind::from(s))
    }
}

/// Palette entries in display order
pub fn palette() -> Vec<(PaletteGroup, ElementKind)> {
    ElementKind::KNOWN
        .iter()
        .filter_map(|kind| kind.palette_group().map(|group| (group, kind.clone())))
        .collect()
}

/// One side of an element's box: a pixel count (older pages) or a CSS length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Pixels(serde_json::Number),
    Css(String),
}

impl Dimension {
    pub fn css(value: &str) -> Self {
        Dimension::Css(value.to_string())
    }

    pub fn px(value: u32) -> Self {
        Dimension::Pixels(value.into())
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Pixels(px) => write!(f, "{}px", px),
            Dimension::Css(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: Dimension,
    pub height: Dimension,
}

/// Leaf node of the layout tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: ElementKind,

    #[serde(default)]
    pub content: FieldMap,

    #[serde(default)]
    pub styles: FieldMap,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,

    /// Top-level keys this version does not model, written back untouched
    #[serde(flatten)]
    pub extra: FieldMap,
}

impl Element {
    /// Fresh element of `kind` populated from the default tables
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: new_id(),
            content: default_content(&kind),
            styles: default_styles(&kind),
            size: Some(default_size(&kind)),
            extra: FieldMap::new(),
            kind,
        }
    }

    /// Copy with a newly minted id
    pub fn duplicate(&self) -> Self {
        Self {
            id: new_id(),
            ..self.clone()
        }
    }

    /// Flag for the presentation layer: render with the fallback contract
    pub fn is_unknown_kind(&self) -> bool {
        !self.kind.is_known()
    }

    pub fn content_str(&self, key: &str) -> Option<&str> {
        self.content.get(key).and_then(|value| value.as_str())
    }

    pub fn style_str(&self, key: &str) -> Option<&str> {
        self.styles.get(key).and_then(|value| value.as_str())
    }
}

/// `createElement(kind)`
pub fn create_element(kind: ElementKind) -> Element {
    Element::new(kind)
}
