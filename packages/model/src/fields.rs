//! Property field tables
//!
//! The property panel is data-driven: each kind lists the fields it exposes
//! and which sub-object (`content` or `styles`) each one writes to.

use serde::Serialize;

use crate::element::ElementKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldTarget {
    Content,
    Styles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "choices")]
pub enum FieldControl {
    Text,
    Multiline,
    Color,
    Number,
    Toggle,
    Select(&'static [&'static str]),
    StringList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub target: FieldTarget,
    pub control: FieldControl,
}

const fn content(key: &'static str, label: &'static str, control: FieldControl) -> FieldSpec {
    FieldSpec {
        key,
        label,
        target: FieldTarget::Content,
        control,
    }
}

const fn style(key: &'static str, label: &'static str, control: FieldControl) -> FieldSpec {
    FieldSpec {
        key,
        label,
        target: FieldTarget::Styles,
        control,
    }
}

const TEXT_ALIGN: &[&str] = &["left", "center", "right"];

const HEADING: &[FieldSpec] = &[
    content("text", "Heading Text", FieldControl::Multiline),
    style("fontSize", "Font Size", FieldControl::Text),
    style("color", "Text Color", FieldControl::Color),
    style("textAlign", "Alignment", FieldControl::Select(TEXT_ALIGN)),
];

const TEXT: &[FieldSpec] = &[
    content("text", "Text Content", FieldControl::Multiline),
    style("fontSize", "Font Size", FieldControl::Text),
    style("color", "Text Color", FieldControl::Color),
];

const BUTTON: &[FieldSpec] = &[
    content("text", "Button Text", FieldControl::Text),
    content("url", "Link URL", FieldControl::Text),
    style("backgroundColor", "Background Color", FieldControl::Color),
    style("color", "Text Color", FieldControl::Color),
];

const IMAGE: &[FieldSpec] = &[
    content("src", "Image URL", FieldControl::Text),
    content("alt", "Alt Text", FieldControl::Text),
];

const VIDEO: &[FieldSpec] = &[content("url", "Video Embed URL", FieldControl::Text)];

const TEXT_INPUT: &[FieldSpec] = &[
    content("label", "Label", FieldControl::Text),
    content("placeholder", "Placeholder", FieldControl::Text),
    content("required", "Required Field", FieldControl::Toggle),
];

const NUMBER_INPUT: &[FieldSpec] = &[
    content("label", "Label", FieldControl::Text),
    content("placeholder", "Placeholder", FieldControl::Text),
    content("required", "Required Field", FieldControl::Toggle),
    content("min", "Min", FieldControl::Number),
    content("max", "Max", FieldControl::Number),
];

const TOGGLED: &[FieldSpec] = &[
    content("label", "Label", FieldControl::Text),
    content("checked", "Checked by default", FieldControl::Toggle),
];

const CHOICES: &[FieldSpec] = &[
    content("label", "Label", FieldControl::Text),
    content("options", "Options", FieldControl::StringList),
];

const LABEL_ONLY: &[FieldSpec] = &[content("label", "Label", FieldControl::Text)];

const FILE: &[FieldSpec] = &[
    content("label", "Label", FieldControl::Text),
    content("accept", "Accepted File Types", FieldControl::Text),
];

const RANGE: &[FieldSpec] = &[
    content("label", "Label", FieldControl::Text),
    content("min", "Min", FieldControl::Number),
    content("max", "Max", FieldControl::Number),
    content("value", "Default Value", FieldControl::Number),
];

const RATING: &[FieldSpec] = &[
    content("label", "Label", FieldControl::Text),
    content("maxRating", "Max Rating", FieldControl::Number),
    content("rating", "Default Rating", FieldControl::Number),
];

const PROGRESS: &[FieldSpec] = &[
    content("label", "Label", FieldControl::Text),
    content("value", "Progress (%)", FieldControl::Number),
];

const CONTAINER: &[FieldSpec] = &[
    content("text", "Container Text", FieldControl::Text),
    style("backgroundColor", "Background Color", FieldControl::Color),
];

const SPACER: &[FieldSpec] = &[content("height", "Height", FieldControl::Text)];

/// Fields the property panel shows for `kind`
pub fn property_fields(kind: &ElementKind) -> &'static [FieldSpec] {
    use ElementKind as K;

    match kind {
        K::Heading => HEADING,
        K::Text => TEXT,
        K::Button => BUTTON,
        K::Image => IMAGE,
        K::Video => VIDEO,
        K::Input | K::Textarea | K::Email | K::Phone | K::Url => TEXT_INPUT,
        K::Number => NUMBER_INPUT,
        K::Checkbox | K::Toggle => TOGGLED,
        K::Radio | K::Select | K::Multiselect => CHOICES,
        K::Date | K::Time => LABEL_ONLY,
        K::File => FILE,
        K::Range => RANGE,
        K::Rating => RATING,
        K::Progress => PROGRESS,
        K::Container => CONTAINER,
        K::Spacer => SPACER,
        K::Divider | K::Unknown(_) => &[],
    }
}

/// Look up a single field by key
pub fn find_field(kind: &ElementKind, key: &str) -> Option<&'static FieldSpec> {
    property_fields(kind).iter().find(|field| field.key == key)
}
