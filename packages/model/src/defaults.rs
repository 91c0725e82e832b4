//! Default content, styles and size for each element kind.
//!
//! Pure lookup tables. Unknown kinds get empty maps and a full-width box.

use serde_json::{json, Value};

use crate::element::{Dimension, ElementKind, FieldMap, Size};

fn fields(value: Value) -> FieldMap {
    match value {
        Value::Object(map) => map,
        _ => FieldMap::new(),
    }
}

pub fn default_content(kind: &ElementKind) -> FieldMap {
    use ElementKind as K;

    fields(match kind {
        K::Heading => json!({ "text": "Your Headline Here" }),
        K::Text => json!({
            "text": "Add your text content here. You can edit this in the properties panel."
        }),
        K::Button => json!({ "text": "Click Me", "url": "#" }),
        K::Image => json!({
            "src": "https://via.placeholder.com/800x400/0ea5e9/ffffff?text=Image",
            "alt": "Image"
        }),
        K::Video => json!({ "url": "https://www.youtube.com/embed/dQw4w9WgXcQ" }),
        K::Input => json!({
            "type": "text",
            "placeholder": "Enter text",
            "label": "Text Input",
            "required": false
        }),
        K::Textarea => json!({
            "placeholder": "Enter your message",
            "label": "Message",
            "required": false
        }),
        K::Email => json!({
            "placeholder": "your@email.com",
            "label": "Email Address",
            "required": false
        }),
        K::Phone => json!({
            "placeholder": "+1 (555) 000-0000",
            "label": "Phone Number",
            "required": false
        }),
        K::Url => json!({
            "placeholder": "https://example.com",
            "label": "Website URL",
            "required": false
        }),
        K::Number => json!({
            "placeholder": "0",
            "label": "Number",
            "min": 0,
            "max": 100,
            "step": 1,
            "required": false
        }),
        K::Checkbox => json!({ "label": "I agree to the terms and conditions", "checked": false }),
        K::Radio => json!({
            "label": "Choose one option",
            "options": ["Option 1", "Option 2", "Option 3"]
        }),
        K::Select => json!({
            "label": "Select an option",
            "options": ["Option 1", "Option 2", "Option 3"]
        }),
        K::Multiselect => json!({
            "label": "Select multiple",
            "options": ["Option 1", "Option 2", "Option 3", "Option 4"]
        }),
        K::Toggle => json!({ "label": "Enable feature", "checked": false }),
        K::Date => json!({ "label": "Select date" }),
        K::Time => json!({ "label": "Select time" }),
        K::File => json!({ "label": "Upload file", "accept": "*" }),
        K::Range => json!({ "label": "Select value", "min": 0, "max": 100, "value": 50 }),
        K::Rating => json!({ "label": "Rate this", "maxRating": 5, "rating": 0 }),
        K::Progress => json!({ "label": "Progress", "value": 50 }),
        K::Container => json!({ "text": "Container Section" }),
        K::Divider => json!({}),
        K::Spacer => json!({ "height": "40px" }),
        K::Unknown(_) => json!({}),
    })
}

pub fn default_styles(kind: &ElementKind) -> FieldMap {
    use ElementKind as K;

    fields(match kind {
        K::Heading => json!({
            "fontSize": "36px",
            "fontWeight": "bold",
            "color": "#1f2937",
            "textAlign": "center",
            "lineHeight": "1.2",
            "padding": "16px",
            "margin": "0"
        }),
        K::Text => json!({
            "fontSize": "16px",
            "fontWeight": "normal",
            "color": "#4b5563",
            "textAlign": "left",
            "lineHeight": "1.6",
            "padding": "8px",
            "margin": "0"
        }),
        K::Button => json!({
            "backgroundColor": "#0ea5e9",
            "color": "#ffffff",
            "borderRadius": "8px",
            "fontSize": "16px",
            "fontWeight": "600",
            "border": "none",
            "cursor": "pointer",
            "padding": "12px 24px",
            "display": "inline-block",
            "textAlign": "center",
            "margin": "8px auto",
            "width": "auto"
        }),
        K::Image => json!({
            "borderRadius": "8px",
            "width": "100%",
            "height": "auto",
            "display": "block",
            "margin": "0"
        }),
        K::Video => json!({
            "borderRadius": "8px",
            "width": "100%",
            "aspectRatio": "16/9",
            "display": "block"
        }),
        K::Input
        | K::Textarea
        | K::Email
        | K::Phone
        | K::Url
        | K::Number
        | K::Select
        | K::Multiselect
        | K::Date
        | K::Time
        | K::File => json!({
            "padding": "12px",
            "border": "1px solid #d1d5db",
            "borderRadius": "6px",
            "fontSize": "14px",
            "backgroundColor": "#ffffff",
            "width": "100%",
            "display": "block",
            "boxSizing": "border-box"
        }),
        K::Checkbox | K::Radio | K::Toggle => json!({
            "display": "flex",
            "alignItems": "center",
            "gap": "8px",
            "fontSize": "14px",
            "padding": "8px"
        }),
        K::Range | K::Progress => json!({ "padding": "8px", "width": "100%" }),
        K::Rating => json!({ "padding": "8px" }),
        K::Container => json!({
            "backgroundColor": "#f9fafb",
            "padding": "20px",
            "borderRadius": "8px",
            "width": "100%",
            "minHeight": "100px"
        }),
        K::Divider => json!({
            "backgroundColor": "#e5e7eb",
            "height": "2px",
            "width": "100%",
            "border": "none",
            "margin": "16px 0"
        }),
        K::Spacer => json!({
            "backgroundColor": "transparent",
            "height": "40px",
            "width": "100%"
        }),
        K::Unknown(_) => json!({}),
    })
}

pub fn default_size(kind: &ElementKind) -> Size {
    use ElementKind as K;

    let (width, height) = match kind {
        K::Heading | K::Text | K::Button => ("auto", "auto"),
        K::Image => ("100%", "300px"),
        K::Video => ("100%", "315px"),
        K::Divider => ("100%", "2px"),
        K::Spacer => ("100%", "40px"),
        _ => ("100%", "auto"),
    };

    Size {
        width: Dimension::css(width),
        height: Dimension::css(height),
    }
}
