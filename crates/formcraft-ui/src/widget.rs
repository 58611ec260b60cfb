//! Widget payloads carried by leaf nodes.

/// The kind of widget a leaf places on the form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Button,
    CheckBox,
    Label,
    TextInput,
    ToggleButton,
    /// Any other host widget, exported under the given name.
    Custom(String),
}

impl WidgetKind {
    pub fn name(&self) -> &str {
        match self {
            WidgetKind::Button => "Button",
            WidgetKind::CheckBox => "CheckBox",
            WidgetKind::Label => "Label",
            WidgetKind::TextInput => "TextInput",
            WidgetKind::ToggleButton => "ToggleButton",
            WidgetKind::Custom(name) => name,
        }
    }

    /// Whether widgets of this kind expose a `text` attribute.
    pub fn has_text(&self) -> bool {
        !matches!(self, WidgetKind::CheckBox)
    }
}

/// Opaque host payload of a placed widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub kind: WidgetKind,
    pub text: Option<String>,
}

impl Widget {
    pub fn new(kind: WidgetKind) -> Self {
        let text = kind.has_text().then(String::new);
        Self { kind, text }
    }

    pub fn button(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::Button).with_text(text)
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::Label).with_text(text)
    }

    pub fn toggle_button(text: impl Into<String>) -> Self {
        Self::new(WidgetKind::ToggleButton).with_text(text)
    }

    pub fn text_input() -> Self {
        Self::new(WidgetKind::TextInput)
    }

    pub fn check_box() -> Self {
        Self::new(WidgetKind::CheckBox)
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self::new(WidgetKind::Custom(name.into()))
    }

    /// Set the text. Ignored for kinds without a text attribute.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        if self.kind.has_text() {
            self.text = Some(text.into());
        }
        self
    }
}
