//! Dialog request types supplied by callers of the broker.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use super::store::Dismisser;
use super::style::{ContentStyle, ScrollStyle, TextStyle};

/// Passthrough properties for icons and action rows.
pub type PropMap = serde_json::Map<String, serde_json::Value>;

/// Opaque identifier reported by the render layer for the activated control.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct DismissalKey(String);

impl DismissalKey {
    /// Key reported by the cancel control and the implicit close gesture.
    pub const CANCEL: &'static str = "cancel";

    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn cancel() -> Self {
        Self(Self::CANCEL.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_cancel(&self) -> bool {
        self.0 == Self::CANCEL
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DismissalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DismissalKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for DismissalKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl PartialEq<&str> for DismissalKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Where an action's icon comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IconSource {
    #[default]
    None,
    /// Rendered as-is (a glyph or short string)
    Glyph(String),
    /// A name from the Material Community icon set
    MaterialCommunity(String),
}

impl IconSource {
    /// Build an icon source from an icon value and an optional family tag.
    ///
    /// Unknown or absent families treat the icon as directly renderable.
    pub fn from_parts(icon: Option<String>, family: Option<&str>) -> Self {
        let Some(icon) = icon.filter(|i| !i.is_empty()) else {
            return IconSource::None;
        };
        match family {
            Some("materialCommunity" | "material-community" | "material_community") => {
                IconSource::MaterialCommunity(icon)
            }
            _ => IconSource::Glyph(icon),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, IconSource::None)
    }
}

/// One selectable row of a dialog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawActionDescriptor")]
pub struct ActionDescriptor {
    pub icon: IconSource,
    pub icon_props: PropMap,
    /// Returned from `show` when this row is selected. Unique within a request.
    pub key: DismissalKey,
    pub title: String,
    pub description: Option<String>,
    pub row_props: PropMap,
}

impl ActionDescriptor {
    pub fn new(key: impl Into<DismissalKey>, title: impl Into<String>) -> Self {
        Self {
            icon: IconSource::None,
            icon_props: PropMap::new(),
            key: key.into(),
            title: title.into(),
            description: None,
            row_props: PropMap::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn icon(mut self, icon: IconSource) -> Self {
        self.icon = icon;
        self
    }

    pub fn glyph(self, glyph: impl Into<String>) -> Self {
        self.icon(IconSource::Glyph(glyph.into()))
    }

    pub fn material_icon(self, name: impl Into<String>) -> Self {
        self.icon(IconSource::MaterialCommunity(name.into()))
    }

    pub fn icon_prop(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.icon_props.insert(name.into(), value.into());
        self
    }

    pub fn row_prop(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.row_props.insert(name.into(), value.into());
        self
    }
}

#[derive(Deserialize)]
struct RawActionDescriptor {
    key: DismissalKey,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default, alias = "iconFamily")]
    icon_family: Option<String>,
    #[serde(default, alias = "iconProps")]
    icon_props: PropMap,
    #[serde(default, alias = "listItemProps", alias = "extra_props")]
    row_props: PropMap,
}

impl From<RawActionDescriptor> for ActionDescriptor {
    fn from(raw: RawActionDescriptor) -> Self {
        Self {
            icon: IconSource::from_parts(raw.icon, raw.icon_family.as_deref()),
            icon_props: raw.icon_props,
            key: raw.key,
            title: raw.title,
            description: raw.description,
            row_props: raw.row_props,
        }
    }
}

/// Content that can react to input and close the dialog itself.
pub trait InteractiveContent: Send + Sync {
    /// Lines to draw for this content block.
    fn lines(&self) -> Vec<String>;

    /// Handle a character the dialog did not consume. Returns true if handled.
    fn handle_char(&self, _c: char, _dismiss: &Dismisser) -> bool {
        false
    }
}

/// Custom content drawn before or after the message.
#[derive(Clone)]
pub enum DialogContent {
    Text(String),
    Markdown(String),
    /// Content parameterized by the dismiss handle
    Interactive(Arc<dyn InteractiveContent>),
}

impl DialogContent {
    pub fn text(text: impl Into<String>) -> Self {
        DialogContent::Text(text.into())
    }

    pub fn markdown(markdown: impl Into<String>) -> Self {
        DialogContent::Markdown(markdown.into())
    }

    pub fn interactive(content: impl InteractiveContent + 'static) -> Self {
        DialogContent::Interactive(Arc::new(content))
    }
}

impl fmt::Debug for DialogContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogContent::Text(text) => f.debug_tuple("Text").field(text).finish(),
            DialogContent::Markdown(md) => f.debug_tuple("Markdown").field(md).finish(),
            DialogContent::Interactive(_) => f.write_str("Interactive(..)"),
        }
    }
}

/// Content block that dismisses the dialog when one of its shortcut keys is typed.
#[derive(Debug, Clone)]
pub struct ShortcutContent {
    lines: Vec<String>,
    shortcuts: Vec<(char, DismissalKey)>,
}

impl ShortcutContent {
    pub fn new(text: impl AsRef<str>) -> Self {
        Self {
            lines: text.as_ref().lines().map(str::to_string).collect(),
            shortcuts: Vec::new(),
        }
    }

    pub fn shortcut(mut self, c: char, key: impl Into<DismissalKey>) -> Self {
        self.shortcuts.push((c, key.into()));
        self
    }
}

impl InteractiveContent for ShortcutContent {
    fn lines(&self) -> Vec<String> {
        self.lines.clone()
    }

    fn handle_char(&self, c: char, dismiss: &Dismisser) -> bool {
        match self.shortcuts.iter().find(|(shortcut, _)| *shortcut == c) {
            Some((_, key)) => {
                dismiss.dismiss(key.clone());
                true
            }
            None => false,
        }
    }
}

/// Cancel control configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CancelText {
    /// Use the configured default label ("Close")
    #[default]
    Default,
    /// No cancel control
    Disabled,
    Label(String),
}

impl CancelText {
    /// Resolve to the label shown, if any. Empty labels disable the control.
    pub fn resolve(&self, default_label: &str) -> Option<String> {
        match self {
            CancelText::Default => Some(default_label.to_string()).filter(|l| !l.is_empty()),
            CancelText::Disabled => None,
            CancelText::Label(label) if label.is_empty() => None,
            CancelText::Label(label) => Some(label.clone()),
        }
    }
}

/// The full configuration of one modal prompt.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawDialogRequest")]
pub struct DialogRequest {
    pub title: Option<String>,
    /// Markdown message body
    pub message: Option<String>,
    pub pre: Option<DialogContent>,
    pub post: Option<DialogContent>,
    pub actions: Vec<ActionDescriptor>,
    pub cancel_text: CancelText,
    pub content_style: ContentStyle,
    /// `None` uses the configured scroll defaults
    pub scroll_style: Option<ScrollStyle>,
    pub message_style: Option<TextStyle>,
}

impl DialogRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn pre(mut self, content: DialogContent) -> Self {
        self.pre = Some(content);
        self
    }

    pub fn post(mut self, content: DialogContent) -> Self {
        self.post = Some(content);
        self
    }

    pub fn action(mut self, action: ActionDescriptor) -> Self {
        self.actions.push(action);
        self
    }

    pub fn actions(mut self, actions: impl IntoIterator<Item = ActionDescriptor>) -> Self {
        self.actions.extend(actions);
        self
    }

    pub fn cancel_text(mut self, label: impl Into<String>) -> Self {
        self.cancel_text = CancelText::Label(label.into());
        self
    }

    pub fn no_cancel(mut self) -> Self {
        self.cancel_text = CancelText::Disabled;
        self
    }

    pub fn content_style(mut self, style: ContentStyle) -> Self {
        self.content_style = style;
        self
    }

    pub fn scroll_style(mut self, style: ScrollStyle) -> Self {
        self.scroll_style = Some(style);
        self
    }

    pub fn message_style(mut self, style: TextStyle) -> Self {
        self.message_style = Some(style);
        self
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawDialogRequest {
    title: Option<String>,
    message: Option<String>,
    actions: Vec<ActionDescriptor>,
    #[serde(deserialize_with = "deserialize_present", alias = "cancelText")]
    cancel_text: Option<Option<String>>,
    #[serde(alias = "contentStyle")]
    content_style: ContentStyle,
    #[serde(alias = "scrollStyle", alias = "scroll_view_style")]
    scroll_style: Option<ScrollStyle>,
    #[serde(alias = "messageStyle")]
    message_style: Option<TextStyle>,
}

/// Distinguish an explicit `null` from an absent field.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl From<RawDialogRequest> for DialogRequest {
    fn from(raw: RawDialogRequest) -> Self {
        let cancel_text = match raw.cancel_text {
            None => CancelText::Default,
            Some(None) => CancelText::Disabled,
            Some(Some(label)) => CancelText::Label(label),
        };
        Self {
            title: raw.title,
            message: raw.message,
            pre: None,
            post: None,
            actions: raw.actions,
            cancel_text,
            content_style: raw.content_style,
            scroll_style: raw.scroll_style,
            message_style: raw.message_style,
        }
    }
}
