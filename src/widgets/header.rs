//! Header widget: title bar with an optional subtitle.
//!
//! The title is centered on the first line. If a subtitle is set it is
//! centered on the second line. Without a configured width the text is not
//! padded.

use crate::command::Cmd;
use crate::config::{Props, WidgetConfig};
use crate::event::message::Message;
use crate::widget::traits::{Component, ComponentId, Response};

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// A header with a centered title and optional subtitle.
///
/// # Examples
///
/// ```ignore
/// let hdr = Header::new("header", "My App").with_subtitle("v1.0").with_width(40);
/// ```
#[derive(Debug, Clone)]
pub struct Header {
    id: ComponentId,
    title: String,
    subtitle: Option<String>,
    width: Option<u16>,
}

impl Header {
    /// Create a new header with the given title.
    pub fn new(id: impl Into<ComponentId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            width: None,
        }
    }

    /// Build from a property map (`title`, `width`).
    pub fn from_props(id: impl Into<ComponentId>, props: &Props) -> Self {
        let config = WidgetConfig::from_props(props);
        let mut header = Self::new(id, config.title);
        header.width = config.width;
        header
    }

    /// Set the subtitle (builder pattern).
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Set the width used for centering (builder pattern).
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Return the title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replace the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Return the subtitle, if any.
    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }
}

/// Center `text` within `width` characters. Truncates if text is wider.
pub(crate) fn center_text(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    let text_len = truncated.chars().count();
    if text_len >= width {
        return truncated;
    }
    let pad_left = (width - text_len) / 2;
    let pad_right = width - text_len - pad_left;
    format!(
        "{}{}{}",
        " ".repeat(pad_left),
        truncated,
        " ".repeat(pad_right)
    )
}

impl Component for Header {
    fn id(&self) -> &ComponentId {
        &self.id
    }

    fn view(&self) -> String {
        let line = |text: &str| match self.width {
            Some(w) => center_text(text, w as usize),
            None => text.to_owned(),
        };
        match &self.subtitle {
            Some(sub) => format!("{}\n{}", line(&self.title), line(sub)),
            None => line(&self.title),
        }
    }

    /// Headers are static; every message passes through.
    fn update(&mut self, _msg: Message) -> (Cmd, Response) {
        (Cmd::None, Response::Ignored)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn view_title_centered() {
        let h = Header::new("h", "Hi").with_width(10);
        assert_eq!(h.view(), "    Hi    ");
    }

    #[test]
    fn view_with_subtitle() {
        let h = Header::new("h", "Title").with_subtitle("Sub");
        assert_eq!(h.view(), "Title\nSub");
    }

    #[test]
    fn view_truncates_long_title() {
        let h = Header::new("h", "Very Long Title").with_width(5);
        assert_eq!(h.view(), "Very ");
    }

    #[test]
    fn from_props_reads_title_and_width() {
        let props = json!({"title": "Users", "width": 9});
        let h = Header::from_props("h", props.as_object().unwrap());
        assert_eq!(h.title(), "Users");
        assert_eq!(h.view(), "  Users  ");
    }

    #[test]
    fn ignores_messages() {
        let mut h = Header::new("h", "T");
        let (cmd, resp) = h.update(Message::action("anything"));
        assert!(cmd.is_none());
        assert_eq!(resp, Response::Ignored);
        assert!(!h.is_focused());
    }

    #[test]
    fn set_title_replaces() {
        let mut h = Header::new("h", "T");
        h.set_title("U");
        assert_eq!(h.title(), "U");
        assert!(h.subtitle().is_none());
    }
}
