//! The closed set of widget kinds.
//!
//! [`Widget`] lets a runtime or layout hold any built-in widget by value and
//! reach it through [`Component`] without trait objects.

use crate::command::Cmd;
use crate::event::message::Message;
use crate::widget::traits::{Component, ComponentId, Focusable, Response};
use crate::widgets::{Crud, Footer, Form, Header, Help, Table, Timer};

/// Any built-in widget.
#[derive(Debug)]
pub enum Widget {
    Table(Table),
    Form(Form),
    Header(Header),
    Footer(Footer),
    Help(Help),
    Timer(Timer),
    Crud(Box<Crud>),
}

impl Widget {
    /// Short kind name, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Widget::Table(_) => "table",
            Widget::Form(_) => "form",
            Widget::Header(_) => "header",
            Widget::Footer(_) => "footer",
            Widget::Help(_) => "help",
            Widget::Timer(_) => "timer",
            Widget::Crud(_) => "crud",
        }
    }

    /// The record editor, if this is one.
    pub fn as_crud(&self) -> Option<&Crud> {
        match self {
            Widget::Crud(crud) => Some(crud.as_ref()),
            _ => None,
        }
    }

    /// Mutable record editor, if this is one.
    pub fn as_crud_mut(&mut self) -> Option<&mut Crud> {
        match self {
            Widget::Crud(crud) => Some(crud.as_mut()),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn Component {
        match self {
            Widget::Table(w) => w,
            Widget::Form(w) => w,
            Widget::Header(w) => w,
            Widget::Footer(w) => w,
            Widget::Help(w) => w,
            Widget::Timer(w) => w,
            Widget::Crud(w) => w.as_ref(),
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Component {
        match self {
            Widget::Table(w) => w,
            Widget::Form(w) => w,
            Widget::Header(w) => w,
            Widget::Footer(w) => w,
            Widget::Help(w) => w,
            Widget::Timer(w) => w,
            Widget::Crud(w) => w.as_mut(),
        }
    }
}

impl Component for Widget {
    fn id(&self) -> &ComponentId {
        self.inner().id()
    }

    fn view(&self) -> String {
        self.inner().view()
    }

    fn update(&mut self, msg: Message) -> (Cmd, Response) {
        self.inner_mut().update(msg)
    }

    fn init(&mut self) -> Cmd {
        self.inner_mut().init()
    }

    fn as_focusable(&self) -> Option<&dyn Focusable> {
        self.inner().as_focusable()
    }

    fn as_focusable_mut(&mut self) -> Option<&mut dyn Focusable> {
        self.inner_mut().as_focusable_mut()
    }

    fn set_focus(&mut self, focused: bool) {
        self.inner_mut().set_focus(focused);
    }

    fn is_focused(&self) -> bool {
        self.inner().is_focused()
    }
}

macro_rules! impl_from_widget {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Widget {
                fn from(w: $variant) -> Self {
                    Widget::$variant(w)
                }
            }
        )*
    };
}

impl_from_widget!(Table, Form, Header, Footer, Help, Timer);

impl From<Crud> for Widget {
    fn from(crud: Crud) -> Self {
        Widget::Crud(Box::new(crud))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnSpec;
    use crate::event::binding::Bindings;
    use crate::event::bus::EventBus;
    use crate::event::input::Key;
    use crate::widgets::CrudState;
    use serde_json::json;

    #[test]
    fn forwards_to_inner_widget() {
        let mut w = Widget::from(Help::new("help", Bindings::crud_defaults()));
        assert_eq!(w.kind(), "help");
        assert_eq!(w.id().as_str(), "help");
        let (_, resp) = w.update(Message::key(Key::Char('?')));
        assert_eq!(resp, Response::Handled);
        assert!(w.view().contains('\n'));
    }

    #[test]
    fn focus_uses_inner_capability() {
        let mut table = Widget::from(Table::new("t", vec![ColumnSpec::new("id")]));
        table.set_focus(true);
        assert!(table.is_focused());
        assert!(table.as_focusable().is_some());

        let mut header = Widget::from(Header::new("h", "title"));
        header.set_focus(true);
        assert!(!header.is_focused());
    }

    #[test]
    fn crud_routes_focus_itself() {
        let props = json!({"table_props": {"columns": ["id"]}});
        let crud = Crud::new("crud", props.as_object().unwrap(), &EventBus::new());
        let mut w = Widget::from(crud);
        w.set_focus(true);
        assert!(w.is_focused());
        let _ = w.update(Message::action("NewItemRequested"));
        assert_eq!(w.as_crud().unwrap().state(), CrudState::Creating);
        assert!(!w.is_focused());
    }
}
