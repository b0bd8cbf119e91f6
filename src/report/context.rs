//! Scoped serializer context for XML rendering.
//!
//! The XML renderer resolves its escaper through a context lookup rather
//! than a direct constructor argument; the lookup is sensitive to which
//! scope the render runs under. The render loop installs a binding with a
//! [`SerializerScope`] guard immediately around the render call and the
//! guard restores the previous binding on drop, on every exit path. If no
//! binding is installed the renderer fails loudly instead of producing a
//! report with broken escaping.

use std::cell::RefCell;
use std::rc::Rc;

/// Escapes text and attribute values for XML output.
pub trait XmlSerializer {
    fn escape_text(&self, text: &str) -> String;
    fn escape_attribute(&self, text: &str) -> String;
}

/// Default serializer backed by the `html-escape` crate.
pub struct HtmlEscapeSerializer;

impl XmlSerializer for HtmlEscapeSerializer {
    fn escape_text(&self, text: &str) -> String {
        html_escape::encode_text(text).into_owned()
    }

    fn escape_attribute(&self, text: &str) -> String {
        // encode_safe also covers quotes, required inside attribute values.
        html_escape::encode_safe(text).into_owned()
    }
}

thread_local! {
    static ACTIVE: RefCell<Option<Rc<dyn XmlSerializer>>> = const { RefCell::new(None) };
}

/// RAII guard binding a serializer for the current thread. Nesting works:
/// the previous binding comes back when the guard drops.
pub struct SerializerScope {
    previous: Option<Rc<dyn XmlSerializer>>,
}

impl SerializerScope {
    pub fn enter(serializer: Rc<dyn XmlSerializer>) -> SerializerScope {
        let previous = ACTIVE.with(|active| active.borrow_mut().replace(serializer));
        SerializerScope { previous }
    }
}

impl Drop for SerializerScope {
    fn drop(&mut self) {
        ACTIVE.with(|active| {
            *active.borrow_mut() = self.previous.take();
        });
    }
}

/// The serializer bound to the current scope, if any.
pub fn current() -> Option<Rc<dyn XmlSerializer>> {
    ACTIVE.with(|active| active.borrow().clone())
}
