//! Writable page abstraction.

/// A page whose elements can be addressed by their `id`.
///
/// Every setter returns `false` when no element carries the id; callers
/// treat missing elements as optional.
#[cfg_attr(test, mockall::automock)]
pub trait Document {
    /// Set the `href` attribute of an element.
    fn set_href(&mut self, id: &str, url: &str) -> bool;

    /// Replace the content of an element with plain text.
    fn set_text(&mut self, id: &str, text: &str) -> bool;

    /// Replace the content of an element with an HTML fragment.
    fn set_html(&mut self, id: &str, html: &str) -> bool;
}
