//! Output sinks for code2html
//!
//! Rendered fragments leave the tool through one of three sinks: the
//! system clipboard (this module), stdout, or the preview panel. The
//! clipboard sink writes HTML-typed content so rich-paste targets (mail
//! clients, word processors, chat) receive formatted code.

pub mod clipboard;

pub use clipboard::copy_html_to_clipboard;
