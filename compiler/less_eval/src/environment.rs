//! Host capabilities used by url-embedding functions.
//!
//! Every capability is optional. A missing one makes the caller fall back
//! (for `data-uri`, to a plain `url()`), never fail.

use std::rc::Rc;

use crate::plugin::PluginManager;

/// A file read through a [`FileManager`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedFile {
    pub filename: String,
    pub contents: String,
}

/// Loads files for functions that inline them.
pub trait FileManager {
    fn supports(&self, filename: &str, current_directory: &str) -> bool;

    /// `None` when the file cannot be read.
    fn load_file_sync(&self, filename: &str, current_directory: &str) -> Option<LoadedFile>;
}

/// Host environment consulted during evaluation.
pub trait Environment {
    fn encode_base64(&self, _contents: &str) -> Option<String> {
        None
    }

    fn mime_lookup(&self, _filename: &str) -> Option<String> {
        None
    }

    fn charset_lookup(&self, _mime: &str) -> Option<String> {
        None
    }

    /// File managers registered with the environment, oldest first.
    fn file_managers(&self) -> &[Rc<dyn FileManager>] {
        &[]
    }
}

/// An environment without any capabilities.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoEnvironment;

impl Environment for NoEnvironment {}

/// The file manager to use for `filename`: plugin managers first, then the
/// environment's own, each searched newest first.
pub fn get_file_manager(
    environment: &dyn Environment,
    filename: &str,
    current_directory: &str,
    plugins: &PluginManager,
) -> Option<Rc<dyn FileManager>> {
    plugins
        .file_managers()
        .iter()
        .rev()
        .chain(environment.file_managers().iter().rev())
        .find(|manager| manager.supports(filename, current_directory))
        .cloned()
}
