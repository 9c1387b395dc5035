//! Metadata shared by every node kind.
//!
//! Location (`index` + [`FileInfo`]) only feeds diagnostics and output
//! chunks. `parent` is a plain [`NodeId`], never a strong reference, so trees
//! stay acyclic and can be shared behind `Rc` freely. Visibility is tracked
//! for reference imports: nodes from a referenced file are hidden unless
//! something explicitly makes them visible.

use std::rc::Rc;

use less_diagnostic::span_utils::offset_to_line_col;
use less_diagnostic::LessError;

use crate::NodeId;

/// Facts about the file a node came from.
#[derive(Clone, Debug, Default)]
pub struct FileInfo {
    pub filename: String,
    /// Path prefix prepended to relative urls when rewriting.
    pub rootpath: String,
    pub current_directory: String,
    pub entry_path: String,
    /// Imported with `(reference)`: output only when explicitly used.
    pub reference: bool,
    /// Source text, when the host kept it. Only used for line/column.
    pub contents: Option<Rc<str>>,
}

impl FileInfo {
    pub fn named(filename: impl Into<String>) -> Self {
        FileInfo {
            filename: filename.into(),
            ..FileInfo::default()
        }
    }

    /// 1-based line and column of `index`, if the contents are known.
    pub fn line_column(&self, index: usize) -> Option<(u32, u32)> {
        self.contents
            .as_deref()
            .map(|source| offset_to_line_col(source, index))
    }
}

/// Visibility bookkeeping for nodes pulled in from reference imports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisibilityInfo {
    pub blocks: u32,
    pub node_visible: Option<bool>,
}

impl VisibilityInfo {
    pub fn blocks_visibility(&self) -> bool {
        self.blocks > 0
    }

    pub fn add_visibility_block(&mut self) {
        self.blocks += 1;
    }

    pub fn remove_visibility_block(&mut self) {
        self.blocks = self.blocks.saturating_sub(1);
    }

    pub fn ensure_visibility(&mut self) {
        self.node_visible = Some(true);
    }

    pub fn ensure_invisibility(&mut self) {
        self.node_visible = Some(false);
    }

    pub fn is_visible(&self) -> Option<bool> {
        self.node_visible
    }
}

/// Identity, location and visibility of one node.
#[derive(Clone, Debug)]
pub struct NodeMeta {
    pub id: NodeId,
    pub index: Option<usize>,
    pub file_info: Option<Rc<FileInfo>>,
    pub parent: Option<NodeId>,
    pub visibility: VisibilityInfo,
}

impl NodeMeta {
    pub fn new() -> Self {
        NodeMeta {
            id: NodeId::fresh(),
            index: None,
            file_info: None,
            parent: None,
            visibility: VisibilityInfo::default(),
        }
    }

    pub fn at(index: Option<usize>, file_info: Option<Rc<FileInfo>>) -> Self {
        NodeMeta {
            index,
            file_info,
            ..NodeMeta::new()
        }
    }

    /// Metadata for a node produced from this one: a fresh id, the same
    /// location and visibility, no parent yet.
    #[must_use]
    pub fn derive(&self) -> Self {
        NodeMeta {
            id: NodeId::fresh(),
            index: self.index,
            file_info: self.file_info.clone(),
            parent: None,
            visibility: self.visibility,
        }
    }

    pub fn filename(&self) -> Option<&str> {
        self.file_info.as_deref().map(|info| info.filename.as_str())
    }

    /// Attach this node's location to `err` unless it already has one.
    pub fn locate(&self, err: LessError) -> LessError {
        let had_index = err.index.is_some();
        let mut err = err.at(self.filename(), self.index);
        if !had_index && !err.has_line_column() {
            if let Some((line, column)) = self
                .index
                .and_then(|index| self.file_info.as_deref()?.line_column(index))
            {
                err = err.with_line_column(line, column);
            }
        }
        err
    }
}

impl Default for NodeMeta {
    fn default() -> Self {
        Self::new()
    }
}
