//! Plugin-supplied tree passes and file managers.
//!
//! The evaluator itself never runs plugin visitors; the host sequences
//! them around evaluation with [`PluginManager::run_pre_eval`] and
//! [`PluginManager::run_post_eval`].

use std::cell::RefCell;
use std::rc::Rc;

use less_ir::visitor::{Visit, Visitor};
use less_ir::{Anonymous, Node};

use crate::environment::FileManager;

/// A tree pass with its state erased, so passes over different
/// implementations can share one list.
pub trait TreePass {
    fn is_replacing(&self) -> bool;

    fn run(&mut self, root: Node) -> Node;
}

impl<V: Visit> TreePass for Visitor<V> {
    fn is_replacing(&self) -> bool {
        V::REPLACING
    }

    fn run(&mut self, root: Node) -> Node {
        self.visit(root)
            .unwrap_or_else(|| Anonymous::empty().into())
    }
}

/// When a plugin visitor runs relative to evaluation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VisitorStage {
    PreEval,
    PostEval,
}

struct PluginVisitor {
    stage: VisitorStage,
    pass: RefCell<Box<dyn TreePass>>,
}

#[derive(Default)]
pub struct PluginManager {
    visitors: Vec<PluginVisitor>,
    file_managers: Vec<Rc<dyn FileManager>>,
}

impl PluginManager {
    pub fn new() -> Self {
        PluginManager::default()
    }

    pub fn add_visitor(&mut self, stage: VisitorStage, pass: Box<dyn TreePass>) {
        self.visitors.push(PluginVisitor {
            stage,
            pass: RefCell::new(pass),
        });
    }

    pub fn add_file_manager(&mut self, manager: Rc<dyn FileManager>) {
        self.file_managers.push(manager);
    }

    /// File managers in registration order.
    pub fn file_managers(&self) -> &[Rc<dyn FileManager>] {
        &self.file_managers
    }

    pub fn visitor_count(&self, stage: VisitorStage) -> usize {
        self.visitors
            .iter()
            .filter(|visitor| visitor.stage == stage)
            .count()
    }

    /// Run the pre-evaluation visitors in registration order.
    pub fn run_pre_eval(&self, root: Node) -> Node {
        self.run_stage(VisitorStage::PreEval, root)
    }

    /// Run the visitors that see the evaluated tree, in registration order.
    pub fn run_post_eval(&self, root: Node) -> Node {
        self.run_stage(VisitorStage::PostEval, root)
    }

    #[tracing::instrument(level = "debug", skip(self, root))]
    fn run_stage(&self, stage: VisitorStage, root: Node) -> Node {
        let mut root = root;
        for visitor in self.visitors.iter().filter(|visitor| visitor.stage == stage) {
            let mut pass = visitor.pass.borrow_mut();
            tracing::trace!(replacing = pass.is_replacing(), "running plugin visitor");
            root = pass.run(root);
        }
        root
    }
}
