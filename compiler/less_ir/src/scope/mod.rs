//! The frame chain searched by name lookups.
//!
//! A frame is a ruleset; its declarations are the bindings. Lookups scan
//! innermost-first and stop at the first frame that declares the name.
//! Frames are stored innermost-last so entering and leaving a scope is a
//! push and a pop.

use std::rc::Rc;

use crate::Ruleset;

#[derive(Clone, Debug, Default)]
pub struct FrameChain {
    frames: Vec<Rc<Ruleset>>,
}

impl FrameChain {
    pub fn new() -> Self {
        FrameChain::default()
    }

    /// Build a chain from frames listed innermost first.
    pub fn from_innermost_first(frames: impl IntoIterator<Item = Rc<Ruleset>>) -> Self {
        let mut frames: Vec<_> = frames.into_iter().collect();
        frames.reverse();
        FrameChain { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames, innermost first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Rc<Ruleset>> + ExactSizeIterator {
        self.frames.iter().rev()
    }

    pub fn innermost(&self) -> Option<&Rc<Ruleset>> {
        self.frames.last()
    }

    pub fn push_innermost(&mut self, frame: Rc<Ruleset>) {
        self.frames.push(frame);
    }

    pub fn pop_innermost(&mut self) -> Option<Rc<Ruleset>> {
        self.frames.pop()
    }

    /// Swap the innermost frame for an updated copy of itself.
    pub fn replace_innermost(&mut self, frame: Rc<Ruleset>) {
        match self.frames.last_mut() {
            Some(last) => *last = frame,
            None => self.frames.push(frame),
        }
    }

    /// `inner` followed by this chain: `inner`'s frames are searched first.
    #[must_use]
    pub fn prepended(&self, inner: &FrameChain) -> FrameChain {
        let mut frames = Vec::with_capacity(self.frames.len() + inner.frames.len());
        frames.extend(self.frames.iter().cloned());
        frames.extend(inner.frames.iter().cloned());
        FrameChain { frames }
    }

    /// The innermost frame declaring variable `name`.
    pub fn frame_with_variable(&self, name: &str) -> Option<Rc<Ruleset>> {
        self.iter()
            .find(|frame| frame.variable(name).is_some())
            .cloned()
    }

    /// The innermost frame declaring property `name`.
    pub fn frame_with_property(&self, name: &str) -> Option<Rc<Ruleset>> {
        self.iter()
            .find(|frame| !frame.property(name).is_empty())
            .cloned()
    }
}

#[cfg(test)]
mod tests;
