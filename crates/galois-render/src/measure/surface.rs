use std::sync::atomic::{AtomicUsize, Ordering};

use crate::transcode::Markup;

/// An invisible surface that layout nodes are mounted on while they are measured.
///
/// The surface only keeps count of what is mounted; a node is unmounted when it is dropped.
#[derive(Debug, Default)]
pub struct OffscreenSurface {
    live: AtomicUsize,
}

impl OffscreenSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount<'s>(&'s self, markup: &Markup, font_size: f32) -> LayoutNode<'s> {
        self.live.fetch_add(1, Ordering::AcqRel);
        LayoutNode {
            surface: self,
            markup: markup.clone(),
            font_size,
        }
    }

    /// Number of nodes currently mounted.
    pub fn live_nodes(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }
}

/// A temporary node holding one fragment at one font size.
#[derive(Debug)]
pub struct LayoutNode<'s> {
    surface: &'s OffscreenSurface,
    markup: Markup,
    font_size: f32,
}

impl LayoutNode<'_> {
    #[inline]
    pub fn markup(&self) -> &Markup {
        &self.markup
    }

    #[inline]
    pub fn font_size(&self) -> f32 {
        self.font_size
    }
}

impl Drop for LayoutNode<'_> {
    fn drop(&mut self) {
        self.surface.live.fetch_sub(1, Ordering::AcqRel);
    }
}
