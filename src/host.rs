//! # Sheet Host
//!
//! Drives the controller the way a host's frame pipeline would: build,
//! then run post-frame callbacks, then build again if anything asked for
//! it. A pump stops once the controller is clean, or after a fixed number
//! of frames so a composition that keeps changing can't spin forever.

use tracing::warn;

use crate::layout::{
    BuildContext, ContentSizingController, LayoutReport, PostFrameCallbacks, SheetContent,
};

/// Frames a single pump may run before giving up on settling.
pub const MAX_FRAMES_PER_PUMP: usize = 8;

#[derive(Debug, Default)]
pub struct SheetHost {
    controller: ContentSizingController,
    callbacks: PostFrameCallbacks<ContentSizingController>,
    frames: usize,
}

impl SheetHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn controller(&self) -> &ContentSizingController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ContentSizingController {
        &mut self.controller
    }

    /// Total frames run over this host's lifetime.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Run one frame: build, then flush post-frame callbacks.
    pub fn frame(&mut self, ctx: &BuildContext<'_>) -> SheetContent {
        let content = self.controller.build(ctx, &mut self.callbacks);
        self.callbacks.flush(&mut self.controller);
        self.frames += 1;
        content
    }

    /// Run frames until the controller stops asking for builds.
    pub fn pump(&mut self, ctx: &BuildContext<'_>) -> SheetContent {
        let mut content = self.frame(ctx);
        let mut frames = 1;
        while self.controller.needs_build() {
            if frames >= MAX_FRAMES_PER_PUMP {
                warn!(frames, "sheet content did not settle");
                break;
            }
            content = self.frame(ctx);
            frames += 1;
        }
        content
    }

    /// Pump and summarize the result.
    pub fn report(&mut self, ctx: &BuildContext<'_>) -> LayoutReport {
        let before = self.frames;
        let content = self.pump(ctx);
        LayoutReport::from_content(
            &content,
            self.controller.measured_height(),
            self.frames - before,
        )
    }
}
