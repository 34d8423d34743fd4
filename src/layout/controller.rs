//! # Content Sizing Controller
//!
//! Owns the measured height and runs the two phases:
//!
//! - **Measuring**: no height yet. The composed content is laid out inside
//!   a [`SizeObserver`] as an off-display probe and nothing is shown.
//! - **Decided**: the height is known. Every build compares it to the
//!   available height and renders a fixed block or a capped scroll region.
//!
//! The measurement belongs to one composition. Each build composes the
//! content again and compares it with the composition that was measured;
//! any difference (page, theme resolution, width) throws the measurement
//! away and goes back to Measuring. The available height isn't part of the
//! composition, so changing it alone only re-runs the decision.
//!
//! Measurement state changes in two places only, both after a frame: the
//! observer's report, and a one-shot check after the first layout that
//! picks up the probe's size if no report has landed yet.

use tracing::{debug, trace};

use super::compose::ComposedContent;
use super::decide::{decide, Decision};
use super::observer::{PostFrameCallbacks, SizeObserver};
use super::{
    BoxConstraints, FixedBlock, Probe, ScrollController, ScrollRegion, SheetContent, Size,
};
use crate::model::{ModalType, Page, ScrollAnimationStyle, TitleKey};
use crate::style::{DefaultTheme, ResolvedLayout, SheetTheme};

/// Everything the host supplies for one build.
#[derive(Debug, Clone)]
pub struct BuildContext<'a> {
    pub page: &'a Page,
    pub theme: &'a SheetTheme,
    pub defaults: &'a DefaultTheme,
    pub modal_type: ModalType,
    /// Height the host offers the content area on this pass.
    pub available_height: f64,
    /// Width the content is laid out at.
    pub width: f64,
    pub scroll_controller: Option<&'a ScrollController>,
    pub title_key: Option<&'a TitleKey>,
    pub scroll_animation: ScrollAnimationStyle,
}

impl<'a> BuildContext<'a> {
    pub fn new(
        page: &'a Page,
        theme: &'a SheetTheme,
        defaults: &'a DefaultTheme,
        width: f64,
        available_height: f64,
    ) -> Self {
        Self {
            page,
            theme,
            defaults,
            modal_type: ModalType::default(),
            available_height,
            width,
            scroll_controller: None,
            title_key: None,
            scroll_animation: ScrollAnimationStyle::default(),
        }
    }

    pub fn with_modal_type(mut self, modal_type: ModalType) -> Self {
        self.modal_type = modal_type;
        self
    }

    pub fn with_scroll_controller(mut self, controller: &'a ScrollController) -> Self {
        self.scroll_controller = Some(controller);
        self
    }

    pub fn with_title_key(mut self, key: &'a TitleKey) -> Self {
        self.title_key = Some(key);
        self
    }

    pub fn with_scroll_animation(mut self, style: ScrollAnimationStyle) -> Self {
        self.scroll_animation = style;
        self
    }

    /// Page flag or modal type: either one forces the maximum height.
    pub fn force_max_height(&self) -> bool {
        self.page.force_max_height() || self.modal_type.force_max_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Measuring,
    Decided,
}

/// Measure-then-decide state for one displayed page.
#[derive(Debug)]
pub struct ContentSizingController {
    measured_height: Option<f64>,
    /// The composition `measured_height` belongs to.
    composition: Option<ComposedContent>,
    observer: SizeObserver<ContentSizingController>,
    /// Size of the most recent probe layout.
    probe_size: Option<Size>,
    first_layout_scheduled: bool,
    first_layout_checked: bool,
    needs_build: bool,
}

impl Default for ContentSizingController {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentSizingController {
    pub fn new() -> Self {
        Self {
            measured_height: None,
            composition: None,
            observer: SizeObserver::new(|controller: &mut ContentSizingController, size| {
                controller.on_size_reported(size)
            }),
            probe_size: None,
            first_layout_scheduled: false,
            first_layout_checked: false,
            needs_build: true,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.measured_height.is_some() {
            Phase::Decided
        } else {
            Phase::Measuring
        }
    }

    pub fn measured_height(&self) -> Option<f64> {
        self.measured_height
    }

    /// Whether state changed since the last build and the host should
    /// build again.
    pub fn needs_build(&self) -> bool {
        self.needs_build
    }

    /// Drop the measurement and go back to Measuring on the next build.
    pub fn invalidate(&mut self) {
        self.reset_measurement();
        self.composition = None;
        self.needs_build = true;
    }

    /// Build the content for this pass.
    ///
    /// Post-frame work (size reports, the first-layout check) is scheduled
    /// on `callbacks`; the host flushes it once the frame is done.
    pub fn build(
        &mut self,
        ctx: &BuildContext<'_>,
        callbacks: &mut PostFrameCallbacks<ContentSizingController>,
    ) -> SheetContent {
        self.needs_build = false;

        let resolved = ResolvedLayout::resolve(ctx.page, ctx.theme, ctx.defaults);
        let composed = ComposedContent::compose(ctx.page, &resolved, ctx.width);

        if self.composition.as_ref() != Some(&composed) {
            if self.composition.is_some() {
                debug!(width = ctx.width, "composition changed, measuring again");
            }
            self.reset_measurement();
            self.composition = Some(composed.clone());
        }

        let decision = decide(
            self.measured_height,
            ctx.available_height,
            ctx.page.is_scrolling_capable(),
            ctx.force_max_height(),
        );
        trace!(?decision, available = ctx.available_height, "built sheet content");

        let content = match decision {
            Decision::Measuring => SheetContent::Measuring(self.probe(&composed, callbacks)),
            Decision::FixedBlock {
                content_height,
                filler_height,
            } => {
                let composed = if filler_height > 0.0 {
                    composed.with_filler(filler_height)
                } else {
                    composed
                };
                let (sections, _) = composed.place();
                SheetContent::Fixed(FixedBlock {
                    sections,
                    content_height,
                    filler_height,
                    title_key: ctx.title_key.cloned(),
                    hero_animation: ctx.scroll_animation,
                })
            }
            Decision::CappedScroll { height } => {
                let (sections, content_height) = composed.place();
                let controller = ctx.scroll_controller.cloned();
                if let Some(controller) = &controller {
                    controller.attach(content_height - height);
                }
                SheetContent::Scrollable(ScrollRegion {
                    sections,
                    height,
                    content_height,
                    physics: resolved.scroll_physics,
                    controller,
                    title_key: ctx.title_key.cloned(),
                    hero_animation: ctx.scroll_animation,
                })
            }
        };

        if !self.first_layout_scheduled {
            self.first_layout_scheduled = true;
            callbacks.schedule(ContentSizingController::after_first_layout);
        }

        content
    }

    /// Record a size reported by the observer.
    ///
    /// Repeated reports of the current height change nothing; a different
    /// height replaces the old one because the content really changed.
    pub fn on_size_reported(&mut self, size: Size) {
        if self.measured_height == Some(size.height) {
            trace!(height = size.height, "redundant size report");
            return;
        }
        debug!(
            height = size.height,
            previous = ?self.measured_height,
            "content measured"
        );
        self.measured_height = Some(size.height);
        self.needs_build = true;
    }

    /// One-shot check after the first layout: if no report has arrived,
    /// take the probe's size. Never overwrites an existing measurement.
    pub fn after_first_layout(&mut self) {
        if self.first_layout_checked {
            return;
        }
        self.first_layout_checked = true;
        if self.measured_height.is_some() {
            return;
        }
        if let Some(size) = self.probe_size {
            debug!(height = size.height, "measured from first layout");
            self.measured_height = Some(size.height);
            self.needs_build = true;
        }
    }

    fn probe(
        &mut self,
        composed: &ComposedContent,
        callbacks: &mut PostFrameCallbacks<ContentSizingController>,
    ) -> Probe {
        let constraints = BoxConstraints::tight_width(composed.width);
        let size = self.observer.observe(composed, constraints, callbacks);
        self.probe_size = Some(size);
        Probe { size }
    }

    fn reset_measurement(&mut self) {
        if self.measured_height.is_some() {
            debug!("measurement invalidated");
        }
        self.measured_height = None;
        self.probe_size = None;
        self.observer.reset();
    }
}
