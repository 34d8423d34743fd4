//! # Sheet Content Layout
//!
//! The sizing negotiation for a sheet's main content area.
//!
//! ## The Problem
//!
//! A sheet wants short content to sit at its natural height and long
//! content to scroll inside whatever height the sheet has left. But the
//! content's natural height isn't known until the content has been laid
//! out, and the choice between the two modes has to be made during layout.
//!
//! ## How It's Solved
//!
//! Layout is speculative:
//!
//! 1. Compose the content (leading slot, title, body) for the current width
//! 2. Lay it out once off-display, with unbounded height, inside a
//!    [`SizeObserver`](observer::SizeObserver). Nothing is painted.
//! 3. The observer reports the natural height after the frame
//! 4. Rebuild: with the height known, pick a fixed block or a capped
//!    scroll region against the real available height
//!
//! The measurement is keyed on the composition itself, so it survives
//! changes to the available height and is thrown away as soon as the
//! content or width changes shape.

pub mod compose;
pub mod controller;
pub mod decide;
pub mod observer;

use std::cell::Cell;
use std::rc::Rc;

use serde::Serialize;

use crate::model::{ScrollAnimationStyle, Section, TitleKey};
use crate::style::ScrollPhysics;

pub use compose::{ComposedContent, ComposedSection, SectionRole, Slot};
pub use controller::{BuildContext, ContentSizingController, Phase};
pub use decide::{decide, Decision};
pub use observer::{PostFrameCallbacks, SizeObserver};

/// Advance of one character, as a fraction of the font size.
const CHAR_ADVANCE_EM: f64 = 0.5;

/// A laid-out box size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Min/max bounds a parent imposes on a child's size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxConstraints {
    pub min_width: f64,
    pub max_width: f64,
    pub min_height: f64,
    pub max_height: f64,
}

impl BoxConstraints {
    /// Exactly `width` wide, any height. This is how content is measured
    /// for its natural height.
    pub fn tight_width(width: f64) -> Self {
        Self {
            min_width: width,
            max_width: width,
            min_height: 0.0,
            max_height: f64::INFINITY,
        }
    }

    /// Clamp a size into these bounds.
    pub fn constrain(&self, size: Size) -> Size {
        Size {
            width: size.width.max(self.min_width).min(self.max_width),
            height: size.height.max(self.min_height).min(self.max_height),
        }
    }

    /// The width a child should fill, or zero when unbounded.
    fn fill_width(&self) -> f64 {
        if self.max_width.is_finite() {
            self.max_width
        } else {
            self.min_width
        }
    }
}

/// Something that can be laid out under constraints.
pub trait Layout {
    fn layout(&self, constraints: BoxConstraints) -> Size;
}

impl Layout for Section {
    fn layout(&self, constraints: BoxConstraints) -> Size {
        let width = constraints.fill_width();
        let height = match self {
            Section::Fixed { height } => height.max(0.0),
            Section::Text {
                content,
                font_size,
                line_height,
            } => {
                let lines = count_lines(content, font_size * CHAR_ADVANCE_EM, width);
                lines as f64 * font_size * line_height
            }
            Section::Image { aspect_ratio } => {
                if *aspect_ratio > 0.0 {
                    width / aspect_ratio
                } else {
                    0.0
                }
            }
            Section::Responsive { .. } => {
                return self.for_width(width).layout(constraints);
            }
            Section::Column { children } => children
                .iter()
                .map(|child| child.layout(BoxConstraints::tight_width(width)).height)
                .sum(),
        };
        // 0 * inf and inf / inf come out as NaN; a NaN size never equals
        // itself and would be reported on every layout.
        constraints.constrain(Size::new(width, height.max(0.0)))
    }
}

/// Greedy word wrap with a fixed per-character advance. Explicit newlines
/// always break. A word wider than the line gets a line of its own.
fn count_lines(text: &str, advance: f64, max_width: f64) -> usize {
    if text.trim().is_empty() {
        return 0;
    }
    let space = advance;
    let mut lines = 0;
    for paragraph in text.split('\n') {
        let mut line_width = 0.0;
        let mut line_open = false;
        for word in paragraph.split_whitespace() {
            let word_width = word.chars().count() as f64 * advance;
            if !line_open {
                line_width = word_width;
                line_open = true;
            } else if line_width + space + word_width > max_width {
                lines += 1;
                line_width = word_width;
            } else {
                line_width += space + word_width;
            }
        }
        // An empty paragraph still occupies a line.
        lines += 1;
    }
    lines
}

// ── Output ──────────────────────────────────────────────────────

/// Vertical extent of something placed in the content's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub y: f64,
    pub height: f64,
}

impl Frame {
    fn contains(&self, y: f64) -> bool {
        y >= self.y && y < self.y + self.height
    }
}

/// A composed section after layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedSection {
    pub role: SectionRole,
    pub frame: Frame,
}

/// Shared handle to the scroll position of the capped scroll region.
///
/// Clones share the same position, so the host keeps one and the region
/// it's attached to clamps it.
#[derive(Debug, Clone, Default)]
pub struct ScrollController {
    inner: Rc<ScrollState>,
}

#[derive(Debug, Default)]
struct ScrollState {
    offset: Cell<f64>,
    max_scroll_extent: Cell<f64>,
}

impl PartialEq for ScrollController {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl ScrollController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> f64 {
        self.inner.offset.get()
    }

    pub fn max_scroll_extent(&self) -> f64 {
        self.inner.max_scroll_extent.get()
    }

    /// Move to `offset`, clamped to the attached region's extent.
    pub fn jump_to(&self, offset: f64) {
        let clamped = offset.max(0.0).min(self.max_scroll_extent());
        self.inner.offset.set(clamped);
    }

    fn attach(&self, max_scroll_extent: f64) {
        self.inner.max_scroll_extent.set(max_scroll_extent.max(0.0));
        self.jump_to(self.offset());
    }
}

/// The off-display measurement pass. Laid out, never painted or hit.
#[derive(Debug, Clone, PartialEq)]
pub struct Probe {
    /// The natural size the probe laid out at.
    pub size: Size,
}

/// Content at its natural height with no scroll container.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedBlock {
    pub sections: Vec<PlacedSection>,
    pub content_height: f64,
    /// Height of the trailing filler, zero when there is none.
    pub filler_height: f64,
    pub title_key: Option<TitleKey>,
    pub hero_animation: ScrollAnimationStyle,
}

impl FixedBlock {
    pub fn total_height(&self) -> f64 {
        self.content_height + self.filler_height
    }
}

/// Content inside a scroll container capped to the available height.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollRegion {
    pub sections: Vec<PlacedSection>,
    /// Height of the visible viewport.
    pub height: f64,
    pub content_height: f64,
    pub physics: ScrollPhysics,
    pub controller: Option<ScrollController>,
    pub title_key: Option<TitleKey>,
    pub hero_animation: ScrollAnimationStyle,
}

impl ScrollRegion {
    pub fn max_scroll_extent(&self) -> f64 {
        (self.content_height - self.height).max(0.0)
    }

    fn offset(&self) -> f64 {
        self.controller.as_ref().map_or(0.0, ScrollController::offset)
    }
}

/// What the controller hands the host for one build.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetContent {
    Measuring(Probe),
    Fixed(FixedBlock),
    Scrollable(ScrollRegion),
}

impl SheetContent {
    /// Height this content occupies in the host's layout.
    pub fn height(&self) -> f64 {
        match self {
            SheetContent::Measuring(_) => 0.0,
            SheetContent::Fixed(block) => block.total_height(),
            SheetContent::Scrollable(region) => region.height,
        }
    }

    pub fn decision(&self) -> Decision {
        match self {
            SheetContent::Measuring(_) => Decision::Measuring,
            SheetContent::Fixed(block) => Decision::FixedBlock {
                content_height: block.content_height,
                filler_height: block.filler_height,
            },
            SheetContent::Scrollable(region) => Decision::CappedScroll {
                height: region.height,
            },
        }
    }

    pub fn is_measuring(&self) -> bool {
        matches!(self, SheetContent::Measuring(_))
    }

    /// Sections that get painted. Empty while measuring.
    pub fn visible_sections(&self) -> &[PlacedSection] {
        match self {
            SheetContent::Measuring(_) => &[],
            SheetContent::Fixed(block) => &block.sections,
            SheetContent::Scrollable(region) => &region.sections,
        }
    }

    pub fn probe_count(&self) -> usize {
        usize::from(self.is_measuring())
    }

    /// The section under viewport coordinate `y`, if any.
    pub fn hit_test(&self, y: f64) -> Option<SectionRole> {
        let content_y = match self {
            SheetContent::Measuring(_) => return None,
            SheetContent::Fixed(block) => {
                if y < 0.0 || y >= block.total_height() {
                    return None;
                }
                y
            }
            SheetContent::Scrollable(region) => {
                if y < 0.0 || y >= region.height {
                    return None;
                }
                y + region.offset()
            }
        };
        self.visible_sections()
            .iter()
            .find(|section| section.frame.contains(content_y))
            .map(|section| section.role)
    }

    /// Where the title block sits in viewport coordinates, looked up by
    /// the key the host passed in.
    pub fn title_frame(&self, key: &TitleKey) -> Option<Frame> {
        let (title_key, offset) = match self {
            SheetContent::Measuring(_) => return None,
            SheetContent::Fixed(block) => (block.title_key.as_ref(), 0.0),
            SheetContent::Scrollable(region) => (region.title_key.as_ref(), region.offset()),
        };
        if title_key != Some(key) {
            return None;
        }
        self.visible_sections()
            .iter()
            .find(|section| section.role == SectionRole::Title)
            .map(|section| Frame {
                y: section.frame.y - offset,
                height: section.frame.height,
            })
    }
}

// ── Serializable report ─────────────────────────────────────────

/// Summary of a settled layout, for the CLI and debugging.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutReport {
    pub decision: Decision,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measured_height: Option<f64>,
    pub frames: usize,
    pub sections: Vec<PlacedSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_physics: Option<ScrollPhysics>,
}

impl LayoutReport {
    pub fn from_content(content: &SheetContent, measured_height: Option<f64>, frames: usize) -> Self {
        let scroll_physics = match content {
            SheetContent::Scrollable(region) => Some(region.physics),
            _ => None,
        };
        LayoutReport {
            decision: content.decision(),
            height: content.height(),
            measured_height,
            frames,
            sections: content.visible_sections().to_vec(),
            scroll_physics,
        }
    }
}
