//! # Content Composition
//!
//! Turns a page and its resolved layout parameters into the linear list of
//! sections that both the probe and the visible render lay out:
//!
//! ```text
//! [leading]  hero image, or a spacer the height of the top bar
//! [title]    the page title, or an empty placeholder
//! [body..]   the page's body sections for this width
//! [filler]   only when a fixed block must stretch to the full height
//! ```
//!
//! The leading and title slots are always present so the list has the
//! same shape whether or not a page sets them.

use serde::Serialize;

use super::{BoxConstraints, Frame, Layout, PlacedSection, Size};
use crate::model::{HeroImage, Page, Section};
use crate::style::ResolvedLayout;

/// Which part of the composition a section is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SectionRole {
    Leading,
    Title,
    Body(usize),
    Filler,
}

/// What fills a composed slot.
///
/// Equality is what decides whether a measurement is still valid, so it
/// only looks at what affects height: two hero images of the same height
/// are equal whatever their source.
#[derive(Debug, Clone)]
pub enum Slot {
    Hero { image: HeroImage, height: f64 },
    Spacer { height: f64 },
    /// Stands in for a missing title.
    Placeholder,
    Block(Section),
}

impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Slot::Hero { height: a, .. }, Slot::Hero { height: b, .. }) => a == b,
            (Slot::Spacer { height: a }, Slot::Spacer { height: b }) => a == b,
            (Slot::Placeholder, Slot::Placeholder) => true,
            (Slot::Block(a), Slot::Block(b)) => a == b,
            _ => false,
        }
    }
}

impl Layout for Slot {
    fn layout(&self, constraints: BoxConstraints) -> Size {
        match self {
            Slot::Hero { height, .. } | Slot::Spacer { height } => {
                Section::fixed(*height).layout(constraints)
            }
            Slot::Placeholder => Section::fixed(0.0).layout(constraints),
            Slot::Block(section) => section.layout(constraints),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComposedSection {
    pub role: SectionRole,
    pub slot: Slot,
}

/// The composed section list for one page at one width.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedContent {
    pub width: f64,
    pub sections: Vec<ComposedSection>,
}

impl ComposedContent {
    pub fn compose(page: &Page, resolved: &ResolvedLayout, width: f64) -> Self {
        let width = width.max(0.0);
        let leading = match page.hero_image() {
            Some(image) => Slot::Hero {
                image: image.clone(),
                height: resolved.hero_image_height,
            },
            None => Slot::Spacer {
                height: resolved.leading_spacer_height(),
            },
        };
        let title = match page.title() {
            Some(title) => Slot::Block(title.for_width(width)),
            None => Slot::Placeholder,
        };

        let mut sections = vec![
            ComposedSection {
                role: SectionRole::Leading,
                slot: leading,
            },
            ComposedSection {
                role: SectionRole::Title,
                slot: title,
            },
        ];
        sections.extend(
            page.body_sections(width)
                .into_iter()
                .enumerate()
                .map(|(i, section)| ComposedSection {
                    role: SectionRole::Body(i),
                    slot: Slot::Block(section),
                }),
        );

        ComposedContent { width, sections }
    }

    /// Append a filler of `height`. Only the fixed block does this, after
    /// measurement, so the measured composition never includes it.
    pub fn with_filler(mut self, height: f64) -> Self {
        self.sections.push(ComposedSection {
            role: SectionRole::Filler,
            slot: Slot::Spacer { height },
        });
        self
    }

    /// Lay the sections out top to bottom. Returns the placed sections and
    /// the total height.
    pub fn place(&self) -> (Vec<PlacedSection>, f64) {
        let constraints = BoxConstraints::tight_width(self.width);
        let mut y = 0.0;
        let placed = self
            .sections
            .iter()
            .map(|section| {
                let height = section.slot.layout(constraints).height;
                let frame = Frame { y, height };
                y += height;
                PlacedSection {
                    role: section.role,
                    frame,
                }
            })
            .collect();
        (placed, y)
    }
}

impl Layout for ComposedContent {
    fn layout(&self, constraints: BoxConstraints) -> Size {
        let child = BoxConstraints::tight_width(constraints.fill_width());
        let height = self
            .sections
            .iter()
            .map(|section| section.slot.layout(child).height)
            .sum();
        constraints.constrain(Size::new(constraints.fill_width(), height))
    }
}
