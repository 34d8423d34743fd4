//! # Sheet Model
//!
//! The input representation: pages, the sections they're made of, and the
//! modal configuration the host hands down. Everything here is plain data
//! that can be built in code or deserialized from a scenario document.
//!
//! A page comes in two variants. A scrolling page carries an optional hero
//! image, an optional title and an ordered list of body sections. A
//! non-scrolling page carries exactly one body section and nothing else.
//! Only the scrolling variant is ever allowed to render as a fixed block.

use serde::{Deserialize, Serialize};

/// A page shown in the sheet's main content area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Page {
    Scrolling(ScrollingPage),
    NonScrolling(NonScrollingPage),
}

impl Page {
    /// Whether this page may use the fixed-block shortcut.
    pub fn is_scrolling_capable(&self) -> bool {
        matches!(self, Page::Scrolling(_))
    }

    pub fn hero_image(&self) -> Option<&HeroImage> {
        match self {
            Page::Scrolling(page) => page.hero_image.as_ref(),
            Page::NonScrolling(_) => None,
        }
    }

    pub fn hero_image_height(&self) -> Option<f64> {
        match self {
            Page::Scrolling(page) => page.hero_image_height,
            Page::NonScrolling(_) => None,
        }
    }

    pub fn title(&self) -> Option<&Section> {
        match self {
            Page::Scrolling(page) => page.title.as_ref(),
            Page::NonScrolling(_) => None,
        }
    }

    pub fn force_max_height(&self) -> bool {
        match self {
            Page::Scrolling(page) => page.force_max_height,
            Page::NonScrolling(page) => page.force_max_height,
        }
    }

    pub fn top_bar(&self) -> &TopBarOverrides {
        match self {
            Page::Scrolling(page) => &page.top_bar,
            Page::NonScrolling(page) => &page.top_bar,
        }
    }

    /// The body sections as authored, before width resolution.
    pub fn body(&self) -> &[Section] {
        match self {
            Page::Scrolling(page) => &page.body,
            Page::NonScrolling(page) => std::slice::from_ref(&page.body),
        }
    }

    /// Produce the body sections for the current layout width.
    ///
    /// Responsive sections collapse to whichever branch applies at `width`,
    /// so the returned list is what actually gets laid out.
    pub fn body_sections(&self, width: f64) -> Vec<Section> {
        match self {
            Page::Scrolling(page) => page.body.iter().map(|s| s.for_width(width)).collect(),
            Page::NonScrolling(page) => vec![page.body.for_width(width)],
        }
    }
}

/// A page whose content may scroll, and which may also render as a
/// fixed block when it's short enough.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollingPage {
    #[serde(default)]
    pub hero_image: Option<HeroImage>,
    /// Overrides the theme's hero image height for this page.
    #[serde(default)]
    pub hero_image_height: Option<f64>,
    #[serde(default)]
    pub title: Option<Section>,
    #[serde(default)]
    pub body: Vec<Section>,
    /// Stretch the content to the full available height.
    #[serde(default)]
    pub force_max_height: bool,
    #[serde(flatten)]
    pub top_bar: TopBarOverrides,
}

/// A page with a single body block that never takes the fixed-block
/// shortcut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonScrollingPage {
    pub body: Section,
    #[serde(default)]
    pub force_max_height: bool,
    #[serde(flatten)]
    pub top_bar: TopBarOverrides,
}

/// Per-page overrides for the top bar. `None` defers to the theme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopBarOverrides {
    #[serde(default)]
    pub has_top_bar_layer: Option<bool>,
    #[serde(default)]
    pub is_top_bar_layer_always_visible: Option<bool>,
    /// A leading navigation widget (e.g. a back button) is present.
    #[serde(default)]
    pub has_leading_widget: bool,
    /// A trailing navigation widget (e.g. a close button) is present.
    #[serde(default)]
    pub has_trailing_widget: bool,
}

/// The decorative image at the top of a scrolling page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroImage {
    /// Opaque identifier of the image asset.
    pub source: String,
}

/// A block of content with a natural height at a given width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Section {
    /// A block of known height regardless of width.
    Fixed { height: f64 },
    /// Wrapped text. Height depends on how many lines the text breaks into.
    #[serde(rename_all = "camelCase")]
    Text {
        content: String,
        #[serde(default = "default_font_size")]
        font_size: f64,
        /// Line height as a multiplier of font size.
        #[serde(default = "default_line_height")]
        line_height: f64,
    },
    /// An image scaled to the full width.
    #[serde(rename_all = "camelCase")]
    Image { aspect_ratio: f64 },
    /// Chooses `narrow` below `breakpoint` and `wide` at or above it.
    Responsive {
        breakpoint: f64,
        narrow: Box<Section>,
        wide: Box<Section>,
    },
    /// Children stacked vertically.
    Column { children: Vec<Section> },
}

fn default_font_size() -> f64 {
    14.0
}

fn default_line_height() -> f64 {
    1.4
}

impl Section {
    pub fn fixed(height: f64) -> Self {
        Section::Fixed { height }
    }

    pub fn text(content: &str, font_size: f64) -> Self {
        Section::Text {
            content: content.to_string(),
            font_size,
            line_height: default_line_height(),
        }
    }

    /// Resolve responsive branches (recursively) for `width`.
    ///
    /// Lengths in the result are clamped to `>= 0`, which also turns NaN
    /// into zero, so the resolved section always compares equal to itself.
    pub fn for_width(&self, width: f64) -> Section {
        match self {
            Section::Fixed { height } => Section::Fixed {
                height: height.max(0.0),
            },
            Section::Text {
                content,
                font_size,
                line_height,
            } => Section::Text {
                content: content.clone(),
                font_size: font_size.max(0.0),
                line_height: line_height.max(0.0),
            },
            Section::Image { aspect_ratio } => Section::Image {
                aspect_ratio: aspect_ratio.max(0.0),
            },
            Section::Responsive {
                breakpoint,
                narrow,
                wide,
            } => {
                if width < *breakpoint {
                    narrow.for_width(width)
                } else {
                    wide.for_width(width)
                }
            }
            Section::Column { children } => Section::Column {
                children: children.iter().map(|c| c.for_width(width)).collect(),
            },
        }
    }

    /// Name of the first non-finite number in this section, if any.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        match self {
            Section::Fixed { height } => (!height.is_finite()).then_some("height"),
            Section::Text {
                font_size,
                line_height,
                ..
            } => {
                if !font_size.is_finite() {
                    Some("fontSize")
                } else if !line_height.is_finite() {
                    Some("lineHeight")
                } else {
                    None
                }
            }
            Section::Image { aspect_ratio } => (!aspect_ratio.is_finite()).then_some("aspectRatio"),
            Section::Responsive {
                breakpoint,
                narrow,
                wide,
            } => {
                if !breakpoint.is_finite() {
                    Some("breakpoint")
                } else {
                    narrow.non_finite_field().or_else(|| wide.non_finite_field())
                }
            }
            Section::Column { children } => children.iter().find_map(Section::non_finite_field),
        }
    }
}

/// What kind of modal hosts the sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalKind {
    #[default]
    BottomSheet,
    Dialog,
    SideSheet,
}

/// Modal-type configuration supplied by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalType {
    #[serde(default)]
    pub kind: ModalKind,
    /// Always stretch page content to the full available height.
    #[serde(default)]
    pub force_max_height: bool,
}

impl ModalType {
    pub fn bottom_sheet() -> Self {
        Self::default()
    }

    pub fn dialog() -> Self {
        Self {
            kind: ModalKind::Dialog,
            force_max_height: false,
        }
    }

    pub fn side_sheet() -> Self {
        Self {
            kind: ModalKind::SideSheet,
            force_max_height: true,
        }
    }
}

/// How the hero image animates as the content scrolls. Passed through
/// to the hero image untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrollAnimationStyle {
    /// Scale the hero image reaches when scrolled out.
    pub hero_image_scale_end: f64,
    /// Opacity the hero image reaches when scrolled out.
    pub hero_image_opacity_end: f64,
}

impl Default for ScrollAnimationStyle {
    fn default() -> Self {
        Self {
            hero_image_scale_end: 1.1,
            hero_image_opacity_end: 0.0,
        }
    }
}

/// Identifies the rendered title block so the host can find its frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TitleKey(pub String);

impl TitleKey {
    pub fn new(name: &str) -> Self {
        TitleKey(name.to_string())
    }
}
