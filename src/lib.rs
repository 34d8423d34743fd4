//! # sheetfit
//!
//! Sizing for a modal sheet's main content area.
//!
//! A sheet's content is either short enough to sit at its natural height,
//! or it needs to scroll inside the height the sheet has left. Which one
//! can't be known before the content is laid out, so sheetfit lays it out
//! twice: once off-display to learn its natural height, and once for real
//! with that height in hand.
//!
//! ## Architecture
//!
//! ```text
//! Scenario (JSON/API)
//!       ↓
//!   [model]    — Pages, sections, modal configuration
//!       ↓
//!   [style]    — Page → theme → default resolution
//!       ↓
//!   [layout]   — Compose, measure off-display, decide
//!       ↓
//!   [host]     — Frame loop: build, post-frame callbacks, rebuild
//! ```

pub mod error;
pub mod host;
pub mod layout;
pub mod model;
pub mod style;

use serde::{Deserialize, Serialize};

use error::SheetError;
use host::SheetHost;
use layout::{BuildContext, LayoutReport};
use model::{ModalType, Page, ScrollAnimationStyle, TitleKey};
use style::{DefaultTheme, SheetTheme};

/// A self-contained sizing problem: one page in one viewport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub page: Page,
    #[serde(default)]
    pub theme: SheetTheme,
    #[serde(default)]
    pub defaults: DefaultTheme,
    #[serde(default)]
    pub modal_type: ModalType,
    /// Width the content is laid out at.
    pub width: f64,
    /// Height the sheet offers its content area.
    pub available_height: f64,
    #[serde(default)]
    pub scroll_animation: ScrollAnimationStyle,
    #[serde(default)]
    pub title_key: Option<TitleKey>,
}

impl Scenario {
    /// Reject viewports that can't be laid out. An unbounded available
    /// height is allowed; a NaN or negative one is not.
    pub fn validate(&self) -> Result<(), SheetError> {
        if !self.width.is_finite() || self.width < 0.0 {
            return Err(SheetError::InvalidScenario(format!(
                "width must be a finite, non-negative number (got {})",
                self.width
            )));
        }
        if self.available_height.is_nan() || self.available_height < 0.0 {
            return Err(SheetError::InvalidScenario(format!(
                "availableHeight must be non-negative (got {})",
                self.available_height
            )));
        }

        let overrides = [
            ("page.heroImageHeight", self.page.hero_image_height()),
            ("theme.heroImageHeight", self.theme.hero_image_height),
            ("theme.navigationBarHeight", self.theme.navigation_bar_height),
            ("defaults.heroImageHeight", Some(self.defaults.hero_image_height)),
            ("defaults.navigationBarHeight", Some(self.defaults.navigation_bar_height)),
        ];
        for (name, value) in overrides {
            if let Some(value) = value.filter(|v| !v.is_finite()) {
                return Err(SheetError::InvalidScenario(format!(
                    "{name} must be finite (got {value})"
                )));
            }
        }

        let title = self.page.title().map(|section| ("page.title".to_string(), section));
        let body = self
            .page
            .body()
            .iter()
            .enumerate()
            .map(|(i, section)| (format!("page.body[{i}]"), section));
        for (path, section) in title.into_iter().chain(body) {
            if let Some(field) = section.non_finite_field() {
                return Err(SheetError::InvalidScenario(format!(
                    "{path}.{field} must be finite"
                )));
            }
        }
        Ok(())
    }

    pub fn context(&self) -> BuildContext<'_> {
        let ctx = BuildContext::new(
            &self.page,
            &self.theme,
            &self.defaults,
            self.width,
            self.available_height,
        )
        .with_modal_type(self.modal_type)
        .with_scroll_animation(self.scroll_animation);
        match &self.title_key {
            Some(key) => ctx.with_title_key(key),
            None => ctx,
        }
    }
}

/// Settle a scenario on a fresh host and report the result.
pub fn decide_scenario(scenario: &Scenario) -> Result<LayoutReport, SheetError> {
    scenario.validate()?;
    let mut host = SheetHost::new();
    Ok(host.report(&scenario.context()))
}

/// Settle a scenario described as JSON.
pub fn decide_json(json: &str) -> Result<LayoutReport, SheetError> {
    let scenario: Scenario = serde_json::from_str(json)?;
    decide_scenario(&scenario)
}
