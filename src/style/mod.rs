//! # Theme Resolution
//!
//! The numbers the sizing decision depends on: hero image height, top bar
//! presence, navigation bar height, scroll physics. Each one can be set on
//! the page, on the theme, or left to the built-in defaults, and the first
//! source that sets it wins.

use crate::model::Page;
use serde::{Deserialize, Serialize};

/// Scroll behaviour of the capped scroll region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollPhysics {
    /// Stops at the edges.
    #[default]
    Clamping,
    /// Overscrolls and springs back.
    Bouncing,
    /// The region never scrolls from user input.
    NeverScrollable,
}

/// Theme-level overrides. Unset fields fall through to [`DefaultTheme`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetTheme {
    pub hero_image_height: Option<f64>,
    pub has_top_bar_layer: Option<bool>,
    pub is_top_bar_layer_always_visible: Option<bool>,
    pub navigation_bar_height: Option<f64>,
    pub main_content_scroll_physics: Option<ScrollPhysics>,
}

/// Built-in values used when neither the page nor the theme sets one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DefaultTheme {
    pub hero_image_height: f64,
    pub has_top_bar_layer: bool,
    pub is_top_bar_layer_always_visible: bool,
    pub navigation_bar_height: f64,
    pub main_content_scroll_physics: ScrollPhysics,
}

impl Default for DefaultTheme {
    fn default() -> Self {
        Self {
            hero_image_height: 272.0,
            has_top_bar_layer: true,
            is_top_bar_layer_always_visible: false,
            navigation_bar_height: 72.0,
            main_content_scroll_physics: ScrollPhysics::Clamping,
        }
    }
}

/// Pick the first value set, in priority order: page, theme, default.
pub fn resolve<T>(page: Option<T>, theme: Option<T>, default: T) -> T {
    page.or(theme).unwrap_or(default)
}

/// Layout parameters after resolution, fixed for one build.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLayout {
    pub hero_image_height: f64,
    pub has_top_bar_layer: bool,
    pub is_top_bar_layer_always_visible: bool,
    pub navigation_bar_height: f64,
    pub scroll_physics: ScrollPhysics,
    /// Height reserved for the top bar: the navigation bar height when a
    /// top bar layer or a navigation widget is present, otherwise zero.
    pub top_bar_height: f64,
}

impl ResolvedLayout {
    pub fn resolve(page: &Page, theme: &SheetTheme, defaults: &DefaultTheme) -> Self {
        let top_bar = page.top_bar();
        // Heights are clamped to >= 0, which also maps NaN to zero.
        let hero_image_height = resolve(
            page.hero_image_height(),
            theme.hero_image_height,
            defaults.hero_image_height,
        )
        .max(0.0);
        let has_top_bar_layer = resolve(
            top_bar.has_top_bar_layer,
            theme.has_top_bar_layer,
            defaults.has_top_bar_layer,
        );
        let is_top_bar_layer_always_visible = resolve(
            top_bar.is_top_bar_layer_always_visible,
            theme.is_top_bar_layer_always_visible,
            defaults.is_top_bar_layer_always_visible,
        );
        let navigation_bar_height = resolve(
            None,
            theme.navigation_bar_height,
            defaults.navigation_bar_height,
        )
        .max(0.0);
        let scroll_physics = resolve(
            None,
            theme.main_content_scroll_physics,
            defaults.main_content_scroll_physics,
        );

        let has_nav_widget = top_bar.has_leading_widget || top_bar.has_trailing_widget;
        let top_bar_height = if has_top_bar_layer || has_nav_widget {
            navigation_bar_height
        } else {
            0.0
        };

        ResolvedLayout {
            hero_image_height,
            has_top_bar_layer,
            is_top_bar_layer_always_visible,
            navigation_bar_height,
            scroll_physics,
            top_bar_height,
        }
    }

    /// Height of the spacer that stands in for a missing hero image.
    ///
    /// An always-visible top bar already reserves its space through the
    /// sheet's padding, so the spacer collapses to zero.
    pub fn leading_spacer_height(&self) -> f64 {
        if self.is_top_bar_layer_always_visible {
            0.0
        } else {
            self.top_bar_height
        }
    }
}
