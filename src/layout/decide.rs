//! # Fixed vs Scroll Decision
//!
//! Given the measured natural height and the height the host offers, pick
//! how the content renders. This is a pure function; the controller owns
//! the state that feeds it.

use serde::Serialize;

/// How the content area renders for one build.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum Decision {
    /// No measurement yet; only the off-display probe exists.
    Measuring,
    /// Natural height, no scroll container. `filler_height` stretches the
    /// block to the available height when forced.
    #[serde(rename_all = "camelCase")]
    FixedBlock {
        content_height: f64,
        filler_height: f64,
    },
    /// Scroll container of `height = min(measured, available)`.
    CappedScroll { height: f64 },
}

/// Decide the rendering mode.
///
/// The fixed block is only available to scrolling-capable pages whose
/// measured height is strictly below the available height. Everything else
/// scrolls. A non-finite available height never produces a filler.
pub fn decide(
    measured: Option<f64>,
    available: f64,
    scrolling_capable: bool,
    force_max_height: bool,
) -> Decision {
    let Some(measured) = measured else {
        return Decision::Measuring;
    };
    // NaN and negatives collapse to zero.
    let available = available.max(0.0);

    if measured < available && scrolling_capable {
        let filler_height = if force_max_height && available.is_finite() {
            available - measured
        } else {
            0.0
        };
        return Decision::FixedBlock {
            content_height: measured,
            filler_height,
        };
    }

    Decision::CappedScroll {
        height: measured.min(available),
    }
}
