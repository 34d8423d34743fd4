//! Integration tests for the measure-then-decide pipeline.
//!
//! These drive a `SheetHost` through whole frames, the way a host would.
//! They verify:
//! - Nothing is visible while the content is being measured
//! - Short scrolling pages render as fixed blocks, everything else scrolls
//! - Forced maximum height fills exactly the available height
//! - Measurements survive rebuilds and available-height changes
//! - Measurements are thrown away when the content changes shape

use sheetfit::host::SheetHost;
use sheetfit::layout::*;
use sheetfit::model::*;
use sheetfit::style::*;

// ─── Helpers ────────────────────────────────────────────────────

/// A scrolling page with no hero, no title and no top bar, so its
/// measured height is exactly the sum of its body.
fn bare_page(body: Vec<Section>) -> Page {
    Page::Scrolling(ScrollingPage {
        body,
        top_bar: TopBarOverrides {
            has_top_bar_layer: Some(false),
            ..Default::default()
        },
        ..Default::default()
    })
}

fn forced(page: Page) -> Page {
    match page {
        Page::Scrolling(mut p) => {
            p.force_max_height = true;
            Page::Scrolling(p)
        }
        Page::NonScrolling(mut p) => {
            p.force_max_height = true;
            Page::NonScrolling(p)
        }
    }
}

fn non_scrolling_page(body: Section) -> Page {
    Page::NonScrolling(NonScrollingPage {
        body,
        force_max_height: false,
        top_bar: TopBarOverrides {
            has_top_bar_layer: Some(false),
            ..Default::default()
        },
    })
}

fn settle(page: &Page, width: f64, available_height: f64) -> (SheetHost, SheetContent) {
    let (theme, defaults) = (SheetTheme::default(), DefaultTheme::default());
    let ctx = BuildContext::new(page, &theme, &defaults, width, available_height);
    let mut host = SheetHost::new();
    let content = host.pump(&ctx);
    (host, content)
}

fn wrapping_text() -> Section {
    // 5pt advance per char: two lines at width 50, one line at width 1000.
    Section::Text {
        content: "aaaa bbbb cccc dddd".to_string(),
        font_size: 10.0,
        line_height: 1.0,
    }
}

// ─── Measuring Phase ────────────────────────────────────────────

#[test]
fn test_first_frame_is_an_invisible_probe() {
    let page = bare_page(vec![Section::fixed(100.0)]);
    let (theme, defaults) = (SheetTheme::default(), DefaultTheme::default());
    let ctx = BuildContext::new(&page, &theme, &defaults, 320.0, 400.0);

    let mut host = SheetHost::new();
    let content = host.frame(&ctx);

    assert!(content.is_measuring());
    assert_eq!(content.decision(), Decision::Measuring);
    assert_eq!(content.probe_count(), 1);
    assert!(content.visible_sections().is_empty());
    assert_eq!(content.height(), 0.0);
    assert_eq!(content.hit_test(10.0), None);
    match content {
        SheetContent::Measuring(probe) => assert_eq!(probe.size, Size::new(320.0, 100.0)),
        other => panic!("expected a probe, got {other:?}"),
    }
}

#[test]
fn test_probe_title_is_not_discoverable() {
    let page = Page::Scrolling(ScrollingPage {
        title: Some(Section::fixed(30.0)),
        ..Default::default()
    });
    let key = TitleKey::new("title");
    let (theme, defaults) = (SheetTheme::default(), DefaultTheme::default());
    let ctx = BuildContext::new(&page, &theme, &defaults, 320.0, 400.0).with_title_key(&key);

    let mut host = SheetHost::new();
    let content = host.frame(&ctx);
    assert!(content.title_frame(&key).is_none());
}

// ─── Scenarios ──────────────────────────────────────────────────

#[test]
fn test_scenario_short_page_renders_fixed_block() {
    let page = bare_page(vec![Section::fixed(100.0)]);
    let (host, content) = settle(&page, 320.0, 400.0);

    assert_eq!(host.controller().measured_height(), Some(100.0));
    assert_eq!(
        content.decision(),
        Decision::FixedBlock {
            content_height: 100.0,
            filler_height: 0.0
        }
    );
    assert_eq!(content.height(), 100.0);
    assert!(content
        .visible_sections()
        .iter()
        .all(|s| s.role != SectionRole::Filler));
}

#[test]
fn test_scenario_forced_max_height_fills_available() {
    let page = forced(bare_page(vec![Section::fixed(100.0)]));
    let (_, content) = settle(&page, 320.0, 400.0);

    let SheetContent::Fixed(block) = &content else {
        panic!("expected a fixed block, got {content:?}");
    };
    assert_eq!(block.content_height, 100.0);
    assert_eq!(block.filler_height, 300.0);
    assert_eq!(block.total_height(), 400.0);

    let filler = block.sections.last().unwrap();
    assert_eq!(filler.role, SectionRole::Filler);
    assert_eq!(filler.frame, Frame { y: 100.0, height: 300.0 });
    let summed: f64 = block.sections.iter().map(|s| s.frame.height).sum();
    assert_eq!(summed, 400.0);
}

#[test]
fn test_scenario_tall_content_scrolls_at_available_height() {
    let page = bare_page(vec![Section::fixed(500.0)]);
    let (_, content) = settle(&page, 320.0, 400.0);

    let SheetContent::Scrollable(region) = &content else {
        panic!("expected a scroll region, got {content:?}");
    };
    assert_eq!(region.height, 400.0);
    assert_eq!(region.content_height, 500.0);
    assert_eq!(region.max_scroll_extent(), 100.0);
    assert_eq!(region.physics, ScrollPhysics::Clamping);
}

#[test]
fn test_scenario_non_scrolling_page_never_fixed() {
    let page = non_scrolling_page(Section::fixed(50.0));
    let (_, content) = settle(&page, 320.0, 400.0);

    assert_eq!(content.decision(), Decision::CappedScroll { height: 50.0 });
}

#[test]
fn test_non_scrolling_page_ignores_forced_height() {
    let page = forced(non_scrolling_page(Section::fixed(50.0)));
    let (_, content) = settle(&page, 320.0, 400.0);

    assert_eq!(content.decision(), Decision::CappedScroll { height: 50.0 });
    assert_eq!(content.height(), 50.0);
}

#[test]
fn test_modal_type_forces_filler() {
    let page = bare_page(vec![Section::fixed(100.0)]);
    let (theme, defaults) = (SheetTheme::default(), DefaultTheme::default());
    let ctx = BuildContext::new(&page, &theme, &defaults, 320.0, 400.0)
        .with_modal_type(ModalType::side_sheet());

    let mut host = SheetHost::new();
    let content = host.pump(&ctx);
    assert_eq!(content.height(), 400.0);
}

#[test]
fn test_zero_available_height_scrolls_at_zero() {
    let page = bare_page(vec![Section::fixed(100.0)]);
    let (_, content) = settle(&page, 320.0, 0.0);
    assert_eq!(content.decision(), Decision::CappedScroll { height: 0.0 });
}

#[test]
fn test_empty_page_settles() {
    let page = bare_page(vec![]);
    let (host, content) = settle(&page, 320.0, 400.0);
    assert_eq!(host.controller().measured_height(), Some(0.0));
    assert_eq!(
        content.decision(),
        Decision::FixedBlock {
            content_height: 0.0,
            filler_height: 0.0
        }
    );
}

// ─── Composition ────────────────────────────────────────────────

#[test]
fn test_default_top_bar_reserves_spacer() {
    let page = Page::Scrolling(ScrollingPage {
        body: vec![Section::fixed(100.0)],
        ..Default::default()
    });
    let (host, content) = settle(&page, 320.0, 400.0);

    assert_eq!(host.controller().measured_height(), Some(172.0));
    let leading = &content.visible_sections()[0];
    assert_eq!(leading.role, SectionRole::Leading);
    assert_eq!(leading.frame.height, 72.0);
}

#[test]
fn test_hero_image_uses_theme_height() {
    let page = Page::Scrolling(ScrollingPage {
        hero_image: Some(HeroImage {
            source: "hero.png".to_string(),
        }),
        title: Some(Section::fixed(40.0)),
        ..Default::default()
    });
    let theme = SheetTheme {
        hero_image_height: Some(220.0),
        ..Default::default()
    };
    let defaults = DefaultTheme::default();
    let ctx = BuildContext::new(&page, &theme, &defaults, 320.0, 1000.0);

    let mut host = SheetHost::new();
    host.pump(&ctx);
    assert_eq!(host.controller().measured_height(), Some(260.0));
}

#[test]
fn test_measured_height_matches_visible_layout() {
    let page = Page::Scrolling(ScrollingPage {
        title: Some(Section::text("A fairly long title that wraps", 20.0)),
        body: vec![wrapping_text(), Section::Image { aspect_ratio: 2.0 }],
        ..Default::default()
    });
    for available in [50.0, 5000.0] {
        let (host, content) = settle(&page, 120.0, available);
        let measured = host.controller().measured_height().unwrap();
        let laid_out = match &content {
            SheetContent::Fixed(block) => block.content_height,
            SheetContent::Scrollable(region) => region.content_height,
            SheetContent::Measuring(_) => panic!("did not settle"),
        };
        assert_eq!(measured, laid_out);
    }
}

// ─── Stability ──────────────────────────────────────────────────

#[test]
fn test_identical_rebuild_does_not_remeasure() {
    let page = bare_page(vec![Section::fixed(100.0)]);
    let (theme, defaults) = (SheetTheme::default(), DefaultTheme::default());
    let ctx = BuildContext::new(&page, &theme, &defaults, 320.0, 400.0);

    let mut host = SheetHost::new();
    let settled = host.pump(&ctx);
    let frames = host.frames();

    let rebuilt = host.frame(&ctx);
    assert!(!rebuilt.is_measuring());
    assert_eq!(rebuilt, settled);
    assert!(!host.controller().needs_build());

    let pumped = host.pump(&ctx);
    assert_eq!(pumped, settled);
    assert_eq!(host.frames(), frames + 2);
}

#[test]
fn test_nan_hero_height_settles_and_stays_settled() {
    let page = Page::Scrolling(ScrollingPage {
        hero_image: Some(HeroImage {
            source: "hero.png".to_string(),
        }),
        hero_image_height: Some(f64::NAN),
        ..Default::default()
    });
    let (theme, defaults) = (SheetTheme::default(), DefaultTheme::default());
    let ctx = BuildContext::new(&page, &theme, &defaults, 320.0, 400.0);

    let mut host = SheetHost::new();
    let settled = host.pump(&ctx);
    assert!(!settled.is_measuring());
    assert!(!host.controller().needs_build());
    assert_eq!(host.frames(), 2);
    assert_eq!(host.controller().measured_height(), Some(0.0));

    let rebuilt = host.frame(&ctx);
    assert!(!rebuilt.is_measuring());
    assert_eq!(rebuilt, settled);
}

#[test]
fn test_nan_theme_and_section_numbers_settle() {
    let page = Page::Scrolling(ScrollingPage {
        title: Some(Section::Text {
            content: "Title".to_string(),
            font_size: f64::NAN,
            line_height: 1.2,
        }),
        body: vec![
            Section::fixed(f64::NAN),
            Section::Image {
                aspect_ratio: f64::NAN,
            },
            Section::Responsive {
                breakpoint: f64::NAN,
                narrow: Box::new(Section::fixed(10.0)),
                wide: Box::new(Section::fixed(20.0)),
            },
        ],
        ..Default::default()
    });
    let theme = SheetTheme {
        navigation_bar_height: Some(f64::NAN),
        ..Default::default()
    };
    let defaults = DefaultTheme {
        hero_image_height: f64::NAN,
        ..Default::default()
    };
    let ctx = BuildContext::new(&page, &theme, &defaults, f64::NAN, 400.0);

    let mut host = SheetHost::new();
    let settled = host.pump(&ctx);
    assert!(!settled.is_measuring());
    assert_eq!(host.controller().measured_height(), Some(20.0));
    assert!(!host.frame(&ctx).is_measuring());
}

#[test]
fn test_hero_source_change_keeps_measurement() {
    let with_source = |source: &str| {
        Page::Scrolling(ScrollingPage {
            hero_image: Some(HeroImage {
                source: source.to_string(),
            }),
            body: vec![Section::fixed(50.0)],
            ..Default::default()
        })
    };
    let (theme, defaults) = (SheetTheme::default(), DefaultTheme::default());
    let mut host = SheetHost::new();

    let beach = with_source("beach.png");
    host.pump(&BuildContext::new(&beach, &theme, &defaults, 320.0, 800.0));
    assert_eq!(host.controller().measured_height(), Some(322.0));

    let forest = with_source("forest.png");
    let content = host.frame(&BuildContext::new(&forest, &theme, &defaults, 320.0, 800.0));
    assert!(!content.is_measuring());
    assert_eq!(content.height(), 322.0);
}

#[test]
fn test_available_height_change_reuses_measurement() {
    let page = bare_page(vec![Section::fixed(300.0)]);
    let (theme, defaults) = (SheetTheme::default(), DefaultTheme::default());
    let mut host = SheetHost::new();

    let tall = BuildContext::new(&page, &theme, &defaults, 320.0, 800.0);
    let content = host.pump(&tall);
    assert!(matches!(content, SheetContent::Fixed(_)));

    let short = BuildContext::new(&page, &theme, &defaults, 320.0, 200.0);
    let content = host.frame(&short);
    assert!(!content.is_measuring(), "height change must not re-measure");
    assert_eq!(content.decision(), Decision::CappedScroll { height: 200.0 });
    assert_eq!(host.controller().measured_height(), Some(300.0));

    let content = host.frame(&tall);
    assert!(matches!(content, SheetContent::Fixed(_)));
}

#[test]
fn test_width_change_remeasures() {
    let page = bare_page(vec![wrapping_text()]);
    let (theme, defaults) = (SheetTheme::default(), DefaultTheme::default());
    let mut host = SheetHost::new();

    let narrow = BuildContext::new(&page, &theme, &defaults, 50.0, 400.0);
    host.pump(&narrow);
    assert_eq!(host.controller().measured_height(), Some(20.0));

    let wide = BuildContext::new(&page, &theme, &defaults, 1000.0, 400.0);
    let first = host.frame(&wide);
    assert!(first.is_measuring(), "stale measurement must not be reused");

    let settled = host.pump(&wide);
    assert!(!settled.is_measuring());
    assert_eq!(host.controller().measured_height(), Some(10.0));
}

#[test]
fn test_content_change_remeasures() {
    let (theme, defaults) = (SheetTheme::default(), DefaultTheme::default());
    let mut host = SheetHost::new();

    let short = bare_page(vec![Section::fixed(100.0)]);
    host.pump(&BuildContext::new(&short, &theme, &defaults, 320.0, 400.0));
    assert_eq!(host.controller().measured_height(), Some(100.0));

    let long = bare_page(vec![Section::fixed(100.0), Section::fixed(450.0)]);
    let ctx = BuildContext::new(&long, &theme, &defaults, 320.0, 400.0);
    assert!(host.frame(&ctx).is_measuring());
    let content = host.pump(&ctx);
    assert_eq!(host.controller().measured_height(), Some(550.0));
    assert_eq!(content.decision(), Decision::CappedScroll { height: 400.0 });
}

#[test]
fn test_responsive_branch_change_remeasures_but_same_branch_does_not() {
    let page = bare_page(vec![Section::Responsive {
        breakpoint: 600.0,
        narrow: Box::new(Section::fixed(200.0)),
        wide: Box::new(Section::fixed(80.0)),
    }]);
    let (theme, defaults) = (SheetTheme::default(), DefaultTheme::default());
    let mut host = SheetHost::new();

    host.pump(&BuildContext::new(&page, &theme, &defaults, 320.0, 400.0));
    assert_eq!(host.controller().measured_height(), Some(200.0));

    let wide = BuildContext::new(&page, &theme, &defaults, 700.0, 400.0);
    assert!(host.frame(&wide).is_measuring());
    host.pump(&wide);
    assert_eq!(host.controller().measured_height(), Some(80.0));
}

#[test]
fn test_theme_change_remeasures() {
    let page = Page::Scrolling(ScrollingPage {
        body: vec![Section::fixed(100.0)],
        ..Default::default()
    });
    let defaults = DefaultTheme::default();
    let mut host = SheetHost::new();

    let theme = SheetTheme::default();
    host.pump(&BuildContext::new(&page, &theme, &defaults, 320.0, 400.0));
    assert_eq!(host.controller().measured_height(), Some(172.0));

    let compact = SheetTheme {
        navigation_bar_height: Some(56.0),
        ..Default::default()
    };
    let ctx = BuildContext::new(&page, &compact, &defaults, 320.0, 400.0);
    assert!(host.frame(&ctx).is_measuring());
    host.pump(&ctx);
    assert_eq!(host.controller().measured_height(), Some(156.0));
}

// ─── Host Interaction ───────────────────────────────────────────

#[test]
fn test_scroll_controller_is_clamped_and_shifts_hits() {
    let page = Page::Scrolling(ScrollingPage {
        title: Some(Section::fixed(30.0)),
        body: vec![Section::fixed(500.0)],
        top_bar: TopBarOverrides {
            has_top_bar_layer: Some(false),
            ..Default::default()
        },
        ..Default::default()
    });
    let key = TitleKey::new("title");
    let scroll = ScrollController::new();
    let (theme, defaults) = (SheetTheme::default(), DefaultTheme::default());
    let ctx = BuildContext::new(&page, &theme, &defaults, 320.0, 400.0)
        .with_scroll_controller(&scroll)
        .with_title_key(&key);

    let mut host = SheetHost::new();
    let content = host.pump(&ctx);
    assert_eq!(scroll.max_scroll_extent(), 130.0);

    assert_eq!(content.hit_test(10.0), Some(SectionRole::Title));
    assert_eq!(content.title_frame(&key), Some(Frame { y: 0.0, height: 30.0 }));

    scroll.jump_to(1000.0);
    assert_eq!(scroll.offset(), 130.0);
    assert_eq!(content.hit_test(10.0), Some(SectionRole::Body(0)));
    assert_eq!(content.hit_test(400.0), None);
    assert_eq!(
        content.title_frame(&key),
        Some(Frame {
            y: -130.0,
            height: 30.0
        })
    );
    assert!(content.title_frame(&TitleKey::new("other")).is_none());
}

#[test]
fn test_fixed_block_hit_testing() {
    let page = forced(Page::Scrolling(ScrollingPage {
        title: Some(Section::fixed(30.0)),
        body: vec![Section::fixed(100.0)],
        top_bar: TopBarOverrides {
            has_top_bar_layer: Some(false),
            ..Default::default()
        },
        ..Default::default()
    }));
    let (_, content) = settle(&page, 320.0, 400.0);

    assert_eq!(content.hit_test(10.0), Some(SectionRole::Title));
    assert_eq!(content.hit_test(50.0), Some(SectionRole::Body(0)));
    assert_eq!(content.hit_test(200.0), Some(SectionRole::Filler));
    assert_eq!(content.hit_test(400.0), None);
}

#[test]
fn test_theme_scroll_physics_reaches_region() {
    let page = bare_page(vec![Section::fixed(900.0)]);
    let theme = SheetTheme {
        main_content_scroll_physics: Some(ScrollPhysics::Bouncing),
        ..Default::default()
    };
    let defaults = DefaultTheme::default();
    let mut host = SheetHost::new();
    let content = host.pump(&BuildContext::new(&page, &theme, &defaults, 320.0, 400.0));

    let SheetContent::Scrollable(region) = content else {
        panic!("expected a scroll region");
    };
    assert_eq!(region.physics, ScrollPhysics::Bouncing);
}

// ─── JSON Entry ─────────────────────────────────────────────────

#[test]
fn test_decide_json_reports_fixed_block() {
    let json = r#"{
        "width": 320,
        "availableHeight": 400,
        "page": {
            "type": "Scrolling",
            "hasTopBarLayer": false,
            "forceMaxHeight": true,
            "body": [{ "type": "Fixed", "height": 100 }]
        }
    }"#;
    let report = sheetfit::decide_json(json).unwrap();
    assert_eq!(
        report.decision,
        Decision::FixedBlock {
            content_height: 100.0,
            filler_height: 300.0
        }
    );
    assert_eq!(report.height, 400.0);
    assert_eq!(report.measured_height, Some(100.0));
    assert_eq!(report.frames, 2);

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["decision"]["mode"], "fixedBlock");
    assert_eq!(value["decision"]["fillerHeight"], 300.0);
}

#[test]
fn test_decide_json_non_scrolling_page() {
    let json = r#"{
        "width": 320,
        "availableHeight": 400,
        "page": {
            "type": "NonScrolling",
            "hasTopBarLayer": false,
            "body": { "type": "Fixed", "height": 50 }
        }
    }"#;
    let report = sheetfit::decide_json(json).unwrap();
    assert_eq!(report.decision, Decision::CappedScroll { height: 50.0 });
    assert_eq!(report.scroll_physics, Some(ScrollPhysics::Clamping));
}

#[test]
fn test_decide_json_rejects_bad_input() {
    let err = sheetfit::decide_json("{ \"width\": 320, }").unwrap_err();
    assert!(err.to_string().contains("Hint"));

    let json = r#"{
        "width": -1,
        "availableHeight": 400,
        "page": { "type": "Scrolling" }
    }"#;
    let err = sheetfit::decide_json(json).unwrap_err();
    assert!(matches!(err, sheetfit::error::SheetError::InvalidScenario(_)));
}

#[test]
fn test_decide_scenario_rejects_non_finite_overrides() {
    let scenario = |page: Page, theme: SheetTheme| sheetfit::Scenario {
        page,
        theme,
        defaults: DefaultTheme::default(),
        modal_type: ModalType::default(),
        width: 320.0,
        available_height: 400.0,
        scroll_animation: ScrollAnimationStyle::default(),
        title_key: None,
    };

    let nan_hero = Page::Scrolling(ScrollingPage {
        hero_image_height: Some(f64::NAN),
        ..Default::default()
    });
    let err = sheetfit::decide_scenario(&scenario(nan_hero, SheetTheme::default())).unwrap_err();
    assert!(err.to_string().contains("heroImageHeight"));

    let nan_nav = SheetTheme {
        navigation_bar_height: Some(f64::INFINITY),
        ..Default::default()
    };
    let err = sheetfit::decide_scenario(&scenario(bare_page(vec![]), nan_nav)).unwrap_err();
    assert!(err.to_string().contains("navigationBarHeight"));

    let nan_body = bare_page(vec![Section::fixed(f64::NAN)]);
    let err = sheetfit::decide_scenario(&scenario(nan_body, SheetTheme::default())).unwrap_err();
    assert!(err.to_string().contains("body[0].height"));
}
