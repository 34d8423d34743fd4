//! # sheetfit CLI
//!
//! Usage:
//!   sheetfit scenario.json
//!   echo '{ ... }' | sheetfit
//!   sheetfit --example > scenario.json
//!
//! Prints the settled layout as JSON. Set `RUST_LOG=sheetfit=debug` to
//! watch the measure/decide phases.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sheetfit=info")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_scenario_json());
        return;
    }

    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1]).map_err(|e| format!("Failed to read {}: {e}", args[1]))
    } else {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map(|_| buf)
            .map_err(|e| format!("Failed to read stdin: {e}"))
    };
    let input = match input {
        Ok(input) => input,
        Err(msg) => {
            eprintln!("✗ {msg}");
            process::exit(1);
        }
    };

    match sheetfit::decide_json(&input) {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("✗ Failed to serialize report: {e}");
                process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("✗ {e}");
            process::exit(1);
        }
    }
}

fn example_scenario_json() -> &'static str {
    r##"{
  "width": 390,
  "availableHeight": 600,
  "modalType": { "kind": "BottomSheet", "forceMaxHeight": false },
  "theme": { "navigationBarHeight": 64 },
  "titleKey": "page-title",
  "page": {
    "type": "Scrolling",
    "heroImage": { "source": "onboarding.png" },
    "heroImageHeight": 200,
    "title": { "type": "Text", "content": "Welcome aboard", "fontSize": 24 },
    "body": [
      {
        "type": "Text",
        "content": "Order from restaurants and stores near you, tracked all the way to your door.",
        "fontSize": 16
      },
      {
        "type": "Responsive",
        "breakpoint": 600,
        "narrow": { "type": "Image", "aspectRatio": 1.5 },
        "wide": { "type": "Fixed", "height": 120 }
      }
    ],
    "forceMaxHeight": false
  }
}
"##
}
