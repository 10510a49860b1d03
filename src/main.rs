/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![deny(warnings)]
#![warn(clippy::all)]
#![warn(missing_docs)]

//! Provides the 'osm-addr-check' cmdline tool.

use anyhow::Context as _;
use osm_addr_check::addresses;
use osm_addr_check::context;
use osm_addr_check::dataset;
use osm_addr_check::overpass;
use std::io::Write;

/// Formats one primitive the way the OSM ecosystem names them.
fn describe(dataset: &dataset::Dataset, p: dataset::PrimitiveId) -> String {
    let kind = if dataset.is_node(p) {
        "node"
    } else if dataset.is_way(p) {
        "way"
    } else {
        "relation"
    };
    format!("{} {}", kind, dataset.osm_id(p))
}

/// Inner main() that is allowed to fail.
fn our_main(argv: &[String], stream: &mut dyn Write) -> anyhow::Result<()> {
    let file = clap::Arg::new("file")
        .required(true)
        .help("overpass JSON export to check");
    let max_street_distance = clap::Arg::new("max-street-distance")
        .long("max-street-distance")
        .value_parser(clap::value_parser!(f64))
        .help("maximum house-to-street distance, in meters (default: 200)");
    let args = [file, max_street_distance];
    let app = clap::Command::new("osm-addr-check")
        .override_usage("osm-addr-check [--max-street-distance 200] city.json");
    let args = app.args(&args).try_get_matches_from(argv)?;
    let file = args.get_one::<String>("file").context("missing file")?;

    let mut ctx = context::Context::new();
    if let Some(meters) = args.get_one::<f64>("max-street-distance") {
        ctx.set_max_street_distance(*meters);
    }

    let json = std::fs::read_to_string(file).with_context(|| format!("failed to read {file}"))?;
    let dataset = overpass::parse(&json)?;
    let mut findings: Vec<addresses::Finding> = Vec::new();
    addresses::AddressChecker::new(&ctx, &dataset).run(&mut findings);

    for finding in &findings {
        let severity = match finding.severity {
            addresses::Severity::Warning => "warning",
            addresses::Severity::Info => "info",
        };
        let involved: Vec<String> = finding
            .primitives
            .iter()
            .map(|p| describe(&dataset, *p))
            .collect();
        stream.write_all(
            format!(
                "{} {}: {} [{}]\n",
                severity,
                finding.code,
                finding.message,
                involved.join(", ")
            )
            .as_bytes(),
        )?;
    }
    stream.write_all(format!("{} finding(s).\n", findings.len()).as_bytes())?;
    Ok(())
}

/// Similar to plain main(), but with an interface that allows testing.
fn app_main(args: &[String], stream: &mut dyn Write) -> i32 {
    match our_main(args, stream) {
        Ok(_) => 0,
        Err(err) => {
            stream.write_all(format!("{:?}\n", err).as_bytes()).unwrap();
            1
        }
    }
}

fn main() {
    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )
    .expect("failed to init the logger");

    let args: Vec<String> = std::env::args().collect();
    std::process::exit(app_main(&args, &mut std::io::stdout()))
}
