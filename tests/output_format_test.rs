//! Shape of the JSON and SARIF reports produced for the testdata fixtures.

#![cfg(feature = "tree-sitter")]

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use serde_json::Value;
use sweepcheck::analysis;
use sweepcheck::checks::{builtin, CheckRegistry};
use sweepcheck::config::Config;
use sweepcheck::pipeline::{discover_files, AnalysisPipeline, AnalysisReport, MemorySink, RunSummary};
use sweepcheck::report;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

/// Analyze the fixtures with their own configuration.
fn analyze_testdata() -> (RunSummary, AnalysisReport) {
    let testdata = testdata_path();
    let config = Config::parse_file(testdata.join("sweepcheck.yaml")).expect("should parse config");
    config.validate().expect("config should be valid");

    let files = discover_files(&testdata, &config.file_suffixes).expect("should list testdata");
    assert_eq!(files.len(), 2);

    let registry = CheckRegistry::create(config.active_rules(builtin::default_profile()).unwrap())
        .add_checks(builtin::REPOSITORY_KEY, &builtin::check_types())
        .unwrap();
    let parser = analysis::parser_for_language("rust").expect("rust grammar");
    let pipeline = AnalysisPipeline::new(registry, parser, config.product().unwrap(), config.settings())
        .unwrap()
        .with_filter(config.exclusion_filter().unwrap());

    let mut sink = MemorySink::new();
    let summary = pipeline.run(&files, &mut sink).expect("run should succeed");
    (summary, sink.into_report().finish())
}

fn rules(issues: &[Value]) -> Vec<&str> {
    issues.iter().filter_map(|i| i["rule"].as_str()).collect()
}

#[test]
fn test_json_report_structure() {
    let (summary, report) = analyze_testdata();
    let json = serde_json::to_value(report::json_report("testdata", &summary, &report)).unwrap();

    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["files_analyzed"], 1);
    assert_eq!(json["files_failed"], 1);
    assert_eq!(json["cancelled"], false);

    let errors = json["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["file"], "broken.rs");
    assert_eq!(errors[0]["line"], 2);

    let issues = json["issues"].as_array().unwrap();
    assert_eq!(
        rules(issues),
        vec![
            "sweepcheck:ParsingError",
            "sweepcheck:HollowTodo",
            "sweepcheck:FunctionComplexity",
            "sweepcheck:UnreachableCode",
        ]
    );

    let todo = &issues[1];
    assert_eq!(todo["file"], "sample.rs");
    assert_eq!(todo["type"], "line");
    assert_eq!(todo["line"], 4);
    assert_eq!(todo["message"], "TODO marker without context");

    let complexity = &issues[2];
    assert_eq!(complexity["type"], "precise");
    assert_eq!(complexity["primary"]["start_line"], 12);
    assert_eq!(complexity["cost"], 1.0);
    assert_eq!(complexity["secondary"].as_array().unwrap().len(), 2);

    // Full product: aggregated metrics are present
    assert_eq!(json["metrics"]["functions"], 2);
}

#[test]
fn test_sarif_report_structure() {
    let (_, report) = analyze_testdata();
    let sarif = serde_json::to_value(report::sarif_report(&report)).unwrap();

    assert_eq!(sarif["version"], "2.1.0");
    let run = &sarif["runs"][0];
    assert_eq!(run["tool"]["driver"]["name"], "sweepcheck");
    assert_eq!(run["tool"]["driver"]["rules"].as_array().unwrap().len(), 4);

    let results = run["results"].as_array().unwrap();
    assert_eq!(results.len(), report.issues.len());

    let parse = results
        .iter()
        .find(|r| r["ruleId"] == "sweepcheck:ParsingError")
        .unwrap();
    assert_eq!(parse["level"], "error");
    assert_eq!(parse["locations"][0]["physicalLocation"]["region"]["startLine"], 2);

    let unreachable = results
        .iter()
        .find(|r| r["ruleId"] == "sweepcheck:UnreachableCode")
        .unwrap();
    assert_eq!(unreachable["level"], "warning");
    let region = &unreachable["locations"][0]["physicalLocation"]["region"];
    assert_eq!(region["startLine"], 16);
    assert_eq!(region["startColumn"], 13);
    assert_eq!(unreachable["relatedLocations"][0]["message"]["text"], "Exits here");

    let complexity = results
        .iter()
        .find(|r| r["ruleId"] == "sweepcheck:FunctionComplexity")
        .unwrap();
    assert_eq!(complexity["properties"]["gap"], 1.0);

    let notifications = run["invocations"][0]["toolExecutionNotifications"]
        .as_array()
        .unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(
        notifications[0]["locations"][0]["physicalLocation"]["artifactLocation"]["uri"],
        "broken.rs"
    );
}
