//! End-to-end pipeline tests: scenario load -> run -> analyze -> persist ->
//! report, all inside a temporary directory tree.

use std::fs;

use fertisim_analysis::{analyze, save_analysis};
use fertisim_report::ReportGenerator;
use fertisim_simulation::{
    list_scenarios, load_scenario, Settings, SimulationResults, SimulationRunner,
};
use tempfile::tempdir;

const ORGANIC_SCENARIO: &str = "\
sustainability:
  fertilizer_adoption_curves:
    - fertilizer_type: Organic
      market_growth:
        min_percentage: 20
        max_percentage: 40
      target_year: 2030
client_needs:
  client_priority_evolution:
    - priority_area: Regulatory compliance
      evolution_trend:
        name: priority weight
        trajectory:
          - [2025, 5.0]
          - [2040, 8.5]
";

fn sandbox_settings(root: &std::path::Path) -> Settings {
    Settings {
        raw_data_dir: root.join("data/raw"),
        processed_data_dir: root.join("data/processed"),
        scenario_dir: root.join("scenarios"),
        results_dir: root.join("reports/results"),
        html_report_dir: root.join("reports/html"),
        log_path: root.join("reports/fertisim.log"),
        ..Settings::default()
    }
}

#[test]
fn full_pipeline_produces_results_analysis_and_report() {
    let dir = tempdir().unwrap();
    let settings = sandbox_settings(dir.path());
    settings.ensure_directories().unwrap();
    fs::write(settings.scenario_dir.join("organic.yaml"), ORGANIC_SCENARIO).unwrap();
    assert_eq!(list_scenarios(&settings), vec!["organic"]);

    let config = load_scenario("organic", &settings).unwrap();
    let runner = SimulationRunner::builder(config)
        .seed(settings.default_seed)
        .fallback_period(settings.default_period().unwrap())
        .build()
        .unwrap();
    let results = runner.run().unwrap();

    // Persisted JSON round-trips bit-exact; serde_json's float_roundtrip
    // feature covers the full-precision sampled metrics.
    let results_path = results.save(&settings.results_dir, "organic").unwrap();
    let reloaded = SimulationResults::load(&results_path).unwrap();
    assert_eq!(reloaded, results);

    // Analysis of the run reflects the one declared adoption record.
    let report = analyze(&results);
    let rates = &report.sustainability.as_ref().unwrap().adoption_rates;
    assert_eq!(rates.len(), 1);
    assert_eq!(rates[0].fertilizer_type, "Organic");
    assert!((rates[0].average_adoption_rate - 30.0).abs() < 1e-9);
    let metrics = report.performance_metrics;
    assert!((0.0..=100.0).contains(&metrics.overall_score));
    assert!((metrics.client_satisfaction - 8.5).abs() < 1e-9);

    // CSV fan-out lands in the expected tree.
    let analysis_dir = settings.results_dir.join("analysis");
    save_analysis(&report, &analysis_dir).unwrap();
    assert!(analysis_dir.join("performance_metrics.csv").is_file());
    assert!(analysis_dir.join("sustainability/adoption_rates.csv").is_file());
    assert!(analysis_dir.join("client_needs/priority_changes.csv").is_file());
    // The runner emits stub metrics for every section, so production_tech is
    // present even though the scenario declares no technologies.
    assert!(analysis_dir.join("production_tech/metrics.csv").is_file());
    let improvements = fs::read_to_string(
        analysis_dir.join("production_tech/technology_improvements.csv"),
    )
    .unwrap();
    assert_eq!(improvements, "technology,improvement_percent\n");

    // HTML report embeds the charts.
    let report_path = ReportGenerator::new(&results, &settings.html_report_dir)
        .generate()
        .unwrap();
    let html = fs::read_to_string(&report_path).unwrap();
    assert!(html.contains("Plotly.newPlot"));
    assert!(html.contains("Fertilizer Industry Simulation Report"));
}

#[test]
fn reruns_with_the_same_seed_are_reproducible() {
    let dir = tempdir().unwrap();
    let settings = sandbox_settings(dir.path());
    settings.ensure_directories().unwrap();
    fs::write(settings.scenario_dir.join("organic.yaml"), ORGANIC_SCENARIO).unwrap();

    let run = || {
        let config = load_scenario("organic", &settings).unwrap();
        SimulationRunner::builder(config)
            .seed(settings.default_seed)
            .build()
            .unwrap()
            .run()
            .unwrap()
    };
    let first = run();
    let second = run();
    assert_eq!(first.summary_metrics, second.summary_metrics);
    assert_eq!(
        first.sustainability.unwrap().metrics,
        second.sustainability.unwrap().metrics
    );
}

#[test]
fn missing_scenario_surfaces_a_not_found_error() {
    let dir = tempdir().unwrap();
    let settings = sandbox_settings(dir.path());
    let err = load_scenario("nope", &settings).unwrap_err();
    assert!(err.to_string().contains("not found"));
}
