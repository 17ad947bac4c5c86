use std::{fs, path::Path};

use anyhow::{Context, Result};
use indexmap::IndexMap;

use crate::engine::AnalysisReport;

/// Writes the analysis as a tree of CSV files under `output_dir`.
///
/// Layout: `performance_metrics.csv` at the top, then one subdirectory per
/// present category holding `metrics.csv` plus that category's detail file
/// (`adoption_rates.csv`, `technology_improvements.csv`, or
/// `priority_changes.csv`).
pub fn save_analysis(analysis: &AnalysisReport, output_dir: impl AsRef<Path>) -> Result<()> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating analysis directory {}", output_dir.display()))?;

    let metrics = analysis.performance_metrics;
    write_csv(
        &output_dir.join("performance_metrics.csv"),
        &[
            "sustainability_score",
            "technology_advancement",
            "client_satisfaction",
            "overall_score",
        ],
        &[vec![
            metrics.sustainability_score.to_string(),
            metrics.technology_advancement.to_string(),
            metrics.client_satisfaction.to_string(),
            metrics.overall_score.to_string(),
        ]],
    )?;

    if let Some(section) = &analysis.sustainability {
        let dir = category_dir(output_dir, "sustainability", &section.metrics)?;
        let rows = section
            .adoption_rates
            .iter()
            .map(|rate| {
                vec![
                    rate.fertilizer_type.clone(),
                    rate.average_adoption_rate.to_string(),
                ]
            })
            .collect::<Vec<_>>();
        write_csv(
            &dir.join("adoption_rates.csv"),
            &["fertilizer_type", "average_adoption_rate"],
            &rows,
        )?;
    }

    if let Some(section) = &analysis.production_tech {
        let dir = category_dir(output_dir, "production_tech", &section.metrics)?;
        let rows = section
            .technology_improvements
            .iter()
            .map(|imp| vec![imp.technology.clone(), imp.improvement_percent.to_string()])
            .collect::<Vec<_>>();
        write_csv(
            &dir.join("technology_improvements.csv"),
            &["technology", "improvement_percent"],
            &rows,
        )?;
    }

    if let Some(section) = &analysis.client_needs {
        let dir = category_dir(output_dir, "client_needs", &section.metrics)?;
        let rows = section
            .priority_changes
            .iter()
            .map(|change| {
                vec![
                    change.priority_area.clone(),
                    change.start_value.to_string(),
                    change.end_value.to_string(),
                    change.change.to_string(),
                ]
            })
            .collect::<Vec<_>>();
        write_csv(
            &dir.join("priority_changes.csv"),
            &["priority_area", "start_value", "end_value", "change"],
            &rows,
        )?;
    }

    Ok(())
}

/// Creates the category subdirectory and writes its `metrics.csv`.
fn category_dir(
    output_dir: &Path,
    category: &str,
    metrics: &IndexMap<String, f64>,
) -> Result<std::path::PathBuf> {
    let dir = output_dir.join(category);
    fs::create_dir_all(&dir)
        .with_context(|| format!("creating category directory {}", dir.display()))?;
    let headers: Vec<&str> = metrics.keys().map(String::as_str).collect();
    let row: Vec<String> = metrics.values().map(ToString::to_string).collect();
    write_csv(&dir.join("metrics.csv"), &headers, &[row])?;
    Ok(dir)
}

fn write_csv(path: &Path, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut out = String::new();
    out.push_str(&headers.iter().map(|h| csv_field(h)).collect::<Vec<_>>().join(","));
    out.push('\n');
    for row in rows {
        out.push_str(&row.iter().map(|f| csv_field(f)).collect::<Vec<_>>().join(","));
        out.push('\n');
    }
    fs::write(path, out).with_context(|| format!("writing {}", path.display()))
}

/// Quotes a field when it contains a delimiter, quote, or newline.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{
        AdoptionRate, AnalysisReport, PerformanceMetrics, PriorityChange, SustainabilityAnalysis,
    };
    use indexmap::indexmap;
    use tempfile::tempdir;

    #[test]
    fn csv_field_quotes_delimiters_and_quotes() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn performance_metrics_csv_is_always_written() {
        let dir = tempdir().unwrap();
        save_analysis(&AnalysisReport::default(), dir.path()).unwrap();
        let content = fs::read_to_string(dir.path().join("performance_metrics.csv")).unwrap();
        assert_eq!(
            content,
            "sustainability_score,technology_advancement,client_satisfaction,overall_score\n0,0,0,0\n"
        );
        assert!(!dir.path().join("sustainability").exists());
    }

    #[test]
    fn present_categories_get_their_own_subdirectory() {
        let dir = tempdir().unwrap();
        let report = AnalysisReport {
            sustainability: Some(SustainabilityAnalysis {
                adoption_rates: vec![AdoptionRate {
                    fertilizer_type: "Slow-release, coated".into(),
                    average_adoption_rate: 30.0,
                }],
                metrics: indexmap! { "sustainable_share".to_string() => 0.5 },
            }),
            production_tech: None,
            client_needs: None,
            performance_metrics: PerformanceMetrics::default(),
        };
        save_analysis(&report, dir.path()).unwrap();
        let metrics = fs::read_to_string(dir.path().join("sustainability/metrics.csv")).unwrap();
        assert_eq!(metrics, "sustainable_share\n0.5\n");
        let rates =
            fs::read_to_string(dir.path().join("sustainability/adoption_rates.csv")).unwrap();
        assert_eq!(
            rates,
            "fertilizer_type,average_adoption_rate\n\"Slow-release, coated\",30\n"
        );
    }

    #[test]
    fn client_needs_detail_has_four_columns() {
        let dir = tempdir().unwrap();
        let report = AnalysisReport {
            client_needs: Some(crate::engine::ClientNeedsAnalysis {
                priority_changes: vec![PriorityChange {
                    priority_area: "Regulatory compliance".into(),
                    start_value: 5.0,
                    end_value: 8.5,
                    change: 3.5,
                }],
                metrics: IndexMap::new(),
            }),
            ..AnalysisReport::default()
        };
        save_analysis(&report, dir.path()).unwrap();
        let content =
            fs::read_to_string(dir.path().join("client_needs/priority_changes.csv")).unwrap();
        assert_eq!(
            content,
            "priority_area,start_value,end_value,change\nRegulatory compliance,5,8.5,3.5\n"
        );
    }
}
