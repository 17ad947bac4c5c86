use std::{fmt::Write as _, fs, path::PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use fertisim_simulation::SimulationResults;

use crate::charts::{all_figures, ChartStyle, Figure};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-latest.min.js";

const CSS: &str = r#"
body { font-family: Arial, sans-serif; margin: 0; padding: 20px; line-height: 1.6; background-color: #f4f6f7; }
.header { background-color: #2c3e50; color: white; padding: 20px; margin-bottom: 20px; border-radius: 5px; }
.section { margin-bottom: 40px; padding: 20px; background-color: #fff; border-radius: 5px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
.plot { margin: 20px 0; border: 1px solid #eee; border-radius: 5px; padding: 15px; }
.metric-card { border-left: 4px solid #3498db; background-color: #f8f9fa; border-radius: 4px; padding: 15px; margin: 10px 0; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
.metric-card h3 { margin-top: 0; color: #2c3e50; }
.metric-card p { font-size: 1.4em; margin-bottom: 0; }
.metrics-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(250px, 1fr)); gap: 15px; margin: 20px 0; }
h1, h2 { color: #2c3e50; }
h2 { border-bottom: 2px solid #eee; padding-bottom: 10px; margin-top: 30px; }
"#;

/// Assembles one self-contained HTML report from a result set.
pub struct ReportGenerator<'a> {
    results: &'a SimulationResults,
    output_dir: PathBuf,
    style: ChartStyle,
}

impl<'a> ReportGenerator<'a> {
    /// Creates a generator writing into `output_dir`.
    pub fn new(results: &'a SimulationResults, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            results,
            output_dir: output_dir.into(),
            style: ChartStyle::default(),
        }
    }

    /// Overrides the chart style.
    #[must_use]
    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    /// Renders and writes `simulation_report_<YYYYMMDD_HHMMSS>.html`.
    ///
    /// Timestamped filenames keep concurrent invocations from colliding.
    pub fn generate(&self) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("creating report directory {}", self.output_dir.display())
        })?;
        let figures = all_figures(self.results, &self.style);
        let html = self.render(&figures);
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = self
            .output_dir
            .join(format!("simulation_report_{stamp}.html"));
        fs::write(&path, html)
            .with_context(|| format!("writing report to {}", path.display()))?;
        Ok(path)
    }

    fn render(&self, figures: &[Figure]) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html>\n<head>\n<title>Fertilizer Industry Simulation Report</title>\n\
             <script src=\"{PLOTLY_CDN}\"></script>\n<style>{CSS}</style>\n</head>\n<body>\n"
        );
        let _ = write!(
            html,
            "<div class=\"header\">\n<h1>Fertilizer Industry Simulation Report</h1>\n\
             <p>Generated on {}</p>\n</div>\n",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );

        html.push_str("<div class=\"section\">\n<h2>Summary Metrics</h2>\n<div class=\"metrics-grid\">\n");
        if self.results.summary_metrics.is_empty() {
            html.push_str("<p>No summary metrics available</p>\n");
        } else {
            for (name, value) in &self.results.summary_metrics {
                let _ = write!(
                    html,
                    "<div class=\"metric-card\"><h3>{}</h3><p>{value:.1}</p></div>\n",
                    escape(&titleize(name))
                );
            }
        }
        html.push_str("</div>\n</div>\n");

        if figures.is_empty() {
            html.push_str("<div class=\"section\"><p>No visualizations available</p></div>\n");
        }
        for (idx, figure) in figures.iter().enumerate() {
            let _ = write!(
                html,
                "<div class=\"section\">\n<h2>{}</h2>\n<div id=\"plot-{idx}\" class=\"plot\"></div>\n</div>\n",
                escape(&titleize(&figure.name))
            );
        }

        html.push_str("<script>\n");
        for (idx, figure) in figures.iter().enumerate() {
            let _ = writeln!(
                html,
                "Plotly.newPlot(\"plot-{idx}\", {}, {});",
                figure.data, figure.layout
            );
        }
        html.push_str("</script>\n</body>\n</html>\n");
        html
    }
}

fn titleize(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
