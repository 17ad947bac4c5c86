use fertisim_models::{numeric, SimulationPeriod, Trend};
use fertisim_simulation::{Settings, SimulationResults};
use serde_json::{json, Value};

/// Consistent color scheme across all charts.
const COLORS: [&str; 6] = [
    "#2c3e50", "#3498db", "#2ecc71", "#e74c3c", "#f39c12", "#1abc9c",
];

/// Layout style shared by every figure.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    /// Plotly template name.
    pub template: String,
    /// Figure width in pixels.
    pub width: u32,
    /// Figure height in pixels.
    pub height: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            template: "plotly_white".into(),
            width: 1200,
            height: 600,
        }
    }
}

impl ChartStyle {
    /// Derives the style from process settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            template: settings.plot_theme.clone(),
            width: settings.plot_width,
            height: settings.plot_height,
        }
    }

    fn layout(&self, title: &str) -> Value {
        json!({
            "title": { "text": title, "x": 0.5 },
            "template": self.template,
            "width": self.width,
            "height": self.height,
        })
    }
}

/// Named Plotly figure: a list of traces plus a layout.
#[derive(Debug, Clone)]
pub struct Figure {
    /// Stable identifier, used for div ids and section headings.
    pub name: String,
    /// Trace array.
    pub data: Value,
    /// Layout object.
    pub layout: Value,
}

/// Builds every figure the result set supports, in display order.
#[must_use]
pub fn all_figures(results: &SimulationResults, style: &ChartStyle) -> Vec<Figure> {
    [
        summary_metrics_bar(results, style),
        dashboard(results, style),
        adoption_band_chart(results, style),
        technology_evolution_chart(results, style),
        improvement_bar_chart(results, style),
        client_metrics_donut(results, style),
        priority_radar_chart(results, style),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Bar chart of the top-level summary metrics.
#[must_use]
pub fn summary_metrics_bar(results: &SimulationResults, style: &ChartStyle) -> Option<Figure> {
    if results.summary_metrics.is_empty() {
        return None;
    }
    let labels: Vec<String> = results.summary_metrics.keys().map(|k| titleize(k)).collect();
    let values: Vec<f64> = results.summary_metrics.values().copied().collect();
    Some(Figure {
        name: "summary_metrics".into(),
        data: json!([{
            "type": "bar",
            "x": labels,
            "y": values,
            "marker": { "color": COLORS[1] },
        }]),
        layout: style.layout("Key Performance Indicators"),
    })
}

/// Multi-panel dashboard: KPI bar, sustainability gauge, adoption
/// time-series, and metrics pie. Each panel appears only when its input
/// section exists; the figure is omitted when no panel has data.
#[must_use]
pub fn dashboard(results: &SimulationResults, style: &ChartStyle) -> Option<Figure> {
    let mut traces = Vec::new();

    if !results.summary_metrics.is_empty() {
        let labels: Vec<String> = results.summary_metrics.keys().map(|k| titleize(k)).collect();
        let values: Vec<f64> = results.summary_metrics.values().copied().collect();
        traces.push(json!({
            "type": "bar",
            "x": labels,
            "y": values,
            "marker": { "color": COLORS[1] },
            "xaxis": "x",
            "yaxis": "y",
            "name": "Summary",
        }));
    }

    if let Some(score) = results
        .summary_metrics
        .get("overall_sustainability_score")
        .copied()
    {
        traces.push(json!({
            "type": "indicator",
            "mode": "gauge+number",
            "value": score,
            "title": { "text": "Sustainability Score" },
            "gauge": {
                "axis": { "range": [0, 100] },
                "bar": { "color": COLORS[2] },
                "steps": [
                    { "range": [0, 33], "color": "#fadbd8" },
                    { "range": [33, 66], "color": "#fdebd0" },
                    { "range": [66, 100], "color": "#d5f5e3" },
                ],
            },
            "domain": { "x": [0.55, 1.0], "y": [0.55, 1.0] },
        }));
    }

    if let Some(sustainability) = &results.sustainability {
        let period = results
            .metadata
            .as_ref()
            .map_or_else(SimulationPeriod::default, |meta| meta.simulation_period);
        for (idx, adoption) in sustainability.fertilizer_adoption.iter().enumerate() {
            let years: Vec<i32> = period.years().collect();
            let ramp =
                numeric::interpolate(0.0, adoption.market_growth.midpoint(), years.len());
            traces.push(json!({
                "type": "scatter",
                "mode": "lines+markers",
                "x": years,
                "y": ramp,
                "name": adoption.fertilizer_type,
                "line": { "color": COLORS[idx % COLORS.len()] },
                "xaxis": "x2",
                "yaxis": "y2",
            }));
        }
    }

    if let Some(client_needs) = &results.client_needs {
        if !client_needs.metrics.is_empty() {
            let labels: Vec<String> = client_needs.metrics.keys().map(|k| titleize(k)).collect();
            let values: Vec<f64> = client_needs.metrics.values().copied().collect();
            traces.push(json!({
                "type": "pie",
                "labels": labels,
                "values": values,
                "hole": 0.4,
                "domain": { "x": [0.55, 1.0], "y": [0.0, 0.45] },
                "name": "Client metrics",
            }));
        }
    }

    if traces.is_empty() {
        return None;
    }
    let mut layout = style.layout("Simulation Dashboard");
    let panels = json!({
        "xaxis": { "domain": [0.0, 0.45], "anchor": "y" },
        "yaxis": { "domain": [0.55, 1.0], "anchor": "x" },
        "xaxis2": { "domain": [0.0, 0.45], "anchor": "y2", "title": { "text": "Year" } },
        "yaxis2": { "domain": [0.0, 0.45], "anchor": "x2", "title": { "text": "Market share (%)" } },
    });
    merge(&mut layout, &panels);
    Some(Figure {
        name: "dashboard".into(),
        data: Value::Array(traces),
        layout,
    })
}

/// Time series with a min/max band per fertilizer adoption record.
#[must_use]
pub fn adoption_band_chart(results: &SimulationResults, style: &ChartStyle) -> Option<Figure> {
    let sustainability = results.sustainability.as_ref()?;
    if sustainability.fertilizer_adoption.is_empty() {
        return None;
    }
    let period = results
        .metadata
        .as_ref()
        .map_or_else(SimulationPeriod::default, |meta| meta.simulation_period);
    let years: Vec<i32> = period.years().collect();
    let mut traces = Vec::new();
    for (idx, adoption) in sustainability.fertilizer_adoption.iter().enumerate() {
        let color = COLORS[idx % COLORS.len()];
        let lower = numeric::interpolate(0.0, adoption.market_growth.min_percentage, years.len());
        let upper = numeric::interpolate(0.0, adoption.market_growth.max_percentage, years.len());
        let mean = numeric::interpolate(0.0, adoption.market_growth.midpoint(), years.len());
        traces.push(json!({
            "type": "scatter",
            "mode": "lines",
            "x": years,
            "y": lower,
            "line": { "width": 0 },
            "showlegend": false,
            "hoverinfo": "skip",
        }));
        traces.push(json!({
            "type": "scatter",
            "mode": "lines",
            "x": years,
            "y": upper,
            "fill": "tonexty",
            "line": { "width": 0 },
            "name": format!("{} (range)", adoption.fertilizer_type),
            "opacity": 0.3,
        }));
        traces.push(json!({
            "type": "scatter",
            "mode": "lines+markers",
            "x": years,
            "y": mean,
            "name": format!("{} (mean)", adoption.fertilizer_type),
            "line": { "width": 2, "color": color },
        }));
    }
    let mut layout = style.layout("Fertilizer Market Share Projection");
    merge(
        &mut layout,
        &json!({
            "xaxis": { "title": { "text": "Year" } },
            "yaxis": { "title": { "text": "Market share (%)" } },
        }),
    );
    Some(Figure {
        name: "fertilizer_adoption".into(),
        data: Value::Array(traces),
        layout,
    })
}

/// One line per declared technology evolution trajectory.
#[must_use]
pub fn technology_evolution_chart(
    results: &SimulationResults,
    style: &ChartStyle,
) -> Option<Figure> {
    let production_tech = results.production_tech.as_ref()?;
    let mut traces = Vec::new();
    for (idx, tech) in production_tech.technology_evolution.iter().enumerate() {
        let Some(Trend {
            trajectory: Some(trajectory),
            ..
        }) = &tech.trajectory_or_curve
        else {
            continue;
        };
        if trajectory.is_empty() {
            continue;
        }
        let years: Vec<i32> = trajectory.iter().map(|(year, _)| *year).collect();
        let values: Vec<f64> = trajectory.iter().map(|(_, value)| *value).collect();
        traces.push(json!({
            "type": "scatter",
            "mode": "lines+markers",
            "x": years,
            "y": values,
            "name": tech.technology_name.clone().unwrap_or_else(|| "Unknown".into()),
            "line": { "width": 2, "color": COLORS[idx % COLORS.len()] },
        }));
    }
    if traces.is_empty() {
        return None;
    }
    let mut layout = style.layout("Production Technology Evolution");
    merge(
        &mut layout,
        &json!({ "xaxis": { "title": { "text": "Year" } } }),
    );
    Some(Figure {
        name: "technology_evolution".into(),
        data: Value::Array(traces),
        layout,
    })
}

/// Horizontal bar chart of improvement percent per technology.
#[must_use]
pub fn improvement_bar_chart(results: &SimulationResults, style: &ChartStyle) -> Option<Figure> {
    let production_tech = results.production_tech.as_ref()?;
    let mut names = Vec::new();
    let mut improvements = Vec::new();
    for tech in &production_tech.technology_evolution {
        let Some(improvement) = tech
            .trajectory_or_curve
            .as_ref()
            .and_then(Trend::improvement_percent)
        else {
            continue;
        };
        names.push(tech.technology_name.clone().unwrap_or_else(|| "Unknown".into()));
        improvements.push(improvement);
    }
    if names.is_empty() {
        return None;
    }
    Some(Figure {
        name: "technology_improvements".into(),
        data: json!([{
            "type": "bar",
            "orientation": "h",
            "x": improvements,
            "y": names,
            "marker": { "color": COLORS[2] },
        }]),
        layout: style.layout("Technology Improvement (%)"),
    })
}

/// Donut chart of the client needs stub metrics.
#[must_use]
pub fn client_metrics_donut(results: &SimulationResults, style: &ChartStyle) -> Option<Figure> {
    let client_needs = results.client_needs.as_ref()?;
    if client_needs.metrics.is_empty() {
        return None;
    }
    let labels: Vec<String> = client_needs.metrics.keys().map(|k| titleize(k)).collect();
    let values: Vec<f64> = client_needs.metrics.values().copied().collect();
    Some(Figure {
        name: "client_metrics".into(),
        data: json!([{
            "type": "pie",
            "labels": labels,
            "values": values,
            "hole": 0.6,
            "textinfo": "percent+label",
        }]),
        layout: style.layout("Client Demand Signals"),
    })
}

/// Radar chart of priority end values across priority areas.
#[must_use]
pub fn priority_radar_chart(results: &SimulationResults, style: &ChartStyle) -> Option<Figure> {
    let client_needs = results.client_needs.as_ref()?;
    let mut areas = Vec::new();
    let mut values = Vec::new();
    for priority in &client_needs.priority_evolution {
        let Some((_, end)) = priority
            .evolution_trend
            .as_ref()
            .and_then(Trend::endpoints)
        else {
            continue;
        };
        areas.push(
            priority
                .priority_area
                .clone()
                .unwrap_or_else(|| "Unknown".into()),
        );
        values.push(end);
    }
    if areas.is_empty() {
        return None;
    }
    // Close the polygon.
    areas.push(areas[0].clone());
    values.push(values[0]);
    Some(Figure {
        name: "priority_radar".into(),
        data: json!([{
            "type": "scatterpolar",
            "r": values,
            "theta": areas,
            "fill": "toself",
            "line": { "color": COLORS[1] },
        }]),
        layout: style.layout("Client Priority Landscape"),
    })
}

/// `snake_case_metric` -> `Snake Case Metric`.
fn titleize(key: &str) -> String {
    key.split('_')
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

fn merge(target: &mut Value, extra: &Value) {
    if let (Some(target), Some(extra)) = (target.as_object_mut(), extra.as_object()) {
        for (key, value) in extra {
            target.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fertisim_models::{ClientPriorityEvolution, FertilizerAdoption, PercentageRange};
    use fertisim_simulation::{ClientNeedsOutcome, SustainabilityOutcome};
    use indexmap::{indexmap, IndexMap};

    fn results_with_adoption() -> SimulationResults {
        SimulationResults {
            sustainability: Some(SustainabilityOutcome {
                fertilizer_adoption: vec![FertilizerAdoption {
                    fertilizer_type: "Organic".into(),
                    market_growth: PercentageRange::new(20.0, 40.0).unwrap(),
                    target_year: 2030,
                }],
                technology_penetration: Vec::new(),
                metrics: IndexMap::new(),
            }),
            summary_metrics: indexmap! { "overall_sustainability_score".to_string() => 55.0 },
            ..SimulationResults::default()
        }
    }

    #[test]
    fn empty_results_produce_no_figures() {
        let figures = all_figures(&SimulationResults::default(), &ChartStyle::default());
        assert!(figures.is_empty());
    }

    #[test]
    fn summary_bar_titleizes_metric_names() {
        let figure =
            summary_metrics_bar(&results_with_adoption(), &ChartStyle::default()).unwrap();
        assert_eq!(
            figure.data[0]["x"][0].as_str(),
            Some("Overall Sustainability Score")
        );
    }

    #[test]
    fn adoption_band_emits_three_traces_per_record() {
        let figure = adoption_band_chart(&results_with_adoption(), &ChartStyle::default()).unwrap();
        assert_eq!(figure.data.as_array().unwrap().len(), 3);
        // Band spans the default 2025-2040 period.
        assert_eq!(figure.data[0]["x"].as_array().unwrap().len(), 16);
    }

    #[test]
    fn dashboard_includes_gauge_when_score_present() {
        let figure = dashboard(&results_with_adoption(), &ChartStyle::default()).unwrap();
        let kinds: Vec<&str> = figure
            .data
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|trace| trace["type"].as_str())
            .collect();
        assert!(kinds.contains(&"indicator"));
        assert!(kinds.contains(&"bar"));
    }

    #[test]
    fn radar_closes_the_polygon() {
        let results = SimulationResults {
            client_needs: Some(ClientNeedsOutcome {
                priority_evolution: vec![
                    ClientPriorityEvolution {
                        priority_area: Some("Sustainability".into()),
                        evolution_trend: Some(fertisim_models::Trend {
                            name: "weight".into(),
                            description: None,
                            trajectory: Some(vec![(2025, 5.0), (2040, 9.0)]),
                        }),
                        notes: None,
                    },
                    ClientPriorityEvolution {
                        priority_area: Some("Digital".into()),
                        evolution_trend: Some(fertisim_models::Trend {
                            name: "weight".into(),
                            description: None,
                            trajectory: Some(vec![(2025, 3.0), (2040, 7.0)]),
                        }),
                        notes: None,
                    },
                ],
                metrics: IndexMap::new(),
            }),
            ..SimulationResults::default()
        };
        let figure = priority_radar_chart(&results, &ChartStyle::default()).unwrap();
        let theta = figure.data[0]["theta"].as_array().unwrap();
        assert_eq!(theta.len(), 3);
        assert_eq!(theta.first(), theta.last());
    }

    #[test]
    fn missing_sections_degrade_to_none() {
        let style = ChartStyle::default();
        let empty = SimulationResults::default();
        assert!(adoption_band_chart(&empty, &style).is_none());
        assert!(technology_evolution_chart(&empty, &style).is_none());
        assert!(client_metrics_donut(&empty, &style).is_none());
        assert!(priority_radar_chart(&empty, &style).is_none());
    }
}
