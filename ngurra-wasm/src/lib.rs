//! Framework-neutral WASM <-> JavaScript bridge for the dashboard core.

use ngurra_core::chart::{year_labels, ChartLayout, YearLabel};
use ngurra_core::{
    filter_services as filter_service_list, intervention_stats as compute_intervention_stats,
    scale_trend as scale_trend_points, DashboardConfig, GapError, Intervention, Service,
    ServiceFilter, TrendPoint,
};
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsDashboardConfig {
    #[serde(default)]
    refresh_delay_ms: Option<u64>,
    #[serde(default)]
    analysis_delay_ms: Option<u64>,
    #[serde(default)]
    chart_height: Option<f64>,
    #[serde(default)]
    value_tick_count: Option<usize>,
    #[serde(default)]
    year_label_step: Option<usize>,
}

impl From<JsDashboardConfig> for DashboardConfig {
    fn from(cfg: JsDashboardConfig) -> Self {
        let mut base = DashboardConfig::default();
        if let Some(ms) = cfg.refresh_delay_ms {
            base.refresh_delay_ms = ms;
        }
        if let Some(ms) = cfg.analysis_delay_ms {
            base.analysis_delay_ms = ms;
        }
        if let Some(height) = cfg.chart_height {
            base.chart_height = height;
        }
        if let Some(count) = cfg.value_tick_count {
            base.value_tick_count = count;
        }
        if let Some(step) = cfg.year_label_step {
            base.year_label_step = step;
        }
        base
    }
}

/// Layout plus the axis decorations a renderer needs.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartView {
    layout: ChartLayout,
    value_ticks: Vec<f64>,
    year_labels: Vec<YearLabel>,
}

#[wasm_bindgen]
pub fn sample_dataset() -> Result<JsValue, JsValue> {
    init();
    let dataset = ngurra_data::sample_dataset().map_err(js_error)?;
    to_js(&dataset)
}

#[wasm_bindgen]
pub fn load_dataset(input: JsValue) -> Result<JsValue, JsValue> {
    init();
    let value = from_value::<serde_json::Value>(input)
        .map_err(|err| JsValue::from_str(&format!("Could not read dataset JSON: {err}")))?;
    let dataset = ngurra_data::load_dataset_value(&value).map_err(js_error)?;
    to_js(&dataset)
}

#[wasm_bindgen]
pub fn scale_trend(
    points: JsValue,
    series: JsValue,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    init();
    let points: Vec<TrendPoint> = from_value(points)
        .map_err(|err| JsValue::from_str(&format!("Could not read trend points: {err}")))?;
    let series: Vec<String> = from_value(series)
        .map_err(|err| JsValue::from_str(&format!("Could not read series names: {err}")))?;
    let cfg = read_config(config)?;

    let layout = scale_trend_points(&points, &series);
    let view = ChartView {
        value_ticks: layout.bounds.value_ticks(cfg.value_tick_count),
        year_labels: year_labels(&layout, cfg.year_label_step),
        layout,
    };
    to_js(&view)
}

#[wasm_bindgen]
pub fn filter_services(services: JsValue, query: &str, filter: &str) -> Result<JsValue, JsValue> {
    init();
    let services: Vec<Service> = from_value(services)
        .map_err(|err| JsValue::from_str(&format!("Could not read services: {err}")))?;
    ngurra_data::validate_services(&services).map_err(js_error)?;
    let filter = ServiceFilter::from_id(filter).map_err(js_error)?;
    let visible = filter_service_list(&services, query, filter);
    to_js(&visible)
}

#[wasm_bindgen]
pub fn intervention_stats(interventions: JsValue) -> Result<JsValue, JsValue> {
    init();
    let interventions: Vec<Intervention> = from_value(interventions)
        .map_err(|err| JsValue::from_str(&format!("Could not read interventions: {err}")))?;
    ngurra_data::validate_interventions(&interventions).map_err(js_error)?;
    to_js(&compute_intervention_stats(&interventions))
}

fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn read_config(config: Option<JsValue>) -> Result<DashboardConfig, JsValue> {
    match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
            let cfg: JsDashboardConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Could not read config: {err}")))?;
            Ok(DashboardConfig::from(cfg))
        }
        _ => Ok(DashboardConfig::default()),
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|err| JsValue::from_str(&format!("Could not serialize result: {err}")))
}

fn js_error(err: GapError) -> JsValue {
    JsValue::from_str(&format_gap_error(err))
}

fn format_gap_error(err: GapError) -> String {
    format!("Dashboard error: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_overlays_defaults() {
        let cfg: JsDashboardConfig =
            serde_json::from_str(r#"{ "chartHeight": 320.0, "yearLabelStep": 3 }"#).unwrap();
        let cfg = DashboardConfig::from(cfg);
        assert_eq!(cfg.chart_height, 320.0);
        assert_eq!(cfg.year_label_step, 3);
        assert_eq!(cfg.refresh_delay_ms, 2_000);
        assert_eq!(cfg.value_tick_count, 5);
    }

    #[test]
    fn errors_are_prefixed() {
        let message = format_gap_error(GapError::UnknownFilter("closed".into()));
        assert_eq!(message, "Dashboard error: unknown filter: closed");
    }
}
