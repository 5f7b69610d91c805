use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    feature::{Feature, FeatureId},
    stats::Demographics,
    store::SelectionStore,
};
use super::color::{ColorRamp, Rgb};

/// Paint for one boundary. Field names match the map widget's style options.
/// Absent keys fall back to [`FeatureStyle::base`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeatureStyle {
    pub fill_color: String,
    pub fill_opacity: f64,
    pub stroke_color: String,
    pub stroke_weight: f64,
    /// Draw order; the selected boundary sits above its neighbours.
    pub z_index: u32,
}

impl FeatureStyle {
    pub fn base() -> Self {
        Self {
            fill_color: "#1976d2".into(),
            fill_opacity: 0.2,
            stroke_color: "#1976d2".into(),
            stroke_weight: 2.0,
            z_index: 1,
        }
    }

    pub fn highlight() -> Self {
        Self {
            fill_color: "#ff9800".into(),
            fill_opacity: 0.6,
            stroke_color: "#e65100".into(),
            stroke_weight: 3.0,
            z_index: 2,
        }
    }
}

impl Default for FeatureStyle {
    fn default() -> Self { Self::base() }
}

/// Partial style as written in a config file; unset keys keep the preset's value.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StyleOverrides {
    fill_color: Option<String>,
    fill_opacity: Option<f64>,
    stroke_color: Option<String>,
    stroke_weight: Option<f64>,
    z_index: Option<u32>,
}

impl StyleOverrides {
    fn over(self, preset: FeatureStyle) -> FeatureStyle {
        FeatureStyle {
            fill_color: self.fill_color.unwrap_or(preset.fill_color),
            fill_opacity: self.fill_opacity.unwrap_or(preset.fill_opacity),
            stroke_color: self.stroke_color.unwrap_or(preset.stroke_color),
            stroke_weight: self.stroke_weight.unwrap_or(preset.stroke_weight),
            z_index: self.z_index.unwrap_or(preset.z_index),
        }
    }
}

fn highlight_overrides<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FeatureStyle, D::Error> {
    StyleOverrides::deserialize(deserializer).map(|o| o.over(FeatureStyle::highlight()))
}

/// Figure used to shade boundaries when drawing a choropleth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    Population,
    Density,
    Households,
    Area,
    MaleShare,
}

impl Metric {
    pub const ALL: [Metric; 5] = [Metric::Population, Metric::Density, Metric::Households, Metric::Area, Metric::MaleShare];

    pub fn to_str(self) -> &'static str {
        match self {
            Metric::Population => "population",
            Metric::Density => "density",
            Metric::Households => "households",
            Metric::Area => "area",
            Metric::MaleShare => "male-share",
        }
    }

    pub fn value(self, demographics: &Demographics) -> Option<f64> {
        match self {
            Metric::Population => demographics.total,
            Metric::Density => demographics.density,
            Metric::Households => demographics.households,
            Metric::Area => demographics.area_km2,
            Metric::MaleShare => demographics.male_pct.map(f64::from),
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL.into_iter()
            .find(|m| m.to_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!(
                "unknown metric {s:?}. Expected one of: {}",
                Metric::ALL.map(Metric::to_str).join(", "),
            ))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.to_str()) }
}

/// How boundaries are painted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleConfig {
    pub base: FeatureStyle,
    #[serde(deserialize_with = "highlight_overrides")]
    pub highlight: FeatureStyle,
    /// Shade unselected boundaries by this figure instead of the flat base fill.
    pub choropleth: Option<Metric>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self { base: FeatureStyle::base(), highlight: FeatureStyle::highlight(), choropleth: None }
    }
}

/// Per-feature style function bound to one store state.
///
/// Built once per redraw; the choropleth range is computed up front so each
/// `style` call is O(1).
#[derive(Debug, Clone)]
pub struct StylePainter<'a> {
    config: &'a StyleConfig,
    selected: Option<FeatureId>,
    ramp: Option<(Metric, ColorRamp)>,
}

impl<'a> StylePainter<'a> {
    pub fn new(store: &SelectionStore, config: &'a StyleConfig) -> Self {
        let ramp = config.choropleth.and_then(|metric| {
            let collection = store.collection()?;
            let values = collection.iter()
                .filter_map(|f| metric.value(&Demographics::from_props(&f.props)));
            ColorRamp::spanning(values).map(|ramp| (metric, ramp))
        });

        Self { config, selected: store.current_selection(), ramp }
    }

    #[inline] pub fn is_selected(&self, feature: &Feature) -> bool { self.selected == Some(feature.id) }

    pub fn style(&self, feature: &Feature) -> FeatureStyle {
        if self.is_selected(feature) {
            return self.config.highlight.clone();
        }

        let mut style = self.config.base.clone();
        if let Some((metric, ramp)) = &self.ramp {
            if let Some(value) = metric.value(&Demographics::from_props(&feature.props)) {
                style.fill_color = ramp.color(value).to_hex();
            }
        }
        style
    }

    /// Fill as a parsed color, falling back to the ramp's light end for unparseable config values.
    pub fn fill_rgb(&self, feature: &Feature) -> Rgb {
        Rgb::from_hex(&self.style(feature).fill_color).unwrap_or(ColorRamp::LOW)
    }
}

/// Style for one feature under the store's current selection.
///
/// Builds a fresh painter, which rescans the collection when a choropleth is
/// set. Use [`StylePainter`] or [`styled_features`](super::styled_features)
/// to style many features.
pub fn feature_style(store: &SelectionStore, config: &StyleConfig, feature: &Feature) -> FeatureStyle {
    StylePainter::new(store, config).style(feature)
}
