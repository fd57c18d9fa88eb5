use serde::{Deserialize, Serialize};
use geojson::{Geometry, JsonObject};
use ts_rs::TS;
use schemars::JsonSchema;

/// Properties for plot boundary features
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS, JsonSchema)]
#[ts(export)]
#[schemars(description = "Properties for plot boundary features")]
pub struct PlotFeatureProperties {
    #[schemars(description = "Plot label, e.g. Plot_3")]
    pub plot_number: String,
    #[schemars(description = "Trimmed OCR text found inside the plot")]
    pub raw_text: String,
    #[schemars(description = "Area of the simplified polygon in square pixels")]
    pub area: f64,
    #[schemars(description = "Closed perimeter of the polygon in pixels")]
    pub perimeter: f64,
    #[schemars(description = "Number of polygon vertices")]
    pub vertex_count: usize,
}

/// One plot as a GeoJSON feature whose properties follow [`PlotFeatureProperties`]
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(transparent)]
pub struct PlotFeature {
    pub feature: geojson::Feature,
}

impl PlotFeature {
    pub fn new(geometry: Geometry, properties: &PlotFeatureProperties) -> Self {
        let feature = geojson::Feature {
            bbox: None,
            geometry: Some(geometry),
            id: Some(geojson::feature::Id::String(properties.plot_number.clone())),
            properties: serde_json::to_value(properties).ok().and_then(|v| v.as_object().cloned()),
            foreign_members: None,
        };
        Self { feature }
    }

    /// Typed view of the feature properties
    pub fn properties(&self) -> Option<PlotFeatureProperties> {
        let properties = self.feature.properties.clone()?;
        serde_json::from_value(serde_json::Value::Object(properties)).ok()
    }
}

/// Plot features plus the sheet metadata carried as foreign members
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PlotGeoJson {
    pub features: Vec<PlotFeature>,
    pub foreign_members: Option<JsonObject>,
}

impl PlotGeoJson {
    /// Find a plot feature by its label
    pub fn find_plot(&self, plot_number: &str) -> Option<&PlotFeature> {
        self.features.iter().find(|feature| {
            feature.properties()
                .is_some_and(|props| props.plot_number == plot_number)
        })
    }

    /// Plots whose OCR text is empty and need manual labelling
    pub fn unlabelled_plots(&self) -> Vec<&PlotFeature> {
        self.features
            .iter()
            .filter(|feature| feature.properties().is_some_and(|props| props.raw_text.is_empty()))
            .collect()
    }

    pub fn image_dimensions(&self) -> Option<(u32, u32)> {
        let foreign = self.foreign_members.as_ref()?;
        let width = foreign.get("image_width")?.as_u64()?;
        let height = foreign.get("image_height")?.as_u64()?;
        Some((u32::try_from(width).ok()?, u32::try_from(height).ok()?))
    }

    pub fn plot_count(&self) -> Option<usize> {
        self.foreign_members
            .as_ref()?
            .get("plot_count")?
            .as_u64()
            .map(|v| v as usize)
    }

    /// Plain GeoJSON collection for serialization
    pub fn into_feature_collection(self) -> geojson::FeatureCollection {
        geojson::FeatureCollection {
            bbox: None,
            features: self.features.into_iter().map(|f| f.feature).collect(),
            foreign_members: self.foreign_members,
        }
    }
}
