use geojson::{FeatureCollection, Geometry, Value};
use crate::{
    error::Result,
    types::ExtractionResult,
    typed_geojson::{PlotFeature, PlotFeatureProperties, PlotGeoJson},
};

impl ExtractionResult {
    /// Export to typed GeoJSON, one Polygon feature per plot
    pub fn to_typed_geojson(&self) -> PlotGeoJson {
        let features = self.records
            .iter()
            .map(|record| {
                let mut ring: Vec<Vec<f64>> = record.polygon_coordinates
                    .iter()
                    .map(|&[x, y]| vec![x as f64, y as f64])
                    .collect();
                // GeoJSON rings repeat the first position
                if let Some(first) = ring.first().cloned() {
                    ring.push(first);
                }

                let polygon = record.polygon();
                let properties = PlotFeatureProperties {
                    plot_number: record.label.clone(),
                    raw_text: record.raw_text.clone(),
                    area: polygon.area(),
                    perimeter: polygon.perimeter(),
                    vertex_count: polygon.vertex_count(),
                };

                PlotFeature::new(Geometry::new(Value::Polygon(vec![ring])), &properties)
            })
            .collect();

        // Add metadata to foreign members
        let mut foreign_members = serde_json::Map::new();
        foreign_members.insert("image_width".to_string(), serde_json::Value::Number(serde_json::Number::from(self.image_width)));
        foreign_members.insert("image_height".to_string(), serde_json::Value::Number(serde_json::Number::from(self.image_height)));
        foreign_members.insert("plot_count".to_string(), serde_json::Value::Number(serde_json::Number::from(self.records.len())));

        PlotGeoJson {
            features,
            foreign_members: Some(foreign_members),
        }
    }

    pub fn to_geojson(&self) -> FeatureCollection {
        self.to_typed_geojson().into_feature_collection()
    }

    /// Export to GeoJSON and serialize to JSON string
    pub fn to_geojson_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_geojson())?)
    }

    /// Save GeoJSON to file
    pub fn save_geojson<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_geojson_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{ExtractionResult, PlotBoundaryRecord};
    use geojson::{GeoJson, Value};

    fn sample() -> ExtractionResult {
        ExtractionResult {
            records: vec![
                PlotBoundaryRecord {
                    label: "Plot_0".to_string(),
                    raw_text: "14".to_string(),
                    polygon_coordinates: vec![[0, 0], [60, 0], [60, 60], [0, 60]],
                },
                PlotBoundaryRecord {
                    label: "Plot_3".to_string(),
                    raw_text: String::new(),
                    polygon_coordinates: vec![[100, 0], [200, 0], [200, 80], [100, 80]],
                },
            ],
            image_width: 640,
            image_height: 480,
        }
    }

    #[test]
    fn test_feature_per_plot_with_closed_ring() {
        let collection = sample().to_geojson();
        assert_eq!(collection.features.len(), 2);

        let geometry = collection.features[0].geometry.as_ref().unwrap();
        match &geometry.value {
            Value::Polygon(rings) => {
                assert_eq!(rings[0].len(), 5);
                assert_eq!(rings[0].first(), rings[0].last());
            }
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_typed_properties_and_metadata() {
        let geojson = sample().to_typed_geojson();
        assert_eq!(geojson.image_dimensions(), Some((640, 480)));
        assert_eq!(geojson.plot_count(), Some(2));

        let plot = geojson.find_plot("Plot_0").and_then(|f| f.properties()).unwrap();
        assert_eq!(plot.raw_text, "14");
        assert_eq!(plot.vertex_count, 4);
        assert!((plot.area - 3600.0).abs() < 1e-9);

        let unlabelled = geojson.unlabelled_plots();
        assert_eq!(unlabelled.len(), 1);
        assert_eq!(unlabelled[0].properties().unwrap().plot_number, "Plot_3");
        assert!(geojson.find_plot("Plot_9").is_none());
    }

    #[test]
    fn test_features_carry_plot_label_as_id() {
        let collection = sample().to_geojson();
        assert_eq!(
            collection.features[1].id,
            Some(geojson::feature::Id::String("Plot_3".to_string()))
        );
        assert_eq!(collection.foreign_members.unwrap()["plot_count"], 2);
    }

    #[test]
    fn test_string_parses_back_as_geojson() {
        let text = sample().to_geojson_string().unwrap();
        match text.parse::<GeoJson>().unwrap() {
            GeoJson::FeatureCollection(fc) => assert_eq!(fc.features.len(), 2),
            other => panic!("expected feature collection, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_result_is_empty_collection() {
        let collection = ExtractionResult::default().to_geojson();
        assert!(collection.features.is_empty());
    }
}
