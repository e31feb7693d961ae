use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::core::{PieDatum, Series};
use crate::error::{ChartError, ChartResult};
use crate::render::Renderer;

use super::{CompositeChart, PieChart};

pub const SERIES_JSON_SCHEMA_V1: u32 = 1;
pub const PIE_DATA_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesListJsonContractV1 {
    pub schema_version: u32,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieDataJsonContractV1 {
    pub schema_version: u32,
    pub slices: Vec<PieDatum>,
}

/// Parses composite series from a bare array or a versioned contract.
pub fn series_from_json_str(input: &str) -> ChartResult<Vec<Series>> {
    parse_compat(input, "series", |payload: SeriesListJsonContractV1| {
        (payload.schema_version, SERIES_JSON_SCHEMA_V1, payload.series)
    })
}

/// Parses pie slices from a bare array or a versioned contract.
pub fn pie_data_from_json_str(input: &str) -> ChartResult<Vec<PieDatum>> {
    parse_compat(input, "pie data", |payload: PieDataJsonContractV1| {
        (payload.schema_version, PIE_DATA_JSON_SCHEMA_V1, payload.slices)
    })
}

pub fn series_to_json_contract_v1_pretty(series: &[Series]) -> ChartResult<String> {
    let payload = SeriesListJsonContractV1 {
        schema_version: SERIES_JSON_SCHEMA_V1,
        series: series.to_vec(),
    };
    serde_json::to_string_pretty(&payload).map_err(|e| {
        ChartError::InvalidData(format!("failed to serialize series contract v1: {e}"))
    })
}

pub fn pie_data_to_json_contract_v1_pretty(slices: &[PieDatum]) -> ChartResult<String> {
    let payload = PieDataJsonContractV1 {
        schema_version: PIE_DATA_JSON_SCHEMA_V1,
        slices: slices.to_vec(),
    };
    serde_json::to_string_pretty(&payload).map_err(|e| {
        ChartError::InvalidData(format!("failed to serialize pie data contract v1: {e}"))
    })
}

fn parse_compat<T, C>(
    input: &str,
    label: &str,
    unpack: impl FnOnce(C) -> (u32, u32, Vec<T>),
) -> ChartResult<Vec<T>>
where
    T: DeserializeOwned,
    C: DeserializeOwned,
{
    if let Ok(records) = serde_json::from_str::<Vec<T>>(input) {
        return Ok(records);
    }
    let payload: C = serde_json::from_str(input).map_err(|e| {
        ChartError::InvalidData(format!("failed to parse {label} json payload: {e}"))
    })?;
    let (found, expected, records) = unpack(payload);
    if found != expected {
        return Err(ChartError::InvalidData(format!(
            "unsupported {label} schema version: {found}"
        )));
    }
    Ok(records)
}

impl<R: Renderer> CompositeChart<R> {
    /// Replaces the data with series parsed from JSON.
    pub fn set_data_json(&mut self, input: &str) -> ChartResult<()> {
        self.set_data(series_from_json_str(input)?);
        Ok(())
    }

    pub fn data_json_contract_v1_pretty(&self) -> ChartResult<String> {
        series_to_json_contract_v1_pretty(self.data())
    }
}

impl<R: Renderer> PieChart<R> {
    pub fn set_data_json(&mut self, input: &str) -> ChartResult<()> {
        self.set_data(pie_data_from_json_str(input)?);
        Ok(())
    }

    pub fn data_json_contract_v1_pretty(&self) -> ChartResult<String> {
        pie_data_to_json_contract_v1_pretty(self.data())
    }
}

#[cfg(test)]
mod tests {
    use super::{pie_data_from_json_str, series_from_json_str, series_to_json_contract_v1_pretty};
    use crate::core::{SeriesKind, YAxis};

    #[test]
    fn accepts_bare_series_array() {
        let series = series_from_json_str(
            r#"[{"key":"rain","type":"bar","yAxis":2,"values":[{"x":0,"y":3}]}]"#,
        )
        .expect("parse series");
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].kind, SeriesKind::Bar);
        assert_eq!(series[0].y_axis, YAxis::Secondary);
    }

    #[test]
    fn versioned_contract_round_trips_and_rejects_unknown_versions() {
        let series = series_from_json_str(r#"[{"key":"a","type":"line","yAxis":1}]"#)
            .expect("parse series");
        let json = series_to_json_contract_v1_pretty(&series).expect("serialize");
        assert_eq!(series_from_json_str(&json).expect("reparse"), series);

        let future = r#"{"schema_version":9,"series":[]}"#;
        assert!(series_from_json_str(future).is_err());
    }

    #[test]
    fn pie_data_accepts_key_and_y_aliases() {
        let slices = pie_data_from_json_str(r#"[{"key":"One","y":5},{"label":"Two","value":2}]"#)
            .expect("parse slices");
        assert_eq!(slices[0].label, "One");
        assert_eq!(slices[1].value, 2.0);
    }
}
