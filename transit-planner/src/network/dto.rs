//! Wire types returned by the network API and their conversion to domain types.
//!
//! The API sends line types either as names or numeric codes. Conversion is
//! lenient per record: a malformed record is dropped and logged, never fatal
//! for the whole response.

use serde::Deserialize;
use tracing::debug;

use crate::domain::{
    Coordinate, Correspondence, Line, LineId, RouteId, Stop, StopId, TransportMode,
};

/// A stop on a route's stop list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopDto {
    #[serde(alias = "id")]
    pub stop_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude", alias = "lng")]
    pub lon: f64,
}

/// A correspondence record attached to a stop.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrespondenceDto {
    pub to_stop_id: String,
    pub walk_time_seconds: f64,
    #[serde(default)]
    pub distance_meters: f64,
}

/// One vertex of a route shape.
#[derive(Debug, Clone, Deserialize)]
pub struct ShapePointDto {
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude", alias = "lng")]
    pub lon: f64,
}

/// Line type as sent by the API: either a name or a numeric code.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ModeCode {
    Code(u32),
    Name(String),
}

/// A line in the catalog listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDto {
    pub line_id: String,
    pub short_name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(rename = "type")]
    pub mode: ModeCode,
    #[serde(default)]
    pub route_ids: Vec<String>,
}

fn valid_position(lat: f64, lon: f64) -> bool {
    lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
}

/// Convert a route's stop list, dropping records with bad ids or positions.
pub fn convert_stops(dtos: Vec<StopDto>) -> Vec<Stop> {
    dtos.into_iter()
        .filter_map(|dto| {
            let id = StopId::parse(&dto.stop_id).ok()?;
            if !valid_position(dto.lat, dto.lon) {
                debug!(stop = %id, lat = dto.lat, lon = dto.lon, "Dropping stop with invalid position");
                return None;
            }
            Some(Stop::new(id, dto.name, Coordinate::new(dto.lat, dto.lon)))
        })
        .collect()
}

/// Convert correspondences, dropping records with bad ids or walk times.
pub fn convert_correspondences(dtos: Vec<CorrespondenceDto>) -> Vec<Correspondence> {
    dtos.into_iter()
        .filter_map(|dto| {
            let to = StopId::parse(&dto.to_stop_id).ok()?;
            if !dto.walk_time_seconds.is_finite() || dto.walk_time_seconds < 0.0 {
                debug!(to = %to, walk = dto.walk_time_seconds, "Dropping correspondence with invalid walk time");
                return None;
            }
            Some(Correspondence::new(
                to,
                dto.walk_time_seconds,
                dto.distance_meters,
            ))
        })
        .collect()
}

/// Convert a shape, dropping invalid vertices.
pub fn convert_shape(dtos: Vec<ShapePointDto>) -> Vec<Coordinate> {
    dtos.into_iter()
        .filter(|p| valid_position(p.lat, p.lon))
        .map(|p| Coordinate::new(p.lat, p.lon))
        .collect()
}

/// Convert the line listing, dropping lines of unknown type or bad ids.
pub fn convert_lines(dtos: Vec<LineDto>) -> Vec<Line> {
    dtos.into_iter()
        .filter_map(|dto| {
            let id = LineId::parse(&dto.line_id).ok()?;
            let mode: Result<TransportMode, _> = match &dto.mode {
                ModeCode::Code(code) => code.to_string().parse(),
                ModeCode::Name(name) => name.parse(),
            };
            let mode = match mode {
                Ok(mode) => mode,
                Err(e) => {
                    debug!(line = %id, error = %e, "Dropping line of unsupported mode");
                    return None;
                }
            };

            let mut line = Line::new(id, dto.short_name, mode);
            line.color = dto.color.filter(|c| !c.trim().is_empty());
            line.routes = dto
                .route_ids
                .iter()
                .filter_map(|r| RouteId::parse(r).ok())
                .collect();
            Some(line)
        })
        .collect()
}
