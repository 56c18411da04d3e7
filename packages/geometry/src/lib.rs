#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometry conversion between [`geo`] types and Urban API `GeoJSON`.
//!
//! The Urban API accepts a fixed set of `GeoJSON` geometry types. Geometries
//! read from source files are converted with [`to_api_geometry`], which
//! rejects anything the API does not store, and read back out of API
//! entities with [`from_api_geometry`].

use geo::Geometry;
use urban_loader_urban_models::PostPhysicalObject;

/// Errors that can occur while converting geometries.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    /// The geometry type has no Urban API counterpart.
    #[error("Invalid input geometry type: {kind}")]
    Unsupported {
        /// Name of the rejected geometry variant.
        kind: &'static str,
    },

    /// The `GeoJSON` payload could not be converted.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
}

/// Returns the variant name of a geometry (e.g. `"MultiPolygon"`).
#[must_use]
pub const fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// Rejects top-level geometries the Urban API does not store.
///
/// `Line`, `Rect` and `Triangle` have `GeoJSON` encodings (`LineString` and
/// `Polygon`) and pass. Members of a `GeometryCollection` are not checked.
const fn ensure_supported(geometry: &Geometry<f64>) -> Result<(), GeometryError> {
    match geometry {
        Geometry::MultiLineString(_) => Err(GeometryError::Unsupported {
            kind: geometry_kind(geometry),
        }),
        _ => Ok(()),
    }
}

/// Converts a [`geo`] geometry into the `GeoJSON` geometry sent to the API.
///
/// `Line` becomes a `LineString`; `Rect` and `Triangle` become a `Polygon`.
///
/// # Errors
///
/// Returns [`GeometryError::Unsupported`] for a top-level `MultiLineString`.
pub fn to_api_geometry(geometry: &Geometry<f64>) -> Result<geojson::Geometry, GeometryError> {
    ensure_supported(geometry)?;
    Ok(geojson::Geometry::new(geojson::Value::from(geometry)))
}

/// Converts an API `GeoJSON` geometry back into a [`geo`] geometry.
///
/// # Errors
///
/// Returns [`GeometryError::GeoJson`] if the coordinates are malformed.
pub fn from_api_geometry(geometry: &geojson::Geometry) -> Result<Geometry<f64>, GeometryError> {
    let converted: Geometry<f64> = geometry.clone().try_into()?;
    Ok(converted)
}

/// Builds a [`PostPhysicalObject`] for the given geometry with every
/// optional field left unset.
///
/// # Errors
///
/// Returns [`GeometryError`] if the geometry cannot be converted.
pub fn post_physical_object(
    geometry: &Geometry<f64>,
    territory_id: i32,
    physical_object_type_id: i32,
) -> Result<PostPhysicalObject, GeometryError> {
    let geometry = to_api_geometry(geometry).inspect_err(|e| {
        log::debug!("Rejected geometry for territory {territory_id}: {e}");
    })?;

    Ok(PostPhysicalObject {
        geometry,
        territory_id,
        physical_object_type_id,
        centre_point: None,
        address: None,
        name: None,
        properties: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{
        Coord, GeometryCollection, Line, LineString, MultiLineString, Point, Polygon, Rect,
    };

    fn square() -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (0.0, 0.0),
                (1.0, 0.0),
                (1.0, 1.0),
                (0.0, 1.0),
                (0.0, 0.0),
            ]),
            vec![],
        )
    }

    #[test]
    fn converts_point() {
        let geometry = to_api_geometry(&Geometry::Point(Point::new(30.3, 59.9))).unwrap();
        assert_eq!(geometry.value, geojson::Value::Point(vec![30.3, 59.9]));
    }

    #[test]
    fn converts_polygon() {
        let geometry = to_api_geometry(&Geometry::Polygon(square())).unwrap();
        let geojson::Value::Polygon(rings) = geometry.value else {
            panic!("expected a polygon");
        };
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 5);
    }

    #[test]
    fn rejects_multi_line_string() {
        let multi_line = Geometry::MultiLineString(MultiLineString::new(vec![
            LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]),
        ]));

        match to_api_geometry(&multi_line) {
            Err(err @ GeometryError::Unsupported { kind: "MultiLineString" }) => {
                assert_eq!(err.to_string(), "Invalid input geometry type: MultiLineString");
            }
            other => panic!("expected Unsupported, got {other:?}"),
        }
    }

    #[test]
    fn converts_line_to_line_string() {
        let line = Geometry::Line(Line::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }));

        let geometry = to_api_geometry(&line).unwrap();

        assert_eq!(
            geometry.value,
            geojson::Value::LineString(vec![vec![0.0, 0.0], vec![1.0, 1.0]])
        );
    }

    #[test]
    fn converts_rect_to_polygon() {
        let rect = Geometry::Rect(Rect::new(
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 1.0 },
        ));

        let geometry = to_api_geometry(&rect).unwrap();

        assert!(matches!(geometry.value, geojson::Value::Polygon(_)));
    }

    #[test]
    fn accepts_collection_with_any_members() {
        let collection = Geometry::GeometryCollection(GeometryCollection(vec![
            Geometry::Point(Point::new(0.0, 0.0)),
            Geometry::MultiLineString(MultiLineString::new(vec![LineString::from(vec![
                (0.0, 0.0),
                (1.0, 1.0),
            ])])),
        ]));

        let geometry = to_api_geometry(&collection).unwrap();

        let geojson::Value::GeometryCollection(members) = geometry.value else {
            panic!("expected a geometry collection");
        };
        assert_eq!(members.len(), 2);
    }

    #[test]
    fn api_geometry_converts_back() {
        let original = Geometry::Polygon(square());
        let api = to_api_geometry(&original).unwrap();
        let restored = from_api_geometry(&api).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn builds_post_physical_object() {
        let object =
            post_physical_object(&Geometry::Point(Point::new(30.3, 59.9)), 3, 8).unwrap();
        assert_eq!(object.territory_id, 3);
        assert_eq!(object.physical_object_type_id, 8);
        assert!(object.centre_point.is_none());
        assert!(object.properties.is_none());
    }
}
