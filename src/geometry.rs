use gdal::vector::Geometry as GDALGeometry;
use gdal::vector::ToGdal as _;
use geo::BooleanOps as _;
use geo::Centroid as _;
use geo::Intersects as _;
use geo::MapCoords as _;
use geo_types::Coord;
use geo_types::Geometry as GeoGeometry;
use geo_types::MultiPolygon;
use geo_types::Point;
use geo_types::Polygon;

use crate::errors::CommandError;

/// The geometry of a row in a spatial feature table. Only areal geometries are supported.
#[derive(Clone,Debug,PartialEq)]
pub(crate) enum ArealGeometry {
    Polygon(Polygon),
    MultiPolygon(MultiPolygon)
}

pub(crate) const fn geo_type_name(geometry: &GeoGeometry) -> &'static str {
    match geometry {
        GeoGeometry::Point(_) => "Point",
        GeoGeometry::Line(_) => "Line",
        GeoGeometry::LineString(_) => "LineString",
        GeoGeometry::Polygon(_) => "Polygon",
        GeoGeometry::MultiPoint(_) => "MultiPoint",
        GeoGeometry::MultiLineString(_) => "MultiLineString",
        GeoGeometry::MultiPolygon(_) => "MultiPolygon",
        GeoGeometry::GeometryCollection(_) => "GeometryCollection",
        GeoGeometry::Rect(_) => "Rect",
        GeoGeometry::Triangle(_) => "Triangle",
    }
}

impl ArealGeometry {

    pub(crate) const fn type_name(&self) -> &'static str {
        match self {
            Self::Polygon(_) => "Polygon",
            Self::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Converts a gdal geometry, `row` is only used for error reporting.
    pub(crate) fn try_from_gdal(geometry: &GDALGeometry, row: usize) -> Result<Self,CommandError> {
        Self::try_from_geo(geometry.to_geo()?, row)
    }

    pub(crate) fn try_from_geo(geometry: GeoGeometry, row: usize) -> Result<Self,CommandError> {
        match geometry {
            GeoGeometry::Polygon(polygon) => Ok(Self::Polygon(polygon)),
            GeoGeometry::MultiPolygon(multi) => Ok(Self::MultiPolygon(multi)),
            GeoGeometry::Rect(rect) => Ok(Self::Polygon(rect.to_polygon())),
            GeoGeometry::Triangle(triangle) => Ok(Self::Polygon(triangle.to_polygon())),
            other => Err(CommandError::IncorrectGeometryType {
                row,
                expected: "Polygon or MultiPolygon",
                found: geo_type_name(&other).to_owned()
            })
        }
    }

    pub(crate) fn to_gdal(&self) -> Result<GDALGeometry,CommandError> {
        Ok(match self {
            Self::Polygon(polygon) => polygon.to_gdal()?,
            Self::MultiPolygon(multi) => multi.to_gdal()?,
        })
    }

    /// An overlay always produces a multipolygon, a single part result is stored as a plain polygon.
    pub(crate) fn from_overlay(mut multi: MultiPolygon) -> Self {
        if multi.0.len() == 1 {
            if let Some(polygon) = multi.0.pop() {
                return Self::Polygon(polygon)
            }
        }
        Self::MultiPolygon(multi)
    }

    #[cfg(test)]
    pub(crate) fn area(&self) -> f64 {
        use geo::Area as _;

        match self {
            Self::Polygon(polygon) => polygon.unsigned_area(),
            Self::MultiPolygon(multi) => multi.unsigned_area(),
        }
    }

    pub(crate) fn centroid(&self) -> Option<Point> {
        match self {
            Self::Polygon(polygon) => polygon.centroid(),
            Self::MultiPolygon(multi) => multi.centroid(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.polygons().iter().all(|polygon| polygon.exterior().0.is_empty())
    }

    pub(crate) fn to_multi_polygon(&self) -> MultiPolygon {
        match self {
            Self::Polygon(polygon) => MultiPolygon::new(vec![polygon.clone()]),
            Self::MultiPolygon(multi) => multi.clone(),
        }
    }

    fn polygons(&self) -> &[Polygon] {
        match self {
            Self::Polygon(polygon) => core::slice::from_ref(polygon),
            Self::MultiPolygon(multi) => &multi.0,
        }
    }

    pub(crate) fn intersects(&self, other: &MultiPolygon) -> bool {
        self.polygons().iter().any(|polygon| other.0.iter().any(|other| polygon.intersects(other)))
    }

    pub(crate) fn intersection(&self, other: &MultiPolygon) -> Self {
        Self::from_overlay(self.to_multi_polygon().intersection(other))
    }

    pub(crate) fn try_map_coords<Error, Callback: Fn(Coord) -> Result<Coord,Error> + Copy>(&self, callback: Callback) -> Result<Self,Error> {
        Ok(match self {
            Self::Polygon(polygon) => Self::Polygon(polygon.try_map_coords(callback)?),
            Self::MultiPolygon(multi) => Self::MultiPolygon(multi.try_map_coords(callback)?),
        })
    }

}

/// Merges all geometries into one multipolygon.
pub(crate) fn unary_union<'geometry, Items: IntoIterator<Item = &'geometry ArealGeometry>>(geometries: Items) -> MultiPolygon {
    let mut result = MultiPolygon::new(Vec::new());
    for geometry in geometries {
        result = result.union(&geometry.to_multi_polygon());
    }
    result
}

#[cfg(test)]
mod test {
    use geo::Area as _;
    use geo_types::polygon;
    use geo_types::MultiPolygon;

    use super::ArealGeometry;
    use super::unary_union;

    #[test]
    fn test_overlay_of_one_part_is_polygon() {
        let square = polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0), (x: 0.0, y: 0.0)];
        let other = MultiPolygon::new(vec![polygon![(x: 1.0, y: 1.0), (x: 3.0, y: 1.0), (x: 3.0, y: 3.0), (x: 1.0, y: 3.0), (x: 1.0, y: 1.0)]]);
        let result = ArealGeometry::Polygon(square).intersection(&other);
        assert_eq!(result.type_name(),"Polygon");
        assert!((result.area() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_intersection_is_empty() {
        let square = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0), (x: 0.0, y: 0.0)];
        let far = MultiPolygon::new(vec![polygon![(x: 5.0, y: 5.0), (x: 6.0, y: 5.0), (x: 6.0, y: 6.0), (x: 5.0, y: 6.0), (x: 5.0, y: 5.0)]]);
        let geometry = ArealGeometry::Polygon(square);
        assert!(!geometry.intersects(&far));
        assert!(geometry.intersection(&far).is_empty());
    }

    #[test]
    fn test_unary_union_merges_overlaps() {
        let left = ArealGeometry::Polygon(polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 1.0), (x: 0.0, y: 1.0), (x: 0.0, y: 0.0)]);
        let right = ArealGeometry::Polygon(polygon![(x: 1.0, y: 0.0), (x: 3.0, y: 0.0), (x: 3.0, y: 1.0), (x: 1.0, y: 1.0), (x: 1.0, y: 0.0)]);
        let union = unary_union([&left,&right]);
        assert_eq!(union.0.len(),1);
        assert!((union.unsigned_area() - 3.0).abs() < 1e-9);
    }
}
