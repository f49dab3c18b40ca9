use geo_types::LineString;
use geo_types::Polygon;

use crate::utils::arg_range::AxisRange;

#[derive(Clone,Debug,PartialEq)]
pub(crate) struct Extent {
    pub(crate) height: f64,
    pub(crate) width: f64,
    pub(crate) south: f64,
    pub(crate) west: f64,
}

impl Extent {

    pub(crate) fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        let width = east - west;
        let height = north - south;
        Self {
            height,
            width,
            south,
            west
        }
    }

    /// The ranges are taken as given, so a reversed range gives a negative width or height.
    pub(crate) fn from_ranges(x_range: AxisRange, y_range: AxisRange) -> Self {
        Self::new(x_range.start,y_range.start,x_range.end,y_range.end)
    }

    pub(crate) fn east(&self) -> f64 {
        self.west + self.width
    }

    pub(crate) fn north(&self) -> f64 {
        self.south + self.height
    }

    /// Builds the rectangle clockwise starting at the top left corner.
    pub(crate) fn create_polygon(&self) -> Polygon {
        let north = self.north();
        let east = self.east();
        let vertices = vec![
            (self.west,north),
            (east,north),
            (east,self.south),
            (self.west,self.south),
            (self.west,north),
        ];
        Polygon::new(LineString::from(vertices),Vec::new())
    }

}

#[cfg(test)]
mod test {
    use geo::Area as _;
    use geo_types::Coord;

    use super::Extent;
    use crate::utils::arg_range::AxisRange;

    #[test]
    fn test_rectangle_starts_top_left_clockwise() {
        let extent = Extent::from_ranges(AxisRange::new(28.688,28.78),AxisRange::new(60.69,60.738));
        let polygon = extent.create_polygon();
        let ring: Vec<Coord> = polygon.exterior().0.clone();
        assert_eq!(ring.len(),5);
        assert_eq!(ring[0],Coord { x: 28.688, y: 60.738 });
        assert_eq!(ring[1],Coord { x: 28.78, y: 60.738 });
        assert_eq!(ring[2],Coord { x: 28.78, y: 60.69 });
        assert_eq!(ring[3],Coord { x: 28.688, y: 60.69 });
        assert_eq!(ring[4],ring[0]);
        // clockwise rings have a negative signed area
        assert!(polygon.signed_area() < 0.0);
    }
}
