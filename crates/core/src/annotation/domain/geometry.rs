use std::fmt;
use std::str::FromStr;

/// Shape kind declared by an object class or carried by a label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeometryType {
    Bitmap,
    Rectangle,
    Polygon,
    Polyline,
    Point,
    /// Class-level wildcard: labels of any shape are accepted.
    Any,
}

impl GeometryType {
    pub fn as_str(self) -> &'static str {
        match self {
            GeometryType::Bitmap => "bitmap",
            GeometryType::Rectangle => "rectangle",
            GeometryType::Polygon => "polygon",
            GeometryType::Polyline => "line",
            GeometryType::Point => "point",
            GeometryType::Any => "any",
        }
    }

    /// Whether a label of shape `other` may belong to a class declaring `self`.
    pub fn accepts(self, other: GeometryType) -> bool {
        self == GeometryType::Any || self == other
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeometryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bitmap" => Ok(GeometryType::Bitmap),
            "rectangle" => Ok(GeometryType::Rectangle),
            "polygon" => Ok(GeometryType::Polygon),
            "line" | "polyline" => Ok(GeometryType::Polyline),
            "point" => Ok(GeometryType::Point),
            "any" => Ok(GeometryType::Any),
            other => Err(format!("unknown geometry type '{other}'")),
        }
    }
}

/// Pixel coordinate: `x` is the column, `y` the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Label shape.
///
/// Bitmap payloads are kept exactly as the platform encodes them; this crate
/// never decodes mask pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Bitmap {
        origin: Coord,
        data: String,
    },
    Rectangle {
        top: i32,
        left: i32,
        bottom: i32,
        right: i32,
    },
    Polygon {
        exterior: Vec<Coord>,
        interior: Vec<Vec<Coord>>,
    },
    Polyline {
        points: Vec<Coord>,
    },
    Point(Coord),
}

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Bitmap { .. } => GeometryType::Bitmap,
            Geometry::Rectangle { .. } => GeometryType::Rectangle,
            Geometry::Polygon { .. } => GeometryType::Polygon,
            Geometry::Polyline { .. } => GeometryType::Polyline,
            Geometry::Point(_) => GeometryType::Point,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::bitmap("bitmap", GeometryType::Bitmap)]
    #[case::rectangle("rectangle", GeometryType::Rectangle)]
    #[case::polygon("polygon", GeometryType::Polygon)]
    #[case::line("line", GeometryType::Polyline)]
    #[case::polyline_alias("polyline", GeometryType::Polyline)]
    #[case::point("point", GeometryType::Point)]
    #[case::any("any", GeometryType::Any)]
    fn test_parse_geometry_type(#[case] text: &str, #[case] expected: GeometryType) {
        assert_eq!(text.parse::<GeometryType>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_geometry_type() {
        assert!("cuboid".parse::<GeometryType>().is_err());
    }

    #[test]
    fn test_polyline_wire_name() {
        assert_eq!(GeometryType::Polyline.as_str(), "line");
    }

    #[test]
    fn test_any_accepts_every_shape() {
        assert!(GeometryType::Any.accepts(GeometryType::Bitmap));
        assert!(GeometryType::Any.accepts(GeometryType::Point));
    }

    #[test]
    fn test_concrete_type_accepts_only_itself() {
        assert!(GeometryType::Bitmap.accepts(GeometryType::Bitmap));
        assert!(!GeometryType::Bitmap.accepts(GeometryType::Rectangle));
    }

    #[test]
    fn test_geometry_reports_its_type() {
        let bitmap = Geometry::Bitmap {
            origin: Coord::new(0, 0),
            data: "eJw=".to_string(),
        };
        assert_eq!(bitmap.geometry_type(), GeometryType::Bitmap);
        assert_eq!(
            Geometry::Point(Coord::new(3, 4)).geometry_type(),
            GeometryType::Point
        );
    }
}
