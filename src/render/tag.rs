//! Type tags reported by the remote service.
//!
//! Descriptions carry their server-side type as a plain string under the
//! `type` key. Dispatch keys on a parsed sum type instead of raw strings so
//! matches are exhaustive and aliases normalise in exactly one place; strings
//! the engine has never heard of survive as [`TypeTag::Other`] rather than
//! failing the job.

use std::fmt;

/// Geometry flavour carried by a [`TypeTag::Geometry`] tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    LinearRing,
    Polygon,
    MultiPolygon,
    Rectangle,
}

impl GeometryKind {
    /// All kinds, for bulk renderer registration
    pub const ALL: [GeometryKind; 8] = [
        GeometryKind::Point,
        GeometryKind::MultiPoint,
        GeometryKind::LineString,
        GeometryKind::MultiLineString,
        GeometryKind::LinearRing,
        GeometryKind::Polygon,
        GeometryKind::MultiPolygon,
        GeometryKind::Rectangle,
    ];

    /// Multi variants hold one coordinate block per component
    pub fn is_multi(self) -> bool {
        matches!(
            self,
            GeometryKind::MultiPoint | GeometryKind::MultiLineString | GeometryKind::MultiPolygon
        )
    }

    /// Canonical server-side name
    pub fn as_str(self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::LineString => "LineString",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::LinearRing => "LinearRing",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::Rectangle => "Rectangle",
        }
    }
}

/// Parsed server-reported (or locally derived) type of a dispatched object.
///
/// `Other` carries the raw string for tags without a built-in renderer, so
/// extension renderers can claim them and the generic fallback can still
/// label its output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Image,
    ImageCollection,
    Feature,
    FeatureCollection,
    Geometry(GeometryKind),
    Date,
    DateRange,
    Dictionary,
    List,
    String,
    Number,
    Boolean,
    Null,
    /// Server string with no dedicated variant
    Other(String),
}

impl TypeTag {
    /// Parse a server or local type name, normalising known aliases.
    ///
    /// The service reports container types with client-language names in some
    /// API revisions (`dict`, `list`, `str`, `int`, `float`); all spellings
    /// collapse onto one tag each.
    pub fn parse(name: &str) -> Self {
        match name {
            "Image" => TypeTag::Image,
            "ImageCollection" => TypeTag::ImageCollection,
            "Feature" => TypeTag::Feature,
            "FeatureCollection" => TypeTag::FeatureCollection,
            "Point" => TypeTag::Geometry(GeometryKind::Point),
            "MultiPoint" => TypeTag::Geometry(GeometryKind::MultiPoint),
            "LineString" => TypeTag::Geometry(GeometryKind::LineString),
            "MultiLineString" => TypeTag::Geometry(GeometryKind::MultiLineString),
            "LinearRing" => TypeTag::Geometry(GeometryKind::LinearRing),
            "Polygon" => TypeTag::Geometry(GeometryKind::Polygon),
            "MultiPolygon" => TypeTag::Geometry(GeometryKind::MultiPolygon),
            "Rectangle" => TypeTag::Geometry(GeometryKind::Rectangle),
            "Date" => TypeTag::Date,
            "DateRange" => TypeTag::DateRange,
            "Dictionary" | "dict" => TypeTag::Dictionary,
            "List" | "list" | "tuple" => TypeTag::List,
            "String" | "str" => TypeTag::String,
            "Number" | "int" | "float" => TypeTag::Number,
            "Boolean" | "bool" => TypeTag::Boolean,
            "Null" | "NoneType" => TypeTag::Null,
            other => TypeTag::Other(other.to_string()),
        }
    }

    /// Canonical name, the inverse of [`TypeTag::parse`] for non-alias inputs
    pub fn as_str(&self) -> &str {
        match self {
            TypeTag::Image => "Image",
            TypeTag::ImageCollection => "ImageCollection",
            TypeTag::Feature => "Feature",
            TypeTag::FeatureCollection => "FeatureCollection",
            TypeTag::Geometry(kind) => kind.as_str(),
            TypeTag::Date => "Date",
            TypeTag::DateRange => "DateRange",
            TypeTag::Dictionary => "Dictionary",
            TypeTag::List => "List",
            TypeTag::String => "String",
            TypeTag::Number => "Number",
            TypeTag::Boolean => "Boolean",
            TypeTag::Null => "Null",
            TypeTag::Other(name) => name,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tags() {
        assert_eq!(TypeTag::parse("Image"), TypeTag::Image);
        assert_eq!(TypeTag::parse("FeatureCollection"), TypeTag::FeatureCollection);
        assert_eq!(
            TypeTag::parse("MultiPolygon"),
            TypeTag::Geometry(GeometryKind::MultiPolygon)
        );
        assert_eq!(TypeTag::parse("DateRange"), TypeTag::DateRange);
    }

    #[test]
    fn test_parse_aliases_collapse() {
        assert_eq!(TypeTag::parse("dict"), TypeTag::Dictionary);
        assert_eq!(TypeTag::parse("Dictionary"), TypeTag::Dictionary);
        assert_eq!(TypeTag::parse("list"), TypeTag::List);
        assert_eq!(TypeTag::parse("tuple"), TypeTag::List);
        assert_eq!(TypeTag::parse("str"), TypeTag::String);
        assert_eq!(TypeTag::parse("int"), TypeTag::Number);
        assert_eq!(TypeTag::parse("float"), TypeTag::Number);
    }

    #[test]
    fn test_unknown_tag_survives() {
        let tag = TypeTag::parse("Classifier");
        assert_eq!(tag, TypeTag::Other("Classifier".to_string()));
        assert_eq!(tag.as_str(), "Classifier");
        assert_eq!(tag.to_string(), "Classifier");
    }

    #[test]
    fn test_multi_detection() {
        assert!(GeometryKind::MultiPoint.is_multi());
        assert!(GeometryKind::MultiPolygon.is_multi());
        assert!(!GeometryKind::Point.is_multi());
        assert!(!GeometryKind::Rectangle.is_multi());
    }
}
