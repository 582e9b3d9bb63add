//! Built-in renderer functions.
//!
//! One function per known type tag, each converting a fetched description
//! into a render tree. Renderers recurse through [`RenderContext::render_child`]
//! so nested typed values dispatch through the registry again without any
//! further remote fetch. Essential keys (an image's band list, a date's
//! millisecond value) are required and missing ones fail the render; cosmetic
//! keys degrade to placeholders or empty-state text.

use crate::error::{ProbeError, Result};
use crate::remote::Description;
use crate::render::format::format_epoch_ms;
use crate::render::registry::{Registry, RenderContext};
use crate::render::tag::{GeometryKind, TypeTag};
use crate::render::tree::{RenderNode, RenderTree, Section};

/// Scalars whose display form is at least this long render in their own
/// collapsed section instead of inline.
pub const INLINE_SCALAR_LIMIT: usize = 500;

/// Register every built-in renderer.
pub fn install_defaults(registry: &mut Registry) {
    registry.register_fn(
        [
            TypeTag::String,
            TypeTag::Number,
            TypeTag::Boolean,
            TypeTag::Null,
        ],
        render_scalar,
    );
    registry.register_fn([TypeTag::Dictionary, TypeTag::List], render_container);
    registry.register_fn([TypeTag::Image], render_image);
    registry.register_fn([TypeTag::Date], render_date);
    registry.register_fn([TypeTag::DateRange], render_date_range);
    registry.register_fn(GeometryKind::ALL.map(TypeTag::Geometry), render_geometry);
    registry.register_fn([TypeTag::Feature], render_feature);
    registry.register_fn([TypeTag::FeatureCollection], render_feature_collection);
    registry.register_fn([TypeTag::ImageCollection], render_image_collection);
}

/// Single leaf: text, or a hyperlink for URL-shaped strings.
pub fn render_scalar(_ctx: &RenderContext<'_>, description: &Description) -> Result<RenderTree> {
    Ok(RenderTree::leaf(scalar_node(description)))
}

/// Ordered tree for mappings and sequences.
pub fn render_container(ctx: &RenderContext<'_>, description: &Description) -> Result<RenderTree> {
    Ok(RenderTree::new(render_structure(ctx, description)?))
}

/// Image: id header, one line per band, properties.
pub fn render_image(ctx: &RenderContext<'_>, description: &Description) -> Result<RenderTree> {
    let mut nodes = Vec::new();

    match description.get("id").and_then(Description::as_str) {
        Some(id) => nodes.push(RenderNode::field("Image id", id)),
        None => nodes.push(RenderNode::text("No Image ID")),
    }

    let bands = description
        .get("bands")
        .and_then(Description::as_array)
        .ok_or_else(|| ProbeError::description("Image description missing bands"))?;
    let band_lines = bands.iter().map(band_line).collect();
    nodes.push(RenderNode::Section(Section::new("Bands", band_lines)));

    nodes.push(properties_section(
        ctx,
        description,
        "Properties",
        "Image has no properties",
    )?);

    Ok(RenderTree::new(nodes))
}

/// `name (precision) min to max - crs`, declaration order, `?` for gaps.
fn band_line(band: &Description) -> RenderNode {
    let name = band.get("id").and_then(Description::as_str).unwrap_or("?");
    let data_type = band.get("data_type");
    let precision = data_type
        .and_then(|dt| dt.get("precision"))
        .and_then(Description::as_str)
        .unwrap_or("?");
    let min = display_or_question(data_type.and_then(|dt| dt.get("min")));
    let max = display_or_question(data_type.and_then(|dt| dt.get("max")));
    let crs = band.get("crs").and_then(Description::as_str).unwrap_or("?");

    RenderNode::text(format!("{name} ({precision}) {min} to {max} - {crs}"))
}

/// Date: single ISO text leaf from the epoch-millisecond `value` key.
pub fn render_date(_ctx: &RenderContext<'_>, description: &Description) -> Result<RenderTree> {
    let ms = description
        .get("value")
        .and_then(Description::as_i64)
        .ok_or_else(|| ProbeError::description("Date description missing millisecond value"))?;
    let text = format_epoch_ms(ms).ok_or_else(|| {
        ProbeError::description(format!("Date value {ms} outside representable range"))
    })?;
    Ok(RenderTree::leaf(RenderNode::text(text)))
}

/// Date range: `start to end` from the two-element `dates` pair.
pub fn render_date_range(
    _ctx: &RenderContext<'_>,
    description: &Description,
) -> Result<RenderTree> {
    let dates = description
        .get("dates")
        .and_then(Description::as_array)
        .ok_or_else(|| ProbeError::description("DateRange description missing dates"))?;
    let [start, end] = dates.as_slice() else {
        return Err(ProbeError::description(
            "DateRange dates must hold exactly two values",
        ));
    };
    let text = format!("{} to {}", epoch_text(start)?, epoch_text(end)?);
    Ok(RenderTree::leaf(RenderNode::text(text)))
}

fn epoch_text(value: &Description) -> Result<String> {
    let ms = value
        .as_i64()
        .ok_or_else(|| ProbeError::description("DateRange bound is not a millisecond value"))?;
    format_epoch_ms(ms).ok_or_else(|| {
        ProbeError::description(format!("DateRange bound {ms} outside representable range"))
    })
}

/// Geometry: a `coordinates` section; multis get one indexed block per
/// component, simple kinds show the raw coordinate tuple.
pub fn render_geometry(_ctx: &RenderContext<'_>, description: &Description) -> Result<RenderTree> {
    let kind = geometry_kind(description)?;
    let coordinates = description
        .get("coordinates")
        .ok_or_else(|| ProbeError::description("Geometry description missing coordinates"))?;

    let children = if kind.is_multi() {
        let parts = coordinates.as_array().ok_or_else(|| {
            ProbeError::description(format!("{} coordinates must be an array", kind.as_str()))
        })?;
        parts
            .iter()
            .enumerate()
            .map(|(index, part)| {
                RenderNode::Section(Section::new(
                    index.to_string(),
                    vec![RenderNode::text(part.to_string())],
                ))
            })
            .collect()
    } else {
        vec![RenderNode::text(coordinates.to_string())]
    };

    Ok(RenderTree::leaf(RenderNode::Section(Section::new(
        "coordinates",
        children,
    ))))
}

fn geometry_kind(description: &Description) -> Result<GeometryKind> {
    let name = description
        .get("type")
        .and_then(Description::as_str)
        .ok_or_else(|| ProbeError::description("Geometry description missing type"))?;
    match TypeTag::parse(name) {
        TypeTag::Geometry(kind) => Ok(kind),
        _ => Err(ProbeError::description(format!(
            "{name} is not a geometry type"
        ))),
    }
}

/// Feature: optional id, geometry section (dispatched through the registry),
/// properties section.
pub fn render_feature(ctx: &RenderContext<'_>, description: &Description) -> Result<RenderTree> {
    let mut nodes = Vec::new();

    if let Some(id) = description.get("id").and_then(Description::as_str) {
        nodes.push(RenderNode::field("Feature id", id));
    }

    let geometry_children = match description.get("geometry") {
        Some(geometry) if geometry.is_object() => ctx.render_child(geometry)?.nodes,
        _ => vec![RenderNode::text("No geometry")],
    };
    nodes.push(RenderNode::Section(Section::new(
        "geometry",
        geometry_children,
    )));

    nodes.push(properties_section(
        ctx,
        description,
        "properties",
        "Feature has no properties",
    )?);

    Ok(RenderTree::new(nodes))
}

/// Feature collection: id, column schema, properties, indexed features.
pub fn render_feature_collection(
    ctx: &RenderContext<'_>,
    description: &Description,
) -> Result<RenderTree> {
    let mut nodes = vec![collection_id_node(description)];

    let column_children = match description.get("columns") {
        Some(columns) if columns.as_object().is_some_and(|map| !map.is_empty()) => {
            render_structure(ctx, columns)?
        }
        _ => vec![RenderNode::text("No columns")],
    };
    nodes.push(RenderNode::Section(Section::new("Columns", column_children)));

    nodes.push(properties_section(
        ctx,
        description,
        "Properties",
        "FeatureCollection has no properties",
    )?);

    nodes.push(element_section(
        ctx,
        description,
        "Features",
        "No features",
    )?);

    Ok(RenderTree::new(nodes))
}

/// Image collection: id, properties, indexed images. The service reports the
/// contained images under the `features` key.
pub fn render_image_collection(
    ctx: &RenderContext<'_>,
    description: &Description,
) -> Result<RenderTree> {
    let mut nodes = vec![collection_id_node(description)];

    nodes.push(properties_section(
        ctx,
        description,
        "Properties",
        "ImageCollection has no properties",
    )?);

    nodes.push(element_section(ctx, description, "Images", "No images")?);

    Ok(RenderTree::new(nodes))
}

fn collection_id_node(description: &Description) -> RenderNode {
    match description.get("id").and_then(Description::as_str) {
        Some(id) => RenderNode::field("Collection id", id),
        None => RenderNode::text("No Collection ID"),
    }
}

/// Titled section with one sub-node per contained element, titled by its
/// position index, source order.
fn element_section(
    ctx: &RenderContext<'_>,
    description: &Description,
    title: &str,
    empty_text: &str,
) -> Result<RenderNode> {
    let children = match description.get("features").and_then(Description::as_array) {
        Some(elements) if !elements.is_empty() => elements
            .iter()
            .enumerate()
            .map(|(index, element)| {
                Ok(RenderNode::Section(Section::new(
                    index.to_string(),
                    ctx.render_child(element)?.nodes,
                )))
            })
            .collect::<Result<Vec<_>>>()?,
        _ => vec![RenderNode::text(empty_text)],
    };
    Ok(RenderNode::Section(Section::new(title, children)))
}

fn properties_section(
    ctx: &RenderContext<'_>,
    description: &Description,
    title: &str,
    empty_text: &str,
) -> Result<RenderNode> {
    let children = match description.get("properties") {
        Some(properties) if properties.as_object().is_some_and(|map| !map.is_empty()) => {
            render_structure(ctx, properties)?
        }
        _ => vec![RenderNode::text(empty_text)],
    };
    Ok(RenderNode::Section(Section::new(title, children)))
}

/// Generic structural rendering shared by the container renderer and the
/// registry-miss fallback. Mappings render key-sorted, sequences in index
/// order; short scalars inline as fields, long scalars and nested containers
/// get a collapsed titled section.
pub(crate) fn render_structure(
    ctx: &RenderContext<'_>,
    description: &Description,
) -> Result<Vec<RenderNode>> {
    match description {
        Description::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            keys.into_iter()
                .map(|key| entry_node(ctx, key, &map[key]))
                .collect()
        }
        Description::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| entry_node(ctx, &index.to_string(), item))
            .collect(),
        other => Ok(vec![scalar_node(other)]),
    }
}

fn entry_node(ctx: &RenderContext<'_>, label: &str, value: &Description) -> Result<RenderNode> {
    if value.is_object() || value.is_array() {
        let subtree = ctx.render_child(value)?;
        return Ok(RenderNode::Section(Section::new(label, subtree.nodes)));
    }

    let display = scalar_display(value);
    if display.chars().count() < INLINE_SCALAR_LIMIT {
        Ok(RenderNode::field(label, display))
    } else {
        Ok(RenderNode::Section(Section::new(
            label,
            vec![scalar_node(value)],
        )))
    }
}

/// Leaf node for a scalar: hyperlink for URL-shaped strings, text otherwise.
pub(crate) fn scalar_node(value: &Description) -> RenderNode {
    match value {
        Description::String(text) if is_link(text) => RenderNode::link(text.as_str()),
        Description::String(text) => RenderNode::text(text.as_str()),
        other => RenderNode::text(other.to_string()),
    }
}

/// Display form of a scalar; strings show bare, everything else as JSON.
fn scalar_display(value: &Description) -> String {
    match value {
        Description::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn display_or_question(value: Option<&Description>) -> String {
    value.map(scalar_display).unwrap_or_else(|| "?".to_string())
}

fn is_link(text: &str) -> bool {
    text.starts_with("http") || text.starts_with("www")
}
