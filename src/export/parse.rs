use crate::error::ExportError;
use crate::export::associations::{AssociationMode, process_associations};
use crate::export::connectivity::process_connectivity;
use crate::export::features::process_features;
use crate::export::raw::{RawAssociation, RawConnectivity, RawFeature};
use crate::export::{ParsedExport, SourceMapping};
use crate::value::AttrValue;
use indexmap::IndexMap;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde_json::Value;
use std::fmt;
use std::io::{BufReader, Read};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Group edge segments per feature (ordered by position) instead of
    /// keying each segment by its full position range.
    pub stitch_geometries: bool,
    pub association_mode: AssociationMode,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            stitch_geometries: true,
            association_mode: AssociationMode::default(),
        }
    }
}

/// Read an export document and build the canonical collections.
///
/// The top-level object is read in one forward pass. Recognized properties:
/// `sourceMapping`, `featureElements`, `connectivity`, `associations`,
/// `controllers`, `resultTypes`; anything else is skipped.
///
/// Any structural failure (not an object, a property with no value, an
/// unreadable or truncated stream) yields [`ExportError::MalformedInput`];
/// use [`ExportError::into_empty`] to continue with empty collections.
pub fn parse_export<R: Read>(reader: R, options: &ParseOptions) -> Result<ParsedExport, ExportError> {
    let mut de = serde_json::Deserializer::from_reader(BufReader::new(reader));
    // Only whitespace may follow the top-level object.
    let read = (&mut de)
        .deserialize_map(SectionsVisitor)
        .and_then(|sections| de.end().map(|()| sections));
    let sections = match read {
        Ok(sections) => sections,
        Err(err) => {
            warn!(error = %err, "export could not be read");
            return Err(err.into());
        }
    };

    let mut summary = String::new();

    let feature_tables = process_features(
        &sections.feature_elements,
        &sections.source_mapping,
        options.stitch_geometries,
    );
    summary.push_str(&feature_tables.summary);

    let connectivity_tables = process_connectivity(&sections.connectivity);
    summary.push_str(&connectivity_tables.summary);

    let association_tables = process_associations(&sections.associations, options.association_mode);
    summary.push_str(&association_tables.summary);

    info!(
        features = feature_tables.features.len(),
        connections = connectivity_tables.adjacency.len(),
        associations = association_tables.associations.len(),
        "parsed export"
    );

    Ok(ParsedExport {
        features: feature_tables.features,
        points: feature_tables.points,
        lines: feature_tables.lines,
        connectivity: connectivity_tables.adjacency,
        associations: association_tables.associations,
        connectivity_geometries: connectivity_tables.geometries,
        source_mapping: sections.source_mapping,
        controllers: sections.controllers,
        result_types: sections.result_types,
        summary,
    })
}

/// Raw arrays collected from the top-level object.
#[derive(Debug, Default)]
struct Sections {
    source_mapping: SourceMapping,
    feature_elements: Vec<RawFeature>,
    connectivity: Vec<RawConnectivity>,
    associations: Vec<RawAssociation>,
    controllers: Vec<Value>,
    result_types: Vec<Value>,
}

struct SectionsVisitor;

impl<'de> Visitor<'de> for SectionsVisitor {
    type Value = Sections;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an export object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Sections, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut sections = Sections::default();

        while let Some(property) = map.next_key::<String>()? {
            match property.as_str() {
                "sourceMapping" => {
                    let raw: Option<IndexMap<String, AttrValue>> = map.next_value()?;
                    for (id, name) in raw.into_iter().flatten() {
                        let id = id.trim().parse::<i64>().map_err(|_| {
                            <A::Error as de::Error>::custom(format!(
                                "sourceMapping key {:?} is not an integer",
                                id
                            ))
                        })?;
                        sections.source_mapping.insert(id, name.to_string());
                    }
                }
                "featureElements" => sections.feature_elements.extend(next_array(&mut map)?),
                "connectivity" => sections.connectivity.extend(next_array(&mut map)?),
                "associations" => sections.associations.extend(next_array(&mut map)?),
                "controllers" => sections.controllers.extend(next_array(&mut map)?),
                "resultTypes" => sections.result_types.extend(next_array(&mut map)?),
                other => {
                    debug!(property = other, "ignoring unhandled export property");
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        Ok(sections)
    }
}

fn next_array<'de, A, T>(map: &mut A) -> Result<Vec<T>, A::Error>
where
    A: MapAccess<'de>,
    T: serde::Deserialize<'de>,
{
    Ok(map.next_value::<Option<Vec<T>>>()?.unwrap_or_default())
}
