//! Association (containment/attachment) processing.

use crate::export::grouped;
use crate::export::raw::RawAssociation;
use crate::key::FeatureKey;
use crate::value::AttrValue;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Write as _;

pub type AssociationMap = IndexMap<FeatureKey, Vec<Association>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Association {
    pub association_type: AttrValue,
    pub other: FeatureKey,
}

/// Which endpoint each side of an association records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AssociationMode {
    /// Both sides record the `to` endpoint, matching how exports have
    /// historically been read.
    #[default]
    AsExported,
    /// Each side records the opposite endpoint.
    Mirrored,
}

#[derive(Debug, Clone, Default)]
pub struct AssociationTables {
    pub associations: AssociationMap,
    pub summary: String,
}

pub fn process_associations(records: &[RawAssociation], mode: AssociationMode) -> AssociationTables {
    let mut associations = AssociationMap::new();

    let mut summary = String::new();
    let _ = writeln!(summary, "Association elements #{}", grouped(records.len()));

    let keyed: Vec<(FeatureKey, FeatureKey, &AttrValue)> = records
        .iter()
        .map(|r| {
            (
                FeatureKey::new(&r.from_network_source_id, &r.from_global_id),
                FeatureKey::new(&r.to_network_source_id, &r.to_global_id),
                &r.association_type,
            )
        })
        .collect();

    let unique_pairs: HashSet<(&FeatureKey, &FeatureKey)> =
        keyed.iter().map(|(from, to, _)| (from, to)).collect();
    let _ = writeln!(summary, "Unique association elements #{}", grouped(unique_pairs.len()));

    for (from_key, to_key, association_type) in &keyed {
        let to_other = match mode {
            AssociationMode::AsExported => to_key,
            AssociationMode::Mirrored => from_key,
        };

        associations
            .entry(from_key.clone())
            .or_default()
            .push(Association {
                association_type: (*association_type).clone(),
                other: to_key.clone(),
            });
        associations
            .entry(to_key.clone())
            .or_default()
            .push(Association {
                association_type: (*association_type).clone(),
                other: to_other.clone(),
            });
    }

    let _ = writeln!(summary, "Exploded from/to associations #{}", grouped(associations.len()));

    AssociationTables {
        associations,
        summary,
    }
}
