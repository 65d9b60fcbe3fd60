//! Validation of resources, linkage, and query parameters.

use crate::document::{RelationshipData, Resource};
use crate::query::QueryParams;
use crate::schema::{Cardinality, RelationshipSchema, SchemaError, SchemaRegistry};

/// Whether a resource is being created or updated.
///
/// Read-only members may be set on creation. Updates reject them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    /// The resource is sent with `add-one`.
    Create,
    /// The resource is sent with `update-one`.
    Update,
}

/// Validates a resource about to be written.
///
/// Every attribute and relationship must be declared, relationship linkage
/// must match its cardinality and target type exactly, and in
/// [`WriteMode::Update`] read-only members must be absent.
///
/// # Errors
///
/// Returns the first [`SchemaError`] found.
pub fn validate_resource(
    registry: &SchemaRegistry,
    resource: &Resource,
    mode: WriteMode,
) -> Result<(), SchemaError> {
    let resource_type = resource.resource_type.as_str();
    let schema = registry.resource(resource_type)?;

    for name in resource.attributes.keys() {
        let attribute = schema
            .get_attribute(name)
            .ok_or_else(|| SchemaError::UnknownAttribute {
                resource_type: resource_type.to_string(),
                attribute: name.clone(),
            })?;
        if mode == WriteMode::Update && !attribute.mutable {
            return Err(SchemaError::ImmutableAttribute {
                resource_type: resource_type.to_string(),
                attribute: name.clone(),
            });
        }
    }

    for (name, relationship) in &resource.relationships {
        let declared = registry.relationship(resource_type, name)?;
        if mode == WriteMode::Update && !declared.mutable {
            return Err(SchemaError::ImmutableRelationship {
                resource_type: resource_type.to_string(),
                relationship: name.clone(),
            });
        }
        validate_linkage(resource_type, name, declared, &relationship.data, false)?;
    }

    Ok(())
}

/// Validates resources received from the server.
///
/// Checks the same members as [`validate_resource`], ignoring mutability. A
/// `null` linkage on a `single` relationship is accepted, since servers
/// report unset relationships that way.
///
/// # Errors
///
/// Returns the first [`SchemaError`] found.
pub fn validate_response<'a>(
    registry: &SchemaRegistry,
    resources: impl IntoIterator<Item = &'a Resource>,
) -> Result<(), SchemaError> {
    for resource in resources {
        let resource_type = resource.resource_type.as_str();
        let schema = registry.resource(resource_type)?;

        if let Some(name) = resource
            .attributes
            .keys()
            .find(|name| schema.get_attribute(name).is_none())
        {
            return Err(SchemaError::UnknownAttribute {
                resource_type: resource_type.to_string(),
                attribute: name.clone(),
            });
        }

        for (name, relationship) in &resource.relationships {
            let declared = registry.relationship(resource_type, name)?;
            validate_linkage(resource_type, name, declared, &relationship.data, true)?;
        }
    }

    Ok(())
}

/// Checks linkage against a relationship's cardinality and target type.
///
/// With `lenient_null`, a `single` relationship may carry `null`.
pub(crate) fn validate_linkage(
    resource_type: &str,
    relationship: &str,
    declared: &RelationshipSchema,
    data: &RelationshipData,
    lenient_null: bool,
) -> Result<(), SchemaError> {
    let found = match (declared.cardinality, data) {
        (Cardinality::Multiple, RelationshipData::Many(_))
        | (Cardinality::Single | Cardinality::Nullable, RelationshipData::One(Some(_)))
        | (Cardinality::Nullable, RelationshipData::One(None)) => None,
        (Cardinality::Single, RelationshipData::One(None)) if lenient_null => None,
        (_, RelationshipData::Many(_)) => Some("a list"),
        (_, RelationshipData::One(Some(_))) => Some("a single identifier"),
        (_, RelationshipData::One(None)) => Some("null"),
    };

    if let Some(found) = found {
        return Err(SchemaError::CardinalityMismatch {
            resource_type: resource_type.to_string(),
            relationship: relationship.to_string(),
            expected: declared.cardinality,
            found,
        });
    }

    if let Some(identifier) = data
        .identifiers()
        .iter()
        .find(|identifier| identifier.resource_type != declared.target)
    {
        return Err(SchemaError::TargetTypeMismatch {
            relationship: relationship.to_string(),
            expected: declared.target.clone(),
            found: identifier.resource_type.clone(),
        });
    }

    Ok(())
}

/// Validates query parameters for a request whose primary data has type
/// `resource_type`.
///
/// - every sparse fieldset type must be registered and name declared fields
/// - sort fields must be `id` or an attribute, optionally reached through
///   to-one relationships (`author.name`)
/// - include paths must follow declared relationships
///
/// Filters are server-defined and are not checked.
///
/// # Errors
///
/// Returns the first [`SchemaError`] found.
pub fn validate_query<P>(
    registry: &SchemaRegistry,
    resource_type: &str,
    params: &QueryParams<P>,
) -> Result<(), SchemaError> {
    registry.resource(resource_type)?;

    for (fieldset_type, names) in &params.fields {
        let schema = registry.resource(fieldset_type)?;
        if let Some(field) = names.iter().find(|name| !schema.has_field(name)) {
            return Err(SchemaError::UnknownField {
                resource_type: fieldset_type.clone(),
                field: field.clone(),
            });
        }
    }

    for term in params.sort.iter().flatten() {
        if !is_sortable(registry, resource_type, &term.field) {
            return Err(SchemaError::InvalidSortField {
                resource_type: resource_type.to_string(),
                field: term.field.clone(),
            });
        }
    }

    for path in &params.include {
        if walk(registry, resource_type, path.segments(), false).is_none() {
            return Err(SchemaError::InvalidIncludePath {
                resource_type: resource_type.to_string(),
                path: path.to_string(),
            });
        }
    }

    Ok(())
}

fn is_sortable(registry: &SchemaRegistry, resource_type: &str, field: &str) -> bool {
    let segments: Vec<String> = field.split('.').map(String::from).collect();
    let Some((attribute, relationships)) = segments.split_last() else {
        return false;
    };

    walk(registry, resource_type, relationships, true)
        .and_then(|target| registry.get(target))
        .is_some_and(|schema| attribute == "id" || schema.get_attribute(attribute).is_some())
}

/// Follows `segments` as relationship names starting at `resource_type`,
/// returning the type reached.
fn walk<'a>(
    registry: &'a SchemaRegistry,
    resource_type: &'a str,
    segments: &[String],
    to_one_only: bool,
) -> Option<&'a str> {
    let mut current = resource_type;
    for segment in segments {
        let declared = registry.get(current)?.get_relationship(segment)?;
        if to_one_only && declared.cardinality.is_many() {
            return None;
        }
        current = declared.target.as_str();
    }
    Some(current)
}
