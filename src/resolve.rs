// Copyright 2026 Oxide Computer Company

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::trace;

use crate::{
    RefError,
    context::{Context, Contextual},
    schema::SchemaNode,
};

/// Property schemas to check, keyed by property name, in declaration order.
/// Each schema carries the context of the fragment that declared it.
pub(crate) type Properties<'a> = IndexMap<&'a str, Contextual<'a, SchemaNode<'a>>>;

/// Look up a local reference (`#/a/b/c`) in `document`.
pub(crate) fn resolve_ref<'a>(document: &'a Value, reference: &str) -> Result<&'a Value, RefError> {
    let pointer = reference
        .strip_prefix('#')
        .filter(|pointer| pointer.is_empty() || pointer.starts_with('/'))
        .ok_or_else(|| RefError::Unsupported {
            reference: reference.to_string(),
        })?;

    document
        .pointer(pointer)
        .ok_or_else(|| RefError::Unresolved {
            reference: reference.to_string(),
        })
}

impl<'a> Contextual<'a, SchemaNode<'a>> {
    /// Follow `$ref`s until reaching a fragment that is not a reference.
    pub(crate) fn resolve(&self) -> Result<Contextual<'a, SchemaNode<'a>>, RefError> {
        let mut context = self.context().clone();
        let mut node = **self;

        while let Some(reference) = node.reference() {
            context = context.push(reference)?;
            if context.schema.contains_cycle() {
                return Err(RefError::Cycle {
                    chain: context.schema.to_string(),
                });
            }
            trace!(reference, "following reference");
            node = SchemaNode::new(resolve_ref(context.document, reference)?);
        }

        Ok(Contextual::new(context, node))
    }

    /// The properties this fragment declares, directly or through `allOf`.
    ///
    /// Returns `None` if the fragment has neither.
    pub(crate) fn properties_to_check(&self) -> Result<Option<Properties<'a>>, RefError> {
        if let Some(properties) = self.properties() {
            Ok(Some(declared(self.context(), properties).collect()))
        } else if let Some(all_of) = self.all_of() {
            let mut merged = Properties::new();
            flatten_all_of(&self.context().append("allOf"), all_of, &mut merged)?;
            Ok(Some(merged))
        } else {
            Ok(None)
        }
    }
}

/// Merge the properties of every `allOf` member into `merged`, in list order,
/// later members overwriting earlier ones.
///
/// Members may be references or nested `allOf`s; members with neither
/// `properties` nor `allOf` contribute nothing.
pub(crate) fn flatten_all_of<'a>(
    context: &Context<'a>,
    all_of: &'a [Value],
    merged: &mut Properties<'a>,
) -> Result<(), RefError> {
    for (idx, member) in all_of.iter().enumerate() {
        let member = Contextual::new(context.append(&idx.to_string()), SchemaNode::new(member));
        let member = member.resolve()?;

        if let Some(properties) = member.properties() {
            merged.extend(declared(member.context(), properties));
        } else if let Some(nested) = member.all_of() {
            flatten_all_of(&member.context().append("allOf"), nested, merged)?;
        }
    }

    Ok(())
}

fn declared<'a>(
    context: &Context<'a>,
    properties: &'a Map<String, Value>,
) -> impl Iterator<Item = (&'a str, Contextual<'a, SchemaNode<'a>>)> {
    let context = context.append("properties");
    properties.iter().map(move |(name, schema)| {
        (
            name.as_str(),
            Contextual::new(context.append(name), SchemaNode::new(schema)),
        )
    })
}
