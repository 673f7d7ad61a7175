use super::{
    Field, Model, ModelId, Name, NestedAttributes, NestedOptions, Predicate, Relation,
    RelationKind, Schema,
};
use crate::{stmt, stmt::Record, Error, Result};

use indexmap::IndexMap;
use std::{collections::HashSet, sync::Arc};

/// Collects model definitions and nested attributes registrations, then
/// resolves them into a [`Schema`].
#[derive(Debug, Default)]
pub struct Builder {
    models: Vec<ModelBuilder>,

    /// Prepended to every derived table name
    table_name_prefix: Option<String>,
}

/// Definition of one model before resolution.
pub struct ModelBuilder {
    name: Name,
    table_name: Option<String>,
    primary_key: String,
    fields: Vec<Field>,
    relations: Vec<RelationDef>,
    predicates: IndexMap<String, Predicate>,
}

#[derive(Debug)]
struct RelationDef {
    name: String,
    kind: RelationKind,
    target: String,
    foreign_key: String,
    nested: Option<NestedAttributes>,
}

impl Builder {
    pub fn register(&mut self, model: ModelBuilder) -> &mut Self {
        self.models.push(model);
        self
    }

    /// Set the table name prefix for all tables
    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.table_name_prefix = Some(prefix.to_string());
        self
    }

    /// Enables nested attributes for `relation` on `model`.
    ///
    /// The model must already be registered. Options are validated and
    /// resolved immediately; a relation may only be registered once.
    pub fn nested_attributes(
        &mut self,
        model: &str,
        relation: &str,
        options: NestedOptions,
    ) -> Result<&mut Self> {
        let Some(parent) = self.models.iter_mut().find(|m| m.name.as_str() == model) else {
            return Err(Error::invalid_argument(format!("unknown model `{model}`")));
        };

        // Resolution needs the parent's predicates; borrow them through a
        // lightweight model view.
        let view = parent.predicate_view();

        let Some(def) = parent.relations.iter_mut().find(|r| r.name == relation) else {
            return Err(Error::invalid_argument(format!(
                "no relation named `{relation}` on model `{model}`"
            )));
        };

        if def.nested.is_some() {
            return Err(Error::invalid_options(format!(
                "nested attributes already registered for `{model}.{relation}`"
            )));
        }

        def.nested = Some(options.resolve(&view, relation, def.kind)?);
        Ok(self)
    }

    pub fn build(self) -> Result<Schema> {
        let mut names = HashSet::new();
        for model in &self.models {
            if !names.insert(model.name.as_str()) {
                return Err(Error::invalid_schema(format!(
                    "duplicate model `{}`",
                    model.name
                )));
            }
        }

        let ids: IndexMap<&str, ModelId> = self
            .models
            .iter()
            .enumerate()
            .map(|(index, model)| (model.name.as_str(), ModelId(index)))
            .collect();

        // Resolve relations before consuming the builders so foreign keys
        // can be checked against target fields.
        let mut resolved = vec![];
        for model in &self.models {
            let mut relations = vec![];
            for def in &model.relations {
                let Some(&target) = ids.get(def.target.as_str()) else {
                    return Err(Error::invalid_schema(format!(
                        "relation `{}.{}` targets unknown model `{}`",
                        model.name, def.name, def.target
                    )));
                };

                let target_model = &self.models[target.0];
                match target_model.fields.iter().find(|f| f.name == def.foreign_key) {
                    Some(field) if field.ty == stmt::Type::I64 => {}
                    Some(_) => {
                        return Err(Error::invalid_schema(format!(
                            "foreign key `{}.{}` must be an integer field",
                            def.target, def.foreign_key
                        )))
                    }
                    None => {
                        return Err(Error::invalid_schema(format!(
                            "relation `{}.{}` uses foreign key `{}`, which is not a field of `{}`",
                            model.name, def.name, def.foreign_key, def.target
                        )))
                    }
                }

                relations.push(Relation {
                    name: def.name.clone(),
                    kind: def.kind,
                    target,
                    foreign_key: def.foreign_key.clone(),
                    nested: def.nested.clone(),
                });
            }
            resolved.push(relations);
        }

        let prefix = self.table_name_prefix.unwrap_or_default();

        let models = self
            .models
            .into_iter()
            .zip(resolved)
            .enumerate()
            .map(|(index, (model, relations))| {
                let table_name = model
                    .table_name
                    .unwrap_or_else(|| model.name.table_name());

                Model {
                    id: ModelId(index),
                    table_name: format!("{prefix}{table_name}"),
                    name: model.name,
                    primary_key: model.primary_key,
                    fields: model.fields,
                    relations,
                    predicates: model.predicates,
                }
            })
            .collect();

        Ok(Schema { models })
    }
}

impl ModelBuilder {
    pub fn new(name: impl Into<String>) -> ModelBuilder {
        ModelBuilder {
            name: Name::new(name),
            table_name: None,
            primary_key: "id".to_string(),
            fields: vec![],
            relations: vec![],
            predicates: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Overrides the derived table name.
    pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    /// Renames the integer primary key column (defaults to `id`).
    pub fn primary_key(mut self, name: impl Into<String>) -> Self {
        self.primary_key = name.into();
        self
    }

    #[track_caller]
    pub fn field(mut self, field: Field) -> Self {
        assert!(
            field.name != self.primary_key && self.fields.iter().all(|f| f.name != field.name),
            "duplicate field `{}` on model `{}`",
            field.name,
            self.name
        );
        self.fields.push(field);
        self
    }

    pub fn has_one(
        self,
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        self.relation(name.into(), RelationKind::HasOne, target.into(), foreign_key.into())
    }

    pub fn has_many(
        self,
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        self.relation(name.into(), RelationKind::HasMany, target.into(), foreign_key.into())
    }

    /// Registers a predicate `reject_if` guards can refer to by name.
    pub fn predicate(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&Record) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicates.insert(name.into(), Arc::new(f));
        self
    }

    #[track_caller]
    fn relation(
        mut self,
        name: String,
        kind: RelationKind,
        target: String,
        foreign_key: String,
    ) -> Self {
        assert!(
            self.relations.iter().all(|r| r.name != name),
            "duplicate relation `{}` on model `{}`",
            name,
            self.name
        );
        self.relations.push(RelationDef {
            name,
            kind,
            target,
            foreign_key,
            nested: None,
        });
        self
    }

    /// A model carrying only what option resolution reads.
    fn predicate_view(&self) -> Model {
        Model {
            id: ModelId(usize::MAX),
            name: self.name.clone(),
            table_name: String::new(),
            primary_key: self.primary_key.clone(),
            fields: vec![],
            relations: vec![],
            predicates: self.predicates.clone(),
        }
    }
}

impl std::fmt::Debug for ModelBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBuilder")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("relations", &self.relations)
            .field("predicates", &self.predicates.keys().collect::<Vec<_>>())
            .finish()
    }
}
