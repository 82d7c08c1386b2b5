//! Struct/enum type declarations and their container

use super::field::{Enumerator, Field};
use super::field_mode::FieldMode;
use crate::error::IrError;
use crate::graph::{AdjacencyMatrix, SortError, topological_sort};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use tracing::debug;

/// Referenced type name that never contributes a dependency edge
const VOID_TYPE: &str = "void";

/// Where a declaration physically nests in the generated code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Namespace scope
    Root,
    /// Nested inside the model class
    ModelClass,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Root => write!(f, "root"),
            Location::ModelClass => write!(f, "model_class"),
        }
    }
}

/// Members of a type, never a mix of fields and enumerators
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypeMembers {
    Fields(Vec<Field>),
    Enumerators(Vec<Enumerator>),
}

impl TypeMembers {
    pub fn len(&self) -> usize {
        match self {
            TypeMembers::Fields(fields) => fields.len(),
            TypeMembers::Enumerators(enumerators) => enumerators.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn names(&self) -> Vec<&str> {
        match self {
            TypeMembers::Fields(fields) => fields.iter().map(|f| f.name.as_str()).collect(),
            TypeMembers::Enumerators(e) => e.iter().map(|e| e.name.as_str()).collect(),
        }
    }
}

/// A struct or enum declaration before it is placed in a [`TypeContainer`]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "TypeDefRecord")]
pub struct TypeDef {
    pub name: String,
    pub doc: String,
    pub location: Location,
    pub members: TypeMembers,
}

impl TypeDef {
    pub fn new_struct(name: impl Into<String>, location: Location, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            doc: String::new(),
            location,
            members: TypeMembers::Fields(fields),
        }
    }

    pub fn new_enum(
        name: impl Into<String>,
        location: Location,
        enumerators: Vec<Enumerator>,
    ) -> Self {
        Self {
            name: name.into(),
            doc: String::new(),
            location,
            members: TypeMembers::Enumerators(enumerators),
        }
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.members, TypeMembers::Enumerators(_))
    }
}

#[derive(Deserialize)]
struct TypeDefRecord {
    name: String,
    #[serde(default)]
    doc: String,
    location: Location,
    #[serde(default)]
    is_enum: bool,
    fields: Vec<MemberRecord>,
}

/// Either a field or an enumerator, resolved by the owner's `is_enum` flag
#[derive(Deserialize)]
struct MemberRecord {
    name: String,
    #[serde(default)]
    doc: String,
    #[serde(default)]
    mode: Option<FieldMode>,
    #[serde(default)]
    shape: Option<Vec<usize>>,
    #[serde(default, rename = "type")]
    type_name: Option<String>,
    #[serde(default)]
    value: Option<i64>,
}

impl TryFrom<TypeDefRecord> for TypeDef {
    type Error = IrError;

    fn try_from(record: TypeDefRecord) -> Result<Self, Self::Error> {
        let type_name = record.name;
        let mixed = |member: &str| IrError::InvalidType {
            name: type_name.clone(),
            reason: format!("member '{}' mixes field and enumerator attributes", member),
        };

        let members = if record.is_enum {
            let mut enumerators = Vec::with_capacity(record.fields.len());
            for m in record.fields {
                if m.mode.is_some() || m.shape.is_some() || m.type_name.is_some() {
                    return Err(mixed(&m.name));
                }
                let value = m.value.ok_or_else(|| IrError::InvalidType {
                    name: type_name.clone(),
                    reason: format!("enumerator '{}' has no value", m.name),
                })?;
                enumerators.push(Enumerator {
                    name: m.name,
                    doc: m.doc,
                    value,
                });
            }
            TypeMembers::Enumerators(enumerators)
        } else {
            let mut fields = Vec::with_capacity(record.fields.len());
            for m in record.fields {
                if m.value.is_some() {
                    return Err(mixed(&m.name));
                }
                let mode = m.mode.ok_or_else(|| IrError::invalid_field(&m.name, "missing mode"))?;
                fields.push(Field::new(m.name, m.doc, mode, m.shape, m.type_name)?);
            }
            TypeMembers::Fields(fields)
        };

        Ok(TypeDef {
            name: type_name,
            doc: record.doc,
            location: record.location,
            members,
        })
    }
}

/// A declaration placed in a [`TypeContainer`]
///
/// Carries its declaration index and the derived alias/binding names. Members are
/// immutable once placed, so the name lookup built at insertion stays valid.
#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    def: TypeDef,
    id: usize,
    alias_name: String,
    member_index: HashMap<String, usize>,
}

impl Type {
    fn assign(def: TypeDef, id: usize) -> Self {
        let member_index = def
            .members
            .names()
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), i))
            .collect();
        Self {
            def,
            id,
            alias_name: format!("SlxpyPodType_{}", id),
            member_index,
        }
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn doc(&self) -> &str {
        &self.def.doc
    }

    pub fn location(&self) -> Location {
        self.def.location
    }

    pub fn is_enum(&self) -> bool {
        self.def.is_enum()
    }

    pub fn members(&self) -> &TypeMembers {
        &self.def.members
    }

    /// Struct fields, empty for enums
    pub fn fields(&self) -> &[Field] {
        match &self.def.members {
            TypeMembers::Fields(fields) => fields,
            TypeMembers::Enumerators(_) => &[],
        }
    }

    /// Enumerators, empty for structs
    pub fn enumerators(&self) -> &[Enumerator] {
        match &self.def.members {
            TypeMembers::Enumerators(enumerators) => enumerators,
            TypeMembers::Fields(_) => &[],
        }
    }

    /// Declaration index inside the owning container
    pub fn id(&self) -> usize {
        self.id
    }

    /// Internal alias used by the generated bindings
    pub fn alias_name(&self) -> &str {
        &self.alias_name
    }

    pub fn binding_name(&self) -> &str {
        &self.def.name
    }

    pub fn binding_identifier(&self) -> String {
        format!("{}_PB", self.binding_name())
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.member_index.contains_key(name)
    }

    /// Look up a struct field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        let index = *self.member_index.get(name)?;
        self.fields().get(index)
    }

    pub fn into_def(self) -> TypeDef {
        self.def
    }
}

#[derive(Serialize)]
struct TypeView<'a> {
    name: &'a str,
    doc: &'a str,
    location: Location,
    is_enum: bool,
    fields: &'a TypeMembers,
    #[serde(rename = "_id")]
    id: usize,
    #[serde(rename = "_alias_name")]
    alias_name: &'a str,
    #[serde(rename = "_binding_name")]
    binding_name: &'a str,
    #[serde(rename = "_binding_identifier")]
    binding_identifier: String,
}

impl Serialize for Type {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TypeView {
            name: self.name(),
            doc: self.doc(),
            location: self.location(),
            is_enum: self.is_enum(),
            fields: self.members(),
            id: self.id,
            alias_name: &self.alias_name,
            binding_name: self.binding_name(),
            binding_identifier: self.binding_identifier(),
        }
        .serialize(serializer)
    }
}

/// Which total order to sort a container by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Referenced types before the types that embed them
    Dependency,
    /// Nesting containment, not supported
    Hierarchy,
}

/// Ordered collection of the types declared by one model
///
/// Types are keyed by qualified identity: bare name for [`Location::Root`],
/// `<model class identifier>::<name>` for [`Location::ModelClass`].
#[derive(Debug, Clone, PartialEq)]
pub struct TypeContainer {
    model_class_identifier: String,
    types: Vec<Type>,
    identities: HashMap<String, usize>,
}

impl TypeContainer {
    /// Place `defs` in declaration order, failing on duplicate qualified identities
    pub fn new(defs: Vec<TypeDef>, model_class_identifier: impl Into<String>) -> Result<Self, IrError> {
        let mut container = Self {
            model_class_identifier: model_class_identifier.into(),
            types: Vec::with_capacity(defs.len()),
            identities: HashMap::with_capacity(defs.len()),
        };
        for def in defs {
            container.add(def)?;
        }
        Ok(container)
    }

    fn add(&mut self, def: TypeDef) -> Result<(), IrError> {
        let identity = self.qualify(&def.name, def.location);
        if self.identities.contains_key(&identity) {
            return Err(IrError::DuplicateType(identity));
        }
        let index = self.types.len();
        self.identities.insert(identity, index);
        self.types.push(Type::assign(def, index));
        Ok(())
    }

    fn qualify(&self, name: &str, location: Location) -> String {
        match location {
            Location::Root => name.to_string(),
            Location::ModelClass => format!("{}::{}", self.model_class_identifier, name),
        }
    }

    /// Identifier of the model class this container belongs to
    pub fn model_class_identifier(&self) -> &str {
        &self.model_class_identifier
    }

    pub fn qualified_name(&self, ty: &Type) -> String {
        self.qualify(ty.name(), ty.location())
    }

    /// Find the first type with the given bare name
    pub fn lookup(&self, name: &str) -> Result<&Type, IrError> {
        self.types
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| IrError::TypeNotFound(name.to_string()))
    }

    /// Find a type by qualified identity
    pub fn get_qualified(&self, identity: &str) -> Option<&Type> {
        self.identities.get(identity).map(|&i| &self.types[i])
    }

    pub fn get(&self, index: usize) -> Option<&Type> {
        self.types.get(index)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Type> {
        self.types.iter()
    }

    pub fn in_root(&self) -> Vec<&Type> {
        self.types.iter().filter(|t| t.location() == Location::Root).collect()
    }

    pub fn in_model_class(&self) -> Vec<&Type> {
        self.types
            .iter()
            .filter(|t| t.location() == Location::ModelClass)
            .collect()
    }

    pub fn structs(&self) -> Vec<&Type> {
        self.types.iter().filter(|t| !t.is_enum()).collect()
    }

    pub fn enums(&self) -> Vec<&Type> {
        self.types.iter().filter(|t| t.is_enum()).collect()
    }

    /// Types ordered so that every referenced struct/enum precedes its users
    pub fn dependency_order(&self) -> Result<Vec<&Type>, IrError> {
        self.topo_sorted(SortOrder::Dependency)
    }

    /// Nested declaration order; nested struct hierarchies are not supported
    pub fn hierarchy_order(&self) -> Result<Vec<&Type>, IrError> {
        self.topo_sorted(SortOrder::Hierarchy)
    }

    pub fn topo_sorted(&self, order: SortOrder) -> Result<Vec<&Type>, IrError> {
        let matrix = match order {
            SortOrder::Dependency => self.dependency_matrix()?,
            SortOrder::Hierarchy => {
                return Err(IrError::NotImplemented(
                    "Hierarchy order is not implemented: nested struct hierarchy is dropped".to_string(),
                ));
            }
        };
        let indices = topological_sort(matrix).map_err(|e| match e {
            SortError::Cycle { members } => IrError::CircularDependency {
                types: members.iter().map(|&i| self.qualified_name(&self.types[i])).collect(),
            },
            other => IrError::Sort(other),
        })?;
        debug!(
            "Sorted {} types in {:?} order: {:?}",
            indices.len(),
            order,
            indices
        );
        Ok(indices.into_iter().map(|i| &self.types[i]).collect())
    }

    /// `matrix[row][col]` is set when type `col` embeds type `row` by value
    ///
    /// Only struct members add edges and must resolve to a declared type; a
    /// `void` reference is exempt. Enum and pointer members never constrain the
    /// order.
    fn dependency_matrix(&self) -> Result<AdjacencyMatrix, IrError> {
        let mut matrix = AdjacencyMatrix::new(self.types.len());
        for (col, ty) in self.types.iter().enumerate() {
            for field in ty.fields().iter().filter(|f| f.mode.is_struct()) {
                let Some(target) = field.type_name().filter(|t| *t != VOID_TYPE) else {
                    continue;
                };
                let row = self.resolve(target).ok_or_else(|| IrError::UnresolvedTypeReference {
                    owner: ty.name().to_string(),
                    field: field.name.clone(),
                    target: target.to_string(),
                })?;
                matrix.set(row, col);
            }
        }
        Ok(matrix)
    }

    /// Resolve a referenced name, trying it as a qualified identity first and then
    /// as a declaration nested in the model class
    fn resolve(&self, target: &str) -> Option<usize> {
        self.identities.get(target).copied().or_else(|| {
            self.identities
                .get(&self.qualify(target, Location::ModelClass))
                .copied()
        })
    }
}

impl Index<usize> for TypeContainer {
    type Output = Type;

    fn index(&self, index: usize) -> &Self::Output {
        &self.types[index]
    }
}

impl<'a> IntoIterator for &'a TypeContainer {
    type Item = &'a Type;
    type IntoIter = std::slice::Iter<'a, Type>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.iter()
    }
}

impl Serialize for TypeContainer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn struct_field(name: &str, target: &str) -> Field {
        Field::new(name, "", FieldMode::Struct, None, Some(target.to_string())).unwrap()
    }

    fn names<'a>(types: &[&'a Type]) -> Vec<&'a str> {
        types.iter().map(|t| t.name()).collect()
    }

    #[test]
    fn test_ids_and_aliases_follow_declaration_order() {
        let container = TypeContainer::new(
            vec![
                TypeDef::new_struct("A", Location::Root, vec![Field::plain("x")]),
                TypeDef::new_enum("Mode", Location::Root, vec![Enumerator::new("On", 1)]),
            ],
            "Model",
        )
        .unwrap();
        assert_eq!(container[0].id(), 0);
        assert_eq!(container[1].alias_name(), "SlxpyPodType_1");
        assert_eq!(container[0].binding_identifier(), "A_PB");
        assert!(container[1].is_enum());
        assert!(container[1].fields().is_empty());
        assert!(container[1].has_member("On"));
    }

    #[test]
    fn test_duplicate_identity_rejected() {
        let err = TypeContainer::new(
            vec![
                TypeDef::new_struct("A", Location::Root, vec![]),
                TypeDef::new_struct("A", Location::Root, vec![]),
            ],
            "Model",
        )
        .unwrap_err();
        assert!(matches!(err, IrError::DuplicateType(ref name) if name == "A"));
    }

    #[test]
    fn test_same_name_in_different_locations_allowed() {
        let container = TypeContainer::new(
            vec![
                TypeDef::new_struct("A", Location::Root, vec![]),
                TypeDef::new_struct("A", Location::ModelClass, vec![]),
            ],
            "Model",
        )
        .unwrap();
        assert!(container.get_qualified("A").is_some());
        assert_eq!(container.get_qualified("Model::A").unwrap().id(), 1);
        assert_eq!(container.in_root().len(), 1);
        assert_eq!(container.in_model_class().len(), 1);
    }

    #[test]
    fn test_dependency_order() {
        let container = TypeContainer::new(
            vec![
                TypeDef::new_struct("Outer", Location::Root, vec![struct_field("inner", "Inner")]),
                TypeDef::new_struct("Other", Location::Root, vec![Field::plain("x")]),
                TypeDef::new_struct("Inner", Location::Root, vec![Field::plain("y")]),
            ],
            "Model",
        )
        .unwrap();
        let order = container.dependency_order().unwrap();
        assert_eq!(names(&order), vec!["Other", "Inner", "Outer"]);
    }

    #[test]
    fn test_void_and_pointer_add_no_edge() {
        let void_ptr =
            Field::new("p", "", FieldMode::Pointer, None, Some("void".to_string())).unwrap();
        let self_ptr = Field::new("next", "", FieldMode::Pointer, None, Some("Node".to_string())).unwrap();
        let container = TypeContainer::new(
            vec![TypeDef::new_struct("Node", Location::Root, vec![void_ptr, self_ptr])],
            "Model",
        )
        .unwrap();
        assert_eq!(container.dependency_order().unwrap().len(), 1);
    }

    #[test]
    fn test_enum_members_add_no_edge() {
        let mode = Field::new("m", "", FieldMode::Enum, None, Some("Mode".to_string())).unwrap();
        let container = TypeContainer::new(
            vec![
                TypeDef::new_struct("S", Location::Root, vec![mode.clone()]),
                TypeDef::new_enum("Mode", Location::Root, vec![Enumerator::new("On", 1)]),
            ],
            "Model",
        )
        .unwrap();
        let order = container.dependency_order().unwrap();
        assert_eq!(names(&order), vec!["S", "Mode"]);

        let undeclared = TypeContainer::new(
            vec![TypeDef::new_struct("S", Location::Root, vec![mode])],
            "Model",
        )
        .unwrap();
        assert_eq!(names(&undeclared.dependency_order().unwrap()), vec!["S"]);
    }

    #[test]
    fn test_cycle_names_types() {
        let container = TypeContainer::new(
            vec![
                TypeDef::new_struct("A", Location::Root, vec![struct_field("b", "B")]),
                TypeDef::new_struct("B", Location::ModelClass, vec![struct_field("a", "A")]),
            ],
            "Model",
        )
        .unwrap();
        let err = container.dependency_order().unwrap_err();
        match err {
            IrError::CircularDependency { types } => {
                assert_eq!(types, vec!["A".to_string(), "Model::B".to_string()]);
            }
            other => panic!("Expected circular dependency, got {other:?}"),
        }
    }

    #[test]
    fn test_unresolved_reference() {
        let container = TypeContainer::new(
            vec![TypeDef::new_struct("A", Location::Root, vec![struct_field("b", "Missing")])],
            "Model",
        )
        .unwrap();
        assert!(matches!(
            container.dependency_order(),
            Err(IrError::UnresolvedTypeReference { .. })
        ));
    }

    #[test]
    fn test_hierarchy_order_not_implemented() {
        let container = TypeContainer::new(vec![], "Model").unwrap();
        assert!(matches!(
            container.hierarchy_order(),
            Err(IrError::NotImplemented(_))
        ));
    }

    #[test]
    fn test_typedef_rejects_mixed_members() {
        let json = r#"{"name": "E", "location": "root", "is_enum": true,
                       "fields": [{"name": "a", "value": 0, "mode": 1}]}"#;
        assert!(serde_json::from_str::<TypeDef>(json).is_err());

        let json = r#"{"name": "S", "location": "root", "is_enum": false,
                       "fields": [{"name": "a", "mode": 1, "value": 3}]}"#;
        assert!(serde_json::from_str::<TypeDef>(json).is_err());
    }

    #[test]
    fn test_lookup() {
        let container = TypeContainer::new(
            vec![TypeDef::new_struct("A", Location::ModelClass, vec![Field::plain("x")])],
            "Model",
        )
        .unwrap();
        let ty = container.lookup("A").unwrap();
        assert_eq!(ty.field("x").unwrap().name, "x");
        assert!(ty.field("y").is_none());
        assert!(matches!(container.lookup("B"), Err(IrError::TypeNotFound(_))));
    }
}
