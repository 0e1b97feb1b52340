//! The Definition model: named declarations with an owner chain.
//!
//! A `Definition` is the language's unit of reuse and override. Sites root
//! loaded source units; plain definitions nest inside them. Ownership is a
//! non-owning `Weak` back-reference, so qualified names and override
//! resolution walk an explicit, finite parent chain. Child sets are keyed by
//! name and hold overload sets distinguished by parameter-list shape;
//! override is resolution-time selection, never mutation of the original.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use serde::{Deserialize, Serialize};

use crate::collections::ConcurrentMap;
use crate::ident::{CantoPath, Ident};
use crate::node::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Access {
    Public,
    Private,
    Protected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Durability {
    /// Computed once per frame; eligible for the keep cache.
    Static,
    /// Re-evaluated on every reference; never cached.
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefKind {
    /// The root of one loaded source unit; may nest to form namespaces.
    Site,
    Plain,
    /// A compile-time constant form.
    Constant,
    /// A parameter declaration form.
    Parameter,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: Ident,
    pub default: Option<Arc<Node>>,
}

impl Param {
    pub fn required(name: impl Into<Ident>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default(name: impl Into<Ident>, default: Arc<Node>) -> Self {
        Self {
            name: name.into(),
            default: Some(default),
        }
    }
}

/// One parameter-list shape of an overloaded definition.
#[derive(Debug, Clone, Default)]
pub struct ParamList {
    pub params: Vec<Param>,
}

impl ParamList {
    pub fn new(params: Vec<Param>) -> Self {
        Self { params }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Number of parameters without a default expression.
    pub fn required(&self) -> usize {
        self.params.iter().filter(|p| p.default.is_none()).count()
    }

    /// Compatible with a call supplying `argc` positional arguments.
    pub fn accepts(&self, argc: usize) -> bool {
        argc >= self.required() && argc <= self.arity()
    }

    /// How many defaults a call with `argc` arguments would fill.
    pub fn defaults_filled(&self, argc: usize) -> usize {
        self.arity().saturating_sub(argc)
    }
}

pub struct Definition {
    name: Ident,
    kind: DefKind,
    owner: Option<Weak<Definition>>,
    access: Access,
    durability: Durability,
    param_lists: Vec<ParamList>,
    contents: Arc<Node>,
    constants: HashMap<String, String>,
    type_tags: Vec<String>,
    is_default: bool,
    children: ConcurrentMap<Ident, Vec<Arc<Definition>>>,
    ordered_children: Mutex<Vec<Arc<Definition>>>,
}

impl std::fmt::Debug for Definition {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Definition")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("access", &self.access)
            .field("durability", &self.durability)
            .field("type_tags", &self.type_tags)
            .field("is_default", &self.is_default)
            .finish_non_exhaustive()
    }
}

impl Definition {
    pub fn name(&self) -> &Ident {
        &self.name
    }

    pub fn kind(&self) -> DefKind {
        self.kind
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn durability(&self) -> Durability {
        self.durability
    }

    pub fn contents(&self) -> &Arc<Node> {
        &self.contents
    }

    pub fn type_tags(&self) -> &[String] {
        &self.type_tags
    }

    pub fn has_type_tag(&self, tag: &str) -> bool {
        self.type_tags.iter().any(|t| t == tag)
    }

    /// True for a `default`-flagged declaration: excluded from ordinary name
    /// search, tried only after the whole scope chain yields no match.
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn param_lists(&self) -> &[ParamList] {
        &self.param_lists
    }

    pub fn owner(&self) -> Option<Arc<Definition>> {
        self.owner.as_ref().and_then(Weak::upgrade)
    }

    pub fn owner_name(&self) -> String {
        self.owner()
            .map(|o| o.name.as_str().to_string())
            .unwrap_or_default()
    }

    /// The dotted owner-chain name down from the root site, e.g.
    /// `app.layout.header`. Walked iteratively.
    pub fn qualified_name(&self) -> CantoPath {
        let mut segments = vec![self.name.clone()];
        let mut owner = self.owner();
        while let Some(def) = owner {
            segments.push(def.name.clone());
            owner = def.owner();
        }
        segments.reverse();
        CantoPath::new(segments)
    }

    /// Look up a literal in this definition's own constant map only; no chain
    /// walk, no failure. Used for page-output conventions such as
    /// `fileExtension` and `outputDirectory`.
    pub fn get_string_constant(&self, name: &str, default: &str) -> String {
        self.constants
            .get(name)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// Whether any parameter-list shape is compatible with `argc` arguments.
    /// A definition with no parameter lists is a zero-arity body.
    pub fn accepts_arity(&self, argc: usize) -> bool {
        if self.param_lists.is_empty() {
            return argc == 0;
        }
        self.param_lists.iter().any(|list| list.accepts(argc))
    }

    /// Select the parameter list binding a call with `argc` arguments.
    ///
    /// Tie-break between compatible shapes: an exact-arity match beats a
    /// default-filled one; among default-filled candidates the fewest filled
    /// defaults wins; remaining ties go to declaration order.
    pub fn matching_param_list(&self, argc: usize) -> Option<&ParamList> {
        self.param_lists
            .iter()
            .filter(|list| list.accepts(argc))
            .min_by_key(|list| list.defaults_filled(argc))
    }

    /// A definition is abstract for a call shape when no parameter list can
    /// bind the supplied arguments, or when its body is a bare abstract
    /// null marker. Abstract instantiations yield no output; they are a
    /// policy-checked skip, not a resolution bug.
    pub fn is_abstract_for(&self, argc: usize) -> bool {
        use crate::node::NodeKind;
        if !self.accepts_arity(argc) {
            return true;
        }
        matches!(
            self.contents.kind(),
            NodeKind::NullValue { is_abstract: true }
        )
    }

    /// Ordinary child lookup: matching name plus compatible arity, defaults
    /// excluded. First by the arity tie-break, then declaration order.
    pub fn lookup_child(&self, name: &Ident, argc: usize) -> Option<Arc<Definition>> {
        let set = self.children.get_cloned(name)?;
        set.iter()
            .filter(|d| !d.is_default() && d.accepts_arity(argc))
            .min_by_key(|d| {
                d.matching_param_list(argc)
                    .map(|list| list.defaults_filled(argc))
                    .unwrap_or(0)
            })
            .cloned()
    }

    /// The `default`-flagged fallback declaration for `name`, if any.
    pub fn lookup_default_child(&self, name: &Ident) -> Option<Arc<Definition>> {
        let set = self.children.get_cloned(name)?;
        set.into_iter().find(|d| d.is_default())
    }

    /// Top-level children in declaration order.
    pub fn children_in_order(&self) -> Vec<Arc<Definition>> {
        self.ordered_children
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }

    /// Build `builder` as a child of `self`, wiring the owner back-reference
    /// and appending to this scope's overload set for the child's name.
    pub fn attach_child(self: &Arc<Self>, builder: DefinitionBuilder) -> Arc<Definition> {
        let child = builder.build_with_owner(Some(Arc::downgrade(self)));
        self.children
            .update(child.name.clone(), |set| set.push(child.clone()));
        if let Ok(mut ordered) = self.ordered_children.lock() {
            ordered.push(child.clone());
        }
        child
    }
}

/// Performs the init pass for one declaration: raw parse output is wired into
/// named fields (parameter lists, contents, constants, modifiers) before the
/// definition is frozen and attached to its owner.
pub struct DefinitionBuilder {
    name: Ident,
    kind: DefKind,
    access: Access,
    durability: Durability,
    param_lists: Vec<ParamList>,
    contents: Arc<Node>,
    constants: HashMap<String, String>,
    type_tags: Vec<String>,
    is_default: bool,
}

impl DefinitionBuilder {
    pub fn new(name: impl Into<Ident>, kind: DefKind) -> Self {
        Self {
            name: name.into(),
            kind,
            access: Access::Public,
            durability: Durability::Static,
            param_lists: vec![],
            contents: Node::empty(),
            constants: HashMap::new(),
            type_tags: vec![],
            is_default: false,
        }
    }

    pub fn site(name: impl Into<Ident>) -> Self {
        Self::new(name, DefKind::Site)
    }

    pub fn definition(name: impl Into<Ident>) -> Self {
        Self::new(name, DefKind::Plain)
    }

    pub fn access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn durability(mut self, durability: Durability) -> Self {
        self.durability = durability;
        self
    }

    pub fn param_list(mut self, list: ParamList) -> Self {
        self.param_lists.push(list);
        self
    }

    pub fn params(self, params: Vec<Param>) -> Self {
        self.param_list(ParamList::new(params))
    }

    pub fn contents(mut self, contents: Arc<Node>) -> Self {
        self.contents = contents;
        self
    }

    pub fn constant(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.constants.insert(name.into(), value.into());
        self
    }

    pub fn type_tag(mut self, tag: impl Into<String>) -> Self {
        self.type_tags.push(tag.into());
        self
    }

    pub fn default_clause(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Freeze into an owner-less definition (a root site).
    pub fn build(self) -> Arc<Definition> {
        self.build_with_owner(None)
    }

    fn build_with_owner(self, owner: Option<Weak<Definition>>) -> Arc<Definition> {
        Arc::new(Definition {
            name: self.name,
            kind: self.kind,
            owner,
            access: self.access,
            durability: self.durability,
            param_lists: self.param_lists,
            contents: self.contents,
            constants: self.constants,
            type_tags: self.type_tags,
            is_default: self.is_default,
            children: ConcurrentMap::new(),
            ordered_children: Mutex::new(vec![]),
        })
    }
}
