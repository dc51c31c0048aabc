//! Classes and single inheritance.
//!
//! Parent links are stored twice: on each [`ClassEntry`] for walking the
//! chain, and as edges in a `petgraph` graph (child -> parent) so a cycle is
//! rejected the moment the closing edge is registered. A table that accepted
//! every registration therefore always has a finite parent chain.

use kestrel_core::RegistrationError;
use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::{FxHashMap, FxHashSet};

/// A declared class as seen by call lowering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassEntry {
    pub name: String,
    pub parent: Option<String>,
    pub methods: FxHashSet<String>,
    pub static_methods: FxHashSet<String>,
    pub getters: FxHashSet<String>,
    pub setters: FxHashSet<String>,
}

impl ClassEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_method(mut self, name: impl Into<String>) -> Self {
        self.methods.insert(name.into());
        self
    }

    pub fn with_static(mut self, name: impl Into<String>) -> Self {
        self.static_methods.insert(name.into());
        self
    }

    pub fn with_getter(mut self, name: impl Into<String>) -> Self {
        self.getters.insert(name.into());
        self
    }

    pub fn with_setter(mut self, name: impl Into<String>) -> Self {
        self.setters.insert(name.into());
        self
    }

    pub fn declares_method(&self, name: &str) -> bool {
        self.methods.contains(name)
    }

    /// Methods plus accessors, the members an instance can be asked for.
    pub fn declares_member(&self, name: &str) -> bool {
        self.methods.contains(name) || self.getters.contains(name) || self.setters.contains(name)
    }
}

#[derive(Debug, Default)]
pub struct ClassTable {
    classes: FxHashMap<String, ClassEntry>,
    graph: DiGraph<String, ()>,
    nodes: FxHashMap<String, NodeIndex>,
}

impl ClassTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(&index) = self.nodes.get(name) {
            return index;
        }
        let index = self.graph.add_node(name.to_string());
        self.nodes.insert(name.to_string(), index);
        index
    }

    /// Register a class. The parent may be registered later.
    ///
    /// Fails if the name is taken or if the parent link would close a cycle;
    /// on failure the table is unchanged apart from graph placeholders.
    pub fn register(&mut self, entry: ClassEntry) -> Result<(), RegistrationError> {
        if self.classes.contains_key(&entry.name) {
            return Err(RegistrationError::DuplicateClass(entry.name));
        }

        let child = self.node(&entry.name);
        if let Some(parent) = &entry.parent {
            let parent_node = self.node(parent);
            if parent_node == child || has_path_connecting(&self.graph, parent_node, child, None) {
                return Err(RegistrationError::CircularInheritance {
                    class: entry.name.clone(),
                    parent: parent.clone(),
                });
            }
            self.graph.add_edge(child, parent_node, ());
        }

        log::trace!("register class {} (parent {:?})", entry.name, entry.parent);
        self.classes.insert(entry.name.clone(), entry);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ClassEntry> {
        self.classes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn parent_of(&self, name: &str) -> Option<&str> {
        self.classes.get(name)?.parent.as_deref()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// `start` followed by its registered ancestors, nearest first.
    ///
    /// Stops at the first name that is not a registered class.
    pub fn ancestry<'a>(&'a self, start: &str) -> impl Iterator<Item = &'a ClassEntry> + use<'a> {
        let mut current = self.classes.get(start);
        std::iter::from_fn(move || {
            let entry = current?;
            current = entry
                .parent
                .as_deref()
                .and_then(|parent| self.classes.get(parent));
            Some(entry)
        })
    }

    /// Name of the nearest class, starting at `start` itself, that declares
    /// instance method `method`.
    pub fn resolve_method_to_class(&self, start: &str, method: &str) -> Option<&str> {
        self.ancestry(start)
            .find(|class| class.declares_method(method))
            .map(|class| class.name.as_str())
    }

    /// Like [`resolve_method_to_class`](Self::resolve_method_to_class), also
    /// accepting getters and setters.
    pub fn resolve_member_to_class(&self, start: &str, member: &str) -> Option<&str> {
        self.ancestry(start)
            .find(|class| class.declares_member(member))
            .map(|class| class.name.as_str())
    }

    /// Static methods are inherited along the same chain.
    pub fn resolve_static_to_class(&self, start: &str, method: &str) -> Option<&str> {
        self.ancestry(start)
            .find(|class| class.static_methods.contains(method))
            .map(|class| class.name.as_str())
    }

    pub fn is_subclass_of(&self, class: &str, ancestor: &str) -> bool {
        self.ancestry(class).skip(1).any(|entry| entry.name == ancestor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animals() -> ClassTable {
        let mut table = ClassTable::new();
        table
            .register(ClassEntry::new("Animal").with_method("speak").with_method("eat").with_static("create"))
            .unwrap();
        table
            .register(ClassEntry::new("Dog").extends("Animal").with_method("fetch").with_method("eat"))
            .unwrap();
        table
            .register(ClassEntry::new("Puppy").extends("Dog").with_getter("age"))
            .unwrap();
        table
    }

    #[test]
    fn inherited_method_resolves_to_declaring_ancestor() {
        let table = animals();
        assert_eq!(table.resolve_method_to_class("Dog", "speak"), Some("Animal"));
        assert_eq!(table.resolve_method_to_class("Puppy", "speak"), Some("Animal"));
    }

    #[test]
    fn override_resolves_to_self() {
        let table = animals();
        assert_eq!(table.resolve_method_to_class("Dog", "eat"), Some("Dog"));
        assert_eq!(table.resolve_method_to_class("Animal", "eat"), Some("Animal"));
    }

    #[test]
    fn missing_method_is_not_found() {
        let table = animals();
        assert_eq!(table.resolve_method_to_class("Dog", "fly"), None);
        assert_eq!(table.resolve_method_to_class("Cat", "speak"), None);
    }

    #[test]
    fn accessors_only_count_as_members() {
        let table = animals();
        assert_eq!(table.resolve_method_to_class("Puppy", "age"), None);
        assert_eq!(table.resolve_member_to_class("Puppy", "age"), Some("Puppy"));
    }

    #[test]
    fn statics_are_inherited() {
        let table = animals();
        assert_eq!(table.resolve_static_to_class("Dog", "create"), Some("Animal"));
        assert_eq!(table.resolve_static_to_class("Dog", "speak"), None);
    }

    #[test]
    fn duplicate_class_rejected() {
        let mut table = animals();
        assert_eq!(
            table.register(ClassEntry::new("Dog")),
            Err(RegistrationError::DuplicateClass("Dog".into()))
        );
    }

    #[test]
    fn cycles_rejected_at_registration() {
        let mut table = ClassTable::new();
        table.register(ClassEntry::new("A").extends("B")).unwrap();
        table.register(ClassEntry::new("B").extends("C")).unwrap();
        let err = table.register(ClassEntry::new("C").extends("A")).unwrap_err();
        assert!(matches!(err, RegistrationError::CircularInheritance { .. }));
        assert!(!table.contains("C"));

        let err = table.register(ClassEntry::new("Self").extends("Self")).unwrap_err();
        assert!(matches!(err, RegistrationError::CircularInheritance { .. }));
    }

    #[test]
    fn forward_parent_reference_is_allowed() {
        let mut table = ClassTable::new();
        table.register(ClassEntry::new("Child").extends("Base")).unwrap();
        assert_eq!(table.resolve_method_to_class("Child", "run"), None);
        table.register(ClassEntry::new("Base").with_method("run")).unwrap();
        assert_eq!(table.resolve_method_to_class("Child", "run"), Some("Base"));
    }

    #[test]
    fn resolution_outlives_the_queried_name() {
        let table = animals();
        let owner = {
            let start = String::from("Puppy");
            table.resolve_method_to_class(&start, "speak")
        };
        assert_eq!(owner, Some("Animal"));
    }

    #[test]
    fn ancestry_order() {
        let table = animals();
        let names: Vec<_> = table.ancestry("Puppy").map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Puppy", "Dog", "Animal"]);
        assert!(table.is_subclass_of("Puppy", "Animal"));
        assert!(!table.is_subclass_of("Animal", "Animal"));
        assert_eq!(table.parent_of("Dog"), Some("Animal"));
    }
}
