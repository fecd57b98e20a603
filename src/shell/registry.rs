//! Command Registry
//!
//! Commands and sub-shells live in a tree of [`Shell`] nodes. The tree is
//! built at registration time and is read-only during dispatch; a host may
//! mount plugin shells by inserting new children.

use std::rc::Rc;

use indexmap::IndexMap;

use super::command::Command;

/// A node in the command tree.
#[derive(Debug)]
pub struct Shell {
    name: String,
    commands: IndexMap<String, Rc<Command>>,
    children: IndexMap<String, Shell>,
    /// Invoked when this shell's path is addressed with no further name.
    entrypoint: Option<Rc<Command>>,
}

impl Shell {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: IndexMap::new(),
            children: IndexMap::new(),
            entrypoint: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_command(&mut self, command: Command) {
        self.commands
            .insert(command.name.clone(), Rc::new(command));
    }

    pub fn add_child(&mut self, child: Shell) {
        self.children.insert(child.name.clone(), child);
    }

    pub fn set_entrypoint(&mut self, command: Command) {
        self.entrypoint = Some(Rc::new(command));
    }

    pub fn command(&self, name: &str) -> Option<Rc<Command>> {
        self.commands.get(name).cloned()
    }

    pub fn child(&self, name: &str) -> Option<&Shell> {
        self.children.get(name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Shell> {
        self.children.get_mut(name)
    }

    /// Resolve a dotted path to a command.
    ///
    /// An empty path selects this shell's entrypoint. Otherwise the head
    /// segment is looked up as a command (only when it is the final
    /// segment) and then as a child shell to recurse into.
    pub fn resolve(&self, path: &str) -> Option<Rc<Command>> {
        if path.is_empty() {
            return self.entrypoint.clone();
        }

        let (head, tail) = match path.split_once('.') {
            Some((head, tail)) => (head, Some(tail)),
            None => (path, None),
        };

        if tail.is_none() {
            if let Some(command) = self.commands.get(head) {
                return Some(command.clone());
            }
        }

        self.children
            .get(head)
            .and_then(|child| child.resolve(tail.unwrap_or("")))
    }

    /// Every reachable command path, dotted, in registration order.
    pub fn completions(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.commands.keys().cloned().collect();
        for (name, child) in &self.children {
            if child.entrypoint.is_some() {
                paths.push(name.clone());
            }
            for sub in child.completions() {
                paths.push(format!("{}.{}", name, sub));
            }
        }
        paths
    }
}
