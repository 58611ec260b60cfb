//! Kivy-language (kv) export of a layout tree.
//!
//! The root container opens the document; every attached node below it becomes a
//! block nested under its parent. Output depends only on the tree, so exporting
//! an unchanged tree twice yields identical text.

use std::fmt;

use formcraft_core::config::{Orientation, SizeHint};
use formcraft_core::profiling::profile_function;

use crate::tree::{DESTINATION_TEXT, LayoutNode, LayoutTree, NodeId, NodeKind, Spacing};

/// One level of nesting.
pub const INDENT: &str = "    ";

/// An attribute value as written in kv.
#[derive(Debug, Clone, PartialEq)]
pub enum KvValue {
    Number(f32),
    Hint(SizeHint),
    Text(String),
    List(Vec<f32>),
}

impl fmt::Display for KvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // f32 Display already drops a trailing `.0`.
            KvValue::Number(n) => write!(f, "{}", n),
            KvValue::Hint(hint) => {
                write!(f, "[")?;
                write_optional(f, hint.width)?;
                write!(f, ", ")?;
                write_optional(f, hint.height)?;
                write!(f, "]")
            }
            KvValue::Text(text) => {
                write!(f, "'")?;
                for c in text.chars() {
                    match c {
                        '\'' => write!(f, "\\'")?,
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                write!(f, "'")
            }
            KvValue::List(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
        }
    }
}

fn write_optional(f: &mut fmt::Formatter<'_>, value: Option<f32>) -> fmt::Result {
    match value {
        Some(v) => write!(f, "{}", v),
        None => write!(f, "None"),
    }
}

type AttributeAccessor = fn(&LayoutNode) -> Option<KvValue>;

/// Attributes written for a node, in output order. Absent ones are skipped.
const ATTRIBUTES: &[(&str, AttributeAccessor)] = &[
    ("height", height),
    ("size_hint", size_hint),
    ("text", text),
    ("spacing", spacing),
];

fn height(node: &LayoutNode) -> Option<KvValue> {
    node.style.height.map(KvValue::Number)
}

fn size_hint(node: &LayoutNode) -> Option<KvValue> {
    Some(KvValue::Hint(node.style.size_hint))
}

fn text(node: &LayoutNode) -> Option<KvValue> {
    match &node.kind {
        NodeKind::Leaf(widget) => widget.text.clone().map(KvValue::Text),
        NodeKind::Destination => Some(KvValue::Text(DESTINATION_TEXT.to_string())),
        NodeKind::Container(_) => None,
    }
}

fn spacing(node: &LayoutNode) -> Option<KvValue> {
    if !node.kind.is_container() {
        return None;
    }
    node.style.spacing.map(spacing_value)
}

fn spacing_value(spacing: Spacing) -> KvValue {
    match spacing {
        Spacing::Uniform(gap) => KvValue::Number(gap),
        Spacing::Axes(gaps) => KvValue::List(gaps.to_vec()),
    }
}

/// Block header naming a node's kind.
pub fn kind_name(node: &LayoutNode) -> &str {
    match &node.kind {
        NodeKind::Container(Orientation::Flow) => "StackLayout",
        NodeKind::Container(_) => "BoxLayout",
        NodeKind::Leaf(widget) => widget.kind.name(),
        NodeKind::Destination => "Destination",
    }
}

/// Lazily formatted kv document for a tree.
pub struct KvDocument<'a> {
    tree: &'a LayoutTree,
}

impl<'a> KvDocument<'a> {
    pub fn new(tree: &'a LayoutTree) -> Self {
        Self { tree }
    }

    fn write_root(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = self.tree.root();
        let Some(node) = self.tree.get(root) else {
            return Ok(());
        };
        let orientation = node.kind.orientation().unwrap_or_default();
        writeln!(f, "{}:", kind_name(node))?;
        writeln!(
            f,
            "{}orientation: {}",
            INDENT,
            KvValue::Text(orientation.as_str().to_string())
        )?;
        writeln!(
            f,
            "{}padding: {}",
            INDENT,
            KvValue::List(node.style.padding.unwrap_or([0.0; 4]).to_vec())
        )?;
        writeln!(
            f,
            "{}spacing: {}",
            INDENT,
            spacing_value(node.style.spacing.unwrap_or(Spacing::Uniform(0.0)))
        )
    }
}

impl fmt::Display for KvDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_root(f)?;

        let root = self.tree.root();
        let mut ancestors: Vec<NodeId> = vec![root];

        for (id, _) in self.tree.walk().skip(1) {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            let parent = node.parent().unwrap_or(root);
            while ancestors.len() > 1 && ancestors.last() != Some(&parent) {
                ancestors.pop();
            }

            let header = INDENT.repeat(ancestors.len());
            writeln!(f, "{}{}:", header, kind_name(node))?;
            ancestors.push(id);

            let body = INDENT.repeat(ancestors.len());
            for (name, accessor) in ATTRIBUTES {
                if let Some(value) = accessor(node) {
                    writeln!(f, "{}{}: {}", body, name, value)?;
                }
            }
        }
        Ok(())
    }
}

/// Serialize the tree as kv text.
pub fn export(tree: &LayoutTree) -> String {
    profile_function!();
    KvDocument::new(tree).to_string()
}
