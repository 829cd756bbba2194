//! Plain-text rendering of a trained tree

use super::decision_tree::TreeNode;
use std::fmt;

/// Renders trees as indented question/answer text
#[derive(Debug, Clone)]
pub struct TreeRenderer {
    feature_labels: Vec<String>,
    class_labels: [String; 2],
    indent: usize,
}

impl TreeRenderer {
    pub fn new<S: AsRef<str>>(feature_labels: &[S]) -> Self {
        Self {
            feature_labels: feature_labels.iter().map(|l| l.as_ref().to_string()).collect(),
            class_labels: ["No Heart Disease".to_string(), "Heart Disease".to_string()],
            indent: 4,
        }
    }

    /// Names shown for class 0 and class 1
    pub fn with_class_labels(mut self, negative: impl Into<String>, positive: impl Into<String>) -> Self {
        self.class_labels = [negative.into(), positive.into()];
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn render(&self, root: &TreeNode) -> String {
        self.display(root).to_string()
    }

    /// Borrowing view of `root` that formats through [`fmt::Display`]
    pub fn display<'a>(&'a self, root: &'a TreeNode) -> RenderedTree<'a> {
        RenderedTree {
            renderer: self,
            root,
        }
    }

    fn feature_label(&self, idx: usize) -> String {
        self.feature_labels
            .get(idx)
            .cloned()
            .unwrap_or_else(|| format!("feature[{}]", idx))
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, node: &TreeNode, depth: usize) -> fmt::Result {
        let pad = " ".repeat(depth * self.indent);
        match node {
            TreeNode::Leaf {
                predicted_class,
                n_samples,
                ..
            } => {
                let label = self
                    .class_labels
                    .get(*predicted_class as usize)
                    .map(String::as_str)
                    .unwrap_or("Unknown");
                let confidence = node.confidence().unwrap_or(0.0) * 100.0;
                writeln!(
                    f,
                    "{pad}Class: {label} ({n_samples} samples, {confidence:.1}% confidence)"
                )
            }
            TreeNode::Split {
                feature_idx,
                threshold,
                left,
                right,
                ..
            } => {
                writeln!(f, "{pad}{} <= {:.2}", self.feature_label(*feature_idx), threshold)?;
                writeln!(f, "{pad}├─ Yes:")?;
                self.write_node(f, left, depth + 1)?;
                writeln!(f, "{pad}└─ No:")?;
                self.write_node(f, right, depth + 1)
            }
        }
    }
}

/// A tree paired with the renderer that formats it
pub struct RenderedTree<'a> {
    renderer: &'a TreeRenderer,
    root: &'a TreeNode,
}

impl fmt::Display for RenderedTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.renderer.write_node(f, self.root, 0)
    }
}

/// Render `root` with the given feature labels and the default class names
pub fn render_tree<S: AsRef<str>>(root: &TreeNode, feature_labels: &[S]) -> String {
    TreeRenderer::new(feature_labels).render(root)
}
