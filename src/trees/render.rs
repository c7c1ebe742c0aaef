use super::{classifier::FilterTreeClassifier, node::FilterTreeNode};
use crate::{
    data::dataset::WholeNumber,
    error::{FilterTreeError, Result},
    filters::Filter,
};

impl<F: Filter, YT: WholeNumber> FilterTreeClassifier<F, YT> {
    /// Renders the tree as indented text, one branch condition per line.
    ///
    /// Every node splits in its own filtered space, so features are named
    /// `f<index>` unless `feature_names` covers the index. Thresholds are
    /// rounded to `decimals` places and leaves show their class counts:
    ///
    /// ```text
    /// f0 <= 1.50: [2, 0]
    /// f0 > 1.50
    ///   f1 <= 0.25: [0, 3]
    ///   f1 > 0.25: [1, 0]
    /// ```
    ///
    /// # Errors
    ///
    /// This method will return an error if the tree wasn't built yet.
    pub fn render(&self, feature_names: Option<&[String]>, decimals: usize) -> Result<String> {
        let root = self.root().ok_or(FilterTreeError::NotFitted)?;
        let mut output = String::new();
        match root {
            FilterTreeNode::Leaf { class_counts, .. } => {
                output.push_str(&format!("{:?}\n", class_counts));
            }
            split => render_branches(split, feature_names, decimals, 0, &mut output),
        }
        Ok(output)
    }
}

fn render_branches<F: Filter>(
    node: &FilterTreeNode<F>,
    feature_names: Option<&[String]>,
    decimals: usize,
    depth: usize,
    output: &mut String,
) {
    let FilterTreeNode::Split {
        feature_index,
        threshold,
        left,
        right,
        ..
    } = node
    else {
        return;
    };

    let name = feature_names
        .and_then(|names| names.get(*feature_index))
        .cloned()
        .unwrap_or_else(|| format!("f{}", feature_index));
    let indent = "  ".repeat(depth);

    for (operator, child) in [("<=", left), (">", right)] {
        output.push_str(&format!(
            "{}{} {} {:.*}",
            indent, name, operator, decimals, threshold
        ));
        match &**child {
            FilterTreeNode::Leaf { class_counts, .. } => {
                output.push_str(&format!(": {:?}\n", class_counts));
            }
            split => {
                output.push('\n');
                render_branches(split, feature_names, decimals, depth + 1, output);
            }
        }
    }
}
