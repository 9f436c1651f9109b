//! Node identifiers

use crate::document::Node;
use crate::error::{ConvertError, ConvertResult};

/// Factor between the id of a node and the id of its first child
pub const ID_MULTIPLIER: u64 = 1000;

/// Assign ids depth first
///
/// The first node of a sibling list gets `parent * 1000 + 1` and points to
/// `parent`; each following one gets the previous id plus one and points to
/// its previous sibling.
pub fn assign_ids(nodes: &mut [Node], parent: u64) -> ConvertResult<()> {
    let mut previous = parent;
    for (i, node) in nodes.iter_mut().enumerate() {
        let id = if i == 0 {
            parent
                .checked_mul(ID_MULTIPLIER)
                .and_then(|id| id.checked_add(1))
        } else {
            previous.checked_add(1)
        };
        let id = id.ok_or_else(|| {
            ConvertError::structure(node.line, format!("Node {:?} is nested too deeply.", node.name))
        })?;
        node.parent = previous;
        node.id = id;
        assign_ids(&mut node.nodes, id)?;
        previous = id;
    }
    Ok(())
}
