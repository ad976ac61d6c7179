mod media;
mod node;

pub use media::{display_title, LibraryEntry, MediaRecord, TrackMetadata};
pub use node::{NewNode, NodeId, StoreCounts, TreeNode, ROOT_NODE_ID};
