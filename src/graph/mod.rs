//! Graph state engine: document, mutations, derived views and persistence.

pub mod document;
pub mod editor;
pub mod error;
pub mod model;
pub mod persist;
pub mod projection;
pub mod relations;
pub mod session;
pub mod store;

pub use document::GraphDocument;
pub use editor::Editor;
pub use error::PersistError;
pub use model::{Category, ContentMode, Edge, EdgeKind, Node, NodeData, Position};
pub use persist::{DocumentSlot, LocalStorageSlot, MemorySlot};
pub use projection::{EdgeView, NodeClass, NodeContent, NodeView};
pub use relations::{RelatedNode, RelationInfo};
pub use session::{CategoryDraft, DraftField, EditState};
