//! Core types: Page, Block, Link, recordings, the block tree and reference parsing

mod audio;
mod block;
mod graph;
mod ids;
mod link;
mod page;
mod page_id;
mod references;
mod tree;

pub use audio::{
    AUDIO_EXTENSIONS, AlignmentEntry, InvalidRecording, NewRecording, Recording, RecordingPatch,
    duration_between, is_audio_file, mime_type_for,
};
pub use block::{Block, BlockPatch};
pub use graph::{EdgeDirection, GraphEdge, GraphNode, NodeRole, PageGraph};
pub use ids::{AlignmentId, BlockId, BlockRefId, LinkId, ParseIdError, RecordingId};
pub use link::{BlockRef, Link, LinkKind, ParseLinkKindError};
pub use page::{Page, daily_title};
pub use page_id::{PageId, ParsePageIdError};
pub use references::{distinct_references, extract_references};
pub use tree::{BlockTree, OutlineEntry, Placement, TreeError};
