//! Filtered, lazy enumeration of the files in a search scope
//!
//! The pieces, leaves first:
//! - [`SearchFilter`] decides per file and per folder; [`FilterHelper`]
//!   applies the filters active at the current depth
//! - [`SimpleSearchIterator`] walks a root recursively, [`FlatSearchIterator`]
//!   lists its direct children
//! - [`SearchInfo`] turns roots plus [`SearchScopeOptions`] into such an
//!   iterator; [`CompoundSearchInfo`] chains several of them
//! - [`ContentMatcher`] looks for text inside the produced files

pub mod cancel;
pub mod compound;
pub mod content;
pub mod cursor;
pub mod filter;
pub mod filters;
pub mod flat;
pub mod helper;
pub mod info;
pub mod listener;
pub mod matcher;
pub mod options;
pub mod simple;

pub use cancel::CancelFlag;
pub use compound::{CompoundSearchInfo, CompoundSearchIterator};
pub use content::{ContentMatcher, ContentQuery, FileMatches, LineMatch};
pub use cursor::Cursor;
pub use filter::{FilterDecision, FilterRef, FilterSet, FnFilter, FolderResult, SearchFilter};
pub use flat::FlatSearchIterator;
pub use helper::FilterHelper;
pub use info::{
    DefaultFilters, FlatSearchInfo, SearchInfo, SearchIter, SearchRoot, SimpleSearchInfo,
};
pub use listener::{
    ListenerChain, NoopListener, SearchListener, SearchStats, StatsSnapshot, TracingListener,
};
pub use matcher::FileNameMatcher;
pub use options::SearchScopeOptions;
pub use simple::SimpleSearchIterator;
