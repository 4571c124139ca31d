//! Data Models Module
//!
//! Typed cache payloads for each resource domain and response DTOs for the
//! HTTP observability surface.

mod payloads;
mod responses;

pub use payloads::{
    ChannelInfo, ChannelList, FileInfo, FileList, MessageInfo, SearchResults, ThreadReplies,
    UserInfo,
};
pub use responses::{
    ErrorResponse, HealthResponse, InvalidateRequest, InvalidateResponse, MetricsResponse,
    PurgeResponse,
};
