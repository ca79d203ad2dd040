//! Gift scanner engine: page fetching, record extraction and the bounded scan loop.
mod address;
mod decode;
mod engine;
mod extract;
mod fetch;
mod types;

pub use address::{AddressError, TargetAddress, DEFAULT_BASE_TEMPLATE};
pub use decode::{decode_html, DecodeError};
pub use engine::{ConcurrencyLimit, ScanEngine, ScanRange, DEFAULT_CONCURRENCY};
pub use extract::{AttributeRowExtractor, RecordExtractor, DEFAULT_ATTRIBUTE};
pub use fetch::{
    ChannelProgressSink, ClientBuildError, FetchSettings, Fetcher, NoopProgressSink,
    ProgressSink, ReqwestFetcher,
};
pub use types::{FailureKind, FetchError, ScanEvent};

pub use tokio_util::sync::CancellationToken;
