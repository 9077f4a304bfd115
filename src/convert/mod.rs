mod client;
mod poller;
mod types;

pub use client::ConversionClient;
pub use poller::{run_poll_loop, IntervalTicker, PollEvent, StatusSource, Ticker};
pub use types::{ConversionResult, StatusReport, SubmitResponse, TaskId, TaskStatus};
