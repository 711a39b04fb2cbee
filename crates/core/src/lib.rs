pub mod buffer;
pub mod config;
pub mod element;
pub mod error;
pub mod format;
pub mod grid;

pub use buffer::ChannelBuffer;
pub use config::Config;
pub use element::ElementType;
pub use error::*;
pub use grid::{Grid, GridData, SampleSlice};
