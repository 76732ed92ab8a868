pub mod catalog;
pub mod export;
pub mod local;
pub mod pager;
pub mod render;
pub mod service;
pub mod versions;

pub use crate::domain::model::{Candidate, CandidateVersion, LocalCandidate, Version};
pub use crate::domain::ports::{CandidateSource, ConfigProvider, Storage};
pub use crate::utils::error::Result;
