//! 환율 데이터 저장소.
//!
//! - `artifact`: JSON 파일 하나에 전체 시계열을 저장

pub mod artifact;

pub use artifact::ArtifactStore;
