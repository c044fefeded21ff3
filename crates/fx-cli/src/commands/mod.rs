//! CLI 명령어 구현 모듈.

pub mod latest;
pub mod plot;
pub mod show;

pub use latest::run_latest;
pub use plot::{run_plot, ChartError, PlotArgs};
pub use show::{run_show, OutputFormat, ShowArgs};
