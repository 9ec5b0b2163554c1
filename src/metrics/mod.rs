pub(crate) mod iqar;
pub(crate) mod solar;
pub(crate) mod uv;

pub(crate) use iqar::{calculate_iqar, AirQualityResult, PollutantSample};
pub(crate) use uv::{UvSample, UvService};
