pub(crate) mod artifact;
pub(crate) mod delivery;
pub(crate) mod engine;
pub(crate) mod pipeline;
