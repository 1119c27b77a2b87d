pub(crate) mod layout;
pub(crate) mod region;
pub(crate) mod svg;
